/// Picks an `mdi:battery*` icon from level and charging flag.
pub fn icon_for_battery_level(battery_level: Option<u8>, charging: bool) -> String {
    let mut icon = String::from("mdi:battery");
    let Some(level) = battery_level else {
        icon.push_str("-unknown");
        return icon;
    };

    if charging && level > 10 {
        let step = (f64::from(level) / 20.0 - 0.01).round() as u32 * 20;
        icon.push_str(&format!("-charging-{step}"));
    } else if charging {
        icon.push_str("-outline");
    } else if level <= 5 {
        icon.push_str("-alert");
    } else if level < 95 {
        let step = (f64::from(level) / 10.0 - 0.01).round() as u32 * 10;
        icon.push_str(&format!("-{step}"));
    }

    icon
}
