use crate::handle::SnapshotHandle;
use crate::snapshot::Pet;

use super::{DeviceInfo, Entity, EntityState, PetRef, Platform};

pub const UNIT_KILOMETERS: &str = "km";
pub const UNIT_MINUTES: &str = "min";
pub const UNIT_STEPS: &str = "steps";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Steps,
    Distance,
    Nap,
    Sleep,
}

impl StatKind {
    pub const ALL: [StatKind; 4] = [
        StatKind::Steps,
        StatKind::Distance,
        StatKind::Nap,
        StatKind::Sleep,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Steps => "Steps",
            Self::Distance => "Distance",
            Self::Nap => "Nap",
            Self::Sleep => "Sleep",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Distance => UNIT_KILOMETERS,
            Self::Nap | Self::Sleep => UNIT_MINUTES,
            Self::Steps => UNIT_STEPS,
        }
    }

    /// Divisor from the stored unit (meters, seconds) to the presented one.
    fn divisor(self) -> Option<f64> {
        match self {
            Self::Steps => None,
            Self::Distance => Some(1000.0),
            Self::Nap | Self::Sleep => Some(60.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatWindow {
    Daily,
    Weekly,
    Monthly,
}

impl StatWindow {
    pub const ALL: [StatWindow; 3] = [StatWindow::Daily, StatWindow::Weekly, StatWindow::Monthly];

    pub fn title(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }
}

type StatSelector = fn(&Pet) -> Option<f64>;

// Rows follow StatKind::ALL x StatWindow::ALL order.
const STAT_FIELDS: [[StatSelector; 3]; 4] = [
    [
        |pet| pet.daily_steps.map(|v| v as f64),
        |pet| pet.weekly_steps.map(|v| v as f64),
        |pet| pet.monthly_steps.map(|v| v as f64),
    ],
    [
        |pet| pet.daily_total_distance,
        |pet| pet.weekly_total_distance,
        |pet| pet.monthly_total_distance,
    ],
    [|pet| pet.daily_nap, |pet| pet.weekly_nap, |pet| pet.monthly_nap],
    [|pet| pet.daily_sleep, |pet| pet.weekly_sleep, |pet| pet.monthly_sleep],
];

/// Rounds to two decimals from the exact binary value, ties to even.
///
/// `2.675` is stored just below the tie and goes down; `1.125` is an exact
/// tie and goes to the even `1.12`. Scaling by 100 first would blur both.
pub(crate) fn round2(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    let bits = value.abs().to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1_u64 << 52) - 1);
    let (mantissa, exp) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1_u64 << 52), exp_bits - 1075)
    };

    // Already an integer, so it has no fractional digits to round.
    if exp >= 0 {
        return value;
    }

    // abs(value) * 100 == scaled / 2^shift exactly; scaled < 2^60.
    let scaled = u128::from(mantissa) * 100;
    let shift = exp.unsigned_abs();
    if shift >= 64 {
        return 0.0_f64.copysign(value);
    }

    let mut quotient = scaled >> shift;
    let remainder = scaled & ((1_u128 << shift) - 1);
    let half = 1_u128 << (shift - 1);
    if remainder > half || (remainder == half && quotient % 2 == 1) {
        quotient += 1;
    }

    (quotient as f64 / 100.0).copysign(value)
}

/// Presented value for one (kind, window) cell. A missing aggregate stays
/// missing; it is never reported as zero.
pub fn stat_value(pet: &Pet, kind: StatKind, window: StatWindow) -> EntityState {
    let selector = STAT_FIELDS[kind as usize][window as usize];
    let Some(raw) = selector(pet) else {
        return EntityState::Unknown;
    };

    match kind.divisor() {
        Some(divisor) => EntityState::Float(round2(raw / divisor)),
        None => EntityState::Integer(raw as i64),
    }
}

#[derive(Debug, Clone)]
pub struct StatsSensor {
    pet: PetRef,
    kind: StatKind,
    window: StatWindow,
}

impl StatsSensor {
    pub fn new(
        pet_id: impl Into<String>,
        snapshot: SnapshotHandle,
        kind: StatKind,
        window: StatWindow,
    ) -> Self {
        Self {
            pet: PetRef::new(pet_id, snapshot),
            kind,
            window,
        }
    }

    pub fn kind(&self) -> StatKind {
        self.kind
    }

    pub fn window(&self) -> StatWindow {
        self.window
    }
}

impl Entity for StatsSensor {
    fn platform(&self) -> Platform {
        Platform::Sensor
    }

    fn unique_id(&self) -> String {
        self.pet.unique_id(&format!(
            "{}-{}",
            self.window.title().to_lowercase(),
            self.kind.title().to_lowercase()
        ))
    }

    fn name(&self) -> String {
        format!(
            "{} {} {}",
            self.pet.pet_name(),
            self.window.title(),
            self.kind.title()
        )
    }

    fn state(&self) -> EntityState {
        self.pet
            .read(|pet| stat_value(pet, self.kind, self.window))
            .unwrap_or(EntityState::Unknown)
    }

    fn icon(&self) -> Option<String> {
        Some("mdi:map-marker-distance".to_string())
    }

    fn unit_of_measurement(&self) -> Option<&'static str> {
        Some(self.kind.unit())
    }

    fn device_info(&self) -> DeviceInfo {
        self.pet.device_info()
    }
}
