use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// One refresh worth of upstream state. Replaced wholesale on every cycle.
///
/// Decoding is per record and per field: a pet without an id is dropped, a
/// field of the wrong type reads as missing. Neither fails the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "Utc::now")]
    pub fetched_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "records")]
    pub pets: Vec<Pet>,
    #[serde(default, deserialize_with = "records")]
    pub bases: Vec<Base>,
}

impl Snapshot {
    pub fn new(pets: Vec<Pet>, bases: Vec<Base>) -> Self {
        Self {
            fetched_at: Utc::now(),
            pets,
            bases,
        }
    }

    pub fn get_pet(&self, pet_id: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.pet_id == pet_id)
    }

    pub fn get_base(&self, base_id: &str) -> Option<&Base> {
        self.bases.iter().find(|base| base.base_id == base_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub pet_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub breed: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub photo_link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub curr_latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub curr_longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub activity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub curr_place_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub curr_place_address: Option<String>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub daily_steps: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub weekly_steps: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub monthly_steps: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub daily_total_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub weekly_total_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub monthly_total_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub daily_nap: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub weekly_nap: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub monthly_nap: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub daily_sleep: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub weekly_sleep: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub monthly_sleep: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub device: Option<PetDevice>,
}

impl Pet {
    pub fn new(pet_id: impl Into<String>) -> Self {
        Self {
            pet_id: pet_id.into(),
            ..Self::default()
        }
    }

    pub fn activity_type(&self) -> Option<&str> {
        self.activity_type.as_deref()
    }

    pub fn curr_place_name(&self) -> Option<&str> {
        self.curr_place_name.as_deref()
    }

    pub fn curr_place_address(&self) -> Option<&str> {
        self.curr_place_address.as_deref()
    }
}

/// Collar hardware nested inside a pet record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDevice {
    #[serde(default, deserialize_with = "lenient_percent")]
    pub battery_percent: Option<u8>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_charging: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub build_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_lost: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub connection_state_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    pub base_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub online: Option<bool>,
}

impl Base {
    pub fn new(base_id: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            ..Self::default()
        }
    }
}

trait Record: DeserializeOwned {
    const KIND: &'static str;
    fn id(&self) -> &str;
}

impl Record for Pet {
    const KIND: &'static str = "pet";

    fn id(&self) -> &str {
        &self.pet_id
    }
}

impl Record for Base {
    const KIND: &'static str = "base";

    fn id(&self) -> &str {
        &self.base_id
    }
}

fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Record,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut kept = Vec::with_capacity(raw.len());
    for value in raw {
        match T::deserialize(value) {
            Ok(record) if !record.id().is_empty() => kept.push(record),
            Ok(_) => warn!(kind = T::KIND, "dropping record with empty id"),
            Err(err) => warn!(kind = T::KIND, error = %err, "dropping undecodable record"),
        }
    }
    Ok(kept)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            debug!(error = %err, "ignoring mistyped field");
            Ok(None)
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = value.as_f64().filter(|n| n.is_finite());
    if number.is_none() && !value.is_null() {
        debug!(value = %value, "ignoring non-numeric field");
    }
    Ok(number)
}

/// Counts may arrive as floats (`5234.0`); negative values read as missing.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?
        .filter(|n| *n >= 0.0)
        .map(|n| n.round() as u64))
}

fn lenient_percent<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.map(|n| n.round().clamp(0.0, 100.0) as u8))
}
