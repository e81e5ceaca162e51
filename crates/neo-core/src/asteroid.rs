//! Asteroid and close-approach records.
//!
//! Both tables are owned by the upstream data source. The dashboard only reads
//! them; these types exist for the development import path and for tests.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Average Earth-Moon distance in kilometres (one lunar distance).
pub const KM_PER_LUNAR_DISTANCE: f64 = 384_400.0;

/// Average Earth-Sun distance in kilometres (one astronomical unit).
pub const KM_PER_ASTRONOMICAL_UNIT: f64 = 149_597_870.7;

/// Asteroid metadata, one row per object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub asteroid_id: i64,
    pub name: String,
    /// Brightness; a lower value is brighter.
    pub absolute_magnitude_h: f64,
    pub estimated_diameter_min_km: f64,
    pub estimated_diameter_max_km: f64,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_potentially_hazardous_asteroid: bool,
}

impl Asteroid {
    /// Returns true if the whole estimated size range lies within `[min_km, max_km]`.
    ///
    /// This is the containment rule used by the diameter filter: overlapping
    /// the range is not enough.
    pub fn size_range_within(&self, min_km: f64, max_km: f64) -> bool {
        self.estimated_diameter_min_km >= min_km && self.estimated_diameter_max_km <= max_km
    }
}

/// A single close approach of an asteroid to Earth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseApproach {
    pub asteroid_id: i64,
    pub close_approach_date: NaiveDate,
    pub relative_velocity_kmph: f64,
    /// Miss distance in astronomical units.
    pub astronomical: f64,
    pub miss_distance_km: f64,
    /// Miss distance in lunar distances.
    pub miss_distance_lunar: f64,
}

impl CloseApproach {
    /// Builds an approach from a miss distance in kilometres, deriving the
    /// lunar and astronomical representations.
    pub fn from_km(
        asteroid_id: i64,
        close_approach_date: NaiveDate,
        relative_velocity_kmph: f64,
        miss_distance_km: f64,
    ) -> Self {
        Self {
            asteroid_id,
            close_approach_date,
            relative_velocity_kmph,
            astronomical: miss_distance_km / KM_PER_ASTRONOMICAL_UNIT,
            miss_distance_km,
            miss_distance_lunar: miss_distance_km / KM_PER_LUNAR_DISTANCE,
        }
    }
}

/// Accepts the hazard flag spellings found in exported datasets
/// (`true`/`false`, `True`/`False`, `1`/`0`, `yes`/`no`).
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid hazard flag: {:?}", raw))
    })
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "t" => Some(true),
        "false" | "0" | "no" | "n" | "f" => Some(false),
        _ => None,
    }
}
