//! Car model and its relation views

use serde::{Deserialize, Serialize};

use super::{Driver, Manufacturer};

/// A vehicle record owned by one manufacturer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Car {
    pub id: i64,
    pub model: String,
    pub manufacturer_id: i64,
}

impl std::fmt::Display for Car {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model)
    }
}

/// A car together with its manufacturer, as shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarWithManufacturer {
    #[serde(flatten)]
    pub car: Car,
    pub manufacturer: Manufacturer,
}

/// A car with its manufacturer and assigned drivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDetail {
    #[serde(flatten)]
    pub car: Car,
    pub manufacturer: Manufacturer,
    pub drivers: Vec<Driver>,
}

impl CarDetail {
    /// Whether the given driver is assigned to this car
    pub fn has_driver(&self, driver_id: i64) -> bool {
        self.drivers.iter().any(|d| d.id == driver_id)
    }

    pub fn driver_ids(&self) -> Vec<i64> {
        self.drivers.iter().map(|d| d.id).collect()
    }
}
