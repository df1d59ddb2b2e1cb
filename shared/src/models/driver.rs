//! Driver (user account) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account extended with a driving license number.
///
/// The password hash is not part of this model; it is only
/// read by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Driver {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub license_number: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Driver {
    /// First and last name separated by a space, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// License number for display, empty when none is on file
    pub fn license_display(&self) -> &str {
        self.license_number.as_deref().unwrap_or("")
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.username, self.first_name, self.last_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(first_name: &str, last_name: &str) -> Driver {
        Driver {
            id: 1,
            username: "test".to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: String::new(),
            license_number: None,
            is_staff: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_display_includes_username_and_names() {
        assert_eq!(driver("Test", "Test").to_string(), "test (Test Test)");
    }

    #[test]
    fn test_full_name_is_trimmed() {
        assert_eq!(driver("Test", "").full_name(), "Test");
        assert_eq!(driver("", "").full_name(), "");
    }

    #[test]
    fn test_license_display_without_license() {
        let mut d = driver("A", "B");
        assert_eq!(d.license_display(), "");
        d.license_number = Some("GHT12345".to_string());
        assert_eq!(d.license_display(), "GHT12345");
    }
}
