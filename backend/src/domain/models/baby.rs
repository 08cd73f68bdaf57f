//! Domain model for the baby profile a log tracks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// RGB theme color chosen for the profile, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Domain model representing the baby a log tracks.
///
/// Identity is the `id`: two values with the same id describe the same
/// baby, even when the profile fields differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baby {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub prefers_emoji: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<ThemeColor>,
}

impl Baby {
    /// Generate a unique ID for a baby
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("baby::{}", timestamp_millis)
    }

    /// Profile used when a document is created before the profile form has
    /// been filled in. The empty name keeps the first real profile edit
    /// out of the undo history.
    pub fn placeholder() -> Self {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            id: Self::generate_id(now_millis),
            name: String::new(),
            emoji: "👶".to_string(),
            prefers_emoji: true,
            birthday: None,
            theme_color: None,
        }
    }

    /// Whether this profile has been filled in yet.
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        assert_eq!(Baby::generate_id(1702516122000), "baby::1702516122000");
    }

    #[test]
    fn test_placeholder_is_placeholder() {
        let baby = Baby::placeholder();
        assert!(baby.is_placeholder());
        assert!(baby.id.starts_with("baby::"));
        assert_eq!(baby.emoji, "👶");
    }
}
