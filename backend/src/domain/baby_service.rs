//! Baby profile domain logic.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::domain::commands::baby::{UpdateBabyCommand, UpdateBabyResult};
use crate::domain::models::log::Log;

/// Service for managing the baby profile of an open log
#[derive(Clone)]
pub struct BabyService;

impl BabyService {
    /// Create a new BabyService
    pub fn new() -> Self {
        Self
    }

    /// Update the baby profile. Fields left out of the command keep their
    /// current values.
    pub fn update_baby(&self, log: &mut Log, command: UpdateBabyCommand) -> Result<UpdateBabyResult> {
        self.validate_update_command(&command)?;

        let mut baby = log.baby().clone();

        if let Some(name) = command.name {
            baby.name = name.trim().to_string();
        }
        if let Some(emoji) = command.emoji {
            baby.emoji = emoji;
        }
        if let Some(prefers_emoji) = command.prefers_emoji {
            baby.prefers_emoji = prefers_emoji;
        }
        if let Some(birthday_str) = command.birthday {
            baby.birthday = Some(
                NaiveDate::parse_from_str(&birthday_str, "%Y-%m-%d")
                    .context("Invalid birthday format in update_baby command")?,
            );
        }
        if let Some(theme_color) = command.theme_color {
            baby.theme_color = Some(theme_color);
        }

        log.set_baby(baby.clone());

        info!("Updated baby profile: {} ({})", baby.name, baby.id);

        Ok(UpdateBabyResult { baby })
    }

    /// Validate update baby command
    fn validate_update_command(&self, command: &UpdateBabyCommand) -> Result<()> {
        if let Some(ref name) = command.name {
            if name.trim().is_empty() {
                return Err(anyhow::anyhow!("Baby name cannot be empty"));
            }
            if name.len() > 100 {
                return Err(anyhow::anyhow!("Baby name cannot exceed 100 characters"));
            }
        }

        if let Some(ref emoji) = command.emoji {
            if emoji.is_empty() {
                return Err(anyhow::anyhow!("Emoji cannot be empty"));
            }
        }

        if let Some(ref birthday) = command.birthday {
            self.validate_birthday(birthday)?;
        }

        if let Some(color) = command.theme_color {
            for component in [color.r, color.g, color.b] {
                if !(0.0..=1.0).contains(&component) {
                    return Err(anyhow::anyhow!(
                        "Theme color components must be between 0.0 and 1.0"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Validate birthday format
    fn validate_birthday(&self, birthday: &str) -> Result<()> {
        let date_parts: Vec<&str> = birthday.split('-').collect();
        if date_parts.len() != 3 {
            return Err(anyhow::anyhow!("Invalid birthday format. Use YYYY-MM-DD."));
        }

        let year: u32 = date_parts[0]
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid year in birthday"))?;
        let month: u32 = date_parts[1]
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid month in birthday"))?;
        let day: u32 = date_parts[2]
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid day in birthday"))?;

        if !(1900..=2100).contains(&year) {
            return Err(anyhow::anyhow!("Year must be between 1900 and 2100"));
        }
        if !(1..=12).contains(&month) {
            return Err(anyhow::anyhow!("Month must be between 1 and 12"));
        }
        if !(1..=31).contains(&day) {
            return Err(anyhow::anyhow!("Day must be between 1 and 31"));
        }

        Ok(())
    }
}

impl Default for BabyService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::baby::{Baby, ThemeColor};

    fn setup_test() -> (BabyService, Log) {
        (BabyService::new(), Log::new(Baby::placeholder()))
    }

    #[test]
    fn test_update_baby() {
        let (service, mut log) = setup_test();
        let command = UpdateBabyCommand {
            name: Some("  Emma ".to_string()),
            emoji: Some("🐣".to_string()),
            prefers_emoji: Some(false),
            birthday: Some("2023-11-02".to_string()),
            theme_color: Some(ThemeColor {
                r: 0.9,
                g: 0.4,
                b: 0.4,
            }),
        };

        let result = service.update_baby(&mut log, command).unwrap();
        assert_eq!(result.baby.name, "Emma");
        assert_eq!(result.baby.emoji, "🐣");
        assert!(!result.baby.prefers_emoji);
        assert_eq!(result.baby.birthday.unwrap().to_string(), "2023-11-02");
        assert_eq!(log.baby(), &result.baby);
    }

    #[test]
    fn test_update_baby_validation() {
        let (service, mut log) = setup_test();

        let cmd_empty_name = UpdateBabyCommand {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(service.update_baby(&mut log, cmd_empty_name).is_err());

        let cmd_long_name = UpdateBabyCommand {
            name: Some("a".repeat(101)),
            ..Default::default()
        };
        assert!(service.update_baby(&mut log, cmd_long_name).is_err());

        let cmd_bad_date = UpdateBabyCommand {
            birthday: Some("2023/11/02".to_string()),
            ..Default::default()
        };
        assert!(service.update_baby(&mut log, cmd_bad_date).is_err());

        let cmd_bad_color = UpdateBabyCommand {
            theme_color: Some(ThemeColor {
                r: 1.5,
                g: 0.0,
                b: 0.0,
            }),
            ..Default::default()
        };
        assert!(service.update_baby(&mut log, cmd_bad_color).is_err());
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let (service, mut log) = setup_test();
        service
            .update_baby(
                &mut log,
                UpdateBabyCommand {
                    name: Some("Emma".to_string()),
                    emoji: Some("🐣".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let result = service
            .update_baby(
                &mut log,
                UpdateBabyCommand {
                    prefers_emoji: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(result.baby.name, "Emma");
        assert_eq!(result.baby.emoji, "🐣");
        assert!(!result.baby.prefers_emoji);
    }

    #[test]
    fn test_first_profile_fill_is_not_undoable() {
        let (service, mut log) = setup_test();
        service
            .update_baby(
                &mut log,
                UpdateBabyCommand {
                    name: Some("Emma".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        // replacing the placeholder recorded no undo entry
        assert!(!log.can_undo());

        service
            .update_baby(
                &mut log,
                UpdateBabyCommand {
                    name: Some("Emily".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        // a rename of a named baby is undoable
        assert!(log.undo());
        assert_eq!(log.baby().name, "Emma");
    }

    #[test]
    fn test_validate_birthday() {
        let (service, _log) = setup_test();

        service.validate_birthday("2023-11-02").unwrap();

        service.validate_birthday("not-a-date").unwrap_err();
        service.validate_birthday("2023/11/02").unwrap_err();
        service.validate_birthday("23-11-02").unwrap_err();
        service.validate_birthday("2023-13-01").unwrap_err();
        service.validate_birthday("2023-01-32").unwrap_err();
        service.validate_birthday("1800-01-01").unwrap_err();
        service.validate_birthday("2200-01-01").unwrap_err();
    }
}
