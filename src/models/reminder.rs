use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::{Channel, ReminderFrequency};

/// Maximum number of dose times per day.
pub const MAX_REMINDER_TIMES: usize = 5;

/// Reminders are single-user; every new reminder is owned by this id.
pub const DEFAULT_USER_ID: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub start_date: String,
    pub end_date: String,
    /// `HH:MM` dose times.
    pub times: Vec<String>,
    pub frequency: ReminderFrequency,
}

/// Hours (0..=23) during which reminders should stay silent.
/// Stored for the front end; nothing in this crate evaluates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: u8,
    pub end: u8,
}

/// Reminder as submitted by the client, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderDraft {
    pub prescription_id: u32,
    pub medication: String,
    pub dosage: String,
    pub schedule: Schedule,
    pub channels: Vec<Channel>,
    pub quiet_hours: QuietHours,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationReminder {
    pub id: String,
    pub user_id: u32,
    #[serde(flatten)]
    pub draft: ReminderDraft,
}

#[derive(Debug, Error, PartialEq)]
pub enum ReminderError {
    #[error("Medication name is required")]
    MissingMedication,
    #[error("At least one reminder time is required")]
    NoTimes,
    #[error("At most {MAX_REMINDER_TIMES} reminder times are allowed")]
    TooManyTimes,
    #[error("Invalid reminder time: {0}")]
    InvalidTime(String),
    #[error("At least one notification channel is required")]
    NoChannels,
    #[error("Quiet hours must be between 0 and 23")]
    InvalidQuietHours,
}

impl ReminderDraft {
    pub fn validate(&self) -> Result<(), ReminderError> {
        if self.medication.trim().is_empty() {
            return Err(ReminderError::MissingMedication);
        }
        if self.schedule.times.is_empty() {
            return Err(ReminderError::NoTimes);
        }
        if self.schedule.times.len() > MAX_REMINDER_TIMES {
            return Err(ReminderError::TooManyTimes);
        }
        if let Some(bad) = self
            .schedule
            .times
            .iter()
            .find(|t| chrono::NaiveTime::parse_from_str(t, "%H:%M").is_err())
        {
            return Err(ReminderError::InvalidTime(bad.clone()));
        }
        if self.channels.is_empty() {
            return Err(ReminderError::NoChannels);
        }
        if self.quiet_hours.start > 23 || self.quiet_hours.end > 23 {
            return Err(ReminderError::InvalidQuietHours);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_draft() -> ReminderDraft {
    ReminderDraft {
        prescription_id: 1,
        medication: "Metformin".into(),
        dosage: "500mg".into(),
        schedule: Schedule {
            start_date: "2026-01-01".into(),
            end_date: "2026-02-01".into(),
            times: vec!["08:00".into(), "20:00".into()],
            frequency: ReminderFrequency::Daily,
        },
        channels: vec![Channel::Email],
        quiet_hours: QuietHours { start: 22, end: 7 },
        notes: None,
    }
}
