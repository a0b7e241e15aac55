use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AlertType;

/// A user-facing notification. Only `is_read` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub alert_type: AlertType,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    /// Stock item or prescription the alert refers to.
    pub related_id: Option<String>,
}

impl Alert {
    pub fn new(
        id: impl Into<String>,
        alert_type: AlertType,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
        related_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            alert_type,
            message: message.into(),
            created_at,
            is_read: false,
            related_id,
        }
    }

    /// True when this alert covers the given `(related_id, type)` pair.
    pub fn covers(&self, related_id: &str, alert_type: AlertType) -> bool {
        self.alert_type == alert_type && self.related_id.as_deref() == Some(related_id)
    }
}
