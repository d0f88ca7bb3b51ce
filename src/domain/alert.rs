//! Alert broadcasting: admin-authored notifications fanned out one row per
//! recipient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Info => "info",
            AlertKind::Success => "success",
            AlertKind::Warning => "warning",
            AlertKind::Error => "error",
        }
    }

    pub fn parse(value: &str) -> AlertKind {
        match value {
            "success" => AlertKind::Success,
            "warning" => AlertKind::Warning,
            "error" => AlertKind::Error,
            _ => AlertKind::Info,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::Low => "low",
            AlertPriority::Normal => "normal",
            AlertPriority::High => "high",
        }
    }

    pub fn parse(value: &str) -> AlertPriority {
        match value {
            "low" => AlertPriority::Low,
            "high" => AlertPriority::High,
            _ => AlertPriority::Normal,
        }
    }
}

/// The message an admin broadcasts. Validated as a whole before any recipient
/// row is written.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AlertPayload {
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 500, message = "message must be 1-500 characters"))]
    pub message: String,
    #[serde(default)]
    pub kind: AlertKind,
    #[serde(default)]
    pub priority: AlertPriority,
    pub action_url: Option<String>,
    pub action_text: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AlertError {
    #[error("{0}")]
    InvalidPayload(String),
    #[error("at least one recipient is required")]
    NoRecipients,
}

impl AlertPayload {
    pub fn check(&self, recipients: &[Uuid]) -> Result<(), AlertError> {
        if recipients.is_empty() {
            return Err(AlertError::NoRecipients);
        }
        self.validate()
            .map_err(|e| AlertError::InvalidPayload(e.to_string()))
    }
}

/// One recipient's copy of a broadcast. Read-only once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub action_url: Option<String>,
    pub action_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn for_recipient(user_id: Uuid, payload: &AlertPayload, now: DateTime<Utc>) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            user_id,
            title: payload.title.clone(),
            message: payload.message.clone(),
            kind: payload.kind,
            priority: payload.priority,
            action_url: payload.action_url.clone(),
            action_text: payload.action_text.clone(),
            created_at: now,
        }
    }
}

/// Outcome of a fan-out: each recipient write is independent and best-effort.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BroadcastReport {
    pub delivered: Vec<Uuid>,
    pub failed: Vec<FailedDelivery>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedDelivery {
    pub user_id: Uuid,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> AlertPayload {
        AlertPayload {
            title: "Maintenance window".to_string(),
            message: "Servers restart at 02:00 UTC".to_string(),
            kind: AlertKind::Warning,
            priority: AlertPriority::High,
            action_url: None,
            action_text: None,
        }
    }

    #[test]
    fn title_over_100_chars_rejected() {
        let mut p = payload();
        p.title = "x".repeat(101);
        assert!(matches!(
            p.check(&[Uuid::new_v4()]),
            Err(AlertError::InvalidPayload(_))
        ));
    }

    #[test]
    fn message_over_500_chars_rejected() {
        let mut p = payload();
        p.message = "x".repeat(501);
        assert!(p.check(&[Uuid::new_v4()]).is_err());
    }

    #[test]
    fn empty_recipient_list_rejected() {
        assert!(matches!(payload().check(&[]), Err(AlertError::NoRecipients)));
    }

    #[test]
    fn recipient_copy_carries_payload_fields() {
        let user = Uuid::new_v4();
        let alert = Alert::for_recipient(user, &payload(), Utc::now());
        assert_eq!(alert.user_id, user);
        assert_eq!(alert.title, "Maintenance window");
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(alert.priority, AlertPriority::High);
    }
}
