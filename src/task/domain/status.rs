//! Task status and the scalar attributes stored alongside it.

use super::ParseValueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been assigned but work has not started.
    New,
    /// The assignee is working on the task.
    InProgress,
    /// The assignee has submitted the task for the creator to check.
    OnVerification,
    /// The creator accepted the work.
    Completed,
    /// The deadline passed before the task was completed.
    Overdue,
}

impl TaskStatus {
    /// Every status, in display bucket order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::InProgress,
        Self::OnVerification,
        Self::Overdue,
        Self::Completed,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::OnVerification => "on_verification",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }

    /// Returns the human-readable label shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "Новое",
            Self::InProgress => "В работе",
            Self::OnVerification => "На проверке",
            Self::Completed => "Выполнено",
            Self::Overdue => "Просрочено",
        }
    }

    /// Returns `true` when no further transition is defined.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "on_verification" => Ok(Self::OnVerification),
            "completed" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            _ => Err(ParseValueError::new("task status", value)),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseValueError::new("priority", value)),
        }
    }
}

/// Whether a task is included in meeting-protocol exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolFlag {
    /// Included in the protocol.
    Active,
    /// Not included.
    #[default]
    Inactive,
    /// Proposed for inclusion.
    Pending,
}

impl ProtocolFlag {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Pending => "pending",
        }
    }
}

impl TryFrom<&str> for ProtocolFlag {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "pending" => Ok(Self::Pending),
            _ => Err(ParseValueError::new("protocol flag", value)),
        }
    }
}
