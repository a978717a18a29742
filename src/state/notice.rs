//! Transient user-visible notifications

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Info,
    Success,
    Warning,
    Error,
    Loading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: DateTime<Local>,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>, status_type: StatusType) -> Self {
        Self {
            message: message.into(),
            status_type,
            timestamp: Local::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Error)
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(message, StatusType::Loading)
    }

    pub fn is_error(&self) -> bool {
        self.status_type == StatusType::Error
    }
}
