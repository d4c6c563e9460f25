use crate::notify::NotifyOutcome;
use crate::prelude::SendError;
use log::{error, info};

/// Emits the per-cycle status line and returns it for the console.
pub struct CycleLog;

impl CycleLog {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, outcome: &Result<NotifyOutcome, SendError>) -> String {
        let status = Self::status(outcome);
        match outcome {
            Err(_) => error!("{}", status),
            Ok(_) => info!("{}", status),
        }
        status
    }

    pub fn status(outcome: &Result<NotifyOutcome, SendError>) -> String {
        match outcome {
            Ok(NotifyOutcome::Sent(count)) => format!("notification sent ({} aircraft)", count),
            Ok(NotifyOutcome::NothingToNotify) => "nothing to notify".to_string(),
            Err(err) => format!("send failed: {}", err),
        }
    }
}

impl Default for CycleLog {
    fn default() -> Self {
        Self::new()
    }
}
