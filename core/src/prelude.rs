use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

/// Rule flags that gate the feed-provided aircraft attributes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RuleFlag {
    Mil,
    Interested,
}

impl FromStr for RuleFlag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Mil" => Ok(RuleFlag::Mil),
            "Interested" => Ok(RuleFlag::Interested),
            other => Err(ConfigError::UnknownFlag(other.to_string())),
        }
    }
}

/// Shared configuration for classification.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub enabled_flags: HashSet<RuleFlag>,
    /// Suppression window; registry entries at least this old are evicted.
    pub timeout_window: Duration,
}

impl FilterConfig {
    pub fn new<I: IntoIterator<Item = RuleFlag>>(flags: I, timeout_window: Duration) -> Self {
        Self {
            enabled_flags: flags.into_iter().collect(),
            timeout_window,
        }
    }

    pub fn is_enabled(&self, flag: RuleFlag) -> bool {
        self.enabled_flags.contains(&flag)
    }
}

/// Failure to obtain a snapshot from the feed.
#[derive(thiserror::Error, Debug, Clone)]
pub enum FeedError {
    #[error("http failure: {0}")]
    Http(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("undecodable response: {0}")]
    Decode(String),
}

/// Failure to dispatch a notification.
#[derive(thiserror::Error, Debug, Clone)]
pub enum SendError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("message rejected: {0}")]
    Rejected(String),
    #[error("send timed out")]
    Timeout,
    #[error("sink misconfigured: {0}")]
    Config(String),
}

/// A single feed record that cannot be used.
#[derive(thiserror::Error, Debug, Clone)]
pub enum RecordError {
    #[error("unparseable record: {0}")]
    Unparseable(String),
    #[error("record has no identifier")]
    MissingIdentifier,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown rule flag {0:?}")]
    UnknownFlag(String),
}
