use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::KilnError;

/// Node returned when `->` has a right operand that is neither a name nor a call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberAccessFallback {
    /// Return the `->` node unchanged
    #[default]
    KeepOriginal,
    /// Return the base expression, dropping the malformed operand
    KeepBase,
}

impl FromStr for MemberAccessFallback {
    type Err = KilnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(MemberAccessFallback::KeepOriginal),
            "base" => Ok(MemberAccessFallback::KeepBase),
            other => Err(KilnError::Config(format!(
                "unknown member access fallback '{other}', expected 'original' or 'base'"
            ))),
        }
    }
}

/// Configuration of the normalization pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostprocessConfig {
    pub malformed_member_access: MemberAccessFallback,
    /// Track per-rule application counters
    pub collect_stats: bool,
    /// Worker threads used by the batch driver
    pub jobs: usize,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            malformed_member_access: MemberAccessFallback::KeepOriginal,
            collect_stats: true,
            jobs: 1,
        }
    }
}

impl PostprocessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member_access_fallback(mut self, fallback: MemberAccessFallback) -> Self {
        self.malformed_member_access = fallback;
        self
    }

    pub fn collect_stats(mut self, enabled: bool) -> Self {
        self.collect_stats = enabled;
        self
    }

    /// Set the batch worker count; zero is treated as one
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }
}
