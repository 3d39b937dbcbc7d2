//! Background activity configuration: blob janitor and Pomodoro timer.

use serde::{Deserialize, Serialize};

/// Deferred blob deletion sweeper settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Whether the janitor runs inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweeps.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Attempts after which a pending deletion is skipped by sweeps.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Pomodoro phase lengths.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PomodoroConfig {
    /// Work phase length in minutes.
    #[serde(default = "default_work")]
    pub work_minutes: u32,
    /// Short break length in minutes.
    #[serde(default = "default_short_break")]
    pub short_break_minutes: u32,
    /// Long break length in minutes.
    #[serde(default = "default_long_break")]
    pub long_break_minutes: u32,
    /// Number of completed work phases between long breaks.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work(),
            short_break_minutes: default_short_break(),
            long_break_minutes: default_long_break(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    10
}

fn default_work() -> u32 {
    25
}

fn default_short_break() -> u32 {
    5
}

fn default_long_break() -> u32 {
    15
}

fn default_long_break_interval() -> u32 {
    4
}
