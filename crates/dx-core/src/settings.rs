//! Workspace settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Whether to use dark mode
    pub dark_mode: bool,

    /// Whether the chat sheet starts open
    pub chat_open: bool,

    /// Timings of the simulated backend
    pub simulation: SimulationSettings,

    /// Entities at or above this confidence are taken by "accept all"
    pub auto_accept_threshold: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            chat_open: false,
            simulation: SimulationSettings::default(),
            auto_accept_threshold: 0.85,
        }
    }
}

/// Delays and tick sizes of the simulated backend, in milliseconds and percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub chat_reply_delay_ms: u64,
    pub extraction_delay_ms: u64,
    pub upload_tick_ms: u64,
    pub parse_tick_ms: u64,
    /// Pause between the end of the upload and the start of parsing
    pub phase_pause_ms: u64,
    /// Pause after parsing before opening the document
    pub completion_pause_ms: u64,
    pub upload_step: (f32, f32),
    pub parse_step: (f32, f32),
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            chat_reply_delay_ms: 800,
            extraction_delay_ms: 2000,
            upload_tick_ms: 200,
            parse_tick_ms: 300,
            phase_pause_ms: 500,
            completion_pause_ms: 800,
            upload_step: (10.0, 35.0),
            parse_step: (5.0, 20.0),
        }
    }
}

impl SimulationSettings {
    pub fn chat_reply_delay(&self) -> Duration {
        Duration::from_millis(self.chat_reply_delay_ms)
    }

    pub fn extraction_delay(&self) -> Duration {
        Duration::from_millis(self.extraction_delay_ms)
    }

    pub fn upload_tick(&self) -> Duration {
        Duration::from_millis(self.upload_tick_ms)
    }

    pub fn parse_tick(&self) -> Duration {
        Duration::from_millis(self.parse_tick_ms)
    }

    pub fn phase_pause(&self) -> Duration {
        Duration::from_millis(self.phase_pause_ms)
    }

    pub fn completion_pause(&self) -> Duration {
        Duration::from_millis(self.completion_pause_ms)
    }
}
