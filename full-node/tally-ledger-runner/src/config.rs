use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunnerConfig {
    /// How many events a subscriber may fall behind before it starts missing them.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

/// Source of ledger time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClockConfig {
    /// Wall-clock UNIX seconds.
    #[default]
    System,
    /// Time only moves when it is told to.
    Manual {
        /// Initial time of the clock.
        #[serde(default)]
        start: u64,
    },
}

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct LedgerConfig {
    /// Runner configuration.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Clock configuration.
    #[serde(default)]
    pub clock: ClockConfig,
}

/// Reads a TOML file and deserializes it into `R`.
pub fn from_toml_path<P: AsRef<Path>, R: DeserializeOwned>(path: P) -> anyhow::Result<R> {
    let mut contents = String::new();
    {
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
    }

    let result: R = toml::from_str(&contents)?;

    Ok(result)
}
