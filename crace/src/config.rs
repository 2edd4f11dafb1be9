use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    dims::{Pos, Size},
    generator::{self, GenError},
};

pub const DEFAULT_SIZE: Size = Size(8, 15);
pub const DEFAULT_START: Pos = Pos(0, 0);
pub const DEFAULT_END: Pos = Pos(7, 14);
pub const DEFAULT_STEP_DELAY_MS: u64 = 50;

/// Everything needed to set up a race.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub size: Size,
    pub start: Pos,
    pub end: Pos,
    /// Virtual time between two steps of the same runner.
    pub step_delay_ms: u64,
    /// Seed of the first maze, later mazes use the following seeds.
    pub seed: Option<u64>,
    /// Carve a route to the end when the maze left it cut off.
    pub ensure_connected: bool,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            start: DEFAULT_START,
            end: DEFAULT_END,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            seed: None,
            ensure_connected: true,
        }
    }
}

impl RaceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, value: Size) -> Self {
        self.size = value;
        self
    }

    pub fn start(mut self, value: Pos) -> Self {
        self.start = value;
        self
    }

    pub fn end(mut self, value: Pos) -> Self {
        self.end = value;
        self
    }

    pub fn step_delay_ms(mut self, value: u64) -> Self {
        self.step_delay_ms = value;
        self
    }

    pub fn seed(mut self, value: Option<u64>) -> Self {
        self.seed = value;
        self
    }

    pub fn ensure_connected(mut self, value: bool) -> Self {
        self.ensure_connected = value;
        self
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn validate(&self) -> Result<(), GenError> {
        generator::validate(self.size, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RaceConfig::default();
        assert_eq!(config.size, Size(8, 15));
        assert_eq!(config.end, Pos(7, 14));
        assert_eq!(config.step_delay(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_catches_out_of_range_end() {
        let config = RaceConfig::new().size(Size(4, 4));
        assert!(matches!(
            config.validate(),
            Err(GenError::OutOfBounds { what: "End", .. })
        ));
    }
}
