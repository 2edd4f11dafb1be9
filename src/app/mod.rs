#[allow(clippy::module_inception)]
pub mod app;
pub mod board;
pub mod headless;

use std::{io, time::Duration};

use crace::{Clock, GenError};
use pausable_clock::{PausableClock, PausableInstant};
use thiserror::Error;

pub use app::App;
pub use board::{Board, BoardState};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Crossterm error: {0}")]
    CrosstermError(#[from] io::Error),
    #[error("Invalid race setup: {0}")]
    Setup(#[from] GenError),
}

/// Wall clock for the race that can be paused.
pub struct RaceClock {
    clock: PausableClock,
    origin: PausableInstant,
}

impl RaceClock {
    pub fn new() -> Self {
        let clock = PausableClock::default();
        let origin = clock.now();
        Self { clock, origin }
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn toggle_pause(&self) {
        if self.clock.is_paused() {
            self.clock.resume();
        } else {
            self.clock.pause();
        }
    }
}

impl Default for RaceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RaceClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed(&self.clock)
    }
}

pub fn format_duration(dur: Duration) -> String {
    format!(
        "{}m{:02}.{:03}s",
        dur.as_secs() / 60,
        dur.as_secs() % 60,
        dur.subsec_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_format() {
        assert_eq!(format_duration(Duration::from_millis(61_050)), "1m01.050s");
        assert_eq!(format_duration(Duration::ZERO), "0m00.000s");
    }

    #[test]
    fn paused_clock_stands_still() {
        let clock = RaceClock::new();
        clock.toggle_pause();
        assert!(clock.is_paused());
        let before = clock.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.elapsed(), before);
        clock.toggle_pause();
        assert!(!clock.is_paused());
    }
}
