pub mod array;
pub mod config;
pub mod dims;
pub mod generator;
pub mod grid;
pub mod race;
pub mod scheduler;
pub mod search;

pub use config::RaceConfig;
pub use dims::{Pos, Size};
pub use generator::{GenError, Generator, Maze};
pub use grid::{Cell, Grid};
pub use race::{Generation, Race, RaceEvent};
pub use scheduler::{Clock, ManualClock, Scheduler};
pub use search::{Outcome, SearchKind, SearchRunner, Step};
