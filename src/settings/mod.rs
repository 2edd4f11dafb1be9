use crace::{Pos, RaceConfig, Size};
use crossterm::style::{Color, ContentStyle};
use ron::{self, extensions::Extensions};
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::constants::base_path;

const DEFAULT_SETTINGS: &str = include_str!("./default_settings.ron");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub wall: Color,
    pub open: Color,
    pub frontier: Color,
    pub visited: Color,
    pub current: Color,
    pub path: Color,
    pub start: Color,
    pub goal: Color,
    pub text: Color,
}

impl ColorScheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn walls(&self) -> ContentStyle {
        fg(self.wall)
    }

    pub fn opens(&self) -> ContentStyle {
        fg(self.open)
    }

    pub fn frontiers(&self) -> ContentStyle {
        fg(self.frontier)
    }

    pub fn visiteds(&self) -> ContentStyle {
        fg(self.visited)
    }

    pub fn currents(&self) -> ContentStyle {
        fg(self.current)
    }

    pub fn paths(&self) -> ContentStyle {
        fg(self.path)
    }

    pub fn starts(&self) -> ContentStyle {
        fg(self.start)
    }

    pub fn goals(&self) -> ContentStyle {
        fg(self.goal)
    }

    pub fn texts(&self) -> ContentStyle {
        fg(self.text)
    }
}

fn fg(color: Color) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(color),
        background_color: None,
        ..Default::default()
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            wall: Color::DarkGrey,
            open: Color::Black,
            frontier: Color::DarkCyan,
            visited: Color::Cyan,
            current: Color::Yellow,
            path: Color::Magenta,
            start: Color::Green,
            goal: Color::Red,
            text: Color::White,
        }
    }
}

/// Everything in the settings file is optional, missing values fall back to
/// the defaults of [`RaceConfig`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub color_scheme: Option<ColorScheme>,
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub cols: Option<usize>,
    #[serde(default)]
    pub start: Option<(i32, i32)>,
    #[serde(default)]
    pub end: Option<(i32, i32)>,
    #[serde(default)]
    pub step_delay_ms: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub ensure_connected: Option<bool>,
    #[serde(default)]
    pub frame_ms: Option<u64>,
    #[serde(default)]
    pub show_path: Option<bool>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_color_scheme(mut self, value: ColorScheme) -> Self {
        self.color_scheme = Some(value);
        self
    }

    pub fn get_color_scheme(&self) -> ColorScheme {
        self.color_scheme.clone().unwrap_or_default()
    }

    pub fn set_rows(mut self, value: usize) -> Self {
        self.rows = Some(value);
        self
    }

    pub fn set_cols(mut self, value: usize) -> Self {
        self.cols = Some(value);
        self
    }

    pub fn get_size(&self) -> Size {
        let default = RaceConfig::default().size;
        Size(self.rows.unwrap_or(default.0), self.cols.unwrap_or(default.1))
    }

    pub fn set_start(mut self, value: Pos) -> Self {
        self.start = Some(value.into());
        self
    }

    pub fn get_start(&self) -> Pos {
        self.start.map(Pos::from).unwrap_or(RaceConfig::default().start)
    }

    pub fn set_end(mut self, value: Pos) -> Self {
        self.end = Some(value.into());
        self
    }

    /// Bottom right corner of the configured size when not set.
    pub fn get_end(&self) -> Pos {
        self.end.map(Pos::from).unwrap_or_else(|| {
            let Size(rows, cols) = self.get_size();
            Pos(rows as i32 - 1, cols as i32 - 1)
        })
    }

    pub fn set_step_delay_ms(mut self, value: u64) -> Self {
        self.step_delay_ms = Some(value);
        self
    }

    pub fn get_step_delay_ms(&self) -> u64 {
        self.step_delay_ms
            .unwrap_or(RaceConfig::default().step_delay_ms)
    }

    pub fn set_seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn set_ensure_connected(mut self, value: bool) -> Self {
        self.ensure_connected = Some(value);
        self
    }

    pub fn get_ensure_connected(&self) -> bool {
        self.ensure_connected.unwrap_or(true)
    }

    pub fn get_frame_ms(&self) -> u64 {
        self.frame_ms.unwrap_or(16).max(1)
    }

    pub fn get_show_path(&self) -> bool {
        self.show_path.unwrap_or(true)
    }

    pub fn race_config(&self) -> RaceConfig {
        RaceConfig::new()
            .size(self.get_size())
            .start(self.get_start())
            .end(self.get_end())
            .step_delay_ms(self.get_step_delay_ms())
            .seed(self.get_seed())
            .ensure_connected(self.get_ensure_connected())
    }

    pub fn default_path() -> PathBuf {
        base_path().join("settings.ron")
    }

    fn parse(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(source)
    }

    /// Reads the settings file, writing the default one first if there is
    /// none. Unreadable or broken files fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(source) => Self::parse(&source).unwrap_or_else(|err| {
                log::warn!("Error reading settings file ({:?}): {}", path, err);
                Self::default()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Err(err) = Self::reset_config(path) {
                    log::warn!("Could not write default settings ({:?}): {}", path, err);
                }
                Self::parse(DEFAULT_SETTINGS).unwrap_or_default()
            }
            Err(err) => {
                log::warn!("Could not open settings file ({:?}): {}", path, err);
                Self::default()
            }
        }
    }

    pub fn reset_config(path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SETTINGS)
    }
}
