use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError, RwLock},
    time::{Duration, Instant},
};

use crace::Pos;
use crossterm::style::{Attribute, Color, ContentStyle};
use log::{Level, Log, Metadata, Record};
use unicode_width::UnicodeWidthStr;

use crate::renderer::{Drawable, Frame};

static LOGGER: OnceLock<AppLogger> = OnceLock::new();

pub fn get_logger() -> &'static AppLogger {
    LOGGER.get_or_init(|| AppLogger::new(Level::Warn, Duration::from_secs(5), 5))
}

/// Installs the app logger, a second call is a no-op.
pub fn init() {
    if log::set_logger(get_logger()).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}

/// Messages kept at most, older ones are dropped first.
const CAPACITY: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub pushed: Instant,
    /// Runner label for race messages, last module path segment otherwise.
    pub tag: String,
    pub text: String,
}

impl Message {
    fn from_record(record: &Record) -> Self {
        let target = record.target();
        let tag = target.rsplit("::").next().unwrap_or(target);
        Message {
            level: record.level(),
            pushed: Instant::now(),
            tag: tag.to_string(),
            text: record.args().to_string(),
        }
    }
}

/// Keeps recent messages in memory so they can be drawn over the race.
///
/// Race code logs with the runner label as target, eg.
/// `log::info!(target: kind.label(), ...)`, so every line says which search
/// it is about.
pub struct AppLogger {
    min_level: RwLock<Level>,
    pub decay: Duration,
    pub max_visible: usize,
    // newest first
    messages: Mutex<VecDeque<Message>>,
}

impl AppLogger {
    fn new(min_level: Level, decay: Duration, max_visible: usize) -> Self {
        Self {
            min_level: RwLock::new(min_level),
            decay,
            max_visible,
            messages: Mutex::new(VecDeque::new()),
        }
    }

    pub fn min_level(&self) -> Level {
        *self.min_level.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_min_level(&self, level: Level) {
        *self.min_level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    pub fn switch_debug(&self) {
        let next = match self.min_level() {
            Level::Debug => Level::Warn,
            _ => Level::Debug,
        };
        self.set_min_level(next);
    }

    // a panic while logging only loses the message that was being pushed
    fn messages(&self) -> MutexGuard<VecDeque<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, message: Message) {
        let mut messages = self.messages();
        messages.push_front(message);
        messages.truncate(CAPACITY);
    }

    /// Messages younger than the decay time, most severe first, then newest.
    pub fn recent(&self) -> Vec<Message> {
        let mut messages = self.messages();
        let now = Instant::now();
        messages.retain(|m| now.duration_since(m.pushed) < self.decay);

        let mut recent = Vec::from(messages.clone());
        recent.sort_by_key(|m| m.level);
        recent
    }

    /// Every retained message regardless of age, oldest first.
    pub fn drain(&self) -> Vec<Message> {
        self.messages().drain(..).rev().collect()
    }
}

impl Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.min_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.push(Message::from_record(record));
        }
    }

    fn flush(&self) {}
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Grey,
    }
}

impl Drawable for AppLogger {
    /// One line per message as `[tag] text`, right aligned, from row `pos.0`
    /// down.
    fn draw_with_style(&self, pos: Pos, frame: &mut Frame, style: ContentStyle) {
        let width = frame.size().1 as i32;

        for (row, message) in (pos.0..).zip(self.recent().into_iter().take(self.max_visible)) {
            let tag = format!("[{}] ", message.tag);
            let len = (tag.width() + message.text.width()) as i32;
            let col = (width - len - 1).max(pos.1);

            let tag_style = ContentStyle {
                foreground_color: Some(level_color(message.level)),
                ..style
            };
            let mut text_style = style;
            if message.level >= Level::Debug {
                text_style.attributes.set(Attribute::Dim);
            }

            let text_col = col + frame.put_str(Pos(row, col), &tag, tag_style);
            frame.put_str(Pos(row, text_col), &message.text, text_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crace::Size;

    fn message(level: Level, tag: &str, text: &str) -> Message {
        Message {
            level,
            pushed: Instant::now(),
            tag: tag.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn most_severe_first() {
        let logger = AppLogger::new(Level::Debug, Duration::from_secs(60), 5);
        logger.push(message(Level::Info, "BFS", "info"));
        logger.push(message(Level::Error, "race", "error"));
        logger.push(message(Level::Info, "DFS", "newer info"));

        let texts = logger
            .recent()
            .into_iter()
            .map(|m| m.text)
            .collect::<Vec<_>>();
        assert_eq!(texts, ["error", "newer info", "info"]);

        let drained = logger.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0].text, "info");
        assert!(logger.recent().is_empty());
    }

    #[test]
    fn tags_come_from_the_target() {
        let logger = AppLogger::new(Level::Info, Duration::from_secs(60), 5);
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("A*")
                .args(format_args!("reached the goal"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .target("crace::generator")
                .args(format_args!("odd"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("mazerace")
                .args(format_args!("filtered"))
                .build(),
        );

        let tags = logger
            .drain()
            .into_iter()
            .map(|m| m.tag)
            .collect::<Vec<_>>();
        assert_eq!(tags, ["A*", "generator"]);
    }

    #[test]
    fn keeps_a_bounded_history() {
        let logger = AppLogger::new(Level::Trace, Duration::from_secs(60), 5);
        for i in 0..CAPACITY + 10 {
            logger.push(message(Level::Trace, "BFS", &i.to_string()));
        }
        let drained = logger.drain();
        assert_eq!(drained.len(), CAPACITY);
        assert_eq!(drained[0].text, "10");
    }

    #[test]
    fn decay_drops_old_messages() {
        let logger = AppLogger::new(Level::Debug, Duration::ZERO, 5);
        logger.push(message(Level::Warn, "DFS", "gone"));
        assert!(logger.recent().is_empty());
    }

    #[test]
    fn switch_debug_toggles() {
        let logger = AppLogger::new(Level::Warn, Duration::from_secs(1), 5);
        logger.switch_debug();
        assert_eq!(logger.min_level(), Level::Debug);
        logger.switch_debug();
        assert_eq!(logger.min_level(), Level::Warn);
    }

    #[test]
    fn draws_right_aligned() {
        let logger = AppLogger::new(Level::Warn, Duration::from_secs(60), 5);
        logger.push(message(Level::Warn, "BFS", "hi"));

        let mut frame = Frame::new(Size(1, 16));
        logger.draw(Pos(0, 0), &mut frame);
        let row: String = frame.row(0).unwrap().iter().map(|c| c.character).collect();
        assert_eq!(row, "       [BFS] hi ");
    }
}
