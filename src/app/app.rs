use std::time::Duration;

use crace::{Clock, Pos, Race, RaceEvent};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    style::ContentStyle,
};

use crate::{
    logging::get_logger,
    renderer::{Drawable, Renderer},
    settings::{ColorScheme, Settings},
};

use super::{
    board::{layout, Board, BoardState},
    format_duration, AppError, RaceClock,
};

const BOARD_GAP: usize = 2;
const KEYS_HELP: &str =
    "[space] start  [n] new maze  [r] restart  [p] pause  [d] debug log  [q] quit";

/// Interactive terminal front end, draws every runner side by side.
pub struct App {
    race: Race,
    settings: Settings,
    scheme: ColorScheme,
    renderer: Renderer,
    clock: RaceClock,
    boards: Vec<BoardState>,
    started_at: Duration,
    finished_at: Option<Duration>,
}

impl App {
    pub fn new(race: Race, settings: Settings) -> Result<Self, AppError> {
        let renderer = Renderer::new()?;
        let boards = vec![BoardState::default(); race.runners().len()];

        Ok(Self {
            race,
            scheme: settings.get_color_scheme(),
            settings,
            renderer,
            clock: RaceClock::new(),
            boards,
            started_at: Duration::ZERO,
            finished_at: None,
        })
    }

    pub fn run(mut self) -> Result<(), AppError> {
        let frame = Duration::from_millis(self.settings.get_frame_ms());

        loop {
            let mut delay = frame;
            while event::poll(delay)? {
                let event = event::read()?;
                self.renderer.on_event(&event);

                if let Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) = event
                {
                    if !self.on_key(code)? {
                        return Ok(());
                    }
                }

                // drain whatever else arrived this frame
                delay = Duration::from_millis(1);
            }

            let events = self.race.poll(&self.clock);
            self.on_race_events(&events);

            self.draw();
            self.renderer.show()?;
        }
    }

    /// Returns `false` when the app should quit.
    fn on_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Enter => {
                if !self.race.is_started() {
                    let events = self.race.advance_to(self.clock.elapsed());
                    self.on_race_events(&events);
                    self.race.start();
                    self.started_at = self.race.now();
                    self.finished_at = None;
                }
            }
            KeyCode::Char('r') => {
                self.race.restart();
                self.reset_boards();
                log::info!("Race restarted on the same maze");
            }
            KeyCode::Char('n') => {
                self.race.new_maze()?;
                self.reset_boards();
                log::info!("New maze, seed {}", self.race.maze().carving.seed);
            }
            KeyCode::Char('p') => self.clock.toggle_pause(),
            KeyCode::Char('d') => get_logger().switch_debug(),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
            _ => {}
        }
        Ok(true)
    }

    fn reset_boards(&mut self) {
        self.boards
            .iter_mut()
            .for_each(|board| *board = BoardState::default());
        self.finished_at = None;
    }

    fn on_race_events(&mut self, events: &[RaceEvent]) {
        let generation = self.race.generation();

        for event in events.iter().filter(|e| e.generation() == generation) {
            let kind = event.runner();
            let runners = self.race.runners();
            let Some(idx) = runners.iter().position(|r| r.kind() == kind) else {
                continue;
            };
            let runner = &runners[idx];

            self.boards[idx].apply(event, runner);

            match *event {
                RaceEvent::GoalReached { hops, .. } => {
                    log::info!(target: kind.label(), "reached the goal in {} hops", hops)
                }
                RaceEvent::NotFound { .. } => {
                    log::warn!(target: kind.label(), "found no path to the goal")
                }
                RaceEvent::Visited { .. } => {}
            }
        }

        if self.finished_at.is_none() && self.race.is_started() && self.race.is_finished() {
            self.finished_at = Some(self.race.now());
        }
    }

    fn status_line(&self) -> String {
        let config = self.race.config();
        let elapsed = match (self.race.is_started(), self.finished_at) {
            (false, _) => "ready".to_string(),
            (true, Some(end)) => format!("done in {}", format_duration(end - self.started_at)),
            (true, None) => format_duration(self.race.now().saturating_sub(self.started_at)),
        };
        let paused = if self.clock.is_paused() { " (paused)" } else { "" };

        format!(
            "{}x{}  seed {}  step {}ms  {}{}",
            config.size.0,
            config.size.1,
            self.race.maze().carving.seed,
            config.step_delay_ms,
            elapsed,
            paused,
        )
    }

    fn draw(&mut self) {
        let area = self.renderer.frame_size();
        let board_size = Board::size_for(self.race.maze().grid.size());
        let corners = layout(area, board_size, self.boards.len(), BOARD_GAP);

        let text = self.scheme.texts();
        let status = self.status_line();
        let show_path = self.settings.get_show_path();

        let frame = self.renderer.frame();
        for ((runner, state), corner) in self.race.runners().iter().zip(&self.boards).zip(corners)
        {
            let board = Board {
                runner,
                state,
                scheme: &self.scheme,
                show_path,
            };
            board.draw(corner + Pos(1, 1), frame);
        }

        let bottom = area.0 as i32 - 1;
        status.draw_with_style(Pos(bottom - 1, 1), frame, text);
        KEYS_HELP.draw_with_style(Pos(bottom, 1), frame, text);
        get_logger().draw_with_style(Pos(0, 0), frame, ContentStyle::default());
    }
}
