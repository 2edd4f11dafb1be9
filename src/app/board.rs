use std::collections::HashSet;

use crace::{Outcome, Pos, RaceEvent, SearchRunner, Size};
use crossterm::style::{Attribute, ContentStyle};

use crate::{
    renderer::{Drawable, Frame},
    settings::ColorScheme,
};

/// What the board of one runner remembers from the race events.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub current: Option<Pos>,
    pub outcome: Option<Outcome>,
    pub path: HashSet<Pos>,
}

impl BoardState {
    pub fn apply(&mut self, event: &RaceEvent, runner: &SearchRunner) {
        match *event {
            RaceEvent::Visited { pos, .. } => self.current = Some(pos),
            RaceEvent::GoalReached { hops, expanded, .. } => {
                self.current = None;
                self.outcome = Some(Outcome::Found { hops, expanded });
                self.path = runner.path().unwrap_or_default().into_iter().collect();
            }
            RaceEvent::NotFound { expanded, .. } => {
                self.current = None;
                self.outcome = Some(Outcome::NotFound { expanded });
            }
        }
    }
}

pub struct Board<'a> {
    pub runner: &'a SearchRunner,
    pub state: &'a BoardState,
    pub scheme: &'a ColorScheme,
    pub show_path: bool,
}

const HEADER_ROWS: usize = 2;
const CELL_WIDTH: usize = 2;

impl Board<'_> {
    /// Space taken on screen by a board over a grid of `grid` size.
    pub fn size_for(grid: Size) -> Size {
        Size(grid.0 + HEADER_ROWS, grid.1 * CELL_WIDTH)
    }

    fn status(&self) -> String {
        match self.state.outcome {
            Some(Outcome::Found { hops, expanded }) => {
                format!("found, {} hops, {} expanded", hops, expanded)
            }
            Some(Outcome::NotFound { expanded }) => {
                format!("no path, {} expanded", expanded)
            }
            None if self.runner.order().is_empty() => "waiting".to_string(),
            None => format!(
                "{} expanded, {} queued",
                self.runner.order().len(),
                self.runner.frontier_len()
            ),
        }
    }

    fn glyph(&self, pos: Pos) -> (char, ContentStyle) {
        let scheme = self.scheme;
        let runner = self.runner;

        if pos == runner.end() {
            let mut style = scheme.goals();
            if matches!(self.state.outcome, Some(Outcome::Found { .. })) {
                style.attributes.set(Attribute::Reverse);
                style.attributes.set(Attribute::Bold);
            }
            return ('E', style);
        }
        if pos == runner.start() {
            return ('S', scheme.starts());
        }
        if runner.is_obstacle(pos) != Some(false) {
            return ('█', scheme.walls());
        }
        if self.show_path && self.state.path.contains(&pos) {
            return ('▓', scheme.paths());
        }
        if self.state.current == Some(pos) {
            return ('█', scheme.currents());
        }
        if runner.is_expanded(pos) == Some(true) {
            return ('░', scheme.visiteds());
        }
        if runner.is_visited(pos) == Some(true) {
            return ('·', scheme.frontiers());
        }
        (' ', scheme.opens())
    }
}

impl Drawable for Board<'_> {
    fn draw_with_style(&self, pos: Pos, frame: &mut Frame, style: ContentStyle) {
        let kind = self.runner.kind();
        let text = ContentStyle {
            foreground_color: self.scheme.texts().foreground_color,
            ..style
        };
        let mut dim = text;
        dim.attributes.set(Attribute::Dim);

        let title = format!("{:<9}", kind.label());
        let col = pos.1 + frame.put_str(pos, &title, text);
        self.status().draw_with_style(Pos(pos.0, col), frame, text);
        kind.description()
            .draw_with_style(Pos(pos.0 + 1, pos.1), frame, dim);

        let grid = self.runner.grid();
        for cell in grid.iter_pos() {
            let (ch, style) = self.glyph(cell);
            let at = Pos(
                pos.0 + HEADER_ROWS as i32 + cell.0,
                pos.1 + cell.1 * CELL_WIDTH as i32,
            );
            frame.put_char(at, ch, style);
            let second = if ch == 'S' || ch == 'E' { ' ' } else { ch };
            frame.put_char(at + Pos(0, 1), second, style);
        }
    }
}

/// Top left corners for `count` boards of `board` size, packed row by row
/// into `area`, with a gap between them.
pub fn layout(area: Size, board: Size, count: usize, gap: usize) -> Vec<Pos> {
    let per_row = ((area.1 + gap) / (board.1 + gap)).clamp(1, count.max(1));
    (0..count)
        .map(|i| {
            let (r, c) = (i / per_row, i % per_row);
            Pos(
                (r * (board.0 + gap)) as i32,
                (c * (board.1 + gap)) as i32,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crace::{Grid, SearchKind};

    fn frame_text(frame: &Frame, row: usize) -> String {
        frame.row(row).unwrap().iter().map(|c| c.character).collect()
    }

    #[test]
    fn layout_wraps() {
        let board = Size(10, 30);
        assert_eq!(
            layout(Size(50, 70), board, 4, 2),
            [Pos(0, 0), Pos(0, 32), Pos(12, 0), Pos(12, 32)]
        );
        assert_eq!(layout(Size(50, 200), board, 4, 2)[3], Pos(0, 96));
        assert_eq!(layout(Size(50, 10), board, 2, 2)[1], Pos(12, 0));
    }

    #[test]
    fn draws_cells_two_wide() {
        let grid = Grid::from_rows(&[".#.", "..."]);
        let mut runner =
            SearchRunner::new(SearchKind::BreadthFirst, grid, Pos(0, 0), Pos(0, 2));
        let mut state = BoardState::default();
        let outcome = runner.run();
        let generation = crace::Generation(1);
        if let Outcome::Found { hops, expanded } = outcome {
            let event = RaceEvent::GoalReached {
                generation,
                runner: SearchKind::BreadthFirst,
                hops,
                expanded,
            };
            state.apply(&event, &runner);
        }
        assert_eq!(state.path.len(), 5);

        let scheme = ColorScheme::default();
        let board = Board {
            runner: &runner,
            state: &state,
            scheme: &scheme,
            show_path: true,
        };
        let size = Board::size_for(runner.grid().size());
        assert_eq!(size, Size(4, 6));

        let mut frame = Frame::new(Size(4, 40));
        board.draw(Pos(0, 0), &mut frame);
        assert!(frame_text(&frame, 0).starts_with("BFS      found, 4 hops"));
        assert_eq!(frame_text(&frame, 2).trim_end(), "S ██E");
        assert!(frame_text(&frame, 3).starts_with("▓▓▓▓▓▓"));
    }
}
