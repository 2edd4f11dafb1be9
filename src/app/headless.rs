use std::{
    io::{self, Write},
    time::Duration,
};

use crace::{Outcome, Pos, Race, RaceEvent, SearchKind};

use super::{format_duration, AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finish {
    pub kind: SearchKind,
    pub outcome: Outcome,
    /// Virtual time from the start of the race.
    pub at: Duration,
}

/// Runs a fresh race to the end in virtual time, without any waiting, and
/// returns when each runner finished, fastest first.
pub fn race_to_end(race: &mut Race) -> Vec<Finish> {
    race.start();
    let started = race.now();
    let generation = race.generation();
    let mut finishes = Vec::new();

    while let Some(due) = race.next_due() {
        for event in race.advance_to(due) {
            if event.generation() != generation {
                continue;
            }
            let outcome = match event {
                RaceEvent::GoalReached { hops, expanded, .. } => Outcome::Found { hops, expanded },
                RaceEvent::NotFound { expanded, .. } => Outcome::NotFound { expanded },
                RaceEvent::Visited { .. } => continue,
            };
            finishes.push(Finish {
                kind: event.runner(),
                outcome,
                at: due - started,
            });
        }
    }

    finishes
}

/// Plain text maze, `#` for walls and `*` along `path`.
pub fn render_maze(race: &Race, path: &[Pos]) -> String {
    let maze = race.maze();
    let size = maze.grid.size();
    let mut out = String::with_capacity((size.1 + 1) * size.0);

    for row in 0..size.0 as i32 {
        for col in 0..size.1 as i32 {
            let pos = Pos(row, col);
            let ch = if pos == maze.start {
                'S'
            } else if pos == maze.end {
                'E'
            } else if maze.grid.is_obstacle(pos) == Some(true) {
                '#'
            } else if path.contains(&pos) {
                '*'
            } else {
                '.'
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}

pub fn write_report(race: &Race, finishes: &[Finish], out: &mut impl Write) -> io::Result<()> {
    let config = race.config();
    let carving = race.maze().carving;

    writeln!(
        out,
        "maze {}x{}, seed {}, {} lattice nodes, {} cells repaired, {} loops, step {}ms",
        config.size.0,
        config.size.1,
        carving.seed,
        carving.nodes,
        carving.repaired,
        carving.loops,
        config.step_delay_ms,
    )?;

    for finish in finishes {
        let result = match finish.outcome {
            Outcome::Found { hops, expanded } => {
                format!("found in {:>4} hops, {:>5} expanded", hops, expanded)
            }
            Outcome::NotFound { expanded } => {
                format!("no path,              {:>5} expanded", expanded)
            }
        };
        writeln!(
            out,
            "{:<9}{}  at {}  ({})",
            finish.kind.label(),
            result,
            format_duration(finish.at),
            finish.kind.description(),
        )?;
    }

    let path = race
        .runner(SearchKind::BreadthFirst)
        .and_then(|r| r.path())
        .unwrap_or_default();
    writeln!(out)?;
    write!(out, "{}", render_maze(race, &path))?;
    Ok(())
}

/// Races once and prints the results instead of animating them.
pub fn run(mut race: Race) -> Result<(), AppError> {
    let finishes = race_to_end(&mut race);
    write_report(&race, &finishes, &mut io::stdout().lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crace::{generator::Carving, Grid, Maze, RaceConfig};

    fn race(rows: &[&str], end: Pos) -> Race {
        let maze = Maze {
            grid: Grid::from_rows(rows),
            start: Pos(0, 0),
            end,
            carving: Carving {
                seed: 7,
                carves: 0,
                nodes: 0,
                repaired: 0,
                loops: 0,
            },
        };
        Race::with_maze(RaceConfig::new().step_delay_ms(10), maze).unwrap()
    }

    #[test]
    fn corridor_finishes_together() {
        let mut race = race(&["....."], Pos(0, 4));
        let finishes = race_to_end(&mut race);

        assert_eq!(finishes.len(), 4);
        for finish in &finishes {
            assert_eq!(finish.outcome, Outcome::Found { hops: 4, expanded: 4 });
            assert_eq!(finish.at, Duration::from_millis(40));
        }
    }

    #[test]
    fn report_marks_the_path() {
        let mut race = race(&["...", "##.", "..."], Pos(2, 0));
        let finishes = race_to_end(&mut race);

        let mut out = Vec::new();
        write_report(&race, &finishes, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("maze 3x3, seed 7"));
        assert!(text.contains("BFS      found in    6 hops"));
        assert!(text.ends_with("S**\n##*\nE**\n"));
    }

    #[test]
    fn sealed_goal_is_reported() {
        let mut race = race(&[".#.", "##."], Pos(1, 2));
        let finishes = race_to_end(&mut race);

        assert!(finishes
            .iter()
            .all(|f| f.outcome == Outcome::NotFound { expanded: 1 }));
        assert_eq!(finishes[0].at, Duration::from_millis(10));
    }
}
