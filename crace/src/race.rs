use std::time::Duration;

use log::{debug, trace};

use crate::{
    config::RaceConfig,
    dims::Pos,
    generator::{GenError, Generator, Maze},
    scheduler::{Clock, Scheduler},
    search::{Outcome, SearchKind, SearchRunner, Step},
};

/// Identifies one run of the race. Anything tagged with an older generation
/// is stale and gets ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Generation {
        Generation(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceEvent {
    Visited {
        generation: Generation,
        runner: SearchKind,
        pos: Pos,
        hops: u32,
    },
    GoalReached {
        generation: Generation,
        runner: SearchKind,
        hops: u32,
        expanded: usize,
    },
    NotFound {
        generation: Generation,
        runner: SearchKind,
        expanded: usize,
    },
}

impl RaceEvent {
    pub fn generation(&self) -> Generation {
        match *self {
            RaceEvent::Visited { generation, .. }
            | RaceEvent::GoalReached { generation, .. }
            | RaceEvent::NotFound { generation, .. } => generation,
        }
    }

    pub fn runner(&self) -> SearchKind {
        match *self {
            RaceEvent::Visited { runner, .. }
            | RaceEvent::GoalReached { runner, .. }
            | RaceEvent::NotFound { runner, .. } => runner,
        }
    }
}

/// Base maze, one runner per search kind, and the scheduler pacing them.
#[derive(Debug)]
pub struct Race {
    config: RaceConfig,
    generator: Generator,
    maze: Maze,
    mazes_made: u64,
    runners: Vec<SearchRunner>,
    scheduler: Scheduler<(Generation, usize)>,
    generation: Generation,
    started: bool,
}

impl Race {
    pub fn new(config: RaceConfig) -> Result<Race, GenError> {
        config.validate()?;
        let generator = Generator::default().ensure_connected(config.ensure_connected);
        let maze = generator.generate(config.size, config.start, config.end, config.seed)?;
        Ok(Self::assemble(config, generator, maze))
    }

    /// Race over a maze built elsewhere, `config.size`, `start` and `end` are
    /// taken from the maze.
    pub fn with_maze(mut config: RaceConfig, maze: Maze) -> Result<Race, GenError> {
        config.size = maze.grid.size();
        config.start = maze.start;
        config.end = maze.end;
        config.validate()?;
        let generator = Generator::default().ensure_connected(config.ensure_connected);
        Ok(Self::assemble(config, generator, maze))
    }

    fn assemble(config: RaceConfig, generator: Generator, maze: Maze) -> Race {
        let mut race = Race {
            config,
            generator,
            maze,
            mazes_made: 1,
            runners: Vec::new(),
            scheduler: Scheduler::new(),
            generation: Generation::default(),
            started: false,
        };
        race.reset_runners();
        race
    }

    pub fn config(&self) -> &RaceConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn runners(&self) -> &[SearchRunner] {
        &self.runners
    }

    pub fn runner(&self, kind: SearchKind) -> Option<&SearchRunner> {
        self.runners.iter().find(|r| r.kind() == kind)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Time the next queued step comes due, stale ones included.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.runners.iter().all(SearchRunner::is_finished)
    }

    pub fn outcomes(&self) -> Vec<(SearchKind, Option<Outcome>)> {
        self.runners
            .iter()
            .map(|r| (r.kind(), r.outcome()))
            .collect()
    }

    /// Lets every runner take its first step at the current time. Starting an
    /// already started race does nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        for idx in 0..self.runners.len() {
            self.scheduler
                .schedule_in(Duration::ZERO, (self.generation, idx));
        }
        debug!("race {:?} started at {:?}", self.generation, self.now());
    }

    /// Fresh runners on the same maze, waiting for [`Race::start`].
    pub fn restart(&mut self) {
        self.reset_runners();
    }

    /// Generates a new base maze and fresh runners for it.
    ///
    /// Steps still queued for the previous maze stay in the scheduler and
    /// are dropped when they come due.
    pub fn new_maze(&mut self) -> Result<(), GenError> {
        let seed = self.config.seed.map(|seed| seed.wrapping_add(self.mazes_made));
        let maze = self.generator.generate(
            self.config.size,
            self.config.start,
            self.config.end,
            seed,
        )?;
        self.maze = maze;
        self.mazes_made += 1;
        self.reset_runners();
        Ok(())
    }

    fn reset_runners(&mut self) {
        self.generation = self.generation.next();
        self.started = false;
        self.runners = SearchKind::ALL
            .into_iter()
            .map(|kind| {
                SearchRunner::new(
                    kind,
                    self.maze.grid.clone_fresh(),
                    self.maze.start,
                    self.maze.end,
                )
            })
            .collect();
    }

    /// Runs every step due up to `now`, in due order.
    pub fn advance_to(&mut self, now: Duration) -> Vec<RaceEvent> {
        let mut events = Vec::new();
        let delay = self.config.step_delay();

        while let Some((due, (generation, idx))) = self.scheduler.pop_due(now) {
            if generation != self.generation {
                trace!("dropping stale step of {:?}", generation);
                continue;
            }
            let Some(runner) = self.runners.get_mut(idx) else {
                continue;
            };

            let kind = runner.kind();
            match runner.step() {
                Step::Visited(entry) => {
                    events.push(RaceEvent::Visited {
                        generation,
                        runner: kind,
                        pos: entry.pos,
                        hops: entry.hops,
                    });
                    self.scheduler.schedule_at(due + delay, (generation, idx));
                }
                Step::Finished(Outcome::Found { hops, expanded }) => {
                    events.push(RaceEvent::GoalReached {
                        generation,
                        runner: kind,
                        hops,
                        expanded,
                    })
                }
                Step::Finished(Outcome::NotFound { expanded }) => {
                    events.push(RaceEvent::NotFound {
                        generation,
                        runner: kind,
                        expanded,
                    })
                }
            }
        }

        self.scheduler.settle(now);
        events
    }

    pub fn poll(&mut self, clock: &impl Clock) -> Vec<RaceEvent> {
        self.advance_to(clock.elapsed())
    }

    /// Runs the started race to completion in virtual time.
    pub fn run_to_end(&mut self) -> Vec<RaceEvent> {
        let mut events = Vec::new();
        while let Some(due) = self.scheduler.next_due() {
            events.extend(self.advance_to(due));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dims::Size,
        generator::Carving,
        grid::Grid,
        scheduler::ManualClock,
    };

    fn open_race(rows: &[&str], start: Pos, end: Pos, delay_ms: u64) -> Race {
        let grid = Grid::from_rows(rows);
        let maze = Maze {
            grid,
            start,
            end,
            carving: Carving {
                seed: 0,
                carves: 0,
                nodes: 0,
                repaired: 0,
                loops: 0,
            },
        };
        Race::with_maze(RaceConfig::new().step_delay_ms(delay_ms), maze).unwrap()
    }

    #[test]
    fn nothing_happens_before_start() {
        let mut race = Race::new(RaceConfig::new().seed(Some(1))).unwrap();
        assert!(race.advance_to(Duration::from_secs(10)).is_empty());
        assert!(!race.is_started());
    }

    #[test]
    fn runners_step_in_lockstep() {
        let mut race = open_race(&["....", "...."], Pos(0, 0), Pos(1, 3), 50);
        race.start();

        let first = race.advance_to(Duration::ZERO);
        assert_eq!(first.len(), 4);
        assert!(first
            .iter()
            .all(|e| matches!(e, RaceEvent::Visited { pos: Pos(0, 0), .. })));
        assert_eq!(
            first.iter().map(RaceEvent::runner).collect::<Vec<_>>(),
            SearchKind::ALL
        );

        assert!(race.advance_to(Duration::from_millis(49)).is_empty());
        assert_eq!(race.advance_to(Duration::from_millis(50)).len(), 4);
    }

    #[test]
    fn goal_is_reported_once() {
        let mut race = open_race(&["...", "...", "..."], Pos(0, 0), Pos(2, 2), 10);
        race.start();
        let events = race.run_to_end();

        for kind in SearchKind::ALL {
            let goals = events
                .iter()
                .filter(|e| e.runner() == kind && matches!(e, RaceEvent::GoalReached { .. }))
                .count();
            assert_eq!(goals, 1, "{:?}", kind);
        }
        assert!(race.is_finished());
        assert!(race.run_to_end().is_empty());

        let bfs = events
            .iter()
            .find(|e| {
                matches!(
                    e,
                    RaceEvent::GoalReached {
                        runner: SearchKind::BreadthFirst,
                        ..
                    }
                )
            })
            .copied();
        assert!(matches!(bfs, Some(RaceEvent::GoalReached { hops: 4, .. })));
    }

    #[test]
    fn sealed_end_reports_not_found() {
        let mut race = open_race(&["...#.", "..#.#", "...#."], Pos(0, 0), Pos(1, 3), 10);
        race.start();
        let events = race.run_to_end();

        let not_found = events
            .iter()
            .filter(|e| matches!(e, RaceEvent::NotFound { .. }))
            .count();
        assert_eq!(not_found, 4);
        assert!(race
            .outcomes()
            .iter()
            .all(|(_, o)| matches!(o, Some(Outcome::NotFound { expanded: 8 }))));
    }

    #[test]
    fn stale_steps_are_dropped() {
        let mut race = Race::new(RaceConfig::new().seed(Some(9))).unwrap();
        race.start();
        race.advance_to(Duration::ZERO);
        let old = race.generation();

        race.new_maze().unwrap();
        assert_ne!(race.generation(), old);
        assert!(race.advance_to(Duration::from_secs(5)).is_empty());
        assert!(race.runners().iter().all(|r| r.order().is_empty()));

        race.start();
        let events = race.advance_to(Duration::from_secs(5));
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.generation() == race.generation()));
    }

    #[test]
    fn restart_keeps_the_maze() {
        let mut race = Race::new(RaceConfig::new().seed(Some(5))).unwrap();
        let grid = race.maze().grid.clone();
        race.start();
        race.run_to_end();

        race.restart();
        assert_eq!(race.maze().grid, grid);
        assert!(!race.is_started());
        assert!(!race.is_finished());
        assert!(race.runners().iter().all(|r| r.grid().visited_count() == 1));
    }

    #[test]
    fn poll_follows_the_clock() {
        let mut race = open_race(&["....."], Pos(0, 0), Pos(0, 4), 50);
        let clock = ManualClock::new();
        race.start();

        assert_eq!(race.poll(&clock).len(), 4);
        clock.advance(Duration::from_millis(25));
        assert!(race.poll(&clock).is_empty());
        clock.advance(Duration::from_millis(25));
        assert_eq!(race.poll(&clock).len(), 4);
        assert_eq!(race.now(), Duration::from_millis(50));
    }

    #[test]
    fn zero_delay_finishes_in_one_poll() {
        let config = RaceConfig::new().seed(Some(11)).step_delay_ms(0);
        let mut race = Race::new(config).unwrap();
        let clock = ManualClock::new();
        race.start();

        let events = race.poll(&clock);
        assert!(race.is_finished());
        assert_eq!(race.now(), Duration::ZERO);
        let finished = events
            .iter()
            .filter(|e| !matches!(e, RaceEvent::Visited { .. }))
            .count();
        assert_eq!(finished, 4);
        assert!(race.poll(&clock).is_empty());
    }

    #[test]
    fn default_race_reaches_the_goal() {
        for seed in 0..20 {
            let mut race = Race::new(RaceConfig::new().seed(Some(seed))).unwrap();
            assert_eq!(race.maze().grid.size(), Size(8, 15));
            race.start();
            race.run_to_end();
            assert!(race
                .outcomes()
                .iter()
                .all(|(_, o)| o.is_some_and(|o| o.is_found())));
        }
    }
}
