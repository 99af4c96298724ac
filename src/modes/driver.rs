//! Fixed-timestep game loop
//!
//! The driver owns the game state and is the only thing that mutates it. Each
//! tick advances the engine, applies the round rules, redraws the scene into a
//! [`RenderSink`] and returns how long to wait before the next tick. The wait
//! itself goes through a [`Clock`], so the loop can run against real time,
//! as fast as possible, or under test without any timer.

use anyhow::Result;
use glam::Mat4;
use log::{debug, info};
use std::time::Duration;

use crate::game::{Direction, GameConfig, GameEngine, GameState};
use crate::metrics::GameMetrics;
use crate::render::{draw_scene, projection, RenderSink};

/// Something that can wait between ticks
pub trait Clock {
    fn sleep(&mut self, delay: Duration);
}

/// Blocks the current thread for the requested delay
pub struct ThreadClock;

impl Clock for ThreadClock {
    fn sleep(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Never waits; runs ticks back to back
pub struct NoWait;

impl Clock for NoWait {
    fn sleep(&mut self, _delay: Duration) {}
}

/// Totals over a [`Driver::run`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub rounds_finished: u32,
    pub apples_eaten: u32,
    pub rival_respawns: u32,
    pub high_score: u32,
}

pub struct Driver {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    projection: Mat4,
    tick_interval: Duration,
    death_pause: Duration,
    apples_eaten: u32,
}

impl Driver {
    pub fn new(config: GameConfig) -> Result<Self> {
        let projection = projection(&config.camera);
        let tick_interval = Duration::from_millis(config.tick_interval_ms);
        let death_pause = Duration::from_millis(config.death_pause_ms);
        let mut engine = GameEngine::new(config)?;
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            projection,
            tick_interval,
            death_pause,
            apples_eaten: 0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }

    /// Delay between two regular ticks
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Queue a heading change for the player snake
    pub fn steer_player(&mut self, direction: Direction) {
        self.state.player.heading(direction);
    }

    /// Abandon the current round and start a fresh one
    pub fn restart<S: RenderSink + ?Sized>(&mut self, sink: &mut S) {
        info!("round restarted at score {}", self.state.score);
        self.engine.reset_round(&mut self.state);
        self.metrics.on_game_start();
        sink.show_score(0);
        self.redraw(sink);
    }

    /// Draw the current state without advancing it
    pub fn redraw<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        draw_scene(&self.state, self.projection, sink);
    }

    /// Run one tick and return the delay before the next one
    pub fn tick<S: RenderSink + ?Sized>(&mut self, sink: &mut S) -> Duration {
        let outcome = self.engine.tick(&mut self.state);
        let mut delay = self.tick_interval;

        if outcome.player_grew {
            self.apples_eaten += 1;
            sink.show_score(self.state.score);
        }
        if outcome.rival_respawned {
            self.metrics.on_rival_respawn();
        }

        if let Some(cause) = outcome.player_death {
            info!(
                "player died ({:?}) after {} ticks with score {}",
                cause, self.state.ticks, self.state.score
            );
            self.metrics.on_game_over(self.state.score);
            self.engine.reset_round(&mut self.state);
            self.metrics.on_game_start();
            sink.show_score(0);
            delay = self.death_pause;
        }

        self.redraw(sink);
        delay
    }

    /// Tick until `max_ticks` ticks have run, or forever when `None`,
    /// sleeping on `clock` after every tick
    pub fn run<S, C>(&mut self, sink: &mut S, clock: &mut C, max_ticks: Option<u64>) -> RunSummary
    where
        S: RenderSink + ?Sized,
        C: Clock + ?Sized,
    {
        let start_rounds = self.metrics.games_played;
        let start_respawns = self.metrics.rival_respawns;
        let start_apples = self.apples_eaten;
        let mut ticks = 0;

        self.redraw(sink);
        while max_ticks.map_or(true, |max| ticks < max) {
            let delay = self.tick(sink);
            ticks += 1;
            debug!("tick {} done, next in {:?}", ticks, delay);
            clock.sleep(delay);
        }

        RunSummary {
            ticks,
            rounds_finished: self.metrics.games_played - start_rounds,
            apples_eaten: self.apples_eaten - start_apples,
            rival_respawns: self.metrics.rival_respawns - start_respawns,
            high_score: self.metrics.high_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{HeadingPolicy, Position, Rgb, Snake};
    use crate::render::SceneBuffer;

    /// Records every requested delay instead of sleeping
    #[derive(Default)]
    struct RecordingClock {
        delays: Vec<Duration>,
    }

    impl Clock for RecordingClock {
        fn sleep(&mut self, delay: Duration) {
            self.delays.push(delay);
        }
    }

    fn driver(seed: u64) -> Driver {
        let config = GameConfig {
            seek_probability: 0.0,
            ..GameConfig::seeded(seed)
        };
        Driver::new(config).unwrap()
    }

    /// Move the rival to the far side of the board, heading down
    fn park_rival(driver: &mut Driver) {
        driver.state.rival = Snake::new(
            Position::new(40, 5),
            Direction::Down,
            4,
            Rgb::new(0.0, 1.0, 0.0),
            HeadingPolicy::Input,
        );
    }

    #[test]
    fn test_regular_tick_delay() {
        let mut driver = driver(1);
        park_rival(&mut driver);
        let mut scene = SceneBuffer::new();
        // Keep the apple out of the player's row
        let geometry = driver.state.geometry;
        driver.state.apple.relocate(Position::new(30, 40), &geometry);

        let delay = driver.tick(&mut scene);

        assert_eq!(delay, Duration::from_millis(50));
        assert_eq!(scene.meshes().len(), 4);
        assert_eq!(driver.state().player.head(), Position::new(11, 25));
    }

    #[test]
    fn test_death_pauses_and_resets() {
        let mut driver = driver(2);
        park_rival(&mut driver);
        let mut scene = SceneBuffer::new();
        let geometry = driver.state.geometry;
        driver.state.apple.relocate(Position::new(30, 40), &geometry);
        driver.state.score = 5;

        // Head straight up into the top wall
        driver.steer_player(Direction::Up);
        let mut delays = Vec::new();
        for _ in 0..30 {
            delays.push(driver.tick(&mut scene));
            if driver.metrics().games_played == 1 {
                break;
            }
        }

        assert_eq!(delays.last(), Some(&Duration::from_millis(1000)));
        assert!(delays[..delays.len() - 1]
            .iter()
            .all(|d| *d == Duration::from_millis(50)));
        assert_eq!(driver.metrics().high_score, 5);
        assert_eq!(driver.state().score, 0);
        assert_eq!(driver.state().player.head(), Position::new(10, 25));
        assert_eq!(scene.score(), 0);
    }

    #[test]
    fn test_score_pushed_on_growth() {
        let mut driver = driver(3);
        park_rival(&mut driver);
        let mut scene = SceneBuffer::new();
        let geometry = driver.state.geometry;
        driver.state.apple.relocate(Position::new(11, 25), &geometry);

        driver.tick(&mut scene);

        assert_eq!(scene.score(), 1);
        assert_eq!(driver.state().player.len(), 5);
    }

    #[test]
    fn test_run_sleeps_after_every_tick() {
        let mut driver = driver(4);
        let mut scene = SceneBuffer::new();
        let mut clock = RecordingClock::default();

        let summary = driver.run(&mut scene, &mut clock, Some(30));

        assert_eq!(summary.ticks, 30);
        assert_eq!(clock.delays.len(), 30);
        // Initial frame plus one per tick
        assert_eq!(scene.frames(), 31);
        let pauses = clock
            .delays
            .iter()
            .filter(|d| **d == Duration::from_millis(1000))
            .count();
        assert_eq!(pauses as u32, summary.rounds_finished);
    }

    #[test]
    fn test_restart_resets_round() {
        let mut driver = driver(5);
        let mut scene = SceneBuffer::new();
        driver.run(&mut scene, &mut NoWait, Some(3));

        driver.restart(&mut scene);

        assert_eq!(driver.state().ticks, 0);
        assert_eq!(driver.state().player.head(), Position::new(10, 25));
        assert_eq!(scene.score(), 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig {
            seek_probability: 1.5,
            ..GameConfig::seeded(1)
        };
        assert!(Driver::new(config).is_err());
    }
}
