use anyhow::{Context, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    config::{GameConfig, Rgb},
    direction::Direction,
    geometry::CubeGeometry,
    policy::HeadingPolicy,
    state::{Apple, CollisionType, GameState, Position, Snake, Wall},
};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The player snake ate the apple
    pub player_grew: bool,
    /// The rival snake ate the apple
    pub rival_grew: bool,
    /// The rival died and was replaced by a fresh one
    pub rival_respawned: bool,
    /// Set when the player snake died this tick
    pub player_death: Option<CollisionType>,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration.
    /// Fails if the configuration does not pass [`GameConfig::validate`].
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().context("Invalid game configuration")?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Build a fresh game: both snakes, an apple and the wall
    pub fn reset(&mut self) -> GameState {
        let grid = self.config.grid();
        let geometry = CubeGeometry::new(self.config.grid_size, self.config.depth);
        let apple_position = self.random_cell();

        GameState {
            grid,
            geometry,
            player: self.spawn_player(),
            rival: self.spawn_rival(),
            apple: Apple::new(apple_position, self.config.apple_color, &geometry),
            wall: Wall::new(grid, self.config.wall_color, &geometry),
            score: 0,
            ticks: 0,
        }
    }

    /// Start a new round in place. The wall is kept as is.
    pub fn reset_round(&mut self, state: &mut GameState) {
        state.player = self.spawn_player();
        state.rival = self.spawn_rival();
        let apple_position = self.random_cell();
        state.apple.relocate(apple_position, &state.geometry);
        state.score = 0;
        state.ticks = 0;
    }

    /// Advance the game by one tick
    pub fn tick(&mut self, state: &mut GameState) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        state.ticks += 1;

        if state.player.advance(state.apple.position()) {
            outcome.player_grew = true;
            state.score = (state.player.len() - self.config.initial_length) as u32;
            debug!("player ate apple at {:?}, score {}", state.apple.position(), state.score);
            self.relocate_apple(state);
        }

        if state.rival.advance(state.apple.position()) {
            outcome.rival_grew = true;
            debug!("rival ate apple at {:?}", state.apple.position());
            self.relocate_apple(state);
        } else if self.rng.gen_bool(self.config.seek_probability) {
            state.rival.steer(state.apple.position());
        }

        if state.rival.is_dead(state.grid) || state.rival.collides_with(&state.player) {
            outcome.rival_respawned = true;
            debug!("rival died at {:?} after reaching length {}", state.rival.head(), state.rival.len());
            state.rival = self.spawn_rival();
        }

        outcome.player_death = state.player.death_cause(state.grid).or_else(|| {
            state
                .player
                .collides_with(&state.rival)
                .then_some(CollisionType::HitRival)
        });

        outcome
    }

    fn relocate_apple(&mut self, state: &mut GameState) {
        let position = self.random_cell();
        state.apple.relocate(position, &state.geometry);
    }

    /// Uniformly random cell in the spawn range. Snake bodies are not avoided.
    fn random_cell(&mut self) -> Position {
        let range = self.config.grid().spawn_range();
        let x = self.rng.gen_range(range.clone());
        let y = self.rng.gen_range(range);
        Position::new(x, y)
    }

    fn spawn_player(&self) -> Snake {
        Snake::new(
            self.config.player_start,
            self.config.player_direction,
            self.config.initial_length,
            self.config.player_color,
            HeadingPolicy::Input,
        )
    }

    fn spawn_rival(&mut self) -> Snake {
        let head = self.random_cell();
        let direction = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        let color = Rgb::new(self.rng.gen(), self.rng.gen(), self.rng.gen());
        Snake::new(
            head,
            direction,
            self.config.initial_length,
            color,
            HeadingPolicy::SeekTarget,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(seed: u64) -> GameEngine {
        GameEngine::new(GameConfig::seeded(seed)).unwrap()
    }

    /// Park the rival where it cannot interfere for a while
    fn park_rival(state: &mut GameState) {
        state.rival = Snake::new(
            Position::new(40, 5),
            Direction::Down,
            4,
            Rgb::new(0.0, 1.0, 0.0),
            HeadingPolicy::Input,
        );
    }

    #[test]
    fn test_reset() {
        let mut engine = engine(1);
        let state = engine.reset();

        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.player.len(), 4);
        assert_eq!(state.player.head(), Position::new(10, 25));
        assert_eq!(state.player.direction(), Direction::Right);
        assert_eq!(state.rival.len(), 4);
        assert_eq!(state.rival.policy(), HeadingPolicy::SeekTarget);
        assert!(state.grid.spawn_range().contains(&state.apple.position().x));
        assert!(state.grid.spawn_range().contains(&state.apple.position().y));
        assert_eq!(state.wall.cells().len(), 196);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = engine(42).reset();
        let b = engine(42).reset();
        assert_eq!(a, b);
    }

    #[test]
    fn test_player_eats_apple() {
        let mut engine = engine(3);
        let mut state = engine.reset();
        park_rival(&mut state);

        let target = state.player.head().moved_by(1, 0);
        state.apple.relocate(target, &state.geometry);

        let outcome = engine.tick(&mut state);

        assert!(outcome.player_grew);
        assert_eq!(state.score, 1);
        assert_eq!(state.player.len(), 5);
        assert_eq!(state.apple.buffer(), &state.geometry.cube(state.apple.position())[..]);
        assert_eq!(outcome.player_death, None);
    }

    #[test]
    fn test_player_runs_into_wall() {
        let mut engine = engine(5);
        let mut state = engine.reset();
        park_rival(&mut state);
        state.player = Snake::new(
            Position::new(1, 25),
            Direction::Left,
            1,
            Rgb::new(1.0, 1.0, 1.0),
            HeadingPolicy::Input,
        );
        state.apple.relocate(Position::new(30, 30), &state.geometry);

        let outcome = engine.tick(&mut state);
        assert_eq!(outcome.player_death, Some(CollisionType::OutOfBounds));
    }

    #[test]
    fn test_player_hits_rival() {
        let mut engine = engine(7);
        let mut state = engine.reset();
        state.apple.relocate(Position::new(2, 2), &state.geometry);
        // Rival body lies across the player's path, heading away downwards
        state.rival = Snake::new(
            Position::new(11, 27),
            Direction::Down,
            4,
            Rgb::new(0.0, 1.0, 0.0),
            HeadingPolicy::Input,
        );

        let outcome = engine.tick(&mut state);
        assert_eq!(outcome.player_death, Some(CollisionType::HitRival));
    }

    #[test]
    fn test_rival_respawns_after_wall() {
        let mut engine = engine(9);
        let mut state = engine.reset();
        state.apple.relocate(Position::new(30, 30), &state.geometry);
        state.rival = Snake::new(
            Position::new(48, 10),
            Direction::Right,
            4,
            Rgb::new(0.0, 1.0, 0.0),
            HeadingPolicy::Input,
        );

        let outcome = engine.tick(&mut state);
        assert!(outcome.rival_respawned);
        assert!(state.grid.is_interior(state.rival.head()));
        assert_eq!(state.rival.policy(), HeadingPolicy::SeekTarget);
        assert_eq!(outcome.player_death, None);
    }

    #[test]
    fn test_rival_chases_apple() {
        let config = GameConfig {
            seek_probability: 1.0,
            ..GameConfig::seeded(11)
        };
        let mut engine = GameEngine::new(config).unwrap();
        let mut state = engine.reset();
        state.rival = Snake::new(
            Position::new(20, 10),
            Direction::Down,
            4,
            Rgb::new(0.0, 1.0, 0.0),
            HeadingPolicy::SeekTarget,
        );
        state.apple.relocate(Position::new(30, 40), &state.geometry);

        engine.tick(&mut state);
        assert_eq!(state.rival.next_direction(), Direction::Right);
        engine.tick(&mut state);
        assert_eq!(state.rival.direction(), Direction::Right);
    }

    #[test]
    fn test_rival_respawns_after_hitting_player() {
        let mut engine = engine(15);
        let mut state = engine.reset();
        state.apple.relocate(Position::new(40, 40), &state.geometry);
        // Next tick the rival head lands on (9, 25), inside the player body (8..=11, 25)
        state.rival = Snake::new(
            Position::new(9, 24),
            Direction::Down,
            4,
            Rgb::new(0.0, 1.0, 0.0),
            HeadingPolicy::Input,
        );

        let outcome = engine.tick(&mut state);

        assert!(outcome.rival_respawned);
        assert_eq!(state.rival.policy(), HeadingPolicy::SeekTarget);
        assert_eq!(outcome.player_death, None);
        assert_eq!(state.player.head(), Position::new(11, 25));
    }

    #[test]
    fn test_rival_keeps_heading_on_eat_tick() {
        let config = GameConfig {
            seek_probability: 1.0,
            ..GameConfig::seeded(17)
        };
        let mut engine = GameEngine::new(config).unwrap();
        let mut state = engine.reset();
        state.rival = Snake::new(
            Position::new(20, 10),
            Direction::Down,
            4,
            Rgb::new(0.0, 1.0, 0.0),
            HeadingPolicy::SeekTarget,
        );
        state.apple.relocate(Position::new(20, 11), &state.geometry);

        let outcome = engine.tick(&mut state);

        assert!(outcome.rival_grew);
        assert_eq!(state.rival.len(), 5);
        assert_eq!(state.rival.head(), Position::new(20, 11));
        assert_eq!(state.rival.next_direction(), Direction::Down);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig {
            seek_probability: 1.5,
            ..GameConfig::seeded(19)
        };
        assert!(GameEngine::new(config).is_err());

        let config = GameConfig {
            initial_length: 0,
            ..GameConfig::seeded(19)
        };
        assert!(GameEngine::new(config).is_err());
    }

    #[test]
    fn test_reset_round_keeps_wall() {
        let mut engine = engine(13);
        let mut state = engine.reset();
        let wall = state.wall.clone();
        state.score = 12;
        state.ticks = 99;

        engine.reset_round(&mut state);

        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.player.len(), 4);
        assert_eq!(state.wall, wall);
    }
}
