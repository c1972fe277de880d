use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, trace};

use crate::config::{CollisionRule, EngineConfig, GridSize};
use crate::error::EngineError;
use crate::food::place_food;
use crate::input::{direction_change_is_valid, Direction};
use crate::snake::{Cell, Snake};

/// Why the engine entered game over.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    Boundary,
    SelfBody,
}

/// What a single `step` did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    /// The snake moved without eating.
    Moved,
    /// The snake ate food and grew by one segment.
    Ate,
    /// The move ended the game.
    Collided(Collision),
    /// The engine is in game over; nothing changed.
    Halted,
}

/// Read-only view of the engine handed to a renderer once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid: GridSize,
    /// Snake cells, head first.
    pub snake: Vec<Cell>,
    /// `None` only after a food-placement fault.
    pub food: Option<Cell>,
    pub direction: Direction,
    pub score: u32,
    pub speed: f64,
    pub alive: bool,
    pub collision: Option<Collision>,
    pub ticks: u64,
}

impl Snapshot {
    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.snake.first().copied()
    }
}

/// Discrete-time snake simulation.
///
/// Owns the snake, food, score, speed, and the game-over flag. The driving
/// loop calls [`submit_direction`](Self::submit_direction) zero or more times,
/// then [`step`](Self::step) once per tick, then reads a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnakeEngine<R: Rng = StdRng> {
    config: EngineConfig,
    rng: R,
    snake: Snake,
    direction: Direction,
    pending_direction: Direction,
    food: Option<Cell>,
    score: u32,
    speed: f64,
    alive: bool,
    collision: Option<Collision>,
    ticks: u64,
}

impl SnakeEngine<StdRng> {
    /// Creates a deterministic engine for tests and reproducible runs.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SnakeEngine<R> {
    /// Validates `config` and starts a fresh game.
    pub fn new(config: EngineConfig, rng: R) -> Result<Self, EngineError> {
        config.validate()?;

        let mut engine = Self {
            config,
            rng,
            snake: Snake::new(start_cell(config.grid)),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            food: None,
            score: 0,
            speed: config.initial_speed,
            alive: true,
            collision: None,
            ticks: 0,
        };
        engine.reset()?;
        Ok(engine)
    }

    /// Builds a running engine from explicit state.
    ///
    /// Score and speed start from their initial values. The body must be a
    /// connected path inside the grid and `food` must not lie on it.
    pub fn with_state(
        config: EngineConfig,
        rng: R,
        body: Vec<Cell>,
        direction: Direction,
        food: Cell,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let snake = Snake::from_segments(body)
            .ok_or_else(|| EngineError::InvalidState("snake body is empty".to_owned()))?;
        if snake.segments().any(|cell| !cell.is_within_bounds(config.grid)) {
            return Err(EngineError::InvalidState(
                "snake body leaves the grid".to_owned(),
            ));
        }
        if !snake.is_connected_path() {
            return Err(EngineError::InvalidState(
                "snake body is not a simple connected path".to_owned(),
            ));
        }
        if !food.is_within_bounds(config.grid) || snake.occupies(food) {
            return Err(EngineError::InvalidState(format!(
                "food at ({}, {}) is off the grid or on the snake",
                food.col, food.row
            )));
        }

        Ok(Self {
            config,
            rng,
            snake,
            direction,
            pending_direction: direction,
            food: Some(food),
            score: 0,
            speed: config.initial_speed,
            alive: true,
            collision: None,
            ticks: 0,
        })
    }

    /// Starts a new game: one-cell snake at the grid center heading right.
    ///
    /// Cannot fail for a validated config; the `Result` carries the food
    /// placement contract.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        self.snake = Snake::new(start_cell(self.config.grid));
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.alive = true;
        self.collision = None;
        self.ticks = 0;
        self.food = None;

        let food = self.place_food()?;
        self.food = Some(food);

        info!(
            head = ?self.snake.head(),
            ?food,
            grid = ?self.config.grid,
            "game reset"
        );
        Ok(())
    }

    /// Buffers a direction for the next step.
    ///
    /// Reversals of the committed direction are ignored, as is any input
    /// while the game is over. Later valid calls overwrite earlier ones.
    pub fn submit_direction(&mut self, requested: Direction) {
        if !self.alive {
            return;
        }

        if !direction_change_is_valid(self.direction, requested) {
            trace!(current = ?self.direction, ?requested, "reverse direction ignored");
            return;
        }

        self.pending_direction = requested;
    }

    /// Advances the simulation by one tick.
    ///
    /// Collisions end the game and are reported through the outcome. An
    /// `Err` means food could not be placed; the engine halts without a
    /// collision in that case.
    pub fn step(&mut self) -> Result<StepOutcome, EngineError> {
        if !self.alive {
            return Ok(StepOutcome::Halted);
        }

        self.ticks += 1;
        self.direction = self.pending_direction;
        let new_head = self.snake.head().stepped(self.direction);

        if !new_head.is_within_bounds(self.config.grid) {
            return Ok(self.end_game(Collision::Boundary, new_head));
        }

        let eats = self.food == Some(new_head);
        let hits_body = match self.config.collision_rule {
            CollisionRule::Strict => self.snake.occupies(new_head),
            CollisionRule::VacatingTail if eats => self.snake.occupies(new_head),
            CollisionRule::VacatingTail => self.snake.occupies_ignoring_tail(new_head),
        };
        if hits_body {
            return Ok(self.end_game(Collision::SelfBody, new_head));
        }

        self.snake.push_head(new_head);

        if !eats {
            self.snake.drop_tail();
            return Ok(StepOutcome::Moved);
        }

        self.score += 1;
        self.speed = (self.speed + self.config.speed_increment).min(self.config.max_speed);
        debug!(
            score = self.score,
            speed = self.speed,
            len = self.snake.len(),
            "food eaten"
        );

        match self.place_food() {
            Ok(food) => {
                self.food = Some(food);
                Ok(StepOutcome::Ate)
            }
            Err(fault) => {
                error!(%fault, len = self.snake.len(), "food placement failed, halting");
                self.food = None;
                self.alive = false;
                Err(fault)
            }
        }
    }

    /// Returns a read-only copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.config.grid,
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            direction: self.direction,
            score: self.score,
            speed: self.speed,
            alive: self.alive,
            collision: self.collision,
            ticks: self.ticks,
        }
    }

    /// Wall-clock period of one tick at the current speed.
    ///
    /// The rate is the whole number of ticks per second, never below one.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let ticks_per_second = self.speed.trunc().max(1.0) as u32;
        Duration::from_secs(1) / ticks_per_second
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    #[must_use]
    pub fn collision(&self) -> Option<Collision> {
        self.collision
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn place_food(&mut self) -> Result<Cell, EngineError> {
        place_food(
            &mut self.rng,
            self.config.grid,
            &self.snake,
            self.config.food_retry_budget,
        )
    }

    fn end_game(&mut self, collision: Collision, attempted: Cell) -> StepOutcome {
        self.alive = false;
        self.collision = Some(collision);
        info!(
            ?collision,
            ?attempted,
            score = self.score,
            len = self.snake.len(),
            "game over"
        );
        StepOutcome::Collided(collision)
    }
}

/// Grid cell under the screen center.
fn start_cell(grid: GridSize) -> Cell {
    Cell::new(i32::from(grid.width / 2), i32::from(grid.height / 2))
}
