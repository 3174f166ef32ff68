pub mod metrics;

pub use metrics::*;

use crate::config::SimConfig;
use crate::distance::DistanceField;
use crate::grid::{Grid, GridError, Position};
use crate::mover::{self, MovePolicy};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("cell ({row}, {col}) is an obstacle and cannot hold an actor")]
    Blocked { row: usize, col: usize },
}

/// One of the two actor sets, used to pick the sources of a distance field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Population {
    Zombies,
    Humans,
}

/// Zombies and humans moving over a shared obstacle grid.
///
/// A tick has two phases in fixed order. Zombies move first, against a field
/// seeded from the humans. Humans then move against a field seeded from the
/// zombie list as it stands after phase one, so humans evade the zombies'
/// new positions rather than a start-of-tick snapshot.
pub struct Simulation {
    pub(crate) grid: Grid,
    pub(crate) zombies: Vec<Position>,
    pub(crate) humans: Vec<Position>,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) seed: u64,
    pub(crate) step_index: usize,
}

impl Simulation {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    pub fn new(config: &SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: &SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut grid = Grid::new(config.height, config.width)?;
        for &pos in &config.obstacles {
            grid.set_obstacle(pos)?;
        }
        tracing::info!(
            height = config.height,
            width = config.width,
            obstacles = config.obstacles.len(),
            zombies = config.zombies.len(),
            humans = config.humans.len(),
            seed = config.seed,
            "created simulation"
        );
        Ok(Self {
            grid,
            zombies: config.zombies.clone(),
            humans: config.humans.clone(),
            rng: ChaCha12Rng::seed_from_u64(config.seed),
            seed: config.seed,
            step_index: 0,
        })
    }

    /// Builds a simulation from explicit placements with the default seed.
    pub fn from_parts(
        height: usize,
        width: usize,
        obstacles: &[Position],
        zombies: &[Position],
        humans: &[Position],
    ) -> Result<Self, SimulationError> {
        Self::try_new(&SimConfig {
            height,
            width,
            obstacles: obstacles.to_vec(),
            zombies: zombies.to_vec(),
            humans: humans.to_vec(),
            ..SimConfig::default()
        })
    }

    /// Replaces the tie-breaking random source.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Empties the grid and both actor sets. Dimensions are kept.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.zombies.clear();
        self.humans.clear();
    }

    pub fn is_obstacle(&self, pos: Position) -> Result<bool, SimulationError> {
        Ok(self.grid.is_obstacle(pos)?)
    }

    pub fn set_obstacle(&mut self, pos: Position) -> Result<(), SimulationError> {
        self.grid.check(pos)?;
        if self.zombies.contains(&pos) || self.humans.contains(&pos) {
            return Err(SimulationError::Blocked {
                row: pos.row,
                col: pos.col,
            });
        }
        Ok(self.grid.set_obstacle(pos)?)
    }

    pub fn set_empty(&mut self, pos: Position) -> Result<(), SimulationError> {
        Ok(self.grid.set_empty(pos)?)
    }

    fn check_placement(&self, pos: Position) -> Result<(), SimulationError> {
        if self.grid.is_obstacle(pos)? {
            return Err(SimulationError::Blocked {
                row: pos.row,
                col: pos.col,
            });
        }
        Ok(())
    }

    pub fn add_zombie(&mut self, pos: Position) -> Result<(), SimulationError> {
        self.check_placement(pos)?;
        self.zombies.push(pos);
        Ok(())
    }

    pub fn add_human(&mut self, pos: Position) -> Result<(), SimulationError> {
        self.check_placement(pos)?;
        self.humans.push(pos);
        Ok(())
    }

    pub fn num_zombies(&self) -> usize {
        self.zombies.len()
    }

    pub fn num_humans(&self) -> usize {
        self.humans.len()
    }

    /// Zombies in insertion order.
    pub fn zombies(&self) -> impl Iterator<Item = Position> + '_ {
        self.zombies.iter().copied()
    }

    /// Humans in insertion order.
    pub fn humans(&self) -> impl Iterator<Item = Position> + '_ {
        self.humans.iter().copied()
    }

    pub fn zombie_positions(&self) -> &[Position] {
        &self.zombies
    }

    pub fn human_positions(&self) -> &[Position] {
        &self.humans
    }

    /// Distance field with every member of `sources` at distance zero.
    pub fn distance_field(&self, sources: Population) -> DistanceField {
        let seeds = match sources {
            Population::Zombies => &self.zombies,
            Population::Humans => &self.humans,
        };
        DistanceField::compute(&self.grid, seeds)
    }

    /// Moves every zombie toward the nearest human.
    pub fn move_zombies(&mut self) {
        let field = self.distance_field(Population::Humans);
        mover::move_population(
            &self.grid,
            &field,
            &mut self.zombies,
            MovePolicy::ZOMBIE,
            &mut self.rng,
        );
    }

    /// Moves every human away from the nearest zombie.
    pub fn move_humans(&mut self) {
        let field = self.distance_field(Population::Zombies);
        mover::move_population(
            &self.grid,
            &field,
            &mut self.humans,
            MovePolicy::HUMAN,
            &mut self.rng,
        );
    }

    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();

        let t0 = Instant::now();
        self.move_zombies();
        let zombie_phase_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        self.move_humans();
        let human_phase_us = t1.elapsed().as_micros() as u64;

        self.step_index += 1;
        tracing::debug!(
            step = self.step_index,
            zombies = self.zombies.len(),
            humans = self.humans.len(),
            "advanced simulation"
        );

        StepTimings {
            zombie_phase_us,
            human_phase_us,
            total_us: total_start.elapsed().as_micros() as u64,
        }
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.grid.height() {
            for col in 0..self.grid.width() {
                let pos = Position::new(row, col);
                let zombie = self.zombies.contains(&pos);
                let human = self.humans.contains(&pos);
                let glyph = match (self.grid.blocked(pos), zombie, human) {
                    (true, _, _) => '#',
                    (false, true, true) => 'X',
                    (false, true, false) => 'Z',
                    (false, false, true) => 'H',
                    (false, false, false) => '.',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
