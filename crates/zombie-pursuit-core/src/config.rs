use crate::grid::{Grid, Position};
use crate::simulation::SimulationError;
use serde::{Deserialize, Serialize};

/// Initial layout of a simulation. Serializes to JSON with positions as
/// `[row, col]` pairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub height: usize,
    pub width: usize,
    /// Seed for the tie-breaking random source.
    pub seed: u64,
    pub obstacles: Vec<Position>,
    pub zombies: Vec<Position>,
    pub humans: Vec<Position>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            height: 30,
            width: 40,
            seed: 42,
            obstacles: Vec::new(),
            zombies: Vec::new(),
            humans: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Checks the layout against a scratch grid built from it.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let mut grid = Grid::new(self.height, self.width)?;
        for &pos in &self.obstacles {
            grid.set_obstacle(pos)?;
        }
        for &pos in self.zombies.iter().chain(&self.humans) {
            if grid.is_obstacle(pos)? {
                return Err(SimulationError::Blocked {
                    row: pos.row,
                    col: pos.col,
                });
            }
        }
        Ok(())
    }
}
