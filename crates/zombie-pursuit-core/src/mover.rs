use crate::distance::DistanceField;
use crate::grid::{Adjacency, Grid, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which end of the distance field an actor is drawn toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Move to the lowest distance (pursuit).
    Minimize,
    /// Move to the highest distance (evasion).
    Maximize,
}

impl Objective {
    fn better(self, candidate: usize, best: usize) -> bool {
        match self {
            Objective::Minimize => candidate < best,
            Objective::Maximize => candidate > best,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePolicy {
    pub adjacency: Adjacency,
    pub objective: Objective,
}

impl MovePolicy {
    /// Zombies shuffle orthogonally toward the nearest human.
    pub const ZOMBIE: MovePolicy = MovePolicy {
        adjacency: Adjacency::FourWay,
        objective: Objective::Minimize,
    };

    /// Humans step in any of eight directions away from the nearest zombie.
    pub const HUMAN: MovePolicy = MovePolicy {
        adjacency: Adjacency::EightWay,
        objective: Objective::Maximize,
    };
}

/// The actor's own cell followed by every non-obstacle neighbor.
pub fn candidates(grid: &Grid, pos: Position, adjacency: Adjacency) -> Vec<Position> {
    let mut out = Vec::with_capacity(adjacency.offsets().len() + 1);
    out.push(pos);
    out.extend(grid.neighbors(pos, adjacency).filter(|n| !grid.blocked(*n)));
    out
}

/// Candidates sharing the extremal field value, in candidate order.
pub fn best_candidates(
    grid: &Grid,
    field: &DistanceField,
    pos: Position,
    policy: MovePolicy,
) -> Vec<Position> {
    let options = candidates(grid, pos, policy.adjacency);
    let mut extremal = field.at(pos);
    for &cell in &options[1..] {
        let d = field.at(cell);
        if policy.objective.better(d, extremal) {
            extremal = d;
        }
    }
    options
        .into_iter()
        .filter(|cell| field.at(*cell) == extremal)
        .collect()
}

/// Picks one of the tied best candidates uniformly at random.
pub fn choose_move<R: Rng + ?Sized>(
    grid: &Grid,
    field: &DistanceField,
    pos: Position,
    policy: MovePolicy,
    rng: &mut R,
) -> Position {
    let best = best_candidates(grid, field, pos, policy);
    // `best` always holds at least the current cell when nothing beats it.
    best[rng.random_range(0..best.len())]
}

/// Moves every actor against the same field snapshot.
///
/// Each destination is computed from the pre-move positions, then written back
/// at the actor's original index. Two actors may pick the same cell.
pub fn move_population<R: Rng + ?Sized>(
    grid: &Grid,
    field: &DistanceField,
    actors: &mut [Position],
    policy: MovePolicy,
    rng: &mut R,
) {
    debug_assert!(actors.iter().all(|a| grid.contains(*a)));
    let next: Vec<Position> = actors
        .iter()
        .map(|&pos| choose_move(grid, field, pos, policy, rng))
        .collect();
    actors.copy_from_slice(&next);
}
