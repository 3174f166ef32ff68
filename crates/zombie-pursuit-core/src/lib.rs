//! Zombie/human pursuit on an obstacle grid.
//!
//! Each tick recomputes a breadth-first distance field toward the humans and
//! moves every zombie one orthogonal step down it, then recomputes a field
//! toward the (already moved) zombies and moves every human up it, diagonals
//! allowed. Ties are broken uniformly at random from an injectable source.
//!
//! ```
//! use zombie_pursuit_core::grid::Position;
//! use zombie_pursuit_core::simulation::Simulation;
//!
//! let mut sim = Simulation::from_parts(
//!     3,
//!     3,
//!     &[],
//!     &[Position::new(0, 0)],
//!     &[Position::new(2, 2)],
//! )
//! .unwrap();
//! sim.step();
//! assert_eq!(sim.zombie_positions()[0].manhattan(Position::new(2, 2)), 3);
//! ```

pub mod batch;
pub mod config;
pub mod distance;
pub mod grid;
pub mod mover;
pub mod simulation;
