//! Independent replicate runs of one layout under different seeds.

use crate::config::SimConfig;
use crate::simulation::{ExperimentError, RunSummary, Simulation, SimulationError};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Experiment(#[from] ExperimentError),
}

/// Runs `config` once per seed, in parallel. Summaries come back in seed order.
pub fn run_replicates(
    config: &SimConfig,
    seeds: &[u64],
    steps: usize,
    sample_every: usize,
) -> Result<Vec<RunSummary>, BatchError> {
    config.validate()?;
    seeds
        .par_iter()
        .map(|&seed| -> Result<RunSummary, BatchError> {
            let mut sim = Simulation::try_new(&SimConfig {
                seed,
                ..config.clone()
            })?;
            Ok(sim.try_run_experiment(steps, sample_every)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;

    fn open_field() -> SimConfig {
        SimConfig {
            height: 12,
            width: 12,
            seed: 0,
            obstacles: vec![Position::new(5, 5), Position::new(5, 6)],
            zombies: vec![Position::new(0, 0), Position::new(11, 11)],
            humans: vec![Position::new(6, 6), Position::new(3, 9)],
        }
    }

    #[test]
    fn replicates_match_sequential_runs() {
        let config = open_field();
        let seeds = [1, 2, 3, 4];
        let parallel = run_replicates(&config, &seeds, 25, 5).unwrap();
        assert_eq!(parallel.len(), seeds.len());
        for (summary, &seed) in parallel.iter().zip(&seeds) {
            let mut sim = Simulation::new(&SimConfig {
                seed,
                ..config.clone()
            });
            assert_eq!(summary, &sim.run_experiment(25, 5));
        }
    }

    #[test]
    fn invalid_config_is_reported_once() {
        let config = SimConfig {
            width: 0,
            ..open_field()
        };
        assert!(matches!(
            run_replicates(&config, &[1, 2], 10, 1),
            Err(BatchError::Simulation(SimulationError::Grid(_)))
        ));
    }

    #[test]
    fn experiment_errors_propagate() {
        assert_eq!(
            run_replicates(&open_field(), &[1], 10, 0),
            Err(BatchError::Experiment(ExperimentError::InvalidSampleEvery))
        );
    }
}
