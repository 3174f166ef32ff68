use super::{Population, Simulation};
use crate::grid::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct StepTimings {
    pub zombie_phase_us: u64,
    pub human_phase_us: u64,
    pub total_us: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub num_zombies: usize,
    pub num_humans: usize,
    /// Humans sharing a cell with at least one zombie.
    pub caught_humans: usize,
    /// Humans no zombie has a path to.
    pub unreachable_humans: usize,
    /// Mean BFS distance to the nearest zombie over reachable humans.
    pub mean_human_distance: f32,
    pub min_human_distance: Option<usize>,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    #[serde(default)]
    pub seed: u64,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub final_zombies: Vec<Position>,
    #[serde(default)]
    pub final_humans: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExperimentError {
    #[error("sample_every must be positive")]
    InvalidSampleEvery,
    #[error("steps ({actual}) exceed supported maximum ({max})")]
    TooManySteps { max: usize, actual: usize },
    #[error("sample count ({actual}) exceeds supported maximum ({max})")]
    TooManySamples { max: usize, actual: usize },
}

impl Simulation {
    pub fn collect_step_metrics(&self) -> StepMetrics {
        let field = self.distance_field(Population::Zombies);
        let mut caught = 0;
        let mut unreachable = 0;
        let mut distance_sum = 0usize;
        let mut min_distance: Option<usize> = None;

        for &human in &self.humans {
            if !field.is_reachable(human) {
                unreachable += 1;
                continue;
            }
            let d = field.at(human);
            if d == 0 {
                caught += 1;
            }
            distance_sum += d;
            min_distance = Some(min_distance.map_or(d, |m| m.min(d)));
        }

        let reachable = self.humans.len() - unreachable;
        StepMetrics {
            step: self.step_index,
            num_zombies: self.zombies.len(),
            num_humans: self.humans.len(),
            caught_humans: caught,
            unreachable_humans: unreachable,
            mean_human_distance: if reachable > 0 {
                distance_sum as f32 / reachable as f32
            } else {
                0.0
            },
            min_human_distance: min_distance,
        }
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Advances `steps` ticks, sampling metrics every `sample_every` ticks and
    /// always after the last one.
    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.step();
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics());
            }
        }
        tracing::info!(
            steps,
            samples = samples.len(),
            seed = self.seed,
            "finished experiment"
        );
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            seed: self.seed,
            samples,
            final_zombies: self.zombies.clone(),
            final_humans: self.humans.clone(),
        })
    }
}
