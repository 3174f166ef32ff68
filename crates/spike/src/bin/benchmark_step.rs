use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::Instant;
use zombie_pursuit_core::config::SimConfig;
use zombie_pursuit_core::grid::Position;
use zombie_pursuit_core::simulation::Simulation;

fn create_config(
    height: usize,
    width: usize,
    zombies: usize,
    humans: usize,
    seed: u64,
) -> SimConfig {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let mut obstacles = Vec::new();
    for row in 0..height {
        for col in 0..width {
            // Sparse walls every fourth column, leaving every other row open.
            if col % 4 == 2 && row % 2 == 1 && rng.random::<f32>() < 0.7 {
                obstacles.push(Position::new(row, col));
            }
        }
    }
    let mut place = |count: usize| -> Vec<Position> {
        (0..count)
            .map(|_| {
                let row = rng.random_range(0..height / 2) * 2;
                Position::new(row, rng.random_range(0..width))
            })
            .collect()
    };
    let zombies = place(zombies);
    let humans = place(humans);
    SimConfig {
        height,
        width,
        seed,
        obstacles,
        zombies,
        humans,
    }
}

fn main() {
    let (height, width) = (300, 400);
    let (zombies, humans) = (200, 500);
    println!(
        "Benchmarking {}x{} grid with {} zombies and {} humans",
        height, width, zombies, humans
    );

    let config = create_config(height, width, zombies, humans, 42);
    let mut sim1 = Simulation::new(&config);
    let mut sim2 = Simulation::new(&config);

    let steps = 50;

    // Run WITHOUT metrics
    let start = Instant::now();
    let mut zombie_us = 0u64;
    let mut human_us = 0u64;
    for _ in 0..steps {
        let t = sim1.step();
        zombie_us += t.zombie_phase_us;
        human_us += t.human_phase_us;
    }
    let duration_no_metrics = start.elapsed();
    println!("Time for {} steps WITHOUT metrics: {:?}", steps, duration_no_metrics);
    println!("Avg time per step (no metrics): {:?}", duration_no_metrics / steps as u32);
    println!(
        "Avg phase split: zombies {}us, humans {}us",
        zombie_us / steps as u64,
        human_us / steps as u64
    );

    // Run WITH metrics (every step)
    let start = Instant::now();
    sim2.run_experiment(steps, 1);
    let duration_metrics = start.elapsed();

    println!("Time for {} steps WITH metrics: {:?}", steps, duration_metrics);
    println!("Avg time per step (with metrics): {:?}", duration_metrics / steps as u32);

    let diff = duration_metrics.saturating_sub(duration_no_metrics);
    println!("Total metrics overhead: {:?}", diff);
    println!("Avg metrics overhead per step: {:?}", diff / steps as u32);
}
