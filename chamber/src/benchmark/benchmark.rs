use std::time::Instant;

use crate::error::Result;
use crate::simulation::chamber::Chamber;
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Particle, ParticleIds};
use crate::simulation::vector::Vec2;

/// Helper to build `n` particles on a deterministic spread, no rand needed
fn make_particles(n: usize, ids: &ParticleIds) -> Result<Vec<Particle>> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = Vec2::new((i_f * 0.37).sin() * 500.0, (i_f * 0.13).cos() * 500.0);
            Particle::at_rest(ids, x, 1.0e3, 0.0, 0.01)
        })
        .collect()
}

/// Time one physics step for each particle count and pool size
/// Prints CSV so it can be pasted straight into a spreadsheet
pub fn bench_step(ns: &[usize], thread_counts: &[usize], steps: usize) -> Result<()> {
    let steps = steps.max(1);

    println!("n,threads,step_ms");

    for &threads in thread_counts {
        let engine = Engine {
            thread_count: threads,
            allow_collision: false, // keep n constant across steps
            ..Engine::default()
        };

        for &n in ns {
            let mut chamber = Chamber::new(&engine, Parameters::default())?;
            let particles = make_particles(n, chamber.ids())?;
            chamber.add_particles(particles);

            // Warm up
            chamber.step(1.0e-3);

            let t0 = Instant::now();
            for _ in 0..steps {
                chamber.step(1.0e-3);
            }
            let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

            println!("{},{},{:.6}", n, threads, ms);
        }
    }

    Ok(())
}
