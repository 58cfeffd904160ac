use std::{env, fs};

use anyhow::{Context, Result};
use log::info;
use ndarray::{Array2, array};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

use optimizers::{dataset::Dataset, specs::TrainerSpec, training::TrainerBuilder};

const DEFAULT_SPEC: &str = r#"{
    "model": {
        "dense": { "input_width": 2, "output_width": 1, "bias": true }
    },
    "optimizer": { "nadam": { "learning_rate": 0.01 } },
    "source": { "stochastic": { "batch_size": 16 } },
    "max_iters": 20000,
    "log_every": 1000,
    "seed": 42
}"#;

const SAMPLES: usize = 256;
const NOISE: f64 = 0.05;

/// Samples `y = 2·x0 - 3·x1 + 0.5` plus gaussian noise over `x ∈ [-1, 1)²`.
fn synthetic_dataset(seed: u64) -> Result<Dataset<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0., NOISE)?;
    let coefs = array![2., -3.];

    let x = Array2::from_shape_fn((SAMPLES, 2), |_| rng.random_range(-1. ..1.));
    let y = (x.dot(&coefs) + 0.5).mapv(|y| y + noise.sample(&mut rng));
    let y = y.into_shape_with_order((SAMPLES, 1))?;

    Ok(Dataset::new(x, y)?)
}

fn main() -> Result<()> {
    env_logger::init();

    let json = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path).with_context(|| format!("reading {path}"))?,
        None => DEFAULT_SPEC.to_string(),
    };

    let spec = TrainerSpec::from_json(&json)?;
    let dataset = synthetic_dataset(spec.seed.unwrap_or_default())?;

    let builder = TrainerBuilder::new();
    let mut model = builder.build_model::<f64>(&spec.model, spec.seed)?;
    let mut trainer = builder.build(&spec, &mut model, &dataset)?;

    let report = trainer.train()?;
    info!(
        iterations = report.iterations,
        converged = report.converged;
        "final loss {:e}, statistic {:e}", report.loss, report.statistic
    );
    info!("trained params: {:?}", trainer.params());

    Ok(())
}
