//! Random samples for trying the calculator without real data.
//!
//! Normal values come from the Box–Muller transform, exponential ones from
//! inverse-transform sampling; both only need uniform draws from `rand`.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{stats::MIN_SAMPLES, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Kind")]
pub enum Distribution {
    Normal {
        #[serde(rename = "Mean")]
        mean: f64,
        #[serde(rename = "StdDev")]
        std_dev: f64,
    },
    Uniform {
        #[serde(rename = "Low")]
        low: f64,
        #[serde(rename = "High")]
        high: f64,
    },
    Exponential {
        #[serde(rename = "Scale")]
        scale: f64,
    },
}

impl Default for Distribution {
    fn default() -> Self {
        Distribution::Normal {
            mean: 50.0,
            std_dev: 15.0,
        }
    }
}

impl Distribution {
    pub fn validate(&self) -> Result<(), Error> {
        let ok = match *self {
            Distribution::Normal { mean, std_dev } => mean.is_finite() && std_dev > 0.0,
            Distribution::Uniform { low, high } => low.is_finite() && high.is_finite() && low < high,
            Distribution::Exponential { scale } => scale.is_finite() && scale > 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!("bad distribution parameters: {self:?}")))
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            Distribution::Normal { mean, std_dev } => {
                // 1 - gen() keeps the logarithm away from zero
                let u1: f64 = 1.0 - rng.gen::<f64>();
                let u2: f64 = rng.gen();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
                mean + std_dev * z
            }
            Distribution::Uniform { low, high } => rng.gen_range(low..high),
            Distribution::Exponential { scale } => {
                let u: f64 = 1.0 - rng.gen::<f64>();
                -scale * u.ln()
            }
        }
    }
}

pub fn generate<R: Rng>(
    distribution: Distribution,
    count: usize,
    rng: &mut R,
) -> Result<Vec<f64>, Error> {
    if count < MIN_SAMPLES {
        return Err(Error::InsufficientData {
            required: MIN_SAMPLES,
            found: count,
        });
    }
    distribution.validate()?;
    Ok((0..count).map(|_| distribution.sample(rng)).collect())
}

pub fn generate_seeded(distribution: Distribution, count: usize, seed: u64) -> Result<Vec<f64>, Error> {
    generate(distribution, count, &mut StdRng::seed_from_u64(seed))
}

pub fn generate_random(distribution: Distribution, count: usize) -> Result<Vec<f64>, Error> {
    generate(distribution, count, &mut rand::thread_rng())
}
