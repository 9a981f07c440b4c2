//! Surrogate ensembles for significance testing.

use std::fmt;
use std::str::FromStr;

use chaoscope_embed::TimeSeries;
use chaoscope_stats::{RealFft, sorted};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SurrogateError;
use crate::fourier::{aaft_with, phase_randomized};
use crate::iaaft::{IaaftConfig, iaaft_with};

/// Surrogate construction method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurrogateMethod {
    /// Phase randomization: same spectrum, Gaussian amplitudes.
    Ft,
    /// Amplitude-adjusted phase randomization: same amplitudes, spectrum
    /// approximately preserved.
    Aaft,
    /// Iterative refinement of AAFT matching both.
    #[default]
    Iaaft,
}

impl SurrogateMethod {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            SurrogateMethod::Ft => "ft",
            SurrogateMethod::Aaft => "aaft",
            SurrogateMethod::Iaaft => "iaaft",
        }
    }
}

impl fmt::Display for SurrogateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurrogateMethod {
    type Err = SurrogateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ft" => Ok(SurrogateMethod::Ft),
            "aaft" => Ok(SurrogateMethod::Aaft),
            "iaaft" => Ok(SurrogateMethod::Iaaft),
            _ => Err(SurrogateError::UnknownMethod { name: s.to_string() }),
        }
    }
}

/// One ensemble member.
#[derive(Debug, Clone, PartialEq)]
pub struct Surrogate {
    /// The generated series, same length as the original.
    pub series: Vec<f64>,
    /// How it was generated.
    pub method: SurrogateMethod,
    /// IAAFT iterations; `None` for the non-iterative methods.
    pub iterations: Option<usize>,
    /// IAAFT convergence flag; `None` for the non-iterative methods.
    pub converged: Option<bool>,
}

/// An ordered set of surrogates of one series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurrogateEnsemble {
    /// Members in generation order.
    pub members: Vec<Surrogate>,
}

impl SurrogateEnsemble {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the ensemble has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the member series.
    pub fn series(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.members.iter().map(|m| m.series.as_slice())
    }

    /// Number of IAAFT members that hit the iteration cap.
    pub fn non_converged(&self) -> usize {
        self.members.iter().filter(|m| m.converged == Some(false)).count()
    }
}

/// Shared per-series state: one FFT plan and the sorted values.
struct Generator<'a> {
    x: &'a [f64],
    x_sorted: Vec<f64>,
    fft: RealFft,
    method: SurrogateMethod,
    iaaft: &'a IaaftConfig,
}

impl<'a> Generator<'a> {
    fn new(x: &'a [f64], method: SurrogateMethod, iaaft: &'a IaaftConfig) -> Result<Self, SurrogateError> {
        TimeSeries::validate(x)?;
        if method == SurrogateMethod::Iaaft {
            iaaft.validate()?;
        }
        Ok(Self {
            x,
            x_sorted: sorted(x),
            fft: RealFft::new(x.len()),
            method,
            iaaft,
        })
    }

    fn generate<R>(&mut self, rng: &mut R) -> Result<Surrogate, SurrogateError>
    where
        R: Rng + ?Sized,
    {
        let member = match self.method {
            SurrogateMethod::Ft => Surrogate {
                series: phase_randomized(&mut self.fft, self.x, rng),
                method: self.method,
                iterations: None,
                converged: None,
            },
            SurrogateMethod::Aaft => Surrogate {
                series: aaft_with(&mut self.fft, self.x, &self.x_sorted, rng),
                method: self.method,
                iterations: None,
                converged: None,
            },
            SurrogateMethod::Iaaft => {
                let out = iaaft_with(&mut self.fft, self.x, &self.x_sorted, self.iaaft, rng)?;
                Surrogate {
                    series: out.series,
                    method: self.method,
                    iterations: Some(out.iterations),
                    converged: Some(out.converged),
                }
            }
        };
        Ok(member)
    }
}

/// Generates a single surrogate of `x`.
///
/// `iaaft` is only consulted for [`SurrogateMethod::Iaaft`].
///
/// # Errors
///
/// Invalid input, an invalid IAAFT configuration, or a constant series for
/// IAAFT.
pub fn generate<R>(
    x: &[f64],
    method: SurrogateMethod,
    iaaft: &IaaftConfig,
    rng: &mut R,
) -> Result<Surrogate, SurrogateError>
where
    R: Rng + ?Sized,
{
    Generator::new(x, method, iaaft)?.generate(rng)
}

/// Generates `count` surrogates in sequence from one caller-supplied
/// generator.
///
/// # Errors
///
/// As [`generate`], plus [`SurrogateError::InvalidCount`] for `count == 0`.
#[tracing::instrument(skip(x, iaaft, rng), fields(n = x.len()))]
pub fn generate_ensemble<R>(
    x: &[f64],
    method: SurrogateMethod,
    count: usize,
    iaaft: &IaaftConfig,
    rng: &mut R,
) -> Result<SurrogateEnsemble, SurrogateError>
where
    R: Rng + ?Sized,
{
    if count == 0 {
        return Err(SurrogateError::InvalidCount { count });
    }
    let mut generator = Generator::new(x, method, iaaft)?;
    let members = (0..count)
        .map(|_| generator.generate(rng))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(finish(members))
}

/// Generates `count` surrogates in parallel.
///
/// Member `k` draws from its own `StdRng` seeded with `seed + k`, so the
/// ensemble is identical for a given seed regardless of thread count, and
/// member `k` equals `generate(x, method, iaaft, &mut StdRng::seed_from_u64(seed + k))`.
///
/// # Errors
///
/// As [`generate_ensemble`].
#[tracing::instrument(skip(x, iaaft), fields(n = x.len()))]
pub fn generate_ensemble_par(
    x: &[f64],
    method: SurrogateMethod,
    count: usize,
    iaaft: &IaaftConfig,
    seed: u64,
) -> Result<SurrogateEnsemble, SurrogateError> {
    if count == 0 {
        return Err(SurrogateError::InvalidCount { count });
    }
    let template = Generator::new(x, method, iaaft)?;
    let members = (0..count)
        .into_par_iter()
        .map_init(
            || Generator {
                x: template.x,
                x_sorted: template.x_sorted.clone(),
                fft: template.fft.clone(),
                method,
                iaaft,
            },
            |generator, k| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(k as u64));
                generator.generate(&mut rng)
            },
        )
        .collect::<Result<Vec<_>, _>>()?;
    Ok(finish(members))
}

fn finish(members: Vec<Surrogate>) -> SurrogateEnsemble {
    let ensemble = SurrogateEnsemble { members };
    let stuck = ensemble.non_converged();
    if stuck > 0 {
        warn!(stuck, total = ensemble.len(), "surrogates did not converge");
    }
    debug!(members = ensemble.len(), "surrogate ensemble generated");
    ensemble
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<f64> {
        (0..256).map(|i| (i as f64 * 0.2).sin() + 0.3 * (i as f64 * 0.05).cos()).collect()
    }

    #[test]
    fn method_names() {
        for m in [SurrogateMethod::Ft, SurrogateMethod::Aaft, SurrogateMethod::Iaaft] {
            assert_eq!(m.name().parse::<SurrogateMethod>().unwrap(), m);
            assert_eq!(m.to_string(), m.name());
        }
        assert_eq!("IAAFT".parse::<SurrogateMethod>().unwrap(), SurrogateMethod::Iaaft);
        assert_eq!(
            "fft".parse::<SurrogateMethod>(),
            Err(SurrogateError::UnknownMethod { name: "fft".into() })
        );
    }

    #[test]
    fn members_are_tagged() {
        let x = sample();
        let mut rng = StdRng::seed_from_u64(8);
        let cfg = IaaftConfig::new();
        let ft = generate(&x, SurrogateMethod::Ft, &cfg, &mut rng).unwrap();
        assert_eq!((ft.method, ft.iterations, ft.converged), (SurrogateMethod::Ft, None, None));
        let it = generate(&x, SurrogateMethod::Iaaft, &cfg, &mut rng).unwrap();
        assert_eq!(it.method, SurrogateMethod::Iaaft);
        assert!(it.iterations.is_some());
        assert!(it.converged.is_some());
    }

    #[test]
    fn sequential_ensemble_is_reproducible() {
        let x = sample();
        let cfg = IaaftConfig::new().with_max_iter(50);
        let a = generate_ensemble(&x, SurrogateMethod::Aaft, 4, &cfg, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate_ensemble(&x, SurrogateMethod::Aaft, 4, &cfg, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert_ne!(a.members[0].series, a.members[1].series);
    }

    #[test]
    fn parallel_member_matches_single_generation() {
        let x = sample();
        let cfg = IaaftConfig::new().with_max_iter(50);
        let ens = generate_ensemble_par(&x, SurrogateMethod::Iaaft, 3, &cfg, 100).unwrap();
        let second = generate(&x, SurrogateMethod::Iaaft, &cfg, &mut StdRng::seed_from_u64(101)).unwrap();
        assert_eq!(ens.members[1], second);
    }

    #[test]
    fn zero_count_is_rejected() {
        let x = sample();
        let cfg = IaaftConfig::new();
        assert_eq!(
            generate_ensemble_par(&x, SurrogateMethod::Ft, 0, &cfg, 0),
            Err(SurrogateError::InvalidCount { count: 0 })
        );
        assert_eq!(
            generate_ensemble(&x, SurrogateMethod::Ft, 0, &cfg, &mut StdRng::seed_from_u64(0)),
            Err(SurrogateError::InvalidCount { count: 0 })
        );
    }
}
