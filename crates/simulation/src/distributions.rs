//! Sampling durations from [`Distribution`]s.
//!
//! Draw counts per family are fixed: `fixed` draws nothing, `normal` draws
//! two values and every other family draws exactly one. Changing a count
//! shifts the whole run's random stream.

use crate::rng::unit_f64;
use flowsim_types::Distribution;
use rand::RngCore;
use std::f64::consts::PI;

/// Sample a non-negative duration.
pub fn sample<R: RngCore + ?Sized>(dist: &Distribution, rng: &mut R) -> f64 {
    let value = match *dist {
        Distribution::Fixed { value } => value,

        // Inverse transform on 1 - U, which is never zero.
        Distribution::Exponential { mean } => -mean * (1.0 - unit_f64(rng)).ln(),

        // Box-Muller, cosine branch only.
        Distribution::Normal { mean, stddev } => {
            let u1 = unit_f64(rng);
            let u2 = unit_f64(rng);
            let z = (-2.0 * (1.0 - u1).ln()).sqrt() * (2.0 * PI * u2).cos();
            mean + stddev * z
        }

        Distribution::Uniform { min, max } => min + (max - min) * unit_f64(rng),

        Distribution::Triangular { min, mode, max } => {
            let u = unit_f64(rng);
            let fc = (mode - min) / (max - min);
            if u < fc {
                min + (u * (max - min) * (mode - min)).sqrt()
            } else {
                max - ((1.0 - u) * (max - min) * (max - mode)).sqrt()
            }
        }
    };

    value.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mulberry32;

    const N: usize = 10_000;

    fn draw(dist: Distribution, seed: i64) -> Vec<f64> {
        let mut rng = Mulberry32::new(seed);
        (0..N).map(|_| sample(&dist, &mut rng)).collect()
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    fn stddev(values: &[f64]) -> f64 {
        let m = mean(values);
        let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
        var.sqrt()
    }

    #[test]
    fn test_fixed_returns_value_without_drawing() {
        let mut rng = Mulberry32::new(1);
        let untouched = rng.clone();
        assert_eq!(sample(&Distribution::Fixed { value: 5.0 }, &mut rng), 5.0);
        assert_eq!(rng, untouched);
    }

    #[test]
    fn test_draw_counts() {
        let one_draw = [
            Distribution::Exponential { mean: 1.0 },
            Distribution::Uniform { min: 0.0, max: 1.0 },
            Distribution::Triangular {
                min: 0.0,
                mode: 1.0,
                max: 2.0,
            },
        ];
        for dist in one_draw {
            let mut rng = Mulberry32::new(3);
            let mut expected = Mulberry32::new(3);
            sample(&dist, &mut rng);
            expected.next_u32();
            assert_eq!(rng, expected, "{} should draw once", dist.kind());
        }

        let mut rng = Mulberry32::new(3);
        let mut expected = Mulberry32::new(3);
        sample(&Distribution::Normal { mean: 0.0, stddev: 1.0 }, &mut rng);
        expected.next_u32();
        expected.next_u32();
        assert_eq!(rng, expected, "normal should draw twice");
    }

    #[test]
    fn test_exponential_mean() {
        let values = draw(Distribution::Exponential { mean: 10.0 }, 42);
        let m = mean(&values);
        assert!(m > 9.0 && m < 11.0, "mean was {}", m);
    }

    #[test]
    fn test_normal_mean_and_stddev() {
        let values = draw(
            Distribution::Normal {
                mean: 50.0,
                stddev: 5.0,
            },
            42,
        );
        let m = mean(&values);
        let sd = stddev(&values);
        assert!(m > 49.0 && m < 51.0, "mean was {}", m);
        assert!(sd > 4.5 && sd < 5.5, "stddev was {}", sd);
    }

    #[test]
    fn test_uniform_bounds_and_mean() {
        let values = draw(Distribution::Uniform { min: 2.0, max: 8.0 }, 42);
        assert!(values.iter().all(|v| (2.0..=8.0).contains(v)));
        let m = mean(&values);
        assert!(m > 4.5 && m < 5.5, "mean was {}", m);
    }

    #[test]
    fn test_triangular_bounds_and_mean() {
        let values = draw(
            Distribution::Triangular {
                min: 1.0,
                mode: 2.0,
                max: 6.0,
            },
            7,
        );
        assert!(values.iter().all(|v| (1.0..=6.0).contains(v)));
        let m = mean(&values);
        assert!(m > 2.8 && m < 3.2, "mean was {}", m);
    }

    #[test]
    fn test_values_clamped_to_zero() {
        let values = draw(
            Distribution::Normal {
                mean: 0.1,
                stddev: 5.0,
            },
            42,
        );
        assert!(values.iter().all(|&v| v >= 0.0));
        assert!(values.iter().any(|&v| v == 0.0));

        let mut rng = Mulberry32::new(1);
        assert_eq!(sample(&Distribution::Fixed { value: -3.0 }, &mut rng), 0.0);
    }
}
