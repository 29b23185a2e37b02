//! Multi-octave fractal Brownian motion (fBm) height field generator.
//!
//! Composites octaves of simplex noise and quantizes the result into the
//! 8-bit elevation range a [`HeightField`] stores.

use nebula_roam::HeightField;
use noise::{NoiseFn, Simplex};
use tracing::debug;

/// Configuration for multi-octave fBm noise used in height field generation.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapParams {
    /// Seed for deterministic generation.
    pub seed: u32,
    /// Number of noise octaves to composite. Typical range: 4-8.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves. Default: 2.0.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves. Default: 0.5.
    pub persistence: f64,
    /// Frequency of the first octave in cycles per sample. Default: 1/256.
    pub base_frequency: f64,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 1.0 / 256.0,
        }
    }
}

/// Samples fractal Brownian motion over simplex noise.
///
/// Each successive octave doubles in frequency and halves in amplitude,
/// producing self-similar detail at progressively finer scales.
pub struct HeightmapSampler {
    noise: Simplex,
    params: HeightmapParams,
    max_amplitude: f64,
}

impl HeightmapSampler {
    pub fn new(params: HeightmapParams) -> Self {
        let noise = Simplex::new(params.seed);
        let max_amplitude = (0..params.octaves)
            .map(|i| params.persistence.powi(i as i32))
            .sum();
        Self {
            noise,
            params,
            max_amplitude,
        }
    }

    /// Normalized fBm value at `(x, y)`, within `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if self.max_amplitude == 0.0 {
            return 0.0;
        }
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, y * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        (total / self.max_amplitude).clamp(-1.0, 1.0)
    }

    /// Quantized elevation at `(x, y)`; `0` maps to the noise minimum and
    /// `255` to the maximum.
    pub fn sample_u8(&self, x: f64, y: f64) -> u8 {
        ((self.sample(x, y) * 0.5 + 0.5) * 255.0).round() as u8
    }

    /// Fill a `size x size` height field.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn generate(&self, size: usize) -> HeightField {
        let field = HeightField::from_fn(size, |x, y| self.sample_u8(x as f64, y as f64));
        debug!(
            size,
            seed = self.params.seed,
            octaves = self.params.octaves,
            "generated height field"
        );
        field
    }

    /// Sum of all octave amplitudes relative to the first.
    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_determinism_same_seed_same_coord() {
        let params = HeightmapParams {
            seed: 42,
            ..Default::default()
        };
        let sampler_a = HeightmapSampler::new(params.clone());
        let sampler_b = HeightmapSampler::new(params);

        let h1 = sampler_a.sample(100.0, 200.0);
        let h2 = sampler_b.sample(100.0, 200.0);
        assert!(
            (h1 - h2).abs() < EPSILON,
            "Same seed + same coord must produce identical height: {h1} vs {h2}"
        );
    }

    #[test]
    fn test_different_seeds_produce_different_fields() {
        let a = HeightmapSampler::new(HeightmapParams {
            seed: 1,
            ..Default::default()
        })
        .generate(64);
        let b = HeightmapSampler::new(HeightmapParams {
            seed: 999,
            ..Default::default()
        })
        .generate(64);
        assert_ne!(a, b, "Different seeds should produce different terrain");
    }

    #[test]
    fn test_sample_is_normalized() {
        let sampler = HeightmapSampler::new(HeightmapParams::default());
        for x in (0..100).map(|i| i as f64 * 10.0) {
            for y in (0..100).map(|i| i as f64 * 10.0) {
                let h = sampler.sample(x, y);
                assert!((-1.0..=1.0).contains(&h), "Height {h} out of range at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_generated_field_uses_the_byte_range() {
        let sampler = HeightmapSampler::new(HeightmapParams {
            seed: 3,
            ..Default::default()
        });
        let field = sampler.generate(256);
        assert_eq!(field.size(), 256);
        let min = *field.samples().iter().min().unwrap();
        let max = *field.samples().iter().max().unwrap();
        assert!(max - min > 32, "terrain too flat: {min}..{max}");
    }

    #[test]
    fn test_generate_is_deterministic() {
        let params = HeightmapParams {
            seed: 11,
            octaves: 4,
            ..Default::default()
        };
        let a = HeightmapSampler::new(params.clone()).generate(33);
        let b = HeightmapSampler::new(params).generate(33);
        assert_eq!(a, b);
    }

    #[test]
    fn test_more_octaves_adds_detail() {
        let sampler_1 = HeightmapSampler::new(HeightmapParams {
            seed: 7,
            octaves: 1,
            ..Default::default()
        });
        let sampler_8 = HeightmapSampler::new(HeightmapParams {
            seed: 7,
            octaves: 8,
            ..Default::default()
        });

        let roughness = |s: &HeightmapSampler| {
            (0..1000)
                .map(|i| {
                    let x = i as f64;
                    (s.sample(x + 1.0, 0.0) - s.sample(x, 0.0)).abs()
                })
                .sum::<f64>()
        };

        let (r1, r8) = (roughness(&sampler_1), roughness(&sampler_8));
        assert!(
            r8 > r1,
            "8 octaves should have more high-frequency detail than 1 octave: {r1} vs {r8}"
        );
    }

    #[test]
    fn test_neighboring_samples_stay_close() {
        let sampler = HeightmapSampler::new(HeightmapParams {
            seed: 42,
            ..Default::default()
        });
        let field = sampler.generate(128);
        for y in 0..128 {
            for x in 1..128 {
                let delta = field.get(x, y).abs_diff(field.get(x - 1, y));
                assert!(delta < 40, "Discontinuity at ({x}, {y}): {delta}");
            }
        }
    }

    #[test]
    fn test_max_amplitude_calculation() {
        let sampler = HeightmapSampler::new(HeightmapParams {
            persistence: 0.5,
            octaves: 4,
            ..Default::default()
        });
        assert!((sampler.max_amplitude() - 1.875).abs() < EPSILON);
    }

    #[test]
    fn test_zero_octaves_is_mid_grey() {
        let sampler = HeightmapSampler::new(HeightmapParams {
            octaves: 0,
            ..Default::default()
        });
        assert_eq!(sampler.sample(123.0, 456.0), 0.0);
        assert_eq!(sampler.sample_u8(123.0, 456.0), 128);
    }
}
