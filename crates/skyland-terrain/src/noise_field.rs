//! Multi-octave 3D simplex field sampled over a chunk volume.
//!
//! Sampling a full 16×128×16 box point by point is wasteful for a field this
//! smooth, so [`NoiseField::sample_box`] evaluates the noise on a coarse
//! lattice and fills the remaining cells by trilinear interpolation.

use noise::{NoiseFn, Simplex};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GeneratorError;

/// Configuration of the octave sum and the sampling lattice.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// Number of noise octaves summed. Each octave doubles the frequency.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Scale applied to world coordinates before sampling.
    pub expansion: f64,
    /// Lattice spacing along `(x, y, z)`.
    pub sampling: [usize; 3],
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.25,
            expansion: 1.0 / 64.0,
            sampling: [4, 8, 4],
        }
    }
}

impl NoiseParams {
    /// Checks that the parameters describe a usable field whose lattice tiles
    /// a box of `size` exactly.
    pub fn validate(&self, size: [usize; 3]) -> Result<(), GeneratorError> {
        if self.octaves == 0 {
            return Err(GeneratorError::invalid("noise", "octaves must be at least 1"));
        }
        if !(self.persistence > 0.0 && self.persistence.is_finite()) {
            return Err(GeneratorError::invalid("noise", "persistence must be positive"));
        }
        if !(self.expansion > 0.0 && self.expansion.is_finite()) {
            return Err(GeneratorError::invalid("noise", "expansion must be positive"));
        }
        for (rate, extent) in self.sampling.iter().zip(size) {
            if *rate == 0 || extent % rate != 0 {
                return Err(GeneratorError::invalid(
                    "noise",
                    format!("sampling rates {:?} must divide box {size:?}", self.sampling),
                ));
            }
        }
        Ok(())
    }
}

/// Dense noise values for one sampling box, indexed `(x, z, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseSample {
    width: usize,
    height: usize,
    depth: usize,
    values: Vec<f64>,
}

impl NoiseSample {
    /// A sample holding `value` everywhere.
    pub fn uniform(size: [usize; 3], value: f64) -> Self {
        let [width, height, depth] = size;
        Self {
            width,
            height,
            depth,
            values: vec![value; width * height * depth],
        }
    }

    /// Box size `[width, height, depth]`.
    pub fn size(&self) -> [usize; 3] {
        [self.width, self.height, self.depth]
    }

    /// Value at box-local `(x, z, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the box.
    pub fn get(&self, x: usize, z: usize, y: usize) -> f64 {
        self.values[self.index(x, z, y)]
    }

    fn set(&mut self, x: usize, z: usize, y: usize, value: f64) {
        let i = self.index(x, z, y);
        self.values[i] = value;
    }

    fn index(&self, x: usize, z: usize, y: usize) -> usize {
        assert!(x < self.width && z < self.depth && y < self.height);
        (x * self.depth + z) * self.height + y
    }
}

/// Sums simplex octaves into a normalized field in `[-1, 1]`.
///
/// Holds only the octave generators and fixed parameters; every call is a pure
/// function of its arguments.
pub struct NoiseField {
    octaves: Vec<Simplex>,
    params: NoiseParams,
}

impl NoiseField {
    /// Builds the field for a world seed. Octave seeds are drawn in order from
    /// a ChaCha stream seeded with `seed`.
    pub fn new(seed: u64, params: NoiseParams) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let octaves = (0..params.octaves)
            .map(|_| Simplex::new(rng.next_u32()))
            .collect();
        Self { octaves, params }
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Normalized octave sum at a world position.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let x = x * self.params.expansion;
        let y = y * self.params.expansion;
        let z = z * self.params.expansion;

        let mut total = 0.0;
        let mut max = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;

        for octave in &self.octaves {
            total += octave.get([x * frequency, y * frequency, z * frequency]) * amplitude;
            max += amplitude;
            frequency *= 2.0;
            amplitude *= self.params.persistence;
        }

        if max > 0.0 { total / max } else { 0.0 }
    }

    /// Samples a `size = [width, height, depth]` box whose local origin sits
    /// at world `origin = [x, y, z]`.
    ///
    /// Lattice points (multiples of the sampling rate, far edge included) are
    /// sampled directly; every other cell is interpolated from the eight
    /// lattice points around it. The sampling rates must divide `size`; see
    /// [`NoiseParams::validate`].
    pub fn sample_box(&self, size: [usize; 3], origin: [f64; 3]) -> NoiseSample {
        let [width, height, depth] = size;
        let [sx, sy, sz] = self.params.sampling;

        // Lattice including the far edge, so interpolation never extrapolates.
        let mut lattice = NoiseSample::uniform([width + 1, height + 1, depth + 1], 0.0);
        for x in (0..=width).step_by(sx) {
            for z in (0..=depth).step_by(sz) {
                for y in (0..=height).step_by(sy) {
                    let value = self.sample(
                        origin[0] + x as f64,
                        origin[1] + y as f64,
                        origin[2] + z as f64,
                    );
                    lattice.set(x, z, y, value);
                }
            }
        }

        let mut out = NoiseSample::uniform(size, 0.0);
        for x in 0..width {
            let (x0, fx) = cell(x, sx);
            for z in 0..depth {
                let (z0, fz) = cell(z, sz);
                for y in 0..height {
                    if x % sx == 0 && z % sz == 0 && y % sy == 0 {
                        out.set(x, z, y, lattice.get(x, z, y));
                        continue;
                    }
                    let (y0, fy) = cell(y, sy);
                    let (x1, y1, z1) = (x0 + sx, y0 + sy, z0 + sz);

                    let c00 = lerp(fx, lattice.get(x0, z0, y0), lattice.get(x1, z0, y0));
                    let c10 = lerp(fx, lattice.get(x0, z0, y1), lattice.get(x1, z0, y1));
                    let c01 = lerp(fx, lattice.get(x0, z1, y0), lattice.get(x1, z1, y0));
                    let c11 = lerp(fx, lattice.get(x0, z1, y1), lattice.get(x1, z1, y1));
                    let c0 = lerp(fy, c00, c10);
                    let c1 = lerp(fy, c01, c11);
                    out.set(x, z, y, lerp(fz, c0, c1));
                }
            }
        }
        out
    }
}

/// Lattice cell start and fractional offset for coordinate `v`.
fn cell(v: usize, rate: usize) -> (usize, f64) {
    let start = v / rate * rate;
    (start, (v - start) as f64 / rate as f64)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: [usize; 3] = [16, 128, 16];

    #[test]
    fn test_same_seed_same_box_bit_identical() {
        let a = NoiseField::new(42, NoiseParams::default());
        let b = NoiseField::new(42, NoiseParams::default());
        let origin = [-32.0, 0.0, 48.0];
        assert_eq!(a.sample_box(BOX, origin), b.sample_box(BOX, origin));
    }

    #[test]
    fn test_repeated_calls_carry_no_state() {
        let field = NoiseField::new(7, NoiseParams::default());
        let first = field.sample_box(BOX, [0.0, 0.0, 0.0]);
        let _other = field.sample_box(BOX, [160.0, 0.0, -160.0]);
        let again = field.sample_box(BOX, [0.0, 0.0, 0.0]);
        assert_eq!(first, again);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1, NoiseParams::default());
        let b = NoiseField::new(2, NoiseParams::default());
        let differs = (0..100).any(|i| {
            let p = i as f64 * 13.7;
            a.sample(p, p * 0.5, -p) != b.sample(p, p * 0.5, -p)
        });
        assert!(differs, "different seeds should produce different fields");
    }

    #[test]
    fn test_samples_are_normalized() {
        let field = NoiseField::new(99, NoiseParams::default());
        let sample = field.sample_box(BOX, [320.0, 0.0, 320.0]);
        for x in 0..16 {
            for z in 0..16 {
                for y in 0..128 {
                    let v = sample.get(x, z, y);
                    assert!((-1.0..=1.0).contains(&v), "value {v} outside [-1, 1]");
                }
            }
        }
    }

    #[test]
    fn test_lattice_points_match_direct_sampling() {
        let field = NoiseField::new(5, NoiseParams::default());
        let origin = [16.0, 0.0, -16.0];
        let sample = field.sample_box(BOX, origin);
        for x in (0..16).step_by(4) {
            for z in (0..16).step_by(4) {
                for y in (0..128).step_by(8) {
                    let direct = field.sample(
                        origin[0] + x as f64,
                        origin[1] + y as f64,
                        origin[2] + z as f64,
                    );
                    assert_eq!(sample.get(x, z, y), direct, "lattice mismatch at ({x}, {z}, {y})");
                }
            }
        }
    }

    #[test]
    fn test_interpolated_cells_stay_between_lattice_neighbours() {
        let field = NoiseField::new(11, NoiseParams::default());
        let sample = field.sample_box(BOX, [0.0, 0.0, 0.0]);
        // Along y only, between lattice rows 8 and 16 at a lattice column.
        let lo = sample.get(4, 4, 8);
        let hi = sample.get(4, 4, 16);
        let (min, max) = (lo.min(hi), lo.max(hi));
        for y in 9..16 {
            let v = sample.get(4, 4, y);
            assert!(v >= min - 1e-12 && v <= max + 1e-12);
        }
    }

    #[test]
    fn test_validate_rejects_non_dividing_rate() {
        let params = NoiseParams {
            sampling: [3, 8, 4],
            ..Default::default()
        };
        assert!(matches!(
            params.validate(BOX),
            Err(GeneratorError::InvalidSpecification { .. })
        ));
        assert!(NoiseParams::default().validate(BOX).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_octaves() {
        let params = NoiseParams {
            octaves: 0,
            ..Default::default()
        };
        assert!(params.validate(BOX).is_err());
    }
}
