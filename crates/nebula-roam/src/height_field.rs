//! Square grid of 8-bit elevation samples shared by every patch.

use glam::IVec2;

use crate::error::HeightFieldError;

/// Square grid of `u8` elevation samples, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightField {
    size: usize,
    samples: Vec<u8>,
}

impl HeightField {
    /// Wrap a row-major sample buffer of `size * size` elements.
    pub fn from_samples(size: usize, samples: Vec<u8>) -> Result<Self, HeightFieldError> {
        if size == 0 {
            return Err(HeightFieldError::Empty);
        }
        let expected = size * size;
        if samples.len() != expected {
            return Err(HeightFieldError::SampleCount {
                size,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self { size, samples })
    }

    /// A height field of constant elevation.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn flat(size: usize, value: u8) -> Self {
        assert!(size > 0, "height field size must be non-zero");
        Self {
            size,
            samples: vec![value; size * size],
        }
    }

    /// Build a height field by evaluating `f(x, y)` for every sample.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> u8) -> Self {
        assert!(size > 0, "height field size must be non-zero");
        let mut samples = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                samples.push(f(x, y));
            }
        }
        Self { size, samples }
    }

    /// Side length in samples.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sample at `(x, y)`, clamped to the grid.
    ///
    /// The far edge of the last patch row/column lies one sample past the
    /// grid and reads the last row/column instead.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        let max = self.size as i32 - 1;
        let x = x.clamp(0, max) as usize;
        let y = y.clamp(0, max) as usize;
        self.samples[y * self.size + x]
    }

    /// Overwrite one sample.
    pub fn set(&mut self, x: usize, y: usize, value: u8) -> Result<(), HeightFieldError> {
        if x >= self.size || y >= self.size {
            return Err(HeightFieldError::OutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        self.samples[y * self.size + x] = value;
        Ok(())
    }

    /// Raw row-major samples.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Read-only view with coordinates relative to `origin`.
    pub fn view(&self, origin: IVec2) -> HeightView<'_> {
        HeightView {
            field: self,
            origin,
        }
    }
}

/// Window onto a [`HeightField`] addressed in patch-local coordinates.
#[derive(Clone, Copy)]
pub struct HeightView<'a> {
    field: &'a HeightField,
    origin: IVec2,
}

impl HeightView<'_> {
    /// Sample at patch-local `point`.
    pub fn get(&self, point: IVec2) -> u8 {
        let p = self.origin + point;
        self.field.get(p.x, p.y)
    }
}
