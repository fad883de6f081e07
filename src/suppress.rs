//! Contains the strip suppression pass over a quantized raster.
//!
//! A pixel with exactly one 4-connected neighbor of its own color is part of a
//! one-pixel-wide "strip" left over from quantization. Rewriting such pixels to
//! the next closest palette color erodes strips away over a few passes while
//! leaving solid regions and deliberate single-pixel details untouched.

use crate::{DistanceMatrix, IndexedRaster};

/// Removes one-pixel-wide color strips from an [`IndexedRaster`].
///
/// # Examples
/// ```
/// # use numbrette::{DistanceMatrix, IndexedRaster, Palette, StripRemover};
/// # use palette::Srgb;
/// let palette = Palette::from(vec![Srgb::new(0u8, 0, 0), Srgb::new(40, 40, 40)]);
/// let matrix = DistanceMatrix::new(&palette);
/// let mut raster = IndexedRaster::new(vec![0; 5 * 5], 5, 5).unwrap();
///
/// StripRemover::new().suppress(&mut raster, &matrix);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripRemover(u32);

impl StripRemover {
    /// The default number of passes.
    ///
    /// Two passes remove most strips without eroding genuinely thin features entirely.
    pub const DEFAULT_PASSES: u32 = 2;

    /// Creates a new [`StripRemover`] with the default number of passes.
    #[must_use]
    pub const fn new() -> Self {
        Self(Self::DEFAULT_PASSES)
    }

    /// Creates a new [`StripRemover`] running the given number of passes.
    ///
    /// This will return `None` if `passes` is zero.
    #[must_use]
    pub const fn with_passes(passes: u32) -> Option<Self> {
        if passes == 0 {
            None
        } else {
            Some(Self(passes))
        }
    }

    /// Gets the number of passes this [`StripRemover`] runs.
    #[must_use]
    pub const fn passes(&self) -> u32 {
        self.0
    }

    /// Runs the configured number of suppression passes over the raster in place.
    ///
    /// Each pass reads the raster state left by the previous pass. Within a pass
    /// all neighbor counts are taken against the pass-input snapshot, so the scan
    /// order does not influence the result. Border rows and columns are never
    /// rewritten.
    pub fn suppress(&self, raster: &mut IndexedRaster, matrix: &DistanceMatrix) {
        for _ in 0..self.0 {
            suppress_pass(raster, matrix);
        }
    }
}

impl Default for StripRemover {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one suppression pass, reading from a snapshot and writing into `raster`.
fn suppress_pass(raster: &mut IndexedRaster, matrix: &DistanceMatrix) {
    let (width, height) = (raster.width(), raster.height());
    if width < 3 || height < 3 {
        return;
    }

    let snapshot = raster.clone();
    for y in 1..(height - 1) {
        for x in 1..(width - 1) {
            let current = snapshot.get(x, y);
            let neighbors = [
                snapshot.get(x, y - 1),
                snapshot.get(x, y + 1),
                snapshot.get(x - 1, y),
                snapshot.get(x + 1, y),
            ];
            let matching = neighbors.iter().filter(|&&n| n == current).count();

            // 0 matches is an isolated pixel, 2+ is solid interior; only a
            // single match marks a strip pixel.
            if matching == 1 {
                raster.set(x, y, matrix.nearest_other(current));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Palette;
    use palette::Srgb;

    /// Black, dark gray, white: dark gray is the closest other color to black.
    fn test_matrix() -> DistanceMatrix {
        DistanceMatrix::new(&Palette::from(vec![
            Srgb::new(0u8, 0, 0),
            Srgb::new(40, 40, 40),
            Srgb::new(255, 255, 255),
        ]))
    }

    fn raster_from_rows(rows: &[&[u8]]) -> IndexedRaster {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let indices = rows.concat();
        IndexedRaster::new(indices, width, height).unwrap()
    }

    #[test]
    fn strip_pixels_are_rewritten() {
        // A vertical strip of color 1 through a field of color 2. The strip
        // ends have one same-color neighbor each and get rewritten; interior
        // strip pixels have two and survive the first pass.
        let mut raster = raster_from_rows(&[
            &[2, 2, 2, 2, 2],
            &[2, 2, 1, 2, 2],
            &[2, 2, 1, 2, 2],
            &[2, 2, 1, 2, 2],
            &[2, 2, 2, 2, 2],
        ]);
        let matrix = test_matrix();

        suppress_pass(&mut raster, &matrix);

        let nearest = matrix.nearest_other(1);
        assert_eq!(raster.get(2, 1), nearest);
        assert_eq!(raster.get(2, 3), nearest);
        assert_eq!(raster.get(2, 2), 1);
    }

    #[test]
    fn repeated_passes_erode_strips_from_the_ends() {
        // A five-pixel vertical strip. Each pass rewrites the two strip ends;
        // the final center pixel becomes isolated and is kept, matching the
        // "strips shrink but thin features are not erased entirely" policy.
        let mut raster = raster_from_rows(&[
            &[2, 2, 2, 2, 2, 2, 2],
            &[2, 2, 2, 1, 2, 2, 2],
            &[2, 2, 2, 1, 2, 2, 2],
            &[2, 2, 2, 1, 2, 2, 2],
            &[2, 2, 2, 1, 2, 2, 2],
            &[2, 2, 2, 1, 2, 2, 2],
            &[2, 2, 2, 2, 2, 2, 2],
        ]);

        StripRemover::new().suppress(&mut raster, &test_matrix());

        for y in [1, 2, 4, 5] {
            assert_ne!(raster.get(3, y), 1);
        }
        assert_eq!(raster.get(3, 3), 1);
    }

    #[test]
    fn isolated_pixels_are_preserved() {
        let mut raster = raster_from_rows(&[
            &[2, 2, 2, 2, 2],
            &[2, 2, 2, 2, 2],
            &[2, 2, 0, 2, 2],
            &[2, 2, 2, 2, 2],
            &[2, 2, 2, 2, 2],
        ]);

        StripRemover::new().suppress(&mut raster, &test_matrix());

        assert_eq!(raster.get(2, 2), 0);
    }

    #[test]
    fn borders_are_never_modified() {
        // Border pixels of color 1 each have one same-color border neighbor,
        // which would make them strip pixels were they interior.
        let mut raster = raster_from_rows(&[
            &[1, 1, 2, 2, 2],
            &[2, 2, 2, 2, 2],
            &[2, 2, 2, 2, 2],
            &[2, 2, 2, 2, 1],
            &[2, 2, 2, 2, 1],
        ]);
        let before = raster.clone();

        StripRemover::new().suppress(&mut raster, &test_matrix());

        assert_eq!(raster, before);
    }

    #[test]
    fn idempotent_without_strip_pixels() {
        // Solid halves: every interior pixel has at least two same-color neighbors.
        let mut raster = raster_from_rows(&[
            &[0, 0, 0, 2, 2],
            &[0, 0, 0, 2, 2],
            &[0, 0, 0, 2, 2],
            &[0, 0, 0, 2, 2],
            &[0, 0, 0, 2, 2],
        ]);
        let before = raster.clone();

        suppress_pass(&mut raster, &test_matrix());

        assert_eq!(raster, before);
    }

    #[test]
    fn zero_passes_rejected() {
        assert!(StripRemover::with_passes(0).is_none());
        assert_eq!(StripRemover::with_passes(3).map(|s| s.passes()), Some(3));
    }
}
