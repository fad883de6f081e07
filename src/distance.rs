//! Contains the palette color distance matrix.

use crate::Palette;

/// Squared euclidean distance between two points.
fn squared_euclidean_distance<const N: usize>(x: [f32; N], y: [f32; N]) -> f32 {
    let mut dist = 0.0;
    for c in 0..N {
        let d = x[c] - y[c];
        dist += d * d;
    }
    dist
}

/// Pairwise euclidean distances between all colors of a [`Palette`].
///
/// The matrix is symmetric with a zero diagonal and is built once per run;
/// strip suppression reads it to find the replacement color for a strip pixel.
///
/// # Examples
/// ```
/// # use numbrette::{DistanceMatrix, Palette};
/// # use palette::Srgb;
/// let palette = Palette::from(vec![
///     Srgb::new(0u8, 0, 0),
///     Srgb::new(10, 0, 0),
///     Srgb::new(255, 255, 255),
/// ]);
/// let matrix = DistanceMatrix::new(&palette);
/// assert_eq!(matrix.nearest_other(2), 1); // white is closer to (10, 0, 0) than to black
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    /// The number of palette colors (one matrix row/column per color).
    k: usize,
    /// Flat `k * k` row-major distance entries.
    distances: Vec<f32>,
}

impl DistanceMatrix {
    /// Computes the distance matrix for the given palette.
    ///
    /// O(k²) in the palette size, which is small (typically at most a few dozen colors).
    #[must_use]
    pub fn new(palette: &Palette) -> Self {
        let colors = palette
            .colors()
            .iter()
            .map(|c| [f32::from(c.red), f32::from(c.green), f32::from(c.blue)])
            .collect::<Vec<_>>();

        let k = colors.len();
        let mut distances = vec![0.0; k * k];
        for i in 0..k {
            for j in (i + 1)..k {
                let dist = squared_euclidean_distance(colors[i], colors[j]).sqrt();
                distances[i * k + j] = dist;
                distances[j * k + i] = dist;
            }
        }

        Self { k, distances }
    }

    /// The number of palette colors the matrix covers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.k
    }

    /// Returns `true` if the matrix covers no colors.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.k == 0
    }

    /// The euclidean RGB distance between palette colors `i` and `j`.
    #[must_use]
    pub fn distance(&self, i: u8, j: u8) -> f32 {
        self.distances[usize::from(i) * self.k + usize::from(j)]
    }

    /// Returns the index of the palette color closest to color `i`, other than `i` itself.
    ///
    /// Ties are broken by the smallest index (stable linear scan). Zero-distance
    /// entries are skipped, so `i` is never returned; note this also skips exact
    /// duplicates of color `i`. If every other color is a duplicate of `i`, the
    /// scan finds no strictly closer entry and index `0` is returned.
    #[must_use]
    pub fn nearest_other(&self, i: u8) -> u8 {
        let row = &self.distances[usize::from(i) * self.k..(usize::from(i) + 1) * self.k];

        let mut closest = 0;
        for (j, &dist) in row.iter().enumerate() {
            if dist == 0.0 {
                continue;
            }
            if dist < row[closest] || row[closest] == 0.0 {
                closest = j;
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        {
            closest as u8
        }
    }
}
