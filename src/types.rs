//! Contains various types needed across the crate.

use crate::MAX_COLORS;
use palette::Srgb;
use std::{error::Error, fmt::Display};
#[cfg(feature = "image")]
use image::RgbImage;

/// An error type for when the color indices given for a [`Palette`]
/// do not form a dense range starting at zero.
///
/// Every downstream stage addresses palette colors by index, so a palette
/// with gaps or duplicates is rejected before any per-color work begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPalette {
    /// The palette contains no colors.
    Empty,
    /// The palette has more colors than [`MAX_COLORS`](crate::MAX_COLORS).
    TooLarge,
    /// The given indices are not the contiguous range `0..len`.
    ///
    /// Contains the first index at which the expected and found values differ.
    NonContiguous {
        /// The index that was expected at this position.
        expected: u16,
        /// The index that was actually found.
        found: u16,
    },
}

impl Display for InvalidPalette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Empty => write!(f, "palette must contain at least one color"),
            Self::TooLarge => write!(f, "palette exceeds the maximum of {MAX_COLORS} colors"),
            Self::NonContiguous { expected, found } => write!(
                f,
                "palette indices must be sequential integers starting from 0: expected {expected} but found {found}"
            ),
        }
    }
}

impl Error for InvalidPalette {}

/// An ordered set of colors addressed by dense `u8` index.
///
/// The invariant is that color `i` is at position `i`: indices form the
/// contiguous range `0..len` with no gaps. Colors need not be unique,
/// but strip suppression is only meaningful when they are distinguishable.
///
/// # Examples
/// A plain `Vec` of colors is dense by construction:
/// ```
/// # use numbrette::Palette;
/// # use palette::Srgb;
/// let palette = Palette::from(vec![Srgb::new(255u8, 0, 0), Srgb::new(0, 0, 255)]);
/// assert_eq!(palette.len(), 2);
/// ```
///
/// Keyed entries (e.g. from a clusterer returning labeled centroids) are validated:
/// ```
/// # use numbrette::{Palette, InvalidPalette};
/// # use palette::Srgb;
/// # fn main() -> Result<(), InvalidPalette> {
/// let palette = Palette::try_from_entries([(1, Srgb::new(0u8, 0, 0)), (0, Srgb::new(255, 255, 255))])?;
/// assert_eq!(palette.color(0), Srgb::new(255, 255, 255));
///
/// let gap = Palette::try_from_entries([(0, Srgb::new(0u8, 0, 0)), (2, Srgb::new(255, 255, 255))]);
/// assert_eq!(gap, Err(InvalidPalette::NonContiguous { expected: 1, found: 2 }));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<Srgb<u8>>);

impl Palette {
    /// Creates a [`Palette`] from `(index, color)` entries in any order.
    ///
    /// # Errors
    /// Returns [`InvalidPalette`] if the entries are empty, exceed
    /// [`MAX_COLORS`](crate::MAX_COLORS), or their indices do not form
    /// the contiguous range `0..len`.
    pub fn try_from_entries(
        entries: impl IntoIterator<Item = (u16, Srgb<u8>)>,
    ) -> Result<Self, InvalidPalette> {
        let mut entries = entries.into_iter().collect::<Vec<_>>();
        if entries.is_empty() {
            return Err(InvalidPalette::Empty);
        }
        if entries.len() > usize::from(MAX_COLORS) {
            return Err(InvalidPalette::TooLarge);
        }

        entries.sort_by_key(|&(i, _)| i);
        #[allow(clippy::cast_possible_truncation)]
        for (position, &(index, _)) in entries.iter().enumerate() {
            let expected = position as u16;
            if index != expected {
                return Err(InvalidPalette::NonContiguous { expected, found: index });
            }
        }

        Ok(Self(entries.into_iter().map(|(_, color)| color).collect()))
    }

    /// Returns the color at the given index.
    #[must_use]
    pub fn color(&self, index: u8) -> Srgb<u8> {
        self.0[usize::from(index)]
    }

    /// Returns the number of colors in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the palette has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the colors in index order.
    #[must_use]
    pub fn colors(&self) -> &[Srgb<u8>] {
        &self.0
    }
}

impl From<Vec<Srgb<u8>>> for Palette {
    fn from(colors: Vec<Srgb<u8>>) -> Self {
        let mut colors = colors;
        colors.truncate(usize::from(MAX_COLORS));
        Self(colors)
    }
}

impl AsRef<[Srgb<u8>]> for Palette {
    fn as_ref(&self) -> &[Srgb<u8>] {
        &self.0
    }
}

/// A raster of palette indices in row-major order.
///
/// This is the working representation of a quantized image: each pixel holds
/// an index into a [`Palette`] instead of a color. It is produced by an
/// external quantizer, smoothed in place by [`StripRemover`](crate::StripRemover),
/// and read per color by [`Mask`](crate::Mask).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRaster {
    /// Flat row-major palette indices.
    indices: Vec<u8>,
    /// The width of the raster in pixels.
    width: u32,
    /// The height of the raster in pixels.
    height: u32,
}

impl IndexedRaster {
    /// Creates a new [`IndexedRaster`].
    /// Returns `None` if the length of `indices` is not equal to `width * height`
    /// or exceeds [`MAX_PIXELS`](crate::MAX_PIXELS).
    #[must_use]
    pub fn new(indices: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        let len = width as usize * height as usize;
        if indices.len() == len && len <= crate::MAX_PIXELS as usize {
            Some(Self { indices, width, height })
        } else {
            None
        }
    }

    /// The width of the raster in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The height of the raster in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the palette index at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.indices[y as usize * self.width as usize + x as usize]
    }

    /// Sets the palette index at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, index: u8) {
        self.indices[y as usize * self.width as usize + x as usize] = index;
    }

    /// The flat row-major palette indices.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}

#[cfg(feature = "image")]
impl IndexedRaster {
    /// Creates an [`IndexedRaster`] from an [`RgbImage`] whose pixels are all
    /// exact palette colors (i.e., the image was already quantized).
    ///
    /// Returns `None` if any pixel's color does not appear in the palette.
    /// When the palette contains duplicate colors, the lowest matching index wins.
    #[must_use]
    pub fn from_rgbimage(image: &RgbImage, palette: &Palette) -> Option<Self> {
        let lookup = |rgb: &image::Rgb<u8>| {
            let color = Srgb::new(rgb.0[0], rgb.0[1], rgb.0[2]);
            palette.colors().iter().position(|&c| c == color)
        };

        #[allow(clippy::cast_possible_truncation)]
        let indices = image
            .pixels()
            .map(|pixel| lookup(pixel).map(|i| i as u8))
            .collect::<Option<Vec<_>>>()?;

        Self::new(indices, image.width(), image.height())
    }

    /// Renders the raster back to an [`RgbImage`] by palette lookup.
    ///
    /// This is the flat "preview" of the quantized image; outlines and labels
    /// are left to an external renderer.
    #[must_use]
    pub fn to_rgbimage(&self, palette: &Palette) -> RgbImage {
        let mut buf = Vec::with_capacity(self.indices.len() * 3);
        for &i in &self.indices {
            let color = palette.color(i);
            buf.extend_from_slice(&[color.red, color.green, color.blue]);
        }

        #[allow(clippy::expect_used)]
        {
            // buf holds 3 bytes per index and indices.len() == width * height
            RgbImage::from_vec(self.width, self.height, buf).expect("large enough buffer")
        }
    }
}

/// A label position inside a region together with its clearance.
///
/// The clearance is the distance from the point to the nearest boundary edge
/// among the region's shell and holes, so a disc of radius `clearance`
/// centered at `(x, y)` fits entirely inside the paintable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPoint {
    /// The x coordinate of the label position.
    pub x: f64,
    /// The y coordinate of the label position.
    pub y: f64,
    /// The distance from the point to the nearest shell or hole edge.
    pub clearance: f64,
}

impl LabelPoint {
    /// Returns the font scale at which a label of the given unscaled rendered
    /// `width` fits within the clearance disc (width at most `2 * clearance`).
    ///
    /// The result never exceeds `max_scale`, and a label that already fits is
    /// not shrunk. Returns `max_scale` for a non-positive `width`.
    #[must_use]
    pub fn scale_for_width(&self, width: f64, max_scale: f64) -> f64 {
        if width <= 0.0 {
            return max_scale;
        }
        let fit = (2.0 * self.clearance) / width;
        fit.min(max_scale)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn palette_entries_any_order() {
        let palette = Palette::try_from_entries([
            (2, Srgb::new(2u8, 2, 2)),
            (0, Srgb::new(0u8, 0, 0)),
            (1, Srgb::new(1u8, 1, 1)),
        ])
        .unwrap();

        assert_eq!(palette.color(0), Srgb::new(0, 0, 0));
        assert_eq!(palette.color(2), Srgb::new(2, 2, 2));
    }

    #[test]
    fn palette_rejects_gaps_and_duplicates() {
        let gap = Palette::try_from_entries([(0, Srgb::new(0u8, 0, 0)), (2, Srgb::new(2u8, 2, 2))]);
        assert_eq!(gap, Err(InvalidPalette::NonContiguous { expected: 1, found: 2 }));

        let duplicate =
            Palette::try_from_entries([(0, Srgb::new(0u8, 0, 0)), (0, Srgb::new(1u8, 1, 1))]);
        assert_eq!(
            duplicate,
            Err(InvalidPalette::NonContiguous { expected: 1, found: 0 })
        );

        let offset = Palette::try_from_entries([(1, Srgb::new(0u8, 0, 0))]);
        assert_eq!(offset, Err(InvalidPalette::NonContiguous { expected: 0, found: 1 }));

        assert_eq!(Palette::try_from_entries([]), Err(InvalidPalette::Empty));
    }

    #[test]
    fn raster_dimension_mismatch() {
        assert!(IndexedRaster::new(vec![0; 12], 4, 3).is_some());
        assert!(IndexedRaster::new(vec![0; 11], 4, 3).is_none());
    }

    #[test]
    fn raster_get_set_roundtrip() {
        let mut raster = IndexedRaster::new(vec![0; 12], 4, 3).unwrap();
        raster.set(3, 2, 7);
        assert_eq!(raster.get(3, 2), 7);
        assert_eq!(raster.get(0, 0), 0);
    }

    #[test]
    fn label_scale_shrinks_but_never_grows() {
        let label = LabelPoint { x: 0.0, y: 0.0, clearance: 10.0 };

        // Width 40 exceeds the clearance disc diameter of 20.
        assert!((label.scale_for_width(40.0, 1.0) - 0.5).abs() < 1e-12);
        // Width 10 already fits: no shrinking, capped at max_scale.
        assert!((label.scale_for_width(10.0, 1.0) - 1.0).abs() < 1e-12);
        assert!((label.scale_for_width(10.0, 0.75) - 0.75).abs() < 1e-12);
    }
}
