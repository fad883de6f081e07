//! Contains the [`TemplatePipeline`] builder struct for the high level API.

use crate::{
    label,
    region::{self, PrunePolicy, Region},
    trace::{self, Traced},
    DistanceMatrix, IndexedRaster, LabelPoint, Mask, Palette, ProgressEvent, StripRemover,
};
use palette::Srgb;
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// A builder struct to specify options for turning a quantized raster into a
/// paint-by-numbers template.
///
/// # Examples
/// To start, create a [`TemplatePipeline`] from an [`IndexedRaster`] and the
/// [`Palette`] that produced it:
/// ```
/// # use numbrette::{TemplatePipeline, IndexedRaster, Palette};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let palette = Palette::from(vec![Srgb::new(0u8, 0, 0), Srgb::new(255, 255, 255)]);
/// let raster = IndexedRaster::new(vec![0; 32 * 32], 32, 32).ok_or("bad dimensions")?;
/// let mut pipeline = TemplatePipeline::new(&raster, &palette).ok_or("index out of range")?;
/// # Ok(())
/// # }
/// ```
///
/// Then, you can change different options like the pruning threshold:
/// ```
/// # use numbrette::{TemplatePipeline, IndexedRaster, Palette, region::PrunePolicy};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let palette = Palette::from(vec![Srgb::new(0u8, 0, 0)]);
/// # let raster = IndexedRaster::new(vec![0; 4], 2, 2).ok_or("bad dimensions")?;
/// # let mut pipeline = TemplatePipeline::new(&raster, &palette).ok_or("index out of range")?;
/// let pipeline = pipeline
///     .min_area(50.0)
///     .prune_policy(PrunePolicy::HoleArea)
///     .suppress_passes(3);
/// # Ok(())
/// # }
/// ```
///
/// Finally, run the pipeline:
/// ```no_run
/// # use numbrette::{TemplatePipeline, IndexedRaster, Palette};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let palette = Palette::from(vec![Srgb::new(0u8, 0, 0)]);
/// # let raster = IndexedRaster::new(vec![0; 4], 2, 2).ok_or("bad dimensions")?;
/// # let pipeline = TemplatePipeline::new(&raster, &palette).ok_or("index out of range")?;
/// let template = pipeline.template();
/// # Ok(())
/// # }
/// ```
///
/// Or, in parallel across multiple threads (needs the `threads` feature):
/// ```no_run
/// # use numbrette::{TemplatePipeline, IndexedRaster, Palette};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let palette = Palette::from(vec![Srgb::new(0u8, 0, 0)]);
/// # let raster = IndexedRaster::new(vec![0; 4], 2, 2).ok_or("bad dimensions")?;
/// # let pipeline = TemplatePipeline::new(&raster, &palette).ok_or("index out of range")?;
/// let template = pipeline.template_par();
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TemplatePipeline<'a> {
    /// The quantized raster to template.
    raster: &'a IndexedRaster,
    /// The palette the raster's indices refer to.
    palette: &'a Palette,
    /// How many strip suppression passes to run (`0` skips suppression).
    suppress_passes: u32,
    /// The minimum region area to keep when pruning.
    min_area: f64,
    /// Which pruning policy to apply.
    prune_policy: PrunePolicy,
    /// The clearance accuracy for label placement.
    label_tolerance: f64,
    /// The maximum label font scale, at most `1.0`.
    max_label_scale: f64,
}

impl<'a> TemplatePipeline<'a> {
    /// The default minimum region area.
    pub const DEFAULT_MIN_AREA: f64 = 20.0;

    /// The default label placement tolerance, in pixels of clearance.
    pub const DEFAULT_LABEL_TOLERANCE: f64 = 1.0;

    /// Creates a new [`TemplatePipeline`] with default options.
    ///
    /// Returns `None` if any raster pixel's index is out of range for the
    /// palette; every later stage relies on raster indices being valid.
    #[must_use]
    pub fn new(raster: &'a IndexedRaster, palette: &'a Palette) -> Option<Self> {
        let in_range = raster
            .indices()
            .iter()
            .all(|&i| usize::from(i) < palette.len());

        in_range.then_some(Self {
            raster,
            palette,
            suppress_passes: StripRemover::DEFAULT_PASSES,
            min_area: Self::DEFAULT_MIN_AREA,
            prune_policy: PrunePolicy::default(),
            label_tolerance: Self::DEFAULT_LABEL_TOLERANCE,
            max_label_scale: 1.0,
        })
    }

    /// Sets the number of strip suppression passes to run before tracing.
    ///
    /// A value of `0` skips suppression entirely.
    ///
    /// The default is [`StripRemover::DEFAULT_PASSES`].
    pub fn suppress_passes(&mut self, passes: u32) -> &mut Self {
        self.suppress_passes = passes;
        self
    }

    /// Sets the minimum area for a region (or hole) to survive pruning.
    ///
    /// The default is [`TemplatePipeline::DEFAULT_MIN_AREA`].
    pub fn min_area(&mut self, min_area: impl Into<f64>) -> &mut Self {
        self.min_area = min_area.into();
        self
    }

    /// Sets the pruning policy.
    ///
    /// See [`PrunePolicy`] for the two alternatives; they produce observably
    /// different templates.
    ///
    /// The default is [`PrunePolicy::NetArea`].
    pub fn prune_policy(&mut self, policy: PrunePolicy) -> &mut Self {
        self.prune_policy = policy;
        self
    }

    /// Sets how close to optimal the label clearance search must get before
    /// it stops refining.
    ///
    /// The default is [`TemplatePipeline::DEFAULT_LABEL_TOLERANCE`].
    pub fn label_tolerance(&mut self, tolerance: f64) -> &mut Self {
        self.label_tolerance = tolerance;
        self
    }

    /// Sets the maximum label font scale, clamped to the range `0.0..=1.0` —
    /// labels are only ever shrunk to fit their clearance, never enlarged.
    ///
    /// The default is `1.0`.
    pub fn max_label_scale(&mut self, scale: f64) -> &mut Self {
        self.max_label_scale = scale.clamp(0.0, 1.0);
        self
    }
}

impl TemplatePipeline<'_> {
    /// Runs the pipeline and returns the computed template.
    #[must_use]
    pub fn template(&self) -> Template {
        self.template_with(|_| ())
    }

    /// Runs the pipeline, reporting progress to the given observer.
    ///
    /// The observer receives one [`ProgressEvent`] per stage per color, in
    /// processing order.
    #[must_use]
    pub fn template_with(&self, mut observer: impl FnMut(ProgressEvent)) -> Template {
        let raster = self.suppressed();

        #[allow(clippy::cast_possible_truncation)]
        let layers = (0..self.palette.len())
            .map(|i| self.color_layer(&raster, i as u8, &mut observer))
            .collect();

        Template { layers, max_label_scale: self.max_label_scale }
    }

    /// Returns the working raster after strip suppression.
    fn suppressed(&self) -> IndexedRaster {
        let mut raster = self.raster.clone();
        if let Some(remover) = StripRemover::with_passes(self.suppress_passes) {
            let matrix = DistanceMatrix::new(self.palette);
            remover.suppress(&mut raster, &matrix);
        }
        raster
    }

    /// Runs the mask → trace → regions → labels chain for one color.
    fn color_layer(
        &self,
        raster: &IndexedRaster,
        color_index: u8,
        mut observe: impl FnMut(ProgressEvent),
    ) -> ColorLayer {
        let mask = Mask::from_raster(raster, color_index);
        observe(ProgressEvent::Masked { color_index });

        // A color with no pixels left yields an empty layer, not an error.
        let traced = if mask.is_empty() {
            Traced::default()
        } else {
            trace::trace(&mask)
        };
        observe(ProgressEvent::Traced { color_index, contours: traced.contours.len() });

        let regions = region::build_regions(&traced);
        let regions = region::prune(regions, self.min_area, self.prune_policy);
        observe(ProgressEvent::Pruned { color_index, regions: regions.len() });

        let regions = regions
            .into_iter()
            .map(|region| {
                let label = label::place(&region, self.label_tolerance);
                LabeledRegion { region, label }
            })
            .collect::<Vec<_>>();
        let labels = regions.iter().filter(|r| r.label.is_some()).count();
        observe(ProgressEvent::Labeled { color_index, labels });

        ColorLayer {
            color_index,
            color: self.palette.color(color_index),
            regions,
        }
    }
}

#[cfg(feature = "threads")]
impl TemplatePipeline<'_> {
    /// Runs the pipeline in parallel and returns the computed template.
    ///
    /// Each color's chain is independent, so colors fan out across the rayon
    /// thread pool; the resulting layers are still composed in ascending
    /// color-index order.
    #[must_use]
    pub fn template_par(&self) -> Template {
        let raster = self.suppressed();

        #[allow(clippy::cast_possible_truncation)]
        let layers = (0..self.palette.len())
            .into_par_iter()
            .map(|i| self.color_layer(&raster, i as u8, |_| ()))
            .collect();

        Template { layers, max_label_scale: self.max_label_scale }
    }
}

/// The finished template: one layer per palette color, in ascending index
/// order, ready for an external renderer to outline and number.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// One entry per palette color, index-aligned with the palette.
    pub layers: Vec<ColorLayer>,
    /// The maximum label font scale the pipeline was configured with.
    pub max_label_scale: f64,
}

impl Template {
    /// Returns the font scale for drawing a label of the given unscaled
    /// rendered width at `point`, honoring the configured maximum scale.
    #[must_use]
    pub fn label_scale(&self, point: &LabelPoint, unscaled_width: f64) -> f64 {
        point.scale_for_width(unscaled_width, self.max_label_scale)
    }
}

/// All regions of one palette color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLayer {
    /// The palette index this layer belongs to.
    pub color_index: u8,
    /// The palette color, for convenience when rendering.
    pub color: Srgb<u8>,
    /// The pruned regions of this color with their label points.
    pub regions: Vec<LabeledRegion>,
}

/// A region together with its label point, when one could be computed.
///
/// A `None` label means the region's geometry was degenerate beyond repair;
/// the region itself is still drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRegion {
    /// The shell and holes of the region.
    pub region: Region,
    /// Where to draw the color number, absent for unlabelable geometry.
    pub label: Option<LabelPoint>,
}
