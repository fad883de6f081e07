//! Contains the types and functions for the high level pipeline builder API.

mod template_pipeline;

pub use template_pipeline::{ColorLayer, LabeledRegion, Template, TemplatePipeline};

/// A progress notification from a running [`TemplatePipeline`].
///
/// Progress reporting is a pure side channel: the pipeline emits events to an
/// observer injected by the caller (see [`TemplatePipeline::template_with`])
/// and never logs or prints on its own. Each event names the palette color it
/// belongs to; colors are processed in ascending index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The color's mask has been derived from the raster.
    Masked {
        /// The palette color being processed.
        color_index: u8,
    },
    /// The mask's boundaries have been traced.
    Traced {
        /// The palette color being processed.
        color_index: u8,
        /// How many contours (shells and holes) were found.
        contours: usize,
    },
    /// Regions have been assembled and pruned.
    Pruned {
        /// The palette color being processed.
        color_index: u8,
        /// How many regions survived pruning.
        regions: usize,
    },
    /// Label points have been computed; the color is finished.
    Labeled {
        /// The palette color being processed.
        color_index: u8,
        /// How many regions received a label point.
        labels: usize,
    },
}
