//! A library for turning palette-quantized images into paint-by-numbers templates.
//!
//! `numbrette` takes a raster of palette indices (produced by any color quantizer)
//! and extracts, per palette color, flat vector regions with a two-level
//! shell/hole topology. Each region is labeled at its visual center — the interior
//! point farthest from any boundary — so a color number can be drawn with maximal
//! clearance.
//!
//! # Features
//! To reduce dependencies and compile times, `numbrette` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes the builder struct that serves as the high-level API (more details below).
//! - `threads`: processes palette colors in parallel via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # High-Level API
//! To get started with the high-level API, see [`TemplatePipeline`].
//! Here is a quick example:
//! ```
//! # use numbrette::{TemplatePipeline, IndexedRaster, Palette};
//! # use palette::Srgb;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let palette = Palette::from(vec![Srgb::new(0u8, 0, 0), Srgb::new(255, 255, 255)]);
//! let raster = IndexedRaster::new(vec![0; 64 * 64], 64, 64).ok_or("bad dimensions")?;
//!
//! let mut pipeline = TemplatePipeline::new(&raster, &palette).ok_or("index out of range")?;
//! let template = pipeline
//!     .min_area(20) // discard regions too small to paint
//!     .suppress_passes(2) // remove single-pixel-wide color strips
//!     .template();
//!
//! for layer in &template.layers {
//!     for labeled in &layer.regions {
//!         if let Some(label) = &labeled.label {
//!             println!("color {} labeled at ({}, {})", layer.color_index, label.x, label.y);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod distance;
mod mask;
mod suppress;
mod types;

#[cfg(feature = "pipelines")]
mod api;

pub mod label;
pub mod region;
pub mod trace;

pub use distance::*;
pub use mask::*;
pub use suppress::StripRemover;
pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The maximum supported raster size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The maximum supported number of palette colors is `256`.
pub const MAX_COLORS: u16 = u8::MAX as u16 + 1;
