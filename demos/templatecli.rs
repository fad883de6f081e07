#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use numbrette::{
    region::PrunePolicy, IndexedRaster, Palette, ProgressEvent, TemplatePipeline,
};
use palette::Srgb;

#[derive(Copy, Clone, ValueEnum)]
enum CliPrunePolicy {
    NetArea,
    HoleArea,
}

impl From<CliPrunePolicy> for PrunePolicy {
    fn from(value: CliPrunePolicy) -> Self {
        match value {
            CliPrunePolicy::NetArea => PrunePolicy::NetArea,
            CliPrunePolicy::HoleArea => PrunePolicy::HoleArea,
        }
    }
}

#[derive(Parser)]
#[command(about = "Turn an already-quantized image into paint-by-numbers template data")]
struct Options {
    /// A quantized image (every pixel an exact palette color, at most 256 colors).
    image: PathBuf,

    #[arg(long, default_value_t = 2)]
    suppress_passes: u32,

    #[arg(long, default_value_t = 20.0)]
    min_area: f64,

    #[arg(long, value_enum, default_value_t = CliPrunePolicy::NetArea)]
    prune_policy: CliPrunePolicy,

    #[arg(long, default_value_t = 1.0)]
    label_tolerance: f64,

    /// Where to save the flat recolored preview, if anywhere.
    #[arg(long)]
    preview: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = Options::parse();

    let image = image::open(&options.image)?.into_rgb8();

    // Collect the distinct colors; the input must already be quantized.
    let mut colors: Vec<Srgb<u8>> = Vec::new();
    for pixel in image.pixels() {
        let color = Srgb::new(pixel.0[0], pixel.0[1], pixel.0[2]);
        if !colors.contains(&color) {
            colors.push(color);
        }
        if colors.len() > 256 {
            return Err("image has more than 256 distinct colors; quantize it first".into());
        }
    }
    let palette = Palette::from(colors);

    let raster = IndexedRaster::from_rgbimage(&image, &palette)
        .ok_or("image contains colors outside its own palette")?;

    let mut pipeline = TemplatePipeline::new(&raster, &palette)
        .ok_or("raster indices out of range for the palette")?;
    let template = pipeline
        .suppress_passes(options.suppress_passes)
        .min_area(options.min_area)
        .prune_policy(options.prune_policy.into())
        .label_tolerance(options.label_tolerance)
        .template_with(|event| {
            if let ProgressEvent::Labeled { color_index, labels } = event {
                eprintln!("color {color_index}: {labels} labels placed");
            }
        });

    for layer in &template.layers {
        println!(
            "color {:>3} ({:>3},{:>3},{:>3}): {} regions",
            layer.color_index,
            layer.color.red,
            layer.color.green,
            layer.color.blue,
            layer.regions.len(),
        );
        for labeled in &layer.regions {
            match &labeled.label {
                Some(label) => println!(
                    "    label at ({:.1}, {:.1}) with clearance {:.2}",
                    label.x, label.y, label.clearance
                ),
                None => println!("    unlabeled (degenerate geometry)"),
            }
        }
    }

    if let Some(path) = options.preview {
        raster.to_rgbimage(&palette).save(path)?;
    }

    Ok(())
}
