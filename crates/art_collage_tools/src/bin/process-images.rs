use std::path::PathBuf;

use art_collage::prelude::*;
use art_collage_tools::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let public = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("public"));

    let config = ManifestConfig::new(public.join("images"), public.join("imageData.json"));
    let builder = ManifestBuilder::try_new(config)?;
    let report = builder.run(&mut ())?;

    println!(
        "Processed {} images into {} ({} skipped, {} without color).",
        report.records,
        builder.config.output_path.display(),
        report.skipped,
        report.color_fallbacks
    );
    Ok(())
}
