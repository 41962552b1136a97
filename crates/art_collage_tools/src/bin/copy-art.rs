use std::path::PathBuf;

use anyhow::Context;
use art_collage::manifest::copy::default_art_source;
use art_collage::prelude::*;
use art_collage_tools::init_tracing;
use tracing::warn;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = std::env::args_os().skip(1);

    let source = match args.next() {
        Some(path) => PathBuf::from(path),
        None => default_art_source()
            .context("HOME is not set; pass the art source directory")?,
    };
    let target = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("public/images"));

    let mut sink = FnSink::new(|event: CollageEvent| {
        if let CollageEvent::CopyFailed { path, message } = event {
            warn!("Could not copy {}: {}", path.display(), message);
        }
    });
    let report = copy_art(&source, &target, &mut sink)?;

    println!(
        "Copied {} files from {} to {} ({} failed).",
        report.copied,
        source.display(),
        target.display(),
        report.failed
    );
    Ok(())
}
