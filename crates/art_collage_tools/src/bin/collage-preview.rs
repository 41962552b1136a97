use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use art_collage::prelude::*;
use art_collage_tools::{init_tracing, render_collage_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut args = std::env::args().skip(1);
    let public = PathBuf::from(args.next().unwrap_or_else(|| "public".into()));
    let out = args.next().unwrap_or_else(|| "collage-preview.png".into());
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(2025),
    };
    info!("Using seed {}.", seed);

    let (width, height) = (1920, 1080);
    let config = CollageConfig::new(width, height).with_pacing(Duration::ZERO);
    let mut collage = Collage::try_new(config, StdRng::seed_from_u64(seed))?;

    let source = FileManifestSource::new(public.join("imageData.json"));
    let mut loader = ImageFileLoader::new(public.clone());
    let mut sink = FnSink::new(|event: CollageEvent| {
        if let CollageEvent::ImagePlaced { index, placed } = event {
            debug!(
                "#{} {} at ({:.2}, {:.2}, {:.2})",
                index,
                placed.record.filename,
                placed.rect.x(),
                placed.rect.y(),
                placed.rect.z()
            );
        }
    });
    let summary = collage.load_all(&source, &mut loader, &mut sink)?;

    let rc = RenderConfig::new((width / 2, height / 2));
    render_collage_to_png(&collage, &rc, &out)?;

    println!(
        "Placed {} of {} images ({} failed), coverage {:.2}. Wrote {}.",
        summary.placed,
        summary.queued,
        summary.failed,
        collage.coverage(),
        out
    );
    Ok(())
}
