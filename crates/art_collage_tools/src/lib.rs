#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, render_collage, render_collage_to_png, render_scene, RenderConfig,
};
