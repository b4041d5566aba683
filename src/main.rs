//! A small OpenGL scene: a flat figure assembled from triangles, drawn twice
//! per frame (a green fill and a black line-strip outline) against a pale
//! yellow background.
//!
//! Holding any of `W`, `A`, `S`, `D` translates the figure a fixed step per
//! rendered frame. A per-frame scale uniform counters the window's aspect
//! ratio so the figure keeps its proportions when the window is resized.
//! Escape or the window's close button exits.

mod app;
mod config;
mod geometry;
mod input;
mod render;
mod shaders;
mod transform;

use crate::config::Config;

fn main() {
    init_logging();

    if let Err(err) = app::run(Config::default()) {
        log::error!("{err:#}");
        std::process::exit(-1);
    }
}

/// `info` and up unless `RUST_LOG` says otherwise.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
