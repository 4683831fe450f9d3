use anyhow::Context;
use flipgrid::{Map, MapConfig, Renderer};
use macroquad::prelude::*;
use std::path::PathBuf;

fn window_conf() -> Conf {
    Conf {
        window_title: "Level Viewer".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn load_map() -> anyhow::Result<Map> {
    let mut args = std::env::args().skip(1);
    let map_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/level.tmj"));
    let config = match args.next() {
        Some(cfg) => MapConfig::from_json_file(cfg.as_ref())
            .with_context(|| format!("Reading config {cfg}"))?,
        None => MapConfig::default(),
    };
    Map::load(&map_path, config).with_context(|| format!("Loading map {}", map_path.display()))
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let mut map = match load_map() {
        Ok(map) => map,
        Err(err) => {
            log::error!("{err:#}");
            std::process::exit(1);
        }
    };
    let mut renderer = Renderer::new();

    loop {
        clear_background(BLACK);
        renderer.draw(&mut map);
        next_frame().await;
    }
}
