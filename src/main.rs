use std::{env, process};

use freefly_camera::{AppConfig, engine::Engine};
use log::{error, info};
use winit::event_loop::EventLoop;

fn main() {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => AppConfig::load(&path).unwrap_or_else(|err| {
            error!("{err}");
            process::exit(1);
        }),
        None => demo_config(),
    };

    info!("initializing event loop");
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => panic!("failed to start the event loop, {}", err),
    };

    info!("running Engine");
    if let Err(err) = event_loop.run_app(&mut Engine::new(config)) {
        error!("failed to run Engine. {:?}", err);
        process::exit(1);
    }
}

fn demo_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.controller.velocity = 0.2;
    config.controller.mouse_sensitivity = 0.9;
    config
}
