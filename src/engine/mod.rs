use std::{process, sync::Arc, time::Duration};

use glam::Vec3;
use log::{debug, error, info};
use wgpu::{Color, Instance};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::AppConfig,
    engine::{
        cameras::{CameraUniform, Lens, controller::CameraController},
        graphics::{GPUContext, renderer::BoxRenderer, viewports::Viewport},
        scene::{NodeId, Transform},
        window::{HostWindow, WindowProperties, WinitWindow},
    },
    engine_loop::EngineLoop,
    utils::FPSCounter,
};

pub mod cameras;
pub mod graphics;
pub mod mesh;
pub mod scene;
pub mod window;

const CAMERA_START: Vec3 = Vec3::new(0.0, -10.0, 0.0);

/// Demo application: one box, one free-fly camera.
pub struct Engine {
    config: AppConfig,
    startup: bool,
    gpu_context: Option<GPUContext>,
    viewport: Option<Viewport>,
    renderer: Option<BoxRenderer>,
    engine_loop: Option<EngineLoop<WinitWindow>>,
    controller: Option<CameraController>,
    camera: Option<NodeId>,
    model: Option<NodeId>,
    lens: Lens,
    fps_counter: Option<FPSCounter>,
}

impl Engine {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            startup: true,
            gpu_context: None,
            viewport: None,
            renderer: None,
            engine_loop: None,
            controller: None,
            camera: None,
            model: None,
            lens: Lens::default(),
            fps_counter: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        info!("creating window");
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| format!("failed to create window {err}"))?,
        );

        info!("creating instance");
        let instance = Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .map_err(|err| format!("failed to create surface {err}"))?;
        let gpu_context = GPUContext::init(&instance, &surface)?;
        let viewport = Viewport::new(window.clone(), Color::BLACK, surface, &gpu_context);
        self.lens
            .set_aspect(viewport.config.width, viewport.config.height);

        info!("creating renderer");
        self.renderer = Some(BoxRenderer::new(&gpu_context, &viewport));
        self.gpu_context = Some(gpu_context);
        self.viewport = Some(viewport);

        self.start_engine_loop(window)
    }

    fn start_engine_loop(&mut self, window: Arc<Window>) -> Result<(), String> {
        info!("init engine_loop");
        let mut engine_loop = EngineLoop::new(WinitWindow::new(window));
        engine_loop.max_delta = self
            .config
            .frame
            .max_dt_ms
            .map(|ms| Duration::from_millis(ms.into()));

        let model = engine_loop.scene.attach("box", Transform::default());
        let camera = engine_loop
            .scene
            .attach("camera", Transform::from_position(CAMERA_START));

        info!("attaching camera controller");
        let controller_config = &self.config.controller;
        let mut controller = CameraController::from_config(camera, controller_config);
        controller
            .setup(&mut engine_loop, controller_config.keys.clone())
            .map_err(|err| format!("failed to set up camera controller {err}"))?;

        self.model = Some(model);
        self.camera = Some(camera);
        self.controller = Some(controller);
        self.engine_loop = Some(engine_loop);
        Ok(())
    }

    fn redraw(&mut self) {
        let (Some(gpu_context), Some(viewport), Some(renderer), Some(engine_loop)) = (
            self.gpu_context.as_ref(),
            self.viewport.as_ref(),
            self.renderer.as_ref(),
            self.engine_loop.as_ref(),
        ) else {
            return;
        };

        let scene = &engine_loop.scene;
        let camera = self.camera.and_then(|id| scene.transform(id));
        let model = self.model.and_then(|id| scene.transform(id));
        if let (Some(camera), Some(model)) = (camera, model) {
            let uniform = CameraUniform::new(camera, &self.lens, model);
            renderer.render(gpu_context, viewport, &uniform);
        }

        if let Some(fps_counter) = self.fps_counter.as_mut() {
            fps_counter.tick();
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let (Some(controller), Some(engine_loop)) =
            (self.controller.take(), self.engine_loop.as_mut())
        {
            controller.destroy(engine_loop);
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for Engine {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.startup {
            if let Err(err) = self.init(event_loop) {
                error!("{err}");
                process::exit(1);
            }
            if self.config.frame.log_fps {
                self.fps_counter = Some(FPSCounter::default());
            }
            self.startup = false;
        }

        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(viewport) = &self.viewport {
            viewport.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        debug!("processing event {:?}", event);
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(size) => {
                if let (Some(viewport), Some(gpu_context)) =
                    (self.viewport.as_mut(), self.gpu_context.as_ref())
                {
                    viewport.resize(&gpu_context.device, size.width, size.height);
                    self.lens.set_aspect(size.width, size.height);
                    viewport.window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed
                {
                    self.shutdown(event_loop);
                    return;
                }
                if let Some(engine_loop) = self.engine_loop.as_mut() {
                    engine_loop
                        .keyboard
                        .handle_key(event.physical_key, event.state);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(engine_loop) = self.engine_loop.as_mut() {
                    engine_loop.window.cursor_moved(position);
                }
            }
            WindowEvent::Focused(focused) => {
                if let Some(engine_loop) = self.engine_loop.as_mut() {
                    engine_loop.window.set_focused(focused);
                    if !focused {
                        engine_loop.keyboard.clear();
                    } else if !engine_loop.mouse_enabled() {
                        engine_loop
                            .window
                            .request_properties(WindowProperties::cursor_hidden(true));
                    }
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine_loop) = self.engine_loop.as_mut() {
            engine_loop.tick();
        }
        if let Some(viewport) = &self.viewport {
            viewport.window.request_redraw();
        }
    }
}
