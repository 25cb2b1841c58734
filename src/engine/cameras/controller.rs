use std::{
    cell::RefCell,
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
};

use glam::Vec3;
use log::{info, warn};

use crate::{
    config::{CameraAction, ControllerConfig, KeyBindings},
    engine::{
        scene::NodeId,
        window::{HostWindow, WindowProperties},
    },
    engine_loop::{EngineLoop, FrameContext, TaskStatus, input::InputState},
    error::Result,
};

static INSTANCES: AtomicUsize = AtomicUsize::new(0);

/// Frame-rate the movement speed is expressed against.
const REFERENCE_FPS: f32 = 60.0;

#[derive(Debug)]
struct ControllerState {
    camera: NodeId,
    velocity: f32,
    mouse_sensitivity: f32,
    heading: f32,
    pitch: f32,
    input: InputState,
}

impl ControllerState {
    fn update(&mut self, ctx: &mut FrameContext<'_>) -> TaskStatus {
        let Some(transform) = ctx.scene.transform_mut(self.camera) else {
            warn!(
                "camera node {:?} is gone at frame {}, stopping controller",
                self.camera, ctx.frame
            );
            return TaskStatus::Done;
        };

        let pointer = ctx.window.pointer();
        let center = ctx.window.size() / 2;
        if ctx.window.move_pointer(center) {
            if let Some(pointer) = pointer {
                let offset = pointer - center.as_vec2();
                self.heading -= offset.x * self.mouse_sensitivity;
                self.pitch -= offset.y * self.mouse_sensitivity;
            }
        }

        transform.set_hpr(self.heading, self.pitch, 0.0);

        let increment = ctx.delta_time * self.velocity * REFERENCE_FPS;
        for action in CameraAction::ALL {
            if self.input.is_set(action.name(), ctx.keyboard) {
                transform.translate_local(action.axis() * increment);
            }
        }

        TaskStatus::Continue
    }
}

impl CameraAction {
    fn axis(self) -> Vec3 {
        match self {
            CameraAction::Forward => Vec3::Y,
            CameraAction::Backward => Vec3::NEG_Y,
            CameraAction::Left => Vec3::NEG_X,
            CameraAction::Right => Vec3::X,
            CameraAction::Up => Vec3::Z,
            CameraAction::Down => Vec3::NEG_Z,
        }
    }
}

/// First-person free-fly behaviour: mouse turns the camera, bound keys move
/// it along its own axes.
///
/// The controller does nothing until [`CameraController::setup`] registers its
/// per-frame task with an [`EngineLoop`].
#[derive(Debug)]
pub struct CameraController {
    instance: usize,
    task_name: String,
    state: Rc<RefCell<ControllerState>>,
    keys: Option<KeyBindings>,
}

impl CameraController {
    pub fn new(camera: NodeId, velocity: f32, mouse_sensitivity: f32) -> Self {
        let instance = INSTANCES.fetch_add(1, Ordering::Relaxed);
        Self {
            instance,
            task_name: format!("camera-controller-{instance}"),
            state: Rc::new(RefCell::new(ControllerState {
                camera,
                velocity,
                mouse_sensitivity,
                heading: 0.0,
                pitch: 0.0,
                input: InputState::default(),
            })),
            keys: None,
        }
    }

    pub fn from_config(camera: NodeId, config: &ControllerConfig) -> Self {
        Self::new(camera, config.velocity, config.mouse_sensitivity)
    }

    /// Hides the cursor, watches `keys` and starts updating the camera every
    /// frame. Calling it again replaces the previous bindings.
    pub fn setup<W: HostWindow>(
        &mut self,
        engine: &mut EngineLoop<W>,
        keys: KeyBindings,
    ) -> Result<()> {
        let mut input = InputState::default();
        for (key, action) in keys.iter() {
            input.watch_with_modifiers(action.name(), key)?;
        }

        engine.disable_mouse();
        engine
            .window
            .request_properties(WindowProperties::cursor_hidden(true));

        self.state.borrow_mut().input = input;
        self.keys = Some(keys);

        engine.tasks.remove(&self.task_name);
        let state = Rc::clone(&self.state);
        engine
            .tasks
            .add(&self.task_name, move |ctx| state.borrow_mut().update(ctx));

        info!("camera controller {} set up", self.instance);
        Ok(())
    }

    /// Stops the per-frame update, hands the mouse back to the engine and
    /// shows the cursor again. `setup` can be called afterwards to resume.
    pub fn disable<W: HostWindow>(&mut self, engine: &mut EngineLoop<W>) {
        engine.tasks.remove(&self.task_name);
        engine.enable_mouse();
        engine
            .window
            .request_properties(WindowProperties::cursor_hidden(false));
        info!("camera controller {} disabled", self.instance);
    }

    pub fn destroy<W: HostWindow>(mut self, engine: &mut EngineLoop<W>) {
        self.disable(engine);
        self.state.borrow_mut().input.release();
        self.keys = None;
    }

    pub fn is_active<W: HostWindow>(&self, engine: &EngineLoop<W>) -> bool {
        engine.tasks.has(&self.task_name)
    }

    pub fn instance(&self) -> usize {
        self.instance
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn keys(&self) -> Option<&KeyBindings> {
        self.keys.as_ref()
    }

    pub fn camera(&self) -> NodeId {
        self.state.borrow().camera
    }

    pub fn velocity(&self) -> f32 {
        self.state.borrow().velocity
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.state.borrow_mut().velocity = velocity;
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.state.borrow().mouse_sensitivity
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.state.borrow_mut().mouse_sensitivity = sensitivity;
    }

    pub fn heading(&self) -> f32 {
        self.state.borrow().heading
    }

    pub fn pitch(&self) -> f32 {
        self.state.borrow().pitch
    }
}

#[cfg(test)]
mod tests {
    use glam::{UVec2, Vec2};

    use super::*;
    use crate::engine::scene::{Scene, Transform};

    struct FixedWindow {
        pointer: Option<Vec2>,
        warps: bool,
    }

    impl HostWindow for FixedWindow {
        fn request_properties(&mut self, _properties: WindowProperties) {}

        fn pointer(&self) -> Option<Vec2> {
            self.pointer
        }

        fn size(&self) -> UVec2 {
            UVec2::new(101, 51)
        }

        fn move_pointer(&mut self, position: UVec2) -> bool {
            if self.warps {
                self.pointer = Some(position.as_vec2());
            }
            self.warps
        }
    }

    #[test]
    fn instances_get_distinct_task_names() {
        let mut scene = Scene::default();
        let camera = scene.attach("camera", Transform::default());
        let first = CameraController::new(camera, 0.1, 0.2);
        let second = CameraController::new(camera, 0.1, 0.2);
        assert_ne!(first.instance(), second.instance());
        assert_ne!(first.task_name(), second.task_name());
    }

    #[test]
    fn center_uses_integer_division() {
        let mut engine = EngineLoop::new(FixedWindow {
            pointer: Some(Vec2::new(52.0, 24.0)),
            warps: true,
        });
        let camera = engine.scene.attach("camera", Transform::default());
        let mut controller = CameraController::new(camera, 0.1, 1.0);
        controller.setup(&mut engine, KeyBindings::default()).unwrap();

        engine.run_frame(0.0);
        // center is (50, 25)
        assert_eq!(controller.heading(), -2.0);
        assert_eq!(controller.pitch(), 1.0);
    }

    #[test]
    fn refused_warp_keeps_orientation() {
        let mut engine = EngineLoop::new(FixedWindow {
            pointer: Some(Vec2::new(90.0, 10.0)),
            warps: false,
        });
        let camera = engine.scene.attach("camera", Transform::default());
        let mut controller = CameraController::new(camera, 0.1, 0.5);
        controller.setup(&mut engine, KeyBindings::default()).unwrap();

        engine.run_frame(0.016);
        engine.run_frame(0.016);
        assert_eq!(controller.heading(), 0.0);
        assert_eq!(controller.pitch(), 0.0);
    }

    #[test]
    fn missing_camera_stops_the_task() {
        let mut engine = EngineLoop::new(FixedWindow {
            pointer: None,
            warps: true,
        });
        let camera = engine.scene.attach("camera", Transform::default());
        let mut controller = CameraController::new(camera, 0.1, 0.2);
        controller.setup(&mut engine, KeyBindings::default()).unwrap();

        engine.scene.detach(camera).unwrap();
        engine.run_frame(0.016);
        assert!(!controller.is_active(&engine));
    }
}
