use freefly_camera::{
    CameraAction, CameraController, Error, KeyBindings,
    engine::{
        scene::{NodeId, Transform},
        window::{HostWindow, WindowProperties},
    },
    engine_loop::EngineLoop,
};
use glam::{UVec2, Vec2, Vec3};
use winit::keyboard::KeyCode;

#[derive(Default)]
struct MockWindow {
    pointer: Option<Vec2>,
    refuse_warp: bool,
    warps: Vec<UVec2>,
    requests: Vec<WindowProperties>,
}

impl MockWindow {
    fn centered() -> Self {
        Self {
            pointer: Some(Vec2::new(400.0, 300.0)),
            ..Default::default()
        }
    }

    fn nudge(&mut self, dx: f32, dy: f32) {
        self.pointer = Some(Vec2::new(400.0 + dx, 300.0 + dy));
    }
}

impl HostWindow for MockWindow {
    fn request_properties(&mut self, properties: WindowProperties) {
        self.requests.push(properties);
    }

    fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    fn size(&self) -> UVec2 {
        UVec2::new(800, 600)
    }

    fn move_pointer(&mut self, position: UVec2) -> bool {
        if self.refuse_warp {
            return false;
        }
        self.warps.push(position);
        self.pointer = Some(position.as_vec2());
        true
    }
}

fn engine_with_camera() -> (EngineLoop<MockWindow>, NodeId) {
    let mut engine = EngineLoop::new(MockWindow::centered());
    let camera = engine.scene.attach("camera", Transform::default());
    (engine, camera)
}

fn position(engine: &EngineLoop<MockWindow>, camera: NodeId) -> Vec3 {
    engine.scene.transform(camera).unwrap().position
}

fn assert_close(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-4,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn setup_hides_cursor_and_registers_one_task() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 0.2);

    controller.setup(&mut engine, KeyBindings::default()).unwrap();
    controller.setup(&mut engine, KeyBindings::default()).unwrap();

    assert!(controller.is_active(&engine));
    assert_eq!(engine.tasks.len(), 1);
    assert!(!engine.mouse_enabled());
    assert_eq!(
        engine.window.requests.last(),
        Some(&WindowProperties::cursor_hidden(true))
    );
}

#[test]
fn unknown_key_leaves_host_untouched() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 0.2);
    let keys = KeyBindings::from_pairs([("w", CameraAction::Forward), ("warp", CameraAction::Up)]);

    let err = controller.setup(&mut engine, keys).unwrap_err();

    assert!(matches!(err, Error::UnknownKey(name) if name == "warp"));
    assert!(engine.tasks.is_empty());
    assert!(engine.window.requests.is_empty());
    assert!(engine.mouse_enabled());
}

#[test]
fn held_key_moves_linearly_with_time() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 0.2);
    controller.setup(&mut engine, KeyBindings::default()).unwrap();

    engine.keyboard.press(KeyCode::KeyW);
    engine.run_frame(0.5);
    // 0.5s * 0.1 * 60
    assert_close(position(&engine, camera), Vec3::new(0.0, 3.0, 0.0));

    engine.run_frame(0.25);
    assert_close(position(&engine, camera), Vec3::new(0.0, 4.5, 0.0));

    engine.keyboard.release(KeyCode::KeyW);
    engine.run_frame(1.0);
    assert_close(position(&engine, camera), Vec3::new(0.0, 4.5, 0.0));
}

#[test]
fn every_action_moves_along_its_axis() {
    let cases = [
        (KeyCode::KeyW, Vec3::Y),
        (KeyCode::KeyS, Vec3::NEG_Y),
        (KeyCode::KeyA, Vec3::NEG_X),
        (KeyCode::KeyD, Vec3::X),
        (KeyCode::Space, Vec3::Z),
        (KeyCode::ShiftLeft, Vec3::NEG_Z),
    ];
    for (key, axis) in cases {
        let (mut engine, camera) = engine_with_camera();
        let mut controller = CameraController::new(camera, 1.0, 0.2);
        controller.setup(&mut engine, KeyBindings::default()).unwrap();

        engine.keyboard.press(key);
        engine.run_frame(1.0 / 60.0);
        assert_close(position(&engine, camera), axis);
    }
}

#[test]
fn opposite_keys_cancel() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 0.2);
    controller.setup(&mut engine, KeyBindings::default()).unwrap();

    engine.keyboard.press(KeyCode::KeyA);
    engine.keyboard.press(KeyCode::KeyD);
    engine.keyboard.press(KeyCode::Space);
    engine.keyboard.press(KeyCode::ShiftLeft);
    engine.run_frame(1.0);

    assert_close(position(&engine, camera), Vec3::ZERO);
}

#[test]
fn mouse_deltas_accumulate_without_clamping() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 0.5);
    controller.setup(&mut engine, KeyBindings::default()).unwrap();

    for _ in 0..10 {
        engine.window.nudge(100.0, -40.0);
        engine.run_frame(0.016);
    }

    assert_eq!(controller.heading(), -500.0);
    assert_eq!(controller.pitch(), 200.0);
    let hpr = engine.scene.transform(camera).unwrap().hpr;
    assert_eq!(hpr, Vec3::new(-500.0, 200.0, 0.0));
    assert!(engine.window.warps.iter().all(|w| *w == UVec2::new(400, 300)));
}

#[test]
fn rotation_applies_before_movement() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 1.0);
    controller.setup(&mut engine, KeyBindings::default()).unwrap();

    // turn 90 degrees left and step forward in the same frame
    engine.window.nudge(-90.0, 0.0);
    engine.keyboard.press(KeyCode::KeyW);
    engine.run_frame(1.0 / 6.0);

    assert_close(position(&engine, camera), Vec3::new(-1.0, 0.0, 0.0));
}

#[test]
fn refused_warp_still_moves() {
    let (mut engine, camera) = engine_with_camera();
    engine.window.refuse_warp = true;
    let mut controller = CameraController::new(camera, 0.1, 0.2);
    controller.setup(&mut engine, KeyBindings::default()).unwrap();

    engine.window.nudge(50.0, 50.0);
    engine.keyboard.press(KeyCode::KeyD);
    engine.run_frame(1.0);

    assert_eq!(controller.heading(), 0.0);
    assert_eq!(controller.pitch(), 0.0);
    assert_close(position(&engine, camera), Vec3::new(6.0, 0.0, 0.0));
}

#[test]
fn unknown_pointer_recentres_without_turning() {
    let mut engine = EngineLoop::new(MockWindow::default());
    let camera = engine.scene.attach("camera", Transform::default());
    let mut controller = CameraController::new(camera, 0.1, 0.2);
    controller.setup(&mut engine, KeyBindings::default()).unwrap();

    engine.run_frame(0.016);

    assert_eq!(engine.window.warps, vec![UVec2::new(400, 300)]);
    assert_eq!(controller.heading(), 0.0);
    assert_eq!(controller.pitch(), 0.0);
}

#[test]
fn velocity_change_applies_next_frame() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 0.2);
    controller.setup(&mut engine, KeyBindings::default()).unwrap();
    engine.keyboard.press(KeyCode::KeyW);

    controller.set_velocity(0.5);
    controller.set_mouse_sensitivity(0.9);
    engine.run_frame(0.1);

    assert_eq!(controller.velocity(), 0.5);
    assert_eq!(controller.mouse_sensitivity(), 0.9);
    assert_close(position(&engine, camera), Vec3::new(0.0, 3.0, 0.0));
}

#[test]
fn disable_stops_updates_until_setup() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 0.2);
    controller.setup(&mut engine, KeyBindings::default()).unwrap();
    engine.keyboard.press(KeyCode::KeyW);

    assert!(!engine.mouse_enabled());

    controller.disable(&mut engine);
    assert!(!controller.is_active(&engine));
    assert!(engine.mouse_enabled());
    assert_eq!(
        engine.window.requests.last(),
        Some(&WindowProperties::cursor_hidden(false))
    );
    engine.run_frame(1.0);
    assert_close(position(&engine, camera), Vec3::ZERO);

    controller.setup(&mut engine, KeyBindings::default()).unwrap();
    assert!(!engine.mouse_enabled());
    engine.run_frame(1.0);
    assert_close(position(&engine, camera), Vec3::new(0.0, 6.0, 0.0));
}

#[test]
fn destroy_removes_only_its_own_task() {
    let (mut engine, camera) = engine_with_camera();
    let mut first = CameraController::new(camera, 0.1, 0.2);
    let mut second = CameraController::new(camera, 0.1, 0.2);
    first.setup(&mut engine, KeyBindings::default()).unwrap();
    second.setup(&mut engine, KeyBindings::default()).unwrap();
    assert_eq!(engine.tasks.len(), 2);

    first.destroy(&mut engine);

    assert_eq!(engine.tasks.len(), 1);
    assert!(second.is_active(&engine));
}

#[test]
fn custom_bindings_replace_defaults() {
    let (mut engine, camera) = engine_with_camera();
    let mut controller = CameraController::new(camera, 0.1, 0.2);
    let keys = KeyBindings::from_pairs([
        ("arrow_up", CameraAction::Forward),
        ("e", CameraAction::Up),
    ]);
    controller.setup(&mut engine, keys.clone()).unwrap();
    assert_eq!(controller.keys(), Some(&keys));

    engine.keyboard.press(KeyCode::KeyW);
    engine.run_frame(1.0);
    assert_close(position(&engine, camera), Vec3::ZERO);

    engine.keyboard.press(KeyCode::ArrowUp);
    engine.keyboard.press(KeyCode::KeyE);
    engine.keyboard.press(KeyCode::ControlLeft);
    engine.run_frame(1.0);
    assert_close(position(&engine, camera), Vec3::new(0.0, 6.0, 6.0));
}
