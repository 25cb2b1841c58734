use std::time::{Duration, Instant};

use log::{debug, info};

use crate::{
    engine::{scene::Scene, window::HostWindow},
    engine_loop::input::KeyboardState,
};

pub mod input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Done,
}

/// Everything a task may touch during one frame.
pub struct FrameContext<'a> {
    pub delta_time: f32,
    pub frame: u64,
    pub window: &'a mut dyn HostWindow,
    pub keyboard: &'a KeyboardState,
    pub scene: &'a mut Scene,
}

type Task = Box<dyn FnMut(&mut FrameContext<'_>) -> TaskStatus>;

/// Named per-frame callbacks, run in insertion order.
#[derive(Default)]
pub struct TaskManager {
    tasks: Vec<(String, Task)>,
}

impl TaskManager {
    pub fn add<F>(&mut self, name: &str, task: F)
    where
        F: FnMut(&mut FrameContext<'_>) -> TaskStatus + 'static,
    {
        debug!("adding task {name}");
        self.tasks.push((name.to_string(), Box::new(task)));
    }

    /// Removes every task called `name`, returning how many went.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|(task_name, _)| task_name != name);
        let removed = before - self.tasks.len();
        debug!("removed {removed} task(s) named {name}");
        removed
    }

    pub fn has(&self, name: &str) -> bool {
        self.tasks.iter().any(|(task_name, _)| task_name == name)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn run(&mut self, ctx: &mut FrameContext<'_>) {
        self.tasks.retain_mut(|(name, task)| match task(ctx) {
            TaskStatus::Continue => true,
            TaskStatus::Done => {
                debug!("task {name} finished");
                false
            }
        });
    }
}

/// Logic side of the engine: window, input, scene and the per-frame tasks.
pub struct EngineLoop<W: HostWindow> {
    pub window: W,
    pub keyboard: KeyboardState,
    pub scene: Scene,
    pub tasks: TaskManager,
    pub last_time: Instant,
    pub max_delta: Option<Duration>,
    pub frame: u64,
    mouse_enabled: bool,
}

impl<W: HostWindow> EngineLoop<W> {
    pub fn new(window: W) -> Self {
        Self {
            window,
            keyboard: KeyboardState::default(),
            scene: Scene::default(),
            tasks: TaskManager::default(),
            last_time: Instant::now(),
            max_delta: None,
            frame: 0,
            mouse_enabled: true,
        }
    }

    /// Stops the engine's own mouse handling so a behaviour can own the pointer.
    pub fn disable_mouse(&mut self) {
        if self.mouse_enabled {
            info!("disabling default mouse handling");
        }
        self.mouse_enabled = false;
    }

    pub fn enable_mouse(&mut self) {
        self.mouse_enabled = true;
    }

    pub fn mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    /// Runs one frame timed against the previous call.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let frame_time = now - self.last_time;
        self.last_time = now;
        self.run_frame(frame_time.as_secs_f32());
    }

    pub fn run_frame(&mut self, delta_time: f32) {
        let delta_time = match self.max_delta {
            Some(max) => delta_time.min(max.as_secs_f32()),
            None => delta_time,
        };

        let mut ctx = FrameContext {
            delta_time,
            frame: self.frame,
            window: &mut self.window,
            keyboard: &self.keyboard,
            scene: &mut self.scene,
        };
        self.tasks.run(&mut ctx);
        self.frame += 1;
    }
}
