use std::time::{Duration, Instant};

use log::info;

/// Counts frames and reports the rate once per period.
#[derive(Debug)]
pub struct FPSCounter {
    period: Duration,
    last_instant: Instant,
    frame_count: u32,
}

impl Default for FPSCounter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FPSCounter {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_instant: Instant::now(),
            frame_count: 0,
        }
    }

    pub fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = now.duration_since(self.last_instant);
        if elapsed < self.period {
            return None;
        }

        let fps = self.frame_count as f64 / elapsed.as_secs_f64();
        info!("FPS: {:.2}", fps);
        self.frame_count = 0;
        self.last_instant = now;
        Some(fps)
    }
}
