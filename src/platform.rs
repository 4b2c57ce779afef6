//! Console clock, vblank and timing services.

use std::time::{Duration, Instant};

pub trait Platform {
    /// CPU clock in MHz.
    fn set_clock_frequency(&mut self, mhz: u32);
    fn set_vblank_wait(&mut self, wait: bool);
    /// Ticks per second.
    fn tick_resolution(&self) -> u64;
    fn current_tick(&self) -> u64;
    /// Sleep for `ticks`.
    fn idle(&mut self, ticks: u64);
}

/// Desktop platform: microsecond ticks, no clock control. Vblank waiting is
/// recorded for the renderer to pick up.
#[derive(Debug)]
pub struct StdPlatform {
    start: Instant,
    clock_mhz: u32,
    vblank_wait: bool,
}

impl Default for StdPlatform {
    fn default() -> Self {
        StdPlatform {
            start: Instant::now(),
            clock_mhz: 0,
            vblank_wait: false,
        }
    }
}

impl StdPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock_frequency(&self) -> u32 {
        self.clock_mhz
    }

    pub fn vblank_wait(&self) -> bool {
        self.vblank_wait
    }
}

impl Platform for StdPlatform {
    fn set_clock_frequency(&mut self, mhz: u32) {
        if self.clock_mhz != mhz {
            log::debug!("Clock frequency {} MHz requested", mhz);
        }
        self.clock_mhz = mhz;
    }

    fn set_vblank_wait(&mut self, wait: bool) {
        self.vblank_wait = wait;
    }

    fn tick_resolution(&self) -> u64 {
        1_000_000
    }

    fn current_tick(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    fn idle(&mut self, ticks: u64) {
        std::thread::sleep(Duration::from_micros(ticks));
    }
}

/// Holds emulation to `update_freq` frames per second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLimiter {
    ticks_per_update: u64,
    last_tick: Option<u64>,
}

impl FrameLimiter {
    /// An `update_freq` of 0 turns the limiter off.
    pub fn new(update_freq: u32, tick_resolution: u64) -> Self {
        let ticks_per_update = if update_freq == 0 {
            0
        } else {
            tick_resolution / u64::from(update_freq)
        };
        FrameLimiter {
            ticks_per_update,
            last_tick: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ticks_per_update != 0
    }

    pub fn ticks_per_update(&self) -> u64 {
        self.ticks_per_update
    }

    /// Idle until a full update interval has passed since the previous call.
    pub fn wait(&mut self, platform: &mut dyn Platform) {
        if !self.is_enabled() {
            return;
        }
        let now = platform.current_tick();
        if let Some(last) = self.last_tick {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.ticks_per_update {
                platform.idle(self.ticks_per_update - elapsed);
                self.last_tick = Some(last + self.ticks_per_update);
                return;
            }
        }
        self.last_tick = Some(now);
    }
}

/// Frames counted over one-second windows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FpsCounter {
    window_start: Option<u64>,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&mut self, now: u64, tick_resolution: u64) {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        if now.saturating_sub(start) >= tick_resolution {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Some(now);
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPlatform;

    #[test]
    fn test_limiter_ticks_per_update() {
        assert_eq!(FrameLimiter::new(60, 1_000_000).ticks_per_update(), 16_666);
        assert_eq!(FrameLimiter::new(50, 1_000_000).ticks_per_update(), 20_000);
        assert!(!FrameLimiter::new(0, 1_000_000).is_enabled());
    }

    #[test]
    fn test_limiter_idles_remaining_time() {
        let mut platform = MockPlatform::default();
        let mut limiter = FrameLimiter::new(50, platform.tick_resolution());
        limiter.wait(&mut platform);
        assert_eq!(platform.idled, 0);

        platform.tick += 5_000;
        limiter.wait(&mut platform);
        assert_eq!(platform.idled, 15_000);

        // a slow frame resets the schedule without idling
        platform.tick += 50_000;
        limiter.wait(&mut platform);
        assert_eq!(platform.idled, 15_000);
    }

    #[test]
    fn test_disabled_limiter_never_idles() {
        let mut platform = MockPlatform::default();
        let mut limiter = FrameLimiter::new(0, platform.tick_resolution());
        limiter.wait(&mut platform);
        limiter.wait(&mut platform);
        assert_eq!(platform.idled, 0);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::new();
        for i in 0..=60u64 {
            fps.frame(i * 16_667, 1_000_000);
        }
        assert_eq!(fps.fps(), 61);
    }
}
