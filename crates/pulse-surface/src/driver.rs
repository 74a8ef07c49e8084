//! Host-surface lifecycle and the visibility-gated frame timer.
//!
//! The host reports surface events; the driver turns them into explicit
//! state: `Hidden -> Visible` starts the frame timer, `Visible -> Hidden`
//! stops it. Each tick asks the params source for the current set, renders
//! one frame and hands it to the presenter. The frame timer knows nothing
//! about modes; the reroll timer knows nothing about visibility.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use pulse_control::{ParamsSource, RepeatingTask};
use pulse_core::PatternEngine;

use crate::config::DriverConfig;
use crate::presenter::Presenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State reachable from the timer thread.
struct Shared<P> {
    source: Arc<dyn ParamsSource>,
    engine: PatternEngine,
    presenter: Mutex<P>,
    size: Mutex<Option<(u32, u32)>>,
    start: Instant,
    presented: AtomicU64,
    skipped: AtomicU64,
}

impl<P: Presenter> Shared<P> {
    fn tick(&self) -> bool {
        let Some((width, height)) = *lock(&self.size) else {
            log::debug!("Tick skipped: no surface");
            self.skipped.fetch_add(1, Ordering::Relaxed);
            return false;
        };

        let params = self.source.current_params();
        let elapsed = self.start.elapsed().as_secs_f64();
        let frame = self.engine.render(&params, elapsed, width as f64, height as f64);

        match lock(&self.presenter).present(&frame) {
            Ok(()) => {
                self.presented.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(e) => {
                log::warn!("Frame present failed: {}", e);
                self.skipped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }
}

pub struct FrameDriver<P: Presenter + 'static> {
    shared: Arc<Shared<P>>,
    config: DriverConfig,
    visibility: Visibility,
    destroyed: bool,
    timer: Option<RepeatingTask>,
}

impl<P: Presenter + 'static> FrameDriver<P> {
    /// Animation time starts now.
    pub fn new(source: Arc<dyn ParamsSource>, presenter: P, config: DriverConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                engine: PatternEngine::with_point_budget(config.max_points_per_frame),
                presenter: Mutex::new(presenter),
                size: Mutex::new(None),
                start: Instant::now(),
                presented: AtomicU64::new(0),
                skipped: AtomicU64::new(0),
            }),
            config,
            visibility: Visibility::Hidden,
            destroyed: false,
            timer: None,
        }
    }

    pub fn on_surface_ready(&mut self, width: u32, height: u32) {
        if self.destroyed {
            log::warn!("Surface ready after destroy, ignoring");
            return;
        }
        log::info!("Surface ready: {}x{}", width, height);
        self.set_size(width, height);
    }

    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        if self.destroyed {
            return;
        }
        log::debug!("Surface resized: {}x{}", width, height);
        self.set_size(width, height);
    }

    pub fn on_visibility_changed(&mut self, visible: bool) {
        if self.destroyed {
            return;
        }
        match (self.visibility, visible) {
            (Visibility::Hidden, true) => {
                self.visibility = Visibility::Visible;
                self.start_timer();
            }
            (Visibility::Visible, false) => {
                self.visibility = Visibility::Hidden;
                self.stop_timer();
            }
            _ => {}
        }
    }

    /// Stop drawing for good. Later events are ignored.
    pub fn on_surface_destroyed(&mut self) {
        self.stop_timer();
        self.visibility = Visibility::Hidden;
        self.destroyed = true;
        *lock(&self.shared.size) = None;
        log::info!(
            "Surface destroyed after {} frames ({} skipped)",
            self.frames_presented(),
            self.frames_skipped()
        );
    }

    /// Render and present one frame right now. Returns whether a frame was
    /// presented. Skips without error when there is no surface.
    pub fn tick(&self) -> bool {
        self.shared.tick()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_animating(&self) -> bool {
        self.timer.as_ref().map_or(false, RepeatingTask::is_running)
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        *lock(&self.shared.size)
    }

    pub fn frames_presented(&self) -> u64 {
        self.shared.presented.load(Ordering::Relaxed)
    }

    pub fn frames_skipped(&self) -> u64 {
        self.shared.skipped.load(Ordering::Relaxed)
    }

    /// Run `f` with the presenter locked, e.g. to save a snapshot.
    pub fn with_presenter<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        f(&mut lock(&self.shared.presenter))
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if let Err(e) = lock(&self.shared.presenter).resize(width, height) {
            log::warn!("Presenter resize to {}x{} failed: {}", width, height, e);
        }
        *lock(&self.shared.size) = if width == 0 || height == 0 { None } else { Some((width, height)) };
    }

    fn start_timer(&mut self) {
        // The first frame is drawn immediately, then once per interval.
        self.shared.tick();
        let shared = self.shared.clone();
        self.timer = Some(RepeatingTask::start(
            "pulse-frames",
            self.config.frame_interval,
            move || {
                shared.tick();
                true
            },
        ));
    }

    fn stop_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
        }
    }
}

impl<P: Presenter + 'static> Drop for FrameDriver<P> {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
