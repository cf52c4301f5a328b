//! Display-synchronized frame clock
//!
//! The clock turns raw frame timestamps into deltas. How frames get scheduled
//! is left to a `FrameScheduler` (requestAnimationFrame in the browser, a
//! manual scheduler in tests).

/// Something that can ask for a callback on the next display refresh
pub trait FrameScheduler {
    /// Identifies an outstanding request so it can be cancelled
    type Handle: Copy;

    /// Request one frame; `None` if the platform refused
    fn request_frame(&mut self) -> Option<Self::Handle>;

    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Delta-time source with at most one frame request in flight
pub struct FrameClock<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    /// Timestamp of the previous frame; `None` right after (re)start
    baseline_ms: Option<f64>,
    running: bool,
    on_tick: Option<Box<dyn FnMut(f64)>>,
}

impl<S: FrameScheduler> FrameClock<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            baseline_ms: None,
            running: false,
            on_tick: None,
        }
    }

    /// Begin delivering `on_tick(delta_ms)` once per frame
    ///
    /// No-op if already running. The first frame only records a baseline.
    pub fn start(&mut self, on_tick: impl FnMut(f64) + 'static) {
        if self.running {
            return;
        }
        self.on_tick = Some(Box::new(on_tick));
        self.running = true;
        self.baseline_ms = None;
        if self.pending.is_none() {
            self.pending = self.scheduler.request_frame();
        }
        log::debug!("Frame clock started");
    }

    /// Cancel the pending frame and forget the baseline; no-op when stopped
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.baseline_ms = None;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        log::debug!("Frame clock stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Deliver a fired frame at `timestamp_ms`
    pub fn on_frame(&mut self, timestamp_ms: f64) {
        self.pending = None;
        if !self.running {
            return;
        }

        if let Some(previous) = self.baseline_ms {
            let delta = (timestamp_ms - previous).max(0.0);
            if let Some(on_tick) = self.on_tick.as_mut() {
                on_tick(delta);
            }
        }
        self.baseline_ms = Some(timestamp_ms);

        if self.running && self.pending.is_none() {
            self.pending = self.scheduler.request_frame();
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
