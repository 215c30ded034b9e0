use crate::config::{EditorConfig, RasterPolicy};

/// Decides when the scene gets rasterized.
///
/// Content changes are debounced: every request pushes the deadline out by
/// `delay`, so a burst of edits produces one raster after it settles. Times are
/// plain seconds supplied by the caller (see [`crate::util::time::current_time_secs`]).
#[derive(Debug, Clone)]
pub struct RasterScheduler {
    policy: RasterPolicy,
    delay: f64,
    due_at: Option<f64>,
    last_live: Option<f64>,
    runs: u64,
}

impl RasterScheduler {
    pub fn new(policy: RasterPolicy, delay_secs: f64) -> Self {
        Self {
            policy,
            delay: delay_secs.max(0.0),
            due_at: None,
            last_live: None,
            runs: 0,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.raster_policy, config.raster_delay_secs())
    }

    /// A content change happened at `now`
    pub fn request(&mut self, now: f64) {
        self.due_at = Some(now + self.delay);
    }

    /// A pointer move happened mid-gesture. Returns whether the live geometry should be
    /// committed and rasterized right away.
    pub fn request_live(&mut self, now: f64) -> bool {
        let RasterPolicy::Throttled { interval_ms } = self.policy else {
            return false;
        };
        let interval = interval_ms as f64 / 1000.0;
        if self.last_live.is_some_and(|last| now - last < interval) {
            return false;
        }
        self.last_live = Some(now);
        self.due_at = Some(now);
        true
    }

    pub fn gesture_ended(&mut self) {
        self.last_live = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due_at.is_some()
    }

    /// Seconds until the pending raster is due, for scheduling a repaint
    pub fn time_until_due(&self, now: f64) -> Option<f64> {
        self.due_at.map(|due| (due - now).max(0.0))
    }

    /// Consumes the pending request if its deadline has passed.
    pub fn take_due(&mut self, now: f64) -> bool {
        match self.due_at {
            Some(due) if now >= due => {
                self.due_at = None;
                self.runs += 1;
                true
            }
            _ => false,
        }
    }

    /// Number of rasters handed out so far
    pub fn runs(&self) -> u64 {
        self.runs
    }
}
