/// Holds a value that only changes after its input has been quiet for `delay` seconds.
///
/// Every [`Debounced::signal`] restarts the wait. Times are caller-supplied seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounced<T> {
    current: T,
    pending: Option<(T, f64)>,
    delay: f64,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay_secs: f64) -> Self {
        Self {
            current: initial,
            pending: None,
            delay: delay_secs.max(0.0),
        }
    }

    pub fn value(&self) -> &T {
        &self.current
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// New input at `now`. Signalling the settled value again cancels any pending change.
    pub fn signal(&mut self, value: T, now: f64) {
        if value == self.current {
            self.pending = None;
            return;
        }
        if self.pending.as_ref().is_some_and(|(pending, _)| *pending == value) {
            return;
        }
        self.pending = Some((value, now + self.delay));
    }

    /// Applies the pending value once its wait is over. Returns whether the value changed.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.pending.take() {
            Some((value, due)) if now >= due => {
                self.current = value;
                true
            }
            pending => {
                self.pending = pending;
                false
            }
        }
    }

    /// Seconds left before the pending value lands
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.pending.as_ref().map(|(_, due)| (due - now).max(0.0))
    }
}
