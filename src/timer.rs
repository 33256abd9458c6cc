/// Per-question countdown clock, driven by the event-loop tick.
///
/// The timer never schedules anything itself; the session controller feeds it
/// elapsed milliseconds and reacts to the edge-triggered expiry. Stopping an
/// already-stopped timer is a no-op, and a restart always re-arms the full
/// duration.
#[derive(Clone, Copy, Debug)]
pub struct CountdownTimer {
    duration_ms: u64,
    remaining_ms: u64,
    running: bool,
    fired: bool,
}

impl CountdownTimer {
    pub fn new(seconds: u64) -> Self {
        Self {
            duration_ms: seconds * 1000,
            remaining_ms: seconds * 1000,
            running: false,
            fired: false,
        }
    }

    pub fn start(&mut self) {
        self.remaining_ms = self.duration_ms;
        self.fired = false;
        self.running = true;
    }

    /// Alias that reads better at call sites re-arming for a fresh question.
    pub fn restart(&mut self) {
        self.start();
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance the clock by `elapsed_ms`. Returns true exactly once, on the
    /// tick where the count reaches zero. A stopped timer never fires.
    pub fn tick(&mut self, elapsed_ms: u64) -> bool {
        if !self.running || self.fired {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        if self.remaining_ms == 0 {
            self.fired = true;
            self.running = false;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Whole seconds left, rounded up so the display reaches 0 only at expiry.
    pub fn seconds_remaining(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }
}
