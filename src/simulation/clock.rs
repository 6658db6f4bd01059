//! Frame-driven generation scheduler
//!
//! The clock decides, once per animation frame, whether the pending buffer
//! should be committed. Advancement is driven by wall-clock time so the
//! generation rate does not depend on the display refresh rate.

/// Running state of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
}

/// Pause/step/rate state machine
#[derive(Debug, Clone)]
pub struct SimulationClock {
    paused: bool,
    single_step_requested: bool,
    frames_per_second: f64,
    last_commit_timestamp: Option<f64>,
}

impl SimulationClock {
    /// Creates a running clock advancing `frames_per_second` generations per second
    ///
    /// # Panics
    /// Panics if the rate is not a positive finite number.
    pub fn new(frames_per_second: f64) -> Self {
        assert!(
            frames_per_second.is_finite() && frames_per_second > 0.0,
            "frames per second must be positive"
        );
        Self {
            paused: false,
            single_step_requested: false,
            frames_per_second,
            last_commit_timestamp: None,
        }
    }

    pub fn state(&self) -> ClockState {
        if self.paused {
            ClockState::Paused
        } else {
            ClockState::Running
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Toggles between running and paused
    pub fn pause(&mut self) -> ClockState {
        self.paused = !self.paused;
        log::debug!("Clock {:?}", self.state());
        self.state()
    }

    /// Requests exactly one commit on the next evaluated frame
    ///
    /// Only honoured while paused; returns whether the request was recorded.
    pub fn step(&mut self) -> bool {
        if self.paused {
            self.single_step_requested = true;
        }
        self.single_step_requested
    }

    pub fn step_requested(&self) -> bool {
        self.single_step_requested
    }

    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// Minimum time between two commits while running
    pub fn commit_interval_ms(&self) -> f64 {
        1000.0 / self.frames_per_second
    }

    /// Sets the rate from user text input
    ///
    /// Anything that does not parse as a positive real number is ignored and
    /// the previous rate is kept. Returns whether the rate changed.
    pub fn set_frames_per_second(&mut self, input: &str) -> bool {
        match input.trim().parse::<f64>() {
            Ok(value) => self.set_rate(value),
            Err(_) => false,
        }
    }

    pub fn set_rate(&mut self, frames_per_second: f64) -> bool {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return false;
        }
        self.frames_per_second = frames_per_second;
        true
    }

    /// Decides whether this frame commits a generation
    ///
    /// `timestamp` is in milliseconds on a monotonic clock. Call exactly once
    /// per frame.
    pub fn tick(&mut self, timestamp: f64) -> bool {
        let Some(last) = self.last_commit_timestamp else {
            self.last_commit_timestamp = Some(timestamp);
            return false;
        };

        if self.single_step_requested {
            self.single_step_requested = false;
            self.last_commit_timestamp = Some(timestamp);
            return true;
        }

        if !self.paused && timestamp - last > self.commit_interval_ms() {
            self.last_commit_timestamp = Some(timestamp);
            return true;
        }

        false
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(10.0)
    }
}
