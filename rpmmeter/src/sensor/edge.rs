// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Rising-edge detector for the light-barrier input.
//!
//! The main loop samples the sensor pin once per iteration. A low-to-high transition counts one
//! pulse; every `pulses_per_window` pulses the detector reports a completed measurement window
//! and starts the next one from zero.

/// Last sampled sensor level.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Idle,
    High,
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Idle
        }
    }
}

/// Result of feeding one sample to the detector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeEvent {
    /// No rising edge.
    None,
    /// Rising edge inside the current window.
    Pulse,
    /// Rising edge that closed the window; the pulse count is back at zero.
    WindowComplete,
}

pub struct EdgeDetector {
    previous: Level,
    pulses: u32,
    pulses_per_window: u32,
}

impl EdgeDetector {
    /// `pulses_per_window` is clamped to at least one.
    pub fn new(pulses_per_window: u32) -> Self {
        Self {
            previous: Level::Idle,
            pulses: 0,
            pulses_per_window: pulses_per_window.max(1),
        }
    }

    /// Feed one sample of the sensor pin.
    pub fn sample(&mut self, level: Level) -> EdgeEvent {
        let rising = self.previous == Level::Idle && level == Level::High;
        self.previous = level;

        if !rising {
            return EdgeEvent::None;
        }

        self.pulses += 1;
        if self.pulses >= self.pulses_per_window {
            self.pulses = 0;
            EdgeEvent::WindowComplete
        } else {
            EdgeEvent::Pulse
        }
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.previous
    }

    /// Pulses counted in the current window.
    #[inline]
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    #[inline]
    pub fn pulses_per_window(&self) -> u32 {
        self.pulses_per_window
    }

    /// Drop the partial window and forget the last level.
    pub fn reset(&mut self) {
        self.previous = Level::Idle;
        self.pulses = 0;
    }
}
