// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Startup configuration.
//!
//! All values are fixed at startup. [`Config::default`] reproduces the reference hardware: a
//! 100 µs tick, 100-pulse measurement windows, a 25-pulse scale constant, PWM compare 23 437 of
//! 46 874 and a 12 000 RPM motor.

use fugit::{ExtU32, MicrosDurationU32};

use crate::display::DisplayLayout;
use crate::sensor::RpmConfig;
use crate::timing::PwmConfig;

/// Tick interval of the reference sampling timer.
pub const DEFAULT_TICK_INTERVAL_US: u32 = 100;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Config {
    /// Period of the tick timer interrupt.
    pub tick_interval: MicrosDurationU32,
    pub rpm: RpmConfig,
    pub pwm: PwmConfig,
    pub layout: DisplayLayout,
}

impl Config {
    /// Build a configuration around a tick interval, deriving the RPM time base from it.
    pub fn with_tick_interval(tick_interval: MicrosDurationU32) -> Self {
        Self {
            tick_interval,
            rpm: RpmConfig::for_tick_interval(tick_interval),
            pwm: PwmConfig::default(),
            layout: DisplayLayout::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_tick_interval(DEFAULT_TICK_INTERVAL_US.micros())
    }
}
