// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! RPM estimation from ticks elapsed over one pulse window.
//!
//! `RPM = round((pulse_scale / ticks) * ticks_per_second * 60)`
//!
//! With the reference constants (scale 25, 10 000 ticks per second) 15 000 ticks give 1000 RPM.
//! Zero ticks means a full window arrived without a single timer tick, which only a glitching or
//! disconnected sensor produces. That window is rejected with [`RpmFault::NoElapsedTicks`].

use fugit::MicrosDurationU32;
use micromath::F32Ext;

const SECONDS_PER_MINUTE: f32 = 60.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RpmConfig {
    /// Rising edges per measurement window.
    pub pulses_per_window: u32,
    /// Pulse-to-revolution scale of the sensor disc, calibrated for the reference hardware.
    pub pulse_scale: f32,
    /// Tick timer rate.
    pub ticks_per_second: u32,
}

impl RpmConfig {
    /// Reference window and scale with the time base of the given tick interval.
    pub fn for_tick_interval(interval: MicrosDurationU32) -> Self {
        let us = interval.to_micros().max(1);
        Self {
            ticks_per_second: 1_000_000 / us,
            ..Self::default()
        }
    }
}

impl Default for RpmConfig {
    fn default() -> Self {
        Self {
            pulses_per_window: 100,
            pulse_scale: 25.0,
            ticks_per_second: 10_000,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RpmFault {
    /// The window closed with a tick count of zero.
    NoElapsedTicks,
}

pub struct RpmEstimator {
    cfg: RpmConfig,
    last_rpm: Option<u32>,
    faults: u32,
}

impl RpmEstimator {
    pub fn new(cfg: RpmConfig) -> Self {
        Self {
            cfg,
            last_rpm: None,
            faults: 0,
        }
    }

    /// Convert the ticks of one closed window into RPM.
    ///
    /// On a fault the previous estimate is kept and the fault counter advances.
    pub fn estimate(&mut self, ticks: u32) -> Result<u32, RpmFault> {
        if ticks == 0 {
            self.faults = self.faults.saturating_add(1);
            return Err(RpmFault::NoElapsedTicks);
        }

        let per_tick = self.cfg.pulse_scale / ticks as f32;
        let rpm = F32Ext::round(per_tick * self.cfg.ticks_per_second as f32 * SECONDS_PER_MINUTE);
        let rpm = rpm as u32;

        self.last_rpm = Some(rpm);
        Ok(rpm)
    }

    /// Last successful estimate.
    #[inline]
    pub fn last_rpm(&self) -> Option<u32> {
        self.last_rpm
    }

    /// Windows rejected since startup.
    #[inline]
    pub fn faults(&self) -> u32 {
        self.faults
    }

    #[inline]
    pub fn config(&self) -> &RpmConfig {
        &self.cfg
    }
}
