// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sensor fault indicator.

use embedded_hal::digital::OutputPin;
use rpmmeter::PollOutcome;

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED lit while the latest measurement window was rejected.
pub struct FaultLed<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    lit: bool,
}

impl<PIN: OutputPin> FaultLed<PIN> {
    /// Create the indicator, initially off.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut led = Self {
            pin,
            active,
            lit: true,
        };
        led.set(false);
        led
    }

    /// Follow a poll result: on for a rejected window, off for a good reading.
    pub fn show(&mut self, outcome: PollOutcome) {
        match outcome {
            PollOutcome::Fault(_) => self.set(true),
            PollOutcome::Reading(_) => self.set(false),
            PollOutcome::Idle | PollOutcome::Pulse => {}
        }
    }

    pub fn set(&mut self, lit: bool) {
        if lit == self.lit {
            return;
        }
        let high = match self.active {
            ActiveLevel::High => lit,
            ActiveLevel::Low => !lit,
        };
        let _ = self.pin.set_state(high.into());
        self.lit = lit;
    }

    #[inline]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}
