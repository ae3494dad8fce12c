// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motor PWM generator.
//!
//! A second hardware timer runs in phase-correct (center-aligned), non-inverting PWM mode. The
//! compare value is the duty-cycle threshold and hardware drives the output pin from then on. The
//! commanded RPM shown on the display is derived from that compare value.

use micromath::F32Ext;

/// Hardware side of the PWM generator.
pub trait PwmTimer {
    /// Counter top: a compare value equal to this is 100 % duty.
    fn period(&self) -> u16;

    /// Put the timer in phase-correct non-inverting PWM mode with `compare` as the threshold and
    /// hand the output pin to the timer.
    fn enable_phase_correct(&mut self, compare: u16);

    /// Update the compare value of a running timer.
    fn set_compare(&mut self, compare: u16);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Compare value above the timer period.
    CompareOutOfRange { compare: u16, period: u16 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PwmConfig {
    /// Compare value applied at startup.
    pub compare: u16,
    /// Motor speed at 100 % duty.
    pub max_rpm: u32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            compare: 23_437,
            max_rpm: 12_000,
        }
    }
}

/// PWM generator bound to a [`PwmTimer`].
pub struct PwmGenerator<T> {
    timer: T,
    max_rpm: u32,
    compare: Option<u16>,
}

impl<T: PwmTimer> PwmGenerator<T> {
    pub fn new(timer: T, max_rpm: u32) -> Self {
        Self {
            timer,
            max_rpm,
            compare: None,
        }
    }

    /// Start phase-correct PWM with `compare` as the duty-cycle threshold.
    pub fn configure(&mut self, compare: u16) -> Result<(), PwmError> {
        self.check(compare)?;
        self.timer.enable_phase_correct(compare);
        self.compare = Some(compare);
        info!(
            "pwm: compare {=u16}/{=u16}, commanded {=u32} rpm",
            compare,
            self.timer.period(),
            self.commanded_rpm()
        );
        Ok(())
    }

    /// Change the duty cycle of a running generator.
    ///
    /// Before [`configure`](Self::configure) this behaves like `configure`.
    pub fn update(&mut self, compare: u16) -> Result<(), PwmError> {
        if self.compare.is_none() {
            return self.configure(compare);
        }
        self.check(compare)?;
        self.timer.set_compare(compare);
        self.compare = Some(compare);
        Ok(())
    }

    /// Active compare value, `None` until configured.
    #[inline]
    pub fn compare(&self) -> Option<u16> {
        self.compare
    }

    /// Commanded motor speed: `round(max_rpm * compare / period)`. Zero until configured.
    pub fn commanded_rpm(&self) -> u32 {
        let period = self.timer.period();
        match self.compare {
            Some(compare) if period > 0 => {
                let duty = compare as f32 / period as f32;
                F32Ext::round(self.max_rpm as f32 * duty) as u32
            }
            _ => 0,
        }
    }

    pub fn free(self) -> T {
        self.timer
    }

    fn check(&self, compare: u16) -> Result<(), PwmError> {
        let period = self.timer.period();
        if compare > period {
            return Err(PwmError::CompareOutOfRange { compare, period });
        }
        Ok(())
    }
}
