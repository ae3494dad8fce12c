// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motor PWM on TIM4 channel 1 in center-aligned mode, by direct PAC register access.
//!
//! Center-aligned mode 1 counts up to ARR and back down, which is the STM32 form of
//! phase-correct PWM. With PWM mode 1 the output is high while the counter is below CCR1.

use rpmmeter::timing::PwmTimer;
use stm32f7xx_hal::{
    gpio::{gpiod, Alternate},
    pac,
};

/// Counter top of the reference configuration.
pub const PWM_TOP: u16 = 46_874;

// CR1
const CEN: u32 = 1 << 0;
const ARPE: u32 = 1 << 7;
const CMS_CENTER_1: u32 = 0b01 << 5;

// CCMR1, output channel 1: PWM mode 1 with preload.
const OC1M_PWM1: u32 = 0b110 << 4;
const OC1PE: u32 = 1 << 3;
const OC1_MASK: u32 = 0xFF;

const CC1E: u32 = 1 << 0;
const CC1P: u32 = 1 << 1;

/// TIM4 driving CH1 on PD12 (AF2).
pub struct Tim4Pwm {
    tim: pac::TIM4,
    _pin: gpiod::PD12<Alternate<2>>,
}

impl Tim4Pwm {
    pub fn new(tim: pac::TIM4, pin: gpiod::PD12<Alternate<2>>) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        // Disable counter while configuring
        tim.cr1.write(|w| unsafe { w.bits(0) });

        Self { tim, _pin: pin }
    }

    pub fn free(self) -> pac::TIM4 {
        self.tim
    }
}

impl PwmTimer for Tim4Pwm {
    #[inline]
    fn period(&self) -> u16 {
        PWM_TOP
    }

    fn enable_phase_correct(&mut self, compare: u16) {
        let tim = &self.tim;

        tim.psc.write(|w| unsafe { w.bits(0) });
        tim.arr.write(|w| unsafe { w.bits(u32::from(PWM_TOP)) });
        tim.ccr1.write(|w| unsafe { w.bits(u32::from(compare)) });

        tim.ccmr1_output()
            .modify(|r, w| unsafe { w.bits((r.bits() & !OC1_MASK) | OC1M_PWM1 | OC1PE) });

        // Non-inverting output on CH1
        tim.ccer
            .modify(|r, w| unsafe { w.bits((r.bits() & !CC1P) | CC1E) });

        // Load the preloaded registers, then start counting.
        tim.egr.write(|w| w.ug().set_bit());
        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.cr1.write(|w| unsafe { w.bits(CMS_CENTER_1 | ARPE | CEN) });
    }

    #[inline]
    fn set_compare(&mut self, compare: u16) {
        self.tim.ccr1.write(|w| unsafe { w.bits(u32::from(compare)) });
    }
}
