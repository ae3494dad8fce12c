// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sampling tick on basic timer TIM7, by direct PAC register access.
//!
//! The prescaler makes the counter run at 1 MHz so the auto-reload value is the interval in
//! microseconds minus one.

use fugit::{HertzU32, MicrosDurationU32};
use rpmmeter::timing::TickSource;
use stm32f7xx_hal::pac;

pub struct Tim7Tick {
    tim: pac::TIM7,
    timclk: HertzU32,
}

impl Tim7Tick {
    /// `timclk` is the APB1 timer kernel clock.
    pub fn new(tim: pac::TIM7, timclk: HertzU32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim7en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        Self { tim, timclk }
    }

    pub fn free(self) -> pac::TIM7 {
        self.tim
    }
}

impl TickSource for Tim7Tick {
    fn start(&mut self, interval: MicrosDurationU32) {
        let tim = &self.tim;
        let psc = (self.timclk.raw() / 1_000_000).saturating_sub(1);
        let arr = interval.to_micros().clamp(1, 0x1_0000) - 1;

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr.write(|w| unsafe { w.bits(arr) });

        // Load PSC/ARR now, without raising the update interrupt.
        tim.cr1.modify(|_, w| w.urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());
    }

    #[inline]
    fn clear_interrupt(&mut self) {
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }

    #[inline]
    fn restart(&mut self) {
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
    }
}
