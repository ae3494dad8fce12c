// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Raw GPIO lines.
//!
//! A [`Line`] is one pin driven through its port's MODER/IDR/BSRR registers. It is built by
//! consuming the HAL pin, so ownership still flows from `split()`, but its direction can change
//! at runtime without changing type. The SPI buses need that to release their lines on close.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use rpmmeter::spi::LineDirection;
use stm32f7xx_hal::{gpio, pac};

const GPIO_BASE: usize = 0x4002_0000;
const PORT_STRIDE: usize = 0x400;

const MODE_INPUT: u32 = 0b00;
const MODE_OUTPUT: u32 = 0b01;
const MODE_ALTERNATE: u32 = 0b10;

pub struct Line {
    port: u8,
    pin: u8,
}

impl Line {
    /// Take over a pin in whatever mode the HAL left it.
    pub fn new<const P: char, const N: u8, MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let _ = pin;
        Self {
            port: P as u8 - b'A',
            pin: N,
        }
    }

    /// Take over a pin as a push-pull output, driven high first.
    pub fn output_high<const P: char, const N: u8, MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut line = Self::new(pin);
        line.write(true);
        line.set_mode(MODE_OUTPUT);
        line
    }

    /// Take over a pin as a floating input.
    pub fn input<const P: char, const N: u8, MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut line = Self::new(pin);
        line.set_mode(MODE_INPUT);
        line
    }

    /// Route the line to an on-chip peripheral through alternate function `af`.
    pub fn set_alternate(&mut self, af: u8) {
        let n = u32::from(self.pin);
        let shift = 4 * (n % 8);
        let af = u32::from(af & 0xF);
        let regs = self.regs();

        critical_section::with(|_| {
            if n < 8 {
                regs.afrl
                    .modify(|r, w| unsafe { w.bits((r.bits() & !(0xF << shift)) | (af << shift)) });
            } else {
                regs.afrh
                    .modify(|r, w| unsafe { w.bits((r.bits() & !(0xF << shift)) | (af << shift)) });
            }
        });
        self.set_mode(MODE_ALTERNATE);
    }

    #[inline]
    fn regs(&self) -> &'static pac::gpioa::RegisterBlock {
        let addr = GPIO_BASE + usize::from(self.port) * PORT_STRIDE;
        // Every F7 GPIO port shares the GPIOA register layout.
        unsafe { &*(addr as *const pac::gpioa::RegisterBlock) }
    }

    fn set_mode(&mut self, mode: u32) {
        let shift = 2 * u32::from(self.pin);
        let regs = self.regs();

        // MODER is shared by the whole port.
        critical_section::with(|_| {
            regs.moder
                .modify(|r, w| unsafe { w.bits((r.bits() & !(0b11 << shift)) | (mode << shift)) });
        });
    }

    #[inline]
    fn write(&mut self, high: bool) {
        let bit = if high {
            1 << self.pin
        } else {
            1 << (self.pin + 16)
        };
        self.regs().bsrr.write(|w| unsafe { w.bits(bit) });
    }

    #[inline]
    fn read(&self) -> bool {
        self.regs().idr.read().bits() & (1 << self.pin) != 0
    }
}

impl ErrorType for Line {
    type Error = Infallible;
}

impl OutputPin for Line {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

impl InputPin for Line {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.read())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.read())
    }
}

impl LineDirection for Line {
    fn set_output(&mut self) {
        self.set_mode(MODE_OUTPUT);
    }

    fn set_input(&mut self) {
        self.set_mode(MODE_INPUT);
    }
}
