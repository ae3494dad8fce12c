// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART-backed character display.
//!
//! The measured/commanded readout is rendered on an ANSI terminal attached to the debug USART.
//! `home` returns the cursor to the top-left corner so each reading overwrites the last one.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::convert::Infallible;
use nb::block;

use rpmmeter::Display;
use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

const RESET: &str = "\x1b[0m\x1b[?25l";
const CLEAR: &str = "\x1b[2J";
const HOME: &str = "\x1b[H";

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

/// [`Display`] on an ANSI terminal.
pub struct TerminalDisplay<U: Instance> {
    usart: Usart<U>,
}

impl<U: Instance> TerminalDisplay<U> {
    pub fn new(usart: Usart<U>) -> Self {
        Self { usart }
    }

    pub fn free(self) -> Usart<U> {
        self.usart
    }
}

impl<U: Instance> Display for TerminalDisplay<U> {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.usart.write_str(RESET);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.usart.write_str(CLEAR);
        self.usart.write_str(HOME);
        Ok(())
    }

    fn home(&mut self) -> Result<(), Self::Error> {
        self.usart.write_str(HOME);
        Ok(())
    }

    fn text(&mut self, text: &str, len: u8) -> Result<(), Self::Error> {
        for &b in text.as_bytes().iter().take(usize::from(len)) {
            self.usart.write_byte(b);
        }
        Ok(())
    }

    fn uint(&mut self, value: u32, digits: u8) -> Result<(), Self::Error> {
        let mut buf = itoa::Buffer::new();
        let s = buf.format(value);
        for _ in s.len()..usize::from(digits) {
            self.usart.write_byte(b' ');
        }
        self.usart.write_str(s);
        self.usart.flush();
        Ok(())
    }
}
