// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Physical bus abstraction.
//!
//! The engine drives chip select itself and talks to each bus through [`SpiPhy`]. A bus backend
//! only has to claim its lines, apply per-transfer settings and shift bytes.

use crate::spi::error::SpiError;
use crate::spi::types::TransferConfig;

/// One physical SPI bus (clock, data-out, data-in).
pub trait SpiPhy {
    /// Claim the bus lines: clock and data-out driven low as outputs, data-in as input.
    fn attach(&mut self) -> Result<(), SpiError>;

    /// Apply divider, mode and bit order. Runs before chip select goes active.
    fn setup(&mut self, cfg: &TransferConfig) -> Result<(), SpiError>;

    /// Shift one byte out and return the byte shifted in.
    fn exchange(&mut self, byte: u8) -> Result<u8, SpiError>;

    /// Disable the bus and release every line to high impedance.
    fn release(&mut self) -> Result<(), SpiError>;
}

/// Switches a GPIO line between driven output and high-impedance input.
pub trait LineDirection {
    fn set_output(&mut self);
    fn set_input(&mut self);
}

/// Placeholder for a bus the board does not have. It cannot be constructed.
#[derive(Debug)]
pub enum NoBus {}

impl SpiPhy for NoBus {
    fn attach(&mut self) -> Result<(), SpiError> {
        match *self {}
    }

    fn setup(&mut self, _cfg: &TransferConfig) -> Result<(), SpiError> {
        match *self {}
    }

    fn exchange(&mut self, _byte: u8) -> Result<u8, SpiError> {
        match *self {}
    }

    fn release(&mut self) -> Result<(), SpiError> {
        match *self {}
    }
}
