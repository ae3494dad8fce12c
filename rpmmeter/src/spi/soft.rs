// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bit-banged SPI bus over three GPIO lines.
//!
//! Used when no hardware peripheral is free or more channels are needed than the peripheral
//! provides. The clock divider has no effect: bits are clocked as fast as the GPIO toggles.
//!
//! Per bit, in the configured bit order:
//!
//! | Mode | Sequence |
//! | ---- | -------- |
//! | 0 | set MOSI, SCK high, sample MISO, SCK low |
//! | 1 | set MOSI, SCK high, settle, SCK low, sample MISO |
//! | 2 | set MOSI, SCK low, sample MISO, SCK high |
//! | 3 | set MOSI, SCK low, settle, SCK high, sample MISO |

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::spi::error::SpiError;
use crate::spi::phy::{LineDirection, SpiPhy};
use crate::spi::types::{BitOrder, SpiMode, TransferConfig};

/// Default wait between the two clock edges in modes 1 and 3.
pub const DEFAULT_SETTLE_NS: u32 = 100;

pub struct SoftBus<SCK, MOSI, MISO, D> {
    sck: SCK,
    mosi: MOSI,
    miso: MISO,
    delay: D,
    settle_ns: u32,
    mode: SpiMode,
    bit_order: BitOrder,
}

impl<SCK, MOSI, MISO, D> SoftBus<SCK, MOSI, MISO, D>
where
    SCK: OutputPin + LineDirection,
    MOSI: OutputPin + LineDirection,
    MISO: InputPin + LineDirection,
    D: DelayNs,
{
    pub fn new(sck: SCK, mosi: MOSI, miso: MISO, delay: D) -> Self {
        Self {
            sck,
            mosi,
            miso,
            delay,
            settle_ns: DEFAULT_SETTLE_NS,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
        }
    }

    pub fn with_settle_ns(mut self, settle_ns: u32) -> Self {
        self.settle_ns = settle_ns;
        self
    }

    #[inline]
    pub fn mode(&self) -> SpiMode {
        self.mode
    }

    #[inline]
    pub fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    pub fn free(self) -> (SCK, MOSI, MISO, D) {
        (self.sck, self.mosi, self.miso, self.delay)
    }

    /// Run one clock cycle: present `out`, toggle the clock and return the sampled input bit.
    fn clock_bit(&mut self, out: bool) -> Result<bool, SpiError> {
        let idle = PinState::from(self.mode.cpol());
        let active = !idle;

        self.mosi.set_state(out.into()).map_err(|_| SpiError::Data)?;
        self.sck.set_state(active).map_err(|_| SpiError::Data)?;

        let bit = if self.mode.cpha() {
            self.delay.delay_ns(self.settle_ns);
            self.sck.set_state(idle).map_err(|_| SpiError::Data)?;
            self.sample()?
        } else {
            let bit = self.sample()?;
            self.sck.set_state(idle).map_err(|_| SpiError::Data)?;
            bit
        };

        Ok(bit)
    }

    #[inline]
    fn sample(&mut self) -> Result<bool, SpiError> {
        self.miso.is_high().map_err(|_| SpiError::Data)
    }
}

impl<SCK, MOSI, MISO, D> SpiPhy for SoftBus<SCK, MOSI, MISO, D>
where
    SCK: OutputPin + LineDirection,
    MOSI: OutputPin + LineDirection,
    MISO: InputPin + LineDirection,
    D: DelayNs,
{
    fn attach(&mut self) -> Result<(), SpiError> {
        self.mosi.set_low().map_err(|_| SpiError::Data)?;
        self.sck.set_low().map_err(|_| SpiError::Data)?;
        self.miso.set_input();
        self.mosi.set_output();
        self.sck.set_output();
        Ok(())
    }

    fn setup(&mut self, cfg: &TransferConfig) -> Result<(), SpiError> {
        self.mode = cfg.mode;
        self.bit_order = cfg.bit_order;

        // Park the clock at its idle level before chip select goes active.
        let idle = PinState::from(self.mode.cpol());
        self.sck.set_state(idle).map_err(|_| SpiError::Data)
    }

    fn exchange(&mut self, byte: u8) -> Result<u8, SpiError> {
        let mut rx = 0u8;
        for n in 0..8 {
            let bit = match self.bit_order {
                BitOrder::MsbFirst => 7 - n,
                BitOrder::LsbFirst => n,
            };
            if self.clock_bit(byte & (1 << bit) != 0)? {
                rx |= 1 << bit;
            }
        }
        Ok(rx)
    }

    fn release(&mut self) -> Result<(), SpiError> {
        self.sck.set_input();
        self.mosi.set_input();
        self.miso.set_input();
        Ok(())
    }
}
