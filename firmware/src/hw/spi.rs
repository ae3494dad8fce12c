// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) bus backends.
//!
//! - `HardwareSpi` drives an SPI peripheral by direct PAC register access, 8-bit frames,
//!   master mode with software slave management.
//! - `CycleDelay` busy-waits in core clock cycles for the software bus settle time.
//!
//! Chip-select lines are plain [`Line`]s owned by the transfer engine.

use core::ops::Deref;
use core::ptr;

use embedded_hal::delay::DelayNs;
use fugit::HertzU32;
use rpmmeter::spi::{LineDirection, SpiError, SpiPhy, TransferConfig};
use stm32f7xx_hal::pac;

use super::gpio::Line;

// CR1 bits not covered by `TransferConfig::cr1_bits`.
const MSTR: u32 = 1 << 2;
const SPE: u32 = 1 << 6;
const SSI: u32 = 1 << 8;
const SSM: u32 = 1 << 9;

// CR2: 8-bit data size, RXNE at a quarter-full FIFO.
const DS_8BIT: u32 = 0b0111 << 8;
const FRXTH: u32 = 1 << 12;

/// Alternate function of the SPI pins on both supported boards.
const SPI_AF: u8 = 5;

/// SPI peripherals this backend can drive.
pub trait SpiInstance: Deref<Target = pac::spi1::RegisterBlock> {
    fn enable_clock();
}

impl SpiInstance for pac::SPI1 {
    fn enable_clock() {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.spi1en().set_bit());
    }
}

impl SpiInstance for pac::SPI4 {
    fn enable_clock() {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.spi4en().set_bit());
    }
}

pub struct HardwareSpi<SPI> {
    spi: SPI,
    sck: Line,
    miso: Line,
    mosi: Line,
}

impl<SPI: SpiInstance> HardwareSpi<SPI> {
    pub fn new(spi: SPI, sck: Line, miso: Line, mosi: Line) -> Self {
        SPI::enable_clock();
        spi.cr1.write(|w| unsafe { w.bits(0) });
        Self {
            spi,
            sck,
            miso,
            mosi,
        }
    }

    pub fn free(self) -> (SPI, Line, Line, Line) {
        (self.spi, self.sck, self.miso, self.mosi)
    }

    /// Spin until the last frame has left the shift register.
    #[inline]
    fn wait_idle(&self) {
        while self.spi.sr.read().bsy().bit_is_set() {}
    }
}

impl<SPI: SpiInstance> SpiPhy for HardwareSpi<SPI> {
    fn attach(&mut self) -> Result<(), SpiError> {
        self.sck.set_alternate(SPI_AF);
        self.miso.set_alternate(SPI_AF);
        self.mosi.set_alternate(SPI_AF);
        self.spi
            .cr2
            .write(|w| unsafe { w.bits(DS_8BIT | FRXTH) });
        Ok(())
    }

    fn setup(&mut self, cfg: &TransferConfig) -> Result<(), SpiError> {
        // The BR field is relative to APB2.
        let cr1 = MSTR | SSM | SSI | u32::from(cfg.cr1_bits());

        // Mode, divider and bit order may only change while the peripheral is disabled.
        self.wait_idle();
        self.spi.cr1.write(|w| unsafe { w.bits(cr1) });
        self.spi.cr1.write(|w| unsafe { w.bits(cr1 | SPE) });
        Ok(())
    }

    fn exchange(&mut self, byte: u8) -> Result<u8, SpiError> {
        let dr = &self.spi.dr as *const _ as *mut u8;

        while self.spi.sr.read().txe().bit_is_clear() {}
        // Byte access so the FIFO takes a single 8-bit frame.
        unsafe { ptr::write_volatile(dr, byte) };

        // No timeout: the flag is set by the peripheral clock, which is assumed never to stall.
        while self.spi.sr.read().rxne().bit_is_clear() {}
        Ok(unsafe { ptr::read_volatile(dr as *const u8) })
    }

    fn release(&mut self) -> Result<(), SpiError> {
        self.wait_idle();
        self.spi.cr1.write(|w| unsafe { w.bits(0) });

        self.sck.set_input();
        self.miso.set_input();
        self.mosi.set_input();
        Ok(())
    }
}

/// Blocking delay counted in core clock cycles.
pub struct CycleDelay {
    cycles_per_us: u32,
}

impl CycleDelay {
    pub fn new(sysclk: HertzU32) -> Self {
        Self {
            cycles_per_us: (sysclk.raw() / 1_000_000).max(1),
        }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (u64::from(ns) * u64::from(self.cycles_per_us)).div_ceil(1000);
        cortex_m::asm::delay(cycles.min(u64::from(u32::MAX)) as u32);
    }
}
