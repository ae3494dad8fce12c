// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 tachometer board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiod, Alternate},
    pac,
    prelude::*,
};

use super::gpio::Line;
use super::led::ActiveLevel;

/// Wiring of the fault LED.
pub const FAULT_LED_ACTIVE: ActiveLevel = ActiveLevel::Low;

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    /// Light-barrier output.
    pub sensor: Line,
    /// TIM4_CH1 motor PWM.
    pub pwm: gpiod::PD12<Alternate<2>>,
    pub fault_led: Line,
    pub usart: UsartPins,
    pub spi_hw: SpiPins,
    pub spi_sw: SpiPins,
    /// Chip selects of logical channels 0..3.
    pub cs: [Line; 4],
}

/// USART1 TX/RX (debug terminal).
pub struct UsartPins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// SCK/MISO/MOSI, released to inputs until the bus is opened.
pub struct SpiPins {
    pub sck: Line,
    pub miso: Line,
    pub mosi: Line,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(
        gpioa: pac::GPIOA,
        gpiob: pac::GPIOB,
        gpioc: pac::GPIOC,
        gpiod: pac::GPIOD,
        gpioe: pac::GPIOE,
    ) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            sensor: Line::input(gpioa.pa0),
            pwm: gpiod.pd12.into_alternate::<2>(),
            fault_led: Line::output_high(gpiod.pd8),

            usart: UsartPins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            // SPI4
            spi_hw: SpiPins {
                sck: Line::input(gpioe.pe12),
                miso: Line::input(gpioe.pe13),
                mosi: Line::input(gpioe.pe14),
            },

            spi_sw: SpiPins {
                sck: Line::input(gpiob.pb13),
                miso: Line::input(gpiob.pb14),
                mosi: Line::input(gpiob.pb15),
            },

            cs: [
                Line::output_high(gpioe.pe4),
                Line::output_high(gpioe.pe11),
                Line::output_high(gpiob.pb12),
                Line::output_high(gpioc.pc4),
            ],
        }
    }
}
