// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for STM32F767ZI devboard.

use stm32f7xx_hal::{
    gpio::{gpiod, Alternate},
    pac,
    prelude::*,
};

use super::gpio::Line;
use super::led::ActiveLevel;

/// LD3 (red) is active high on the Nucleo.
pub const FAULT_LED_ACTIVE: ActiveLevel = ActiveLevel::High;

pub struct BoardPins {
    pub sensor: Line,
    pub pwm: gpiod::PD12<Alternate<2>>,
    pub fault_led: Line,
    pub usart: UsartPins,
    pub spi_hw: SpiPins,
    pub spi_sw: SpiPins,
    pub cs: [Line; 4],
}

/// USART3 on the ST-LINK virtual COM port.
pub struct UsartPins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

pub struct SpiPins {
    pub sck: Line,
    pub miso: Line,
    pub mosi: Line,
}

impl BoardPins {
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
            sensor: Line::input(gpioa.pa3),
            pwm: gpiod.pd12.into_alternate::<2>(),
            fault_led: Line::output_high(gpiob.pb14),

            usart: UsartPins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            // SPI1
            spi_hw: SpiPins {
                sck: Line::input(gpioa.pa5),
                miso: Line::input(gpioa.pa6),
                mosi: Line::input(gpioa.pa7),
            },

            spi_sw: SpiPins {
                sck: Line::input(gpioe.pe2),
                miso: Line::input(gpioe.pe5),
                mosi: Line::input(gpioe.pe6),
            },

            cs: [
                Line::output_high(gpioc.pc3),
                Line::output_high(gpiod.pd14),
                Line::output_high(gpioe.pe3),
                Line::output_high(gpiod.pd15),
            ],
        }
    }
}
