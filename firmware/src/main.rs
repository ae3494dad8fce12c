// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # RPM Meter Firmware
//!
//! Drives the motor with a fixed PWM duty cycle, counts light-barrier pulses against a 100 µs
//! tick and shows measured vs. commanded RPM on the debug terminal. The four-channel SPI engine
//! is opened at startup for attached peripherals.
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release -p firmware --target thumbv7em-none-eabihf
//! ```
//!
//! For the STM32F767ZI devboard:
//!
//! ```bash
//! cargo run --release -p firmware --target thumbv7em-none-eabihf \
//!     --no-default-features --features board-f767zi,debug
//! ```

#![no_main]
#![no_std]

#[cfg(all(feature = "board-f777", feature = "board-f767zi"))]
compile_error!("select exactly one board feature");

use core::cell::RefCell;

use cortex_m::peripheral::NVIC;
use cortex_m_rt::entry;
use critical_section::Mutex;
#[cfg(not(feature = "debug"))]
use panic_halt as _;
#[cfg(feature = "debug")]
use {defmt_rtt as _, panic_probe as _};

use hal::{
    pac::{self, interrupt},
    prelude::*,
    serial::{Config as SerialConfig, Serial},
};
use stm32f7xx_hal as hal;

use rpmmeter::spi::{BusKind, FrameWidth, SoftBus, SpiConfig, SpiEngine, TransferConfig};
use rpmmeter::timing::{PwmGenerator, TickCounter, TickTimer};
use rpmmeter::{Config, Tachometer};

mod hw;
use hw::{
    BoardPins, CycleDelay, FaultLed, HardwareSpi, TerminalDisplay, Tim4Pwm, Tim7Tick, Usart,
    FAULT_LED_ACTIVE,
};

/// JEDEC "read identification" command sent to channel 0 at startup.
const READ_ID: u32 = 0x9F;

static TICKS: TickCounter = TickCounter::new();
static TICK_TIMER: Mutex<RefCell<Option<TickTimer<Tim7Tick>>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cfg = Config::default();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE);
    let mut fault_led = FaultLed::new(pins.fault_led, FAULT_LED_ACTIVE);

    #[cfg(feature = "board-f777")]
    let (display_usart, spi_periph) = (dp.USART1, dp.SPI4);
    #[cfg(feature = "board-f767zi")]
    let (display_usart, spi_periph) = (dp.USART3, dp.SPI1);

    // Display on the debug terminal
    let usart_cfg = SerialConfig {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        display_usart,
        (pins.usart.tx, pins.usart.rx),
        &clocks,
        usart_cfg,
    );
    let display = TerminalDisplay::new(Usart::new(serial));

    // Tick timer
    let mut tick = TickTimer::new(Tim7Tick::new(dp.TIM7, clocks.timclk1()));
    tick.arm(cfg.tick_interval);
    critical_section::with(|cs| TICK_TIMER.borrow_ref_mut(cs).replace(tick));
    unsafe { NVIC::unmask(pac::Interrupt::TIM7) };

    // Motor PWM
    let mut pwm = PwmGenerator::new(Tim4Pwm::new(dp.TIM4, pins.pwm), cfg.pwm.max_rpm);
    let commanded_rpm = match pwm.configure(cfg.pwm.compare) {
        Ok(()) => pwm.commanded_rpm(),
        Err(_) => halt(&mut fault_led),
    };

    // SPI: channels 0/1 on the peripheral, 2/3 bit-banged
    let [cs0, cs1, cs2, cs3] = pins.cs;
    let hw_bus = HardwareSpi::new(
        spi_periph,
        pins.spi_hw.sck,
        pins.spi_hw.miso,
        pins.spi_hw.mosi,
    );
    let sw_bus = SoftBus::new(
        pins.spi_sw.sck,
        pins.spi_sw.mosi,
        pins.spi_sw.miso,
        CycleDelay::new(clocks.sysclk()),
    );
    let spi = SpiConfig::new()
        .with_channel(0, BusKind::Hardware, cs0)
        .and_then(|c| c.with_channel(1, BusKind::Hardware, cs1))
        .and_then(|c| c.with_channel(2, BusKind::Software, cs2))
        .and_then(|c| c.with_channel(3, BusKind::Software, cs3))
        .and_then(|c| SpiEngine::new(c, Some(hw_bus), Some(sw_bus)));
    let mut spi = match spi {
        Ok(spi) => spi,
        Err(_) => halt(&mut fault_led),
    };

    if spi.open().is_ok() {
        let cmd = TransferConfig::default();
        let id = spi
            .transfer(0, READ_ID, cmd, false)
            .and_then(|_| spi.transfer(0, 0, cmd.with_width(FrameWidth::Bits24), true));
        match id {
            #[cfg(feature = "debug")]
            Ok(id) => defmt::info!("spi channel 0 id: {=u32:#x}", id),
            #[cfg(not(feature = "debug"))]
            Ok(_) => {}
            Err(_) => fault_led.set(true),
        }
    }

    // Measurement loop
    let mut tacho = Tachometer::new(pins.sensor, display, &TICKS, &cfg, commanded_rpm);
    let _ = tacho.start();

    loop {
        if let Ok(outcome) = tacho.poll() {
            fault_led.show(outcome);
        }
    }
}

#[interrupt]
fn TIM7() {
    critical_section::with(|cs| {
        if let Some(timer) = TICK_TIMER.borrow_ref_mut(cs).as_mut() {
            timer.on_interrupt(&TICKS);
        }
    });
}

/// Park with the fault LED lit.
fn halt<PIN: embedded_hal::digital::OutputPin>(led: &mut FaultLed<PIN>) -> ! {
    led.set(true);
    loop {
        cortex_m::asm::wfi();
    }
}
