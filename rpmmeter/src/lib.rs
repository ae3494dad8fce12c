// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # RPM Meter Core
//!
//! Hardware-independent firmware core for a light-barrier tachometer: a motor is driven at a
//! commanded duty cycle, an optical interrupter produces one pulse per slot, and the measured RPM
//! is shown next to the commanded RPM on an attached display.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`timing`] | Tick counter, tick timer and PWM generator |
//! | [`sensor`] | Edge detection and RPM estimation |
//! | [`spi`] | 4-channel SPI transfer engine over hardware and bit-banged buses |
//! | [`display`] | Character display contract consumed by the main loop |
//! | [`tachometer`] | Main-loop glue: sample, count, estimate, display |
//! | [`config`] | Startup configuration with reference defaults |
//!
//! Everything here is generic over `embedded-hal` 1.0 traits or small crate-local traits, so the
//! board crate supplies the peripherals and the host runs the unit tests.
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Enable `defmt` logging for on-target builds with the `defmt` feature.
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod config;
pub mod display;
pub mod sensor;
pub mod spi;
pub mod tachometer;
pub mod timing;

#[cfg(test)]
mod mock;

pub use config::Config;
pub use display::Display;
pub use tachometer::{PollOutcome, Tachometer, TachometerError};
