// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Timing
//!
//! The two autonomous timer functions of the tachometer.
//!
//! ## Modules
//!
//! - [`tick`] - Free-running tick counter fed by a periodic timer interrupt.
//! - [`pwm`] - Phase-correct PWM generator driving the motor at a commanded duty cycle.

pub mod pwm;
pub mod tick;

pub use pwm::{PwmConfig, PwmError, PwmGenerator, PwmTimer};
pub use tick::{TickCounter, TickSource, TickTimer};
