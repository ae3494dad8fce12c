// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Light-Barrier Sensor
//!
//! ## Modules
//!
//! - [`edge`] - Rising-edge detector and pulse window counter.
//! - [`rpm`] - Conversion of elapsed ticks per window into RPM.

pub mod edge;
pub mod rpm;

pub use edge::{EdgeDetector, EdgeEvent, Level};
pub use rpm::{RpmConfig, RpmEstimator, RpmFault};
