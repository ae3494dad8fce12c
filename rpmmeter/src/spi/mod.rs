// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # SPI Transfer Engine
//!
//! Four logical SPI channels multiplexed over up to two physical buses: the MCU's SPI peripheral
//! and a bit-banged software bus. Each channel has a static bus binding and its own active-low
//! chip-select line. Clock divider, mode and bit order are chosen per transfer.
//!
//! ```no_run
//! # use rpmmeter::spi::*;
//! # fn demo<HW: SpiPhy, SW: SpiPhy, CS: embedded_hal::digital::OutputPin>(
//! #     hw: HW, sw: SW, cs0: CS, cs1: CS,
//! # ) -> Result<(), SpiError> {
//! let config = SpiConfig::new()
//!     .with_channel(0, BusKind::Software, cs0)
//!     .and_then(|c| c.with_channel(1, BusKind::Hardware, cs1))
//!     .map_err(|_| SpiError::UnknownChannel)?;
//! let mut spi = SpiEngine::new(config, Some(hw), Some(sw)).map_err(|_| SpiError::UnknownChannel)?;
//!
//! spi.open()?;
//! let rx = spi.transfer(0, 0x9F, TransferConfig::default(), true)?;
//! # let _ = rx;
//! spi.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Mode, bit order, clock divider, frame width and per-transfer settings.
//! - [`error`] - Error enums and the numeric last-error codes.
//! - [`phy`] - The physical-bus trait implemented by each bus backend.
//! - [`soft`] - Software (bit-banged) bus over GPIO lines.
//! - [`engine`] - Channel dispatch, chip-select control and the bus lifecycle.

pub mod engine;
pub mod error;
pub mod phy;
pub mod soft;
pub mod types;

pub use engine::{ChannelConfig, SpiConfig, SpiEngine, MAX_CHANNELS};
pub use error::{ConfigError, ErrorCode, SpiError};
pub use phy::{LineDirection, NoBus, SpiPhy};
pub use soft::SoftBus;
pub use types::{BitOrder, BusKind, BusState, ClockDivider, FrameWidth, SpiMode, TransferConfig};
