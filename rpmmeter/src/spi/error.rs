// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SPI error types.
//!
//! Every failed engine operation returns a [`SpiError`] and also stores its [`ErrorCode`] in a
//! single last-error latch shared by all channels. Reading the latch clears it.

/// Failure of an SPI engine operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// `open` while the bus is not closed.
    AlreadyOpen,
    /// Transfer while the bus is closed.
    NotReady,
    /// Reserved for bus backends with a bounded wait.
    Timeout,
    /// A bus or chip-select line reported an error.
    Data,
    /// Channel outside the enabled set.
    UnknownChannel,
}

impl SpiError {
    #[inline]
    pub fn code(self) -> ErrorCode {
        match self {
            SpiError::AlreadyOpen | SpiError::NotReady => ErrorCode::Status,
            SpiError::Timeout => ErrorCode::Timeout,
            SpiError::Data => ErrorCode::Data,
            SpiError::UnknownChannel => ErrorCode::Channel,
        }
    }
}

/// Numeric last-error value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    #[default]
    Ok = 0,
    Status = 1,
    Timeout = 2,
    Data = 3,
    Channel = 4,
}

impl ErrorCode {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }
}

impl From<SpiError> for ErrorCode {
    #[inline]
    fn from(err: SpiError) -> Self {
        err.code()
    }
}

/// Invalid static channel configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel id at or above [`MAX_CHANNELS`](super::MAX_CHANNELS).
    ChannelOutOfRange { channel: u8 },
    /// The same channel was configured twice.
    DuplicateChannel { channel: u8 },
    /// Channel bound to a bus that was not supplied to the engine.
    MissingBus { channel: u8 },
}
