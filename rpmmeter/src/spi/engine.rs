// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Channel dispatch and bus lifecycle.
//!
//! The engine owns both physical buses and every channel's chip-select line. The bus state is
//! a single `Closed`/`Ready` flag: `open` attaches every present bus, `close` releases them all.
//! Chip select is active low.

use embedded_hal::digital::OutputPin;

use crate::spi::error::{ConfigError, ErrorCode, SpiError};
use crate::spi::phy::SpiPhy;
use crate::spi::types::{BitOrder, BusKind, BusState, TransferConfig};

/// Number of logical channel slots.
pub const MAX_CHANNELS: usize = 4;

/// Static binding of one logical channel.
#[derive(Debug)]
pub struct ChannelConfig<CS> {
    pub bus: BusKind,
    pub cs: CS,
}

/// Startup channel table. Slots left empty are disabled channels.
pub struct SpiConfig<CS> {
    channels: [Option<ChannelConfig<CS>>; MAX_CHANNELS],
}

impl<CS> SpiConfig<CS> {
    pub fn new() -> Self {
        Self {
            channels: core::array::from_fn(|_| None),
        }
    }

    /// Enable `channel` on `bus` with chip-select line `cs`.
    pub fn with_channel(mut self, channel: u8, bus: BusKind, cs: CS) -> Result<Self, ConfigError> {
        let slot = self
            .channels
            .get_mut(usize::from(channel))
            .ok_or(ConfigError::ChannelOutOfRange { channel })?;

        if slot.is_some() {
            return Err(ConfigError::DuplicateChannel { channel });
        }
        *slot = Some(ChannelConfig { bus, cs });

        Ok(self)
    }

    pub fn is_enabled(&self, channel: u8) -> bool {
        matches!(self.channels.get(usize::from(channel)), Some(Some(_)))
    }
}

impl<CS> Default for SpiConfig<CS> {
    fn default() -> Self {
        Self::new()
    }
}

/// Four-channel SPI transfer engine over a hardware bus `HW` and a software bus `SW`.
///
/// Use [`NoBus`](crate::spi::NoBus) for a bus the board does not have.
pub struct SpiEngine<HW, SW, CS> {
    hw: Option<HW>,
    sw: Option<SW>,
    channels: [Option<ChannelConfig<CS>>; MAX_CHANNELS],
    state: BusState,
    last_error: ErrorCode,
}

impl<HW, SW, CS> SpiEngine<HW, SW, CS>
where
    HW: SpiPhy,
    SW: SpiPhy,
    CS: OutputPin,
{
    /// Build the engine in the `Closed` state. Fails if a channel is bound to an absent bus.
    pub fn new(config: SpiConfig<CS>, hw: Option<HW>, sw: Option<SW>) -> Result<Self, ConfigError> {
        for (id, slot) in config.channels.iter().enumerate() {
            let Some(ch) = slot else { continue };
            let present = match ch.bus {
                BusKind::Hardware => hw.is_some(),
                BusKind::Software => sw.is_some(),
            };
            if !present {
                return Err(ConfigError::MissingBus { channel: id as u8 });
            }
        }

        Ok(Self {
            hw,
            sw,
            channels: config.channels,
            state: BusState::Closed,
            last_error: ErrorCode::Ok,
        })
    }

    /// Attach the buses and deselect every enabled channel.
    ///
    /// Fails with [`SpiError::AlreadyOpen`] unless the bus is closed. In that case no line is
    /// touched. If a bus or chip select fails to come up, both buses are released again and the
    /// engine stays closed.
    pub fn open(&mut self) -> Result<(), SpiError> {
        let result = self.try_open();
        self.record(result)
    }

    fn try_open(&mut self) -> Result<(), SpiError> {
        if self.state != BusState::Closed {
            return Err(SpiError::AlreadyOpen);
        }

        if let Err(e) = self.attach_all() {
            // Stay closed with every bus line released.
            self.release_buses();
            return Err(e);
        }

        self.state = BusState::Ready;
        info!("spi: open");
        Ok(())
    }

    fn attach_all(&mut self) -> Result<(), SpiError> {
        if let Some(hw) = self.hw.as_mut() {
            hw.attach()?;
        }
        if let Some(sw) = self.sw.as_mut() {
            sw.attach()?;
        }
        for ch in self.channels.iter_mut().flatten() {
            ch.cs.set_high().map_err(|_| SpiError::Data)?;
        }
        Ok(())
    }

    fn release_buses(&mut self) {
        if let Some(hw) = self.hw.as_mut() {
            let _ = hw.release();
        }
        if let Some(sw) = self.sw.as_mut() {
            let _ = sw.release();
        }
    }

    /// Run one transfer of `cfg.width` bits on `channel` and return the bits clocked in.
    ///
    /// Chip select goes low before the first byte. With `terminate` it goes high again after the
    /// last one; otherwise it stays low so the next call continues the same transaction. A failed
    /// transfer always deselects.
    pub fn transfer(
        &mut self,
        channel: u8,
        data: u32,
        cfg: TransferConfig,
        terminate: bool,
    ) -> Result<u32, SpiError> {
        let result = self.try_transfer(channel, data, &cfg, terminate);
        self.record(result)
    }

    fn try_transfer(
        &mut self,
        channel: u8,
        data: u32,
        cfg: &TransferConfig,
        terminate: bool,
    ) -> Result<u32, SpiError> {
        let Self {
            hw,
            sw,
            channels,
            state,
            ..
        } = self;

        let ch = channels
            .get_mut(usize::from(channel))
            .and_then(Option::as_mut)
            .ok_or(SpiError::UnknownChannel)?;

        if *state != BusState::Ready {
            return Err(SpiError::NotReady);
        }

        // Bus presence was checked in `new`.
        match ch.bus {
            BusKind::Hardware => {
                let phy = hw.as_mut().ok_or(SpiError::UnknownChannel)?;
                select_and_shift(phy, &mut ch.cs, data, cfg, terminate)
            }
            BusKind::Software => {
                let phy = sw.as_mut().ok_or(SpiError::UnknownChannel)?;
                select_and_shift(phy, &mut ch.cs, data, cfg, terminate)
            }
        }
    }

    /// Release every bus line, deselect every channel and return to `Closed`.
    ///
    /// Release failures are recorded in the last-error latch; the bus is closed regardless.
    pub fn close(&mut self) {
        let mut result = Ok(());
        if let Some(hw) = self.hw.as_mut() {
            result = result.and(hw.release());
        }
        if let Some(sw) = self.sw.as_mut() {
            result = result.and(sw.release());
        }
        for ch in self.channels.iter_mut().flatten() {
            if ch.cs.set_high().is_err() {
                result = result.and(Err(SpiError::Data));
            }
        }

        self.state = BusState::Closed;
        info!("spi: closed");
        let _ = self.record(result);
    }

    /// Return the last error code and reset the latch to [`ErrorCode::Ok`].
    pub fn take_last_error(&mut self) -> ErrorCode {
        core::mem::take(&mut self.last_error)
    }

    #[inline]
    pub fn state(&self) -> BusState {
        self.state
    }

    pub fn is_enabled(&self, channel: u8) -> bool {
        self.channel_bus(channel).is_some()
    }

    pub fn channel_bus(&self, channel: u8) -> Option<BusKind> {
        self.channels
            .get(usize::from(channel))
            .and_then(Option::as_ref)
            .map(|ch| ch.bus)
    }

    /// Give back the buses and the channel table.
    pub fn free(self) -> (Option<HW>, Option<SW>, SpiConfig<CS>) {
        (
            self.hw,
            self.sw,
            SpiConfig {
                channels: self.channels,
            },
        )
    }

    fn record<T>(&mut self, result: Result<T, SpiError>) -> Result<T, SpiError> {
        if let Err(err) = &result {
            self.last_error = err.code();
            warn!("spi: {}", err);
        }
        result
    }
}

fn select_and_shift<P: SpiPhy, CS: OutputPin>(
    phy: &mut P,
    cs: &mut CS,
    data: u32,
    cfg: &TransferConfig,
    terminate: bool,
) -> Result<u32, SpiError> {
    let shifted = setup_and_shift(phy, cs, data, cfg);

    // A held chip select from an earlier unterminated call is dropped on any failure.
    let deselect = if terminate || shifted.is_err() {
        cs.set_high().map_err(|_| SpiError::Data)
    } else {
        Ok(())
    };

    let rx = shifted?;
    deselect?;
    Ok(rx)
}

fn setup_and_shift<P: SpiPhy, CS: OutputPin>(
    phy: &mut P,
    cs: &mut CS,
    data: u32,
    cfg: &TransferConfig,
) -> Result<u32, SpiError> {
    phy.setup(cfg)?;
    cs.set_low().map_err(|_| SpiError::Data)?;
    shift_frame(phy, data, cfg)
}

/// Exchange the frame byte by byte. MSB-first sends the high byte first, LSB-first the low byte.
fn shift_frame<P: SpiPhy>(phy: &mut P, data: u32, cfg: &TransferConfig) -> Result<u32, SpiError> {
    let bytes = cfg.width.bytes();
    let data = data & cfg.width.mask();
    let mut rx = 0u32;

    for n in 0..bytes {
        let shift = match cfg.bit_order {
            BitOrder::MsbFirst => 8 * (bytes - 1 - n),
            BitOrder::LsbFirst => 8 * n,
        };
        let byte = phy.exchange((data >> shift) as u8)?;
        rx |= u32::from(byte) << shift;
    }

    Ok(rx)
}
