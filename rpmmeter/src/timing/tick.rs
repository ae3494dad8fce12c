// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sampling tick timer.
//!
//! A hardware timer raises an interrupt every tick interval. The handler bumps a shared
//! [`TickCounter`] and zeroes the timer's running count, so each interval restarts from zero
//! instead of relying on auto-reload.
//!
//! The counter is the only state shared between interrupt and main-loop context. The interrupt
//! is its only incrementer and the edge detector its only resetter.

use core::cell::Cell;

use critical_section::Mutex;
use fugit::MicrosDurationU32;

/// Tick count shared between the timer interrupt and the main loop.
pub struct TickCounter {
    ticks: Mutex<Cell<u32>>,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            ticks: Mutex::new(Cell::new(0)),
        }
    }

    /// Count one tick. Called from the timer interrupt only.
    ///
    /// Saturates at `u32::MAX` so a stalled sensor can never wrap into a short window.
    #[inline]
    pub fn tick(&self) {
        critical_section::with(|cs| {
            let ticks = self.ticks.borrow(cs);
            ticks.set(ticks.get().saturating_add(1));
        });
    }

    /// Current count without resetting it.
    #[inline]
    pub fn peek(&self) -> u32 {
        critical_section::with(|cs| self.ticks.borrow(cs).get())
    }

    /// Read the count and reset it to zero as one atomic step.
    #[inline]
    pub fn take(&self) -> u32 {
        critical_section::with(|cs| self.ticks.borrow(cs).replace(0))
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Hardware side of the tick timer.
pub trait TickSource {
    /// Program the timer for `interval`, zero its count, enable its interrupt and start it.
    fn start(&mut self, interval: MicrosDurationU32);

    /// Acknowledge the pending tick interrupt.
    fn clear_interrupt(&mut self);

    /// Zero the running count so the next interval starts fresh.
    fn restart(&mut self);
}

/// Periodic tick timer bound to a [`TickSource`].
pub struct TickTimer<T> {
    source: T,
    interval: Option<MicrosDurationU32>,
}

impl<T: TickSource> TickTimer<T> {
    pub fn new(source: T) -> Self {
        Self {
            source,
            interval: None,
        }
    }

    /// Configure the timer to interrupt every `interval` and start it at zero.
    pub fn arm(&mut self, interval: MicrosDurationU32) {
        self.source.start(interval);
        self.interval = Some(interval);
        info!("tick timer armed: {=u32} us", interval.to_micros());
    }

    /// Interval the timer was armed with, if any.
    #[inline]
    pub fn interval(&self) -> Option<MicrosDurationU32> {
        self.interval
    }

    /// Tick interrupt body. Runs to completion in interrupt context.
    #[inline]
    pub fn on_interrupt(&mut self, counter: &TickCounter) {
        self.source.clear_interrupt();
        counter.tick();
        self.source.restart();
    }

    pub fn free(self) -> T {
        self.source
    }
}
