// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Main-loop glue for the tachometer.
//!
//! Each [`Tachometer::poll`] samples the light barrier once. When the edge detector closes a
//! window, the tick count of that window is taken from the shared [`TickCounter`], converted to
//! RPM and shown next to the commanded RPM. A faulted window leaves the display untouched.

use embedded_hal::digital::InputPin;

use crate::config::Config;
use crate::display::{Display, DisplayLayout};
use crate::sensor::{EdgeDetector, EdgeEvent, Level, RpmEstimator, RpmFault};
use crate::timing::TickCounter;

/// What a single poll observed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// No rising edge.
    Idle,
    /// Rising edge inside the current window.
    Pulse,
    /// Window closed and the display now shows this RPM.
    Reading(u32),
    /// Window closed but was rejected; the previous reading stays on the display.
    Fault(RpmFault),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TachometerError<DE, PE> {
    Display(DE),
    Sensor(PE),
}

pub struct Tachometer<'a, IN, D> {
    sensor: IN,
    display: D,
    ticks: &'a TickCounter,
    edges: EdgeDetector,
    estimator: RpmEstimator,
    layout: DisplayLayout,
    commanded_rpm: u32,
    last_rpm: Option<u32>,
}

impl<'a, IN, D> Tachometer<'a, IN, D>
where
    IN: InputPin,
    D: Display,
{
    pub fn new(
        sensor: IN,
        display: D,
        ticks: &'a TickCounter,
        cfg: &Config,
        commanded_rpm: u32,
    ) -> Self {
        Self {
            sensor,
            display,
            ticks,
            edges: EdgeDetector::new(cfg.rpm.pulses_per_window),
            estimator: RpmEstimator::new(cfg.rpm),
            layout: cfg.layout,
            commanded_rpm,
            last_rpm: None,
        }
    }

    /// Initialize and clear the display.
    pub fn start(&mut self) -> Result<(), TachometerError<D::Error, IN::Error>> {
        self.display.init().map_err(TachometerError::Display)?;
        self.display.clear().map_err(TachometerError::Display)
    }

    pub fn poll(&mut self) -> Result<PollOutcome, TachometerError<D::Error, IN::Error>> {
        let high = self.sensor.is_high().map_err(TachometerError::Sensor)?;

        match self.edges.sample(Level::from(high)) {
            EdgeEvent::None => Ok(PollOutcome::Idle),
            EdgeEvent::Pulse => Ok(PollOutcome::Pulse),
            EdgeEvent::WindowComplete => self.close_window(),
        }
    }

    fn close_window(&mut self) -> Result<PollOutcome, TachometerError<D::Error, IN::Error>> {
        let ticks = self.ticks.take();

        match self.estimator.estimate(ticks) {
            Ok(rpm) => {
                debug!("window: {} ticks, {} rpm", ticks, rpm);
                self.layout
                    .render(&mut self.display, rpm, self.commanded_rpm)
                    .map_err(TachometerError::Display)?;
                self.last_rpm = Some(rpm);
                Ok(PollOutcome::Reading(rpm))
            }
            Err(fault) => {
                warn!("window rejected: {}", fault);
                Ok(PollOutcome::Fault(fault))
            }
        }
    }

    /// Update the commanded RPM shown with the next reading.
    pub fn set_commanded_rpm(&mut self, rpm: u32) {
        self.commanded_rpm = rpm;
    }

    #[inline]
    pub fn commanded_rpm(&self) -> u32 {
        self.commanded_rpm
    }

    /// RPM currently on the display.
    #[inline]
    pub fn last_rpm(&self) -> Option<u32> {
        self.last_rpm
    }

    /// Rejected windows since startup.
    #[inline]
    pub fn faults(&self) -> u32 {
        self.estimator.faults()
    }

    /// Pulses counted in the open window.
    #[inline]
    pub fn pulses(&self) -> u32 {
        self.edges.pulses()
    }

    pub fn free(self) -> (IN, D) {
        (self.sensor, self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{DisplayOp, RecordingDisplay, ScriptedInput};

    type TestTacho<'a> = Tachometer<'a, ScriptedInput, RecordingDisplay>;

    fn tacho(ticks: &TickCounter) -> (TestTacho<'_>, ScriptedInput) {
        let sensor = ScriptedInput::default();
        let t = Tachometer::new(
            sensor.clone(),
            RecordingDisplay::default(),
            ticks,
            &Config::default(),
            6000,
        );
        (t, sensor)
    }

    /// Poll until the scripted input runs dry, collecting non-idle outcomes.
    fn drain(t: &mut TestTacho<'_>, polls: usize) -> Vec<PollOutcome> {
        (0..polls)
            .map(|_| t.poll().unwrap())
            .filter(|o| *o != PollOutcome::Idle)
            .collect()
    }

    #[test]
    fn start_initializes_and_clears() {
        let ticks = TickCounter::new();
        let (mut t, _) = tacho(&ticks);
        t.start().unwrap();
        assert_eq!(t.display.ops, [DisplayOp::Init, DisplayOp::Clear]);
    }

    #[test]
    fn hundredth_pulse_renders_reading() {
        let ticks = TickCounter::new();
        let (mut t, sensor) = tacho(&ticks);

        sensor.pulses(99);
        let outcomes = drain(&mut t, 198);
        assert_eq!(outcomes.len(), 99);
        assert!(outcomes.iter().all(|o| *o == PollOutcome::Pulse));
        assert!(t.display.ops.is_empty());

        for _ in 0..15_000 {
            ticks.tick();
        }
        sensor.pulses(1);
        assert_eq!(drain(&mut t, 2), [PollOutcome::Reading(1000)]);
        assert_eq!(ticks.peek(), 0);
        assert_eq!(t.last_rpm(), Some(1000));
        assert_eq!(
            t.display.ops,
            [
                DisplayOp::Home,
                DisplayOp::Text("Ist".into(), 3),
                DisplayOp::Uint(1000, 5),
                DisplayOp::Text("Soll".into(), 2),
                DisplayOp::Uint(6000, 6),
            ]
        );
    }

    #[test]
    fn zero_tick_window_keeps_previous_reading() {
        let ticks = TickCounter::new();
        let (mut t, sensor) = tacho(&ticks);

        for _ in 0..25_000 {
            ticks.tick();
        }
        sensor.pulses(100);
        assert_eq!(drain(&mut t, 200).last(), Some(&PollOutcome::Reading(600)));
        let shown = t.display.ops.len();

        sensor.pulses(100);
        assert_eq!(
            drain(&mut t, 200).last(),
            Some(&PollOutcome::Fault(RpmFault::NoElapsedTicks))
        );
        assert_eq!(t.display.ops.len(), shown);
        assert_eq!(t.last_rpm(), Some(600));
        assert_eq!(t.faults(), 1);
    }

    #[test]
    fn held_high_level_counts_once() {
        let ticks = TickCounter::new();
        let (mut t, sensor) = tacho(&ticks);

        sensor.push(&[true, true, true, false, false, true]);
        assert_eq!(drain(&mut t, 6), [PollOutcome::Pulse, PollOutcome::Pulse]);
        assert_eq!(t.pulses(), 2);
    }

    #[test]
    fn commanded_rpm_follows_updates() {
        let ticks = TickCounter::new();
        let (mut t, sensor) = tacho(&ticks);
        t.set_commanded_rpm(3000);
        ticks.tick();

        sensor.pulses(100);
        drain(&mut t, 200);
        assert_eq!(t.display.ops.last(), Some(&DisplayOp::Uint(3000, 6)));
    }
}
