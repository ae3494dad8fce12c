// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Full measurement loop on the host: tick interrupts, PWM setup, sensor polling and display.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};
use fugit::{ExtU32, MicrosDurationU32};

use rpmmeter::sensor::RpmFault;
use rpmmeter::timing::{PwmGenerator, PwmTimer, TickCounter, TickSource, TickTimer};
use rpmmeter::{Config, Display, PollOutcome, Tachometer};

/// Light barrier whose level the test flips directly.
#[derive(Clone, Default)]
struct Barrier(Rc<Cell<bool>>);

impl ErrorType for Barrier {
    type Error = Infallible;
}

impl InputPin for Barrier {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

/// One-line character display keeping what is currently on screen.
#[derive(Clone, Default)]
struct Lcd {
    screen: Rc<RefCell<String>>,
    cursor: Rc<Cell<usize>>,
    ready: Rc<Cell<bool>>,
}

impl Lcd {
    fn shown(&self) -> String {
        self.screen.borrow().clone()
    }

    fn put(&self, s: &str) {
        let mut screen = self.screen.borrow_mut();
        let at = self.cursor.get();
        screen.truncate(at);
        screen.push_str(s);
        self.cursor.set(at + s.len());
    }
}

impl Display for Lcd {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.ready.set(true);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.screen.borrow_mut().clear();
        self.cursor.set(0);
        Ok(())
    }

    fn home(&mut self) -> Result<(), Self::Error> {
        self.cursor.set(0);
        Ok(())
    }

    fn text(&mut self, text: &str, len: u8) -> Result<(), Self::Error> {
        let end = text.len().min(usize::from(len));
        self.put(&text[..end]);
        Ok(())
    }

    fn uint(&mut self, value: u32, digits: u8) -> Result<(), Self::Error> {
        self.put(&format!("{value:>width$}", width = usize::from(digits)));
        Ok(())
    }
}

#[derive(Default)]
struct BasicTimer {
    armed: Option<u32>,
    acks: u32,
}

impl TickSource for BasicTimer {
    fn start(&mut self, interval: MicrosDurationU32) {
        self.armed = Some(interval.to_micros());
    }

    fn clear_interrupt(&mut self) {
        self.acks += 1;
    }

    fn restart(&mut self) {}
}

struct CenterAligned {
    compare: Option<u16>,
}

impl PwmTimer for CenterAligned {
    fn period(&self) -> u16 {
        46_874
    }

    fn enable_phase_correct(&mut self, compare: u16) {
        self.compare = Some(compare);
    }

    fn set_compare(&mut self, compare: u16) {
        self.compare = Some(compare);
    }
}

struct Bench {
    timer: TickTimer<BasicTimer>,
    barrier: Barrier,
}

impl Bench {
    /// One slot passing the light barrier, `ticks` timer interrupts after the previous one.
    fn pulse(
        &mut self,
        ticks: &TickCounter,
        tacho: &mut Tachometer<'_, Barrier, Lcd>,
        ticks_per_pulse: u32,
    ) -> PollOutcome {
        for _ in 0..ticks_per_pulse {
            self.timer.on_interrupt(ticks);
        }
        self.barrier.0.set(false);
        assert_eq!(tacho.poll().unwrap(), PollOutcome::Idle);
        self.barrier.0.set(true);
        tacho.poll().unwrap()
    }
}

#[test]
fn measures_and_displays_rpm() {
    let cfg = Config::default();
    let ticks = TickCounter::new();

    let mut timer = TickTimer::new(BasicTimer::default());
    timer.arm(cfg.tick_interval);
    assert_eq!(timer.interval(), Some(100.micros()));

    let mut pwm = PwmGenerator::new(CenterAligned { compare: None }, cfg.pwm.max_rpm);
    pwm.configure(cfg.pwm.compare).unwrap();
    assert_eq!(pwm.commanded_rpm(), 6000);

    let lcd = Lcd::default();
    let barrier = Barrier::default();
    let mut tacho = Tachometer::new(
        barrier.clone(),
        lcd.clone(),
        &ticks,
        &cfg,
        pwm.commanded_rpm(),
    );
    tacho.start().unwrap();
    assert!(lcd.ready.get());

    let mut bench = Bench { timer, barrier };

    // 150 ticks per slot is 15 000 ticks per window: 1000 rpm.
    for _ in 0..99 {
        assert_eq!(bench.pulse(&ticks, &mut tacho, 150), PollOutcome::Pulse);
    }
    assert_eq!(lcd.shown(), "");
    assert_eq!(bench.pulse(&ticks, &mut tacho, 150), PollOutcome::Reading(1000));
    assert_eq!(lcd.shown(), "Ist 1000So  6000");

    // 250 ticks per slot: 600 rpm.
    let mut last = PollOutcome::Idle;
    for _ in 0..100 {
        last = bench.pulse(&ticks, &mut tacho, 250);
    }
    assert_eq!(last, PollOutcome::Reading(600));
    assert_eq!(lcd.shown(), "Ist  600So  6000");

    assert_eq!(bench.timer.free().acks, 99 * 150 + 150 + 100 * 250);
}

#[test]
fn glitching_sensor_does_not_touch_display() {
    let cfg = Config::default();
    let ticks = TickCounter::new();
    let lcd = Lcd::default();
    let barrier = Barrier::default();
    let mut tacho = Tachometer::new(barrier.clone(), lcd.clone(), &ticks, &cfg, 6000);
    tacho.start().unwrap();

    let mut bench = Bench {
        timer: TickTimer::new(BasicTimer::default()),
        barrier,
    };

    let mut last = PollOutcome::Idle;
    for _ in 0..100 {
        last = bench.pulse(&ticks, &mut tacho, 417);
    }
    // 41 700 ticks: round(359.71) = 360 rpm.
    assert_eq!(last, PollOutcome::Reading(360));
    let shown = lcd.shown();

    // A full window of noise between two timer interrupts.
    for _ in 0..100 {
        last = bench.pulse(&ticks, &mut tacho, 0);
    }
    assert_eq!(last, PollOutcome::Fault(RpmFault::NoElapsedTicks));
    assert_eq!(lcd.shown(), shown);
    assert_eq!(tacho.last_rpm(), Some(360));
    assert_eq!(tacho.faults(), 1);
}
