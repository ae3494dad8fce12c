// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side doubles for GPIO lines, delays, sensors and displays.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};

use crate::display::Display;
use crate::spi::LineDirection;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Dir {
    Unset,
    Output,
    Input,
}

/// One observable pin operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trace {
    Set(&'static str, bool),
    Sample(&'static str, bool),
    Settle,
}

/// Shared, ordered log of pin operations across lines.
#[derive(Clone, Default)]
pub struct Tracer(Rc<RefCell<Vec<Trace>>>);

impl Tracer {
    fn push(&self, t: Trace) {
        self.0.borrow_mut().push(t);
    }

    pub fn events(&self) -> Vec<Trace> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineFault;

impl digital::Error for LineFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A GPIO line. Clones share level, direction and history.
#[derive(Clone)]
pub struct Line {
    name: &'static str,
    level: Rc<Cell<bool>>,
    dir: Rc<Cell<Dir>>,
    history: Rc<RefCell<Vec<bool>>>,
    fail: Rc<Cell<bool>>,
    tracer: Tracer,
}

impl Line {
    pub fn new(name: &'static str, tracer: &Tracer) -> Self {
        Self {
            name,
            level: Rc::new(Cell::new(false)),
            dir: Rc::new(Cell::new(Dir::Unset)),
            history: Rc::default(),
            fail: Rc::new(Cell::new(false)),
            tracer: tracer.clone(),
        }
    }

    /// Another line wired to the same net (e.g. MISO looped back onto MOSI).
    pub fn alias(&self, name: &'static str) -> Self {
        Self {
            name,
            level: self.level.clone(),
            dir: Rc::new(Cell::new(Dir::Unset)),
            history: Rc::default(),
            fail: Rc::new(Cell::new(false)),
            tracer: self.tracer.clone(),
        }
    }

    pub fn level(&self) -> bool {
        self.level.get()
    }

    /// Drive the net from outside, like a peripheral would.
    pub fn drive(&self, high: bool) {
        self.level.set(high);
    }

    pub fn dir(&self) -> Dir {
        self.dir.get()
    }

    /// Levels written through this line, in order.
    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    fn write(&mut self, high: bool) -> Result<(), LineFault> {
        if self.fail.get() {
            return Err(LineFault);
        }
        self.level.set(high);
        self.history.borrow_mut().push(high);
        self.tracer.push(Trace::Set(self.name, high));
        Ok(())
    }
}

impl ErrorType for Line {
    type Error = LineFault;
}

impl OutputPin for Line {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

impl InputPin for Line {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.fail.get() {
            return Err(LineFault);
        }
        let level = self.level.get();
        self.tracer.push(Trace::Sample(self.name, level));
        Ok(level)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl LineDirection for Line {
    fn set_output(&mut self) {
        self.dir.set(Dir::Output);
    }

    fn set_input(&mut self) {
        self.dir.set(Dir::Input);
    }
}

/// Delay that returns at once and logs a settle marker.
pub struct NoDelay {
    tracer: Tracer,
}

impl NoDelay {
    pub fn new(tracer: &Tracer) -> Self {
        Self {
            tracer: tracer.clone(),
        }
    }
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {
        self.tracer.push(Trace::Settle);
    }
}

/// Sensor input replaying a fixed sequence of levels, low once exhausted.
#[derive(Clone, Default)]
pub struct ScriptedInput {
    levels: Rc<RefCell<VecDeque<bool>>>,
}

impl ScriptedInput {
    pub fn push(&self, levels: &[bool]) {
        self.levels.borrow_mut().extend(levels.iter().copied());
    }

    /// Queue `n` low/high pulses.
    pub fn pulses(&self, n: usize) {
        for _ in 0..n {
            self.push(&[false, true]);
        }
    }
}

impl ErrorType for ScriptedInput {
    type Error = Infallible;
}

impl InputPin for ScriptedInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.levels.borrow_mut().pop_front().unwrap_or(false))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DisplayOp {
    Init,
    Clear,
    Home,
    Text(String, u8),
    Uint(u32, u8),
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub ops: Vec<DisplayOp>,
}

impl Display for RecordingDisplay {
    type Error = Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.ops.push(DisplayOp::Init);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.ops.push(DisplayOp::Clear);
        Ok(())
    }

    fn home(&mut self) -> Result<(), Self::Error> {
        self.ops.push(DisplayOp::Home);
        Ok(())
    }

    fn text(&mut self, text: &str, len: u8) -> Result<(), Self::Error> {
        self.ops.push(DisplayOp::Text(text.into(), len));
        Ok(())
    }

    fn uint(&mut self, value: u32, digits: u8) -> Result<(), Self::Error> {
        self.ops.push(DisplayOp::Uint(value, digits));
        Ok(())
    }
}
