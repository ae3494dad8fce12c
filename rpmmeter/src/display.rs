// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Character display contract.
//!
//! The display driver itself lives outside this crate. The main loop only needs these five
//! operations, mirroring a small character LCD: init, clear, home, text of a given length and an
//! unsigned integer rendered with a fixed number of digits.

/// Text display consumed by the [`Tachometer`](crate::Tachometer).
pub trait Display {
    type Error;

    fn init(&mut self) -> Result<(), Self::Error>;

    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Move the cursor back to the first position without clearing.
    fn home(&mut self) -> Result<(), Self::Error>;

    /// Write the first `len` characters of `text`.
    fn text(&mut self, text: &str, len: u8) -> Result<(), Self::Error>;

    /// Write `value` right-aligned in a field of `digits` characters.
    fn uint(&mut self, value: u32, digits: u8) -> Result<(), Self::Error>;
}

/// Labels and field widths used when pushing a reading to the display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayLayout {
    pub measured_label: &'static str,
    pub measured_label_len: u8,
    pub measured_digits: u8,
    pub commanded_label: &'static str,
    pub commanded_label_len: u8,
    pub commanded_digits: u8,
}

impl Default for DisplayLayout {
    /// Reference layout: `Ist` with 5 digits, then `Soll` cut to two characters with 6 digits.
    fn default() -> Self {
        Self {
            measured_label: "Ist",
            measured_label_len: 3,
            measured_digits: 5,
            commanded_label: "Soll",
            commanded_label_len: 2,
            commanded_digits: 6,
        }
    }
}

impl DisplayLayout {
    /// Push one measured/commanded pair, starting from the home position.
    pub fn render<D: Display>(
        &self,
        display: &mut D,
        measured_rpm: u32,
        commanded_rpm: u32,
    ) -> Result<(), D::Error> {
        display.home()?;
        display.text(self.measured_label, self.measured_label_len)?;
        display.uint(measured_rpm, self.measured_digits)?;
        display.text(self.commanded_label, self.commanded_label_len)?;
        display.uint(commanded_rpm, self.commanded_digits)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{DisplayOp, RecordingDisplay};

    #[test]
    fn render_follows_reference_call_sequence() {
        let mut display = RecordingDisplay::default();
        DisplayLayout::default()
            .render(&mut display, 1000, 6000)
            .unwrap();

        assert_eq!(
            display.ops,
            vec![
                DisplayOp::Home,
                DisplayOp::Text("Ist".into(), 3),
                DisplayOp::Uint(1000, 5),
                DisplayOp::Text("Soll".into(), 2),
                DisplayOp::Uint(6000, 6),
            ]
        );
    }
}
