pub mod gpio;
pub mod led;
#[cfg(feature = "board-f777")]
pub mod pins;
#[cfg(feature = "board-f767zi")]
#[path = "pins_f767zi.rs"]
pub mod pins;
pub mod pwm;
pub mod spi;
pub mod tick;
pub mod usart;

pub use gpio::Line;
pub use led::FaultLed;
pub use pins::{BoardPins, FAULT_LED_ACTIVE};
pub use pwm::Tim4Pwm;
pub use spi::{CycleDelay, HardwareSpi};
pub use tick::Tim7Tick;
pub use usart::{TerminalDisplay, Usart};
