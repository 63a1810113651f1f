//! # atmega-vport
//!
//! Pin, port, and virtual-port abstractions for ATmega-class
//! microcontrollers, plus an interrupt-driven USART driver core.
//!
//! The centerpiece is the [`VirtualPort`]: an arbitrary, non-contiguous set
//! of up to eight physical pins — possibly spanning several physical ports —
//! addressed as one logical byte. The per-port owned/positional masks are
//! computed once at construction; [`Gpio::vport_write`] then touches each
//! physical port with exactly one masked read-modify-write and never
//! disturbs pins outside the virtual port, even ones sharing a register
//! with its members.
//!
//! All register traffic goes through the [`bus::RegisterBus`] seam:
//! [`bus::MmioBus`] for real memory-mapped hardware, [`bus::SimBus`] (a
//! RAM-backed data-space model with access counters) for host-side tests
//! and simulation.
//!
//! ## Basic usage
//!
//! ```
//! use atmega_vport::{
//!     bus::SimBus,
//!     chips::ATMEGA328P,
//!     gpio::Gpio,
//!     pin::PinMode,
//!     vport::VirtualPort,
//!     Result,
//! };
//!
//! fn main() -> Result<()> {
//!     let mut gpio = Gpio::new(SimBus::new());
//!
//!     // A single pin.
//!     let led = ATMEGA328P.pin(13)?;
//!     gpio.pin_configure(led, PinMode::Output);
//!     gpio.pin_write(led, true);
//!
//!     // Four data lines on two physical ports, driven as one nibble.
//!     let data = VirtualPort::from_slice(&[
//!         ATMEGA328P.pin(8)?,  // PB0, logical bit 3
//!         ATMEGA328P.pin(9)?,  // PB1, logical bit 2
//!         ATMEGA328P.pin(2)?,  // PD2, logical bit 1
//!         ATMEGA328P.pin(3)?,  // PD3, logical bit 0
//!     ])?;
//!     gpio.vport_configure(&data, PinMode::Output);
//!     gpio.vport_write(&data, 0b0000_1011);
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency model
//!
//! Single hardware thread with asynchronous interrupt preemption. Each pin
//! or port operation is at most one read-modify-write and is interrupt-safe
//! on its own; sequences are not, and callers wrap them in an
//! [`irq::CriticalSection`]. The [`uart::Uart`] handler runs entirely in
//! interrupt context and must not block; an enabled interrupt firing with no
//! registered handler is fatal (a panic, never a silent return).

pub mod bus;
pub mod chips;
pub mod error;
pub mod gpio;
pub mod irq;
pub mod pin;
pub mod uart;
pub mod vport;

pub use error::{Error, Result};
pub use gpio::Gpio;
pub use pin::{Pin, PinMode};
pub use uart::{DriverState, Uart, UartEvent};
pub use vport::VirtualPort;
