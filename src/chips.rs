//! Per-chip register address tables.
//!
//! Pure configuration data: which port letters exist, where each port's
//! input/direction/output registers live in the data space, which physical
//! `(port, bit)` every logical pin number resolves to, and the register
//! blocks of the USART units. The core logic never consults these tables at
//! runtime; every lookup happens once, when a [`Pin`], port binding, or UART
//! is constructed, and a miss is an [`Error`] then and there.
//!
//! Addresses are AVR data-space addresses (I/O address + 0x20).

use crate::error::{Error, Result};
use crate::pin::Pin;

/// One physical port: a register block addressing up to eight pins.
///
/// The three registers always refer to the same physical bits: bit `n` of
/// `dir` configures the pin whose level is read at bit `n` of `input` and
/// driven from bit `n` of `output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortGroup {
    /// Port letter, as an ASCII byte (`b'B'`, `b'C'`, ...).
    pub letter: u8,
    /// Input-level register address (PINx).
    pub input: u16,
    /// Direction register address (DDRx).
    pub dir: u16,
    /// Output-level register address (PORTx).
    pub output: u16,
}

/// Register block of one USART unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartRegs {
    /// Unit index, used in log and fault messages.
    pub unit: u8,
    /// Status register address (UCSRnA): pending event bits.
    pub status: u16,
    /// Control register address (UCSRnB): event-enable and rx/tx-enable bits.
    pub control: u16,
    /// Data register address (UDRn).
    pub data: u16,
}

/// Static description of one target chip.
#[derive(Debug, Clone, Copy)]
pub struct Chip {
    /// Chip name, used in error messages.
    pub name: &'static str,
    ports: &'static [PortGroup],
    /// `(port letter, bit index)` indexed by logical pin number.
    pins: &'static [(u8, u8)],
    uarts: &'static [UartRegs],
}

impl Chip {
    /// Resolves a logical pin number to a bound [`Pin`].
    pub fn pin(&self, number: u8) -> Result<Pin> {
        let &(letter, bit) = self
            .pins
            .get(number as usize)
            .ok_or(Error::UnmappedPin {
                pin: number,
                chip: self.name,
            })?;
        let port = self.port(letter)?;
        Ok(Pin::bound(number, port, bit))
    }

    /// Looks up a port register block by letter.
    pub fn port(&self, letter: u8) -> Result<PortGroup> {
        self.ports
            .iter()
            .copied()
            .find(|p| p.letter == letter)
            .ok_or(Error::UnknownPort {
                letter: letter as char,
                chip: self.name,
            })
    }

    /// Looks up a USART register block by unit index.
    pub fn uart(&self, unit: u8) -> Result<UartRegs> {
        self.uarts
            .iter()
            .copied()
            .find(|u| u.unit == unit)
            .ok_or(Error::UnknownUart {
                unit,
                chip: self.name,
            })
    }

    /// All port register blocks of this chip.
    pub fn ports(&self) -> &'static [PortGroup] {
        self.ports
    }
}

/// ATmega328P (Arduino Uno class): ports B/C/D, pins 0-19, USART0.
pub static ATMEGA328P: Chip = Chip {
    name: "ATmega328P",
    ports: &[
        PortGroup { letter: b'B', input: 0x23, dir: 0x24, output: 0x25 },
        PortGroup { letter: b'C', input: 0x26, dir: 0x27, output: 0x28 },
        PortGroup { letter: b'D', input: 0x29, dir: 0x2A, output: 0x2B },
    ],
    pins: &[
        (b'D', 0), (b'D', 1), (b'D', 2), (b'D', 3), (b'D', 4),
        (b'D', 5), (b'D', 6), (b'D', 7),
        (b'B', 0), (b'B', 1), (b'B', 2), (b'B', 3), (b'B', 4), (b'B', 5),
        (b'C', 0), (b'C', 1), (b'C', 2), (b'C', 3), (b'C', 4), (b'C', 5),
    ],
    uarts: &[UartRegs { unit: 0, status: 0xC0, control: 0xC1, data: 0xC6 }],
};

/// ATmega32U4 (Arduino Leonardo class): ports B/C/D/E/F, pins 0-29, USART1.
///
/// The board pin numbering is irregular by design; several high pin numbers
/// are board-level aliases of the same physical bit (e.g. 24 and 4 are both
/// PD4). Virtual-port construction rejects using two aliases together.
pub static ATMEGA32U4: Chip = Chip {
    name: "ATmega32U4",
    ports: &[
        PortGroup { letter: b'B', input: 0x23, dir: 0x24, output: 0x25 },
        PortGroup { letter: b'C', input: 0x26, dir: 0x27, output: 0x28 },
        PortGroup { letter: b'D', input: 0x29, dir: 0x2A, output: 0x2B },
        PortGroup { letter: b'E', input: 0x2C, dir: 0x2D, output: 0x2E },
        PortGroup { letter: b'F', input: 0x2F, dir: 0x30, output: 0x31 },
    ],
    pins: &[
        (b'D', 2), (b'D', 3), (b'D', 1), (b'D', 0), (b'D', 4),
        (b'C', 6), (b'D', 7), (b'E', 6),
        (b'B', 4), (b'B', 5), (b'B', 6), (b'B', 7), (b'D', 6), (b'C', 7),
        (b'B', 3), (b'B', 1), (b'B', 2), (b'B', 0),
        (b'F', 7), (b'F', 6), (b'F', 5), (b'F', 4), (b'F', 1), (b'F', 0),
        (b'D', 4), (b'D', 7), (b'B', 4), (b'B', 5), (b'B', 6), (b'D', 6),
    ],
    uarts: &[UartRegs { unit: 1, status: 0xC8, control: 0xC9, data: 0xCE }],
};
