//! Virtual ports: an arbitrary set of pins addressed as one logical byte.
//!
//! A [`VirtualPort`] aggregates up to eight pins, each possibly on a
//! different physical port, into a single byte-wide port. The expensive part
//! — working out which physical bits of which registers the port owns and
//! which of those line up with their logical positions — happens once, at
//! construction. [`Gpio::vport_write`] then needs exactly one masked
//! read-modify-write per touched physical port, and pins outside the virtual
//! port are never perturbed even when they share a register with members.

use log::debug;

use crate::bus::RegisterBus;
use crate::chips::PortGroup;
use crate::error::{Error, Result};
use crate::gpio::Gpio;
use crate::pin::{Pin, PinMode};

/// Number of logical bit positions in a virtual port.
pub const VPORT_WIDTH: usize = 8;

/// Per-physical-port mapping, computed once at construction.
#[derive(Debug, Clone)]
struct PortMap {
    port: PortGroup,
    /// Bits of this port owned by any member pin.
    owned: u8,
    /// Owned bits whose physical index equals their logical position.
    positional: u8,
    /// `(logical bit mask, physical bit mask)` for the misaligned members.
    scatter: Vec<(u8, u8)>,
}

/// A logical 8-bit port composed of pins drawn from any physical ports.
///
/// Member order is most-significant-first: the first member drives logical
/// bit 7. Unused slots are [`Pin::NULL`]. Two members resolving to the same
/// physical bit are a configuration error and are rejected here rather than
/// silently letting one win.
#[derive(Debug, Clone)]
pub struct VirtualPort {
    maps: Vec<PortMap>,
}

impl VirtualPort {
    /// Builds a virtual port from eight members, logical bit 7 first.
    pub fn new(pins: [Pin; VPORT_WIDTH]) -> Result<Self> {
        let mut maps: Vec<PortMap> = Vec::new();

        for (slot, pin) in pins.iter().enumerate() {
            let Some(port) = pin.port() else {
                continue;
            };
            let logical = 1u8 << (VPORT_WIDTH - 1 - slot);
            let physical = pin.mask();

            let idx = match maps.iter().position(|m| m.port == port) {
                Some(idx) => idx,
                None => {
                    maps.push(PortMap {
                        port,
                        owned: 0,
                        positional: 0,
                        scatter: Vec::new(),
                    });
                    maps.len() - 1
                }
            };
            let map = &mut maps[idx];

            if map.owned & physical != 0 {
                return Err(Error::AliasedPins {
                    port: port.letter as char,
                    bit: physical.trailing_zeros() as u8,
                });
            }
            map.owned |= physical;
            if physical == logical {
                map.positional |= physical;
            } else {
                map.scatter.push((logical, physical));
            }
        }

        for m in &maps {
            debug!(
                "vport map: port {} owned {:#04X} positional {:#04X} ({} scattered)",
                m.port.letter as char,
                m.owned,
                m.positional,
                m.scatter.len()
            );
        }
        Ok(VirtualPort { maps })
    }

    /// Builds a virtual port from up to eight members, logical bit 7 first.
    ///
    /// Shorter slices occupy the low logical positions; the missing high
    /// slots are inert.
    pub fn from_slice(pins: &[Pin]) -> Result<Self> {
        if pins.len() > VPORT_WIDTH {
            return Err(Error::TooManyPins { got: pins.len() });
        }
        let mut slots = [Pin::NULL; VPORT_WIDTH];
        slots[VPORT_WIDTH - pins.len()..].copy_from_slice(pins);
        Self::new(slots)
    }

    /// Bits of `port` this virtual port owns (0 if the port is untouched).
    pub fn owned_mask(&self, port: PortGroup) -> u8 {
        self.maps
            .iter()
            .find(|m| m.port == port)
            .map_or(0, |m| m.owned)
    }

    /// Owned bits of `port` that line up with their logical positions.
    pub fn positional_mask(&self, port: PortGroup) -> u8 {
        self.maps
            .iter()
            .find(|m| m.port == port)
            .map_or(0, |m| m.positional)
    }

    /// The physical ports this virtual port touches.
    pub fn ports(&self) -> impl Iterator<Item = PortGroup> + '_ {
        self.maps.iter().map(|m| m.port)
    }
}

impl<B: RegisterBus> Gpio<B> {
    /// Writes a logical byte across the virtual port's member pins.
    ///
    /// For each touched physical port: positionally aligned bits of `value`
    /// are copied straight into the accumulator, each misaligned member's
    /// logical bit is tested and scattered to its physical position, and the
    /// result is committed with a single [`port_write`](Gpio::port_write)
    /// masked to the owned bits. Ports with no owned bits are never
    /// accessed, and bits outside the owned mask are never altered.
    pub fn vport_write(&mut self, vp: &VirtualPort, value: u8) {
        for m in &vp.maps {
            let mut acc = value & m.positional;
            for &(logical, physical) in &m.scatter {
                if value & logical != 0 {
                    acc |= physical;
                }
            }
            self.port_write(m.port, acc, m.owned);
        }
    }

    /// Gathers the member pins' input levels back into a logical byte.
    ///
    /// One input-register read per touched physical port. Bits at null
    /// slots read as 0.
    pub fn vport_read(&mut self, vp: &VirtualPort) -> u8 {
        let mut value = 0u8;
        for m in &vp.maps {
            let sample = self.port_read(m.port, m.owned);
            value |= sample & m.positional;
            for &(logical, physical) in &m.scatter {
                if sample & physical != 0 {
                    value |= logical;
                }
            }
        }
        value
    }

    /// Applies a [`PinMode`] to every member pin.
    ///
    /// One masked direction write per touched physical port (plus one
    /// output-level write for the pull-up mode).
    pub fn vport_configure(&mut self, vp: &VirtualPort, mode: PinMode) {
        for m in &vp.maps {
            match mode {
                PinMode::Unchanged => {}
                PinMode::Output => self.port_set_direction(m.port, m.owned, m.owned),
                PinMode::Input => self.port_set_direction(m.port, 0, m.owned),
                PinMode::InputWithPullup => {
                    self.port_set_direction(m.port, 0, m.owned);
                    self.port_write(m.port, m.owned, m.owned);
                }
            }
        }
    }
}
