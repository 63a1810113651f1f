//! Logical pins bound to physical port bits.

use crate::chips::PortGroup;

/// Direction / pull configuration applied to a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Leave the current hardware configuration as it is.
    Unchanged,
    /// Drive the pin.
    Output,
    /// High-impedance input.
    Input,
    /// Input with the internal pull-up resistor enabled.
    ///
    /// On AVR the pull-up is enabled by asserting the output-level bit while
    /// the direction bit selects input.
    InputWithPullup,
}

/// A logical pin, resolved at construction to one bit of one physical port.
///
/// Obtained from a chip table ([`Chip::pin`](crate::chips::Chip::pin)); an
/// identifier with no mapping for the active chip fails there, so a `Pin`
/// value in hand is always valid and pin operations cannot fail at runtime.
///
/// [`Pin::NULL`] is the reserved inert identity: it reads low, ignores writes
/// and configuration, and never claims ownership of any port bits. Unused
/// virtual-port slots are bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    number: u8,
    port: Option<PortGroup>,
    mask: u8,
}

impl Pin {
    /// The inert null pin.
    pub const NULL: Pin = Pin {
        number: u8::MAX,
        port: None,
        mask: 0,
    };

    pub(crate) const fn bound(number: u8, port: PortGroup, bit: u8) -> Self {
        Pin {
            number,
            port: Some(port),
            mask: 1 << bit,
        }
    }

    /// The logical pin number this pin was resolved from.
    #[inline]
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Whether this is the inert null pin.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.port.is_none()
    }

    /// The physical port this pin belongs to, if any.
    #[inline]
    pub fn port(&self) -> Option<PortGroup> {
        self.port
    }

    /// This pin's physical bit mask within its port (0 for the null pin).
    #[inline]
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// This pin's mask if it belongs to `port`, else 0.
    ///
    /// Pure, side-effect-free ownership query for callers composing
    /// per-port masks out of pin sets.
    #[inline]
    pub fn mask_for_port(&self, port: PortGroup) -> u8 {
        match self.port {
            Some(own) if own == port => self.mask,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chips::ATMEGA328P;

    #[test]
    fn null_pin_is_inert() {
        let null = Pin::NULL;
        assert!(null.is_null());
        assert_eq!(null.mask(), 0);
        for port in ATMEGA328P.ports() {
            assert_eq!(null.mask_for_port(*port), 0);
        }
    }

    #[test]
    fn ownership_query_is_exact() {
        let pin8 = ATMEGA328P.pin(8).unwrap(); // PB0
        let b = ATMEGA328P.port(b'B').unwrap();
        let c = ATMEGA328P.port(b'C').unwrap();
        assert_eq!(pin8.mask_for_port(b), 0x01);
        assert_eq!(pin8.mask_for_port(c), 0x00);
        assert_eq!(pin8.number(), 8);
    }
}
