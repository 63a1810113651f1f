//! The GPIO handle: single-pin and masked port operations.

use log::{debug, trace};

use crate::bus::RegisterBus;
use crate::chips::PortGroup;
use crate::pin::{Pin, PinMode};

/// Mask value selecting every bit of a port register.
pub const ALL_PINS: u8 = 0xFF;

/// Exclusive owner of the GPIO register bus.
///
/// All pin and port operations are methods on this handle, so every register
/// access of the pin layer goes through one place. Each operation is at most
/// a single read-modify-write of one register; a *sequence* of operations is
/// not atomic with respect to interrupts that touch the same registers, and
/// callers needing that must hold a [`CriticalSection`](crate::irq::CriticalSection)
/// around the sequence.
#[derive(Debug)]
pub struct Gpio<B: RegisterBus> {
    bus: B,
}

impl<B: RegisterBus> Gpio<B> {
    /// Creates the handle over a register bus.
    pub fn new(bus: B) -> Self {
        Gpio { bus }
    }

    /// Shared access to the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Exclusive access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consumes the handle, returning the bus.
    pub fn into_bus(self) -> B {
        self.bus
    }

    // --- Port operations ---

    /// Masked write: `new = (cur & !mask) | (value & mask)`.
    ///
    /// With `mask == ALL_PINS` the register is written directly, without a
    /// preceding read. That is a correctness boundary, not a shortcut: the
    /// read of a read-modify-write can race an interrupt that updates the
    /// same register between the read and the write, and a full-width update
    /// has no bits to preserve.
    fn masked_write(&mut self, addr: u16, value: u8, mask: u8) {
        match mask {
            0 => {}
            ALL_PINS => self.bus.write(addr, value),
            _ => {
                let cur = self.bus.read(addr);
                self.bus.write(addr, (cur & !mask) | (value & mask));
            }
        }
    }

    /// Sets direction bits of a port (1 = output), restricted to `mask`.
    ///
    /// Bits outside `mask` are never altered; a zero mask performs no
    /// register access at all.
    pub fn port_set_direction(&mut self, port: PortGroup, value: u8, mask: u8) {
        trace!(
            "port {}: dir <- {:#04X} (mask {:#04X})",
            port.letter as char,
            value,
            mask
        );
        self.masked_write(port.dir, value, mask);
    }

    /// Sets output-level bits of a port, restricted to `mask`.
    ///
    /// Same masking discipline as [`port_set_direction`](Self::port_set_direction).
    pub fn port_write(&mut self, port: PortGroup, value: u8, mask: u8) {
        trace!(
            "port {}: out <- {:#04X} (mask {:#04X})",
            port.letter as char,
            value,
            mask
        );
        self.masked_write(port.output, value, mask);
    }

    /// Reads the input-level register of a port, pre-masked.
    pub fn port_read(&mut self, port: PortGroup, mask: u8) -> u8 {
        if mask == 0 {
            return 0;
        }
        let value = self.bus.read(port.input) & mask;
        trace!(
            "port {}: in  -> {:#04X} (mask {:#04X})",
            port.letter as char,
            value,
            mask
        );
        value
    }

    // --- Single-pin operations ---

    /// Applies a [`PinMode`] to a pin. No-op for the null pin.
    pub fn pin_configure(&mut self, pin: Pin, mode: PinMode) {
        let Some(port) = pin.port() else {
            trace!("pin {}: configure on null pin ignored", pin.number());
            return;
        };
        debug!("pin {}: configure {:?}", pin.number(), mode);
        match mode {
            PinMode::Unchanged => {}
            PinMode::Output => self.masked_write(port.dir, pin.mask(), pin.mask()),
            PinMode::Input => self.masked_write(port.dir, 0, pin.mask()),
            PinMode::InputWithPullup => {
                self.masked_write(port.dir, 0, pin.mask());
                // Output-level bit high while direction is input = pull-up on.
                self.masked_write(port.output, pin.mask(), pin.mask());
            }
        }
    }

    /// Drives a pin high or low. No-op for the null pin.
    pub fn pin_write(&mut self, pin: Pin, high: bool) {
        let Some(port) = pin.port() else {
            trace!("pin {}: write on null pin ignored", pin.number());
            return;
        };
        self.masked_write(port.output, if high { pin.mask() } else { 0 }, pin.mask());
    }

    /// Reads a pin's input level. Always `false` for the null pin.
    pub fn pin_read(&mut self, pin: Pin) -> bool {
        match pin.port() {
            Some(port) => self.bus.read(port.input) & pin.mask() != 0,
            None => false,
        }
    }

    /// Inverts a pin's output level. No-op for the null pin.
    pub fn pin_toggle(&mut self, pin: Pin) {
        let Some(port) = pin.port() else {
            return;
        };
        let cur = self.bus.read(port.output);
        self.bus.write(port.output, cur ^ pin.mask());
    }

    /// Whether a pin's direction bit currently selects output.
    ///
    /// `false` for the null pin.
    pub fn pin_is_output(&mut self, pin: Pin) -> bool {
        match pin.port() {
            Some(port) => self.bus.read(port.dir) & pin.mask() != 0,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::SimBus;
    use crate::chips::ATMEGA328P;

    #[test]
    fn pullup_configures_direction_then_level() {
        let mut gpio = Gpio::new(SimBus::new());
        let b = ATMEGA328P.port(b'B').unwrap();
        let pin9 = ATMEGA328P.pin(9).unwrap(); // PB1

        gpio.bus_mut().load(b.dir, 0xFF);
        gpio.pin_configure(pin9, PinMode::InputWithPullup);

        assert_eq!(gpio.bus().peek(b.dir), 0xFF & !0x02);
        assert_eq!(gpio.bus().peek(b.output), 0x02);
    }

    #[test]
    fn null_pin_operations_touch_nothing() {
        let mut gpio = Gpio::new(SimBus::new());
        gpio.pin_configure(Pin::NULL, PinMode::Output);
        gpio.pin_write(Pin::NULL, true);
        gpio.pin_toggle(Pin::NULL);
        assert!(!gpio.pin_read(Pin::NULL));
        assert!(!gpio.pin_is_output(Pin::NULL));
        assert_eq!(gpio.bus().total_reads(), 0);
        assert_eq!(gpio.bus().total_writes(), 0);
    }

    #[test]
    fn pin_write_preserves_siblings() {
        let mut gpio = Gpio::new(SimBus::new());
        let d = ATMEGA328P.port(b'D').unwrap();
        gpio.bus_mut().load(d.output, 0b1010_0000);

        let pin2 = ATMEGA328P.pin(2).unwrap(); // PD2
        gpio.pin_write(pin2, true);
        assert_eq!(gpio.bus().peek(d.output), 0b1010_0100);
        gpio.pin_write(pin2, false);
        assert_eq!(gpio.bus().peek(d.output), 0b1010_0000);
    }
}
