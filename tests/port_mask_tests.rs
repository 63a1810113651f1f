//! Masked port operation discipline.
//!
//! These tests pin down the register-access contract of the port layer:
//! full-mask writes go straight to the register with no preceding read,
//! partial-mask writes preserve every bit outside the mask, and a zero mask
//! performs no access at all.

use atmega_vport::bus::SimBus;
use atmega_vport::chips::ATMEGA328P;
use atmega_vport::gpio::{Gpio, ALL_PINS};

#[test]
fn full_mask_write_performs_no_read() {
    let mut gpio = Gpio::new(SimBus::new());
    let b = ATMEGA328P.port(b'B').unwrap();

    gpio.port_set_direction(b, 0b1111_0000, ALL_PINS);
    gpio.port_write(b, 0b1010_1010, ALL_PINS);

    assert_eq!(gpio.bus().peek(b.dir), 0b1111_0000);
    assert_eq!(gpio.bus().peek(b.output), 0b1010_1010);
    assert_eq!(gpio.bus().total_reads(), 0);
    assert_eq!(gpio.bus().write_count(b.dir), 1);
    assert_eq!(gpio.bus().write_count(b.output), 1);
}

#[test]
fn partial_mask_reads_then_writes_once() {
    let mut gpio = Gpio::new(SimBus::new());
    let d = ATMEGA328P.port(b'D').unwrap();

    gpio.port_write(d, 0b0000_0110, 0b0000_1111);

    assert_eq!(gpio.bus().read_count(d.output), 1);
    assert_eq!(gpio.bus().write_count(d.output), 1);
}

#[test]
fn partial_mask_preserves_outside_bits() {
    let mut gpio = Gpio::new(SimBus::new());
    let c = ATMEGA328P.port(b'C').unwrap();
    gpio.bus_mut().load(c.output, 0b1100_0011);

    gpio.port_write(c, 0b0011_1100, 0b0011_0000);

    // Bits 5:4 updated from the value, everything else untouched.
    assert_eq!(gpio.bus().peek(c.output), 0b1111_0011);
}

#[test]
fn masked_write_is_idempotent() {
    let mut gpio = Gpio::new(SimBus::new());
    let b = ATMEGA328P.port(b'B').unwrap();
    gpio.bus_mut().load(b.output, 0b0101_0101);

    gpio.port_write(b, 0b0000_1010, 0b0000_1111);
    let once = gpio.bus().peek(b.output);
    gpio.port_write(b, 0b0000_1010, 0b0000_1111);

    assert_eq!(gpio.bus().peek(b.output), once);
    assert_eq!(once, 0b0101_1010);
}

#[test]
fn zero_mask_performs_no_access() {
    let mut gpio = Gpio::new(SimBus::new());
    let d = ATMEGA328P.port(b'D').unwrap();

    gpio.port_set_direction(d, 0xFF, 0);
    gpio.port_write(d, 0xFF, 0);
    assert_eq!(gpio.port_read(d, 0), 0);

    assert_eq!(gpio.bus().total_reads(), 0);
    assert_eq!(gpio.bus().total_writes(), 0);
}

#[test]
fn read_is_premasked() {
    let mut gpio = Gpio::new(SimBus::new());
    let c = ATMEGA328P.port(b'C').unwrap();
    gpio.bus_mut().load(c.input, 0b1011_0110);

    assert_eq!(gpio.port_read(c, 0b0000_1111), 0b0000_0110);
    assert_eq!(gpio.port_read(c, ALL_PINS), 0b1011_0110);
}

#[test]
fn direction_value_is_clipped_to_mask() {
    let mut gpio = Gpio::new(SimBus::new());
    let b = ATMEGA328P.port(b'B').unwrap();
    gpio.bus_mut().load(b.dir, 0b0000_0001);

    // Value bits outside the mask must not leak into the register.
    gpio.port_set_direction(b, 0b1111_1110, 0b0000_0110);
    assert_eq!(gpio.bus().peek(b.dir), 0b0000_0111);
}
