//! USART driver core: lifecycle, event enables, and dispatch policy.

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use atmega_vport::bus::SimBus;
use atmega_vport::chips::ATMEGA328P;
use atmega_vport::uart::{DriverState, Uart, UartEvent};

fn uart() -> Uart<SimBus> {
    Uart::new(ATMEGA328P.uart(0).unwrap(), SimBus::new())
}

#[test]
fn construction_enables_the_unit() {
    let u = uart();
    let regs = ATMEGA328P.uart(0).unwrap();
    // Receiver and transmitter enable bits of UCSR0B.
    assert_eq!(u.bus().peek(regs.control) & 0b0001_1000, 0b0001_1000);
    assert_eq!(u.state(), DriverState::Configured);
    assert!(!u.has_handler());
}

#[test]
fn event_enable_is_a_control_register_rmw() {
    let mut u = uart();
    let regs = ATMEGA328P.uart(0).unwrap();

    u.enable_event(UartEvent::RX_COMPLETE);
    assert_eq!(u.state(), DriverState::Running);
    assert_ne!(u.bus().peek(regs.control) & UartEvent::RX_COMPLETE.bits(), 0);
    // The unit-enable bits from construction survive.
    assert_eq!(u.bus().peek(regs.control) & 0b0001_1000, 0b0001_1000);

    u.enable_event(UartEvent::DATA_EMPTY);
    u.disable_event(UartEvent::RX_COMPLETE);
    let ctrl = u.bus().peek(regs.control);
    assert_eq!(ctrl & UartEvent::RX_COMPLETE.bits(), 0);
    assert_ne!(ctrl & UartEvent::DATA_EMPTY.bits(), 0);
}

#[test]
fn empty_event_set_does_not_start_the_driver() {
    let mut u = uart();
    let regs = ATMEGA328P.uart(0).unwrap();
    let control_writes = u.bus().write_count(regs.control);

    u.enable_event(UartEvent::NONE);

    assert_eq!(u.state(), DriverState::Configured);
    assert_eq!(u.bus().write_count(regs.control), control_writes);
}

#[test]
fn pending_events_do_not_clear_status() {
    let mut u = uart();
    let regs = ATMEGA328P.uart(0).unwrap();
    u.bus_mut()
        .load(regs.status, UartEvent::RX_COMPLETE.bits() | UartEvent::DATA_EMPTY.bits());

    let pending = u.pending_events();
    assert!(pending.contains(UartEvent::RX_COMPLETE));
    assert!(pending.contains(UartEvent::DATA_EMPTY));
    assert!(!pending.contains(UartEvent::TX_COMPLETE));

    // Reading the cause leaves the status register alone.
    assert_eq!(u.pending_events(), pending);
    assert_eq!(u.bus().write_count(regs.status), 0);
}

#[test]
fn non_event_status_bits_are_discarded() {
    let mut u = uart();
    let regs = ATMEGA328P.uart(0).unwrap();
    // Frame error / data overrun style bits live below the event field.
    u.bus_mut().load(regs.status, 0b0001_1111);
    assert!(u.pending_events().is_empty());
}

#[test]
fn dispatch_invokes_handler_with_cause() {
    let mut u = uart();
    let regs = ATMEGA328P.uart(0).unwrap();
    u.bus_mut().load(regs.status, UartEvent::RX_COMPLETE.bits());

    let seen = Arc::new(AtomicU8::new(0));
    let seen_in_handler = Arc::clone(&seen);
    u.set_handler(move |events| {
        seen_in_handler.store(events.bits(), Ordering::SeqCst);
    });

    u.service();
    assert_eq!(seen.load(Ordering::SeqCst), UartEvent::RX_COMPLETE.bits());
}

#[test]
fn last_registered_handler_wins() {
    let mut u = uart();

    let first_calls = Arc::new(AtomicUsize::new(0));
    let second_calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&first_calls);
    u.set_handler(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = Arc::clone(&second_calls);
    u.set_handler(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    u.service();
    u.service();

    assert_eq!(first_calls.load(Ordering::SeqCst), 0);
    assert_eq!(second_calls.load(Ordering::SeqCst), 2);
}

#[test]
#[should_panic(expected = "no registered handler")]
fn dispatch_without_handler_is_fatal() {
    let mut u = uart();
    u.enable_event(UartEvent::RX_COMPLETE);
    u.service();
}

#[test]
#[should_panic(expected = "no registered handler")]
fn cleared_handler_makes_dispatch_fatal_again() {
    let mut u = uart();
    u.set_handler(|_| {});
    assert!(u.clear_handler());
    assert!(!u.clear_handler());
    u.service();
}

#[test]
fn data_register_passthrough() {
    let mut u = uart();
    let regs = ATMEGA328P.uart(0).unwrap();

    u.write_byte(0x42);
    assert_eq!(u.bus().peek(regs.data), 0x42);

    u.bus_mut().load(regs.data, 0x99);
    assert_eq!(u.read_byte(), 0x99);
}

#[test]
fn handler_can_echo_through_the_data_register() {
    // The shape of a real RX echo handler: dispatch hands the cause to the
    // callback, which then performs the data-register protocol itself.
    let mut u = uart();
    let regs = ATMEGA328P.uart(0).unwrap();
    u.bus_mut().load(regs.status, UartEvent::RX_COMPLETE.bits());
    u.bus_mut().load(regs.data, b'x');

    let received = Arc::new(AtomicU8::new(0));
    let sink = Arc::clone(&received);
    u.set_handler(move |events| {
        assert!(events.contains(UartEvent::RX_COMPLETE));
        sink.store(1, Ordering::SeqCst);
    });
    u.service();
    assert_eq!(received.load(Ordering::SeqCst), 1);
    assert_eq!(u.read_byte(), b'x');
}
