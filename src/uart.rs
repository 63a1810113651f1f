//! Interrupt-driven USART driver core.
//!
//! One [`Uart`] per hardware unit, bound to its register block at
//! construction. The driver owns exactly one replaceable event handler; the
//! interrupt vector body is [`Uart::service`], which reads the pending event
//! bits and invokes the handler synchronously. An enabled interrupt firing
//! with no handler registered is fatal by design: returning silently would
//! leave the event source asserted and storm the CPU, so the driver panics
//! instead (the host-platform mapping of the original halt-forever policy).
//!
//! No buffering, flow control, or framing lives here — those are layered on
//! top of the raw byte-event callback by the application.

use log::{debug, trace};
use std::fmt;

use crate::bus::RegisterBus;
use crate::chips::UartRegs;

// UCSRnB bits outside the event-enable field.
const RX_ENABLE: u8 = 1 << 4;
const TX_ENABLE: u8 = 1 << 3;

/// Event (interrupt cause) bits of one USART unit.
///
/// Values follow the AVR UCSRnA/UCSRnB layout, where a cause bit in the
/// status register and its enable bit in the control register share the same
/// position; enabling an event is therefore a control-register RMW with the
/// event's own bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartEvent(u8);

impl UartEvent {
    /// A received byte is waiting in the data register.
    pub const RX_COMPLETE: UartEvent = UartEvent(1 << 7);
    /// The previous transmission has fully left the shift register.
    pub const TX_COMPLETE: UartEvent = UartEvent(1 << 6);
    /// The data register can accept the next byte to transmit.
    pub const DATA_EMPTY: UartEvent = UartEvent(1 << 5);

    /// No events.
    pub const NONE: UartEvent = UartEvent(0);

    const MASK: u8 = 0b1110_0000;

    /// Raw bit representation (status/control register positions).
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Builds an event set from raw status bits, discarding non-event bits.
    #[inline]
    pub const fn from_status(raw: u8) -> Self {
        UartEvent(raw & Self::MASK)
    }

    /// Whether every event in `other` is present in `self`.
    #[inline]
    pub const fn contains(self, other: UartEvent) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no event is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for UartEvent {
    type Output = UartEvent;
    fn bitor(self, rhs: UartEvent) -> UartEvent {
        UartEvent(self.0 | rhs.0)
    }
}

/// Driver lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Register block bound and unit enabled; no event sources armed yet.
    Configured,
    /// At least one event source has been enabled since construction.
    Running,
}

/// The single per-unit event handler slot.
pub type EventHandler = Box<dyn FnMut(UartEvent) + Send>;

/// Driver core for one USART unit.
///
/// Owns its register bus outright: peripheral register blocks are disjoint,
/// so instances share nothing and need no cross-instance locking. The
/// handler slot is written outside interrupt context and read inside it;
/// replacing the handler while its events are enabled must be wrapped in a
/// [`CriticalSection`](crate::irq::CriticalSection) by the caller.
pub struct Uart<B: RegisterBus> {
    regs: UartRegs,
    bus: B,
    state: DriverState,
    handler: Option<EventHandler>,
}

impl<B: RegisterBus> Uart<B> {
    /// Binds the driver to a register block and enables the unit.
    ///
    /// Performs the receiver/transmitter enable write, leaving the driver
    /// [`DriverState::Configured`] with all event sources off.
    pub fn new(regs: UartRegs, mut bus: B) -> Self {
        let cur = bus.read(regs.control);
        bus.write(regs.control, cur | RX_ENABLE | TX_ENABLE);
        debug!("uart{}: unit enabled", regs.unit);
        Uart {
            regs,
            bus,
            state: DriverState::Configured,
            handler: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Registers the event handler, replacing any previous one.
    ///
    /// The driver holds exactly one handler; the last registration wins.
    /// Never having a handler is legal — right up until an enabled event
    /// fires (see [`service`](Self::service)).
    pub fn set_handler(&mut self, handler: impl FnMut(UartEvent) + Send + 'static) {
        if self.handler.is_some() {
            debug!("uart{}: handler replaced", self.regs.unit);
        }
        self.handler = Some(Box::new(handler));
    }

    /// Removes the handler. Returns whether one was registered.
    pub fn clear_handler(&mut self) -> bool {
        self.handler.take().is_some()
    }

    /// Whether a handler is currently registered.
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Enables event source(s), arming their interrupt.
    ///
    /// An empty event set arms nothing: no register access, no lifecycle
    /// change.
    pub fn enable_event(&mut self, events: UartEvent) {
        if events.is_empty() {
            return;
        }
        debug!("uart{}: enable events {:#04X}", self.regs.unit, events.bits());
        let cur = self.bus.read(self.regs.control);
        self.bus.write(self.regs.control, cur | events.bits());
        self.state = DriverState::Running;
    }

    /// Disables event source(s).
    pub fn disable_event(&mut self, events: UartEvent) {
        debug!(
            "uart{}: disable events {:#04X}",
            self.regs.unit,
            events.bits()
        );
        let cur = self.bus.read(self.regs.control);
        self.bus.write(self.regs.control, cur & !events.bits());
    }

    /// Reads the pending event bits from the status register.
    ///
    /// Does not clear them: on this hardware a cause is cleared as a side
    /// effect of the data-register access the handler performs next, and the
    /// handler must respect that protocol.
    pub fn pending_events(&mut self) -> UartEvent {
        let events = UartEvent::from_status(self.bus.read(self.regs.status));
        trace!("uart{}: pending {:#04X}", self.regs.unit, events.bits());
        events
    }

    /// Interrupt vector body: dispatch the pending events to the handler.
    ///
    /// Invoked from interrupt context only. The handler runs synchronously
    /// and must not block or perform unbounded work.
    ///
    /// # Panics
    ///
    /// Panics if no handler is registered. An unserviced interrupt source
    /// stays asserted and would re-enter forever; halting is the only safe
    /// outcome, and it must not look like a successful return.
    pub fn service(&mut self) {
        let events = self.pending_events();
        match self.handler.as_mut() {
            Some(handler) => handler(events),
            None => panic!(
                "uart{}: interrupt fired with no registered handler",
                self.regs.unit
            ),
        }
    }

    /// Reads the data register (receive side).
    pub fn read_byte(&mut self) -> u8 {
        self.bus.read(self.regs.data)
    }

    /// Writes the data register (transmit side).
    pub fn write_byte(&mut self, byte: u8) {
        self.bus.write(self.regs.data, byte);
    }

    /// Shared access to the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Exclusive access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B: RegisterBus> fmt::Debug for Uart<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uart")
            .field("unit", &self.regs.unit)
            .field("state", &self.state)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
