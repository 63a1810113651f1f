//! Scoped interrupt-disable critical sections.
//!
//! Single pin/port operations are interrupt-safe on their own (each is at
//! most one read-modify-write), but a sequence of them is not. Callers that
//! need a multi-operation sequence to be atomic with respect to interrupts
//! disable them for the duration and restore the *prior* enable state on
//! every exit path — early returns and unwinds included.
//!
//! A single scope uses the RAII [`CriticalSection`] guard. Critical code
//! that may itself enter a critical section runs through
//! [`IrqControl::with`], which hands the control back to the closure: an
//! inner section observes "already disabled" and leaves re-enabling to the
//! outermost exit, so nesting composes.

use crate::bus::RegisterBus;

/// Global interrupt enable control.
pub trait IrqControl {
    /// Disables interrupts, returning whether they were enabled before.
    fn disable(&mut self) -> bool;

    /// Restores the enable state captured by a prior [`disable`](Self::disable).
    fn restore(&mut self, was_enabled: bool);

    /// Runs `f` with interrupts disabled, restoring the prior state after.
    ///
    /// The closure receives the control back, so it can read its state or
    /// enter a nested section; the nested section captures "already
    /// disabled" and its exit changes nothing. Restoration happens on every
    /// exit path, including a panic unwinding out of `f`.
    fn with<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        struct Restore<'a, C: IrqControl> {
            control: &'a mut C,
            was_enabled: bool,
        }
        impl<C: IrqControl> Drop for Restore<'_, C> {
            fn drop(&mut self) {
                self.control.restore(self.was_enabled);
            }
        }

        let was_enabled = self.disable();
        let mut scope = Restore {
            control: self,
            was_enabled,
        };
        f(&mut *scope.control)
    }
}

/// RAII guard holding interrupts disabled for its lifetime.
///
/// Borrows the control exclusively, so it covers one straight-line scope;
/// code that needs to nest sections on the same control uses
/// [`IrqControl::with`] instead.
#[derive(Debug)]
pub struct CriticalSection<'a, C: IrqControl> {
    control: &'a mut C,
    was_enabled: bool,
}

impl<'a, C: IrqControl> CriticalSection<'a, C> {
    /// Disables interrupts, remembering the prior state.
    pub fn enter(control: &'a mut C) -> Self {
        let was_enabled = control.disable();
        CriticalSection {
            control,
            was_enabled,
        }
    }
}

impl<C: IrqControl> Drop for CriticalSection<'_, C> {
    fn drop(&mut self) {
        self.control.restore(self.was_enabled);
    }
}

/// AVR global interrupt flag (the I bit in SREG), driven over a register bus.
///
/// SREG lives at data-space address 0x5F; bit 7 is the global enable. Tests
/// run it over [`SimBus`](crate::bus::SimBus).
#[derive(Debug)]
pub struct SregIrq<B: RegisterBus> {
    bus: B,
}

const SREG_ADDR: u16 = 0x5F;
const SREG_I: u8 = 1 << 7;

impl<B: RegisterBus> SregIrq<B> {
    /// Creates the control over a register bus.
    pub fn new(bus: B) -> Self {
        SregIrq { bus }
    }

    /// Shared access to the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B: RegisterBus> IrqControl for SregIrq<B> {
    fn disable(&mut self) -> bool {
        let sreg = self.bus.read(SREG_ADDR);
        self.bus.write(SREG_ADDR, sreg & !SREG_I);
        sreg & SREG_I != 0
    }

    fn restore(&mut self, was_enabled: bool) {
        if was_enabled {
            let sreg = self.bus.read(SREG_ADDR);
            self.bus.write(SREG_ADDR, sreg | SREG_I);
        }
    }
}
