//! Register access seam.
//!
//! All register traffic in the crate funnels through the [`RegisterBus`]
//! trait: one read and one write entry point, addressed by AVR data-space
//! address. On hardware the bus is [`MmioBus`] (volatile memory-mapped
//! access); on the host it is [`SimBus`], a RAM-backed data-space image that
//! additionally counts accesses so tests can assert the access discipline of
//! higher layers (e.g. that a full-mask write performs no preceding read).
//!
//! Bus access is infallible: memory-mapped I/O cannot fail at runtime.
//! Invalid pin/port/peripheral bindings are rejected when they are
//! constructed, not when they are used.

use log::trace;

/// Size of the modeled AVR data space (registers + I/O + extended I/O).
const DATA_SPACE: usize = 0x0100;

/// Byte-wide register access by data-space address.
pub trait RegisterBus {
    /// Reads the register at `addr`.
    fn read(&mut self, addr: u16) -> u8;

    /// Writes `value` to the register at `addr`.
    fn write(&mut self, addr: u16, value: u8);
}

/// Memory-mapped register access for real hardware.
///
/// Each access is a single volatile load or store of the data-space address.
/// This type is only meaningful on a target where the addresses handed to it
/// are mapped I/O registers; constructing it is therefore `unsafe`.
#[derive(Debug, Clone, Copy)]
pub struct MmioBus(());

impl MmioBus {
    /// Creates a memory-mapped bus.
    ///
    /// # Safety
    ///
    /// The caller must ensure that every address later passed to
    /// [`RegisterBus::read`] / [`RegisterBus::write`] is a valid, mapped I/O
    /// register on the running target, and that no other owner performs
    /// conflicting non-volatile access to those registers.
    pub const unsafe fn new() -> Self {
        MmioBus(())
    }
}

impl RegisterBus for MmioBus {
    #[inline(always)]
    fn read(&mut self, addr: u16) -> u8 {
        // Volatile: the hardware may change the value between any two reads.
        unsafe { core::ptr::read_volatile(addr as usize as *const u8) }
    }

    #[inline(always)]
    fn write(&mut self, addr: u16, value: u8) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u8, value) }
    }
}

/// RAM-backed register model with access counting.
///
/// Holds a flat data-space image the way an AVR core model does, plus
/// per-address read/write counters and a journal of writes in issue order.
/// Used for host-side tests and simulation; none of the core logic depends
/// on these extras.
#[derive(Debug, Clone)]
pub struct SimBus {
    data: Vec<u8>,
    reads: Vec<u32>,
    writes: Vec<u32>,
    journal: Vec<(u16, u8)>,
}

impl SimBus {
    /// Creates a bus with the whole data space zeroed.
    pub fn new() -> Self {
        SimBus {
            data: vec![0u8; DATA_SPACE],
            reads: vec![0u32; DATA_SPACE],
            writes: vec![0u32; DATA_SPACE],
            journal: Vec::new(),
        }
    }

    /// Seeds a register value without counting the access.
    pub fn load(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    /// Peeks at a register value without counting the access.
    pub fn peek(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    /// Number of reads issued against `addr`.
    pub fn read_count(&self, addr: u16) -> u32 {
        self.reads[addr as usize]
    }

    /// Number of writes issued against `addr`.
    pub fn write_count(&self, addr: u16) -> u32 {
        self.writes[addr as usize]
    }

    /// Total reads across the whole data space.
    pub fn total_reads(&self) -> u32 {
        self.reads.iter().sum()
    }

    /// Total writes across the whole data space.
    pub fn total_writes(&self) -> u32 {
        self.writes.iter().sum()
    }

    /// All writes in issue order, as `(addr, value)` pairs.
    pub fn journal(&self) -> &[(u16, u8)] {
        &self.journal
    }

    /// Clears the counters and the journal, keeping register contents.
    pub fn reset_counters(&mut self) {
        self.reads.iter_mut().for_each(|c| *c = 0);
        self.writes.iter_mut().for_each(|c| *c = 0);
        self.journal.clear();
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterBus for SimBus {
    fn read(&mut self, addr: u16) -> u8 {
        let value = self.data[addr as usize];
        self.reads[addr as usize] += 1;
        trace!("bus read  0x{:02X} -> 0x{:02X}", addr, value);
        value
    }

    fn write(&mut self, addr: u16, value: u8) {
        trace!("bus write 0x{:02X} <- 0x{:02X}", addr, value);
        self.data[addr as usize] = value;
        self.writes[addr as usize] += 1;
        self.journal.push((addr, value));
    }
}
