use thiserror::Error;

/// Errors that can occur when binding pins, ports, and peripherals.
///
/// Every variant is a configuration error surfaced at construction time.
/// Register access itself cannot fail at runtime; the single fatal runtime
/// condition (an interrupt with no registered handler) is deliberately a
/// panic rather than an `Error`, since it occurs in interrupt context with
/// no caller to hand a result to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested logical pin number has no mapping on the active chip.
    #[error("pin {pin} is not mapped on {chip}")]
    UnmappedPin {
        /// The logical pin number that was requested.
        pin: u8,
        /// Name of the chip whose table was consulted.
        chip: &'static str,
    },
    /// The requested port letter does not exist on the active chip.
    #[error("no port '{letter}' on {chip}")]
    UnknownPort {
        /// The port letter that was requested.
        letter: char,
        /// Name of the chip whose table was consulted.
        chip: &'static str,
    },
    /// The requested USART unit does not exist on the active chip.
    #[error("USART{unit} is not present on {chip}")]
    UnknownUart {
        /// The unit index that was requested.
        unit: u8,
        /// Name of the chip whose table was consulted.
        chip: &'static str,
    },
    /// Two virtual-port members resolve to the same physical bit.
    ///
    /// A virtual port must own each physical bit through exactly one logical
    /// slot; letting a later slot silently win would produce wrong hardware
    /// behavior, so this is rejected when the port is built.
    #[error("virtual port members alias bit {bit} of port {port}")]
    AliasedPins {
        /// Letter of the physical port holding the contested bit.
        port: char,
        /// Bit index (0-7) claimed by more than one member.
        bit: u8,
    },
    /// More member pins were supplied than a virtual port can hold.
    #[error("a virtual port holds at most 8 member pins (got {got})")]
    TooManyPins {
        /// Number of pins that were supplied.
        got: usize,
    },
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
