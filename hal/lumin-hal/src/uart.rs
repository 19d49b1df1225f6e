//! Serial communication abstractions
//!
//! The main loop is cooperative and must never stall on the link, so the
//! receive side is strictly non-blocking: a read either yields a byte that
//! is already buffered or reports that nothing is available.

/// Serial receiver
pub trait SerialRx {
    /// Take one buffered byte, or `None` if nothing has arrived yet.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Serial transmitter
pub trait SerialTx {
    /// Error type for transmit operations
    type Error;

    /// Queue `data` for transmission.
    ///
    /// There is no retry: a failed or partial write is reported once and
    /// the caller decides whether to care.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: SerialRx + ?Sized> SerialRx for &mut T {
    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }
}

impl<T: SerialTx + ?Sized> SerialTx for &mut T {
    type Error = T::Error;

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_bytes(data)
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}
