//! Host link over the buffered UART
//!
//! Adapts the RP2040 buffered UART halves to the non-blocking
//! `SerialRx` / `SerialTx` traits the bridge expects.

use defmt::*;
use embassy_rp::uart::{self, BufferedUartRx, BufferedUartTx};
use embedded_io::{Read, ReadReady, Write};
use lumin_hal::{SerialRx, SerialTx};

/// Receive half
pub struct UartReceiver {
    rx: BufferedUartRx,
}

impl UartReceiver {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl SerialRx for UartReceiver {
    fn read_byte(&mut self) -> Option<u8> {
        match self.rx.read_ready() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!("UART status error: {:?}", e);
                return None;
            }
        }

        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                None
            }
        }
    }
}

/// Transmit half
pub struct UartSender {
    tx: BufferedUartTx,
}

impl UartSender {
    pub fn new(tx: BufferedUartTx) -> Self {
        Self { tx }
    }
}

impl SerialTx for UartSender {
    type Error = uart::Error;

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), uart::Error> {
        self.tx.write_all(data)
    }
}
