//! Serial link driver
//!
//! Owns the handshake detector and the frame decoder. Bytes are matched
//! against the handshake phrase first; only after the link is synchronized
//! do they reach the decoder, and complete frames are handed to the
//! dispatcher.

use lumin_hal::{SerialRx, SerialTx};
use lumin_protocol::{FrameDecoder, Handshake, ACK_LINE};

use crate::dispatch::{dispatch, Dispatch};
use crate::state::BridgeState;

/// Host link state
#[derive(Debug, Clone, Default)]
pub struct SerialLink {
    handshake: Handshake,
    decoder: FrameDecoder,
}

impl SerialLink {
    pub const fn new() -> Self {
        Self {
            handshake: Handshake::new(),
            decoder: FrameDecoder::new(),
        }
    }

    /// True once the host has said hello
    pub fn is_synchronized(&self) -> bool {
        self.handshake.is_complete()
    }

    /// Process one received byte
    ///
    /// Returns the dispatch outcome when the byte completed a frame.
    pub fn feed<T: SerialTx>(&mut self, byte: u8, tx: &mut T, state: &mut BridgeState) -> Option<Dispatch> {
        let was_synchronized = self.handshake.is_complete();

        if self.handshake.feed(byte) {
            if tx.write_bytes(ACK_LINE).is_err() {
                warn!("Handshake acknowledgement not sent");
            }
            if was_synchronized {
                info!("Host repeated handshake, acknowledged again");
            } else {
                info!("Handshake complete");
                // The phrase itself is never frame data
                return None;
            }
        }

        if !was_synchronized {
            return None;
        }

        match self.decoder.feed(byte) {
            Ok(Some(frame)) => {
                trace!("Frame received, {} bytes", frame.payload.len());
                Some(dispatch(state, &frame.payload))
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Frame discarded: {:?}", e);
                None
            }
        }
    }

    /// Drain everything `rx` has buffered
    ///
    /// Frames complete and dispatch in arrival order. Returns the number of
    /// bytes consumed.
    pub fn poll<R: SerialRx, T: SerialTx>(&mut self, rx: &mut R, tx: &mut T, state: &mut BridgeState) -> usize {
        let mut consumed = 0;
        while let Some(byte) = rx.read_byte() {
            consumed += 1;
            self.feed(byte, tx, state);
        }
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumin_protocol::{Device, DeviceCategory, Packet, MAX_FRAME_SIZE};

    #[derive(Default)]
    struct Sink {
        bytes: heapless::Vec<u8, 64>,
    }

    impl SerialTx for Sink {
        type Error = ();

        fn write_bytes(&mut self, data: &[u8]) -> Result<(), ()> {
            self.bytes.extend_from_slice(data)
        }
    }

    fn feed_all(link: &mut SerialLink, bytes: &[u8], tx: &mut Sink, state: &mut BridgeState) -> usize {
        bytes
            .iter()
            .filter_map(|&b| link.feed(b, tx, state))
            .count()
    }

    fn sync_frame() -> heapless::Vec<u8, MAX_FRAME_SIZE> {
        Packet::full_sync_frame(&[Device::new("Speaker", 1, 40, DeviceCategory::Volume)])
            .unwrap()
            .encode_to_vec()
            .unwrap()
    }

    #[test]
    fn test_frames_ignored_before_handshake() {
        let mut link = SerialLink::new();
        let mut tx = Sink::default();
        let mut state = BridgeState::new();

        assert_eq!(feed_all(&mut link, &sync_frame(), &mut tx, &mut state), 0);
        assert!(state.matrix().is_empty());
        assert!(tx.bytes.is_empty());
        assert!(!link.is_synchronized());
    }

    #[test]
    fn test_handshake_then_frame() {
        let mut link = SerialLink::new();
        let mut tx = Sink::default();
        let mut state = BridgeState::new();

        feed_all(&mut link, b"HELLO_LUMIN", &mut tx, &mut state);
        assert!(link.is_synchronized());
        assert_eq!(&tx.bytes[..], ACK_LINE);

        assert_eq!(feed_all(&mut link, &sync_frame(), &mut tx, &mut state), 1);
        assert_eq!(state.matrix().count(DeviceCategory::Volume), 1);
    }

    #[test]
    fn test_repeated_handshake_keeps_state() {
        let mut link = SerialLink::new();
        let mut tx = Sink::default();
        let mut state = BridgeState::new();

        feed_all(&mut link, b"HELLO_LUMIN", &mut tx, &mut state);
        feed_all(&mut link, &sync_frame(), &mut tx, &mut state);
        tx.bytes.clear();

        feed_all(&mut link, b"HELLO_LUMIN", &mut tx, &mut state);
        assert_eq!(&tx.bytes[..], ACK_LINE);
        assert_eq!(state.matrix().count(DeviceCategory::Volume), 1);
    }

    #[test]
    fn test_oversized_frame_resyncs() {
        let mut link = SerialLink::new();
        let mut tx = Sink::default();
        let mut state = BridgeState::new();

        feed_all(&mut link, b"HELLO_LUMIN", &mut tx, &mut state);
        assert_eq!(feed_all(&mut link, &[0xAA, 0xFF], &mut tx, &mut state), 0);
        assert_eq!(feed_all(&mut link, &sync_frame(), &mut tx, &mut state), 1);
    }

    #[test]
    fn test_poll_drains_receiver() {
        struct Script<'a>(&'a [u8]);

        impl SerialRx for Script<'_> {
            fn read_byte(&mut self) -> Option<u8> {
                let (&first, rest) = self.0.split_first()?;
                self.0 = rest;
                Some(first)
            }
        }

        let mut link = SerialLink::new();
        let mut tx = Sink::default();
        let mut state = BridgeState::new();
        let mut rx = Script(b"xxHELLO_LUMIN");

        assert_eq!(link.poll(&mut rx, &mut tx, &mut state), 13);
        assert!(link.is_synchronized());
        assert_eq!(link.poll(&mut rx, &mut tx, &mut state), 0);
    }
}
