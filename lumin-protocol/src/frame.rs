//! Frame encoding and decoding for the serial link.
//!
//! Frame format:
//! - MARKER (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - PAYLOAD (LENGTH bytes): packet tag followed by the packet body

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Capacity of the decoder's payload buffer
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Maximum complete frame size (MARKER + LENGTH + MAX_PAYLOAD)
pub const MAX_FRAME_SIZE: usize = 1 + 1 + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame decoding or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Declared or supplied payload exceeds the buffer capacity
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A complete payload lifted off the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Payload data; the first byte is the packet tag
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame carrying `payload`
    pub fn new(payload: &[u8]) -> Result<Self, FrameError> {
        let mut vec = Vec::new();
        vec.extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { payload: vec })
    }

    /// Packet tag, if the payload is not empty
    pub fn tag(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = 2 + self.payload.len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        buffer[0] = FRAME_START;
        buffer[1] = self.payload.len() as u8;
        buffer[2..frame_len].copy_from_slice(&self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| FrameError::BufferTooSmall)?;
        Ok(vec)
    }
}

/// State machine for decoding incoming frames
///
/// Feeding is byte-at-a-time and never blocks; the partial frame survives
/// between calls, so a frame split across several polls is reassembled.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeState {
    /// Discarding bytes until a marker shows up
    AwaitMarker,
    /// Got the marker, next byte is the length
    AwaitLength,
    /// Accumulating payload bytes
    AwaitPayload,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a new frame decoder
    pub const fn new() -> Self {
        Self {
            state: DecodeState::AwaitMarker,
            buffer: Vec::new(),
            expected_length: 0,
        }
    }

    /// Reset the decoder state
    pub fn reset(&mut self) {
        self.state = DecodeState::AwaitMarker;
        self.buffer.clear();
        self.expected_length = 0;
    }

    /// Current decoder state
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Ok(Some(frame))` when a frame is complete, `Ok(None)` when
    /// more bytes are needed, or `Err` when the frame was abandoned. The
    /// decoder is back in [`DecodeState::AwaitMarker`] after either of the
    /// last two outcomes that end a frame.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            DecodeState::AwaitMarker => {
                if byte == FRAME_START {
                    self.state = DecodeState::AwaitLength;
                }
                Ok(None)
            }
            DecodeState::AwaitLength => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                self.expected_length = byte;
                self.buffer.clear();
                if byte == 0 {
                    return Ok(Some(self.finish()));
                }
                self.state = DecodeState::AwaitPayload;
                Ok(None)
            }
            DecodeState::AwaitPayload => {
                if self.buffer.push(byte).is_err() {
                    // Unreachable while the length check above holds
                    self.reset();
                    return Err(FrameError::PayloadTooLarge);
                }
                if self.buffer.len() == self.expected_length as usize {
                    return Ok(Some(self.finish()));
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes to the decoder
    ///
    /// Returns the first complete frame found, if any.
    /// Remaining bytes after a complete frame are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    fn finish(&mut self) -> Frame {
        let frame = Frame {
            payload: self.buffer.clone(),
        };
        self.reset();
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_encode_reset() {
        let frame = Frame::new(&[0x00]).unwrap();
        let mut buffer = [0u8; 8];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 3);
        assert_eq!(&buffer[..3], &[FRAME_START, 1, 0x00]);
    }

    #[test]
    fn test_frame_encode_buffer_too_small() {
        let frame = Frame::new(&[0x10, 1, 2, 3]).unwrap();
        let mut buffer = [0u8; 5];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_decoder_reassembles_split_frame() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed_bytes(&[FRAME_START, 4, 0x10]), Ok(None));
        assert_eq!(decoder.state(), DecodeState::AwaitPayload);

        let frame = decoder.feed_bytes(&[7, 55, 1]).unwrap().unwrap();
        assert_eq!(&frame.payload[..], &[0x10, 7, 55, 1]);
        assert_eq!(decoder.state(), DecodeState::AwaitMarker);
    }

    #[test]
    fn test_decoder_resync_after_garbage() {
        let mut decoder = FrameDecoder::new();
        let data = [0x00, 0xFF, 0x12, 0x34, FRAME_START, 1, 0x00];
        let frame = decoder.feed_bytes(&data).unwrap().unwrap();
        assert_eq!(frame.tag(), Some(0x00));
    }

    #[test]
    fn test_decoder_rejects_oversized_length() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(decoder.feed(FRAME_START), Ok(None));
        assert_eq!(
            decoder.feed(MAX_PAYLOAD_SIZE as u8 + 1),
            Err(FrameError::PayloadTooLarge)
        );
        assert_eq!(decoder.state(), DecodeState::AwaitMarker);

        // The bytes that would have been the payload are now just noise
        assert_eq!(decoder.feed_bytes(&[0x01, 0x02, 0x03]), Ok(None));
        assert_eq!(decoder.state(), DecodeState::AwaitMarker);
    }

    #[test]
    fn test_decoder_accepts_max_length() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(FRAME_START).unwrap();
        decoder.feed(MAX_PAYLOAD_SIZE as u8).unwrap();
        let mut last = None;
        for i in 0..MAX_PAYLOAD_SIZE {
            last = decoder.feed(i as u8).unwrap();
        }
        let frame = last.unwrap();
        assert_eq!(frame.payload.len(), MAX_PAYLOAD_SIZE);
    }

    #[test]
    fn test_decoder_zero_length_frame_is_empty() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(FRAME_START).unwrap();
        let frame = decoder.feed(0).unwrap().unwrap();
        assert!(frame.payload.is_empty());
        assert_eq!(frame.tag(), None);
        assert_eq!(decoder.state(), DecodeState::AwaitMarker);
    }

    #[test]
    fn test_marker_inside_payload_is_data() {
        let mut decoder = FrameDecoder::new();
        let frame = decoder
            .feed_bytes(&[FRAME_START, 3, 0x10, FRAME_START, FRAME_START])
            .unwrap()
            .unwrap();
        assert_eq!(&frame.payload[..], &[0x10, FRAME_START, FRAME_START]);
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(Frame::new(&large_payload), Err(FrameError::PayloadTooLarge));
    }
}
