//! Text handshake that gates binary framing
//!
//! Before anything else the host sends [`HANDSHAKE_PHRASE`] as plain ASCII.
//! Printable bytes are collected into a small rolling buffer and matched as
//! a suffix, so the phrase is found no matter what noise preceded it.

use heapless::String;

/// Phrase the host sends to open the link
pub const HANDSHAKE_PHRASE: &str = "HELLO_LUMIN";

/// Line the firmware answers with
pub const ACK_LINE: &[u8] = b"LUMIN_ACK\r\n";

/// Capacity of the rolling text buffer
pub const TEXT_BUFFER_LEN: usize = 64;

// One spare slot so the byte that overflows is still matched before reset
const TEXT_CAPACITY: usize = TEXT_BUFFER_LEN + 1;

/// Handshake phrase detector
///
/// The completion flag is one-way: once set it stays set for the life of
/// the process. The phrase is still recognized afterwards so a restarted
/// host gets its acknowledgement again.
#[derive(Debug, Clone, Default)]
pub struct Handshake {
    text: String<TEXT_CAPACITY>,
    complete: bool,
}

impl Handshake {
    /// Create a detector in the not-yet-synchronized state
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            complete: false,
        }
    }

    /// True once the phrase has been seen
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Feed one byte from the link
    ///
    /// Returns `true` when this byte completed the handshake phrase; the
    /// caller should answer with [`ACK_LINE`].
    pub fn feed(&mut self, byte: u8) -> bool {
        if !is_printable(byte) {
            return false;
        }

        // Holds at most TEXT_BUFFER_LEN here, so there is always room
        let _ = self.text.push(byte as char);

        if self.text.ends_with(HANDSHAKE_PHRASE) {
            self.text.clear();
            self.complete = true;
            return true;
        }

        if self.text.len() > TEXT_BUFFER_LEN {
            self.text.clear();
        }

        false
    }
}

fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(handshake: &mut Handshake, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&b| handshake.feed(b)).count()
    }

    #[test]
    fn test_phrase_completes_handshake() {
        let mut handshake = Handshake::new();
        assert!(!handshake.is_complete());
        assert_eq!(feed_all(&mut handshake, b"HELLO_LUMIN"), 1);
        assert!(handshake.is_complete());
    }

    #[test]
    fn test_phrase_after_noise() {
        let mut handshake = Handshake::new();
        assert_eq!(feed_all(&mut handshake, b"garbage\x00\xAA HELLO_LUMIN\r\n"), 1);
        assert!(handshake.is_complete());
    }

    #[test]
    fn test_non_printable_bytes_are_skipped() {
        let mut handshake = Handshake::new();
        assert_eq!(feed_all(&mut handshake, b"HELLO\x01\xAA_LUMIN"), 1);
    }

    #[test]
    fn test_partial_phrase_does_not_complete() {
        let mut handshake = Handshake::new();
        assert_eq!(feed_all(&mut handshake, b"HELLO_LUMI"), 0);
        assert!(!handshake.is_complete());
    }

    #[test]
    fn test_buffer_overflow_resets() {
        let mut handshake = Handshake::new();
        let noise = [b'x'; TEXT_BUFFER_LEN + 5];
        assert_eq!(feed_all(&mut handshake, &noise), 0);
        assert_eq!(feed_all(&mut handshake, b"HELLO_LUMIN"), 1);
    }

    #[test]
    fn test_phrase_ending_on_overflowing_byte() {
        let mut handshake = Handshake::new();
        let noise = [b'x'; TEXT_BUFFER_LEN - HANDSHAKE_PHRASE.len() + 1];
        assert_eq!(feed_all(&mut handshake, &noise), 0);
        assert_eq!(feed_all(&mut handshake, HANDSHAKE_PHRASE.as_bytes()), 1);
        assert!(handshake.is_complete());
    }

    #[test]
    fn test_repeat_phrase_is_acknowledged_again() {
        let mut handshake = Handshake::new();
        assert_eq!(feed_all(&mut handshake, b"HELLO_LUMIN"), 1);
        assert_eq!(feed_all(&mut handshake, b"HELLO_LUMIN"), 1);
        assert!(handshake.is_complete());
    }
}
