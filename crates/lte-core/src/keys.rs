//! Decoding of raw terminal input into key events.

use anyhow::{Context, Result};
use std::io;

const ESC: u8 = 0x1b;
const DEL: u8 = 0x7f;

/// A decoded keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable or control code point. Enter arrives as `'\r'`.
    Char(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Backspace,
    Escape,
}

impl Key {
    pub const ENTER: Key = Key::Char('\r');

    /// The key produced by holding Ctrl with `c`.
    pub const fn ctrl(c: char) -> Key {
        Key::Char((c as u8 & 0x1f) as char)
    }
}

/// A byte stream that can time out.
///
/// `Ok(None)` signals a timeout or short read: nothing arrived yet, which
/// is distinct from a hard failure.
pub trait ByteSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// Turns bytes from a [`ByteSource`] into one [`Key`] per call.
pub struct KeyDecoder<S> {
    source: S,
    /// A byte read ahead while decoding that belongs to the next key.
    pending: Option<u8>,
}

impl<S: ByteSource> KeyDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: None,
        }
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Reads at most one key.
    ///
    /// Returns `Ok(None)` when no byte arrived within the source's timeout;
    /// the caller is expected to retry. Hard read errors on the first byte
    /// are returned; anything that goes wrong inside an escape sequence
    /// degrades to [`Key::Escape`].
    pub fn read_key(&mut self) -> Result<Option<Key>> {
        let next = match self.pending.take() {
            Some(byte) => Some(byte),
            None => self
                .source
                .read_byte()
                .context("failed to read from terminal input")?,
        };
        let Some(byte) = next else {
            return Ok(None);
        };

        let key = match byte {
            ESC => self.read_escape(),
            DEL => Key::Backspace,
            0x00..=0x7f => Key::Char(byte as char),
            lead => Key::Char(self.read_utf8(lead)),
        };
        Ok(Some(key))
    }

    fn next(&mut self) -> Option<u8> {
        if let Some(byte) = self.pending.take() {
            return Some(byte);
        }
        self.source.read_byte().ok().flatten()
    }

    fn read_escape(&mut self) -> Key {
        let Some(first) = self.next() else {
            return Key::Escape;
        };
        let Some(second) = self.next() else {
            return Key::Escape;
        };

        match (first, second) {
            (b'[', digit @ b'0'..=b'9') => match self.next() {
                Some(b'~') => match digit {
                    b'1' | b'7' => Key::Home,
                    b'4' | b'8' => Key::End,
                    b'3' => Key::Delete,
                    b'5' => Key::PageUp,
                    b'6' => Key::PageDown,
                    _ => Key::Escape,
                },
                _ => Key::Escape,
            },
            (b'[', b'A') => Key::ArrowUp,
            (b'[', b'B') => Key::ArrowDown,
            (b'[', b'C') => Key::ArrowRight,
            (b'[', b'D') => Key::ArrowLeft,
            (b'[', b'H') | (b'O', b'H') => Key::Home,
            (b'[', b'F') | (b'O', b'F') => Key::End,
            _ => {
                log::debug!("Unrecognized escape sequence: {:?}", [first, second]);
                Key::Escape
            }
        }
    }

    fn read_utf8(&mut self, lead: u8) -> char {
        let width = match lead {
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return char::REPLACEMENT_CHARACTER,
        };
        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.next() {
                Some(b @ 0x80..=0xbf) => *slot = b,
                Some(other) => {
                    // Starts the next key; keep it.
                    self.pending = Some(other);
                    return char::REPLACEMENT_CHARACTER;
                }
                None => return char::REPLACEMENT_CHARACTER,
            }
        }
        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays scripted reads; an exhausted script times out.
    struct Script(VecDeque<io::Result<Option<u8>>>);

    impl Script {
        fn bytes(bytes: &[u8]) -> Self {
            Self(bytes.iter().map(|b| Ok(Some(*b))).collect())
        }
    }

    impl ByteSource for Script {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    fn decode(bytes: &[u8]) -> Option<Key> {
        KeyDecoder::new(Script::bytes(bytes)).read_key().unwrap()
    }

    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut decoder = KeyDecoder::new(Script::bytes(bytes));
        let mut keys = Vec::new();
        while let Some(key) = decoder.read_key().unwrap() {
            keys.push(key);
        }
        keys
    }

    #[test]
    fn test_plain_bytes() {
        assert_eq!(decode(b"a"), Some(Key::Char('a')));
        assert_eq!(decode(b"\r"), Some(Key::ENTER));
        assert_eq!(decode(&[0x11]), Some(Key::ctrl('q')));
        assert_eq!(decode(&[0x7f]), Some(Key::Backspace));
    }

    #[test]
    fn test_timeout_is_not_a_key() {
        assert_eq!(decode(&[]), None);
    }

    #[test]
    fn test_hard_error_propagates() {
        let script = Script(VecDeque::from([Err(io::Error::other("gone"))]));
        assert!(KeyDecoder::new(script).read_key().is_err());
    }

    #[test]
    fn test_arrows_and_letters() {
        assert_eq!(decode(b"\x1b[A"), Some(Key::ArrowUp));
        assert_eq!(decode(b"\x1b[B"), Some(Key::ArrowDown));
        assert_eq!(decode(b"\x1b[C"), Some(Key::ArrowRight));
        assert_eq!(decode(b"\x1b[D"), Some(Key::ArrowLeft));
        assert_eq!(decode(b"\x1b[H"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[F"), Some(Key::End));
        assert_eq!(decode(b"\x1bOH"), Some(Key::Home));
        assert_eq!(decode(b"\x1bOF"), Some(Key::End));
    }

    #[test]
    fn test_tilde_sequences() {
        assert_eq!(decode(b"\x1b[1~"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[7~"), Some(Key::Home));
        assert_eq!(decode(b"\x1b[4~"), Some(Key::End));
        assert_eq!(decode(b"\x1b[8~"), Some(Key::End));
        assert_eq!(decode(b"\x1b[3~"), Some(Key::Delete));
        assert_eq!(decode(b"\x1b[5~"), Some(Key::PageUp));
        assert_eq!(decode(b"\x1b[6~"), Some(Key::PageDown));
    }

    #[test]
    fn test_bare_and_malformed_escape() {
        assert_eq!(decode(b"\x1b"), Some(Key::Escape));
        assert_eq!(decode(b"\x1b["), Some(Key::Escape));
        assert_eq!(decode(b"\x1b[9~"), Some(Key::Escape));
        assert_eq!(decode(b"\x1b[2x"), Some(Key::Escape));
        assert_eq!(decode(b"\x1b[Z"), Some(Key::Escape));
        assert_eq!(decode(b"\x1bOA"), Some(Key::Escape));
        assert_eq!(decode(b"\x1bxy"), Some(Key::Escape));
    }

    #[test]
    fn test_one_event_per_call() {
        assert_eq!(
            decode_all(b"a\x1b[Ab"),
            vec![Key::Char('a'), Key::ArrowUp, Key::Char('b')]
        );
    }

    #[test]
    fn test_error_inside_sequence_is_escape() {
        let script = Script(VecDeque::from([
            Ok(Some(ESC)),
            Ok(Some(b'[')),
            Err(io::Error::other("gone")),
        ]));
        assert_eq!(KeyDecoder::new(script).read_key().unwrap(), Some(Key::Escape));
    }

    #[test]
    fn test_utf8_input() {
        assert_eq!(decode("é".as_bytes()), Some(Key::Char('é')));
        assert_eq!(decode("世".as_bytes()), Some(Key::Char('世')));
        assert_eq!(decode(&[0xe4, 0xb8]), Some(Key::Char(char::REPLACEMENT_CHARACTER)));
        assert_eq!(decode(&[0xff]), Some(Key::Char(char::REPLACEMENT_CHARACTER)));
    }

    #[test]
    fn test_truncated_utf8_keeps_following_key() {
        assert_eq!(
            decode_all(&[0xc3, ESC, b'[', b'A']),
            vec![Key::Char(char::REPLACEMENT_CHARACTER), Key::ArrowUp]
        );
        assert_eq!(
            decode_all(&[0xe4, b'x', b'y']),
            vec![
                Key::Char(char::REPLACEMENT_CHARACTER),
                Key::Char('x'),
                Key::Char('y')
            ]
        );
        assert_eq!(
            decode_all(&[0xe4, 0xb8, 0xc3, 0xa9]),
            vec![Key::Char(char::REPLACEMENT_CHARACTER), Key::Char('é')]
        );
    }
}
