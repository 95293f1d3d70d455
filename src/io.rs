//! Input and output adapters used by the read and write actions.


use std::io::{self, BufRead, ErrorKind, Read, Write};
use std::slice;


/// Source of input bytes for the read action.
pub trait ByteSource {
    /// Read the next input byte.
    /// # Returns
    /// * `Some(byte)` - The next byte.
    /// * `None` - No byte is available; the cell is left unchanged.
    fn try_read_byte(&mut self) -> io::Result<Option<u8>>;
}


/// Raw byte input: every byte of the reader is one value.
#[derive(Debug)]
pub struct RawInput<R> {
    reader: R,
}

impl<R: Read> RawInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> ByteSource for RawInput<R> {
    fn try_read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0;
        loop {
            match self.reader.read(slice::from_mut(&mut byte)) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte)),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}


/// Numeric input: whitespace-separated decimal tokens, each a signed byte.
///
/// A token outside `-128..=127` (or not a number at all) is never consumed,
/// so it blocks every later read just as end of input does.
#[derive(Debug)]
pub struct NumericInput<R> {
    reader: R,
    pending: Option<String>,
}

impl<R: BufRead> NumericInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, pending: None }
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        let mut token = Vec::new();
        loop {
            let buffer = match self.reader.fill_buf() {
                Ok(buffer) => buffer,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };
            if buffer.is_empty() {
                break;
            }
            let mut used = 0;
            let mut complete = false;
            for &byte in buffer {
                if byte.is_ascii_whitespace() {
                    if !token.is_empty() {
                        complete = true;
                        break;
                    }
                } else {
                    token.push(byte);
                }
                used += 1;
            }
            self.reader.consume(used);
            if complete {
                break;
            }
        }

        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&token).into_owned()))
        }
    }
}

impl<R: BufRead> ByteSource for NumericInput<R> {
    fn try_read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pending.is_none() {
            self.pending = self.next_token()?;
        }
        let value = match self.pending.as_deref().map(str::parse::<i8>) {
            Some(Ok(value)) => value,
            _ => return Ok(None),
        };
        self.pending = None;
        Ok(Some(value as u8))
    }
}


/// Character output for the write action.
#[derive(Debug)]
pub struct CharOutput<W> {
    writer: W,
}

impl<W: Write> CharOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a cell value as the character with that code point, UTF-8 encoded.
    pub fn write_char(&mut self, value: u8) -> io::Result<()> {
        let mut buffer = [0; 4];
        let encoded = char::from(value).encode_utf8(&mut buffer);
        self.writer.write_all(encoded.as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_input() {
        let mut input = RawInput::new(&b"Hi"[..]);
        assert_eq!(input.try_read_byte().unwrap(), Some(b'H'));
        assert_eq!(input.try_read_byte().unwrap(), Some(b'i'));
        assert_eq!(input.try_read_byte().unwrap(), None);
        assert_eq!(input.try_read_byte().unwrap(), None);
    }

    #[test]
    fn test_numeric_input() {
        let mut input = NumericInput::new(&b"  65\n-1\t+7 "[..]);
        assert_eq!(input.try_read_byte().unwrap(), Some(65));
        assert_eq!(input.try_read_byte().unwrap(), Some(255));
        assert_eq!(input.try_read_byte().unwrap(), Some(7));
        assert_eq!(input.try_read_byte().unwrap(), None);
    }

    #[test]
    fn test_numeric_input_blocks_on_bad_token() {
        let mut input = NumericInput::new(&b"12 200 3"[..]);
        assert_eq!(input.try_read_byte().unwrap(), Some(12));
        assert_eq!(input.try_read_byte().unwrap(), None);
        assert_eq!(input.try_read_byte().unwrap(), None);
    }

    #[test]
    fn test_char_output() {
        let mut output = CharOutput::new(Vec::new());
        output.write_char(b'A').unwrap();
        output.write_char(0xE9).unwrap();
        assert_eq!(output.into_inner(), "Aé".as_bytes());
    }
}
