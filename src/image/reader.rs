use std::io::{self, ErrorKind, Read};
use std::str::FromStr;

use crate::color::{Channel, Color};
use crate::error::Error;
use crate::Result;

pub mod cppm;
pub mod ppm;

/// Upper bound for buffers sized from header values before the payload
/// confirms them.
const MAX_PREALLOCATED_ITEMS: usize = 1 << 20;

/// Splits the textual header of an image file into whitespace separated
/// tokens, skipping `#` comments. Reading stops right after the whitespace
/// byte that terminates a token, so the binary payload can follow directly.
struct HeaderTokenizer<'a, R: Read> {
    reader: &'a mut R,
    buffer: Vec<u8>,
}

impl<'a, R: Read> HeaderTokenizer<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        HeaderTokenizer {
            reader,
            buffer: Vec::new(),
        }
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        let mut byte = [0; 1];
        let mut in_comment = false;

        while read_byte(self.reader, &mut byte)? {
            if in_comment {
                if byte[0] == b'\n' {
                    in_comment = false;
                }
                continue;
            }
            if byte[0] == b'#' && self.buffer.is_empty() {
                in_comment = true;
                continue;
            }
            if byte[0].is_ascii_whitespace() {
                if !self.buffer.is_empty() {
                    break;
                }
            } else {
                self.buffer.push(byte[0]);
            }
        }

        if self.buffer.is_empty() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buffer).into_owned()))
    }

    fn expect_token(&mut self, token_name: &'static str) -> Result<String> {
        self.next_token()?
            .ok_or(Error::PPMFileDoesNotContainRequiredToken(token_name))
    }

    fn parse_token<N: FromStr>(&mut self, token_name: &'static str) -> Result<N> {
        self.expect_token(token_name)?
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(token_name))
    }
}

fn read_byte<R: Read>(reader: &mut R, byte: &mut [u8; 1]) -> Result<bool> {
    loop {
        match reader.read(byte) {
            Ok(count) => return Ok(count > 0),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::FailedToReadImageData(e)),
        }
    }
}

fn map_payload_error(error: io::Error) -> Error {
    if error.kind() == ErrorKind::UnexpectedEof {
        Error::MismatchOfSizeBetweenHeaderAndValues
    } else {
        Error::FailedToReadImageData(error)
    }
}

fn read_color<T: Channel, R: Read>(reader: &mut R, max_intensity: u16) -> Result<Color<T>> {
    let color = Color::<T>::read_from(reader).map_err(map_payload_error)?;
    let max_channel = color.max_channel().to_u64();
    if max_channel > max_intensity as u64 {
        return Err(Error::ChannelExceedsMaxIntensity(
            max_channel as u16,
            max_intensity,
        ));
    }
    Ok(color)
}

#[cfg(test)]
mod test {
    use super::HeaderTokenizer;
    use crate::error::Error;

    #[test]
    fn tokens_skip_comments_and_whitespace() {
        let mut bytes: &[u8] = b"P6\n# a comment 12 13\n  3\t2\n255\nrest";
        let mut tokenizer = HeaderTokenizer::new(&mut bytes);
        let tokens: Vec<String> = (0..4)
            .map(|_| tokenizer.next_token().unwrap().unwrap())
            .collect();
        assert_eq!(tokens, vec!["P6", "3", "2", "255"]);
        assert_eq!(bytes, b"rest");
    }

    #[test]
    fn parse_token_reports_token_name() {
        let mut bytes: &[u8] = b"abc ";
        let mut tokenizer = HeaderTokenizer::new(&mut bytes);
        let result: Result<u32, Error> = tokenizer.parse_token("Width Header");
        assert!(matches!(
            result,
            Err(Error::ParsingOfTokenFailed("Width Header"))
        ));
    }

    #[test]
    fn missing_token() {
        let mut bytes: &[u8] = b"  # only a comment";
        let mut tokenizer = HeaderTokenizer::new(&mut bytes);
        assert!(matches!(
            tokenizer.expect_token("P6 Header"),
            Err(Error::PPMFileDoesNotContainRequiredToken("P6 Header"))
        ));
    }
}
