//! Keep-alive (`req`) handling
//!
//! Devices send `req:<id>:...` periodically and expect `reg:<id>;status:200;`
//! back. The request is normalized by turning every `:` into `;`, then decoded
//! as one line of `;`-delimited fields with CSV-style quoting.
//!
//! Decoding works on raw bytes so the identifier is echoed exactly as the
//! device sent it, even when it is not valid UTF-8.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{GoipError, Result};

/// Field delimiter after normalization
const DELIMITER: u8 = b';';

const QUOTE: u8 = b'"';

/// Decoded keep-alive request, always holding at least 2 fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepAliveRequest {
    fields: Vec<Vec<u8>>,
}

impl KeepAliveRequest {
    /// Normalize and decode a raw `req` datagram.
    ///
    /// Fails on a malformed quoted field or when fewer than 2 fields result.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let normalized = normalize(raw);
        let fields = decode_record(&normalized)?;

        if fields.len() < 2 {
            return Err(GoipError::format(format!(
                "keep-alive request has {} field(s), expected at least 2",
                fields.len()
            )));
        }

        Ok(KeepAliveRequest { fields })
    }

    pub fn fields(&self) -> &[Vec<u8>] {
        &self.fields
    }

    /// Identifier echoed back in the acknowledgement (field 1)
    pub fn device_id(&self) -> &[u8] {
        &self.fields[1]
    }

    /// Build the `reg:<id>;status:200;` acknowledgement
    pub fn response(&self) -> Bytes {
        let id = self.device_id();
        let mut buf = BytesMut::with_capacity(id.len() + 16);
        buf.put_slice(b"reg:");
        buf.put_slice(id);
        buf.put_slice(b";status:200;");
        buf.freeze()
    }
}

/// Replace every `:` with `;`
pub fn normalize(raw: &[u8]) -> Vec<u8> {
    raw.iter()
        .map(|&b| if b == b':' { DELIMITER } else { b })
        .collect()
}

/// Decode the first line of `line` into `;`-separated fields.
///
/// A field starting with `"` is quoted: it may hold delimiters and newlines,
/// and `""` stands for one literal quote. A `\r\n` inside a quoted field is
/// stored as `\n`. Quotes anywhere else are an error.
fn decode_record(line: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut fields = Vec::new();
    let mut bytes = line.iter().copied().peekable();

    'fields: loop {
        let mut field = Vec::new();

        if bytes.peek() == Some(&QUOTE) {
            bytes.next();
            loop {
                match bytes.next() {
                    None => return Err(GoipError::format("unterminated quoted field")),
                    Some(QUOTE) => match bytes.peek().copied() {
                        Some(QUOTE) => {
                            bytes.next();
                            field.push(QUOTE);
                        }
                        Some(DELIMITER) => {
                            bytes.next();
                            fields.push(field);
                            continue 'fields;
                        }
                        None | Some(b'\n') => {
                            fields.push(field);
                            return Ok(fields);
                        }
                        Some(b'\r') => {
                            bytes.next();
                            if matches!(bytes.peek(), None | Some(b'\n')) {
                                fields.push(field);
                                return Ok(fields);
                            }
                            return Err(extraneous_quote());
                        }
                        Some(_) => {
                            return Err(extraneous_quote());
                        }
                    },
                    Some(b'\r') if bytes.peek() == Some(&b'\n') => {
                        bytes.next();
                        field.push(b'\n');
                    }
                    Some(b) => field.push(b),
                }
            }
        }

        loop {
            match bytes.next() {
                None | Some(b'\n') => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(b'\r') if matches!(bytes.peek(), None | Some(b'\n')) => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(DELIMITER) => {
                    fields.push(field);
                    continue 'fields;
                }
                Some(QUOTE) => return Err(GoipError::format("bare quote in unquoted field")),
                Some(b) => field.push(b),
            }
        }
    }
}

fn extraneous_quote() -> GoipError {
    GoipError::format("extraneous character after closing quote")
}
