//! DNS wire encoding of ENS names
//!
//! A name is a sequence of `len || label` pairs terminated by a zero byte:
//! `bob.onsui.eth` -> `03 626f62 05 6f6e737569 03 657468 00`.

use crate::error::Error;
use crate::Result;

/// Largest label representable with a single length byte
pub const MAX_LABEL_LEN: usize = u8::MAX as usize;

/// Encode a dot-separated name into DNS wire format
pub fn encode_name(name: &str) -> Result<Vec<u8>> {
    if name.is_empty() {
        return Ok(vec![0]);
    }

    let mut out = Vec::with_capacity(name.len() + 2);
    for label in name.split('.') {
        if label.is_empty() {
            return Err(Error::DnsName(format!("empty label in \"{}\"", name)));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(Error::DnsName(format!(
                "label of {} bytes exceeds {} byte limit",
                label.len(),
                MAX_LABEL_LEN
            )));
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    Ok(out)
}

/// Decode DNS wire format into its label sequence
///
/// Rejects length bytes that overrun the buffer, a missing terminator,
/// bytes after the terminator, and labels that are not UTF-8 or contain a dot.
pub fn decode_labels(bytes: &[u8]) -> Result<Vec<String>> {
    let mut labels = Vec::new();
    let mut offset = 0;

    loop {
        let len = *bytes
            .get(offset)
            .ok_or_else(|| Error::DnsName("missing terminating zero byte".into()))?
            as usize;
        offset += 1;

        if len == 0 {
            break;
        }

        let end = offset + len;
        if end > bytes.len() {
            return Err(Error::DnsName(format!(
                "label length {} at offset {} overruns {} byte buffer",
                len,
                offset - 1,
                bytes.len()
            )));
        }

        let label = std::str::from_utf8(&bytes[offset..end])
            .map_err(|e| Error::DnsName(format!("label is not UTF-8: {}", e)))?;
        if label.contains('.') {
            return Err(Error::DnsName(format!("label \"{}\" contains a dot", label)));
        }
        labels.push(label.to_string());
        offset = end;
    }

    if offset != bytes.len() {
        return Err(Error::DnsName(format!(
            "{} trailing bytes after terminator",
            bytes.len() - offset
        )));
    }

    Ok(labels)
}

/// Decode DNS wire format into a dot-joined name
pub fn decode_name(bytes: &[u8]) -> Result<String> {
    Ok(decode_labels(bytes)?.join("."))
}
