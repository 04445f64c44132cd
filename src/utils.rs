use crate::error::{Error, Result};

/// Decode hex text into bytes.
///
/// Tokens are separated by whitespace and may carry a `0x` prefix. Inside a
/// token, `:` and `-` split byte groups; every group must hold whole bytes.
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(text.len() / 2);

    for token in text.split_ascii_whitespace() {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);

        for group in digits.split([':', '-']).filter(|g| !g.is_empty()) {
            let group_start = offset_in(text, group);
            let decoded = hex::decode(group).map_err(|e| hex_error(e, group_start, group))?;
            bytes.extend_from_slice(&decoded);
        }
    }

    Ok(bytes)
}

/// Byte offset of `part` inside `text`; `part` must be a subslice of it.
fn offset_in(text: &str, part: &str) -> usize {
    part.as_ptr() as usize - text.as_ptr() as usize
}

fn hex_error(err: hex::FromHexError, group_start: usize, group: &str) -> Error {
    match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => Error::InvalidHex {
            position: group_start + index,
            message: format!("unexpected character {c:?}"),
        },
        hex::FromHexError::OddLength => Error::InvalidHex {
            position: group_start + group.len() - 1,
            message: format!("odd number of hex digits in {group:?}"),
        },
        other => Error::InvalidHex {
            position: group_start,
            message: other.to_string(),
        },
    }
}

/// True when `data` looks like hex text rather than a binary capture.
pub fn looks_like_hex(data: &[u8]) -> bool {
    data.iter().any(u8::is_ascii_hexdigit)
        && data.iter().all(|b| {
            b.is_ascii_hexdigit()
                || b.is_ascii_whitespace()
                || matches!(b, b':' | b'-' | b'x' | b'X')
        })
}

/// Lowercase hex with a space between bytes.
pub fn hex_string(data: &[u8]) -> String {
    data.iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}
