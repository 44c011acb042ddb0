#![doc = r#"
Variable-length quantities

MIDI files store delta-times and meta/sysex lengths as big-endian groups of
seven bits. Every group except the last has its high bit set:

```text
value        encoded
0x00000000   00
0x0000007F   7F
0x00000080   81 00
0x00003FFF   FF 7F
0x0FFFFFFF   FF FF FF 7F
```

At most four groups are allowed, so the largest representable value is
[`MAX`] (`0x0FFFFFFF`).
"#]

use crate::ParseError;

/// The largest value a variable-length quantity can hold.
pub const MAX: u32 = 0x0FFF_FFFF;

/// Maximum number of bytes in an encoded quantity
pub const MAX_BYTES: u32 = 4;

/// Decodes a quantity from the front of `bytes`.
///
/// Returns the value and the number of bytes it occupied.
///
/// # Errors
/// - [`ParseError::MalformedVlq`] if the first four bytes all carry the
///   continuation bit.
/// - [`ParseError::TruncatedVlq`] if `bytes` ends before the quantity does.
pub fn decode(bytes: &[u8]) -> Result<(u32, u32), ParseError> {
    let mut iter = bytes.iter().copied();
    decode_with(
        || iter.next().ok_or(ParseError::TruncatedVlq),
        || ParseError::MalformedVlq,
    )
}

/// The decoding loop shared by every byte source.
///
/// `next_byte` is called at most [`MAX_BYTES`] times.
pub(crate) fn decode_with<E>(
    mut next_byte: impl FnMut() -> Result<u8, E>,
    malformed: impl FnOnce() -> E,
) -> Result<(u32, u32), E> {
    let mut value = 0u32;
    for count in 1..=MAX_BYTES {
        let byte = next_byte()?;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, count));
        }
    }
    Err(malformed())
}

/// Encodes `value` using the fewest possible bytes.
///
/// Values above [`MAX`] cannot be represented and are clamped to it.
pub fn encode(value: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MAX_BYTES as usize);
    encode_into(value, &mut buf);
    buf
}

/// Appends the encoding of `value` to `buf`, returning the number of bytes written.
pub fn encode_into(value: u32, buf: &mut Vec<u8>) -> u32 {
    let value = value.min(MAX);
    let len = encoded_length(value);
    for group in (0..len).rev() {
        let mut byte = ((value >> (group * 7)) & 0x7F) as u8;
        if group != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
    }
    len
}

/// Number of bytes [`encode`] produces for `value`, without allocating.
pub const fn encoded_length(value: u32) -> u32 {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(0x40), vec![0x40]);
        assert_eq!(encode(0x7F), vec![0x7F]);
        assert_eq!(encode(0x80), vec![0x81, 0x00]);
        assert_eq!(encode(0x2000), vec![0xC0, 0x00]);
        assert_eq!(encode(0x3FFF), vec![0xFF, 0x7F]);
        assert_eq!(encode(0x4000), vec![0x81, 0x80, 0x00]);
        assert_eq!(encode(0x10_0000), vec![0xC0, 0x80, 0x00]);
        assert_eq!(encode(0x1F_FFFF), vec![0xFF, 0xFF, 0x7F]);
        assert_eq!(encode(0x20_0000), vec![0x81, 0x80, 0x80, 0x00]);
        assert_eq!(encode(MAX), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn lengths_match_thresholds() {
        assert_eq!(encoded_length(127), 1);
        assert_eq!(encoded_length(128), 2);
        assert_eq!(encoded_length(16_383), 2);
        assert_eq!(encoded_length(16_384), 3);
        assert_eq!(encoded_length(2_097_151), 3);
        assert_eq!(encoded_length(2_097_152), 4);
        assert_eq!(encoded_length(268_435_455), 4);
    }

    #[test]
    fn round_trip_across_group_boundaries() {
        let mut samples = vec![0, 1, MAX];
        for shift in [7, 14, 21] {
            let edge = 1u32 << shift;
            samples.extend([edge - 1, edge, edge + 1]);
        }
        samples.extend((0..MAX).step_by(0x0001_3579).take(2_000));

        for v in samples {
            let bytes = encode(v);
            assert_eq!(bytes.len() as u32, encoded_length(v), "length of {v:#X}");
            assert_eq!(decode(&bytes), Ok((v, encoded_length(v))), "value {v:#X}");
        }
    }

    #[test]
    fn five_continuation_bytes_are_malformed() {
        assert_eq!(
            decode(&[0x80, 0x80, 0x80, 0x80, 0x80]),
            Err(ParseError::MalformedVlq)
        );
        assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]), Err(ParseError::MalformedVlq));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(decode(&[]), Err(ParseError::TruncatedVlq));
        assert_eq!(decode(&[0x81, 0x80]), Err(ParseError::TruncatedVlq));
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        assert_eq!(decode(&[0x81, 0x00, 0x90, 0x3C]), Ok((0x80, 2)));
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(encode(u32::MAX), encode(MAX));
        assert_eq!(encoded_length(u32::MAX), 4);
    }
}
