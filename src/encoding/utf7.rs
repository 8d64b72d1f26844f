//! UTF-7 with the host's default rules: optional direct characters (`!`, `#`, `@`, ...) are
//! base64-encoded, `+` in direct mode becomes `+-`, and every shifted run is closed with `-`.

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn is_direct(unit: u16) -> bool {
    unit < 0x80
        && matches!(
            unit as u8,
            b'A'..=b'Z'
                | b'a'..=b'z'
                | b'0'..=b'9'
                | b'\''
                | b'('
                | b')'
                | b','
                | b'-'
                | b'.'
                | b'/'
                | b':'
                | b'?'
                | b' '
                | b'\t'
                | b'\r'
                | b'\n'
        )
}

fn base64_value(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

pub(crate) fn encode(text: &str, out: &mut Vec<u8>) {
    // bit_count < 0: direct mode
    let mut bits: u32 = 0;
    let mut bit_count: i32 = -1;

    for unit in text.encode_utf16() {
        if is_direct(unit) {
            if bit_count >= 0 {
                if bit_count > 0 {
                    out.push(BASE64[((bits << (6 - bit_count)) & 0x3F) as usize]);
                }
                out.push(b'-');
                bit_count = -1;
            }
            out.push(unit as u8);
        } else if bit_count < 0 && unit == u16::from(b'+') {
            out.extend_from_slice(b"+-");
        } else {
            if bit_count < 0 {
                out.push(b'+');
                bit_count = 0;
            }
            bits = (bits << 16) | u32::from(unit);
            bit_count += 16;
            while bit_count >= 6 {
                bit_count -= 6;
                out.push(BASE64[((bits >> bit_count) & 0x3F) as usize]);
            }
        }
    }

    if bit_count >= 0 {
        if bit_count > 0 {
            out.push(BASE64[((bits << (6 - bit_count)) & 0x3F) as usize]);
        }
        out.push(b'-');
    }
}

pub(crate) fn decode(bytes: &[u8]) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();

    while let Some(byte) = iter.next() {
        if byte != b'+' {
            units.push(if byte < 0x80 { u16::from(byte) } else { 0xFFFD });
            continue;
        }
        if iter.peek() == Some(&b'-') {
            iter.next();
            units.push(u16::from(b'+'));
            continue;
        }

        let mut bits: u32 = 0;
        let mut bit_count = 0u32;
        while let Some(&next) = iter.peek() {
            let Some(value) = base64_value(next) else {
                break;
            };
            iter.next();
            bits = (bits << 6) | u32::from(value);
            bit_count += 6;
            if bit_count >= 16 {
                bit_count -= 16;
                units.push(((bits >> bit_count) & 0xFFFF) as u16);
            }
        }
        // the run terminator is absorbed
        if iter.peek() == Some(&b'-') {
            iter.next();
        }
    }

    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(text: &str) -> String {
        let mut out = Vec::new();
        encode(text, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_direct_characters_pass_through() {
        assert_eq!(encoded("Hello, world."), "Hello, world.");
    }

    #[test]
    fn test_optional_characters_are_shifted() {
        assert_eq!(encoded("!"), "+ACE-");
        assert_eq!(encoded("!!"), "+ACEAIQ-");
        assert_eq!(encoded("Hello there! Dzięki."), "Hello there+ACE- Dzi+ARk-ki.");
    }

    #[test]
    fn test_plus_sign_escapes() {
        assert_eq!(encoded("1 + 1"), "1 +- 1");
    }

    #[test]
    fn test_decode_shifted_runs() {
        assert_eq!(decode(b"Hi +AKM-1"), "Hi \u{a3}1");
        assert_eq!(decode(b"1 +- 1"), "1 + 1");
        assert_eq!(decode(b"Hello there+ACE- Dzi+ARk-ki."), "Hello there! Dzięki.");
    }

    #[test]
    fn test_decode_surrogate_pair() {
        let text = "a\u{1F600}b";
        let mut out = Vec::new();
        encode(text, &mut out);
        assert_eq!(decode(&out), text);
    }
}
