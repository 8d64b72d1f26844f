//! Text encodings: turns text into the exact byte sequence the host would write, and back.
//!
//! An [`EncodingSpec`] pairs an [`Encoding`] with a preamble rule. The presets mirror the
//! encodings the host exposes by default:
//!
//! | preset               | preamble        | notes                                   |
//! |----------------------|-----------------|-----------------------------------------|
//! | `ASCII`              | none            | chars above `0x7F` become `?`           |
//! | `LATIN1`             | none            | chars above `0xFF` become `?`           |
//! | `UTF7`               | none            | shifted base64 runs                     |
//! | `UTF8`               | `EF BB BF`      |                                         |
//! | `UTF8_NO_BOM`        | none            | the default for writes                  |
//! | `UNICODE`            | `FF FE`         | UTF-16, little endian                   |
//! | `BIG_ENDIAN_UNICODE` | `FE FF`         | UTF-16, big endian                      |
//! | `UTF32`              | `FF FE 00 00`   | UTF-32, little endian                   |
//! | `UTF32_BE`           | `00 00 FE FF`   | UTF-32, big endian                      |

mod utf7;

use std::str::FromStr;

use crate::error::FsError;

/// Encoding identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Encoding {
    Ascii,
    Latin1,
    Utf7,
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Ascii => "us-ascii",
            Encoding::Latin1 => "iso-8859-1",
            Encoding::Utf7 => "utf-7",
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16Le => "utf-16",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Utf32Le => "utf-32",
            Encoding::Utf32Be => "utf-32be",
        }
    }

    /// Byte-order marker of the encoding; empty for encodings without one.
    pub fn byte_order_mark(self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            Encoding::Utf16Le => &[0xFF, 0xFE],
            Encoding::Utf16Be => &[0xFE, 0xFF],
            Encoding::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Encoding::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
            Encoding::Ascii | Encoding::Latin1 | Encoding::Utf7 => &[],
        }
    }
}

/// An encoding plus whether writes start with its byte-order marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct EncodingSpec {
    encoding: Encoding,
    preamble: bool,
}

impl EncodingSpec {
    pub const ASCII: Self = Self::new(Encoding::Ascii, false);
    pub const LATIN1: Self = Self::new(Encoding::Latin1, false);
    pub const UTF7: Self = Self::new(Encoding::Utf7, false);
    pub const UTF8: Self = Self::new(Encoding::Utf8, true);
    pub const UTF8_NO_BOM: Self = Self::new(Encoding::Utf8, false);
    pub const UNICODE: Self = Self::new(Encoding::Utf16Le, true);
    pub const BIG_ENDIAN_UNICODE: Self = Self::new(Encoding::Utf16Be, true);
    pub const UTF32: Self = Self::new(Encoding::Utf32Le, true);
    pub const UTF32_BE: Self = Self::new(Encoding::Utf32Be, true);

    /// `preamble` has no effect for encodings without a byte-order marker.
    pub const fn new(encoding: Encoding, preamble: bool) -> Self {
        Self { encoding, preamble }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Bytes written before the encoded text.
    pub fn preamble(&self) -> &'static [u8] {
        if self.preamble {
            self.encoding.byte_order_mark()
        } else {
            &[]
        }
    }

    /// Encodes `text`, preamble included.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = self.preamble().to_vec();
        self.encode_body(text, &mut out);
        out
    }

    /// Appends the encoded form of `text` to `out`, without a preamble.
    pub fn encode_body(&self, text: &str, out: &mut Vec<u8>) {
        match self.encoding {
            Encoding::Ascii => out.extend(
                text.chars()
                    .map(|c| if c.is_ascii() { c as u8 } else { b'?' }),
            ),
            Encoding::Latin1 => out.extend(text.chars().map(|c| {
                u8::try_from(u32::from(c)).unwrap_or(b'?')
            })),
            Encoding::Utf7 => utf7::encode(text, out),
            Encoding::Utf8 => out.extend_from_slice(text.as_bytes()),
            Encoding::Utf16Le => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
            }
            Encoding::Utf16Be => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
            Encoding::Utf32Le => {
                for c in text.chars() {
                    out.extend_from_slice(&u32::from(c).to_le_bytes());
                }
            }
            Encoding::Utf32Be => {
                for c in text.chars() {
                    out.extend_from_slice(&u32::from(c).to_be_bytes());
                }
            }
        }
    }

    /// Decodes `bytes`, skipping this encoding's byte-order marker if present.
    ///
    /// Malformed input never fails: invalid sequences become U+FFFD (or `?` under ASCII).
    pub fn decode(&self, bytes: &[u8]) -> String {
        let body = bytes
            .strip_prefix(self.encoding.byte_order_mark())
            .unwrap_or(bytes);
        match self.encoding {
            Encoding::Ascii => body
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
            Encoding::Latin1 => body.iter().map(|&b| char::from(b)).collect(),
            Encoding::Utf7 => utf7::decode(body),
            Encoding::Utf8 => String::from_utf8_lossy(body).into_owned(),
            Encoding::Utf16Le => decode_utf16(body, u16::from_le_bytes),
            Encoding::Utf16Be => decode_utf16(body, u16::from_be_bytes),
            Encoding::Utf32Le => decode_utf32(body, u32::from_le_bytes),
            Encoding::Utf32Be => decode_utf32(body, u32::from_be_bytes),
        }
    }

    /// Sniffs a byte-order marker at the start of `bytes`.
    pub fn detect(bytes: &[u8]) -> Option<EncodingSpec> {
        // UTF-32LE shares its first two bytes with UTF-16LE
        [
            Self::UTF32,
            Self::UTF32_BE,
            Self::UTF8,
            Self::BIG_ENDIAN_UNICODE,
            Self::UNICODE,
        ]
        .into_iter()
        .find(|spec| bytes.starts_with(spec.preamble()))
    }

    /// Decodes with the encoding announced by a byte-order marker, or with `fallback`.
    pub fn decode_detected(bytes: &[u8], fallback: EncodingSpec) -> String {
        Self::detect(bytes).unwrap_or(fallback).decode(bytes)
    }
}

impl Default for EncodingSpec {
    fn default() -> Self {
        Self::UTF8_NO_BOM
    }
}

impl FromStr for EncodingSpec {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        let spec = match name.as_str() {
            "us-ascii" | "ascii" => Self::ASCII,
            "iso-8859-1" | "latin1" | "latin-1" => Self::LATIN1,
            "utf-7" | "utf7" => Self::UTF7,
            "utf-8" | "utf8" => Self::UTF8_NO_BOM,
            "utf-8-bom" | "utf8-bom" => Self::UTF8,
            "utf-16" | "utf-16le" | "unicode" => Self::UNICODE,
            "utf-16be" | "bigendianunicode" => Self::BIG_ENDIAN_UNICODE,
            "utf-32" | "utf-32le" => Self::UTF32,
            "utf-32be" => Self::UTF32_BE,
            _ => return Err(FsError::Argument(format!("unknown encoding '{s}'"))),
        };
        Ok(spec)
    }
}

fn decode_utf16(body: &[u8], from_bytes: fn([u8; 2]) -> u16) -> String {
    let chunks = body.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();
    let units = chunks.map(|pair| from_bytes([pair[0], pair[1]]));
    let mut text: String = char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

fn decode_utf32(body: &[u8], from_bytes: fn([u8; 4]) -> u32) -> String {
    let chunks = body.chunks_exact(4);
    let dangling = !chunks.remainder().is_empty();
    let mut text: String = chunks
        .map(|quad| from_bytes([quad[0], quad[1], quad[2], quad[3]]))
        .map(|code| char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if dangling {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}
