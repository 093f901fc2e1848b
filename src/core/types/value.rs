//! Value encodings: turning typed text into canonical big-endian bytes

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Number of hex characters shown in a preview before it is cut off
pub const PREVIEW_HEX_CHARS: usize = 16;

/// Marker appended to a preview that was cut off
pub const PREVIEW_ELLIPSIS: &str = "...";

/// How the value text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueEncoding {
    S8,
    S16,
    S32,
    U8,
    U16,
    U32,
    #[serde(rename = "hexstr")]
    HexString,
    #[serde(rename = "float")]
    F32,
    #[serde(rename = "double")]
    F64,
    Ascii,
}

impl ValueEncoding {
    /// Every encoding, in the order an input selector lists them
    pub const ALL: [ValueEncoding; 10] = [
        ValueEncoding::U8,
        ValueEncoding::U16,
        ValueEncoding::U32,
        ValueEncoding::S8,
        ValueEncoding::S16,
        ValueEncoding::S32,
        ValueEncoding::F32,
        ValueEncoding::F64,
        ValueEncoding::Ascii,
        ValueEncoding::HexString,
    ];

    /// Canonical byte width, `None` for variable width encodings
    pub const fn width(&self) -> Option<usize> {
        match self {
            ValueEncoding::S8 | ValueEncoding::U8 => Some(1),
            ValueEncoding::S16 | ValueEncoding::U16 => Some(2),
            ValueEncoding::S32 | ValueEncoding::U32 | ValueEncoding::F32 => Some(4),
            ValueEncoding::F64 => Some(8),
            ValueEncoding::HexString | ValueEncoding::Ascii => None,
        }
    }

    /// Whether the hex-base toggle has any meaning for this encoding
    pub const fn supports_hex_base(&self) -> bool {
        matches!(
            self,
            ValueEncoding::S8
                | ValueEncoding::S16
                | ValueEncoding::S32
                | ValueEncoding::U8
                | ValueEncoding::U16
                | ValueEncoding::U32
        )
    }

    /// Name used in config files and on the command line
    pub const fn name(&self) -> &'static str {
        match self {
            ValueEncoding::S8 => "s8",
            ValueEncoding::S16 => "s16",
            ValueEncoding::S32 => "s32",
            ValueEncoding::U8 => "u8",
            ValueEncoding::U16 => "u16",
            ValueEncoding::U32 => "u32",
            ValueEncoding::HexString => "hexstr",
            ValueEncoding::F32 => "float",
            ValueEncoding::F64 => "double",
            ValueEncoding::Ascii => "ascii",
        }
    }

    /// Parses `text` into an [`EncodedValue`]
    ///
    /// Spaces are dropped before parsing except for ASCII. `use_hex_base` switches
    /// the integer encodings to base 16 and is ignored by the rest.
    pub fn encode(&self, text: &str, use_hex_base: bool) -> MemoryResult<EncodedValue> {
        if text.is_empty() {
            return Err(MemoryError::bad_value("no value entered"));
        }

        let input: String = match self {
            ValueEncoding::Ascii => text.to_string(),
            _ => text.chars().filter(|c| *c != ' ').collect(),
        };
        let radix = if use_hex_base && self.supports_hex_base() {
            16
        } else {
            10
        };

        let bytes = match self {
            ValueEncoding::S8 => parse_integer(&input, radix)
                .and_then(|v| i16::try_from(v).ok())
                .and_then(|v| i8::try_from(v).ok())
                .map(|v| v.to_be_bytes().to_vec()),
            ValueEncoding::S16 => parse_integer(&input, radix)
                .and_then(|v| i16::try_from(v).ok())
                .map(|v| v.to_be_bytes().to_vec()),
            ValueEncoding::S32 => parse_integer(&input, radix)
                .and_then(|v| i32::try_from(v).ok())
                .map(|v| v.to_be_bytes().to_vec()),
            ValueEncoding::U8 => parse_integer(&input, radix)
                .and_then(|v| u16::try_from(v).ok())
                .filter(|v| v & 0xFF00 == 0)
                .map(|v| vec![v as u8]),
            ValueEncoding::U16 => parse_integer(&input, radix)
                .and_then(|v| u16::try_from(v).ok())
                .map(|v| v.to_be_bytes().to_vec()),
            ValueEncoding::U32 => parse_integer(&input, radix)
                .and_then(|v| u32::try_from(v).ok())
                .map(|v| v.to_be_bytes().to_vec()),
            ValueEncoding::F32 => {
                parse_float::<f32>(&input).map(|v| v.to_bits().to_be_bytes().to_vec())
            }
            ValueEncoding::F64 => {
                parse_float::<f64>(&input).map(|v| v.to_bits().to_be_bytes().to_vec())
            }
            ValueEncoding::Ascii => Some(input.as_bytes().to_vec()),
            ValueEncoding::HexString => hex::decode(&input).ok(),
        };

        match bytes {
            Some(bytes) if !bytes.is_empty() => {
                let preview = format_preview(&bytes, self.is_numeric());
                Ok(EncodedValue {
                    encoding: *self,
                    bytes,
                    preview,
                })
            }
            _ => {
                debug!(text, encoding = self.name(), use_hex_base, "rejected value");
                Err(MemoryError::bad_value(format!(
                    "'{}' is not a valid {} value",
                    text,
                    self.name()
                )))
            }
        }
    }

    const fn is_numeric(&self) -> bool {
        !matches!(self, ValueEncoding::Ascii | ValueEncoding::HexString)
    }
}

impl fmt::Display for ValueEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueEncoding {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ValueEncoding::ALL
            .into_iter()
            .find(|encoding| encoding.name() == wanted)
            .ok_or_else(|| MemoryError::bad_value(format!("unknown encoding '{}'", s)))
    }
}

/// Bytes produced from a successfully parsed value, plus its display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedValue {
    pub encoding: ValueEncoding,
    pub bytes: Vec<u8>,
    pub preview: String,
}

impl EncodedValue {
    /// Whether the preview had to be cut off
    pub fn is_truncated(&self) -> bool {
        self.preview.ends_with(PREVIEW_ELLIPSIS)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Validates `text` for `encoding`; see [`ValueEncoding::encode`]
pub fn validate(
    text: &str,
    encoding: ValueEncoding,
    use_hex_base: bool,
) -> MemoryResult<EncodedValue> {
    encoding.encode(text, use_hex_base)
}

/// Recovers the full byte sequence behind a preview
///
/// ASCII and hex strings come straight from the input text since their preview
/// may be cut off. Numeric previews never exceed eight bytes, so they are decoded as
/// shown. An empty preview means there is no valid value and yields no bytes.
pub fn extract_bytes(text: &str, preview: &str, encoding: ValueEncoding) -> Vec<u8> {
    if preview.is_empty() {
        return Vec::new();
    }

    match encoding {
        ValueEncoding::Ascii => text.as_bytes().to_vec(),
        ValueEncoding::HexString => {
            let digits: String = text.chars().filter(|c| *c != ' ').collect();
            hex::decode(digits).unwrap_or_default()
        }
        _ => {
            let digits: String = preview.chars().filter(|c| *c != ' ').collect();
            hex::decode(digits).unwrap_or_default()
        }
    }
}

/// Builds the space separated hex preview, capped at [`PREVIEW_HEX_CHARS`]
pub fn format_preview(bytes: &[u8], uppercase: bool) -> String {
    let mut digits = if uppercase {
        hex::encode_upper(bytes)
    } else {
        hex::encode(bytes)
    };
    let truncated = digits.len() > PREVIEW_HEX_CHARS;
    digits.truncate(PREVIEW_HEX_CHARS);

    let mut preview = String::with_capacity(digits.len() * 3 / 2 + PREVIEW_ELLIPSIS.len());
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            preview.push(' ');
        }
        preview.push(digit);
    }
    if truncated {
        preview.push_str(PREVIEW_ELLIPSIS);
    }
    preview
}

fn parse_integer(text: &str, radix: u32) -> Option<i64> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = if radix == 16 {
        rest.strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
            .unwrap_or(rest)
    } else {
        rest
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

trait IeeeFloat: FromStr + Copy {
    fn is_infinite(self) -> bool;
}

impl IeeeFloat for f32 {
    fn is_infinite(self) -> bool {
        f32::is_infinite(self)
    }
}

impl IeeeFloat for f64 {
    fn is_infinite(self) -> bool {
        f64::is_infinite(self)
    }
}

fn parse_float<T: IeeeFloat>(text: &str) -> Option<T> {
    let value = text.parse::<T>().ok()?;
    // Finite text that rounds to infinity is out of range for the width.
    if value.is_infinite() && !text.to_ascii_lowercase().contains("inf") {
        return None;
    }
    Some(value)
}
