//! Conversion engine: integers, characters, strings and pointers.
//!
//! Each renderer receives a resolved [`Field`] (flags, width and precision
//! with any `*` arguments already applied) and streams its output into a
//! [`Sink`]. Digit generation uses a fixed scratch buffer sized for the
//! widest supported integer; nothing is allocated.
//!
//! Reference: ISO C11 7.21.6.1 paragraphs 6 and 8.

use crate::parser::FormatFlags;
use crate::sink::Sink;

/// A directive's flags, width and precision after `*` resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Field {
    pub flags: FormatFlags,
    pub width: usize,
    pub precision: Option<usize>,
}

/// Digit set for integer conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Octal,
    Hex { upper: bool },
}

/// Enough room for `u64::MAX` in octal (22 digits).
const DIGIT_CAP: usize = 24;

const LOWER_HEX: &[u8; 16] = b"0123456789abcdef";
const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Digits of one integer, right-aligned in a fixed buffer.
#[derive(Debug, Clone, Copy)]
pub struct DigitBuf {
    buf: [u8; DIGIT_CAP],
    start: usize,
}

impl DigitBuf {
    /// Render `value` least-significant digit first. Zero renders as `"0"`.
    #[must_use]
    pub fn new(mut value: u64, radix: Radix) -> Self {
        let mut buf = [0u8; DIGIT_CAP];
        let mut pos = DIGIT_CAP;
        loop {
            pos -= 1;
            buf[pos] = match radix {
                Radix::Decimal => {
                    let d = (value % 10) as u8;
                    value /= 10;
                    b'0' + d
                }
                Radix::Octal => {
                    let d = (value & 0x7) as u8;
                    value >>= 3;
                    b'0' + d
                }
                Radix::Hex { upper } => {
                    let table = if upper { UPPER_HEX } else { LOWER_HEX };
                    let d = table[(value & 0xF) as usize];
                    value >>= 4;
                    d
                }
            };
            if value == 0 {
                break;
            }
        }
        Self { buf, start: pos }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..]
    }
}

/// Render a signed integer (`%d`, `%i`).
pub fn render_signed<S: Sink>(sink: &mut S, value: i64, field: &Field) {
    // unsigned_abs: no overflow at i64::MIN (or any narrower minimum).
    let magnitude = value.unsigned_abs();
    let sign = if value < 0 {
        Some(b'-')
    } else {
        positive_sign(&field.flags)
    };
    let prefix: &[u8] = match sign {
        Some(b'-') => b"-",
        Some(b'+') => b"+",
        Some(_) => b" ",
        None => b"",
    };
    render_integer(sink, prefix, magnitude, Radix::Decimal, field);
}

/// Render an unsigned integer (`%u`, `%o`, `%x`, `%X`).
pub fn render_unsigned<S: Sink>(sink: &mut S, value: u64, radix: Radix, field: &Field) {
    let prefix: &[u8] = match radix {
        Radix::Hex { upper } if field.flags.alt_form && value != 0 => {
            if upper {
                b"0X"
            } else {
                b"0x"
            }
        }
        _ => b"",
    };
    render_integer(sink, prefix, value, radix, field);
}

/// Shared integer layout: `[pad][prefix][zero pad][precision zeros][digits][pad]`.
fn render_integer<S: Sink>(sink: &mut S, prefix: &[u8], value: u64, radix: Radix, field: &Field) {
    let digits = DigitBuf::new(value, radix);
    // Precision 0 with value 0 produces no digits.
    let digit_slice = if value == 0 && field.precision == Some(0) {
        &[][..]
    } else {
        digits.as_bytes()
    };

    let min_digits = field.precision.unwrap_or(1);
    let mut zeros = min_digits.saturating_sub(digit_slice.len());
    // '#' with octal: the first digit must be 0.
    if radix == Radix::Octal
        && field.flags.alt_form
        && zeros == 0
        && digit_slice.first() != Some(&b'0')
    {
        zeros = 1;
    }

    // The '0' flag is ignored when a precision is given.
    let zero_pad = field.flags.zero_pad && field.precision.is_none();
    let content = prefix
        .len()
        .saturating_add(zeros)
        .saturating_add(digit_slice.len());
    let pad_total = field.width.saturating_sub(content);

    if !field.flags.left_justify && !zero_pad {
        sink.write_repeated(b' ', pad_total);
    }
    sink.write_bytes(prefix);
    if !field.flags.left_justify && zero_pad {
        sink.write_repeated(b'0', pad_total);
    }
    sink.write_repeated(b'0', zeros);
    sink.write_bytes(digit_slice);
    if field.flags.left_justify {
        sink.write_repeated(b' ', pad_total);
    }
}

/// Render a character (`%c`).
pub fn render_char<S: Sink>(sink: &mut S, c: u8, field: &Field) {
    render_padded(sink, &[c], field);
}

/// Render a byte string (`%s`). The string ends at its first NUL; precision
/// truncates further.
pub fn render_str<S: Sink>(sink: &mut S, s: &[u8], field: &Field) {
    let s = s.iter().position(|&b| b == 0).map_or(s, |end| &s[..end]);
    let max_len = field.precision.unwrap_or(s.len());
    render_padded(sink, &s[..s.len().min(max_len)], field);
}

/// Render a pointer (`%p`) as `0x...` hex, or `(nil)` for null.
pub fn render_pointer<S: Sink>(sink: &mut S, addr: usize, field: &Field) {
    if addr == 0 {
        render_padded(sink, b"(nil)", field);
        return;
    }
    let digits = DigitBuf::new(addr as u64, Radix::Hex { upper: false });
    let digit_slice = digits.as_bytes();
    let pad_total = field.width.saturating_sub(2 + digit_slice.len());

    if !field.flags.left_justify {
        sink.write_repeated(b' ', pad_total);
    }
    sink.write_bytes(b"0x");
    sink.write_bytes(digit_slice);
    if field.flags.left_justify {
        sink.write_repeated(b' ', pad_total);
    }
}

/// Space-padded text; used by `%c`, `%s`, `%p` and non-finite floats.
pub(crate) fn render_padded<S: Sink>(sink: &mut S, text: &[u8], field: &Field) {
    let pad_total = field.width.saturating_sub(text.len());
    if !field.flags.left_justify {
        sink.write_repeated(b' ', pad_total);
    }
    sink.write_bytes(text);
    if field.flags.left_justify {
        sink.write_repeated(b' ', pad_total);
    }
}

/// Sign character for a non-negative value under `+` / space flags.
pub(crate) fn positive_sign(flags: &FormatFlags) -> Option<u8> {
    if flags.force_sign {
        Some(b'+')
    } else if flags.space_sign {
        Some(b' ')
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
