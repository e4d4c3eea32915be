//! Format string parser.
//!
//! Splits a printf format string into literal runs, `%%` escapes and
//! conversion directives, one segment at a time. The parser never allocates
//! and never backtracks: every byte is examined once.
//!
//! Reference: ISO C11 7.21.6.1 (fprintf), POSIX.1-2024 fprintf.
//!
//! Anything that does not form a recognized directive is handed back as a
//! literal segment covering the `%` and every byte consumed while trying to
//! parse it, so unsupported conversions print verbatim instead of failing.

// ---------------------------------------------------------------------------
// Directive types
// ---------------------------------------------------------------------------

/// Flags parsed from a printf format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

/// Precision specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

/// Length modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    Hh,   // 'hh'
    H,    // 'h'
    L,    // 'l'
    Ll,   // 'll'
    J,    // 'j'
    Z,    // 'z'
    T,    // 't'
    BigL, // 'L'
}

/// Conversion kind selected by the conversion letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `d`, `i`
    Signed,
    /// `u`
    Unsigned,
    /// `o`
    Octal,
    /// `x` (lowercase digits) or `X` (uppercase digits).
    Hex { upper: bool },
    /// `f` or `F`.
    Float { upper: bool },
    /// `c`
    Char,
    /// `s`
    Str,
    /// `p`
    Pointer,
    /// `%` written with flags or width, e.g. `%5%`.
    Percent,
}

impl Conversion {
    /// Map a conversion letter to its kind. `None` for letters this engine
    /// does not convert (they pass through as literal text).
    #[must_use]
    pub fn from_letter(letter: u8) -> Option<Self> {
        let conv = match letter {
            b'd' | b'i' => Self::Signed,
            b'u' => Self::Unsigned,
            b'o' => Self::Octal,
            b'x' => Self::Hex { upper: false },
            b'X' => Self::Hex { upper: true },
            #[cfg(feature = "float")]
            b'f' => Self::Float { upper: false },
            #[cfg(feature = "float")]
            b'F' => Self::Float { upper: true },
            b'c' => Self::Char,
            b's' => Self::Str,
            b'p' => Self::Pointer,
            b'%' => Self::Percent,
            _ => return None,
        };
        Some(conv)
    }

    /// Whether the conversion reads an integer argument.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Signed | Self::Unsigned | Self::Octal | Self::Hex { .. }
        )
    }

    /// Whether `length` is a meaningful modifier for this conversion.
    ///
    /// Integer conversions take every integer modifier; `f` takes `l` (no-op)
    /// and `L`; everything else takes none. Wide `%lc`/`%ls` are not supported.
    #[must_use]
    pub const fn accepts(self, length: LengthMod) -> bool {
        match self {
            Self::Signed | Self::Unsigned | Self::Octal | Self::Hex { .. } => {
                !matches!(length, LengthMod::BigL)
            }
            Self::Float { .. } => {
                matches!(length, LengthMod::None | LengthMod::L | LengthMod::BigL)
            }
            Self::Char | Self::Str | Self::Pointer | Self::Percent => {
                matches!(length, LengthMod::None)
            }
        }
    }
}

/// A parsed printf conversion directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: Conversion,
    /// The directive text including the leading `%`, for verbatim fallback.
    pub raw: &'a [u8],
}

/// A segment of a parsed format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Bytes to emit verbatim (plain text or an unrecognized directive).
    Literal(&'a [u8]),
    /// A `%%` escape (emit a single '%').
    Percent,
    /// A conversion directive.
    Directive(Directive<'a>),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse the directive body that follows a '%'.
///
/// `body` starts at the first byte AFTER '%'. On success returns the
/// directive pieces and the number of body bytes consumed. On failure
/// returns `Err(consumed)`: the number of body bytes examined, including the
/// offending conversion letter if there was one.
#[allow(clippy::type_complexity)]
pub fn parse_directive(
    body: &[u8],
) -> Result<(FormatFlags, Width, Precision, LengthMod, Conversion, usize), usize> {
    let (flags, mut pos) = scan_flags(body);

    let (width, next) = scan_count(body, pos);
    pos = next;
    let precision = if body.get(pos) == Some(&b'.') {
        let (count, next) = scan_count(body, pos + 1);
        pos = next;
        // A lone '.' means precision zero.
        match count {
            Count::Absent => Count::Fixed(0),
            other => other,
        }
    } else {
        Count::Absent
    };

    // --- length modifier ---
    let length = match body.get(pos) {
        Some(b'h') if body.get(pos + 1) == Some(&b'h') => {
            pos += 2;
            LengthMod::Hh
        }
        Some(b'h') => {
            pos += 1;
            LengthMod::H
        }
        Some(b'l') if body.get(pos + 1) == Some(&b'l') => {
            pos += 2;
            LengthMod::Ll
        }
        Some(b'l') => {
            pos += 1;
            LengthMod::L
        }
        Some(b'j') => {
            pos += 1;
            LengthMod::J
        }
        Some(b'z') => {
            pos += 1;
            LengthMod::Z
        }
        Some(b't') => {
            pos += 1;
            LengthMod::T
        }
        Some(b'L') => {
            pos += 1;
            LengthMod::BigL
        }
        _ => LengthMod::None,
    };

    // --- conversion specifier ---
    let Some(&letter) = body.get(pos) else {
        return Err(pos);
    };
    pos += 1;
    let (Some(width), Some(precision)) = (width.into_width(), precision.into_precision()) else {
        return Err(pos);
    };
    match Conversion::from_letter(letter) {
        Some(conversion) if conversion.accepts(length) => {
            Ok((flags, width, precision, length, conversion, pos))
        }
        _ => Err(pos),
    }
}

/// Largest width or precision a format string may spell out; C keeps both
/// in an `int`.
pub const MAX_COUNT: usize = i32::MAX as usize;

/// A width or precision as written: digits, `*`, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Count {
    Absent,
    Fixed(usize),
    FromArg,
    /// More than [`MAX_COUNT`]; the directive is not converted.
    TooLarge,
}

impl Count {
    fn into_width(self) -> Option<Width> {
        match self {
            Self::Absent => Some(Width::None),
            Self::Fixed(n) => Some(Width::Fixed(n)),
            Self::FromArg => Some(Width::FromArg),
            Self::TooLarge => None,
        }
    }

    fn into_precision(self) -> Option<Precision> {
        match self {
            Self::Absent => Some(Precision::None),
            Self::Fixed(n) => Some(Precision::Fixed(n)),
            Self::FromArg => Some(Precision::FromArg),
            Self::TooLarge => None,
        }
    }
}

/// Leading flag characters, with C11's overrides applied: '+' beats ' ',
/// '-' beats '0'.
fn scan_flags(body: &[u8]) -> (FormatFlags, usize) {
    let mut flags = FormatFlags::default();
    let mut pos = 0;
    while let Some(&b) = body.get(pos) {
        match b {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }
    flags.space_sign &= !flags.force_sign;
    flags.zero_pad &= !flags.left_justify;
    (flags, pos)
}

/// A `*` or a run of decimal digits starting at `pos`. Every digit is
/// consumed even once the value exceeds [`MAX_COUNT`].
fn scan_count(body: &[u8], pos: usize) -> (Count, usize) {
    if body.get(pos) == Some(&b'*') {
        return (Count::FromArg, pos + 1);
    }
    let digits = body[pos.min(body.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return (Count::Absent, pos);
    }
    let value = body[pos..pos + digits].iter().try_fold(0usize, |acc, &d| {
        let next = acc.checked_mul(10)?.checked_add(usize::from(d - b'0'))?;
        (next <= MAX_COUNT).then_some(next)
    });
    let count = value.map_or(Count::TooLarge, Count::Fixed);
    (count, pos + digits)
}

/// Iterator over the segments of a format string.
///
/// The format string ends at its first NUL byte, if it has one.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    fmt: &'a [u8],
    pos: usize,
}

impl<'a> Segments<'a> {
    #[must_use]
    pub fn new(fmt: &'a [u8]) -> Self {
        let end = fmt.iter().position(|&b| b == 0).unwrap_or(fmt.len());
        Self {
            fmt: &fmt[..end],
            pos: 0,
        }
    }

    /// Byte offset of the cursor within the format string.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let fmt = self.fmt;
        let len = fmt.len();
        let start = self.pos;
        if start >= len {
            return None;
        }

        // Literal run up to the next '%'.
        if fmt[start] != b'%' {
            let run = fmt[start..]
                .iter()
                .position(|&b| b == b'%')
                .map_or(len, |off| start + off);
            self.pos = run;
            return Some(Segment::Literal(&fmt[start..run]));
        }

        let body = &fmt[start + 1..];
        if body.first() == Some(&b'%') {
            self.pos = start + 2;
            return Some(Segment::Percent);
        }

        match parse_directive(body) {
            Ok((flags, width, precision, length, conversion, consumed)) => {
                let end = start + 1 + consumed;
                self.pos = end;
                Some(Segment::Directive(Directive {
                    flags,
                    width,
                    precision,
                    length,
                    conversion,
                    raw: &fmt[start..end],
                }))
            }
            Err(consumed) => {
                // Trailing '%' or unrecognized directive: pass through verbatim.
                let end = start + 1 + consumed;
                self.pos = end;
                Some(Segment::Literal(&fmt[start..end]))
            }
        }
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
