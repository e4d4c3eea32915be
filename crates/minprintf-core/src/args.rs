//! Typed format arguments.
//!
//! Replaces C variadic argument capture: the caller builds a slice of
//! [`FormatArg`] values and each directive consumes the next one. Integer
//! arguments keep their own width so the engine can reproduce C's default
//! argument promotion (sign- or zero-extension) before reinterpreting the
//! value at the width the directive's length modifier selects.

use crate::config::IntModel;
use crate::parser::{Conversion, LengthMod};

/// Typed argument value for safe formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatArg<'a> {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F64(f64),
    /// A single byte for `%c`.
    Char(u8),
    /// Byte string for `%s` (no terminator required).
    Str(&'a [u8]),
    /// Address for `%p`.
    Ptr(usize),
}

impl FormatArg<'_> {
    /// The value after C default argument promotion, as 64 raw bits.
    ///
    /// Signed values are sign-extended, unsigned values and addresses
    /// zero-extended. `None` for arguments that are not integers.
    #[must_use]
    pub fn promoted_bits(&self) -> Option<u64> {
        let bits = match *self {
            Self::I8(v) => i64::from(v) as u64,
            Self::I16(v) => i64::from(v) as u64,
            Self::I32(v) => i64::from(v) as u64,
            Self::I64(v) => v as u64,
            Self::U8(v) => u64::from(v),
            Self::U16(v) => u64::from(v),
            Self::U32(v) => u64::from(v),
            Self::U64(v) => v,
            Self::Char(v) => u64::from(v),
            Self::Ptr(v) => v as u64,
            Self::F64(_) | Self::Str(_) => return None,
        };
        Some(bits)
    }

    /// Interpret as a C `int` (used for `*` width and precision).
    #[must_use]
    pub fn as_c_int(&self) -> Option<i32> {
        self.promoted_bits().map(|bits| bits as u32 as i32)
    }
}

// ---------------------------------------------------------------------------
// Conversions from Rust values
// ---------------------------------------------------------------------------

macro_rules! impl_from_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FormatArg<'_> {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_int!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f64 => F64,
);

impl From<isize> for FormatArg<'_> {
    fn from(value: isize) -> Self {
        Self::I64(value as i64)
    }
}

impl From<usize> for FormatArg<'_> {
    fn from(value: usize) -> Self {
        Self::U64(value as u64)
    }
}

impl From<f32> for FormatArg<'_> {
    fn from(value: f32) -> Self {
        // C promotes float to double for variadic calls.
        Self::F64(f64::from(value))
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Str(value)
    }
}

impl<T> From<*const T> for FormatArg<'_> {
    fn from(value: *const T) -> Self {
        Self::Ptr(value as usize)
    }
}

impl<T> From<*mut T> for FormatArg<'_> {
    fn from(value: *mut T) -> Self {
        Self::Ptr(value as usize)
    }
}

/// Build a `[FormatArg; N]` array from heterogeneous values.
///
/// ```
/// use minprintf_core::{fmt_args, format_to_buffer};
///
/// let mut buf = [0u8; 32];
/// let n = format_to_buffer(&mut buf, "%s=%d", &fmt_args!["x", -3i32]);
/// assert_eq!(&buf[..n], b"x=-3");
/// ```
#[macro_export]
macro_rules! fmt_args {
    () => {
        [] as [$crate::FormatArg<'_>; 0]
    };
    ($($arg:expr),+ $(,)?) => {
        [$($crate::FormatArg::from($arg)),+]
    };
}

// ---------------------------------------------------------------------------
// Integer classes
// ---------------------------------------------------------------------------

/// Effective width and signedness of an integer directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntClass {
    pub bits: u32,
    pub signed: bool,
}

impl IntClass {
    /// Derive the class from a length modifier and conversion under `model`.
    #[must_use]
    pub fn derive(length: LengthMod, conversion: Conversion, model: IntModel) -> Self {
        let bits = match length {
            LengthMod::Hh => 8,
            LengthMod::H => 16,
            LengthMod::None | LengthMod::BigL => 32,
            LengthMod::L => model.long_bits(),
            LengthMod::Ll => 64,
            LengthMod::J => model.intmax_bits(),
            LengthMod::Z => model.size_bits(),
            LengthMod::T => model.ptrdiff_bits(),
        };
        Self {
            bits,
            signed: matches!(conversion, Conversion::Signed),
        }
    }

    /// Reinterpret promoted bits as a signed value of this width.
    #[must_use]
    pub fn narrow_signed(self, raw: u64) -> i64 {
        let shift = 64 - self.bits;
        ((raw << shift) as i64) >> shift
    }

    /// Reinterpret promoted bits as an unsigned value of this width.
    #[must_use]
    pub fn narrow_unsigned(self, raw: u64) -> u64 {
        if self.bits >= 64 {
            raw
        } else {
            raw & ((1u64 << self.bits) - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(length: LengthMod, conversion: Conversion) -> IntClass {
        IntClass::derive(length, conversion, IntModel::Lp64)
    }

    #[test]
    fn test_promotion_sign_extends() {
        assert_eq!(FormatArg::I8(-1).promoted_bits(), Some(u64::MAX));
        assert_eq!(FormatArg::U8(255).promoted_bits(), Some(255));
        assert_eq!(FormatArg::Ptr(0x1000).promoted_bits(), Some(0x1000));
        assert_eq!(FormatArg::F64(1.0).promoted_bits(), None);
        assert_eq!(FormatArg::Str(b"x").promoted_bits(), None);
    }

    #[test]
    fn test_narrow_hh() {
        let hhd = class(LengthMod::Hh, Conversion::Signed);
        let hhu = class(LengthMod::Hh, Conversion::Unsigned);
        assert_eq!(hhd.narrow_signed(255), -1);
        assert_eq!(hhd.narrow_signed(FormatArg::I32(-128).promoted_bits().unwrap()), -128);
        assert_eq!(hhu.narrow_unsigned(FormatArg::I32(-1).promoted_bits().unwrap()), 255);
        assert_eq!(hhu.narrow_unsigned(256), 0);
    }

    #[test]
    fn test_narrow_full_width() {
        let lld = class(LengthMod::Ll, Conversion::Signed);
        assert_eq!(lld.bits, 64);
        assert_eq!(lld.narrow_signed(u64::MAX), -1);
        assert_eq!(lld.narrow_unsigned(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_model_dependent_widths() {
        let ilp32 = IntModel::Ilp32;
        assert_eq!(IntClass::derive(LengthMod::L, Conversion::Signed, ilp32).bits, 32);
        assert_eq!(IntClass::derive(LengthMod::Z, Conversion::Unsigned, ilp32).bits, 32);
        assert_eq!(IntClass::derive(LengthMod::T, Conversion::Signed, ilp32).bits, 32);
        assert_eq!(IntClass::derive(LengthMod::J, Conversion::Signed, ilp32).bits, 64);
        assert_eq!(IntClass::derive(LengthMod::L, Conversion::Signed, IntModel::Llp64).bits, 32);
        assert_eq!(class(LengthMod::L, Conversion::Unsigned).bits, 64);
    }

    #[test]
    fn test_c_int_view() {
        assert_eq!(FormatArg::I64(-7).as_c_int(), Some(-7));
        assert_eq!(FormatArg::U32(u32::MAX).as_c_int(), Some(-1));
        assert_eq!(FormatArg::F64(2.0).as_c_int(), None);
    }

    #[test]
    fn test_fmt_args_macro() {
        let args = crate::fmt_args![1i8, 2u64, "s", 1.5f64];
        assert_eq!(args[0], FormatArg::I8(1));
        assert_eq!(args[1], FormatArg::U64(2));
        assert_eq!(args[2], FormatArg::Str(b"s"));
        assert_eq!(args[3], FormatArg::F64(1.5));
        assert_eq!(crate::fmt_args![].len(), 0);
    }
}
