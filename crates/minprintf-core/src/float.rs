//! Fixed-notation floating point (`%f`, `%F`).
//!
//! Digits are derived exactly from the binary value using fixed-size limb
//! arithmetic and rounded half-to-even at the requested precision, matching
//! glibc under the default rounding mode. The conversion runs in two passes
//! over the fraction: the first decides the rounding, the second streams the
//! corrected digits, so the output length is known before anything is
//! written and no digit buffer proportional to the precision is needed.

use core::cmp::Ordering;

use crate::render::{positive_sign, render_padded, Field};
use crate::sink::Sink;

/// Precision used when a directive gives none.
pub const DEFAULT_PRECISION: usize = 6;

/// 32-bit limbs covering `f64::MAX < 2^1024`.
const INT_LIMBS: usize = 32;
/// Decimal digits of `f64::MAX`.
const INT_DIGIT_CAP: usize = 309;
/// 32-bit limbs covering fraction bits down to 2^-1074.
const FRAC_LIMBS: usize = 34;
const HALF: u32 = 0x8000_0000;

/// Split a finite non-negative value into `mantissa * 2^exp2`.
fn decompose(abs: f64) -> (u64, i32) {
    let bits = abs.to_bits();
    let exp_field = ((bits >> 52) & 0x7FF) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    if exp_field == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_field - 1075)
    }
}

// ---------------------------------------------------------------------------
// Integer part
// ---------------------------------------------------------------------------

/// Decimal digits of the integer part, right-aligned.
struct IntDigits {
    buf: [u8; INT_DIGIT_CAP],
    start: usize,
}

impl IntDigits {
    fn from_u64(mut value: u64) -> Self {
        let mut buf = [b'0'; INT_DIGIT_CAP];
        let mut pos = INT_DIGIT_CAP;
        loop {
            pos -= 1;
            buf[pos] = b'0' + (value % 10) as u8;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        Self { buf, start: pos }
    }

    /// Digits of `mantissa << exp2` for values too large for `u64`.
    fn from_shifted(mantissa: u64, exp2: u32) -> Self {
        let mut limbs = [0u32; INT_LIMBS];
        let word = (exp2 / 32) as usize;
        let wide = u128::from(mantissa) << (exp2 % 32);
        for i in 0..3 {
            if let Some(limb) = limbs.get_mut(word + i) {
                *limb = (wide >> (32 * i)) as u32;
            }
        }

        let mut len = significant_len(&limbs, INT_LIMBS);
        let mut buf = [b'0'; INT_DIGIT_CAP];
        let mut pos = INT_DIGIT_CAP;
        while len > 0 && pos > 0 {
            let mut rem = 0u64;
            for limb in limbs[..len].iter_mut().rev() {
                let cur = (rem << 32) | u64::from(*limb);
                *limb = (cur / 10) as u32;
                rem = cur % 10;
            }
            pos -= 1;
            buf[pos] = b'0' + rem as u8;
            len = significant_len(&limbs, len);
        }
        if pos == INT_DIGIT_CAP {
            pos -= 1;
        }
        Self { buf, start: pos }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..]
    }
}

fn significant_len(limbs: &[u32], mut len: usize) -> usize {
    while len > 0 && limbs[len - 1] == 0 {
        len -= 1;
    }
    len
}

// ---------------------------------------------------------------------------
// Fraction
// ---------------------------------------------------------------------------

/// Position of the undigested fraction relative to one half ulp of the
/// last emitted digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Remainder {
    Below,
    Tie,
    Above,
}

/// Fraction `bits / 2^k` held as `limbs / 2^(32 * len)`, little-endian.
#[derive(Clone)]
struct Fraction {
    limbs: [u32; FRAC_LIMBS],
    len: usize,
}

impl Fraction {
    fn new(bits: u64, k: u32) -> Self {
        let len = k.div_ceil(32) as usize;
        let wide = u128::from(bits) << (len as u32 * 32 - k);
        let mut limbs = [0u32; FRAC_LIMBS];
        for (i, limb) in limbs.iter_mut().take(len.min(3)).enumerate() {
            *limb = (wide >> (32 * i)) as u32;
        }
        Self { limbs, len }
    }

    /// Multiply by ten; the carry out of the top limb is the next digit.
    fn next_digit(&mut self) -> u8 {
        let mut carry = 0u64;
        for limb in &mut self.limbs[..self.len] {
            let cur = u64::from(*limb) * 10 + carry;
            *limb = cur as u32;
            carry = cur >> 32;
        }
        carry as u8
    }

    fn remainder(&self) -> Remainder {
        let Some((&top, rest)) = self.limbs[..self.len].split_last() else {
            return Remainder::Below;
        };
        match top.cmp(&HALF) {
            Ordering::Less => Remainder::Below,
            Ordering::Greater => Remainder::Above,
            Ordering::Equal if rest.iter().all(|&l| l == 0) => Remainder::Tie,
            Ordering::Equal => Remainder::Above,
        }
    }
}

/// How rounding changes the digits produced by truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rounding {
    Truncate,
    /// Increment the fraction digit at this index; later digits become 0.
    BumpDigit(usize),
    /// Every fraction digit was 9 (or there are none): carry into the
    /// integer part and emit zeros.
    CarryInteger,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render `value` in fixed notation. `upper` selects `INF`/`NAN`.
pub fn render_float<S: Sink>(sink: &mut S, value: f64, upper: bool, field: &Field) {
    let sign = if value.is_sign_negative() {
        Some(b'-')
    } else {
        positive_sign(&field.flags)
    };

    if !value.is_finite() {
        render_non_finite(sink, value.is_nan(), sign, upper, field);
        return;
    }

    let precision = field.precision.unwrap_or(DEFAULT_PRECISION);
    let (mantissa, exp2) = decompose(value.abs());

    if exp2 >= 0 {
        // Integral value; no fraction bits at all.
        let int_digits = IntDigits::from_shifted(mantissa, exp2.unsigned_abs());
        emit_fixed(
            sink,
            sign,
            int_digits.as_bytes(),
            Fraction::new(0, 0),
            0,
            Rounding::Truncate,
            precision,
            field,
        );
        return;
    }

    let k = exp2.unsigned_abs();
    let (int_value, frac_bits) = if k >= 64 {
        (0, mantissa)
    } else {
        (mantissa >> k, mantissa & ((1u64 << k) - 1))
    };
    let fraction = Fraction::new(frac_bits, k);
    // Past k digits the fraction is exhausted and only zeros follow.
    let exact = precision.min(k as usize);
    let rounding = plan_rounding(&fraction, exact, int_value);
    let int_value = if rounding == Rounding::CarryInteger {
        int_value + 1
    } else {
        int_value
    };
    let int_digits = IntDigits::from_u64(int_value);
    emit_fixed(
        sink,
        sign,
        int_digits.as_bytes(),
        fraction,
        exact,
        rounding,
        precision,
        field,
    );
}

/// First pass: walk `exact` digits and classify what is left over.
fn plan_rounding(fraction: &Fraction, exact: usize, int_value: u64) -> Rounding {
    let mut scan = fraction.clone();
    let mut last_digit = (int_value % 10) as u8;
    let mut last_non_nine = None;
    for i in 0..exact {
        let d = scan.next_digit();
        if d != 9 {
            last_non_nine = Some(i);
        }
        last_digit = d;
    }
    let round_up = match scan.remainder() {
        Remainder::Below => false,
        Remainder::Above => true,
        Remainder::Tie => last_digit % 2 == 1,
    };
    match (round_up, last_non_nine) {
        (false, _) => Rounding::Truncate,
        (true, Some(i)) => Rounding::BumpDigit(i),
        (true, None) => Rounding::CarryInteger,
    }
}

#[allow(clippy::too_many_arguments)]
fn emit_fixed<S: Sink>(
    sink: &mut S,
    sign: Option<u8>,
    int_digits: &[u8],
    mut fraction: Fraction,
    exact: usize,
    rounding: Rounding,
    precision: usize,
    field: &Field,
) {
    let has_point = precision > 0 || field.flags.alt_form;
    let content = usize::from(sign.is_some())
        .saturating_add(int_digits.len())
        .saturating_add(usize::from(has_point))
        .saturating_add(precision);
    let pad_total = field.width.saturating_sub(content);
    let left = field.flags.left_justify;
    let zero_pad = field.flags.zero_pad && !left;

    if !left && !zero_pad {
        sink.write_repeated(b' ', pad_total);
    }
    if let Some(s) = sign {
        sink.write_bytes(&[s]);
    }
    if zero_pad {
        sink.write_repeated(b'0', pad_total);
    }
    sink.write_bytes(int_digits);
    if has_point {
        sink.write_bytes(b".");
    }

    let mut chunk = [0u8; 32];
    let mut filled = 0;
    for i in 0..exact {
        let d = fraction.next_digit();
        let out = match rounding {
            Rounding::Truncate => d,
            Rounding::BumpDigit(j) if i < j => d,
            Rounding::BumpDigit(j) if i == j => d + 1,
            Rounding::BumpDigit(_) | Rounding::CarryInteger => 0,
        };
        chunk[filled] = b'0' + out;
        filled += 1;
        if filled == chunk.len() {
            sink.write_bytes(&chunk);
            filled = 0;
        }
    }
    sink.write_bytes(&chunk[..filled]);
    sink.write_repeated(b'0', precision - exact);

    if left {
        sink.write_repeated(b' ', pad_total);
    }
}

fn render_non_finite<S: Sink>(
    sink: &mut S,
    is_nan: bool,
    sign: Option<u8>,
    upper: bool,
    field: &Field,
) {
    let word: &[u8; 3] = match (is_nan, upper) {
        (true, false) => b"nan",
        (true, true) => b"NAN",
        (false, false) => b"inf",
        (false, true) => b"INF",
    };
    let mut text = [0u8; 4];
    let mut len = 0;
    if let Some(s) = sign {
        text[0] = s;
        len = 1;
    }
    text[len..len + 3].copy_from_slice(word);
    // The '0' flag does not apply to inf/nan.
    render_padded(sink, &text[..len + 3], field);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
