//! Differential tests against the host C library's `snprintf`.
//!
//! Every case is formatted by both implementations at the capacities 0,
//! n-2, n-1, n and n+8 (n = exact fit) and the buffers and return values
//! compared byte for byte.

#![cfg(unix)]
#![allow(unsafe_code)]

use std::ffi::{c_char, c_int, c_long, c_longlong, c_uint, c_ulong, c_ulonglong, c_void, CStr};

use minprintf_core::{FormatArg, Printf};

#[derive(Debug, Clone, Copy)]
enum HostArg {
    None,
    Int(c_int),
    UInt(c_uint),
    Long(c_long),
    ULong(c_ulong),
    LongLong(c_longlong),
    ULongLong(c_ulonglong),
    Double(f64),
    Str(&'static CStr),
    Ptr(usize),
}

impl HostArg {
    fn to_format_arg(self) -> Option<FormatArg<'static>> {
        Some(match self {
            Self::None => return None,
            Self::Int(v) => FormatArg::from(v),
            Self::UInt(v) => FormatArg::from(v),
            Self::Long(v) => FormatArg::from(v),
            Self::ULong(v) => FormatArg::from(v),
            Self::LongLong(v) => FormatArg::from(v),
            Self::ULongLong(v) => FormatArg::from(v),
            Self::Double(v) => FormatArg::F64(v),
            Self::Str(s) => FormatArg::Str(s.to_bytes()),
            Self::Ptr(p) => FormatArg::Ptr(p),
        })
    }
}

/// Host `snprintf` into a buffer of `capacity` bytes inside a larger guard area.
fn host(format: &CStr, arg: HostArg, capacity: usize) -> (Vec<u8>, usize) {
    let mut storage = vec![0xA5u8; capacity + 8];
    let out = storage.as_mut_ptr().cast::<c_char>();
    let fmt = format.as_ptr();
    // SAFETY: `out` is valid for `capacity` bytes, `fmt` is NUL-terminated
    // and each arm passes exactly the argument type its directive reads.
    let ret = unsafe {
        match arg {
            HostArg::None => libc::snprintf(out, capacity, fmt),
            HostArg::Int(v) => libc::snprintf(out, capacity, fmt, v),
            HostArg::UInt(v) => libc::snprintf(out, capacity, fmt, v),
            HostArg::Long(v) => libc::snprintf(out, capacity, fmt, v),
            HostArg::ULong(v) => libc::snprintf(out, capacity, fmt, v),
            HostArg::LongLong(v) => libc::snprintf(out, capacity, fmt, v),
            HostArg::ULongLong(v) => libc::snprintf(out, capacity, fmt, v),
            HostArg::Double(v) => libc::snprintf(out, capacity, fmt, v),
            HostArg::Str(s) => libc::snprintf(out, capacity, fmt, s.as_ptr()),
            HostArg::Ptr(p) => libc::snprintf(out, capacity, fmt, p as *const c_void),
        }
    };
    assert!(ret >= 0, "host snprintf failed for {format:?}");
    (storage, ret as usize)
}

fn ours(format: &CStr, arg: HostArg, capacity: usize) -> (Vec<u8>, usize) {
    let mut storage = vec![0xA5u8; capacity + 8];
    let args: Vec<FormatArg<'static>> = arg.to_format_arg().into_iter().collect();
    let n = Printf::native().format_to_buffer(&mut storage[..capacity], format.to_bytes(), &args);
    (storage, n)
}

fn compare(format: &CStr, arg: HostArg) {
    let (_, full) = host(format, arg, 0);
    let n = full + 1;
    let mut capacities = vec![0, n - 1, n, n + 8];
    if n >= 2 {
        capacities.push(n - 2);
    }
    for capacity in capacities {
        let expected = host(format, arg, capacity);
        let actual = ours(format, arg, capacity);
        assert_eq!(
            actual,
            expected,
            "format {format:?} arg {arg:?} capacity {capacity}: ours {:?} host {:?}",
            String::from_utf8_lossy(&actual.0),
            String::from_utf8_lossy(&expected.0),
        );
    }
}

#[test]
fn integers_match_host() {
    let cases: &[(&CStr, HostArg)] = &[
        (c"d: %d\r\n", HostArg::Int(c_int::MIN)),
        (c"d: %d\r\n", HostArg::Int(c_int::MAX)),
        (c"hhd: %hhd\r\n", HostArg::Int(-128)),
        (c"hhd: %hhd\r\n", HostArg::Int(255)),
        (c"hd: %hd\r\n", HostArg::Int(-32768)),
        (c"hhu: %hhu\r\n", HostArg::Int(-1)),
        (c"hu: %hu\r\n", HostArg::UInt(c_uint::MAX)),
        (c"u: %u\r\n", HostArg::UInt(c_uint::MAX)),
        (c"ld: %ld\r\n", HostArg::Long(c_long::MIN)),
        (c"lu: %lu\r\n", HostArg::ULong(c_ulong::MAX)),
        (c"lld: %lld\r\n", HostArg::LongLong(c_longlong::MIN)),
        (c"llu: %llu\r\n", HostArg::ULongLong(c_ulonglong::MAX)),
        (c"llX: %llX\r\n", HostArg::ULongLong(c_ulonglong::MAX)),
        (c"x: %x\r\n", HostArg::Int(11_259_375)),
        (c"zu: %zu\r\n", HostArg::ULong(c_ulong::MAX)),
        (c"o: %o", HostArg::UInt(511)),
        (c"[%#o]", HostArg::UInt(0)),
        (c"[%#o]", HostArg::UInt(8)),
        (c"[%#x]", HostArg::UInt(0)),
        (c"[%#10x]", HostArg::UInt(0xbeef)),
        (c"[%#010X]", HostArg::UInt(0xbeef)),
        (c"[%-8d]", HostArg::Int(-42)),
        (c"[%08d]", HostArg::Int(-42)),
        (c"[%+d]", HostArg::Int(0)),
        (c"[% d]", HostArg::Int(7)),
        (c"[%+ d]", HostArg::Int(7)),
        (c"[%.0d]", HostArg::Int(0)),
        (c"[%5.0u]", HostArg::UInt(0)),
        (c"[%.5d]", HostArg::Int(-42)),
        (c"[%08.3d]", HostArg::Int(42)),
        (c"[%-+8.4i]", HostArg::Int(42)),
    ];
    for &(format, arg) in cases {
        compare(format, arg);
    }
}

#[test]
fn text_conversions_match_host() {
    let cases: &[(&CStr, HostArg)] = &[
        (c"%% \r\n", HostArg::None),
        (c"100%%", HostArg::None),
        (c"[%c]", HostArg::Int(b'A' as c_int)),
        (c"[%5c]", HostArg::Int(b'A' as c_int)),
        (c"[%-3c]", HostArg::Int(b'z' as c_int)),
        (c"[%s]", HostArg::Str(c"hello")),
        (c"[%10s]", HostArg::Str(c"hello")),
        (c"[%-10s]", HostArg::Str(c"hello")),
        (c"[%.3s]", HostArg::Str(c"hello")),
        (c"[%8.2s]", HostArg::Str(c"hello")),
        (c"[%s]", HostArg::Str(c"")),
        (c"[%p]", HostArg::Ptr(0x1234_5678)),
        (c"[%20p]", HostArg::Ptr(0xdead_beef)),
        (c"[%-20p]", HostArg::Ptr(0xdead_beef)),
    ];
    for &(format, arg) in cases {
        compare(format, arg);
    }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn glibc_conventions_match_host() {
    compare(c"[%p]", HostArg::Ptr(0));
    compare(c"[%10p]", HostArg::Ptr(0));
    #[cfg(feature = "float")]
    {
        compare(c"[%f]", HostArg::Double(-f64::NAN));
        compare(c"[%F]", HostArg::Double(f64::NAN));
    }
}

#[cfg(feature = "float")]
#[test]
fn floats_match_host() {
    let formats: &[&CStr] = &[
        c"f: %f\r\n",
        c"[%.0f]",
        c"[%.1f]",
        c"[%.3f]",
        c"[%.12f]",
        c"[%#.0f]",
        c"[%12.4f]",
        c"[%-12.4f]",
        c"[%+012.3f]",
        c"[% .2f]",
        c"[%F]",
        c"[%.20f]",
    ];
    let values = [
        3.0089,
        7.0,
        -3.14159265359,
        0.0,
        -0.0,
        3.14159265359,
        0.5,
        1.5,
        2.5,
        -2.5,
        0.125,
        0.375,
        9.9999999,
        0.1,
        1e-10,
        123_456_789.987_654_321,
        1e21,
        2f64.powi(70),
        f64::MIN_POSITIVE,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::MAX,
    ];
    for format in formats {
        for value in values {
            compare(format, HostArg::Double(value));
        }
    }
}

#[cfg(feature = "float")]
#[test]
fn float_sweep_matches_host() {
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    for _ in 0..2000 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let value = f64::from_bits(state);
        if !value.is_finite() {
            continue;
        }
        compare(c"%.17f", HostArg::Double(value));
    }
}
