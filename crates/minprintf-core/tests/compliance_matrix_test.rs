//! Compliance matrix: every length modifier at the extremes of its width,
//! fixed-notation floats, pass-through, and the four truncation regimes.
//!
//! Expected strings are written for a 32-bit embedded target (ILP32), the
//! platform class the engine is built for.

use minprintf_core::{fmt_args, FormatArg, IntModel, Printf};

fn ilp32() -> Printf {
    Printf::with_int_model(IntModel::Ilp32)
}

fn render(printf: Printf, format: &str, args: &[FormatArg<'_>]) -> (String, usize) {
    let mut buf = [0u8; 512];
    let n = printf.format_to_buffer(&mut buf, format, args);
    let end = buf.iter().position(|&b| b == 0).unwrap();
    assert_eq!(end, n.min(buf.len() - 1), "terminator placement for {format:?}");
    (String::from_utf8(buf[..end].to_vec()).unwrap(), n)
}

fn check(format: &str, args: &[FormatArg<'_>], expected: &str) {
    let (out, n) = render(ilp32(), format, args);
    assert_eq!(out, expected, "format {format:?}");
    assert_eq!(n, expected.len(), "length for {format:?}");
}

/// Check the capacity regimes 0, n-2, n-1 and n, where n is the exact-fit
/// capacity (output length plus terminator).
fn check_truncation(format: &str, args: &[FormatArg<'_>], expected: &str) {
    let printf = ilp32();
    let n = expected.len() + 1;
    for capacity in [0, n - 2, n - 1, n] {
        let mut storage = vec![0xA5u8; n + 4];
        let ret = printf.format_to_buffer(&mut storage[..capacity], format, args);
        assert_eq!(ret, expected.len(), "{format:?} capacity {capacity}");
        if capacity == 0 {
            assert!(storage.iter().all(|&b| b == 0xA5), "{format:?} wrote into empty buffer");
            continue;
        }
        let stored = capacity - 1;
        assert_eq!(&storage[..stored], &expected.as_bytes()[..stored]);
        assert_eq!(storage[stored], 0, "{format:?} capacity {capacity}");
        assert!(storage[capacity..].iter().all(|&b| b == 0xA5), "write past capacity");
    }
}

#[test]
fn signed_extremes() {
    check("hhd: %hhd\r\n", &fmt_args![i8::MIN], "hhd: -128\r\n");
    check("hhd: %hhd\r\n", &fmt_args![i8::MAX], "hhd: 127\r\n");
    check("hd: %hd\r\n", &fmt_args![i16::MIN], "hd: -32768\r\n");
    check("hd: %hd\r\n", &fmt_args![i16::MAX], "hd: 32767\r\n");
    check("d: %d\r\n", &fmt_args![i32::MIN], "d: -2147483648\r\n");
    check("d: %d\r\n", &fmt_args![i32::MAX], "d: 2147483647\r\n");
    check("ld: %ld\r\n", &fmt_args![i32::MIN], "ld: -2147483648\r\n");
    check("ld: %ld\r\n", &fmt_args![i32::MAX], "ld: 2147483647\r\n");
    check("lld: %lld\r\n", &fmt_args![i64::MIN], "lld: -9223372036854775808\r\n");
    check("lld: %lld\r\n", &fmt_args![i64::MAX], "lld: 9223372036854775807\r\n");
    check("jd: %jd\r\n", &fmt_args![i64::from(i32::MIN)], "jd: -2147483648\r\n");
    check("jd: %jd\r\n", &fmt_args![i64::from(i32::MAX)], "jd: 2147483647\r\n");
    check("zd: %zd\r\n", &fmt_args![i32::MIN], "zd: -2147483648\r\n");
    check("zd: %zd\r\n", &fmt_args![i32::MAX], "zd: 2147483647\r\n");
    check("td: %td\r\n", &fmt_args![i32::MIN], "td: -2147483648\r\n");
    check("td: %td\r\n", &fmt_args![i32::MAX], "td: 2147483647\r\n");
}

#[test]
fn unsigned_extremes() {
    check("hhu: %hhu\r\n", &fmt_args![0u8], "hhu: 0\r\n");
    check("hhu: %hhu\r\n", &fmt_args![u8::MAX], "hhu: 255\r\n");
    check("hu: %hu\r\n", &fmt_args![0u16], "hu: 0\r\n");
    check("hu: %hu\r\n", &fmt_args![u16::MAX], "hu: 65535\r\n");
    check("u: %u\r\n", &fmt_args![0u32], "u: 0\r\n");
    check("u: %u\r\n", &fmt_args![u32::MAX], "u: 4294967295\r\n");
    check("lu: %lu\r\n", &fmt_args![0u32], "lu: 0\r\n");
    check("lu: %lu\r\n", &fmt_args![u32::MAX], "lu: 4294967295\r\n");
    check("llu: %llu\r\n", &fmt_args![0u64], "llu: 0\r\n");
    check("llu: %llu\r\n", &fmt_args![u64::MAX], "llu: 18446744073709551615\r\n");
    check("ju: %ju\r\n", &fmt_args![0u64], "ju: 0\r\n");
    check("ju: %ju\r\n", &fmt_args![u64::MAX], "ju: 18446744073709551615\r\n");
    check("zu: %zu\r\n", &fmt_args![0u32], "zu: 0\r\n");
    check("zu: %zu\r\n", &fmt_args![u32::MAX], "zu: 4294967295\r\n");
    check("tu: %tu\r\n", &fmt_args![0u32], "tu: 0\r\n");
    check("tu: %tu\r\n", &fmt_args![u32::MAX], "tu: 4294967295\r\n");
}

#[test]
fn hex_extremes() {
    check("hhX: %hhX\r\n", &fmt_args![0u8], "hhX: 0\r\n");
    check("hhX: %hhX\r\n", &fmt_args![u8::MAX], "hhX: FF\r\n");
    check("hX: %hX\r\n", &fmt_args![0u16], "hX: 0\r\n");
    check("hX: %hX\r\n", &fmt_args![u16::MAX], "hX: FFFF\r\n");
    check("X: %X\r\n", &fmt_args![0u32], "X: 0\r\n");
    check("X: %X\r\n", &fmt_args![u32::MAX], "X: FFFFFFFF\r\n");
    check("lX: %lX\r\n", &fmt_args![0u32], "lX: 0\r\n");
    check("lX: %lX\r\n", &fmt_args![u32::MAX], "lX: FFFFFFFF\r\n");
    check("llX: %llX\r\n", &fmt_args![0u64], "llX: 0\r\n");
    check("llX: %llX\r\n", &fmt_args![u64::MAX], "llX: FFFFFFFFFFFFFFFF\r\n");
    check("jX: %jX\r\n", &fmt_args![0u64], "jX: 0\r\n");
    check("jX: %jX\r\n", &fmt_args![u64::MAX], "jX: FFFFFFFFFFFFFFFF\r\n");
    check("zX: %zX\r\n", &fmt_args![0u32], "zX: 0\r\n");
    check("zX: %zX\r\n", &fmt_args![u32::MAX], "zX: FFFFFFFF\r\n");
    check("tX: %tX\r\n", &fmt_args![0u32], "tX: 0\r\n");
    check("tX: %tX\r\n", &fmt_args![u32::MAX], "tX: FFFFFFFF\r\n");
    check("x: %x\r\n", &fmt_args![11_259_375i32], "x: abcdef\r\n");
}

#[test]
fn lp64_widths() {
    let lp64 = Printf::with_int_model(IntModel::Lp64);
    let (out, _) = render(lp64, "ld: %ld\r\n", &fmt_args![i64::MIN]);
    assert_eq!(out, "ld: -9223372036854775808\r\n");
    let (out, _) = render(lp64, "td: %td\r\n", &fmt_args![i64::MIN]);
    assert_eq!(out, "td: -9223372036854775808\r\n");
    let (out, _) = render(lp64, "zX: %zX\r\n", &fmt_args![u64::MAX]);
    assert_eq!(out, "zX: FFFFFFFFFFFFFFFF\r\n");
}

#[test]
fn percent_and_unsupported() {
    check("%% \r\n", &fmt_args![], "% \r\n");
    let (out, n) = render(ilp32(), "%a \r\n", &fmt_args![5i32]);
    assert_eq!(out, "%a \r\n");
    assert_ne!(n, 0);
}

#[cfg(feature = "float")]
#[test]
fn fixed_notation() {
    let pi = 3.14159265359_f64;
    check("f: %f\r\n", &fmt_args![3.0089f64], "f: 3.008900\r\n");
    check("f: %f\r\n", &fmt_args![7.0f64], "f: 7.000000\r\n");
    check("f: %f\r\n", &fmt_args![-pi], "f: -3.141593\r\n");
    check("f: %f\r\n", &fmt_args![0.0f64], "f: 0.000000\r\n");
    check("f: %f\r\n", &fmt_args![pi], "f: 3.141593\r\n");
}

#[test]
fn truncation_regimes() {
    check_truncation("d: %d", &fmt_args![-1024i32], "d: -1024");
    check_truncation("ld: %ld", &fmt_args![-1_048_576i32], "ld: -1048576");
    check_truncation("lld: %lld", &fmt_args![-1_099_511_627_776i64], "lld: -1099511627776");
    check_truncation("u: %u", &fmt_args![1024u32], "u: 1024");
    check_truncation("lu: %lu", &fmt_args![1_048_576u32], "lu: 1048576");
    check_truncation("llu: %llu", &fmt_args![1_099_511_627_776u64], "llu: 1099511627776");
    check_truncation("x: 0x%x", &fmt_args![0x400u32], "x: 0x400");
    check_truncation("lx: 0x%lx", &fmt_args![0x10_0000u32], "lx: 0x100000");
    check_truncation("llx: 0x%llx", &fmt_args![0x100_0000_0000u64], "llx: 0x10000000000");
}

#[test]
fn truncation_with_padding_and_passthrough() {
    check_truncation("[%8d]", &fmt_args![-42i32], "[     -42]");
    check_truncation("[%-6s]", &fmt_args!["ab"], "[ab    ]");
    check_truncation("%a \r\n", &fmt_args![5i32], "%a \r\n");
    check_truncation("%d %d", &fmt_args![1i32], "1 %d");
}

#[test]
fn identical_inputs_give_identical_results() {
    let args = fmt_args![-7i16, "str", 0xBEEFu32, 'q' as u8];
    let format = "%6hd|%.2s|%#X|%c";
    let mut a = [0u8; 40];
    let mut b = [0u8; 40];
    let na = ilp32().format_to_buffer(&mut a, format, &args);
    let nb = ilp32().format_to_buffer(&mut b, format, &args);
    assert_eq!(na, nb);
    assert_eq!(a, b);
    assert_eq!(&a[..na], b"    -7|st|0XBEEF|q");
}
