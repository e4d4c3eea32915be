//! # minprintf-core
//!
//! Allocation-free `printf`/`snprintf` formatting engine.
//!
//! The engine reproduces C library output byte for byte for the integer,
//! character, string, pointer and (with the `float` feature) fixed-notation
//! floating-point conversions, including every standard length modifier and
//! the `snprintf` truncation contract. It never allocates and keeps all
//! scratch state on the stack, so it runs unchanged on `no_std` targets.
//!
//! ```
//! use minprintf_core::{fmt_args, format_to_buffer};
//!
//! let mut buf = [0u8; 5];
//! let n = format_to_buffer(&mut buf, "hhu: %hhu\r\n", &fmt_args![255u8]);
//! assert_eq!(n, 10);
//! assert_eq!(&buf, b"hhu:\0");
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod args;
pub mod config;
mod engine;
#[cfg(feature = "float")]
pub mod float;
pub mod parser;
pub mod render;
pub mod sink;

pub use args::{FormatArg, IntClass};
pub use config::{FormatConfig, IntModel};
pub use parser::{Conversion, Directive, FormatFlags, LengthMod, Segment, Segments};
#[cfg(feature = "std")]
pub use sink::IoStream;
pub use sink::{BoundedWriter, CountingSink, Sink, Stream, StreamSink, WriterState};

/// Formatter bound to a [`FormatConfig`].
///
/// The free functions use [`FormatConfig::native`]; a `Printf` is needed only
/// to emulate another platform's integer model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Printf {
    config: FormatConfig,
}

impl Printf {
    #[must_use]
    pub const fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn native() -> Self {
        Self::new(FormatConfig::native())
    }

    #[must_use]
    pub const fn with_int_model(int_model: IntModel) -> Self {
        Self::new(FormatConfig::new(int_model))
    }

    #[must_use]
    pub const fn config(&self) -> FormatConfig {
        self.config
    }

    /// `snprintf` into `dest`; see [`format_to_buffer`].
    pub fn format_to_buffer<F: AsRef<[u8]>>(
        &self,
        dest: &mut [u8],
        format: F,
        args: &[FormatArg<'_>],
    ) -> usize {
        let mut writer = BoundedWriter::new(dest);
        self.format_into(&mut writer, format, args);
        writer.finish()
    }

    /// Format to a transport; see [`format_to_stream`].
    pub fn format_to_stream<S: Stream, F: AsRef<[u8]>>(
        &self,
        stream: S,
        format: F,
        args: &[FormatArg<'_>],
    ) -> Result<usize, S::Error> {
        let mut sink = StreamSink::new(stream);
        self.format_into(&mut sink, format, args);
        sink.finish()
    }

    /// Logical length only; see [`formatted_len`].
    #[must_use]
    pub fn formatted_len<F: AsRef<[u8]>>(&self, format: F, args: &[FormatArg<'_>]) -> usize {
        let mut counter = CountingSink::new();
        self.format_into(&mut counter, format, args);
        counter.total()
    }

    /// Format into any [`Sink`] and return the logical length it accepted.
    pub fn format_into<S: Sink, F: AsRef<[u8]>>(
        &self,
        sink: &mut S,
        format: F,
        args: &[FormatArg<'_>],
    ) -> usize {
        engine::run(sink, format.as_ref(), args, &self.config);
        sink.total()
    }
}

/// Format into a fixed-capacity buffer with `snprintf` semantics.
///
/// `dest.len()` is the capacity, terminator included. At most
/// `dest.len() - 1` bytes are stored, followed by a NUL; a zero-length
/// destination is never written. Returns the length the full output would
/// have had, so `n >= dest.len()` signals truncation.
pub fn format_to_buffer<F: AsRef<[u8]>>(dest: &mut [u8], format: F, args: &[FormatArg<'_>]) -> usize {
    Printf::native().format_to_buffer(dest, format, args)
}

/// Format to an unbounded [`Stream`].
///
/// Returns the number of bytes produced, or the first transport error (no
/// further bytes are sent after it).
pub fn format_to_stream<S: Stream, F: AsRef<[u8]>>(
    stream: S,
    format: F,
    args: &[FormatArg<'_>],
) -> Result<usize, S::Error> {
    Printf::native().format_to_stream(stream, format, args)
}

/// Length the output would have, without writing it (`snprintf(NULL, 0, ...)`).
#[must_use]
pub fn formatted_len<F: AsRef<[u8]>>(format: F, args: &[FormatArg<'_>]) -> usize {
    Printf::native().formatted_len(format, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt_args;

    #[test]
    fn test_scenario_int_min() {
        let mut buf = [0u8; 64];
        let n = format_to_buffer(&mut buf, "d: %d\r\n", &fmt_args![i32::MIN]);
        assert_eq!(n, 16);
        assert_eq!(&buf[..=n], b"d: -2147483648\r\n\0");
    }

    #[test]
    fn test_scenario_truncated_hhu() {
        let mut buf = [0xAAu8; 5];
        let n = format_to_buffer(&mut buf, "hhu: %hhu\r\n", &fmt_args![255u8]);
        assert_eq!(n, 10);
        assert_eq!(&buf, b"hhu:\0");
    }

    #[test]
    fn test_scenario_percent_literal() {
        let mut buf = [0u8; 16];
        let n = format_to_buffer(&mut buf, "%% \r\n", &fmt_args![]);
        assert_eq!(n, 4);
        assert_eq!(&buf[..=n], b"% \r\n\0");
    }

    #[test]
    fn test_scenario_unsupported_passthrough() {
        let mut buf = [0u8; 100];
        let n = format_to_buffer(&mut buf, "%a \r\n", &fmt_args![5i32]);
        assert_eq!(n, 5);
        assert_eq!(&buf[..=n], b"%a \r\n\0");
    }

    #[test]
    fn test_scenario_hex_letters() {
        let mut buf = [0u8; 32];
        let n = format_to_buffer(&mut buf, "x: %x\r\n", &fmt_args![11_259_375u32]);
        assert_eq!(&buf[..n], b"x: abcdef\r\n");
    }

    #[test]
    fn test_formatted_len_matches_buffer_len() {
        let args = fmt_args!["abc", -12i64, 0xffu8];
        let n = formatted_len("%s:%lld:%#x", &args);
        let mut buf = [0u8; 64];
        assert_eq!(format_to_buffer(&mut buf, "%s:%lld:%#x", &args), n);
        assert_eq!(&buf[..n], b"abc:-12:0xff");
    }

    #[test]
    fn test_format_to_stream_vec() {
        struct Collect(Vec<u8>);
        impl Stream for Collect {
            type Error = core::convert::Infallible;
            fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
                self.0.extend_from_slice(bytes);
                Ok(())
            }
        }
        let mut out = Collect(Vec::new());
        let n = format_to_stream(&mut out, "%s=%u\n", &fmt_args!["n", 7u16]).unwrap();
        assert_eq!(n, 4);
        assert_eq!(out.0, b"n=7\n");
    }

    #[test]
    fn test_printf_with_model() {
        let p = Printf::with_int_model(IntModel::Ilp32);
        assert_eq!(p.config().int_model, IntModel::Ilp32);
        let mut buf = [0u8; 32];
        let n = p.format_to_buffer(&mut buf, "%lx", &fmt_args![-1i64]);
        assert_eq!(&buf[..n], b"ffffffff");
    }

    #[test]
    fn test_byte_format_with_nul() {
        let mut buf = [0u8; 8];
        let n = format_to_buffer(&mut buf, b"ok\0ignored", &fmt_args![]);
        assert_eq!(&buf[..=n], b"ok\0");
    }

    #[test]
    fn test_oversized_precision_is_literal() {
        let mut buf = [0u8; 16];
        let n = format_to_buffer(&mut buf, "%.99999999999999999999999d", &fmt_args![-1i32]);
        assert_eq!(n, 26);
        assert_eq!(&buf, b"%.9999999999999\0");

        assert_eq!(formatted_len("%#.99999999999999999999999x", &fmt_args![1u32]), 27);
        assert_eq!(formatted_len("%+.18446744073709551615d", &fmt_args![-1i32]), 24);
    }

    #[test]
    fn test_largest_precision_counts() {
        assert_eq!(formatted_len("%.2147483647d", &fmt_args![-1i32]), 2_147_483_648);
        assert_eq!(formatted_len("%.2147483648d", &fmt_args![-1i32]), 13);
    }

    #[test]
    fn test_oversized_width_to_stream() {
        struct Collect(Vec<u8>);
        impl Stream for Collect {
            type Error = core::convert::Infallible;
            fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
                self.0.extend_from_slice(bytes);
                Ok(())
            }
        }
        let mut out = Collect(Vec::new());
        let n = format_to_stream(&mut out, "[%99999999999999999999d]", &fmt_args![5i32]).unwrap();
        assert_eq!(n, 24);
        assert_eq!(out.0, b"[%99999999999999999999d]");
    }

    #[test]
    fn test_scenario_string_with_interior_nul() {
        let mut buf = [0u8; 16];
        let n = format_to_buffer(&mut buf, "<%5s>", &fmt_args![&b"ab\0cd"[..]]);
        assert_eq!(&buf[..=n], b"<   ab>\0");
    }
}
