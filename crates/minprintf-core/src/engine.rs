//! Formatting driver: parser segments in, sink writes out.
//!
//! Each directive first draws every argument it needs (`*` width, `.*`
//! precision, then the value). If one is missing or of the wrong kind the
//! directive's raw text is written instead; arguments already drawn stay
//! consumed, including the incompatible one. Nothing is written for a
//! directive until all of its arguments have been validated.

use crate::args::{FormatArg, IntClass};
use crate::config::FormatConfig;
use crate::parser::{Conversion, Directive, Precision, Segment, Segments, Width};
use crate::render::{self, Field, Radix};
use crate::sink::Sink;

/// A directive's arguments did not line up with the argument slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mismatch;

/// Sequential reader over the typed argument slice.
struct ArgCursor<'s, 'a> {
    args: &'s [FormatArg<'a>],
    next: usize,
}

impl<'s, 'a> ArgCursor<'s, 'a> {
    fn new(args: &'s [FormatArg<'a>]) -> Self {
        Self { args, next: 0 }
    }

    fn take(&mut self) -> Result<FormatArg<'a>, Mismatch> {
        let arg = self.args.get(self.next).copied().ok_or(Mismatch)?;
        self.next += 1;
        Ok(arg)
    }

    fn take_c_int(&mut self) -> Result<i32, Mismatch> {
        self.take()?.as_c_int().ok_or(Mismatch)
    }
}

/// Format `format` with `args` into `sink`.
pub(crate) fn run<S: Sink>(sink: &mut S, format: &[u8], args: &[FormatArg<'_>], config: &FormatConfig) {
    let mut cursor = ArgCursor::new(args);
    for segment in Segments::new(format) {
        match segment {
            Segment::Literal(text) => sink.write_bytes(text),
            Segment::Percent => sink.write_bytes(b"%"),
            Segment::Directive(directive) => {
                if convert(sink, &directive, &mut cursor, config).is_err() {
                    sink.write_bytes(directive.raw);
                }
            }
        }
    }
}

fn resolve_field(directive: &Directive<'_>, cursor: &mut ArgCursor<'_, '_>) -> Result<Field, Mismatch> {
    let mut flags = directive.flags;
    let width = match directive.width {
        Width::None => 0,
        Width::Fixed(w) => w,
        Width::FromArg => {
            let w = cursor.take_c_int()?;
            // A negative '*' width is a '-' flag plus a positive width.
            if w < 0 {
                flags.left_justify = true;
                flags.zero_pad = false;
            }
            w.unsigned_abs() as usize
        }
    };
    let precision = match directive.precision {
        Precision::None => None,
        Precision::Fixed(p) => Some(p),
        Precision::FromArg => {
            let p = cursor.take_c_int()?;
            // A negative '.*' precision is taken as if omitted.
            usize::try_from(p).ok()
        }
    };
    Ok(Field {
        flags,
        width,
        precision,
    })
}

fn convert<S: Sink>(
    sink: &mut S,
    directive: &Directive<'_>,
    cursor: &mut ArgCursor<'_, '_>,
    config: &FormatConfig,
) -> Result<(), Mismatch> {
    let field = resolve_field(directive, cursor)?;
    let conversion = directive.conversion;

    if conversion == Conversion::Percent {
        sink.write_bytes(b"%");
        return Ok(());
    }

    let arg = cursor.take()?;
    match conversion {
        Conversion::Signed | Conversion::Unsigned | Conversion::Octal | Conversion::Hex { .. } => {
            let raw = arg.promoted_bits().ok_or(Mismatch)?;
            let class = IntClass::derive(directive.length, conversion, config.int_model);
            match conversion {
                Conversion::Signed => render::render_signed(sink, class.narrow_signed(raw), &field),
                Conversion::Octal => {
                    render::render_unsigned(sink, class.narrow_unsigned(raw), Radix::Octal, &field);
                }
                Conversion::Hex { upper } => {
                    render::render_unsigned(
                        sink,
                        class.narrow_unsigned(raw),
                        Radix::Hex { upper },
                        &field,
                    );
                }
                _ => render::render_unsigned(sink, class.narrow_unsigned(raw), Radix::Decimal, &field),
            }
        }
        #[cfg(feature = "float")]
        Conversion::Float { upper } => match arg {
            FormatArg::F64(value) => crate::float::render_float(sink, value, upper, &field),
            _ => return Err(Mismatch),
        },
        #[cfg(not(feature = "float"))]
        Conversion::Float { .. } => return Err(Mismatch),
        Conversion::Char => {
            let byte = match arg {
                FormatArg::Char(c) => c,
                other => other.promoted_bits().ok_or(Mismatch)? as u8,
            };
            render::render_char(sink, byte, &field);
        }
        Conversion::Str => match arg {
            FormatArg::Str(s) => render::render_str(sink, s, &field),
            _ => return Err(Mismatch),
        },
        Conversion::Pointer => {
            let addr = match arg {
                FormatArg::Ptr(p) => p,
                other => other.promoted_bits().ok_or(Mismatch)? as usize,
            };
            render::render_pointer(sink, addr, &field);
        }
        Conversion::Percent => sink.write_bytes(b"%"),
    }
    Ok(())
}
