//! Shared workloads for the formatting benchmarks.

use std::ffi::CStr;

use minprintf_core::FormatArg;

/// The single argument of a workload, in the type the host `snprintf` expects.
#[derive(Debug, Clone, Copy)]
pub enum HostArg {
    Int(i32),
    LongLong(i64),
    Double(f64),
    Str(&'static CStr),
}

/// One benchmark workload: a format with one argument.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    pub name: &'static str,
    pub format: &'static CStr,
    pub host: HostArg,
}

impl Workload {
    /// The argument as the engine takes it.
    #[must_use]
    pub fn engine_arg(&self) -> FormatArg<'static> {
        match self.host {
            HostArg::Int(v) => FormatArg::I32(v),
            HostArg::LongLong(v) => FormatArg::I64(v),
            HostArg::Double(v) => FormatArg::F64(v),
            HostArg::Str(s) => FormatArg::Str(s.to_bytes()),
        }
    }

    #[must_use]
    pub fn format_bytes(&self) -> &'static [u8] {
        self.format.to_bytes()
    }
}

pub const WORKLOADS: &[Workload] = &[
    Workload {
        name: "int",
        format: c"d: %d\r\n",
        host: HostArg::Int(i32::MIN),
    },
    Workload {
        name: "hex_padded",
        format: c"x: %#010x\r\n",
        host: HostArg::Int(0xBEEF),
    },
    Workload {
        name: "long_long",
        format: c"lld: %lld\r\n",
        host: HostArg::LongLong(i64::MIN),
    },
    Workload {
        name: "string",
        format: c"[%-24.12s]",
        host: HostArg::Str(c"allocation-free formatting"),
    },
    Workload {
        name: "float",
        format: c"f: %f\r\n",
        host: HostArg::Double(-3.14159265359),
    },
    Workload {
        name: "float_large",
        format: c"%.3f",
        host: HostArg::Double(1.0e300),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workloads_format_cleanly() {
        let mut buf = [0u8; 512];
        for w in WORKLOADS {
            let n = minprintf_core::format_to_buffer(&mut buf, w.format_bytes(), &[w.engine_arg()]);
            assert!(n > 0 && n < buf.len(), "{}", w.name);
            assert!(!buf[..n].contains(&b'%'), "{} left a directive unformatted", w.name);
        }
    }
}
