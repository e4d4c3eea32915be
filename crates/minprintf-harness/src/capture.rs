//! Host libc fixture capture.
//!
//! Runs the compliance matrix against the host C library's `snprintf` and
//! records buffer contents and return values as fixtures. Cases the host
//! cannot serve as an oracle for (conversions this engine passes through
//! but glibc implements, argument mismatches) carry a literal expectation
//! instead.

use minprintf_core::IntModel;

use crate::error::HarnessError;
use crate::fixtures::{FixtureArg, FixtureCase, FixtureSet, Oracle};

pub const FIXTURE_VERSION: &str = "v1";
pub const PRINTF_FAMILY: &str = "stdio/snprintf";

/// Capacity used for cases that are not about truncation.
pub const ROOMY_CAPACITY: usize = 128;

/// Which capacities a template expands into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPlan {
    /// One case at [`ROOMY_CAPACITY`].
    Roomy,
    /// Four cases: 0, n-2, n-1 and n, where n is the exact-fit capacity.
    Regimes,
}

/// A matrix row before its expectation is known.
#[derive(Debug, Clone)]
pub struct CaseTemplate {
    pub name: String,
    pub clause: String,
    pub format: String,
    pub args: Vec<FixtureArg>,
    pub plan: CapacityPlan,
    /// Full untruncated output, for cases without a host oracle.
    pub literal: Option<String>,
}

impl CaseTemplate {
    fn host(name: &str, clause: &str, format: &str, args: Vec<FixtureArg>) -> Self {
        Self {
            name: name.to_string(),
            clause: clause.to_string(),
            format: format.to_string(),
            args,
            plan: CapacityPlan::Roomy,
            literal: None,
        }
    }

    fn literal(name: &str, clause: &str, format: &str, args: Vec<FixtureArg>, output: &str) -> Self {
        Self {
            literal: Some(output.to_string()),
            ..Self::host(name, clause, format, args)
        }
    }

    fn regimes(mut self) -> Self {
        self.plan = CapacityPlan::Regimes;
        self
    }
}

/// Argument of C type `long` under `model`.
fn long_arg(model: IntModel, value: i64) -> FixtureArg {
    if model.long_bits() == 64 {
        FixtureArg::I64(value)
    } else {
        FixtureArg::I32(value as i32)
    }
}

fn ulong_arg(model: IntModel, value: u64) -> FixtureArg {
    if model.long_bits() == 64 {
        FixtureArg::U64(value)
    } else {
        FixtureArg::U32(value as u32)
    }
}

/// Argument of C type `size_t`/`ptrdiff_t` under `model`.
fn size_arg(model: IntModel, value: i64) -> FixtureArg {
    if model.size_bits() == 64 {
        FixtureArg::I64(value)
    } else {
        FixtureArg::I32(value as i32)
    }
}

fn usize_arg(model: IntModel, value: u64) -> FixtureArg {
    if model.size_bits() == 64 {
        FixtureArg::U64(value)
    } else {
        FixtureArg::U32(value as u32)
    }
}

fn signed_max(bits: u32) -> i64 {
    i64::MAX >> (64 - bits)
}

fn unsigned_max(bits: u32) -> u64 {
    u64::MAX >> (64 - bits)
}

/// The compliance matrix for `model`: every length modifier at the extremes
/// of its width, fixed-notation floats, `%%`, pass-through and the four
/// truncation regimes.
#[must_use]
pub fn compliance_matrix(model: IntModel) -> Vec<CaseTemplate> {
    const P7: &str = "C11 7.21.6.1p7";
    const P8: &str = "C11 7.21.6.1p8";
    const P9: &str = "C11 7.21.6.1p9";
    const SNPRINTF: &str = "C11 7.21.6.5p3";

    let long_bits = model.long_bits();
    let size_bits = model.size_bits();
    let mut m = Vec::new();

    // Signed extremes.
    m.push(CaseTemplate::host("hhd_min", P7, "hhd: %hhd\r\n", vec![FixtureArg::I32(i32::from(i8::MIN))]));
    m.push(CaseTemplate::host("hhd_max", P7, "hhd: %hhd\r\n", vec![FixtureArg::I32(i32::from(i8::MAX))]));
    m.push(CaseTemplate::host("hd_min", P7, "hd: %hd\r\n", vec![FixtureArg::I32(i32::from(i16::MIN))]));
    m.push(CaseTemplate::host("hd_max", P7, "hd: %hd\r\n", vec![FixtureArg::I32(i32::from(i16::MAX))]));
    m.push(CaseTemplate::host("d_min", P8, "d: %d\r\n", vec![FixtureArg::I32(i32::MIN)]));
    m.push(CaseTemplate::host("d_max", P8, "d: %d\r\n", vec![FixtureArg::I32(i32::MAX)]));
    m.push(CaseTemplate::host("ld_min", P7, "ld: %ld\r\n", vec![long_arg(model, -signed_max(long_bits) - 1)]));
    m.push(CaseTemplate::host("ld_max", P7, "ld: %ld\r\n", vec![long_arg(model, signed_max(long_bits))]));
    m.push(CaseTemplate::host("lld_min", P7, "lld: %lld\r\n", vec![FixtureArg::I64(i64::MIN)]));
    m.push(CaseTemplate::host("lld_max", P7, "lld: %lld\r\n", vec![FixtureArg::I64(i64::MAX)]));
    m.push(CaseTemplate::host("jd_min", P7, "jd: %jd\r\n", vec![FixtureArg::I64(i64::from(i32::MIN))]));
    m.push(CaseTemplate::host("jd_max", P7, "jd: %jd\r\n", vec![FixtureArg::I64(i64::from(i32::MAX))]));
    m.push(CaseTemplate::host("zd_min", P7, "zd: %zd\r\n", vec![size_arg(model, i64::from(i32::MIN))]));
    m.push(CaseTemplate::host("zd_max", P7, "zd: %zd\r\n", vec![size_arg(model, i64::from(i32::MAX))]));
    m.push(CaseTemplate::host("td_min", P7, "td: %td\r\n", vec![size_arg(model, -signed_max(size_bits) - 1)]));
    m.push(CaseTemplate::host("td_max", P7, "td: %td\r\n", vec![size_arg(model, signed_max(size_bits))]));

    // Unsigned and hexadecimal extremes.
    let unsigned_rows: [(&str, &str, FixtureArg); 8] = [
        ("hh", "hh", FixtureArg::U32(u32::from(u8::MAX))),
        ("h", "h", FixtureArg::U32(u32::from(u16::MAX))),
        ("", "", FixtureArg::U32(u32::MAX)),
        ("l", "l", ulong_arg(model, unsigned_max(long_bits))),
        ("ll", "ll", FixtureArg::U64(u64::MAX)),
        ("j", "j", FixtureArg::U64(u64::MAX)),
        ("z", "z", usize_arg(model, unsigned_max(size_bits))),
        ("t", "t", usize_arg(model, unsigned_max(size_bits))),
    ];
    for (tag, length, max) in unsigned_rows {
        let zero = match max {
            FixtureArg::U64(_) => FixtureArg::U64(0),
            _ => FixtureArg::U32(0),
        };
        for letter in ["u", "X"] {
            let format = format!("{tag}{letter}: %{length}{letter}\r\n");
            let base = format!("{tag}{}", letter.to_ascii_lowercase());
            m.push(CaseTemplate::host(&format!("{base}_zero"), P8, &format, vec![zero.clone()]));
            m.push(CaseTemplate::host(&format!("{base}_max"), P8, &format, vec![max.clone()]));
        }
    }
    m.push(CaseTemplate::host("x_letters", P8, "x: %x\r\n", vec![FixtureArg::I32(11_259_375)]));

    // Fixed notation.
    let pi = 3.14159265359_f64;
    for (name, value) in [
        ("f_3_0089", 3.0089),
        ("f_7", 7.0),
        ("f_neg_pi", -pi),
        ("f_zero", 0.0),
        ("f_pi", pi),
    ] {
        m.push(CaseTemplate::host(name, P8, "f: %f\r\n", vec![FixtureArg::F64(value)]));
    }

    // Escapes and pass-through.
    m.push(CaseTemplate::host("percent", P8, "%% \r\n", vec![]));
    m.push(CaseTemplate::literal("unsupported_a", P9, "%a \r\n", vec![FixtureArg::I32(5)], "%a \r\n"));
    m.push(CaseTemplate::literal(
        "missing_arg",
        P9,
        "a=%d b=%d",
        vec![FixtureArg::I32(1)],
        "a=1 b=%d",
    ));

    // Truncation regimes.
    m.push(CaseTemplate::host("trunc_d", SNPRINTF, "d: %d", vec![FixtureArg::I32(-1024)]).regimes());
    m.push(CaseTemplate::host("trunc_ld", SNPRINTF, "ld: %ld", vec![long_arg(model, -1_048_576)]).regimes());
    m.push(
        CaseTemplate::host("trunc_lld", SNPRINTF, "lld: %lld", vec![FixtureArg::I64(-1_099_511_627_776)])
            .regimes(),
    );
    m.push(CaseTemplate::host("trunc_u", SNPRINTF, "u: %u", vec![FixtureArg::U32(1024)]).regimes());
    m.push(CaseTemplate::host("trunc_lu", SNPRINTF, "lu: %lu", vec![ulong_arg(model, 1_048_576)]).regimes());
    m.push(
        CaseTemplate::host("trunc_llu", SNPRINTF, "llu: %llu", vec![FixtureArg::U64(1_099_511_627_776)])
            .regimes(),
    );
    m.push(CaseTemplate::host("trunc_x", SNPRINTF, "x: 0x%x", vec![FixtureArg::U32(0x400)]).regimes());
    m.push(CaseTemplate::host("trunc_lx", SNPRINTF, "lx: 0x%lx", vec![ulong_arg(model, 0x10_0000)]).regimes());
    m.push(
        CaseTemplate::host("trunc_llx", SNPRINTF, "llx: 0x%llx", vec![FixtureArg::U64(0x100_0000_0000)])
            .regimes(),
    );
    m.push(
        CaseTemplate::literal("trunc_unsupported", SNPRINTF, "%a \r\n", vec![FixtureArg::I32(5)], "%a \r\n")
            .regimes(),
    );
    m
}

/// Source of untruncated output for a template.
pub trait SnprintfOracle {
    /// Format `format` with `args` into a destination of `capacity` bytes,
    /// returning the stored bytes (before the terminator) and the return value.
    fn snprintf(
        &self,
        case: &str,
        format: &str,
        args: &[FixtureArg],
        capacity: usize,
    ) -> Result<(Vec<u8>, usize), HarnessError>;
}

/// Capture every template in `templates` into a fixture set.
pub fn capture_set<O: SnprintfOracle + ?Sized>(
    oracle: &O,
    model: IntModel,
    templates: &[CaseTemplate],
    captured_at: &str,
) -> Result<FixtureSet, HarnessError> {
    let mut cases = Vec::new();
    for template in templates {
        let (full_len, source) = match &template.literal {
            Some(text) => (text.len(), Oracle::Literal),
            None => {
                let (_, len) = oracle.snprintf(&template.name, &template.format, &template.args, 0)?;
                (len, Oracle::Host)
            }
        };
        let capacities = match template.plan {
            CapacityPlan::Roomy => vec![ROOMY_CAPACITY.max(full_len + 1)],
            CapacityPlan::Regimes => {
                let n = full_len + 1;
                vec![0, n.saturating_sub(2), n - 1, n]
            }
        };
        for capacity in capacities {
            let (stored, len) = match &template.literal {
                Some(text) => {
                    let stored = text.as_bytes()[..text.len().min(capacity.saturating_sub(1))].to_vec();
                    (stored, text.len())
                }
                None => oracle.snprintf(&template.name, &template.format, &template.args, capacity)?,
            };
            let name = match template.plan {
                CapacityPlan::Roomy => template.name.clone(),
                CapacityPlan::Regimes => format!("{}@{capacity}", template.name),
            };
            cases.push(FixtureCase {
                name,
                clause: template.clause.clone(),
                format: template.format.clone(),
                args: template.args.clone(),
                capacity,
                expected_output: String::from_utf8_lossy(&stored).into_owned(),
                expected_len: len,
                oracle: source,
            });
        }
    }
    Ok(FixtureSet {
        version: FIXTURE_VERSION.to_string(),
        family: PRINTF_FAMILY.to_string(),
        int_model: model.name().to_string(),
        captured_at: captured_at.to_string(),
        cases,
    })
}

/// The host C library as an oracle. Only valid for the native integer model.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostLibc;

#[cfg(unix)]
impl SnprintfOracle for HostLibc {
    fn snprintf(
        &self,
        case: &str,
        format: &str,
        args: &[FixtureArg],
        capacity: usize,
    ) -> Result<(Vec<u8>, usize), HarnessError> {
        host::snprintf(case, format, args, capacity)
    }
}

#[cfg(not(unix))]
impl SnprintfOracle for HostLibc {
    fn snprintf(
        &self,
        case: &str,
        _format: &str,
        _args: &[FixtureArg],
        _capacity: usize,
    ) -> Result<(Vec<u8>, usize), HarnessError> {
        Err(HarnessError::UnsupportedCapture {
            case: case.to_string(),
            reason: "host snprintf capture needs a Unix C library".to_string(),
        })
    }
}

#[cfg(unix)]
#[allow(unsafe_code)]
mod host {
    use std::ffi::{CString, c_char, c_int, c_longlong, c_uint, c_ulonglong, c_void};

    use crate::error::HarnessError;
    use crate::fixtures::FixtureArg;

    pub(super) fn snprintf(
        case: &str,
        format: &str,
        args: &[FixtureArg],
        capacity: usize,
    ) -> Result<(Vec<u8>, usize), HarnessError> {
        let unsupported = |reason: &str| HarnessError::UnsupportedCapture {
            case: case.to_string(),
            reason: reason.to_string(),
        };
        let fmt = CString::new(format).map_err(|_| unsupported("format contains NUL"))?;
        if args.len() > 1 {
            return Err(unsupported("host capture takes at most one argument"));
        }
        // Keep a string argument alive across the call.
        let text = match args.first() {
            Some(FixtureArg::Str(s)) => {
                Some(CString::new(s.as_str()).map_err(|_| unsupported("string contains NUL"))?)
            }
            _ => None,
        };

        let mut buf = vec![0u8; capacity.max(1)];
        let out = buf.as_mut_ptr().cast::<c_char>();
        let f = fmt.as_ptr();
        // SAFETY: `out` is valid for `capacity` bytes, `f` is NUL-terminated,
        // and each argument is passed as the type C default promotion gives it.
        let ret = unsafe {
            match args.first() {
                None => libc::snprintf(out, capacity, f),
                Some(FixtureArg::I8(v)) => libc::snprintf(out, capacity, f, c_int::from(*v)),
                Some(FixtureArg::I16(v)) => libc::snprintf(out, capacity, f, c_int::from(*v)),
                Some(FixtureArg::I32(v)) => libc::snprintf(out, capacity, f, *v as c_int),
                Some(FixtureArg::I64(v)) => libc::snprintf(out, capacity, f, *v as c_longlong),
                Some(FixtureArg::U8(v)) => libc::snprintf(out, capacity, f, c_uint::from(*v)),
                Some(FixtureArg::U16(v)) => libc::snprintf(out, capacity, f, c_uint::from(*v)),
                Some(FixtureArg::U32(v)) => libc::snprintf(out, capacity, f, *v as c_uint),
                Some(FixtureArg::U64(v)) => libc::snprintf(out, capacity, f, *v as c_ulonglong),
                Some(FixtureArg::F64(v)) => libc::snprintf(out, capacity, f, *v),
                Some(FixtureArg::Char(v)) => libc::snprintf(out, capacity, f, c_int::from(*v)),
                Some(FixtureArg::Str(_)) => {
                    let ptr = text.as_ref().map_or(std::ptr::null(), |t| t.as_ptr());
                    libc::snprintf(out, capacity, f, ptr)
                }
                Some(FixtureArg::Ptr(p)) => {
                    libc::snprintf(out, capacity, f, *p as usize as *const c_void)
                }
            }
        };
        let len = usize::try_from(ret).map_err(|_| unsupported("host snprintf reported an error"))?;
        let stored = len.min(capacity.saturating_sub(1));
        buf.truncate(stored);
        Ok((buf, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Oracle backed by the engine itself, for platform-independent tests.
    struct EngineOracle(IntModel);

    impl SnprintfOracle for EngineOracle {
        fn snprintf(
            &self,
            _case: &str,
            format: &str,
            args: &[FixtureArg],
            capacity: usize,
        ) -> Result<(Vec<u8>, usize), HarnessError> {
            let args: Vec<_> = args.iter().map(FixtureArg::to_format_arg).collect();
            let mut buf = vec![0u8; capacity];
            let n = minprintf_core::Printf::with_int_model(self.0).format_to_buffer(&mut buf, format, &args);
            buf.truncate(n.min(capacity.saturating_sub(1)));
            Ok((buf, n))
        }
    }

    #[test]
    fn matrix_covers_every_length_modifier() {
        let matrix = compliance_matrix(IntModel::Ilp32);
        for tag in ["hhd", "hd", "d", "ld", "lld", "jd", "zd", "td"] {
            assert!(matrix.iter().any(|t| t.name == format!("{tag}_min")), "{tag}");
        }
        for tag in ["hhu", "hu", "u", "lu", "llu", "ju", "zu", "tu", "hhx", "llx", "tx"] {
            assert!(matrix.iter().any(|t| t.name == format!("{tag}_max")), "{tag}");
        }
        assert_eq!(matrix.iter().filter(|t| t.plan == CapacityPlan::Regimes).count(), 10);
    }

    #[test]
    fn ilp32_matrix_uses_32_bit_long() {
        let matrix = compliance_matrix(IntModel::Ilp32);
        let ld = matrix.iter().find(|t| t.name == "ld_min").unwrap();
        assert_eq!(ld.args, vec![FixtureArg::I32(i32::MIN)]);
        let lp64 = compliance_matrix(IntModel::Lp64);
        let ld = lp64.iter().find(|t| t.name == "ld_min").unwrap();
        assert_eq!(ld.args, vec![FixtureArg::I64(i64::MIN)]);
    }

    #[test]
    fn regimes_expand_to_four_capacities() {
        let templates = vec![
            CaseTemplate::host("trunc_d", "x", "d: %d", vec![FixtureArg::I32(-1024)]).regimes(),
        ];
        let set = capture_set(&EngineOracle(IntModel::Lp64), IntModel::Lp64, &templates, "t").unwrap();
        let caps: Vec<usize> = set.cases.iter().map(|c| c.capacity).collect();
        assert_eq!(caps, vec![0, 7, 8, 9]);
        assert!(set.cases.iter().all(|c| c.expected_len == 8));
        assert_eq!(set.cases[0].expected_output, "");
        assert_eq!(set.cases[1].expected_output, "d: -10");
        assert_eq!(set.cases[3].expected_output, "d: -1024");
        assert_eq!(set.cases[1].name, "trunc_d@7");
    }

    #[test]
    fn literal_cases_do_not_consult_the_oracle() {
        struct Refuse;
        impl SnprintfOracle for Refuse {
            fn snprintf(
                &self,
                case: &str,
                _: &str,
                _: &[FixtureArg],
                _: usize,
            ) -> Result<(Vec<u8>, usize), HarnessError> {
                Err(HarnessError::UnsupportedCapture {
                    case: case.to_string(),
                    reason: "refused".to_string(),
                })
            }
        }
        let templates = vec![
            CaseTemplate::literal("a", "x", "%a \r\n", vec![FixtureArg::I32(5)], "%a \r\n").regimes(),
        ];
        let set = capture_set(&Refuse, IntModel::Lp64, &templates, "t").unwrap();
        assert_eq!(set.cases.len(), 4);
        assert!(set.cases.iter().all(|c| c.oracle == Oracle::Literal && c.expected_len == 5));
        assert_eq!(set.cases[1].expected_output, "%a ");
    }
}
