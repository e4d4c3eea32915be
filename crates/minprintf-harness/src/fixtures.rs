//! Fixture loading and management.

use std::str::FromStr;

use minprintf_core::FormatArg;
use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// JSON form of one typed format argument: `{"type":"i32","value":-5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FixtureArg {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F64(f64),
    Char(u8),
    Str(String),
    Ptr(u64),
}

impl FixtureArg {
    /// Borrow as an engine argument.
    #[must_use]
    pub fn to_format_arg(&self) -> FormatArg<'_> {
        match self {
            Self::I8(v) => FormatArg::I8(*v),
            Self::I16(v) => FormatArg::I16(*v),
            Self::I32(v) => FormatArg::I32(*v),
            Self::I64(v) => FormatArg::I64(*v),
            Self::U8(v) => FormatArg::U8(*v),
            Self::U16(v) => FormatArg::U16(*v),
            Self::U32(v) => FormatArg::U32(*v),
            Self::U64(v) => FormatArg::U64(*v),
            Self::F64(v) => FormatArg::F64(*v),
            Self::Char(v) => FormatArg::Char(*v),
            Self::Str(s) => FormatArg::Str(s.as_bytes()),
            Self::Ptr(p) => FormatArg::Ptr(*p as usize),
        }
    }
}

/// Parse the command-line form `<type>:<value>`, e.g. `i32:-5`, `s:hello`,
/// `f64:3.5`, `c:x`, `p:0x1000`.
impl FromStr for FixtureArg {
    type Err = HarnessError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| HarnessError::InvalidArgument {
            input: input.to_string(),
            reason: reason.to_string(),
        };
        let (kind, value) = input
            .split_once(':')
            .ok_or_else(|| invalid("expected <type>:<value>"))?;
        let bad_number = |_| invalid("value does not fit the type");
        let arg = match kind.to_ascii_lowercase().as_str() {
            "i8" => Self::I8(value.parse().map_err(bad_number)?),
            "i16" => Self::I16(value.parse().map_err(bad_number)?),
            "i32" | "d" => Self::I32(value.parse().map_err(bad_number)?),
            "i64" => Self::I64(value.parse().map_err(bad_number)?),
            "u8" => Self::U8(value.parse().map_err(bad_number)?),
            "u16" => Self::U16(value.parse().map_err(bad_number)?),
            "u32" | "u" => Self::U32(value.parse().map_err(bad_number)?),
            "u64" => Self::U64(value.parse().map_err(bad_number)?),
            "f64" | "f" => Self::F64(
                value
                    .parse()
                    .map_err(|_| invalid("not a floating-point number"))?,
            ),
            "c" | "char" => match value.as_bytes() {
                [b] => Self::Char(*b),
                _ => return Err(invalid("expected exactly one byte")),
            },
            "s" | "str" => Self::Str(value.to_string()),
            "p" | "ptr" => {
                let digits = value
                    .strip_prefix("0x")
                    .or_else(|| value.strip_prefix("0X"))
                    .unwrap_or(value);
                Self::Ptr(u64::from_str_radix(digits, 16).map_err(|_| invalid("expected hex address"))?)
            }
            _ => return Err(invalid("unknown argument type")),
        };
        Ok(arg)
    }
}

/// Where a case's expectation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Oracle {
    /// Captured from the host C library's `snprintf`.
    Host,
    /// Written by hand; used where the host has no equivalent behavior
    /// (pass-through of conversions the host does implement, argument
    /// mismatches).
    Literal,
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    /// C11 clause the case exercises.
    pub clause: String,
    pub format: String,
    pub args: Vec<FixtureArg>,
    /// Destination capacity in bytes, terminator included.
    pub capacity: usize,
    /// Bytes stored before the terminator.
    pub expected_output: String,
    /// Expected return value (logical length).
    pub expected_len: usize,
    pub oracle: Oracle,
}

impl FixtureCase {
    #[must_use]
    pub fn format_args(&self) -> Vec<FormatArg<'_>> {
        self.args.iter().map(FixtureArg::to_format_arg).collect()
    }
}

/// A collection of fixture cases for a function family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    /// Function family name.
    pub family: String,
    /// Integer model the expectations were captured under.
    pub int_model: String,
    /// UTC timestamp of capture.
    pub captured_at: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
