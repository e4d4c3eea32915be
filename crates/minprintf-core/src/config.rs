//! Formatter configuration.
//!
//! The only runtime knob is the platform integer model, which fixes how many
//! bits the `l`, `z`, `t` and `j` length modifiers select. Floating-point
//! support is a compile-time choice (the `float` cargo feature).

/// Platform integer model: the widths of `long`, `size_t`, `ptrdiff_t` and
/// `intmax_t` as seen by the C calling convention being emulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntModel {
    /// 32-bit `int`, `long` and pointers (Cortex-M, RISC-V 32, i686).
    Ilp32,
    /// 64-bit `long` and pointers (Linux/macOS on 64-bit targets).
    Lp64,
    /// 32-bit `long`, 64-bit pointers (64-bit Windows).
    Llp64,
}

impl IntModel {
    /// The model of the target this crate is compiled for.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            if cfg!(target_os = "windows") {
                Self::Llp64
            } else {
                Self::Lp64
            }
        } else {
            Self::Ilp32
        }
    }

    /// Parse from string (case-insensitive). Unknown names map to the native model.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ilp32") || s == "32" || s.eq_ignore_ascii_case("embedded") {
            Self::Ilp32
        } else if s.eq_ignore_ascii_case("lp64") || s == "64" || s.eq_ignore_ascii_case("unix") {
            Self::Lp64
        } else if s.eq_ignore_ascii_case("llp64") || s.eq_ignore_ascii_case("windows") {
            Self::Llp64
        } else {
            Self::native()
        }
    }

    /// Stable lowercase name, the inverse of [`IntModel::from_str_loose`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ilp32 => "ilp32",
            Self::Lp64 => "lp64",
            Self::Llp64 => "llp64",
        }
    }

    /// Bits of `long` / `unsigned long`.
    #[must_use]
    pub const fn long_bits(self) -> u32 {
        match self {
            Self::Lp64 => 64,
            Self::Ilp32 | Self::Llp64 => 32,
        }
    }

    /// Bits of `size_t` / `ssize_t`.
    #[must_use]
    pub const fn size_bits(self) -> u32 {
        match self {
            Self::Ilp32 => 32,
            Self::Lp64 | Self::Llp64 => 64,
        }
    }

    /// Bits of `ptrdiff_t`; same as the pointer width on every supported model.
    #[must_use]
    pub const fn ptrdiff_bits(self) -> u32 {
        self.size_bits()
    }

    /// Bits of `intmax_t` / `uintmax_t`.
    #[must_use]
    pub const fn intmax_bits(self) -> u32 {
        64
    }
}

impl Default for IntModel {
    fn default() -> Self {
        Self::native()
    }
}

/// Per-call formatter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatConfig {
    pub int_model: IntModel,
}

impl FormatConfig {
    #[must_use]
    pub const fn new(int_model: IntModel) -> Self {
        Self { int_model }
    }

    /// Configuration matching the compilation target.
    #[must_use]
    pub const fn native() -> Self {
        Self::new(IntModel::native())
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::native()
    }
}
