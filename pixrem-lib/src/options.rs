//! Processing options.

/// Configuration for one fallback pass. All fields are optional from the
/// caller's point of view: `Options::default()` carries the defaults and
/// struct-update syntax overrides individual fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Root font-size expression used to convert rem values, e.g. `"16"`,
    /// `"20px"`, `"62.5%"`. Overridden by stylesheet detection when
    /// `html` is true.
    pub root_value: String,
    /// Overwrite rem values in place instead of inserting a fallback
    /// declaration before them.
    pub replace: bool,
    /// Also convert declarations inside at-rules (one nesting level).
    pub atrules: bool,
    /// Detect the root font-size from top-level `html` / `:root` rules.
    pub html: bool,
    /// Decimal digits kept when rounding converted pixel values.
    pub unit_precision: i32,
    /// Target browsers, browserslist-style, e.g. `"ie <= 8"` or
    /// `"ie 9, ie 10"`.
    pub browsers: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            root_value: "16".to_string(),
            replace: false,
            atrules: false,
            html: true,
            unit_precision: 3,
            browsers: "ie <= 8".to_string(),
        }
    }
}
