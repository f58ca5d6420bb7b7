//! Per-declaration eligibility and rewriting.
//!
//! The decision pipeline mirrors the legacy fallback rules: a declaration
//! is converted when the special ie9/ie10 case applies (pseudo-element
//! selectors and the `font` shorthand) or when it is generally eligible
//! (legacy-only targets, no statically-unconvertible function in the
//! value, no excluded property).

use log::debug;

use super::browsers::Capabilities;
use super::units;
use crate::error::Error;
use crate::options::Options;
use crate::stylesheet::css_tree::{Position, Rule};

use super::Warning;

/// Properties whose visual semantics a static px substitution would
/// corrupt. Matched as prefixes of the unprefixed property name.
const EXCLUDED_PROPERTIES: &[&str] = &[
    "background-size",
    "border-image",
    "border-radius",
    "box-shadow",
    "clip-path",
    "column",
    "grid",
    "mask",
    "object",
    "perspective",
    "scroll",
    "shape",
    "size",
    "stroke",
    "transform",
];

/// Why a declaration was left untouched. Skips are silent toward the
/// caller; they only show up in debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    /// The value does not contain the literal substring `rem`.
    NoRemToken,
    /// The immediately preceding sibling declaration has the same
    /// property name, so a fallback is assumed to exist already.
    DuplicateOfPrevious,
    /// The value contains `calc(` or a gradient function.
    IncompatibleFunction,
    /// The property is on the exclusion list.
    ExcludedProperty,
    /// Only the ie9/ie10 special case is targeted and this declaration
    /// is neither a pseudo-element nor a `font` shorthand.
    OutsideSpecialCase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Eligibility {
    Convert,
    Skip(SkipReason),
}

/// Returns the property name stripped of its vendor prefix, e.g.
/// `-moz-tab-size` becomes `tab-size`.
pub(crate) fn unprefixed(property: &str) -> &str {
    if let Some(rest) = property.strip_prefix('-') {
        if let Some(dash) = rest.find('-') {
            if dash > 0
                && rest[..dash]
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_')
            {
                return &rest[dash + 1..];
            }
        }
    }
    property
}

/// True for selectors targeting `:after`/`:before` (single or double
/// colon, any case).
pub(crate) fn is_pseudo_element(selector: &str) -> bool {
    let lower = selector.to_ascii_lowercase();
    lower.contains(":after") || lower.contains(":before")
}

pub(crate) fn is_excluded_property(unprefixed_property: &str) -> bool {
    EXCLUDED_PROPERTIES
        .iter()
        .any(|p| unprefixed_property.starts_with(p))
}

/// True for values carrying a function that a static px fallback cannot
/// represent.
pub(crate) fn has_incompatible_function(value: &str) -> bool {
    value.contains("calc(") || value.contains("gradient(")
}

/// Collapses every run of consecutive line breaks in a raw whitespace
/// string down to the run's final break token (`\n`, `\r\n` or `\r`), so
/// repeated fallback insertions do not accumulate blank lines.
pub(crate) fn reduce_line_breaks(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\r' || chars[i] == '\n' {
            let mut j = i;
            while j < chars.len() && (chars[j] == '\r' || chars[j] == '\n') {
                j += 1;
            }
            // Keep only the final break token of the run: a bare `\r`, or
            // `\n` together with the `\r`s directly preceding it.
            let last_start = if chars[j - 1] == '\n' {
                let mut k = j - 1;
                while k > i && chars[k - 1] == '\r' {
                    k -= 1;
                }
                k
            } else {
                j - 1
            };
            out.extend(&chars[last_start..j]);
            i = j;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

pub(crate) fn classify_declaration(
    property: &str,
    value: &str,
    previous_property: Option<&str>,
    is_pseudo: bool,
    caps: Capabilities,
) -> Eligibility {
    if !value.contains("rem") {
        return Eligibility::Skip(SkipReason::NoRemToken);
    }
    if previous_property == Some(property) {
        return Eligibility::Skip(SkipReason::DuplicateOfPrevious);
    }

    let prop = unprefixed(property);
    let is_font_shorthand = prop == "font";
    let special_case_match = caps.special && (is_pseudo || is_font_shorthand);

    let incompatible_function = has_incompatible_function(value);
    let excluded_property = is_excluded_property(prop);
    let generally_eligible =
        (caps.legacy || !caps.special) && !incompatible_function && !excluded_property;

    if special_case_match || generally_eligible {
        Eligibility::Convert
    } else if incompatible_function {
        Eligibility::Skip(SkipReason::IncompatibleFunction)
    } else if excluded_property {
        Eligibility::Skip(SkipReason::ExcludedProperty)
    } else {
        Eligibility::Skip(SkipReason::OutsideSpecialCase)
    }
}

/// The root pixel value, resolved at most once per run. Resolution is
/// deferred to the first conversion so the fatal invalid-root-size error
/// can name the declaration that needed it.
pub(crate) struct LazyRootPx {
    expression: String,
    cached: Option<f64>,
}

impl LazyRootPx {
    pub(crate) fn new(expression: String) -> Self {
        LazyRootPx {
            expression,
            cached: None,
        }
    }

    pub(crate) fn get(
        &mut self,
        at: Position,
        warnings: &mut Vec<Warning>,
    ) -> Result<f64, Error> {
        if let Some(px) = self.cached {
            return Ok(px);
        }
        let mut unsupported = false;
        let px = units::to_px(&self.expression, || unsupported = true).ok_or_else(|| {
            Error::InvalidRootSize {
                root: self.expression.clone(),
                line: at.line,
                column: at.column,
            }
        })?;
        if unsupported {
            warnings.push(Warning::unsupported_root_unit());
        }
        debug!("root font-size {:?} resolved to {px}px", self.expression);
        self.cached = Some(px);
        Ok(px)
    }
}

/// Applies the conversion policy to every declaration of one rule,
/// inserting or overwriting fallbacks in place.
pub(crate) fn rewrite_declarations(
    rule: &mut Rule,
    caps: Capabilities,
    options: &Options,
    root: &mut LazyRootPx,
    warnings: &mut Vec<Warning>,
) -> Result<(), Error> {
    let is_pseudo = rule.selector().map(is_pseudo_element).unwrap_or(false);
    let mut i = 0;
    while i < rule.declarations.len() {
        let eligibility = {
            let previous = i
                .checked_sub(1)
                .map(|j| rule.declarations[j].property.as_str());
            let decl = &rule.declarations[i];
            classify_declaration(&decl.property, &decl.value, previous, is_pseudo, caps)
        };
        match eligibility {
            Eligibility::Skip(reason) => {
                if reason != SkipReason::NoRemToken {
                    debug!(
                        "skipping {} at {}:{} ({reason:?})",
                        rule.declarations[i].property,
                        rule.declarations[i].position.line,
                        rule.declarations[i].position.column,
                    );
                }
                i += 1;
            }
            Eligibility::Convert => {
                let position = rule.declarations[i].position;
                let root_px = root.get(position, warnings)?;
                let converted =
                    units::convert_rem_value(&rule.declarations[i].value, root_px, options.unit_precision);
                if options.replace {
                    rule.declarations[i].value = converted;
                    i += 1;
                } else {
                    let mut fallback = rule.declarations[i].clone();
                    fallback.value = converted;
                    let reduced = reduce_line_breaks(&rule.declarations[i].raws.before);
                    rule.declarations[i].raws.before = reduced;
                    rule.declarations.insert(i, fallback);
                    i += 2;
                }
            }
        }
    }
    Ok(())
}
