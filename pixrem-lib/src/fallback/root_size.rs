//! Root font-size detection from the stylesheet itself.

use log::debug;

use crate::stylesheet::css_tree::Stylesheet;

/// Units accepted in a `font` shorthand size token, tried in order at
/// each scan position.
const FONT_SIZE_UNITS: &[&str] = &["em", "px", "rem", "%", "pt", "pc"];

/// Scans top-level `html` / `:root` rules for an authoritative root
/// font-size expression, starting from `default` and letting later
/// matches overwrite earlier ones. Rules nested inside at-rules are never
/// consulted, and the selector must match exactly (`:root a` or
/// `html, body` do not count).
pub fn resolve_root_size(stylesheet: &Stylesheet, default: String) -> String {
    let mut root = default;
    for rule in &stylesheet.rules {
        let selector = match rule.selector() {
            Some(s) => s.trim(),
            None => continue,
        };
        if selector != "html" && selector != ":root" {
            continue;
        }
        for decl in &rule.declarations {
            if decl.property == "font-size" {
                debug!("root font-size from {selector:?}: {:?}", decl.value);
                root = decl.value.clone();
            } else if decl.property == "font" && decl.value.bytes().any(|b| b.is_ascii_digit()) {
                if let Some(token) = first_size_token(&decl.value) {
                    debug!("root font-size from {selector:?} font shorthand: {token:?}");
                    root = token;
                }
            }
        }
    }
    root
}

/// Extracts the first `<number><unit>` token from a `font` shorthand,
/// e.g. `"italic 100 20px/24px sans-serif"` yields `"20px"`.
fn first_size_token(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    for (start, _) in value.char_indices() {
        let mut i = start;
        while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
            i += 1;
        }
        for unit in FONT_SIZE_UNITS {
            if value[i..].starts_with(unit) {
                return Some(value[start..i + unit.len()].to_string());
            }
        }
    }
    None
}
