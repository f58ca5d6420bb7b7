//! One-shot string-to-string processing.

use crate::error::Error;
use crate::fallback::{self, Warning};
use crate::options::Options;
use crate::parser::css;

/// The outcome of a successful run: the serialized stylesheet and any
/// warnings produced while transforming it.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub css: String,
    pub warnings: Vec<Warning>,
}

/// Parses `css`, runs the fallback pass and serializes the result.
///
/// # Arguments
///
/// * `css` - The stylesheet source text.
/// * `options` - Processing options; `Options::default()` matches the
///   historical defaults (`ie <= 8` targets, insert mode, html root
///   detection, precision 3).
pub fn process(css: &str, options: &Options) -> Result<Processed, Error> {
    let mut stylesheet = css::parse(css)?;
    let warnings = fallback::run(&mut stylesheet, options)?;
    Ok(Processed {
        css: stylesheet.to_css(),
        warnings,
    })
}
