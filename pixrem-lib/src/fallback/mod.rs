//! The rem-to-px fallback pass.
//!
//! `run` wires the capability classifier, the root-size resolver and the
//! declaration rewriter over one parsed stylesheet, mutating it in place
//! and returning the warnings produced along the way.

pub mod browsers;
pub mod calc;
pub mod root_size;
pub mod units;

mod rewrite;

use log::debug;

use crate::error::Error;
use crate::options::Options;
use crate::stylesheet::css_tree::{Rule, Stylesheet};
pub use browsers::{resolve_browser_spec, BrowserVersion, Capabilities};

/// Identifier attached to every warning this pass produces.
pub const PLUGIN_NAME: &str = "pixrem";

/// A non-fatal condition reported alongside the mutated stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub plugin: &'static str,
}

impl Warning {
    pub(crate) fn unsupported_root_unit() -> Self {
        Warning {
            message: "Unit cannot be used for conversion, so 16px is used.".to_string(),
            plugin: PLUGIN_NAME,
        }
    }
}

/// Runs the fallback pass over `stylesheet`, mutating it in place.
///
/// Returns the collected warnings, or `Error::InvalidRootSize` when the
/// root font-size expression cannot be converted; mutations applied
/// before the failure stand (best effort, not transactional). When the
/// target browsers need no fallbacks at all the stylesheet is left
/// untouched and no warnings are produced.
pub fn run(stylesheet: &mut Stylesheet, options: &Options) -> Result<Vec<Warning>, Error> {
    let resolved = resolve_browser_spec(&options.browsers);
    let caps = Capabilities::classify(&resolved);
    debug!(
        "targets {:?} resolved to {} browsers, {caps:?}",
        options.browsers,
        resolved.len()
    );
    if !caps.any() {
        return Ok(Vec::new());
    }

    let root_value = if options.html {
        root_size::resolve_root_size(stylesheet, options.root_value.clone())
    } else {
        options.root_value.clone()
    };

    let mut transformer = Transformer {
        options,
        caps,
        root: rewrite::LazyRootPx::new(root_value),
        warnings: Vec::new(),
    };
    for rule in &mut stylesheet.rules {
        transformer.walk_rule(rule, false, 0)?;
    }
    Ok(transformer.warnings)
}

struct Transformer<'a> {
    options: &'a Options,
    caps: Capabilities,
    root: rewrite::LazyRootPx,
    warnings: Vec<Warning>,
}

impl Transformer<'_> {
    /// Walks one rule and its children. `atrule_depth` counts enclosing
    /// at-rules including the rule itself; everything below a second
    /// at-rule level is out of scope for conversion.
    fn walk_rule(
        &mut self,
        rule: &mut Rule,
        parent_is_atrule: bool,
        atrule_depth: usize,
    ) -> Result<(), Error> {
        let is_atrule = rule.is_atrule();
        if is_atrule && atrule_depth >= 1 {
            return Ok(());
        }
        let depth = atrule_depth + usize::from(is_atrule);

        let skip_scope =
            !self.options.atrules && !self.caps.special && (is_atrule || parent_is_atrule);
        if !skip_scope {
            rewrite::rewrite_declarations(
                rule,
                self.caps,
                self.options,
                &mut self.root,
                &mut self.warnings,
            )?;
        }
        for child in &mut rule.rules {
            self.walk_rule(child, is_atrule, depth)?;
        }
        Ok(())
    }
}
