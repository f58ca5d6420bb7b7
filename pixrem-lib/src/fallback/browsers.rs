//! Browser target resolution and rem-capability classification.
//!
//! The query grammar is the browserslist subset this transform actually
//! needs: comma-separated clauses of `family`, `family <version>`,
//! `family <lo>-<hi>` or `family <op> <version>` with `<=`, `<`, `>=`,
//! `>`. Comparison and range clauses expand against a built-in table of
//! known versions; anything unresolvable contributes nothing (resolution
//! never fails).

use log::debug;

/// Known Internet Explorer versions, the one family whose rem support
/// drives this transform.
const IE_VERSIONS: &[f32] = &[5.5, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0];

/// One resolved target browser.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserVersion {
    pub family: String,
    pub version: f32,
}

impl BrowserVersion {
    fn new(family: &str, version: f32) -> Self {
        BrowserVersion {
            family: family.to_string(),
            version,
        }
    }
}

/// rem-support classification of a resolved browser set, computed once
/// per run. When no flag is set the whole pass is a strict no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Set when the targets include browsers with no rem support at all
    /// (ie <= 8).
    pub legacy: bool,
    /// Set when the targets include browsers with full native rem
    /// support (ie >= 9).
    pub partial: bool,
    /// Set when the targets include the two versions with quirky,
    /// selector/shorthand-scoped rem support (ie 9 and ie 10).
    pub special: bool,
}

impl Capabilities {
    pub fn classify(browsers: &[BrowserVersion]) -> Self {
        let mut caps = Capabilities::default();
        for browser in browsers {
            if browser.family != "ie" {
                continue;
            }
            if browser.version <= 8.0 {
                caps.legacy = true;
            }
            if browser.version >= 9.0 {
                caps.partial = true;
            }
            if browser.version == 9.0 || browser.version == 10.0 {
                caps.special = true;
            }
        }
        caps
    }

    pub fn any(self) -> bool {
        self.legacy || self.partial || self.special
    }
}

/// Expands a browser target query into a concrete set of browsers.
pub fn resolve_browser_spec(spec: &str) -> Vec<BrowserVersion> {
    let mut browsers = Vec::new();
    for clause in spec.split(',') {
        let clause = clause.trim().to_ascii_lowercase();
        if clause.is_empty() {
            continue;
        }
        resolve_clause(&clause, &mut browsers);
    }
    browsers
}

fn resolve_clause(clause: &str, out: &mut Vec<BrowserVersion>) {
    let mut words = clause.split_whitespace();
    let family = match words.next() {
        Some(f) => f,
        None => return,
    };
    let rest: Vec<&str> = words.collect();
    let known = known_versions(family);

    match rest.as_slice() {
        // Bare family: every known version.
        [] => match known {
            Some(versions) => {
                out.extend(versions.iter().map(|&v| BrowserVersion::new(family, v)));
            }
            None => debug!("unknown browser family in query: {clause:?}"),
        },
        &[token] => {
            if let Some((op, version)) = split_op(token) {
                expand_comparison(family, op, version, known, out, clause);
            } else if let Some((lo, hi)) = split_range(token) {
                match known {
                    Some(versions) => out.extend(
                        versions
                            .iter()
                            .filter(|&&v| v >= lo && v <= hi)
                            .map(|&v| BrowserVersion::new(family, v)),
                    ),
                    None => debug!("cannot expand version range for {clause:?}"),
                }
            } else if let Ok(version) = token.parse::<f32>() {
                out.push(BrowserVersion::new(family, version));
            } else {
                debug!("unrecognized browser query clause: {clause:?}");
            }
        }
        &[op, version] => {
            if let Ok(version) = version.parse::<f32>() {
                expand_comparison(family, op, version, known, out, clause);
            } else {
                debug!("unrecognized browser query clause: {clause:?}");
            }
        }
        _ => debug!("unrecognized browser query clause: {clause:?}"),
    }
}

fn expand_comparison(
    family: &str,
    op: &str,
    version: f32,
    known: Option<&[f32]>,
    out: &mut Vec<BrowserVersion>,
    clause: &str,
) {
    let versions = match known {
        Some(versions) => versions,
        None => {
            debug!("cannot expand comparison for unknown family: {clause:?}");
            return;
        }
    };
    let matches: fn(f32, f32) -> bool = match op {
        "<=" => |v, q| v <= q,
        "<" => |v, q| v < q,
        ">=" => |v, q| v >= q,
        ">" => |v, q| v > q,
        _ => {
            debug!("unrecognized comparison operator in {clause:?}");
            return;
        }
    };
    out.extend(
        versions
            .iter()
            .filter(|&&v| matches(v, version))
            .map(|&v| BrowserVersion::new(family, v)),
    );
}

fn known_versions(family: &str) -> Option<&'static [f32]> {
    match family {
        "ie" => Some(IE_VERSIONS),
        _ => None,
    }
}

/// Splits an attached-operator token like `<=8` into `("<=", 8.0)`.
fn split_op(token: &str) -> Option<(&str, f32)> {
    for op in ["<=", ">=", "<", ">"] {
        if let Some(rest) = token.strip_prefix(op) {
            return rest.parse::<f32>().ok().map(|v| (op, v));
        }
    }
    None
}

/// Splits a range token like `9-10` into `(9.0, 10.0)`.
fn split_range(token: &str) -> Option<(f32, f32)> {
    let (lo, hi) = token.split_once('-')?;
    Some((lo.parse().ok()?, hi.parse().ok()?))
}
