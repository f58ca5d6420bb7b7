//! Pixel fallbacks for rem units.
//!
//! Parses a stylesheet into an owned, formatting-preserving tree, then
//! inserts (or substitutes) statically computed `px` fallback
//! declarations for every `rem` value the configured target browsers
//! cannot render natively.
//!
//! ```
//! use pixrem_lib::{process, Options};
//!
//! let result = process(".rule { font-size: 2rem }", &Options::default()).unwrap();
//! assert_eq!(result.css, ".rule { font-size: 32px; font-size: 2rem }");
//! assert!(result.warnings.is_empty());
//! ```

pub mod error;
pub mod fallback;
pub mod options;
pub mod parser;
pub mod process;
pub mod stylesheet;

pub use error::Error;
pub use fallback::{run, Capabilities, Warning, PLUGIN_NAME};
pub use options::Options;
pub use process::{process, Processed};
pub use stylesheet::css_tree;
