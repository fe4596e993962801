//! colorcode - configurable source code to HTML formatter
//!
//! Source text is split into tokens by a character-class tokenizer and
//! every token is wrapped in `<font>`, `<b>` and `<i>` markup. What counts
//! as a keyword, how each class of token looks and which words get
//! special treatment is decided by flat `colorcode.*` / `tokenizer.*`
//! properties, layered from defaults, a named syntax bundle and the call
//! parameters.
//!
//! ```
//! use colorcode::Params;
//!
//! let params = Params::new()
//!     .with("syntax", "sql")
//!     .with("colorcode.line.number", "1");
//! let html = colorcode::format(Some("select * from dual"), &params);
//! assert!(html.contains("<b>SELECT</b>"));
//! ```

pub mod bundle;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod plugin;
pub mod render;
pub mod syntax;

pub use bundle::{
    BuiltinBundles, BundleRegistry, BundleResolver, CachingResolver, ChainedResolver, DirectoryBundles,
    NoBundles,
};
pub use config::{Params, Properties};
pub use diagnostics::{DiagnosticSink, MemorySink, TracingSink};
pub use error::{ColorCodeError, Result};
pub use formatter::{Formatter, ResolvedConfig};

/// Format `body` with the built-in bundles
///
/// `None` yields an empty string; any other input yields an HTML fragment.
pub fn format(body: Option<&str>, params: &Params) -> String {
    Formatter::new().format(body, params)
}
