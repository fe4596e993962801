//! Host plugin boundary
//!
//! Wiki-style hosts hand over a single parameter map in which the text to
//! format travels under `_body`:
//!
//! ```text
//! [{ColorCodePlugin syntax='sql'
//!
//! select count(*) from dual
//! }]
//! ```

use crate::config::Params;
use crate::formatter::Formatter;

/// Parameter carrying the plugin body
pub const BODY_PARAM: &str = "_body";

/// Format the `_body` parameter; no (string) body renders nothing
pub fn execute(formatter: &Formatter, params: &Params) -> String {
    match params.get_str(BODY_PARAM) {
        Some(body) => formatter.format(Some(body), params),
        None => String::new(),
    }
}
