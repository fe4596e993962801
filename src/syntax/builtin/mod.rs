//! Built-in syntax bundles
//!
//! `syntax=sql` works without configuration files; a bundle directory
//! consulted first can still shadow these names.

mod java;
mod python;
mod sql;

use crate::config::Properties;

/// Names of all built-in bundles
pub const NAMES: &[&str] = &["java", "python", "sql"];

/// Get a built-in bundle by name (case-insensitive)
pub fn bundle(name: &str) -> Option<Properties> {
    match name.to_lowercase().as_str() {
        "java" => Some(java::java_bundle()),
        "python" => Some(python::python_bundle()),
        "sql" => Some(sql::sql_bundle()),
        _ => None,
    }
}
