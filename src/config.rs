//! Layered key/value configuration
//!
//! Formatting is driven by flat string properties such as
//! `colorcode.keyword.font.color` or `tokenizer.wordChars`. They come from
//! three layers, lowest priority first:
//!
//! 1. hard-coded defaults
//! 2. a named syntax bundle (`.properties` or `.toml`)
//! 3. the immediate call parameters
//!
//! Bundle format (`.properties`):
//! ```text
//! # SQL syntax
//! colorcode.keywords = select,from,where,\
//!                      insert,update,delete
//! colorcode.keyword.foldcase = upper
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::Result;

/// Resolved string properties, iterated in key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// Get a property value, treating an empty string as absent
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Set a property, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay another layer on top of this one; its values win per key
    pub fn merge(&mut self, layer: &Properties) {
        for (key, value) in layer.iter() {
            self.set(key, value);
        }
    }

    /// Read a boolean property; `None` when missing or empty
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get_non_empty(key).map(parse_bool)
    }

    /// Read a numeric property; `None` when missing, empty or unparseable
    pub fn number<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get_non_empty(key).and_then(|value| value.trim().parse().ok())
    }

    /// Parse `.properties` text into a property set
    pub fn parse(contents: &str) -> Self {
        let mut props = Properties::new();
        let mut logical = String::new();

        for raw in contents.lines() {
            let continuing = !logical.is_empty();
            let line = if continuing { raw.trim_start() } else { raw.trim() };

            // Skip empty lines and comments
            if !continuing && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
                continue;
            }

            let line = line.trim_end();
            if let Some(head) = line.strip_suffix('\\') {
                if !head.ends_with('\\') {
                    logical.push_str(head);
                    continue;
                }
            }
            logical.push_str(line);
            props.insert_line(&logical);
            logical.clear();
        }

        if !logical.is_empty() {
            props.insert_line(&logical);
        }

        props
    }

    /// Parse a TOML document, flattening nested tables to dotted keys
    pub fn from_toml(contents: &str) -> Result<Self> {
        let table: toml::Table = contents.parse()?;
        let mut props = Properties::new();
        flatten_table(&mut props, "", &table);
        Ok(props)
    }

    fn insert_line(&mut self, line: &str) {
        let Some(split) = line.find(['=', ':']) else {
            let key = line.trim();
            if !key.is_empty() {
                self.set(key, "");
            }
            return;
        };
        let key = line[..split].trim();
        if key.is_empty() {
            return;
        }
        self.set(key, unescape(line[split + 1..].trim()));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (key, value) in iter {
            props.set(key, value);
        }
        props
    }
}

/// Immediate call-time parameters
///
/// Values are arbitrary TOML values as handed over by the host; only
/// string values take part in formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: toml::Table,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a parameter
    pub fn with(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.values.get(key)
    }

    /// Get a parameter only if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|value| value.as_str())
    }

    /// Iterate over the string-valued parameters
    pub fn strings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|text| (key.as_str(), text)))
    }
}

impl From<toml::Table> for Params {
    fn from(values: toml::Table) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<toml::Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// Parse a boolean value from string
pub fn parse_bool(s: &str) -> bool {
    let s = s.trim().to_lowercase();
    matches!(s.as_str(), "true" | "yes" | "on" | "1")
}

fn flatten_table(props: &mut Properties, prefix: &str, table: &toml::Table) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(inner) => flatten_table(props, &path, inner),
            toml::Value::Array(items) => {
                let joined: Vec<String> = items.iter().filter_map(scalar_text).collect();
                props.set(path, joined.join(","));
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    props.set(path, text);
                }
            }
        }
    }
}

fn scalar_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Resolve `\n`, `\t`, `\r`, `\uXXXX` and escaped literal characters
fn unescape(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => result.push(decoded),
                    None => {
                        result.push_str("\\u");
                        result.push_str(&hex);
                    }
                }
            }
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties() {
        let contents = r#"
# Comment
! Another comment
colorcode.keywords = select,from
colorcode.keyword.foldcase: upper
colorcode.area.bgcolor=#ffffff
        "#;

        let props = Properties::parse(contents);
        assert_eq!(props.get("colorcode.keywords"), Some("select,from"));
        assert_eq!(props.get("colorcode.keyword.foldcase"), Some("upper"));
        assert_eq!(props.get("colorcode.area.bgcolor"), Some("#ffffff"));
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_parse_continuation_and_escapes() {
        let contents = "colorcode.keywords = select,from,\\\n    where,order\n\
                        colorcode.start = <div>\\n\n\
                        colorcode.special.dir.pattern = ^#\\\\w+\n";

        let props = Properties::parse(contents);
        assert_eq!(props.get("colorcode.keywords"), Some("select,from,where,order"));
        assert_eq!(props.get("colorcode.start"), Some("<div>\n"));
        assert_eq!(props.get("colorcode.special.dir.pattern"), Some("^#\\w+"));
    }

    #[test]
    fn test_value_keeps_later_separators() {
        let props = Properties::parse("colorcode.special.url.pattern = https?://.*\n");
        assert_eq!(props.get("colorcode.special.url.pattern"), Some("https?://.*"));
    }

    #[test]
    fn test_from_toml_flattens() {
        let contents = r##"
[colorcode]
keywords = ["select", "from"]
tabsize = 2

[colorcode.keyword]
ignorecase = false

[tokenizer]
wordChar = "#"
        "##;

        let props = Properties::from_toml(contents).unwrap();
        assert_eq!(props.get("colorcode.keywords"), Some("select,from"));
        assert_eq!(props.get("colorcode.tabsize"), Some("2"));
        assert_eq!(props.get("colorcode.keyword.ignorecase"), Some("false"));
        assert_eq!(props.get("tokenizer.wordChar"), Some("#"));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(Properties::from_toml("this is = = not toml").is_err());
    }

    #[test]
    fn test_merge_overrides_and_is_idempotent() {
        let mut base: Properties = [("a", "1"), ("b", "2")].into_iter().collect();
        let layer: Properties = [("b", "3")].into_iter().collect();

        base.merge(&layer);
        let once = base.clone();
        base.merge(&layer);

        assert_eq!(base, once);
        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("3"));
    }

    #[test]
    fn test_flag_and_number() {
        let props: Properties = [
            ("on", "TRUE"),
            ("off", "nope"),
            ("empty", ""),
            ("tab", "8"),
            ("bad", "eight"),
        ]
        .into_iter()
        .collect();

        assert_eq!(props.flag("on"), Some(true));
        assert_eq!(props.flag("off"), Some(false));
        assert_eq!(props.flag("empty"), None);
        assert_eq!(props.flag("missing"), None);
        assert_eq!(props.number::<usize>("tab"), Some(8));
        assert_eq!(props.number::<usize>("bad"), None);
        assert_eq!(props.number::<usize>("empty"), None);
    }

    #[test]
    fn test_params_only_expose_strings() {
        let params = Params::new()
            .with("syntax", "sql")
            .with("colorcode.tabsize", 8)
            .with("log", true);

        assert_eq!(params.get_str("syntax"), Some("sql"));
        assert_eq!(params.get_str("colorcode.tabsize"), None);
        assert!(params.get("colorcode.tabsize").is_some());

        let strings: Vec<_> = params.strings().collect();
        assert_eq!(strings, vec![("syntax", "sql")]);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(parse_bool("1"));

        assert!(!parse_bool("false"));
        assert!(!parse_bool("no"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("anything"));
    }
}
