//! Syntax configuration and tokenizing
//!
//! This module provides everything between the merged properties and the
//! rendering engine:
//! - Character classes and the tokenizer
//! - Keyword and special-pattern rules
//! - Typed render settings and styles
//! - Built-in syntax bundles

pub mod builtin;
mod charclass;
mod rules;
mod settings;
mod style;
mod tokenizer;

pub use charclass::{parse_char_code, CharClassConfig};
pub use rules::{KeywordSet, SpecialPattern};
pub use settings::{ClassStyles, RenderConfig, DEFAULT_SYNTAX_NAME};
pub use style::{escape_html, ClassStyle, FoldCase, Markup};
pub use tokenizer::{Token, Tokenizer};

pub(crate) use settings::{default_properties, KEYWORDS};
