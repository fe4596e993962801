//! Style types for HTML rendering
//!
//! Each render class (`normal`, `keyword`, `special.<name>`, ...) resolves
//! to a [`ClassStyle`]; the surrounding markup strings live in [`Markup`].

use std::borrow::Cow;

use crate::config::Properties;

/// Case folding applied to rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoldCase {
    #[default]
    None,
    Upper,
    Lower,
}

impl FoldCase {
    /// `upper` / `lower` (any case); anything else means no folding
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("upper") {
            FoldCase::Upper
        } else if name.eq_ignore_ascii_case("lower") {
            FoldCase::Lower
        } else {
            FoldCase::None
        }
    }

    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            FoldCase::None => Cow::Borrowed(text),
            FoldCase::Upper => Cow::Owned(text.to_uppercase()),
            FoldCase::Lower => Cow::Owned(text.to_lowercase()),
        }
    }
}

/// Text style attributes of one render class
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassStyle {
    /// Font color, used verbatim in `<font color="...">`
    pub color: String,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Case folding of the rendered value
    pub fold: FoldCase,
}

impl ClassStyle {
    /// Create a style with just a font color
    pub fn color(color: &str) -> Self {
        Self {
            color: color.to_string(),
            ..Default::default()
        }
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Builder: set case folding
    pub fn with_fold(mut self, fold: FoldCase) -> Self {
        self.fold = fold;
        self
    }

    /// Read `<prefix>.font.color`, `.font.bold`, `.font.italic` and `.foldcase`
    pub fn from_properties(props: &Properties, prefix: &str) -> Self {
        let key = |suffix: &str| format!("{prefix}.{suffix}");
        Self {
            color: props.get(&key("font.color")).unwrap_or_default().to_string(),
            bold: props.flag(&key("font.bold")).unwrap_or(false),
            italic: props.flag(&key("font.italic")).unwrap_or(false),
            fold: props
                .get_non_empty(&key("foldcase"))
                .map(FoldCase::from_name)
                .unwrap_or_default(),
        }
    }
}

/// Markup fragments wrapped around every rendered token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    pub font_end: String,
    pub bold_on: String,
    pub bold_off: String,
    pub italic_on: String,
    pub italic_off: String,
    pub newline: String,
    pub space: String,
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            font_end: "</font>".to_string(),
            bold_on: "<b>".to_string(),
            bold_off: "</b>".to_string(),
            italic_on: "<i>".to_string(),
            italic_off: "</i>".to_string(),
            newline: "<br/>".to_string(),
            space: "&nbsp;".to_string(),
        }
    }
}

/// Escape the characters that would open or close a tag
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('<', "&lt;").replace('>', "&gt;"))
}
