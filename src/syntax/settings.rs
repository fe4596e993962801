//! Typed render settings
//!
//! [`RenderConfig`] is built once per formatting call from the fully
//! merged [`Properties`]. All string-keyed lookups happen here; the
//! rendering engine only sees typed fields.

use crate::config::Properties;
use crate::diagnostics::Diagnostics;

use super::rules::{KeywordSet, SpecialPattern};
use super::style::{ClassStyle, Markup};

pub const KEYWORDS: &str = "colorcode.keywords";
pub const START: &str = "colorcode.start";
pub const FINISH: &str = "colorcode.finish";
pub const AREA_CLASS: &str = "colorcode.area.class";
pub const AREA_BGCOLOR: &str = "colorcode.area.bgcolor";
pub const AREA_BORDER: &str = "colorcode.area.border";
pub const KEYWORD_IGNORECASE: &str = "colorcode.keyword.ignorecase";
pub const FONT_COLOR_END: &str = "colorcode.font.color.end";
pub const BOLD_ON: &str = "colorcode.font.bold.on";
pub const BOLD_OFF: &str = "colorcode.font.bold.off";
pub const ITALIC_ON: &str = "colorcode.font.italic.on";
pub const ITALIC_OFF: &str = "colorcode.font.italic.off";
pub const NEWLINE: &str = "colorcode.newline";
pub const SPACE: &str = "colorcode.space";
pub const TABSIZE: &str = "colorcode.tabsize";
pub const LINE_NUMBER: &str = "colorcode.line.number";

const SPECIAL_PREFIX: &str = "colorcode.special.";
const PATTERN_SUFFIX: &str = ".pattern";

/// Syntax name used when the caller names none
pub const DEFAULT_SYNTAX_NAME: &str = "colorcode";
pub const DEFAULT_TAB_SIZE: usize = 4;

const DEFAULT_SPECIAL_COLOR: &str = "#8000ff";

/// HTML markup preceding the formatted text
pub const DEFAULT_START: &str = "<!-- ColorCodeHTML, syntax=SYNTAX: START of automatically generated HTML code -->\n\
<div align=\"left\" class=\"AREA_CLASS\">\n  \
<table class=\"wikitable\" border=\"AREA_BORDER\" cellpadding=\"3\" cellspacing=\"0\" bgcolor=\"AREA_BGCOLOR\">\n    \
<tr>\n      \
<!-- start colorized source code -->\n      \
<td nowrap=\"nowrap\" valign=\"top\" align=\"left\">\n        \
<code style=\"white-space: pre; margin: 1.5em 2em 1.8em 2em; font-size: 1.2em; background: AREA_BGCOLOR;\">\n";

/// HTML markup following the formatted text
pub const DEFAULT_FINISH: &str = "</code>\n      \
</td>\n      \
<!-- end colorized source code -->\n    \
</tr>\n  \
</table>\n\
</div>\n\
<!-- ColorCodeHTML: END of automatically generated HTML code -->\n";

/// The lowest configuration layer
///
/// `colorcode.area.class` is deliberately absent so that the area class
/// falls back to the syntax name.
pub fn default_properties() -> Properties {
    [
        (AREA_BORDER, "1"),
        (AREA_BGCOLOR, "#f0f7f0"),
        (START, DEFAULT_START),
        (FINISH, DEFAULT_FINISH),
        ("colorcode.string.font.color", "#2a00ff"),
        ("colorcode.string.font.bold", "false"),
        ("colorcode.string.font.italic", "false"),
        ("colorcode.keyword.font.color", "#7f0055"),
        ("colorcode.keyword.font.bold", "true"),
        ("colorcode.keyword.font.italic", "false"),
        ("colorcode.keyword.foldcase", "no"),
        (KEYWORD_IGNORECASE, "true"),
        ("colorcode.symbol.font.color", "#000000"),
        ("colorcode.symbol.font.bold", "true"),
        ("colorcode.symbol.font.italic", "false"),
        ("colorcode.normal.font.color", "#000000"),
        ("colorcode.normal.font.bold", "false"),
        ("colorcode.normal.font.italic", "false"),
        ("colorcode.normal.foldcase", "no"),
        ("colorcode.number.font.color", "#800000"),
        ("colorcode.number.font.bold", "false"),
        ("colorcode.number.font.italic", "false"),
        ("colorcode.comment.font.color", "#3f7f5f"),
        ("colorcode.comment.font.bold", "false"),
        ("colorcode.comment.font.italic", "true"),
        (FONT_COLOR_END, "</font>"),
        (BOLD_ON, "<b>"),
        (BOLD_OFF, "</b>"),
        (ITALIC_ON, "<i>"),
        (ITALIC_OFF, "</i>"),
        (NEWLINE, "<br/>"),
        (SPACE, "&nbsp;"),
        (TABSIZE, "4"),
        (LINE_NUMBER, "-1"),
    ]
    .into_iter()
    .collect()
}

/// Names of all `colorcode.special.<name>.pattern` keys, in key order
pub fn special_names(props: &Properties) -> Vec<String> {
    props
        .keys()
        .filter_map(|key| key.strip_prefix(SPECIAL_PREFIX)?.strip_suffix(PATTERN_SUFFIX))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fill in the style keys of every special pattern the caller left out
///
/// Returns the names of the special patterns found.
pub fn backfill_special_styles(props: &mut Properties) -> Vec<String> {
    let names = special_names(props);
    for name in &names {
        let defaults = [
            ("font.color", DEFAULT_SPECIAL_COLOR),
            ("font.bold", "false"),
            ("font.italic", "false"),
        ];
        for (suffix, value) in defaults {
            let key = format!("{SPECIAL_PREFIX}{name}.{suffix}");
            if !props.contains_key(&key) {
                props.set(key, value);
            }
        }
    }
    names
}

/// Style of every built-in render class
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassStyles {
    pub normal: ClassStyle,
    pub keyword: ClassStyle,
    pub symbol: ClassStyle,
    pub string: ClassStyle,
    pub number: ClassStyle,
    pub comment: ClassStyle,
}

impl ClassStyles {
    fn from_properties(props: &Properties) -> Self {
        Self {
            normal: ClassStyle::from_properties(props, "colorcode.normal"),
            keyword: ClassStyle::from_properties(props, "colorcode.keyword"),
            symbol: ClassStyle::from_properties(props, "colorcode.symbol"),
            string: ClassStyle::from_properties(props, "colorcode.string"),
            number: ClassStyle::from_properties(props, "colorcode.number"),
            comment: ClassStyle::from_properties(props, "colorcode.comment"),
        }
    }
}

/// Everything the rendering engine needs, resolved and typed
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Name substituted for `SYNTAX`
    pub syntax_name: String,
    /// Explicit area class; `None` falls back to the syntax name
    pub area_class: Option<String>,
    pub area_bgcolor: String,
    pub area_border: String,
    /// Header template
    pub start: String,
    /// Footer template
    pub finish: String,
    pub styles: ClassStyles,
    pub markup: Markup,
    pub tab_size: usize,
    /// First line number, `None` when numbering is off
    pub first_line_number: Option<i64>,
    pub keywords: KeywordSet,
    /// Special patterns, ordered by name
    pub specials: Vec<SpecialPattern>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let mut props = default_properties();
        Self::from_properties(&mut props, None, DEFAULT_SYNTAX_NAME, &Diagnostics::silent())
    }
}

impl RenderConfig {
    /// Resolve the typed settings from merged properties
    ///
    /// `bundle_keywords` is the keyword list as it was before the call
    /// parameters were applied; it contributes to the keyword set together
    /// with the final `colorcode.keywords` value. Default styles are
    /// backfilled into `props` for every special pattern.
    pub fn from_properties(
        props: &mut Properties,
        bundle_keywords: Option<&str>,
        syntax_name: &str,
        diag: &Diagnostics<'_>,
    ) -> Self {
        let special_names = backfill_special_styles(props);
        let props = &*props;

        let mut keywords = KeywordSet::new(props.flag(KEYWORD_IGNORECASE).unwrap_or(false));
        if let Some(list) = bundle_keywords {
            keywords.add_list(list);
        }
        if let Some(list) = props.get(KEYWORDS) {
            keywords.add_list(list);
        }

        let mut specials = Vec::new();
        for name in special_names {
            let key = format!("{SPECIAL_PREFIX}{name}{PATTERN_SUFFIX}");
            let Some(pattern) = props.get_non_empty(&key) else {
                continue;
            };
            let style = ClassStyle::from_properties(props, &format!("{SPECIAL_PREFIX}{name}"));
            match SpecialPattern::new(&name, pattern, style) {
                Ok(special) => specials.push(special),
                Err(e) => diag.error(|| format!("Ignoring special pattern {name}: {e}")),
            }
        }

        let text = |key: &str| props.get(key).unwrap_or_default().to_string();

        Self {
            syntax_name: syntax_name.to_string(),
            area_class: props.get_non_empty(AREA_CLASS).map(str::to_string),
            area_bgcolor: text(AREA_BGCOLOR),
            area_border: text(AREA_BORDER),
            start: text(START),
            finish: text(FINISH),
            styles: ClassStyles::from_properties(props),
            markup: Markup {
                font_end: text(FONT_COLOR_END),
                bold_on: text(BOLD_ON),
                bold_off: text(BOLD_OFF),
                italic_on: text(ITALIC_ON),
                italic_off: text(ITALIC_OFF),
                newline: text(NEWLINE),
                space: text(SPACE),
            },
            tab_size: props.number(TABSIZE).unwrap_or(DEFAULT_TAB_SIZE),
            first_line_number: props.number::<i64>(LINE_NUMBER).filter(|n| *n >= 0),
            keywords,
            specials,
        }
    }

    /// Value substituted for `AREA_CLASS`
    pub fn resolved_area_class(&self) -> String {
        match &self.area_class {
            Some(class) => class.clone(),
            None => self.syntax_name.to_lowercase(),
        }
    }
}
