//! Token to HTML rendering
//!
//! The engine drains a [`Tokenizer`], classifies every token and appends
//! its markup. Per-call state (line-start flag, line counter, indentation
//! cache) lives in a [`RenderSession`] owned by a single `render` call.

use crate::diagnostics::Diagnostics;
use crate::syntax::{escape_html, ClassStyle, RenderConfig, SpecialPattern, Token, Tokenizer};

/// Indentation strings are memoized for counts below this
const INDENT_CACHE_SIZE: usize = 100;

/// Memoized runs of the space glyph
#[derive(Debug, Clone)]
pub struct IndentCache {
    slots: Vec<Option<String>>,
}

impl Default for IndentCache {
    fn default() -> Self {
        Self {
            slots: vec![None; INDENT_CACHE_SIZE],
        }
    }
}

impl IndentCache {
    /// Append `glyph` repeated `count` times to `out`
    pub fn push_indent(&mut self, count: usize, glyph: &str, out: &mut String) {
        match self.slots.get_mut(count) {
            Some(slot) => out.push_str(slot.get_or_insert_with(|| glyph.repeat(count))),
            None => out.push_str(&glyph.repeat(count)),
        }
    }
}

/// Mutable state of one rendering pass
#[derive(Debug, Clone)]
pub struct RenderSession {
    /// True until the first token of the current line is rendered
    pub at_line_start: bool,
    /// Next line number, when numbering is on
    pub line_number: Option<i64>,
    indents: IndentCache,
}

impl RenderSession {
    pub fn new(first_line_number: Option<i64>) -> Self {
        Self {
            at_line_start: true,
            line_number: first_line_number,
            indents: IndentCache::default(),
        }
    }

    /// Read and clear the line-start flag
    fn take_line_start(&mut self) -> bool {
        std::mem::replace(&mut self.at_line_start, false)
    }
}

/// Renders tokens as HTML according to a [`RenderConfig`]
pub struct RenderingEngine<'a> {
    config: &'a RenderConfig,
    diag: Diagnostics<'a>,
}

impl<'a> RenderingEngine<'a> {
    pub fn new(config: &'a RenderConfig, diag: Diagnostics<'a>) -> Self {
        Self { config, diag }
    }

    /// Header, rendered body and footer
    pub fn render_document(&self, tokenizer: &mut Tokenizer) -> String {
        let body = self.render(tokenizer);
        let mut document = self.header();
        document.push_str(&body);
        document.push_str(&self.footer());
        document
    }

    /// Render every remaining token of `tokenizer`
    pub fn render(&self, tokenizer: &mut Tokenizer) -> String {
        let mut session = RenderSession::new(self.config.first_line_number);
        let mut out = String::new();

        self.push_line_number(&mut session, &mut out);
        while let Some(token) = tokenizer.next_token() {
            self.render_one(token, tokenizer, &mut session, &mut out);
        }

        out
    }

    fn render_one(
        &self,
        token: Token,
        tokenizer: &mut Tokenizer,
        session: &mut RenderSession,
        out: &mut String,
    ) {
        let at_line_start = session.take_line_start();
        let styles = &self.config.styles;

        match token {
            Token::Number(number) => {
                self.diag.info(|| format!("seen number: [{number}]"));
                // Fractional digits are dropped on purpose
                let value = (number as i64).to_string();
                self.render_token(&styles.number, &value, out);
            }
            Token::Word(word) => self.render_word(&word, at_line_start, out),
            Token::Quoted { delimiter, text } => {
                let quoted = format!("{delimiter}{text}{delimiter}");
                self.render_token(&styles.string, &quoted, out);
            }
            Token::EndOfLine => {
                out.push_str(&self.config.markup.newline);
                out.push('\n');
                self.push_line_number(session, out);
                session.at_line_start = true;
            }
            Token::Space(first) => {
                let mut count = first;
                loop {
                    match tokenizer.next_token() {
                        Some(Token::Space(more)) => count += more,
                        Some(_) => {
                            tokenizer.push_back();
                            break;
                        }
                        None => break,
                    }
                }
                self.push_blank(count, session, out);
            }
            Token::Tab => self.push_blank(self.config.tab_size, session, out),
            Token::Ordinary(ch) => {
                let mut buf = [0u8; 4];
                self.render_token(&styles.symbol, ch.encode_utf8(&mut buf), out);
            }
        }
    }

    fn render_word(&self, word: &str, at_line_start: bool, out: &mut String) {
        self.diag.info(|| format!("seen word: [{word}]"));

        if self.config.keywords.contains(word) {
            self.render_token(&self.config.styles.keyword, word, out);
            return;
        }

        match self.find_special(word, at_line_start) {
            Some(special) => self.render_token(&special.style, word, out),
            None => self.render_token(&self.config.styles.normal, word, out),
        }
    }

    /// First special pattern matching the whole word
    fn find_special(&self, word: &str, at_line_start: bool) -> Option<&'a SpecialPattern> {
        let config: &'a RenderConfig = self.config;
        if config.specials.is_empty() {
            return None;
        }

        self.diag.info(|| format!("Is '{word}' special?"));
        for special in &config.specials {
            if !special.matches_text(word) {
                continue;
            }
            if special.anchored && !at_line_start {
                self.diag
                    .info(|| "Matches, but not start-of-line (^ anchor present in pattern)".to_string());
                continue;
            }
            self.diag.info(|| format!("Matches {}", special.name));
            return Some(special);
        }

        self.diag.info(|| "No match".to_string());
        None
    }

    fn push_line_number(&self, session: &mut RenderSession, out: &mut String) {
        if let Some(number) = session.line_number {
            let value = format!("{number}{}", self.config.markup.space);
            self.render_token(&self.config.styles.number, &value, out);
            session.line_number = Some(number + 1);
        }
    }

    /// Spaces and tabs take the area background color so they stay invisible
    fn push_blank(&self, count: usize, session: &mut RenderSession, out: &mut String) {
        out.push_str("<font color=\"");
        out.push_str(&self.config.area_bgcolor);
        out.push_str("\">");
        session
            .indents
            .push_indent(count, &self.config.markup.space, out);
        out.push_str(&self.config.markup.font_end);
    }

    /// Wrap `value` in the font, bold and italic markup of `style`
    pub fn render_token(&self, style: &ClassStyle, value: &str, out: &mut String) {
        let markup = &self.config.markup;

        out.push_str("<font color=\"");
        out.push_str(&style.color);
        out.push_str("\">");
        if style.bold {
            out.push_str(&markup.bold_on);
        }
        if style.italic {
            out.push_str(&markup.italic_on);
        }

        let folded = style.fold.apply(value);
        out.push_str(&escape_html(&folded));

        if style.italic {
            out.push_str(&markup.italic_off);
        }
        if style.bold {
            out.push_str(&markup.bold_off);
        }
        out.push_str(&markup.font_end);
    }

    pub fn header(&self) -> String {
        self.substitute(&self.config.start)
    }

    pub fn footer(&self) -> String {
        self.substitute(&self.config.finish)
    }

    /// Replace `AREA_CLASS`, `AREA_BGCOLOR`, `AREA_BORDER` and `SYNTAX`;
    /// placeholders whose value is empty are left alone
    fn substitute(&self, template: &str) -> String {
        let area_class = self.config.resolved_area_class();
        let replacements = [
            ("AREA_CLASS", area_class.as_str()),
            ("AREA_BGCOLOR", self.config.area_bgcolor.as_str()),
            ("AREA_BORDER", self.config.area_border.as_str()),
            ("SYNTAX", self.config.syntax_name.as_str()),
        ];

        let mut result = template.to_string();
        for (placeholder, value) in replacements {
            if !value.is_empty() && result.contains(placeholder) {
                result = result.replace(placeholder, value);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Properties;
    use crate::diagnostics::{Level, MemorySink};
    use crate::syntax::{CharClassConfig, FoldCase};

    fn config() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.start.clear();
        config.finish.clear();
        config
    }

    fn render(config: &RenderConfig, text: &str) -> String {
        let mut tokenizer = Tokenizer::new(text, CharClassConfig::default());
        RenderingEngine::new(config, Diagnostics::silent()).render_document(&mut tokenizer)
    }

    const BLANK1: &str = "<font color=\"#f0f7f0\">&nbsp;</font>";

    #[test]
    fn test_keyword_normal_and_space() {
        let mut config = config();
        config.keywords.add("select");

        assert_eq!(
            render(&config, "SELECT x"),
            format!(
                "<font color=\"#7f0055\"><b>SELECT</b></font>{BLANK1}<font color=\"#000000\">x</font>"
            )
        );
    }

    #[test]
    fn test_space_runs_collapse() {
        let out = render(&config(), "a    b");
        let blank4 = "<font color=\"#f0f7f0\">&nbsp;&nbsp;&nbsp;&nbsp;</font>";
        assert_eq!(out.matches("<font color=\"#f0f7f0\">").count(), 1);
        assert!(out.contains(blank4));
    }

    #[test]
    fn test_tab_uses_tab_size() {
        let mut config = config();
        config.tab_size = 2;
        let out = render(&config, "\tx");
        assert!(out.starts_with("<font color=\"#f0f7f0\">&nbsp;&nbsp;</font>"));
    }

    #[test]
    fn test_number_is_truncated() {
        assert_eq!(render(&config(), "3.7"), "<font color=\"#800000\">3</font>");
        assert_eq!(render(&config(), "-2.9"), "<font color=\"#800000\">-2</font>");
    }

    #[test]
    fn test_string_and_symbol_escaping() {
        let out = render(&config(), "a<b \"<tag>\"");
        assert_eq!(
            out,
            format!(
                "<font color=\"#000000\">a</font>\
                 <font color=\"#000000\"><b>&lt;</b></font>\
                 <font color=\"#000000\">b</font>{BLANK1}\
                 <font color=\"#2a00ff\">\"&lt;tag&gt;\"</font>"
            )
        );
    }

    #[test]
    fn test_line_numbers() {
        let mut config = config();
        config.first_line_number = Some(1);

        let out = render(&config, "a\nb");
        assert_eq!(
            out,
            "<font color=\"#800000\">1&nbsp;</font>\
             <font color=\"#000000\">a</font><br/>\n\
             <font color=\"#800000\">2&nbsp;</font>\
             <font color=\"#000000\">b</font>"
        );
    }

    #[test]
    fn test_anchored_special_only_at_line_start() {
        let mut config = config();
        config
            .specials
            .push(SpecialPattern::new("comment", "^#.*", ClassStyle::color("#3f7f5f")).unwrap());

        let props: Properties = [("tokenizer.wordChar", "#")].into_iter().collect();
        let mut tokenizer = Tokenizer::new("#note x #note\n#note", CharClassConfig::from_properties(&props));
        let out = RenderingEngine::new(&config, Diagnostics::silent()).render(&mut tokenizer);

        assert_eq!(out.matches("<font color=\"#3f7f5f\">#note</font>").count(), 2);
        assert_eq!(out.matches("<font color=\"#000000\">#note</font>").count(), 1);
        assert!(out.starts_with("<font color=\"#3f7f5f\">#note</font>"));
    }

    #[test]
    fn test_fold_case_and_italic() {
        let mut config = config();
        config.keywords.add("select");
        config.styles.keyword = ClassStyle::color("red").with_bold().with_italic().with_fold(FoldCase::Upper);

        assert_eq!(
            render(&config, "select"),
            "<font color=\"red\"><b><i>SELECT</i></b></font>"
        );
    }

    #[test]
    fn test_header_and_footer_substitution() {
        let mut config = RenderConfig::default();
        config.syntax_name = "SQL".to_string();
        config.start = "[SYNTAX|AREA_CLASS|AREA_BGCOLOR|AREA_BORDER]".to_string();
        config.finish = "[/AREA_CLASS]".to_string();

        assert_eq!(render(&config, "x"), "[SQL|sql|#f0f7f0|1]<font color=\"#000000\">x</font>[/sql]");

        config.area_border.clear();
        config.area_class = Some("box".to_string());
        assert_eq!(render(&config, ""), "[SQL|box|#f0f7f0|AREA_BORDER][/box]");
    }

    #[test]
    fn test_indent_cache_beyond_capacity() {
        let mut cache = IndentCache::default();
        let mut out = String::new();
        cache.push_indent(120, "_", &mut out);
        cache.push_indent(3, "_", &mut out);
        cache.push_indent(3, "_", &mut out);
        assert_eq!(out.len(), 126);
    }

    #[test]
    fn test_diagnostics_trace_decisions() {
        let sink = MemorySink::new();
        let mut config = config();
        config
            .specials
            .push(SpecialPattern::new("upper", "[A-Z]+", ClassStyle::color("blue")).unwrap());

        let mut tokenizer = Tokenizer::new("ABC 42", CharClassConfig::default());
        RenderingEngine::new(&config, Diagnostics::new(Some(&sink))).render(&mut tokenizer);

        assert!(sink.contains(Level::Info, "seen word: [ABC]"));
        assert!(sink.contains(Level::Info, "Matches upper"));
        assert!(sink.contains(Level::Info, "seen number: [42]"));
    }
}
