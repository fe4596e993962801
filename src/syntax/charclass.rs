//! Character classification for the tokenizer
//!
//! Every code point below 256 carries a set of class flags; code points
//! above that are always word characters. The table starts from a base
//! scheme, then the `tokenizer.*` defaults and finally the resolved
//! configuration are applied on top, each in the same fixed order.

use crate::config::Properties;

const WHITESPACE: u8 = 0x01;
const WORD: u8 = 0x02;
const NUMERIC: u8 = 0x04;
const QUOTE: u8 = 0x08;

const TABLE_SIZE: usize = 256;

pub const EOL_IS_SIGNIFICANT: &str = "tokenizer.eolIsSignificant";
pub const LOWER_CASE_MODE: &str = "tokenizer.lowerCaseMode";
pub const PARSE_NUMBERS: &str = "tokenizer.parseNumbers";
pub const SLASH_SLASH_COMMENTS: &str = "tokenizer.slashSlashComments";
pub const SLASH_STAR_COMMENTS: &str = "tokenizer.slashStarComments";
pub const ORDINARY_CHAR: &str = "tokenizer.ordinaryChar";
pub const ORDINARY_CHARS: &str = "tokenizer.ordinaryChars";
pub const QUOTE_CHAR: &str = "tokenizer.quoteChar";
pub const WHITESPACE_CHARS: &str = "tokenizer.whitespaceChars";
pub const WORD_CHAR: &str = "tokenizer.wordChar";
pub const WORD_CHARS: &str = "tokenizer.wordChars";

/// Resolved tokenizer character classes and modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClassConfig {
    table: [u8; TABLE_SIZE],
    /// Report line ends as tokens
    pub eol_significant: bool,
    /// Fold recognized words to lowercase
    pub lower_case_words: bool,
    /// Recognize numeric literals
    pub parse_numbers: bool,
    /// Strip `// ...` comments
    pub slash_slash_comments: bool,
    /// Strip `/* ... */` comments
    pub slash_star_comments: bool,
}

impl Default for CharClassConfig {
    fn default() -> Self {
        let mut classes = Self::base();
        classes.apply(&default_properties());
        classes
    }
}

impl CharClassConfig {
    /// The scheme before any `tokenizer.*` property is applied
    pub fn base() -> Self {
        let mut classes = Self {
            table: [0; TABLE_SIZE],
            eol_significant: false,
            lower_case_words: false,
            parse_numbers: false,
            slash_slash_comments: false,
            slash_star_comments: false,
        };
        classes.word_chars('a' as u32, 'z' as u32);
        classes.word_chars('A' as u32, 'Z' as u32);
        classes.word_chars(160, 255);
        classes.whitespace_chars(0, ' ' as u32);
        classes.quote_char('"' as u32);
        classes.quote_char('\'' as u32);
        classes.set_parse_numbers(true);
        classes
    }

    /// Defaults overlaid with the `tokenizer.*` keys of `props`
    pub fn from_properties(props: &Properties) -> Self {
        let mut classes = Self::default();
        classes.apply(props);
        classes
    }

    /// Apply every `tokenizer.*` key present in `props`
    pub fn apply(&mut self, props: &Properties) {
        if let Some(on) = props.flag(EOL_IS_SIGNIFICANT) {
            self.eol_significant = on;
        }
        if let Some(on) = props.flag(LOWER_CASE_MODE) {
            self.lower_case_words = on;
        }
        if let Some(on) = props.flag(PARSE_NUMBERS) {
            self.set_parse_numbers(on);
        }
        if let Some(on) = props.flag(SLASH_SLASH_COMMENTS) {
            self.slash_slash_comments = on;
        }
        if let Some(on) = props.flag(SLASH_STAR_COMMENTS) {
            self.slash_star_comments = on;
        }

        if let Some(list) = props.get_non_empty(ORDINARY_CHAR) {
            for code in char_codes(list) {
                self.ordinary_char(code);
            }
        }
        if let Some((lo, hi)) = props.get_non_empty(ORDINARY_CHARS).and_then(char_range) {
            self.ordinary_chars(lo, hi);
        }
        if let Some(list) = props.get_non_empty(QUOTE_CHAR) {
            for code in char_codes(list) {
                self.quote_char(code);
            }
        }
        if let Some((lo, hi)) = props.get_non_empty(WHITESPACE_CHARS).and_then(char_range) {
            self.whitespace_chars(lo, hi);
        }
        if let Some(list) = props.get_non_empty(WORD_CHAR) {
            for code in char_codes(list) {
                self.word_chars(code, code);
            }
        }
        if let Some((lo, hi)) = props.get_non_empty(WORD_CHARS).and_then(char_range) {
            self.word_chars(lo, hi);
        }
    }

    /// Toggle numeric literal recognition for `0-9`, `.` and `-`
    pub fn set_parse_numbers(&mut self, on: bool) {
        self.parse_numbers = on;
        for ch in ('0'..='9').chain(['.', '-']) {
            let slot = &mut self.table[ch as usize];
            if on {
                *slot |= NUMERIC;
            } else {
                *slot &= !NUMERIC;
            }
        }
    }

    /// Make a character ordinary (it becomes a token on its own)
    pub fn ordinary_char(&mut self, code: u32) {
        if let Some(slot) = self.table.get_mut(code as usize) {
            *slot = 0;
        }
    }

    pub fn ordinary_chars(&mut self, lo: u32, hi: u32) {
        for slot in self.slots(lo, hi) {
            *slot = 0;
        }
    }

    pub fn quote_char(&mut self, code: u32) {
        if let Some(slot) = self.table.get_mut(code as usize) {
            *slot = QUOTE;
        }
    }

    pub fn whitespace_chars(&mut self, lo: u32, hi: u32) {
        for slot in self.slots(lo, hi) {
            *slot = WHITESPACE;
        }
    }

    /// Add the word flag; other flags on these characters are kept
    pub fn word_chars(&mut self, lo: u32, hi: u32) {
        for slot in self.slots(lo, hi) {
            *slot |= WORD;
        }
    }

    pub fn is_whitespace(&self, ch: char) -> bool {
        self.flags(ch) & WHITESPACE != 0
    }

    pub fn is_word(&self, ch: char) -> bool {
        self.flags(ch) & WORD != 0
    }

    pub fn is_numeric(&self, ch: char) -> bool {
        self.flags(ch) & NUMERIC != 0
    }

    pub fn is_quote(&self, ch: char) -> bool {
        self.flags(ch) & QUOTE != 0
    }

    /// A digit that may appear inside a number or continue a word
    pub fn is_digit(&self, ch: char) -> bool {
        ch.is_ascii_digit() && self.is_numeric(ch)
    }

    fn flags(&self, ch: char) -> u8 {
        self.table.get(ch as usize).copied().unwrap_or(WORD)
    }

    fn slots(&mut self, lo: u32, hi: u32) -> impl Iterator<Item = &mut u8> {
        let lo = lo as usize;
        let hi = (hi as usize).min(TABLE_SIZE - 1);
        let range = if lo <= hi { lo..hi + 1 } else { 0..0 };
        self.table[range].iter_mut()
    }
}

/// The `tokenizer.*` settings applied on top of the base scheme
pub fn default_properties() -> Properties {
    [
        (EOL_IS_SIGNIFICANT, "true"),
        (LOWER_CASE_MODE, "false"),
        (ORDINARY_CHAR, "_,0x20,0x09"),
        (PARSE_NUMBERS, "true"),
        (QUOTE_CHAR, "',\""),
        (SLASH_SLASH_COMMENTS, "false"),
        (SLASH_STAR_COMMENTS, "false"),
        (WORD_CHARS, "65-122"),
    ]
    .into_iter()
    .collect()
}

/// Interpret a character code: decimal, then `0x`/`#` hex, then the
/// literal character. Negative numbers fall back to the literal character.
pub fn parse_char_code(code: &str) -> Option<u32> {
    let first = code.chars().next()?;
    match decode_integer(code) {
        Some(value) if value >= 0 => u32::try_from(value).ok(),
        _ => Some(first as u32),
    }
}

fn decode_integer(code: &str) -> Option<i64> {
    let (negative, digits) = match code.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, code.strip_prefix('+').unwrap_or(code)),
    };
    let hex = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .or_else(|| digits.strip_prefix('#'));
    let magnitude = match hex {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

fn char_codes(list: &str) -> impl Iterator<Item = u32> + '_ {
    list.split(',').filter_map(parse_char_code)
}

fn char_range(spec: &str) -> Option<(u32, u32)> {
    let (lo, hi) = spec.split_once('-')?;
    if hi.contains('-') {
        return None;
    }
    Some((parse_char_code(lo)?, parse_char_code(hi)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_char_code() {
        assert_eq!(parse_char_code("32"), Some(32));
        assert_eq!(parse_char_code("0x20"), Some(32));
        assert_eq!(parse_char_code("0X41"), Some(65));
        assert_eq!(parse_char_code("#40"), Some(64));
        assert_eq!(parse_char_code("_"), Some('_' as u32));
        assert_eq!(parse_char_code("'"), Some('\'' as u32));
        assert_eq!(parse_char_code(" "), Some(32));
        // Negative values fall back to the literal first character
        assert_eq!(parse_char_code("-5"), Some('-' as u32));
        assert_eq!(parse_char_code(""), None);
    }

    #[test]
    fn test_default_classes() {
        let classes = CharClassConfig::default();

        assert!(classes.eol_significant);
        assert!(classes.parse_numbers);
        assert!(!classes.lower_case_words);
        assert!(!classes.slash_slash_comments);
        assert!(!classes.slash_star_comments);

        assert!(classes.is_word('a'));
        assert!(classes.is_word('Z'));
        assert!(classes.is_word('é'));
        assert!(classes.is_word('λ'));
        // wordChars 65-122 is applied after ordinaryChar, so `_` is a word char
        assert!(classes.is_word('_'));
        assert!(classes.is_word('['));

        assert!(!classes.is_whitespace(' '));
        assert!(!classes.is_whitespace('\t'));
        assert!(classes.is_whitespace('\n'));

        assert!(classes.is_quote('"'));
        assert!(classes.is_quote('\''));
        assert!(classes.is_digit('7'));
        assert!(classes.is_numeric('.'));
        assert!(!classes.is_word('#'));
        assert!(!classes.is_word('/'));
    }

    #[test]
    fn test_overrides() {
        let props: Properties = [
            (WORD_CHAR, "#,@"),
            (ORDINARY_CHARS, "91-96"),
            (QUOTE_CHAR, "`"),
            (PARSE_NUMBERS, "false"),
            (LOWER_CASE_MODE, "true"),
            (SLASH_SLASH_COMMENTS, "true"),
        ]
        .into_iter()
        .collect();

        let classes = CharClassConfig::from_properties(&props);

        assert!(classes.is_word('#'));
        assert!(classes.is_word('@'));
        assert!(!classes.is_word('_'));
        assert!(classes.is_quote('`'));
        assert!(!classes.is_digit('1'));
        assert!(!classes.parse_numbers);
        assert!(classes.lower_case_words);
        assert!(classes.slash_slash_comments);
    }

    #[test]
    fn test_malformed_ranges_are_ignored() {
        let props: Properties = [(WHITESPACE_CHARS, "1-2-3"), (WORD_CHARS, "nonsense")]
            .into_iter()
            .collect();

        let classes = CharClassConfig::from_properties(&props);
        assert_eq!(classes, CharClassConfig::default());
    }

    #[test]
    fn test_range_beyond_table_is_clamped() {
        let mut classes = CharClassConfig::base();
        classes.whitespace_chars(250, 1000);
        assert!(classes.is_whitespace('\u{00ff}'));
        assert!(classes.is_word('\u{0100}'));
    }
}
