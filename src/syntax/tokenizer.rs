//! Character-class driven tokenizer
//!
//! Turns source text into a flat sequence of tokens. What counts as a
//! word, a quote, whitespace or an ordinary character is decided entirely
//! by a [`CharClassConfig`]; there is no grammar and no nesting.

use std::io::{ErrorKind, Read};

use super::charclass::CharClassConfig;

/// A token recognized in the source text
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Run of word characters
    Word(String),
    /// Quoted string, without its delimiters
    Quoted { delimiter: char, text: String },
    /// Line end (only when end-of-line is significant)
    EndOfLine,
    /// Run of ordinary spaces
    Space(usize),
    /// Ordinary tab character
    Tab,
    /// Any other single ordinary character
    Ordinary(char),
}

/// Tokenizer over an in-memory copy of the text
///
/// Supports one token of pushback and can be rewound to the start.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    classes: CharClassConfig,
    /// Line ends swallowed by a stripped block comment
    pending_eols: usize,
    last: Option<Token>,
    pushed_back: bool,
}

impl Tokenizer {
    pub fn new(text: &str, classes: CharClassConfig) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            classes,
            pending_eols: 0,
            last: None,
            pushed_back: false,
        }
    }

    /// Read all of `reader` and tokenize it
    ///
    /// A read error ends the input: whatever was read before it is kept.
    pub fn from_reader<R: Read>(mut reader: R, classes: CharClassConfig) -> Self {
        let mut bytes = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => bytes.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        Self::new(&String::from_utf8_lossy(&bytes), classes)
    }

    pub fn classes(&self) -> &CharClassConfig {
        &self.classes
    }

    /// Next token, or `None` once the input is exhausted
    pub fn next_token(&mut self) -> Option<Token> {
        if self.pushed_back {
            self.pushed_back = false;
            return self.last.clone();
        }
        let token = self.scan();
        self.last = token.clone();
        token
    }

    /// Return the most recent token again from the next `next_token` call
    pub fn push_back(&mut self) {
        if self.last.is_some() {
            self.pushed_back = true;
        }
    }

    /// Restart from the beginning of the text
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.pending_eols = 0;
        self.last = None;
        self.pushed_back = false;
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn scan(&mut self) -> Option<Token> {
        loop {
            if self.pending_eols > 0 {
                self.pending_eols -= 1;
                return Some(Token::EndOfLine);
            }

            let ch = self.peek(0)?;

            if ch == '/' {
                match self.peek(1) {
                    Some('/') if self.classes.slash_slash_comments => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some('*') if self.classes.slash_star_comments => {
                        self.skip_block_comment();
                        continue;
                    }
                    _ => {}
                }
            }

            if self.classes.is_whitespace(ch) {
                self.pos += 1;
                if ch == '\n' || ch == '\r' {
                    if ch == '\r' && self.peek(0) == Some('\n') {
                        self.pos += 1;
                    }
                    if self.classes.eol_significant {
                        return Some(Token::EndOfLine);
                    }
                }
                continue;
            }

            if self.starts_number() {
                return Some(self.scan_number());
            }
            if self.classes.is_word(ch) {
                return Some(self.scan_word());
            }
            if self.classes.is_quote(ch) {
                return Some(self.scan_quoted(ch));
            }

            self.pos += 1;
            return Some(match ch {
                ' ' => Token::Space(1),
                '\t' => Token::Tab,
                other => Token::Ordinary(other),
            });
        }
    }

    /// A digit, `.digit`, `-digit` or `-.digit` under number parsing
    fn starts_number(&self) -> bool {
        let digit_at = |offset: usize| self.peek(offset).is_some_and(|c| self.classes.is_digit(c));
        let dot_at = |offset: usize| {
            self.peek(offset) == Some('.') && self.classes.is_numeric('.') && digit_at(offset + 1)
        };

        match self.peek(0) {
            Some(c) if self.classes.is_digit(c) => true,
            Some('.') => dot_at(0),
            Some('-') if self.classes.is_numeric('-') => digit_at(1) || dot_at(1),
            _ => false,
        }
    }

    fn scan_number(&mut self) -> Token {
        let mut literal = String::new();
        if self.peek(0) == Some('-') {
            literal.push('-');
            self.pos += 1;
        }

        let mut seen_dot = false;
        while let Some(c) = self.peek(0) {
            if self.classes.is_digit(c) {
                literal.push(c);
            } else if c == '.' && !seen_dot && self.classes.is_numeric('.') {
                seen_dot = true;
                literal.push(c);
            } else {
                break;
            }
            self.pos += 1;
        }

        Token::Number(literal.parse().unwrap_or(0.0))
    }

    fn scan_word(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek(0) {
            // Like numbers, `.` and `-` continue a word once it has started
            if self.classes.is_word(c) || self.classes.is_numeric(c) {
                self.pos += 1;
            } else {
                break;
            }
        }

        let word: String = self.chars[start..self.pos].iter().collect();
        if self.classes.lower_case_words {
            Token::Word(word.to_lowercase())
        } else {
            Token::Word(word)
        }
    }

    /// Runs to the closing delimiter, the end of the line or the end of
    /// input. A backslash keeps the following character verbatim.
    fn scan_quoted(&mut self, delimiter: char) -> Token {
        self.pos += 1;
        let mut text = String::new();

        while let Some(c) = self.peek(0) {
            if c == delimiter {
                self.pos += 1;
                break;
            }
            if c == '\n' || c == '\r' {
                break;
            }
            text.push(c);
            self.pos += 1;
            if c == '\\' {
                if let Some(escaped) = self.peek(0).filter(|&e| e != '\n' && e != '\r') {
                    text.push(escaped);
                    self.pos += 1;
                }
            }
        }

        Token::Quoted { delimiter, text }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' || c == '\r' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        let mut line_ends = 0;

        while let Some(c) = self.peek(0) {
            if c == '*' && self.peek(1) == Some('/') {
                self.pos += 2;
                break;
            }
            if c == '\n' || (c == '\r' && self.peek(1) != Some('\n')) {
                line_ends += 1;
            }
            self.pos += 1;
        }

        if self.classes.eol_significant {
            self.pending_eols += line_ends;
        }
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Properties;
    use crate::syntax::charclass;

    fn tokens(text: &str) -> Vec<Token> {
        Tokenizer::new(text, CharClassConfig::default()).collect()
    }

    fn tokens_with(text: &str, overrides: &[(&str, &str)]) -> Vec<Token> {
        let props: Properties = overrides.iter().copied().collect();
        Tokenizer::new(text, CharClassConfig::from_properties(&props)).collect()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_basic_statement() {
        assert_eq!(
            tokens("select x1 from t;"),
            vec![
                word("select"),
                Token::Space(1),
                word("x1"),
                Token::Space(1),
                word("from"),
                Token::Space(1),
                word("t"),
                Token::Ordinary(';'),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokens("3.7"), vec![Token::Number(3.7)]);
        assert_eq!(tokens("-42"), vec![Token::Number(-42.0)]);
        assert_eq!(tokens(".5"), vec![Token::Number(0.5)]);
        assert_eq!(
            tokens("1.2.3"),
            vec![Token::Number(1.2), Token::Number(0.3)]
        );
        assert_eq!(tokens("3rd"), vec![Token::Number(3.0), word("rd")]);
    }

    #[test]
    fn test_words_continue_over_numeric_chars() {
        assert_eq!(tokens("a-b.c"), vec![word("a-b.c")]);
        assert_eq!(tokens("x-1"), vec![word("x-1")]);
        assert_eq!(
            tokens("System.out.println(x)"),
            vec![word("System.out.println"), Token::Ordinary('('), word("x"), Token::Ordinary(')')]
        );
    }

    #[test]
    fn test_lone_minus_and_dot_are_ordinary() {
        assert_eq!(
            tokens("- . -x"),
            vec![
                Token::Ordinary('-'),
                Token::Space(1),
                Token::Ordinary('.'),
                Token::Space(1),
                Token::Ordinary('-'),
                word("x"),
            ]
        );
    }

    #[test]
    fn test_words_split_on_numeric_chars_without_number_parsing() {
        assert_eq!(
            tokens_with("a.b", &[(charclass::PARSE_NUMBERS, "false")]),
            vec![word("a"), Token::Ordinary('.'), word("b")]
        );
    }

    #[test]
    fn test_classes_are_exposed() {
        let tokenizer = Tokenizer::new("", CharClassConfig::default());
        assert!(tokenizer.classes().is_word('a'));
        assert!(tokenizer.classes().is_numeric('-'));
    }

    #[test]
    fn test_numbers_disabled() {
        assert_eq!(
            tokens_with("x 12", &[(charclass::PARSE_NUMBERS, "false")]),
            vec![word("x"), Token::Space(1), Token::Ordinary('1'), Token::Ordinary('2')]
        );
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(
            tokens(r#"'it' "say \"hi\"""#),
            vec![
                Token::Quoted { delimiter: '\'', text: "it".to_string() },
                Token::Space(1),
                Token::Quoted { delimiter: '"', text: r#"say \"hi\""#.to_string() },
            ]
        );
    }

    #[test]
    fn test_unterminated_quote_stops_at_line_end() {
        assert_eq!(
            tokens("'open\nx"),
            vec![
                Token::Quoted { delimiter: '\'', text: "open".to_string() },
                Token::EndOfLine,
                word("x"),
            ]
        );
    }

    #[test]
    fn test_line_ends() {
        assert_eq!(
            tokens("a\r\nb\rc\nd"),
            vec![
                word("a"),
                Token::EndOfLine,
                word("b"),
                Token::EndOfLine,
                word("c"),
                Token::EndOfLine,
                word("d"),
            ]
        );
        assert_eq!(
            tokens_with("a\nb", &[(charclass::EOL_IS_SIGNIFICANT, "false")]),
            vec![word("a"), word("b")]
        );
    }

    #[test]
    fn test_tabs_and_symbols() {
        assert_eq!(
            tokens("\tx<=y"),
            vec![
                Token::Tab,
                word("x"),
                Token::Ordinary('<'),
                Token::Ordinary('='),
                word("y"),
            ]
        );
    }

    #[test]
    fn test_lower_case_mode() {
        assert_eq!(
            tokens_with("SELECT", &[(charclass::LOWER_CASE_MODE, "true")]),
            vec![word("select")]
        );
    }

    #[test]
    fn test_comments_kept_by_default() {
        assert_eq!(
            tokens("a//b"),
            vec![word("a"), Token::Ordinary('/'), Token::Ordinary('/'), word("b")]
        );
    }

    #[test]
    fn test_comment_stripping() {
        let overrides = [
            (charclass::SLASH_SLASH_COMMENTS, "true"),
            (charclass::SLASH_STAR_COMMENTS, "true"),
        ];
        assert_eq!(
            tokens_with("a // note\nb /* one\ntwo */ c", &overrides),
            vec![
                word("a"),
                Token::Space(1),
                Token::EndOfLine,
                word("b"),
                Token::Space(1),
                Token::EndOfLine,
                Token::Space(1),
                word("c"),
            ]
        );
    }

    #[test]
    fn test_push_back_returns_token_once() {
        let mut tokenizer = Tokenizer::new("a b", CharClassConfig::default());
        assert_eq!(tokenizer.next_token(), Some(word("a")));
        tokenizer.push_back();
        assert_eq!(tokenizer.next_token(), Some(word("a")));
        assert_eq!(tokenizer.next_token(), Some(Token::Space(1)));
        assert_eq!(tokenizer.next_token(), Some(word("b")));
        assert_eq!(tokenizer.next_token(), None);
        tokenizer.push_back();
        assert_eq!(tokenizer.next_token(), None);
    }

    #[test]
    fn test_rewind() {
        let mut tokenizer = Tokenizer::new("x y", CharClassConfig::default());
        let first: Vec<Token> = tokenizer.by_ref().collect();
        tokenizer.rewind();
        let second: Vec<Token> = tokenizer.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.served {
                return Err(std::io::Error::new(ErrorKind::Other, "disk gone"));
            }
            self.served = true;
            let data = b"ok 1";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn test_read_failure_ends_input() {
        let tokenizer = Tokenizer::from_reader(FailingReader { served: false }, CharClassConfig::default());
        let all: Vec<Token> = tokenizer.collect();
        assert_eq!(all, vec![word("ok"), Token::Space(1), Token::Number(1.0)]);
    }
}
