//! Lexer (tokenizer) for data type descriptors
//!
//! Converts raw descriptor text into [`Token`]s, one at a time, on demand.
//! The lexer knows nothing about the grammar: it only classifies lexemes as
//! numbers, container keywords or plain identifiers, and recognises the
//! handful of punctuation characters the grammar uses.

use super::ast::{Container, SourceLocation};
use log::warn;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate position without a separate token→location table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Lexemes
    Ident(String, SourceLocation),
    Number(String, SourceLocation),
    Container(Container, SourceLocation),

    // Punctuation
    Lt(SourceLocation),      // <
    Gt(SourceLocation),      // >
    LParen(SourceLocation),  // (
    RParen(SourceLocation),  // )
    Comma(SourceLocation),   // ,
    Newline(SourceLocation), // \n

    // End of input
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Ident(_, loc)
            | Token::Number(_, loc)
            | Token::Container(_, loc)
            | Token::Lt(loc)
            | Token::Gt(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::Comma(loc)
            | Token::Newline(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// Raw lexeme for identifiers, numbers and keywords; empty for punctuation.
    pub fn text(&self) -> &str {
        match self {
            Token::Ident(s, _) | Token::Number(s, _) => s,
            Token::Container(c, _) => c.keyword(),
            _ => "",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Number(s, _) => write!(f, "number {}", s),
            Token::Container(c, _) => write!(f, "'{}'", c),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Newline(_) => write!(f, "newline"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// A character the lexer has no token for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Lexer error at line {}, column {}: unexpected character {ch:?}",
    .location.line,
    .location.column
)]
pub struct LexError {
    pub ch: char,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    position: usize,
    offset: usize,
    line: usize,
    column: usize,
}

/// Lexer for data type descriptors
pub struct Lexer {
    input: Vec<char>,
    cursor: Cursor,
    lenient: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            cursor: Cursor {
                position: 0,
                offset: 0,
                line: 1,
                column: 1,
            },
            lenient: false,
        }
    }

    /// Accept unrecognised characters (with a warning) instead of failing.
    ///
    /// A stray character between tokens is skipped. One that follows a
    /// lexeme character is kept as part of that lexeme, so `my-col` stays
    /// a single identifier rather than splitting into `my` and `col`.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Tokenize the entire input. The last token is always [`Token::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = matches!(token, Token::Eof(_));
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(tokens)
    }

    /// Consume and return the next token. Once the input is exhausted every
    /// call returns [`Token::Eof`].
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            self.skip_whitespace();

            let loc = self.current_location();
            let Some(ch) = self.advance() else {
                return Ok(Token::Eof(loc));
            };

            let token = match ch {
                ',' => Token::Comma(loc),
                '<' => Token::Lt(loc),
                '>' => Token::Gt(loc),
                '(' => Token::LParen(loc),
                ')' => Token::RParen(loc),
                '\n' => Token::Newline(loc),
                c if is_lexeme_char(c) => self.lexeme(c, loc),
                _ if self.lenient => {
                    warn!(
                        "skipping unexpected character {:?} at line {}, column {}",
                        ch, loc.line, loc.column
                    );
                    continue;
                }
                _ => {
                    return Err(LexError {
                        ch,
                        location: loc,
                    })
                }
            };

            return Ok(token);
        }
    }

    /// Return what [`Lexer::next_token`] would, without moving the cursor.
    pub fn peek(&mut self) -> Result<Token, LexError> {
        let saved = self.cursor;
        let token = self.next_token();
        self.cursor = saved;
        token
    }

    /// Scan the rest of a lexeme and classify it
    fn lexeme(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut text = String::new();
        text.push(first_char);

        while let Some(ch) = self.peek_char() {
            if !is_lexeme_char(ch) {
                if !self.lenient || is_delimiter(ch) {
                    break;
                }
                let at = self.current_location();
                warn!(
                    "keeping unexpected character {:?} at line {}, column {} in lexeme starting at column {}",
                    ch, at.line, at.column, loc.column
                );
            }
            text.push(ch);
            self.advance();
        }

        if text.bytes().all(|b| b.is_ascii_digit()) {
            return Token::Number(text, loc);
        }

        match Container::from_keyword(&text) {
            Some(container) => Token::Container(container, loc),
            None => Token::Ident(text, loc),
        }
    }

    /// Skip whitespace other than newlines, which are tokens of their own
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' || !ch.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.cursor.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.cursor.position += 1;
        self.cursor.offset += ch.len_utf8();

        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }

        Some(ch)
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.cursor.line, self.cursor.column, self.cursor.offset)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token::Eof(_)) => None,
            other => Some(other),
        }
    }
}

fn is_lexeme_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Characters that end a lexeme even in lenient mode
fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, ',' | '<' | '>' | '(' | ')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("STRUCT<id INT64, name STRING(10)>");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Container(Container::Struct, _)));
        assert!(matches!(tokens[1], Token::Lt(_)));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "id"));
        assert!(matches!(tokens[3], Token::Ident(ref s, _) if s == "INT64"));
        assert!(matches!(tokens[4], Token::Comma(_)));
        assert!(matches!(tokens[5], Token::Ident(ref s, _) if s == "name"));
        assert!(matches!(tokens[6], Token::Ident(ref s, _) if s == "STRING"));
        assert!(matches!(tokens[7], Token::LParen(_)));
        assert!(matches!(tokens[8], Token::Number(ref s, _) if s == "10"));
        assert!(matches!(tokens[9], Token::RParen(_)));
        assert!(matches!(tokens[10], Token::Gt(_)));
        assert!(matches!(tokens[11], Token::Eof(_)));
        assert_eq!(tokens.len(), 12);
    }

    #[test]
    fn test_lexeme_classification() {
        let mut lexer = Lexer::new("42 10abc ARRAY RANGE RECORD array _x1 NOT");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Number(ref s, _) if s == "42"));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "10abc"));
        assert!(matches!(tokens[2], Token::Container(Container::Array, _)));
        assert!(matches!(tokens[3], Token::Container(Container::Range, _)));
        assert!(matches!(tokens[4], Token::Container(Container::Record, _)));
        assert!(matches!(tokens[5], Token::Ident(ref s, _) if s == "array"));
        assert!(matches!(tokens[6], Token::Ident(ref s, _) if s == "_x1"));
        assert!(matches!(tokens[7], Token::Ident(ref s, _) if s == "NOT"));
    }

    #[test]
    fn test_token_text() {
        let mut lexer = Lexer::new("STRUCT a 7 ,");
        let tokens = lexer.tokenize().unwrap();
        let texts: Vec<&str> = tokens.iter().map(Token::text).collect();
        assert_eq!(texts, vec!["STRUCT", "a", "7", "", ""]);
    }

    #[test]
    fn test_newlines_and_locations() {
        let mut lexer = Lexer::new("a\tINT\n  b");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[0].location(), SourceLocation::new(1, 1, 0));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "INT"));
        assert_eq!(tokens[1].location(), SourceLocation::new(1, 3, 2));
        assert!(matches!(tokens[2], Token::Newline(_)));
        assert_eq!(tokens[3].location(), SourceLocation::new(2, 3, 8));
        assert!(matches!(tokens[4], Token::Eof(_)));
    }

    #[test]
    fn test_offsets_count_bytes() {
        let mut lexer = Lexer::new("naïve INT");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "naïve"));
        assert_eq!(tokens[1].location(), SourceLocation::new(1, 7, 7));
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut lexer = Lexer::new("  INT NOT");

        let first = lexer.peek().unwrap();
        assert_eq!(lexer.peek().unwrap(), first);
        assert_eq!(lexer.peek().unwrap(), first);
        assert_eq!(lexer.next_token().unwrap(), first);
        assert!(matches!(lexer.next_token().unwrap(), Token::Ident(ref s, _) if s == "NOT"));
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("   ");
        assert!(matches!(lexer.next_token().unwrap(), Token::Eof(_)));
        assert!(matches!(lexer.next_token().unwrap(), Token::Eof(_)));
        assert!(matches!(lexer.peek().unwrap(), Token::Eof(_)));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("STRUCT<a INT; b INT>");
        let err = lexer.tokenize().unwrap_err();

        assert_eq!(err.ch, ';');
        assert_eq!(err.location, SourceLocation::new(1, 13, 12));
        assert_eq!(
            err.to_string(),
            "Lexer error at line 1, column 13: unexpected character ';'"
        );
    }

    #[test]
    fn test_lenient_skips_unexpected_characters() {
        let mut lexer = Lexer::new("a $ INT ;").lenient(true);
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens.len(), 3);
        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "a"));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "INT"));
        assert!(matches!(tokens[2], Token::Eof(_)));
    }

    #[test]
    fn test_lenient_keeps_identifier_whole() {
        let mut lexer = Lexer::new("my-col INT,x.y>").lenient(true);
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, ref l) if s == "my-col" && l.column == 1));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "INT"));
        assert!(matches!(tokens[2], Token::Comma(_)));
        assert!(matches!(tokens[3], Token::Ident(ref s, _) if s == "x.y"));
        assert!(matches!(tokens[4], Token::Gt(_)));
        assert!(matches!(tokens[5], Token::Eof(_)));
    }

    #[test]
    fn test_strict_rejects_character_inside_identifier() {
        let err = Lexer::new("my-col INT").tokenize().unwrap_err();
        assert_eq!(err.ch, '-');
        assert_eq!(err.location, SourceLocation::new(1, 3, 2));
    }

    #[test]
    fn test_iterator_stops_before_eof() {
        let tokens: Result<Vec<Token>, LexError> = Lexer::new("ARRAY<INT>").collect();
        let tokens = tokens.unwrap();

        assert_eq!(tokens.len(), 4);
        assert!(matches!(tokens[3], Token::Gt(_)));
    }
}
