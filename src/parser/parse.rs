//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, configuration, token-cursor helpers and the main
//! parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser pulls tokens from the [`Lexer`] on demand and keeps a single
//! slot of lookahead: [`Parser::peek_token`] fills the slot, and
//! [`Parser::advance`] drains it. Newline tokens are dropped before they
//! reach the slot; the parser only remembers whether one was skipped, which
//! separates top-level declarations written on their own lines.
//!
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: the recursive descent grammar itself
//!
//! # Implementation
//!
//! Grammar methods live in `declarations.rs` as a separate `impl Parser`
//! block with access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use log::{debug, trace, warn};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Default bound on container nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling on [`ParserConfig::max_depth`]. Larger settings are clamped
/// to it, keeping recursion well inside the main thread's stack.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Broad category of a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character the lexer has no token for
    Lexical,
    /// A required delimiter or sub-expression is missing
    Structural,
    /// A size literal is not a valid integer
    Numeric,
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(
        "Parse error at line {}, column {}: expected {expected}, found {found}",
        .location.line,
        .location.column
    )]
    Unexpected {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error(
        "Parse error at line {}, column {}: {container} must contain at least one type",
        .location.line,
        .location.column
    )]
    EmptyContainer {
        container: Container,
        location: SourceLocation,
    },

    #[error(
        "Parse error at line {}, column {}: size '{text}' is not a valid integer",
        .location.line,
        .location.column
    )]
    InvalidSize {
        text: String,
        location: SourceLocation,
    },

    #[error(
        "Parse error at line {}, column {}: types nested deeper than {max_depth} levels",
        .location.line,
        .location.column
    )]
    DepthExceeded {
        max_depth: usize,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lex(_) => ErrorKind::Lexical,
            ParseError::InvalidSize { .. } => ErrorKind::Numeric,
            ParseError::Unexpected { .. }
            | ParseError::EmptyContainer { .. }
            | ParseError::DepthExceeded { .. } => ErrorKind::Structural,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Lex(err) => err.location,
            ParseError::Unexpected { location, .. }
            | ParseError::EmptyContainer { location, .. }
            | ParseError::InvalidSize { location, .. }
            | ParseError::DepthExceeded { location, .. } => *location,
        }
    }
}

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Accept characters the lexer does not recognise instead of failing.
    /// See [`Lexer::lenient`].
    pub lenient: bool,
    /// Maximum container nesting depth, at most [`MAX_DEPTH_LIMIT`]
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lenient: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Recursive descent parser for data type descriptors
pub struct Parser {
    lexer: Lexer,
    lookahead: Option<Token>,
    // a newline preceded the token in `lookahead`
    line_break: bool,
    // leading word -> (trailing word, modifier)
    pub(crate) modifier_table: FxHashMap<&'static str, (&'static str, Modifier)>,
    pub(crate) config: ParserConfig,
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::with_config(source, ParserConfig::default())
    }

    pub fn with_config(source: &str, mut config: ParserConfig) -> Self {
        if config.max_depth > MAX_DEPTH_LIMIT {
            warn!(
                "max depth {} exceeds the limit of {}, clamping",
                config.max_depth, MAX_DEPTH_LIMIT
            );
            config.max_depth = MAX_DEPTH_LIMIT;
        }

        let modifier_table = Modifier::ALL
            .iter()
            .map(|&modifier| {
                let (leading, trailing) = modifier.keywords();
                (leading, (trailing, modifier))
            })
            .collect();

        Self {
            lexer: Lexer::new(source).lenient(config.lenient),
            lookahead: None,
            line_break: false,
            modifier_table,
            config,
            depth: 0,
        }
    }

    /// Parse every top-level declaration until the input is exhausted.
    ///
    /// Either the whole input parses or nothing is returned.
    pub fn parse(&mut self) -> Result<Vec<TypeNode>, ParseError> {
        let mut nodes = Vec::new();

        while !self.is_at_end()? {
            let node = self.parse_declaration()?;
            debug!(
                "parsed top-level {} declaration at line {}, column {}",
                node.type_name(),
                node.location.line,
                node.location.column
            );
            nodes.push(node);
        }

        Ok(nodes)
    }

    // ===== Helper methods =====

    /// Next token that is not a newline, straight from the lexer
    fn next_significant(&mut self) -> Result<Token, ParseError> {
        self.line_break = false;
        loop {
            match self.lexer.next_token()? {
                Token::Newline(_) => self.line_break = true,
                token => return Ok(token),
            }
        }
    }

    pub(crate) fn peek_token(&mut self) -> Result<Token, ParseError> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.next_significant()?,
        };
        self.lookahead = Some(token.clone());
        Ok(token)
    }

    /// Whether a line break separates the next token from the previous one
    pub(crate) fn line_break_ahead(&mut self) -> Result<bool, ParseError> {
        self.peek_token()?;
        Ok(self.line_break)
    }

    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.next_significant()?,
        };
        trace!("consumed {} at offset {}", token, token.location().offset);
        Ok(token)
    }

    pub(crate) fn check(&mut self, token: &Token) -> Result<bool, ParseError> {
        Ok(std::mem::discriminant(&self.peek_token()?) == std::mem::discriminant(token))
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> Result<bool, ParseError> {
        if self.check(token)? {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        token: &Token,
        expected: &str,
    ) -> Result<Token, ParseError> {
        if self.check(token)? {
            self.advance()
        } else {
            let found = self.peek_token()?;
            Err(self.unexpected(expected, &found))
        }
    }

    pub(crate) fn is_at_end(&mut self) -> Result<bool, ParseError> {
        Ok(matches!(self.peek_token()?, Token::Eof(_)))
    }

    pub(crate) fn is_modifier_start(&self, word: &str) -> bool {
        self.modifier_table.contains_key(word)
    }

    pub(crate) fn unexpected(&self, expected: &str, found: &Token) -> ParseError {
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: found.to_string(),
            location: found.location(),
        }
    }
}

/// Parse `source` with the default configuration.
pub fn parse(source: &str) -> Result<Vec<TypeNode>, ParseError> {
    Parser::new(source).parse()
}

/// Parse `source` with an explicit configuration.
pub fn parse_with(source: &str, config: ParserConfig) -> Result<Vec<TypeNode>, ParseError> {
    Parser::with_config(source, config).parse()
}
