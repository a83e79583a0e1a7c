//! Declaration parsing implementation
//!
//! This module holds the recursive descent grammar for type descriptors:
//!
//! - Declarations: an optional field name followed by a type expression
//! - Container expressions: `STRUCT<...>`, `ARRAY<...>`, `RANGE<...>`, `RECORD<...>`
//! - Scalar types with an optional size: `STRING(10)`
//! - Trailing modifiers: `NOT NULL`, `PRIMARY KEY`
//!
//! # Grammar
//!
//! ```text
//! declaration ::= IDENT type_expr | type_expr
//! type_expr   ::= CONTAINER open items close modifiers
//!               | IDENT size? modifiers
//! open/close  ::= "<" ">" | "(" ")"
//! items       ::= declaration ("," declaration)*     (STRUCT, RECORD)
//!               | type_expr                          (ARRAY, RANGE)
//! size        ::= "(" NUMBER ")"
//! modifiers   ::= (NOT NULL | PRIMARY KEY)*
//! ```
//!
//! An identifier is taken as a field name only when the token after it can
//! start a type: a container keyword, or an identifier that does not begin a
//! modifier. This is what lets `name STRING NOT NULL` and `STRING NOT NULL`
//! both parse with a single token of lookahead. Outside any container a line
//! break also ends the lookahead, so declarations listed one per line stay
//! separate.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};
use std::collections::BTreeSet;

impl Parser {
    /// Parse a declaration, attaching the field name if one is present
    pub(crate) fn parse_declaration(&mut self) -> Result<TypeNode, ParseError> {
        let Token::Ident(word, loc) = self.peek_token()? else {
            return self.parse_type_expr();
        };
        self.advance()?;

        if self.starts_named_type()? {
            let node = self.parse_type_expr()?;
            return Ok(node.with_name(word).at(loc));
        }

        self.parse_scalar(word, loc)
    }

    /// Whether the next token can begin the type of a named declaration
    fn starts_named_type(&mut self) -> Result<bool, ParseError> {
        if self.depth == 0 && self.line_break_ahead()? {
            return Ok(false);
        }

        Ok(match self.peek_token()? {
            Token::Container(..) => true,
            Token::Ident(word, _) => !self.is_modifier_start(&word),
            _ => false,
        })
    }

    /// Parse an unnamed type expression
    pub(crate) fn parse_type_expr(&mut self) -> Result<TypeNode, ParseError> {
        match self.advance()? {
            Token::Container(container, loc) => self.parse_container(container, loc),
            Token::Ident(type_name, loc) => self.parse_scalar(type_name, loc),
            other => Err(self.unexpected("type", &other)),
        }
    }

    /// Parse the optional size and modifiers following a scalar type name
    fn parse_scalar(
        &mut self,
        type_name: String,
        loc: SourceLocation,
    ) -> Result<TypeNode, ParseError> {
        let mut node = TypeNode::scalar(type_name).at(loc);

        if let Some(size) = self.parse_size()? {
            node = node.with_size(size);
        }
        node.modifiers = self.parse_modifiers()?;

        Ok(node)
    }

    /// Parse a container expression; the keyword is already consumed
    fn parse_container(
        &mut self,
        container: Container,
        loc: SourceLocation,
    ) -> Result<TypeNode, ParseError> {
        let close = match self.advance()? {
            Token::Lt(_) => Token::Gt(loc),
            Token::LParen(_) => Token::RParen(loc),
            other => {
                return Err(self.unexpected(&format!("'<' after {}", container), &other));
            }
        };

        if self.depth >= self.config.max_depth {
            return Err(ParseError::DepthExceeded {
                max_depth: self.config.max_depth,
                location: loc,
            });
        }

        self.depth += 1;
        let body = self.parse_container_body(container, loc, &close);
        self.depth -= 1;

        let mut node = body?.at(loc);
        node.modifiers = self.parse_modifiers()?;

        Ok(node)
    }

    /// Parse everything between the container's delimiters, including the
    /// closing one
    fn parse_container_body(
        &mut self,
        container: Container,
        loc: SourceLocation,
        close: &Token,
    ) -> Result<TypeNode, ParseError> {
        if self.check(close)? {
            return Err(ParseError::EmptyContainer {
                container,
                location: loc,
            });
        }

        let node = match container.shape() {
            ContainerShape::Fields => {
                TypeNode::structure(container, self.parse_field_list()?)
            }
            ContainerShape::Element => {
                TypeNode::array(container, self.parse_type_expr()?)
            }
        };

        self.expect_token(close, &format!("{} to close {}", close, container))?;

        Ok(node)
    }

    /// Parse comma separated declarations. Stops at the first token that is
    /// not a comma and leaves it for the caller.
    fn parse_field_list(&mut self) -> Result<Vec<TypeNode>, ParseError> {
        let mut fields = Vec::new();

        loop {
            fields.push(self.parse_declaration()?);

            if !self.match_token(&Token::Comma(SourceLocation::default()))? {
                break;
            }
        }

        Ok(fields)
    }

    /// Parse `( NUMBER )` if the next token opens a size
    fn parse_size(&mut self) -> Result<Option<u64>, ParseError> {
        if !self.match_token(&Token::LParen(SourceLocation::default()))? {
            return Ok(None);
        }

        let size = match self.advance()? {
            Token::Number(text, location) => text
                .parse::<u64>()
                .map_err(|_| ParseError::InvalidSize { text, location })?,
            Token::Ident(text, location) => {
                return Err(ParseError::InvalidSize { text, location });
            }
            other => return Err(self.unexpected("size", &other)),
        };

        self.expect_token(&Token::RParen(SourceLocation::default()), "')' after size")?;

        Ok(Some(size))
    }

    /// Collect trailing modifiers. Only complete patterns are accepted: once
    /// the leading word is consumed the trailing word is required.
    fn parse_modifiers(&mut self) -> Result<BTreeSet<Modifier>, ParseError> {
        let mut modifiers = BTreeSet::new();

        while let Token::Ident(word, _) = self.peek_token()? {
            let Some(&(trailing, modifier)) = self.modifier_table.get(word.as_str()) else {
                break;
            };
            self.advance()?;

            match self.advance()? {
                Token::Ident(ref next, _) if next == trailing => {
                    modifiers.insert(modifier);
                }
                other => {
                    return Err(
                        self.unexpected(&format!("'{}' after '{}'", trailing, word), &other)
                    );
                }
            }
        }

        Ok(modifiers)
    }
}
