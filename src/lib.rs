//! # Introduction
//!
//! dtp parses textual data type descriptors of the kind found in analytics
//! warehouses, such as
//! `STRUCT<a INT64, b ARRAY<STRUCT<c STRING(10) NOT NULL>>>`, into a tree of
//! [`TypeNode`]s suitable for code generation, schema validation or
//! documentation tooling.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → [TypeNode] → display (JSON / dotted paths)
//! ```
//!
//! 1. [`parser`] tokenises the source on demand and builds the tree by
//!    recursive descent with one token of lookahead.
//! 2. [`display`] renders a parsed tree as JSON or as a flat path listing.
//!
//! ```
//! let nodes = dtp::parse("STRUCT<id INT64 NOT NULL, tags ARRAY<STRING(16)>>").unwrap();
//!
//! assert_eq!(nodes[0].type_name(), "STRUCT");
//! assert_eq!(nodes[0].children()[0].name.as_deref(), Some("id"));
//! assert!(nodes[0].children()[0].is_not_null());
//! assert_eq!(nodes[0].children()[1].children()[0].size(), Some(16));
//! ```
//!
//! Parsing is all or nothing: malformed input yields a single [`ParseError`]
//! with its position, never a partial tree.

pub mod display;
pub mod parser;

pub use parser::ast::{Container, ContainerShape, Modifier, SourceLocation, TypeKind, TypeNode};
pub use parser::lexer::{LexError, Lexer, Token};
pub use parser::parse::{parse, parse_with, ErrorKind, ParseError, Parser, ParserConfig};
