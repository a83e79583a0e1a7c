//! Data type descriptor parser
//!
//! This module transforms descriptor text into a tree of type nodes:
//! - [`lexer`]: Tokenization (source text → tokens, pulled one at a time)
//! - [`parse`]: Parser state, errors and the top-level parse loop
//! - `declarations`: The grammar (declarations, containers, sizes, modifiers)
//! - [`ast`]: Type node definitions
//!
//! # Supported Grammar
//!
//! - Scalars: any identifier, e.g. `INT64`, `STRING`, optionally sized: `STRING(10)`
//! - Containers: `STRUCT<name TYPE, ...>` and `RECORD<...>` hold named fields,
//!   `ARRAY<TYPE>` and `RANGE<TYPE>` hold a single element type; `(` `)` may
//!   be used instead of `<` `>`
//! - Modifiers after any type: `NOT NULL`, `PRIMARY KEY`
//! - Several declarations may follow one another in the same input
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with a single token of lookahead.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
pub mod lexer;
pub mod parse;
