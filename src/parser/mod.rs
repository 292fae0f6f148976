//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`Program`](crate::ast::ast::Program). It uses a Pratt parser for
//! expressions with proper operator precedence and handles:
//!
//! - Statement parsing (variable declarations, functions, control flow)
//! - Expression parsing (binary ops, calls, conversions, postfix updates)
//! - Type parsing for type annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
