//! Type checking and semantic analysis module.
//!
//! This module performs type checking and semantic analysis on the AST.
//! It transforms the untyped [`Program`](crate::ast::ast::Program) into a
//! [`TypedProgram`](typed_ast::TypedProgram) while:
//!
//! - Inferring and unifying the numeric type of every expression
//! - Resolving variable and function references
//! - Checking call arity and argument types
//! - Gating `break`, `continue` and `return` on their context
//! - Summarizing the storage type of every local per function
//!
//! Scopes are copied on block entry, so nothing declared or widened inside
//! a block leaks out of it.

pub mod scope;
pub mod type_checker;
pub mod typed_ast;
