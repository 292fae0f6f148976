//! Code generation module for the compiler.
//!
//! This module lowers the typed AST to WebAssembly text. It handles:
//!
//! - Expressions and statements as stack-machine instruction lines
//! - Local slot allocation and the per-function prologue
//! - Numeric conversions, explicit and implicit
//! - Host function imports and call-name resolution

pub mod compiler;
pub mod conversions;
pub mod expr;
pub mod slots;
pub mod stdlib;
pub mod stmt;

#[cfg(test)]
mod tests;
