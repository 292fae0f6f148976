//! Lexical scopes for the type checker.
//!
//! A [`Scope`] is copied on entry to every block, so nothing a block
//! declares or widens is visible once the block is done. Context flags
//! travel with the copy.

use std::collections::HashMap;

use crate::ast::types::NumType;

/// What the checker knows about a name at one point in the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub ty: NumType,
    /// Declared with an annotation, or a parameter. Assignments may not widen it.
    pub fixed: bool,
    /// Local the binding lives in. Differs from the source name when an
    /// earlier declaration in the same function already took that name.
    pub slot: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    variables: HashMap<String, Variable>,
    /// Set while checking a loop body.
    pub in_loop: bool,
    /// The function whose body is being checked. `None` at top level.
    pub function: Option<String>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// A fresh scope for the body of `function`.
    pub fn for_function(function: &str) -> Self {
        Scope {
            function: Some(function.to_string()),
            ..Scope::default()
        }
    }

    /// Copy of this scope for a nested block.
    pub fn child(&self) -> Self {
        self.clone()
    }

    /// Copy of this scope for a loop body.
    pub fn loop_body(&self) -> Self {
        Scope {
            in_loop: true,
            ..self.clone()
        }
    }

    /// Binds `name` to `slot` in this scope, replacing any earlier binding.
    pub fn declare(&mut self, name: &str, slot: &str, ty: NumType, fixed: bool) {
        self.variables.insert(
            name.to_string(),
            Variable {
                ty,
                fixed,
                slot: slot.to_string(),
            },
        );
    }

    /// Changes the type of an existing binding, keeping its fixedness.
    pub fn retype(&mut self, name: &str, ty: NumType) {
        if let Some(variable) = self.variables.get_mut(name) {
            variable.ty = ty;
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }
}
