use crate::Span;

use super::{
    ast::{Expr, Stmt},
    types::NumType,
};

/// Expression Statement
/// An expression evaluated for its side effects; its value is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

/// Block Statement
/// A braced list of statements with its own scope.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.body.iter()
    }
}

/// Variable Declaration Statement
/// `let name[: T] [= value];`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifier: String,
    pub explicit_type: Option<NumType>,
    pub assigned_value: Option<Expr>,
    pub span: Span,
}

/// If Statement
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
    pub span: Span,
}

/// While Statement
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// For Statement
/// `for (init; condition; step) body`, every header part optional.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub step: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// Return Statement
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Print Statement
/// Lowered to the host print function matching the value's type.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStmt {
    pub value: Expr,
    pub span: Span,
}

/// A function parameter. Untyped parameters default to `i32`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub declared_type: Option<NumType>,
    pub span: Span,
}

/// Function Declaration Statement
#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub identifier: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<NumType>,
    pub body: BlockStmt,
    pub span: Span,
}
