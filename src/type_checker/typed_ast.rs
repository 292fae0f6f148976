//! Typed Abstract Syntax Tree definitions.
//!
//! This module contains the typed variants of AST nodes produced by
//! the type checker. Every typed expression carries the numeric type it
//! leaves on the stack, so the emitter never has to infer anything.
//!
//! The typed AST mirrors the structure of the untyped AST but:
//! - Expressions carry their resolved [`NumType`]
//! - Calls carry the parameter types they were checked against
//! - `while` and `for` both become [`TypedLoop`]
//! - Functions carry the storage type of every local they touch
//!
//! This typed AST is consumed by the code generator to produce module text.

use std::collections::HashMap;

use crate::{
    ast::{
        expressions::{BinaryOperator, PostfixOperator, UnaryOperator},
        types::{LiteralValue, NumType},
    },
    Span,
};

/// A checked expression and the type it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: NumType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExprKind {
    Literal(LiteralValue),
    Variable(String),
    Binary {
        left: Box<TypedExpr>,
        operator: BinaryOperator,
        right: Box<TypedExpr>,
        /// Type both operands are brought to before the operator runs.
        operand_type: NumType,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<TypedExpr>,
    },
    Postfix {
        operator: PostfixOperator,
        target: String,
    },
    Assignment {
        target: String,
        value: Box<TypedExpr>,
    },
    Conversion {
        expr: Box<TypedExpr>,
        from: NumType,
        to: NumType,
    },
    Call(TypedCall),
}

impl TypedExpr {
    pub fn new(kind: TypedExprKind, ty: NumType, span: Span) -> Self {
        TypedExpr { kind, ty, span }
    }
}

/// A checked call. Arguments are coerced to `parameter_types` at emission.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedCall {
    pub callee: String,
    pub arguments: Vec<TypedExpr>,
    pub parameter_types: Vec<NumType>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedBlock {
    pub body: Vec<TypedStmt>,
    pub span: Span,
}

impl TypedBlock {
    pub fn iter(&self) -> std::slice::Iter<'_, TypedStmt> {
        self.body.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lowered form shared by `while` and `for`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedLoop {
    pub init: Option<Box<TypedStmt>>,
    pub condition: Option<TypedExpr>,
    pub body: Box<TypedStmt>,
    pub step: Option<Box<TypedStmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    /// `let` binding. A missing value means the slot is zeroed at `ty`.
    Let {
        name: String,
        value: Option<TypedExpr>,
        ty: NumType,
        span: Span,
    },
    Assignment {
        target: String,
        value: TypedExpr,
        span: Span,
    },
    If {
        condition: TypedExpr,
        then_body: Box<TypedStmt>,
        else_body: Option<Box<TypedStmt>>,
        span: Span,
    },
    Loop(TypedLoop),
    Break(Span),
    Continue(Span),
    Return {
        value: Option<TypedExpr>,
        span: Span,
    },
    Print {
        value: TypedExpr,
        span: Span,
    },
    Block(TypedBlock),
    /// A value computed only for its side effects.
    Expression(TypedExpr),
    /// A call whose result, if any, is discarded.
    Call(TypedCall),
}

impl TypedStmt {
    /// True for a block with no statements; such an `else` is not emitted.
    pub fn is_empty_block(&self) -> bool {
        matches!(self, TypedStmt::Block(block) if block.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedParameter {
    pub name: String,
    pub ty: NumType,
}

/// A checked function.
///
/// `storage` maps every local name (parameters included) to the widest type
/// it holds anywhere in the body. That is the type of its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedFunction {
    pub name: String,
    pub parameters: Vec<TypedParameter>,
    pub result: Option<NumType>,
    pub body: TypedBlock,
    pub storage: HashMap<String, NumType>,
    pub span: Span,
}

/// User functions in source order plus the synthetic entry function.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedProgram {
    pub functions: Vec<TypedFunction>,
    pub entry: TypedFunction,
}

impl TypedProgram {
    pub fn find_function(&self, name: &str) -> Option<&TypedFunction> {
        self.functions
            .iter()
            .chain(std::iter::once(&self.entry))
            .find(|function| function.name == name)
    }
}
