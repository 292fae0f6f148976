use crate::Span;

use super::{
    expressions::{
        AssignmentExpr, BinaryExpr, CallExpr, ConversionExpr, LiteralExpr, PostfixExpr,
        PrefixExpr, SymbolExpr,
    },
    statements::{
        BlockStmt, ExpressionStmt, FnDeclStmt, ForStmt, IfStmt, PrintStmt, ReturnStmt,
        VarDeclStmt, WhileStmt,
    },
};

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Variable(SymbolExpr),
    Binary(BinaryExpr),
    Unary(PrefixExpr),
    Postfix(PostfixExpr),
    Assignment(AssignmentExpr),
    Conversion(ConversionExpr),
    Call(CallExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Variable(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Unary(expr) => &expr.span,
            Expr::Postfix(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::Conversion(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
        }
    }
}

/// Statement node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FunctionDefinition(FnDeclStmt),
    Let(VarDeclStmt),
    Assignment(AssignmentExpr),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Break(Span),
    Continue(Span),
    Return(ReturnStmt),
    Print(PrintStmt),
    Block(BlockStmt),
    Expression(ExpressionStmt),
    Call(CallExpr),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::FunctionDefinition(stmt) => &stmt.span,
            Stmt::Let(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Break(span) | Stmt::Continue(span) => span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Print(stmt) => &stmt.span,
            Stmt::Block(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Call(stmt) => &stmt.span,
        }
    }

    /// Wraps a parsed expression as a statement.
    ///
    /// Assignments and calls get their own statement kinds so the emitter knows
    /// whether a value is left behind.
    pub fn from_expression(expression: Expr) -> Stmt {
        match expression {
            Expr::Assignment(assignment) => Stmt::Assignment(assignment),
            Expr::Call(call) => Stmt::Call(call),
            expression => Stmt::Expression(ExpressionStmt {
                span: expression.get_span().clone(),
                expression,
            }),
        }
    }
}

/// A parsed program: its function definitions in source order, plus every
/// other top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub functions: Vec<FnDeclStmt>,
    pub body: BlockStmt,
}
