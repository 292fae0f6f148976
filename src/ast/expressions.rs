use crate::{lexer::tokens::TokenKind, Span};

use super::{
    ast::Expr,
    types::{LiteralValue, NumType},
};

// LITERALS

/// Literal Expression
/// Represents a numeric literal in the AST. `true` and `false` parse to `1` and `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: LiteralValue,
    pub span: Span,
}

/// Symbol Expression
/// Represents a variable reference in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

// COMPLEX

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus | TokenKind::PlusEquals => BinaryOperator::Add,
            TokenKind::Dash | TokenKind::MinusEquals => BinaryOperator::Subtract,
            TokenKind::Star | TokenKind::StarEquals => BinaryOperator::Multiply,
            TokenKind::Slash | TokenKind::SlashEquals => BinaryOperator::Divide,
            TokenKind::Percent => BinaryOperator::Remainder,
            TokenKind::Equals => BinaryOperator::Equals,
            TokenKind::NotEquals => BinaryOperator::NotEquals,
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::LessEquals => BinaryOperator::LessEquals,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::GreaterEquals => BinaryOperator::GreaterEquals,
            TokenKind::And => BinaryOperator::And,
            TokenKind::Or => BinaryOperator::Or,
            _ => return None,
        })
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Remainder
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Equals
                | BinaryOperator::NotEquals
                | BinaryOperator::Less
                | BinaryOperator::LessEquals
                | BinaryOperator::Greater
                | BinaryOperator::GreaterEquals
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

/// Binary Expression
/// Represents a binary operation between two expressions in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOperator,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
    Not,
}

/// Prefix Expression
/// Represents `-x`, `+x` and `!x`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: UnaryOperator,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOperator {
    Increment,
    Decrement,
}

/// Postfix Expression
/// Represents `x++` and `x--`. The operand is always a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpr {
    pub operator: PostfixOperator,
    pub target: SymbolExpr,
    pub span: Span,
}

/// Assignment Expression
/// Represents `target = value`. Compound operators are desugared by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub assignee: Box<Expr>,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Conversion Expression
/// Represents `expr as T`. `from_type` is only set by passes that already know
/// the source type.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionExpr {
    pub expr: Box<Expr>,
    pub from_type: Option<NumType>,
    pub to_type: NumType,
    pub span: Span,
}

/// Call Expression
/// Represents a call to a named function.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}
