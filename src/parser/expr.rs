use crate::{
    ast::{
        ast::Expr,
        expressions::{
            AssignmentExpr, BinaryExpr, BinaryOperator, CallExpr, ConversionExpr, LiteralExpr,
            PostfixExpr, PostfixOperator, PrefixExpr, SymbolExpr, UnaryOperator,
        },
        types::LiteralValue,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(handler) => *handler,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
                },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while parser.current_binding_power() > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(handler) => *handler,
            None => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ))
            }
        };

        let token_bp = parser.current_binding_power();
        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let text = parser.current_token().value.clone();
            let value = if text.contains('.') {
                text.parse::<f64>().ok().map(LiteralValue::Float)
            } else {
                text.parse::<i64>().ok().map(LiteralValue::Int)
            };

            match value {
                Some(value) => Ok(Expr::Literal(LiteralExpr {
                    value,
                    span: parser.advance().span.clone(),
                })),
                None => Err(Error::new(
                    ErrorImpl::NumberParseError { token: text },
                    parser.get_position(),
                )),
            }
        }
        TokenKind::True | TokenKind::False => {
            let value = i64::from(parser.current_token_kind() == TokenKind::True);
            Ok(Expr::Literal(LiteralExpr {
                value: LiteralValue::Int(value),
                span: parser.advance().span.clone(),
            }))
        }
        TokenKind::Identifier => Ok(Expr::Variable(SymbolExpr {
            value: parser.current_token().value.clone(),
            span: parser.advance().span.clone(),
        })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        )),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = BinaryOperator::from_token(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value.clone(),
            },
            operator_token.span.start.clone(),
        )
    })?;

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Dash => UnaryOperator::Negate,
        TokenKind::Not => UnaryOperator::Not,
        _ => UnaryOperator::Plus,
    };
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary(PrefixExpr {
        span: Span {
            start: operator_token.span.start.clone(),
            end: rhs.get_span().end.clone(),
        },
        operator,
        right_expr: Box::new(rhs),
    }))
}

/// Parses `target = value` and the compound forms.
///
/// The right-hand side is parsed below assignment strength so `a = b = c`
/// groups as `a = (b = c)`. `x += e` becomes `x = x + e`.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Comma)?;

    let span = Span {
        start: left.get_span().start.clone(),
        end: rhs.get_span().end.clone(),
    };

    let value = match BinaryOperator::from_token(operator_token.kind) {
        Some(operator) => Expr::Binary(BinaryExpr {
            left: Box::new(left.clone()),
            operator,
            right: Box::new(rhs),
            span: span.clone(),
        }),
        None => rhs,
    };

    Ok(Expr::Assignment(AssignmentExpr {
        span,
        value: Box::new(value),
        assignee: Box::new(left),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let callee = match left {
        Expr::Variable(symbol) => symbol,
        other => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: String::from("("),
                    message: String::from("only named functions can be called"),
                },
                other.get_span().start.clone(),
            ))
        }
    };

    parser.advance();

    let mut args = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Comma)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected("expected `,` or `)` in argument list"));
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: Span {
            start: callee.span.start.clone(),
            end: parser.previous_end(),
        },
        callee: callee.value,
        arguments: args,
    }))
}

pub fn parse_postfix_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = if operator_token.kind == TokenKind::PlusPlus {
        PostfixOperator::Increment
    } else {
        PostfixOperator::Decrement
    };

    let target = match left {
        Expr::Variable(symbol) => symbol,
        other => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: operator_token.value,
                    message: String::from("increment and decrement need a variable operand"),
                },
                other.get_span().start.clone(),
            ))
        }
    };

    Ok(Expr::Postfix(PostfixExpr {
        span: Span {
            start: target.span.start.clone(),
            end: operator_token.span.end.clone(),
        },
        operator,
        target,
    }))
}

/// Parses `expr as T`.
pub fn parse_conversion_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let to_type = parse_type(parser)?;

    Ok(Expr::Conversion(ConversionExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: parser.previous_end(),
        },
        expr: Box::new(left),
        from_type: None,
        to_type,
    }))
}
