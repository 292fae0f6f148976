use crate::{
    ast::{
        ast::Stmt,
        statements::{
            BlockStmt, FnDeclStmt, ForStmt, IfStmt, Parameter, PrintStmt, ReturnStmt,
            VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()) {
        let handler = *handler;
        return handler(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::from_expression(expr))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    let error = parser.unexpected("expected identifier during variable declaration");
    let variable_name = parser
        .expect_error(TokenKind::Identifier, Some(error))?
        .value;

    let explicit_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let assigned_value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let error = parser.unexpected("expected `=` or `;` after variable name");
    parser.expect_error(TokenKind::Semicolon, Some(error))?;

    Ok(Stmt::Let(VarDeclStmt {
        span: Span {
            start: start_token.span.start.clone(),
            end: parser.previous_end(),
        },
        identifier: variable_name,
        assigned_value,
        explicit_type,
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body: Box::new(body),
        else_body,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let error = parser.unexpected("expected `{`");
    let start = parser
        .expect_error(TokenKind::OpenCurly, Some(error))?
        .span
        .start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected("unterminated block, expected `}`"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body: statements,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block(parser)?))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let error = parser.unexpected("expected function name");
    let identifier = parser
        .expect_error(TokenKind::Identifier, Some(error))?
        .value;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        let error = parser.unexpected("expected parameter name");
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

        let declared_type = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            Some(parse_type(parser)?)
        } else {
            None
        };

        parameters.push(Parameter {
            name: name.value,
            declared_type,
            span: Span {
                start: name.span.start,
                end: parser.previous_end(),
            },
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected("expected `,` or `)` in parameter list"));
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    Ok(Stmt::FunctionDefinition(FnDeclStmt {
        span: Span {
            start,
            end: parser.previous_end(),
        },
        identifier,
        parameters,
        return_type,
        body,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body: Box::new(body),
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

/// Parses `for (init; condition; step) body`. Every header part is optional.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;

    // `let` and expression statements consume their own `;`
    let init = if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
        None
    } else if parser.current_token_kind() == TokenKind::Let {
        Some(Box::new(parse_var_decl_stmt(parser)?))
    } else {
        let expr = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Semicolon)?;
        Some(Box::new(Stmt::from_expression(expr)))
    };

    let condition = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::Semicolon)?;

    let step = if parser.current_token_kind() != TokenKind::CloseParen {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(Stmt::For(ForStmt {
        init,
        condition,
        step,
        body: Box::new(body),
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Break(Span {
        start,
        end: parser.previous_end(),
    }))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Continue(Span {
        start,
        end: parser.previous_end(),
    }))
}

pub fn parse_print_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Print(PrintStmt {
        value,
        span: Span {
            start,
            end: parser.previous_end(),
        },
    }))
}
