//! Type annotation parsing.
//!
//! The language only names the four numeric types, so a type annotation is a
//! single identifier resolved against [`NumType::from_name`].

use crate::{
    ast::types::NumType,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Parses a type name such as `i32` or `f64`.
///
/// # Errors
///
/// `UnexpectedTokenDetailed` when the current token is not an identifier,
/// `UnknownType` when it does not name a numeric type.
pub fn parse_type(parser: &mut Parser) -> Result<NumType, Error> {
    let error = parser.unexpected("expected a type name");
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    NumType::from_name(&token.value).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnknownType {
                type_: token.value.clone(),
            },
            token.span.start.clone(),
        )
    })
}
