use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::NumType, Position};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        self.internal_error.kind()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::UndeclaredName { .. } => "UndeclaredName",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::ContextViolation { .. } => "ContextViolation",
            ErrorImpl::TypeIncompatibility { .. } => "TypeIncompatibility",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::MalformedNode { .. } => "MalformedNode",
            ErrorImpl::UnsupportedConversion { .. } => "UnsupportedConversion",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnknownType { type_ } => ErrorTip::Suggestion(format!(
                "Unknown type `{}`, expected one of i32, i64, f32, f64",
                type_
            )),
            ErrorImpl::UndeclaredName { name } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in this scope", name))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::ContextViolation { construct, context } => {
                ErrorTip::Suggestion(format!("`{}` is only allowed inside {}", construct, context))
            }
            ErrorImpl::TypeIncompatibility { expected, received } => ErrorTip::Suggestion(
                format!("Expected type `{}`, received `{}`", expected, received),
            ),
            ErrorImpl::UnexpectedArguments {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::MissingArguments {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expected argument type `{}`, received `{}`",
                function, expected, received
            )),
            ErrorImpl::MalformedNode { message } => ErrorTip::Suggestion(message.clone()),
            ErrorImpl::UnsupportedConversion { from, to } => ErrorTip::Suggestion(format!(
                "No conversion from `{}` to `{}`",
                from, to
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.get_error_name(), self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// Error taxonomy surfaced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    UndeclaredName,
    ContextViolation,
    TypeIncompatibility,
    ArityOrSignatureMismatch,
    MalformedNode,
    UnsupportedConversion,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("name {name:?} not declared")]
    UndeclaredName { name: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("`{construct}` outside of {context}")]
    ContextViolation {
        construct: &'static str,
        context: &'static str,
    },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeIncompatibility { expected: String, received: String },
    #[error("unexpected arguments to {function:?}: expected {expected}, received {received}")]
    UnexpectedArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("missing arguments to {function:?}: expected {expected}, received {received}")]
    MissingArguments {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("argument types of {function:?} do not match: expected {expected}, received {received}")]
    ArgumentTypeMatchError {
        function: String,
        expected: NumType,
        received: NumType,
    },
    #[error("malformed node: {message}")]
    MalformedNode { message: String },
    #[error("unsupported conversion from {from} to {to}")]
    UnsupportedConversion { from: NumType, to: NumType },
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::UnknownType { .. } => ErrorKind::Syntax,
            ErrorImpl::UndeclaredName { .. } => ErrorKind::UndeclaredName,
            ErrorImpl::ContextViolation { .. } => ErrorKind::ContextViolation,
            ErrorImpl::TypeIncompatibility { .. } => ErrorKind::TypeIncompatibility,
            ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. } => ErrorKind::ArityOrSignatureMismatch,
            ErrorImpl::MalformedNode { .. } => ErrorKind::MalformedNode,
            ErrorImpl::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
        }
    }
}
