//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::ast::types::NumType;
use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.src".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.kind(), ErrorKind::Syntax);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position().1.as_str(), "test.src");
}

#[test]
fn test_undeclared_name_error() {
    let error = Error::new(
        ErrorImpl::UndeclaredName {
            name: "foo".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "UndeclaredName");
    assert_eq!(error.kind(), ErrorKind::UndeclaredName);
    assert_eq!(error.get_tip().to_string(), "`foo` is not declared in this scope");
}

#[test]
fn test_context_violation_error() {
    let error = Error::new(
        ErrorImpl::ContextViolation {
            construct: "break",
            context: "a loop",
        },
        at(0),
    );

    assert_eq!(error.kind(), ErrorKind::ContextViolation);
    assert_eq!(error.get_impl().to_string(), "`break` outside of a loop");
}

#[test]
fn test_type_incompatibility_error() {
    let error = Error::new(
        ErrorImpl::TypeIncompatibility {
            expected: "i32".to_string(),
            received: "f64".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "TypeIncompatibility");
    assert_eq!(error.kind(), ErrorKind::TypeIncompatibility);
}

#[test]
fn test_signature_errors_share_a_kind() {
    let errors = [
        ErrorImpl::UnexpectedArguments {
            function: "f".to_string(),
            expected: 1,
            received: 2,
        },
        ErrorImpl::MissingArguments {
            function: "f".to_string(),
            expected: 3,
            received: 1,
        },
        ErrorImpl::ArgumentTypeMatchError {
            function: "f".to_string(),
            expected: NumType::I32,
            received: NumType::F64,
        },
        ErrorImpl::FunctionAlreadyDeclared {
            function: "f".to_string(),
        },
    ];

    for error in errors {
        assert_eq!(error.kind(), ErrorKind::ArityOrSignatureMismatch);
    }
}

#[test]
fn test_unsupported_conversion_error() {
    let error = Error::new(
        ErrorImpl::UnsupportedConversion {
            from: NumType::F64,
            to: NumType::I32,
        },
        at(0),
    );

    assert_eq!(error.kind(), ErrorKind::UnsupportedConversion);
    assert_eq!(error.to_string(), "UnsupportedConversion: unsupported conversion from f64 to i32");
}

#[test]
fn test_malformed_node_error() {
    let error = Error::new(
        ErrorImpl::MalformedNode {
            message: "assignment target is not a variable".to_string(),
        },
        at(0),
    );

    assert_eq!(error.kind(), ErrorKind::MalformedNode);
    assert_eq!(
        error.get_tip().to_string(),
        "assignment target is not a variable"
    );
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
