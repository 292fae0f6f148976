//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::{Program, Stmt},
        statements::BlockStmt,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements and expressions. It tracks the current position in
/// the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// A missing trailing `EOF` token is added so the cursor never runs off the end.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Tokens produced by the lexer
    /// * `file` - Name of the source file, shared with every position
    ///
    /// # Returns
    ///
    /// A parser positioned on the first token, with all lookup tables registered.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span {
                    start: end.clone(),
                    end,
                },
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The cursor stays on `EOF` once it gets there.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The kind the current token must have
    /// * `error` - Error to return instead of the default one on a mismatch
    ///
    /// # Returns
    ///
    /// The consumed token, or the error when the current token does not match.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The kind the current token must have
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedTokenDetailed` error at the current token.
    pub fn unexpected(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Binding power of the current token, `Default` when it has none.
    pub fn current_binding_power(&self) -> BindingPower {
        self.binding_power_lookup
            .get(&self.current_token_kind())
            .copied()
            .unwrap_or(BindingPower::Default)
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Prefix-only tokens get no binding power, so they end the expression
    /// to their left instead of being taken as an operator.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.binding_power_lookup.insert(kind, BindingPower::Default);
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the end of the previously consumed token.
    pub fn previous_end(&self) -> Position {
        if self.pos == 0 {
            Position(0, Rc::clone(&self.file))
        } else {
            self.tokens[self.pos - 1].span.end.clone()
        }
    }
}

/// Parses a stream of tokens into a [`Program`].
///
/// Top-level function definitions are collected in source order; every
/// other top-level statement goes into the program body.
///
/// # Arguments
///
/// * `tokens` - Tokens produced by the lexer, `EOF` terminated or not
/// * `file` - Name of the source file
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with state after parsing)
/// - Result containing either the Program or an Error
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<Program, Error>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file));
    create_token_lookups(&mut parser);

    let mut functions = vec![];
    let mut body = vec![];

    while parser.has_tokens() {
        match parse_stmt(&mut parser) {
            Ok(Stmt::FunctionDefinition(function)) => functions.push(function),
            Ok(stmt) => body.push(stmt),
            Err(error) => return (parser, Err(error)),
        }
    }

    let program = Ok(Program {
        functions,
        body: BlockStmt {
            body,
            span: Span {
                start: Position(0, Rc::clone(&file)),
                end: parser.get_position(),
            },
        },
    });

    (parser, program)
}
