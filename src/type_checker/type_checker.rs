use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Expr, Program, Stmt},
        expressions::{AssignmentExpr, BinaryOperator, CallExpr, UnaryOperator},
        statements::{BlockStmt, FnDeclStmt, ForStmt, ReturnStmt, VarDeclStmt},
        types::{unify, unify_for_assignment, LiteralValue, NumType},
    },
    compiler::stdlib::HOST_FUNCTIONS,
    errors::errors::{Error, ErrorImpl},
    options::{is_identifier, CompileOptions},
    Position, Span,
};

use super::{
    scope::Scope,
    typed_ast::{
        TypedBlock, TypedCall, TypedExpr, TypedExprKind, TypedFunction, TypedLoop,
        TypedParameter, TypedProgram, TypedStmt,
    },
};

/// What callers know about a function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub parameters: Vec<NumType>,
    pub result: Option<NumType>,
    /// Declared with `-> T`, provided by the host, or pinned by an earlier call.
    pub result_fixed: bool,
    /// The body has been fully checked.
    pub checked: bool,
}

#[derive(Debug)]
pub struct TypeChecker {
    pub functions: HashMap<String, FunctionSignature>,
    /// Widest type each local of the current function takes.
    pub storage: HashMap<String, NumType>,
    /// Storage types from the previous pass over the current function.
    read_types: HashMap<String, NumType>,
    /// How many times each name has been declared in the current function.
    declarations: HashMap<String, usize>,
    /// A bare `return;` was seen in the current function.
    bare_return: bool,
    /// A `return e;` was seen in the current function.
    valued_return: bool,
    auto_declare: bool,
    entry_name: String,
}

fn type_mismatch(expected: impl ToString, received: impl ToString, span: &Span) -> Error {
    Error::new(
        ErrorImpl::TypeIncompatibility {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        span.start.clone(),
    )
}

impl TypeChecker {
    pub fn new(options: &CompileOptions) -> Self {
        let functions = HOST_FUNCTIONS
            .iter()
            .map(|host| {
                (
                    host.name.to_string(),
                    FunctionSignature {
                        parameters: host.parameters.clone(),
                        result: host.result,
                        result_fixed: true,
                        checked: true,
                    },
                )
            })
            .collect();

        TypeChecker {
            functions,
            storage: HashMap::new(),
            read_types: HashMap::new(),
            declarations: HashMap::new(),
            bare_return: false,
            valued_return: false,
            auto_declare: options.auto_declare,
            entry_name: options.entry_name.clone(),
        }
    }

    /// Registers every user function so bodies can call forward and recurse.
    pub fn collect_signatures(&mut self, functions: &[FnDeclStmt]) -> Result<(), Error> {
        for function in functions {
            let taken_by_host = HOST_FUNCTIONS
                .iter()
                .any(|host| host.target.trim_start_matches('$') == function.identifier);

            if self.functions.contains_key(&function.identifier)
                || function.identifier == self.entry_name
                || taken_by_host
            {
                return Err(Error::new(
                    ErrorImpl::FunctionAlreadyDeclared {
                        function: function.identifier.clone(),
                    },
                    function.span.start.clone(),
                ));
            }

            for (index, parameter) in function.parameters.iter().enumerate() {
                if function.parameters[..index]
                    .iter()
                    .any(|earlier| earlier.name == parameter.name)
                {
                    return Err(Error::new(
                        ErrorImpl::MalformedNode {
                            message: format!(
                                "parameter `{}` of `{}` is declared twice",
                                parameter.name, function.identifier
                            ),
                        },
                        parameter.span.start.clone(),
                    ));
                }
            }

            self.functions.insert(
                function.identifier.clone(),
                FunctionSignature {
                    parameters: function
                        .parameters
                        .iter()
                        .map(|parameter| parameter.declared_type.unwrap_or(NumType::I32))
                        .collect(),
                    result: function.return_type,
                    result_fixed: function.return_type.is_some(),
                    checked: false,
                },
            );
        }

        Ok(())
    }

    /// Checks one user function.
    ///
    /// The body is re-checked until the storage summary stops changing, so
    /// every read in the final tree is typed at the slot's storage type.
    pub fn check_function(&mut self, function: &FnDeclStmt) -> Result<TypedFunction, Error> {
        log::debug!("checking function `{}`", function.identifier);

        let parameters: Vec<TypedParameter> = function
            .parameters
            .iter()
            .map(|parameter| TypedParameter {
                name: parameter.name.clone(),
                ty: parameter.declared_type.unwrap_or(NumType::I32),
            })
            .collect();

        let body = self.check_until_stable(&function.body, &parameters, || {
            Scope::for_function(&function.identifier)
        })?;
        let valued_return = self.valued_return;

        let signature = self
            .functions
            .get_mut(&function.identifier)
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndeclaredName {
                        name: function.identifier.clone(),
                    },
                    function.span.start.clone(),
                )
            })?;
        signature.checked = true;

        if let (None, Some(result), false) =
            (function.return_type, signature.result, valued_return)
        {
            return Err(type_mismatch(
                result,
                format!("no value returned from `{}`", function.identifier),
                &function.span,
            ));
        }

        Ok(TypedFunction {
            name: function.identifier.clone(),
            parameters,
            result: signature.result,
            body,
            storage: self.storage.clone(),
            span: function.span.clone(),
        })
    }

    /// Checks the top-level statements as the body of the entry function.
    pub fn check_entry(&mut self, body: &BlockStmt) -> Result<TypedFunction, Error> {
        log::debug!("checking entry function `{}`", self.entry_name);

        let typed_body = self.check_until_stable(body, &[], Scope::new)?;

        Ok(TypedFunction {
            name: self.entry_name.clone(),
            parameters: vec![],
            result: None,
            body: typed_body,
            storage: self.storage.clone(),
            span: body.span.clone(),
        })
    }

    fn check_until_stable(
        &mut self,
        body: &BlockStmt,
        parameters: &[TypedParameter],
        fresh_scope: impl Fn() -> Scope,
    ) -> Result<TypedBlock, Error> {
        let mut read_types = HashMap::new();
        let mut pass = 1;

        loop {
            let mut scope = fresh_scope();
            self.storage.clear();
            self.read_types = read_types;
            self.declarations.clear();
            self.bare_return = false;
            self.valued_return = false;

            for parameter in parameters {
                self.declare_local(&mut scope, &parameter.name, parameter.ty, true);
            }

            let typed = self.check_block_in(body, &mut scope)?;

            if self.storage == self.read_types {
                log::trace!("storage settled after {} pass(es)", pass);
                return Ok(typed);
            }

            read_types = self.storage.clone();
            pass += 1;
        }
    }

    /// Declares `name` in `scope` and returns the local it lives in.
    ///
    /// The first declaration of a name in a function keeps the name. Later
    /// ones get `name.N`, which no source identifier can spell.
    fn declare_local(
        &mut self,
        scope: &mut Scope,
        name: &str,
        ty: NumType,
        fixed: bool,
    ) -> String {
        let count = self.declarations.entry(name.to_string()).or_insert(0);
        let slot = if *count == 0 {
            name.to_string()
        } else {
            format!("{}.{}", name, count)
        };
        *count += 1;

        scope.declare(name, &slot, ty, fixed);
        self.record(&slot, ty);
        slot
    }

    fn record(&mut self, name: &str, ty: NumType) {
        let widened = unify(self.storage.get(name).copied(), Some(ty));
        if self.storage.get(name) != Some(&widened) {
            log::trace!("storage of `{}` is now {}", name, widened);
        }
        self.storage.insert(name.to_string(), widened);
    }

    fn read_type(&self, name: &str, scope_type: NumType) -> NumType {
        self.read_types.get(name).copied().unwrap_or(scope_type)
    }

    /// Checks a block's statements directly in `scope`.
    pub fn check_block_in(
        &mut self,
        block: &BlockStmt,
        scope: &mut Scope,
    ) -> Result<TypedBlock, Error> {
        let body = block
            .iter()
            .map(|stmt| self.check_stmt(stmt, scope))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TypedBlock {
            body,
            span: block.span.clone(),
        })
    }

    pub fn check_stmt(&mut self, stmt: &Stmt, scope: &mut Scope) -> Result<TypedStmt, Error> {
        match stmt {
            Stmt::FunctionDefinition(function) => Err(Error::new(
                ErrorImpl::MalformedNode {
                    message: format!(
                        "function `{}` must be declared at the top level",
                        function.identifier
                    ),
                },
                function.span.start.clone(),
            )),
            Stmt::Let(decl) => self.check_let(decl, scope),
            Stmt::Assignment(assignment) => {
                let (target, value, _) = self.check_assignment(assignment, scope)?;
                Ok(TypedStmt::Assignment {
                    target,
                    value,
                    span: assignment.span.clone(),
                })
            }
            Stmt::If(stmt) => {
                let condition = self.check_expr(&stmt.condition, scope, None)?;
                let then_body = self.check_stmt(&stmt.then_body, &mut scope.child())?;
                let else_body = match &stmt.else_body {
                    Some(body) => Some(Box::new(self.check_stmt(body, &mut scope.child())?)),
                    None => None,
                };

                Ok(TypedStmt::If {
                    condition,
                    then_body: Box::new(then_body),
                    else_body,
                    span: stmt.span.clone(),
                })
            }
            Stmt::While(stmt) => {
                let condition = self.check_expr(&stmt.condition, scope, None)?;
                let body = self.check_stmt(&stmt.body, &mut scope.loop_body())?;

                Ok(TypedStmt::Loop(TypedLoop {
                    init: None,
                    condition: Some(condition),
                    body: Box::new(body),
                    step: None,
                    span: stmt.span.clone(),
                }))
            }
            Stmt::For(stmt) => self.check_for(stmt, scope),
            Stmt::Break(span) | Stmt::Continue(span) => {
                let is_break = matches!(stmt, Stmt::Break(_));
                if !scope.in_loop {
                    return Err(Error::new(
                        ErrorImpl::ContextViolation {
                            construct: if is_break { "break" } else { "continue" },
                            context: "a loop",
                        },
                        span.start.clone(),
                    ));
                }

                Ok(if is_break {
                    TypedStmt::Break(span.clone())
                } else {
                    TypedStmt::Continue(span.clone())
                })
            }
            Stmt::Return(stmt) => self.check_return(stmt, scope),
            Stmt::Print(stmt) => Ok(TypedStmt::Print {
                value: self.check_expr(&stmt.value, scope, None)?,
                span: stmt.span.clone(),
            }),
            Stmt::Block(block) => Ok(TypedStmt::Block(
                self.check_block_in(block, &mut scope.child())?,
            )),
            Stmt::Expression(stmt) => Ok(TypedStmt::Expression(self.check_expr(
                &stmt.expression,
                scope,
                None,
            )?)),
            Stmt::Call(call) => Ok(TypedStmt::Call(self.check_call(call, scope)?)),
        }
    }

    fn check_let(&mut self, decl: &VarDeclStmt, scope: &mut Scope) -> Result<TypedStmt, Error> {
        let (value, ty, fixed) = match (decl.explicit_type, &decl.assigned_value) {
            (Some(declared), Some(value)) => {
                let value = self.check_expr(value, scope, Some(declared))?;
                if unify_for_assignment(declared, value.ty, true).is_none() {
                    return Err(type_mismatch(declared, value.ty, &value.span));
                }
                (Some(value), declared, true)
            }
            (Some(declared), None) => (None, declared, true),
            (None, Some(value)) => {
                let value = self.check_expr(value, scope, None)?;
                let ty = value.ty;
                (Some(value), ty, false)
            }
            (None, None) => (None, NumType::I32, false),
        };

        let name = self.declare_local(scope, &decl.identifier, ty, fixed);

        Ok(TypedStmt::Let {
            name,
            value,
            ty,
            span: decl.span.clone(),
        })
    }

    /// Checks an assignment and updates the target's type in `scope`.
    ///
    /// Returns the target's slot, the checked value and the target's new type.
    fn check_assignment(
        &mut self,
        assignment: &AssignmentExpr,
        scope: &mut Scope,
    ) -> Result<(String, TypedExpr, NumType), Error> {
        let target = match assignment.assignee.as_ref() {
            Expr::Variable(symbol) => symbol,
            other => {
                return Err(Error::new(
                    ErrorImpl::MalformedNode {
                        message: String::from("assignment target must be a variable"),
                    },
                    other.get_span().start.clone(),
                ))
            }
        };

        let hint = scope.get(&target.value).map(|variable| variable.ty);
        let value = self.check_expr(&assignment.value, scope, hint)?;

        let (slot, ty) = match scope.get(&target.value).cloned() {
            Some(variable) => {
                let ty = unify_for_assignment(variable.ty, value.ty, variable.fixed)
                    .ok_or_else(|| type_mismatch(variable.ty, value.ty, &value.span))?;
                scope.retype(&target.value, ty);
                self.record(&variable.slot, ty);
                (variable.slot, ty)
            }
            None if self.auto_declare => {
                log::trace!("auto-declaring `{}` as {}", target.value, value.ty);
                let slot = self.declare_local(scope, &target.value, value.ty, false);
                (slot, value.ty)
            }
            None => {
                return Err(Error::new(
                    ErrorImpl::UndeclaredName {
                        name: target.value.clone(),
                    },
                    target.span.start.clone(),
                ))
            }
        };

        Ok((slot, value, ty))
    }

    fn check_for(&mut self, stmt: &ForStmt, scope: &mut Scope) -> Result<TypedStmt, Error> {
        let mut for_scope = scope.child();

        let init = match &stmt.init {
            Some(init) => Some(Box::new(self.check_stmt(init, &mut for_scope)?)),
            None => None,
        };
        let condition = match &stmt.condition {
            Some(condition) => Some(self.check_expr(condition, &mut for_scope, None)?),
            None => None,
        };
        let body = self.check_stmt(&stmt.body, &mut for_scope.loop_body())?;
        let step = match &stmt.step {
            Some(step) => {
                let step = Stmt::from_expression(step.clone());
                Some(Box::new(self.check_stmt(&step, &mut for_scope)?))
            }
            None => None,
        };

        Ok(TypedStmt::Loop(TypedLoop {
            init,
            condition,
            body: Box::new(body),
            step,
            span: stmt.span.clone(),
        }))
    }

    fn check_return(&mut self, stmt: &ReturnStmt, scope: &mut Scope) -> Result<TypedStmt, Error> {
        let function = match &scope.function {
            Some(function) => function.clone(),
            None => {
                return Err(Error::new(
                    ErrorImpl::ContextViolation {
                        construct: "return",
                        context: "a function body",
                    },
                    stmt.span.start.clone(),
                ))
            }
        };

        let signature = self.functions.get(&function).cloned().ok_or_else(|| {
            Error::new(
                ErrorImpl::UndeclaredName {
                    name: function.clone(),
                },
                stmt.span.start.clone(),
            )
        })?;

        let value = match &stmt.value {
            None => {
                if let Some(result) = signature.result {
                    return Err(type_mismatch(result, "void", &stmt.span));
                }
                self.bare_return = true;
                None
            }
            Some(value) => {
                let value = self.check_expr(value, scope, signature.result)?;

                if self.bare_return {
                    return Err(type_mismatch("void", value.ty, &value.span));
                }
                self.valued_return = true;

                if signature.result_fixed {
                    let result = signature.result.unwrap_or(NumType::I32);
                    if unify_for_assignment(result, value.ty, true).is_none() {
                        return Err(type_mismatch(result, value.ty, &value.span));
                    }
                } else if let Some(entry) = self.functions.get_mut(&function) {
                    entry.result = Some(unify(signature.result, Some(value.ty)));
                }

                Some(value)
            }
        };

        Ok(TypedStmt::Return {
            value,
            span: stmt.span.clone(),
        })
    }

    fn check_call(&mut self, call: &CallExpr, scope: &mut Scope) -> Result<TypedCall, Error> {
        let signature = self.functions.get(&call.callee).cloned().ok_or_else(|| {
            Error::new(
                ErrorImpl::UndeclaredName {
                    name: call.callee.clone(),
                },
                call.span.start.clone(),
            )
        })?;

        let expected = signature.parameters.len();
        let received = call.arguments.len();

        if received > expected {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments {
                    function: call.callee.clone(),
                    expected,
                    received,
                },
                call.arguments[expected].get_span().start.clone(),
            ));
        } else if received < expected {
            return Err(Error::new(
                ErrorImpl::MissingArguments {
                    function: call.callee.clone(),
                    expected,
                    received,
                },
                call.span.end.clone(),
            ));
        }

        let mut arguments = Vec::with_capacity(received);
        for (argument, parameter) in call.arguments.iter().zip(signature.parameters.iter()) {
            let typed = self.check_expr(argument, scope, Some(*parameter))?;
            if unify_for_assignment(*parameter, typed.ty, true).is_none() {
                return Err(Error::new(
                    ErrorImpl::ArgumentTypeMatchError {
                        function: call.callee.clone(),
                        expected: *parameter,
                        received: typed.ty,
                    },
                    typed.span.start.clone(),
                ));
            }
            arguments.push(typed);
        }

        Ok(TypedCall {
            callee: call.callee.clone(),
            arguments,
            parameter_types: signature.parameters,
            span: call.span.clone(),
        })
    }

    /// Result type of a call whose value is used.
    ///
    /// A function whose result is still being inferred gets it pinned here:
    /// its current result (or `i32`) becomes final and later returns must fit it.
    fn call_result(&mut self, callee: &str, span: &Span) -> Result<NumType, Error> {
        let signature = self.functions.get_mut(callee).ok_or_else(|| {
            Error::new(
                ErrorImpl::UndeclaredName {
                    name: callee.to_string(),
                },
                span.start.clone(),
            )
        })?;

        if signature.result_fixed || signature.checked {
            return signature
                .result
                .ok_or_else(|| type_mismatch("a value", format!("void from `{}`", callee), span));
        }

        let pinned = signature.result.unwrap_or(NumType::I32);
        log::debug!("pinning result of `{}` to {}", callee, pinned);
        signature.result = Some(pinned);
        signature.result_fixed = true;
        Ok(pinned)
    }

    /// Checks an expression.
    ///
    /// `expected` is the type the context would like, used to pick literal widths.
    pub fn check_expr(
        &mut self,
        expr: &Expr,
        scope: &mut Scope,
        expected: Option<NumType>,
    ) -> Result<TypedExpr, Error> {
        let span = expr.get_span().clone();

        match expr {
            Expr::Literal(literal) => {
                let ty = match literal.value {
                    LiteralValue::Int(value) => match (NumType::for_int_literal(value), expected) {
                        (NumType::I32, Some(NumType::I64)) => NumType::I64,
                        (ty, _) => ty,
                    },
                    LiteralValue::Float(_) => NumType::for_float_literal(expected),
                };
                Ok(TypedExpr::new(TypedExprKind::Literal(literal.value), ty, span))
            }
            Expr::Variable(symbol) => {
                let variable = scope.get(&symbol.value).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::UndeclaredName {
                            name: symbol.value.clone(),
                        },
                        symbol.span.start.clone(),
                    )
                })?;
                let slot = variable.slot.clone();
                let ty = self.read_type(&slot, variable.ty);

                Ok(TypedExpr::new(
                    TypedExprKind::Variable(slot),
                    ty,
                    span,
                ))
            }
            Expr::Binary(binary) => {
                let left_hint = if binary.operator.is_arithmetic() {
                    expected
                } else {
                    None
                };
                let left = self.check_expr(&binary.left, scope, left_hint)?;

                let right_hint = if left.ty == NumType::F64 {
                    Some(NumType::F64)
                } else {
                    left_hint
                };
                let right = self.check_expr(&binary.right, scope, right_hint)?;

                // A constant left operand takes the width of a wider right one.
                let left = if !binary.operator.is_logical()
                    && right.ty.priority() > left.ty.priority()
                    && is_constant(&binary.left)
                {
                    self.check_expr(&binary.left, scope, Some(right.ty))?
                } else {
                    left
                };

                let (operand_type, ty) = if binary.operator.is_logical() {
                    (NumType::I32, NumType::I32)
                } else {
                    let operand_type = unify(Some(left.ty), Some(right.ty));
                    if binary.operator == BinaryOperator::Remainder && operand_type.is_float() {
                        return Err(type_mismatch("i32 or i64", operand_type, &span));
                    }
                    if binary.operator.is_comparison() {
                        (operand_type, NumType::I32)
                    } else {
                        (operand_type, operand_type)
                    }
                };

                Ok(TypedExpr::new(
                    TypedExprKind::Binary {
                        left: Box::new(left),
                        operator: binary.operator,
                        right: Box::new(right),
                        operand_type,
                    },
                    ty,
                    span,
                ))
            }
            Expr::Unary(prefix) => {
                let hint = if prefix.operator == UnaryOperator::Not {
                    None
                } else {
                    expected
                };
                let operand = self.check_expr(&prefix.right_expr, scope, hint)?;
                let ty = if prefix.operator == UnaryOperator::Not {
                    NumType::I32
                } else {
                    operand.ty
                };

                Ok(TypedExpr::new(
                    TypedExprKind::Unary {
                        operator: prefix.operator,
                        operand: Box::new(operand),
                    },
                    ty,
                    span,
                ))
            }
            Expr::Postfix(postfix) => {
                let variable = scope.get(&postfix.target.value).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::UndeclaredName {
                            name: postfix.target.value.clone(),
                        },
                        postfix.target.span.start.clone(),
                    )
                })?;
                let slot = variable.slot.clone();
                let ty = self.read_type(&slot, variable.ty);

                Ok(TypedExpr::new(
                    TypedExprKind::Postfix {
                        operator: postfix.operator,
                        target: slot,
                    },
                    ty,
                    span,
                ))
            }
            Expr::Assignment(assignment) => {
                let (target, value, ty) = self.check_assignment(assignment, scope)?;
                let ty = self.read_type(&target, ty);

                Ok(TypedExpr::new(
                    TypedExprKind::Assignment {
                        target,
                        value: Box::new(value),
                    },
                    ty,
                    span,
                ))
            }
            Expr::Conversion(conversion) => {
                let hint = Some(conversion.to_type).filter(|ty| ty.is_float());
                let inner = self.check_expr(&conversion.expr, scope, hint)?;

                if let Some(declared) = conversion.from_type {
                    if declared != inner.ty {
                        log::debug!(
                            "conversion declares source type {} but operand is {}",
                            declared,
                            inner.ty
                        );
                    }
                }

                let from = inner.ty;
                Ok(TypedExpr::new(
                    TypedExprKind::Conversion {
                        expr: Box::new(inner),
                        from,
                        to: conversion.to_type,
                    },
                    conversion.to_type,
                    span,
                ))
            }
            Expr::Call(call) => {
                let typed = self.check_call(call, scope)?;
                let ty = self.call_result(&call.callee, &span)?;

                Ok(TypedExpr::new(TypedExprKind::Call(typed), ty, span))
            }
        }
    }
}

/// Built only from literals, so re-checking it has no effect besides its type.
fn is_constant(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(_) => true,
        Expr::Unary(prefix) => is_constant(&prefix.right_expr),
        Expr::Binary(binary) => is_constant(&binary.left) && is_constant(&binary.right),
        _ => false,
    }
}

/// Type checks a whole program.
///
/// Signatures are collected first, then user functions are checked in source
/// order, then the top-level statements as the entry function. The first
/// violation aborts checking.
///
/// # Arguments
///
/// * `program` - The parsed program
/// * `options` - Auto-declaration and entry name settings
///
/// # Returns
///
/// The typed program with a storage summary per function, or the first error.
/// An entry name that is not an identifier is a `MalformedNode`.
pub fn type_check(program: &Program, options: &CompileOptions) -> Result<TypedProgram, Error> {
    if !is_identifier(&options.entry_name) {
        return Err(Error::new(
            ErrorImpl::MalformedNode {
                message: format!("entry name `{}` is not an identifier", options.entry_name),
            },
            Position::null(),
        ));
    }

    let mut type_checker = TypeChecker::new(options);
    type_checker.collect_signatures(&program.functions)?;

    let functions = program
        .functions
        .iter()
        .map(|function| type_checker.check_function(function))
        .collect::<Result<Vec<_>, _>>()?;

    let entry = type_checker.check_entry(&program.body)?;

    Ok(TypedProgram { functions, entry })
}
