use crate::{
    ast::{
        expressions::{BinaryOperator, PostfixOperator, UnaryOperator},
        types::NumType,
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::typed_ast::{TypedCall, TypedExpr, TypedExprKind},
    Span,
};

use super::compiler::{normalize_name, Compiler};

/// Instruction for a non-logical binary operator on operands of type `ty`.
fn binary_instruction(operator: BinaryOperator, ty: NumType) -> Option<String> {
    let float = ty.is_float();
    let name = match operator {
        BinaryOperator::Add => "add",
        BinaryOperator::Subtract => "sub",
        BinaryOperator::Multiply => "mul",
        BinaryOperator::Divide if float => "div",
        BinaryOperator::Divide => "div_s",
        BinaryOperator::Remainder if float => return None,
        BinaryOperator::Remainder => "rem_s",
        BinaryOperator::Equals => "eq",
        BinaryOperator::NotEquals => "ne",
        BinaryOperator::Less if float => "lt",
        BinaryOperator::Less => "lt_s",
        BinaryOperator::LessEquals if float => "le",
        BinaryOperator::LessEquals => "le_s",
        BinaryOperator::Greater if float => "gt",
        BinaryOperator::Greater => "gt_s",
        BinaryOperator::GreaterEquals if float => "ge",
        BinaryOperator::GreaterEquals => "ge_s",
        BinaryOperator::And | BinaryOperator::Or => return None,
    };

    Some(format!("{}.{}", ty.wat(), name))
}

/// `T.const` with a whole-number value, rendered for `ty`.
fn const_instruction(ty: NumType, value: i64) -> String {
    if ty.is_float() {
        format!("{}.const {}.0", ty.wat(), value)
    } else {
        format!("{}.const {}", ty.wat(), value)
    }
}

/// Pushes `expr` as an `i32` that is zero exactly when `expr` is zero.
pub fn gen_condition(compiler: &mut Compiler, expr: &TypedExpr) -> Result<(), Error> {
    gen_expression(compiler, expr)?;

    if expr.ty != NumType::I32 {
        compiler.emit(const_instruction(expr.ty, 0));
        compiler.emit(format!("{}.ne", expr.ty.wat()));
    }
    Ok(())
}

/// Pushes `expr` as an `i32` that is either `0` or `1`.
fn gen_truth_value(compiler: &mut Compiler, expr: &TypedExpr) -> Result<(), Error> {
    gen_expression(compiler, expr)?;
    compiler.emit(const_instruction(expr.ty, 0));
    compiler.emit(format!("{}.ne", expr.ty.wat()));
    Ok(())
}

/// Pushes the arguments converted to the parameter types, then calls.
pub fn gen_call(compiler: &mut Compiler, call: &TypedCall) -> Result<(), Error> {
    for (argument, parameter) in call.arguments.iter().zip(call.parameter_types.iter()) {
        gen_expression(compiler, argument)?;
        compiler.coerce(argument.ty, *parameter, &argument.span)?;
    }

    compiler.call(&call.callee);
    Ok(())
}

fn gen_postfix(
    compiler: &mut Compiler,
    operator: PostfixOperator,
    target: &str,
    ty: NumType,
    span: &Span,
) -> Result<(), Error> {
    // The first load stays on the stack as the expression's value.
    compiler.load(target, ty, span)?;
    compiler.load(target, ty, span)?;
    compiler.emit(const_instruction(ty, 1));
    compiler.emit(match operator {
        PostfixOperator::Increment => format!("{}.add", ty.wat()),
        PostfixOperator::Decrement => format!("{}.sub", ty.wat()),
    });
    compiler.store(target, ty, span)?;
    Ok(())
}

/// Emits `expr`, leaving one value of type `expr.ty` on the stack.
pub fn gen_expression(compiler: &mut Compiler, expr: &TypedExpr) -> Result<(), Error> {
    match &expr.kind {
        TypedExprKind::Literal(value) => {
            compiler.emit(format!("{}.const {}", expr.ty.wat(), value.render(expr.ty)));
        }
        TypedExprKind::Variable(name) => {
            compiler.load(name, expr.ty, &expr.span)?;
        }
        TypedExprKind::Binary {
            left,
            operator: BinaryOperator::And,
            right,
            ..
        } => {
            gen_condition(compiler, left)?;
            compiler.emit("if (result i32)");
            gen_truth_value(compiler, right)?;
            compiler.emit("else");
            compiler.emit("i32.const 0");
            compiler.emit("end");
        }
        TypedExprKind::Binary {
            left,
            operator: BinaryOperator::Or,
            right,
            ..
        } => {
            gen_condition(compiler, left)?;
            compiler.emit("if (result i32)");
            compiler.emit("i32.const 1");
            compiler.emit("else");
            gen_truth_value(compiler, right)?;
            compiler.emit("end");
        }
        TypedExprKind::Binary {
            left,
            operator,
            right,
            operand_type,
        } => {
            gen_expression(compiler, left)?;
            compiler.coerce(left.ty, *operand_type, &left.span)?;
            gen_expression(compiler, right)?;
            compiler.coerce(right.ty, *operand_type, &right.span)?;

            let instruction = binary_instruction(*operator, *operand_type).ok_or_else(|| {
                Error::new(
                    ErrorImpl::MalformedNode {
                        message: format!("no {:?} instruction for {}", operator, operand_type),
                    },
                    expr.span.start.clone(),
                )
            })?;
            compiler.emit(instruction);
        }
        TypedExprKind::Unary { operator, operand } => {
            gen_expression(compiler, operand)?;
            let ty = operand.ty;

            match operator {
                UnaryOperator::Plus => {}
                UnaryOperator::Negate => {
                    compiler.emit(const_instruction(ty, -1));
                    compiler.emit(format!("{}.mul", ty.wat()));
                }
                UnaryOperator::Not if ty.is_integer() => {
                    compiler.emit(format!("{}.eqz", ty.wat()));
                }
                UnaryOperator::Not => {
                    compiler.emit(const_instruction(ty, 0));
                    compiler.emit(format!("{}.eq", ty.wat()));
                }
            }
        }
        TypedExprKind::Postfix { operator, target } => {
            gen_postfix(compiler, *operator, target, expr.ty, &expr.span)?;
        }
        TypedExprKind::Assignment { target, value } => {
            gen_expression(compiler, value)?;
            compiler.store(target, value.ty, &expr.span)?;
            // Reload so the assigned value is the expression's result.
            compiler.load(target, expr.ty, &expr.span)?;
        }
        TypedExprKind::Conversion { expr: inner, from, to } => {
            gen_expression(compiler, inner)?;
            compiler.coerce(*from, *to, &expr.span)?;
        }
        TypedExprKind::Call(call) => {
            if compiler.function_result(&call.callee, &call.span)?.is_none() {
                return Err(Error::new(
                    ErrorImpl::MalformedNode {
                        message: format!(
                            "`{}` returns nothing but its value is used",
                            normalize_name(&call.callee)
                        ),
                    },
                    call.span.start.clone(),
                ));
            }
            gen_call(compiler, call)?;
        }
    }

    Ok(())
}
