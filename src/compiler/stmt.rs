use crate::{
    ast::types::{LiteralValue, NumType},
    errors::errors::{Error, ErrorImpl},
    type_checker::typed_ast::{TypedLoop, TypedStmt},
    Span,
};

use super::{
    compiler::Compiler,
    expr::{gen_call, gen_condition, gen_expression},
    stdlib::print_function,
};

fn innermost_loop(compiler: &Compiler, construct: &str, span: &Span) -> Result<usize, Error> {
    compiler.loops.last().copied().ok_or_else(|| {
        Error::new(
            ErrorImpl::MalformedNode {
                message: format!("`{}` with no enclosing loop", construct),
            },
            span.start.clone(),
        )
    })
}

/// Lowers a loop to `block $break_N` / `loop $loop_N` / `block $continue_N`.
///
/// `continue` leaves the inner block, so the step after it always runs.
fn gen_loop(compiler: &mut Compiler, lp: &TypedLoop) -> Result<(), Error> {
    if let Some(init) = &lp.init {
        gen_statement(compiler, init)?;
    }

    let label = compiler.new_label();
    compiler.emit(format!("block $break_{}", label));
    compiler.emit(format!("loop $loop_{}", label));

    if let Some(condition) = &lp.condition {
        gen_condition(compiler, condition)?;
        compiler.emit("i32.eqz");
        compiler.emit(format!("br_if $break_{}", label));
    }

    compiler.loops.push(label);
    compiler.emit(format!("block $continue_{}", label));
    let body = gen_statement(compiler, &lp.body);
    compiler.loops.pop();
    body?;
    compiler.emit("end");

    if let Some(step) = &lp.step {
        gen_statement(compiler, step)?;
    }

    compiler.emit(format!("br $loop_{}", label));
    compiler.emit("end");
    compiler.emit("end");
    Ok(())
}

pub fn gen_statement(compiler: &mut Compiler, statement: &TypedStmt) -> Result<(), Error> {
    match statement {
        TypedStmt::Let {
            name,
            value,
            ty,
            span,
        } => match value {
            Some(value) => {
                gen_expression(compiler, value)?;
                compiler.slot_for(name, *ty);
                compiler.store(name, value.ty, span)?;
            }
            None => {
                compiler.emit(format!("{}.const {}", ty.wat(), LiteralValue::Int(0).render(*ty)));
                compiler.store(name, *ty, span)?;
            }
        },
        TypedStmt::Assignment {
            target,
            value,
            span,
        } => {
            gen_expression(compiler, value)?;
            compiler.store(target, value.ty, span)?;
        }
        TypedStmt::If {
            condition,
            then_body,
            else_body,
            ..
        } => {
            gen_condition(compiler, condition)?;
            compiler.emit("if");
            gen_statement(compiler, then_body)?;

            if let Some(else_body) = else_body.as_deref().filter(|body| !body.is_empty_block()) {
                compiler.emit("else");
                gen_statement(compiler, else_body)?;
            }

            compiler.emit("end");
        }
        TypedStmt::Loop(lp) => gen_loop(compiler, lp)?,
        TypedStmt::Break(span) => {
            let label = innermost_loop(compiler, "break", span)?;
            compiler.emit(format!("br $break_{}", label));
        }
        TypedStmt::Continue(span) => {
            let label = innermost_loop(compiler, "continue", span)?;
            compiler.emit(format!("br $continue_{}", label));
        }
        TypedStmt::Return { value, span } => {
            if let Some(value) = value {
                gen_expression(compiler, value)?;
                match compiler.result {
                    Some(result) => compiler.coerce(value.ty, result, span)?,
                    None => {
                        return Err(Error::new(
                            ErrorImpl::MalformedNode {
                                message: String::from("value returned from a function with no result"),
                            },
                            span.start.clone(),
                        ))
                    }
                }
            }
            compiler.emit("return");
        }
        TypedStmt::Print { value, .. } => {
            gen_expression(compiler, value)?;
            compiler.call(&print_function(value.ty));
        }
        TypedStmt::Block(block) => {
            for stmt in block.iter() {
                gen_statement(compiler, stmt)?;
            }
        }
        TypedStmt::Expression(expr) => {
            gen_expression(compiler, expr)?;
            compiler.emit("drop");
        }
        TypedStmt::Call(call) => {
            let result: Option<NumType> = compiler.function_result(&call.callee, &call.span)?;
            gen_call(compiler, call)?;
            if result.is_some() {
                compiler.emit("drop");
            }
        }
    }

    Ok(())
}
