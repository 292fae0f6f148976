//! Host functions.
//!
//! The runtime provides a handful of functions through the `env` import
//! module. Both the type checker (for signatures) and the emitter (for import
//! declarations and call targets) read this table.
//!
//! Some source names are aliases: `input()` calls the host's `$read_i32`.
//! Alias targets may carry their own sigil; normalization collapses it.

use lazy_static::lazy_static;

use crate::ast::types::NumType;

/// A function imported from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct HostFunction {
    /// Name used in source programs.
    pub name: &'static str,
    /// Name the call instruction and import refer to.
    pub target: &'static str,
    pub parameters: Vec<NumType>,
    pub result: Option<NumType>,
}

impl HostFunction {
    fn new(
        name: &'static str,
        target: &'static str,
        parameters: &[NumType],
        result: Option<NumType>,
    ) -> Self {
        HostFunction {
            name,
            target,
            parameters: parameters.to_vec(),
            result,
        }
    }
}

/// Import module every host function lives in.
pub const HOST_MODULE: &str = "env";

lazy_static! {
    pub static ref HOST_FUNCTIONS: Vec<HostFunction> = vec![
        HostFunction::new("input", "$$read_i32", &[], Some(NumType::I32)),
        HostFunction::new("input_f64", "$$read_f64", &[], Some(NumType::F64)),
        HostFunction::new("alloc", "$$bump_alloc", &[NumType::I32], Some(NumType::I32)),
        HostFunction::new(
            "ask_model",
            "model_call",
            &[NumType::I32, NumType::I32],
            Some(NumType::I32)
        ),
        HostFunction::new("print_i32", "print_i32", &[NumType::I32], None),
        HostFunction::new("print_i64", "print_i64", &[NumType::I64], None),
        HostFunction::new("print_f32", "print_f32", &[NumType::F32], None),
        HostFunction::new("print_f64", "print_f64", &[NumType::F64], None),
    ];
}

pub fn find_host_function(name: &str) -> Option<&'static HostFunction> {
    HOST_FUNCTIONS.iter().find(|host| host.name == name)
}

/// Maps a source-level callee to the name it is emitted under.
///
/// Host aliases are resolved; every other name passes through.
pub fn resolve_alias(name: &str) -> &str {
    match find_host_function(name) {
        Some(host) => host.target,
        None => name,
    }
}

/// Source name of the print function for values of `ty`.
pub fn print_function(ty: NumType) -> String {
    format!("print_{}", ty.wat())
}
