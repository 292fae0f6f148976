//! Main compiler module.
//!
//! This module contains the core Compiler structure and the module assembly
//! step. Instructions are collected per function as plain lines; indentation
//! and the local-declaration prologue are added once the body is complete.

use std::collections::{HashMap, HashSet};

use crate::{
    ast::types::NumType,
    errors::errors::{Error, ErrorImpl},
    options::CompileOptions,
    type_checker::typed_ast::{TypedFunction, TypedProgram, TypedStmt},
    Span,
};

use super::{
    conversions::conversion_instruction,
    slots::{Slot, SlotTable},
    stdlib::{find_host_function, resolve_alias, HOST_FUNCTIONS, HOST_MODULE},
    stmt::gen_statement,
};

/// Brings a name to its single-sigil form.
///
/// `x` becomes `$x`, `$x` stays, `$$x` collapses to `$x`.
pub fn normalize_name(name: &str) -> String {
    format!("${}", name.trim_start_matches('$'))
}

/// The state of one emission run.
///
/// Everything below `output` is per function and reset by
/// [`Compiler::gen_function_body`].
pub struct Compiler<'a> {
    /// The checked program being emitted
    pub program: &'a TypedProgram,
    /// Host functions referenced so far, by source name
    pub used_hosts: HashSet<&'static str>,

    /// Instruction lines of the current function
    pub output: Vec<String>,
    pub slots: SlotTable,
    /// Storage type of every local of the current function
    pub storage: HashMap<String, NumType>,
    /// Result type of the current function
    pub result: Option<NumType>,
    /// Label ids of the enclosing loops, innermost last
    pub loops: Vec<usize>,
    next_label: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(program: &'a TypedProgram) -> Self {
        Compiler {
            program,
            used_hosts: HashSet::new(),
            output: vec![],
            slots: SlotTable::new(),
            storage: HashMap::new(),
            result: None,
            loops: vec![],
            next_label: 0,
        }
    }

    pub fn emit<S: Into<String>>(&mut self, line: S) {
        self.output.push(line.into());
    }

    /// Emits the conversion from `from` to `to`, if they differ.
    ///
    /// # Arguments
    ///
    /// * `from` - Type of the value on top of the stack
    /// * `to` - Type the value must have afterwards
    /// * `span` - Where the conversion comes from, for the error
    ///
    /// # Returns
    ///
    /// `UnsupportedConversion` when the pair is missing from the conversion table.
    pub fn coerce(&mut self, from: NumType, to: NumType, span: &Span) -> Result<(), Error> {
        if let Some(instruction) = conversion_instruction(from, to, &span.start)? {
            self.emit(instruction);
        }
        Ok(())
    }

    /// Slot of `name`, allocated at its storage type on first use.
    pub fn slot_for(&mut self, name: &str, fallback: NumType) -> Slot {
        if let Some(slot) = self.slots.get(name) {
            return slot;
        }
        let ty = self.storage.get(name).copied().unwrap_or(fallback);
        self.slots.get_or_alloc(name, ty)
    }

    /// Stores the `ty` value on top of the stack into `name`.
    pub fn store(&mut self, name: &str, ty: NumType, span: &Span) -> Result<Slot, Error> {
        let slot = self.slot_for(name, ty);
        self.coerce(ty, slot.ty, span)?;
        self.emit(format!("local.set {}", normalize_name(name)));
        Ok(slot)
    }

    /// Pushes `name` converted to `ty`.
    pub fn load(&mut self, name: &str, ty: NumType, span: &Span) -> Result<Slot, Error> {
        let slot = self.slot_for(name, ty);
        self.emit(format!("local.get {}", normalize_name(name)));
        self.coerce(slot.ty, ty, span)?;
        Ok(slot)
    }

    pub fn new_label(&mut self) -> usize {
        let label = self.next_label;
        self.next_label += 1;
        label
    }

    /// Emits a call to `callee` after resolving host aliases.
    pub fn call(&mut self, callee: &str) {
        if let Some(host) = find_host_function(callee) {
            self.used_hosts.insert(host.name);
        }
        self.emit(format!("call {}", normalize_name(resolve_alias(callee))));
    }

    /// Final result type of a user or host function.
    pub fn function_result(&self, callee: &str, span: &Span) -> Result<Option<NumType>, Error> {
        if let Some(host) = find_host_function(callee) {
            return Ok(host.result);
        }

        self.program
            .find_function(callee)
            .map(|function| function.result)
            .ok_or_else(|| {
                Error::new(
                    ErrorImpl::UndeclaredName {
                        name: callee.to_string(),
                    },
                    span.start.clone(),
                )
            })
    }

    /// Emits the instruction lines of `function`, without prologue or indentation.
    pub fn gen_function_body(&mut self, function: &TypedFunction) -> Result<Vec<String>, Error> {
        self.output.clear();
        self.slots = SlotTable::new();
        self.storage = function.storage.clone();
        self.result = function.result;
        self.loops.clear();
        self.next_label = 0;

        for parameter in &function.parameters {
            self.slots.add_parameter(&parameter.name, parameter.ty);
        }

        for stmt in function.body.iter() {
            gen_statement(self, stmt)?;
        }

        if function.result.is_some()
            && !matches!(function.body.body.last(), Some(TypedStmt::Return { .. }))
        {
            self.emit("unreachable");
        }

        Ok(std::mem::take(&mut self.output))
    }

    /// Emits one complete `func` form.
    ///
    /// # Arguments
    ///
    /// * `function` - The checked function
    /// * `export` - Export name, if the function is exported
    ///
    /// # Returns
    ///
    /// The lines of the form, from the header to the closing parenthesis.
    pub fn gen_function(
        &mut self,
        function: &TypedFunction,
        export: Option<&str>,
    ) -> Result<Vec<String>, Error> {
        log::debug!("emitting function `{}`", function.name);

        let body = self.gen_function_body(function)?;

        let mut header = format!("(func {}", normalize_name(&function.name));
        if let Some(export) = export {
            header.push_str(&format!(" (export \"{}\")", export));
        }
        for parameter in &function.parameters {
            header.push_str(&format!(
                " (param {} {})",
                normalize_name(&parameter.name),
                parameter.ty
            ));
        }
        if let Some(result) = function.result {
            header.push_str(&format!(" (result {})", result));
        }

        let mut lines = vec![header];
        for (name, slot) in self.slots.locals() {
            lines.push(format!("  (local {} {})", normalize_name(name), slot.ty));
        }
        lines.extend(indent_lines(&body, 1));
        lines.push(String::from(")"));

        log::trace!(
            "`{}`: {} slot(s), {} instruction(s)",
            function.name,
            function.parameters.len() + self.slots.locals().count(),
            body.len()
        );

        Ok(lines)
    }

    /// Import declarations for the host functions used so far, in table order.
    pub fn gen_imports(&self) -> Vec<String> {
        HOST_FUNCTIONS
            .iter()
            .filter(|host| self.used_hosts.contains(host.name))
            .map(|host| {
                let mut signature = String::new();
                for parameter in &host.parameters {
                    signature.push_str(&format!(" (param {})", parameter));
                }
                if let Some(result) = host.result {
                    signature.push_str(&format!(" (result {})", result));
                }

                format!(
                    "(import \"{}\" \"{}\" (func {}{}))",
                    HOST_MODULE,
                    host.target.trim_start_matches('$'),
                    normalize_name(host.target),
                    signature
                )
            })
            .collect()
    }
}

/// Indents structured control flow, two spaces per level.
fn indent_lines(lines: &[String], base: usize) -> Vec<String> {
    let mut depth = base;
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let opens = line.starts_with("block")
            || line.starts_with("loop")
            || line == "if"
            || line.starts_with("if ");
        let middle = line == "else";

        if middle || line == "end" {
            depth = depth.saturating_sub(1);
        }
        out.push(format!("{}{}", "  ".repeat(depth), line));
        if opens || middle {
            depth += 1;
        }
    }

    out
}

/// Emits the module text for a checked program.
///
/// Host imports come first, then user functions in source order, then the
/// entry function holding the top-level statements. Any failure aborts the
/// whole module.
///
/// # Arguments
///
/// * `program` - The checked program
/// * `options` - Entry name and export settings
///
/// # Returns
///
/// The module text, newline terminated.
pub fn compile(program: &TypedProgram, options: &CompileOptions) -> Result<String, Error> {
    let mut compiler = Compiler::new(program);
    let mut functions = vec![];

    for function in &program.functions {
        let export = options.export_functions.then_some(function.name.as_str());
        functions.push(compiler.gen_function(function, export)?);
    }
    functions.push(compiler.gen_function(&program.entry, Some(options.entry_name.as_str()))?);

    let mut module = vec![String::from("(module")];
    for import in compiler.gen_imports() {
        module.push(format!("  {}", import));
    }
    for function in functions {
        module.extend(function.into_iter().map(|line| format!("  {}", line)));
    }
    module.push(String::from(")"));

    Ok(module.join("\n") + "\n")
}
