//! Compilation options shared by the type checker and the emitter.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

/// Whether `name` could be spelled as an identifier in source.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Knobs for one compilation.
///
/// Build one with [`CompileOptions::new`] (or `Default`) and the `with_*`
/// setters:
///
/// ```ignore
/// let options = CompileOptions::new().with_auto_declare(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Assigning to an undeclared name declares it instead of failing.
    pub auto_declare: bool,
    /// Name of the synthetic function holding the top-level statements.
    pub entry_name: String,
    /// Export every user function under its source name.
    pub export_functions: bool,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self {
            auto_declare: true,
            entry_name: String::from("_start"),
            export_functions: true,
        }
    }

    pub fn with_auto_declare(mut self, auto_declare: bool) -> Self {
        self.auto_declare = auto_declare;
        self
    }

    pub fn with_entry_name<S: Into<String>>(mut self, entry_name: S) -> Self {
        self.entry_name = entry_name.into();
        self
    }

    pub fn with_export_functions(mut self, export_functions: bool) -> Self {
        self.export_functions = export_functions;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}
