#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    ast::ast::Program,
    compiler::compiler::compile,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    options::CompileOptions,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod options;
pub mod parser;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Parses `source` into an untyped [`Program`].
pub fn parse_source(source: &str, file_name: &str) -> Result<Program, Error> {
    let tokens = tokenize(source.to_string(), Some(file_name.to_string()))?;
    let (_, program) = parse(tokens, Rc::new(file_name.to_string()));
    program
}

/// Runs the whole pipeline: tokenize, parse, type check, then emit the module text.
///
/// No module text is produced for a program that fails any phase.
pub fn compile_source(
    source: &str,
    file_name: &str,
    options: &CompileOptions,
) -> Result<String, Error> {
    let program = parse_source(source, file_name)?;
    let typed = type_check(&program, options)?;
    compile(&typed, options)
}

/// Finds the line containing the byte `position`.
///
/// Returns the 1-based line number, the line text and the offset of `position` in it.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // End of input points just past the final line
    content
        .split_inclusive('\n')
        .last()
        .map(|line| (line_number - 1, line.to_string(), line.len()))
}

/// Renders an error against the source it came from.
///
/// ```text
/// Error: TypeIncompatibility (Expected type `i32`, received `f64`)
/// -> main.src
///    |
/// 20 | let a: i32 = 1.5;
///    | -------------^
/// ```
pub fn render_error(error: &Error, source: &str, file_name: &str) -> String {
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}\n", file_name));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position().0)
    else {
        out.push_str(&format!("   {}\n", error));
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    use crate::{compile_source, options::CompileOptions, render_error};

    #[test]
    fn test_get_line_at_position() {
        let content = "Hello, world!\nsecond\n\nTesting { }\n";
        let (line_number, line, line_pos) = super::get_line_at_position(content, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(content, 30).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(content, 400).is_none());
    }

    #[test]
    fn test_render_error_points_at_offending_column() {
        let source = "let x = 1;\nbreak;\n";
        let error = compile_source(source, "main.src", &CompileOptions::default()).unwrap_err();
        let rendered = render_error(&error, source, "main.src");

        assert!(rendered.starts_with("Error: ContextViolation"));
        assert!(rendered.contains("-> main.src"));
        assert!(rendered.contains("2 | break;"));
        assert!(rendered.trim_end().ends_with('^'));
    }
}
