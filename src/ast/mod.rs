/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Core node enums and the program root
/// - expressions: Definitions for various expression types
/// - statements: Definitions for various statement types
/// - types: The numeric type model and unification
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
