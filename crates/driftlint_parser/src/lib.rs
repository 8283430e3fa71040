//! Language front ends for driftlint.
//!
//! Each front end implements [`Parser`] and produces an owned
//! [`driftlint_ast::SyntaxTree`]. The only built-in front end today is
//! [`TypeScriptParser`]; the trait exists so the engine never depends on
//! a concrete grammar.

mod error;
mod traits;
mod typescript;

pub use error::ParseError;
pub use traits::Parser;
pub use typescript::TypeScriptParser;
