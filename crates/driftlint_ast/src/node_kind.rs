//! Node kind definitions.
//!
//! Rule listeners dispatch on `NodeKind` instead of the grammar's raw kind
//! strings, so a typo in a listener registration is a compile error rather
//! than a handler that silently never fires. Grammar kinds the scanner has
//! no rule interest in are collapsed into [`NodeKind::Other`]; they are
//! still present in the tree for traversal and token lookup.

use serde::{Deserialize, Serialize};

/// Syntax node kinds for TypeScript/JavaScript sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NodeKind {
    /// Root node of a parsed file.
    Program,
    /// Line or block comment.
    Comment,

    // Statements
    ExpressionStatement,
    LexicalDeclaration,
    VariableDeclaration,
    StatementBlock,
    ReturnStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    FinallyClause,
    IfStatement,
    ForStatement,
    WhileStatement,

    // Declarations
    VariableDeclarator,
    FunctionDeclaration,
    ClassDeclaration,
    ClassBody,
    MethodDefinition,
    FormalParameters,

    // Expressions
    CallExpression,
    MemberExpression,
    SubscriptExpression,
    NewExpression,
    AssignmentExpression,
    BinaryExpression,
    ParenthesizedExpression,
    ArrowFunction,
    FunctionExpression,
    Arguments,
    Object,
    Array,
    Pair,

    // Terminals
    Identifier,
    PropertyIdentifier,
    TypeIdentifier,
    String,
    StringFragment,
    TemplateString,
    Number,

    // Types
    TypeAnnotation,
    PredefinedType,

    /// Grammar error node produced by the error-tolerant parser.
    Error,
    /// Any grammar kind without a dedicated variant. Never dispatched on.
    Other,
}

impl NodeKind {
    /// Maps a tree-sitter grammar kind string to a `NodeKind`.
    pub fn from_grammar(kind: &str) -> Self {
        match kind {
            "program" => Self::Program,
            "comment" => Self::Comment,
            "expression_statement" => Self::ExpressionStatement,
            "lexical_declaration" => Self::LexicalDeclaration,
            "variable_declaration" => Self::VariableDeclaration,
            "statement_block" => Self::StatementBlock,
            "return_statement" => Self::ReturnStatement,
            "throw_statement" => Self::ThrowStatement,
            "try_statement" => Self::TryStatement,
            "catch_clause" => Self::CatchClause,
            "finally_clause" => Self::FinallyClause,
            "if_statement" => Self::IfStatement,
            "for_statement" => Self::ForStatement,
            "while_statement" => Self::WhileStatement,
            "variable_declarator" => Self::VariableDeclarator,
            "function_declaration" => Self::FunctionDeclaration,
            "class_declaration" => Self::ClassDeclaration,
            "class_body" => Self::ClassBody,
            "method_definition" => Self::MethodDefinition,
            "formal_parameters" => Self::FormalParameters,
            "call_expression" => Self::CallExpression,
            "member_expression" => Self::MemberExpression,
            "subscript_expression" => Self::SubscriptExpression,
            "new_expression" => Self::NewExpression,
            "assignment_expression" => Self::AssignmentExpression,
            "binary_expression" => Self::BinaryExpression,
            "parenthesized_expression" => Self::ParenthesizedExpression,
            "arrow_function" => Self::ArrowFunction,
            // The JavaScript grammar renamed "function" to
            // "function_expression"; accept both.
            "function" | "function_expression" => Self::FunctionExpression,
            "arguments" => Self::Arguments,
            "object" => Self::Object,
            "array" => Self::Array,
            "pair" => Self::Pair,
            "identifier" => Self::Identifier,
            "property_identifier" => Self::PropertyIdentifier,
            "type_identifier" => Self::TypeIdentifier,
            "string" => Self::String,
            "string_fragment" => Self::StringFragment,
            "template_string" => Self::TemplateString,
            "number" => Self::Number,
            "type_annotation" => Self::TypeAnnotation,
            "predefined_type" => Self::PredefinedType,
            "ERROR" => Self::Error,
            _ => Self::Other,
        }
    }

    /// Returns true if this kind introduces a function body.
    #[inline]
    pub const fn is_function(&self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration
                | Self::FunctionExpression
                | Self::ArrowFunction
                | Self::MethodDefinition
        )
    }

    /// Returns true for kinds that carry a literal string value.
    #[inline]
    pub const fn is_string_literal(&self) -> bool {
        matches!(self, Self::String | Self::TemplateString)
    }
}
