//! Per-file, per-rule reporting context handed to listeners.

use std::path::Path;

use serde_json::Value;
use tracing::warn;

use driftlint_ast::{NodeId, Span, SyntaxTree};

use crate::diagnostic::{Diagnostic, Fix, FixList, Severity, Suggestion};
use crate::rule::RuleMeta;

/// Builds concrete [`Fix`] edits from nodes and spans.
///
/// Handed by reference to fix callbacks so edits are always derived from
/// the tree being linted.
pub struct RuleFixer<'a> {
    tree: &'a SyntaxTree,
}

impl<'a> RuleFixer<'a> {
    pub(crate) fn new(tree: &'a SyntaxTree) -> Self {
        Self { tree }
    }

    pub fn insert_text_before(&self, node: NodeId, text: impl Into<String>) -> Fix {
        Fix::insert(self.tree.span(node).start, text)
    }

    pub fn insert_text_after(&self, node: NodeId, text: impl Into<String>) -> Fix {
        Fix::insert(self.tree.span(node).end, text)
    }

    pub fn insert_text_before_span(&self, span: Span, text: impl Into<String>) -> Fix {
        Fix::insert(span.start, text)
    }

    pub fn insert_text_after_span(&self, span: Span, text: impl Into<String>) -> Fix {
        Fix::insert(span.end, text)
    }

    pub fn replace_text(&self, node: NodeId, text: impl Into<String>) -> Fix {
        Fix::new(self.tree.span(node), text)
    }

    pub fn replace_span(&self, span: Span, text: impl Into<String>) -> Fix {
        Fix::new(span, text)
    }

    pub fn remove(&self, node: NodeId) -> Fix {
        Fix::delete(self.tree.span(node))
    }

    pub fn remove_span(&self, span: Span) -> Fix {
        Fix::delete(span)
    }
}

type FixBuilder = Box<dyn FnOnce(&RuleFixer<'_>, &mut FixList)>;

/// A suggested alternative attached to a report.
pub struct SuggestionDescriptor {
    message_id: String,
    data: Vec<(String, String)>,
    fix: Option<FixBuilder>,
}

impl SuggestionDescriptor {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            data: Vec::new(),
            fix: None,
        }
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }

    pub fn fix(mut self, builder: impl FnOnce(&RuleFixer<'_>, &mut FixList) + 'static) -> Self {
        self.fix = Some(Box::new(builder));
        self
    }
}

/// What a listener reports: the offending node, a message id from the
/// rule's table, template data, an optional fix callback and optional
/// suggestions.
pub struct Report {
    node: NodeId,
    span: Option<Span>,
    message_id: String,
    data: Vec<(String, String)>,
    fix: Option<FixBuilder>,
    suggestions: Vec<SuggestionDescriptor>,
}

impl Report {
    pub fn new(node: NodeId, message_id: impl Into<String>) -> Self {
        Self {
            node,
            span: None,
            message_id: message_id.into(),
            data: Vec::new(),
            fix: None,
            suggestions: Vec::new(),
        }
    }

    /// Overrides the reported span; defaults to the node's span.
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }

    /// Attaches a fix callback, run eagerly when the report lands.
    pub fn fix(mut self, builder: impl FnOnce(&RuleFixer<'_>, &mut FixList) + 'static) -> Self {
        self.fix = Some(Box::new(builder));
        self
    }

    pub fn suggest(mut self, suggestion: SuggestionDescriptor) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

/// The context one rule sees while one file is traversed.
pub struct RuleContext<'a> {
    tree: &'a SyntaxTree,
    file: &'a Path,
    meta: &'a RuleMeta,
    severity: Severity,
    options: Vec<Value>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        tree: &'a SyntaxTree,
        file: &'a Path,
        meta: &'a RuleMeta,
        severity: Severity,
        options: Vec<Value>,
    ) -> Self {
        Self {
            tree,
            file,
            meta,
            severity,
            options,
            diagnostics: Vec::new(),
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn source(&self) -> &'a str {
        self.tree.source()
    }

    pub fn file(&self) -> &Path {
        self.file
    }

    /// Configured options for this rule, after severity normalization.
    pub fn options(&self) -> &[Value] {
        &self.options
    }

    /// Resolves a report into a diagnostic and records it.
    pub fn report(&mut self, report: Report) {
        let span = report.span.unwrap_or_else(|| self.tree.span(report.node));
        let position = self.tree.position_at(span.start);
        let message = self.resolve_message(&report.message_id, &report.data);

        let fixer = RuleFixer::new(self.tree);
        let fix = report.fix.and_then(|builder| {
            let mut fixes = FixList::new();
            builder(&fixer, &mut fixes);
            fixes.into_fix()
        });
        if fix.is_some() && !self.meta.fixable {
            warn!(
                rule = self.meta.id,
                "rule produces fixes without declaring itself fixable"
            );
        }

        if !report.suggestions.is_empty() && !self.meta.suggestions {
            warn!(
                rule = self.meta.id,
                "rule reports suggestions without declaring them in its meta"
            );
        }
        let suggestions = report
            .suggestions
            .into_iter()
            .map(|descriptor| {
                let desc = self.resolve_message(&descriptor.message_id, &descriptor.data);
                let fix = descriptor.fix.and_then(|builder| {
                    let mut fixes = FixList::new();
                    builder(&fixer, &mut fixes);
                    fixes.into_fix()
                });
                Suggestion::new(descriptor.message_id, desc, fix)
            })
            .collect();

        let mut diagnostic = Diagnostic::new(
            self.file,
            position.line,
            position.column,
            span,
            self.severity,
            self.meta.id,
            message,
        )
        .with_message_id(report.message_id);
        diagnostic.fix = fix;
        diagnostic.suggestions = suggestions;

        self.diagnostics.push(diagnostic);
    }

    fn resolve_message(&self, message_id: &str, data: &[(String, String)]) -> String {
        match self.meta.message_template(message_id) {
            Some(template) => interpolate(template, data),
            None => {
                warn!(
                    rule = self.meta.id,
                    message_id, "unknown message id, using it verbatim"
                );
                message_id.to_string()
            }
        }
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

/// Fills `{{key}}` placeholders from the data table.
///
/// Whitespace inside the braces is tolerated; placeholders with no
/// matching key are left in the output verbatim.
fn interpolate(template: &str, data: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        match after_open.find("}}") {
            Some(close) => {
                let key = after_open[..close].trim();
                match data.iter().find(|(k, _)| k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&rest[open..open + 2 + close + 2]),
                }
                rest = &after_open[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}
