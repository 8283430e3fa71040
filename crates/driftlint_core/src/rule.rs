//! The rule abstraction: metadata, listener registration and dispatch
//! events.

use driftlint_ast::{NodeId, NodeKind};
use serde_json::Value;

use crate::context::RuleContext;
use crate::diagnostic::Severity;

/// Static description of a rule.
///
/// `messages` maps message ids to templates; templates may contain
/// `{{name}}` placeholders filled in at report time. `fixable` and
/// `suggestions` declare what the rule's reports may carry.
#[derive(Debug, Clone, Copy)]
pub struct RuleMeta {
    pub id: &'static str,
    pub description: &'static str,
    pub default_severity: Severity,
    pub fixable: bool,
    pub suggestions: bool,
    pub messages: &'static [(&'static str, &'static str)],
}

impl RuleMeta {
    pub fn message_template(&self, message_id: &str) -> Option<&'static str> {
        self.messages
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, template)| *template)
    }
}

/// When a listener fires during the single traversal of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Entering a named node of this kind, before its children.
    Enter(NodeKind),
    /// Leaving a named node of this kind, after its children.
    Exit(NodeKind),
    /// Entering every named node regardless of kind.
    AnyNode,
}

/// A callback bound to one [`Event`] for the duration of one file.
pub type NodeHandler = Box<dyn FnMut(&mut RuleContext<'_>, NodeId)>;

/// The listener table one rule instance registers for one file.
///
/// At a given node, kind-specific handlers fire before [`Event::AnyNode`]
/// handlers; within each group, registration order is preserved.
#[derive(Default)]
pub struct RuleListeners {
    handlers: Vec<(Event, NodeHandler)>,
}

impl RuleListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, event: Event, handler: impl FnMut(&mut RuleContext<'_>, NodeId) + 'static) {
        self.handlers.push((event, Box::new(handler)));
    }

    pub fn on_enter(
        &mut self,
        kind: NodeKind,
        handler: impl FnMut(&mut RuleContext<'_>, NodeId) + 'static,
    ) {
        self.on(Event::Enter(kind), handler);
    }

    pub fn on_exit(
        &mut self,
        kind: NodeKind,
        handler: impl FnMut(&mut RuleContext<'_>, NodeId) + 'static,
    ) {
        self.on(Event::Exit(kind), handler);
    }

    pub fn on_any(&mut self, handler: impl FnMut(&mut RuleContext<'_>, NodeId) + 'static) {
        self.on(Event::AnyNode, handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub(crate) fn into_handlers(self) -> Vec<(Event, NodeHandler)> {
        self.handlers
    }
}

impl std::fmt::Debug for RuleListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let events: Vec<&Event> = self.handlers.iter().map(|(event, _)| event).collect();
        f.debug_struct("RuleListeners")
            .field("events", &events)
            .finish()
    }
}

/// A lint rule.
///
/// `create` is called once per file with the rule's configured options and
/// returns the listeners to run during that file's traversal. A panic in
/// `create` or in any listener poisons the rule for that file only.
pub trait RuleModule: Send + Sync {
    fn meta(&self) -> &RuleMeta;

    fn create(&self, options: &[Value]) -> RuleListeners;
}
