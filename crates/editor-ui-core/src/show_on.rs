//! `show_on` specifications and their normalization into predicates.
//!
//! A container decides whether it is visible from a [`ShowOn`] specification: a match rule, a
//! flag, or an arbitrary function. [`ShowOnNormalizer`] turns every specification into a
//! [`Predicate`], and guarantees that equal rule strings map to the *same* predicate object.
//! Predicate identity is what the container registry groups by, so a rule shared by a hundred
//! containers is evaluated once per ancestor node rather than a hundred times.

use crate::dom::{Ancestors, Node};
use crate::selector::Selector;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Classifies the notification that triggered a visibility resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// The selection moved.
    SelectionChanged,
    /// An editing command ran.
    CommandExecuted,
    /// A host-defined event.
    Custom(String),
}

/// Signature of a visibility predicate.
///
/// The node is `None` for the "no context" sentinel at the front of every ancestor chain. The
/// last argument holds the chain entries above the node, so rules with combinators can look at
/// the node's context; it is empty for the sentinel.
pub type PredicateFn =
    dyn Fn(Option<&Node>, Option<&EventType>, Ancestors<'_>) -> bool + Send + Sync;

/// A shared, identity-comparable visibility predicate.
///
/// Cloning is cheap and keeps identity: clones compare equal under [`Predicate::ptr_eq`].
#[derive(Clone)]
pub struct Predicate {
    inner: Arc<PredicateFn>,
}

impl Predicate {
    /// Wrap a function as a new predicate with a fresh identity.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Node>, Option<&EventType>, Ancestors<'_>) -> bool + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Evaluate the predicate for one entry with no ancestors above it.
    pub fn evaluate(&self, node: Option<&Node>, event: Option<&EventType>) -> bool {
        self.evaluate_in(node, event, Ancestors::default())
    }

    /// Evaluate the predicate for one ancestor chain entry.
    pub fn evaluate_in(
        &self,
        node: Option<&Node>,
        event: Option<&EventType>,
        ancestors: Ancestors<'_>,
    ) -> bool {
        (self.inner)(node, event, ancestors)
    }

    /// Returns `true` if both handles refer to the same predicate object.
    pub fn ptr_eq(&self, other: &Predicate) -> bool {
        self.address() == other.address()
    }

    pub(crate) fn address(&self) -> usize {
        Arc::as_ptr(&self.inner).cast::<()>() as usize
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate")
            .field(&format_args!("{:#x}", self.address()))
            .finish()
    }
}

/// A user-supplied visibility rule.
#[derive(Debug, Clone, Default)]
pub enum ShowOn {
    /// No rule given; always visible.
    #[default]
    Default,
    /// A boolean setting. Every flag value normalizes to "always visible".
    Flag(bool),
    /// An element match rule (see [`crate::selector`]).
    Selector(String),
    /// A ready-made predicate, used as-is.
    Predicate(Predicate),
    /// A value of a kind this version does not understand; always visible.
    ///
    /// The payload is a short description used for diagnostics.
    Unrecognized(String),
}

impl From<&str> for ShowOn {
    fn from(rule: &str) -> Self {
        ShowOn::Selector(rule.to_string())
    }
}

impl From<String> for ShowOn {
    fn from(rule: String) -> Self {
        ShowOn::Selector(rule)
    }
}

impl From<bool> for ShowOn {
    fn from(flag: bool) -> Self {
        ShowOn::Flag(flag)
    }
}

impl From<Predicate> for ShowOn {
    fn from(predicate: Predicate) -> Self {
        ShowOn::Predicate(predicate)
    }
}

/// Normalizes [`ShowOn`] specifications into predicates.
///
/// Holds the rule-text cache and the shared "always visible" predicate. A host keeps one
/// normalizer for its whole lifetime; the cache only grows.
pub struct ShowOnNormalizer {
    selectors: HashMap<String, Predicate>,
    always: Predicate,
}

impl ShowOnNormalizer {
    /// Create a normalizer with an empty rule cache.
    pub fn new() -> Self {
        Self {
            selectors: HashMap::new(),
            always: Predicate::new(|_, _, _| true),
        }
    }

    /// Normalize a specification.
    ///
    /// - [`ShowOn::Predicate`] is returned unchanged.
    /// - [`ShowOn::Selector`] is looked up by exact rule text and created on first use.
    /// - Everything else yields the shared always-visible predicate.
    ///
    /// This never fails. A rule that does not parse becomes a predicate that never matches.
    pub fn normalize(&mut self, spec: &ShowOn) -> Predicate {
        match spec {
            ShowOn::Predicate(predicate) => predicate.clone(),
            ShowOn::Selector(rule) => self.selector_predicate(rule),
            ShowOn::Unrecognized(what) => {
                tracing::warn!("show_on is {what}; it will be treated as always visible");
                self.always.clone()
            }
            ShowOn::Default | ShowOn::Flag(_) => self.always.clone(),
        }
    }

    /// The shared always-visible predicate.
    pub fn always(&self) -> &Predicate {
        &self.always
    }

    /// Number of distinct rule strings seen so far.
    pub fn cached_rule_count(&self) -> usize {
        self.selectors.len()
    }

    fn selector_predicate(&mut self, rule: &str) -> Predicate {
        if let Some(predicate) = self.selectors.get(rule) {
            return predicate.clone();
        }

        let predicate = match Selector::parse(rule) {
            Ok(selector) => Predicate::new(move |node, _, ancestors| {
                node.is_some_and(|n| selector.matches_in(n, ancestors))
            }),
            Err(err) => {
                tracing::warn!("invalid show_on rule {rule:?}: {err}; it will never match");
                Predicate::new(|_, _, _| false)
            }
        };
        self.selectors.insert(rule.to_string(), predicate.clone());
        predicate
    }
}

impl Default for ShowOnNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShowOnNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShowOnNormalizer")
            .field("cached_rules", &self.selectors.len())
            .field("always", &self.always)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{AncestorChain, Document, DomTree, Element};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_equal_rules_share_identity() {
        let mut normalizer = ShowOnNormalizer::new();
        let a = normalizer.normalize(&ShowOn::from("h1,h2"));
        let b = normalizer.normalize(&ShowOn::from("h1,h2".to_string()));
        let c = normalizer.normalize(&ShowOn::from("h1, h2"));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(normalizer.cached_rule_count(), 2);
    }

    #[test]
    fn test_non_rules_share_always_singleton() {
        let mut normalizer = ShowOnNormalizer::new();
        let default = normalizer.normalize(&ShowOn::Default);
        let yes = normalizer.normalize(&ShowOn::from(true));
        let no = normalizer.normalize(&ShowOn::from(false));
        let unknown = normalizer.normalize(&ShowOn::Unrecognized("a number".to_string()));
        for p in [&yes, &no, &unknown] {
            assert!(default.ptr_eq(p));
        }
        assert!(default.ptr_eq(normalizer.always()));
        assert!(default.evaluate(None, None));
    }

    #[test]
    fn test_function_passes_through() {
        let mut normalizer = ShowOnNormalizer::new();
        let custom = Predicate::new(|_, event, _| event == Some(&EventType::CommandExecuted));
        let normalized = normalizer.normalize(&ShowOn::from(custom.clone()));
        assert!(normalized.ptr_eq(&custom));
        assert!(normalized.evaluate(None, Some(&EventType::CommandExecuted)));
        assert!(!normalized.evaluate(None, Some(&EventType::SelectionChanged)));
    }

    #[test]
    fn test_rule_predicate_matches_nodes_not_sentinel() {
        let mut doc = Document::new();
        let table = doc.create_root(Element::new("table"));
        let cell = doc.append_element(table, Element::new("td")).unwrap();

        let mut normalizer = ShowOnNormalizer::new();
        let predicate = normalizer.normalize(&ShowOn::from("table"));
        assert!(predicate.evaluate(doc.node(table), None));
        assert!(!predicate.evaluate(doc.node(cell), None));
        assert!(!predicate.evaluate(None, None));
    }

    #[test]
    fn test_combinator_rule_uses_ancestors() {
        let mut doc = Document::new();
        let table = doc.create_root(Element::new("table"));
        let cell = doc.append_element(table, Element::new("td")).unwrap();
        let text = doc.append_text(cell, "1").unwrap();
        let chain = AncestorChain::walk(&doc, text);

        let mut normalizer = ShowOnNormalizer::new();
        let predicate = normalizer.normalize(&ShowOn::from("table td"));
        let matched: Vec<bool> = chain
            .contexts()
            .map(|(node, ancestors)| predicate.evaluate_in(node, None, ancestors))
            .collect();
        assert_eq!(matched, vec![false, false, true, false]);
        assert!(!predicate.evaluate(doc.node(cell), None));
    }

    #[test]
    fn test_invalid_rule_never_matches_and_is_cached() {
        let mut normalizer = ShowOnNormalizer::new();
        let a = normalizer.normalize(&ShowOn::from("ul + li"));
        let b = normalizer.normalize(&ShowOn::from("ul + li"));
        assert!(a.ptr_eq(&b));

        let mut doc = Document::new();
        let li = doc.create_root(Element::new("li"));
        assert!(!a.evaluate(doc.node(li), None));
    }
}
