//! Container registry and visibility resolution.
//!
//! Containers are grouped by the identity of their normalized `show_on` predicate. Each editable
//! owns one [`ContainerRegistry`], created when its first container registers. Resolving a
//! selection evaluates every *group* once against the ancestor chain and applies the result to all
//! containers of the group, so the cost is bounded by `distinct predicates × chain length`,
//! independent of how many containers share a predicate.
//!
//! Group keys come from [`PredicateIds`], an identity memo that hands out increasing
//! [`PredicateId`]s the first time a predicate object is seen.

use crate::dom::AncestorChain;
use crate::runtime::ComponentId;
use crate::show_on::{EventType, Predicate};
use std::collections::{BTreeMap, HashMap};

/// Stable group key derived from predicate identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredicateId(u64);

impl PredicateId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Identity-to-id memo for predicates.
///
/// Every predicate passed to [`PredicateIds::id_for`] is retained, so its allocation (and thus its
/// address) cannot be reused by a different predicate while the memo is alive.
#[derive(Debug, Default)]
pub struct PredicateIds {
    last: u64,
    by_address: HashMap<usize, (PredicateId, Predicate)>,
}

impl PredicateIds {
    /// Create an empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or assign) the id of `predicate`. Ids start at 1.
    pub fn id_for(&mut self, predicate: &Predicate) -> PredicateId {
        if let Some((id, _)) = self.by_address.get(&predicate.address()) {
            return *id;
        }

        self.last += 1;
        let id = PredicateId(self.last);
        self.by_address
            .insert(predicate.address(), (id, predicate.clone()));
        id
    }

    /// Number of distinct predicates seen.
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    /// Returns `true` if no predicate has been seen yet.
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

/// Containers sharing one predicate.
#[derive(Debug, Clone)]
pub struct PredicateGroup {
    predicate: Predicate,
    containers: Vec<ComponentId>,
}

impl PredicateGroup {
    /// The predicate every container in this group was registered with.
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Containers in registration order.
    pub fn containers(&self) -> &[ComponentId] {
        &self.containers
    }

    /// Evaluate the group's predicate over `chain`, sentinel first, stopping at the first match.
    pub fn should_show(&self, chain: &AncestorChain<'_>, event: Option<&EventType>) -> bool {
        chain
            .contexts()
            .any(|(node, ancestors)| self.predicate.evaluate_in(node, event, ancestors))
    }
}

/// Show/hide outcome for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDecision {
    /// The group key.
    pub group: PredicateId,
    /// Whether the group's containers should be shown.
    pub show: bool,
}

/// Per-editable grouping of containers by predicate.
#[derive(Debug, Default)]
pub struct ContainerRegistry {
    groups: BTreeMap<PredicateId, PredicateGroup>,
    membership: HashMap<ComponentId, PredicateId>,
}

impl ContainerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `container` to the group keyed by `key`, creating the group on first use.
    ///
    /// `predicate` must be the predicate `key` was assigned to. Returns `true` if a new group was
    /// created.
    pub fn register(&mut self, key: PredicateId, predicate: &Predicate, container: ComponentId) -> bool {
        self.membership.insert(container, key);
        match self.groups.get_mut(&key) {
            Some(group) => {
                debug_assert!(
                    group.predicate.ptr_eq(predicate),
                    "group key reused for a different predicate"
                );
                group.containers.push(container);
                false
            }
            None => {
                self.groups.insert(
                    key,
                    PredicateGroup {
                        predicate: predicate.clone(),
                        containers: vec![container],
                    },
                );
                true
            }
        }
    }

    /// Look up a group.
    pub fn group(&self, key: PredicateId) -> Option<&PredicateGroup> {
        self.groups.get(&key)
    }

    /// All groups, in ascending key order.
    pub fn groups(&self) -> impl Iterator<Item = (PredicateId, &PredicateGroup)> {
        self.groups.iter().map(|(k, g)| (*k, g))
    }

    /// Number of distinct predicate groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of registered containers.
    pub fn container_count(&self) -> usize {
        self.groups.values().map(|g| g.containers.len()).sum()
    }

    /// The group a container belongs to.
    pub fn group_of(&self, container: ComponentId) -> Option<PredicateId> {
        self.membership.get(&container).copied()
    }

    /// Decide, for every group, whether its containers should be shown for `chain`.
    pub fn resolve(&self, chain: &AncestorChain<'_>, event: Option<&EventType>) -> Vec<GroupDecision> {
        self.groups
            .iter()
            .map(|(key, group)| {
                let show = group.should_show(chain, event);
                tracing::trace!(group = key.0, show, "resolved container group");
                GroupDecision { group: *key, show }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, DomTree, Element};
    use crate::show_on::{ShowOn, ShowOnNormalizer};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cid(n: u64) -> ComponentId {
        ComponentId::from_raw(n)
    }

    #[test]
    fn test_ids_follow_identity() {
        let mut normalizer = ShowOnNormalizer::new();
        let mut ids = PredicateIds::new();
        let heading = normalizer.normalize(&ShowOn::from("h1"));
        let always = normalizer.normalize(&ShowOn::Default);

        let a = ids.id_for(&heading);
        let b = ids.id_for(&always);
        let c = ids.id_for(&normalizer.normalize(&ShowOn::from("h1")));
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(a, c);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_register_groups_preserve_order() {
        let mut normalizer = ShowOnNormalizer::new();
        let mut ids = PredicateIds::new();
        let mut registry = ContainerRegistry::new();

        for (n, rule) in [(1, "table"), (2, "h1"), (3, "table"), (4, "table")] {
            let predicate = normalizer.normalize(&ShowOn::from(rule));
            registry.register(ids.id_for(&predicate), &predicate, cid(n));
        }

        assert_eq!(registry.group_count(), 2);
        assert_eq!(registry.container_count(), 4);
        let table = registry.group_of(cid(3)).unwrap();
        assert_eq!(
            registry.group(table).unwrap().containers(),
            &[cid(1), cid(3), cid(4)]
        );
        assert_eq!(registry.group_of(cid(99)), None);
    }

    #[test]
    fn test_one_evaluation_per_node_per_group() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let predicate = Predicate::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });

        let mut ids = PredicateIds::new();
        let key = ids.id_for(&predicate);
        let mut registry = ContainerRegistry::new();
        for n in 0..50 {
            registry.register(key, &predicate, cid(n));
        }

        let mut doc = Document::new();
        let root = doc.create_root(Element::new("p"));
        let em = doc.append_element(root, Element::new("em")).unwrap();
        let text = doc.append_text(em, "x").unwrap();
        let chain = AncestorChain::walk(&doc, text);

        let decisions = registry.resolve(&chain, None);
        assert_eq!(decisions, vec![GroupDecision { group: key, show: false }]);
        // Sentinel + text + em + p.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_resolution_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let predicate = Predicate::new(move |node, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            node.and_then(|n| n.as_element())
                .is_some_and(|el| el.tag_name() == "em")
        });
        let mut ids = PredicateIds::new();
        let mut registry = ContainerRegistry::new();
        registry.register(ids.id_for(&predicate), &predicate, cid(1));

        let mut doc = Document::new();
        let root = doc.create_root(Element::new("p"));
        let em = doc.append_element(root, Element::new("em")).unwrap();
        let chain = AncestorChain::from_nodes([doc.node(em).unwrap(), doc.node(root).unwrap()]);

        let decisions = registry.resolve(&chain, None);
        assert!(decisions[0].show);
        // Sentinel, then `em` matched; `p` is never visited.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_group_of_follows_registration() {
        let mut normalizer = ShowOnNormalizer::new();
        let mut ids = PredicateIds::new();
        let mut registry = ContainerRegistry::new();

        let rules = ["h1", "table", "ul > li", "h1"];
        for n in 0..400u64 {
            let predicate = normalizer.normalize(&ShowOn::from(rules[n as usize % rules.len()]));
            registry.register(ids.id_for(&predicate), &predicate, cid(n));
        }

        assert_eq!(registry.group_count(), 3);
        assert_eq!(registry.group_of(cid(0)), registry.group_of(cid(3)));
        assert_ne!(registry.group_of(cid(1)), registry.group_of(cid(2)));
        for (key, group) in registry.groups() {
            for container in group.containers() {
                assert_eq!(registry.group_of(*container), Some(key));
            }
        }
        assert_eq!(registry.group_of(cid(400)), None);
    }

    #[test]
    fn test_predicates_see_ancestors_above_each_entry() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let record = seen.clone();
        let predicate = Predicate::new(move |node, _, ancestors| {
            if let Ok(mut seen) = record.lock() {
                seen.push((node.is_some(), ancestors.iter().count()));
            }
            false
        });
        let mut ids = PredicateIds::new();
        let mut registry = ContainerRegistry::new();
        registry.register(ids.id_for(&predicate), &predicate, cid(1));

        let mut doc = Document::new();
        let root = doc.create_root(Element::new("ul"));
        let li = doc.append_element(root, Element::new("li")).unwrap();
        let text = doc.append_text(li, "x").unwrap();
        registry.resolve(&AncestorChain::walk(&doc, text), None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(false, 0), (true, 2), (true, 1), (true, 0)]
        );
    }
}
