//! Submenu registry — id lookup for a node's children.

use std::collections::HashMap;

use crate::node::NodeId;
use crate::LOG_TARGET;

/// Maps stable string ids to child nodes, in configured order.
///
/// Built once from a node's configured submenu list. Empty and repeated ids
/// are dropped with an error log; the first occurrence of an id wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmenuRegistry {
    entries: Vec<(String, NodeId)>,
    id_to_idx: HashMap<String, usize>,
    cached: bool,
}

impl SubmenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `configured`, logging each dropped entry.
    pub fn build(owner: &str, configured: &[(String, NodeId)]) -> Self {
        let mut registry = Self::new();
        registry.cache(owner, configured);
        registry
    }

    /// Replace the cache with the validated contents of `configured`.
    ///
    /// Returns the children that were accepted.
    pub fn cache(&mut self, owner: &str, configured: &[(String, NodeId)]) -> Vec<NodeId> {
        if !self.entries.is_empty() {
            tracing::warn!(
                target: LOG_TARGET,
                "Caching submenus on \"{}\" but {} are already cached",
                owner,
                self.entries.len()
            );
        }

        self.entries.clear();
        self.id_to_idx.clear();

        let mut accepted = Vec::with_capacity(configured.len());
        for (id, node) in configured {
            if id.is_empty() {
                tracing::error!(
                    target: LOG_TARGET,
                    "Submenu {} on \"{}\" has an empty id, not caching it",
                    node,
                    owner
                );
                continue;
            }
            if self.id_to_idx.contains_key(id) {
                tracing::error!(
                    target: LOG_TARGET,
                    "Submenu {} on \"{}\" repeats the id \"{}\", not caching it",
                    node,
                    owner,
                    id
                );
                continue;
            }

            self.id_to_idx.insert(id.clone(), self.entries.len());
            self.entries.push((id.clone(), *node));
            accepted.push(*node);
        }

        self.cached = true;
        accepted
    }

    /// Id → child
    #[inline]
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.id_to_idx.get(id).map(|&i| self.entries[i].1)
    }

    /// Child → id
    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, n)| *n == node)
            .map(|(id, _)| id.as_str())
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.id_to_idx.contains_key(id)
    }

    /// Children in configured order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|(_, n)| *n)
    }

    /// `(id, child)` pairs in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        self.entries.iter().map(|(id, n)| (id.as_str(), *n))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether [`Self::cache`] has run.
    #[inline]
    pub fn is_cached(&self) -> bool {
        self.cached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    /// Counts error events on the crate's log target.
    struct ErrorCount(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorCount {
        fn on_event(&self, event: &tracing::Event<'_>, _cx: Context<'_, S>) {
            let meta = event.metadata();
            if *meta.level() == tracing::Level::ERROR && meta.target() == crate::LOG_TARGET {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn configured(ids: &[&str]) -> Vec<(String, NodeId)> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), NodeId(i + 1)))
            .collect()
    }

    #[test]
    fn drops_duplicate_and_empty_ids() {
        let registry = SubmenuRegistry::build("Root", &configured(&["a", "a", "b", ""]));

        assert_eq!(registry.len(), 2);
        // First "a" wins
        assert_eq!(registry.get("a"), Some(NodeId(1)));
        assert_eq!(registry.get("b"), Some(NodeId(3)));
        assert!(!registry.contains(""));
    }

    #[test]
    fn each_dropped_id_logs_an_error() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCount(errors.clone()));

        let registry = tracing::subscriber::with_default(subscriber, || {
            SubmenuRegistry::build("Root", &configured(&["a", "a", "b", ""]))
        });

        assert_eq!(registry.len(), 2);
        assert_eq!(errors.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cache_reports_accepted_children() {
        let mut registry = SubmenuRegistry::new();
        assert!(!registry.is_cached());

        let accepted = registry.cache("Root", &configured(&["a", "a", "b", ""]));
        assert_eq!(accepted, vec![NodeId(1), NodeId(3)]);
        assert!(registry.is_cached());
    }

    #[test]
    fn keeps_configured_order() {
        let registry = SubmenuRegistry::build("Root", &configured(&["z", "m", "a"]));
        let ids: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["z", "m", "a"]);
        assert_eq!(
            registry.nodes().collect::<Vec<_>>(),
            vec![NodeId(1), NodeId(2), NodeId(3)]
        );
    }

    #[test]
    fn recaching_replaces_entries() {
        let mut registry = SubmenuRegistry::build("Root", &configured(&["a", "b"]));
        registry.cache("Root", &[("c".to_string(), NodeId(9))]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a"), None);
        assert_eq!(registry.get("c"), Some(NodeId(9)));
    }

    #[test]
    fn reverse_lookup() {
        let registry = SubmenuRegistry::build("Root", &configured(&["a", "b"]));
        assert_eq!(registry.id_of(NodeId(2)), Some("b"));
        assert_eq!(registry.id_of(NodeId(7)), None);
    }

    #[test]
    fn unknown_id_is_none() {
        let registry = SubmenuRegistry::build("Root", &configured(&["a"]));
        assert_eq!(registry.get("missing"), None);
    }
}
