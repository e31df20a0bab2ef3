//! Menu tree — arena of nodes, built top-down once.

use bevy_menu_focus_layout::{MenuDef, MenuLayout, SelectKind, StartDirective};

use crate::cascade::Navigator;
use crate::input::{PlayerId, PlayerRegistry, RoutingTargetId, RoutingTargets, Selectable};
use crate::node::{MenuNode, MenuNodeConfig, NodeId, NodeParts, StartBehaviour};
use crate::router::InputEventRouter;
use crate::settings::MenuSettings;
use crate::LOG_TARGET;

/// Where a node's routing target came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutingSource {
    /// Set on the node itself.
    OnSelf,
    /// Inherited from the ancestor `depth` levels up (1 = parent).
    Parent { depth: usize },
    /// Fallback from [`MenuSettings::default_routing_target`].
    Settings,
}

/// A forest of menu nodes.
///
/// Nodes own no references to each other: parents are stored as indices and
/// children are listed in each node's [`crate::SubmenuRegistry`]. Because
/// children can only be created under an existing parent, the structure can
/// never contain a cycle.
///
/// Mutating operations (open, close, focus) go through a [`Navigator`]:
///
/// ```ignore
/// let mut nav = tree.navigator(&mut players, &mut targets);
/// nav.start();
/// nav.open_submenu(root, "Options", Some(player));
/// ```
pub struct MenuTree {
    pub(crate) nodes: Vec<MenuNode>,
    pub(crate) settings: MenuSettings,
    pub(crate) router: InputEventRouter,
    pub(crate) started: bool,
    pub(crate) warned_unstarted: bool,
}

impl MenuTree {
    /// Start building a tree with the given settings.
    pub fn builder(settings: MenuSettings) -> MenuTreeBuilder {
        MenuTreeBuilder {
            nodes: Vec::new(),
            settings,
        }
    }

    /// Build a tree from a validated layout.
    ///
    /// `parts` is called once per menu, parents before children, to supply
    /// the presentation, behaviour and tooltips of each node.
    pub fn from_layout(
        layout: &MenuLayout,
        settings: MenuSettings,
        mut parts: impl FnMut(&MenuDef) -> NodeParts,
    ) -> Self {
        let mut builder = Self::builder(settings);

        for root in layout.roots() {
            let id = builder.add_root(config_from_def(root), parts(root));
            let mut stack = vec![(id, root)];

            while let Some((parent, def)) = stack.pop() {
                for sub in &def.submenus {
                    // Layout validation guarantees every reference resolves
                    let Some(child) = layout.get(&sub.menu) else {
                        continue;
                    };
                    let child_id =
                        builder.add_submenu(parent, sub.id.clone(), config_from_def(child), parts(child));
                    stack.push((child_id, child));
                }
            }
        }

        builder.build()
    }

    /// Borrow the tree together with its collaborators to run operations.
    pub fn navigator<'a>(
        &'a mut self,
        players: &'a mut dyn PlayerRegistry,
        routing: &'a mut dyn RoutingTargets,
    ) -> Navigator<'a> {
        Navigator::new(self, players, routing)
    }

    #[inline]
    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    #[inline]
    pub fn router(&self) -> &InputEventRouter {
        &self.router
    }

    /// Whether start behaviours have been applied.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    #[inline]
    pub fn node(&self, node: NodeId) -> Option<&MenuNode> {
        self.nodes.get(node.0)
    }

    /// All node ids in creation order (parents before children).
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(|&id| self.nodes[id.0].parent.is_none())
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.ids().find(|&id| self.nodes[id.0].name() == name)
    }

    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// `false` for unknown nodes.
    #[inline]
    pub fn is_open(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(MenuNode::is_open)
    }

    /// Get a submenu from its id.
    pub fn submenu(&self, node: NodeId, id: &str) -> Option<NodeId> {
        self.node(node)?.submenus.get(id)
    }

    /// Registered submenus in configured order.
    pub fn submenus(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node)
            .map(|n| n.submenus.nodes().collect())
            .unwrap_or_default()
    }

    pub fn is_submenu_open(&self, node: NodeId) -> bool {
        self.submenus(node).into_iter().any(|sub| self.is_open(sub))
    }

    pub fn are_submenus_cached(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.submenus.is_cached())
    }

    #[inline]
    pub fn focused_player(&self, node: NodeId) -> Option<PlayerId> {
        self.node(node)?.focused_player()
    }

    /// The node's focused player, or the first one found depth-first among
    /// its submenus.
    pub fn focused_player_including_children(&self, node: NodeId) -> Option<PlayerId> {
        let n = self.node(node)?;
        if let Some(player) = n.focused_player() {
            return Some(player);
        }
        n.submenus
            .nodes()
            .find_map(|sub| self.focused_player_including_children(sub))
    }

    /// Resolve the routing target for `node`: the node's own, else the nearest
    /// ancestor's, else the settings default.
    pub fn resolve_routing_target(&self, node: NodeId) -> Option<(RoutingTargetId, RoutingSource)> {
        let mut current = Some(node);
        let mut depth = 0;

        while let Some(id) = current {
            let n = self.node(id)?;
            if let Some(target) = n.config.routing_target {
                let source = if depth == 0 {
                    RoutingSource::OnSelf
                } else {
                    RoutingSource::Parent { depth }
                };
                return Some((target, source));
            }
            current = n.parent;
            depth += 1;
        }

        self.settings
            .default_routing_target
            .map(|target| (target, RoutingSource::Settings))
    }

    /// Label used in log lines.
    /// Whether `ancestor` sits strictly above `node`.
    pub(crate) fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    pub(crate) fn name(&self, node: NodeId) -> &str {
        self.node(node).map(MenuNode::name).unwrap_or("<unknown>")
    }
}

impl std::fmt::Debug for MenuTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuTree")
            .field("nodes", &self.nodes)
            .field("settings", &self.settings)
            .field("started", &self.started)
            .finish()
    }
}

fn config_from_def(def: &MenuDef) -> MenuNodeConfig {
    let start = match def.start {
        StartDirective::Open => StartBehaviour::OpenOnStart,
        StartDirective::Closed => StartBehaviour::ClosedOnStart,
        StartDirective::Unmanaged => StartBehaviour::Unmanaged,
    };

    let mut config = MenuNodeConfig::new(def.name.clone())
        .hides_parent(def.hides_parent)
        .hides_siblings(def.hides_siblings)
        .start(start)
        .auto_focus_player_one(def.auto_focus);

    if let Some(target) = def.routing_target {
        config = config.routing_target(RoutingTargetId(target));
    }
    if let Some(sel) = def.first_select {
        config = config.first_select(match sel.kind {
            SelectKind::Button => Selectable::button(sel.id),
            SelectKind::Other => Selectable::other(sel.id),
        });
    }
    config
}

// =============================================================================
// Builder
// =============================================================================

/// Top-down builder for [`MenuTree`].
pub struct MenuTreeBuilder {
    nodes: Vec<MenuNode>,
    settings: MenuSettings,
}

impl MenuTreeBuilder {
    /// Add a node without a parent.
    pub fn add_root(&mut self, config: MenuNodeConfig, parts: NodeParts) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MenuNode::new(config, parts));
        id
    }

    /// Add a node configured as submenu `id` of `parent`.
    ///
    /// The parent link is only established by [`Self::build`], and only if
    /// the parent's registry accepts `id`. Nodes under a rejected id end up
    /// as roots.
    pub fn add_submenu(
        &mut self,
        parent: NodeId,
        id: impl Into<String>,
        config: MenuNodeConfig,
        parts: NodeParts,
    ) -> NodeId {
        let child = self.add_root(config, parts);
        let id = id.into();

        match self.nodes.get_mut(parent.0) {
            Some(p) if parent != child => p.configured.push((id, child)),
            _ => tracing::error!(
                target: LOG_TARGET,
                "Cannot add submenu \"{}\" under unknown parent {}, adding it as a root",
                id,
                parent
            ),
        }
        child
    }

    /// Validate every node's submenu list and link parents.
    pub fn build(mut self) -> MenuTree {
        for idx in 0..self.nodes.len() {
            let configured = std::mem::take(&mut self.nodes[idx].configured);
            let owner = self.nodes[idx].name().to_string();
            let accepted = self.nodes[idx].submenus.cache(&owner, &configured);

            for child in accepted {
                let id = self.nodes[idx].submenus.id_of(child).map(str::to_string);
                let node = &mut self.nodes[child.0];
                node.parent = Some(NodeId(idx));
                node.id = id;
            }
            self.nodes[idx].configured = configured;
        }

        MenuTree {
            nodes: self.nodes,
            settings: self.settings,
            router: InputEventRouter::new(),
            started: false,
            warned_unstarted: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::PanelToggle;

    fn parts() -> NodeParts {
        NodeParts::new(PanelToggle::default())
    }

    fn sample_tree() -> (MenuTree, NodeId, NodeId, NodeId) {
        let mut b = MenuTree::builder(MenuSettings::default());
        let root = b.add_root(
            MenuNodeConfig::new("Root").routing_target(RoutingTargetId(1)),
            parts(),
        );
        let sub1 = b.add_submenu(root, "Sub1", MenuNodeConfig::new("Sub1"), parts());
        let sub2 = b.add_submenu(
            root,
            "Sub2",
            MenuNodeConfig::new("Sub2").routing_target(RoutingTargetId(2)),
            parts(),
        );
        (b.build(), root, sub1, sub2)
    }

    #[test]
    fn build_links_parents_once() {
        let (tree, root, sub1, sub2) = sample_tree();

        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.parent(sub1), Some(root));
        assert_eq!(tree.parent(sub2), Some(root));
        assert_eq!(tree.node(sub1).unwrap().id(), Some("Sub1"));
        assert_eq!(tree.node(root).unwrap().id(), None);
        assert!(tree.are_submenus_cached(root));
    }

    #[test]
    fn submenu_lookup() {
        let (tree, root, sub1, sub2) = sample_tree();

        assert_eq!(tree.submenu(root, "Sub1"), Some(sub1));
        assert_eq!(tree.submenu(root, "Sub2"), Some(sub2));
        assert_eq!(tree.submenu(root, "Nope"), None);
        assert_eq!(tree.submenus(root), vec![sub1, sub2]);
        assert!(tree.submenus(sub1).is_empty());
    }

    #[test]
    fn rejected_ids_leave_children_parentless() {
        let mut b = MenuTree::builder(MenuSettings::default());
        let root = b.add_root(MenuNodeConfig::new("Root"), parts());
        let a = b.add_submenu(root, "a", MenuNodeConfig::new("A"), parts());
        let dup = b.add_submenu(root, "a", MenuNodeConfig::new("A2"), parts());
        let b_node = b.add_submenu(root, "b", MenuNodeConfig::new("B"), parts());
        let blank = b.add_submenu(root, "", MenuNodeConfig::new("Blank"), parts());
        let tree = b.build();

        assert_eq!(tree.submenus(root), vec![a, b_node]);
        assert_eq!(tree.parent(dup), None);
        assert_eq!(tree.parent(blank), None);
        assert_eq!(tree.roots().collect::<Vec<_>>(), vec![root, dup, blank]);
    }

    #[test]
    fn unknown_parent_adds_root() {
        let mut b = MenuTree::builder(MenuSettings::default());
        let orphan = b.add_submenu(NodeId(42), "x", MenuNodeConfig::new("X"), parts());
        let tree = b.build();

        assert_eq!(tree.parent(orphan), None);
        assert_eq!(tree.roots().count(), 1);
    }

    #[test]
    fn routing_resolution_chain() {
        let mut b = MenuTree::builder(
            MenuSettings::default().with_default_routing_target(RoutingTargetId(9)),
        );
        let root = b.add_root(MenuNodeConfig::new("Root"), parts());
        let mid = b.add_submenu(
            root,
            "mid",
            MenuNodeConfig::new("Mid").routing_target(RoutingTargetId(3)),
            parts(),
        );
        let leaf = b.add_submenu(mid, "leaf", MenuNodeConfig::new("Leaf"), parts());
        let deeper = b.add_submenu(leaf, "deeper", MenuNodeConfig::new("Deeper"), parts());
        let tree = b.build();

        assert_eq!(
            tree.resolve_routing_target(mid),
            Some((RoutingTargetId(3), RoutingSource::OnSelf))
        );
        assert_eq!(
            tree.resolve_routing_target(leaf),
            Some((RoutingTargetId(3), RoutingSource::Parent { depth: 1 }))
        );
        assert_eq!(
            tree.resolve_routing_target(deeper),
            Some((RoutingTargetId(3), RoutingSource::Parent { depth: 2 }))
        );
        assert_eq!(
            tree.resolve_routing_target(root),
            Some((RoutingTargetId(9), RoutingSource::Settings))
        );
    }

    #[test]
    fn routing_resolution_without_fallback() {
        let mut b = MenuTree::builder(MenuSettings::default());
        let root = b.add_root(MenuNodeConfig::new("Root"), parts());
        let tree = b.build();

        assert_eq!(tree.resolve_routing_target(root), None);
        assert_eq!(tree.resolve_routing_target(NodeId(5)), None);
    }

    #[test]
    fn find_by_name() {
        let (tree, _, sub1, _) = sample_tree();
        assert_eq!(tree.find("Sub1"), Some(sub1));
        assert_eq!(tree.find("Missing"), None);
    }

    #[test]
    fn unknown_nodes_are_closed_and_unfocused() {
        let (tree, ..) = sample_tree();
        let ghost = NodeId(100);
        assert!(!tree.contains(ghost));
        assert!(!tree.is_open(ghost));
        assert_eq!(tree.focused_player(ghost), None);
        assert_eq!(tree.focused_player_including_children(ghost), None);
    }
}
