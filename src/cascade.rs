//! Navigation cascade — open, close and back navigation.
//!
//! Opening a node changes the visibility and focus of its parent and
//! siblings in the same call:
//!
//! 1. the parent is closed (`hides_parent`) or loses its focus,
//! 2. open siblings are closed when the node `hides_siblings`,
//! 3. the node's presentation is activated,
//! 4. focus is bound (explicit player, else player one with auto-focus),
//! 5. the routing target's selection is reset,
//! 6. [`MenuBehaviour::on_opened`] runs.
//!
//! Closing runs [`MenuBehaviour::on_closed`] first, while the outgoing focus
//! is still readable, then unbinds, deactivates and clears the selection.
//!
//! Hooks never call back into the navigator directly. They queue
//! [`MenuCommand`]s on their [`HookContext`], which run in order once the
//! triggering operation has finished.

use std::collections::VecDeque;

use crate::input::{ActionEvent, PlayerId, PlayerRegistry, RoutingTargets, Selectable};
use crate::node::{NodeId, StartBehaviour};
use crate::tree::MenuTree;
use crate::LOG_TARGET;

/// Upper bound on commands drained by one operation; hooks that keep
/// re-triggering each other are cut off here.
const MAX_DEFERRED_COMMANDS: usize = 1024;

/// Where back navigation goes after the node closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BackTarget {
    /// Open the immediate parent, if any.
    #[default]
    Parent,
    /// Open an arbitrary node, e.g. the top of a navigation stack.
    Node(NodeId),
    /// Close without opening anything.
    CloseOnly,
    /// Ignore the request.
    Stay,
}

/// Per-node behaviour hooks.
///
/// ```ignore
/// struct PlayerSelect;
///
/// impl MenuBehaviour for PlayerSelect {
///     fn on_action(&mut self, event: &ActionEvent, cx: &mut HookContext<'_>) {
///         if event.is_performed() && event.action == "Submit" {
///             let focus = cx.focused_player();
///             cx.open_submenu("Lobby", focus);
///         }
///     }
/// }
/// ```
pub trait MenuBehaviour: Send + Sync {
    /// After the node opened and focus was resolved.
    fn on_opened(&mut self, _cx: &mut HookContext<'_>) {}

    /// Before the node closes; focus is still attached.
    fn on_closed(&mut self, _cx: &mut HookContext<'_>) {}

    /// Every action from the focused player except a performed cancel.
    fn on_action(&mut self, _event: &ActionEvent, _cx: &mut HookContext<'_>) {}

    /// Back navigation policy.
    fn back_target(&self, _tree: &MenuTree, _node: NodeId) -> BackTarget {
        BackTarget::Parent
    }
}

/// Operations queued by hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    Open {
        node: NodeId,
        focus: Option<PlayerId>,
    },
    Close(NodeId),
    SendBack(NodeId),
    OpenSubmenu {
        node: NodeId,
        id: String,
        focus: Option<PlayerId>,
    },
    Bind {
        node: NodeId,
        player: PlayerId,
    },
    Unbind(NodeId),
    SetInputEnabled {
        node: NodeId,
        enabled: bool,
    },
}

/// What a hook sees: a read-only tree and a command queue.
pub struct HookContext<'a> {
    node: NodeId,
    tree: &'a MenuTree,
    commands: &'a mut VecDeque<MenuCommand>,
}

impl HookContext<'_> {
    /// The node whose hook is running.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[inline]
    pub fn tree(&self) -> &MenuTree {
        self.tree
    }

    #[inline]
    pub fn focused_player(&self) -> Option<PlayerId> {
        self.tree.focused_player(self.node)
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.tree.parent(self.node)
    }

    pub fn push(&mut self, command: MenuCommand) {
        self.commands.push_back(command);
    }

    pub fn open(&mut self, node: NodeId, focus: Option<PlayerId>) {
        self.push(MenuCommand::Open { node, focus });
    }

    /// Open one of this node's submenus.
    pub fn open_submenu(&mut self, id: impl Into<String>, focus: Option<PlayerId>) {
        let node = self.node;
        self.push(MenuCommand::OpenSubmenu {
            node,
            id: id.into(),
            focus,
        });
    }

    /// Close this node.
    pub fn close(&mut self) {
        let node = self.node;
        self.push(MenuCommand::Close(node));
    }

    pub fn send_back(&mut self) {
        let node = self.node;
        self.push(MenuCommand::SendBack(node));
    }

    pub fn bind(&mut self, player: PlayerId) {
        let node = self.node;
        self.push(MenuCommand::Bind { node, player });
    }

    pub fn unbind(&mut self) {
        let node = self.node;
        self.push(MenuCommand::Unbind(node));
    }

    /// Suppress (`false`) or resume (`true`) input dispatch to this node.
    pub fn set_input_enabled(&mut self, enabled: bool) {
        let node = self.node;
        self.push(MenuCommand::SetInputEnabled { node, enabled });
    }
}

/// A menu tree borrowed together with its collaborators.
///
/// Created by [`MenuTree::navigator`]; every public operation runs to
/// completion, including commands queued by hooks, before returning.
pub struct Navigator<'a> {
    pub(crate) tree: &'a mut MenuTree,
    pub(crate) players: &'a mut dyn PlayerRegistry,
    pub(crate) routing: &'a mut dyn RoutingTargets,
    commands: VecDeque<MenuCommand>,
}

impl<'a> Navigator<'a> {
    pub(crate) fn new(
        tree: &'a mut MenuTree,
        players: &'a mut dyn PlayerRegistry,
        routing: &'a mut dyn RoutingTargets,
    ) -> Self {
        Self {
            tree,
            players,
            routing,
            commands: VecDeque::new(),
        }
    }

    #[inline]
    pub fn tree(&self) -> &MenuTree {
        self.tree
    }

    // =========================================================================
    // Public operations
    // =========================================================================

    /// Open `node`, optionally focusing `focus`. Re-opening an open node
    /// re-runs the whole cascade.
    pub fn open(&mut self, node: NodeId, focus: Option<PlayerId>) {
        self.open_inner(node, focus);
        self.flush();
    }

    pub fn close(&mut self, node: NodeId) {
        self.close_inner(node);
        self.flush();
    }

    /// Navigate back from `node` according to its [`MenuBehaviour::back_target`].
    pub fn send_back(&mut self, node: NodeId) {
        self.send_back_inner(node);
        self.flush();
    }

    /// Open the submenu registered under `id` on `node`.
    pub fn open_submenu(&mut self, node: NodeId, id: &str, focus: Option<PlayerId>) {
        self.open_submenu_inner(node, id, focus);
        self.flush();
    }

    /// Run a command as if a hook had queued it.
    pub fn execute(&mut self, command: MenuCommand) {
        self.apply(command);
        self.flush();
    }

    /// Apply every node's [`StartBehaviour`], parents before children.
    pub fn start(&mut self) {
        if self.tree.started {
            tracing::warn!(target: LOG_TARGET, "Menu tree was already started");
            return;
        }
        self.tree.started = true;

        for node in self.tree.ids().collect::<Vec<_>>() {
            match self.tree.nodes[node.0].config.start {
                StartBehaviour::OpenOnStart => self.open_inner(node, None),
                StartBehaviour::ClosedOnStart => self.close_inner(node),
                StartBehaviour::Unmanaged => {}
            }
        }
        self.flush();
    }

    /// Release every live focus binding. Call before dropping the tree.
    pub fn teardown(&mut self) {
        for node in self.tree.ids().collect::<Vec<_>>() {
            self.unbind_inner(node);
        }
        // Hooks don't run during teardown, so nothing queued survives it
        self.commands.clear();
    }

    /// A player joined: if they are player one and focus nothing yet, the
    /// deepest open auto-focus node without focus takes them.
    pub fn player_joined(&mut self, player: PlayerId) {
        if self.players.player_one() != Some(player) {
            return;
        }

        self.auto_focus(player);
        self.flush();
    }

    /// Early per-tick pass: open auto-focus nodes without focus bind player
    /// one, unless player one already focuses another node.
    pub fn reconcile_early(&mut self) {
        if !self.tree.started && !self.tree.warned_unstarted {
            self.tree.warned_unstarted = true;
            tracing::warn!(
                target: LOG_TARGET,
                "Menu tree is being updated but was never started, start behaviours have not been applied"
            );
        }

        let Some(player_one) = self.players.player_one() else {
            return;
        };

        self.auto_focus(player_one);
        self.flush();
    }

    /// Late per-tick pass: keep the first-select target selected for
    /// non-pointer players and drop button selections for pointer players.
    pub fn reconcile_late(&mut self) {
        for node in self.tree.ids().collect::<Vec<_>>() {
            if self.tree.nodes[node.0].focus.is_none() {
                continue;
            }
            let Some((target_id, _)) = self.tree.resolve_routing_target(node) else {
                continue;
            };
            let should_select = self.should_select(node);
            let first_select = self.tree.nodes[node.0].config.first_select;

            let Some(target) = self.routing.target_mut(target_id) else {
                continue;
            };
            match target.current_selection() {
                None if should_select => {
                    if let Some(first) = first_select {
                        target.set_selection(Some(first));
                    }
                }
                Some(current) if !should_select && current.is_button() => {
                    target.set_selection(None);
                }
                _ => {}
            }
        }
    }

    // =========================================================================
    // Cascade
    // =========================================================================

    pub(crate) fn open_inner(&mut self, node: NodeId, focus: Option<PlayerId>) {
        if !self.tree.contains(node) {
            tracing::error!(target: LOG_TARGET, "Cannot open unknown node {}", node);
            return;
        }

        let config = &self.tree.nodes[node.0].config;
        let (hides_parent, hides_siblings) = (config.hides_parent, config.hides_siblings);
        let auto_focus = config.auto_focus_player_one;

        // 1. Parent and siblings
        if let Some(parent) = self.tree.nodes[node.0].parent {
            if hides_parent {
                self.close_inner(parent);
            } else {
                self.unbind_inner(parent);
            }

            if hides_siblings {
                self.close_open_children(parent, Some(node));
            }
        }

        // 2. Presentation
        self.tree.nodes[node.0].presentation.activate();

        // 3. Focus
        match focus {
            Some(player) => self.bind_inner(node, player),
            None => match self.players.player_one() {
                Some(player) if auto_focus => self.bind_inner(node, player),
                _ => self.unbind_inner(node),
            },
        }

        // 4. Selection from the previous context must not leak
        self.select(node, None);
        if self.tree.nodes[node.0].focus.is_some()
            && let Some(first) = self.tree.nodes[node.0].config.first_select
            && self.should_select(node)
        {
            self.select(node, Some(first));
        }

        match self.tree.focused_player(node) {
            Some(player) => tracing::info!(
                target: LOG_TARGET,
                "{} opened with focus {}",
                self.tree.name(node),
                player
            ),
            None => tracing::info!(
                target: LOG_TARGET,
                "{} opened with no focus",
                self.tree.name(node)
            ),
        }

        // 5. Hook
        self.run_hook(node, |behaviour, cx| behaviour.on_opened(cx));
    }

    pub(crate) fn close_inner(&mut self, node: NodeId) {
        if !self.tree.contains(node) {
            tracing::error!(target: LOG_TARGET, "Cannot close unknown node {}", node);
            return;
        }

        self.run_hook(node, |behaviour, cx| behaviour.on_closed(cx));
        tracing::debug!(target: LOG_TARGET, "{} closed", self.tree.name(node));

        self.unbind_inner(node);
        self.tree.nodes[node.0].presentation.deactivate();
        self.select(node, None);
    }

    /// Bind player one to at most one open auto-focus node. Nothing happens
    /// while player one already listens somewhere. Among candidates, one
    /// with an open candidate below it yields to that descendant.
    fn auto_focus(&mut self, player_one: PlayerId) {
        if !self.tree.router.listeners(player_one).is_empty() {
            return;
        }

        let tree: &MenuTree = self.tree;
        let candidates: Vec<NodeId> = tree
            .ids()
            .filter(|&id| {
                let n = &tree.nodes[id.0];
                n.is_open() && n.config.auto_focus_player_one && n.focus.is_none()
            })
            .collect();
        let deepest = candidates.iter().copied().find(|&node| {
            !candidates
                .iter()
                .any(|&other| tree.is_ancestor(node, other))
        });

        if let Some(node) = deepest {
            self.bind_inner(node, player_one);
        }
    }

    pub(crate) fn send_back_inner(&mut self, node: NodeId) {
        let tree: &MenuTree = self.tree;
        let Some(n) = tree.node(node) else {
            tracing::error!(target: LOG_TARGET, "Cannot send back unknown node {}", node);
            return;
        };

        let target = n
            .behaviour
            .as_ref()
            .map(|b| b.back_target(tree, node))
            .unwrap_or_default();
        tracing::debug!(
            target: LOG_TARGET,
            "{} sent back to {:?}",
            self.tree.name(node),
            target
        );

        match target {
            BackTarget::Parent => {
                self.close_inner(node);
                if let Some(parent) = self.tree.parent(node) {
                    self.open_inner(parent, None);
                }
            }
            BackTarget::Node(other) => {
                self.close_inner(node);
                self.open_inner(other, None);
            }
            BackTarget::CloseOnly => self.close_inner(node),
            BackTarget::Stay => {}
        }
    }

    pub(crate) fn open_submenu_inner(&mut self, node: NodeId, id: &str, focus: Option<PlayerId>) {
        let Some(child) = self.tree.submenu(node, id) else {
            tracing::error!(
                target: LOG_TARGET,
                "{} failed to open submenu \"{}\": no submenu with that id",
                self.tree.name(node),
                id
            );
            return;
        };

        if self.tree.nodes[child.0].config.hides_siblings {
            self.close_open_children(node, Some(child));
        }

        tracing::debug!(
            target: LOG_TARGET,
            "{} opening submenu \"{}\"",
            self.tree.name(node),
            id
        );
        self.open_inner(child, focus);
    }

    /// Close every open registered child of `parent` except `keep`.
    fn close_open_children(&mut self, parent: NodeId, keep: Option<NodeId>) {
        for sibling in self.tree.submenus(parent) {
            if Some(sibling) != keep && self.tree.is_open(sibling) {
                self.close_inner(sibling);
            }
        }
    }

    /// Set the selection on `node`'s routing target.
    pub(crate) fn select(&mut self, node: NodeId, selection: Option<Selectable>) {
        let Some((id, _)) = self.tree.resolve_routing_target(node) else {
            if selection.is_some() {
                tracing::warn!(
                    target: LOG_TARGET,
                    "{} has no routing target to select on, assign one on the node, an ancestor or the settings",
                    self.tree.name(node)
                );
            }
            return;
        };

        match self.routing.target_mut(id) {
            Some(target) => target.set_selection(selection),
            None => tracing::warn!(
                target: LOG_TARGET,
                "{}: Routing target {:?} is not registered",
                self.tree.name(node),
                id
            ),
        }
    }

    // =========================================================================
    // Hooks
    // =========================================================================

    /// Run a hook with the node's behaviour taken out of the arena.
    pub(crate) fn run_hook(
        &mut self,
        node: NodeId,
        hook: impl FnOnce(&mut dyn MenuBehaviour, &mut HookContext<'_>),
    ) {
        let Some(mut behaviour) = self
            .tree
            .nodes
            .get_mut(node.0)
            .and_then(|n| n.behaviour.take())
        else {
            return;
        };

        let mut cx = HookContext {
            node,
            tree: &*self.tree,
            commands: &mut self.commands,
        };
        hook(behaviour.as_mut(), &mut cx);

        self.tree.nodes[node.0].behaviour = Some(behaviour);
    }

    /// Drain commands queued by hooks.
    pub(crate) fn flush(&mut self) {
        let mut applied = 0;
        while let Some(command) = self.commands.pop_front() {
            if applied == MAX_DEFERRED_COMMANDS {
                tracing::error!(
                    target: LOG_TARGET,
                    "Dropping {} queued menu commands, hooks keep re-triggering each other",
                    self.commands.len() + 1
                );
                self.commands.clear();
                return;
            }
            applied += 1;
            self.apply(command);
        }
    }

    fn apply(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::Open { node, focus } => self.open_inner(node, focus),
            MenuCommand::Close(node) => self.close_inner(node),
            MenuCommand::SendBack(node) => self.send_back_inner(node),
            MenuCommand::OpenSubmenu { node, id, focus } => {
                self.open_submenu_inner(node, &id, focus)
            }
            MenuCommand::Bind { node, player } => self.bind_inner(node, player),
            MenuCommand::Unbind(node) => self.unbind_inner(node),
            MenuCommand::SetInputEnabled { node, enabled } => {
                self.set_input_enabled_inner(node, enabled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{LocalPlayers, UiRoutingTargets};
    use crate::input::{RoutingTarget, RoutingTargetId};
    use crate::node::{MenuNodeConfig, NodeParts};
    use crate::presentation::PanelToggle;
    use crate::MenuSettings;

    const TARGET: RoutingTargetId = RoutingTargetId(0);

    fn env() -> (LocalPlayers, UiRoutingTargets) {
        let mut players = LocalPlayers::new();
        players.join("Gamepad");
        (players, UiRoutingTargets::new().with(TARGET))
    }

    /// Queues a fixed list of commands the first time the node opens.
    struct Scripted(Vec<MenuCommand>);

    impl MenuBehaviour for Scripted {
        fn on_opened(&mut self, cx: &mut HookContext<'_>) {
            for command in self.0.drain(..) {
                cx.push(command);
            }
        }
    }

    #[test]
    fn default_back_target_is_parent() {
        assert_eq!(BackTarget::default(), BackTarget::Parent);
    }

    #[test]
    fn queued_commands_apply_in_order() {
        let mut b = MenuTree::builder(MenuSettings::default().with_default_routing_target(TARGET));
        let a = b.add_root(MenuNodeConfig::new("A"), NodeParts::new(PanelToggle::default()));
        let c = b.add_root(MenuNodeConfig::new("C"), NodeParts::new(PanelToggle::default()));
        let host = b.add_root(
            MenuNodeConfig::new("Host"),
            NodeParts::new(PanelToggle::default()).with_behaviour(Scripted(vec![
                MenuCommand::Open { node: a, focus: None },
                MenuCommand::Open { node: c, focus: None },
                MenuCommand::Close(a),
                MenuCommand::SetInputEnabled { node: c, enabled: false },
            ])),
        );
        let mut tree = b.build();
        let (mut players, mut targets) = env();

        tree.navigator(&mut players, &mut targets).open(host, None);

        assert!(tree.is_open(host));
        assert!(!tree.is_open(a));
        assert!(tree.is_open(c));
        assert!(!tree.node(c).unwrap().input_enabled());
    }

    #[test]
    fn behaviour_is_restored_after_hooks() {
        let mut b = MenuTree::builder(MenuSettings::default());
        let host = b.add_root(
            MenuNodeConfig::new("Host"),
            NodeParts::new(PanelToggle::default()).with_behaviour(Scripted(Vec::new())),
        );
        let mut tree = b.build();
        let (mut players, mut targets) = env();

        let mut nav = tree.navigator(&mut players, &mut targets);
        nav.open(host, None);
        nav.close(host);

        assert!(tree.nodes[host.0].behaviour.is_some());
    }

    #[test]
    fn execute_runs_bind_commands() {
        let mut b = MenuTree::builder(MenuSettings::default().with_default_routing_target(TARGET));
        let node = b.add_root(MenuNodeConfig::new("Menu"), NodeParts::new(PanelToggle::new(true)));
        let mut tree = b.build();
        let (mut players, mut targets) = env();
        let p1 = PlayerId(1);

        let mut nav = tree.navigator(&mut players, &mut targets);
        nav.execute(MenuCommand::Bind { node, player: p1 });
        assert_eq!(nav.tree().focused_player(node), Some(p1));
        nav.execute(MenuCommand::Unbind(node));

        assert_eq!(tree.focused_player(node), None);
        assert_eq!(targets.get(TARGET).unwrap().attached_player(), None);
    }

    #[test]
    fn unknown_nodes_are_ignored() {
        let mut tree = MenuTree::builder(MenuSettings::default()).build();
        let (mut players, mut targets) = env();
        let ghost = NodeId(3);

        let mut nav = tree.navigator(&mut players, &mut targets);
        nav.open(ghost, None);
        nav.close(ghost);
        nav.send_back(ghost);
        nav.open_submenu(ghost, "x", None);

        assert!(tree.is_empty());
    }
}
