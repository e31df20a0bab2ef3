//! Input event router — delivers a focused player's actions to its nodes.

use std::collections::HashMap;

use crate::cascade::Navigator;
use crate::input::{ActionEvent, PlayerId};
use crate::node::NodeId;
use crate::LOG_TARGET;

/// Which nodes listen to which player's actions.
///
/// A node subscribes when it gains a player's focus and unsubscribes when it
/// loses it, so the table mirrors the live focus bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputEventRouter {
    subscriptions: HashMap<PlayerId, Vec<NodeId>>,
}

impl InputEventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the node was newly subscribed.
    pub fn subscribe(&mut self, player: PlayerId, node: NodeId) -> bool {
        let listeners = self.subscriptions.entry(player).or_default();
        if listeners.contains(&node) {
            return false;
        }
        listeners.push(node);
        true
    }

    /// Returns `true` if the node was subscribed.
    pub fn unsubscribe(&mut self, player: PlayerId, node: NodeId) -> bool {
        let Some(listeners) = self.subscriptions.get_mut(&player) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|&n| n != node);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.subscriptions.remove(&player);
        }
        removed
    }

    /// Nodes listening to `player`, in subscription order.
    pub fn listeners(&self, player: PlayerId) -> &[NodeId] {
        self.subscriptions
            .get(&player)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn is_subscribed(&self, player: PlayerId, node: NodeId) -> bool {
        self.listeners(player).contains(&node)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl Navigator<'_> {
    /// Deliver an action-triggered event from `player` to every node it focuses.
    ///
    /// The cancel action, when performed, sends the node back. Every other
    /// event goes to the node's [`crate::MenuBehaviour::on_action`] hook.
    pub fn handle_action(&mut self, player: PlayerId, event: &ActionEvent) {
        let listeners = self.tree.router.listeners(player).to_vec();
        for node in listeners {
            // An earlier listener may have moved focus away
            if self.tree.focused_player(node) != Some(player) {
                continue;
            }
            self.dispatch(node, player, event);
        }
        self.flush();
    }

    /// Re-notify tooltips of the nodes `player` focuses after its device changed.
    pub fn controls_changed(&mut self, player: PlayerId) {
        let observed = self.players.player(player);
        for &node in self.tree.router.listeners(player) {
            for tooltip in &mut self.tree.nodes[node.0].tooltips {
                tooltip.observe(observed);
            }
        }
    }

    /// Suppress or resume input dispatch to `node` without touching its focus.
    pub fn set_input_enabled(&mut self, node: NodeId, enabled: bool) {
        self.set_input_enabled_inner(node, enabled);
        self.flush();
    }

    pub(crate) fn set_input_enabled_inner(&mut self, node: NodeId, enabled: bool) {
        match self.tree.nodes.get_mut(node.0) {
            Some(n) => n.input_enabled = enabled,
            None => tracing::error!(
                target: LOG_TARGET,
                "Cannot change input on unknown node {}",
                node
            ),
        }
    }

    fn dispatch(&mut self, node: NodeId, player: PlayerId, event: &ActionEvent) {
        if !self.tree.nodes[node.0].input_enabled {
            return;
        }

        if !self.tree.settings.is_noisy(&event.action) {
            tracing::trace!(
                target: LOG_TARGET,
                "{} (focus: {}) received input event \"{}\" ({:?})",
                self.tree.name(node),
                player,
                event.action,
                event.phase
            );
        }

        if event.is_performed() && event.action == self.tree.settings.cancel_action {
            self.send_back_inner(node);
        } else {
            self.run_hook(node, |behaviour, cx| behaviour.on_action(event, cx));
        }
    }
}
