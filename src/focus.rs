//! Focus assignment — binding one player to one node.
//!
//! Binding a player takes over that player's input: it is switched to the UI
//! action set, the node's routing target is attached to it, and the node
//! starts receiving its actions. Unbinding hands everything back, including
//! the action set that was active before the bind.

use crate::cascade::Navigator;
use crate::input::PlayerId;
use crate::node::NodeId;
use crate::LOG_TARGET;

/// A live player ↔ node binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusBinding {
    pub player: PlayerId,
    /// The player's action set at bind time, restored on unbind.
    pub prior_action_set: Option<String>,
}

impl Navigator<'_> {
    /// Bind `player` to `node`.
    ///
    /// Binding the player that already holds the node is a no-op. Binding a
    /// different player fully unbinds the current one first.
    pub fn bind(&mut self, node: NodeId, player: PlayerId) {
        self.bind_inner(node, player);
        self.flush();
    }

    /// Release `node`'s player, restoring its prior action set.
    pub fn unbind(&mut self, node: NodeId) {
        self.unbind_inner(node);
        self.flush();
    }

    /// Whether `node` should keep a widget selected.
    ///
    /// True without a focused player, otherwise true unless the player is on
    /// a pointer control scheme.
    pub fn should_select(&self, node: NodeId) -> bool {
        let Some(player) = self.tree.focused_player(node) else {
            return true;
        };

        match self.players.player(player) {
            Some(p) => !self.tree.settings.is_pointer_scheme(p.control_scheme()),
            None => true,
        }
    }

    pub(crate) fn bind_inner(&mut self, node: NodeId, player: PlayerId) {
        if !self.tree.contains(node) {
            tracing::error!(target: LOG_TARGET, "Cannot focus unknown node {}", node);
            return;
        }
        if !self.tree.is_open(node) {
            tracing::warn!(
                target: LOG_TARGET,
                "{}: Cannot give focus to {} while closed",
                self.tree.name(node),
                player
            );
            return;
        }

        // Passing focus
        match self.tree.focused_player(node) {
            Some(current) if current == player => {
                tracing::debug!(
                    target: LOG_TARGET,
                    "{}: Maintaining focus on {}",
                    self.tree.name(node),
                    player
                );
                return;
            }
            Some(current) => {
                tracing::debug!(
                    target: LOG_TARGET,
                    "{}: Removing focus from {} and placing it on {}",
                    self.tree.name(node),
                    current,
                    player
                );
                self.unbind_inner(node);
            }
            None => {
                tracing::debug!(
                    target: LOG_TARGET,
                    "{}: No focus existing, placing focus on {}",
                    self.tree.name(node),
                    player
                );
            }
        }

        let ui_action_set = self.tree.settings.ui_action_set.clone();
        let Some(p) = self.players.player_mut(player) else {
            tracing::warn!(
                target: LOG_TARGET,
                "{}: Player {} is not connected, not focusing",
                self.tree.name(node),
                player
            );
            return;
        };

        // Assign focus
        let prior_action_set = p.action_set().map(str::to_string);
        self.tree.nodes[node.0].focus = Some(FocusBinding {
            player,
            prior_action_set,
        });
        self.tree.router.subscribe(player, node);

        // A player is never attached to a routing target outside the UI set
        if p.action_set() != Some(ui_action_set.as_str()) {
            p.switch_action_set(Some(&ui_action_set));
        }

        match self.tree.resolve_routing_target(node) {
            Some((id, source)) => match self.routing.target_mut(id) {
                Some(target) => {
                    target.attach(player);
                    target.reassert_default_bindings();
                    tracing::trace!(
                        target: LOG_TARGET,
                        "{}: Routing {} through {:?} ({:?})",
                        self.tree.name(node),
                        player,
                        id,
                        source
                    );
                }
                None => tracing::error!(
                    target: LOG_TARGET,
                    "{}: Routing target {:?} is not registered",
                    self.tree.name(node),
                    id
                ),
            },
            None => tracing::error!(
                target: LOG_TARGET,
                "{}: Couldn't resolve a routing target, input will not reach this menu",
                self.tree.name(node)
            ),
        }

        let observed = self.players.player(player);
        for tooltip in &mut self.tree.nodes[node.0].tooltips {
            tooltip.observe(observed);
        }

        let first_select = self.tree.nodes[node.0].config.first_select;
        if let Some(first) = first_select
            && self.should_select(node)
        {
            self.select(node, Some(first));
        }
    }

    pub(crate) fn unbind_inner(&mut self, node: NodeId) {
        let Some(binding) = self
            .tree
            .nodes
            .get_mut(node.0)
            .and_then(|n| n.focus.take())
        else {
            return;
        };

        if let Some((id, _)) = self.tree.resolve_routing_target(node)
            && let Some(target) = self.routing.target_mut(id)
            && target.attached_player() == Some(binding.player)
        {
            target.detach();
        }

        match self.players.player_mut(binding.player) {
            Some(p) if p.input_enabled() => {
                p.switch_action_set(binding.prior_action_set.as_deref());
            }
            Some(_) => {}
            None => tracing::debug!(
                target: LOG_TARGET,
                "{}: Player {} left before focus was removed",
                self.tree.name(node),
                binding.player
            ),
        }

        self.tree.router.unsubscribe(binding.player, node);

        tracing::debug!(
            target: LOG_TARGET,
            "{}: Removed focus from {}",
            self.tree.name(node),
            binding.player
        );
    }
}
