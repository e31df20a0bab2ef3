//! Interfaces to the player registry and the input routing targets.
//!
//! The menu tree never owns players or routing targets. It reaches them
//! through the traits in this module, so any input backend can sit behind
//! them. [`crate::headless`] has in-memory implementations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a connected local player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Identity of a routing target (the thing that turns a player's actions
/// into UI navigation, e.g. a UI input module plus its event system).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTargetId(pub u32);

/// Kind of device a player is currently driving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Gamepad,
    KeyboardMouse,
    Touch,
    Other,
}

/// Classification of a selectable widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SelectableKind {
    Button,
    #[default]
    Other,
}

/// A widget handle that can be selected on a routing target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Selectable {
    pub id: u64,
    pub kind: SelectableKind,
}

impl Selectable {
    #[inline]
    pub const fn button(id: u64) -> Self {
        Self {
            id,
            kind: SelectableKind::Button,
        }
    }

    #[inline]
    pub const fn other(id: u64) -> Self {
        Self {
            id,
            kind: SelectableKind::Other,
        }
    }

    #[inline]
    pub fn is_button(&self) -> bool {
        self.kind == SelectableKind::Button
    }
}

/// Phase of a triggered input action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    Started,
    Performed,
    Canceled,
}

/// A raw action-triggered notification from a player's input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionEvent {
    pub action: String,
    pub phase: ActionPhase,
}

impl ActionEvent {
    pub fn new(action: impl Into<String>, phase: ActionPhase) -> Self {
        Self {
            action: action.into(),
            phase,
        }
    }

    /// Shorthand for a `Performed` event.
    pub fn performed(action: impl Into<String>) -> Self {
        Self::new(action, ActionPhase::Performed)
    }

    #[inline]
    pub fn is_performed(&self) -> bool {
        self.phase == ActionPhase::Performed
    }
}

// =============================================================================
// Player registry
// =============================================================================

/// Per-player input state the focus protocol reads and mutates.
pub trait Player: Send + Sync {
    fn id(&self) -> PlayerId;

    /// Join order, 0 for the first player.
    fn index(&self) -> usize;

    /// Name of the active control scheme, e.g. `"Gamepad"` or `"KeyboardMouse"`.
    fn control_scheme(&self) -> &str;

    /// Name of the active action set. `None` while the player has none,
    /// which happens transiently when a device disconnects.
    fn action_set(&self) -> Option<&str>;

    /// Switch the active action set; `None` clears it.
    fn switch_action_set(&mut self, name: Option<&str>);

    /// Whether the player's input is currently enabled.
    fn input_enabled(&self) -> bool;

    /// The device driving the player right now, if known.
    fn device(&self) -> Option<DeviceKind>;
}

/// Enumerates connected players.
pub trait PlayerRegistry: Send + Sync {
    /// The canonical first player, if connected.
    fn player_one(&self) -> Option<PlayerId>;

    fn player(&self, id: PlayerId) -> Option<&dyn Player>;

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut dyn Player>;
}

// =============================================================================
// Routing targets
// =============================================================================

/// Where UI input currently goes.
pub trait RoutingTarget: Send + Sync {
    /// Route `player`'s UI actions through this target.
    fn attach(&mut self, player: PlayerId);

    fn detach(&mut self);

    fn attached_player(&self) -> Option<PlayerId>;

    /// Re-bind the target's default UI actions. Reusing one target across
    /// players drops its action bindings, so every attach is followed by this.
    fn reassert_default_bindings(&mut self);

    fn set_selection(&mut self, target: Option<Selectable>);

    fn current_selection(&self) -> Option<Selectable>;
}

/// Lookup of routing targets by id.
pub trait RoutingTargets: Send + Sync {
    fn target(&self, id: RoutingTargetId) -> Option<&dyn RoutingTarget>;

    fn target_mut(&mut self, id: RoutingTargetId) -> Option<&mut dyn RoutingTarget>;
}
