//! In-memory players and routing targets.
//!
//! Enough of an input backend to drive a [`crate::MenuTree`] without an
//! engine: headless servers, scripted menus and tests.

use std::collections::HashMap;

use crate::input::{
    DeviceKind, Player, PlayerId, PlayerRegistry, RoutingTarget, RoutingTargetId, RoutingTargets,
    Selectable,
};

// =============================================================================
// Players
// =============================================================================

/// A local player with a mutable control scheme and action set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalPlayer {
    id: PlayerId,
    index: usize,
    control_scheme: String,
    action_set: Option<String>,
    input_enabled: bool,
    device: Option<DeviceKind>,
}

impl LocalPlayer {
    /// A player with input enabled and the `"Gameplay"` action set active.
    pub fn new(id: PlayerId, index: usize, control_scheme: impl Into<String>) -> Self {
        Self {
            id,
            index,
            control_scheme: control_scheme.into(),
            action_set: Some("Gameplay".to_string()),
            input_enabled: true,
            device: None,
        }
    }

    /// Builder method: set the initial action set.
    pub fn with_action_set(mut self, action_set: Option<&str>) -> Self {
        self.action_set = action_set.map(str::to_string);
        self
    }

    /// Builder method: set the current device.
    pub fn with_device(mut self, device: DeviceKind) -> Self {
        self.device = Some(device);
        self
    }

    pub fn set_control_scheme(&mut self, scheme: impl Into<String>) {
        self.control_scheme = scheme.into();
    }

    pub fn set_device(&mut self, device: Option<DeviceKind>) {
        self.device = device;
    }

    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }
}

impl Player for LocalPlayer {
    #[inline]
    fn id(&self) -> PlayerId {
        self.id
    }

    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn control_scheme(&self) -> &str {
        &self.control_scheme
    }

    #[inline]
    fn action_set(&self) -> Option<&str> {
        self.action_set.as_deref()
    }

    fn switch_action_set(&mut self, name: Option<&str>) {
        self.action_set = name.map(str::to_string);
    }

    #[inline]
    fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    #[inline]
    fn device(&self) -> Option<DeviceKind> {
        self.device
    }
}

/// Players in join order. Player one is whoever holds index 0.
///
/// Ids are never reused. A player joining after someone left takes the
/// lowest free index, so index 0 comes back when player one rejoins.
#[derive(Clone, Debug, Default)]
pub struct LocalPlayers {
    players: Vec<LocalPlayer>,
    last_id: u64,
}

impl LocalPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player at the lowest free index and return its fresh id.
    pub fn join(&mut self, control_scheme: impl Into<String>) -> PlayerId {
        let index = self.free_index();
        self.last_id += 1;
        let id = PlayerId(self.last_id);
        self.players
            .push(LocalPlayer::new(id, index, control_scheme));
        id
    }

    /// Add a fully configured player.
    pub fn insert(&mut self, player: LocalPlayer) {
        self.last_id = self.last_id.max(player.id.0);
        self.players.push(player);
    }

    fn free_index(&self) -> usize {
        (0..)
            .find(|i| !self.players.iter().any(|p| p.index == *i))
            .unwrap_or(self.players.len())
    }

    /// Remove a player, e.g. on device disconnect.
    pub fn leave(&mut self, id: PlayerId) -> Option<LocalPlayer> {
        let pos = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(pos))
    }

    pub fn get(&self, id: PlayerId) -> Option<&LocalPlayer> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut LocalPlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl PlayerRegistry for LocalPlayers {
    fn player_one(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.index == 0).map(|p| p.id)
    }

    fn player(&self, id: PlayerId) -> Option<&dyn Player> {
        self.get(id).map(|p| p as &dyn Player)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut dyn Player> {
        self.get_mut(id).map(|p| p as &mut dyn Player)
    }
}

// =============================================================================
// Routing targets
// =============================================================================

/// A UI input module paired with its selection state.
///
/// Counts attaches and binding re-assertions so callers can observe the
/// focus protocol's side effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiRoutingTarget {
    attached: Option<PlayerId>,
    selection: Option<Selectable>,
    attach_count: usize,
    reassert_count: usize,
}

impl UiRoutingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    #[inline]
    pub fn reassert_count(&self) -> usize {
        self.reassert_count
    }
}

impl RoutingTarget for UiRoutingTarget {
    fn attach(&mut self, player: PlayerId) {
        self.attached = Some(player);
        self.attach_count += 1;
    }

    fn detach(&mut self) {
        self.attached = None;
    }

    #[inline]
    fn attached_player(&self) -> Option<PlayerId> {
        self.attached
    }

    fn reassert_default_bindings(&mut self) {
        self.reassert_count += 1;
    }

    fn set_selection(&mut self, target: Option<Selectable>) {
        self.selection = target;
    }

    #[inline]
    fn current_selection(&self) -> Option<Selectable> {
        self.selection
    }
}

/// Routing targets keyed by id.
#[derive(Clone, Debug, Default)]
pub struct UiRoutingTargets {
    targets: HashMap<RoutingTargetId, UiRoutingTarget>,
}

impl UiRoutingTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: register an empty target under `id`.
    pub fn with(mut self, id: RoutingTargetId) -> Self {
        self.targets.insert(id, UiRoutingTarget::new());
        self
    }

    pub fn insert(&mut self, id: RoutingTargetId, target: UiRoutingTarget) {
        self.targets.insert(id, target);
    }

    pub fn get(&self, id: RoutingTargetId) -> Option<&UiRoutingTarget> {
        self.targets.get(&id)
    }

    pub fn get_mut(&mut self, id: RoutingTargetId) -> Option<&mut UiRoutingTarget> {
        self.targets.get_mut(&id)
    }
}

impl RoutingTargets for UiRoutingTargets {
    fn target(&self, id: RoutingTargetId) -> Option<&dyn RoutingTarget> {
        self.targets.get(&id).map(|t| t as &dyn RoutingTarget)
    }

    fn target_mut(&mut self, id: RoutingTargetId) -> Option<&mut dyn RoutingTarget> {
        self.targets.get_mut(&id).map(|t| t as &mut dyn RoutingTarget)
    }
}
