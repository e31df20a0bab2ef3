//! Bevy integration for menu trees.
//!
//! Provides:
//! - `MenuFocusPlugin` — builder-pattern plugin that installs a [`MenuTree`] resource
//!   and the per-tick reconciliation systems
//! - messages to feed player and input notifications in, and to request
//!   navigation from gameplay systems
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_menu_focus::bevy::*;
//! use bevy_menu_focus::headless::{LocalPlayers, UiRoutingTargets};
//!
//! fn main() {
//!     App::new()
//!         .insert_resource(LocalPlayers::new())
//!         .insert_resource(UiRoutingTargets::new().with(RoutingTargetId(0)))
//!         .add_plugins(MenuFocusPlugin::<LocalPlayers, UiRoutingTargets>::from_tree(build_menus))
//!         .add_systems(Update, open_pause_menu)
//!         .run();
//! }
//!
//! fn open_pause_menu(tree: Res<MenuTree>, mut requests: MessageWriter<MenuRequest>) {
//!     if let Some(pause) = tree.find("Pause") {
//!         requests.write(MenuRequest(MenuCommand::Open { node: pause, focus: None }));
//!     }
//! }
//! ```

use bevy::prelude::*;
use std::marker::PhantomData;

use crate::headless::{LocalPlayers, UiRoutingTargets};
use crate::{ActionEvent, MenuCommand, MenuTree, PlayerId, PlayerRegistry, RoutingTargets};

// =============================================================================
// Messages
// =============================================================================

/// A player joined the session.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerJoined(pub PlayerId);

/// A player's input produced an action notification.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct ActionTriggered {
    pub player: PlayerId,
    pub event: ActionEvent,
}

/// A player switched device or control scheme.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlsChanged(pub PlayerId);

/// Navigation requested from outside the tree's own hooks.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct MenuRequest(pub MenuCommand);

/// Ordering handles for the plugin's systems.
#[derive(SystemSet, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuFocusSystems {
    /// `PreUpdate`: joins, early reconciliation, input dispatch.
    Early,
    /// `PostUpdate`: navigation requests, late reconciliation.
    Late,
}

// =============================================================================
// Plugin
// =============================================================================

type TreeFactory = Box<dyn Fn() -> MenuTree + Send + Sync>;

/// Bevy plugin driving a [`MenuTree`] against the host's player registry `P`
/// and routing targets `R`, both of which must already be resources.
///
/// Use the builder pattern to configure:
///
/// ```ignore
/// App::new()
///     .add_plugins(
///         MenuFocusPlugin::<LocalPlayers, UiRoutingTargets>::from_tree(build_menus)
///             .teardown_on_exit(false)
///     )
/// ```
pub struct MenuFocusPlugin<P, R> {
    factory: Option<TreeFactory>,
    teardown_on_exit: bool,
    _marker: PhantomData<fn() -> (P, R)>,
}

impl<P, R> Default for MenuFocusPlugin<P, R> {
    fn default() -> Self {
        Self {
            factory: None,
            teardown_on_exit: true,
            _marker: PhantomData,
        }
    }
}

impl<P, R> MenuFocusPlugin<P, R> {
    /// Create a plugin that expects the [`MenuTree`] resource to be inserted
    /// by the app. Systems don't run until it exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a plugin that inserts the tree built by `factory`.
    pub fn from_tree(factory: impl Fn() -> MenuTree + Send + Sync + 'static) -> Self {
        Self {
            factory: Some(Box::new(factory)),
            ..Self::default()
        }
    }

    /// Release every focus binding when the app exits.
    ///
    /// Default: `true`
    pub fn teardown_on_exit(mut self, enabled: bool) -> Self {
        self.teardown_on_exit = enabled;
        self
    }
}

impl<P, R> Plugin for MenuFocusPlugin<P, R>
where
    P: PlayerRegistry + Resource,
    R: RoutingTargets + Resource,
{
    fn build(&self, app: &mut App) {
        if let Some(factory) = &self.factory {
            app.insert_resource(factory());
        }

        app.add_message::<PlayerJoined>()
            .add_message::<ActionTriggered>()
            .add_message::<ControlsChanged>()
            .add_message::<MenuRequest>();

        app.configure_sets(
            PreUpdate,
            MenuFocusSystems::Early.run_if(resource_exists::<MenuTree>),
        )
        .configure_sets(
            PostUpdate,
            MenuFocusSystems::Late.run_if(resource_exists::<MenuTree>),
        );

        app.add_systems(
            Startup,
            start_menus::<P, R>.run_if(resource_exists::<MenuTree>),
        )
        .add_systems(
            PreUpdate,
            (
                handle_player_joined::<P, R>,
                reconcile_early::<P, R>,
                dispatch_actions::<P, R>,
                handle_controls_changed::<P, R>,
            )
                .chain()
                .in_set(MenuFocusSystems::Early),
        )
        .add_systems(
            PostUpdate,
            (apply_menu_requests::<P, R>, reconcile_late::<P, R>)
                .chain()
                .in_set(MenuFocusSystems::Late),
        );

        if self.teardown_on_exit {
            app.add_systems(
                Last,
                teardown_menus::<P, R>.run_if(resource_exists::<MenuTree>),
            );
        }
    }
}

// =============================================================================
// Systems
// =============================================================================

fn start_menus<P: PlayerRegistry + Resource, R: RoutingTargets + Resource>(
    mut tree: ResMut<MenuTree>,
    mut players: ResMut<P>,
    mut targets: ResMut<R>,
) {
    tree.navigator(&mut *players, &mut *targets).start();
}

fn handle_player_joined<P: PlayerRegistry + Resource, R: RoutingTargets + Resource>(
    mut joined: MessageReader<PlayerJoined>,
    mut tree: ResMut<MenuTree>,
    mut players: ResMut<P>,
    mut targets: ResMut<R>,
) {
    let mut nav = tree.navigator(&mut *players, &mut *targets);
    for PlayerJoined(player) in joined.read() {
        nav.player_joined(*player);
    }
}

fn reconcile_early<P: PlayerRegistry + Resource, R: RoutingTargets + Resource>(
    mut tree: ResMut<MenuTree>,
    mut players: ResMut<P>,
    mut targets: ResMut<R>,
) {
    tree.navigator(&mut *players, &mut *targets)
        .reconcile_early();
}

fn dispatch_actions<P: PlayerRegistry + Resource, R: RoutingTargets + Resource>(
    mut actions: MessageReader<ActionTriggered>,
    mut tree: ResMut<MenuTree>,
    mut players: ResMut<P>,
    mut targets: ResMut<R>,
) {
    let mut nav = tree.navigator(&mut *players, &mut *targets);
    for triggered in actions.read() {
        nav.handle_action(triggered.player, &triggered.event);
    }
}

fn handle_controls_changed<P: PlayerRegistry + Resource, R: RoutingTargets + Resource>(
    mut changed: MessageReader<ControlsChanged>,
    mut tree: ResMut<MenuTree>,
    mut players: ResMut<P>,
    mut targets: ResMut<R>,
) {
    let mut nav = tree.navigator(&mut *players, &mut *targets);
    for ControlsChanged(player) in changed.read() {
        nav.controls_changed(*player);
    }
}

fn apply_menu_requests<P: PlayerRegistry + Resource, R: RoutingTargets + Resource>(
    mut requests: MessageReader<MenuRequest>,
    mut tree: ResMut<MenuTree>,
    mut players: ResMut<P>,
    mut targets: ResMut<R>,
) {
    let mut nav = tree.navigator(&mut *players, &mut *targets);
    for MenuRequest(command) in requests.read() {
        nav.execute(command.clone());
    }
}

fn reconcile_late<P: PlayerRegistry + Resource, R: RoutingTargets + Resource>(
    mut tree: ResMut<MenuTree>,
    mut players: ResMut<P>,
    mut targets: ResMut<R>,
) {
    tree.navigator(&mut *players, &mut *targets).reconcile_late();
}

fn teardown_menus<P: PlayerRegistry + Resource, R: RoutingTargets + Resource>(
    exit: MessageReader<AppExit>,
    mut tree: ResMut<MenuTree>,
    mut players: ResMut<P>,
    mut targets: ResMut<R>,
) {
    if exit.is_empty() {
        return;
    }
    tree.navigator(&mut *players, &mut *targets).teardown();
}

// =============================================================================
// Resource impls
// =============================================================================

impl Resource for MenuTree {}

impl Resource for LocalPlayers {}

impl Resource for UiRoutingTargets {}

// =============================================================================
// Tests
// =============================================================================
