//! # Hierarchical Menu Navigation with Player Focus (bevy-menu-focus)
//!
//! Menus form a tree of panels. Opening one panel closes or defocuses its
//! parent and siblings, and at most one local player "owns" each open panel.
//! The owner's actions reach the panel and its UI routing target; everyone
//! else's don't.
//!
//! ## Design
//!
//! ```text
//!             ┌────────────┐
//!             │  MenuTree  │  arena of MenuNodes, parents as indices
//!             └─────┬──────┘
//!                   │ navigator(&mut players, &mut targets)
//!             ┌─────▼──────┐   bind / unbind   ┌──────────────────┐
//!             │ Navigator  ├──────────────────►│  PlayerRegistry  │
//!             │  cascade   │   attach/select   ├──────────────────┤
//!             │  focus     ├──────────────────►│  RoutingTargets  │
//!             │  router    │                   └──────────────────┘
//!             └─────┬──────┘
//!                   │ hooks queue MenuCommands, applied after the operation
//!           ┌───────▼───────┐
//!           │ MenuBehaviour │
//!           └───────────────┘
//! ```
//!
//! Players and routing targets are reached through traits, so any input
//! backend fits. [`headless`] has in-memory implementations.
//!
//! ```ignore
//! use bevy_menu_focus::*;
//!
//! let mut b = MenuTree::builder(MenuSettings::default().with_default_routing_target(RoutingTargetId(0)));
//! let root = b.add_root(
//!     MenuNodeConfig::new("Title").start(StartBehaviour::OpenOnStart).auto_focus_player_one(true),
//!     NodeParts::new(PanelToggle::default()),
//! );
//! b.add_submenu(root, "Options", MenuNodeConfig::new("Options"), NodeParts::new(PanelToggle::default()));
//! let mut tree = b.build();
//!
//! let mut nav = tree.navigator(&mut players, &mut targets);
//! nav.start();
//! nav.open_submenu(root, "Options", None);
//! ```

pub mod bevy;
pub mod cascade;
pub mod focus;
pub mod headless;
pub mod input;
pub mod node;
pub mod presentation;
pub mod router;
pub mod settings;
pub mod submenu;
pub mod tooltip;
pub mod tree;

pub use cascade::{BackTarget, HookContext, MenuBehaviour, MenuCommand, Navigator};
pub use focus::FocusBinding;
pub use input::{
    ActionEvent, ActionPhase, DeviceKind, Player, PlayerId, PlayerRegistry, RoutingTarget,
    RoutingTargetId, RoutingTargets, Selectable, SelectableKind,
};
pub use node::{MenuNode, MenuNodeConfig, MenuVisibility, NodeId, NodeParts, StartBehaviour};
pub use presentation::{CanvasGroup, PanelToggle, Presentation};
pub use router::InputEventRouter;
pub use settings::MenuSettings;
pub use submenu::SubmenuRegistry;
pub use tooltip::{DeviceGlyph, Glyph, TooltipObserver};
pub use tree::{MenuTree, MenuTreeBuilder, RoutingSource};

pub use bevy_menu_focus_layout as layout;

/// `tracing` target shared by every log line of this crate.
///
/// Filter with e.g. `RUST_LOG=menu_focus=debug`.
pub const LOG_TARGET: &str = "menu_focus";
