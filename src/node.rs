//! Menu nodes — one panel of a menu tree.

use std::fmt;

use crate::cascade::MenuBehaviour;
use crate::focus::FocusBinding;
use crate::input::{PlayerId, RoutingTargetId, Selectable};
use crate::presentation::Presentation;
use crate::submenu::SubmenuRegistry;
use crate::tooltip::TooltipObserver;

/// Index of a node inside its [`crate::MenuTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visibility of a node, derived from its presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuVisibility {
    Open,
    Closed,
}

/// One-time directive applied by [`crate::Navigator::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StartBehaviour {
    OpenOnStart,
    #[default]
    ClosedOnStart,
    /// Visibility is driven externally; start leaves the node alone.
    Unmanaged,
}

/// Static configuration of a node.
///
/// ```ignore
/// let config = MenuNodeConfig::new("Options")
///     .hides_parent(false)
///     .first_select(Selectable::button(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuNodeConfig {
    pub name: String,
    pub hides_parent: bool,
    pub hides_siblings: bool,
    pub start: StartBehaviour,
    pub auto_focus_player_one: bool,
    pub first_select: Option<Selectable>,
    pub routing_target: Option<RoutingTargetId>,
}

impl MenuNodeConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hides_parent: true,
            hides_siblings: true,
            start: StartBehaviour::default(),
            auto_focus_player_one: false,
            first_select: None,
            routing_target: None,
        }
    }

    pub fn hides_parent(mut self, hides: bool) -> Self {
        self.hides_parent = hides;
        self
    }

    pub fn hides_siblings(mut self, hides: bool) -> Self {
        self.hides_siblings = hides;
        self
    }

    pub fn start(mut self, start: StartBehaviour) -> Self {
        self.start = start;
        self
    }

    /// Bind player one automatically whenever the node is open and unfocused.
    pub fn auto_focus_player_one(mut self, enabled: bool) -> Self {
        self.auto_focus_player_one = enabled;
        self
    }

    pub fn first_select(mut self, target: Selectable) -> Self {
        self.first_select = Some(target);
        self
    }

    /// Override the routing target for this node and, by fallback, its descendants.
    pub fn routing_target(mut self, target: RoutingTargetId) -> Self {
        self.routing_target = Some(target);
        self
    }
}

/// Everything a node owns besides its configuration.
///
/// The presentation is mandatory; behaviour and tooltips are optional.
pub struct NodeParts {
    pub presentation: Box<dyn Presentation>,
    pub behaviour: Option<Box<dyn MenuBehaviour>>,
    pub tooltips: Vec<Box<dyn TooltipObserver>>,
}

impl NodeParts {
    pub fn new(presentation: impl Presentation + 'static) -> Self {
        Self {
            presentation: Box::new(presentation),
            behaviour: None,
            tooltips: Vec::new(),
        }
    }

    pub fn with_behaviour(mut self, behaviour: impl MenuBehaviour + 'static) -> Self {
        self.behaviour = Some(Box::new(behaviour));
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl TooltipObserver + 'static) -> Self {
        self.tooltips.push(Box::new(tooltip));
        self
    }
}

/// A single menu panel.
pub struct MenuNode {
    pub(crate) config: MenuNodeConfig,
    /// Id under which the parent registered this node.
    pub(crate) id: Option<String>,
    pub(crate) parent: Option<NodeId>,
    /// Submenus as configured, before validation.
    pub(crate) configured: Vec<(String, NodeId)>,
    pub(crate) submenus: SubmenuRegistry,
    pub(crate) presentation: Box<dyn Presentation>,
    pub(crate) behaviour: Option<Box<dyn MenuBehaviour>>,
    pub(crate) tooltips: Vec<Box<dyn TooltipObserver>>,
    pub(crate) focus: Option<FocusBinding>,
    pub(crate) input_enabled: bool,
}

impl MenuNode {
    pub(crate) fn new(config: MenuNodeConfig, parts: NodeParts) -> Self {
        Self {
            config,
            id: None,
            parent: None,
            configured: Vec::new(),
            submenus: SubmenuRegistry::new(),
            presentation: parts.presentation,
            behaviour: parts.behaviour,
            tooltips: parts.tooltips,
            focus: None,
            input_enabled: true,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[inline]
    pub fn config(&self) -> &MenuNodeConfig {
        &self.config
    }

    /// The id this node is registered under in its parent; `None` at a root.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Read straight from the presentation, never cached.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.presentation.is_active()
    }

    pub fn visibility(&self) -> MenuVisibility {
        if self.is_open() {
            MenuVisibility::Open
        } else {
            MenuVisibility::Closed
        }
    }

    #[inline]
    pub fn focused_player(&self) -> Option<PlayerId> {
        self.focus.as_ref().map(|f| f.player)
    }

    #[inline]
    pub fn focus(&self) -> Option<&FocusBinding> {
        self.focus.as_ref()
    }

    /// False while input dispatch to this node is suppressed.
    #[inline]
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    #[inline]
    pub fn submenus(&self) -> &SubmenuRegistry {
        &self.submenus
    }

    pub fn presentation(&self) -> &dyn Presentation {
        self.presentation.as_ref()
    }

    pub fn tooltips(&self) -> &[Box<dyn TooltipObserver>] {
        &self.tooltips
    }
}

impl fmt::Debug for MenuNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuNode")
            .field("name", &self.config.name)
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("open", &self.is_open())
            .field("focus", &self.focus)
            .field("submenus", &self.submenus)
            .finish()
    }
}
