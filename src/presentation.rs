//! Presentation layer seam.
//!
//! A menu is open iff its presentation reports active. The flags behind that
//! answer are always written together, so a panel is never half-open.

/// How a menu panel becomes visible and interactable.
pub trait Presentation: Send + Sync {
    /// Make the panel visible, interactable and opaque.
    fn activate(&mut self);

    /// Make the panel invisible, non-interactable and transparent.
    fn deactivate(&mut self);

    fn is_active(&self) -> bool;
}

/// Single on/off flag, the equivalent of enabling or disabling the panel's
/// whole object.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelToggle {
    active: bool,
}

impl PanelToggle {
    pub fn new(active: bool) -> Self {
        Self { active }
    }
}

impl Presentation for PanelToggle {
    #[inline]
    fn activate(&mut self) {
        self.active = true;
    }

    #[inline]
    fn deactivate(&mut self) {
        self.active = false;
    }

    #[inline]
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Canvas-group style presentation: opacity plus interaction flags.
///
/// Open iff interactable and fully opaque.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasGroup {
    pub alpha: f32,
    pub interactable: bool,
    pub blocks_raycasts: bool,
}

impl Default for CanvasGroup {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            interactable: true,
            blocks_raycasts: true,
        }
    }
}

impl Presentation for CanvasGroup {
    fn activate(&mut self) {
        self.alpha = 1.0;
        self.interactable = true;
        self.blocks_raycasts = true;
    }

    fn deactivate(&mut self) {
        self.alpha = 0.0;
        self.interactable = false;
        self.blocks_raycasts = false;
    }

    fn is_active(&self) -> bool {
        self.interactable && self.alpha >= 1.0
    }
}
