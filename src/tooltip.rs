//! Tooltip observers: per-device glyphs driven by the focused player.

use crate::input::{DeviceKind, Player, PlayerId};

/// Receives the focused player's input whenever focus lands on the owning
/// menu or that player's controls change.
pub trait TooltipObserver: Send + Sync {
    /// `None` means the observed player is gone.
    fn observe(&mut self, player: Option<&dyn Player>);
}

/// Which glyph set a tooltip should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Glyph {
    Gamepad,
    #[default]
    KeyboardMouse,
}

/// Tooltip that picks a gamepad or keyboard/mouse glyph from the observed
/// player's current device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceGlyph {
    observed: Option<PlayerId>,
    device: Option<DeviceKind>,
}

impl DeviceGlyph {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn observed(&self) -> Option<PlayerId> {
        self.observed
    }

    /// Glyph for the last observed device; keyboard/mouse when unknown.
    pub fn glyph(&self) -> Glyph {
        match self.device {
            Some(DeviceKind::Gamepad) => Glyph::Gamepad,
            _ => Glyph::KeyboardMouse,
        }
    }
}

impl TooltipObserver for DeviceGlyph {
    fn observe(&mut self, player: Option<&dyn Player>) {
        self.observed = player.map(|p| p.id());
        self.device = player.and_then(|p| p.device());
    }
}
