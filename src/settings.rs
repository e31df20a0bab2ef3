//! Tree-wide menu settings.
//!
//! One value is injected at tree construction. It is the last tier of the
//! routing-target lookup (node → ancestors → settings) and names the actions
//! and schemes the focus protocol cares about.

use serde::{Deserialize, Serialize};

use crate::input::RoutingTargetId;

/// Settings shared by every node of a [`crate::MenuTree`].
///
/// Every field has a default, so partial configs deserialize:
///
/// ```ignore
/// let settings: MenuSettings = serde_json::from_str(r#"{ "cancel_action": "Back" }"#)?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Routing target used when neither a node nor any ancestor sets one.
    pub default_routing_target: Option<RoutingTargetId>,
    /// Action that triggers back navigation when performed.
    pub cancel_action: String,
    /// Action set a focused player is switched to.
    pub ui_action_set: String,
    /// Case-insensitive marker identifying pointer control schemes.
    pub pointer_scheme_marker: String,
    /// High-frequency actions that are dispatched but never logged.
    pub noisy_actions: Vec<String>,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            default_routing_target: None,
            cancel_action: "Cancel".to_string(),
            ui_action_set: "UI".to_string(),
            pointer_scheme_marker: "mouse".to_string(),
            noisy_actions: vec![
                "Point".to_string(),
                "ScrollWheel".to_string(),
                "Look".to_string(),
            ],
        }
    }
}

impl MenuSettings {
    /// Builder method: set the fallback routing target.
    pub fn with_default_routing_target(mut self, target: RoutingTargetId) -> Self {
        self.default_routing_target = Some(target);
        self
    }

    /// Builder method: set the cancel action name.
    pub fn with_cancel_action(mut self, action: impl Into<String>) -> Self {
        self.cancel_action = action.into();
        self
    }

    /// Whether `scheme` names a pointer-driven control scheme.
    pub fn is_pointer_scheme(&self, scheme: &str) -> bool {
        scheme
            .to_lowercase()
            .contains(&self.pointer_scheme_marker.to_lowercase())
    }

    #[inline]
    pub fn is_noisy(&self, action: &str) -> bool {
        self.noisy_actions.iter().any(|a| a == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_scheme_is_case_insensitive_substring() {
        let settings = MenuSettings::default();
        assert!(settings.is_pointer_scheme("KeyboardMouse"));
        assert!(settings.is_pointer_scheme("MOUSE"));
        assert!(!settings.is_pointer_scheme("Gamepad"));
        assert!(!settings.is_pointer_scheme(""));
    }

    #[test]
    fn default_noisy_actions() {
        let settings = MenuSettings::default();
        assert!(settings.is_noisy("Point"));
        assert!(settings.is_noisy("ScrollWheel"));
        assert!(settings.is_noisy("Look"));
        assert!(!settings.is_noisy("Submit"));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let settings: MenuSettings =
            serde_json::from_str(r#"{ "cancel_action": "Back", "default_routing_target": 2 }"#)
                .unwrap();

        assert_eq!(settings.cancel_action, "Back");
        assert_eq!(settings.default_routing_target, Some(RoutingTargetId(2)));
        assert_eq!(settings.ui_action_set, "UI");
        assert_eq!(settings.noisy_actions.len(), 3);
    }

    #[test]
    fn builder_methods() {
        let settings = MenuSettings::default()
            .with_default_routing_target(RoutingTargetId(7))
            .with_cancel_action("Back");
        assert_eq!(settings.default_routing_target, Some(RoutingTargetId(7)));
        assert_eq!(settings.cancel_action, "Back");
    }
}
