//! TOML parser and validator for menus.toml.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// What the runtime does with a menu when the tree starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartDirective {
    /// Open the menu on start.
    Open,
    /// Close the menu on start (default).
    #[default]
    Closed,
    /// Leave visibility to whoever owns the presentation.
    Unmanaged,
}

/// Classification of a selectable widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectKind {
    Button,
    #[default]
    Other,
}

/// The widget a menu selects first when it gains focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectDef {
    pub id: u64,
    pub kind: SelectKind,
}

/// A named reference from a menu to one of its submenus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmenuRef {
    /// Lookup id used by `open_submenu`.
    pub id: String,
    /// Name of the referenced menu definition.
    pub menu: String,
}

/// A single validated menu definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDef {
    pub name: String,
    pub start: StartDirective,
    pub auto_focus: bool,
    pub hides_parent: bool,
    pub hides_siblings: bool,
    pub routing_target: Option<u32>,
    pub first_select: Option<SelectDef>,
    pub submenus: Vec<SubmenuRef>,
}

/// Parsed and validated menu layout.
///
/// Menus keep their declaration order. Every menu is referenced by at most
/// one parent and every menu is reachable from a root.
#[derive(Debug, Clone, Default)]
pub struct MenuLayout {
    menus: Vec<MenuDef>,
    by_name: HashMap<String, usize>,
    roots: Vec<usize>,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
struct RawLayout {
    #[serde(default)]
    menu: Vec<RawMenu>,
}

#[derive(Debug, Deserialize)]
struct RawMenu {
    name: String,
    /// "open", "closed" (default) or "unmanaged"
    start: Option<String>,
    #[serde(default)]
    auto_focus: bool,
    hides_parent: Option<bool>,
    hides_siblings: Option<bool>,
    routing_target: Option<u32>,
    first_select: Option<RawSelect>,
    #[serde(default)]
    submenus: Vec<RawSubmenu>,
}

#[derive(Debug, Deserialize)]
struct RawSelect {
    id: u64,
    /// "button" or "other" (default)
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSubmenu {
    id: String,
    menu: String,
}

impl MenuLayout {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            LayoutError::Io(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Parse from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, LayoutError> {
        let raw: RawLayout =
            toml::from_str(content).map_err(|e| LayoutError::Parse(e.to_string()))?;

        let menus = raw
            .menu
            .into_iter()
            .map(Self::convert_menu)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_defs(menus)
    }

    /// Validate already-constructed definitions.
    pub fn from_defs(menus: Vec<MenuDef>) -> Result<Self, LayoutError> {
        // 1. Names are non-empty and unique
        let mut by_name = HashMap::with_capacity(menus.len());
        for (idx, menu) in menus.iter().enumerate() {
            if menu.name.is_empty() {
                return Err(LayoutError::Validation(format!(
                    "menu #{} has an empty name",
                    idx
                )));
            }
            if by_name.insert(menu.name.clone(), idx).is_some() {
                return Err(LayoutError::Validation(format!(
                    "menu name '{}' is declared more than once",
                    menu.name
                )));
            }
        }

        // 2. References resolve and each menu has at most one parent
        let mut parent_of: HashMap<&str, &str> = HashMap::new();
        for menu in &menus {
            for sub in &menu.submenus {
                if !by_name.contains_key(&sub.menu) {
                    return Err(LayoutError::Validation(format!(
                        "menu '{}' references unknown menu '{}'",
                        menu.name, sub.menu
                    )));
                }
                if let Some(existing) = parent_of.insert(sub.menu.as_str(), menu.name.as_str()) {
                    return Err(LayoutError::Validation(format!(
                        "menu '{}' is referenced by both '{}' and '{}'",
                        sub.menu, existing, menu.name
                    )));
                }
            }
        }

        // 3. Every menu is reachable from a root, otherwise it sits on a cycle
        let roots: Vec<usize> = menus
            .iter()
            .enumerate()
            .filter(|(_, m)| !parent_of.contains_key(m.name.as_str()))
            .map(|(i, _)| i)
            .collect();

        let mut reached: HashSet<usize> = HashSet::new();
        let mut stack: Vec<usize> = roots.clone();
        while let Some(idx) = stack.pop() {
            if !reached.insert(idx) {
                continue;
            }
            for sub in &menus[idx].submenus {
                stack.push(by_name[&sub.menu]);
            }
        }

        if let Some(orphan) = menus.iter().enumerate().find(|(i, _)| !reached.contains(i)) {
            return Err(LayoutError::Validation(format!(
                "menu '{}' is part of a reference cycle",
                orphan.1.name
            )));
        }

        Ok(Self {
            menus,
            by_name,
            roots,
        })
    }

    /// All menus in declaration order.
    pub fn menus(&self) -> impl Iterator<Item = &MenuDef> {
        self.menus.iter()
    }

    /// Menus no other menu references, in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &MenuDef> {
        self.roots.iter().map(|&i| &self.menus[i])
    }

    /// Look up a menu by name.
    pub fn get(&self, name: &str) -> Option<&MenuDef> {
        self.by_name.get(name).map(|&i| &self.menus[i])
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    fn convert_menu(raw: RawMenu) -> Result<MenuDef, LayoutError> {
        let start = match raw.start.as_deref() {
            None | Some("closed") => StartDirective::Closed,
            Some("open") => StartDirective::Open,
            Some("unmanaged") => StartDirective::Unmanaged,
            Some(other) => {
                return Err(LayoutError::Validation(format!(
                    "Invalid start value '{}' on menu '{}': expected 'open', 'closed' or 'unmanaged'",
                    other, raw.name
                )));
            }
        };

        let first_select = match raw.first_select {
            None => None,
            Some(sel) => {
                let kind = match sel.kind.as_deref() {
                    None | Some("other") => SelectKind::Other,
                    Some("button") => SelectKind::Button,
                    Some(other) => {
                        return Err(LayoutError::Validation(format!(
                            "Invalid first_select kind '{}' on menu '{}': expected 'button' or 'other'",
                            other, raw.name
                        )));
                    }
                };
                Some(SelectDef { id: sel.id, kind })
            }
        };

        Ok(MenuDef {
            name: raw.name,
            start,
            auto_focus: raw.auto_focus,
            hides_parent: raw.hides_parent.unwrap_or(true),
            hides_siblings: raw.hides_siblings.unwrap_or(true),
            routing_target: raw.routing_target,
            first_select,
            submenus: raw
                .submenus
                .into_iter()
                .map(|s| SubmenuRef {
                    id: s.id,
                    menu: s.menu,
                })
                .collect(),
        })
    }
}

/// Errors during layout parsing.
#[derive(Debug)]
pub enum LayoutError {
    /// IO error
    Io(String),
    /// TOML parse error
    Parse(String),
    /// The menus do not form a valid forest, or a value is out of range
    Validation(String),
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {}", msg),
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for LayoutError {}
