//! Declarative menu layouts for bevy-menu-focus.
//!
//! This crate parses `menus.toml` files into a validated [`MenuLayout`]:
//! a forest of menu definitions where every menu has at most one parent and
//! no reference cycles exist.
//!
//! # Usage
//!
//! ```ignore
//! let layout = bevy_menu_focus_layout::load("assets/menus.toml")?;
//! for root in layout.roots() {
//!     println!("root menu: {}", root.name);
//! }
//! ```
//!
//! # File format
//!
//! ```toml
//! [[menu]]
//! name = "Title"
//! start = "open"            # "open" | "closed" (default) | "unmanaged"
//! auto_focus = true         # bind player one automatically (default false)
//! hides_parent = true       # default true
//! hides_siblings = true     # default true
//! routing_target = 0        # optional routing target override
//! first_select = { id = 10, kind = "button" }
//! submenus = [{ id = "Options", menu = "OptionsMenu" }]
//!
//! [[menu]]
//! name = "OptionsMenu"
//! ```
//!
//! Submenu *ids* are not validated here. Empty or repeated ids are handed to
//! the runtime registry untouched, which drops them with a diagnostic.

mod toml_parser;

pub use toml_parser::{
    LayoutError, MenuDef, MenuLayout, SelectDef, SelectKind, StartDirective, SubmenuRef,
};

use std::path::Path;

/// Read and validate a layout file.
///
/// # Errors
///
/// Returns an error if:
/// - the file cannot be read
/// - the TOML is malformed or has unknown `start` / `kind` values
/// - the menu references do not form a forest (see [`LayoutError::Validation`])
pub fn load(path: impl AsRef<Path>) -> Result<MenuLayout, LayoutError> {
    MenuLayout::from_file(path)
}
