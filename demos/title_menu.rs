//! Title menu driven through the Bevy plugin.
//!
//! This example shows how to:
//! - Build a small menu tree and hand it to `MenuFocusPlugin`
//! - Feed player joins, actions and navigation requests in as messages
//! - Read back which panel is open and who focuses it
//!
//! No window or input backend is needed: the app is stepped by hand and the
//! in-memory `headless` players stand in for real devices.

use bevy::prelude::*;
use bevy_menu_focus::bevy::{ActionTriggered, MenuFocusPlugin, MenuRequest, PlayerJoined};
use bevy_menu_focus::headless::{LocalPlayers, UiRoutingTargets};
use bevy_menu_focus::{
    ActionEvent, MenuCommand, MenuNodeConfig, MenuSettings, MenuTree, NodeParts, PanelToggle,
    Player, RoutingTarget, RoutingTargetId, Selectable, StartBehaviour,
};

const UI: RoutingTargetId = RoutingTargetId(0);

fn build_menus() -> MenuTree {
    let mut b = MenuTree::builder(MenuSettings::default().with_default_routing_target(UI));
    let title = b.add_root(
        MenuNodeConfig::new("Title")
            .start(StartBehaviour::OpenOnStart)
            .auto_focus_player_one(true)
            .first_select(Selectable::button(1)),
        NodeParts::new(PanelToggle::default()),
    );
    let options = b.add_submenu(
        title,
        "Options",
        MenuNodeConfig::new("Options").first_select(Selectable::button(10)),
        NodeParts::new(PanelToggle::default()),
    );
    b.add_submenu(
        options,
        "Audio",
        MenuNodeConfig::new("Audio").hides_parent(false),
        NodeParts::new(PanelToggle::default()),
    );
    b.build()
}

fn main() {
    let mut app = App::new();
    app.insert_resource(LocalPlayers::new())
        .insert_resource(UiRoutingTargets::new().with(UI))
        .add_plugins(MenuFocusPlugin::<LocalPlayers, UiRoutingTargets>::from_tree(
            build_menus,
        ));

    println!("=== Title Menu Example ===\n");

    app.update();
    report(&app, "After startup");

    let p1 = app.world_mut().resource_mut::<LocalPlayers>().join("Gamepad");
    app.world_mut().write_message(PlayerJoined(p1));
    app.update();
    report(&app, "Player one joined");

    let title = find(&app, "Title");
    app.world_mut().write_message(MenuRequest(MenuCommand::OpenSubmenu {
        node: title,
        id: "Options".to_string(),
        focus: Some(p1),
    }));
    app.update();
    report(&app, "Options requested");

    let options = find(&app, "Options");
    app.world_mut().write_message(MenuRequest(MenuCommand::OpenSubmenu {
        node: options,
        id: "Audio".to_string(),
        focus: Some(p1),
    }));
    app.update();
    report(&app, "Audio opened over Options");

    for _ in 0..2 {
        app.world_mut().write_message(ActionTriggered {
            player: p1,
            event: ActionEvent::performed("Cancel"),
        });
        app.update();
        report(&app, "Cancel pressed");
    }

    app.world_mut().write_message(AppExit::Success);
    app.update();
    let players = app.world().resource::<LocalPlayers>();
    println!(
        "On exit player one is back on action set {:?}",
        players.get(p1).and_then(|p| p.action_set())
    );
}

fn find(app: &App, name: &str) -> bevy_menu_focus::NodeId {
    app.world()
        .resource::<MenuTree>()
        .find(name)
        .unwrap_or_else(|| panic!("{name} is part of the layout"))
}

fn report(app: &App, heading: &str) {
    let tree = app.world().resource::<MenuTree>();
    let targets = app.world().resource::<UiRoutingTargets>();

    println!("--- {heading} ---");
    for node in tree.ids() {
        let Some(menu) = tree.node(node) else {
            continue;
        };
        match tree.focused_player(node) {
            Some(player) => println!(
                "  {:<8} {:?}, focused by {}",
                menu.name(),
                menu.visibility(),
                player
            ),
            None => println!("  {:<8} {:?}", menu.name(), menu.visibility()),
        }
    }
    if let Some(target) = targets.get(UI) {
        println!("  selection: {:?}", target.current_selection());
    }
    println!();
}
