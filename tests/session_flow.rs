use menuet::{
    AssetInventory, Config, DragMode, DragTarget, EditorSession, GroupKind, MemoryStore, Point,
    Selection, WidgetKind,
    dsl::{GroupBuilder, ItemBuilder, MenuBuilder},
};

fn fixture_session() -> EditorSession {
    let config: Config = serde_json::from_str(include_str!("data/sample_config.json")).unwrap();
    EditorSession::new(config).unwrap()
}

fn built_session() -> EditorSession {
    let menu = MenuBuilder::new("m", "Menu")
        .title("Built")
        .group(
            GroupBuilder::new("Floating")
                .kind(GroupKind::FreeForm)
                .item(
                    ItemBuilder::new("Badge")
                        .at(40, 40, 280, 100)
                        .unwrap()
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap(),
        )
        .text_widget(5, 5, "overlay")
        .build()
        .unwrap();
    EditorSession::new(Config { menus: vec![menu] }).unwrap()
}

#[test]
fn scaled_move_commits_in_model_units() {
    // Free-form item at (40,40), screen delta (100,100) at scale 0.5:
    // the committed position is (240,240).
    let mut session = built_session();
    session.fit_viewport(500.0);
    assert_eq!(session.viewport().scale, 0.5);

    let _ = session
        .begin_drag(
            DragTarget::Item { group: 0, item: 0 },
            DragMode::Move,
            Point::new(300.0, 300.0),
        )
        .unwrap();
    session.drag_moved(Point::new(400.0, 400.0));
    let (_, pending) = session.drag_frame().unwrap();
    assert_eq!((pending.x, pending.y), (240.0, 240.0));

    let _ = session.end_drag();
    let geom = session.menu().groups[0].items[0].geometry.unwrap();
    assert_eq!((geom.x, geom.y, geom.w, geom.h), (240, 240, 280, 100));
}

#[test]
fn near_origin_widget_snaps_to_zero_on_both_axes() {
    // Widget at (5,5) dragged past the gate and back to a model delta of
    // (-3,-2): both axes land inside the snap radius and commit to 0.
    let mut session = built_session();
    let _ = session
        .begin_drag(DragTarget::Widget(0), DragMode::Move, Point::new(200.0, 200.0))
        .unwrap();
    session.drag_moved(Point::new(260.0, 240.0));
    let _ = session.drag_frame();
    session.drag_moved(Point::new(197.0, 198.0));
    let _ = session.drag_frame();
    let _ = session.end_drag();

    let widget = &session.menu().widgets[0];
    assert_eq!((widget.x, widget.y), (0, 0));
}

#[test]
fn resize_commit_respects_the_minimum_box() {
    let mut session = built_session();
    let _ = session
        .begin_drag(
            DragTarget::Item { group: 0, item: 0 },
            DragMode::Resize,
            Point::new(0.0, 0.0),
        )
        .unwrap();
    session.drag_moved(Point::new(-2000.0, 30.0));
    let _ = session.end_drag();

    let geom = session.menu().groups[0].items[0].geometry.unwrap();
    assert_eq!((geom.w, geom.h), (20, 130));
    // Bottom-right anchored: the origin never moves on resize.
    assert_eq!((geom.x, geom.y), (40, 40));
}

#[test]
fn deleting_the_target_mid_drag_drops_the_commit() {
    let mut session = built_session();
    let _ = session
        .begin_drag(DragTarget::Widget(0), DragMode::Move, Point::new(0.0, 0.0))
        .unwrap();
    session.drag_moved(Point::new(150.0, 150.0));
    let _ = session.drag_frame();

    let _ = session.delete_widget(0).unwrap();
    let _ = session.end_drag();
    assert!(session.menu().widgets.is_empty());
    assert_eq!(session.selection(), Selection::None);
}

#[test]
fn selection_survives_composition_and_forms() {
    let mut session = fixture_session();
    let _ = session.select_widget(1);
    let _ = session.select_item(0, 1);
    assert_eq!(session.selection(), Selection::Item { group: 0, item: 1 });

    let form = session.active_form().unwrap().unwrap();
    assert_eq!(
        form.field(menuet::FieldKey::ItemName).unwrap().value,
        "Second"
    );
    assert_eq!(
        form.field(menuet::FieldKey::NameColor).unwrap().state,
        menuet::FieldState::Overridden
    );

    let inv = AssetInventory::default();
    let env = menuet::ComposeEnv::new(&inv);
    let scene = session.compose_scene(&env);
    assert!(!scene.nodes.is_empty());
}

#[test]
fn override_reset_flows_back_through_the_form() {
    let mut session = fixture_session();
    let target = menuet::PropertyTarget::Item { group: 0, item: 1 };
    let _ = session
        .apply_field(target, menuet::FieldKey::NameColor, "")
        .unwrap();
    let form = session.form_for(target).unwrap();
    let field = form.field(menuet::FieldKey::NameColor).unwrap();
    assert_eq!(field.state, menuet::FieldState::Inherited);
    assert_eq!(field.value, session.menu().styles.item_name.color.to_string());
}

#[test]
fn save_export_round_trip_through_memory_store() {
    let mut store = MemoryStore::new(fixture_session().config().clone());
    store.inventory.add(menuet::AssetKind::Font, "title.ttf");

    let mut session = EditorSession::bootstrap(&store, &store).unwrap();
    let _ = session.add_text_widget("new overlay");
    session.save(&mut store).unwrap();
    assert_eq!(store.saves, 1);
    assert!(
        store.config.menus[0]
            .widgets
            .iter()
            .any(|w| matches!(&w.kind, WidgetKind::Text { text, .. } if text == "new overlay"))
    );

    let artifact = session.export(&mut store).unwrap();
    assert!(artifact.url.starts_with("/exports/main"));

    store.fail_with(401);
    let err = session.save(&mut store).unwrap_err();
    assert!(err.is_auth_failure());
}
