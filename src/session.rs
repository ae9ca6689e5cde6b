use crate::{
    color::Color,
    compose::{ComposeEnv, Scene, compose},
    drag::{
        CommittedGeometry, CommittedSize, DragMode, DragOutcome, DragSession, DragTarget,
        GeometrySnapshot, PendingGeometry,
    },
    error::{MenuetError, MenuetResult},
    forms::{FieldKey, PropertyForm, PropertyTarget, build_form},
    geometry::{ItemGeometry, Point, Viewport},
    model::{Config, Group, GroupKind, Item, Menu, Widget, WidgetKind, default_widget_text_size},
    selection::{Refresh, Selection, SelectionController},
    store::{AssetStore, ConfigStore, ExportArtifact, MenuExporter},
    style::{AlignX, TextRole, reset, set_override},
};

/// Offset applied to pasted free-floating geometry so the copy is visible
/// next to its source.
const PASTE_OFFSET: i32 = 16;

/// Copy/paste payload. Entities are owned values, so a copy is a deep clone.
#[derive(Clone, Debug)]
enum Clipboard {
    Item(Item),
    Widget(Widget),
}

/// The editing state for one open document: the configuration, the active
/// menu, the selection, the viewport mapping and the drag in flight, all in
/// one explicit value instead of ambient globals.
///
/// Mutations are synchronous and optimistic; persistence is a separate,
/// explicit [`EditorSession::save`]. Every operation returns the
/// [`Refresh`] the shell must perform, keeping presentation concerns out of
/// the core.
#[derive(Debug)]
pub struct EditorSession {
    config: Config,
    active: usize,
    selection: SelectionController,
    viewport: Viewport,
    drag: Option<DragSession>,
    clipboard: Option<Clipboard>,
    inventory: crate::assets::AssetInventory,
}

impl EditorSession {
    /// Open a session over an already loaded document. The config is
    /// normalized on the way in, mirroring what load tolerance papered over.
    pub fn new(mut config: Config) -> MenuetResult<Self> {
        if config.menus.is_empty() {
            return Err(MenuetError::session("config has no menus"));
        }
        config.normalize();
        Ok(Self {
            config,
            active: 0,
            selection: SelectionController::default(),
            viewport: Viewport::default(),
            drag: None,
            clipboard: None,
            inventory: crate::assets::AssetInventory::default(),
        })
    }

    /// Load the configuration and the asset inventory before first render.
    pub fn bootstrap(
        config_store: &dyn ConfigStore,
        asset_store: &dyn AssetStore,
    ) -> MenuetResult<Self> {
        let config = config_store.load()?;
        let inventory = asset_store.inventory()?;
        let mut session = Self::new(config)?;
        session.inventory = inventory;
        Ok(session)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn inventory(&self) -> &crate::assets::AssetInventory {
        &self.inventory
    }

    pub fn set_inventory(&mut self, inventory: crate::assets::AssetInventory) {
        self.inventory = inventory;
    }

    pub fn menu(&self) -> &Menu {
        &self.config.menus[self.active]
    }

    fn menu_mut(&mut self) -> &mut Menu {
        &mut self.config.menus[self.active]
    }

    pub fn selection(&self) -> Selection {
        self.selection.current()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Recompute the viewport mapping from the available width. Called by
    /// the shell on every layout change; the value is then threaded into
    /// every drag delta.
    pub fn fit_viewport(&mut self, avail_width: f64) {
        self.viewport = Viewport::fit(avail_width, self.menu().canvas_width() as f64);
    }

    /// Switch the active menu by id. Clears selection and any drag.
    pub fn activate_menu(&mut self, id: &str) -> MenuetResult<Refresh> {
        let index = self
            .config
            .menus
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| MenuetError::session(format!("no menu with id `{id}`")))?;
        self.active = index;
        self.drag = None;
        Ok(self.selection.clear())
    }

    // ---- selection ----

    pub fn select_item(&mut self, group: usize, item: usize) -> Refresh {
        self.selection.select_item(group, item)
    }

    pub fn select_widget(&mut self, index: usize) -> Refresh {
        self.selection.select_widget(index)
    }

    pub fn clear_selection(&mut self) -> Refresh {
        self.selection.clear()
    }

    // ---- document CRUD ----

    pub fn add_group(&mut self, title: impl Into<String>) -> Refresh {
        self.menu_mut().groups.push(Group {
            title: title.into(),
            ..Group::default()
        });
        Refresh::SCENE
    }

    pub fn rename_group(&mut self, group: usize, title: impl Into<String>) -> MenuetResult<Refresh> {
        let g = self.group_mut(group)?;
        g.title = title.into();
        Ok(Refresh::ALL)
    }

    pub fn delete_group(&mut self, group: usize) -> MenuetResult<Refresh> {
        if group >= self.menu().groups.len() {
            return Err(MenuetError::session(format!("no group at index {group}")));
        }
        self.menu_mut().groups.remove(group);
        self.selection.note_group_removed(group);
        Ok(Refresh::ALL)
    }

    pub fn move_group_up(&mut self, group: usize) -> MenuetResult<Refresh> {
        if group == 0 || group >= self.menu().groups.len() {
            return Ok(Refresh::NONE);
        }
        self.menu_mut().groups.swap(group - 1, group);
        self.selection.note_groups_swapped(group - 1, group);
        Ok(Refresh::SCENE)
    }

    pub fn move_group_down(&mut self, group: usize) -> MenuetResult<Refresh> {
        if group + 1 >= self.menu().groups.len() {
            return Ok(Refresh::NONE);
        }
        self.menu_mut().groups.swap(group, group + 1);
        self.selection.note_groups_swapped(group, group + 1);
        Ok(Refresh::SCENE)
    }

    /// Append a new item and select it. Free-form groups stagger the default
    /// geometry by the item count so new boxes do not stack exactly.
    pub fn add_item(&mut self, group: usize, name: impl Into<String>) -> MenuetResult<Refresh> {
        let g = self.group_mut(group)?;
        let mut item = Item {
            name: name.into(),
            ..Item::default()
        };
        if g.kind == GroupKind::FreeForm {
            let offset = (g.items.len() as i32) * 20;
            item.geometry = Some(ItemGeometry {
                x: offset,
                y: offset,
                ..ItemGeometry::default()
            });
        }
        g.items.push(item);
        let index = g.items.len() - 1;
        Ok(self.selection.select_item(group, index))
    }

    pub fn delete_item(&mut self, group: usize, item: usize) -> MenuetResult<Refresh> {
        let g = self.group_mut(group)?;
        if item >= g.items.len() {
            return Err(MenuetError::session(format!("no item at index {item}")));
        }
        g.items.remove(item);
        self.selection.note_item_removed(group, item);
        Ok(Refresh::ALL)
    }

    pub fn add_text_widget(&mut self, text: impl Into<String>) -> Refresh {
        self.menu_mut().widgets.push(Widget {
            x: 0,
            y: 0,
            kind: WidgetKind::Text {
                text: text.into(),
                size: default_widget_text_size(),
                color: None,
                font: None,
            },
        });
        let index = self.menu().widgets.len() - 1;
        self.selection.select_widget(index)
    }

    pub fn add_image_widget(&mut self, file: impl Into<String>) -> Refresh {
        self.menu_mut().widgets.push(Widget {
            x: 0,
            y: 0,
            kind: WidgetKind::Image {
                file: file.into(),
                width: 100,
                height: 100,
            },
        });
        let index = self.menu().widgets.len() - 1;
        self.selection.select_widget(index)
    }

    pub fn delete_widget(&mut self, index: usize) -> MenuetResult<Refresh> {
        if index >= self.menu().widgets.len() {
            return Err(MenuetError::session(format!("no widget at index {index}")));
        }
        self.menu_mut().widgets.remove(index);
        self.selection.note_widget_removed(index);
        Ok(Refresh::ALL)
    }

    /// Delete whatever is selected. A no-op with no selection.
    pub fn delete_selection(&mut self) -> MenuetResult<Refresh> {
        match self.selection.current() {
            Selection::None => Ok(Refresh::NONE),
            Selection::Item { group, item } => self.delete_item(group, item),
            Selection::Widget(index) => self.delete_widget(index),
        }
    }

    // ---- copy/paste ----

    /// Copy the selected entity into the clipboard slot.
    pub fn copy_selection(&mut self) -> Refresh {
        self.clipboard = match self.selection.current() {
            Selection::None => None,
            Selection::Item { group, item } => self
                .menu()
                .groups
                .get(group)
                .and_then(|g| g.items.get(item))
                .cloned()
                .map(Clipboard::Item),
            Selection::Widget(index) => self
                .menu()
                .widgets
                .get(index)
                .cloned()
                .map(Clipboard::Widget),
        };
        Refresh::NONE
    }

    /// Paste the clipboard. Items land in the group of the current item
    /// selection, else the last group; free-floating geometry is offset so
    /// the copy is visible. The paste becomes the new selection.
    pub fn paste(&mut self) -> MenuetResult<Refresh> {
        match self.clipboard.clone() {
            None => Ok(Refresh::NONE),
            Some(Clipboard::Item(mut item)) => {
                let group = match self.selection.current() {
                    Selection::Item { group, .. } => group,
                    _ => self
                        .menu()
                        .groups
                        .len()
                        .checked_sub(1)
                        .ok_or_else(|| MenuetError::session("no group to paste into"))?,
                };
                if let Some(geom) = &mut item.geometry {
                    geom.x += PASTE_OFFSET;
                    geom.y += PASTE_OFFSET;
                }
                let g = self.group_mut(group)?;
                if g.kind != GroupKind::FreeForm {
                    item.geometry = None;
                }
                g.items.push(item);
                let index = g.items.len() - 1;
                Ok(self.selection.select_item(group, index))
            }
            Some(Clipboard::Widget(mut widget)) => {
                widget.x += PASTE_OFFSET;
                widget.y += PASTE_OFFSET;
                self.menu_mut().widgets.push(widget);
                let index = self.menu().widgets.len() - 1;
                Ok(self.selection.select_widget(index))
            }
        }
    }

    // ---- drag wiring ----

    /// Arm a drag at pointer-down. Also selects the target if it was not
    /// already selected, matching the pointer-down contract.
    pub fn begin_drag(
        &mut self,
        target: DragTarget,
        mode: DragMode,
        pointer: Point,
    ) -> MenuetResult<Refresh> {
        let snapshot = self.snapshot_of(target)?;
        self.drag = Some(DragSession::arm(
            target,
            mode,
            pointer,
            snapshot,
            self.viewport,
        ));
        Ok(match target {
            DragTarget::Item { group, item } => self.selection.select_item(group, item),
            DragTarget::Widget(index) => self.selection.select_widget(index),
        })
    }

    pub fn drag_moved(&mut self, pointer: Point) {
        if let Some(drag) = &mut self.drag {
            drag.pointer_moved(pointer);
        }
    }

    /// Animation-frame tick: apply the latest pointer sample and return the
    /// overlay to compose with, if the gesture is past the click threshold.
    pub fn drag_frame(&mut self) -> Option<(DragTarget, PendingGeometry)> {
        let drag = self.drag.as_mut()?;
        let target = drag.target();
        drag.on_frame().map(|pending| (target, pending))
    }

    /// Pointer-up: commit the gesture into the model. Also the handler for
    /// lost pointer capture, which must not leave a stuck session.
    pub fn end_drag(&mut self) -> Refresh {
        let Some(drag) = self.drag.take() else {
            return Refresh::NONE;
        };
        match drag.release() {
            DragOutcome::Click => Refresh::SCENE,
            DragOutcome::Commit { target, geometry } => self.write_geometry(target, geometry),
        }
    }

    /// Window blur / capture loss routes through the same commit path as a
    /// pointer-up.
    pub fn drag_interrupted(&mut self) -> Refresh {
        self.end_drag()
    }

    fn snapshot_of(&self, target: DragTarget) -> MenuetResult<GeometrySnapshot> {
        match target {
            DragTarget::Item { group, item } => {
                let g = self
                    .menu()
                    .groups
                    .get(group)
                    .ok_or_else(|| MenuetError::session(format!("no group at index {group}")))?;
                let entity = g
                    .items
                    .get(item)
                    .ok_or_else(|| MenuetError::session(format!("no item at index {item}")))?;
                let geom = entity.geometry.unwrap_or_default();
                Ok(GeometrySnapshot::of_box(geom.x, geom.y, geom.w, geom.h))
            }
            DragTarget::Widget(index) => {
                let widget = self
                    .menu()
                    .widgets
                    .get(index)
                    .ok_or_else(|| MenuetError::session(format!("no widget at index {index}")))?;
                Ok(match &widget.kind {
                    WidgetKind::Text { size, .. } => {
                        GeometrySnapshot::of_text(widget.x, widget.y, *size)
                    }
                    WidgetKind::Image { width, height, .. } => {
                        GeometrySnapshot::of_box(widget.x, widget.y, *width, *height)
                    }
                })
            }
        }
    }

    // Commit writes re-resolve the target: a concurrent deletion mid-gesture
    // aborts without touching the model.
    fn write_geometry(&mut self, target: DragTarget, geometry: CommittedGeometry) -> Refresh {
        match target {
            DragTarget::Item { group, item } => {
                let Some(entity) = self
                    .menu_mut()
                    .groups
                    .get_mut(group)
                    .and_then(|g| g.items.get_mut(item))
                else {
                    tracing::warn!(group, item, "drag target item vanished; commit dropped");
                    return Refresh::SCENE;
                };
                if let CommittedSize::Box { w, h } = geometry.size {
                    entity.geometry = Some(ItemGeometry {
                        x: geometry.x,
                        y: geometry.y,
                        w,
                        h,
                    });
                }
            }
            DragTarget::Widget(index) => {
                let Some(widget) = self.menu_mut().widgets.get_mut(index) else {
                    tracing::warn!(index, "drag target widget vanished; commit dropped");
                    return Refresh::SCENE;
                };
                widget.x = geometry.x;
                widget.y = geometry.y;
                match (&mut widget.kind, geometry.size) {
                    (WidgetKind::Text { size, .. }, CommittedSize::FontPx(px)) => *size = px,
                    (WidgetKind::Image { width, height, .. }, CommittedSize::Box { w, h }) => {
                        *width = w;
                        *height = h;
                    }
                    _ => {}
                }
            }
        }
        // Re-open the property panel so its numbers match the commit.
        Refresh::ALL
    }

    // ---- composition ----

    /// Compose the active menu with the current selection and any live-drag
    /// overlay substituted for the dragged entity's stored geometry.
    pub fn compose_scene(&self, env: &ComposeEnv) -> Scene {
        let overlay = self
            .drag
            .as_ref()
            .and_then(|d| d.pending().map(|p| (d.target(), p)));
        compose(self.menu(), env, self.selection.current(), overlay)
    }

    // ---- property forms ----

    /// The form for the current selection, or `None` when nothing is
    /// selected (the shell hides the panel).
    pub fn active_form(&self) -> MenuetResult<Option<PropertyForm>> {
        match PropertyTarget::of_selection(self.selection.current()) {
            Some(target) => build_form(self.menu(), target).map(Some),
            None => Ok(None),
        }
    }

    pub fn form_for(&self, target: PropertyTarget) -> MenuetResult<PropertyForm> {
        build_form(self.menu(), target)
    }

    /// Route one edited field back into the document. Numeric and color
    /// input parses best-effort, keeping the previous value on garbage; an
    /// empty value on an override field resets it to inherited.
    pub fn apply_field(
        &mut self,
        target: PropertyTarget,
        key: FieldKey,
        raw: &str,
    ) -> MenuetResult<Refresh> {
        match target {
            PropertyTarget::Menu => apply_menu_field(self.menu_mut(), key, raw),
            PropertyTarget::Group(group) => {
                let g = self.group_mut(group)?;
                apply_group_field(g, key, raw)
            }
            PropertyTarget::Item { group, item } => {
                let owner_kind = self.group_mut(group)?.kind;
                let g = self.group_mut(group)?;
                let entity = g
                    .items
                    .get_mut(item)
                    .ok_or_else(|| MenuetError::session(format!("no item at index {item}")))?;
                apply_item_field(entity, owner_kind, key, raw)
            }
            PropertyTarget::Widget(index) => {
                let widget = self
                    .menu_mut()
                    .widgets
                    .get_mut(index)
                    .ok_or_else(|| MenuetError::session(format!("no widget at index {index}")))?;
                apply_widget_field(widget, key, raw)
            }
        }
    }

    // ---- boundary calls ----

    pub fn save(&self, store: &mut dyn ConfigStore) -> MenuetResult<()> {
        store.save(&self.config)
    }

    pub fn export(&self, exporter: &mut dyn MenuExporter) -> MenuetResult<ExportArtifact> {
        exporter.export(self.menu())
    }

    fn group_mut(&mut self, group: usize) -> MenuetResult<&mut Group> {
        let active = self.active;
        self.config.menus[active]
            .groups
            .get_mut(group)
            .ok_or_else(|| MenuetError::session(format!("no group at index {group}")))
    }
}

// ---- field routing ----

fn parse_or<T: std::str::FromStr>(raw: &str, prev: T) -> T {
    raw.trim().parse().unwrap_or(prev)
}

/// Override slot for a parseable value: empty resets, garbage keeps the
/// previous state.
fn parse_into_slot<T: std::str::FromStr>(slot: &mut Option<T>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        reset(slot);
    } else if let Ok(v) = trimmed.parse() {
        *slot = Some(v);
    }
}

fn color_into_slot(slot: &mut Option<Color>, raw: &str) {
    if raw.trim().is_empty() {
        reset(slot);
    } else if let Some(c) = Color::parse(raw) {
        *slot = Some(c);
    }
}

fn parse_align(raw: &str, prev: AlignX) -> AlignX {
    match raw.trim() {
        "start" => AlignX::Start,
        "center" => AlignX::Center,
        "end" => AlignX::End,
        _ => prev,
    }
}

fn apply_menu_field(menu: &mut Menu, key: FieldKey, raw: &str) -> MenuetResult<Refresh> {
    use crate::model::CanvasSizing;
    match key {
        FieldKey::Title => menu.title = raw.to_string(),
        FieldKey::Subtitle => menu.subtitle = raw.to_string(),
        FieldKey::TitleAlign => {
            menu.styles.title_align = parse_align(raw, menu.styles.title_align);
        }
        FieldKey::Columns => menu.layout.columns = parse_or(raw, menu.layout.columns).max(1),
        FieldKey::CanvasWidth => match &mut menu.layout.sizing {
            CanvasSizing::AutoHeight { width } | CanvasSizing::Fixed { width, .. } => {
                *width = parse_or(raw, *width).max(1);
            }
        },
        FieldKey::CanvasHeight => {
            if let CanvasSizing::Fixed { height, .. } = &mut menu.layout.sizing {
                *height = parse_or(raw, *height).max(1);
            }
        }
        FieldKey::CanvasFill => {
            menu.layout.background_color = Color::parse_or(raw, menu.layout.background_color);
        }
        FieldKey::RoleColor(role) => {
            let style = role_mut(menu, role);
            style.color = Color::parse_or(raw, style.color);
        }
        FieldKey::RoleFont(role) => {
            let style = role_mut(menu, role);
            if !raw.trim().is_empty() {
                style.font = raw.trim().to_string();
            }
        }
        FieldKey::RoleSize(role) => {
            let style = role_mut(menu, role);
            style.size = parse_or(raw, style.size).max(1);
        }
        FieldKey::GroupPanelColor => {
            menu.group_panel.color = Color::parse_or(raw, menu.group_panel.color);
        }
        FieldKey::GroupPanelAlpha => menu.group_panel.alpha = parse_or(raw, menu.group_panel.alpha),
        FieldKey::GroupPanelBlur => menu.group_panel.blur = parse_or(raw, menu.group_panel.blur),
        FieldKey::ItemPanelColor => {
            menu.item_panel.color = Color::parse_or(raw, menu.item_panel.color);
        }
        FieldKey::ItemPanelAlpha => menu.item_panel.alpha = parse_or(raw, menu.item_panel.alpha),
        FieldKey::ItemPanelBlur => menu.item_panel.blur = parse_or(raw, menu.item_panel.blur),
        FieldKey::ShadowEnabled => menu.shadow.enabled = parse_or(raw, menu.shadow.enabled),
        FieldKey::ShadowColor => menu.shadow.color = Color::parse_or(raw, menu.shadow.color),
        FieldKey::ShadowOffsetX => menu.shadow.offset_x = parse_or(raw, menu.shadow.offset_x),
        FieldKey::ShadowOffsetY => menu.shadow.offset_y = parse_or(raw, menu.shadow.offset_y),
        FieldKey::ShadowRadius => menu.shadow.radius = parse_or(raw, menu.shadow.radius),
        FieldKey::ExportScale => {
            let scale = parse_or(raw, menu.export.scale);
            if scale.is_finite() && scale > 0.0 {
                menu.export.scale = scale;
            }
        }
        FieldKey::ExportFps => menu.export.video.fps = parse_or(raw, menu.export.video.fps).max(1),
        FieldKey::ExportFormat => {
            use crate::model::ExportFormat;
            menu.export.video.format = match raw.trim() {
                "png" => ExportFormat::Png,
                "gif" => ExportFormat::Gif,
                "webp" => ExportFormat::Webp,
                "mp4" => ExportFormat::Mp4,
                _ => menu.export.video.format,
            };
        }
        other => {
            return Err(MenuetError::session(format!(
                "field {other:?} does not apply to the menu"
            )));
        }
    }
    Ok(Refresh::ALL)
}

fn role_mut(menu: &mut Menu, role: TextRole) -> &mut crate::style::TextStyle {
    match role {
        TextRole::Title => &mut menu.styles.title,
        TextRole::Subtitle => &mut menu.styles.subtitle,
        TextRole::GroupTitle => &mut menu.styles.group_title,
        TextRole::GroupSubtitle => &mut menu.styles.group_subtitle,
        TextRole::ItemName => &mut menu.styles.item_name,
        TextRole::ItemDesc => &mut menu.styles.item_desc,
    }
}

fn apply_group_field(group: &mut Group, key: FieldKey, raw: &str) -> MenuetResult<Refresh> {
    match key {
        FieldKey::GroupTitle => group.title = raw.to_string(),
        FieldKey::GroupSubtitle => {
            group.subtitle = Some(raw.to_string()).filter(|s| !s.trim().is_empty());
        }
        FieldKey::GroupKind => {
            let kind = match raw.trim() {
                "normal" => GroupKind::Normal,
                "free_form" => GroupKind::FreeForm,
                "text_only" => GroupKind::TextOnly,
                _ => group.kind,
            };
            if kind != group.kind {
                group.kind = kind;
                match kind {
                    // Entering free-form: stagger default boxes so existing
                    // items are individually grabbable.
                    GroupKind::FreeForm => {
                        for (ii, item) in group.items.iter_mut().enumerate() {
                            let offset = ii as i32 * 20;
                            item.geometry = Some(ItemGeometry {
                                x: offset,
                                y: offset,
                                ..ItemGeometry::default()
                            });
                        }
                    }
                    GroupKind::Normal | GroupKind::TextOnly => {
                        for item in &mut group.items {
                            item.geometry = None;
                        }
                    }
                }
            }
        }
        FieldKey::GroupText => group.text = raw.to_string(),
        FieldKey::GroupColumns => {
            parse_into_slot(&mut group.style.columns, raw);
            if group.style.columns == Some(0) {
                group.style.columns = Some(1);
            }
        }
        FieldKey::GroupPanelWidth => {
            parse_into_slot(&mut group.style.panel_width, raw);
            if group.style.panel_width == Some(0) {
                reset(&mut group.style.panel_width);
            }
        }
        FieldKey::GroupPanelHeight => {
            parse_into_slot(&mut group.style.panel_height, raw);
            // Zero means "auto", the inherited behavior.
            if group.style.panel_height == Some(0) {
                reset(&mut group.style.panel_height);
            }
        }
        FieldKey::GroupTitleColor => color_into_slot(&mut group.style.title.color, raw),
        FieldKey::GroupTitleFont => {
            set_override(&mut group.style.title.font, raw.trim().to_string());
        }
        FieldKey::GroupTitleSize => parse_into_slot(&mut group.style.title.size, raw),
        FieldKey::GroupSubtitleColor => color_into_slot(&mut group.style.subtitle.color, raw),
        FieldKey::GroupSubtitleFont => {
            set_override(&mut group.style.subtitle.font, raw.trim().to_string());
        }
        FieldKey::GroupSubtitleSize => parse_into_slot(&mut group.style.subtitle.size, raw),
        FieldKey::PanelColor => color_into_slot(&mut group.style.panel.color, raw),
        FieldKey::PanelAlpha => parse_into_slot(&mut group.style.panel.alpha, raw),
        FieldKey::PanelBlur => parse_into_slot(&mut group.style.panel.blur, raw),
        other => {
            return Err(MenuetError::session(format!(
                "field {other:?} does not apply to a group"
            )));
        }
    }
    Ok(Refresh::ALL)
}

fn apply_item_field(
    item: &mut Item,
    owner_kind: GroupKind,
    key: FieldKey,
    raw: &str,
) -> MenuetResult<Refresh> {
    match key {
        FieldKey::ItemName => item.name = raw.to_string(),
        FieldKey::ItemDesc => item.desc = raw.to_string(),
        FieldKey::ItemIcon => {
            item.icon = Some(raw.trim().to_string()).filter(|s| !s.is_empty());
        }
        FieldKey::NameColor => color_into_slot(&mut item.style.name.color, raw),
        FieldKey::NameFont => set_override(&mut item.style.name.font, raw.trim().to_string()),
        FieldKey::NameSize => parse_into_slot(&mut item.style.name.size, raw),
        FieldKey::DescColor => color_into_slot(&mut item.style.desc.color, raw),
        FieldKey::DescFont => set_override(&mut item.style.desc.font, raw.trim().to_string()),
        FieldKey::DescSize => parse_into_slot(&mut item.style.desc.size, raw),
        FieldKey::Bold => parse_into_slot(&mut item.style.bold, raw),
        FieldKey::Italic => parse_into_slot(&mut item.style.italic, raw),
        FieldKey::Underline => parse_into_slot(&mut item.style.underline, raw),
        FieldKey::NameShadow => shadow_toggle(&mut item.style.name_shadow, raw),
        FieldKey::DescShadow => shadow_toggle(&mut item.style.desc_shadow, raw),
        FieldKey::PanelColor => color_into_slot(&mut item.panel.color, raw),
        FieldKey::PanelAlpha => parse_into_slot(&mut item.panel.alpha, raw),
        FieldKey::PanelBlur => parse_into_slot(&mut item.panel.blur, raw),
        FieldKey::GeomX | FieldKey::GeomY | FieldKey::GeomW | FieldKey::GeomH => {
            if owner_kind != GroupKind::FreeForm {
                return Err(MenuetError::session(
                    "geometry fields apply only to free-form items",
                ));
            }
            let mut geom = item.geometry.unwrap_or_default();
            match key {
                FieldKey::GeomX => geom.x = parse_or(raw, geom.x),
                FieldKey::GeomY => geom.y = parse_or(raw, geom.y),
                FieldKey::GeomW => geom.w = parse_or(raw, geom.w),
                FieldKey::GeomH => geom.h = parse_or(raw, geom.h),
                _ => unreachable!(),
            }
            item.geometry = Some(geom.clamped());
        }
        other => {
            return Err(MenuetError::session(format!(
                "field {other:?} does not apply to an item"
            )));
        }
    }
    Ok(Refresh::ALL)
}

/// A per-field shadow override edited as a toggle: empty resets to the menu
/// default, a boolean stores an override carrying the default offsets.
fn shadow_toggle(slot: &mut Option<crate::style::ShadowStyle>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        reset(slot);
        return;
    }
    if let Ok(enabled) = trimmed.parse::<bool>() {
        let mut shadow = slot.unwrap_or_default();
        shadow.enabled = enabled;
        *slot = Some(shadow);
    }
}

fn apply_widget_field(widget: &mut Widget, key: FieldKey, raw: &str) -> MenuetResult<Refresh> {
    use crate::geometry::{MIN_BOX_PX, MIN_TEXT_WIDGET_SIZE};
    match (key, &mut widget.kind) {
        (FieldKey::WidgetX, _) => widget.x = parse_or(raw, widget.x),
        (FieldKey::WidgetY, _) => widget.y = parse_or(raw, widget.y),
        (FieldKey::WidgetText, WidgetKind::Text { text, .. }) => *text = raw.to_string(),
        (FieldKey::WidgetSize, WidgetKind::Text { size, .. }) => {
            *size = parse_or(raw, *size).max(MIN_TEXT_WIDGET_SIZE as u32);
        }
        (FieldKey::WidgetColor, WidgetKind::Text { color, .. }) => color_into_slot(color, raw),
        (FieldKey::WidgetFont, WidgetKind::Text { font, .. }) => {
            set_override(font, raw.trim().to_string());
        }
        (FieldKey::WidgetFile, WidgetKind::Image { file, .. }) => {
            if !raw.trim().is_empty() {
                *file = raw.trim().to_string();
            }
        }
        (FieldKey::WidgetWidth, WidgetKind::Image { width, .. }) => {
            *width = parse_or(raw, *width).max(MIN_BOX_PX as u32);
        }
        (FieldKey::WidgetHeight, WidgetKind::Image { height, .. }) => {
            *height = parse_or(raw, *height).max(MIN_BOX_PX as u32);
        }
        (other, _) => {
            return Err(MenuetError::session(format!(
                "field {other:?} does not apply to this widget"
            )));
        }
    }
    Ok(Refresh::ALL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetInventory;
    use crate::store::MemoryStore;

    fn session() -> EditorSession {
        let mut config = Config::starter();
        config.menus[0].groups.push(Group {
            title: "Free".to_string(),
            kind: GroupKind::FreeForm,
            items: vec![Item {
                name: "float".to_string(),
                geometry: Some(ItemGeometry {
                    x: 40,
                    y: 40,
                    w: 280,
                    h: 100,
                }),
                ..Item::default()
            }],
            ..Group::default()
        });
        EditorSession::new(config).unwrap()
    }

    #[test]
    fn empty_config_is_rejected() {
        assert!(EditorSession::new(Config::default()).is_err());
    }

    #[test]
    fn bootstrap_loads_config_and_inventory() {
        let mut store = MemoryStore::new(Config::starter());
        store.inventory.add(crate::assets::AssetKind::Font, "title.ttf");
        let session = EditorSession::bootstrap(&store, &store).unwrap();
        assert_eq!(session.menu().id, "main");
        assert!(
            session
                .inventory()
                .contains(crate::assets::AssetKind::Font, "title.ttf")
        );
    }

    #[test]
    fn group_crud_keeps_selection_consistent() {
        let mut s = session();
        let _ = s.add_group("Drinks");
        assert_eq!(s.menu().groups.len(), 3);

        let _ = s.select_item(2, 0);
        let _ = s.move_group_up(2).unwrap();
        assert_eq!(s.selection(), Selection::Item { group: 1, item: 0 });
        assert_eq!(s.menu().groups[1].title, "Drinks");

        let _ = s.delete_group(1).unwrap();
        assert_eq!(s.selection(), Selection::None);
    }

    #[test]
    fn new_free_form_items_get_staggered_geometry() {
        let mut s = session();
        let _ = s.add_item(1, "second").unwrap();
        let geom = s.menu().groups[1].items[1].geometry.unwrap();
        assert_eq!((geom.x, geom.y), (20, 20));
        assert_eq!(s.selection(), Selection::Item { group: 1, item: 1 });
    }

    #[test]
    fn delete_selection_acts_on_the_current_target() {
        let mut s = session();
        let _ = s.select_widget(0);
        let _ = s.delete_selection().unwrap();
        assert!(s.menu().widgets.is_empty());
        assert_eq!(s.selection(), Selection::None);
        // Nothing selected: a silent no-op.
        assert_eq!(s.delete_selection().unwrap(), Refresh::NONE);
    }

    #[test]
    fn copy_paste_offsets_free_floating_geometry() {
        let mut s = session();
        let _ = s.select_item(1, 0);
        let _ = s.copy_selection();
        let _ = s.paste().unwrap();
        let pasted = s.menu().groups[1].items[1].geometry.unwrap();
        assert_eq!((pasted.x, pasted.y), (56, 56));
        assert_eq!(s.selection(), Selection::Item { group: 1, item: 1 });

        let _ = s.select_widget(0);
        let _ = s.copy_selection();
        let _ = s.paste().unwrap();
        let widget = &s.menu().widgets[1];
        assert_eq!((widget.x, widget.y), (56, 16));
    }

    #[test]
    fn pasting_an_item_into_a_grid_drops_its_geometry() {
        let mut s = session();
        let _ = s.select_item(1, 0);
        let _ = s.copy_selection();
        let _ = s.select_item(0, 0);
        let _ = s.paste().unwrap();
        let pasted = s.menu().groups[0].items.last().unwrap();
        assert_eq!(pasted.geometry, None);
    }

    #[test]
    fn drag_move_commits_through_the_session() {
        let mut s = session();
        s.fit_viewport(500.0); // canvas width 1000 -> scale 0.5
        let _ = s.begin_drag(
            DragTarget::Item { group: 1, item: 0 },
            DragMode::Move,
            Point::new(100.0, 100.0),
        )
        .unwrap();
        assert_eq!(s.selection(), Selection::Item { group: 1, item: 0 });

        s.drag_moved(Point::new(200.0, 200.0));
        let (target, pending) = s.drag_frame().unwrap();
        assert_eq!(target, DragTarget::Item { group: 1, item: 0 });
        assert_eq!((pending.x, pending.y), (240.0, 240.0));

        let refresh = s.end_drag();
        assert_eq!(refresh, Refresh::ALL);
        let geom = s.menu().groups[1].items[0].geometry.unwrap();
        assert_eq!((geom.x, geom.y), (240, 240));
    }

    #[test]
    fn drag_on_deleted_entity_aborts_without_writing() {
        let mut s = session();
        let _ = s.begin_drag(
            DragTarget::Widget(0),
            DragMode::Move,
            Point::new(0.0, 0.0),
        )
        .unwrap();
        s.drag_moved(Point::new(300.0, 300.0));
        let _ = s.drag_frame();
        // A concurrent UI action removes the widget mid-gesture.
        s.menu_mut().widgets.clear();
        s.selection.note_widget_removed(0);
        let refresh = s.end_drag();
        assert_eq!(refresh, Refresh::SCENE);
        assert!(s.menu().widgets.is_empty());
    }

    #[test]
    fn sub_threshold_release_leaves_the_model_alone() {
        let mut s = session();
        let before = s.menu().clone();
        let _ = s.begin_drag(
            DragTarget::Item { group: 1, item: 0 },
            DragMode::Move,
            Point::new(50.0, 50.0),
        )
        .unwrap();
        s.drag_moved(Point::new(52.0, 51.0));
        let _ = s.end_drag();
        assert_eq!(*s.menu(), before);
        assert_eq!(s.selection(), Selection::Item { group: 1, item: 0 });
    }

    #[test]
    fn interrupted_drag_commits_like_pointer_up() {
        let mut s = session();
        let _ = s.begin_drag(
            DragTarget::Widget(0),
            DragMode::Move,
            Point::new(0.0, 0.0),
        )
        .unwrap();
        s.drag_moved(Point::new(100.0, 30.0));
        let _ = s.drag_frame();
        let _ = s.drag_interrupted();
        assert_eq!((s.menu().widgets[0].x, s.menu().widgets[0].y), (140, 30));
        assert!(s.drag_frame().is_none());
    }

    #[test]
    fn compose_scene_substitutes_the_live_overlay() {
        let mut s = session();
        let _ = s.begin_drag(
            DragTarget::Item { group: 1, item: 0 },
            DragMode::Move,
            Point::new(0.0, 0.0),
        )
        .unwrap();
        s.drag_moved(Point::new(60.0, 0.0));
        let _ = s.drag_frame();

        let inv = AssetInventory::default();
        let env = ComposeEnv::new(&inv);
        let scene = s.compose_scene(&env);
        // The document is untouched while the overlay is live.
        assert_eq!(
            s.menu().groups[1].items[0].geometry.unwrap().x,
            40,
        );
        assert!(!scene.nodes.is_empty());
    }

    #[test]
    fn malformed_numeric_input_keeps_the_previous_value() {
        let mut s = session();
        let _ = s.apply_field(PropertyTarget::Menu, FieldKey::Columns, "4")
            .unwrap();
        assert_eq!(s.menu().layout.columns, 4);
        let _ = s.apply_field(PropertyTarget::Menu, FieldKey::Columns, "not-a-number")
            .unwrap();
        assert_eq!(s.menu().layout.columns, 4);
    }

    #[test]
    fn empty_override_input_resets_to_inherited() {
        let mut s = session();
        let target = PropertyTarget::Item { group: 0, item: 0 };
        let _ = s.apply_field(target, FieldKey::NameColor, "#112233").unwrap();
        assert_eq!(
            s.menu().groups[0].items[0].style.name.color,
            Some(Color::rgb(0x11, 0x22, 0x33))
        );
        let _ = s.apply_field(target, FieldKey::NameColor, "").unwrap();
        assert_eq!(s.menu().groups[0].items[0].style.name.color, None);
    }

    #[test]
    fn geometry_fields_clamp_and_reject_grid_items() {
        let mut s = session();
        let free = PropertyTarget::Item { group: 1, item: 0 };
        let _ = s.apply_field(free, FieldKey::GeomW, "5").unwrap();
        assert_eq!(s.menu().groups[1].items[0].geometry.unwrap().w, 20);

        let grid = PropertyTarget::Item { group: 0, item: 0 };
        assert!(s.apply_field(grid, FieldKey::GeomW, "50").is_err());
    }

    #[test]
    fn switching_group_kind_manages_geometry() {
        let mut s = session();
        let _ = s.apply_field(PropertyTarget::Group(0), FieldKey::GroupKind, "free_form")
            .unwrap();
        assert!(s.menu().groups[0].items.iter().all(|i| i.geometry.is_some()));

        let _ = s.apply_field(PropertyTarget::Group(0), FieldKey::GroupKind, "normal")
            .unwrap();
        assert!(s.menu().groups[0].items.iter().all(|i| i.geometry.is_none()));
    }

    #[test]
    fn save_and_export_go_through_the_boundary() {
        let s = session();
        let mut store = MemoryStore::default();
        s.save(&mut store).unwrap();
        assert_eq!(store.saves, 1);
        assert_eq!(store.config, *s.config());

        let artifact = s.export(&mut store).unwrap();
        assert_eq!(artifact.format, crate::model::ExportFormat::Png);

        store.fail_with(500);
        assert!(s.export(&mut store).is_err());
        // The in-memory document is unchanged by a failed round-trip.
        assert_eq!(s.menu().id, "main");
    }

    #[test]
    fn activate_menu_clears_selection() {
        let mut config = Config::starter();
        config.menus.push(Menu::with_defaults("second", "Second"));
        let mut s = EditorSession::new(config).unwrap();
        let _ = s.select_widget(0);
        let _ = s.activate_menu("second").unwrap();
        assert_eq!(s.menu().id, "second");
        assert_eq!(s.selection(), Selection::None);
        assert!(s.activate_menu("ghost").is_err());
    }
}
