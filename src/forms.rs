use crate::{
    assets::AssetKind,
    color::Color,
    error::{MenuetError, MenuetResult},
    model::{GroupKind, Menu, Widget, WidgetKind, widget_text_fallback},
    selection::Selection,
    style::{AlignX, PanelOverrides, PanelStyle, TextOverride, TextRole, TextStyle},
};

/// Which entity a property form edits. Menu- and group-level forms open
/// explicitly; item and widget forms follow the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyTarget {
    Menu,
    Group(usize),
    Item { group: usize, item: usize },
    Widget(usize),
}

impl PropertyTarget {
    pub fn of_selection(selection: Selection) -> Option<PropertyTarget> {
        match selection {
            Selection::None => None,
            Selection::Widget(w) => Some(PropertyTarget::Widget(w)),
            Selection::Item { group, item } => Some(PropertyTarget::Item { group, item }),
        }
    }
}

/// Whether a field edits a plain document value, shows an inherited default,
/// or holds a private override. `Inherited` and `Overridden` fields expose
/// the reset operation; resetting restores inheritance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState {
    Plain,
    Inherited,
    Overridden,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    Number { min: f64, max: f64 },
    Color,
    FontRef,
    AssetRef(AssetKind),
    Toggle,
    Choice(&'static [&'static str]),
}

pub const ALIGN_CHOICES: &[&str] = &["start", "center", "end"];
pub const KIND_CHOICES: &[&str] = &["normal", "free_form", "text_only"];
pub const FORMAT_CHOICES: &[&str] = &["png", "gif", "webp", "mp4"];

/// Every editable key, one closed union across all four targets so routing
/// an edit is an exhaustive match instead of string dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKey {
    // Menu document
    Title,
    Subtitle,
    TitleAlign,
    Columns,
    CanvasWidth,
    CanvasHeight,
    CanvasFill,
    RoleColor(TextRole),
    RoleFont(TextRole),
    RoleSize(TextRole),
    GroupPanelColor,
    GroupPanelAlpha,
    GroupPanelBlur,
    ItemPanelColor,
    ItemPanelAlpha,
    ItemPanelBlur,
    ShadowEnabled,
    ShadowColor,
    ShadowOffsetX,
    ShadowOffsetY,
    ShadowRadius,
    ExportScale,
    ExportFps,
    ExportFormat,
    // Group
    GroupTitle,
    GroupSubtitle,
    GroupKind,
    GroupText,
    GroupColumns,
    GroupPanelWidth,
    GroupPanelHeight,
    GroupTitleColor,
    GroupTitleFont,
    GroupTitleSize,
    GroupSubtitleColor,
    GroupSubtitleFont,
    GroupSubtitleSize,
    // Group or item panel override, depending on the target
    PanelColor,
    PanelAlpha,
    PanelBlur,
    // Item
    ItemName,
    ItemDesc,
    ItemIcon,
    NameColor,
    NameFont,
    NameSize,
    DescColor,
    DescFont,
    DescSize,
    Bold,
    Italic,
    Underline,
    NameShadow,
    DescShadow,
    GeomX,
    GeomY,
    GeomW,
    GeomH,
    // Widget
    WidgetText,
    WidgetSize,
    WidgetColor,
    WidgetFont,
    WidgetFile,
    WidgetWidth,
    WidgetHeight,
    WidgetX,
    WidgetY,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub key: FieldKey,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Current value, string-encoded the way the input would display it.
    pub value: String,
    pub state: FieldState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyForm {
    pub target: PropertyTarget,
    pub fields: Vec<Field>,
}

impl PropertyForm {
    pub fn field(&self, key: FieldKey) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Generate the editable-field descriptors for one entity. The descriptors
/// are a snapshot; edits go back through the session, which rebuilds the
/// form afterwards.
pub fn build_form(menu: &Menu, target: PropertyTarget) -> MenuetResult<PropertyForm> {
    let fields = match target {
        PropertyTarget::Menu => menu_fields(menu),
        PropertyTarget::Group(g) => {
            let group = menu
                .groups
                .get(g)
                .ok_or_else(|| MenuetError::session(format!("no group at index {g}")))?;
            group_fields(menu, group)
        }
        PropertyTarget::Item { group, item } => {
            let owner = menu
                .groups
                .get(group)
                .ok_or_else(|| MenuetError::session(format!("no group at index {group}")))?;
            let entity = owner
                .items
                .get(item)
                .ok_or_else(|| MenuetError::session(format!("no item at index {item}")))?;
            item_fields(menu, owner.kind, entity)
        }
        PropertyTarget::Widget(w) => {
            let widget = menu
                .widgets
                .get(w)
                .ok_or_else(|| MenuetError::session(format!("no widget at index {w}")))?;
            widget_fields(widget)
        }
    };
    Ok(PropertyForm { target, fields })
}

fn plain(key: FieldKey, label: &'static str, kind: FieldKind, value: String) -> Field {
    Field {
        key,
        label,
        kind,
        value,
        state: FieldState::Plain,
    }
}

fn slot<T: ToString>(
    key: FieldKey,
    label: &'static str,
    kind: FieldKind,
    over: Option<&T>,
    base: &T,
) -> Field {
    Field {
        key,
        label,
        kind,
        value: over.unwrap_or(base).to_string(),
        state: if over.is_some() {
            FieldState::Overridden
        } else {
            FieldState::Inherited
        },
    }
}

fn number(min: f64, max: f64) -> FieldKind {
    FieldKind::Number { min, max }
}

fn align_value(align: AlignX) -> String {
    match align {
        AlignX::Start => "start",
        AlignX::Center => "center",
        AlignX::End => "end",
    }
    .to_string()
}

fn role_label(role: TextRole) -> [&'static str; 3] {
    match role {
        TextRole::Title => ["Title color", "Title font", "Title size"],
        TextRole::Subtitle => ["Subtitle color", "Subtitle font", "Subtitle size"],
        TextRole::GroupTitle => ["Group title color", "Group title font", "Group title size"],
        TextRole::GroupSubtitle => [
            "Group subtitle color",
            "Group subtitle font",
            "Group subtitle size",
        ],
        TextRole::ItemName => ["Item name color", "Item name font", "Item name size"],
        TextRole::ItemDesc => [
            "Item description color",
            "Item description font",
            "Item description size",
        ],
    }
}

fn menu_fields(menu: &Menu) -> Vec<Field> {
    let mut out = vec![
        plain(FieldKey::Title, "Title", FieldKind::Text, menu.title.clone()),
        plain(
            FieldKey::Subtitle,
            "Subtitle",
            FieldKind::Text,
            menu.subtitle.clone(),
        ),
        plain(
            FieldKey::TitleAlign,
            "Title alignment",
            FieldKind::Choice(ALIGN_CHOICES),
            align_value(menu.styles.title_align),
        ),
        plain(
            FieldKey::Columns,
            "Grid columns",
            number(1.0, 8.0),
            menu.layout.columns.to_string(),
        ),
        plain(
            FieldKey::CanvasWidth,
            "Canvas width",
            number(200.0, 4000.0),
            menu.canvas_width().to_string(),
        ),
    ];
    if let crate::model::CanvasSizing::Fixed { height, .. } = menu.layout.sizing {
        out.push(plain(
            FieldKey::CanvasHeight,
            "Canvas height",
            number(200.0, 8000.0),
            height.to_string(),
        ));
    }
    out.push(plain(
        FieldKey::CanvasFill,
        "Canvas fill",
        FieldKind::Color,
        menu.layout.background_color.to_string(),
    ));

    for role in [
        TextRole::Title,
        TextRole::Subtitle,
        TextRole::GroupTitle,
        TextRole::GroupSubtitle,
        TextRole::ItemName,
        TextRole::ItemDesc,
    ] {
        let labels = role_label(role);
        let style: &TextStyle = menu.styles.role(role);
        out.push(plain(
            FieldKey::RoleColor(role),
            labels[0],
            FieldKind::Color,
            style.color.to_string(),
        ));
        out.push(plain(
            FieldKey::RoleFont(role),
            labels[1],
            FieldKind::FontRef,
            style.font.clone(),
        ));
        out.push(plain(
            FieldKey::RoleSize(role),
            labels[2],
            number(1.0, 512.0),
            style.size.to_string(),
        ));
    }

    push_panel_plain(
        &mut out,
        &menu.group_panel,
        [
            (FieldKey::GroupPanelColor, "Group panel color"),
            (FieldKey::GroupPanelAlpha, "Group panel alpha"),
            (FieldKey::GroupPanelBlur, "Group panel blur"),
        ],
    );
    push_panel_plain(
        &mut out,
        &menu.item_panel,
        [
            (FieldKey::ItemPanelColor, "Item panel color"),
            (FieldKey::ItemPanelAlpha, "Item panel alpha"),
            (FieldKey::ItemPanelBlur, "Item panel blur"),
        ],
    );

    out.push(plain(
        FieldKey::ShadowEnabled,
        "Text shadow",
        FieldKind::Toggle,
        menu.shadow.enabled.to_string(),
    ));
    out.push(plain(
        FieldKey::ShadowColor,
        "Shadow color",
        FieldKind::Color,
        menu.shadow.color.to_string(),
    ));
    out.push(plain(
        FieldKey::ShadowOffsetX,
        "Shadow offset x",
        number(-100.0, 100.0),
        menu.shadow.offset_x.to_string(),
    ));
    out.push(plain(
        FieldKey::ShadowOffsetY,
        "Shadow offset y",
        number(-100.0, 100.0),
        menu.shadow.offset_y.to_string(),
    ));
    out.push(plain(
        FieldKey::ShadowRadius,
        "Shadow radius",
        number(0.0, 64.0),
        menu.shadow.radius.to_string(),
    ));

    out.push(plain(
        FieldKey::ExportScale,
        "Export scale",
        number(0.1, 8.0),
        menu.export.scale.to_string(),
    ));
    out.push(plain(
        FieldKey::ExportFps,
        "Export fps",
        number(1.0, 60.0),
        menu.export.video.fps.to_string(),
    ));
    out.push(plain(
        FieldKey::ExportFormat,
        "Export format",
        FieldKind::Choice(FORMAT_CHOICES),
        format!("{:?}", menu.export.video.format).to_lowercase(),
    ));
    out
}

fn push_panel_plain(out: &mut Vec<Field>, panel: &PanelStyle, keys: [(FieldKey, &'static str); 3]) {
    out.push(plain(
        keys[0].0,
        keys[0].1,
        FieldKind::Color,
        panel.color.to_string(),
    ));
    out.push(plain(
        keys[1].0,
        keys[1].1,
        number(0.0, 255.0),
        panel.alpha.to_string(),
    ));
    out.push(plain(
        keys[2].0,
        keys[2].1,
        number(0.0, 64.0),
        panel.blur.to_string(),
    ));
}

fn push_text_override(
    out: &mut Vec<Field>,
    keys: [FieldKey; 3],
    labels: [&'static str; 3],
    over: &TextOverride,
    base: &TextStyle,
) {
    out.push(slot(keys[0], labels[0], FieldKind::Color, over.color.as_ref(), &base.color));
    out.push(slot(keys[1], labels[1], FieldKind::FontRef, over.font.as_ref(), &base.font));
    out.push(slot(keys[2], labels[2], number(1.0, 512.0), over.size.as_ref(), &base.size));
}

fn push_panel_override(
    out: &mut Vec<Field>,
    keys: [(FieldKey, &'static str); 3],
    over: &PanelOverrides,
    base: &PanelStyle,
) {
    out.push(slot(keys[0].0, keys[0].1, FieldKind::Color, over.color.as_ref(), &base.color));
    out.push(slot(keys[1].0, keys[1].1, number(0.0, 255.0), over.alpha.as_ref(), &base.alpha));
    out.push(slot(keys[2].0, keys[2].1, number(0.0, 64.0), over.blur.as_ref(), &base.blur));
}

fn group_fields(menu: &Menu, group: &crate::model::Group) -> Vec<Field> {
    let mut out = vec![
        plain(
            FieldKey::GroupTitle,
            "Title",
            FieldKind::Text,
            group.title.clone(),
        ),
        plain(
            FieldKey::GroupSubtitle,
            "Subtitle",
            FieldKind::Text,
            group.subtitle.clone().unwrap_or_default(),
        ),
        plain(
            FieldKey::GroupKind,
            "Kind",
            FieldKind::Choice(KIND_CHOICES),
            match group.kind {
                GroupKind::Normal => "normal",
                GroupKind::FreeForm => "free_form",
                GroupKind::TextOnly => "text_only",
            }
            .to_string(),
        ),
    ];
    if group.kind == GroupKind::TextOnly {
        out.push(plain(
            FieldKey::GroupText,
            "Body text",
            FieldKind::Text,
            group.text.clone(),
        ));
    }
    out.push(slot(
        FieldKey::GroupColumns,
        "Columns",
        number(1.0, 8.0),
        group.style.columns.as_ref(),
        &menu.layout.columns,
    ));
    let full_width = menu.canvas_width().saturating_sub(80);
    out.push(slot(
        FieldKey::GroupPanelWidth,
        "Panel width",
        number(100.0, 4000.0),
        group.style.panel_width.as_ref(),
        &full_width,
    ));
    // Height inherits "auto": shown as 0 when unset.
    out.push(slot(
        FieldKey::GroupPanelHeight,
        "Panel height",
        number(0.0, 8000.0),
        group.style.panel_height.as_ref(),
        &0,
    ));
    push_text_override(
        &mut out,
        [
            FieldKey::GroupTitleColor,
            FieldKey::GroupTitleFont,
            FieldKey::GroupTitleSize,
        ],
        ["Title color", "Title font", "Title size"],
        &group.style.title,
        menu.styles.role(TextRole::GroupTitle),
    );
    push_text_override(
        &mut out,
        [
            FieldKey::GroupSubtitleColor,
            FieldKey::GroupSubtitleFont,
            FieldKey::GroupSubtitleSize,
        ],
        ["Subtitle color", "Subtitle font", "Subtitle size"],
        &group.style.subtitle,
        menu.styles.role(TextRole::GroupSubtitle),
    );
    push_panel_override(
        &mut out,
        [
            (FieldKey::PanelColor, "Panel color"),
            (FieldKey::PanelAlpha, "Panel alpha"),
            (FieldKey::PanelBlur, "Panel blur"),
        ],
        &group.style.panel,
        &menu.group_panel,
    );
    out
}

fn item_fields(menu: &Menu, owner_kind: GroupKind, item: &crate::model::Item) -> Vec<Field> {
    let mut out = vec![
        plain(
            FieldKey::ItemName,
            "Name",
            FieldKind::Text,
            item.name.clone(),
        ),
        plain(
            FieldKey::ItemDesc,
            "Description",
            FieldKind::Text,
            item.desc.clone(),
        ),
        plain(
            FieldKey::ItemIcon,
            "Icon",
            FieldKind::AssetRef(AssetKind::Icon),
            item.icon.clone().unwrap_or_default(),
        ),
    ];
    push_text_override(
        &mut out,
        [FieldKey::NameColor, FieldKey::NameFont, FieldKey::NameSize],
        ["Name color", "Name font", "Name size"],
        &item.style.name,
        menu.styles.role(TextRole::ItemName),
    );
    push_text_override(
        &mut out,
        [FieldKey::DescColor, FieldKey::DescFont, FieldKey::DescSize],
        ["Description color", "Description font", "Description size"],
        &item.style.desc,
        menu.styles.role(TextRole::ItemDesc),
    );
    for (key, label, over) in [
        (FieldKey::Bold, "Bold", item.style.bold),
        (FieldKey::Italic, "Italic", item.style.italic),
        (FieldKey::Underline, "Underline", item.style.underline),
    ] {
        out.push(slot(key, label, FieldKind::Toggle, over.as_ref(), &false));
    }
    for (key, label, over) in [
        (FieldKey::NameShadow, "Name shadow", item.style.name_shadow),
        (
            FieldKey::DescShadow,
            "Description shadow",
            item.style.desc_shadow,
        ),
    ] {
        out.push(Field {
            key,
            label,
            kind: FieldKind::Toggle,
            value: over.map(|s| s.enabled).unwrap_or(menu.shadow.enabled).to_string(),
            state: if over.is_some() {
                FieldState::Overridden
            } else {
                FieldState::Inherited
            },
        });
    }
    push_panel_override(
        &mut out,
        [
            (FieldKey::PanelColor, "Panel color"),
            (FieldKey::PanelAlpha, "Panel alpha"),
            (FieldKey::PanelBlur, "Panel blur"),
        ],
        &item.panel,
        &menu.item_panel,
    );
    if owner_kind == GroupKind::FreeForm {
        let geom = item.geometry.unwrap_or_default();
        out.push(plain(FieldKey::GeomX, "X", number(-4000.0, 4000.0), geom.x.to_string()));
        out.push(plain(FieldKey::GeomY, "Y", number(-4000.0, 8000.0), geom.y.to_string()));
        out.push(plain(FieldKey::GeomW, "Width", number(20.0, 4000.0), geom.w.to_string()));
        out.push(plain(FieldKey::GeomH, "Height", number(20.0, 8000.0), geom.h.to_string()));
    }
    out
}

fn widget_fields(widget: &Widget) -> Vec<Field> {
    let mut out = vec![
        plain(FieldKey::WidgetX, "X", number(-4000.0, 4000.0), widget.x.to_string()),
        plain(FieldKey::WidgetY, "Y", number(-4000.0, 8000.0), widget.y.to_string()),
    ];
    match &widget.kind {
        WidgetKind::Text { text, size, color, font } => {
            out.push(plain(
                FieldKey::WidgetText,
                "Text",
                FieldKind::Text,
                text.clone(),
            ));
            out.push(plain(
                FieldKey::WidgetSize,
                "Font size",
                number(10.0, 512.0),
                size.to_string(),
            ));
            out.push(slot(
                FieldKey::WidgetColor,
                "Color",
                FieldKind::Color,
                color.as_ref(),
                &Color::WHITE,
            ));
            let fallback = widget_text_fallback().to_string();
            out.push(slot(
                FieldKey::WidgetFont,
                "Font",
                FieldKind::FontRef,
                font.as_ref(),
                &fallback,
            ));
        }
        WidgetKind::Image { file, width, height } => {
            out.push(plain(
                FieldKey::WidgetFile,
                "Image",
                FieldKind::AssetRef(AssetKind::WidgetImage),
                file.clone(),
            ));
            out.push(plain(
                FieldKey::WidgetWidth,
                "Width",
                number(20.0, 4000.0),
                width.to_string(),
            ));
            out.push(plain(
                FieldKey::WidgetHeight,
                "Height",
                number(20.0, 8000.0),
                height.to_string(),
            ));
        }
    }
    out
}
