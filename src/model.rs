use crate::{
    color::Color,
    error::{MenuetError, MenuetResult},
    geometry::{ItemGeometry, MIN_BOX_PX, MIN_TEXT_WIDGET_SIZE},
    style::{
        AlignX, AlignY, FALLBACK_TEXT_FONT, PanelOverrides, PanelStyle, ShadowStyle, StyleSheet,
        TextOverride,
    },
};

const MIN_BOX: u32 = MIN_BOX_PX as u32;
const MIN_TEXT_SIZE: u32 = MIN_TEXT_WIDGET_SIZE as u32;

/// The persisted unit: every menu the installation knows about. Loading is
/// tolerant (absent fields take defaults, unknown fields are ignored);
/// [`Config::validate`] reports what tolerance papered over.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub menus: Vec<Menu>,
}

impl Config {
    pub fn from_json(json: &str) -> MenuetResult<Self> {
        serde_json::from_str(json).map_err(|e| MenuetError::serde(format!("config: {e}")))
    }

    pub fn to_json_pretty(&self) -> MenuetResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| MenuetError::serde(format!("config: {e}")))
    }

    pub fn menu(&self, id: &str) -> Option<&Menu> {
        self.menus.iter().find(|m| m.id == id)
    }

    pub fn menu_mut(&mut self, id: &str) -> Option<&mut Menu> {
        self.menus.iter_mut().find(|m| m.id == id)
    }

    pub fn validate(&self) -> MenuetResult<()> {
        for (idx, menu) in self.menus.iter().enumerate() {
            if menu.id.trim().is_empty() {
                return Err(MenuetError::validation(format!("menu {idx}: empty id")));
            }
            if self.menus.iter().filter(|m| m.id == menu.id).count() > 1 {
                return Err(MenuetError::validation(format!(
                    "menu {idx}: duplicate id `{}`",
                    menu.id
                )));
            }
            menu.validate()
                .map_err(|e| MenuetError::validation(format!("menu `{}`: {e}", menu.id)))?;
        }
        Ok(())
    }

    /// Repair everything repairable in place. Never fails; pair with
    /// [`Config::validate`] when the caller wants to know what was wrong.
    pub fn normalize(&mut self) {
        for menu in &mut self.menus {
            menu.normalize();
        }
    }

    /// A small working document for fresh installations: one enabled menu
    /// with a starter group, two items and a text widget, all on defaults.
    pub fn starter() -> Self {
        let group = Group {
            title: "Getting started".to_string(),
            subtitle: Some("Edit or delete these entries".to_string()),
            items: vec![
                Item {
                    name: "First entry".to_string(),
                    desc: "Select an item to edit its style".to_string(),
                    ..Item::default()
                },
                Item {
                    name: "Second entry".to_string(),
                    desc: "Groups flow items into a grid".to_string(),
                    ..Item::default()
                },
            ],
            ..Group::default()
        };
        let widget = Widget {
            x: 40,
            y: 0,
            kind: WidgetKind::Text {
                text: "menuet".to_string(),
                size: default_widget_text_size(),
                color: None,
                font: None,
            },
        };
        let mut menu = Menu::with_defaults("main", "Main menu");
        menu.title = "Main menu".to_string();
        menu.subtitle = "Send an entry name to trigger it".to_string();
        menu.groups.push(group);
        menu.widgets.push(widget);
        Self { menus: vec![menu] }
    }
}

/// One menu document: the root entity every editing operation mutates in
/// place. Groups and widgets are exclusively owned; nothing is shared, so
/// index-based references stay unambiguous.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Menu {
    /// Stable key used by storage and the CLI; display text lives in `name`.
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Disabled menus are kept in the config but not served.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Heading drawn at the top of the canvas.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Global style sheet; entity overrides fall back to these values.
    #[serde(default)]
    pub styles: StyleSheet,
    #[serde(default)]
    pub layout: LayoutDefaults,
    /// Backdrop behind everything; solid `layout.background_color` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    /// Panel defaults, split so group frames and item cells can differ.
    #[serde(default)]
    pub group_panel: PanelStyle,
    #[serde(default)]
    pub item_panel: PanelStyle,
    #[serde(default)]
    pub shadow: ShadowStyle,
    #[serde(default)]
    pub export: ExportParams,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
    /// Optional pool of background references a caller may rotate through;
    /// the editor only stores it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub background_pool: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Menu {
    pub fn with_defaults(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            title: String::new(),
            subtitle: String::new(),
            styles: StyleSheet::default(),
            layout: LayoutDefaults::default(),
            background: None,
            group_panel: PanelStyle::default(),
            item_panel: PanelStyle::default(),
            shadow: ShadowStyle::default(),
            export: ExportParams::default(),
            groups: Vec::new(),
            widgets: Vec::new(),
            background_pool: Vec::new(),
        }
    }

    pub fn canvas_width(&self) -> u32 {
        self.layout.sizing.width()
    }

    pub fn validate(&self) -> MenuetResult<()> {
        self.layout.validate()?;
        if let Some(bg) = &self.background {
            bg.validate()?;
        }
        self.export.validate()?;
        for (gi, group) in self.groups.iter().enumerate() {
            group
                .validate()
                .map_err(|e| MenuetError::validation(format!("group {gi}: {e}")))?;
        }
        for (wi, widget) in self.widgets.iter().enumerate() {
            widget
                .validate()
                .map_err(|e| MenuetError::validation(format!("widget {wi}: {e}")))?;
        }
        Ok(())
    }

    pub fn normalize(&mut self) {
        self.styles.normalize();
        self.layout.normalize();
        if let Some(bg) = &mut self.background {
            bg.normalize();
        }
        self.export.normalize();
        for group in &mut self.groups {
            group.normalize();
        }
        for widget in &mut self.widgets {
            widget.normalize();
        }
    }
}

/// Menu-wide layout defaults; groups may override the column count.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutDefaults {
    #[serde(default = "default_columns")]
    pub columns: u32,
    #[serde(default)]
    pub sizing: CanvasSizing,
    /// Solid fill behind the background layer (and the whole canvas when no
    /// background is set).
    #[serde(default = "default_canvas_fill")]
    pub background_color: Color,
}

fn default_columns() -> u32 {
    3
}

fn default_canvas_fill() -> Color {
    Color::rgb(0x1e, 0x1e, 0x1e)
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            sizing: CanvasSizing::default(),
            background_color: default_canvas_fill(),
        }
    }
}

impl LayoutDefaults {
    fn validate(&self) -> MenuetResult<()> {
        if self.columns == 0 {
            return Err(MenuetError::validation("layout: zero columns"));
        }
        self.sizing.validate()
    }

    fn normalize(&mut self) {
        self.columns = self.columns.max(1);
        self.sizing.normalize();
    }
}

/// How the canvas gets its size: a fixed box, or a fixed width with the
/// height computed from content during composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CanvasSizing {
    AutoHeight { width: u32 },
    Fixed { width: u32, height: u32 },
}

impl Default for CanvasSizing {
    fn default() -> Self {
        Self::AutoHeight { width: 1000 }
    }
}

impl CanvasSizing {
    pub fn width(&self) -> u32 {
        match *self {
            Self::AutoHeight { width } | Self::Fixed { width, .. } => width,
        }
    }

    fn validate(&self) -> MenuetResult<()> {
        match *self {
            Self::AutoHeight { width } if width == 0 => {
                Err(MenuetError::validation("canvas: zero width"))
            }
            Self::Fixed { width, height } if width == 0 || height == 0 => {
                Err(MenuetError::validation("canvas: zero width or height"))
            }
            _ => Ok(()),
        }
    }

    fn normalize(&mut self) {
        match self {
            Self::AutoHeight { width } => *width = (*width).max(1),
            Self::Fixed { width, height } => {
                *width = (*width).max(1);
                *height = (*height).max(1);
            }
        }
    }
}

/// Backdrop media stretched behind the whole canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Background {
    #[serde(flatten)]
    pub source: BackgroundSource,
    #[serde(default)]
    pub fit: BackgroundFit,
    #[serde(default)]
    pub align_x: AlignX,
    #[serde(default)]
    pub align_y: AlignY,
    /// Extra zoom applied after the fit computation.
    #[serde(default = "default_background_scale")]
    pub scale: f64,
}

fn default_background_scale() -> f64 {
    1.0
}

impl Background {
    fn validate(&self) -> MenuetResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(MenuetError::validation(format!(
                "background: non-positive scale {}",
                self.scale
            )));
        }
        if self.source.file().trim().is_empty() {
            return Err(MenuetError::validation("background: empty source reference"));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            self.scale = default_background_scale();
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundSource {
    Image { file: String },
    Video { file: String },
}

impl BackgroundSource {
    pub fn file(&self) -> &str {
        match self {
            Self::Image { file } | Self::Video { file } => file,
        }
    }

    /// Motion backgrounds make exports animated.
    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video { .. })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundFit {
    /// Fill the canvas, cropping overflow.
    #[default]
    Cover,
    /// Fit entirely inside the canvas, letterboxing the rest.
    Contain,
    FillWidth,
    FillHeight,
    /// Natural source size; only `scale` and alignment apply.
    CustomSize,
}

/// Parameters forwarded to the export collaborator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportParams {
    /// Raster scale relative to canvas pixels.
    #[serde(default = "default_export_scale")]
    pub scale: f64,
    #[serde(default)]
    pub video: VideoExport,
}

fn default_export_scale() -> f64 {
    1.0
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            scale: default_export_scale(),
            video: VideoExport::default(),
        }
    }
}

impl ExportParams {
    fn validate(&self) -> MenuetResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(MenuetError::validation(format!(
                "export: non-positive scale {}",
                self.scale
            )));
        }
        self.video.validate()
    }

    fn normalize(&mut self) {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            self.scale = default_export_scale();
        }
        self.video.normalize();
    }
}

/// Frame window for animated exports. `frame_end == 0` means the source's
/// natural end.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoExport {
    #[serde(default)]
    pub frame_start: u32,
    #[serde(default)]
    pub frame_end: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub format: ExportFormat,
}

fn default_fps() -> u32 {
    20
}

impl Default for VideoExport {
    fn default() -> Self {
        Self {
            frame_start: 0,
            frame_end: 0,
            fps: default_fps(),
            format: ExportFormat::default(),
        }
    }
}

impl VideoExport {
    fn validate(&self) -> MenuetResult<()> {
        if self.fps == 0 {
            return Err(MenuetError::validation("export: zero fps"));
        }
        if self.frame_end != 0 && self.frame_end < self.frame_start {
            return Err(MenuetError::validation(format!(
                "export: frame range {}..{} is inverted",
                self.frame_start, self.frame_end
            )));
        }
        Ok(())
    }

    fn normalize(&mut self) {
        if self.fps == 0 {
            self.fps = default_fps();
        }
        if self.frame_end != 0 && self.frame_end < self.frame_start {
            self.frame_end = self.frame_start;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Png,
    Gif,
    Webp,
    Mp4,
}

/// A titled content block. The kind decides what its items mean: `Normal`
/// flows them into a grid, `FreeForm` places them at their stored geometry,
/// `TextOnly` ignores them and renders `text` instead.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Group {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub kind: GroupKind,
    /// Literal block rendered by text-only groups.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "GroupOverrides::is_vacant")]
    pub style: GroupOverrides,
}

impl Group {
    fn validate(&self) -> MenuetResult<()> {
        if let Some(0) = self.style.columns {
            return Err(MenuetError::validation("zero column override"));
        }
        if self.style.panel_width == Some(0) || self.style.panel_height == Some(0) {
            return Err(MenuetError::validation("zero panel size override"));
        }
        for (ii, item) in self.items.iter().enumerate() {
            if let Some(geom) = item.geometry {
                if geom.w < MIN_BOX || geom.h < MIN_BOX {
                    return Err(MenuetError::validation(format!(
                        "item {ii}: geometry {}x{} below the {MIN_BOX}px minimum",
                        geom.w, geom.h
                    )));
                }
            }
        }
        Ok(())
    }

    fn normalize(&mut self) {
        if let Some(cols) = &mut self.style.columns {
            *cols = (*cols).max(1);
        }
        for item in &mut self.items {
            item.normalize();
        }
        // Geometry is meaningless outside free-form groups; drop strays so a
        // later kind switch starts clean.
        if self.kind != GroupKind::FreeForm {
            for item in &mut self.items {
                item.geometry = None;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    #[default]
    Normal,
    FreeForm,
    TextOnly,
}

/// Group-level style overrides; absent keys inherit from the menu.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupOverrides {
    #[serde(default, skip_serializing_if = "TextOverride::is_vacant")]
    pub title: TextOverride,
    #[serde(default, skip_serializing_if = "TextOverride::is_vacant")]
    pub subtitle: TextOverride,
    #[serde(default, skip_serializing_if = "PanelOverrides::is_vacant")]
    pub panel: PanelOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
}

impl GroupOverrides {
    pub fn is_vacant(&self) -> bool {
        self.title.is_vacant()
            && self.subtitle.is_vacant()
            && self.panel.is_vacant()
            && self.panel_width.is_none()
            && self.panel_height.is_none()
            && self.columns.is_none()
    }
}

/// One selectable entry inside a group.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Present only while the owning group is free-form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<ItemGeometry>,
    #[serde(default, skip_serializing_if = "ItemOverrides::is_vacant")]
    pub style: ItemOverrides,
    #[serde(default, skip_serializing_if = "PanelOverrides::is_vacant")]
    pub panel: PanelOverrides,
}

impl Item {
    fn normalize(&mut self) {
        if let Some(geom) = self.geometry {
            self.geometry = Some(geom.clamped());
        }
        if self.icon.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.icon = None;
        }
    }
}

/// Item-level style overrides; absent keys inherit from the menu.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemOverrides {
    #[serde(default, skip_serializing_if = "TextOverride::is_vacant")]
    pub name: TextOverride,
    #[serde(default, skip_serializing_if = "TextOverride::is_vacant")]
    pub desc: TextOverride,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_shadow: Option<ShadowStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_shadow: Option<ShadowStyle>,
}

impl ItemOverrides {
    pub fn is_vacant(&self) -> bool {
        self.name.is_vacant()
            && self.desc.is_vacant()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.name_shadow.is_none()
            && self.desc_shadow.is_none()
    }
}

/// Free-floating overlay independent of any group.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Widget {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    #[serde(flatten)]
    pub kind: WidgetKind,
}

impl Widget {
    fn validate(&self) -> MenuetResult<()> {
        match &self.kind {
            WidgetKind::Text { size, .. } if *size < MIN_TEXT_SIZE => Err(
                MenuetError::validation(format!("text size {size} below {MIN_TEXT_SIZE}px")),
            ),
            WidgetKind::Image { width, height, .. } if *width < MIN_BOX || *height < MIN_BOX => {
                Err(MenuetError::validation(format!(
                    "image {width}x{height} below the {MIN_BOX}px minimum"
                )))
            }
            _ => Ok(()),
        }
    }

    fn normalize(&mut self) {
        match &mut self.kind {
            WidgetKind::Text { size, .. } => *size = (*size).max(MIN_TEXT_SIZE),
            WidgetKind::Image { width, height, .. } => {
                *width = (*width).max(MIN_BOX);
                *height = (*height).max(MIN_BOX);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetKind {
    Text {
        text: String,
        #[serde(default = "default_widget_text_size")]
        size: u32,
        /// Falls back to white when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<Color>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font: Option<String>,
    },
    Image {
        file: String,
        #[serde(default = "default_widget_image_size")]
        width: u32,
        #[serde(default = "default_widget_image_size")]
        height: u32,
    },
}

pub(crate) fn default_widget_text_size() -> u32 {
    30
}

fn default_widget_image_size() -> u32 {
    100
}

/// Default font for widget text when no override is set.
pub fn widget_text_fallback() -> &'static str {
    FALLBACK_TEXT_FONT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_form_menu() -> Menu {
        let mut menu = Menu::with_defaults("m", "Menu");
        menu.groups.push(Group {
            title: "Free".to_string(),
            kind: GroupKind::FreeForm,
            items: vec![Item {
                name: "a".to_string(),
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
        menu
    }

    #[test]
    fn starter_config_is_valid() {
        let config = Config::starter();
        config.validate().unwrap();
        assert_eq!(config.menus.len(), 1);
        assert!(config.menus[0].enabled);
        assert!(!config.menus[0].groups.is_empty());
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let config = Config::from_json(r#"{"menus":[{"id":"m"}]}"#).unwrap();
        let menu = &config.menus[0];
        assert!(menu.enabled);
        assert_eq!(menu.layout.columns, 3);
        assert_eq!(menu.canvas_width(), 1000);
        assert_eq!(menu.item_panel.alpha, 120);
        config.validate().unwrap();
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let config =
            Config::from_json(r#"{"menus":[{"id":"m","legacy_flag":true}],"schema":9}"#).unwrap();
        assert_eq!(config.menus[0].id, "m");
    }

    #[test]
    fn duplicate_menu_ids_rejected() {
        let config = Config {
            menus: vec![Menu::with_defaults("m", "a"), Menu::with_defaults("m", "b")],
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate id"));
    }

    #[test]
    fn round_trip_preserves_document() {
        let config = Config::starter();
        let json = config.to_json_pretty().unwrap();
        let back = Config::from_json(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn vacant_overrides_are_not_serialized() {
        let json = Config::starter().to_json_pretty().unwrap();
        assert!(!json.contains("\"style\""));
        assert!(!json.contains("\"panel_width\""));
    }

    #[test]
    fn normalize_repairs_degenerate_values() {
        let mut menu = free_form_menu();
        menu.layout.columns = 0;
        menu.export.scale = f64::NAN;
        menu.export.video.fps = 0;
        menu.groups[0].items[0].geometry = Some(ItemGeometry {
            x: 0,
            y: 0,
            w: 4,
            h: 4,
        });
        menu.widgets.push(Widget {
            x: 0,
            y: 0,
            kind: WidgetKind::Image {
                file: "logo.png".to_string(),
                width: 1,
                height: 1,
            },
        });

        menu.normalize();
        assert_eq!(menu.layout.columns, 1);
        assert_eq!(menu.export.scale, 1.0);
        assert_eq!(menu.export.video.fps, 20);
        let geom = menu.groups[0].items[0].geometry.unwrap();
        assert_eq!((geom.w, geom.h), (20, 20));
        match menu.widgets[0].kind {
            WidgetKind::Image { width, height, .. } => assert_eq!((width, height), (20, 20)),
            _ => panic!("expected image widget"),
        }
        menu.validate().unwrap();
    }

    #[test]
    fn normalize_drops_geometry_outside_free_form() {
        let mut menu = free_form_menu();
        menu.groups[0].kind = GroupKind::Normal;
        menu.normalize();
        assert_eq!(menu.groups[0].items[0].geometry, None);
    }

    #[test]
    fn undersized_geometry_fails_validation() {
        let mut menu = free_form_menu();
        menu.groups[0].items[0].geometry = Some(ItemGeometry {
            x: 0,
            y: 0,
            w: 10,
            h: 100,
        });
        let err = menu.validate().unwrap_err();
        assert!(err.to_string().contains("below the 20px minimum"));
    }

    #[test]
    fn widget_json_shape_is_flat() {
        let widget = Widget {
            x: 12,
            y: 34,
            kind: WidgetKind::Text {
                text: "hi".to_string(),
                size: 30,
                color: None,
                font: None,
            },
        };
        let value = serde_json::to_value(&widget).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["x"], 12);
        assert_eq!(value["text"], "hi");
    }

    #[test]
    fn inverted_frame_range_is_repaired() {
        let mut export = ExportParams::default();
        export.video.frame_start = 50;
        export.video.frame_end = 10;
        assert!(export.validate().is_err());
        export.normalize();
        assert_eq!(export.video.frame_end, 50);
        export.validate().unwrap();
    }
}
