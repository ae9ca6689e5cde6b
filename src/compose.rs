use crate::{
    assets::{AssetInventory, AssetKind, asset_url},
    background,
    color::Color,
    drag::{DragTarget, PendingGeometry, SizeSnapshot},
    geometry::{Point, Rect, Size},
    model::{CanvasSizing, Group, GroupKind, Item, Menu, Widget, WidgetKind, widget_text_fallback},
    selection::Selection,
    style::{AlignX, ShadowStyle, TextRole, TextStyle, resolve},
};

// Canvas layout, in canvas pixels. The external compositor draws from the
// same tree, so these numbers are the single source of truth for geometry.
const PADDING_X: f64 = 40.0;
const GROUP_GAP: f64 = 30.0;
const ITEM_H: f64 = 100.0;
const ITEM_GAP_X: f64 = 15.0;
const ITEM_GAP_Y: f64 = 15.0;
const PANEL_PAD: f64 = 15.0;
const PANEL_RADIUS: f64 = 15.0;
const CELL_RADIUS: f64 = 10.0;
const TITLE_POS: Point = Point::new(50.0, 80.0);
const SUBTITLE_POS: Point = Point::new(50.0, 170.0);
const HEADER_BLOCK: f64 = 280.0;
const GROUP_TITLE_H: f64 = 50.0;
const GROUP_SUBTITLE_H: f64 = 24.0;
const BOTTOM_PAD: f64 = 50.0;
const ICON_SIZE: f64 = 60.0;
const CELL_TEXT_X: f64 = 75.0;
const CELL_NAME_Y: f64 = 15.0;
const CELL_DESC_Y: f64 = 55.0;
const FREE_FORM_MIN_H: f64 = 120.0;
const HANDLE_SIZE: f64 = 12.0;

// Paint bands; vec order breaks ties within a band.
const Z_PANEL: i32 = 0;
const Z_TEXT: i32 = 1;
const Z_WIDGET: i32 = 2;
const Z_OVERLAY: i32 = 3;

/// Deterministic line metrics: a fixed per-character advance and line
/// height. Real shaping happens in the compositor; the editor only needs
/// stable boxes for layout, hit areas and handles.
pub trait TextMetrics {
    fn measure(&self, text: &str, size: f64) -> Size;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NominalMetrics;

impl TextMetrics for NominalMetrics {
    fn measure(&self, text: &str, size: f64) -> Size {
        Size::new(text.chars().count() as f64 * size * 0.55, size * 1.2)
    }
}

static NOMINAL: NominalMetrics = NominalMetrics;

/// Inputs composition may not derive itself: the asset inventory for
/// tolerant reference checks, the externally probed background size, and
/// the metrics implementation.
#[derive(Clone, Copy)]
pub struct ComposeEnv<'a> {
    pub inventory: &'a AssetInventory,
    pub background_size: Option<Size>,
    pub metrics: &'a dyn TextMetrics,
}

impl<'a> ComposeEnv<'a> {
    pub fn new(inventory: &'a AssetInventory) -> Self {
        Self {
            inventory,
            background_size: None,
            metrics: &NOMINAL,
        }
    }

    pub fn with_background_size(mut self, size: Size) -> Self {
        self.background_size = Some(size);
        self
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub canvas: CanvasSpec,
    pub background: Option<BackgroundNode>,
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSpec {
    pub width: f64,
    pub height: f64,
    /// Solid fill under the background layer.
    pub fill: Color,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundNode {
    pub url: String,
    pub video: bool,
    /// Placement in canvas pixels; may overflow the canvas (cover crops).
    pub rect: Rect,
    pub missing: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneNode {
    /// Absolute canvas-pixel rect, children included.
    pub rect: Rect,
    pub z: i32,
    pub content: NodeContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn leaf(rect: Rect, z: i32, content: NodeContent) -> Self {
        Self {
            rect,
            z,
            content,
            children: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeContent {
    Text(TextNode),
    Panel(PanelNode),
    Image(ImageNode),
    /// Editor affordance: the trailing "add an item" cell of a grid.
    Placeholder { label: String },
    /// Selection outline around the selected entity.
    Highlight,
    /// Resize grip at the selected entity's bottom-right corner.
    Handle,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextNode {
    pub text: String,
    pub color: Color,
    pub font_url: String,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Decoration::is_plain")]
    pub decoration: Decoration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowStyle>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Decoration {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl Decoration {
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelNode {
    pub color: Color,
    /// `alpha / 255`.
    pub opacity: f64,
    pub blur: u32,
    pub radius: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageNode {
    pub url: String,
    /// The reference points at nothing in the inventory; the shell renders
    /// a placeholder but the reference itself is kept.
    pub missing: bool,
}

/// Compose the scene tree for one menu. Pure in its inputs: the same menu,
/// environment, selection and overlay always produce a structurally equal
/// tree, which is what lets the export raster match the live preview.
///
/// `overlay` substitutes live-drag geometry for one entity without touching
/// the document; `selection` adds highlight and handle nodes on top.
#[tracing::instrument(skip_all, fields(menu = %menu.id, groups = menu.groups.len(), widgets = menu.widgets.len()))]
pub fn compose(
    menu: &Menu,
    env: &ComposeEnv,
    selection: Selection,
    overlay: Option<(DragTarget, PendingGeometry)>,
) -> Scene {
    let mut walker = Walker {
        menu,
        env,
        selection,
        overlay,
        nodes: Vec::new(),
        content_bottom: HEADER_BLOCK,
    };
    walker.title_block();
    let mut cursor = HEADER_BLOCK;
    for (gi, group) in menu.groups.iter().enumerate() {
        cursor = walker.group(gi, group, cursor);
    }
    for (wi, widget) in menu.widgets.iter().enumerate() {
        walker.widget(wi, widget);
    }

    let width = menu.canvas_width() as f64;
    let height = match menu.layout.sizing {
        CanvasSizing::Fixed { height, .. } => height as f64,
        CanvasSizing::AutoHeight { .. } => walker.content_bottom + BOTTOM_PAD,
    };
    let canvas = CanvasSpec {
        width,
        height,
        fill: menu.layout.background_color,
    };
    let background = menu.background.as_ref().map(|bg| {
        let source_size = env.background_size.unwrap_or(Size::ZERO);
        let kind = if bg.source.is_video() {
            AssetKind::Video
        } else {
            AssetKind::Background
        };
        let missing = !env.inventory.contains(kind, bg.source.file());
        if missing {
            tracing::debug!(file = bg.source.file(), "background reference not in inventory");
        }
        BackgroundNode {
            url: asset_url(kind, bg.source.file()),
            video: bg.source.is_video(),
            rect: background::placement(bg, Size::new(width, height), source_size),
            missing,
        }
    });

    Scene {
        canvas,
        background,
        nodes: walker.nodes,
    }
}

struct Walker<'a> {
    menu: &'a Menu,
    env: &'a ComposeEnv<'a>,
    selection: Selection,
    overlay: Option<(DragTarget, PendingGeometry)>,
    nodes: Vec<SceneNode>,
    content_bottom: f64,
}

impl Walker<'_> {
    fn title_block(&mut self) {
        let sheet = &self.menu.styles;
        if !self.menu.title.is_empty() {
            let node = self.aligned_text(
                TITLE_POS,
                &self.menu.title,
                &sheet.title,
                sheet.title_align,
            );
            self.nodes.push(node);
        }
        if !self.menu.subtitle.is_empty() {
            let node = self.aligned_text(
                SUBTITLE_POS,
                &self.menu.subtitle,
                &sheet.subtitle,
                sheet.title_align,
            );
            self.nodes.push(node);
        }
    }

    // Header text keeps the configured y; alignment only moves x. Start
    // keeps the fixed left inset the header block was designed around.
    fn aligned_text(
        &self,
        pos: Point,
        text: &str,
        style: &TextStyle,
        align: AlignX,
    ) -> SceneNode {
        let measured = self.env.metrics.measure(text, style.size as f64);
        let width = self.menu.canvas_width() as f64;
        let x = match align {
            AlignX::Start => pos.x,
            AlignX::Center => (width - measured.width) * 0.5,
            AlignX::End => width - pos.x - measured.width,
        };
        self.text_node(
            Point::new(x, pos.y),
            text,
            style,
            Decoration::default(),
            self.menu_shadow(),
        )
    }

    fn group(&mut self, gi: usize, group: &Group, mut cursor: f64) -> f64 {
        let sheet = &self.menu.styles;
        let panel_x = PADDING_X;
        let panel_w = group
            .style
            .panel_width
            .map(|w| w as f64)
            .unwrap_or(self.menu.canvas_width() as f64 - 2.0 * PADDING_X);

        let title_style = group.style.title.resolve_over(sheet.role(TextRole::GroupTitle));
        let node = self.text_node(
            Point::new(panel_x + 10.0, cursor),
            &group.title,
            &title_style,
            Decoration::default(),
            self.menu_shadow(),
        );
        self.nodes.push(node);
        cursor += GROUP_TITLE_H;

        if let Some(subtitle) = group.subtitle.as_deref().filter(|s| !s.is_empty()) {
            let style = group
                .style
                .subtitle
                .resolve_over(sheet.role(TextRole::GroupSubtitle));
            let node = self.text_node(
                Point::new(panel_x + 10.0, cursor),
                subtitle,
                &style,
                Decoration::default(),
                self.menu_shadow(),
            );
            self.nodes.push(node);
            cursor += GROUP_SUBTITLE_H;
        }

        let panel = group.style.panel.resolve_over(&self.menu.group_panel);
        let panel_content = NodeContent::Panel(PanelNode {
            color: panel.color,
            opacity: panel.alpha as f64 / 255.0,
            blur: panel.blur,
            radius: PANEL_RADIUS,
        });

        let panel_h = match group.kind {
            GroupKind::Normal => {
                let columns = group
                    .style
                    .columns
                    .unwrap_or(self.menu.layout.columns)
                    .max(1) as usize;
                // Items plus the trailing add cell.
                let cells = group.items.len() + 1;
                let rows = cells.div_ceil(columns).max(1);
                let panel_h = group.style.panel_height.map(|h| h as f64).unwrap_or(
                    rows as f64 * ITEM_H + (rows as f64 - 1.0) * ITEM_GAP_Y + 2.0 * PANEL_PAD,
                );
                let panel_rect = Rect::new(panel_x, cursor, panel_x + panel_w, cursor + panel_h);
                let mut children = Vec::with_capacity(cells);
                let item_w =
                    (panel_w - 2.0 * PANEL_PAD - (columns as f64 - 1.0) * ITEM_GAP_X)
                        / columns as f64;
                for (ii, item) in group.items.iter().enumerate() {
                    let row = ii / columns;
                    let col = ii % columns;
                    let cell = Rect::new(0.0, 0.0, item_w, ITEM_H).with_origin(Point::new(
                        panel_x + PANEL_PAD + col as f64 * (item_w + ITEM_GAP_X),
                        cursor + PANEL_PAD + row as f64 * (ITEM_H + ITEM_GAP_Y),
                    ));
                    children.push(self.item_cell(gi, ii, item, cell, false));
                }
                let add_row = group.items.len() / columns;
                let add_col = group.items.len() % columns;
                let add_cell = Rect::new(0.0, 0.0, item_w, ITEM_H).with_origin(Point::new(
                    panel_x + PANEL_PAD + add_col as f64 * (item_w + ITEM_GAP_X),
                    cursor + PANEL_PAD + add_row as f64 * (ITEM_H + ITEM_GAP_Y),
                ));
                children.push(SceneNode::leaf(
                    add_cell,
                    Z_PANEL,
                    NodeContent::Placeholder {
                        label: "+".to_string(),
                    },
                ));
                self.nodes.push(SceneNode {
                    rect: panel_rect,
                    z: Z_PANEL,
                    content: panel_content,
                    children,
                });
                panel_h
            }
            GroupKind::FreeForm => {
                let origin = Point::new(panel_x + PANEL_PAD, cursor + PANEL_PAD);
                let mut children = Vec::with_capacity(group.items.len());
                let mut max_bottom: f64 = 0.0;
                for (ii, item) in group.items.iter().enumerate() {
                    // Content-local coordinates; translate to the canvas.
                    let geom = self.free_form_geometry(gi, ii, item);
                    max_bottom = max_bottom.max(geom.y1);
                    let cell =
                        geom.with_origin(Point::new(origin.x + geom.x0, origin.y + geom.y0));
                    children.push(self.item_cell(gi, ii, item, cell, true));
                }
                let panel_h = group.style.panel_height.map(|h| h as f64).unwrap_or(
                    (max_bottom + 2.0 * PANEL_PAD).max(FREE_FORM_MIN_H),
                );
                self.nodes.push(SceneNode {
                    rect: Rect::new(panel_x, cursor, panel_x + panel_w, cursor + panel_h),
                    z: Z_PANEL,
                    content: panel_content,
                    children,
                });
                panel_h
            }
            GroupKind::TextOnly => {
                // Items are ignored on purpose: the block is the content.
                let style = group
                    .style
                    .subtitle
                    .resolve_over(sheet.role(TextRole::GroupSubtitle));
                let line_h = style.size as f64 * 1.2;
                let lines: Vec<&str> = group.text.lines().collect();
                let mut children = Vec::with_capacity(lines.len());
                for (li, line) in lines.iter().enumerate() {
                    children.push(self.text_node(
                        Point::new(panel_x + PANEL_PAD, cursor + PANEL_PAD + li as f64 * line_h),
                        line,
                        &style,
                        Decoration::default(),
                        self.menu_shadow(),
                    ));
                }
                let panel_h = group.style.panel_height.map(|h| h as f64).unwrap_or(
                    lines.len().max(1) as f64 * line_h + 2.0 * PANEL_PAD,
                );
                self.nodes.push(SceneNode {
                    rect: Rect::new(panel_x, cursor, panel_x + panel_w, cursor + panel_h),
                    z: Z_PANEL,
                    content: panel_content,
                    children,
                });
                panel_h
            }
        };

        cursor += panel_h + GROUP_GAP;
        self.content_bottom = self.content_bottom.max(cursor - GROUP_GAP);
        cursor
    }

    /// Stored geometry, with the live drag overlay substituted when this is
    /// the dragged item. Coordinates are relative to the panel content
    /// origin; the caller translates.
    fn free_form_geometry(&self, gi: usize, ii: usize, item: &Item) -> Rect {
        let stored = item.geometry.unwrap_or_default();
        if let Some((DragTarget::Item { group, item }, pending)) = self.overlay {
            if group == gi && item == ii {
                if let SizeSnapshot::Box { w, h } = pending.size {
                    return Rect::new(pending.x, pending.y, pending.x + w, pending.y + h);
                }
            }
        }
        stored.to_rect()
    }

    fn item_cell(
        &self,
        gi: usize,
        ii: usize,
        item: &Item,
        cell: Rect,
        resizable: bool,
    ) -> SceneNode {
        let sheet = &self.menu.styles;
        let panel = item.panel.resolve_over(&self.menu.item_panel);
        let mut children = Vec::new();

        let text_x = if let Some(icon) = item.icon.as_deref().filter(|s| !s.is_empty()) {
            let missing = !self.env.inventory.contains(AssetKind::Icon, icon);
            if missing {
                tracing::debug!(file = icon, "icon reference not in inventory");
            }
            children.push(SceneNode::leaf(
                Rect::new(0.0, 0.0, ICON_SIZE, ICON_SIZE)
                    .with_origin(Point::new(cell.x0, cell.y0 + 10.0)),
                Z_TEXT,
                NodeContent::Image(ImageNode {
                    url: asset_url(AssetKind::Icon, icon),
                    missing,
                }),
            ));
            cell.x0 + CELL_TEXT_X
        } else {
            cell.x0 + PANEL_PAD
        };

        let deco = Decoration {
            bold: item.style.bold.unwrap_or(false),
            italic: item.style.italic.unwrap_or(false),
            underline: item.style.underline.unwrap_or(false),
        };
        let name_style = item.style.name.resolve_over(sheet.role(TextRole::ItemName));
        let name_shadow = self.field_shadow(item.style.name_shadow);
        children.push(self.text_node(
            Point::new(text_x, cell.y0 + CELL_NAME_Y),
            &item.name,
            &name_style,
            deco,
            name_shadow,
        ));
        if !item.desc.is_empty() {
            let desc_style = item.style.desc.resolve_over(sheet.role(TextRole::ItemDesc));
            let desc_shadow = self.field_shadow(item.style.desc_shadow);
            children.push(self.text_node(
                Point::new(text_x, cell.y0 + CELL_DESC_Y),
                &item.desc,
                &desc_style,
                deco,
                desc_shadow,
            ));
        }

        if self.selection == (Selection::Item { group: gi, item: ii }) {
            children.push(SceneNode::leaf(
                cell.inflate(2.0, 2.0),
                Z_OVERLAY,
                NodeContent::Highlight,
            ));
            if resizable {
                children.push(SceneNode::leaf(handle_rect(cell), Z_OVERLAY, NodeContent::Handle));
            }
        }

        SceneNode {
            rect: cell,
            z: Z_PANEL,
            content: NodeContent::Panel(PanelNode {
                color: panel.color,
                opacity: panel.alpha as f64 / 255.0,
                blur: panel.blur,
                radius: CELL_RADIUS,
            }),
            children,
        }
    }

    fn widget(&mut self, wi: usize, widget: &Widget) {
        let (mut x, mut y) = (widget.x as f64, widget.y as f64);
        let mut overlay_size = None;
        if let Some((DragTarget::Widget(index), pending)) = self.overlay {
            if index == wi {
                x = pending.x;
                y = pending.y;
                overlay_size = Some(pending.size);
            }
        }

        let rect = match &widget.kind {
            WidgetKind::Text { text, size, color, font } => {
                let size = match overlay_size {
                    Some(SizeSnapshot::FontPx(px)) => px.round() as u32,
                    _ => *size,
                };
                let font = font.as_deref().unwrap_or("");
                let resolved_font = self.env.inventory.usable_font(font, widget_text_fallback());
                let style = TextStyle {
                    color: *resolve([color.as_ref()], &Color::WHITE),
                    font: resolved_font.to_string(),
                    size,
                };
                let mut node = self.text_node(
                    Point::new(x, y),
                    text,
                    &style,
                    Decoration::default(),
                    self.menu_shadow(),
                );
                node.z = Z_WIDGET;
                let rect = node.rect;
                self.nodes.push(node);
                rect
            }
            WidgetKind::Image { file, width, height } => {
                let (w, h) = match overlay_size {
                    Some(SizeSnapshot::Box { w, h }) => (w, h),
                    _ => (*width as f64, *height as f64),
                };
                let missing = !self.env.inventory.contains(AssetKind::WidgetImage, file);
                if missing {
                    tracing::debug!(file = %file, "widget image reference not in inventory");
                }
                let rect = Rect::new(x, y, x + w, y + h);
                self.nodes.push(SceneNode::leaf(
                    rect,
                    Z_WIDGET,
                    NodeContent::Image(ImageNode {
                        url: asset_url(AssetKind::WidgetImage, file),
                        missing,
                    }),
                ));
                rect
            }
        };

        if self.selection == Selection::Widget(wi) {
            self.nodes.push(SceneNode::leaf(
                rect.inflate(2.0, 2.0),
                Z_OVERLAY,
                NodeContent::Highlight,
            ));
            self.nodes
                .push(SceneNode::leaf(handle_rect(rect), Z_OVERLAY, NodeContent::Handle));
        }
        self.content_bottom = self.content_bottom.max(rect.y1);
    }

    fn text_node(
        &self,
        origin: Point,
        text: &str,
        style: &TextStyle,
        decoration: Decoration,
        shadow: Option<ShadowStyle>,
    ) -> SceneNode {
        let font = self.env.inventory.usable_font(&style.font, "");
        let measured = self.env.metrics.measure(text, style.size as f64);
        SceneNode::leaf(
            Rect::from_origin_size(origin, measured),
            Z_TEXT,
            NodeContent::Text(TextNode {
                text: text.to_string(),
                color: style.color,
                font_url: asset_url(AssetKind::Font, font),
                size: style.size,
                decoration,
                shadow,
            }),
        )
    }

    fn menu_shadow(&self) -> Option<ShadowStyle> {
        self.menu.shadow.enabled.then_some(self.menu.shadow)
    }

    /// Per-field shadow override, else the menu default; emitted only when
    /// the winning style is enabled.
    fn field_shadow(&self, over: Option<ShadowStyle>) -> Option<ShadowStyle> {
        let style = resolve([over.as_ref()], &self.menu.shadow);
        style.enabled.then_some(*style)
    }
}

fn handle_rect(rect: Rect) -> Rect {
    Rect::new(
        rect.x1 - HANDLE_SIZE,
        rect.y1 - HANDLE_SIZE,
        rect.x1,
        rect.y1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        drag::GeometrySnapshot,
        geometry::ItemGeometry,
        model::{Background, BackgroundFit, BackgroundSource, Config, GroupOverrides},
        style::{AlignY, TextOverride},
    };

    fn inventory() -> AssetInventory {
        let mut inv = AssetInventory::default();
        inv.add(AssetKind::Font, "title.ttf");
        inv.add(AssetKind::Font, "text.ttf");
        inv.add(AssetKind::Icon, "star.png");
        inv.add(AssetKind::Background, "beach.png");
        inv.add(AssetKind::WidgetImage, "logo.png");
        inv
    }

    fn sample_menu() -> Menu {
        let mut menu = Config::starter().menus.remove(0);
        menu.groups.push(Group {
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
        menu
    }

    fn compose_plain(menu: &Menu) -> Scene {
        let inv = inventory();
        let env = ComposeEnv::new(&inv);
        compose(menu, &env, Selection::None, None)
    }

    fn collect_texts<'a>(nodes: &'a [SceneNode], out: &mut Vec<&'a TextNode>) {
        for node in nodes {
            if let NodeContent::Text(t) = &node.content {
                out.push(t);
            }
            collect_texts(&node.children, out);
        }
    }

    fn texts(scene: &Scene) -> Vec<&TextNode> {
        let mut out = Vec::new();
        collect_texts(&scene.nodes, &mut out);
        out
    }

    fn count_content(nodes: &[SceneNode], pred: &dyn Fn(&NodeContent) -> bool) -> usize {
        nodes
            .iter()
            .map(|n| usize::from(pred(&n.content)) + count_content(&n.children, pred))
            .sum()
    }

    #[test]
    fn composition_is_deterministic() {
        let menu = sample_menu();
        let inv = inventory();
        let env = ComposeEnv::new(&inv).with_background_size(Size::new(800.0, 600.0));
        let a = compose(&menu, &env, Selection::Widget(0), None);
        let b = compose(&menu, &env, Selection::Widget(0), None);
        assert_eq!(a, b);
    }

    #[test]
    fn unstyled_items_resolve_to_the_sheet_color() {
        let menu = sample_menu();
        let scene = compose_plain(&menu);
        let names: Vec<_> = texts(&scene)
            .into_iter()
            .filter(|t| t.size == menu.styles.item_name.size)
            .collect();
        assert!(!names.is_empty());
        for node in names {
            assert_eq!(node.color, menu.styles.item_name.color);
        }
    }

    #[test]
    fn item_override_styles_only_that_item() {
        let mut menu = sample_menu();
        menu.groups[0].items[0].style.name = TextOverride {
            color: Color::parse("#112233"),
            ..TextOverride::default()
        };
        let scene = compose_plain(&menu);
        let first = menu.groups[0].items[0].name.clone();
        let second = menu.groups[0].items[1].name.clone();
        let by_text = |needle: &str| {
            texts(&scene)
                .into_iter()
                .find(|t| t.text == *needle)
                .unwrap()
                .clone()
        };
        assert_eq!(by_text(&first).color, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(by_text(&second).color, menu.styles.item_name.color);

        menu.groups[0].items[0].style.name = TextOverride::default();
        let reset_scene = compose_plain(&menu);
        let mut out = Vec::new();
        collect_texts(&reset_scene.nodes, &mut out);
        let reset_node = out.into_iter().find(|t| t.text == *first).unwrap();
        assert_eq!(reset_node.color, menu.styles.item_name.color);
    }

    #[test]
    fn grid_always_carries_a_trailing_add_cell() {
        let menu = sample_menu();
        let scene = compose_plain(&menu);
        let placeholders = count_content(&scene.nodes, &|c| {
            matches!(c, NodeContent::Placeholder { .. })
        });
        // One per normal grid; free-form groups get none.
        assert_eq!(placeholders, 1);

        let mut empty = Menu::with_defaults("e", "Empty");
        empty.groups.push(Group::default());
        let scene = compose_plain(&empty);
        let placeholders = count_content(&scene.nodes, &|c| {
            matches!(c, NodeContent::Placeholder { .. })
        });
        assert_eq!(placeholders, 1);
    }

    #[test]
    fn text_only_groups_ignore_their_items() {
        let mut menu = Menu::with_defaults("m", "Menu");
        menu.groups.push(Group {
            title: "Notes".to_string(),
            kind: GroupKind::TextOnly,
            text: "line one\nline two".to_string(),
            items: vec![Item {
                name: "never shown".to_string(),
                ..Item::default()
            }],
            ..Group::default()
        });
        let scene = compose_plain(&menu);
        let all = texts(&scene);
        assert!(all.iter().any(|t| t.text == "line one"));
        assert!(all.iter().any(|t| t.text == "line two"));
        assert!(all.iter().all(|t| t.text != "never shown"));
        for line in all.iter().filter(|t| t.text.starts_with("line")) {
            assert_eq!(line.size, menu.styles.group_subtitle.size);
        }
    }

    #[test]
    fn free_form_panel_grows_to_the_lowest_item() {
        let menu = sample_menu();
        let scene = compose_plain(&menu);
        let panels: Vec<_> = scene
            .nodes
            .iter()
            .filter(|n| matches!(n.content, NodeContent::Panel(_)))
            .collect();
        let free_panel = panels.last().unwrap();
        // Item bottom edge 140 plus padding on both sides.
        assert_eq!(free_panel.rect.height(), 140.0 + 2.0 * PANEL_PAD);

        // The item lands at the content origin plus its stored offset.
        let cell = &free_panel.children[0];
        assert_eq!(cell.rect.x0, free_panel.rect.x0 + PANEL_PAD + 40.0);
        assert_eq!(cell.rect.y0, free_panel.rect.y0 + PANEL_PAD + 40.0);
    }

    #[test]
    fn drag_overlay_replaces_geometry_without_touching_the_document() {
        let menu = sample_menu();
        let before = menu.clone();
        let inv = inventory();
        let env = ComposeEnv::new(&inv);
        let overlay = (
            DragTarget::Item { group: 1, item: 0 },
            GeometrySnapshot::of_box(90, 70, 300, 120),
        );
        let scene = compose(&menu, &env, Selection::None, Some(overlay));
        let free_panel = scene
            .nodes
            .iter()
            .filter(|n| matches!(n.content, NodeContent::Panel(_)))
            .last()
            .unwrap();
        let cell = &free_panel.children[0];
        assert_eq!(cell.rect.x0, free_panel.rect.x0 + PANEL_PAD + 90.0);
        assert_eq!(cell.rect.width(), 300.0);
        assert_eq!(menu, before);
    }

    #[test]
    fn selection_emits_highlight_and_handle() {
        let menu = sample_menu();
        let inv = inventory();
        let env = ComposeEnv::new(&inv);

        let none = compose(&menu, &env, Selection::None, None);
        assert_eq!(count_content(&none.nodes, &|c| matches!(c, NodeContent::Highlight)), 0);

        let widget = compose(&menu, &env, Selection::Widget(0), None);
        assert_eq!(count_content(&widget.nodes, &|c| matches!(c, NodeContent::Highlight)), 1);
        assert_eq!(count_content(&widget.nodes, &|c| matches!(c, NodeContent::Handle)), 1);

        // Grid items highlight but are not resizable.
        let item = compose(&menu, &env, Selection::Item { group: 0, item: 0 }, None);
        assert_eq!(count_content(&item.nodes, &|c| matches!(c, NodeContent::Highlight)), 1);
        assert_eq!(count_content(&item.nodes, &|c| matches!(c, NodeContent::Handle)), 0);

        // Free-form items get the resize grip.
        let free = compose(&menu, &env, Selection::Item { group: 1, item: 0 }, None);
        assert_eq!(count_content(&free.nodes, &|c| matches!(c, NodeContent::Handle)), 1);
    }

    #[test]
    fn fixed_sizing_wins_over_content_height() {
        let mut menu = sample_menu();
        menu.layout.sizing = CanvasSizing::Fixed {
            width: 1200,
            height: 500,
        };
        let scene = compose_plain(&menu);
        assert_eq!(scene.canvas.width, 1200.0);
        assert_eq!(scene.canvas.height, 500.0);

        menu.layout.sizing = CanvasSizing::AutoHeight { width: 1000 };
        let auto = compose_plain(&menu);
        assert!(auto.canvas.height > HEADER_BLOCK);
    }

    #[test]
    fn missing_references_are_marked_not_dropped() {
        let mut menu = Menu::with_defaults("m", "Menu");
        menu.background = Some(Background {
            source: BackgroundSource::Image {
                file: "gone.png".to_string(),
            },
            fit: BackgroundFit::default(),
            align_x: AlignX::default(),
            align_y: AlignY::default(),
            scale: 1.0,
        });
        menu.groups.push(Group {
            title: "g".to_string(),
            items: vec![Item {
                name: "a".to_string(),
                icon: Some("lost.png".to_string()),
                ..Item::default()
            }],
            ..Group::default()
        });
        let scene = compose_plain(&menu);

        let bg = scene.background.as_ref().unwrap();
        assert!(bg.missing);
        assert_eq!(bg.url, "/raw_assets/backgrounds/gone.png");

        let icons = {
            fn find<'a>(nodes: &'a [SceneNode], out: &mut Vec<&'a ImageNode>) {
                for n in nodes {
                    if let NodeContent::Image(img) = &n.content {
                        out.push(img);
                    }
                    find(&n.children, out);
                }
            }
            let mut out = Vec::new();
            find(&scene.nodes, &mut out);
            out
        };
        assert!(icons.iter().any(|i| i.missing && i.url.contains("lost.png")));
    }

    #[test]
    fn widget_text_carries_metrics_sized_rect_and_shadow() {
        let mut menu = Menu::with_defaults("m", "Menu");
        menu.shadow.enabled = true;
        menu.widgets.push(Widget {
            x: 10,
            y: 20,
            kind: WidgetKind::Text {
                text: "hello".to_string(),
                size: 40,
                color: Some(Color::rgb(0x10, 0x20, 0x30)),
                font: None,
            },
        });
        let scene = compose_plain(&menu);
        let node = scene
            .nodes
            .iter()
            .find(|n| matches!(n.content, NodeContent::Text(_)))
            .unwrap();
        assert_eq!(node.z, Z_WIDGET);
        assert_eq!(node.rect.x0, 10.0);
        assert!((node.rect.width() - 5.0 * 40.0 * 0.55).abs() < 1e-9);
        match &node.content {
            NodeContent::Text(t) => {
                assert_eq!(t.color, Color::rgb(0x10, 0x20, 0x30));
                assert!(t.shadow.is_some());
                assert_eq!(t.font_url, "/fonts/text.ttf");
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn centered_title_is_centered_on_the_canvas() {
        let mut menu = Menu::with_defaults("m", "Menu");
        menu.title = "Tt".to_string();
        menu.styles.title_align = AlignX::Center;
        let scene = compose_plain(&menu);
        let title = scene
            .nodes
            .iter()
            .find(|n| matches!(n.content, NodeContent::Text(_)))
            .unwrap();
        let width = 2.0 * 60.0 * 0.55;
        assert_eq!(title.rect.x0, (1000.0 - width) * 0.5);
        assert_eq!(title.rect.y0, 80.0);
    }

    #[test]
    fn column_override_reflows_the_grid() {
        let mut menu = Menu::with_defaults("m", "Menu");
        menu.groups.push(Group {
            title: "g".to_string(),
            items: vec![Item::default(), Item::default(), Item::default()],
            style: GroupOverrides {
                columns: Some(2),
                ..Default::default()
            },
            ..Group::default()
        });
        let scene = compose_plain(&menu);
        let panel = scene
            .nodes
            .iter()
            .find(|n| matches!(n.content, NodeContent::Panel(_)))
            .unwrap();
        // 3 items + add cell in 2 columns: two rows.
        let expected = 2.0 * ITEM_H + ITEM_GAP_Y + 2.0 * PANEL_PAD;
        assert_eq!(panel.rect.height(), expected);
        // Second cell sits in the second column of the first row.
        assert_eq!(panel.children[1].rect.y0, panel.rect.y0 + PANEL_PAD);
        assert!(panel.children[1].rect.x0 > panel.children[0].rect.x1);
    }
}
