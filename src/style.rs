use crate::color::Color;

/// Built-in font fallbacks applied when a reference is empty or points at a
/// file the inventory no longer has. The external compositor ships the same
/// two files.
pub const FALLBACK_TITLE_FONT: &str = "title.ttf";
pub const FALLBACK_TEXT_FONT: &str = "text.ttf";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Horizontal placement inside the available box.
pub enum AlignX {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Vertical placement inside the available box.
pub enum AlignY {
    Start,
    #[default]
    Center,
    End,
}

/// One fully-resolved text appearance: what the composer actually emits.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    pub color: Color,
    /// Font file reference by name; resolved to a URL at the asset boundary.
    pub font: String,
    /// Pixel size in canvas units.
    pub size: u32,
}

impl TextStyle {
    fn new(color: Color, font: &str, size: u32) -> Self {
        Self {
            color,
            font: font.to_string(),
            size,
        }
    }
}

/// The text roles a menu document styles globally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextRole {
    Title,
    Subtitle,
    GroupTitle,
    GroupSubtitle,
    ItemName,
    ItemDesc,
}

/// The menu's global style sheet: complete values for every role. Entity
/// overrides fall back here; the sheet itself falls back to the hard-coded
/// defaults below, so resolution is total.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleSheet {
    #[serde(default = "default_title_style")]
    pub title: TextStyle,
    #[serde(default = "default_subtitle_style")]
    pub subtitle: TextStyle,
    #[serde(default = "default_group_title_style")]
    pub group_title: TextStyle,
    #[serde(default = "default_group_subtitle_style")]
    pub group_subtitle: TextStyle,
    #[serde(default = "default_item_name_style")]
    pub item_name: TextStyle,
    #[serde(default = "default_item_desc_style")]
    pub item_desc: TextStyle,
    #[serde(default)]
    pub title_align: AlignX,
}

fn default_title_style() -> TextStyle {
    TextStyle::new(Color::WHITE, FALLBACK_TITLE_FONT, 60)
}

fn default_subtitle_style() -> TextStyle {
    TextStyle::new(Color::rgb(0xdd, 0xdd, 0xdd), FALLBACK_TITLE_FONT, 30)
}

fn default_group_title_style() -> TextStyle {
    TextStyle::new(Color::WHITE, FALLBACK_TEXT_FONT, 30)
}

fn default_group_subtitle_style() -> TextStyle {
    TextStyle::new(Color::rgb(0xdd, 0xdd, 0xdd), FALLBACK_TEXT_FONT, 18)
}

fn default_item_name_style() -> TextStyle {
    TextStyle::new(Color::WHITE, FALLBACK_TITLE_FONT, 26)
}

fn default_item_desc_style() -> TextStyle {
    TextStyle::new(Color::rgb(0xaa, 0xaa, 0xaa), FALLBACK_TEXT_FONT, 16)
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            title: default_title_style(),
            subtitle: default_subtitle_style(),
            group_title: default_group_title_style(),
            group_subtitle: default_group_subtitle_style(),
            item_name: default_item_name_style(),
            item_desc: default_item_desc_style(),
            title_align: AlignX::default(),
        }
    }
}

impl StyleSheet {
    pub fn role(&self, role: TextRole) -> &TextStyle {
        match role {
            TextRole::Title => &self.title,
            TextRole::Subtitle => &self.subtitle,
            TextRole::GroupTitle => &self.group_title,
            TextRole::GroupSubtitle => &self.group_subtitle,
            TextRole::ItemName => &self.item_name,
            TextRole::ItemDesc => &self.item_desc,
        }
    }

    /// Repair in place: empty font references become the role fallback and
    /// zero sizes become 1. Never fails.
    pub fn normalize(&mut self) {
        for (style, fallback) in [
            (&mut self.title, FALLBACK_TITLE_FONT),
            (&mut self.subtitle, FALLBACK_TITLE_FONT),
            (&mut self.group_title, FALLBACK_TEXT_FONT),
            (&mut self.group_subtitle, FALLBACK_TEXT_FONT),
            (&mut self.item_name, FALLBACK_TITLE_FONT),
            (&mut self.item_desc, FALLBACK_TEXT_FONT),
        ] {
            if style.font.trim().is_empty() {
                style.font = fallback.to_string();
            }
            style.size = style.size.max(1);
        }
    }
}

/// Per-entity text override: a key is either absent (inherit) or holds a
/// non-empty value (private).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl TextOverride {
    pub fn is_vacant(&self) -> bool {
        self.color.is_none() && self.font.is_none() && self.size.is_none()
    }

    /// Resolve this override on top of a sheet role, yielding the concrete
    /// style the composer emits.
    pub fn resolve_over(&self, base: &TextStyle) -> TextStyle {
        TextStyle {
            color: *resolve([self.color.as_ref()], &base.color),
            font: resolve([self.font.as_deref()], base.font.as_str()).to_string(),
            size: *resolve([self.size.as_ref()], &base.size),
        }
    }
}

/// Translucent panel appearance behind groups and items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PanelStyle {
    pub color: Color,
    /// 0 (invisible) ..= 255 (opaque); composited as `alpha / 255`.
    pub alpha: u8,
    /// Backdrop blur radius in canvas pixels.
    pub blur: u32,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            alpha: 120,
            blur: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PanelOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<u32>,
}

impl PanelOverrides {
    pub fn is_vacant(&self) -> bool {
        self.color.is_none() && self.alpha.is_none() && self.blur.is_none()
    }

    pub fn resolve_over(&self, base: &PanelStyle) -> PanelStyle {
        PanelStyle {
            color: *resolve([self.color.as_ref()], &base.color),
            alpha: *resolve([self.alpha.as_ref()], &base.alpha),
            blur: *resolve([self.blur.as_ref()], &base.blur),
        }
    }
}

/// Drop shadow behind text nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShadowStyle {
    pub enabled: bool,
    pub color: Color,
    pub offset_x: i32,
    pub offset_y: i32,
    pub radius: u32,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::BLACK,
            offset_x: 2,
            offset_y: 2,
            radius: 4,
        }
    }
}

/// Resolve an effective value: the first populated override in precedence
/// order wins, otherwise the global sheet value. Total on all inputs.
pub fn resolve<'a, T: ?Sized, I>(overrides: I, global: &'a T) -> &'a T
where
    I: IntoIterator<Item = Option<&'a T>>,
{
    overrides.into_iter().flatten().next().unwrap_or(global)
}

/// Types that define an "empty" sentinel for the reset-on-empty contract.
/// Numbers and colors have no empty form; absence is their only inherit
/// state.
pub trait OverrideValue {
    fn is_empty_value(&self) -> bool {
        false
    }
}

impl OverrideValue for String {
    fn is_empty_value(&self) -> bool {
        self.trim().is_empty()
    }
}

impl OverrideValue for Color {}
impl OverrideValue for u8 {}
impl OverrideValue for u32 {}
impl OverrideValue for f64 {}
impl OverrideValue for bool {}
impl OverrideValue for ShadowStyle {}

/// Assign a private override. An empty value behaves exactly like
/// [`reset`]: the key is removed and resolution falls back to inheritance.
pub fn set_override<T: OverrideValue>(slot: &mut Option<T>, value: T) {
    if value.is_empty_value() {
        *slot = None;
    } else {
        *slot = Some(value);
    }
}

/// Remove a private override so resolution falls through to the inherited
/// value, as if the key had never been set.
pub fn reset<T>(slot: &mut Option<T>) {
    *slot = None;
}
