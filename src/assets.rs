use crate::style::{FALLBACK_TEXT_FONT, FALLBACK_TITLE_FONT};

/// Categories the asset service stores, one directory per kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Background,
    Icon,
    WidgetImage,
    Font,
    Video,
}

impl AssetKind {
    pub fn dir(self) -> &'static str {
        match self {
            Self::Background => "backgrounds",
            Self::Icon => "icons",
            Self::WidgetImage => "widgets",
            Self::Font => "fonts",
            Self::Video => "videos",
        }
    }
}

/// Resolve a stored filename to the URL the compositor and the shell fetch
/// it from. Fonts are served from their own mount; everything else goes
/// through the raw asset route.
pub fn asset_url(kind: AssetKind, file: &str) -> String {
    match kind {
        AssetKind::Font => format!("/fonts/{file}"),
        _ => format!("/raw_assets/{}/{}", kind.dir(), file),
    }
}

/// What the asset service currently holds, fetched once at bootstrap and
/// refreshed after uploads. Composition uses it for tolerant reference
/// checks only; the core never touches the binaries behind the names.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetInventory {
    #[serde(default)]
    pub backgrounds: Vec<String>,
    #[serde(default)]
    pub icons: Vec<String>,
    #[serde(default)]
    pub widget_images: Vec<String>,
    #[serde(default)]
    pub fonts: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
}

impl AssetInventory {
    pub fn list(&self, kind: AssetKind) -> &[String] {
        match kind {
            AssetKind::Background => &self.backgrounds,
            AssetKind::Icon => &self.icons,
            AssetKind::WidgetImage => &self.widget_images,
            AssetKind::Font => &self.fonts,
            AssetKind::Video => &self.videos,
        }
    }

    fn list_mut(&mut self, kind: AssetKind) -> &mut Vec<String> {
        match kind {
            AssetKind::Background => &mut self.backgrounds,
            AssetKind::Icon => &mut self.icons,
            AssetKind::WidgetImage => &mut self.widget_images,
            AssetKind::Font => &mut self.fonts,
            AssetKind::Video => &mut self.videos,
        }
    }

    pub fn contains(&self, kind: AssetKind, file: &str) -> bool {
        self.list(kind).iter().any(|f| f == file)
    }

    /// Record a stored filename, keeping the list sorted and free of
    /// duplicates so inventory order never depends on upload order.
    pub fn add(&mut self, kind: AssetKind, file: impl Into<String>) {
        let list = self.list_mut(kind);
        let file = file.into();
        if let Err(pos) = list.binary_search(&file) {
            list.insert(pos, file);
        }
    }

    pub fn remove(&mut self, kind: AssetKind, file: &str) -> bool {
        let list = self.list_mut(kind);
        match list.iter().position(|f| f == file) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Pick a usable font reference: the requested file if present, else
    /// the requested fallback if present, else the built-in names the
    /// compositor always ships.
    pub fn usable_font<'a>(&'a self, requested: &'a str, fallback: &'a str) -> &'a str {
        for candidate in [requested, fallback, FALLBACK_TITLE_FONT, FALLBACK_TEXT_FONT] {
            if !candidate.is_empty() && self.contains(AssetKind::Font, candidate) {
                return candidate;
            }
        }
        // Empty inventories happen in tests and before bootstrap; keep the
        // request rather than inventing a name.
        if requested.is_empty() { fallback } else { requested }
    }
}
