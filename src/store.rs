//! Boundary contracts for the out-of-scope collaborators: configuration
//! persistence, the asset service, and the export compositor. The core only
//! ever talks to these traits; the HTTP shell and the filesystem CLI plug in
//! their own implementations.

use std::path::{Path, PathBuf};

use crate::{
    assets::{AssetInventory, AssetKind},
    error::{MenuetError, MenuetResult},
    model::{Config, ExportFormat, Menu},
};

/// Load/save of the whole configuration document. The document is the unit
/// of persistence; there is no per-entity endpoint. Failures surface as
/// [`MenuetError::Transport`] and are not retried.
pub trait ConfigStore {
    fn load(&self) -> MenuetResult<Config>;
    fn save(&mut self, config: &Config) -> MenuetResult<()>;
}

/// The asset service: categorized filename inventory plus upload/delete.
/// Uploads yield the stored filename, which entities then reference; the
/// core never holds the binaries themselves.
pub trait AssetStore {
    fn inventory(&self) -> MenuetResult<AssetInventory>;
    fn upload(&mut self, kind: AssetKind, name: &str, bytes: &[u8]) -> MenuetResult<String>;
    fn delete(&mut self, kind: AssetKind, file: &str) -> MenuetResult<bool>;
}

/// What an export round-trip hands back: a URL to the finished raster and
/// the format the compositor actually produced.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportArtifact {
    pub url: String,
    pub format: ExportFormat,
}

/// The server-side compositor boundary. It re-derives the image from the
/// same stored menu, so the submitted document is all it needs.
pub trait MenuExporter {
    fn export(&mut self, menu: &Menu) -> MenuetResult<ExportArtifact>;
}

/// JSON-file config store used by the CLI. Saves are whole-file rewrites,
/// matching the last-write-wins contract of the real service.
#[derive(Clone, Debug)]
pub struct FsConfigStore {
    path: PathBuf,
}

impl FsConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FsConfigStore {
    fn load(&self) -> MenuetResult<Config> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            MenuetError::transport(format!("read config '{}': {e}", self.path.display()))
        })?;
        Config::from_json(&json)
    }

    fn save(&mut self, config: &Config) -> MenuetResult<()> {
        let json = config.to_json_pretty()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                MenuetError::transport(format!("create dir '{}': {e}", parent.display()))
            })?;
        }
        std::fs::write(&self.path, json).map_err(|e| {
            MenuetError::transport(format!("write config '{}': {e}", self.path.display()))
        })
    }
}

/// In-memory store implementing all three boundary traits. Tests drive the
/// session against it; the failure toggles simulate transport errors.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub config: Config,
    pub inventory: AssetInventory,
    pub saves: usize,
    pub exports: Vec<String>,
    pub fail_next: Option<u16>,
}

impl MemoryStore {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Make the next operation fail with the given HTTP status.
    pub fn fail_with(&mut self, status: u16) {
        self.fail_next = Some(status);
    }

    fn check_failure(&mut self, what: &str) -> MenuetResult<()> {
        match self.fail_next.take() {
            Some(status) => Err(MenuetError::transport_status(
                status,
                format!("{what} failed"),
            )),
            None => Ok(()),
        }
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> MenuetResult<Config> {
        if let Some(status) = self.fail_next {
            return Err(MenuetError::transport_status(status, "load failed"));
        }
        Ok(self.config.clone())
    }

    fn save(&mut self, config: &Config) -> MenuetResult<()> {
        self.check_failure("save")?;
        self.config = config.clone();
        self.saves += 1;
        Ok(())
    }
}

impl AssetStore for MemoryStore {
    fn inventory(&self) -> MenuetResult<AssetInventory> {
        if let Some(status) = self.fail_next {
            return Err(MenuetError::transport_status(status, "inventory failed"));
        }
        Ok(self.inventory.clone())
    }

    fn upload(&mut self, kind: AssetKind, name: &str, _bytes: &[u8]) -> MenuetResult<String> {
        self.check_failure("upload")?;
        self.inventory.add(kind, name);
        Ok(name.to_string())
    }

    fn delete(&mut self, kind: AssetKind, file: &str) -> MenuetResult<bool> {
        self.check_failure("delete")?;
        Ok(self.inventory.remove(kind, file))
    }
}

impl MenuExporter for MemoryStore {
    fn export(&mut self, menu: &Menu) -> MenuetResult<ExportArtifact> {
        self.check_failure("export")?;
        let format = if menu.background.as_ref().is_some_and(|b| b.source.is_video()) {
            menu.export.video.format
        } else {
            ExportFormat::Png
        };
        self.exports.push(menu.id.clone());
        Ok(ExportArtifact {
            url: format!("/exports/{}.{:?}", menu.id, format).to_lowercase(),
            format,
        })
    }
}
