//! menuet is the headless core of a visual editor for layered, styleable
//! menu documents that an external compositor burns to a final raster.
//!
//! The public API is session-oriented:
//!
//! - Load and validate a [`Config`]
//! - Open an [`EditorSession`] over it (selection, drag, property forms)
//! - Compose the active menu into a deterministic [`Scene`] tree
//!
//! See [`guide`] for the full architecture walkthrough.
#![forbid(unsafe_code)]

pub mod assets;
pub mod background;
pub mod color;
pub mod compose;
pub mod drag;
pub mod dsl;
pub mod error;
pub mod fingerprint;
pub mod forms;
pub mod geometry;
pub mod guide;
pub mod model;
pub mod selection;
pub mod session;
pub mod store;
pub mod style;

pub use assets::{AssetInventory, AssetKind, asset_url};
pub use color::Color;
pub use compose::{ComposeEnv, NodeContent, Scene, SceneNode, TextMetrics, compose};
pub use drag::{DragMode, DragOutcome, DragSession, DragTarget, GeometrySnapshot, PendingGeometry};
pub use error::{MenuetError, MenuetResult};
pub use fingerprint::{SceneFingerprint, scene_fingerprint};
pub use forms::{FieldKey, FieldState, PropertyForm, PropertyTarget, build_form};
pub use geometry::{ItemGeometry, Point, Rect, Size, Vec2, Viewport};
pub use model::{
    Background, BackgroundFit, BackgroundSource, CanvasSizing, Config, ExportFormat, Group,
    GroupKind, Item, Menu, Widget, WidgetKind,
};
pub use selection::{Refresh, Selection, SelectionController};
pub use session::EditorSession;
pub use store::{AssetStore, ConfigStore, ExportArtifact, FsConfigStore, MemoryStore, MenuExporter};
pub use style::{PanelStyle, ShadowStyle, StyleSheet, TextRole, TextStyle};
