//! # menuet guide (v0.1.0)
//!
//! This module is a standalone walkthrough of menuet's architecture and
//! public API. It is intentionally detailed so the shells that embed the
//! core (and future features) can build on a shared mental model of what
//! "an edit" and "a composed scene" mean in this codebase.
//!
//! If you are looking for copy/paste commands, start with the repository
//! `README.md`. If you are implementing new features, start here.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`Config`](crate::Config): every menu the installation knows about —
//!   the unit of save/load; nothing is persisted entity-by-entity
//! - [`Menu`](crate::Menu): one root document (style sheet, layout,
//!   background, groups, widgets, export parameters)
//! - [`EditorSession`](crate::EditorSession): the explicit editing state —
//!   document, active menu, selection, viewport, drag in flight
//! - [`Scene`](crate::Scene): the composed visual node tree the shell (and
//!   the external compositor) draws from
//! - [`Viewport`](crate::Viewport): the screen-to-canvas scale threaded
//!   into every pointer delta
//! - [`ConfigStore`](crate::ConfigStore) / [`AssetStore`](crate::AssetStore)
//!   / [`MenuExporter`](crate::MenuExporter): the only places external IO
//!   is allowed
//!
//! The editing loop is explicitly staged:
//!
//! 1. Mutate the document through [`EditorSession`](crate::EditorSession)
//!    operations; each returns a [`Refresh`](crate::Refresh) report
//! 2. Compose the scene: [`compose`](crate::compose) (or
//!    [`EditorSession::compose_scene`](crate::EditorSession::compose_scene),
//!    which also threads the selection and any live-drag overlay)
//! 3. Present the tree; the shell walks [`SceneNode`](crate::SceneNode)s
//!    and draws them with whatever toolkit it has
//!
//! ---
//!
//! ## Style resolution (override-with-inheritance)
//!
//! Every stylable attribute resolves through one funnel,
//! [`resolve`](crate::style::resolve): the first populated override in
//! precedence order wins, otherwise the menu's global
//! [`StyleSheet`](crate::StyleSheet) value. The sheet is complete (every
//! role has a concrete color/font/size), so resolution is total — there is
//! no "unstyled" output.
//!
//! An override key is either absent (inherit) or holds a non-empty value
//! (private). [`set_override`](crate::style::set_override) treats an empty
//! value as [`reset`](crate::style::reset): the key is removed and
//! resolution falls back to inheritance, exactly as if it had never been
//! set. The property forms surface this as
//! [`FieldState`](crate::forms::FieldState) — `Plain`, `Inherited`, or
//! `Overridden` — so the shell can render the reset affordance only where
//! it means something.
//!
//! ---
//!
//! ## The drag pipeline (and why the model is never touched mid-gesture)
//!
//! Pointer gestures run through [`DragSession`](crate::DragSession):
//!
//! 1. **Arm** at pointer-down: capture the screen origin, the entity's
//!    pre-gesture geometry snapshot, and the current viewport scale
//! 2. **Gate**: nothing happens until cumulative screen displacement passes
//!    the click threshold; a release below it is a plain selection click
//! 3. **Frames**: pointer samples collapse to the latest one per animation
//!    frame; past the gate, each frame yields a `PendingGeometry` overlay
//! 4. **Commit** at pointer-up (or capture loss): the final geometry is
//!    computed from the latest sample alone, snapped, clamped, rounded,
//!    and written into the model by the session
//!
//! While the gesture runs, composition substitutes the overlay for the
//! dragged entity's stored geometry — the document itself stays unchanged
//! until commit. This keeps the committed result independent of how many
//! frames were observed, and keeps every intermediate scene derivable from
//! (document, overlay) alone.
//!
//! All deltas go through [`Viewport::to_model_delta`](crate::Viewport):
//! the canvas is shrunk to fit the available width (never magnified), and
//! stored geometry is always in canvas pixels, the same units the external
//! compositor renders at 1:1.
//!
//! ---
//!
//! ## Determinism (menuet's composition contract)
//!
//! [`compose`](crate::compose) is a pure function of its inputs: the menu
//! value, a [`ComposeEnv`](crate::ComposeEnv) (asset inventory, externally
//! probed background size, text metrics), the selection, and the optional
//! drag overlay. Equal inputs produce structurally equal trees. The
//! server-side compositor re-derives the export raster from the same
//! stored document, so any nondeterminism here would show up as a preview
//! that does not match the export.
//!
//! Two consequences worth internalizing:
//!
//! - Anything composition cannot derive deterministically (media
//!   dimensions, inventory state) is passed **in** via `ComposeEnv`,
//!   never probed from inside
//! - Text measurement uses deterministic nominal metrics
//!   ([`TextMetrics`](crate::TextMetrics)); real shaping belongs to the
//!   compositor, which ships the same fonts
//!
//! [`scene_fingerprint`](crate::scene_fingerprint) hashes a composed tree
//! into a compact witness; tests and the CLI use it to detect accidental
//! nondeterminism without storing whole trees.
//!
//! ---
//!
//! ## Error posture
//!
//! Nothing in the core is fatal:
//!
//! - transport failures ([`MenuetError::Transport`](crate::MenuetError))
//!   surface to the user and are not retried; the in-memory document is
//!   untouched
//! - malformed form input is coerced best-effort, falling back to the
//!   previous value
//! - references to deleted assets compose with a `missing` marker and
//!   fallback fonts, never a hard failure
//! - geometry below the minimums is clamped, never rejected
//! - a drag whose target was deleted mid-gesture aborts with a warning and
//!   no write
//!
//! ---
//!
//! ## Where to add things
//!
//! - A new stylable attribute: add the override slot to the model, wire it
//!   through [`resolve`](crate::style::resolve) in the composer, and add
//!   its [`FieldKey`](crate::forms::FieldKey) — the closed unions make the
//!   compiler point at every place that must handle it
//! - A new entity kind: extend [`Selection`](crate::Selection),
//!   [`DragTarget`](crate::DragTarget) and the composer walk; exhaustive
//!   matches surface the rest
//! - A new boundary: define a trait in [`store`](crate::store) and keep IO
//!   out of the core modules

// Doc-only module.
