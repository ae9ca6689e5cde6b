use crate::geometry::{
    DRAG_THRESHOLD_PX, MIN_BOX_PX, MIN_TEXT_WIDGET_SIZE, Point, Viewport, snap_to_zero,
};

/// What a drag is acting on. Indices into the active menu, resolved again at
/// commit time because the entity may have been deleted mid-gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Item { group: usize, item: usize },
    Widget(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize,
}

/// The resizable dimension of a target. Boxes resize in both axes; text
/// widgets have no box, so vertical resize drags their font size instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SizeSnapshot {
    Box { w: f64, h: f64 },
    FontPx(f64),
}

/// Pre-gesture geometry captured at arm time; also the shape of the live
/// candidate the composer overlays while the drag is running.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometrySnapshot {
    pub x: f64,
    pub y: f64,
    pub size: SizeSnapshot,
}

/// The live overlay role of [`GeometrySnapshot`]: candidate geometry layered
/// over the unchanged document during composition.
pub type PendingGeometry = GeometrySnapshot;

impl GeometrySnapshot {
    pub fn of_box(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
            size: SizeSnapshot::Box {
                w: w as f64,
                h: h as f64,
            },
        }
    }

    pub fn of_text(x: i32, y: i32, font_px: u32) -> Self {
        Self {
            x: x as f64,
            y: y as f64,
            size: SizeSnapshot::FontPx(font_px as f64),
        }
    }

    /// Integral geometry for the model write. Minimums hold regardless of
    /// how far a negative delta went.
    pub fn committed(self) -> CommittedGeometry {
        CommittedGeometry {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            size: match self.size {
                SizeSnapshot::Box { w, h } => CommittedSize::Box {
                    w: w.max(MIN_BOX_PX).round() as u32,
                    h: h.max(MIN_BOX_PX).round() as u32,
                },
                SizeSnapshot::FontPx(px) => {
                    CommittedSize::FontPx(px.max(MIN_TEXT_WIDGET_SIZE).round() as u32)
                }
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommittedGeometry {
    pub x: i32,
    pub y: i32,
    pub size: CommittedSize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommittedSize {
    Box { w: u32, h: u32 },
    FontPx(u32),
}

/// How a finished gesture resolves: a plain selection click (threshold never
/// crossed), or geometry to write into the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragOutcome {
    Click,
    Commit {
        target: DragTarget,
        geometry: CommittedGeometry,
    },
}

/// One pointer gesture from pointer-down to pointer-up.
///
/// The session never touches the document. It records the latest pointer
/// sample, applies it once per animation frame, and hands the caller either
/// a pending overlay (while moving) or a committed geometry (on release).
/// The commit is computed from the latest sample alone, so the result does
/// not depend on how many frames were observed in between.
#[derive(Clone, Debug)]
pub struct DragSession {
    target: DragTarget,
    mode: DragMode,
    origin: Point,
    snapshot: GeometrySnapshot,
    viewport: Viewport,
    latest: Point,
    passed_threshold: bool,
    frame_dirty: bool,
    pending: Option<PendingGeometry>,
}

impl DragSession {
    /// Capture everything the gesture needs at pointer-down. Selection of
    /// the target is the caller's side of arming.
    pub fn arm(
        target: DragTarget,
        mode: DragMode,
        pointer: Point,
        snapshot: GeometrySnapshot,
        viewport: Viewport,
    ) -> Self {
        Self {
            target,
            mode,
            origin: pointer,
            snapshot,
            viewport,
            latest: pointer,
            passed_threshold: false,
            frame_dirty: false,
            pending: None,
        }
    }

    pub fn target(&self) -> DragTarget {
        self.target
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Record a pointer sample. Cheap on purpose: samples between frames
    /// collapse to the latest one.
    pub fn pointer_moved(&mut self, pointer: Point) {
        self.latest = pointer;
        self.frame_dirty = true;
    }

    /// Apply the latest sample. Returns the current overlay, or `None`
    /// while the gesture is still within the click threshold.
    pub fn on_frame(&mut self) -> Option<PendingGeometry> {
        if self.frame_dirty {
            self.frame_dirty = false;
            self.update_gate();
            if self.passed_threshold {
                self.pending = Some(self.candidate());
            }
        }
        self.pending
    }

    /// The overlay from the last applied frame, if any.
    pub fn pending(&self) -> Option<PendingGeometry> {
        self.pending
    }

    /// Pointer-up, and also the path for lost pointer capture: both end the
    /// gesture the same way.
    pub fn release(mut self) -> DragOutcome {
        self.update_gate();
        if !self.passed_threshold {
            return DragOutcome::Click;
        }
        DragOutcome::Commit {
            target: self.target,
            geometry: self.candidate().committed(),
        }
    }

    // The gate is sticky: once a frame saw the pointer out past the
    // threshold, returning near the origin stays a drag.
    fn update_gate(&mut self) {
        if !self.passed_threshold {
            self.passed_threshold = (self.latest - self.origin).hypot() > DRAG_THRESHOLD_PX;
        }
    }

    fn candidate(&self) -> GeometrySnapshot {
        let delta = self.viewport.to_model_delta(self.latest - self.origin);
        match self.mode {
            DragMode::Move => GeometrySnapshot {
                x: snap_to_zero(self.snapshot.x + delta.x),
                y: snap_to_zero(self.snapshot.y + delta.y),
                size: self.snapshot.size,
            },
            DragMode::Resize => GeometrySnapshot {
                x: self.snapshot.x,
                y: self.snapshot.y,
                size: match self.snapshot.size {
                    SizeSnapshot::Box { w, h } => SizeSnapshot::Box {
                        w: (w + delta.x).max(MIN_BOX_PX),
                        h: (h + delta.y).max(MIN_BOX_PX),
                    },
                    SizeSnapshot::FontPx(px) => {
                        SizeSnapshot::FontPx((px + delta.y).max(MIN_TEXT_WIDGET_SIZE))
                    }
                },
            },
        }
    }
}
