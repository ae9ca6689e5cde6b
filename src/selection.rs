/// Which entity is the active edit target. At most one at a time; selecting
/// anything replaces whatever was selected before.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Selection {
    #[default]
    None,
    Widget(usize),
    Item {
        group: usize,
        item: usize,
    },
}

impl Selection {
    pub fn is_none(self) -> bool {
        self == Selection::None
    }
}

/// What the shell must redraw after an operation. Operations report this
/// explicitly instead of poking the presentation layer themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct Refresh {
    /// Re-run composition: the scene (content, highlight, handles) changed.
    pub scene: bool,
    /// Rebuild the property form: the selected entity or its fields changed.
    pub form: bool,
}

impl Refresh {
    pub const NONE: Refresh = Refresh {
        scene: false,
        form: false,
    };
    pub const SCENE: Refresh = Refresh {
        scene: true,
        form: false,
    };
    pub const ALL: Refresh = Refresh {
        scene: true,
        form: true,
    };

    pub fn merge(self, other: Refresh) -> Refresh {
        Refresh {
            scene: self.scene || other.scene,
            form: self.form || other.form,
        }
    }
}

/// Tracks the single active selection and keeps its indices honest while
/// the session reorders or deletes entities underneath it.
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    current: Selection,
}

impl SelectionController {
    pub fn current(&self) -> Selection {
        self.current
    }

    /// Every transition refreshes both the scene (highlight, handle) and the
    /// property form, including re-selecting the same entity.
    pub fn select_item(&mut self, group: usize, item: usize) -> Refresh {
        self.current = Selection::Item { group, item };
        Refresh::ALL
    }

    pub fn select_widget(&mut self, index: usize) -> Refresh {
        self.current = Selection::Widget(index);
        Refresh::ALL
    }

    pub fn clear(&mut self) -> Refresh {
        self.current = Selection::None;
        Refresh::ALL
    }

    /// Fix up indices after an item was removed. Deleting the selected item
    /// clears the selection.
    pub fn note_item_removed(&mut self, group: usize, item: usize) {
        if let Selection::Item {
            group: sg,
            item: si,
        } = self.current
        {
            if sg == group {
                if si == item {
                    self.current = Selection::None;
                } else if si > item {
                    self.current = Selection::Item {
                        group: sg,
                        item: si - 1,
                    };
                }
            }
        }
    }

    pub fn note_widget_removed(&mut self, index: usize) {
        if let Selection::Widget(si) = self.current {
            if si == index {
                self.current = Selection::None;
            } else if si > index {
                self.current = Selection::Widget(si - 1);
            }
        }
    }

    /// Fix up after a group was removed; a selection inside it is cleared.
    pub fn note_group_removed(&mut self, group: usize) {
        if let Selection::Item { group: sg, item } = self.current {
            if sg == group {
                self.current = Selection::None;
            } else if sg > group {
                self.current = Selection::Item {
                    group: sg - 1,
                    item,
                };
            }
        }
    }

    /// Fix up after two adjacent groups swapped positions.
    pub fn note_groups_swapped(&mut self, a: usize, b: usize) {
        if let Selection::Item { group, item } = self.current {
            let group = if group == a {
                b
            } else if group == b {
                a
            } else {
                group
            };
            self.current = Selection::Item { group, item };
        }
    }
}
