//! Builder-style construction of menu documents, used by tests and the CLI
//! starter path. Builders validate on `build()` so invalid documents are
//! caught at the construction site.

use crate::{
    color::Color,
    error::{MenuetError, MenuetResult},
    geometry::ItemGeometry,
    model::{
        Background, CanvasSizing, Group, GroupKind, Item, Menu, Widget, WidgetKind,
        default_widget_text_size,
    },
};

pub struct MenuBuilder {
    menu: Menu,
}

impl MenuBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            menu: Menu::with_defaults(id, name),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.menu.title = title.into();
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.menu.subtitle = subtitle.into();
        self
    }

    pub fn sizing(mut self, sizing: CanvasSizing) -> Self {
        self.menu.layout.sizing = sizing;
        self
    }

    pub fn columns(mut self, columns: u32) -> Self {
        self.menu.layout.columns = columns;
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.menu.background = Some(background);
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.menu.groups.push(group);
        self
    }

    pub fn text_widget(mut self, x: i32, y: i32, text: impl Into<String>) -> Self {
        self.menu.widgets.push(Widget {
            x,
            y,
            kind: WidgetKind::Text {
                text: text.into(),
                size: default_widget_text_size(),
                color: None,
                font: None,
            },
        });
        self
    }

    pub fn image_widget(
        mut self,
        x: i32,
        y: i32,
        file: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        self.menu.widgets.push(Widget {
            x,
            y,
            kind: WidgetKind::Image {
                file: file.into(),
                width,
                height,
            },
        });
        self
    }

    pub fn build(self) -> MenuetResult<Menu> {
        if self.menu.id.trim().is_empty() {
            return Err(MenuetError::validation("menu id must be non-empty"));
        }
        self.menu.validate()?;
        Ok(self.menu)
    }
}

pub struct GroupBuilder {
    group: Group,
}

impl GroupBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            group: Group {
                title: title.into(),
                ..Group::default()
            },
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.group.subtitle = Some(subtitle.into());
        self
    }

    pub fn kind(mut self, kind: GroupKind) -> Self {
        self.group.kind = kind;
        self
    }

    /// Turn the group into a text-only block with the given literal content.
    pub fn text_block(mut self, text: impl Into<String>) -> Self {
        self.group.kind = GroupKind::TextOnly;
        self.group.text = text.into();
        self
    }

    pub fn columns(mut self, columns: u32) -> Self {
        self.group.style.columns = Some(columns);
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.group.items.push(item);
        self
    }

    pub fn build(self) -> MenuetResult<Group> {
        if self.group.title.trim().is_empty() {
            return Err(MenuetError::validation("group title must be non-empty"));
        }
        Ok(self.group)
    }
}

pub struct ItemBuilder {
    item: Item,
}

impl ItemBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            item: Item {
                name: name.into(),
                ..Item::default()
            },
        }
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.item.desc = desc.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.item.icon = Some(icon.into());
        self
    }

    pub fn name_color(mut self, color: Color) -> Self {
        self.item.style.name.color = Some(color);
        self
    }

    /// Explicit geometry for items destined for a free-form group. Sizes
    /// below the minimum are rejected here rather than silently clamped.
    pub fn at(mut self, x: i32, y: i32, w: u32, h: u32) -> MenuetResult<Self> {
        self.item.geometry = Some(ItemGeometry::new(x, y, w, h)?);
        Ok(self)
    }

    pub fn build(self) -> MenuetResult<Item> {
        if self.item.name.trim().is_empty() {
            return Err(MenuetError::validation("item name must be non-empty"));
        }
        Ok(self.item)
    }
}
