use crate::model::{NewMember, Position};
use serde::{Deserialize, Serialize};

/// Template dragged from the palette onto the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteItem {
    pub name: String,
    pub role: String,
}

impl PaletteItem {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        PaletteItem {
            name: name.into(),
            role: role.into(),
        }
    }
    pub fn place_at(&self, position: Position) -> NewMember {
        NewMember::new(self.name.clone(), self.role.clone(), position)
    }
}

pub fn default_palette() -> Vec<PaletteItem> {
    vec![
        PaletteItem::new("New Developer", "Developer"),
        PaletteItem::new("New Manager", "Manager"),
        PaletteItem::new("New Team Member", "Team Member"),
    ]
}

/// Canvas pan/zoom transform: canvas point `p` is drawn at `p * zoom + (x, y)`
/// relative to the canvas element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
    }

    /// `origin` is the canvas element's top-left in the pointer's coordinate space.
    pub fn screen_to_canvas(&self, pointer: Position, origin: Position) -> Option<Position> {
        if !self.is_valid() || !pointer.is_finite() || !origin.is_finite() {
            return None;
        }
        Some(Position::new(
            (pointer.x - origin.x - self.x) / self.zoom,
            (pointer.y - origin.y - self.y) / self.zoom,
        ))
    }

    pub fn canvas_to_screen(&self, point: Position, origin: Position) -> Position {
        Position::new(
            point.x * self.zoom + self.x + origin.x,
            point.y * self.zoom + self.y + origin.y,
        )
    }
}

/// Where a palette item was released.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteDrop {
    pub pointer: Position,
    #[serde(default)]
    pub origin: Position,
    #[serde(default)]
    pub viewport: Viewport,
}

impl PaletteDrop {
    pub fn canvas_position(&self) -> Option<Position> {
        self.viewport.screen_to_canvas(self.pointer, self.origin)
    }
}
