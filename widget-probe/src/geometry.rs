use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the rounded square the window manager draws.
pub const SPACE_WIDGET_SIZE: f64 = 44.0;

/// Width of the column the widget square is centered in.
pub const SPACE_WIDGET_COLUMN_WIDTH: f64 = 60.0;

/// A point in global screen coordinates.
///
/// No bounds checking happens here; off-screen points are handed to the OS as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for ScreenPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// On-screen rectangle of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WidgetGeometry {
    /// Layout of the space widget on a display of the given height: a square
    /// centered in the leftmost column, vertically centered on the display.
    pub fn space_widget(display_height: f64) -> Self {
        Self {
            x: (SPACE_WIDGET_COLUMN_WIDTH - SPACE_WIDGET_SIZE) / 2.0,
            y: (display_height - SPACE_WIDGET_SIZE) / 2.0,
            width: SPACE_WIDGET_SIZE,
            height: SPACE_WIDGET_SIZE,
        }
    }

    pub fn center(&self) -> ScreenPoint {
        let center_x = self.x + self.width / 2.0;
        let center_y = self.y + self.height / 2.0;
        ScreenPoint::new(center_x.round() as i32, center_y.round() as i32)
    }
}
