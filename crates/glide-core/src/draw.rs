//! Draw commands handed to the host compositor.
//!
//! Widgets never rasterize. They describe what to draw as a tree of shapes,
//! transforms and opacity groups; the host decides how to get it on screen.

use crate::widget::Canvas;
use crate::{Color, CornerRadius, Point, Rect};
use serde::{Deserialize, Serialize};

/// Stroke style for outlined shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Fill and stroke of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    /// Fill color (None = no fill)
    pub fill: Option<Color>,
    /// Stroke style (None = no stroke)
    pub stroke: Option<StrokeStyle>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::WHITE),
            stroke: None,
        }
    }
}

impl BoxStyle {
    /// Create a box with only fill color.
    #[must_use]
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Add a stroke to the box.
    #[must_use]
    pub const fn with_stroke(mut self, style: StrokeStyle) -> Self {
        self.stroke = Some(style);
        self
    }
}

/// 2D transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Matrix elements [a, b, c, d, e, f]
    /// | a c e |
    /// | b d f |
    /// | 0 0 1 |
    pub matrix: [f32; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// Identity transformation.
    pub const IDENTITY: Self = Self {
        matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Create a translation transform.
    #[must_use]
    pub const fn translate(x: f32, y: f32) -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    /// Create a scale transform.
    #[must_use]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            matrix: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Scale around `origin` instead of the coordinate origin.
    #[must_use]
    pub fn scale_about(sx: f32, sy: f32, origin: Point) -> Self {
        Self::translate(-origin.x, -origin.y)
            .then(&Self::scale(sx, sy))
            .then(&Self::translate(origin.x, origin.y))
    }

    /// Chain transforms: first apply self, then apply other.
    ///
    /// For point p: `a.then(b).apply(p)` == `b.apply(a.apply(p))`
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        // For "first self, then other" semantics: result = other * self
        let a = other.matrix;
        let b = self.matrix;
        Self {
            matrix: [
                a[0] * b[0] + a[2] * b[1],
                a[1] * b[0] + a[3] * b[1],
                a[0] * b[2] + a[2] * b[3],
                a[1] * b[2] + a[3] * b[3],
                a[0] * b[4] + a[2] * b[5] + a[4],
                a[1] * b[4] + a[3] * b[5] + a[5],
            ],
        }
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(&self, point: Point) -> Point {
        let m = self.matrix;
        Point::new(
            m[0] * point.x + m[2] * point.y + m[4],
            m[1] * point.x + m[3] * point.y + m[5],
        )
    }

    /// Check for the identity matrix.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.matrix == Self::IDENTITY.matrix
    }
}

/// Drawing primitive - all rendering reduces to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Draw a (rounded) rectangle
    Rect {
        /// Node name, for hosts and tests that look shapes up
        name: String,
        /// Rectangle bounds
        bounds: Rect,
        /// Corner radius
        radius: CornerRadius,
        /// Box style
        style: BoxStyle,
    },

    /// Group of commands with transform
    Group {
        /// Child commands
        children: Vec<DrawCommand>,
        /// Transform to apply
        transform: Transform2D,
    },

    /// Apply opacity to a group of commands
    Opacity {
        /// Alpha value (0.0 - 1.0)
        alpha: f32,
        /// Child commands
        children: Vec<DrawCommand>,
    },
}

impl DrawCommand {
    /// Create a named rounded rectangle.
    #[must_use]
    pub fn rect(name: impl Into<String>, bounds: Rect, radius: f32, style: BoxStyle) -> Self {
        Self::Rect {
            name: name.into(),
            bounds,
            radius: CornerRadius::uniform(radius),
            style,
        }
    }

    /// Wrap in a group with transform.
    #[must_use]
    pub fn with_transform(self, transform: Transform2D) -> Self {
        Self::Group {
            children: vec![self],
            transform,
        }
    }

    /// Find the first rectangle with the given name, depth first.
    #[must_use]
    pub fn find(&self, target: &str) -> Option<&Self> {
        match self {
            Self::Rect { name, .. } if name == target => Some(self),
            Self::Rect { .. } => None,
            Self::Group { children, .. } | Self::Opacity { children, .. } => {
                children.iter().find_map(|c| c.find(target))
            }
        }
    }

    /// Number of shapes in the tree.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        match self {
            Self::Rect { .. } => 1,
            Self::Group { children, .. } | Self::Opacity { children, .. } => {
                children.iter().map(Self::shape_count).sum()
            }
        }
    }

    /// Feed this tree to a canvas.
    pub fn replay(&self, canvas: &mut dyn Canvas) {
        match self {
            Self::Rect {
                name,
                bounds,
                radius,
                style,
            } => canvas.draw_rect(name, *bounds, *radius, style),
            Self::Group {
                children,
                transform,
            } => {
                canvas.push_transform(*transform);
                for child in children {
                    child.replay(canvas);
                }
                canvas.pop_transform();
            }
            Self::Opacity { alpha, children } => {
                canvas.push_opacity(*alpha);
                for child in children {
                    child.replay(canvas);
                }
                canvas.pop_opacity();
            }
        }
    }

    /// Serialize the tree for an out-of-process compositor.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
