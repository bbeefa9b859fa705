//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle driven by the host:
//!
//! 1. **Measure**: Compute intrinsic size given constraints
//! 2. **Layout**: Position self within allocated bounds
//! 3. **Paint**: Generate draw commands for rendering
//!
//! Between frames the host feeds input through [`Widget::event`] and
//! advances running animations through [`Widget::animate`]. Widgets never
//! spawn threads or timers of their own.
//!
//! # Examples
//!
//! ```
//! use glide_core::{TypeId, Transform2D};
//!
//! assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
//!
//! let nudge = Transform2D::translate(10.0, 0.0);
//! assert!(!nudge.is_identity());
//! ```

use crate::constraints::Constraints;
use crate::draw::{BoxStyle, Transform2D};
use crate::event::Event;
use crate::geometry::{CornerRadius, Rect, Size};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Type identifier for widget types (used for diffing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait that all UI elements implement.
pub trait Widget: Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute intrinsic size constraints.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Position the widget within allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw commands for rendering.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle input events.
    ///
    /// Returns a message for the host when the event changed widget state.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Advance running animations by `dt` seconds.
    ///
    /// Returns `true` while anything is still animating, so the host knows
    /// to schedule another frame.
    fn animate(&mut self, _dt: f64) -> bool {
        false
    }

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 0.0, 0.0)
    }
}

/// Canvas trait for paint operations.
///
/// This is a minimal abstraction over the host compositor.
pub trait Canvas {
    /// Draw a rectangle with rounded corners, filled and/or stroked.
    fn draw_rect(&mut self, name: &str, rect: Rect, radius: CornerRadius, style: &BoxStyle);

    /// Push a transform.
    fn push_transform(&mut self, transform: Transform2D);

    /// Pop the transform.
    fn pop_transform(&mut self);

    /// Push an opacity layer.
    fn push_opacity(&mut self, alpha: f32);

    /// Pop the opacity layer.
    fn pop_opacity(&mut self);
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// On/off switch
    Switch,
}
