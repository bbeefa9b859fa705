//! Core types and traits for Glide widgets.
//!
//! This crate provides the foundation the controls in `glide-widgets` are
//! built on:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`], [`Thickness`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`Constraints`]
//! - Input: [`Event`]
//! - Rendering boundary: [`Widget`], [`Canvas`], [`DrawCommand`]
//! - Animation: [`AnimationChannel`] with [`Handoff`] policies
//! - Derived geometry: the [`convert`] module

mod animation;
mod canvas;
mod color;
mod constraints;
pub mod convert;
mod draw;
mod event;
mod geometry;
pub mod widget;

pub use animation::{
    AnimationChannel, AnimationController, AnimationSpec, Easing, Handoff, Priority,
};
pub use canvas::RecordingCanvas;
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use convert::{ConvertError, Value, ValueConverter};
pub use draw::{BoxStyle, DrawCommand, StrokeStyle, Transform2D};
pub use event::{Event, Key, MouseButton};
pub use geometry::{CornerRadius, Point, Rect, Size, Thickness};
pub use widget::{AccessibleRole, Canvas, LayoutResult, TypeId, Widget};
