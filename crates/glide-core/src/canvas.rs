//! Canvas implementations for rendering.

use crate::draw::{BoxStyle, DrawCommand, Transform2D};
use crate::widget::Canvas;
use crate::{CornerRadius, Rect};

#[derive(Debug)]
enum Layer {
    Transform(Transform2D),
    Opacity(f32),
}

#[derive(Debug)]
struct Frame {
    layer: Layer,
    children: Vec<DrawCommand>,
}

/// A Canvas implementation that records draw operations as a
/// `DrawCommand` tree.
///
/// `push_*`/`pop_*` pairs become `Group`/`Opacity` nodes, so a tree that is
/// replayed into a recording canvas comes back out unchanged. Useful for:
/// - Testing (verify what was painted)
/// - Serialization (send commands to an out-of-process compositor)
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    open: Vec<Frame>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded top-level draw commands.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the canvas.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        self.open.clear();
        std::mem::take(&mut self.commands)
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of layers pushed and not yet popped.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Composition of every open transform layer.
    #[must_use]
    pub fn current_transform(&self) -> Transform2D {
        self.open
            .iter()
            .rev()
            .filter_map(|f| match f.layer {
                Layer::Transform(t) => Some(t),
                Layer::Opacity(_) => None,
            })
            .fold(Transform2D::IDENTITY, |acc, t| acc.then(&t))
    }

    fn emit(&mut self, command: DrawCommand) {
        match self.open.last_mut() {
            Some(frame) => frame.children.push(command),
            None => self.commands.push(command),
        }
    }

    fn close(&mut self, expect_opacity: bool) {
        let Some(frame) = self.open.pop() else {
            log::warn!("pop without matching push on recording canvas");
            return;
        };
        let command = match frame.layer {
            Layer::Transform(transform) => DrawCommand::Group {
                children: frame.children,
                transform,
            },
            Layer::Opacity(alpha) => DrawCommand::Opacity {
                alpha,
                children: frame.children,
            },
        };
        if expect_opacity != matches!(command, DrawCommand::Opacity { .. }) {
            log::warn!("mismatched pop on recording canvas");
        }
        self.emit(command);
    }
}

impl Canvas for RecordingCanvas {
    fn draw_rect(&mut self, name: &str, rect: Rect, radius: CornerRadius, style: &BoxStyle) {
        self.emit(DrawCommand::Rect {
            name: name.to_string(),
            bounds: rect,
            radius,
            style: *style,
        });
    }

    fn push_transform(&mut self, transform: Transform2D) {
        self.open.push(Frame {
            layer: Layer::Transform(transform),
            children: Vec::new(),
        });
    }

    fn pop_transform(&mut self) {
        self.close(false);
    }

    fn push_opacity(&mut self, alpha: f32) {
        self.open.push(Frame {
            layer: Layer::Opacity(alpha),
            children: Vec::new(),
        });
    }

    fn pop_opacity(&mut self) {
        self.close(true);
    }
}
