//! Visual template of the toggle switch.
//!
//! The template is a small tree of named parts whose sizes are bindings
//! over the control's properties rather than literal numbers. It is built
//! once per process and shared by every switch instance; per-instance data
//! arrives through [`TemplateProps`], per-state overrides through a
//! [`ResolvedStyle`].

use super::motion::ThumbTransform;
use super::style::{parts, switch_rules, ResolvedStyle, StyleRule};
use super::{THUMB_RADIUS_RATIO, TRACK_RADIUS_RATIO};
use glide_core::convert::{self, BorderRadius, Conversion, ConvertError, Value};
use glide_core::{
    BoxStyle, Color, DrawCommand, Point, Rect, Size, StrokeStyle, Thickness, Transform2D,
};
use std::sync::OnceLock;

/// Thumb diameter as a ratio of the switch height.
pub const THUMB_DIAMETER_RATIO: f64 = THUMB_RADIUS_RATIO * 2.0;

/// Gap between thumb and track edge, as a ratio of the switch height.
pub const THUMB_MARGIN_RATIO: f64 = TRACK_RADIUS_RATIO - THUMB_RADIUS_RATIO;

/// Control property a binding reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Track width
    SwitchWidth,
    /// Track height
    SwitchHeight,
    /// Outline thickness
    BorderThickness,
    /// Inset around the track
    Padding,
}

/// How a part's dimension is derived.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Literal number
    Fixed(f64),
    /// Property passed through unchanged
    Property(Source),
    /// Property fed through a converter with a constant parameter
    Converted {
        /// Property read
        source: Source,
        /// Converter applied
        conversion: Conversion,
        /// Converter parameter
        parameter: f64,
    },
    /// Outline radius over the switch height and border thickness
    BorderRadius {
        /// Height ratio
        factor: f64,
    },
}

impl Binding {
    /// Shorthand for [`Binding::Converted`].
    #[must_use]
    pub const fn converted(source: Source, conversion: Conversion, parameter: f64) -> Self {
        Self::Converted {
            source,
            conversion,
            parameter,
        }
    }

    /// Evaluate against the current properties.
    pub fn evaluate(&self, props: &TemplateProps) -> convert::Result<Value> {
        match self {
            Self::Fixed(n) => Ok(Value::Number(*n)),
            Self::Property(source) => Ok(props.read(*source)),
            Self::Converted {
                source,
                conversion,
                parameter,
            } => conversion
                .converter()
                .convert(&props.read(*source), &Value::Number(*parameter)),
            Self::BorderRadius { factor } => BorderRadius.convert(
                &props.read(Source::SwitchHeight),
                &props.read(Source::BorderThickness),
                &Value::Number(*factor),
            ),
        }
    }

    /// Evaluate, requiring a finite number.
    pub fn number(&self, props: &TemplateProps) -> convert::Result<f64> {
        let value = self.evaluate(props)?;
        match value.as_number() {
            Some(n) if n.is_finite() => Ok(n),
            _ => Err(mismatch("number", &value)),
        }
    }

    /// Evaluate, requiring a thickness.
    pub fn thickness(&self, props: &TemplateProps) -> convert::Result<Thickness> {
        let value = self.evaluate(props)?;
        value.as_thickness().ok_or_else(|| mismatch("thickness", &value))
    }
}

fn mismatch(role: &'static str, got: &Value) -> ConvertError {
    ConvertError::NotNumeric {
        converter: "binding",
        role,
        got: format!("{got:?}"),
    }
}

/// Which control color a part is painted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    /// Thumb color
    Foreground,
    /// Track color while off
    Background,
    /// Track color while on
    Highlight,
    /// Outline color
    BorderBrush,
    /// A color independent of the control
    Fixed(Color),
}

/// Horizontal placement inside the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Fill the parent, or center when a width is set
    #[default]
    Stretch,
    /// Hug the left edge
    Left,
    /// Hug the right edge
    Right,
}

/// Per-instance values the template reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateProps {
    /// Track width
    pub switch_width: f64,
    /// Track height
    pub switch_height: f64,
    /// Outline thickness
    pub border_thickness: Thickness,
    /// Inset around the track
    pub padding: Thickness,
    /// Thumb color
    pub foreground: Color,
    /// Track color while off
    pub background: Color,
    /// Track color while on
    pub highlight: Color,
    /// Outline color
    pub border_brush: Color,
}

impl TemplateProps {
    fn read(&self, source: Source) -> Value {
        match source {
            Source::SwitchWidth => Value::Number(self.switch_width),
            Source::SwitchHeight => Value::Number(self.switch_height),
            Source::BorderThickness => Value::Thickness(self.border_thickness),
            Source::Padding => Value::Thickness(self.padding),
        }
    }

    fn paint(&self, brush: Brush) -> Color {
        match brush {
            Brush::Foreground => self.foreground,
            Brush::Background => self.background,
            Brush::Highlight => self.highlight,
            Brush::BorderBrush => self.border_brush,
            Brush::Fixed(color) => color,
        }
    }
}

/// Placement of a node inside its parent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placement {
    /// Explicit width; `None` stretches
    pub width: Option<Binding>,
    /// Explicit height; `None` stretches
    pub height: Option<Binding>,
    /// Thickness-valued outer margin
    pub margin: Option<Binding>,
    /// Horizontal alignment
    pub h_align: HAlign,
}

/// Outline of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    /// Stroke color
    pub brush: Brush,
    /// Number-valued stroke thickness
    pub thickness: Binding,
}

/// A drawable part.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    /// Part name, also the name of the emitted draw command
    pub name: &'static str,
    /// Where the shape goes
    pub placement: Placement,
    /// Number-valued corner radius
    pub corner_radius: Binding,
    /// Fill
    pub fill: Brush,
    /// Optional outline
    pub outline: Option<Outline>,
    /// Drawn unless a style hides it
    pub visible: bool,
    /// Receives the thumb transform
    pub animated: bool,
}

/// Template tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Layout-only container; children overlap
    Panel {
        /// Panel name
        name: &'static str,
        /// Where the panel goes
        placement: Placement,
        /// Children, painted in order
        children: Vec<TemplateNode>,
    },
    /// A shape
    Shape(ShapeNode),
}

/// The shared switch template: part tree plus style rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchTemplate {
    /// Root of the part tree
    pub root: TemplateNode,
    /// Rules resolved against each visual state
    pub rules: Vec<StyleRule>,
}

impl SwitchTemplate {
    /// The process-wide template instance.
    pub fn shared() -> &'static Self {
        static TEMPLATE: OnceLock<SwitchTemplate> = OnceLock::new();
        TEMPLATE.get_or_init(|| {
            log::debug!("building toggle switch template");
            Self::build()
        })
    }

    fn build() -> Self {
        use Conversion::{AverageThickness, CornerRadius, Multiply, ThicknessFromScalar};
        use Source::{BorderThickness, SwitchHeight};

        let track_radius = Binding::converted(SwitchHeight, CornerRadius, TRACK_RADIUS_RATIO);
        let thumb_size = Binding::converted(SwitchHeight, Multiply, THUMB_DIAMETER_RATIO);

        let track = |name, fill, visible| {
            TemplateNode::Shape(ShapeNode {
                name,
                placement: Placement::default(),
                corner_radius: track_radius.clone(),
                fill,
                outline: None,
                visible,
                animated: false,
            })
        };

        let switch_grid = TemplateNode::Panel {
            name: "switch_grid",
            placement: Placement {
                width: Some(Binding::Property(Source::SwitchWidth)),
                height: Some(Binding::Property(SwitchHeight)),
                margin: Some(Binding::Property(Source::Padding)),
                h_align: HAlign::Stretch,
            },
            children: vec![
                track(parts::BACKGROUND, Brush::Background, true),
                track(parts::HIGHLIGHT, Brush::Highlight, false),
                TemplateNode::Shape(ShapeNode {
                    name: parts::BORDER,
                    placement: Placement::default(),
                    corner_radius: Binding::BorderRadius {
                        factor: TRACK_RADIUS_RATIO,
                    },
                    fill: Brush::Fixed(Color::TRANSPARENT),
                    outline: Some(Outline {
                        brush: Brush::BorderBrush,
                        thickness: Binding::converted(BorderThickness, AverageThickness, 1.0),
                    }),
                    visible: true,
                    animated: false,
                }),
                TemplateNode::Shape(ShapeNode {
                    name: parts::THUMB,
                    placement: Placement {
                        width: Some(thumb_size.clone()),
                        height: Some(thumb_size),
                        margin: Some(Binding::converted(
                            SwitchHeight,
                            ThicknessFromScalar,
                            THUMB_MARGIN_RATIO,
                        )),
                        h_align: HAlign::Left,
                    },
                    corner_radius: Binding::converted(
                        SwitchHeight,
                        CornerRadius,
                        THUMB_RADIUS_RATIO,
                    ),
                    fill: Brush::Foreground,
                    outline: None,
                    visible: true,
                    animated: true,
                }),
            ],
        };

        let root = TemplateNode::Panel {
            name: "root",
            placement: Placement::default(),
            children: vec![
                TemplateNode::Shape(ShapeNode {
                    name: parts::HIT_AREA,
                    placement: Placement::default(),
                    corner_radius: Binding::Fixed(0.0),
                    fill: Brush::Fixed(Color::TRANSPARENT),
                    outline: None,
                    visible: true,
                    animated: false,
                }),
                switch_grid,
            ],
        };

        Self {
            root,
            rules: switch_rules(),
        }
    }

    /// Lay the template out in `bounds` and emit its shape tree.
    ///
    /// The tree is wrapped in a single opacity node carrying the control
    /// opacity, so hosts always find the same root shape.
    pub fn render(
        &self,
        bounds: Rect,
        props: &TemplateProps,
        style: &ResolvedStyle,
        thumb: ThumbTransform,
    ) -> convert::Result<DrawCommand> {
        let mut children = Vec::new();
        let ctx = RenderContext { props, style, thumb };
        ctx.node(&self.root, bounds, &mut children)?;
        Ok(DrawCommand::Opacity {
            alpha: style.opacity() as f32,
            children,
        })
    }
}

struct RenderContext<'a> {
    props: &'a TemplateProps,
    style: &'a ResolvedStyle,
    thumb: ThumbTransform,
}

impl RenderContext<'_> {
    fn node(
        &self,
        node: &TemplateNode,
        parent: Rect,
        out: &mut Vec<DrawCommand>,
    ) -> convert::Result<()> {
        match node {
            TemplateNode::Panel {
                placement,
                children,
                ..
            } => {
                let rect = self.place(placement, None, None, parent)?;
                for child in children {
                    self.node(child, rect, out)?;
                }
                Ok(())
            }
            TemplateNode::Shape(shape) => {
                if let Some(cmd) = self.shape(shape, parent)? {
                    out.push(cmd);
                }
                Ok(())
            }
        }
    }

    fn shape(&self, shape: &ShapeNode, parent: Rect) -> convert::Result<Option<DrawCommand>> {
        if !self.style.visible(shape.name).unwrap_or(shape.visible) {
            return Ok(None);
        }

        // A style override of the stroke feeds the radius binding as well.
        let stroke_width = match (&shape.outline, self.style.stroke_thickness(shape.name)) {
            (Some(_), Some(width)) => Some(width),
            (Some(outline), None) => Some(outline.thickness.number(self.props)?),
            (None, _) => None,
        };
        let props = TemplateProps {
            border_thickness: stroke_width.map_or(self.props.border_thickness, Thickness::uniform),
            ..*self.props
        };

        let mut rect = self.place(
            &shape.placement,
            self.style.width(shape.name),
            self.style.alignment(shape.name),
            parent,
        )?;
        let radius = shape.corner_radius.number(&props)?;

        let fill = self.style.fill(shape.name).unwrap_or(shape.fill);
        let mut style = BoxStyle::fill(props.paint(fill));
        if let (Some(outline), Some(width)) = (&shape.outline, stroke_width) {
            if width > 0.0 {
                // Strokes are centered on the path; keep them inside the part.
                rect = rect.deflate(Thickness::uniform(width / 2.0));
                style = style.with_stroke(StrokeStyle {
                    color: props.paint(outline.brush),
                    width: width as f32,
                });
            }
        }

        if !shape.animated {
            return Ok(Some(DrawCommand::rect(shape.name, rect, radius.max(0.0) as f32, style)));
        }

        // Thumb translation is measured from the track center, so the rest
        // position is pushed away from the anchored edge by half the travel.
        let travel = travel_within(parent) as f32;
        let offset = match self.style.alignment(shape.name).unwrap_or(shape.placement.h_align) {
            HAlign::Left => travel,
            HAlign::Right => -travel,
            HAlign::Stretch => 0.0,
        };
        rect.x += offset;
        let scale = self.thumb.scale as f32;
        let transform = Transform2D::scale_about(scale, scale, rect.center())
            .then(&Transform2D::translate(self.thumb.translate_x as f32, 0.0));
        Ok(Some(
            DrawCommand::rect(shape.name, rect, radius.max(0.0) as f32, style)
                .with_transform(transform),
        ))
    }

    fn place(
        &self,
        placement: &Placement,
        width_override: Option<&Binding>,
        align_override: Option<HAlign>,
        parent: Rect,
    ) -> convert::Result<Rect> {
        let margin = match &placement.margin {
            Some(binding) => binding.thickness(self.props)?,
            None => Thickness::ZERO,
        };
        let area = parent.deflate(margin);

        let width = match width_override.or(placement.width.as_ref()) {
            Some(binding) => (binding.number(self.props)?.max(0.0) as f32).min(area.width),
            None => area.width,
        };
        let height = match &placement.height {
            Some(binding) => (binding.number(self.props)?.max(0.0) as f32).min(area.height),
            None => area.height,
        };

        let x = match align_override.unwrap_or(placement.h_align) {
            HAlign::Stretch => area.x + (area.width - width) / 2.0,
            HAlign::Left => area.x,
            HAlign::Right => area.x + area.width - width,
        };
        let center = Point::new(x + width / 2.0, area.y + area.height / 2.0);
        Ok(Rect::centered(center, Size::new(width, height)))
    }
}

/// Half the distance the thumb travels between its two ends, for a track
/// occupying `track`.
#[must_use]
pub fn travel_within(track: Rect) -> f64 {
    (f64::from(track.width - track.height) / 2.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toggle_switch::style::{resolve_visual_state, VisualState};

    fn props(width: f64, height: f64) -> TemplateProps {
        TemplateProps {
            switch_width: width,
            switch_height: height,
            border_thickness: Thickness::uniform(1.0),
            padding: Thickness::ZERO,
            foreground: Color::from_rgba8(0xa0, 0xa0, 0xa0, 0xff),
            background: Color::TRANSPARENT,
            highlight: Color::from_rgba8(0x46, 0xa0, 0xff, 0xcc),
            border_brush: Color::from_rgba8(0xb4, 0xb4, 0xb4, 0xff),
        }
    }

    const REST: ThumbTransform = ThumbTransform {
        scale: 1.0,
        translate_x: 0.0,
    };

    fn render(state: VisualState, thumb: ThumbTransform) -> DrawCommand {
        SwitchTemplate::shared()
            .render(
                Rect::new(0.0, 0.0, 40.0, 20.0),
                &props(40.0, 20.0),
                &resolve_visual_state(state),
                thumb,
            )
            .unwrap()
    }

    fn rect_of(tree: &DrawCommand, name: &str) -> (Rect, f32, BoxStyle) {
        match tree.find(name) {
            Some(DrawCommand::Rect {
                bounds,
                radius,
                style,
                ..
            }) => (*bounds, radius.top_left, *style),
            other => panic!("{name} not rendered: {other:?}"),
        }
    }

    // ===== Template Structure Tests =====

    #[test]
    fn test_shared_is_singleton() {
        assert!(std::ptr::eq(SwitchTemplate::shared(), SwitchTemplate::shared()));
    }

    #[test]
    fn test_idle_tree_parts() {
        let tree = render(VisualState::IDLE, REST);
        assert!(tree.find(parts::HIT_AREA).is_some());
        assert!(tree.find(parts::BACKGROUND).is_some());
        assert!(tree.find(parts::HIGHLIGHT).is_none());
        assert!(tree.find(parts::BORDER).is_some());
        assert!(tree.find(parts::THUMB).is_some());
        assert_eq!(tree.shape_count(), 4);
    }

    #[test]
    fn test_on_swaps_track_fill() {
        let tree = render(
            VisualState {
                is_on: true,
                ..VisualState::IDLE
            },
            REST,
        );
        assert!(tree.find(parts::BACKGROUND).is_none());
        let (_, _, style) = rect_of(&tree, parts::HIGHLIGHT);
        assert_eq!(style.fill, Some(Color::from_rgba8(0x46, 0xa0, 0xff, 0xcc)));
        let (_, radius, style) = rect_of(&tree, parts::BORDER);
        assert!(style.stroke.is_none());
        assert_eq!(radius, 10.0);
    }

    // ===== Derived Geometry Tests =====

    #[test]
    fn test_thumb_geometry() {
        let tree = render(VisualState::IDLE, REST);
        let (bounds, radius, style) = rect_of(&tree, parts::THUMB);
        assert_eq!(bounds.width, 15.0);
        assert_eq!(bounds.height, 15.0);
        assert_eq!(radius, 7.5);
        assert_eq!(bounds.center(), Point::new(20.0, 10.0));
        assert_eq!(style.fill, Some(Color::from_rgba8(0xa0, 0xa0, 0xa0, 0xff)));
    }

    #[test]
    fn test_border_outline_inset() {
        let tree = render(VisualState::IDLE, REST);
        let (bounds, radius, style) = rect_of(&tree, parts::BORDER);
        assert_eq!(bounds, Rect::new(0.5, 0.5, 39.0, 19.0));
        assert_eq!(radius, 9.5);
        assert_eq!(style.stroke.map(|s| s.width), Some(1.0));
    }

    #[test]
    fn test_pressed_thumb_grows_from_anchor() {
        let pressed = VisualState {
            pressed: true,
            ..VisualState::IDLE
        };
        let (bounds, _, _) = rect_of(&render(pressed, REST), parts::THUMB);
        assert_eq!(bounds.width, 18.0);
        // Anchored left: left edge stays where the unpressed thumb's was.
        assert_eq!(bounds.x, 12.5);

        let pressed_on = VisualState {
            is_on: true,
            ..pressed
        };
        let (bounds, _, _) = rect_of(&render(pressed_on, REST), parts::THUMB);
        assert_eq!(bounds.x + bounds.width, 27.5);
    }

    #[test]
    fn test_thumb_transform_applied() {
        let thumb = ThumbTransform {
            scale: 0.95,
            translate_x: -10.0,
        };
        let tree = render(VisualState::IDLE, thumb);
        let transform = find_group(&tree).expect("thumb group");
        let center = transform.apply(Point::new(20.0, 10.0));
        assert!((center.x - 10.0).abs() < 1e-5);
        assert!((center.y - 10.0).abs() < 1e-5);
    }

    fn find_group(tree: &DrawCommand) -> Option<Transform2D> {
        match tree {
            DrawCommand::Group { transform, .. } => Some(*transform),
            DrawCommand::Opacity { children, .. } => children.iter().find_map(find_group),
            DrawCommand::Rect { .. } => None,
        }
    }

    #[test]
    fn test_padding_insets_track() {
        let mut p = props(40.0, 20.0);
        p.padding = Thickness::uniform(4.0);
        let tree = SwitchTemplate::shared()
            .render(
                Rect::new(0.0, 0.0, 48.0, 28.0),
                &p,
                &resolve_visual_state(VisualState::IDLE),
                REST,
            )
            .unwrap();
        let (bounds, _, _) = rect_of(&tree, parts::BACKGROUND);
        assert_eq!(bounds, Rect::new(4.0, 4.0, 40.0, 20.0));
        let (hit, _, _) = rect_of(&tree, parts::HIT_AREA);
        assert_eq!(hit, Rect::new(0.0, 0.0, 48.0, 28.0));
    }

    #[test]
    fn test_zero_height_collapses() {
        let tree = SwitchTemplate::shared()
            .render(
                Rect::new(0.0, 0.0, 40.0, 0.0),
                &TemplateProps {
                    border_thickness: Thickness::ZERO,
                    ..props(40.0, 0.0)
                },
                &resolve_visual_state(VisualState::IDLE),
                REST,
            )
            .unwrap();
        let (bounds, radius, _) = rect_of(&tree, parts::THUMB);
        assert_eq!(bounds.width, 0.0);
        assert_eq!(radius, 0.0);
        let (_, radius, _) = rect_of(&tree, parts::BACKGROUND);
        assert_eq!(radius, 0.0);
    }

    #[test]
    fn test_non_finite_property_is_an_error() {
        let err = SwitchTemplate::shared()
            .render(
                Rect::new(0.0, 0.0, 40.0, 20.0),
                &props(40.0, f64::NAN),
                &resolve_visual_state(VisualState::IDLE),
                REST,
            )
            .unwrap_err();
        assert!(matches!(err, ConvertError::NotNumeric { .. }));
    }

    #[test]
    fn test_binding_kind_mismatch() {
        let p = props(40.0, 20.0);
        assert!(Binding::Property(Source::Padding).number(&p).is_err());
        assert!(Binding::Property(Source::SwitchHeight).thickness(&p).is_err());
        assert_eq!(Binding::Fixed(3.0).number(&p), Ok(3.0));
    }

    #[test]
    fn test_travel_within() {
        assert_eq!(travel_within(Rect::new(0.0, 0.0, 40.0, 20.0)), 10.0);
        assert_eq!(travel_within(Rect::new(0.0, 0.0, 10.0, 20.0)), 0.0);
    }
}
