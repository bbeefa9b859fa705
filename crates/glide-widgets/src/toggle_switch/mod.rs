//! Animated toggle switch.
//!
//! A track with a thumb that slides between an off end and an on end. The
//! slide, the hover grow/shrink and the press squash are independent
//! animations on two channels of [`ThumbMotion`]; a newer animation on the
//! same channel always takes over from wherever the thumb currently is.

mod config;
mod motion;
mod style;
mod template;

pub use config::{ConfigError, SwitchConfig};
pub use motion::{
    endpoint, ScalePhase, SwitchPhase, ThumbChannel, ThumbMotion, ThumbTransform, TranslatePhase,
    FULL_SCALE, HOVER_DURATION, PRESSED_SCALE, PRESS_NUDGE_RATIO, SETTLE_DURATION, SETTLE_EASING,
    SHRINK_SCALE,
};
pub use style::{
    parts, resolve_visual_state, switch_rules, Property, ResolvedStyle, Setter, SetterValue,
    StyleRule, Target, Trigger, VisualState, DISABLED_OPACITY, PRESSED_THUMB_WIDTH_RATIO,
};
pub use template::{
    travel_within, Binding, Brush, HAlign, Outline, Placement, ShapeNode, Source, SwitchTemplate,
    TemplateNode, TemplateProps, THUMB_DIAMETER_RATIO, THUMB_MARGIN_RATIO,
};

use glide_core::{
    convert::ConvertError,
    widget::{AccessibleRole, LayoutResult},
    Canvas, Color, Constraints, DrawCommand, Event, Key, MouseButton, Point, Rect, Size,
    Thickness, TypeId, Widget,
};
use std::any::Any;
use std::fmt;

/// Thumb radius as a ratio of the switch height.
pub const THUMB_RADIUS_RATIO: f64 = 0.375;

/// Track corner radius as a ratio of the switch height.
pub const TRACK_RADIUS_RATIO: f64 = 0.5;

/// Default slide duration in seconds.
pub const DEFAULT_DURATION: f64 = 0.3;

/// Message emitted when the switch flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleChanged {
    /// State before the flip
    pub old: bool,
    /// State after the flip
    pub new: bool,
}

type ToggleListener = Box<dyn FnMut(ToggleChanged) + Send + Sync>;

/// Animated on/off switch.
pub struct ToggleSwitch {
    is_on: bool,
    disabled: bool,
    switch_width: f64,
    switch_height: f64,
    /// Slide duration in seconds
    duration: f64,
    highlight_color: Color,
    foreground: Color,
    background: Color,
    border_color: Color,
    border_thickness: Thickness,
    padding: Thickness,
    hovered: bool,
    pressed: bool,
    captured: bool,
    motion: ThumbMotion,
    listeners: Vec<ToggleListener>,
    accessible_name_value: Option<String>,
    test_id_value: Option<String>,
    bounds: Rect,
}

impl fmt::Debug for ToggleSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToggleSwitch")
            .field("is_on", &self.is_on)
            .field("disabled", &self.disabled)
            .field("switch_width", &self.switch_width)
            .field("switch_height", &self.switch_height)
            .field("duration", &self.duration)
            .field("hovered", &self.hovered)
            .field("pressed", &self.pressed)
            .field("phase", &self.phase())
            .field("listeners", &self.listeners.len())
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl Default for ToggleSwitch {
    fn default() -> Self {
        let (width, height) = (40.0, 20.0);
        Self {
            is_on: false,
            disabled: false,
            switch_width: width,
            switch_height: height,
            duration: DEFAULT_DURATION,
            highlight_color: Color::from_rgba8(0x46, 0xa0, 0xff, 0xcc),
            foreground: Color::from_rgba8(0xa0, 0xa0, 0xa0, 0xff),
            background: Color::TRANSPARENT,
            border_color: Color::from_rgba8(0xb4, 0xb4, 0xb4, 0xff),
            border_thickness: Thickness::uniform(1.0),
            padding: Thickness::ZERO,
            hovered: false,
            pressed: false,
            captured: false,
            motion: ThumbMotion::new(false, travel(width, height)),
            listeners: Vec::new(),
            accessible_name_value: None,
            test_id_value: None,
            bounds: Rect::default(),
        }
    }
}

/// Half of `width - height`, never negative.
fn travel(width: f64, height: f64) -> f64 {
    ((width - height) / 2.0).max(0.0)
}

fn dimension(name: &str, value: f64) -> Option<f64> {
    if value.is_finite() {
        Some(value.max(0.0))
    } else {
        log::warn!("ignoring non-finite toggle switch {name}: {value}");
        None
    }
}

impl ToggleSwitch {
    /// Create a switch with default properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a switch with an initial state; no animation, no notification.
    #[must_use]
    pub fn with_state(on: bool) -> Self {
        Self::default().on(on)
    }

    /// Set the initial state without animating.
    #[must_use]
    pub fn on(mut self, on: bool) -> Self {
        self.is_on = on;
        self.motion.resize(on, self.travel());
        self
    }

    /// Set whether the switch is disabled.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the track width.
    #[must_use]
    pub fn switch_width(mut self, width: f64) -> Self {
        self.set_switch_width(width);
        self
    }

    /// Set the track height.
    #[must_use]
    pub fn switch_height(mut self, height: f64) -> Self {
        self.set_switch_height(height);
        self
    }

    /// Set the slide duration in seconds.
    #[must_use]
    pub fn duration(mut self, seconds: f64) -> Self {
        self.set_duration(seconds);
        self
    }

    /// Set the track color shown while on.
    #[must_use]
    pub const fn highlight_color(mut self, color: Color) -> Self {
        self.highlight_color = color;
        self
    }

    /// Set the thumb color.
    #[must_use]
    pub const fn foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    /// Set the track color shown while off.
    #[must_use]
    pub const fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the outline color.
    #[must_use]
    pub const fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    /// Set the outline thickness.
    #[must_use]
    pub const fn border_thickness(mut self, thickness: Thickness) -> Self {
        self.border_thickness = thickness;
        self
    }

    /// Set the inset around the track.
    #[must_use]
    pub const fn padding(mut self, padding: Thickness) -> Self {
        self.padding = padding;
        self
    }

    /// Set the accessible name.
    #[must_use]
    pub fn accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// Set the test ID.
    #[must_use]
    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Register a value-changed observer.
    ///
    /// Observers run after the slide animation has been scheduled.
    pub fn on_toggled<F>(&mut self, listener: F)
    where
        F: FnMut(ToggleChanged) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Get current state.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.is_on
    }

    /// Get disabled state.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Get the track width.
    #[must_use]
    pub const fn get_switch_width(&self) -> f64 {
        self.switch_width
    }

    /// Get the track height.
    #[must_use]
    pub const fn get_switch_height(&self) -> f64 {
        self.switch_height
    }

    /// Get the slide duration in seconds.
    #[must_use]
    pub const fn get_duration(&self) -> f64 {
        self.duration
    }

    /// Get the highlight color.
    #[must_use]
    pub const fn get_highlight_color(&self) -> Color {
        self.highlight_color
    }

    /// Whether the pointer is over the control.
    #[must_use]
    pub const fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the control is pressed.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Half the distance between the off and on ends.
    #[must_use]
    pub fn travel(&self) -> f64 {
        travel(self.switch_width, self.switch_height)
    }

    /// Where the thumb comes to rest for the current state.
    #[must_use]
    pub fn translate_target(&self) -> f64 {
        self.motion.translate_target()
    }

    /// Current thumb transform.
    #[must_use]
    pub fn thumb_transform(&self) -> ThumbTransform {
        self.motion.transform(self.travel())
    }

    /// Read access to the thumb's animation channels.
    #[must_use]
    pub const fn motion(&self) -> &ThumbMotion {
        &self.motion
    }

    /// State-machine position of both channels.
    #[must_use]
    pub fn phase(&self) -> SwitchPhase {
        self.motion.phase()
    }

    /// Interaction flags the style rules are keyed on.
    #[must_use]
    pub const fn visual_state(&self) -> VisualState {
        VisualState {
            is_on: self.is_on,
            hovered: self.hovered,
            pressed: self.pressed,
            enabled: !self.disabled,
        }
    }

    /// Set the state.
    ///
    /// Returns the change, or `None` when `on` equals the current state, in
    /// which case nothing animates and nobody is notified.
    pub fn set_on(&mut self, on: bool) -> Option<ToggleChanged> {
        if self.is_on == on {
            return None;
        }
        let change = ToggleChanged {
            old: self.is_on,
            new: on,
        };
        self.is_on = on;
        self.motion.transition_to(on, self.travel(), self.duration);
        log::debug!("toggle switch {} -> {}", change.old, change.new);
        for listener in &mut self.listeners {
            listener(change);
        }
        Some(change)
    }

    /// Flip the state unless disabled.
    pub fn toggle(&mut self) -> Option<ToggleChanged> {
        if self.disabled {
            return None;
        }
        self.set_on(!self.is_on)
    }

    /// Change the track width. A thumb at rest moves to its new end; a
    /// sliding thumb is re-aimed from where it is.
    pub fn set_switch_width(&mut self, width: f64) {
        match dimension("width", width) {
            Some(width) if width != self.switch_width => {
                self.switch_width = width;
                self.motion.resize(self.is_on, self.travel());
            }
            _ => {}
        }
    }

    /// Change the track height, with the same thumb handling as
    /// [`Self::set_switch_width`].
    pub fn set_switch_height(&mut self, height: f64) {
        match dimension("height", height) {
            Some(height) if height != self.switch_height => {
                self.switch_height = height;
                self.motion.resize(self.is_on, self.travel());
            }
            _ => {}
        }
    }

    /// Change the slide duration; applies to the next slide.
    pub fn set_duration(&mut self, seconds: f64) {
        if let Some(seconds) = dimension("duration", seconds) {
            self.duration = seconds;
        }
    }

    /// Change the highlight color.
    pub fn set_highlight_color(&mut self, color: Color) {
        self.highlight_color = color;
    }

    /// Enable or disable input. Running animations are unaffected.
    ///
    /// Disabling a held switch releases the pointer capture, so the thumb
    /// springs back and returns home as if the pointer was let go.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled && self.captured {
            self.release_capture();
        }
    }

    fn template_props(&self) -> TemplateProps {
        TemplateProps {
            switch_width: self.switch_width,
            switch_height: self.switch_height,
            border_thickness: self.border_thickness,
            padding: self.padding,
            foreground: self.foreground,
            background: self.background,
            highlight: self.highlight_color,
            border_brush: self.border_color,
        }
    }

    /// Build the shape tree for the current frame.
    pub fn render(&self) -> Result<DrawCommand, ConvertError> {
        SwitchTemplate::shared().render(
            self.bounds,
            &self.template_props(),
            &resolve_visual_state(self.visual_state()),
            self.thumb_transform(),
        )
    }

    fn hit_test(&self, position: Point) -> bool {
        self.bounds.contains_point(&position)
    }

    fn pointer_enter(&mut self) {
        if !self.hovered {
            self.hovered = true;
            self.motion.pointer_enter();
        }
    }

    fn pointer_leave(&mut self) {
        if self.hovered {
            self.hovered = false;
            self.motion.pointer_leave();
        }
    }

    fn pointer_down(&mut self) {
        self.pressed = true;
        self.captured = true;
        log::debug!("toggle switch pressed");
        self.motion.pointer_down(self.is_on, self.travel());
    }

    fn release_capture(&mut self) {
        self.captured = false;
        self.pressed = false;
        self.motion.capture_lost(self.is_on, self.travel());
    }

    fn click(&mut self) -> Option<Box<dyn Any + Send>> {
        self.toggle()
            .map(|change| Box::new(change) as Box<dyn Any + Send>)
    }
}

impl Widget for ToggleSwitch {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let preferred = Size::new(
            (self.switch_width + self.padding.left + self.padding.right) as f32,
            (self.switch_height + self.padding.top + self.padding.bottom) as f32,
        );
        constraints.constrain(preferred)
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        match self.render() {
            Ok(tree) => tree.replay(canvas),
            Err(err) => log::error!("toggle switch render failed: {err}"),
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if self.disabled {
            return None;
        }

        match event {
            Event::MouseEnter => self.pointer_enter(),
            Event::MouseLeave => self.pointer_leave(),
            Event::MouseMove { position } => {
                let inside = self.hit_test(*position);
                if inside {
                    self.pointer_enter();
                } else {
                    self.pointer_leave();
                }
                if self.captured {
                    self.pressed = inside;
                }
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } if self.hit_test(*position) => self.pointer_down(),
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } if self.captured => {
                self.release_capture();
                if self.hit_test(*position) {
                    return self.click();
                }
            }
            Event::PointerCaptureLost if self.captured => self.release_capture(),
            Event::KeyUp { key: Key::Space } | Event::KeyDown { key: Key::Enter } => {
                return self.click();
            }
            _ => {}
        }
        None
    }

    fn animate(&mut self, dt: f64) -> bool {
        self.motion.update(dt)
    }

    fn is_interactive(&self) -> bool {
        !self.disabled
    }

    fn is_focusable(&self) -> bool {
        !self.disabled
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Switch
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
