//! State-dependent style rules for the toggle switch.
//!
//! Rules are evaluated in declaration order against a [`VisualState`]; a
//! later rule overwrites whatever an earlier one set for the same target and
//! property. Nothing cascades implicitly: the result of
//! [`resolve_visual_state`] is the complete set of overrides for one frame.

use super::template::{Binding, Brush, HAlign, Source, SwitchTemplate};
use glide_core::convert::Conversion;
use glide_core::Color;
use std::collections::BTreeMap;

/// Names of the template parts rules can target.
pub mod parts {
    /// Transparent layer covering the whole control.
    pub const HIT_AREA: &str = "hit_area";
    /// Track fill shown while off.
    pub const BACKGROUND: &str = "background";
    /// Track fill shown while on.
    pub const HIGHLIGHT: &str = "highlight";
    /// Track outline.
    pub const BORDER: &str = "border";
    /// The sliding thumb.
    pub const THUMB: &str = "thumb";
}

/// Opacity of the whole control while disabled.
pub const DISABLED_OPACITY: f64 = 0.35;

/// Thumb width while pressed, as a ratio of the switch height
/// (2.4 thumb radii).
pub const PRESSED_THUMB_WIDTH_RATIO: f64 = 0.9;

/// Interaction flags a rule can be keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisualState {
    /// Switch is on
    pub is_on: bool,
    /// Pointer is over the control
    pub hovered: bool,
    /// Primary button is held down on the control
    pub pressed: bool,
    /// Control accepts input
    pub enabled: bool,
}

impl VisualState {
    /// Enabled, off, untouched.
    pub const IDLE: Self = Self {
        is_on: false,
        hovered: false,
        pressed: false,
        enabled: true,
    };
}

/// Condition that activates a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Switch is on
    IsOn,
    /// Pointer is over the control
    Hovered,
    /// Control is pressed
    Pressed,
    /// Control is disabled
    Disabled,
}

impl Trigger {
    /// Whether the trigger fires in `state`.
    #[must_use]
    pub const fn matches(self, state: VisualState) -> bool {
        match self {
            Self::IsOn => state.is_on,
            Self::Hovered => state.hovered,
            Self::Pressed => state.pressed,
            Self::Disabled => !state.enabled,
        }
    }
}

/// What a setter writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// The control as a whole
    Control,
    /// A named template part
    Part(&'static str),
}

/// Properties a setter can override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    /// Horizontal anchoring within the track
    HorizontalAlignment,
    /// Fill brush
    Fill,
    /// Whether the part is drawn at all
    Visible,
    /// Outline thickness
    StrokeThickness,
    /// Width
    Width,
    /// Opacity of the whole control
    Opacity,
}

/// A value written by a setter.
#[derive(Debug, Clone, PartialEq)]
pub enum SetterValue {
    /// Alignment value
    Alignment(HAlign),
    /// Brush value
    Brush(Brush),
    /// Flag value
    Bool(bool),
    /// Plain number
    Number(f64),
    /// Derived value evaluated at render time
    Binding(Binding),
}

/// One property assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Setter {
    /// Where the value goes
    pub target: Target,
    /// Which property
    pub property: Property,
    /// The value
    pub value: SetterValue,
}

impl Setter {
    fn part(name: &'static str, property: Property, value: SetterValue) -> Self {
        Self {
            target: Target::Part(name),
            property,
            value,
        }
    }
}

/// Setters applied while a trigger holds.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// Activating condition
    pub trigger: Trigger,
    /// Assignments, applied in order
    pub setters: Vec<Setter>,
}

/// The switch's rule list, in priority order (later wins).
#[must_use]
pub fn switch_rules() -> Vec<StyleRule> {
    use Property::{Fill, HorizontalAlignment, Opacity, StrokeThickness, Visible, Width};
    use SetterValue as V;

    vec![
        StyleRule {
            trigger: Trigger::IsOn,
            setters: vec![
                Setter::part(parts::THUMB, HorizontalAlignment, V::Alignment(HAlign::Right)),
                Setter::part(parts::THUMB, Fill, V::Brush(Brush::Fixed(Color::BLACK))),
                Setter::part(parts::BACKGROUND, Visible, V::Bool(false)),
                Setter::part(parts::HIGHLIGHT, Visible, V::Bool(true)),
                Setter::part(parts::BORDER, StrokeThickness, V::Number(0.0)),
            ],
        },
        StyleRule {
            trigger: Trigger::Hovered,
            setters: vec![Setter::part(
                parts::BORDER,
                Fill,
                V::Brush(Brush::Fixed(Color::from_rgba8(0, 0, 0, 30))),
            )],
        },
        StyleRule {
            trigger: Trigger::Pressed,
            setters: vec![Setter::part(
                parts::THUMB,
                Width,
                V::Binding(Binding::converted(
                    Source::SwitchHeight,
                    Conversion::Multiply,
                    PRESSED_THUMB_WIDTH_RATIO,
                )),
            )],
        },
        StyleRule {
            trigger: Trigger::Disabled,
            setters: vec![Setter {
                target: Target::Control,
                property: Opacity,
                value: V::Number(DISABLED_OPACITY),
            }],
        },
    ]
}

/// Overrides in effect for one visual state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle {
    values: BTreeMap<(Target, Property), SetterValue>,
}

impl ResolvedStyle {
    /// Apply every rule whose trigger matches, in order.
    #[must_use]
    pub fn resolve(rules: &[StyleRule], state: VisualState) -> Self {
        let mut values = BTreeMap::new();
        for rule in rules.iter().filter(|r| r.trigger.matches(state)) {
            for setter in &rule.setters {
                values.insert((setter.target, setter.property), setter.value.clone());
            }
        }
        Self { values }
    }

    /// Raw override lookup.
    #[must_use]
    pub fn get(&self, target: Target, property: Property) -> Option<&SetterValue> {
        self.values.get(&(target, property))
    }

    /// All overrides, ordered by target then property.
    pub fn iter(&self) -> impl Iterator<Item = (&(Target, Property), &SetterValue)> {
        self.values.iter()
    }

    /// Number of overridden properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No rule applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Control opacity (1.0 unless overridden).
    #[must_use]
    pub fn opacity(&self) -> f64 {
        match self.get(Target::Control, Property::Opacity) {
            Some(SetterValue::Number(n)) => *n,
            _ => 1.0,
        }
    }

    /// Visibility override for a part.
    #[must_use]
    pub fn visible(&self, part: &'static str) -> Option<bool> {
        match self.get(Target::Part(part), Property::Visible) {
            Some(SetterValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Fill override for a part.
    #[must_use]
    pub fn fill(&self, part: &'static str) -> Option<Brush> {
        match self.get(Target::Part(part), Property::Fill) {
            Some(SetterValue::Brush(b)) => Some(*b),
            _ => None,
        }
    }

    /// Alignment override for a part.
    #[must_use]
    pub fn alignment(&self, part: &'static str) -> Option<HAlign> {
        match self.get(Target::Part(part), Property::HorizontalAlignment) {
            Some(SetterValue::Alignment(a)) => Some(*a),
            _ => None,
        }
    }

    /// Stroke thickness override for a part.
    #[must_use]
    pub fn stroke_thickness(&self, part: &'static str) -> Option<f64> {
        match self.get(Target::Part(part), Property::StrokeThickness) {
            Some(SetterValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Width override for a part.
    #[must_use]
    pub fn width(&self, part: &'static str) -> Option<&Binding> {
        match self.get(Target::Part(part), Property::Width) {
            Some(SetterValue::Binding(b)) => Some(b),
            _ => None,
        }
    }
}

/// Resolve the switch's rules for a state.
///
/// # Examples
///
/// ```
/// use glide_widgets::toggle_switch::{resolve_visual_state, VisualState};
///
/// let style = resolve_visual_state(VisualState {
///     is_on: true,
///     enabled: false,
///     ..VisualState::IDLE
/// });
/// assert_eq!(style.opacity(), 0.35);
/// ```
#[must_use]
pub fn resolve_visual_state(state: VisualState) -> ResolvedStyle {
    ResolvedStyle::resolve(&SwitchTemplate::shared().rules, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> impl Iterator<Item = VisualState> {
        (0u8..16).map(|bits| VisualState {
            is_on: bits & 1 != 0,
            hovered: bits & 2 != 0,
            pressed: bits & 4 != 0,
            enabled: bits & 8 != 0,
        })
    }

    #[test]
    fn test_idle_has_no_overrides() {
        let style = resolve_visual_state(VisualState::IDLE);
        assert!(style.is_empty());
        assert_eq!(style.opacity(), 1.0);
    }

    #[test]
    fn test_on_state_setters() {
        let style = resolve_visual_state(VisualState {
            is_on: true,
            ..VisualState::IDLE
        });
        assert_eq!(style.alignment(parts::THUMB), Some(HAlign::Right));
        assert_eq!(style.fill(parts::THUMB), Some(Brush::Fixed(Color::BLACK)));
        assert_eq!(style.visible(parts::BACKGROUND), Some(false));
        assert_eq!(style.visible(parts::HIGHLIGHT), Some(true));
        assert_eq!(style.stroke_thickness(parts::BORDER), Some(0.0));
        assert_eq!(style.len(), 5);
    }

    #[test]
    fn test_hover_tints_border() {
        let style = resolve_visual_state(VisualState {
            hovered: true,
            ..VisualState::IDLE
        });
        let Some(Brush::Fixed(c)) = style.fill(parts::BORDER) else {
            panic!("hover must set a fixed border fill");
        };
        assert!((c.a - 30.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_pressed_widens_thumb() {
        let style = resolve_visual_state(VisualState {
            pressed: true,
            ..VisualState::IDLE
        });
        let width = style.width(parts::THUMB).expect("pressed width");
        assert_eq!(
            *width,
            Binding::converted(
                Source::SwitchHeight,
                Conversion::Multiply,
                PRESSED_THUMB_WIDTH_RATIO
            )
        );
    }

    #[test]
    fn test_disabled_dims_only() {
        let style = resolve_visual_state(VisualState {
            enabled: false,
            ..VisualState::IDLE
        });
        assert_eq!(style.opacity(), DISABLED_OPACITY);
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_states_combine() {
        let style = resolve_visual_state(VisualState {
            is_on: true,
            hovered: true,
            pressed: true,
            enabled: false,
        });
        assert_eq!(style.alignment(parts::THUMB), Some(HAlign::Right));
        assert!(style.fill(parts::BORDER).is_some());
        assert!(style.width(parts::THUMB).is_some());
        assert_eq!(style.opacity(), DISABLED_OPACITY);
    }

    #[test]
    fn test_later_rule_wins() {
        let rules = vec![
            StyleRule {
                trigger: Trigger::IsOn,
                setters: vec![Setter::part(
                    parts::THUMB,
                    Property::Fill,
                    SetterValue::Brush(Brush::Foreground),
                )],
            },
            StyleRule {
                trigger: Trigger::Hovered,
                setters: vec![Setter::part(
                    parts::THUMB,
                    Property::Fill,
                    SetterValue::Brush(Brush::Highlight),
                )],
            },
        ];
        let both = VisualState {
            is_on: true,
            hovered: true,
            ..VisualState::IDLE
        };
        assert_eq!(
            ResolvedStyle::resolve(&rules, both).fill(parts::THUMB),
            Some(Brush::Highlight)
        );
        let on_only = VisualState {
            is_on: true,
            ..VisualState::IDLE
        };
        assert_eq!(
            ResolvedStyle::resolve(&rules, on_only).fill(parts::THUMB),
            Some(Brush::Foreground)
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for state in all_states() {
            assert_eq!(resolve_visual_state(state), resolve_visual_state(state));
            let expected = if state.enabled { 1.0 } else { DISABLED_OPACITY };
            assert_eq!(resolve_visual_state(state).opacity(), expected);
            assert_eq!(
                resolve_visual_state(state).visible(parts::HIGHLIGHT),
                state.is_on.then_some(true)
            );
        }
    }
}
