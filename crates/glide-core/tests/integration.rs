//! Integration tests for glide-core.
//!
//! These tests verify the public API works correctly end-to-end.

use glide_core::convert::{self, BorderRadius, Multiply};
use glide_core::{
    AnimationController, AnimationSpec, BoxStyle, Color, DrawCommand, Easing, Handoff, Priority,
    RecordingCanvas, Rect, Thickness, Transform2D, Value, ValueConverter,
};

// =============================================================================
// Animation Integration Tests
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Channel {
    Translate,
    Scale,
}

fn thumb_controller() -> AnimationController<Channel> {
    let mut ctrl = AnimationController::new();
    ctrl.insert(Channel::Translate, -10.0);
    ctrl.insert(Channel::Scale, 0.95);
    ctrl
}

#[test]
fn test_interrupted_translate_continues_from_live_value() {
    let mut ctrl = thumb_controller();
    let to_on = AnimationSpec::to(10.0).duration(0.3).easing(Easing::CircleOut);
    let to_off = AnimationSpec::to(-10.0).duration(0.3).easing(Easing::CircleOut);

    ctrl.start(Channel::Translate, to_on, Priority::Important);
    ctrl.update(0.1);
    let before = ctrl.value(Channel::Translate).unwrap();

    ctrl.start(Channel::Translate, to_off, Priority::Important);
    let after = ctrl.value(Channel::Translate).unwrap();
    assert_eq!(before, after);

    while ctrl.update(1.0 / 60.0) {}
    assert_eq!(ctrl.value(Channel::Translate), Some(-10.0));
}

#[test]
fn test_press_then_release_settles_large() {
    let mut ctrl = thumb_controller();
    ctrl.start(Channel::Scale, AnimationSpec::to(0.9), Priority::Important);
    ctrl.start(
        Channel::Scale,
        AnimationSpec::to(1.0)
            .duration(0.2)
            .easing(Easing::ElasticIn {
                oscillations: 0,
                springiness: 10.0,
            })
            .handoff(Handoff::Compose),
        Priority::Important,
    );

    let channel = ctrl.channel(Channel::Scale).unwrap();
    assert_eq!(channel.layer_count(), 2);
    assert!(matches!(
        channel.active_spec().map(|s| s.easing),
        Some(Easing::ElasticIn { .. })
    ));

    while ctrl.update(1.0 / 60.0) {}
    assert_eq!(ctrl.value(Channel::Scale), Some(1.0));
}

#[test]
fn test_channels_do_not_interfere() {
    let mut ctrl = thumb_controller();
    ctrl.start(
        Channel::Translate,
        AnimationSpec::to(10.0).duration(0.3),
        Priority::Important,
    );
    ctrl.start(
        Channel::Scale,
        AnimationSpec::to(1.0).duration(0.1),
        Priority::Important,
    );
    ctrl.update(0.1);
    assert!(!ctrl.is_animating(Channel::Scale));
    assert!(ctrl.is_animating(Channel::Translate));
}

// =============================================================================
// Converter Integration Tests
// =============================================================================

#[test]
fn test_switch_geometry_from_height() {
    let height = 20.0;
    assert_eq!(convert::multiply(height, 0.375 * 2.0), Ok(15.0));
    assert_eq!(convert::corner_radius(height, 0.375), Ok(7.5));
    assert_eq!(
        convert::thickness_from_scalar(height, 0.5 - 0.375),
        Ok(Thickness::uniform(2.5))
    );
    assert_eq!(convert::border_radius(height, 1.0, 0.5), Ok(9.5));
}

#[test]
fn test_binding_converters_compose() {
    let diameter = Multiply.convert(&Value::Number(20.0), &Value::Number(0.75)).unwrap();
    let radius = BorderRadius
        .convert(&diameter, &Value::Thickness(Thickness::uniform(1.0)), &Value::Number(0.5))
        .unwrap();
    assert_eq!(radius, Value::Number(7.0));
}

// =============================================================================
// Rendering Boundary Tests
// =============================================================================

#[test]
fn test_shape_tree_survives_canvas_and_json() {
    let tree = DrawCommand::Opacity {
        alpha: 0.35,
        children: vec![
            DrawCommand::rect(
                "background",
                Rect::new(0.0, 0.0, 40.0, 20.0),
                10.0,
                BoxStyle::fill(Color::TRANSPARENT),
            ),
            DrawCommand::rect(
                "thumb",
                Rect::new(2.5, 2.5, 15.0, 15.0),
                7.5,
                BoxStyle::fill(Color::BLACK),
            )
            .with_transform(Transform2D::translate(20.0, 0.0)),
        ],
    };

    let mut canvas = RecordingCanvas::new();
    tree.replay(&mut canvas);
    assert_eq!(canvas.commands(), std::slice::from_ref(&tree));

    let json = tree.to_json().expect("serializable");
    let back: DrawCommand = serde_json::from_str(&json).expect("deserializable");
    assert_eq!(back.shape_count(), 2);
}
