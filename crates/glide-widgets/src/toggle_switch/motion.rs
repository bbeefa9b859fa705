//! Thumb motion: a translate channel and a scale channel.
//!
//! Translation is measured from the track center; the thumb rests at
//! `-travel` when off and `+travel` when on, where `travel` is half of
//! `switch_width - switch_height`. Scale rests at [`SHRINK_SCALE`] until the
//! pointer arrives.

use glide_core::{AnimationController, AnimationSpec, Easing, Handoff, Priority};
use serde::{Deserialize, Serialize};

/// Thumb scale while the pointer is away.
pub const SHRINK_SCALE: f64 = 0.95;

/// Thumb scale the instant the button goes down.
pub const PRESSED_SCALE: f64 = 0.9;

/// Thumb scale under the pointer.
pub const FULL_SCALE: f64 = 1.0;

/// Share of the travel the thumb leans toward the other end on press.
pub const PRESS_NUDGE_RATIO: f64 = 0.1;

/// Duration of the hover grow and shrink, in seconds.
pub const HOVER_DURATION: f64 = 0.1;

/// Duration of the release spring, in seconds.
pub const SETTLE_DURATION: f64 = 0.2;

/// Easing of the release spring.
pub const SETTLE_EASING: Easing = Easing::ElasticIn {
    oscillations: 0,
    springiness: 10.0,
};

/// The two animated thumb properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbChannel {
    /// Horizontal offset from the track center
    Translate,
    /// Uniform scale about the thumb center
    Scale,
}

/// What the translate channel is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TranslatePhase {
    /// At rest
    #[default]
    Idle,
    /// Moving toward the off end
    TranslatingOff,
    /// Moving toward the on end
    TranslatingOn,
}

/// What the scale channel is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScalePhase {
    /// Full size, or growing to it
    RestingLarge,
    /// Shrunk, or shrinking
    #[default]
    Shrunk,
    /// Springing back after a release
    Settling,
}

/// Combined phase of both channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwitchPhase {
    /// Translate channel phase
    pub translate: TranslatePhase,
    /// Scale channel phase
    pub scale: ScalePhase,
}

/// Sampled thumb transform for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbTransform {
    /// Uniform scale about the thumb center
    pub scale: f64,
    /// Horizontal offset from the track center
    pub translate_x: f64,
}

/// Signed rest position of the thumb.
#[must_use]
pub fn endpoint(is_on: bool, travel: f64) -> f64 {
    if is_on {
        travel
    } else {
        -travel
    }
}

/// Owns the thumb's animation channels and their phases.
#[derive(Debug, Clone)]
pub struct ThumbMotion {
    channels: AnimationController<ThumbChannel>,
    scale_phase: ScalePhase,
    heading_on: bool,
}

impl ThumbMotion {
    /// Thumb at rest at its end of the track, shrunk.
    #[must_use]
    pub fn new(is_on: bool, travel: f64) -> Self {
        let mut channels = AnimationController::new();
        channels.insert(ThumbChannel::Translate, endpoint(is_on, travel));
        channels.insert(ThumbChannel::Scale, SHRINK_SCALE);
        Self {
            channels,
            scale_phase: ScalePhase::Shrunk,
            heading_on: is_on,
        }
    }

    fn read(&self, channel: ThumbChannel) -> f64 {
        self.channels.value(channel).unwrap_or(match channel {
            ThumbChannel::Translate => 0.0,
            ThumbChannel::Scale => SHRINK_SCALE,
        })
    }

    fn translate(&mut self, spec: AnimationSpec, priority: Priority) -> bool {
        let from = self.read(ThumbChannel::Translate);
        let started = self.channels.start(ThumbChannel::Translate, spec, priority);
        if started && spec.to != from {
            self.heading_on = spec.to > from;
        }
        started
    }

    /// Slide to the end matching `is_on`, starting from wherever the thumb
    /// currently is.
    pub fn transition_to(&mut self, is_on: bool, travel: f64, duration: f64) {
        let spec = AnimationSpec::to(endpoint(is_on, travel))
            .duration(duration)
            .easing(Easing::CircleOut)
            .handoff(Handoff::Replace);
        self.translate(spec, Priority::Important);
        self.heading_on = is_on;
    }

    /// Pointer arrived: grow to full size.
    pub fn pointer_enter(&mut self) {
        let spec = AnimationSpec::to(FULL_SCALE).duration(HOVER_DURATION);
        self.channels.start(ThumbChannel::Scale, spec, Priority::Important);
        self.scale_phase = ScalePhase::RestingLarge;
    }

    /// Pointer left: shrink back.
    pub fn pointer_leave(&mut self) {
        let spec = AnimationSpec::to(SHRINK_SCALE)
            .duration(HOVER_DURATION)
            .easing(Easing::SineOut);
        self.channels.start(ThumbChannel::Scale, spec, Priority::Important);
        self.scale_phase = ScalePhase::Shrunk;
    }

    /// Button down: snap to the pressed scale and lean toward the other end.
    ///
    /// The lean is passive, so it never disturbs a slide already in flight.
    pub fn pointer_down(&mut self, is_on: bool, travel: f64) {
        self.channels.start(
            ThumbChannel::Scale,
            AnimationSpec::to(PRESSED_SCALE).duration(0.0),
            Priority::Important,
        );
        self.scale_phase = ScalePhase::Shrunk;

        let lean = travel * PRESS_NUDGE_RATIO;
        let target = endpoint(is_on, travel) + if is_on { -lean } else { lean };
        let spec = AnimationSpec::to(target)
            .duration(HOVER_DURATION)
            .easing(Easing::EaseOut);
        if self.translate(spec, Priority::Passive) {
            log::trace!("thumb leaning to {target}");
        }
    }

    /// Capture released: spring back to full size on top of whatever scale
    /// animation is running, and undo any press lean.
    pub fn capture_lost(&mut self, is_on: bool, travel: f64) {
        let spec = AnimationSpec::to(FULL_SCALE)
            .duration(SETTLE_DURATION)
            .easing(SETTLE_EASING)
            .handoff(Handoff::Compose);
        self.channels.start(ThumbChannel::Scale, spec, Priority::Important);
        self.scale_phase = ScalePhase::Settling;

        let home = endpoint(is_on, travel);
        if self.translate_target() != home {
            let spec = AnimationSpec::to(home)
                .duration(HOVER_DURATION)
                .easing(Easing::EaseOut);
            self.translate(spec, Priority::Important);
        }
    }

    /// Follow a track resize.
    ///
    /// A resting thumb is pinned to its new end. A sliding thumb keeps its
    /// curve and is re-aimed at the new end from its live position, pulled
    /// onto the new track first if it shrank.
    pub fn resize(&mut self, is_on: bool, travel: f64) {
        let home = endpoint(is_on, travel);
        match self.active_spec(ThumbChannel::Translate) {
            Some(active) => {
                let live = self.read(ThumbChannel::Translate).clamp(-travel, travel);
                self.channels.set_immediate(ThumbChannel::Translate, live);
                let spec = AnimationSpec::to(home)
                    .duration(active.duration)
                    .easing(active.easing)
                    .handoff(Handoff::Replace);
                self.translate(spec, Priority::Important);
            }
            None => self.channels.set_immediate(ThumbChannel::Translate, home),
        }
        self.heading_on = is_on;
    }

    /// Advance both channels. Returns `true` while either is animating.
    pub fn update(&mut self, dt: f64) -> bool {
        let animating = self.channels.update(dt);
        if self.scale_phase == ScalePhase::Settling && !self.is_animating(ThumbChannel::Scale) {
            self.scale_phase = ScalePhase::RestingLarge;
        }
        animating
    }

    /// Whether `channel` has an animation in flight.
    #[must_use]
    pub fn is_animating(&self, channel: ThumbChannel) -> bool {
        self.channels.is_animating(channel)
    }

    /// Where the translate channel will come to rest.
    #[must_use]
    pub fn translate_target(&self) -> f64 {
        self.channels
            .channel(ThumbChannel::Translate)
            .map_or(0.0, glide_core::AnimationChannel::target)
    }

    /// Spec of the top-most animation on `channel`.
    #[must_use]
    pub fn active_spec(&self, channel: ThumbChannel) -> Option<AnimationSpec> {
        self.channels
            .channel(channel)
            .and_then(|c| c.active_spec().copied())
    }

    /// Number of stacked animations on `channel`.
    #[must_use]
    pub fn layer_count(&self, channel: ThumbChannel) -> usize {
        self.channels
            .channel(channel)
            .map_or(0, glide_core::AnimationChannel::layer_count)
    }

    /// Current sample, with translation clamped to the track.
    #[must_use]
    pub fn transform(&self, travel: f64) -> ThumbTransform {
        ThumbTransform {
            scale: self.read(ThumbChannel::Scale).max(0.0),
            translate_x: self.read(ThumbChannel::Translate).clamp(-travel, travel),
        }
    }

    /// Phase of both channels.
    #[must_use]
    pub fn phase(&self) -> SwitchPhase {
        let translate = match (self.is_animating(ThumbChannel::Translate), self.heading_on) {
            (false, _) => TranslatePhase::Idle,
            (true, true) => TranslatePhase::TranslatingOn,
            (true, false) => TranslatePhase::TranslatingOff,
        };
        SwitchPhase {
            translate,
            scale: self.scale_phase,
        }
    }
}
