//! Animation engine: easing curves, per-property channels and handoff.
//!
//! A channel is one animatable property track. Each call to
//! [`AnimationChannel::begin`] hands off to a new animation according to its
//! [`Handoff`] policy:
//!
//! - [`Handoff::Replace`] snapshots the current interpolated value, drops every
//!   running animation and starts the new one from that snapshot. No visual
//!   pop, no stale trajectory.
//! - [`Handoff::Compose`] stacks the new animation on top of the running ones.
//!   A layer without an explicit `from` reads the live output of the layer
//!   beneath it every frame.
//!
//! Channels only move when the host calls `update(dt)`; nothing here owns a
//! clock or a thread.

use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt::Debug;
use std::hash::Hash;

// =============================================================================
// Easing Functions
// =============================================================================

/// Standard easing functions for animations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing)
    #[default]
    Linear,
    /// Ease out (slow end)
    EaseOut,
    /// Sine ease out (gentle deceleration)
    SineOut,
    /// Circular ease out (fast start, hard deceleration)
    CircleOut,
    /// Exponential spring, eased in.
    ///
    /// `springiness` sets how sharply the curve rises towards the end,
    /// `oscillations` how many times it swings around the target first.
    ElasticIn {
        /// Number of back-and-forth swings
        oscillations: u32,
        /// Stiffness of the exponential envelope
        springiness: f64,
    },
}

impl Easing {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => (1.0 - t).mul_add(-(1.0 - t), 1.0),
            Self::SineOut => (t * FRAC_PI_2).sin(),
            Self::CircleOut => (1.0 - (1.0 - t).powi(2)).max(0.0).sqrt(),
            Self::ElasticIn {
                oscillations,
                springiness,
            } => Self::elastic_in(t, f64::from(oscillations), springiness.max(0.0)),
        }
    }

    fn elastic_in(t: f64, oscillations: f64, springiness: f64) -> f64 {
        let envelope = if springiness == 0.0 {
            t
        } else {
            (springiness * t).exp_m1() / springiness.exp_m1()
        };
        envelope * ((2.0 * PI).mul_add(oscillations, FRAC_PI_2) * t).sin()
    }

    /// Whether the curve slows down towards the end.
    #[must_use]
    pub const fn is_decelerating(self) -> bool {
matches!(self, Self::EaseOut | Self::SineOut | Self::CircleOut)
    }
}

// =============================================================================
// AnimationSpec - One Requested Transition
// =============================================================================

/// How a new animation takes over a channel that may already be running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handoff {
    /// Snapshot the current value, drop running animations, start from there.
    #[default]
    Replace,
    /// Layer the new animation over whatever is running.
    Compose,
}

/// Whether a start request may be dropped while the channel is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Always starts.
    #[default]
    Important,
    /// Suppressed while the channel is animating.
    Passive,
}

/// A transient description of one transition on one channel.
///
/// # Examples
///
/// ```
/// use glide_core::{AnimationSpec, Easing, Handoff};
///
/// let spec = AnimationSpec::to(10.0)
///     .duration(0.3)
///     .easing(Easing::CircleOut);
/// assert_eq!(spec.from, None);
/// assert_eq!(spec.handoff, Handoff::Replace);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Explicit start value; `None` starts from the channel's live value
    pub from: Option<f64>,
    /// End value
    pub to: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Easing curve
    pub easing: Easing,
    /// Handoff policy
    pub handoff: Handoff,
}

impl AnimationSpec {
    /// Animate to `to`, instantly, linearly, replacing running animations.
    #[must_use]
    pub const fn to(to: f64) -> Self {
        Self {
            from: None,
            to,
            duration: 0.0,
            easing: Easing::Linear,
            handoff: Handoff::Replace,
        }
    }

    /// Set an explicit start value.
    #[must_use]
    pub const fn from(mut self, from: f64) -> Self {
        self.from = Some(from);
        self
    }

    /// Set duration in seconds (negative values clamp to zero).
    #[must_use]
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    /// Set easing function.
    #[must_use]
    pub const fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set handoff policy.
    #[must_use]
    pub const fn handoff(mut self, handoff: Handoff) -> Self {
        self.handoff = handoff;
        self
    }
}

/// A running animation inside a channel.
#[derive(Debug, Clone)]
struct EasedLayer {
    spec: AnimationSpec,
    elapsed: f64,
}

impl EasedLayer {
    const fn new(spec: AnimationSpec) -> Self {
        Self { spec, elapsed: 0.0 }
    }

    fn progress(&self) -> f64 {
        if self.spec.duration > 0.0 {
            (self.elapsed / self.spec.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.spec.duration
    }

    /// Output for a given input (the value beneath this layer).
    fn sample(&self, input: f64) -> f64 {
        let t = self.progress();
        if t >= 1.0 {
            return self.spec.to;
        }
        let from = self.spec.from.unwrap_or(input);
        (self.spec.to - from).mul_add(self.spec.easing.apply(t), from)
    }

    fn update(&mut self, dt: f64) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.spec.duration);
    }
}

// =============================================================================
// AnimationChannel - One Property Track
// =============================================================================

/// One animatable property track with a handoff-aware layer stack.
#[derive(Debug, Clone)]
pub struct AnimationChannel {
    base: f64,
    layers: Vec<EasedLayer>,
}

impl AnimationChannel {
    /// Create an idle channel resting at `initial`.
    #[must_use]
    pub const fn new(initial: f64) -> Self {
        Self {
            base: initial,
            layers: Vec::new(),
        }
    }

    /// Current interpolated value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.layers
            .iter()
            .fold(self.base, |input, layer| layer.sample(input))
    }

    /// Value the channel settles at once every layer completes.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.layers.last().map_or(self.base, |l| l.spec.to)
    }

    /// Whether any animation is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Number of stacked animations.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Spec of the top-most running animation.
    #[must_use]
    pub fn active_spec(&self) -> Option<&AnimationSpec> {
        self.layers.last().map(|l| &l.spec)
    }

    /// Hand off to a new animation. Always starts.
    pub fn begin(&mut self, spec: AnimationSpec) {
        match spec.handoff {
            Handoff::Replace => {
                self.base = self.value();
                self.layers.clear();
            }
            Handoff::Compose => {}
        }
        self.layers.push(EasedLayer::new(spec));
    }

    /// Hand off unless `priority` is passive and the channel is busy.
    ///
    /// Returns whether the animation started.
    pub fn start(&mut self, spec: AnimationSpec, priority: Priority) -> bool {
        if priority == Priority::Passive && self.is_animating() {
            return false;
        }
        self.begin(spec);
        true
    }

    /// Advance every layer by `dt` seconds.
    ///
    /// Completed layers at the bottom of the stack fold into the base.
    pub fn update(&mut self, dt: f64) {
        for layer in &mut self.layers {
            layer.update(dt);
        }
        let settled = self.layers.iter().take_while(|l| l.is_complete()).count();
        for layer in self.layers.drain(..settled) {
            self.base = layer.sample(self.base);
        }
    }

    /// Pin the value and drop every running animation.
    pub fn set_immediate(&mut self, value: f64) {
        self.base = value;
        self.layers.clear();
    }
}

impl Default for AnimationChannel {
    fn default() -> Self {
        Self::new(0.0)
    }
}

// =============================================================================
// AnimationController - Keyed Channels
// =============================================================================

/// Owns the channels of one widget, keyed by a caller-chosen id.
#[derive(Debug, Clone)]
pub struct AnimationController<K> {
    channels: HashMap<K, AnimationChannel>,
}

impl<K> Default for AnimationController<K> {
    fn default() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + Debug> AnimationController<K> {
    /// Create new controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel resting at `initial`, replacing any existing one.
    pub fn insert(&mut self, key: K, initial: f64) {
        self.channels.insert(key, AnimationChannel::new(initial));
    }

    /// Get a channel.
    #[must_use]
    pub fn channel(&self, key: K) -> Option<&AnimationChannel> {
        self.channels.get(&key)
    }

    /// Get current value.
    #[must_use]
    pub fn value(&self, key: K) -> Option<f64> {
        self.channels.get(&key).map(AnimationChannel::value)
    }

    /// Start an animation on a channel.
    ///
    /// Returns `false` when the channel is unknown or the start was
    /// suppressed.
    pub fn start(&mut self, key: K, spec: AnimationSpec, priority: Priority) -> bool {
        let Some(channel) = self.channels.get_mut(&key) else {
            log::warn!("animation requested on unregistered channel {key:?}");
            return false;
        };
        let replaced = channel.is_animating() && spec.handoff == Handoff::Replace;
        let started = channel.start(spec, priority);
        if started {
            log::trace!(
                "{key:?}: {:?} -> {} over {:.3}s ({:?}{})",
                spec.from,
                spec.to,
                spec.duration,
                spec.handoff,
                if replaced { ", replaced running" } else { "" }
            );
        } else {
            log::debug!("{key:?}: passive start suppressed while animating");
        }
        started
    }

    /// Pin a channel's value.
    pub fn set_immediate(&mut self, key: K, value: f64) {
        if let Some(channel) = self.channels.get_mut(&key) {
            channel.set_immediate(value);
        }
    }

    /// Whether a channel is animating.
    #[must_use]
    pub fn is_animating(&self, key: K) -> bool {
        self.channels
            .get(&key)
            .is_some_and(AnimationChannel::is_animating)
    }

    /// Number of channels with animations in flight.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.channels.values().filter(|c| c.is_animating()).count()
    }

    /// Update all channels. Returns whether anything is still animating.
    pub fn update(&mut self, dt: f64) -> bool {
        for channel in self.channels.values_mut() {
            channel.update(dt);
        }
        self.active_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ELASTIC: Easing = Easing::ElasticIn {
        oscillations: 0,
        springiness: 10.0,
    };

    // =========================================================================
    // Easing Tests
    // =========================================================================

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseOut,
            Easing::SineOut,
            Easing::CircleOut,
            ELASTIC,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-9, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_circle_out_decelerates() {
        let e = Easing::CircleOut;
        assert!(e.is_decelerating());
        // Front-loaded: more than half the distance in the first half.
        assert!(e.apply(0.5) > 0.8);
        assert!(e.apply(0.1) - e.apply(0.0) > e.apply(1.0) - e.apply(0.9));
    }

    #[test]
    fn test_elastic_without_springiness_is_sine_shaped() {
        let e = Easing::ElasticIn {
            oscillations: 0,
            springiness: 0.0,
        };
        let expected = 0.5 * (0.5 * FRAC_PI_2).sin();
        assert!((e.apply(0.5) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_elastic_with_oscillations_swings_below_zero() {
        let e = Easing::ElasticIn {
            oscillations: 2,
            springiness: 3.0,
        };
        let samples: Vec<f64> = (0..=100).map(|i| e.apply(f64::from(i) / 100.0)).collect();
        assert!(samples.iter().any(|v| *v < 0.0));
        assert!((samples[100] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    // =========================================================================
    // AnimationChannel Tests
    // =========================================================================

    #[test]
    fn test_channel_idle_holds_value() {
        let mut ch = AnimationChannel::new(0.95);
        ch.update(1.0);
        assert_eq!(ch.value(), 0.95);
        assert!(!ch.is_animating());
    }

    #[test]
    fn test_channel_runs_to_target() {
        let mut ch = AnimationChannel::new(-10.0);
        ch.begin(AnimationSpec::to(10.0).duration(0.3).easing(Easing::CircleOut));
        assert!(ch.is_animating());
        assert_eq!(ch.target(), 10.0);

        ch.update(0.15);
        let mid = ch.value();
        assert!(mid > 0.0 && mid < 10.0, "mid = {mid}");

        ch.update(0.15);
        assert_eq!(ch.value(), 10.0);
        assert!(!ch.is_animating());
    }

    #[test]
    fn test_channel_zero_duration_is_instant() {
        let mut ch = AnimationChannel::new(1.0);
        ch.begin(AnimationSpec::to(0.95));
        assert_eq!(ch.value(), 0.95);
        ch.update(0.0);
        assert!(!ch.is_animating());
        assert_eq!(ch.value(), 0.95);
    }

    #[test]
    fn test_replace_starts_from_snapshot() {
        let mut ch = AnimationChannel::new(-10.0);
        ch.begin(AnimationSpec::to(10.0).duration(1.0));
        ch.update(0.25);
        let snapshot = ch.value();
        assert_eq!(snapshot, -5.0);

        ch.begin(AnimationSpec::to(-10.0).duration(1.0));
        assert_eq!(ch.layer_count(), 1);
        // No jump at the moment of handoff.
        assert_eq!(ch.value(), snapshot);
        ch.update(0.5);
        assert_eq!(ch.value(), -7.5);
    }

    #[test]
    fn test_replace_honours_explicit_from() {
        let mut ch = AnimationChannel::new(3.0);
        ch.begin(AnimationSpec::to(1.0).from(0.0).duration(1.0));
        assert_eq!(ch.value(), 0.0);
    }

    #[test]
    fn test_compose_layers_over_running_animation() {
        let mut ch = AnimationChannel::new(1.0);
        ch.begin(AnimationSpec::to(0.5).duration(1.0));
        ch.update(0.5);
        assert_eq!(ch.value(), 0.75);

        ch.begin(
            AnimationSpec::to(1.0)
                .duration(1.0)
                .handoff(Handoff::Compose),
        );
        assert_eq!(ch.layer_count(), 2);
        // The composed layer starts from the live output beneath it.
        assert_eq!(ch.value(), 0.75);

        ch.update(0.5);
        // Lower layer finished at 0.5 and folded into the base; upper is halfway.
        assert_eq!(ch.layer_count(), 1);
        assert_eq!(ch.value(), 0.75);

        ch.update(0.5);
        assert_eq!(ch.value(), 1.0);
        assert!(!ch.is_animating());
    }

    #[test]
    fn test_passive_start_suppressed_while_busy() {
        let mut ch = AnimationChannel::new(0.0);
        assert!(ch.start(AnimationSpec::to(1.0).duration(1.0), Priority::Passive));
        assert!(!ch.start(AnimationSpec::to(-1.0).duration(1.0), Priority::Passive));
        assert_eq!(ch.target(), 1.0);
        assert!(ch.start(AnimationSpec::to(-1.0).duration(1.0), Priority::Important));
        assert_eq!(ch.target(), -1.0);
    }

    #[test]
    fn test_set_immediate_drops_layers() {
        let mut ch = AnimationChannel::new(0.0);
        ch.begin(AnimationSpec::to(1.0).duration(1.0));
        ch.set_immediate(5.0);
        assert!(!ch.is_animating());
        assert_eq!(ch.value(), 5.0);
    }

    // =========================================================================
    // AnimationController Tests
    // =========================================================================

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Track {
        Offset,
        Zoom,
    }

    #[test]
    fn test_controller_channels_are_independent() {
        let mut ctrl = AnimationController::new();
        ctrl.insert(Track::Offset, 0.0);
        ctrl.insert(Track::Zoom, 1.0);

        let offset = AnimationSpec::to(10.0).duration(1.0);
        let zoom = AnimationSpec::to(0.5).duration(0.5);
        assert!(ctrl.start(Track::Offset, offset, Priority::Important));
        assert!(ctrl.start(Track::Zoom, zoom, Priority::Important));
        assert_eq!(ctrl.active_count(), 2);

        assert!(ctrl.update(0.5));
        assert_eq!(ctrl.value(Track::Zoom), Some(0.5));
        assert!(!ctrl.is_animating(Track::Zoom));
        assert!(ctrl.is_animating(Track::Offset));

        assert!(!ctrl.update(0.5));
        assert_eq!(ctrl.value(Track::Offset), Some(10.0));
    }

    #[test]
    fn test_controller_unknown_channel() {
        let mut ctrl: AnimationController<Track> = AnimationController::new();
        assert!(!ctrl.start(Track::Zoom, AnimationSpec::to(1.0), Priority::Important));
        assert_eq!(ctrl.value(Track::Zoom), None);
    }

    proptest! {
        #[test]
        fn prop_monotone_easings_stay_in_unit_range(t in 0.0f64..=1.0) {
            for easing in [Easing::EaseOut, Easing::SineOut, Easing::CircleOut, ELASTIC] {
                let v = easing.apply(t);
                prop_assert!((-1e-12..=1.0 + 1e-12).contains(&v), "{easing:?}({t}) = {v}");
            }
        }

        #[test]
        fn prop_replace_never_leaves_segment(
            from in -50.0f64..50.0,
            to in -50.0f64..50.0,
            steps in proptest::collection::vec(0.0f64..0.2, 1..20),
        ) {
            let mut ch = AnimationChannel::new(from);
            ch.begin(AnimationSpec::to(to).duration(0.3).easing(Easing::CircleOut));
            let (lo, hi) = if from < to { (from, to) } else { (to, from) };
            for dt in steps {
                ch.update(dt);
                let v = ch.value();
                prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
            }
        }
    }
}
