//! Widget implementations for Glide.

pub mod toggle_switch;

pub use toggle_switch::{
    resolve_visual_state, ConfigError, ResolvedStyle, SwitchConfig, SwitchPhase, ToggleChanged,
    ToggleSwitch, VisualState,
};
