//! Visual attributes: per-particle aging and the system-wide fade.
//!
//! This module turns simulation state into drawable attributes, separate
//! from the behavior that moves particles. Rendering itself happens in the
//! host; [`ParticleSystem::draw`](crate::ParticleSystem::draw) yields one
//! [`Sprite`] per live particle.
//!
//! # Aging
//!
//! Gated by the flags in [`VisualConfig`], as a particle's age fraction
//! approaches 1 its size shrinks linearly to zero, its opacity fades out,
//! its color interpolates across the configured gradient, and in the final
//! quarter of life its opacity can flicker with rising frequency and
//! amplitude.
//!
//! # System fade
//!
//! A four-state machine (`Inactive -> FadingIn -> Active -> FadingOut`)
//! ramps the global opacity linearly over `fade_time` seconds whenever the
//! system is switched on or off. Reaching the end of a ramp clamps opacity
//! to the exact bound.

use crate::particle::Particle;
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Age fraction at which flickering starts.
const FLICKER_START: f32 = 0.75;

/// Per-particle visual aging flags.
#[derive(Clone, Debug)]
pub struct VisualConfig {
    /// Shrink radius linearly to zero over the lifetime.
    pub size_age: bool,
    /// Fade opacity to zero over the lifetime.
    pub opacity_age: bool,
    /// Interpolate color across `color_over_life` keyed by age fraction.
    pub color_age: bool,
    /// Oscillate opacity with rising frequency near death.
    pub flickers_age: bool,
    /// Color gradient for `color_age`; `None` dims the birth color to black.
    pub color_over_life: Option<(Vec3, Vec3)>,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            size_age: true,
            opacity_age: true,
            color_age: false,
            flickers_age: false,
            color_over_life: None,
        }
    }
}

/// Drawable attributes of one particle for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    /// World position.
    pub position: Vec2,
    /// Radius after visual aging.
    pub radius: f32,
    /// Color (RGB, 0.0-1.0).
    pub color: Vec3,
    /// Opacity after aging, flicker and the system fade.
    pub alpha: f32,
}

/// Compute the drawable attributes of one particle.
///
/// `system_opacity` is the fade machine's current output and scales every
/// particle uniformly.
pub fn sprite(p: &Particle, cfg: &VisualConfig, system_opacity: f32) -> Sprite {
    let frac = p.age_fraction();

    let radius = if cfg.size_age {
        p.radius * (1.0 - frac)
    } else {
        p.radius
    };

    let mut alpha = system_opacity;
    if cfg.opacity_age {
        alpha *= 1.0 - frac;
    }
    if cfg.flickers_age && frac > FLICKER_START {
        let t = (frac - FLICKER_START) / (1.0 - FLICKER_START);
        let frequency = 8.0 + 40.0 * t;
        let osc = 0.5 * (1.0 + (p.age * frequency * TAU).sin());
        alpha *= 1.0 - t * osc;
    }

    let color = if cfg.color_age {
        let (start, end) = cfg.color_over_life.unwrap_or((p.color, Vec3::ZERO));
        start.lerp(end, frac)
    } else {
        p.color
    };

    Sprite {
        position: p.pos,
        radius,
        color,
        alpha: alpha.clamp(0.0, 1.0),
    }
}

/// System fade states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeState {
    Inactive,
    FadingIn,
    Active,
    FadingOut,
}

/// System-wide opacity ramp driven by activity transitions.
#[derive(Clone, Debug)]
pub struct Fader {
    /// Ramp duration in seconds.
    pub fade_time: f32,
    /// Opacity reached when fully active.
    pub max_opacity: f32,
    /// When false, activity changes snap opacity instantly.
    pub do_fading: bool,
    state: FadeState,
    elapsed: f32,
    opacity: f32,
}

impl Default for Fader {
    fn default() -> Self {
        Self {
            fade_time: 2.0,
            max_opacity: 1.0,
            do_fading: true,
            state: FadeState::Inactive,
            elapsed: 0.0,
            opacity: 0.0,
        }
    }
}

impl Fader {
    /// Current fade state.
    pub fn state(&self) -> FadeState {
        self.state
    }

    /// Current system opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Seconds elapsed in the ongoing ramp.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Drive the machine toward the requested activity. A change of target
    /// begins a fresh ramp with `elapsed` reset to zero; re-requesting the
    /// current target is a no-op.
    pub fn set_active(&mut self, active: bool) {
        let is_on = matches!(self.state, FadeState::Active | FadeState::FadingIn);
        if active == is_on {
            return;
        }
        if !self.do_fading || self.fade_time <= 0.0 {
            self.state = if active {
                FadeState::Active
            } else {
                FadeState::Inactive
            };
            self.opacity = if active { self.max_opacity } else { 0.0 };
            self.elapsed = 0.0;
            return;
        }
        self.state = if active {
            FadeState::FadingIn
        } else {
            FadeState::FadingOut
        };
        self.elapsed = 0.0;
    }

    /// Advance the ongoing ramp. Terminal states only track `max_opacity`.
    pub fn advance(&mut self, dt: f32) {
        match self.state {
            FadeState::FadingIn => {
                self.elapsed += dt;
                if self.elapsed >= self.fade_time {
                    self.state = FadeState::Active;
                    self.opacity = self.max_opacity;
                } else {
                    self.opacity = self.max_opacity * self.elapsed / self.fade_time;
                }
            }
            FadeState::FadingOut => {
                self.elapsed += dt;
                if self.elapsed >= self.fade_time {
                    self.state = FadeState::Inactive;
                    self.opacity = 0.0;
                } else {
                    self.opacity = self.max_opacity * (1.0 - self.elapsed / self.fade_time);
                }
            }
            FadeState::Active => self.opacity = self.max_opacity,
            FadeState::Inactive => self.opacity = 0.0,
        }
    }
}
