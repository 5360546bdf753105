//! # MDPE - Motion Driven Particle Engine
//!
//! Real-time particle simulations driven by human motion, with a simple,
//! composable API.
//!
//! MDPE owns thousands of short-lived particles and re-evaluates them every
//! frame under a real-time budget: several emission policies, a flocking
//! solver, a boundary-physics model, time-based visual aging, and an
//! interaction layer mapping external sensor signals (tracked infrared
//! markers, a depth contour, a fluid velocity field) onto per-particle
//! forces. The host supplies the signals and renders the output; MDPE does
//! everything in between.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mdpe::prelude::*;
//!
//! let mut system = ParticleSystem::setup(Mode::Emitter, 800.0, 600.0);
//! system.physics.gravity = Vec2::new(0.0, 30.0);
//! system.physics.bounce = true;
//! system.interaction.interact = true;
//! system.interaction.attract = true;
//!
//! loop {
//!     // markers/contour/fluid come from the sensor pipeline
//!     system.update(dt, &markers, &contour, &fluid);
//!     for sprite in system.draw() {
//!         // hand position/radius/color/alpha to the renderer
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Emission modes
//!
//! A [`Mode`] chosen at setup decides when and where particles are born:
//! continuous emission from markers or a fixed point, a one-time lattice or
//! random scatter, flocking boids, or a named [`Animation`] preset (snow,
//! rain, wind, explosion).
//!
//! ### The frame pass
//!
//! Every [`ParticleSystem::update`] runs one deterministic, single-threaded
//! pass: emission, flocking/repulsion, interaction mapping, physics
//! integration, aging. Nothing blocks, nothing escalates errors - empty
//! neighbor queries and degenerate configuration are absorbed as defined
//! behavior.
//!
//! ### Configuration
//!
//! Behavior is grouped into plain config structs, all public on the system
//! and changeable between frames:
//!
//! | Group | Controls |
//! |-------|----------|
//! | [`EmitterConfig`] | Birth rate, initial velocity, emitter geometry |
//! | [`Lifecycle`] | Lifetime/radius jitter, immortality, birth color |
//! | [`PhysicsConfig`] | Friction, gravity, turbulence, wall behavior |
//! | [`FlockingConfig`] | Separation/alignment/attraction bands, max speed |
//! | [`InteractionConfig`] | Marker/contour/fluid force mapping |
//! | [`VisualConfig`] | Size/opacity/color aging, flicker |
//! | [`Fader`] | System-wide opacity fade in/out |

pub mod emitter;
pub mod flocking;
pub mod input;
pub mod interactions;
pub mod lifecycle;
pub mod particle;
pub mod physics;
pub mod simulation;
pub mod spatial;
pub mod spawn;
pub mod visuals;

pub use emitter::{Animation, BirthAccumulator, EmitterConfig, Mode};
pub use flocking::FlockingConfig;
pub use glam::{Vec2, Vec3};
pub use input::{closest_marker, Contour, ContourHit, Fluid, Marker, Polyline, StillFluid, VelocityGrid};
pub use interactions::InteractionConfig;
pub use lifecycle::Lifecycle;
pub use particle::Particle;
pub use physics::{Boundary, PhysicsConfig, TurbulenceField};
pub use simulation::ParticleSystem;
pub use spatial::SpatialGrid;
pub use spawn::SpawnContext;
pub use visuals::{FadeState, Fader, Sprite, VisualConfig};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use mdpe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::emitter::{Animation, EmitterConfig, Mode};
    pub use crate::flocking::FlockingConfig;
    pub use crate::input::{Contour, Fluid, Marker, Polyline, StillFluid, VelocityGrid};
    pub use crate::interactions::InteractionConfig;
    pub use crate::lifecycle::Lifecycle;
    pub use crate::particle::Particle;
    pub use crate::physics::PhysicsConfig;
    pub use crate::simulation::ParticleSystem;
    pub use crate::visuals::{FadeState, Sprite, VisualConfig};
    pub use crate::{Vec2, Vec3};
}
