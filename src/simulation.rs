//! The particle system: owner of the population and orchestrator of the
//! per-frame pass.
//!
//! One [`ParticleSystem`] is created per installation via
//! [`ParticleSystem::setup`] and lives for the process lifetime. Each frame
//! the host calls [`update`](ParticleSystem::update) with the elapsed time
//! and the three external signal sources, then
//! [`draw`](ParticleSystem::draw) for the per-particle visual attributes.
//!
//! The pass is single-threaded and fully synchronous:
//!
//! 1. system fade
//! 2. emission (mode-dependent)
//! 3. flocking and inter-particle repulsion
//! 4. interaction mapping (markers, contour, fluid)
//! 5. physics integration and boundary handling
//! 6. aging and removal of expired particles
//!
//! The caller supplies `dt` and owns its clamping; this core does not cap it.
//!
//! ```ignore
//! let mut system = ParticleSystem::setup(Mode::Emitter, 800.0, 600.0);
//! system.physics.gravity = Vec2::new(0.0, 30.0);
//! loop {
//!     system.update(dt, &markers, &contour, &fluid);
//!     for sprite in system.draw() {
//!         // hand off to the renderer
//!     }
//! }
//! ```

use crate::emitter::{Animation, BirthAccumulator, EmitterConfig, Mode};
use crate::flocking::{self, FlockingConfig};
use crate::input::{Contour, Fluid, Marker, Polyline};
use crate::interactions::{self, InteractionConfig};
use crate::lifecycle::Lifecycle;
use crate::particle::Particle;
use crate::physics::{self, PhysicsConfig, TurbulenceField};
use crate::spatial::SpatialGrid;
use crate::spawn::SpawnContext;
use crate::visuals::{self, Fader, Sprite, VisualConfig};
use glam::{Vec2, Vec3};
use log::{debug, info};
use std::f32::consts::TAU;

/// Aggregate root owning every particle and all configuration.
///
/// Configuration fields are public and may be changed at any time; they take
/// effect on the next [`update`](ParticleSystem::update).
pub struct ParticleSystem {
    /// Whole-system activity switch driving the fade machine.
    pub is_active: bool,
    /// Emission parameters.
    pub emitter: EmitterConfig,
    /// Birth/death parameters applied to every spawn.
    pub lifecycle: Lifecycle,
    /// Physical constants and wall behavior.
    pub physics: PhysicsConfig,
    /// Flocking solver parameters.
    pub flocking: FlockingConfig,
    /// External-signal interaction flags and strengths.
    pub interaction: InteractionConfig,
    /// Per-particle visual aging flags.
    pub visuals: VisualConfig,
    /// System-wide opacity fade machine.
    pub fader: Fader,

    particles: Vec<Particle>,
    total_created: u64,
    mode: Mode,
    animation: Option<Animation>,
    width: f32,
    height: f32,
    spawn: SpawnContext,
    turbulence: TurbulenceField,
    grid: SpatialGrid,
    births: BirthAccumulator,
    time: f32,
}

impl ParticleSystem {
    /// Create a system for a `width` x `height` domain and seed the initial
    /// population of the chosen mode.
    pub fn setup(mode: Mode, width: f32, height: f32) -> Self {
        let flocking = FlockingConfig {
            enabled: mode == Mode::Boids,
            ..Default::default()
        };
        let mut system = Self {
            is_active: true,
            emitter: EmitterConfig {
                position: Vec2::new(width / 2.0, height / 2.0),
                ..Default::default()
            },
            lifecycle: Lifecycle::default(),
            physics: PhysicsConfig::default(),
            flocking,
            interaction: InteractionConfig::default(),
            visuals: VisualConfig::default(),
            fader: Fader::default(),
            particles: Vec::new(),
            total_created: 0,
            mode,
            animation: None,
            width,
            height,
            spawn: SpawnContext::new(width, height),
            turbulence: TurbulenceField::new(0x6d70),
            grid: SpatialGrid::new(width, height, 60.0),
            births: BirthAccumulator::default(),
            time: 0.0,
        };
        match mode {
            Mode::Grid => system.create_particle_grid(width, height),
            Mode::Random | Mode::Boids => {
                let n = system.emitter.n_particles;
                system.add_particles(n);
            }
            Mode::Emitter | Mode::Animations => {}
        }
        info!(
            "particle system ready: {:?} mode, {}x{} domain, {} seeded",
            mode,
            width,
            height,
            system.particles.len()
        );
        system
    }

    /// Re-seed the RNG with a fixed seed. Tests use this to pin statistical
    /// ranges; sequences across runs are otherwise not reproducible.
    pub fn reseed(&mut self, seed: u64) {
        self.spawn = SpawnContext::with_seed(self.width, self.height, seed);
    }

    // =========================================================================
    // FRAME PASS
    // =========================================================================

    /// Advance the whole system by `dt` seconds.
    pub fn update(&mut self, dt: f32, markers: &[Marker], contour: &Contour, fluid: &dyn Fluid) {
        self.time += dt;
        self.fader.set_active(self.is_active);
        self.fader.advance(dt);

        self.emission_step(dt, markers, contour);

        if self.flocking.enabled {
            flocking::flock(&mut self.particles, &self.flocking, &mut self.grid, dt);
        }
        if self.physics.repulse {
            flocking::repulse(
                &mut self.particles,
                self.physics.repulse_dist,
                &mut self.grid,
                dt,
            );
        }

        for p in &mut self.particles {
            interactions::apply(p, &self.interaction, markers, contour, fluid);
        }

        for p in &mut self.particles {
            physics::integrate(
                p,
                &self.physics,
                &self.turbulence,
                self.time,
                dt,
                self.width,
                self.height,
            );
        }

        let immortal = self.lifecycle.immortal;
        for p in &mut self.particles {
            p.age += dt;
            if !immortal && p.expired() {
                p.alive = false;
            }
        }
        self.particles.retain(|p| p.alive);
    }

    /// Visual attributes of every live particle, in creation order.
    pub fn draw(&self) -> Vec<Sprite> {
        let opacity = self.fader.opacity();
        self.particles
            .iter()
            .map(|p| visuals::sprite(p, &self.visuals, opacity))
            .collect()
    }

    fn emission_step(&mut self, dt: f32, markers: &[Marker], contour: &Contour) {
        if !self.emitter.emit {
            return;
        }
        match self.mode {
            Mode::Emitter => {
                let n = self.births.advance(self.emitter.born_rate, dt);
                if n == 0 {
                    return;
                }
                if self.interaction.markers_input && !markers.is_empty() {
                    for marker in markers {
                        self.add_particles_from_marker(n as usize, marker);
                    }
                } else if self.interaction.contour_input && !contour.is_empty() {
                    for polyline in &contour.polylines {
                        self.add_particles_on_contour(n as usize, polyline, contour);
                    }
                } else {
                    self.emit_at_fixed_point(n as usize);
                }
            }
            Mode::Animations => self.animation_emission(dt),
            _ => {}
        }
    }

    fn emit_at_fixed_point(&mut self, n: usize) {
        for _ in 0..n {
            let pos = self
                .spawn
                .random_in_disk(self.emitter.position, self.emitter.emitter_size);
            let speed = self
                .spawn
                .vary(self.emitter.velocity, self.emitter.velocity_rnd);
            let vel = self.spawn.random_direction() * speed;
            let (radius, lifetime) = self.lifecycle.birth_params(&mut self.spawn);
            self.add_particle(pos, vel, self.lifecycle.color, radius, lifetime);
        }
    }

    fn animation_emission(&mut self, dt: f32) {
        let animation = match self.animation {
            Some(a) => a,
            None => return,
        };
        let n = self.births.advance(self.emitter.born_rate, dt);
        for _ in 0..n {
            let (pos, dir) = match animation {
                Animation::Snow | Animation::Rain => (self.spawn.random_on_top_edge(), Vec2::Y),
                Animation::Wind => (self.spawn.random_on_left_edge(), Vec2::X),
                // The explosion is a one-time burst fired by set_animation.
                Animation::Explosion => return,
            };
            let speed = self
                .spawn
                .vary(self.emitter.velocity, self.emitter.velocity_rnd);
            let (radius, lifetime) = self.lifecycle.birth_params(&mut self.spawn);
            self.add_particle(pos, dir * speed, self.lifecycle.color, radius, lifetime);
        }
    }

    // =========================================================================
    // POPULATION OPERATIONS
    // =========================================================================

    /// Add one particle with explicit birth attributes.
    pub fn add_particle(&mut self, pos: Vec2, vel: Vec2, color: Vec3, radius: f32, lifetime: f32) {
        let particle = Particle::new(self.total_created, pos, vel, color, radius, lifetime);
        self.total_created += 1;
        self.particles.push(particle);
    }

    /// Add `n` particles at uniformly random positions within bounds.
    pub fn add_particles(&mut self, n: usize) {
        for _ in 0..n {
            let pos = self.spawn.random_in_bounds();
            let speed = self
                .spawn
                .vary(self.emitter.velocity, self.emitter.velocity_rnd);
            let vel = self.spawn.random_direction() * speed;
            let (radius, lifetime) = self.lifecycle.birth_params(&mut self.spawn);
            self.add_particle(pos, vel, self.lifecycle.color, radius, lifetime);
        }
    }

    /// Add `n` particles around a tracked marker. The marker's own motion
    /// contributes `velocity_motion`% of the initial velocity.
    pub fn add_particles_from_marker(&mut self, n: usize, marker: &Marker) {
        for _ in 0..n {
            let pos = self
                .spawn
                .random_in_disk(marker.position, self.emitter.emitter_size);
            let speed = self
                .spawn
                .vary(self.emitter.velocity, self.emitter.velocity_rnd);
            let vel = self.spawn.random_direction() * speed
                + marker.velocity * (self.emitter.velocity_motion / 100.0);
            let (radius, lifetime) = self.lifecycle.birth_params(&mut self.spawn);
            self.add_particle(pos, vel, self.lifecycle.color, radius, lifetime);
        }
    }

    /// Add `n` particles on a contour boundary. The region's motion sample
    /// contributes `velocity_motion`% of the initial velocity.
    pub fn add_particles_on_contour(&mut self, n: usize, polyline: &Polyline, contour: &Contour) {
        for _ in 0..n {
            let pos = match self.spawn.random_on_polyline(&polyline.points) {
                Some(pos) => pos,
                None => return,
            };
            let motion = contour
                .closest_point(pos, f32::INFINITY)
                .map(|hit| contour.velocity_of(hit.region))
                .unwrap_or(Vec2::ZERO);
            let speed = self
                .spawn
                .vary(self.emitter.velocity, self.emitter.velocity_rnd);
            let vel = self.spawn.random_direction() * speed
                + motion * (self.emitter.velocity_motion / 100.0);
            let (radius, lifetime) = self.lifecycle.birth_params(&mut self.spawn);
            self.add_particle(pos, vel, self.lifecycle.color, radius, lifetime);
        }
    }

    /// Replace the population with a `grid_res x grid_res` lattice covering
    /// `width` x `height`, at rest.
    pub fn create_particle_grid(&mut self, width: f32, height: f32) {
        self.particles.clear();
        let res = self.emitter.grid_res.max(1);
        let step = 1.0 / res as f32;
        for row in 0..res {
            for col in 0..res {
                // Lattice points sit at cell centers so the whole grid
                // stays inside the extent.
                let pos = Vec2::new(
                    (col as f32 + 0.5) * step * width,
                    (row as f32 + 0.5) * step * height,
                );
                let (radius, lifetime) = self.lifecycle.birth_params(&mut self.spawn);
                self.add_particle(pos, Vec2::ZERO, self.lifecycle.color, radius, lifetime);
            }
        }
        info!("created {res}x{res} particle grid over {width}x{height}");
    }

    /// Remove up to `n` particles, oldest first. Requesting more than exist
    /// removes all without fault.
    pub fn remove_particles(&mut self, n: usize) {
        let n = n.min(self.particles.len());
        self.particles.drain(..n);
    }

    /// Remove every particle immediately.
    pub fn kill_particles(&mut self) {
        debug!("killing {} particles", self.particles.len());
        self.particles.clear();
    }

    /// Re-seed the population of fixed-population modes (Grid, Random,
    /// Boids) after a kill. Emitter-driven modes refill on their own.
    pub fn born_particles(&mut self) {
        match self.mode {
            Mode::Grid => {
                let (w, h) = (self.width, self.height);
                self.create_particle_grid(w, h);
            }
            Mode::Random | Mode::Boids => {
                self.kill_particles();
                let n = self.emitter.n_particles;
                self.add_particles(n);
            }
            Mode::Emitter | Mode::Animations => {}
        }
    }

    /// Switch to an animation preset, overriding gravity, turbulence,
    /// velocity and lifetime with the preset's bundle.
    pub fn set_animation(&mut self, animation: Animation) {
        self.mode = Mode::Animations;
        self.animation = Some(animation);
        self.births.reset();
        self.lifecycle.immortal = false;
        self.emitter.emit = true;

        match animation {
            Animation::Snow => {
                self.physics.gravity = Vec2::new(0.0, 20.0);
                self.physics.turbulence = 40.0;
                self.emitter.velocity = 10.0;
                self.emitter.velocity_rnd = 50.0;
                self.emitter.born_rate = 60.0;
                self.lifecycle.lifetime = 10.0;
                self.lifecycle.lifetime_rnd = 30.0;
                self.lifecycle.radius = 3.0;
            }
            Animation::Rain => {
                self.physics.gravity = Vec2::new(0.0, 300.0);
                self.physics.turbulence = 0.0;
                self.emitter.velocity = 60.0;
                self.emitter.velocity_rnd = 20.0;
                self.emitter.born_rate = 120.0;
                self.lifecycle.lifetime = 2.5;
                self.lifecycle.lifetime_rnd = 30.0;
                self.lifecycle.radius = 1.5;
            }
            Animation::Wind => {
                self.physics.gravity = Vec2::ZERO;
                self.physics.turbulence = 60.0;
                self.emitter.velocity = 150.0;
                self.emitter.velocity_rnd = 30.0;
                self.emitter.born_rate = 80.0;
                self.lifecycle.lifetime = 3.0;
                self.lifecycle.lifetime_rnd = 40.0;
                self.lifecycle.radius = 2.0;
            }
            Animation::Explosion => {
                self.physics.gravity = Vec2::new(0.0, 150.0);
                self.physics.turbulence = 0.0;
                self.emitter.velocity = 250.0;
                self.emitter.velocity_rnd = 30.0;
                self.emitter.emit = false;
                self.lifecycle.lifetime = 1.5;
                self.lifecycle.lifetime_rnd = 40.0;
                self.lifecycle.radius = 4.0;
                self.explosion_burst();
            }
        }
        info!("animation preset: {animation:?}");
    }

    /// One radial burst from the domain center, directions evenly
    /// distributed over the full circle.
    fn explosion_burst(&mut self) {
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);
        let n = self.emitter.n_particles.max(1);
        for i in 0..n {
            let angle = i as f32 / n as f32 * TAU;
            let dir = Vec2::new(angle.cos(), angle.sin());
            let speed = self
                .spawn
                .vary(self.emitter.velocity, self.emitter.velocity_rnd);
            let (radius, lifetime) = self.lifecycle.birth_params(&mut self.spawn);
            self.add_particle(center, dir * speed, self.lifecycle.color, radius, lifetime);
        }
        debug!("explosion burst: {n} particles");
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Live particle count. Always equals the length of the owned store.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Monotonic count of every particle ever spawned.
    pub fn total_particles_created(&self) -> u64 {
        self.total_created
    }

    /// Read access to the live population, in creation order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Current emission mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current animation preset, if the mode is Animations.
    pub fn animation(&self) -> Option<Animation> {
        self.animation
    }

    /// Domain size set at setup.
    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::StillFluid;

    #[test]
    fn test_setup_seeds_random_mode() {
        let system = ParticleSystem::setup(Mode::Random, 800.0, 600.0);
        assert_eq!(system.num_particles(), system.emitter.n_particles);
        assert_eq!(
            system.total_particles_created(),
            system.emitter.n_particles as u64
        );
    }

    #[test]
    fn test_setup_boids_enables_flocking() {
        let system = ParticleSystem::setup(Mode::Boids, 800.0, 600.0);
        assert!(system.flocking.enabled);
        assert!(system.num_particles() > 0);
    }

    #[test]
    fn test_setup_emitter_starts_empty() {
        let system = ParticleSystem::setup(Mode::Emitter, 800.0, 600.0);
        assert_eq!(system.num_particles(), 0);
    }

    #[test]
    fn test_remove_particles_is_oldest_first() {
        let mut system = ParticleSystem::setup(Mode::Emitter, 100.0, 100.0);
        for _ in 0..5 {
            system.add_particle(Vec2::ZERO, Vec2::ZERO, Vec3::ONE, 1.0, 10.0);
        }
        system.remove_particles(2);
        let ids: Vec<u64> = system.particles().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_remove_more_than_population_removes_all() {
        let mut system = ParticleSystem::setup(Mode::Random, 100.0, 100.0);
        system.remove_particles(usize::MAX);
        assert_eq!(system.num_particles(), 0);
    }

    #[test]
    fn test_born_particles_reseeds_fixed_population() {
        let mut system = ParticleSystem::setup(Mode::Random, 100.0, 100.0);
        system.kill_particles();
        assert_eq!(system.num_particles(), 0);
        system.born_particles();
        assert_eq!(system.num_particles(), system.emitter.n_particles);
    }

    #[test]
    fn test_explosion_burst_speeds_within_jitter() {
        let mut system = ParticleSystem::setup(Mode::Emitter, 400.0, 400.0);
        system.reseed(9);
        system.emitter.n_particles = 64;
        system.set_animation(Animation::Explosion);
        assert_eq!(system.num_particles(), 64);
        for p in system.particles() {
            let speed = p.vel.length();
            assert!((175.0..=325.0).contains(&speed), "speed {speed}");
        }
    }

    #[test]
    fn test_update_runs_headless() {
        let mut system = ParticleSystem::setup(Mode::Random, 200.0, 200.0);
        system.physics.bounce = true;
        system.physics.gravity = Vec2::new(0.0, 50.0);
        for _ in 0..30 {
            system.update(1.0 / 60.0, &[], &Contour::default(), &StillFluid);
        }
        assert_eq!(system.draw().len(), system.num_particles());
    }
}
