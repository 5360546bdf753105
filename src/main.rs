//! Headless demo: drives the system with a synthetic orbiting marker and
//! logs population statistics. Run with `RUST_LOG=info cargo run`.

use glam::Vec2;
use mdpe::prelude::*;

fn main() {
    env_logger::init();

    let (width, height) = (800.0, 600.0);
    let mut system = ParticleSystem::setup(Mode::Emitter, width, height);
    system.emitter.born_rate = 120.0;
    system.physics.gravity = Vec2::new(0.0, 40.0);
    system.physics.bounce = true;
    system.interaction.interact = true;
    system.interaction.attract = true;

    let contour = Contour::default();
    let fluid = StillFluid;
    let dt = 1.0 / 60.0;
    let mut angle: f32 = 0.0;
    let mut prev = Vec2::new(width / 2.0 + 200.0, height / 2.0);

    for frame in 0..600 {
        angle += 0.8 * dt;
        let pos = Vec2::new(
            width / 2.0 + 200.0 * angle.cos(),
            height / 2.0 + 150.0 * angle.sin(),
        );
        let mut marker = Marker::at(pos, 1);
        marker.velocity = (pos - prev) / dt;
        prev = pos;

        system.update(dt, &[marker], &contour, &fluid);

        if frame % 60 == 0 {
            let sprites = system.draw();
            let mean_alpha =
                sprites.iter().map(|s| s.alpha).sum::<f32>() / sprites.len().max(1) as f32;
            log::info!(
                "t={:4.1}s alive={:5} total={:6} mean_alpha={:.2}",
                frame as f32 * dt,
                system.num_particles(),
                system.total_particles_created(),
                mean_alpha
            );
        }
    }
}
