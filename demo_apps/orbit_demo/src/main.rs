//! Orbit demo: a camera follows a cube that slides sideways while the camera
//! circles it twice. Run with `RUST_LOG=debug` to watch the scheduler.

use glam::Vec3;
use pivot::{ActionEvent, AnchorSpace, Engine, EngineSettings, ObservationLink, TransformNode};

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut engine = Engine::new(EngineSettings::default());

    let cube = engine.scene.create_node("Cube");
    let builder = engine
        .camera("Main Camera")
        .position(Vec3::new(0.0, 2.0, 10.0))
        .target(Vec3::ZERO)
        .aspect(16.0 / 9.0);
    let camera = engine.scene.add_camera(builder)?;

    // The camera keeps the cube framed while it moves.
    engine.scene.observe_with(
        camera,
        ObservationLink::new(cube)
            .anchor_space(AnchorSpace::ObservedRelative)
            .carry_target(true),
    )?;

    let slide = engine.action().move_right(4.0).build();
    engine.play("slide", cube, slide, 2.0)?;

    let orbit = engine.action().rotate(Vec3::Y, 720.0).build();
    let orbit = engine.scheduler.add("orbit", camera, orbit, 4.0)?;

    while !engine.scheduler.is_empty() {
        engine.update(FRAME_DT);

        for event in engine.scheduler.drain_events() {
            match event {
                ActionEvent::Completed { action, .. } if Some(action) == engine.scheduler.find("slide") => {
                    log::info!("Slide finished after {:.2}s, starting orbit", engine.time());
                    engine.scheduler.remove(action);
                    engine.scheduler.run(orbit)?;
                }
                ActionEvent::Completed { action, .. } => {
                    log::info!("Orbit finished after {:.2}s", engine.time());
                    engine.scheduler.remove(action);
                }
                _ => {}
            }
        }

        if engine.frame_count() % 30 == 0
            && let Some(state) = engine.scene.camera(camera)
        {
            let eye = engine.scene.get_node(camera).map(TransformNode::position).unwrap_or_default();
            log::info!(
                "t={:.2}s eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2})",
                engine.time(),
                eye.x,
                eye.y,
                eye.z,
                state.target().x,
                state.target().y,
                state.target().z,
            );
        }

        engine.scene.drain_camera_events();
    }

    Ok(())
}
