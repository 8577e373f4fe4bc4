//! Fly-through demo.
//!
//! Records a camera orbiting a unit box, fits a path through the keyframes,
//! writes them to a `.kcsv` file and plays the path back, pressing "stop"
//! partway through.
//!
//! Run with `RUST_LOG=info cargo run --example flythrough_demo`.

use flythrough::*;

fn main() -> Result<()> {
    init_logging();

    let mut camera = Camera::new();
    camera.look_at_box(DVec3::splat(-1.0), DVec3::splat(1.0));

    let mut session = Session::with_options(Options {
        key_frame_spacing: 50.0,
        step_delay_ms: 5,
        ..Options::default()
    })?;

    // Eight keyframes around the box
    for _ in 0..8 {
        session.add_key_frame(&camera)?;
        camera.orbit(std::f64::consts::FRAC_PI_4, 0.05);
    }
    session.create_path()?;

    let preview = session.preview()?;
    println!(
        "path preview: {} nodes, {} edges, length {:.2}",
        preview.num_nodes(),
        preview.num_edges(),
        preview.length()
    );

    let file = std::env::temp_dir().join(format!("flythrough_demo.{KCSV_EXTENSION}"));
    session.save(&file)?;
    println!("keyframes written to {}", file.display());

    let control = session.control();
    let mut pumped = 0;
    let mut pump = || {
        // Stand-in for a stop button clicked during the 200th event pump.
        pumped += 1;
        if pumped == 200 {
            println!("stop clicked while showing '{}'", control.label());
            control.stop();
        }
    };
    let mut live = camera.clone();
    match session.fly(&mut live, &mut pump)? {
        PlaybackOutcome::Completed { steps } => println!("completed after {steps} steps"),
        PlaybackOutcome::Cancelled { at, steps } => {
            println!("stopped at t = {at} after {steps} steps");
        }
    }
    println!("final camera position: {:?} ({})", live.position, session.fly_label());

    Ok(())
}

