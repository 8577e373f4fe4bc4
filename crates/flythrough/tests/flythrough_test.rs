//! End-to-end tests for recording, building, storing and flying a camera path.

use flythrough::*;

fn record_square_tour(session: &mut Session, camera: &mut Camera) {
    let corners = [
        DVec3::new(0.0, 0.0, 10.0),
        DVec3::new(10.0, 0.0, 10.0),
        DVec3::new(10.0, 10.0, 10.0),
        DVec3::new(0.0, 10.0, 10.0),
    ];
    for corner in corners {
        camera.position = corner;
        camera.focal_point = DVec3::new(corner.x, corner.y, 0.0);
        session.add_key_frame(&*camera).unwrap();
    }
}

#[test]
fn record_build_and_fly() {
    init_logging();

    let mut camera = Camera::new();
    let mut session = Session::with_options(Options {
        step_delay_ms: 0,
        ..Options::default()
    })
    .unwrap();
    record_square_tour(&mut session, &mut camera);
    assert_eq!(session.path().state(), PathState::HasKeyFrames);

    session.create_path().unwrap();
    assert_eq!(session.path().state(), PathState::PathBuilt);

    // The curve passes through every recorded pose.
    for key in session.path().key_frames() {
        assert_eq!(session.path().camera_at(key.time).unwrap(), key.pose);
    }

    let mut steps_seen = 0;
    let mut pump = || steps_seen += 1;
    let outcome = session.fly(&mut camera, &mut pump).unwrap();
    assert_eq!(outcome, PlaybackOutcome::Completed { steps: 301 });
    assert_eq!(steps_seen, 301);
    assert_eq!(camera.position, DVec3::new(0.0, 10.0, 10.0));
    assert!(camera.near > 0.0 && camera.near < camera.far);
}

#[test]
fn example_path_properties() {
    let mut path = CameraPath::new();
    path.add_key_frame(0.0, DVec3::ZERO, DVec3::NEG_Z, DVec3::Y)
        .unwrap();
    path.add_key_frame(100.0, DVec3::new(10.0, 0.0, 0.0), DVec3::NEG_Z, DVec3::Y)
        .unwrap();
    path.add_key_frame(200.0, DVec3::new(10.0, 10.0, 0.0), DVec3::NEG_Z, DVec3::Y)
        .unwrap();

    assert!(matches!(path.camera_at(50.0), Err(FlythroughError::PathNotBuilt)));
    path.create_path().unwrap();

    let mid = path.camera_at(50.0).unwrap().position;
    assert!(mid.x > 0.0 && mid.x < 10.0);
    assert_eq!(path.camera_at(1e6).unwrap(), path.camera_at(200.0).unwrap());

    let samples: Vec<(f64, CameraPose)> = PathSampler::new(&path, 25.0).unwrap().collect();
    assert_eq!(samples.len(), 9);
    assert_eq!(samples[8].1.position, DVec3::new(10.0, 10.0, 0.0));
}

#[test]
fn overwrite_keeps_count() {
    let mut path = CameraPath::new();
    path.add_key_frame(100.0, DVec3::ZERO, DVec3::Z, DVec3::Y)
        .unwrap();
    path.add_key_frame(100.0, DVec3::ONE, DVec3::Z, DVec3::Y)
        .unwrap();
    assert_eq!(path.num_key_frames(), 1);
    assert_eq!(path.key_frame_at(100.0).unwrap().position(), DVec3::ONE);
}

#[test]
fn stored_session_flies_the_same_path() {
    let file = std::env::temp_dir().join(format!("flythrough_it.{KCSV_EXTENSION}"));

    let mut camera = Camera::new();
    let mut session = Session::new();
    record_square_tour(&mut session, &mut camera);
    session.create_path().unwrap();
    session.save(&file).unwrap();

    let mut loaded = storage::load(&file).unwrap();
    loaded.create_path().unwrap();
    for t in [0.0, 37.5, 150.0, 299.0] {
        assert_eq!(
            loaded.camera_at(t).unwrap(),
            session.path().camera_at(t).unwrap()
        );
    }

    let preview = session.preview().unwrap();
    assert_eq!(preview.num_nodes(), 30 * 300 + 1);
    let (min, max) = preview.bounding_box().unwrap();
    assert!(min.x <= 0.0 && max.y >= 10.0);

    let _ = std::fs::remove_file(&file);
}

#[test]
fn scene_registry_holds_paths() {
    let mut scene = Scene::new();
    let id = scene.add_path(CameraPath::new());
    let path = scene.path_mut(&id).unwrap();
    path.add_key_frame(0.0, DVec3::Z, DVec3::ZERO, DVec3::Y)
        .unwrap();
    path.create_path().unwrap();
    assert_eq!(
        scene.path(&id).unwrap().camera_at(42.0).unwrap().position,
        DVec3::Z
    );
}
