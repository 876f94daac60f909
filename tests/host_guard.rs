use scene_episodes::renderer::{HeadlessRenderer, HeadlessSurface};
use scene_episodes::{ExerciseKind, Host, LifecycleState, MountOutcome};

#[test]
fn mounting_twice_starts_exactly_one_exercise() {
    let mut surface = HeadlessSurface::new(800, 600);
    let mut host = Host::new(ExerciseKind::Ep2, "web/assets");

    assert_eq!(host.mount(Some(&mut surface)).unwrap(), MountOutcome::Started);
    assert_eq!(
        host.mount(Some(&mut surface)).unwrap(),
        MountOutcome::AlreadyStarted
    );

    assert_eq!(surface.renderers_created(), 1);
    let exercise = host.exercise().unwrap();
    assert_eq!(exercise.state(), LifecycleState::Running);
    assert_eq!(exercise.scene().unwrap().mesh_count(), 6);
}

#[test]
fn missing_surface_can_be_retried_by_a_later_mount() {
    let mut host: Host<HeadlessRenderer> = Host::new(ExerciseKind::Ep1, "web/assets");
    assert_eq!(
        host.mount::<HeadlessSurface>(None).unwrap(),
        MountOutcome::SurfaceMissing
    );

    let mut surface = HeadlessSurface::new(320, 200);
    assert_eq!(host.mount(Some(&mut surface)).unwrap(), MountOutcome::Started);
    assert_eq!(surface.renderers_created(), 1);
}

#[test]
fn every_exercise_kind_starts() {
    for kind in ExerciseKind::ALL {
        let mut surface = HeadlessSurface::new(640, 360);
        let mut host = Host::new(kind, "web/assets");
        assert_eq!(host.mount(Some(&mut surface)).unwrap(), MountOutcome::Started);
        assert_eq!(host.kind(), kind);
    }
}
