use ranch_gamestate::prelude::*;
use ranch_math::Vec3;

#[test]
fn test_bundled_level_hydrates() {
    let mut levels = LevelManager::new();
    levels.register_level(ranch_entrance().unwrap());

    let plan = levels.load_level("ranch_entrance", None).unwrap();
    assert_eq!(plan.player_spawn.position, DEFAULT_PLAYER_SPAWN);
    // Posts, four fences and the barn; the floor has no collider
    assert_eq!(plan.static_boxes.len(), 7);
    assert_eq!(plan.enemy_spawns.len(), 4);
}

#[test]
fn test_pasture_exit_waits_for_red_keycard() {
    let mut levels = LevelManager::new();
    levels.register_level(ranch_entrance().unwrap());
    levels.load_level("ranch_entrance", None).unwrap();

    let exit = Vec3::new(-25.0, 1.0, 0.0);
    assert!(matches!(levels.check_boundaries(exit), Some(BoundaryEvent::Blocked { .. })));

    levels.add_keycard("red");
    match levels.check_boundaries(exit) {
        Some(BoundaryEvent::Transition { target_level, target_spawn, .. }) => {
            assert_eq!(target_level, "ranch_pasture");
            assert_eq!(target_spawn, "from_entrance");
        }
        other => panic!("expected transition, got {other:?}"),
    }

    // The target level is not registered
    assert!(matches!(
        levels.load_level("ranch_pasture", Some("from_entrance")),
        Err(GameStateError::LevelNotFound(_))
    ));
}

#[test]
fn test_load_bundled_dir() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("levels");
    let mut levels = LevelManager::new();
    let ids = levels.load_dir(dir).unwrap();
    assert_eq!(ids, vec!["ranch_entrance".to_string()]);
    assert!(levels.level("ranch_entrance").is_some());
}
