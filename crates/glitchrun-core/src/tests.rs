#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::commands::PlayerCommand;
    use crate::components::{PickupKind, SupplyContent};
    use crate::enums::*;
    use crate::events::GameEvent;
    use crate::meta::{MetaProgress, DEFAULT_UNLOCKS};
    use crate::state::GameStateSnapshot;
    use crate::types::*;

    #[test]
    fn test_mission_type_serde() {
        let variants = vec![
            MissionType::Survive,
            MissionType::Eliminate,
            MissionType::HoldPosition,
            MissionType::Purge,
            MissionType::DataRetrieval,
            MissionType::Escort,
            MissionType::Boss,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: MissionType = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_weapon_ids_are_unique() {
        let mut ids: Vec<&str> = WeaponKind::ALL.iter().map(|w| w.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), WeaponKind::ALL.len());
    }

    #[test]
    fn test_boss_kinds_have_ids() {
        for kind in [
            EnemyKind::Overseer,
            EnemyKind::Hydra,
            EnemyKind::Leviathan,
            EnemyKind::Architect,
        ] {
            assert!(kind.is_boss());
            assert!(kind.boss_id().is_some());
            assert!(kind.spawn_priority() > EnemyKind::Elite.spawn_priority());
        }
        assert!(EnemyKind::Swarmer.boss_id().is_none());
    }

    /// Verify PlayerCommand round-trips through serde (tagged union).
    #[test]
    fn test_player_command_serde() {
        let commands = vec![
            PlayerCommand::StartRun,
            PlayerCommand::Move { x: 0.5, y: -1.0 },
            PlayerCommand::SelectUpgrade { index: 2 },
            PlayerCommand::SelectAugment { index: 0 },
            PlayerCommand::Pause,
            PlayerCommand::Resume,
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: PlayerCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(json, serde_json::to_string(&back).unwrap());
        }
    }

    #[test]
    fn test_game_event_serde() {
        let events = vec![
            GameEvent::WaveStarted {
                wave: 6,
                mission: MissionType::Boss,
            },
            GameEvent::PickupCollected {
                kind: PickupKind::SupplyDrop(SupplyContent::TemporaryWeapon(
                    WeaponKind::HaloDrive,
                )),
                value: 0,
            },
            GameEvent::RunEnded {
                victory: false,
                wave: 12,
            },
        ];
        for event in &events {
            let json = serde_json::to_string(event).unwrap();
            let back: GameEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(*event, back);
        }
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = GameStateSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.time.tick, back.time.tick);
        assert_eq!(snapshot.phase, back.phase);
        assert!(
            json.len() < 1024,
            "Empty snapshot should be <1KB, was {} bytes",
            json.len()
        );
    }

    #[test]
    fn test_meta_default_unlocks() {
        let meta = MetaProgress::default();
        for id in DEFAULT_UNLOCKS {
            assert!(meta.is_unlocked(id));
        }
        assert!(!meta.weapon_unlocked(WeaponKind::ParadoxPendulum));
        assert_eq!(meta.upgrade_level("might"), 0);
    }

    #[test]
    fn test_meta_missing_fields_take_defaults() {
        let meta: MetaProgress = serde_json::from_str(r#"{"currency": 12}"#).unwrap();
        assert_eq!(meta.currency, 12);
        assert_eq!(meta.runs_completed, 0);
        assert!(meta.weapon_unlocked(WeaponKind::PulseBlaster));
    }

    #[test]
    fn test_circles_overlap() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 5.0, Vec2::new(8.0, 0.0), 3.0));
        assert!(!circles_overlap(a, 5.0, Vec2::new(8.1, 0.0), 3.0));
        assert!(circles_overlap(a, 1.0, a, 1.0));
    }

    #[test]
    fn test_segment_overlap() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(100.0, 0.0);
        assert!(segment_overlaps_circle(start, end, 2.0, Vec2::new(50.0, 9.0), 8.0));
        assert!(!segment_overlaps_circle(start, end, 2.0, Vec2::new(50.0, 11.0), 8.0));
        // Past the endpoint the distance is measured to the endpoint.
        assert!((distance_to_segment(Vec2::new(103.0, 4.0), start, end) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_viewport_margin() {
        let view = Viewport::centered_on(Vec2::new(1000.0, 0.0));
        assert!(view.is_on_screen(Vec2::new(1000.0 + 640.0 + 90.0, 0.0), 5.0));
        assert!(!view.is_on_screen(Vec2::new(1000.0 + 640.0 + 120.0, 0.0), 5.0));
    }

    #[test]
    fn test_non_finite_values_are_sanitized() {
        let view = Viewport::centered_on(Vec2::new(f32::NAN, 3.0));
        assert_eq!(view.center, Vec2::ZERO);
        assert_eq!(clamp_input(Vec2::new(f32::INFINITY, 0.0)), Vec2::ZERO);
    }

    #[test]
    fn test_clamp_input() {
        let clamped = clamp_input(Vec2::new(3.0, 4.0));
        assert!((clamped.length() - 1.0).abs() < 1e-6);
        let small = Vec2::new(0.3, 0.4);
        assert_eq!(clamp_input(small), small);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance();
        }
        assert_eq!(time.tick, 60);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }
}
