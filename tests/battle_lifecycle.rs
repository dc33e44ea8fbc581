//! Battle lifecycle integration tests

use guardian_battles::battle::*;
use guardian_battles::core::error::ErrorKind;
use guardian_battles::core::types::{CardId, GuardianId};

fn duel() -> (Battle, GuardianId, GuardianId) {
    let challenger = GuardianId::new();
    let defender = GuardianId::new();
    let battle = Battle::challenge(challenger, defender, BattleType::PvpDuel).unwrap();
    (battle, challenger, defender)
}

#[test]
fn test_full_lifecycle_keeps_every_snapshot() {
    let (pending, challenger, defender) = duel();
    let started = pending.start().unwrap();

    let strike = BattleMove::attack(started.id(), challenger, CardId::new(), defender, 15, 9, "Strike")
        .unwrap();
    let brace = BattleMove::defense(started.id(), defender, CardId::new(), 8, "Brace").unwrap();
    let mid = started.add_move(strike).unwrap().add_move(brace).unwrap();
    let done = mid.complete(Some(defender), 120).unwrap();

    assert_eq!(pending.status(), BattleStatus::Pending);
    assert_eq!(started.total_moves(), 0);
    assert_eq!(mid.total_moves(), 2);
    assert_eq!(mid.total_energy_spent(), 23);
    assert_eq!(done.status(), BattleStatus::Completed);
    assert_eq!(done.winner_id(), Some(defender));
    assert_eq!(done.moves_by_guardian(challenger)[0].description(), "Strike");
    assert!(done.completed_at() >= done.started_at());
}

#[test]
fn test_terminal_battles_reject_everything() {
    let (battle, challenger, defender) = duel();
    let completed = battle.start().unwrap().complete(None, 0).unwrap();
    let abandoned = battle.abandon().unwrap();

    for finished in [&completed, &abandoned] {
        assert_eq!(finished.start().unwrap_err().kind(), ErrorKind::State);
        assert_eq!(finished.abandon().unwrap_err().kind(), ErrorKind::State);
        assert_eq!(
            finished.complete(Some(challenger), 10).unwrap_err().kind(),
            ErrorKind::State
        );
        let mv = BattleMove::attack(finished.id(), challenger, CardId::new(), defender, 10, 1, "Late")
            .unwrap();
        assert_eq!(finished.add_move(mv).unwrap_err().kind(), ErrorKind::State);
    }
}

#[test]
fn test_abandon_in_progress_clears_winner() {
    let (battle, challenger, defender) = duel();
    let battle = battle.start().unwrap();
    let mv = BattleMove::attack(battle.id(), challenger, CardId::new(), defender, 20, 5, "Strike")
        .unwrap();
    let abandoned = battle.add_move(mv).unwrap().abandon().unwrap();
    assert!(abandoned.winner_id().is_none());
    assert_eq!(abandoned.xp_reward(), Some(0));
    assert_eq!(abandoned.total_energy_spent(), 20);
}

#[test]
fn test_participant_guards() {
    let (battle, _, _) = duel();
    let outsider = GuardianId::new();
    let started = battle.start().unwrap();
    assert_eq!(
        started.complete(Some(outsider), 10).unwrap_err().kind(),
        ErrorKind::Participation
    );
    assert_eq!(
        started.opponent_of(outsider).unwrap_err().kind(),
        ErrorKind::Participation
    );
}

#[test]
fn test_solo_battle_shape() {
    let guardian = GuardianId::new();
    let solo = Battle::solo(guardian);
    assert!(solo.is_solo());
    assert!(!solo.is_multiplayer());
    assert_eq!(solo.participants(), vec![guardian]);
    assert_eq!(solo.battle_type(), BattleType::SoloChallenge);
}

#[test]
fn test_snapshot_survives_storage() {
    let (battle, challenger, defender) = duel();
    let battle = battle.start().unwrap();
    let mv = BattleMove::special(battle.id(), challenger, CardId::new(), Some(defender), 25, 10, 4, "Storm")
        .unwrap();
    let battle = battle.add_move(mv).unwrap().complete(Some(challenger), 100).unwrap();

    let json = serde_json::to_string(&battle).unwrap();
    let restored: Battle = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, battle);

    let tampered = json.replace("\"total_energy_spent\":25", "\"total_energy_spent\":5");
    assert!(serde_json::from_str::<Battle>(&tampered).is_err());
}
