use std::sync::{Arc, Mutex};
use std::time::Duration;

use tactics_core::{
    BattleConfig, BattleEnv, BattlePhase, BattleState, CommandKind, GridMap, Position, Side,
    StaticTile, UnitId, UnitSpec,
};
use tactics_runtime::providers::ai::{ActionCandidateGenerator, AiContext};
use tactics_runtime::{
    AiEvent, AiResolution, BattleEvent, BattleSession, Event, Intent, PlannerIntentProvider, RuntimeConfig, RuntimeError,
    ScriptedIntentProvider, TacticalPlanner, Topic, TurnEvent,
};

fn config() -> RuntimeConfig {
    RuntimeConfig::default().with_ai_action_delay(Duration::ZERO)
}

fn deploy(state: &mut BattleState, map: &GridMap, name: &str, side: Side, at: (i32, i32)) -> UnitId {
    state
        .deploy(map, UnitSpec::new(name, side, 2, 5.0), Position::new(at.0, at.1))
        .unwrap()
}

fn record(session: &BattleSession, topic: Topic) -> Arc<Mutex<Vec<Event>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    session.bus().listen(topic, move |event| {
        sink.lock().unwrap().push(event.clone());
    });
    seen
}

#[test]
fn enemy_turn_starts_exactly_when_the_last_player_unit_acts() {
    let map = GridMap::flat(8, 8);
    let mut state = BattleState::new();
    let players = [
        deploy(&mut state, &map, "a", Side::Player, (0, 0)),
        deploy(&mut state, &map, "b", Side::Player, (2, 0)),
        deploy(&mut state, &map, "c", Side::Player, (4, 0)),
    ];
    deploy(&mut state, &map, "x", Side::Enemy, (7, 7));
    let mut session = BattleSession::new(state, map, config());
    let turn = record(&session, Topic::Turn);
    session.start();

    session
        .command(CommandKind::Move, players[0], Position::new(0, 1))
        .unwrap();
    assert_eq!(session.phase(), BattlePhase::PlayerTurn);
    session.skip_unit(players[1]).unwrap();
    assert_eq!(session.phase(), BattlePhase::PlayerTurn);
    assert_eq!(session.state().turn.exhausted_count(), 2);

    session
        .command(CommandKind::Move, players[2], Position::new(4, 2))
        .unwrap();

    assert_eq!(session.phase(), BattlePhase::EnemyTurn);
    assert!(!session.can_undo());
    let events = turn.lock().unwrap();
    assert!(events.contains(&Event::Turn(TurnEvent::PreviewCleared)));
    assert_eq!(
        events.last(),
        Some(&Event::Turn(TurnEvent::TurnStarted {
            side: Side::Enemy,
            round: 0
        }))
    );
}

#[tokio::test]
async fn planner_turn_hands_control_back_with_a_fresh_preview() {
    let map = GridMap::flat(9, 9);
    let mut state = BattleState::new();
    let player = deploy(&mut state, &map, "p", Side::Player, (0, 0));
    let enemies = [
        deploy(&mut state, &map, "e1", Side::Enemy, (8, 8)),
        deploy(&mut state, &map, "e2", Side::Enemy, (6, 8)),
    ];
    let mut session = BattleSession::new(state, map, config());
    let turn = record(&session, Topic::Turn);
    session.start();
    assert_eq!(session.preview().len(), 2);

    session.skip_unit(player).unwrap();
    let outcomes = session.run_ai_turn().unwrap().run().await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|outcome| outcome.outcome().is_some()));
    assert_eq!(session.phase(), BattlePhase::PlayerTurn);
    assert_eq!(session.state().turn.round, 1);
    assert!(!session.state().is_exhausted(player));
    assert!(enemies.iter().all(|id| session.state().is_exhausted(*id)));
    assert_eq!(session.preview().len(), 2);

    let events = turn.lock().unwrap();
    let started = events
        .iter()
        .position(|event| {
            *event
                == Event::Turn(TurnEvent::TurnStarted {
                    side: Side::Player,
                    round: 1,
                })
        })
        .unwrap();
    assert!(matches!(
        events[started + 1],
        Event::Turn(TurnEvent::PreviewUpdated { .. })
    ));
}

#[test]
fn planner_side_rejects_manual_commands() {
    let map = GridMap::flat(6, 6);
    let mut state = BattleState::new();
    let player = deploy(&mut state, &map, "p", Side::Player, (0, 0));
    let enemy = deploy(&mut state, &map, "e", Side::Enemy, (5, 5));
    let mut session = BattleSession::new(state, map, config());
    session.start();

    assert!(matches!(
        session.run_ai_turn(),
        Err(RuntimeError::NotPlannerControlled { side: Side::Player })
    ));
    session.skip_unit(player).unwrap();

    assert!(matches!(
        session.command(CommandKind::Move, enemy, Position::new(5, 4)),
        Err(RuntimeError::PlannerControlled { side: Side::Enemy })
    ));
    assert!(matches!(
        session.skip_unit(enemy),
        Err(RuntimeError::PlannerControlled { .. })
    ));
}

#[tokio::test]
async fn scripted_turn_undoes_a_move_but_keeps_the_unit_spent() {
    let map = GridMap::flat(6, 6);
    let mut state = BattleState::new();
    let mover = deploy(&mut state, &map, "mover", Side::Player, (0, 0));
    let idler = deploy(&mut state, &map, "idler", Side::Player, (0, 3));
    deploy(&mut state, &map, "e", Side::Enemy, (5, 5));
    let mut session = BattleSession::new(state, map, config());
    session.start();

    let provider = ScriptedIntentProvider::new([
        Intent::movement(mover, Position::new(1, 0)),
        Intent::Undo,
        Intent::Skip { unit: idler },
    ]);
    let outcomes = session.run_manual_turn(&provider).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].destination, Position::new(1, 0));
    assert_eq!(
        session.state().unit(mover).unwrap().position,
        Position::new(0, 0)
    );
    assert!(session.state().is_exhausted(mover));
    assert_eq!(session.phase(), BattlePhase::EnemyTurn);
    assert_eq!(provider.remaining().await, 0);
}

#[tokio::test]
async fn rejected_intent_forfeits_the_unit() {
    let map = GridMap::flat(6, 6);
    let mut state = BattleState::new();
    let player = deploy(&mut state, &map, "p", Side::Player, (0, 0));
    deploy(&mut state, &map, "e", Side::Enemy, (5, 5));
    let mut session = BattleSession::new(state, map, config());
    session.start();

    let provider = ScriptedIntentProvider::new([Intent::attack(player, Position::new(2, 0))]);
    let outcomes = session.run_manual_turn(&provider).await.unwrap();

    assert!(outcomes.is_empty());
    assert_eq!(session.phase(), BattlePhase::EnemyTurn);
}

#[test]
fn planner_picks_the_highest_scoring_candidate() {
    let map = GridMap::flat(7, 7)
        .with_elevation(Position::new(2, 3), 1)
        .with_elevation(Position::new(4, 4), 2)
        .with_elevation(Position::new(5, 1), 1);
    let config = BattleConfig::default();
    let mut state = BattleState::new();
    deploy(&mut state, &map, "p1", Side::Player, (1, 1));
    deploy(&mut state, &map, "p2", Side::Player, (5, 5));
    let enemies = [
        deploy(&mut state, &map, "e1", Side::Enemy, (3, 3)),
        deploy(&mut state, &map, "e2", Side::Enemy, (1, 3)),
        deploy(&mut state, &map, "e3", Side::Enemy, (5, 2)),
    ];
    let planner = TacticalPlanner::new(config.clone());

    for id in enemies {
        let best = planner.best_action(&state, &map, id).unwrap();
        let unit = state.unit(id).unwrap();
        let ctx = AiContext::new(unit, &state, BattleEnv::from_map(&map, &config)).unwrap();
        let candidates = ActionCandidateGenerator::generate(&ctx);

        assert!(candidates.contains(&best));
        assert!(
            candidates
                .iter()
                .filter(|candidate| candidate.score.is_finite())
                .all(|candidate| candidate.score <= best.score),
            "unit {id} skipped a better candidate"
        );
    }
}

#[tokio::test]
async fn autoplay_alternates_turns_until_the_battle_ends() {
    let map = GridMap::flat(6, 6).with_elevation(Position::new(3, 2), 1);
    let mut state = BattleState::new();
    deploy(&mut state, &map, "p1", Side::Player, (0, 0));
    deploy(&mut state, &map, "p2", Side::Player, (1, 0));
    deploy(&mut state, &map, "e1", Side::Enemy, (5, 5));
    deploy(&mut state, &map, "e2", Side::Enemy, (4, 5));
    let mut session = BattleSession::new(state, map, config().with_autoplay(true));
    let provider = PlannerIntentProvider::new(session.planner().clone());
    session.start();

    for _ in 0..30 {
        if session.phase().is_over() {
            break;
        }
        session.run_manual_turn(&provider).await.unwrap();
        assert_ne!(session.phase(), BattlePhase::PlayerTurn);
        if session.phase().is_over() {
            break;
        }
        session.run_ai_turn().unwrap().run().await;
        assert_ne!(session.phase(), BattlePhase::EnemyTurn);
    }

    assert!(session.state().turn.round >= 1 || session.phase().is_over());
}

#[tokio::test]
async fn second_unit_planned_onto_a_taken_tile_is_exhausted() {
    let map = GridMap::flat(7, 7);
    let mut state = BattleState::new();
    let player = deploy(&mut state, &map, "p", Side::Player, (5, 5));
    let first = deploy(&mut state, &map, "e1", Side::Enemy, (3, 1));
    let second = deploy(&mut state, &map, "e2", Side::Enemy, (1, 3));
    let mut session = BattleSession::new(state, map, config());
    let battle = record(&session, Topic::Battle);
    let ai = record(&session, Topic::Ai);
    session.start();
    session.skip_unit(player).unwrap();

    let outcomes = session.run_ai_turn().unwrap().run().await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].action.unit, first);
    assert_eq!(outcomes[0].action.destination, Position::new(3, 3));
    assert!(matches!(outcomes[0].resolution, AiResolution::Executed(_)));
    assert_eq!(outcomes[1].action.unit, second);
    assert_eq!(outcomes[1].action.destination, Position::new(3, 3));
    assert_eq!(outcomes[1].resolution, AiResolution::Failed);

    assert_eq!(session.state().unit(first).unwrap().position, Position::new(3, 3));
    assert_eq!(session.state().unit(second).unwrap().position, Position::new(1, 3));
    assert!(ai.lock().unwrap().contains(&Event::Ai(AiEvent::ActionFailed {
        action: outcomes[1].action,
    })));
    assert!(battle.lock().unwrap().contains(&Event::Battle(BattleEvent::UnitExhausted {
        unit: second,
    })));
    assert_eq!(session.phase(), BattlePhase::PlayerTurn);
}

#[tokio::test]
async fn boxed_in_unit_is_exhausted_and_the_turn_passes_back() {
    let map = GridMap::flat(6, 6)
        .with_tile(Position::new(1, 0), StaticTile::wall())
        .with_tile(Position::new(0, 1), StaticTile::wall());
    let mut state = BattleState::new();
    let player = deploy(&mut state, &map, "p", Side::Player, (4, 4));
    let boxed = deploy(&mut state, &map, "e", Side::Enemy, (0, 0));
    let mut session = BattleSession::new(state, map, config());
    let battle = record(&session, Topic::Battle);
    let ai = record(&session, Topic::Ai);
    session.start();
    session.skip_unit(player).unwrap();

    let outcomes = session.run_ai_turn().unwrap().run().await;

    assert!(outcomes.is_empty());
    assert_eq!(
        ai.lock().unwrap().as_slice(),
        &[Event::Ai(AiEvent::NoLegalAction { unit: boxed })]
    );
    assert!(battle.lock().unwrap().contains(&Event::Battle(BattleEvent::UnitExhausted {
        unit: boxed,
    })));
    assert_eq!(session.phase(), BattlePhase::PlayerTurn);
    assert_eq!(session.state().unit(boxed).unwrap().position, Position::ORIGIN);
}
