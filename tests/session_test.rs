//! Tests for the async session: thinking delay, resets and table loading.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tabletoe::{DecisionTable, GameSession, Model, Phase, Role, TableLoader, TableSource};
use tokio::time::{sleep, timeout};

const DELAY: Duration = Duration::from_millis(500);

fn occupied(snapshot: &tabletoe::GameSnapshot) -> usize {
    snapshot.cells.iter().filter(|c| c.is_some()).count()
}

fn session_with(source: TableSource, delay: Duration) -> GameSession {
    GameSession::with_rng(
        TableLoader::new(source),
        delay,
        Model::Normal,
        StdRng::seed_from_u64(42),
    )
}

fn ready_session() -> GameSession {
    let session = session_with(TableSource::parse("tables"), DELAY);
    session.install_table(Model::Normal, DecisionTable::empty());
    session
}

#[tokio::test(start_paused = true)]
async fn test_ai_waits_for_thinking_delay() {
    let session = ready_session();
    assert!(session.start_game(Role::Second));

    sleep(Duration::from_millis(499)).await;
    assert_eq!(occupied(&session.snapshot()), 0);

    let snapshot = session.wait_for(|s| occupied(s) == 1).await;
    assert!(snapshot.is_human_turn);
    assert_eq!(snapshot.to_move, tabletoe::Mark::O);
}

#[tokio::test(start_paused = true)]
async fn test_restart_cancels_pending_ai_move() {
    let session = ready_session();
    session.start_game(Role::Second);

    sleep(Duration::from_millis(200)).await;
    assert!(session.restart());

    sleep(Duration::from_millis(1000)).await;
    let snapshot = session.snapshot();
    assert_eq!(snapshot.phase, Phase::Setup);
    assert_eq!(occupied(&snapshot), 0);
}

#[tokio::test(start_paused = true)]
async fn test_rematch_restarts_the_delay() {
    let session = ready_session();
    session.start_game(Role::Second);

    sleep(Duration::from_millis(400)).await;
    assert!(session.rematch());

    // The first timer would have fired at 500ms.
    sleep(Duration::from_millis(300)).await;
    assert_eq!(occupied(&session.snapshot()), 0);

    sleep(Duration::from_millis(250)).await;
    assert_eq!(occupied(&session.snapshot()), 1);
}

#[tokio::test(start_paused = true)]
async fn test_human_move_triggers_one_ai_reply() {
    let session = ready_session();
    session.start_game(Role::First);
    assert!(session.click(4));
    assert!(!session.click(0), "AI is thinking");

    let snapshot = session.wait_for(|s| occupied(s) == 2).await;
    assert!(snapshot.is_human_turn);

    sleep(Duration::from_millis(2000)).await;
    assert_eq!(occupied(&session.snapshot()), 2);
}

#[tokio::test(start_paused = true)]
async fn test_full_game_reaches_finished() {
    let session = ready_session();
    session.start_game(Role::First);

    loop {
        let snapshot = session.wait_for(|s| s.is_human_turn || s.phase == Phase::Finished).await;
        if snapshot.phase == Phase::Finished {
            assert!(snapshot.outcome.is_terminal());
            break;
        }
        let index = snapshot
            .cells
            .iter()
            .position(Option::is_none)
            .expect("ongoing game has an empty cell");
        assert!(session.click(index));
    }

    assert!(session.rematch());
    assert_eq!(session.snapshot().phase, Phase::InProgress);
}

#[tokio::test]
async fn test_loaded_table_drives_ai() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("q_table_normal.json"),
        r#"{"(0, 0, 0, 0, 0, 0, 0, 0, 0)": [0, 0, 0, 0, 0, 0, 0, 0, 1]}"#,
    )
    .unwrap();

    let session = session_with(
        TableSource::Directory(dir.path().to_path_buf()),
        Duration::from_millis(10),
    );
    session.change_model(Model::Normal);
    let ready = timeout(Duration::from_secs(5), session.wait_for(|s| !s.loading))
        .await
        .unwrap();
    assert_eq!(ready.table_entries, 1);
    assert!(ready.notice.is_none());

    session.start_game(Role::Second);
    let snapshot = timeout(Duration::from_secs(5), session.wait_for(|s| occupied(s) == 1))
        .await
        .unwrap();
    assert_eq!(snapshot.cells[8], Some(tabletoe::Mark::X));
}

#[tokio::test]
async fn test_missing_table_falls_back_to_random_play() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_with(
        TableSource::Directory(dir.path().to_path_buf()),
        Duration::from_millis(10),
    );
    session.change_model(Model::Advanced);

    let ready = timeout(Duration::from_secs(5), session.wait_for(|s| !s.loading))
        .await
        .unwrap();
    assert_eq!(ready.table_entries, 0);
    assert!(ready.notice.as_deref().is_some_and(|n| n.contains("Playing randomly")));

    session.start_game(Role::Second);
    timeout(Duration::from_secs(5), session.wait_for(|s| occupied(s) == 1))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_inputs_ignored_while_loading() {
    // Nothing serves this address; the load stays pending until it fails.
    let loading = session_with(TableSource::parse("http://127.0.0.1:9"), DELAY);
    loading.change_model(Model::Easy);
    assert!(loading.snapshot().loading);
    assert!(!loading.start_game(Role::First));
    assert!(!loading.restart());
    assert!(!loading.click(0));
    assert_eq!(loading.snapshot().status, "Loading Easy Model...");
}

#[tokio::test(start_paused = true)]
async fn test_model_change_replaces_table() {
    let session = ready_session();
    session.install_table(
        Model::Normal,
        DecisionTable::from_entries([(tabletoe::StateKey::from_codes([0; 9]), [1.0; 9])]),
    );
    session.start_game(Role::Second);
    assert_eq!(session.snapshot().table_entries, 1);

    session.install_table(Model::Easy, DecisionTable::empty());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.model, Model::Easy);
    assert_eq!(snapshot.table_entries, 0);
}
