//! End-to-end launch lifecycle against real shell scripts.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use playvault_discovery::{Platform, Resolver};
use playvault_launch::{LaunchError, Supervisor};
use playvault_library::GameRecord;
use tempfile::TempDir;

fn unix_supervisor() -> Supervisor {
    Supervisor::with_resolver(Resolver::new(Platform::Unix))
}

/// Creates an install directory whose `start.sh` runs the given body.
fn install_with_script(root: &Path, name: &str, body: &str) -> GameRecord {
    let dir = root.join(name);
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("start.sh"), format!("#!/bin/sh\n{body}\n")).unwrap();
    GameRecord::new(name, name, dir)
}

/// Polls until the game is untracked, or panics after ~5 seconds.
async fn wait_until_stopped(supervisor: &Supervisor, game_id: &str) {
    for _ in 0..100 {
        if !supervisor.is_running(game_id).await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("{game_id} still tracked after 5s");
}

#[tokio::test]
async fn launch_tracks_and_stop_untracks() {
    let root = TempDir::new().unwrap();
    let game = install_with_script(root.path(), "long-runner", "sleep 30");
    let supervisor = unix_supervisor();

    supervisor.launch(&game).await.unwrap();
    assert!(supervisor.is_running(&game.id).await);
    assert_eq!(supervisor.list_running().await, vec![game.id.clone()]);

    // The entry disappears immediately, whatever the OS does with the kill.
    supervisor.stop(&game.id).await;
    assert!(!supervisor.is_running(&game.id).await);
}

#[tokio::test]
async fn second_launch_is_already_running() {
    let root = TempDir::new().unwrap();
    let game = install_with_script(root.path(), "dupe", "sleep 30");
    let supervisor = unix_supervisor();

    supervisor.launch(&game).await.unwrap();
    let err = supervisor.launch(&game).await.unwrap_err();
    assert!(matches!(err, LaunchError::AlreadyRunning(id) if id == game.id));

    supervisor.stop(&game.id).await;
}

#[tokio::test]
async fn concurrent_launches_spawn_exactly_once() {
    let root = TempDir::new().unwrap();
    let game = install_with_script(root.path(), "race", "sleep 30");
    let supervisor = unix_supervisor();

    let (a, b) = tokio::join!(supervisor.launch(&game), supervisor.launch(&game));
    let oks = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(oks, 1, "exactly one launch must win: {a:?} / {b:?}");
    assert!(
        matches!(
            [a, b].into_iter().find(|r| r.is_err()),
            Some(Err(LaunchError::AlreadyRunning(_)))
        ),
        "loser must fail with AlreadyRunning"
    );

    supervisor.stop(&game.id).await;
}

#[tokio::test]
async fn exit_event_untracks_and_allows_relaunch() {
    let root = TempDir::new().unwrap();
    let game = install_with_script(root.path(), "one-shot", "exit 0");
    let supervisor = unix_supervisor();

    supervisor.launch(&game).await.unwrap();
    wait_until_stopped(&supervisor, &game.id).await;

    // The id is free again once the exit event fired.
    supervisor.launch(&game).await.unwrap();
    wait_until_stopped(&supervisor, &game.id).await;
}

#[tokio::test]
async fn spawn_failure_surfaces_and_releases_the_id() {
    let root = TempDir::new().unwrap();
    let game = install_with_script(root.path(), "broken", "");
    // An interpreter that does not exist makes exec fail at spawn time.
    fs::write(
        game.install_path.as_ref().unwrap().join("start.sh"),
        "#!/nonexistent/interpreter\n",
    )
    .unwrap();
    let supervisor = unix_supervisor();

    let err = supervisor.launch(&game).await.unwrap_err();
    assert!(matches!(err, LaunchError::SpawnFailed(_)), "got {err:?}");
    assert!(!supervisor.is_running(&game.id).await);
}

#[tokio::test]
async fn dangerous_install_path_never_spawns() {
    let root = TempDir::new().unwrap();
    // The resolved path inherits the ';' from the directory name and must
    // be caught by the validator before any spawn.
    let game = install_with_script(root.path(), "sem;colon", "sleep 30");
    let supervisor = unix_supervisor();

    let err = supervisor.launch(&game).await.unwrap_err();
    assert!(matches!(err, LaunchError::Security(_)), "got {err:?}");
    assert!(!supervisor.is_running(&game.id).await);
}

#[tokio::test]
async fn verify_installation_swallows_failures() {
    let root = TempDir::new().unwrap();
    let good = install_with_script(root.path(), "verifiable", "exit 0");
    let supervisor = unix_supervisor();

    assert!(supervisor.verify_installation(&good).await);

    let empty_dir = root.path().join("hollow");
    fs::create_dir(&empty_dir).unwrap();
    let hollow = GameRecord::new("hollow", "Hollow", empty_dir);
    assert!(!supervisor.verify_installation(&hollow).await);

    let missing = GameRecord::new("missing", "Missing", root.path().join("nope"));
    assert!(!supervisor.verify_installation(&missing).await);
}
