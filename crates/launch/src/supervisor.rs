//! Launch orchestration and running-process tracking.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use playvault_discovery::Resolver;
use playvault_library::GameRecord;
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use crate::error::LaunchError;
use crate::validate::validate;

/// Environment override that suppresses the Ren'Py splash screen.
pub const SKIP_SPLASH_ENV: &str = "RENPY_SKIP_SPLASHSCREEN";

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// A tracked entry in the running-process table.
///
/// `Launching` is the reservation inserted atomically with the
/// "already running" check; it is promoted to `Running` once the OS process
/// exists. The sequence number ties exit callbacks to the launch that
/// created them, so a stale callback can never untrack a newer launch.
enum Tracked {
    Launching {
        seq: u64,
    },
    Running {
        seq: u64,
        pid: Option<u32>,
        kill_tx: oneshot::Sender<()>,
    },
}

impl Tracked {
    fn seq(&self) -> u64 {
        match self {
            Self::Launching { seq } | Self::Running { seq, .. } => *seq,
        }
    }
}

type RunningTable = Arc<Mutex<HashMap<String, Tracked>>>;

/// Orchestrates launch, stop and queries for running games.
///
/// Owns the in-memory table of currently running processes: at most one
/// entry per game id, created on launch, removed on exit, error or
/// [`stop`](Supervisor::stop). Children are spawned detached, so closing
/// the launcher never terminates a game.
pub struct Supervisor {
    resolver: Resolver,
    running: RunningTable,
    next_seq: AtomicU64,
}

impl Supervisor {
    /// Creates a supervisor resolving with the host platform's rules.
    pub fn new() -> Self {
        Self::with_resolver(Resolver::host())
    }

    /// Creates a supervisor with an explicit resolver (useful in tests).
    pub fn with_resolver(resolver: Resolver) -> Self {
        Self {
            resolver,
            running: Arc::new(Mutex::new(HashMap::new())),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Resolves, validates and spawns a game, then tracks it until exit.
    ///
    /// The "already running" check and the registration of the tracked
    /// entry happen under one lock, so concurrent launches of the same id
    /// cannot both spawn. Launches of different ids proceed concurrently.
    /// Returns as soon as the process is started; it never waits for the
    /// child to terminate.
    pub async fn launch(&self, game: &GameRecord) -> Result<(), LaunchError> {
        let install = game
            .install_path
            .clone()
            .ok_or(LaunchError::NotInstalled)?;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);

        {
            let mut running = self.running.lock().await;
            if running.contains_key(&game.id) {
                return Err(LaunchError::AlreadyRunning(game.id.clone()));
            }
            running.insert(game.id.clone(), Tracked::Launching { seq });
        }

        match self.resolve_and_spawn(game, &install, seq).await {
            Ok(()) => Ok(()),
            Err(err) => {
                // Release the reservation (unless something newer took over).
                let mut running = self.running.lock().await;
                if running.get(&game.id).map(Tracked::seq) == Some(seq) {
                    running.remove(&game.id);
                }
                Err(err)
            }
        }
    }

    async fn resolve_and_spawn(
        &self,
        game: &GameRecord,
        install: &Path,
        seq: u64,
    ) -> Result<(), LaunchError> {
        let executable = self.resolver.resolve(game).await?;

        // The gate runs on the freshly resolved path, right before spawn.
        validate(&executable, install)?;

        let mut command = Command::new(&executable);
        command
            .current_dir(install)
            .env(SKIP_SPLASH_ENV, "1")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        // Detach from the launcher's lifecycle.
        #[cfg(unix)]
        command.process_group(0);
        #[cfg(windows)]
        command.creation_flags(CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);

        let mut child = command.spawn().map_err(LaunchError::SpawnFailed)?;
        let pid = child.id();
        info!(
            game_id = %game.id,
            path = %executable.display(),
            pid = ?pid,
            "game launched"
        );

        let (kill_tx, kill_rx) = oneshot::channel();
        {
            let mut running = self.running.lock().await;
            match running.get_mut(&game.id) {
                Some(entry) if entry.seq() == seq => {
                    *entry = Tracked::Running { seq, pid, kill_tx };
                }
                _ => {
                    // A concurrent stop() removed the reservation; honor it.
                    warn!(game_id = %game.id, "launch cancelled by concurrent stop");
                    if let Err(err) = child.start_kill() {
                        warn!(game_id = %game.id, error = %err, "failed to kill cancelled launch");
                    }
                    tokio::spawn(async move {
                        let _ = child.wait().await;
                    });
                    return Ok(());
                }
            }
        }

        let running = Arc::clone(&self.running);
        let game_id = game.id.clone();
        tokio::spawn(watch_child(child, kill_rx, running, game_id, seq));
        Ok(())
    }

    /// Requests termination of a running game. Fire-and-forget.
    ///
    /// The tracked entry is removed immediately; a failure to signal the OS
    /// process is logged, never surfaced. Untracked ids are a no-op.
    pub async fn stop(&self, game_id: &str) {
        let entry = self.running.lock().await.remove(game_id);
        match entry {
            Some(Tracked::Running { pid, kill_tx, .. }) => {
                info!(game_id = %game_id, pid = ?pid, "stopping game");
                if kill_tx.send(()).is_err() {
                    // The watcher already finished; exit raced the stop.
                    debug!(game_id = %game_id, "game already exited");
                }
            }
            Some(Tracked::Launching { .. }) => {
                info!(game_id = %game_id, "stop requested mid-launch, cancelling");
            }
            None => {
                debug!(game_id = %game_id, "stop requested for untracked game");
            }
        }
    }

    /// Whether a game id currently has a tracked process.
    pub async fn is_running(&self, game_id: &str) -> bool {
        self.running.lock().await.contains_key(game_id)
    }

    /// Ids of all currently tracked games.
    pub async fn list_running(&self) -> Vec<String> {
        self.running.lock().await.keys().cloned().collect()
    }

    /// Whether the install still resolves to a launchable executable.
    ///
    /// Never errors; any resolution failure means "not verified".
    pub async fn verify_installation(&self, game: &GameRecord) -> bool {
        self.resolver.resolve(game).await.is_ok()
    }

    /// Opens the game's install folder in the OS file manager.
    pub fn open_install_folder(&self, game: &GameRecord) -> Result<(), LaunchError> {
        let install = game.install_path.as_deref().ok_or(LaunchError::NoInstallPath)?;
        if !install.is_dir() {
            return Err(LaunchError::PathNotFound(install.to_path_buf()));
        }
        open::that(install).map_err(LaunchError::OpenFolder)
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for a child to exit (or for a stop request) and untracks it.
///
/// Removal is idempotent and sequence-checked: if the entry is already gone
/// or belongs to a newer launch of the same id, it is left alone.
async fn watch_child(
    mut child: Child,
    mut kill_rx: oneshot::Receiver<()>,
    running: RunningTable,
    game_id: String,
    seq: u64,
) {
    tokio::select! {
        status = child.wait() => match status {
            Ok(status) => info!(game_id = %game_id, %status, "game exited"),
            Err(err) => warn!(game_id = %game_id, error = %err, "failed to observe game exit"),
        },
        requested = &mut kill_rx => {
            // An Err here means the supervisor dropped the sender without a
            // stop request; the game keeps running detached.
            if requested.is_ok()
                && let Err(err) = child.start_kill()
            {
                warn!(game_id = %game_id, error = %err, "failed to signal game process");
            }
            match child.wait().await {
                Ok(status) => info!(game_id = %game_id, %status, "game terminated"),
                Err(err) => warn!(game_id = %game_id, error = %err, "failed to reap game process"),
            }
        }
    }

    let mut running = running.lock().await;
    if running.get(&game_id).map(Tracked::seq) == Some(seq) {
        running.remove(&game_id);
    }
}
