//! Async driver around [`GameController`].
//!
//! A session owns the thinking-delay timer and the table-load task. Both are
//! plain tokio tasks; at most one of each is alive, and whatever they report
//! back is checked against the controller's tickets before it is applied.

use crate::catalog::{Model, Role};
use crate::config::TabletoeConfig;
use crate::controller::{AiTurn, GameController, GameSnapshot, LoadTicket};
use crate::loader::{LoadError, TableLoader, TableSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tabletoe_core::DecisionTable;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

struct SessionState {
    controller: GameController,
    ai_timer: Option<JoinHandle<()>>,
    load_task: Option<JoinHandle<()>>,
    rng: StdRng,
}

/// A single game against the table AI, shareable across tasks.
#[derive(Clone)]
pub struct GameSession {
    state: Arc<Mutex<SessionState>>,
    loader: TableLoader,
    thinking_delay: Duration,
    updates: Arc<watch::Sender<GameSnapshot>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("loader", &self.loader)
            .field("thinking_delay", &self.thinking_delay)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Creates a session in setup. No table is loaded until [`Self::change_model`].
    #[instrument(skip(loader))]
    pub fn new(loader: TableLoader, thinking_delay: Duration, model: Model) -> Self {
        Self::with_rng(loader, thinking_delay, model, StdRng::from_os_rng())
    }

    /// Creates a session with a caller-supplied random source.
    pub fn with_rng(loader: TableLoader, thinking_delay: Duration, model: Model, rng: StdRng) -> Self {
        let controller = GameController::new(model);
        let (updates, _) = watch::channel(controller.snapshot());
        Self {
            state: Arc::new(Mutex::new(SessionState {
                controller,
                ai_timer: None,
                load_task: None,
                rng,
            })),
            loader,
            thinking_delay,
            updates: Arc::new(updates),
        }
    }

    /// Creates a session from configuration.
    #[instrument(skip(config))]
    pub fn from_config(config: &TabletoeConfig) -> Self {
        let loader = TableLoader::new(TableSource::parse(config.table_source()));
        Self::new(loader, config.thinking_delay(), *config.default_model())
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> GameSnapshot {
        self.state().controller.snapshot()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.updates.subscribe()
    }

    /// Waits until a snapshot satisfies `pred` and returns it.
    pub async fn wait_for(&self, mut pred: impl FnMut(&GameSnapshot) -> bool) -> GameSnapshot {
        let mut rx = self.subscribe();
        match rx.wait_for(|snapshot| pred(snapshot)).await {
            Ok(snapshot) => snapshot.clone(),
            // The sender lives as long as `self`, so this arm is only reached on shutdown.
            Err(_) => self.snapshot(),
        }
    }

    /// Selects `model` and starts loading it. Inputs are ignored until it completes.
    #[instrument(skip(self))]
    pub fn change_model(&self, model: Model) {
        let mut state = self.state();
        let ticket = state.controller.begin_load(model);

        if let Some(task) = state.load_task.take() {
            debug!("Aborting superseded table load");
            task.abort();
        }
        if let Some(timer) = state.ai_timer.take() {
            timer.abort();
        }

        let session = self.clone();
        state.load_task = Some(tokio::spawn(async move {
            let result = session.loader.load(ticket.model()).await;
            session.complete_load(ticket, result);
        }));

        self.publish(&state);
    }

    /// Installs an already-loaded table for `model`, bypassing the loader.
    #[instrument(skip(self, table), fields(entries = table.len()))]
    pub fn install_table(&self, model: Model, table: DecisionTable) {
        let mut state = self.state();
        if let Some(task) = state.load_task.take() {
            task.abort();
        }
        let ticket = state.controller.begin_load(model);
        state.controller.finish_load(ticket, Ok(table));
        self.schedule_ai(&mut state);
        self.publish(&state);
    }

    /// Starts a game with `role`.
    #[instrument(skip(self))]
    pub fn start_game(&self, role: Role) -> bool {
        self.apply(|controller| controller.start_game(role))
    }

    /// Plays the human's move at `index` (0-8).
    #[instrument(skip(self))]
    pub fn click(&self, index: usize) -> bool {
        self.apply(|controller| controller.click(index))
    }

    /// Returns to setup.
    #[instrument(skip(self))]
    pub fn restart(&self) -> bool {
        self.apply(GameController::restart)
    }

    /// Plays again with the same role.
    #[instrument(skip(self))]
    pub fn rematch(&self) -> bool {
        self.apply(GameController::rematch)
    }

    fn apply(&self, op: impl FnOnce(&mut GameController) -> bool) -> bool {
        let mut state = self.state();
        let changed = op(&mut state.controller);
        if changed {
            self.schedule_ai(&mut state);
            self.publish(&state);
        }
        changed
    }

    fn schedule_ai(&self, state: &mut SessionState) {
        if let Some(timer) = state.ai_timer.take() {
            timer.abort();
        }

        let Some(turn) = state.controller.pending_ai_turn() else {
            return;
        };

        debug!(delay_ms = self.thinking_delay.as_millis() as u64, "AI is thinking");
        let session = self.clone();
        let delay = self.thinking_delay;
        state.ai_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.complete_ai(turn);
        }));
    }

    fn complete_ai(&self, turn: AiTurn) {
        let mut state = self.state();
        if state.controller.pending_ai_turn() != Some(turn) {
            debug!("Dropping AI timer that outlived its turn");
            return;
        }
        state.ai_timer = None;

        let SessionState { controller, rng, .. } = &mut *state;
        if let Some(pos) = controller.play_ai_turn(turn, rng) {
            info!(position = %pos, "AI moved");
        }
        self.schedule_ai(&mut state);
        self.publish(&state);
    }

    fn complete_load(&self, ticket: LoadTicket, result: Result<DecisionTable, LoadError>) {
        let mut state = self.state();
        if state.controller.finish_load(ticket, result) {
            state.load_task = None;
            self.schedule_ai(&mut state);
            self.publish(&state);
        }
    }

    fn publish(&self, state: &SessionState) {
        self.updates.send_replace(state.controller.snapshot());
    }
}
