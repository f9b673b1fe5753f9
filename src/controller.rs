//! Game orchestration state machine.
//!
//! [`GameController`] owns the single game-state record: board, turn, result,
//! current table and load status. It is synchronous and clock-free; the async
//! [`crate::GameSession`] drives it and owns the thinking-delay timer.
//!
//! Stale callbacks are discarded by ticket: every AI turn carries the epoch and
//! ply it was scheduled at, and every table load carries its sequence number.
//! Any reset bumps the epoch, any new load bumps the sequence.

use crate::catalog::{Model, Role};
use crate::loader::LoadError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabletoe_core::{Board, DecisionTable, Mark, Outcome, Position, Square, evaluate, select_move};
use tracing::{debug, error, info, instrument, warn};

/// Lifecycle phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Model and role not chosen yet.
    Setup,
    /// Board accepts moves.
    InProgress,
    /// Won or drawn; board frozen.
    Finished,
}

/// Handle for one scheduled AI move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiTurn {
    epoch: u64,
    ply: usize,
}

/// Handle for one in-flight table load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    model: Model,
}

impl LoadTicket {
    /// Model being loaded.
    pub fn model(&self) -> Model {
        self.model
    }
}

/// Everything a renderer needs to draw the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Cells in board order.
    pub cells: [Option<Mark>; 9],
    /// Mark due to move next.
    pub to_move: Mark,
    /// Mark the human plays.
    pub human_mark: Mark,
    /// Whether a click would currently be accepted on some empty cell.
    pub is_human_turn: bool,
    /// Result so far, including the winning line.
    pub outcome: Outcome,
    /// Selected role.
    pub role: Role,
    /// Selected model.
    pub model: Model,
    /// A table load is pending; inputs are ignored.
    pub loading: bool,
    /// Entries in the current table.
    pub table_entries: usize,
    /// Non-fatal message for the player.
    pub notice: Option<String>,
    /// One-line status text.
    pub status: String,
}

/// The orchestrator's state record.
#[derive(Debug, Clone)]
pub struct GameController {
    phase: Phase,
    board: Board,
    role: Role,
    to_move: Mark,
    outcome: Outcome,
    model: Model,
    table: Arc<DecisionTable>,
    loading: Option<LoadTicket>,
    notice: Option<String>,
    epoch: u64,
    load_seq: u64,
}

impl GameController {
    /// Creates a controller in setup with an empty table for `model`.
    #[instrument]
    pub fn new(model: Model) -> Self {
        Self {
            phase: Phase::Setup,
            board: Board::new(),
            role: Role::default(),
            to_move: Mark::X,
            outcome: Outcome::Ongoing,
            model,
            table: Arc::new(DecisionTable::empty()),
            loading: None,
            notice: None,
            epoch: 0,
            load_seq: 0,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the result so far.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns the mark due to move.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the selected role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Mark played by the human; the first mover is always `X`.
    pub fn human_mark(&self) -> Mark {
        match self.role {
            Role::First => Mark::X,
            Role::Second => Mark::O,
        }
    }

    /// Mark played by the AI.
    pub fn ai_mark(&self) -> Mark {
        self.human_mark().opponent()
    }

    /// Returns the selected model.
    pub fn model(&self) -> Model {
        self.model
    }

    /// Returns the current table.
    pub fn table(&self) -> &Arc<DecisionTable> {
        &self.table
    }

    /// Returns the current notice, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether a table load is pending.
    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Switches to `model`: drops the current table and marks a load as pending.
    ///
    /// A later call supersedes this ticket.
    #[instrument(skip(self))]
    pub fn begin_load(&mut self, model: Model) -> LoadTicket {
        self.load_seq += 1;
        let ticket = LoadTicket {
            seq: self.load_seq,
            model,
        };
        info!(%model, seq = ticket.seq, "Table load started");
        self.model = model;
        self.table = Arc::new(DecisionTable::empty());
        self.loading = Some(ticket);
        self.notice = None;
        ticket
    }

    /// Completes a load. A failure leaves an empty table and a notice.
    ///
    /// Returns false if the ticket was superseded; its result is discarded.
    #[instrument(skip(self, result), fields(model = %ticket.model, seq = ticket.seq))]
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DecisionTable, LoadError>,
    ) -> bool {
        if self.loading != Some(ticket) {
            debug!("Discarding stale table load");
            return false;
        }
        self.loading = None;

        match result {
            Ok(table) => {
                info!(entries = table.len(), "Table installed");
                self.table = Arc::new(table);
                self.notice = None;
            }
            Err(e) => {
                warn!(error = %e, "Table load failed, continuing with random play");
                self.table = Arc::new(DecisionTable::empty());
                self.notice = Some(e.notice());
            }
        }
        true
    }

    /// Starts a fresh game with `role`. Ignored while a table is loading.
    #[instrument(skip(self))]
    pub fn start_game(&mut self, role: Role) -> bool {
        if self.is_loading() {
            debug!("Ignoring start while table loads");
            return false;
        }

        self.epoch += 1;
        self.role = role;
        self.board = Board::new();
        self.to_move = Mark::X;
        self.outcome = Outcome::Ongoing;
        self.phase = Phase::InProgress;
        info!(human = %self.human_mark(), epoch = self.epoch, "Game started");
        true
    }

    /// Starts another game with the same role. Ignored in setup.
    #[instrument(skip(self))]
    pub fn rematch(&mut self) -> bool {
        if self.phase == Phase::Setup {
            debug!("Ignoring rematch in setup");
            return false;
        }
        self.start_game(self.role)
    }

    /// Returns to setup, clearing board and result. Ignored while a table is loading.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> bool {
        if self.is_loading() {
            debug!("Ignoring restart while table loads");
            return false;
        }

        self.epoch += 1;
        self.board = Board::new();
        self.to_move = Mark::X;
        self.outcome = Outcome::Ongoing;
        self.phase = Phase::Setup;
        info!(epoch = self.epoch, "Back to setup");
        true
    }

    /// Applies a human move at `index` (0-8) if it is legal; otherwise a no-op.
    #[instrument(skip(self))]
    pub fn click(&mut self, index: usize) -> bool {
        if self.is_loading() {
            debug!("Ignoring click while table loads");
            return false;
        }
        if self.phase != Phase::InProgress {
            debug!(phase = ?self.phase, "Ignoring click outside a game");
            return false;
        }
        if self.to_move != self.human_mark() {
            debug!("Ignoring click on AI's turn");
            return false;
        }
        let Some(pos) = Position::from_index(index) else {
            debug!("Ignoring click outside the board");
            return false;
        };
        if !self.board.is_empty(pos) {
            debug!(position = %pos, "Ignoring click on occupied square");
            return false;
        }

        self.apply_move(pos, self.human_mark());
        true
    }

    /// The AI turn due now, if any.
    pub fn pending_ai_turn(&self) -> Option<AiTurn> {
        (self.phase == Phase::InProgress && !self.is_loading() && self.to_move == self.ai_mark())
            .then_some(AiTurn {
                epoch: self.epoch,
                ply: self.board.occupied(),
            })
    }

    /// Plays the AI move for `turn`.
    ///
    /// Returns `None` when the turn is stale (the game was reset, or the state no
    /// longer expects an AI move) or when the selector found nothing to play.
    #[instrument(skip(self, rng))]
    pub fn play_ai_turn<R: Rng + ?Sized>(&mut self, turn: AiTurn, rng: &mut R) -> Option<Position> {
        if self.pending_ai_turn() != Some(turn) {
            debug!("Discarding stale AI turn");
            return None;
        }

        match select_move(&self.board, Some(&self.table), rng) {
            Some(pos) => {
                self.apply_move(pos, self.ai_mark());
                Some(pos)
            }
            None => {
                self.hand_turn_to_human();
                None
            }
        }
    }

    /// Gives the move back to the human when the AI found nothing to play.
    fn hand_turn_to_human(&mut self) {
        error!(board = %self.board.display(), "Selector returned no move on an open board");
        self.to_move = self.human_mark();
    }

    fn apply_move(&mut self, pos: Position, mark: Mark) {
        self.board.set(pos, Square::Occupied(mark));
        self.outcome = evaluate(&self.board);
        debug!(position = %pos, %mark, outcome = %self.outcome, "Move applied");

        if self.outcome.is_terminal() {
            info!(outcome = %self.outcome, "Game finished");
            self.phase = Phase::Finished;
        } else {
            self.to_move = mark.opponent();
        }
    }

    /// One-line status text.
    pub fn status(&self) -> String {
        if let Some(ticket) = self.loading {
            return format!("Loading {}...", ticket.model.label());
        }
        match self.phase {
            Phase::Setup => "Select a model and role".to_string(),
            Phase::InProgress => format!("Next player: {}", self.to_move),
            Phase::Finished => self.outcome.to_string(),
        }
    }

    /// Captures the state for rendering.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            cells: self.board.cells(),
            to_move: self.to_move,
            human_mark: self.human_mark(),
            is_human_turn: self.phase == Phase::InProgress
                && !self.is_loading()
                && self.to_move == self.human_mark(),
            outcome: self.outcome,
            role: self.role,
            model: self.model,
            loading: self.is_loading(),
            table_entries: self.table.len(),
            notice: self.notice.clone(),
            status: self.status(),
        }
    }
}
