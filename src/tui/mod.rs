//! Terminal UI for playing a [`GameSession`].

mod input;
mod ui;

pub use input::{Command, interpret, move_cursor};

use crate::catalog::Role;
use crate::controller::Phase;
use crate::session::GameSession;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use tabletoe_core::Position;
use tracing::{debug, error, info, instrument};
use ui::View;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Runs the UI until the player quits.
#[instrument(skip(session))]
pub async fn run_tui(session: GameSession) -> Result<()> {
    info!("Starting terminal UI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = event_loop(&mut terminal, &session).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "UI loop error");
    }
    res
}

async fn event_loop(terminal: &mut Term, session: &GameSession) -> Result<()> {
    let mut view = View {
        role: Role::default(),
        cursor: Position::Center,
    };
    let mut updates = session.subscribe();

    loop {
        let snapshot = updates.borrow_and_update().clone();
        terminal.draw(|frame| ui::draw(frame, &snapshot, &view))?;

        if !event::poll(Duration::from_millis(50))? {
            tokio::task::yield_now().await;
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let in_setup = snapshot.phase == Phase::Setup;
        let command = interpret(key.code, in_setup, snapshot.model, view.role, view.cursor);
        debug!(?command, "Key interpreted");

        match command {
            Command::Quit => {
                info!("User quit");
                return Ok(());
            }
            Command::ChangeModel(model) => session.change_model(model),
            Command::ToggleRole => view.role = view.role.toggle(),
            Command::Start(role) => {
                session.start_game(role);
            }
            Command::Click(pos) => {
                view.cursor = pos;
                session.click(pos.to_index());
            }
            Command::Cursor(pos) => view.cursor = pos,
            Command::Restart => {
                session.restart();
            }
            Command::Rematch => {
                session.rematch();
            }
            Command::None => {}
        }
    }
}
