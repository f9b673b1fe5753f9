//! Stateless rendering of a [`GameSnapshot`].

use crate::catalog::{Model, Role};
use crate::controller::{GameSnapshot, Phase};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tabletoe_core::{Mark, Position};

/// Selections made on the setup screen and the board cursor.
#[derive(Debug, Clone, Copy)]
pub struct View {
    /// Role to start with.
    pub role: Role,
    /// Board cursor.
    pub cursor: Position,
}

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, snapshot: &GameSnapshot, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(11),   // Body
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new(format!("Tic-Tac-Toe vs AI  ·  {}", snapshot.model.label()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match snapshot.phase {
        Phase::Setup => draw_setup(frame, chunks[1], snapshot, view),
        Phase::InProgress | Phase::Finished => draw_board(frame, chunks[1], snapshot, view.cursor),
    }

    let mut status = vec![Line::from(Span::styled(
        snapshot.status.clone(),
        Style::default().fg(Color::Yellow),
    ))];
    if let Some(notice) = &snapshot.notice {
        status.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    let status = Paragraph::new(status)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = match snapshot.phase {
        Phase::Setup => "m: model  ·  tab: role  ·  enter: start  ·  q: quit",
        _ => "arrows/1-9: move  ·  enter: play  ·  n: rematch  ·  r: setup  ·  m: model  ·  q: quit",
    };
    frame.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[3],
    );
}

fn draw_setup(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot, view: &View) {
    let mut lines = vec![Line::from("Model:")];
    for model in <Model as strum::IntoEnumIterator>::iter() {
        let selected = model == snapshot.model;
        let style = if selected {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let marker = if selected { "▶ " } else { "  " };
        lines.push(Line::from(Span::styled(format!("{}{}", marker, model.label()), style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Role: {}", view.role.label())));
    if snapshot.table_entries > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} table states", snapshot.table_entries),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(Block::default().title("Setup").borders(Borders::ALL));
    frame.render_widget(block, center_rect(area, 36, 10));
}

fn draw_board(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot, cursor: Position) {
    let board_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for row in 0..3 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Length(12),
            ])
            .split(rows[row * 2]);

        for col in 0..3 {
            if let Some(pos) = Position::from_index(row * 3 + col) {
                draw_cell(frame, cols[col * 2], snapshot, cursor, pos);
            }
            if col < 2 {
                draw_separator(frame, cols[col * 2 + 1], "│");
            }
        }
        if row < 2 {
            draw_separator(frame, rows[row * 2 + 1], &"─".repeat(38));
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot, cursor: Position, pos: Position) {
    let (symbol, base_style) = match snapshot.cells[pos.to_index()] {
        None => (format!("{}", pos.to_index() + 1), Style::default().fg(Color::DarkGray)),
        Some(Mark::X) => ("X".to_string(), Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
        Some(Mark::O) => ("O".to_string(), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    };

    let on_winning_line = snapshot
        .outcome
        .winning_line()
        .is_some_and(|line| line.contains(pos));

    let style = if on_winning_line {
        base_style.bg(Color::Green).fg(Color::Black)
    } else if pos == cursor && snapshot.phase == Phase::InProgress {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(symbol, style)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(
        Paragraph::new(text.to_string()).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
