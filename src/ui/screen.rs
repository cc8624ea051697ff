use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use itertools::Itertools;
use numtap::{
    mode::{mode_key, Difficulty, Mode, MODES},
    util::{format_best, format_duration, format_seconds, pad_to_width},
    GameScreen,
};

use super::layout::{playing_chunks, target_rect, TARGET_WIDTH};
use crate::App;

const VERTICAL_MARGIN: u16 = 1;
const NAME_COLUMN: usize = 20;
const DESCRIPTION_COLUMN: usize = 34;

/// A UI Screen boundary: renders one game screen from the app state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

fn render_hint(text: &str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(text.to_string(), hint_style()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

/// Best-time suffix shown next to a mode on the menu
fn menu_bests(app: &App, mode: &Mode) -> String {
    if mode.offers_difficulty() {
        [Difficulty::Small, Difficulty::Large]
            .into_iter()
            .filter_map(|d| {
                app.game
                    .best_for(&mode_key(mode, d))
                    .map(|b| format!("{}: {}", d, format_seconds(b)))
            })
            .join("  ")
    } else {
        format_best(app.game.best_for(&mode_key(mode, Difficulty::Small))).unwrap_or_default()
    }
}

/// Mode list with the player's bests
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(2)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(MODES.len() as u16 + 2),
                Constraint::Length(2),
            ])
            .split(area);

        Paragraph::new(vec![
            Line::from(Span::styled(
                "numtap",
                bold().fg(Color::Magenta),
            )),
            Line::from(Span::styled(app.device.instructions(), hint_style())),
        ])
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let lines: Vec<Line> = MODES
            .iter()
            .enumerate()
            .map(|(idx, mode)| {
                let selected = idx == app.menu_index;
                let marker = if selected { "▶ " } else { "  " };
                let name_style = if selected {
                    bold().fg(Color::Yellow)
                } else {
                    bold()
                };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(
                        pad_to_width(&format!("{}. {}", idx + 1, mode.name), NAME_COLUMN),
                        name_style,
                    ),
                    Span::styled(pad_to_width(mode.description, DESCRIPTION_COLUMN), hint_style()),
                    Span::styled(menu_bests(app, mode), Style::default().fg(Color::Cyan)),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Modes"))
            .render(chunks[1], buf);

        render_hint(
            "(↑/↓) select / (enter) play / (1-9) quick pick / (q)uit",
            chunks[2],
            buf,
        );
    }
}

/// Grid-size choice for multiples modes
pub struct DifficultyScreen {
    pub mode: Mode,
}

impl Screen for DifficultyScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(2)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(4),
                Constraint::Length(2),
            ])
            .split(area);

        Paragraph::new(Span::styled(self.mode.name, bold().fg(Color::Magenta)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let option = |n: usize, d: Difficulty| {
            let best = format_best(app.game.best_for(&mode_key(&self.mode, d)))
                .map(|b| format!("  ({b})"))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("({n}) {d}"), bold()),
                Span::raw(format!(" - {} numbers", d.target_count())),
                Span::styled(best, Style::default().fg(Color::Cyan)),
            ])
        };

        Paragraph::new(vec![
            option(1, Difficulty::Small),
            Line::default(),
            option(2, Difficulty::Large),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Grid size"))
        .render(chunks[1], buf);

        render_hint("(1) 3x3 / (2) 4x4 / (esc) back", chunks[2], buf);
    }
}

/// The board itself
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let Some(session) = app.game.session() else {
            return;
        };
        let [header, board, footer] = playing_chunks(area);
        let missed = app.game.feedback_active();

        let progress = format!(
            "{} / {}",
            (session.cursor + 1).min(session.len()),
            session.len()
        );
        let next = session
            .expected()
            .map(|v| format!("next: {v}"))
            .unwrap_or_else(|| "done".to_string());

        let mut header_lines = vec![
            Line::from(Span::styled(
                session.config.mode_key(),
                bold().fg(Color::Magenta),
            )),
            Line::from(vec![
                Span::styled(progress, bold()),
                Span::raw("   "),
                Span::styled(next, bold().fg(Color::Yellow)),
            ]),
            Line::from(Span::styled(
                format_duration(app.game.elapsed()),
                bold().add_modifier(Modifier::DIM),
            )),
        ];
        if missed {
            header_lines.push(Line::from(Span::styled(
                "✗ wrong number",
                bold().fg(Color::Red),
            )));
        }
        Paragraph::new(header_lines)
            .alignment(Alignment::Center)
            .render(header, buf);

        let border_style = if missed {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .render(board, buf);

        for target in &session.targets {
            let rect = target_rect(board, target.position);
            if rect.is_empty() {
                continue;
            }
            let style = if target.completed {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
            } else {
                bold().fg(Color::Black).bg(Color::LightCyan)
            };
            let label = format!("{:^width$}", target.value, width = TARGET_WIDTH as usize);
            buf.set_stringn(rect.x, rect.y, label, rect.width as usize, style);
        }

        let hint = if app.device.accepts_keyboard_taps() {
            "click or type the numbers / (enter) next / (esc) menu"
        } else {
            "click the numbers in order / (esc) menu"
        };
        render_hint(hint, footer, buf);
    }
}

/// Results of the last run
pub struct FinishedScreen;

impl Screen for FinishedScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let Some(done) = app.game.last_completion() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(2)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(area);

        let verdict = match (done.is_new_record, done.previous_best) {
            (true, _) => Line::from(Span::styled("NEW RECORD!", bold().fg(Color::Yellow))),
            (false, Some(best)) => Line::from(Span::styled(
                format!("best: {}", format_seconds(best)),
                Style::default().fg(Color::Cyan),
            )),
            (false, None) => Line::default(),
        };

        Paragraph::new(vec![
            Line::from(Span::styled(
                format!("{} cleared!", done.mode_key),
                bold().fg(Color::Magenta),
            )),
            Line::default(),
            Line::from(Span::styled(format_seconds(done.elapsed_secs), bold())),
            Line::default(),
            verdict,
        ])
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        render_hint("(r)etry / (m)enu / (q)uit", chunks[3], buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: GameScreen) -> Box<dyn Screen> {
    match state {
        GameScreen::Menu => Box::new(MenuScreen),
        GameScreen::Difficulty(mode) => Box::new(DifficultyScreen { mode }),
        GameScreen::Playing => Box::new(PlayingScreen),
        GameScreen::Finished => Box::new(FinishedScreen),
    }
}
