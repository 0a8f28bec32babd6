//! Rendering of the overlay views

mod grid;
mod menu;

use crate::colors;
use couchdeck_core::{ModalController, ModalPhase};
use couchdeck_tui::host::StatusMessage;
use couchdeck_tui::keys::MENU_FKEY;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

/// Header, view body and footer rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub header: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl Screen {
    pub fn split(area: Rect) -> Self {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        Self {
            header,
            body,
            footer,
        }
    }
}

pub fn draw(frame: &mut Frame, controller: &ModalController, status: Option<&StatusMessage>) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors::BG)),
        area,
    );
    let screen = Screen::split(area);

    if controller.phase() == ModalPhase::Hidden {
        render_hidden(frame, screen.body, &controller.config().keybindings.home);
    } else {
        let opacity = controller.opacity();
        render_header(frame, screen.header, controller, opacity);
        match controller.views().active_menu() {
            Some(menu) => menu::render_menu(frame, screen.body, menu, opacity),
            None => grid::render_grid(frame, screen.body, controller.grid(), opacity),
        }
    }

    render_footer(frame, screen.footer, controller, status);
}

fn render_header(frame: &mut Frame, area: Rect, controller: &ModalController, opacity: f64) {
    let title = controller
        .views()
        .active_menu()
        .map_or("Apps", |menu| menu.kind().title());

    let mut spans = vec![Span::styled(
        format!(" {title}"),
        Style::default()
            .fg(colors::faded(colors::PRIMARY, opacity))
            .add_modifier(Modifier::BOLD),
    )];
    if controller.session().is_some_and(|s| s.degraded) {
        spans.push(Span::styled(
            "  (no exclusive input)",
            Style::default().fg(colors::faded(colors::WARNING, opacity)),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_hidden(frame: &mut Frame, area: Rect, home_shortcut: &str) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    let text = format!("Launcher hidden. Press {home_shortcut} to show it.");
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(colors::OUTLINE)),
        middle,
    );
}

fn render_footer(
    frame: &mut Frame,
    area: Rect,
    controller: &ModalController,
    status: Option<&StatusMessage>,
) {
    let line = if let Some(status) = status {
        Line::from(vec![
            Span::styled(
                format!(" {}: ", status.title),
                Style::default()
                    .fg(colors::ERROR)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(status.message.clone(), Style::default().fg(colors::ON_SURFACE)),
        ])
    } else {
        let keys = &controller.config().keybindings;
        Line::from(Span::styled(
            format!(
                " Arrows move  Enter launch  Esc back  F{MENU_FKEY} settings  {} hide  Ctrl+C quit",
                keys.exit
            ),
            Style::default().fg(colors::SUBTEXT),
        ))
    };
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(colors::SURFACE)),
        area,
    );
}

/// Portion of `bounds` visible in `area` after scrolling by `scroll`, in
/// terminal cells.
// Values are clamped to the area before the casts
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn visible_rect(area: Rect, bounds: couchdeck_core::CellBox, scroll: f64) -> Option<Rect> {
    let width = f64::from(area.width);
    let height = f64::from(area.height);

    let left = bounds.x1.max(0.0);
    let right = bounds.x2.min(width);
    let top = (bounds.y1 - scroll).max(0.0);
    let bottom = (bounds.y2 - scroll).min(height);
    if right - left < 1.0 || bottom - top < 1.0 {
        return None;
    }

    Some(Rect {
        x: area.x + left.round() as u16,
        y: area.y + top.round() as u16,
        width: (right - left).round() as u16,
        height: (bottom - top).round() as u16,
    })
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}
