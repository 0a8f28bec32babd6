//! App grid rendering.

use super::{truncate_text, visible_rect};
use crate::colors::{self, faded};
use couchdeck_core::GridView;
use couchdeck_core::collection::Cell;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

/// Single-letter stand-in for the app icon
fn glyph(cell: &Cell) -> String {
    let source = cell.icon.as_deref().unwrap_or(&cell.label);
    source
        .chars()
        .find(|c| c.is_alphanumeric())
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().collect())
}

fn cell_lines(cell: &Cell, favorite: bool, width: usize, opacity: f64) -> Vec<Line<'static>> {
    let text_style = Style::default().fg(faded(colors::ON_SURFACE, opacity));
    let mut markers = Vec::new();
    if favorite {
        markers.push(Span::styled(
            "* ",
            Style::default().fg(faded(colors::WARNING, opacity)),
        ));
    }
    if cell.badge {
        markers.push(Span::styled(
            "running",
            Style::default().fg(faded(colors::SUCCESS, opacity)),
        ));
    }

    vec![
        Line::from(Span::styled(
            format!("[{}]", glyph(cell)),
            Style::default()
                .fg(faded(colors::PRIMARY, opacity))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(truncate_text(&cell.label, width), text_style)),
        Line::from(markers),
    ]
}

pub fn render_grid(frame: &mut Frame, area: Rect, grid: &GridView, opacity: f64) {
    if grid.collection().is_empty() {
        frame.render_widget(
            Paragraph::new("No apps in the catalog")
                .alignment(Alignment::Center)
                .style(Style::default().fg(faded(colors::OUTLINE, opacity))),
            area,
        );
        return;
    }

    let scroll = grid.scroll_offset();
    for cell in grid.collection().iter() {
        let Some(bounds) = cell.bounds() else {
            continue;
        };
        let Some(rect) = visible_rect(area, bounds, scroll) else {
            continue;
        };

        let selected = cell.is_selected();
        let (border, background) = if selected {
            (colors::PRIMARY, colors::SURFACE_HIGH)
        } else {
            (colors::OUTLINE, colors::SURFACE)
        };
        let favorite = grid.entry(&cell.id).is_some_and(|e| e.is_favorite);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(Style::default().fg(faded(border, opacity)))
            .style(Style::default().bg(faded(background, opacity)));

        let inner_width = usize::from(rect.width.saturating_sub(2));
        frame.render_widget(
            Paragraph::new(cell_lines(cell, favorite, inner_width, opacity))
                .alignment(Alignment::Center)
                .block(block),
            rect,
        );
    }
}
