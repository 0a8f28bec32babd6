//! Settings list rendering.

use super::{truncate_text, visible_rect};
use crate::colors::{self, faded};
use couchdeck_core::menu_list::MenuListView;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn render_menu(frame: &mut Frame, area: Rect, menu: &MenuListView, opacity: f64) {
    for cell in menu.collection().iter() {
        let Some(rect) = cell.bounds().and_then(|b| visible_rect(area, b, 0.0)) else {
            continue;
        };

        let selected = cell.is_selected();
        let marker = if selected { "> " } else { "  " };
        let (fg, bg) = if selected {
            (colors::ON_SURFACE, colors::SURFACE_HIGH)
        } else {
            (colors::SUBTEXT, colors::BG)
        };
        let mut style = Style::default()
            .fg(faded(fg, opacity))
            .bg(faded(bg, opacity));
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }

        let label = truncate_text(&cell.label, usize::from(rect.width.saturating_sub(3)));
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(faded(colors::PRIMARY, opacity))),
                Span::raw(label),
            ]))
            .style(style),
            rect,
        );
    }
}
