//! Overlay rendering (error notification)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::UiState;

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    let Some(ref error_msg) = ui_state.error_message else {
        return;
    };
    let area = frame.area();

    // Fixed width popup (responsive to screen size)
    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;

    let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;

    // Height: top border (1) + error lines + bottom border (1)
    let popup_height = (2 + error_line_count.max(1)).min(area.height.saturating_sub(4));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(error_msg.as_str())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error (Esc to dismiss) ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(error_widget, popup_area);
}
