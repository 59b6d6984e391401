use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::ssh_service::RemoteRunner;

const STATUS_TTL_SECS: u64 = 5;

pub fn draw_status_bar<R: RemoteRunner>(f: &mut Frame, app: &mut App<R>, area: Rect) {
    // Clear messages older than 5 seconds
    if let Some((_, timestamp)) = &app.status_message {
        if timestamp.elapsed().as_secs() >= STATUS_TTL_SECS {
            app.clear_status_message();
        }
    }

    let (message, style) = match &app.status_message {
        Some((message, _)) => {
            let lower = message.to_lowercase();
            let style = if lower.contains("error") || lower.contains("failed") {
                Style::default().fg(Color::Red)
            } else if lower.starts_with("running") {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::Yellow)
            };
            (message.clone(), style)
        }
        None => (
            format!("VirtualBox on {}", app.host()),
            Style::default().fg(Color::Gray),
        ),
    };

    let paragraph = Paragraph::new(message)
        .style(style)
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}
