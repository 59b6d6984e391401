use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::view::View;
use crate::app::App;
use crate::ssh_service::RemoteRunner;

pub fn draw_footer<R: RemoteRunner>(f: &mut Frame, app: &App<R>, area: Rect) {
    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let nav_text = match app.navigator.top() {
        View::Report(_) => "↑↓/jk Scroll  ←→/hl Pan  [Enter] Ok",
        View::Menu(_) => "↑↓/jk Move  [Enter] Select",
        View::StartStop(_) | View::SnapshotDelete(_) => "↑↓/jk Move  [Enter/Space] Toggle",
    };
    let action_text = if app.navigator.depth() > 1 {
        "[Esc] Back [q] Quit"
    } else {
        "[q] Quit"
    };

    let nav_help = Paragraph::new(nav_text).style(Style::default().fg(Color::Gray));
    let action_help = Paragraph::new(action_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(ratatui::layout::Alignment::Right);

    f.render_widget(nav_help, footer[0]);
    f.render_widget(action_help, footer[1]);
}
