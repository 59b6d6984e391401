mod boxes;
mod footer;
mod status_bar;

use crate::app::App;
use crate::ssh_service::RemoteRunner;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub fn draw<R: RemoteRunner>(f: &mut Frame, app: &mut App<R>) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(3),    // Cascading boxes
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(size);

    boxes::draw_boxes(f, app, chunks[0]);
    status_bar::draw_status_bar(f, app, chunks[1]);
    footer::draw_footer(f, app, chunks[2]);
}
