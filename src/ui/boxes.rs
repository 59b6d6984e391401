use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState,
    },
    Frame,
};

use crate::app::navigator::{BoxEntry, Inset};
use crate::app::view::{
    snapshot_line, Menu, Power, Report, SnapshotDeleteControl, SnapshotDeleteForm,
    StartStopControl, StartStopForm, View,
};
use crate::app::App;
use crate::ssh_service::RemoteRunner;

const MIN_WIDTH: u16 = 24;
const MIN_HEIGHT: u16 = 8;
const RELATIVE_SIZE: u32 = 80;

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

/// Shrinks `area` by the box's inset, then takes the centred 80% of what is
/// left, never smaller than the minimum box nor larger than `area`.
pub fn box_area(area: Rect, inset: Inset) -> Rect {
    let x = area.x + inset.left.min(area.width);
    let y = area.y + inset.top.min(area.height);
    let width = area.width.saturating_sub(inset.left.saturating_add(inset.right));
    let height = area.height.saturating_sub(inset.top.saturating_add(inset.bottom));

    let scale = |len: u16, min: u16, max: u16| {
        ((u32::from(len) * RELATIVE_SIZE / 100) as u16).max(min).min(max)
    };
    let box_width = scale(width, MIN_WIDTH, area.width);
    let box_height = scale(height, MIN_HEIGHT, area.height);

    let box_x = (x + width.saturating_sub(box_width) / 2).min(area.right() - box_width);
    let box_y = (y + height.saturating_sub(box_height) / 2).min(area.bottom() - box_height);

    Rect::new(box_x, box_y, box_width, box_height)
}

pub fn draw_boxes<R: RemoteRunner>(f: &mut Frame, app: &App<R>, area: Rect) {
    draw_background(f, area);

    let max_depth = app.navigator.max_depth();
    for entry in app.navigator.entries() {
        draw_box(f, entry, box_area(area, entry.inset(max_depth)));
    }
}

fn draw_background(f: &mut Frame, area: Rect) {
    let row = "/".repeat(area.width as usize);
    let lines: Vec<Line> = (0..area.height).map(|_| Line::from(row.clone())).collect();
    let background = Paragraph::new(lines).style(Style::default().fg(Color::DarkGray));
    f.render_widget(background, area);
}

fn draw_box(f: &mut Frame, entry: &BoxEntry<View>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", entry.view.title()))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(area);

    // Clear the boxes below before drawing this one
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    match &entry.view {
        View::Menu(menu) => draw_menu(f, menu, inner),
        View::Report(report) => draw_report(f, report, inner),
        View::StartStop(form) => draw_start_stop(f, form, inner),
        View::SnapshotDelete(form) => draw_snapshot_delete(f, form, inner),
    }
}

fn draw_menu(f: &mut Frame, menu: &Menu, area: Rect) {
    let items: Vec<ListItem> = menu
        .items
        .iter()
        .map(|item| {
            let label = if item.opens_menu() {
                format!("{} ...", item.label)
            } else {
                item.label.clone()
            };
            ListItem::new(Line::from(label))
        })
        .collect();

    if items.is_empty() {
        f.render_widget(
            Paragraph::new("Nothing here. [Esc] Back").style(Style::default().fg(Color::Gray)),
            area,
        );
        return;
    }

    let list = List::new(items).highlight_style(focus_style(true));
    let mut state = ListState::default();
    state.select(Some(menu.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_report(f: &mut Frame, report: &Report, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(area);

    let line_count = report.body.lines().count();
    let paragraph = Paragraph::new(report.body.as_str()).scroll((report.scroll, report.hscroll));
    f.render_widget(paragraph, chunks[0]);

    // Make scrollbar only appear if there is overflow
    if chunks[0].height > 0 && line_count > chunks[0].height as usize {
        let mut scrollbar_state = ScrollbarState::new(line_count).position(report.scroll as usize);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓")),
            chunks[0],
            &mut scrollbar_state,
        );
    }

    let mut buttons = vec![Span::styled("< Ok >", focus_style(true))];
    if report.width() > chunks[0].width as usize {
        buttons.push(Span::styled("  ←/→ pan", Style::default().fg(Color::Gray)));
    }
    f.render_widget(Paragraph::new(Line::from(buttons)), chunks[1]);
}

/// Renders `lines` scrolled just far enough for `focus_row` to be visible.
fn draw_scrolled(f: &mut Frame, lines: Vec<Line>, focus_row: usize, area: Rect) {
    let visible = area.height.max(1) as usize;
    let offset = focus_row.saturating_sub(visible - 1) as u16;
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn button(label: &str, focused: bool) -> Line<'static> {
    Line::from(Span::styled(format!("< {label} >"), focus_style(focused)))
}

fn checkbox(label: &str, checked: bool, focused: bool) -> Line<'static> {
    let mark = if checked { "X" } else { " " };
    Line::from(Span::styled(format!("[{mark}] {label}"), focus_style(focused)))
}

fn draw_start_stop(f: &mut Frame, form: &StartStopForm, area: Rect) {
    let focused = form.focused();
    let column = (area.width / 2) as usize;

    let radio = |index: usize| -> Span<'static> {
        let choice = &form.choices[index];
        let mark = if form.selected == Some(index) { "X" } else { " " };
        Span::styled(
            format!("({mark}) {}", choice.vm),
            focus_style(focused == StartStopControl::Choice(index)),
        )
    };

    let starts: Vec<usize> = form.group(Power::Start).map(|(i, _)| i).collect();
    let stops: Vec<usize> = form.group(Power::Stop).map(|(i, _)| i).collect();
    let rows = starts.len().max(stops.len());

    let mut lines = vec![Line::from(format!("{:<column$}{}", "Start:", "Stop:"))];
    let mut focus_row = 0;
    for row in 0..rows {
        let mut spans = Vec::new();
        match starts.get(row) {
            Some(&index) => {
                let span = radio(index);
                let pad = column.saturating_sub(span.width());
                spans.push(span);
                spans.push(Span::raw(" ".repeat(pad)));
                if focused == StartStopControl::Choice(index) {
                    focus_row = lines.len();
                }
            }
            None => spans.push(Span::raw(" ".repeat(column))),
        }
        if let Some(&index) = stops.get(row) {
            spans.push(radio(index));
            if focused == StartStopControl::Choice(index) {
                focus_row = lines.len();
            }
        }
        lines.push(Line::from(spans));
    }

    let tail = [
        (
            StartStopControl::Headless,
            checkbox("Start headless (no GUI)", form.headless, focused == StartStopControl::Headless),
        ),
        (
            StartStopControl::Force,
            checkbox("Force shutdown", form.force, focused == StartStopControl::Force),
        ),
        (
            StartStopControl::Execute,
            button("Execute command", focused == StartStopControl::Execute),
        ),
        (
            StartStopControl::Cancel,
            button("Cancel", focused == StartStopControl::Cancel),
        ),
    ];
    for (control, line) in tail {
        if control != StartStopControl::Cancel {
            lines.push(Line::from(""));
        }
        if control == focused {
            focus_row = lines.len();
        }
        lines.push(line);
    }

    draw_scrolled(f, lines, focus_row, area);
}

fn draw_snapshot_delete(f: &mut Frame, form: &SnapshotDeleteForm, area: Rect) {
    let focused = form.focused();
    let mut lines = Vec::new();
    let mut focus_row = 0;

    if form.snapshots.is_empty() {
        lines.push(Line::from(format!("No snapshots for {}", form.vm)));
    }
    for (index, (snapshot, checked)) in form.snapshots.iter().zip(&form.checked).enumerate() {
        let is_focused = focused == SnapshotDeleteControl::Snapshot(index);
        if is_focused {
            focus_row = lines.len();
        }
        lines.push(checkbox(&snapshot_line(snapshot), *checked, is_focused));
    }

    lines.push(Line::from(""));
    for (control, label) in [
        (SnapshotDeleteControl::Delete, "Delete"),
        (SnapshotDeleteControl::Return, "Return"),
    ] {
        if control == focused {
            focus_row = lines.len();
        }
        lines.push(button(label, control == focused));
    }

    draw_scrolled(f, lines, focus_row, area);
}
