use crate::models::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotAction {
    List,
    Take,
    Delete,
}

impl SnapshotAction {
    pub fn caption(self) -> &'static str {
        match self {
            SnapshotAction::List => "List snapshots",
            SnapshotAction::Take => "Take new snapshot",
            SnapshotAction::Delete => "Delete snapshots",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMenu {
    Vms,
    Host,
}

/// What activating a menu item does. Plain data, so a menu can be built,
/// inspected and tested without a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Open(SubMenu),
    RunningVms,
    ConfiguredVms,
    VmInfoPicker,
    VmInfo(String),
    StartStop,
    SnapshotPicker(SnapshotAction),
    Snapshot(SnapshotAction, String),
    HostInfo,
    DiskUsage,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }

    /// Items that open another menu are drawn with a trailing "...".
    pub fn opens_menu(&self) -> bool {
        matches!(
            self.action,
            MenuAction::Open(_) | MenuAction::VmInfoPicker | MenuAction::SnapshotPicker(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub items: Vec<MenuItem>,
    pub selected: usize,
}

impl Menu {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            items,
            selected: 0,
        }
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let total = self.items.len();
        self.selected = (self.selected + total - 1) % total;
    }

    pub fn selected_action(&self) -> Option<&MenuAction> {
        self.items.get(self.selected).map(|item| &item.action)
    }
}

/// Columns moved per Left/Right press.
pub const PAN_STEP: u16 = 8;

/// Read-only text. Activation dismisses it. Lines are never wrapped, so
/// tables keep their columns; wide lines are panned instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub body: String,
    pub scroll: u16,
    pub hscroll: u16,
}

impl Report {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            scroll: 0,
            hscroll: 0,
        }
    }

    /// Width in columns of the widest line.
    pub fn width(&self) -> usize {
        self.body
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn scroll_right(&mut self) {
        let max = u16::try_from(self.width().saturating_sub(1)).unwrap_or(u16::MAX);
        self.hscroll = self.hscroll.saturating_add(PAN_STEP).min(max);
    }

    pub fn scroll_left(&mut self) {
        self.hscroll = self.hscroll.saturating_sub(PAN_STEP);
    }

    pub fn scroll_down(&mut self) {
        let max = self.body.lines().count().saturating_sub(1) as u16;
        self.scroll = (self.scroll + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Start,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerChoice {
    pub vm: String,
    pub power: Power,
}

/// One remote call the start/stop form asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerRequest {
    Start { vm: String, headless: bool },
    Stop { vm: String, force: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStopControl {
    Choice(usize),
    Headless,
    Force,
    Execute,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<T> {
    /// A toggle changed; the form stays open.
    Updated,
    Submit(T),
    Cancel,
}

/// Start/stop form: one exclusive choice across the "Start" and "Stop"
/// groups, plus the headless and force flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartStopForm {
    pub choices: Vec<PowerChoice>,
    pub selected: Option<usize>,
    pub headless: bool,
    pub force: bool,
    pub focus: usize,
}

impl StartStopForm {
    /// `startable` are configured VMs that are not running; `running` can
    /// only be stopped.
    pub fn new(startable: Vec<String>, running: Vec<String>) -> Self {
        let choices = startable
            .into_iter()
            .map(|vm| PowerChoice {
                vm,
                power: Power::Start,
            })
            .chain(running.into_iter().map(|vm| PowerChoice {
                vm,
                power: Power::Stop,
            }))
            .collect();

        Self {
            choices,
            selected: None,
            headless: true,
            force: false,
            focus: 0,
        }
    }

    pub fn controls(&self) -> Vec<StartStopControl> {
        (0..self.choices.len())
            .map(StartStopControl::Choice)
            .chain([
                StartStopControl::Headless,
                StartStopControl::Force,
                StartStopControl::Execute,
                StartStopControl::Cancel,
            ])
            .collect()
    }

    pub fn focused(&self) -> StartStopControl {
        let controls = self.controls();
        controls[self.focus.min(controls.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.controls().len();
    }

    pub fn focus_previous(&mut self) {
        let total = self.controls().len();
        self.focus = (self.focus + total - 1) % total;
    }

    pub fn group(&self, power: Power) -> impl Iterator<Item = (usize, &PowerChoice)> {
        self.choices
            .iter()
            .enumerate()
            .filter(move |(_, choice)| choice.power == power)
    }

    /// The calls "Execute" issues, in display order.
    pub fn requests(&self) -> Vec<PowerRequest> {
        self.selected
            .and_then(|index| self.choices.get(index))
            .map(|choice| match choice.power {
                Power::Start => PowerRequest::Start {
                    vm: choice.vm.clone(),
                    headless: self.headless,
                },
                Power::Stop => PowerRequest::Stop {
                    vm: choice.vm.clone(),
                    force: self.force,
                },
            })
            .into_iter()
            .collect()
    }

    pub fn activate(&mut self) -> FormOutcome<Vec<PowerRequest>> {
        match self.focused() {
            StartStopControl::Choice(index) => {
                self.selected = Some(index);
                FormOutcome::Updated
            }
            StartStopControl::Headless => {
                self.headless = !self.headless;
                FormOutcome::Updated
            }
            StartStopControl::Force => {
                self.force = !self.force;
                FormOutcome::Updated
            }
            StartStopControl::Execute => FormOutcome::Submit(self.requests()),
            StartStopControl::Cancel => FormOutcome::Cancel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotDeleteControl {
    Snapshot(usize),
    Delete,
    Return,
}

/// One checkbox per snapshot of `vm`; "Delete" removes every checked one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDeleteForm {
    pub vm: String,
    pub snapshots: Vec<Snapshot>,
    pub checked: Vec<bool>,
    pub focus: usize,
}

impl SnapshotDeleteForm {
    pub fn new(vm: impl Into<String>, snapshots: Vec<Snapshot>) -> Self {
        let checked = vec![false; snapshots.len()];
        Self {
            vm: vm.into(),
            snapshots,
            checked,
            focus: 0,
        }
    }

    pub fn controls(&self) -> Vec<SnapshotDeleteControl> {
        (0..self.snapshots.len())
            .map(SnapshotDeleteControl::Snapshot)
            .chain([SnapshotDeleteControl::Delete, SnapshotDeleteControl::Return])
            .collect()
    }

    pub fn focused(&self) -> SnapshotDeleteControl {
        let controls = self.controls();
        controls[self.focus.min(controls.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.controls().len();
    }

    pub fn focus_previous(&mut self) {
        let total = self.controls().len();
        self.focus = (self.focus + total - 1) % total;
    }

    /// Names of the checked snapshots, in listing order.
    pub fn marked(&self) -> Vec<String> {
        self.snapshots
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(snapshot, _)| snapshot.name.clone())
            .collect()
    }

    pub fn activate(&mut self) -> FormOutcome<Vec<String>> {
        match self.focused() {
            SnapshotDeleteControl::Snapshot(index) => {
                if let Some(checked) = self.checked.get_mut(index) {
                    *checked = !*checked;
                }
                FormOutcome::Updated
            }
            SnapshotDeleteControl::Delete => FormOutcome::Submit(self.marked()),
            SnapshotDeleteControl::Return => FormOutcome::Cancel,
        }
    }
}

pub fn snapshot_line(snapshot: &Snapshot) -> String {
    format!(
        "{} {} {}",
        snapshot.name,
        snapshot.uuid,
        if snapshot.is_active { "active" } else { "" }
    )
    .trim_end()
    .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Menu(Menu),
    Report(Report),
    StartStop(StartStopForm),
    SnapshotDelete(SnapshotDeleteForm),
}

impl View {
    pub fn alert(body: impl Into<String>) -> Self {
        View::Report(Report::new("Result", body))
    }

    pub fn title(&self) -> &str {
        match self {
            View::Menu(menu) => &menu.title,
            View::Report(report) => &report.title,
            View::StartStop(_) => "Start/stop vm",
            View::SnapshotDelete(_) => "Snapshots:",
        }
    }

    pub fn next(&mut self) {
        match self {
            View::Menu(menu) => menu.select_next(),
            View::Report(report) => report.scroll_down(),
            View::StartStop(form) => form.focus_next(),
            View::SnapshotDelete(form) => form.focus_next(),
        }
    }

    pub fn previous(&mut self) {
        match self {
            View::Menu(menu) => menu.select_previous(),
            View::Report(report) => report.scroll_up(),
            View::StartStop(form) => form.focus_previous(),
            View::SnapshotDelete(form) => form.focus_previous(),
        }
    }

    /// Only reports pan; other views ignore sideways keys.
    pub fn left(&mut self) {
        if let View::Report(report) = self {
            report.scroll_left();
        }
    }

    pub fn right(&mut self) {
        if let View::Report(report) = self {
            report.scroll_right();
        }
    }
}
