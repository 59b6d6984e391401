use std::time::Instant;

use crate::app::builder::{self, ViewBuilder};
use crate::app::keymap::Input;
use crate::app::navigator::Navigator;
use crate::app::types::App;
use crate::app::view::{FormOutcome, MenuAction, PowerRequest, SnapshotDeleteControl, StartStopControl, View};
use crate::inventory::VirtualBox;
use crate::ssh_service::RemoteRunner;

/// What the top box asked for once its own state has been updated.
enum Step {
    Stay,
    Close,
    Perform(MenuAction),
    Power {
        requests: Vec<PowerRequest>,
        headless: bool,
        force: bool,
    },
    DeleteSnapshots {
        vm: String,
        snapshots: Vec<String>,
    },
}

impl<R: RemoteRunner> App<R> {
    pub fn new(host: impl Into<String>, runner: R) -> Self {
        let host = host.into();
        tracing::info!("Managing VirtualBox on {}", host);
        Self {
            should_quit: false,
            inventory: VirtualBox::new(host, runner),
            navigator: Navigator::new(View::Menu(builder::main_menu())),
            status_message: None,
        }
    }

    pub fn host(&self) -> &str {
        self.inventory.host()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }

    pub fn on_input(&mut self, input: Input) {
        match input {
            Input::Next => self.navigator.top_mut().next(),
            Input::Previous => self.navigator.top_mut().previous(),
            Input::Left => self.navigator.top_mut().left(),
            Input::Right => self.navigator.top_mut().right(),
            Input::Activate => self.activate(),
            Input::Cancel => {
                self.navigator.close_top();
            }
            Input::Quit => self.should_quit = true,
        }
    }

    /// What activating the focused control would run remotely, if anything.
    /// Lets the caller draw a notice before the loop blocks on ssh.
    pub fn pending_remote_work(&self) -> Option<&'static str> {
        match self.navigator.top() {
            View::Menu(menu) => menu.selected_action().and_then(remote_label),
            View::Report(_) => None,
            View::StartStop(form) => match form.focused() {
                StartStopControl::Execute if form.selected.is_some() => Some("start/stop"),
                _ => None,
            },
            View::SnapshotDelete(form) => match form.focused() {
                SnapshotDeleteControl::Delete if !form.marked().is_empty() => {
                    Some("snapshot delete")
                }
                _ => None,
            },
        }
    }

    pub fn activate(&mut self) {
        let step = match self.navigator.top_mut() {
            View::Menu(menu) => menu
                .selected_action()
                .cloned()
                .map_or(Step::Stay, Step::Perform),
            View::Report(_) => Step::Close,
            View::StartStop(form) => match form.activate() {
                FormOutcome::Updated => Step::Stay,
                FormOutcome::Cancel => Step::Close,
                FormOutcome::Submit(requests) => Step::Power {
                    requests,
                    headless: form.headless,
                    force: form.force,
                },
            },
            View::SnapshotDelete(form) => match form.activate() {
                FormOutcome::Updated => Step::Stay,
                FormOutcome::Cancel => Step::Close,
                FormOutcome::Submit(snapshots) => Step::DeleteSnapshots {
                    vm: form.vm.clone(),
                    snapshots,
                },
            },
        };

        match step {
            Step::Stay => {}
            Step::Close => {
                self.navigator.close_top();
            }
            Step::Perform(action) => self.perform(action),
            Step::Power {
                requests,
                headless,
                force,
            } => {
                let view = ViewBuilder::new(&self.inventory).execute_power(&requests, headless, force);
                self.show(view);
            }
            Step::DeleteSnapshots { vm, snapshots } => {
                let view = ViewBuilder::new(&self.inventory).delete_snapshots(&vm, &snapshots);
                self.show(view);
            }
        }
    }

    fn perform(&mut self, action: MenuAction) {
        tracing::debug!("Menu action {:?}", action);
        let views = ViewBuilder::new(&self.inventory);
        let view = match action {
            MenuAction::Open(which) => View::Menu(builder::sub_menu(which)),
            MenuAction::RunningVms => views.running_vms(),
            MenuAction::ConfiguredVms => views.configured_vms(),
            MenuAction::VmInfoPicker => views.vm_info_picker(),
            MenuAction::VmInfo(vm) => views.vm_info(&vm),
            MenuAction::StartStop => views.start_stop_form(),
            MenuAction::SnapshotPicker(which) => views.snapshot_picker(which),
            MenuAction::Snapshot(which, vm) => views.snapshot(which, &vm),
            MenuAction::HostInfo => views.host_info(),
            MenuAction::DiskUsage => views.disk_usage(),
            MenuAction::Exit => {
                tracing::info!("Exit requested");
                self.should_quit = true;
                return;
            }
        };
        self.show(view);
    }

    fn show(&mut self, view: View) {
        self.clear_status_message();
        self.navigator.open_box(view);
    }
}

fn remote_label(action: &MenuAction) -> Option<&'static str> {
    match action {
        MenuAction::RunningVms => Some("vboxmanage list runningvms"),
        MenuAction::ConfiguredVms | MenuAction::VmInfoPicker | MenuAction::SnapshotPicker(_) => {
            Some("vboxmanage list vms")
        }
        MenuAction::VmInfo(_) => Some("vboxmanage showvminfo"),
        MenuAction::StartStop => Some("vboxmanage list"),
        MenuAction::Snapshot(_, _) => Some("vboxmanage snapshot"),
        MenuAction::HostInfo => Some("vboxmanage list hostinfo"),
        MenuAction::DiskUsage => Some("df -h"),
        MenuAction::Open(_) | MenuAction::Exit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh_service::testing::ScriptedRunner;

    fn top_body<R: RemoteRunner>(app: &App<R>) -> &str {
        match app.navigator.top() {
            View::Report(report) => &report.body,
            other => panic!("expected a report on top, got {other:?}"),
        }
    }

    /// Moves the top menu's focus onto the item labelled `label` and activates it.
    fn choose<R: RemoteRunner>(app: &mut App<R>, label: &str) {
        let View::Menu(menu) = app.navigator.top() else {
            panic!("expected a menu on top");
        };
        let index = menu
            .items
            .iter()
            .position(|item| item.label == label)
            .unwrap_or_else(|| panic!("no item {label}"));
        for _ in 0..index {
            app.on_input(Input::Next);
        }
        app.on_input(Input::Activate);
    }

    #[test]
    fn starts_on_the_main_menu() {
        let app = App::new("foice", ScriptedRunner::new());
        assert_eq!(app.navigator.depth(), 1);
        assert_eq!(app.navigator.top().title(), "Main Menu");
        assert!(!app.should_quit);
    }

    #[test]
    fn running_vms_report_with_nothing_running() {
        let runner = ScriptedRunner::new().with("vboxmanage list runningvms", "");
        let mut app = App::new("foice", runner);

        choose(&mut app, "VMs");
        assert_eq!(app.pending_remote_work(), Some("vboxmanage list runningvms"));
        choose(&mut app, "Running vms");

        assert_eq!(top_body(&app), "No running vm's in foice");
        assert_eq!(app.navigator.depth(), 3);
    }

    #[test]
    fn escape_walks_back_to_the_root_and_stops() {
        let mut app = App::new("foice", ScriptedRunner::new());
        choose(&mut app, "Host");
        assert_eq!(app.navigator.depth(), 2);

        app.on_input(Input::Cancel);
        app.on_input(Input::Cancel);
        assert_eq!(app.navigator.depth(), 1);
        assert_eq!(app.navigator.top().title(), "Main Menu");
    }

    #[test]
    fn activating_a_report_dismisses_it() {
        let runner = ScriptedRunner::new().with("vboxmanage list hostinfo", "Host Information:\n");
        let mut app = App::new("foice", runner);
        choose(&mut app, "Host");
        choose(&mut app, "Host information");
        assert_eq!(app.navigator.depth(), 3);

        app.on_input(Input::Activate);
        assert_eq!(app.navigator.depth(), 2);
        assert_eq!(app.navigator.top().title(), "Host");
    }

    #[test]
    fn exit_item_and_quit_key_both_stop_the_loop() {
        let mut app = App::new("foice", ScriptedRunner::new());
        choose(&mut app, "Exit program");
        assert!(app.should_quit);
        assert_eq!(app.navigator.depth(), 1);

        let mut app = App::new("foice", ScriptedRunner::new());
        choose(&mut app, "VMs");
        app.on_input(Input::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn start_stop_execute_issues_the_selected_call() {
        let runner = ScriptedRunner::new()
            .with("vboxmanage list runningvms", "\"web\" {aaa}\n")
            .with("vboxmanage list vms", "\"web\" {aaa}\n\"db\" {bbb}\n")
            .with("vboxmanage controlvm web acpipowerbutton", "");
        let mut app = App::new("foice", runner);
        choose(&mut app, "VMs");
        choose(&mut app, "Start/stop vm");
        assert!(matches!(app.navigator.top(), View::StartStop(_)));

        // Choices: db (start), web (stop); then headless, force, execute, cancel.
        app.on_input(Input::Next);
        app.on_input(Input::Activate);
        for _ in 0..3 {
            app.on_input(Input::Next);
        }
        assert_eq!(app.pending_remote_work(), Some("start/stop"));
        app.on_input(Input::Activate);

        assert_eq!(top_body(&app), "force=false\nheadless=true\nstop web: \n");
        assert_eq!(
            app.inventory.runner().lines().last().map(String::as_str),
            Some("vboxmanage controlvm web acpipowerbutton")
        );

        // The alert closes back onto the form.
        app.on_input(Input::Cancel);
        assert!(matches!(app.navigator.top(), View::StartStop(_)));
    }

    #[test]
    fn snapshot_delete_flow() {
        let runner = ScriptedRunner::new()
            .with("vboxmanage list vms", "\"web\" {aaa}\n")
            .with("vboxmanage snapshot web list", "   Name: old (UUID: 1)\n   Name: new (UUID: 2) *\n")
            .with("vboxmanage snapshot web delete old", "0%...100%\n");
        let mut app = App::new("foice", runner);
        choose(&mut app, "VMs");
        choose(&mut app, "Delete snapshots");
        choose(&mut app, "web");
        assert!(matches!(app.navigator.top(), View::SnapshotDelete(_)));
        assert_eq!(app.navigator.depth(), 4);

        app.on_input(Input::Activate); // check "old"
        app.on_input(Input::Next);
        app.on_input(Input::Next); // "Delete"
        assert_eq!(app.pending_remote_work(), Some("snapshot delete"));
        app.on_input(Input::Activate);

        assert_eq!(top_body(&app), "0%...100%");
        assert_eq!(app.navigator.depth(), 5);
    }

    #[test]
    fn take_snapshot_shows_the_raw_output() {
        let mut app = App::new("foice", ScriptedRunner::new().with("vboxmanage list vms", "\"web\" {aaa}\n"));
        choose(&mut app, "VMs");
        choose(&mut app, "Take new snapshot");
        choose(&mut app, "web");

        // The scripted runner has no answer for the dated command, so the
        // alert carries its stderr just as a remote failure would.
        assert!(top_body(&app).starts_with("unexpected command: vboxmanage snapshot web take"));
    }

    #[test]
    fn submenus_need_no_remote_call() {
        let app = App::new("foice", ScriptedRunner::new());
        assert_eq!(app.pending_remote_work(), None);
        assert!(app.inventory.runner().calls().is_empty());
    }
}
