//! Turns inventory queries into views. Every build re-fetches from the host;
//! failures that never produced remote output are shown as alert text.

use crate::app::view::{
    snapshot_line, Menu, MenuAction, MenuItem, PowerRequest, Report, SnapshotAction,
    SnapshotDeleteForm, StartStopForm, SubMenu, View,
};
use crate::error::Result;
use crate::inventory::{VirtualBox, DISK_USAGE_LABELS};
use crate::models::{DiskUsageEntry, VirtualMachine};
use crate::ssh_service::RemoteRunner;

pub fn main_menu() -> Menu {
    Menu::new(
        "Main Menu",
        vec![
            MenuItem::new("VMs", MenuAction::Open(SubMenu::Vms)),
            MenuItem::new("Host", MenuAction::Open(SubMenu::Host)),
            MenuItem::new("Exit program", MenuAction::Exit),
        ],
    )
}

pub fn sub_menu(which: SubMenu) -> Menu {
    match which {
        SubMenu::Vms => Menu::new(
            "VMs",
            vec![
                MenuItem::new("Running vms", MenuAction::RunningVms),
                MenuItem::new("Configured vms", MenuAction::ConfiguredVms),
                MenuItem::new("VM information", MenuAction::VmInfoPicker),
                MenuItem::new("Start/stop vm", MenuAction::StartStop),
                MenuItem::new(
                    SnapshotAction::List.caption(),
                    MenuAction::SnapshotPicker(SnapshotAction::List),
                ),
                MenuItem::new(
                    SnapshotAction::Take.caption(),
                    MenuAction::SnapshotPicker(SnapshotAction::Take),
                ),
                MenuItem::new(
                    SnapshotAction::Delete.caption(),
                    MenuAction::SnapshotPicker(SnapshotAction::Delete),
                ),
            ],
        ),
        SubMenu::Host => Menu::new(
            "Host",
            vec![
                MenuItem::new("Host information", MenuAction::HostInfo),
                MenuItem::new("Disk usage", MenuAction::DiskUsage),
            ],
        ),
    }
}

fn rule() -> String {
    format!("|{}|{}|", "-".repeat(22), "-".repeat(42))
}

/// `| Name | UUID |` table, or `empty` when there are no rows.
pub fn vm_table(title: &str, vms: &[VirtualMachine], empty: String) -> String {
    if vms.is_empty() {
        return empty;
    }

    let mut lines = vec![
        title.to_string(),
        rule(),
        format!("| {:20} | {:40} |", "Name", "UUID"),
        rule(),
    ];
    lines.extend(
        vms.iter()
            .map(|vm| format!("| {:20} | {:40} |", vm.name, vm.id)),
    );
    lines.push(rule());
    lines.join("\n")
}

pub fn disk_usage_table(entries: &[DiskUsageEntry]) -> String {
    let row = |cols: [&str; 6]| {
        format!(
            "{:<20} {:>6} {:>6} {:>6} {:>5} {}",
            cols[0], cols[1], cols[2], cols[3], cols[4], cols[5]
        )
    };

    std::iter::once(row(DISK_USAGE_LABELS))
        .chain(entries.iter().map(|e| {
            row([
                e.filesystem.as_str(),
                e.size.as_str(),
                e.used.as_str(),
                e.available.as_str(),
                e.use_percent.as_str(),
                e.mount_point.as_str(),
            ])
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds views against one host.
pub struct ViewBuilder<'a, R: RemoteRunner> {
    inventory: &'a VirtualBox<R>,
}

impl<'a, R: RemoteRunner> ViewBuilder<'a, R> {
    pub fn new(inventory: &'a VirtualBox<R>) -> Self {
        Self { inventory }
    }

    fn host(&self) -> &str {
        self.inventory.host()
    }

    fn or_alert(result: Result<View>) -> View {
        result.unwrap_or_else(|e| {
            tracing::error!("{}", e);
            View::alert(e.to_string())
        })
    }

    pub fn running_vms(&self) -> View {
        Self::or_alert(self.inventory.list_running_vms().map(|vms| {
            let empty = format!("No running vm's in {}", self.host());
            View::Report(Report::new(
                "Running vms",
                vm_table("Running VMs", &vms, empty),
            ))
        }))
    }

    pub fn configured_vms(&self) -> View {
        Self::or_alert(self.inventory.list_vms().map(|vms| {
            let empty = format!("No configured vm's in {}", self.host());
            View::Report(Report::new(
                "Configured vms",
                vm_table("Configured VMs", &vms, empty),
            ))
        }))
    }

    fn vm_picker(&self, caption: &str, action: impl Fn(String) -> MenuAction) -> View {
        Self::or_alert(self.inventory.list_vms().map(|vms| {
            let items = vms
                .into_iter()
                .map(|vm| {
                    let action = action(vm.name.clone());
                    MenuItem::new(vm.name, action)
                })
                .collect();
            View::Menu(Menu::new(caption, items))
        }))
    }

    pub fn vm_info_picker(&self) -> View {
        self.vm_picker("VM information", MenuAction::VmInfo)
    }

    pub fn snapshot_picker(&self, action: SnapshotAction) -> View {
        self.vm_picker(action.caption(), |vm| MenuAction::Snapshot(action, vm))
    }

    pub fn vm_info(&self, vm: &str) -> View {
        Self::or_alert(
            self.inventory
                .show_vm_info(vm)
                .map(|text| View::Report(Report::new(vm, text))),
        )
    }

    pub fn host_info(&self) -> View {
        Self::or_alert(
            self.inventory
                .host_info()
                .map(|text| View::Report(Report::new("Host information", text))),
        )
    }

    pub fn disk_usage(&self) -> View {
        Self::or_alert(self.inventory.disk_usage().map(|entries| {
            View::Report(Report::new(
                format!("Disk usage on {}", self.host()),
                disk_usage_table(&entries),
            ))
        }))
    }

    /// Configured VMs that are not running go to "Start", running ones to
    /// "Stop".
    pub fn start_stop_form(&self) -> View {
        let lists = self
            .inventory
            .list_running_vms()
            .and_then(|running| Ok((running, self.inventory.list_vms()?)));

        Self::or_alert(lists.map(|(running, configured)| {
            let startable = configured
                .into_iter()
                .filter(|vm| !running.iter().any(|r| r.name == vm.name))
                .map(|vm| vm.name)
                .collect();
            let running = running.into_iter().map(|vm| vm.name).collect();
            View::StartStop(StartStopForm::new(startable, running))
        }))
    }

    /// Issues one remote call per request, one after the other, and folds
    /// every answer into a single confirmation text.
    pub fn execute_power(&self, requests: &[PowerRequest], headless: bool, force: bool) -> View {
        let mut text = format!("force={force}\nheadless={headless}\n");
        for request in requests {
            let (verb, vm, result) = match request {
                PowerRequest::Start { vm, headless } => {
                    ("start", vm, self.inventory.start_vm(vm, *headless))
                }
                PowerRequest::Stop { vm, force } => ("stop", vm, self.inventory.stop_vm(vm, *force)),
            };
            let output = result.unwrap_or_else(|e| e.to_string());
            text.push_str(&format!("{verb} {vm}: {}\n", output.trim_end()));
        }
        View::alert(text)
    }

    pub fn snapshot(&self, action: SnapshotAction, vm: &str) -> View {
        match action {
            SnapshotAction::List => Self::or_alert(self.inventory.list_snapshots(vm).map(|snaps| {
                let body = if snaps.is_empty() {
                    format!("No snapshots for {vm}")
                } else {
                    snaps.iter().map(snapshot_line).collect::<Vec<_>>().join("\n")
                };
                View::Report(Report::new("Snapshots:", body))
            })),
            SnapshotAction::Take => Self::or_alert(self.inventory.take_snapshot(vm).map(View::alert)),
            SnapshotAction::Delete => Self::or_alert(
                self.inventory
                    .list_snapshots(vm)
                    .map(|snaps| View::SnapshotDelete(SnapshotDeleteForm::new(vm, snaps))),
            ),
        }
    }

    pub fn delete_snapshots(&self, vm: &str, snapshots: &[String]) -> View {
        let results: Vec<String> = snapshots
            .iter()
            .map(|snapshot| {
                self.inventory
                    .delete_snapshot(vm, snapshot)
                    .unwrap_or_else(|e| e.to_string())
                    .trim_end()
                    .to_string()
            })
            .collect();
        View::alert(results.join("\n"))
    }
}
