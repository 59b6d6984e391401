use crate::error::Result;
use crate::inventory::df;
use crate::models::{CommandResult, DiskUsageEntry, Snapshot, VirtualMachine};
use crate::ssh_service::{validate_identifier, RemoteCommand, RemoteRunner};
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

const VBOXMANAGE: &str = "vboxmanage";

/// Parses `vboxmanage list vms|runningvms` output. Lines that are not shaped
/// like `"name" {uuid}` are skipped.
pub fn parse_vm_list(output: &str) -> Vec<VirtualMachine> {
    static VM_LINE: OnceLock<Regex> = OnceLock::new();
    let re = VM_LINE.get_or_init(|| Regex::new(r#""(.*)" \{(.*)\}"#).expect("valid vm list regex"));

    re.captures_iter(output)
        .map(|caps| VirtualMachine {
            name: caps[1].to_string(),
            id: caps[2].to_string(),
        })
        .collect()
}

/// Parses `vboxmanage snapshot <vm> list`. A trailing `*` marks the current
/// snapshot.
pub fn parse_snapshot_list(output: &str) -> Vec<Snapshot> {
    static SNAPSHOT_LINE: OnceLock<Regex> = OnceLock::new();
    let re = SNAPSHOT_LINE.get_or_init(|| {
        Regex::new(r"Name: (.*) \(UUID: (.*)\)(.*)").expect("valid snapshot regex")
    });

    re.captures_iter(output)
        .map(|caps| Snapshot {
            name: caps[1].to_string(),
            uuid: caps[2].to_string(),
            is_active: caps[3].trim() == "*",
        })
        .collect()
}

/// `vboxmanage` on one remote host. Every call is a fresh round-trip; nothing
/// is cached between screens.
#[derive(Debug)]
pub struct VirtualBox<R: RemoteRunner> {
    host: String,
    runner: R,
}

impl<R: RemoteRunner> VirtualBox<R> {
    pub fn new(host: impl Into<String>, runner: R) -> Self {
        Self {
            host: host.into(),
            runner,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn vboxmanage<I, S>(&self, args: I) -> Result<CommandResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let command = RemoteCommand::new(VBOXMANAGE).args(args);
        self.runner.run(&self.host, &command)
    }

    /// Basic information (memory, processors, OS) about the host.
    pub fn host_info(&self) -> Result<String> {
        Ok(self.vboxmanage(["list", "hostinfo"])?.text())
    }

    pub fn list_vms(&self) -> Result<Vec<VirtualMachine>> {
        let result = self.vboxmanage(["list", "vms"])?;
        Ok(parse_vm_list(&result.stdout))
    }

    pub fn list_running_vms(&self) -> Result<Vec<VirtualMachine>> {
        let result = self.vboxmanage(["list", "runningvms"])?;
        Ok(parse_vm_list(&result.stdout))
    }

    pub fn show_vm_info(&self, vm: &str) -> Result<String> {
        validate_identifier("VM name", vm)?;
        Ok(self.vboxmanage(["showvminfo", vm])?.text())
    }

    pub fn start_vm(&self, vm: &str, headless: bool) -> Result<String> {
        validate_identifier("VM name", vm)?;
        let kind = if headless { "headless" } else { "gui" };
        Ok(self.vboxmanage(["startvm", vm, "--type", kind])?.text())
    }

    pub fn stop_vm(&self, vm: &str, force: bool) -> Result<String> {
        validate_identifier("VM name", vm)?;
        let shutdown = if force { "poweroff" } else { "acpipowerbutton" };
        Ok(self.vboxmanage(["controlvm", vm, shutdown])?.text())
    }

    pub fn list_snapshots(&self, vm: &str) -> Result<Vec<Snapshot>> {
        validate_identifier("VM name", vm)?;
        let result = self.vboxmanage(["snapshot", vm, "list"])?;
        Ok(parse_snapshot_list(&result.stdout))
    }

    /// Takes a snapshot named after today's date. Two snapshots on the same
    /// day are not checked for here; vboxmanage reports it, if anything.
    pub fn take_snapshot(&self, vm: &str) -> Result<String> {
        self.take_snapshot_at(vm, Local::now().naive_local())
    }

    pub fn take_snapshot_at(&self, vm: &str, now: NaiveDateTime) -> Result<String> {
        validate_identifier("VM name", vm)?;
        let name = now.format("%Y-%m-%d").to_string();
        let description = format!("snapshot at {}", now.format("%Y-%m-%d %H:%M:%S"));
        Ok(self
            .vboxmanage([
                "snapshot",
                vm,
                "take",
                name.as_str(),
                "--description",
                description.as_str(),
            ])?
            .text())
    }

    pub fn delete_snapshot(&self, vm: &str, snapshot: &str) -> Result<String> {
        validate_identifier("VM name", vm)?;
        validate_identifier("snapshot name", snapshot)?;
        Ok(self.vboxmanage(["snapshot", vm, "delete", snapshot])?.text())
    }

    pub fn disk_usage(&self) -> Result<Vec<DiskUsageEntry>> {
        df::disk_usage(&self.runner, &self.host)
    }
}
