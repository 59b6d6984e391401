#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualMachine {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub name: String,
    pub uuid: String,
    /// The snapshot VirtualBox would restore to next.
    pub is_active: bool,
}

/// One row of `df -h`, columns kept as the raw trimmed strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskUsageEntry {
    pub filesystem: String,
    pub size: String,
    pub used: String,
    pub available: String,
    pub use_percent: String,
    pub mount_point: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Text shown to the user: stdout, then stderr when there is any.
    pub fn text(&self) -> String {
        let stderr = self.stderr.trim_end();
        if stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.trim_end().is_empty() {
            return stderr.to_string();
        }
        format!("{}\n{}", self.stdout.trim_end(), stderr)
    }
}
