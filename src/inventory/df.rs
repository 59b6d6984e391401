use crate::error::Result;
use crate::models::DiskUsageEntry;
use crate::ssh_service::{RemoteCommand, RemoteRunner};

pub const DISK_USAGE_LABELS: [&str; 6] = ["Filesystem", "Size", "Used", "Avail", "Use%", "Mounted on"];

/// Column boundaries of `df -h` output, in characters. The last column runs
/// to the end of the line.
///
/// These assume the remote `df` lays its columns out exactly here. Long
/// device names, another locale or a different `df` shift the columns and
/// the fields come out garbled; nothing detects that.
const COLUMN_STARTS: [usize; 6] = [0, 15, 20, 26, 32, 37];

const IGNORED_PREFIXES: [&str; 2] = ["/dev/loop", "tmpfs"];

pub fn disk_usage<R: RemoteRunner>(runner: &R, host: &str) -> Result<Vec<DiskUsageEntry>> {
    let result = runner.run(host, &RemoteCommand::new("df").arg("-h"))?;
    let entries = parse_disk_usage(&result.stdout);
    tracing::debug!("{} filesystems reported by {}", entries.len(), host);
    Ok(entries)
}

pub fn parse_disk_usage(output: &str) -> Vec<DiskUsageEntry> {
    output
        .lines()
        .filter(|line| !IGNORED_PREFIXES.iter().any(|p| line.starts_with(p)))
        .map(str::trim)
        .filter(|line| line.starts_with('/'))
        .map(slice_line)
        .collect()
}

fn slice_line(line: &str) -> DiskUsageEntry {
    let chars: Vec<char> = line.chars().collect();
    let field = |column: usize| -> String {
        let start = COLUMN_STARTS[column].min(chars.len());
        let end = COLUMN_STARTS
            .get(column + 1)
            .copied()
            .unwrap_or(chars.len())
            .clamp(start, chars.len());
        chars[start..end].iter().collect::<String>().trim().to_string()
    };

    DiskUsageEntry {
        filesystem: field(0),
        size: field(1),
        used: field(2),
        available: field(3),
        use_percent: field(4),
        mount_point: field(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh_service::testing::ScriptedRunner;

    const ROOT: &str = "/dev/sda1       98G   41G   52G  44% /";
    const BOOT: &str = "/dev/nvme0n1p1 511M  6,1M  505M   2% /boot/efi";

    #[test]
    fn columns_are_cut_at_fixed_offsets() {
        let entries = parse_disk_usage(ROOT);
        assert_eq!(
            entries,
            vec![DiskUsageEntry {
                filesystem: "/dev/sda1".into(),
                size: "98G".into(),
                used: "41G".into(),
                available: "52G".into(),
                use_percent: "44%".into(),
                mount_point: "/".into(),
            }]
        );
    }

    #[test]
    fn boundaries_are_exact() {
        // One marker character right before and right at every boundary.
        let line = "/AAAAAAAAAAAAAaBBBBbCCCCCcDDDDDdEEEEeFFF";
        let entry = slice_line(line);
        assert_eq!(entry.filesystem, "/AAAAAAAAAAAAAa");
        assert_eq!(entry.size, "BBBBb");
        assert_eq!(entry.used, "CCCCCc");
        assert_eq!(entry.available, "DDDDDd");
        assert_eq!(entry.use_percent, "EEEEe");
        assert_eq!(entry.mount_point, "FFF");
    }

    #[test]
    fn second_layout_line() {
        let entry = slice_line(BOOT);
        assert_eq!(entry.filesystem, "/dev/nvme0n1p1");
        assert_eq!(entry.size, "511M");
        assert_eq!(entry.used, "6,1M");
        assert_eq!(entry.available, "505M");
        assert_eq!(entry.use_percent, "2%");
        assert_eq!(entry.mount_point, "/boot/efi");
    }

    #[test]
    fn loop_tmpfs_header_and_blank_lines_are_dropped() {
        let output = format!(
            "Filesystem      Size  Used Avail Use% Mounted on\n\
             udev            7,8G     0  7,8G   0% /dev\n\
             tmpfs           1,6G  2,4M  1,6G   1% /run\n\
             {ROOT}\n\
             /dev/loop0       56M   56M     0 100% /snap/core18/2829\n\
             \n\
             {BOOT}\n"
        );
        let entries = parse_disk_usage(&output);
        let mounts: Vec<_> = entries.iter().map(|e| e.mount_point.as_str()).collect();
        assert_eq!(mounts, vec!["/", "/boot/efi"]);
    }

    #[test]
    fn short_lines_do_not_panic() {
        let entry = slice_line("/dev/x");
        assert_eq!(entry.filesystem, "/dev/x");
        assert_eq!(entry.size, "");
        assert_eq!(entry.mount_point, "");
    }

    #[test]
    fn disk_usage_runs_df_remotely() {
        let runner = ScriptedRunner::new().with("df -h", &format!("{ROOT}\n"));
        let entries = disk_usage(&runner, "foice").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(runner.calls(), vec![("foice".to_string(), "df -h".to_string())]);
    }
}
