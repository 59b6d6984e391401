use crate::error::{Error, Result};
use crate::models::CommandResult;
use std::process::{Command, Stdio};

/// A remote command as an argument vector. It only becomes text when it is
/// handed to ssh, and then every word is quoted for the remote shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl RemoteCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The line the remote login shell will evaluate.
    pub fn to_remote_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|word| shell_quote(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// POSIX single-quote quoting. Words made only of unambiguous characters are
/// left bare so logged command lines stay readable.
pub fn shell_quote(word: &str) -> String {
    let is_plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c));
    if is_plain {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Rejects names that would be read as options or that smuggle control
/// characters into a terminal or a command line.
pub fn validate_identifier(kind: &'static str, value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        Some("must not be empty")
    } else if value.starts_with('-') {
        Some("must not start with '-'")
    } else if value.chars().any(char::is_control) {
        Some("must not contain control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidIdentifier {
            kind,
            value: value.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

pub fn validate_host_alias(host: &str) -> Result<()> {
    validate_identifier("host alias", host)?;
    if host.chars().any(char::is_whitespace) {
        return Err(Error::InvalidIdentifier {
            kind: "host alias",
            value: host.to_string(),
            reason: "must not contain whitespace",
        });
    }
    Ok(())
}

pub trait RemoteRunner {
    /// Runs `command` on `host` and waits for it. A non-zero remote exit
    /// status is returned inside the result, never as an error.
    fn run(&self, host: &str, command: &RemoteCommand) -> Result<CommandResult>;
}

/// Runs commands through the local `ssh` client. Authentication is whatever
/// the user's ssh configuration already provides for the alias.
#[derive(Debug, Clone)]
pub struct SshRunner {
    program: String,
    options: Vec<String>,
}

impl Default for SshRunner {
    fn default() -> Self {
        Self::new("ssh", Vec::new())
    }
}

impl SshRunner {
    pub fn new(program: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            program: program.into(),
            options,
        }
    }

    fn build(&self, host: &str, command: &RemoteCommand) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.options)
            .arg(host)
            .arg(command.to_remote_line())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl RemoteRunner for SshRunner {
    fn run(&self, host: &str, command: &RemoteCommand) -> Result<CommandResult> {
        validate_host_alias(host)?;

        let line = command.to_remote_line();
        tracing::debug!("cmd: {} {} '{}'", self.program, host, line);

        // No timeout: a hung remote shell blocks here until ssh exits.
        let output = self
            .build(host, command)
            .output()
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                host: host.to_string(),
                source,
            })?;

        let result = CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };

        if result.success() {
            tracing::info!("{} on {} finished", line, host);
        } else {
            tracing::warn!(
                "{} on {} exited with {}: {}",
                line,
                host,
                result.exit_code,
                result.stderr.trim()
            );
        }

        Ok(result)
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Answers remote command lines from a fixed script and records every call.
    #[derive(Debug, Default)]
    pub struct ScriptedRunner {
        responses: HashMap<String, CommandResult>,
        calls: RefCell<Vec<(String, String)>>,
        spawn_failure: bool,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, line: &str, stdout: &str) -> Self {
            self.with_result(
                line,
                CommandResult {
                    stdout: stdout.to_string(),
                    ..Default::default()
                },
            )
        }

        pub fn with_result(mut self, line: &str, result: CommandResult) -> Self {
            self.responses.insert(line.to_string(), result);
            self
        }

        pub fn failing_to_spawn() -> Self {
            Self {
                spawn_failure: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<(String, String)> {
            self.calls.borrow().clone()
        }

        pub fn lines(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(_, line)| line.clone()).collect()
        }
    }

    impl RemoteRunner for ScriptedRunner {
        fn run(&self, host: &str, command: &RemoteCommand) -> Result<CommandResult> {
            validate_host_alias(host)?;
            let line = command.to_remote_line();
            self.calls.borrow_mut().push((host.to_string(), line.clone()));

            if self.spawn_failure {
                return Err(Error::Spawn {
                    program: "ssh".into(),
                    host: host.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
                });
            }

            Ok(self.responses.get(&line).cloned().unwrap_or_else(|| CommandResult {
                stderr: format!("unexpected command: {line}"),
                exit_code: 127,
                ..Default::default()
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_stay_bare() {
        let cmd = RemoteCommand::new("vboxmanage").args(["list", "runningvms"]);
        assert_eq!(cmd.to_remote_line(), "vboxmanage list runningvms");
    }

    #[test]
    fn hostile_names_are_single_quoted() {
        let cmd = RemoteCommand::new("vboxmanage")
            .arg("showvminfo")
            .arg("web; rm -rf ~");
        assert_eq!(cmd.to_remote_line(), "vboxmanage showvminfo 'web; rm -rf ~'");

        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote("$(reboot)"), "'$(reboot)'");
        assert_eq!(shell_quote("`date`"), "'`date`'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn identifiers_are_validated() {
        assert!(validate_identifier("VM name", "web 1").is_ok());
        assert!(validate_identifier("VM name", "").is_err());
        assert!(validate_identifier("VM name", "--help").is_err());
        assert!(validate_identifier("VM name", "web\n1").is_err());

        assert!(validate_host_alias("foice").is_ok());
        assert!(validate_host_alias("foice other").is_err());
        assert!(validate_host_alias("-oProxyCommand=x").is_err());
    }

    #[test]
    fn ssh_invocation_passes_alias_and_quoted_line() {
        let runner = SshRunner::new("ssh", vec!["-o".into(), "BatchMode=yes".into()]);
        let cmd = RemoteCommand::new("vboxmanage")
            .args(["snapshot", "my vm", "list"]);
        let built = runner.build("foice", &cmd);

        assert_eq!(built.get_program(), "ssh");
        let args: Vec<_> = built
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["-o", "BatchMode=yes", "foice", "vboxmanage snapshot 'my vm' list"]
        );
    }

    #[test]
    fn runner_rejects_bad_alias_before_spawning() {
        let runner = SshRunner::new("/nonexistent/ssh", Vec::new());
        let err = runner
            .run("-oProxyCommand=evil", &RemoteCommand::new("true"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn missing_ssh_binary_is_a_spawn_error() {
        let runner = SshRunner::new("/nonexistent/vtui-ssh", Vec::new());
        let err = runner
            .run("foice", &RemoteCommand::new("true"))
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert!(err.to_string().contains("foice"));
    }
}
