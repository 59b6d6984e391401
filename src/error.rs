use thiserror::Error as ThisError;

/// Failures raised before or around a remote invocation.
///
/// A remote command that runs and exits non-zero is *not* an error: its
/// output is handed back as text like any other result.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Failed to start '{program}' for host {host}: {source}")]
    Spawn {
        program: String,
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
