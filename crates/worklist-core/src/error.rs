use std::fmt;

/// Machine-readable error codes for scripts and agents driving `wl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotConfigured,
    ConfigParseError,
    InvalidEnumValue,
    InvalidDate,
    InvalidAssignment,
    EmptyDepartmentName,
    NothingPending,
    SubmitInFlight,
    RemoteUnreachable,
    RemoteRejected,
    RemotePayloadInvalid,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotConfigured => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidEnumValue => "E2001",
            Self::InvalidDate => "E2002",
            Self::InvalidAssignment => "E2003",
            Self::EmptyDepartmentName => "E2004",
            Self::NothingPending => "E3001",
            Self::SubmitInFlight => "E3002",
            Self::RemoteUnreachable => "E4001",
            Self::RemoteRejected => "E4002",
            Self::RemotePayloadInvalid => "E4003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotConfigured => "Server not configured",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidEnumValue => "Invalid urgency/status/column value",
            Self::InvalidDate => "Invalid date",
            Self::InvalidAssignment => "Invalid assignment",
            Self::EmptyDepartmentName => "Department name is empty",
            Self::NothingPending => "No changes to save",
            Self::SubmitInFlight => "A submission is already in progress",
            Self::RemoteUnreachable => "Remote platform unreachable",
            Self::RemoteRejected => "Remote platform rejected the request",
            Self::RemotePayloadInvalid => "Remote payload could not be decoded",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotConfigured => {
                Some("Set [server] url in ~/.config/worklist/config.toml or export WL_URL.")
            }
            Self::ConfigParseError => Some("Fix syntax in ~/.config/worklist/config.toml and retry."),
            Self::InvalidEnumValue => Some("Use one of the documented values (see `wl --help`)."),
            Self::InvalidDate => Some("Dates use the ISO format YYYY-MM-DD."),
            Self::InvalidAssignment => Some("Write assignments as EMPLOYEE=DEPARTMENT."),
            Self::EmptyDepartmentName => Some("Provide a non-empty department name."),
            Self::NothingPending => None,
            Self::SubmitInFlight => Some("Wait for the running submission to finish."),
            Self::RemoteUnreachable => Some("Check the server URL and network, then re-run."),
            Self::RemoteRejected => Some("Check API credentials and permissions, then re-run."),
            Self::RemotePayloadInvalid => {
                Some("The server app may be a different version; report a bug with logs.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
