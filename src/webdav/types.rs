use crate::webdav::request::Verb;

/// Result of one completed operation.
///
/// `status` is the HTTP status code, or `0` when no response was received
/// (connection, DNS or TLS failure, or an aborted request body).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub success: bool,
    pub status: u16,
}

impl RequestOutcome {
    /// Classify a received status for `verb`.
    pub fn classify(verb: Verb, status: u16) -> Self {
        Self {
            success: verb.is_success(status),
            status,
        }
    }

    /// Outcome for an operation that never got a response.
    pub fn no_response() -> Self {
        Self {
            success: false,
            status: 0,
        }
    }

    /// True when the request went out but no response came back.
    pub fn is_transport_failure(&self) -> bool {
        self.status == 0
    }
}

/// Directory listing: the `PROPFIND` outcome plus the decoded entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub outcome: RequestOutcome,
    /// Entries in document order. Empty unless the server answered `207`.
    pub entries: Vec<String>,
}

impl Listing {
    pub fn is_success(&self) -> bool {
        self.outcome.success
    }
}

/// Answer of an existence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    /// The server answered `200`.
    Present,
    /// The server answered with any other status.
    Absent { status: u16 },
    /// No response was obtained, so existence cannot be determined.
    Undetermined,
}

impl Existence {
    pub fn from_outcome(outcome: RequestOutcome) -> Self {
        if outcome.is_transport_failure() {
            Existence::Undetermined
        } else if outcome.success {
            Existence::Present
        } else {
            Existence::Absent {
                status: outcome.status,
            }
        }
    }

    pub fn exists(self) -> bool {
        matches!(self, Existence::Present)
    }

    pub fn outcome(self) -> RequestOutcome {
        match self {
            Existence::Present => RequestOutcome::classify(Verb::Head, 200),
            Existence::Absent { status } => RequestOutcome::classify(Verb::Head, status),
            Existence::Undetermined => RequestOutcome::no_response(),
        }
    }
}
