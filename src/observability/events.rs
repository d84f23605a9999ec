//! Observable lifecycle and request events

use std::fmt;

/// Observable events emitted by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Listener bound, ready to serve
    ServerStart,
    /// Server loop exited
    ServerStop,
    /// Server could not start
    ServerFailed,

    // Requests
    /// A request finished (any status)
    RequestComplete,
    /// A request exceeded the configured timeout
    RequestTimeout,

    // Resource mutations
    /// A record was created
    RecordCreated,
    /// A record was updated
    RecordUpdated,
    /// A record was deleted
    RecordDeleted,
    /// Dependent records removed with their parent
    CascadeDelete,

    // Rejections and faults
    /// A write payload failed validation
    ValidationRejected,
    /// An unexpected internal fault was converted to a 500
    InternalFault,
}

impl Event {
    /// Returns the event name as written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::ServerFailed => "SERVER_FAILED",
            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::RequestTimeout => "REQUEST_TIMEOUT",
            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordDeleted => "RECORD_DELETED",
            Event::CascadeDelete => "CASCADE_DELETE",
            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::InternalFault => "INTERNAL_FAULT",
        }
    }

    /// Whether the event terminates the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ServerFailed)
    }

    /// Whether the event reports a fault rather than normal progress
    pub fn is_fault(&self) -> bool {
        matches!(self, Event::InternalFault | Event::ServerFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
