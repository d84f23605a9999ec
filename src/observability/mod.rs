//! Observability: structured logging, lifecycle events and counters
//!
//! ```ignore
//! use restkit::observability::{Logger, Event, log_event_with_fields};
//!
//! Logger::info("ROUTES_MOUNTED", &[("count", "6")]);
//! log_event_with_fields(Event::RecordCreated, &[("resource", "blogs"), ("id", "3")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_fault() {
        Severity::Error
    } else {
        match event {
            Event::ValidationRejected | Event::RequestTimeout => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity_mapping() {
        assert_eq!(severity_for(Event::RecordCreated), Severity::Info);
        assert_eq!(severity_for(Event::ValidationRejected), Severity::Warn);
        assert_eq!(severity_for(Event::InternalFault), Severity::Error);
        assert_eq!(severity_for(Event::ServerFailed), Severity::Fatal);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event(Event::ServerStop);
        log_event_with_fields(Event::ConfigLoaded, &[("path", "/tmp/restkit.json")]);
    }
}
