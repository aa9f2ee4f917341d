//! Notifier port: user-visible success and error reporting.

use std::sync::Arc;

use smartspace_domain::notification::Severity;

/// Sink for messages meant for the user.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

impl<T: Notifier> Notifier for Arc<T> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity);
    }
}
