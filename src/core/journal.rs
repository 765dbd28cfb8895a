/// Audit sink for core events (captures, deliveries, failures).
///
/// Writing to the journal must never fail the operation being logged, so
/// implementations swallow their own errors.
pub trait Journal {
    fn record(&self, operation: &str, target: &str, message: &str);
}

/// Discards everything.
pub struct NullJournal;

impl Journal for NullJournal {
    fn record(&self, _operation: &str, _target: &str, _message: &str) {}
}
