use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("xiaomian.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("xiaomian.client.request_errors");

pub(crate) static BOOTSTRAP_FALLBACKS: Counter = Counter::new("xiaomian.chat.bootstrap_fallbacks");
pub(crate) static SEND_FAILURES: Counter = Counter::new("xiaomian.chat.send_failures");
pub(crate) static REPLY_SUBSTITUTIONS: Counter = Counter::new("xiaomian.chat.reply_substitutions");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);

    collector.register_counter(&BOOTSTRAP_FALLBACKS);
    collector.register_counter(&SEND_FAILURES);
    collector.register_counter(&REPLY_SUBSTITUTIONS);
}
