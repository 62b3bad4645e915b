//! Broadcast sink for rendered alert reports.
//!
//! Delivery is fire-and-forget: the monitors do not retry or confirm.
//! The console sink stands in for whatever chat surface hosts the alerts.

/// Destination for rendered alert reports.
pub trait Broadcast: Send + Sync {
    fn broadcast(&self, message: &str);
}

/// Writes reports to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl Broadcast for ConsoleSink {
    fn broadcast(&self, message: &str) {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSink(Mutex<Vec<String>>);

    impl Broadcast for RecordingSink {
        fn broadcast(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_sink_receives_messages_in_order() {
        let sink = RecordingSink(Mutex::new(Vec::new()));
        sink.broadcast("first");
        sink.broadcast("second");
        assert_eq!(*sink.0.lock().unwrap(), vec!["first", "second"]);
    }
}
