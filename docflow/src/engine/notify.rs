//! Run completion signals.
//!
//! One engine, many listeners. A preview server or file watcher subscribes
//! once and receives a [`RunCompleted`] after every run.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use super::report::RunOutcome;
use crate::path::NormalizedPath;

/// Sent to every subscriber when a run finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunCompleted {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Folder holding the run's output.
    #[serde(serialize_with = "serialize_path")]
    pub output_folder: NormalizedPath,
}

fn serialize_path<S: serde::Serializer>(
    path: &NormalizedPath,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(path)
}

#[derive(Debug, Default)]
pub(crate) struct Notifier {
    subscribers: Mutex<Vec<Sender<RunCompleted>>>,
}

impl Notifier {
    pub(crate) fn subscribe(&self) -> Receiver<RunCompleted> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Delivers `event` to every live subscriber and forgets the rest.
    pub(crate) fn notify(&self, event: &RunCompleted) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> RunCompleted {
        RunCompleted {
            outcome: RunOutcome::Succeeded,
            output_folder: NormalizedPath::directory("output").unwrap(),
        }
    }

    #[test]
    fn test_every_subscriber_gets_one_signal() {
        let notifier = Notifier::default();
        let a = notifier.subscribe();
        let b = notifier.subscribe();

        assert_eq!(notifier.notify(&event()), 2);
        assert_eq!(a.try_recv().unwrap(), event());
        assert_eq!(b.try_recv().unwrap(), event());
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_subscribers_dropped() {
        let notifier = Notifier::default();
        let kept = notifier.subscribe();
        drop(notifier.subscribe());

        assert_eq!(notifier.notify(&event()), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_serializes_output_folder_as_text() {
        let json = serde_json::to_value(event()).unwrap();
        assert_eq!(json["outcome"], "succeeded");
        assert_eq!(json["output_folder"], "output");
    }
}
