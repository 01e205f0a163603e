//! Saved-entry notifications
//!
//! Store adapters embed a `SavedNotifier` and call `notify()` once an entry
//! is durably written. Every subscriber gets its own unbounded channel.

use flume::{Receiver, Sender};
use parking_lot::Mutex;

use crate::prelude::*;

#[derive(Debug, Default)]
pub struct SavedNotifier {
	subscribers: Mutex<Vec<Sender<SettingEntry>>>,
}

impl SavedNotifier {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a new subscriber
	pub fn subscribe(&self) -> Receiver<SettingEntry> {
		let (tx, rx) = flume::unbounded();
		self.subscribers.lock().push(tx);
		rx
	}

	/// Send a saved entry to all live subscribers
	///
	/// Subscribers whose receiver was dropped are removed.
	pub fn notify(&self, entry: &SettingEntry) {
		let mut subscribers = self.subscribers.lock();
		subscribers.retain(|tx| tx.send(entry.clone()).is_ok());
		debug!("Saved '{}', notified {} subscribers", entry.key, subscribers.len());
	}

	pub fn subscriber_count(&self) -> usize {
		self.subscribers.lock().len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_notify_reaches_every_subscriber() {
		let notifier = SavedNotifier::new();
		let rx1 = notifier.subscribe();
		let rx2 = notifier.subscribe();

		notifier.notify(&SettingEntry::stored("app.name", "Acme"));

		assert_eq!(rx1.try_recv().map(|e| e.value).ok().as_deref(), Some("Acme"));
		assert_eq!(rx2.try_recv().map(|e| e.value).ok().as_deref(), Some("Acme"));
	}

	#[test]
	fn test_dropped_subscribers_are_pruned() {
		let notifier = SavedNotifier::new();
		let rx = notifier.subscribe();
		drop(notifier.subscribe());
		assert_eq!(notifier.subscriber_count(), 2);

		notifier.notify(&SettingEntry::stored("a", "1"));
		assert_eq!(notifier.subscriber_count(), 1);
		assert!(rx.try_recv().is_ok());
	}
}

// vim: ts=4
