//! Schema-ready signal
//!
//! Used in test and bootstrap setups where the store schema is created after
//! the settings manager. The host fires the signal once its migrations ran;
//! a deferred load waits for it.

use tokio::sync::watch;

use crate::prelude::*;

/// Sending half, held by whoever runs the migrations
#[derive(Debug)]
pub struct SchemaSignal {
	tx: watch::Sender<bool>,
}

/// Receiving half, attached to the settings manager
#[derive(Debug, Clone)]
pub struct SchemaGate {
	rx: watch::Receiver<bool>,
}

pub fn schema_channel() -> (SchemaSignal, SchemaGate) {
	let (tx, rx) = watch::channel(false);
	(SchemaSignal { tx }, SchemaGate { rx })
}

impl SchemaSignal {
	/// Mark the schema as ready. Firing more than once has no further effect.
	pub fn fire(&self) {
		if !self.tx.send_replace(true) {
			info!("Store schema ready");
		}
	}
}

impl SchemaGate {
	/// A gate that is open from the start
	pub fn ready() -> Self {
		let (tx, rx) = watch::channel(true);
		drop(tx);
		Self { rx }
	}

	pub fn is_ready(&self) -> bool {
		*self.rx.borrow()
	}

	/// Wait until the signal fired
	///
	/// Fails with `Error::SchemaNotReady` if the signal was dropped unfired.
	pub async fn wait(&mut self) -> StResult<()> {
		self.rx.wait_for(|ready| *ready).await.map(|_| ()).map_err(|_| Error::SchemaNotReady)
	}
}


// vim: ts=4
