//! Browser timer as a future, used as the search debounce delay.

use std::future::Future;
use std::time::Duration;

use futures::channel::oneshot;
use leptos::prelude::set_timeout;

/// Resolves once `duration` has elapsed on the browser clock.
///
/// Dropping the future does not cancel the timer; the callback fires into a
/// closed channel and is ignored.
pub fn sleep(duration: Duration) -> impl Future<Output = ()> {
	let (tx, rx) = oneshot::channel();
	set_timeout(
		move || {
			let _ = tx.send(());
		},
		duration,
	);
	async move {
		let _ = rx.await;
	}
}
