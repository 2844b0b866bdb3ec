//! Host-side consumer of bridge events.

use crate::domain::Event;

/// The single consumer of events leaving the node.
///
/// Called synchronously on whichever thread produced the event, possibly a
/// library thread. Errors are logged and dropped by the bridge; they never
/// reach the producer. Implementations must not call node `init_*`
/// operations from inside `on_event`.
pub trait Subscriber: Send + Sync {
    fn on_event(&self, event: Event) -> anyhow::Result<()>;
}
