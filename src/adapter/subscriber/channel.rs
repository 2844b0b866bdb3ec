use anyhow::Context;
use tokio::sync::mpsc;

use crate::domain::Event;
use crate::port::Subscriber;

/// Queues events on an unbounded tokio channel for an async host.
///
/// Sending never blocks the library thread that produced the event. Once
/// the receiver is dropped every event fails to send and the bridge logs it.
pub struct ChannelSubscriber {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelSubscriber {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Subscriber for ChannelSubscriber {
    fn on_event(&self, event: Event) -> anyhow::Result<()> {
        self.tx.send(event).ok().context("event receiver dropped")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (subscriber, mut rx) = ChannelSubscriber::new();
        subscriber.on_event(Event::PersistGraph(vec![1])).unwrap();
        subscriber.on_event(Event::PersistManager(vec![2])).unwrap();

        assert_eq!(rx.recv().await.map(|e| e.name()), Some("persist_graph"));
        assert_eq!(rx.recv().await.map(|e| e.name()), Some("persist_manager"));
    }

    #[test]
    fn test_closed_receiver_is_an_error() {
        let (subscriber, rx) = ChannelSubscriber::new();
        drop(rx);
        assert!(subscriber.on_event(Event::PersistGraph(vec![])).is_err());
    }
}
