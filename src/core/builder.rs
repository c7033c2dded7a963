use std::sync::Arc;

use tokio::sync::{Mutex, broadcast::error::RecvError};
use tokio_util::sync::CancellationToken;

use super::connector::{Inner, ServiceConnector};
use super::state::Shared;
use crate::{
    config::ConnectorConfig,
    events::Bus,
    pipeline::LocalPipeline,
    remote::ServiceDirectory,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`ServiceConnector`] with optional subscribers.
pub struct ConnectorBuilder {
    cfg: ConnectorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ConnectorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: ConnectorConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive connector events (binding, retries, hotplug, ...)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the connector around the injected collaborators.
    ///
    /// With subscribers configured this spawns the listener and subscriber
    /// workers, so it must then be called inside a tokio runtime.
    pub fn build(
        self,
        directory: Arc<dyn ServiceDirectory>,
        pipeline: LocalPipeline,
    ) -> ServiceConnector {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            spawn_listener(&bus, set, listener.clone());
        }

        ServiceConnector::from_inner(Arc::new(Inner {
            cfg: self.cfg,
            directory,
            pipeline,
            bus,
            listener,
            state: Mutex::new(Shared::default()),
        }))
    }
}

/// Forwards bus events to the subscriber set until the connector is dropped.
fn spawn_listener(bus: &Bus, set: SubscriberSet, stop: CancellationToken) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        }
        set.shutdown().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventKind};
    use crate::testing::Harness;
    use async_trait::async_trait;
    use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

    struct Probe(UnboundedSender<EventKind>);

    #[async_trait]
    impl Subscribe for Probe {
        async fn on_event(&self, event: &Event) {
            let _ = self.0.send(event.kind);
        }

        fn name(&self) -> &'static str {
            "probe"
        }
    }

    #[tokio::test]
    async fn subscribers_see_connector_events() {
        let (tx, mut rx) = unbounded_channel();
        let h = Harness::running_with_subscribers(vec![Arc::new(Probe(tx))]);

        assert!(h.connector.initialize().await);

        assert_eq!(rx.recv().await, Some(EventKind::BindSucceeded));
    }

    #[tokio::test]
    async fn listener_stops_with_connector() {
        let (tx, mut rx) = unbounded_channel();
        let h = Harness::running_with_subscribers(vec![Arc::new(Probe(tx))]);
        drop(h);

        // Worker exits once its queue closes, dropping the sender.
        assert_eq!(rx.recv().await, None);
    }
}
