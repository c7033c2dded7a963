//! # RetryWorker: binds the connector once the service shows up.
//!
//! Spawned by `initialize` when the service is not reachable (or the first
//! bind failed). Holds only a `Weak` reference to the connector.
//!
//! ```text
//! loop {
//!   ├─► connector.try_bind_once(token)      (takes the connector lock)
//!   │       ├─ Bound          ─► exit
//!   │       ├─ BindFailed     ─► exit (reachable service, not retried)
//!   │       ├─ Exhausted      ─► exit
//!   │       ├─ Cancelled      ─► exit
//!   │       └─ Pending(n)     ─► publish RetryScheduled
//!   └─► select! {
//!         sleep(poll.delay()) ─► next probe
//!         token.cancelled()   ─► publish RetryCancelled, exit
//!       }
//! }
//! ```
//!
//! ## Rules
//! - The wait never holds the connector lock.
//! - Cancellation wakes the wait immediately, so the worker exits within one
//!   poll interval of `deinitialize`.
//! - Cancellation is re-checked under the lock before every probe; a worker
//!   that lost the race with `deinitialize` never binds.

use std::sync::Weak;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::core::connector::{Inner, ServiceConnector};
use crate::events::{Bus, Event, EventKind};
use crate::policies::PollPolicy;

/// Outcome of one retry step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RetryStep {
    /// Service bound; stop.
    Bound,
    /// Service reachable but bind failed; stop.
    BindFailed,
    /// Service still absent after `attempt` probes; keep going.
    Pending { attempt: u32 },
    /// Attempt budget spent; stop.
    Exhausted { attempts: u32 },
    /// Worker cancelled; stop.
    Cancelled,
}

/// Why the worker exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The connector is bound.
    Bound,
    /// The service was reachable but could not be bound.
    BindFailed,
    /// The service never showed up within the attempt budget.
    Exhausted,
    /// `deinitialize` stopped the worker.
    Cancelled,
    /// The connector was dropped.
    Orphaned,
}

pub(crate) struct RetryWorker {
    connector: Weak<Inner>,
    token: CancellationToken,
    poll: PollPolicy,
    bus: Bus,
}

impl RetryWorker {
    pub fn new(connector: Weak<Inner>, token: CancellationToken, poll: PollPolicy, bus: Bus) -> Self {
        Self {
            connector,
            token,
            poll,
            bus,
        }
    }

    pub async fn run(self) -> WorkerExit {
        loop {
            let Some(inner) = self.connector.upgrade() else {
                return WorkerExit::Orphaned;
            };
            let step = ServiceConnector::from_inner(inner)
                .try_bind_once(&self.token)
                .await;

            let attempt = match step {
                RetryStep::Bound => return WorkerExit::Bound,
                RetryStep::BindFailed => return WorkerExit::BindFailed,
                RetryStep::Exhausted { .. } => return WorkerExit::Exhausted,
                RetryStep::Cancelled => return WorkerExit::Cancelled,
                RetryStep::Pending { attempt } => attempt,
            };

            let delay = self.poll.delay();
            self.bus.publish(
                Event::new(EventKind::RetryScheduled)
                    .with_attempt(attempt)
                    .with_delay(delay),
            );

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = self.token.cancelled() => {
                    self.bus.publish(Event::new(EventKind::RetryCancelled).with_attempt(attempt));
                    return WorkerExit::Cancelled;
                }
            }
        }
    }
}
