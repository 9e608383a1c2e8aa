use std::{fmt::Display, future::Future, time::Duration};

use tokio::{
    select,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::{
    config::PUBLISH_INTERVAL,
    payload::{Payload, PayloadError},
    signal,
};

/// A transport that can push one payload to Harper.
#[allow(async_fn_in_trait)]
pub trait Publisher {
    type Error: Display;

    /// Sends `payload` and returns the text that went on the wire.
    async fn publish(&mut self, payload: &Payload) -> Result<String, Self::Error>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub attempts: u64,
    pub failures: u64,
}

/// Publishes a fresh payload immediately and then once per interval.
pub struct PublishLoop<F> {
    interval: Duration,
    next_payload: F,
}

impl PublishLoop<fn() -> Result<Payload, PayloadError>> {
    /// Generated warehouse readings every five seconds.
    pub fn generated() -> Self {
        Self::new(PUBLISH_INTERVAL, Payload::generate)
    }
}

impl<F> PublishLoop<F>
where
    F: FnMut() -> Result<Payload, PayloadError>,
{
    pub fn new(interval: Duration, next_payload: F) -> Self {
        Self {
            interval,
            next_payload,
        }
    }

    /// Runs until `shutdown` resolves. A failed publish is reported and the
    /// loop carries on with the next tick.
    pub async fn run_until<P, S>(&mut self, publisher: &mut P, shutdown: S) -> PublishReport
    where
        P: Publisher,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut report = PublishReport::default();

        loop {
            select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    report.attempts += 1;
                    if !self.publish_next(publisher).await {
                        report.failures += 1;
                    }
                }
            }
        }

        debug!(attempts = report.attempts, failures = report.failures, "publish loop stopped");
        report
    }

    pub async fn run_until_ctrl_c<P: Publisher>(&mut self, publisher: &mut P) -> PublishReport {
        self.run_until(publisher, signal::ctrl_c()).await
    }

    async fn publish_next<P: Publisher>(&mut self, publisher: &mut P) -> bool {
        let payload = match (self.next_payload)() {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "could not build payload");
                println!("Publish failed: {err}");
                return false;
            }
        };

        match publisher.publish(&payload).await {
            Ok(sent) => {
                println!("Published: {sent}");
                true
            }
            Err(err) => {
                warn!(error = %err, "publish failed");
                println!("Publish failed: {err}");
                false
            }
        }
    }
}
