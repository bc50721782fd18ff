use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

/// Time source for the poll schedule.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that only moves when told to. Lets callers run any number of poll
/// ticks without waiting in real time.
pub struct ManualClock {
    now: watch::Sender<Duration>,
    sleeps: watch::Sender<u64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        let (now, _) = watch::channel(Duration::ZERO);
        let (sleeps, _) = watch::channel(0);
        Self { now, sleeps }
    }

    pub fn elapsed(&self) -> Duration {
        *self.now.borrow()
    }

    pub fn advance(&self, by: Duration) {
        self.now.send_modify(|now| *now += by);
    }

    /// Number of [`Clock::sleep`] calls made so far.
    pub fn sleeps(&self) -> u64 {
        *self.sleeps.borrow()
    }

    /// Resolves once `count` sleeps have been started in total.
    pub async fn until_sleeps(&self, count: u64) {
        let mut sleeps = self.sleeps.subscribe();
        let _ = sleeps.wait_for(|started| *started >= count).await;
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        let mut now = self.now.subscribe();
        let deadline = *now.borrow() + duration;
        self.sleeps.send_modify(|started| *started += 1);
        let _ = now.wait_for(|now| *now >= deadline).await;
    }
}
