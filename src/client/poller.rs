use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use super::api::{ClientError, DomainSnapshot, MetricsSource};
use crate::domain::Domain;

/// How the domains are fetched on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FetchMode {
    /// Every domain on its own timer; one failing domain leaves the others alone.
    #[default]
    Parallel,
    /// One timer fetching every domain; any failure discards the whole cycle.
    AllOrNothing,
}

impl FetchMode {
    pub fn label(self) -> &'static str {
        match self {
            FetchMode::Parallel => "parallel",
            FetchMode::AllOrNothing => "all-or-nothing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainIntervals {
    pub process: Duration,
    pub cpu: Duration,
    pub memory: Duration,
    pub disk: Duration,
    pub gpu: Duration,
    /// Tick of the single timer in all-or-nothing mode.
    pub batch: Duration,
}

impl Default for DomainIntervals {
    fn default() -> Self {
        Self {
            process: Duration::from_secs(2),
            cpu: Duration::from_secs(1),
            memory: Duration::from_secs(1),
            disk: Duration::from_secs(2),
            gpu: Duration::from_secs(2),
            batch: Duration::from_secs(2),
        }
    }
}

impl DomainIntervals {
    pub fn get(&self, domain: Domain) -> Duration {
        match domain {
            Domain::Process => self.process,
            Domain::Cpu => self.cpu,
            Domain::Memory => self.memory,
            Domain::Disk => self.disk,
            Domain::Gpu => self.gpu,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSchedule {
    pub mode: FetchMode,
    pub intervals: DomainIntervals,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub domain: Domain,
    pub error: ClientError,
}

#[derive(Debug)]
pub enum PollPayload {
    Single {
        domain: Domain,
        result: Result<DomainSnapshot, ClientError>,
    },
    Batch(Result<Vec<DomainSnapshot>, BatchFailure>),
}

/// A finished fetch, tagged with the generation that issued it.
#[derive(Debug)]
pub struct PollUpdate {
    pub generation: u64,
    pub payload: PollPayload,
}

/// Runs the fetch timers and hands finished fetches to the dashboard.
///
/// Every tick spawns its fetch without waiting for the previous one, so results
/// for a domain may arrive out of order. [`Poller::stop`] aborts the timers and
/// bumps the generation; fetches already in flight still complete but
/// [`Poller::next`] drops them.
pub struct Poller {
    source: Arc<dyn MetricsSource>,
    schedule: PollSchedule,
    generation: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<PollUpdate>,
    rx: mpsc::UnboundedReceiver<PollUpdate>,
    timers: Vec<JoinHandle<()>>,
}

impl Poller {
    /// Starts polling. Must be called inside a tokio runtime.
    pub fn start(source: Arc<dyn MetricsSource>, schedule: PollSchedule) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut poller = Self {
            source,
            schedule,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
            timers: Vec::new(),
        };
        poller.arm();
        poller
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn schedule(&self) -> PollSchedule {
        self.schedule
    }

    pub fn is_running(&self) -> bool {
        !self.timers.is_empty()
    }

    fn arm(&mut self) {
        match self.schedule.mode {
            FetchMode::Parallel => {
                for domain in Domain::ALL {
                    let period = self.schedule.intervals.get(domain);
                    let timer = self.timer(period, move |fetcher| fetcher.single(domain));
                    self.timers.push(timer);
                }
            }
            FetchMode::AllOrNothing => {
                let period = self.schedule.intervals.batch;
                let timer = self.timer(period, |fetcher| fetcher.batch());
                self.timers.push(timer);
            }
        }
        debug!(
            mode = ?self.schedule.mode,
            generation = self.generation(),
            "poll timers armed"
        );
    }

    fn timer(&self, period: Duration, fire: impl Fn(Fetcher) + Send + 'static) -> JoinHandle<()> {
        let fetcher = self.fetcher();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                fire(fetcher.clone());
            }
        })
    }

    fn fetcher(&self) -> Fetcher {
        Fetcher {
            source: Arc::clone(&self.source),
            generation: Arc::clone(&self.generation),
            tx: self.tx.clone(),
        }
    }

    /// Fetches everything once, outside the timers.
    pub fn refresh_now(&self) {
        let fetcher = self.fetcher();
        match self.schedule.mode {
            FetchMode::Parallel => {
                for domain in Domain::ALL {
                    fetcher.clone().single(domain);
                }
            }
            FetchMode::AllOrNothing => fetcher.batch(),
        }
    }

    /// Stops the timers. Results of fetches still in flight are discarded.
    pub fn stop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        for timer in self.timers.drain(..) {
            timer.abort();
        }
    }

    /// Stops and re-arms with a new schedule.
    pub fn restart(&mut self, schedule: PollSchedule) {
        self.stop();
        self.schedule = schedule;
        self.arm();
    }

    /// Next result of the current generation.
    pub async fn next(&mut self) -> Option<PollUpdate> {
        loop {
            let update = self.rx.recv().await?;
            if update.generation == self.generation() {
                return Some(update);
            }
            trace!(stale = update.generation, "discarding result of stopped poller");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Clone)]
struct Fetcher {
    source: Arc<dyn MetricsSource>,
    generation: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<PollUpdate>,
}

impl Fetcher {
    fn single(self, domain: Domain) {
        let generation = self.generation.load(Ordering::SeqCst);
        tokio::spawn(async move {
            let result = self.source.fetch(domain).await;
            let payload = PollPayload::Single { domain, result };
            // receiver gone means the dashboard has exited
            let _ = self.tx.send(PollUpdate {
                generation,
                payload,
            });
        });
    }

    fn batch(self) {
        let generation = self.generation.load(Ordering::SeqCst);
        tokio::spawn(async move {
            let source = &self.source;
            let result = try_join_all(Domain::ALL.map(|domain| async move {
                source
                    .fetch(domain)
                    .await
                    .map_err(|error| BatchFailure { domain, error })
            }))
            .await;
            let _ = self.tx.send(PollUpdate {
                generation,
                payload: PollPayload::Batch(result),
            });
        });
    }
}
