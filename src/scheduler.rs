use rand::rngs::StdRng;
use rand::{ Rng, SeedableRng };
use tokio::sync::{ broadcast, watch };
use tokio::task::JoinHandle;
use tokio::time::{ interval_at, sleep, Duration, Instant, MissedTickBehavior };

use crate::config::Config;

const TICK_CHANNEL_CAPACITY: usize = 64;
/// Keeps the insertion timer's stream apart from the market stream for the same seed.
const INSERTION_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A timer firing. Subscribers match on the variant they handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickEvent {
    /// Market random walk.
    Market,
    /// Final Stretch conversion recompute.
    Highlight,
    /// Age labels moved on; re-render only.
    Age,
    /// A simulated New Pairs arrival is due.
    Insertion,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub market_interval: Duration,
    pub highlight_interval: Duration,
    pub age_interval: Duration,
    pub insert_min: Duration,
    pub insert_max: Duration,
    pub seed: Option<u64>,
}

impl From<&Config> for SchedulerConfig {
    fn from(config: &Config) -> Self {
        Self {
            market_interval: config.tick_interval,
            highlight_interval: config.highlight_interval,
            age_interval: config.age_interval,
            insert_min: Duration::from_secs(config.insert_min_secs),
            insert_max: Duration::from_secs(config.insert_max_secs),
            seed: config.rng_seed,
        }
    }
}

/// Owns every simulation timer and fans their ticks out on one channel.
pub struct Scheduler {
    config: SchedulerConfig,
    sender: broadcast::Sender<TickEvent>,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let (sender, _rx) = broadcast::channel(TICK_CHANNEL_CAPACITY);
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        Self {
            config,
            sender,
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TickEvent> {
        self.sender.subscribe()
    }

    pub fn is_running(&self) -> bool {
        !self.handles.is_empty()
    }

    /// Spawn the timer tasks. Calling it again while running is a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            tracing::warn!("Scheduler already running");
            return;
        }

        let fixed = [
            (TickEvent::Market, self.config.market_interval),
            (TickEvent::Highlight, self.config.highlight_interval),
            (TickEvent::Age, self.config.age_interval),
        ];
        for (event, period) in fixed {
            self.handles.push(
                spawn_fixed_rate(event, period, self.sender.clone(), self.shutdown_tx.subscribe())
            );
        }

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ INSERTION_SEED_SALT),
            None => StdRng::from_os_rng(),
        };
        self.handles.push(
            spawn_randomized(
                TickEvent::Insertion,
                self.config.insert_min,
                self.config.insert_max,
                rng,
                self.sender.clone(),
                self.shutdown_tx.subscribe()
            )
        );

        tracing::info!(
            "Scheduler started: market every {:?}, highlight every {:?}, insertion in {:?}..={:?}",
            self.config.market_interval,
            self.config.highlight_interval,
            self.config.insert_min,
            self.config.insert_max
        );
    }

    /// Signal every timer to stop and wait for them.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                tracing::warn!("Timer task ended abnormally: {}", e);
            }
        }
        tracing::info!("Scheduler stopped");
    }
}

fn spawn_fixed_rate(
    event: TickEvent,
    period: Duration,
    sender: broadcast::Sender<TickEvent>,
    mut shutdown: watch::Receiver<bool>
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // No subscribers yet is fine; ticks are not replayed.
                    let _ = sender.send(event);
                }
                _ = shutdown.changed() => break,
            }
        }
    })
}

/// Fires once after a random delay in `[min, max]`, then draws a new delay.
fn spawn_randomized(
    event: TickEvent,
    min: Duration,
    max: Duration,
    mut rng: StdRng,
    sender: broadcast::Sender<TickEvent>,
    mut shutdown: watch::Receiver<bool>
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let min_ms = duration_ms(min);
        let max_ms = duration_ms(max).max(min_ms);

        loop {
            let delay = Duration::from_millis(rng.random_range(min_ms..=max_ms));
            tracing::trace!("Next {:?} in {:?}", event, delay);

            tokio::select! {
                _ = sleep(delay) => {
                    let _ = sender.send(event);
                }
                _ = shutdown.changed() => break,
            }
        }
    })
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
