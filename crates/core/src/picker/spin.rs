//! Spin-the-wheel selection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::metrics::SPINS_TOTAL;
use crate::restaurant::Restaurant;

use super::config::PickerConfig;

/// Runs timed random selections over a list of restaurants.
#[derive(Debug, Clone, Default)]
pub struct Picker {
    config: PickerConfig,
}

impl Picker {
    pub fn new(config: PickerConfig) -> Self {
        Self { config }
    }

    /// Start a spin seeded from the operating system.
    ///
    /// See [`spin_with_rng`](Self::spin_with_rng).
    pub fn spin<T, D>(&self, restaurants: Vec<Restaurant>, on_tick: T, on_done: D) -> SpinHandle
    where
        T: FnMut(&Restaurant) + Send + 'static,
        D: FnOnce(Restaurant) + Send + 'static,
    {
        self.spin_with_rng(restaurants, StdRng::from_os_rng(), on_tick, on_done)
    }

    /// Start a spin using `rng` as the random source.
    ///
    /// Every tick interval a uniformly random restaurant is passed to
    /// `on_tick`. After the configured number of ticks the last pick is
    /// passed to `on_done` and the spin ends. The restaurants are moved into
    /// the spin task and never shared.
    ///
    /// An empty list starts nothing and returns an already finished handle.
    pub fn spin_with_rng<R, T, D>(
        &self,
        mut restaurants: Vec<Restaurant>,
        mut rng: R,
        mut on_tick: T,
        on_done: D,
    ) -> SpinHandle
    where
        R: Rng + Send + 'static,
        T: FnMut(&Restaurant) + Send + 'static,
        D: FnOnce(Restaurant) + Send + 'static,
    {
        if restaurants.is_empty() || self.config.ticks == 0 {
            debug!("Nothing to spin over");
            return SpinHandle::idle();
        }

        let ticks = self.config.ticks;
        let interval = self.config.tick_interval();
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let cancelled = Arc::new(AtomicBool::new(false));
        let task_cancelled = Arc::clone(&cancelled);

        info!(
            "Spinning over {} restaurants ({} ticks every {:?})",
            restaurants.len(),
            ticks,
            interval
        );

        let join = tokio::spawn(async move {
            let mut last = 0;

            for tick in 1..=ticks {
                tokio::select! {
                    biased;
                    _ = &mut cancel_rx => {
                        debug!("Spin cancelled before tick {}", tick);
                        SPINS_TOTAL.with_label_values(&["cancelled"]).inc();
                        return None;
                    }
                    _ = tokio::time::sleep(interval) => {}
                }

                if task_cancelled.load(Ordering::SeqCst) {
                    SPINS_TOTAL.with_label_values(&["cancelled"]).inc();
                    return None;
                }

                last = rng.random_range(0..restaurants.len());
                debug!("Spin tick {}/{}: {}", tick, ticks, restaurants[last].name);
                on_tick(&restaurants[last]);
            }

            if task_cancelled.load(Ordering::SeqCst) {
                SPINS_TOTAL.with_label_values(&["cancelled"]).inc();
                return None;
            }

            let winner = restaurants.swap_remove(last);
            info!("Spin landed on {}", winner.name);
            SPINS_TOTAL.with_label_values(&["winner"]).inc();
            on_done(winner.clone());
            Some(winner)
        });

        SpinHandle {
            cancel_tx: Some(cancel_tx),
            cancelled,
            join: Some(join),
        }
    }
}

/// Handle to a running spin.
///
/// Dropping the handle cancels the spin.
#[derive(Debug)]
pub struct SpinHandle {
    cancel_tx: Option<oneshot::Sender<()>>,
    cancelled: Arc<AtomicBool>,
    join: Option<JoinHandle<Option<Restaurant>>>,
}

impl SpinHandle {
    fn idle() -> Self {
        Self {
            cancel_tx: None,
            cancelled: Arc::new(AtomicBool::new(false)),
            join: None,
        }
    }

    /// Stop the spin. No tick or completion callback runs afterwards,
    /// except one already executing.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Whether the spin has ended (won, cancelled, or never started).
    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|join| join.is_finished())
    }

    /// Wait for the spin to end and return the winner.
    ///
    /// Returns `None` if the spin was cancelled or never started.
    pub async fn finished(mut self) -> Option<Restaurant> {
        let join = self.join.take()?;
        join.await.ok().flatten()
    }
}

impl Drop for SpinHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
