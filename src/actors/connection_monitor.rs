use std::sync::Arc;
use std::time::Duration;

use tokio::spawn;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::api::LedgerClient;
use crate::directory::ClientDirectory;
use crate::storage::Storage;

const MIN_HEALTH_PERIOD: Duration = Duration::from_millis(1);

pub struct ConnectionMonitor;

impl ConnectionMonitor {
    /// Spawns a task probing `/health` every `period` and returns the connectivity flag.
    ///
    /// The flag starts out connected. When a probe succeeds after a failed one the
    /// client directory is invalidated so the next listing comes from the ledger.
    /// The task stops once every receiver has been dropped. A zero `period` is raised to 1ms.
    pub fn spawn<S: Storage>(client: LedgerClient, directory: Arc<ClientDirectory<S>>, period: Duration) -> watch::Receiver<bool> {
        let (sender, receiver) = watch::channel(true);

        spawn(async move {
            let mut ticker = interval(period.max(MIN_HEALTH_PERIOD));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = sender.closed() => break,
                }

                let connected = client.health().await;
                let changed = sender.send_if_modified(|current| {
                    let changed = *current != connected;
                    *current = connected;
                    changed
                });

                match (changed, connected) {
                    (true, true) => {
                        info!("Connection to the ledger restored");
                        directory.invalidate();
                    }
                    (true, false) => warn!("Connection to the ledger lost"),
                    (false, _) => debug!("Health probe: connected = {connected}")
                }
            }

            debug!("Connection monitor stopped");
        });

        receiver
    }
}
