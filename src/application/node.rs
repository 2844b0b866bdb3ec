//! The node context every operation runs on.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tracing::{debug, info, warn};

use super::bridge::EventBridge;
use super::state::NodeState;
use super::success::SuccessKind;
use crate::adapter::callback::{
    BroadcasterAdapter, FeeEstimatorAdapter, FeeRates, FilterAdapter, LibraryEventHandler,
    LogRelay, PersisterAdapter,
};
use crate::domain::{LogLevel, Subsystem};
use crate::error::{Error, Result};
use crate::infrastructure::config::Config;
use crate::port::{ChainMonitorDeps, LightningBackend, Subscriber};

type InitLock = ReentrantMutex<Cell<bool>>;

/// Clears the in-progress flag when a build ends, including by unwinding.
struct Building<'a>(&'a Cell<bool>);

impl Drop for Building<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Default invoice expiry, one hour.
pub const DEFAULT_INVOICE_EXPIRY_SECS: u64 = 3600;

/// Settings applied when a node is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSettings {
    pub fee_rates: FeeRates,
    /// Library log levels relayed as `log` events; others are dropped.
    pub relayed_log_levels: Vec<LogLevel>,
    pub invoice_expiry_secs: u64,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            fee_rates: FeeRates::default(),
            relayed_log_levels: LogLevel::ALL.to_vec(),
            invoice_expiry_secs: DEFAULT_INVOICE_EXPIRY_SECS,
        }
    }
}

/// One Lightning node: its subsystem handles, callback adapters and event bridge.
///
/// The callback adapters exist from construction. Every other subsystem is
/// built by its `init_*` operation, at most once; there is no teardown.
/// All operations take `&self` and may be called from any thread.
pub struct Node {
    pub(super) backend: Arc<dyn LightningBackend>,
    pub(super) bridge: Arc<EventBridge>,
    pub(super) fees: Arc<FeeEstimatorAdapter>,
    pub(super) log_relay: Arc<LogRelay>,
    pub(super) broadcaster: Arc<BroadcasterAdapter>,
    pub(super) filter: Arc<FilterAdapter>,
    pub(super) persister: Arc<PersisterAdapter>,
    pub(super) event_handler: Arc<LibraryEventHandler>,
    pub(super) invoice_expiry_secs: u64,
    state: RwLock<NodeState>,
    /// Per-subsystem check-then-set locks; the flag marks a build in progress.
    init_locks: Mutex<HashMap<Subsystem, Arc<InitLock>>>,
}

impl Node {
    #[must_use]
    pub fn new(backend: Arc<dyn LightningBackend>) -> Self {
        Self::with_settings(backend, NodeSettings::default())
    }

    #[must_use]
    pub fn with_settings(backend: Arc<dyn LightningBackend>, settings: NodeSettings) -> Self {
        let bridge = Arc::new(EventBridge::new());
        let log_relay = Arc::new(LogRelay::new(Arc::clone(&bridge)));
        for level in LogLevel::ALL {
            log_relay.set_level(level, settings.relayed_log_levels.contains(&level));
        }

        Self {
            backend,
            fees: Arc::new(FeeEstimatorAdapter::new(settings.fee_rates)),
            log_relay,
            broadcaster: Arc::new(BroadcasterAdapter::new(Arc::clone(&bridge))),
            filter: Arc::new(FilterAdapter::new(Arc::clone(&bridge))),
            persister: Arc::new(PersisterAdapter::new(Arc::clone(&bridge))),
            event_handler: Arc::new(LibraryEventHandler::new(Arc::clone(&bridge))),
            bridge,
            invoice_expiry_secs: settings.invoice_expiry_secs,
            state: RwLock::new(NodeState::default()),
            init_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create a node with the fee, log relay and invoice settings of `config`.
    #[must_use]
    pub fn from_config(backend: Arc<dyn LightningBackend>, config: &Config) -> Self {
        Self::with_settings(backend, config.node_settings())
    }

    /// Replace the event subscriber. Only later events reach it.
    pub fn set_subscriber(&self, subscriber: Arc<dyn Subscriber>) {
        self.bridge.set_subscriber(subscriber);
    }

    pub fn clear_subscriber(&self) {
        self.bridge.clear_subscriber();
    }

    #[must_use]
    pub fn bridge(&self) -> &Arc<EventBridge> {
        &self.bridge
    }

    #[must_use]
    pub fn is_initialized(&self, subsystem: Subsystem) -> bool {
        self.state.read().is_set(subsystem)
    }

    pub(super) fn snapshot(&self) -> NodeState {
        self.state.read().clone()
    }

    pub(super) fn chain_monitor_deps(&self) -> ChainMonitorDeps {
        ChainMonitorDeps {
            fee_estimator: self.fees.clone(),
            logger: self.log_relay.clone(),
            broadcaster: self.broadcaster.clone(),
            filter: self.filter.clone(),
            persister: self.persister.clone(),
        }
    }

    /// Build `target` once.
    ///
    /// `build` sees a snapshot of the current handles and either fails (dependency
    /// missing, invalid input, library error) or returns a commit that stores the
    /// new handles. Nothing is stored unless the commit runs, and the commit runs
    /// only while `target` is still absent.
    ///
    /// Each subsystem has its own lock, so a build may start the init of another
    /// subsystem from a library callback. Re-entering the same init from such a
    /// callback fails with `AlreadyInitialized`.
    pub(super) fn initialize<B, C>(&self, target: Subsystem, build: B) -> Result<()>
    where
        B: FnOnce(&NodeState) -> Result<C>,
        C: FnOnce(&mut NodeState),
    {
        let lock = self.init_lock(target);
        let in_progress = lock.lock();
        // Only a callback fired by this very build can get here while it runs.
        if in_progress.get() || self.state.read().is_set(target) {
            return Err(Error::AlreadyInitialized(target));
        }

        let commit = {
            in_progress.set(true);
            let _building = Building(&in_progress);
            build(&self.snapshot())?
        };
        commit(&mut *self.state.write());

        info!(subsystem = %target, "Subsystem initialized");
        Ok(())
    }

    fn init_lock(&self, target: Subsystem) -> Arc<InitLock> {
        Arc::clone(
            self.init_locks
                .lock()
                .entry(target)
                .or_insert_with(|| Arc::new(ReentrantMutex::new(Cell::new(false)))),
        )
    }

    /// Run an operation and mirror its outcome to tracing and the event bridge.
    pub(super) fn run<T>(&self, kind: SuccessKind, op: impl FnOnce() -> Result<T>) -> Result<T> {
        let result = op();
        match &result {
            Ok(_) => {
                debug!(kind = %kind, "Operation succeeded");
                self.bridge.node_log(kind.log_level(), kind.as_str());
            }
            Err(e) => {
                warn!(kind = %kind, code = e.code(), error = %e, "Operation failed");
                self.bridge
                    .node_log(LogLevel::Error, format!("{}: {e}", e.code()));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{ConfirmationTarget, FeeEstimator};
    use crate::testkit::backend::MemoryBackend;
    use crate::testkit::recording::RecordingSubscriber;

    #[test]
    fn test_adapters_exist_from_construction() {
        let node = Node::new(Arc::new(MemoryBackend::new()));
        for subsystem in [
            Subsystem::FeeEstimator,
            Subsystem::Logger,
            Subsystem::Broadcaster,
            Subsystem::Persister,
            Subsystem::Filter,
        ] {
            assert!(node.is_initialized(subsystem));
        }
        assert!(!node.is_initialized(Subsystem::ChainMonitor));
    }

    #[test]
    fn test_settings_are_applied() {
        let node = Node::with_settings(
            Arc::new(MemoryBackend::new()),
            NodeSettings {
                fee_rates: FeeRates {
                    high: 7_000,
                    normal: 3_000,
                    low: 1_000,
                },
                relayed_log_levels: vec![LogLevel::Warn, LogLevel::Error],
                invoice_expiry_secs: 600,
            },
        );

        assert_eq!(node.fees.sat_per_1000_weight(ConfirmationTarget::Normal), 3_000);
        assert!(!node.log_relay.is_active(LogLevel::Debug));
        assert!(node.log_relay.is_active(LogLevel::Warn));
        assert_eq!(node.invoice_expiry_secs, 600);
    }

    #[test]
    fn test_run_mirrors_failures_to_bridge() {
        let node = Node::new(Arc::new(MemoryBackend::new()));
        let recorder = Arc::new(RecordingSubscriber::new());
        node.set_subscriber(recorder.clone());

        let result: Result<()> = node.run(SuccessKind::ListChannels, || {
            Err(Error::NotInitialized(Subsystem::ChannelManager))
        });

        assert!(result.is_err());
        let logs = recorder.node_logs();
        assert_eq!(logs.len(), 1);
        assert!(logs[0].starts_with("init_channel_manager"));
    }

    #[test]
    fn test_build_may_start_another_init() {
        let node = Node::new(Arc::new(MemoryBackend::new()));

        node.initialize(Subsystem::ChainMonitor, |_| {
            node.init_config(crate::domain::UserConfig::default())?;
            let again = node.initialize(Subsystem::ChainMonitor, |_| Ok(|_: &mut NodeState| {}));
            assert!(matches!(again, Err(Error::AlreadyInitialized(Subsystem::ChainMonitor))));
            Ok(|_: &mut NodeState| {})
        })
        .unwrap();

        assert!(node.is_initialized(Subsystem::UserConfig));
    }

    #[test]
    fn test_failed_build_can_be_retried() {
        let node = Node::new(Arc::new(MemoryBackend::new()));

        let failed = node.initialize(Subsystem::UserConfig, |_| {
            Err::<fn(&mut NodeState), _>(Error::Library("boom".into()))
        });
        assert!(failed.is_err());

        node.init_config(crate::domain::UserConfig::default()).unwrap();
        assert!(node.is_initialized(Subsystem::UserConfig));
    }
}
