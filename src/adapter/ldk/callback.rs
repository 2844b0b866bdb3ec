//! LDK's callback traits, served by the node's callback adapters.
//!
//! Implemented on the port trait objects, so the `Arc<dyn ...>` handles the
//! node passes in plug straight into LDK's generic parameters.

use bitcoin::{Script, Transaction, Txid};
use lightning::chain::chaininterface::{
    BroadcasterInterface, ConfirmationTarget as LdkTarget, FeeEstimator as LdkFeeEstimator,
    FEERATE_FLOOR_SATS_PER_KW,
};
use lightning::chain::chainmonitor::Persist;
use lightning::chain::channelmonitor::{ChannelMonitor, ChannelMonitorUpdate};
use lightning::chain::transaction::OutPoint as LdkOutPoint;
use lightning::chain::{
    ChannelMonitorUpdateStatus, Filter as LdkFilter, WatchedOutput as LdkWatchedOutput,
};
use lightning::sign::InMemorySigner;
use lightning::util::logger::{Level, Logger as LdkLogger, Record};
use lightning::util::ser::Writeable;
use tracing::debug;

use crate::domain::{LogLevel, LogRecord};
use crate::port::{
    Broadcaster, ConfirmationTarget, FeeEstimator, Filter, Logger, Persister, WatchedOutput,
};

/// Fee tier serving each of LDK's confirmation targets.
pub(super) fn urgency(target: LdkTarget) -> ConfirmationTarget {
    match target {
        LdkTarget::MaximumFeeEstimate | LdkTarget::UrgentOnChainSweep => {
            ConfirmationTarget::HighPriority
        }
        LdkTarget::MinAllowedNonAnchorChannelRemoteFee
        | LdkTarget::AnchorChannelFee
        | LdkTarget::NonAnchorChannelFee => ConfirmationTarget::Normal,
        LdkTarget::MinAllowedAnchorChannelRemoteFee
        | LdkTarget::ChannelCloseMinimum
        | LdkTarget::OutputSpendingFee => ConfirmationTarget::Background,
    }
}

pub(super) fn log_level(level: Level) -> LogLevel {
    match level {
        Level::Gossip => LogLevel::Gossip,
        Level::Trace => LogLevel::Trace,
        Level::Debug => LogLevel::Debug,
        Level::Info => LogLevel::Info,
        Level::Warn => LogLevel::Warn,
        Level::Error => LogLevel::Error,
    }
}

impl LdkFeeEstimator for dyn FeeEstimator {
    fn get_est_sat_per_1000_weight(&self, confirmation_target: LdkTarget) -> u32 {
        FeeEstimator::sat_per_1000_weight(self, urgency(confirmation_target))
            .max(FEERATE_FLOOR_SATS_PER_KW)
    }
}

impl LdkLogger for dyn Logger {
    fn log(&self, record: Record) {
        Logger::log(
            self,
            LogRecord {
                level: log_level(record.level),
                module_path: record.module_path.to_owned(),
                line: record.line,
                message: record.args.to_string(),
            },
        );
    }
}

impl BroadcasterInterface for dyn Broadcaster {
    fn broadcast_transactions(&self, txs: &[&Transaction]) {
        for tx in txs {
            Broadcaster::broadcast_transaction(self, tx);
        }
    }
}

impl LdkFilter for dyn Filter {
    fn register_tx(&self, txid: &Txid, script_pubkey: &Script) {
        Filter::register_tx(self, txid, script_pubkey);
    }

    fn register_output(&self, output: LdkWatchedOutput) {
        Filter::register_output(
            self,
            WatchedOutput {
                block_hash: output.block_hash,
                outpoint: output.outpoint.into_bitcoin_outpoint(),
                script_pubkey: output.script_pubkey,
            },
        );
    }
}

// Writes are handed to the host synchronously, so every update completes at once.
impl Persist<InMemorySigner> for dyn Persister {
    fn persist_new_channel(
        &self,
        channel_funding_outpoint: LdkOutPoint,
        monitor: &ChannelMonitor<InMemorySigner>,
    ) -> ChannelMonitorUpdateStatus {
        Persister::persist_new_channel(
            self,
            channel_funding_outpoint.into_bitcoin_outpoint(),
            &monitor.encode(),
        );
        ChannelMonitorUpdateStatus::Completed
    }

    fn update_persisted_channel(
        &self,
        channel_funding_outpoint: LdkOutPoint,
        _monitor_update: Option<&ChannelMonitorUpdate>,
        monitor: &ChannelMonitor<InMemorySigner>,
    ) -> ChannelMonitorUpdateStatus {
        Persister::update_persisted_channel(
            self,
            channel_funding_outpoint.into_bitcoin_outpoint(),
            &monitor.encode(),
        );
        ChannelMonitorUpdateStatus::Completed
    }

    fn archive_persisted_channel(&self, channel_funding_outpoint: LdkOutPoint) {
        debug!(
            funding_txo = %channel_funding_outpoint.into_bitcoin_outpoint(),
            "Channel monitor fully resolved"
        );
    }
}
