use chrono::Utc;
use tokio::task::JoinHandle;

use super::storage::OtpStore;

const FALLBACK_PERIOD: std::time::Duration = std::time::Duration::from_secs(60);

/// Periodically delete codes whose expiry has passed, consumed or not
///
/// A zero `period` falls back to one minute.
pub fn spawn_otp_purge(store: OtpStore, period: std::time::Duration) -> JoinHandle<()> {
    let period = if period.is_zero() {
        tracing::warn!(
            fallback_secs = FALLBACK_PERIOD.as_secs(),
            "Zero OTP purge interval, using fallback"
        );
        FALLBACK_PERIOD
    } else {
        period
    };

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match store.purge_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(count) => tracing::debug!(count, "Purged expired OTP codes"),
                Err(e) => tracing::error!(error = %e, "Failed to purge expired OTP codes"),
            }
        }
    })
}
