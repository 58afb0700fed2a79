//! Utility functions for packet classification.
//!
//! This module contains shared utility functions used throughout the crate.

use log::info;

/// Logs classification statistics including verdict counts and the
/// percentage of traffic blocked.
///
/// # Arguments
///
/// * `permitted` - Number of packets permitted
/// * `blocked` - Number of packets blocked
/// * `rewritten` - Number of permitted packets whose payload changed
pub fn log_statistics(permitted: u64, blocked: u64, rewritten: u64) {
    let total = permitted + blocked;
    let blocked_percentage = if total == 0 {
        0.0
    } else {
        (blocked as f64 / total as f64) * 100.0
    };

    info!(
        "Classified Packets: {}, Permitted: {}, Blocked: {} - {:.2}%, Rewritten: {}",
        total, permitted, blocked, blocked_percentage, rewritten
    );
}
