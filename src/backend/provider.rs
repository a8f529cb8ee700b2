use crate::backend::config::{AppConfig, GIB};
use crate::backend::error::{Result, StorageError};
use crate::backend::ids::IdSource;
use crate::backend::types::{StorageStats, Transaction, TransactionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationLevel {
    Low,
    Medium,
    High,
}

impl UtilizationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            UtilizationLevel::Low => "Low",
            UtilizationLevel::Medium => "Medium",
            UtilizationLevel::High => "High",
        }
    }
}

fn check_range(gb: u64, config: &AppConfig) -> Result<u64> {
    if gb < config.min_allocation_gb || gb > config.max_allocation_gb {
        return Err(StorageError::AllocationOutOfRange(gb));
    }
    gb.checked_mul(GIB).ok_or(StorageError::AllocationOutOfRange(gb))
}

/// Inactive -> Active. Returns the new stats and the `provide` transaction.
pub fn activate(
    stats: &StorageStats,
    gb: u64,
    config: &AppConfig,
    ids: &mut dyn IdSource,
) -> Result<(StorageStats, Transaction)> {
    let bytes = check_range(gb, config)?;
    if stats.is_provider {
        return Err(StorageError::AlreadyProvider);
    }

    let mut next = stats.clone();
    next.total_allocated = bytes;
    next.is_provider = true;

    let tx = Transaction {
        id: ids.next_id(),
        kind: TransactionKind::Provide,
        amount: config.activation_reward,
        timestamp: ids.now_millis(),
        description: format!("Activated as storage provider ({} GB)", gb),
    };
    Ok((next, tx))
}

/// Active -> Inactive. Refused while anything is stored.
pub fn deactivate(stats: &StorageStats) -> Result<StorageStats> {
    if !stats.is_provider {
        return Err(StorageError::NotProvider);
    }
    if stats.total_used > 0 {
        return Err(StorageError::HasStoredData);
    }
    let mut next = stats.clone();
    next.total_allocated = 0;
    next.is_provider = false;
    Ok(next)
}

/// Active -> Active. Only `total_allocated` changes.
pub fn update_allocation(stats: &StorageStats, gb: u64, config: &AppConfig) -> Result<StorageStats> {
    let bytes = check_range(gb, config)?;
    if !stats.is_provider {
        return Err(StorageError::NotProvider);
    }
    if bytes < stats.total_used {
        return Err(StorageError::AllocationBelowUsage { requested: bytes, used: stats.total_used });
    }
    let mut next = stats.clone();
    next.total_allocated = bytes;
    Ok(next)
}

pub fn estimated_monthly_earnings(gb: u64, config: &AppConfig) -> u64 {
    gb * config.earnings_per_gb
}

/// Percent of the allocation in use, capped at 100.
pub fn utilization_percent(stats: &StorageStats) -> f64 {
    if stats.total_allocated == 0 {
        return 0.0;
    }
    (stats.total_used as f64 / stats.total_allocated as f64 * 100.0).min(100.0)
}

pub fn utilization_level(percent: f64) -> UtilizationLevel {
    if percent > 80.0 {
        UtilizationLevel::High
    } else if percent > 40.0 {
        UtilizationLevel::Medium
    } else {
        UtilizationLevel::Low
    }
}

/// Where the allocation slider starts: the current allocation in whole GB,
/// or 10 GB for a new provider.
pub fn initial_slider_gb(stats: &StorageStats) -> u64 {
    if stats.total_allocated > 0 {
        stats.total_allocated / GIB
    } else {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ids::SequentialIds;

    fn config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn test_activate_sets_allocation() {
        let mut ids = SequentialIds::starting_at(0);
        let (stats, tx) = activate(&StorageStats::empty(847), 10, &config(), &mut ids).unwrap();
        assert_eq!(stats.total_allocated, 10 * 1024 * 1024 * 1024);
        assert!(stats.is_provider);
        assert_eq!(stats.points_earned, 0);
        assert_eq!(tx.kind, TransactionKind::Provide);
        assert_eq!(tx.amount, 100);
        assert_eq!(tx.description, "Activated as storage provider (10 GB)");
    }

    #[test]
    fn test_activate_bounds() {
        let mut ids = SequentialIds::starting_at(0);
        let empty = StorageStats::empty(847);
        assert!(matches!(activate(&empty, 0, &config(), &mut ids), Err(StorageError::AllocationOutOfRange(0))));
        assert!(matches!(activate(&empty, 101, &config(), &mut ids), Err(StorageError::AllocationOutOfRange(101))));
        assert!(activate(&empty, 1, &config(), &mut ids).is_ok());
        assert!(activate(&empty, 100, &config(), &mut ids).is_ok());
    }

    #[test]
    fn test_activate_rejects_overflowing_size() {
        let mut ids = SequentialIds::starting_at(0);
        let wide = AppConfig { max_allocation_gb: u64::MAX, ..config() };
        let result = activate(&StorageStats::empty(847), u64::MAX, &wide, &mut ids);
        assert!(matches!(result, Err(StorageError::AllocationOutOfRange(u64::MAX))));
    }

    #[test]
    fn test_activate_twice_rejected() {
        let mut ids = SequentialIds::starting_at(0);
        let (stats, _) = activate(&StorageStats::empty(847), 5, &config(), &mut ids).unwrap();
        assert!(matches!(activate(&stats, 5, &config(), &mut ids), Err(StorageError::AlreadyProvider)));
    }

    #[test]
    fn test_deactivate() {
        let mut ids = SequentialIds::starting_at(0);
        let (mut stats, _) = activate(&StorageStats::empty(847), 5, &config(), &mut ids).unwrap();

        stats.total_used = 1;
        assert!(matches!(deactivate(&stats), Err(StorageError::HasStoredData)));

        stats.total_used = 0;
        let off = deactivate(&stats).unwrap();
        assert_eq!(off.total_allocated, 0);
        assert!(!off.is_provider);

        assert!(matches!(deactivate(&off), Err(StorageError::NotProvider)));
    }

    #[test]
    fn test_update_allocation_against_usage() {
        let mut ids = SequentialIds::starting_at(0);
        let (mut stats, _) = activate(&StorageStats::empty(847), 5, &config(), &mut ids).unwrap();
        stats.total_used = 4 * GIB;

        match update_allocation(&stats, 3, &config()) {
            Err(StorageError::AllocationBelowUsage { requested, used }) => {
                assert_eq!(requested, 3 * GIB);
                assert_eq!(used, 4 * GIB);
            }
            other => panic!("unexpected {:?}", other),
        }

        let updated = update_allocation(&stats, 4, &config()).unwrap();
        assert_eq!(updated.total_allocated, 4 * GIB);
        assert_eq!(updated.total_used, 4 * GIB);
        assert!(updated.is_provider);
    }

    #[test]
    fn test_update_requires_provider() {
        let stats = StorageStats::empty(847);
        assert!(matches!(update_allocation(&stats, 5, &config()), Err(StorageError::NotProvider)));
    }

    #[test]
    fn test_presentation_helpers() {
        assert_eq!(estimated_monthly_earnings(10, &config()), 500);

        let mut stats = StorageStats::empty(847);
        assert_eq!(utilization_percent(&stats), 0.0);
        assert_eq!(initial_slider_gb(&stats), 10);

        stats.total_allocated = 4 * GIB;
        stats.total_used = 2 * GIB;
        assert_eq!(utilization_percent(&stats), 50.0);
        assert_eq!(utilization_level(50.0), UtilizationLevel::Medium);
        assert_eq!(utilization_level(81.0), UtilizationLevel::High);
        assert_eq!(utilization_level(40.0), UtilizationLevel::Low);
        assert_eq!(initial_slider_gb(&stats), 4);
    }
}
