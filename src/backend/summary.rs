use chrono::{DateTime, Local, TimeZone};
use crate::backend::config::GIB;
use crate::backend::types::{StorageFile, StorageStats, Transaction};

pub const RECENT_LIMIT: usize = 5;

/// Read-only numbers behind the dashboard cards.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub used_percent: f64,
    pub file_count: usize,
    pub recent_files: Vec<StorageFile>,
    pub recent_transactions: Vec<Transaction>,
}

impl DashboardSummary {
    /// Lists are taken in stored order; callers insert newest-first where
    /// they want newest-first.
    pub fn derive(stats: &StorageStats, files: &[StorageFile], transactions: &[Transaction]) -> Self {
        Self {
            used_percent: used_percent(stats),
            file_count: files.len(),
            recent_files: files.iter().take(RECENT_LIMIT).cloned().collect(),
            recent_transactions: transactions.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }
}

pub fn used_percent(stats: &StorageStats) -> f64 {
    if stats.total_allocated == 0 {
        0.0
    } else {
        stats.total_used as f64 / stats.total_allocated as f64 * 100.0
    }
}

pub fn total_shards(files: &[StorageFile]) -> u64 {
    files.iter().map(|f| f.shards).sum()
}

pub fn format_gb(bytes: u64) -> String {
    if bytes == 0 {
        return "0 GB".to_string();
    }
    format!("{:.2} GB", bytes as f64 / GIB as f64)
}

/// Human size with up to two decimals, e.g. `15 MB`, `1.5 KB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

pub fn format_date(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => format_local(dt),
        None => "-".to_string(),
    }
}

fn format_local(dt: DateTime<Local>) -> String {
    dt.format("%b %-d, %I:%M %p").to_string()
}

/// `12345` -> `12,345`
pub fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn plural(count: u64, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::{FileStatus, TransactionKind};

    fn file(i: u64) -> StorageFile {
        StorageFile {
            id: format!("f{}", i),
            name: format!("file{}", i),
            size: i,
            uploaded_at: 0,
            shards: i,
            status: FileStatus::Active,
            retrieval_code: String::new(),
        }
    }

    fn tx(i: u64) -> Transaction {
        Transaction {
            id: format!("t{}", i),
            kind: TransactionKind::Upload,
            amount: i,
            timestamp: 0,
            description: String::new(),
        }
    }

    #[test]
    fn test_used_percent() {
        let mut stats = StorageStats::empty(847);
        assert_eq!(used_percent(&stats), 0.0);
        stats.total_allocated = 200;
        stats.total_used = 50;
        assert_eq!(used_percent(&stats), 25.0);
    }

    #[test]
    fn test_recent_lists_keep_stored_order() {
        let files: Vec<_> = (1..=7).map(file).collect();
        let txs: Vec<_> = (1..=3).map(tx).collect();
        let summary = DashboardSummary::derive(&StorageStats::empty(847), &files, &txs);
        assert_eq!(summary.file_count, 7);
        let ids: Vec<_> = summary.recent_files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2", "f3", "f4", "f5"]);
        assert_eq!(summary.recent_transactions.len(), 3);
        assert_eq!(total_shards(&files), 28);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_gb(0), "0 GB");
        assert_eq!(format_gb(GIB + GIB / 2), "1.50 GB");
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(15 * 1024 * 1024), "15 MB");
        assert_eq!(format_points(0), "0");
        assert_eq!(format_points(999), "999");
        assert_eq!(format_points(1000), "1,000");
        assert_eq!(format_points(1234567), "1,234,567");
        assert_eq!(plural(1, "shard"), "1 shard");
        assert_eq!(plural(3, "shard"), "3 shards");
    }
}
