use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Uploading,
    Active,
    Retrieving,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub uploaded_at: i64, // Unix millis
    pub shards: u64,
    pub status: FileStatus,
    pub retrieval_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub total_allocated: u64,
    pub total_used: u64,
    pub files_stored: u64,
    pub points_earned: u64,
    pub is_provider: bool,
    pub provider_earnings: u64,
    pub network_nodes: u64,
}

impl StorageStats {
    /// Empty stats for a fresh client. Only the node count is non-zero.
    pub fn empty(network_nodes: u64) -> Self {
        Self {
            total_allocated: 0,
            total_used: 0,
            files_stored: 0,
            points_earned: 0,
            is_provider: false,
            provider_earnings: 0,
            network_nodes,
        }
    }

    pub fn available(&self) -> u64 {
        self.total_allocated.saturating_sub(self.total_used)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Upload,
    Download,
    Provide,
    Reward,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Upload => "upload",
            TransactionKind::Download => "download",
            TransactionKind::Provide => "provide",
            TransactionKind::Reward => "reward",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: u64,
    pub timestamp: i64,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_json_shape() {
        let file = StorageFile {
            id: "1".into(),
            name: "a.txt".into(),
            size: 10,
            uploaded_at: 1_700_000_000_000,
            shards: 1,
            status: FileStatus::Active,
            retrieval_code: "SN-AAAAAA-BBBBBB".into(),
        };
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["uploadedAt"], 1_700_000_000_000i64);
        assert_eq!(json["retrievalCode"], "SN-AAAAAA-BBBBBB");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_transaction_uses_type_field() {
        let raw = r#"{"id":"t1","type":"provide","amount":100,"timestamp":5,"description":"x"}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.kind, TransactionKind::Provide);

        let back = serde_json::to_value(&tx).unwrap();
        assert_eq!(back["type"], "provide");
    }

    #[test]
    fn test_stats_reads_camel_case_record() {
        let raw = r#"{"totalAllocated":0,"totalUsed":0,"filesStored":0,"pointsEarned":0,
            "isProvider":false,"providerEarnings":0,"networkNodes":847}"#;
        let stats: StorageStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats, StorageStats::empty(847));
    }
}
