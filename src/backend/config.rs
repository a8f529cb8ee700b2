use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MIB: u64 = 1024 * 1024;
pub const GIB: u64 = 1024 * 1024 * 1024;

/// Tunables for the simulation. Everything here is cosmetic: nothing is
/// actually transferred or stored on a remote node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Delay before each progress tick of a simulated upload
    pub tick_interval_ms: u64,
    /// Percent added per tick; 100 must be a multiple of it
    pub progress_step: u8,
    pub shard_unit_bytes: u64,
    pub point_unit_bytes: u64,
    /// Points credited in the `provide` transaction on activation
    pub activation_reward: u64,
    pub earnings_per_gb: u64,
    pub min_allocation_gb: u64,
    pub max_allocation_gb: u64,
    pub default_network_nodes: u64,
    pub max_visual_nodes: usize,
    pub user_data_nodes: usize,
    /// Pixel distance under which two visual nodes get linked
    pub link_distance: f64,
    pub frame_interval_ms: u64,
    pub db_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            progress_step: 10,
            shard_unit_bytes: 10 * MIB,
            point_unit_bytes: MIB,
            activation_reward: 100,
            earnings_per_gb: 50,
            min_allocation_gb: 1,
            max_allocation_gb: 100,
            default_network_nodes: 847,
            max_visual_nodes: 50,
            user_data_nodes: 15,
            link_distance: 150.0,
            frame_interval_ms: 16,
            db_path: "storage-net.db".to_string(),
        }
    }
}

impl AppConfig {
    pub const FILE_NAME: &'static str = "storage-net.json";

    /// Reads overrides from a JSON file; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = std::fs::read(path)?;
        let config: AppConfig = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.progress_step == 0 || 100 % self.progress_step != 0 {
            return Err(format!("progress_step {} does not divide 100", self.progress_step));
        }
        if self.shard_unit_bytes == 0 || self.point_unit_bytes == 0 {
            return Err("shard_unit_bytes and point_unit_bytes must be non-zero".to_string());
        }
        if self.min_allocation_gb == 0 || self.min_allocation_gb > self.max_allocation_gb {
            return Err(format!(
                "allocation range {}..={} GB is empty or starts at zero",
                self.min_allocation_gb, self.max_allocation_gb
            ));
        }
        if self.max_allocation_gb.checked_mul(GIB).is_none() {
            return Err(format!("max_allocation_gb {} overflows a byte count", self.max_allocation_gb));
        }
        Ok(())
    }
}
