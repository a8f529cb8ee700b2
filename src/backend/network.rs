//! Particle field behind the network map.
//!
//! Purely cosmetic: node positions and links say nothing about where data
//! would live on a real network.

use rand::Rng;
use crate::backend::config::AppConfig;
use crate::backend::summary::total_shards;
use crate::backend::types::{StorageFile, StorageStats};

pub const DATA_NODE_RADIUS: f64 = 6.0;
pub const PLAIN_NODE_RADIUS: f64 = 4.0;
const JITTER: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub has_user_data: bool,
    pub file_shards: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: usize,
    pub to: usize,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkField {
    pub width: f64,
    pub height: f64,
    pub link_distance: f64,
    pub nodes: Vec<VisualNode>,
}

impl NetworkField {
    pub fn generate<R: Rng>(
        stats: &StorageStats,
        files: &[StorageFile],
        width: f64,
        height: f64,
        config: &AppConfig,
        rng: &mut R,
    ) -> Self {
        let count = (stats.network_nodes as usize).min(config.max_visual_nodes);
        let data_nodes = if files.is_empty() { 0 } else { config.user_data_nodes.min(count) };
        let per_node = total_shards(files) / config.user_data_nodes.max(1) as u64 + 1;

        let nodes = (0..count)
            .map(|id| {
                let has_user_data = id < data_nodes;
                VisualNode {
                    id,
                    x: rng.gen::<f64>() * width,
                    y: rng.gen::<f64>() * height,
                    radius: if has_user_data { DATA_NODE_RADIUS } else { PLAIN_NODE_RADIUS },
                    has_user_data,
                    file_shards: if has_user_data { per_node } else { 0 },
                }
            })
            .collect();

        Self { width, height, link_distance: config.link_distance, nodes }
    }

    /// One animation frame: jitter every node, wrapping at the edges.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        for node in &mut self.nodes {
            node.x += (rng.gen::<f64>() - 0.5) * JITTER;
            node.y += (rng.gen::<f64>() - 0.5) * JITTER;
            node.x = wrap(node.x, self.width);
            node.y = wrap(node.y, self.height);
        }
    }

    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for (i, a) in self.nodes.iter().enumerate() {
            for b in &self.nodes[i + 1..] {
                let d = distance(a.x, a.y, b.x, b.y);
                if d < self.link_distance {
                    links.push(Link { from: a.id, to: b.id, opacity: 1.0 - d / self.link_distance });
                }
            }
        }
        links
    }

    /// First node (in id order) whose center is within twice its radius.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| distance(n.x, n.y, x, y) < n.radius * 2.0)
    }

    pub fn node(&self, id: usize) -> Option<&VisualNode> {
        self.nodes.get(id)
    }
}

/// Count shown on the "Your Nodes" card.
pub fn user_node_count(files: &[StorageFile], config: &AppConfig) -> u64 {
    total_shards(files).min(config.user_data_nodes as u64)
}

/// The inputs `generate` depends on. The map is rebuilt only when this changes.
pub fn layout_key(stats: &StorageStats, files: &[StorageFile]) -> (u64, u64) {
    (stats.network_nodes, total_shards(files))
}

fn wrap(value: f64, max: f64) -> f64 {
    if value < 0.0 {
        max
    } else if value > max {
        0.0
    } else {
        value
    }
}

fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::FileStatus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn file(shards: u64) -> StorageFile {
        StorageFile {
            id: "f".into(),
            name: "f".into(),
            size: 1,
            uploaded_at: 0,
            shards,
            status: FileStatus::Active,
            retrieval_code: String::new(),
        }
    }

    fn field_with(nodes: Vec<VisualNode>) -> NetworkField {
        NetworkField { width: 800.0, height: 500.0, link_distance: 150.0, nodes }
    }

    #[test]
    fn test_layout_key_ignores_provider_changes() {
        let stats = StorageStats::empty(847);
        let files = vec![file(2)];
        let before = layout_key(&stats, &files);

        let mut provider = stats.clone();
        provider.is_provider = true;
        provider.total_allocated = 10;
        provider.points_earned = 99;
        assert_eq!(layout_key(&provider, &files), before);

        let more = vec![file(2), file(1)];
        assert_ne!(layout_key(&stats, &more), before);
        assert_ne!(layout_key(&StorageStats::empty(900), &files), before);
    }

    fn plain(id: usize, x: f64, y: f64) -> VisualNode {
        VisualNode { id, x, y, radius: PLAIN_NODE_RADIUS, has_user_data: false, file_shards: 0 }
    }

    #[test]
    fn test_node_count_is_capped() {
        let config = AppConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        let field = NetworkField::generate(&StorageStats::empty(847), &[], 800.0, 500.0, &config, &mut rng);
        assert_eq!(field.nodes.len(), 50);

        let field = NetworkField::generate(&StorageStats::empty(12), &[], 800.0, 500.0, &config, &mut rng);
        assert_eq!(field.nodes.len(), 12);
        assert!(field.nodes.iter().all(|n| n.x >= 0.0 && n.x <= 800.0 && n.y >= 0.0 && n.y <= 500.0));
    }

    #[test]
    fn test_no_user_data_without_files() {
        let config = AppConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let field = NetworkField::generate(&StorageStats::empty(847), &[], 800.0, 500.0, &config, &mut rng);
        assert!(field.nodes.iter().all(|n| !n.has_user_data && n.file_shards == 0));
        assert!(field.nodes.iter().all(|n| n.radius == PLAIN_NODE_RADIUS));
    }

    #[test]
    fn test_user_data_nodes_and_shards() {
        let config = AppConfig::default();
        let mut rng = StdRng::seed_from_u64(2);
        let files = vec![file(20), file(12)];
        let field = NetworkField::generate(&StorageStats::empty(847), &files, 800.0, 500.0, &config, &mut rng);

        let data: Vec<_> = field.nodes.iter().filter(|n| n.has_user_data).collect();
        assert_eq!(data.len(), 15);
        assert!(data.iter().all(|n| n.id < 15 && n.file_shards == 3 && n.radius == DATA_NODE_RADIUS));

        let small = NetworkField::generate(&StorageStats::empty(4), &files, 800.0, 500.0, &config, &mut rng);
        assert!(small.nodes.iter().all(|n| n.has_user_data));
        assert_eq!(user_node_count(&files, &config), 15);
        assert_eq!(user_node_count(&[file(2)], &config), 2);
    }

    #[test]
    fn test_step_wraps_toroidally() {
        let mut field = field_with(vec![plain(0, 0.0, 250.0), plain(1, 800.0, 250.0)]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            field.step(&mut rng);
            for n in &field.nodes {
                assert!(n.x >= 0.0 && n.x <= 800.0);
                assert!(n.y >= 0.0 && n.y <= 500.0);
            }
        }
        assert_eq!(wrap(-0.1, 800.0), 800.0);
        assert_eq!(wrap(800.1, 800.0), 0.0);
        assert_eq!(wrap(400.0, 800.0), 400.0);
    }

    #[test]
    fn test_links_fade_with_distance() {
        let field = field_with(vec![plain(0, 0.0, 0.0), plain(1, 75.0, 0.0), plain(2, 400.0, 400.0)]);
        let links = field.links();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].from, links[0].to), (0, 1));
        assert!((links[0].opacity - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test_takes_first_match() {
        let field = field_with(vec![plain(0, 100.0, 100.0), plain(1, 103.0, 100.0)]);
        // Closer to node 1, but node 0 is also in range and comes first
        let hit = field.hit_test(102.5, 100.0).unwrap();
        assert_eq!(hit.id, 0);
        assert!(field.hit_test(300.0, 300.0).is_none());
        // Just outside node 0's range, still inside node 1's
        assert_eq!(field.hit_test(108.0, 100.0).map(|n| n.id), Some(1));
        assert!(field.hit_test(111.5, 100.0).is_none());
    }
}
