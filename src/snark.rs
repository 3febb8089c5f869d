//! Generator for Loupekine snarks.
//!
//! A snark with `k` blocks consists of `k` copies of a fixed 7-node block (nodes `7i..7i+6`)
//! arranged in a ring. Block `i` is linked to block `(i+1) mod k` by two edges, either *direct*
//! (`7i+1 - 7j`, `7i+5 - 7j+4`) or *crossed* (`7i+1 - 7j+4`, `7i+5 - 7j`). The tails `7i+6` of
//! the blocks are then consumed in consecutive triples by `z` linking nodes `7k..7k+z-1`, and
//! the remaining tails are chained pairwise.

use std::fmt;
use std::str::FromStr;
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use tracing::{debug, info};
use crate::cust_error::{ConfigError, ProcessingError};
use crate::graph::SnarkGraph;

/// Nodes per block.
pub const BLOCK_SIZE: usize = 7;

/// Local offset of the tail node of a block.
pub const TAIL: usize = 6;

/// Internal edges of a block, relative to its base node `7i`.
pub const BLOCK_EDGES: [(usize, usize); 8] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 5),
    (2, 6),
    (3, 4),
    (3, 6),
    (4, 5),
];

/// How the two ring edges between consecutive blocks are chosen.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum LinkPolicy {
    /// A fair coin picks direct or crossed for every block.
    #[default]
    Random,
    AlwaysDirect,
    AlwaysCrossed,
}

impl fmt::Display for LinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::AlwaysDirect => write!(f, "direct"),
            Self::AlwaysCrossed => write!(f, "crossed"),
        }
    }
}

impl FromStr for LinkPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "direct" | "always-direct" => Ok(Self::AlwaysDirect),
            "crossed" | "always-crossed" => Ok(Self::AlwaysCrossed),
            _ => Err(ConfigError::UnknownPolicy(s.to_owned())),
        }
    }
}

/// The ring edges actually used between a block and its successor.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LinkPattern {
    Direct,
    Crossed,
}

impl LinkPattern {

    /// Returns the two ring edges from block `block` to block `next`.
    pub fn edges(&self, block: usize, next: usize) -> [(usize, usize); 2] {
        let (base, next_base) = (BLOCK_SIZE * block, BLOCK_SIZE * next);
        match self {
            Self::Direct => [(base + 1, next_base), (base + 5, next_base + 4)],
            Self::Crossed => [(base + 1, next_base + 4), (base + 5, next_base)],
        }
    }

}

/// Parameters of a single generation run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SnarkConfig {
    /// Number of blocks `k`.
    pub blocks: usize,
    /// Number of linking nodes `z`.
    pub linking: usize,
    pub policy: LinkPolicy,
    /// Seed for the per-block coin flips of `LinkPolicy::Random`.
    pub seed: Option<u64>,
}

impl Default for SnarkConfig {
    fn default() -> Self {
        SnarkConfig {
            blocks: 9,
            linking: 3,
            policy: LinkPolicy::Random,
            seed: None,
        }
    }
}

impl SnarkConfig {

    pub fn new(blocks: usize, linking: usize, policy: LinkPolicy) -> Self {
        SnarkConfig { blocks, linking, policy, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that the ring is non-empty and that the linking nodes find enough block tails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blocks == 0 {
            return Err(ConfigError::NoBlocks)
        }
        if 3 * self.linking > self.blocks {
            return Err(ConfigError::TooManyLinkingVertices { linking: self.linking, blocks: self.blocks })
        }
        Ok(())
    }

    /// Returns the number of nodes of the generated snark.
    pub fn num_nodes(&self) -> usize {
        BLOCK_SIZE * self.blocks + self.linking
    }

}

/// The edge list of a generated snark.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snark {
    pub config: SnarkConfig,
    pub num_nodes: usize,
    /// Edges in generation order. Parallel edges are kept.
    pub edges: Vec<(usize, usize)>,
    /// The ring pattern chosen for each block.
    pub patterns: Vec<LinkPattern>,
}

impl Snark {

    /// Generates a snark for `config`, drawing the random link patterns from a `StdRng` seeded
    /// with `config.seed`, or from `thread_rng()` if no seed is given.
    pub fn generate_from_config(config: &SnarkConfig) -> Result<Self, ConfigError> {
        match config.seed {
            Some(seed) => Self::generate(config, &mut StdRng::seed_from_u64(seed)),
            None => Self::generate(config, &mut thread_rng()),
        }
    }

    /// Generates a snark for `config`. `rng` is drawn from once per block if the policy is
    /// `LinkPolicy::Random` and never otherwise.
    ///
    /// Returns a `ConfigError` if `config` is invalid; no edge is generated in that case.
    pub fn generate<R: Rng + ?Sized>(config: &SnarkConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let k = config.blocks;
        let mut edges = Vec::with_capacity(10 * k + 3 * config.linking + k / 2);
        let mut patterns = Vec::with_capacity(k);

        for i in 0..k {
            let base = BLOCK_SIZE * i;
            edges.extend(BLOCK_EDGES.iter().map(|(src, trg)| (base + src, base + trg)));

            let pattern = match config.policy {
                LinkPolicy::Random => {
                    if rng.gen::<bool>() { LinkPattern::Crossed } else { LinkPattern::Direct }
                },
                LinkPolicy::AlwaysDirect => LinkPattern::Direct,
                LinkPolicy::AlwaysCrossed => LinkPattern::Crossed,
            };
            debug!(block = i, ?pattern, "ring edges");
            edges.extend(pattern.edges(i, (i + 1) % k));
            patterns.push(pattern);
        }

        // Each linking node takes the next three tails.
        let mut j = 0;
        for i in 0..config.linking {
            let link = BLOCK_SIZE * k + i;
            for block in j..j + 3 {
                edges.push((link, BLOCK_SIZE * block + TAIL));
            }
            j += 3;
        }

        // Chain the remaining tails pairwise. An odd tail at the end stays unpaired.
        let mut l = j;
        while l + 1 < k {
            edges.push((BLOCK_SIZE * l + TAIL, BLOCK_SIZE * (l + 1) + TAIL));
            l += 2;
        }

        info!(
            blocks = k,
            linking = config.linking,
            policy = %config.policy,
            nodes = config.num_nodes(),
            edges = edges.len(),
            "generated loupekine snark"
        );
        Ok(Snark {
            config: *config,
            num_nodes: config.num_nodes(),
            edges,
            patterns,
        })
    }

    /// Builds the adjacency structure of `self`.
    pub fn to_graph(&self) -> Result<SnarkGraph, ProcessingError> {
        SnarkGraph::from_edges(self.num_nodes, &self.edges)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tail_edges(snark: &Snark) -> usize {
        let k = snark.config.blocks;
        snark.edges[10 * k..].len()
    }

    #[rstest]
    #[case(1, 0)]
    #[case(2, 0)]
    #[case(3, 1)]
    #[case(5, 1)]
    #[case(8, 2)]
    #[case(9, 3)]
    #[case(10, 3)]
    fn edge_count_test(#[case] blocks: usize, #[case] linking: usize) {
        let check = |snark: &Snark| {
            let residual = (blocks - 3 * linking) / 2;
            assert_eq!(snark.edges.len(), 10 * blocks + 3 * linking + residual);
            assert_eq!(tail_edges(snark), 3 * linking + residual);
            assert_eq!(snark.patterns.len(), blocks);
            assert_eq!(snark.num_nodes, 7 * blocks + linking);
            assert!(snark.edges.iter().all(|(u, v)| u != v && *u < snark.num_nodes && *v < snark.num_nodes));
        };
        for policy in [LinkPolicy::AlwaysDirect, LinkPolicy::AlwaysCrossed] {
            let config = SnarkConfig::new(blocks, linking, policy);
            check(&Snark::generate(&config, &mut StdRng::seed_from_u64(7)).unwrap());
        }
        let config = SnarkConfig::new(blocks, linking, LinkPolicy::Random);
        for seed in 0..32 {
            check(&Snark::generate(&config, &mut StdRng::seed_from_u64(seed)).unwrap());
        }
        for _ in 0..32 {
            check(&Snark::generate(&config, &mut thread_rng()).unwrap());
        }
    }

    #[test]
    fn random_policy_mixes_patterns_test() {
        let config = SnarkConfig::new(10, 3, LinkPolicy::Random);
        let mut seen_direct = false;
        let mut seen_crossed = false;
        for seed in 0..32 {
            let snark = Snark::generate(&config, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(snark.edges.len(), 100 + 9);
            seen_direct |= snark.patterns.contains(&LinkPattern::Direct);
            seen_crossed |= snark.patterns.contains(&LinkPattern::Crossed);
        }
        assert!(seen_direct && seen_crossed);
    }

    #[test]
    fn block_edges_stay_in_block_test() {
        let config = SnarkConfig::new(6, 2, LinkPolicy::Random);
        let snark = Snark::generate(&config, &mut StdRng::seed_from_u64(1)).unwrap();
        for i in 0..6 {
            let block = &snark.edges[10 * i..10 * i + 8];
            assert!(block.iter().all(|(u, v)| (7 * i..=7 * i + 6).contains(u) && (7 * i..=7 * i + 6).contains(v)));
        }
    }

    #[test]
    fn single_block_test() {
        let config = SnarkConfig::new(1, 0, LinkPolicy::AlwaysDirect);
        let snark = Snark::generate_from_config(&config).unwrap();
        assert_eq!(snark.edges.len(), 10);
        assert_eq!(snark.edges[8..], [(1, 0), (5, 4)]);
        let config = SnarkConfig::new(1, 0, LinkPolicy::AlwaysCrossed);
        let snark = Snark::generate_from_config(&config).unwrap();
        assert_eq!(snark.edges[8..], [(1, 4), (5, 0)]);
        let graph = snark.to_graph().unwrap();
        assert_eq!(graph.num_nodes(), 7);
        assert!(!graph.disconnected());
    }

    #[test]
    fn direct_is_deterministic_test() {
        let config = SnarkConfig::new(7, 2, LinkPolicy::AlwaysDirect);
        let first = Snark::generate_from_config(&config).unwrap();
        let second = Snark::generate_from_config(&config).unwrap();
        assert_eq!(first, second);
        assert!(first.patterns.iter().all(|p| *p == LinkPattern::Direct));
    }

    #[test]
    fn seeded_random_is_reproducible_test() {
        let config = SnarkConfig::new(12, 4, LinkPolicy::Random).with_seed(42);
        let first = Snark::generate_from_config(&config).unwrap();
        let second = Snark::generate_from_config(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn linking_nodes_consume_all_tails_test() {
        let config = SnarkConfig::new(9, 3, LinkPolicy::AlwaysCrossed);
        let snark = Snark::generate_from_config(&config).unwrap();
        let tails = &snark.edges[90..];
        assert_eq!(tails.len(), 9);
        for (i, triple) in tails.chunks(3).enumerate() {
            assert!(triple.iter().all(|(link, _)| *link == 63 + i));
            let ends: Vec<usize> = triple.iter().map(|(_, tail)| *tail).collect();
            assert_eq!(ends, vec![7 * 3 * i + 6, 7 * (3 * i + 1) + 6, 7 * (3 * i + 2) + 6]);
        }
        let graph = snark.to_graph().unwrap();
        assert!(graph.is_cubic());
        assert!(!graph.disconnected());
    }

    #[test]
    fn residual_tails_are_chained_test() {
        let config = SnarkConfig::new(7, 1, LinkPolicy::AlwaysDirect);
        let snark = Snark::generate_from_config(&config).unwrap();
        assert_eq!(snark.edges[73..], [(27, 34), (41, 48)]);
    }

    #[test]
    fn invalid_config_test() {
        let config = SnarkConfig::new(2, 1, LinkPolicy::Random);
        assert_eq!(
            Snark::generate_from_config(&config),
            Err(ConfigError::TooManyLinkingVertices { linking: 1, blocks: 2 })
        );
        let config = SnarkConfig::new(0, 0, LinkPolicy::AlwaysDirect);
        assert_eq!(Snark::generate_from_config(&config), Err(ConfigError::NoBlocks));
    }

    #[test]
    fn policy_from_str_test() {
        assert_eq!("random".parse::<LinkPolicy>(), Ok(LinkPolicy::Random));
        assert_eq!("Direct".parse::<LinkPolicy>(), Ok(LinkPolicy::AlwaysDirect));
        assert_eq!("always-crossed".parse::<LinkPolicy>(), Ok(LinkPolicy::AlwaysCrossed));
        assert!("diagonal".parse::<LinkPolicy>().is_err());
        assert_eq!(LinkPolicy::AlwaysCrossed.to_string().parse::<LinkPolicy>(), Ok(LinkPolicy::AlwaysCrossed));
    }

}
