//! In-memory provider over a fixed raw network.

use rustc_hash::FxHashSet;

use nav_core::{NetworkType, Region};

use super::{GraphProvider, ProviderError, RawNetwork};

/// Serves a fixed network, clipped to the requested region.
///
/// Nodes are kept if they lie inside the region (boundary included); edges
/// are kept if both endpoints were kept.  The same network is served for
/// every [`NetworkType`]: callers that need per-type data register one
/// provider per type.
#[derive(Clone, Debug, Default)]
pub struct StaticProvider {
    network: RawNetwork,
}

impl StaticProvider {
    pub fn new(network: RawNetwork) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &RawNetwork {
        &self.network
    }
}

impl GraphProvider for StaticProvider {
    fn fetch(&self, region: &Region, _network_type: NetworkType) -> Result<RawNetwork, ProviderError> {
        let nodes: Vec<_> = self
            .network
            .nodes
            .iter()
            .filter(|n| region.contains(n.pos))
            .copied()
            .collect();
        if nodes.is_empty() {
            return Err(ProviderError::EmptyRegion);
        }

        let kept: FxHashSet<i64> = nodes.iter().map(|n| n.id).collect();
        let edges = self
            .network
            .edges
            .iter()
            .filter(|e| kept.contains(&e.from) && kept.contains(&e.to))
            .copied()
            .collect();

        Ok(RawNetwork { nodes, edges })
    }
}
