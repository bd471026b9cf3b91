//! Topic similarity graph types.

use serde::{Deserialize, Serialize};

use crate::bin::TopicKey;

/// One topic node. Nodes are stored period-major, slot-minor, so a node's
/// position equals [`TopicKey::node_index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicNode {
    pub name: TopicKey,
    /// Sizing hint for the renderer
    pub value: u32,
}

/// Weighted edge between topics of consecutive periods, by node position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

/// Topic similarity graph as the front-end reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityGraph {
    pub nodes: Vec<TopicNode>,
    pub links: Vec<SimilarityLink>,
}

impl SimilarityGraph {
    /// Node at a link endpoint.
    pub fn node(&self, index: usize) -> Option<&TopicNode> {
        self.nodes.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;

    #[test]
    fn test_graph_serialization_shape() {
        let graph = SimilarityGraph {
            nodes: vec![TopicNode {
                name: TopicKey::new(Period::Jan, 0),
                value: 5,
            }],
            links: vec![SimilarityLink {
                source: 0,
                target: 10,
                value: 40.0,
            }],
        };
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(
            json,
            r#"{"nodes":[{"name":"0_0","value":5}],"links":[{"source":0,"target":10,"value":40.0}]}"#
        );
        assert_eq!(graph.node(0).unwrap().name.to_string(), "0_0");
        assert!(graph.node(1).is_none());
    }
}
