use crate::error::GraphError;
use crate::types::*;
use hashbrown::HashMap;
use std::collections::VecDeque;

/// Kahn ordering over edges and binding references.
///
/// Ties are broken by declaration order so the same graph always evaluates in the same order.
pub fn topo_order(spec: &GraphSpec) -> Result<Vec<NodeId>, GraphError> {
    let index: HashMap<&str, usize> = spec
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let mut indeg = vec![0usize; spec.nodes.len()];
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); spec.nodes.len()];

    let mut link = |from: &str, to: &str, referrer: &str| -> Result<(), GraphError> {
        let lookup = |id: &str| {
            index.get(id).copied().ok_or_else(|| GraphError::UnknownNode {
                referrer: referrer.to_string(),
                node: id.to_string(),
            })
        };
        let (u, v) = (lookup(from)?, lookup(to)?);
        adj[u].push(v);
        indeg[v] += 1;
        Ok(())
    };

    for edge in &spec.edges {
        link(&edge.source, &edge.target, &format!("edge {} -> {}", edge.source, edge.target))?;
    }
    for node in &spec.nodes {
        for binding in node.bindings() {
            link(&binding.node_id, &node.id, &format!("binding on {}", node.id))?;
        }
    }

    let mut q: VecDeque<usize> = (0..spec.nodes.len()).filter(|&i| indeg[i] == 0).collect();
    let mut order = Vec::with_capacity(spec.nodes.len());
    while let Some(u) = q.pop_front() {
        order.push(spec.nodes[u].id.clone());
        for &v in &adj[u] {
            indeg[v] -= 1;
            if indeg[v] == 0 {
                q.push_back(v);
            }
        }
    }

    if order.len() != spec.nodes.len() {
        let remaining = indeg
            .iter()
            .enumerate()
            .filter(|(_, &d)| d > 0)
            .map(|(i, _)| spec.nodes[i].id.clone())
            .collect();
        return Err(GraphError::Cycle { remaining });
    }
    Ok(order)
}
