use std::collections::{BTreeMap, VecDeque};

use crate::ir::{Category, Graph};

/// Rooted spanning tree over a concept graph, in arena form: node ids map to
/// dense indices and the per-node attributes live in flat vectors.
///
/// The tree is derived, recomputed per layout pass, and covers every node
/// exactly once; components unreachable from the root hang directly under it.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    pub root: usize,
    /// Node ids in input order; index into the attribute vectors.
    pub ids: Vec<String>,
    pub index_of: BTreeMap<String, usize>,
    pub parent: Vec<Option<usize>>,
    /// Children in first-visit order.
    pub children: Vec<Vec<usize>>,
    pub depth: Vec<usize>,
    /// Descendant count including self.
    pub subtree_size: Vec<usize>,
}

impl SpanningTree {
    /// Build the tree with BFS over an undirected adjacency view of the
    /// edges. Root preference: first `main`-category node, else the first
    /// node with maximum degree.
    pub fn build(graph: &Graph) -> Self {
        let count = graph.nodes.len();
        let ids: Vec<String> = graph.nodes.iter().map(|node| node.id.clone()).collect();
        let mut index_of = BTreeMap::new();
        for (index, id) in ids.iter().enumerate() {
            index_of.insert(id.clone(), index);
        }

        // Undirected adjacency, neighbor order follows edge input order.
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); count];
        for edge in &graph.edges {
            let (Some(&source), Some(&target)) =
                (index_of.get(&edge.source), index_of.get(&edge.target))
            else {
                continue;
            };
            if source == target {
                continue;
            }
            adjacency[source].push(target);
            adjacency[target].push(source);
        }

        let root = pick_root(graph, &adjacency);

        let mut parent: Vec<Option<usize>> = vec![None; count];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
        let mut depth: Vec<usize> = vec![0; count];
        let mut visited = vec![false; count];
        let mut order: Vec<usize> = Vec::with_capacity(count);

        if count > 0 {
            let mut queue = VecDeque::new();
            visited[root] = true;
            queue.push_back(root);
            while let Some(current) = queue.pop_front() {
                order.push(current);
                for &neighbor in &adjacency[current] {
                    if visited[neighbor] {
                        continue;
                    }
                    visited[neighbor] = true;
                    parent[neighbor] = Some(current);
                    children[current].push(neighbor);
                    depth[neighbor] = depth[current] + 1;
                    queue.push_back(neighbor);
                }
            }

            // Disconnected nodes become direct leaves of the root.
            for index in 0..count {
                if !visited[index] {
                    visited[index] = true;
                    parent[index] = Some(root);
                    children[root].push(index);
                    depth[index] = 1;
                    order.push(index);
                }
            }
        }

        // Subtree sizes bottom-up: reverse BFS order guarantees children are
        // finished before their parent.
        let mut subtree_size = vec![1usize; count];
        for &index in order.iter().rev() {
            for &child in &children[index] {
                subtree_size[index] += subtree_size[child];
            }
        }

        Self {
            root,
            ids,
            index_of,
            parent,
            children,
            depth,
            subtree_size,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when the edge (by node ids) matches a parent/child pair.
    pub fn is_tree_edge(&self, a: &str, b: &str) -> bool {
        let (Some(&ia), Some(&ib)) = (self.index_of.get(a), self.index_of.get(b)) else {
            return false;
        };
        self.parent[ia] == Some(ib) || self.parent[ib] == Some(ia)
    }
}

fn pick_root(graph: &Graph, adjacency: &[Vec<usize>]) -> usize {
    if graph.nodes.is_empty() {
        return 0;
    }
    if let Some(index) = graph
        .nodes
        .iter()
        .position(|node| node.category == Category::Main)
    {
        return index;
    }
    let mut best = 0usize;
    let mut best_degree = adjacency[0].len();
    for (index, neighbors) in adjacency.iter().enumerate().skip(1) {
        if neighbors.len() > best_degree {
            best = index;
            best_degree = neighbors.len();
        }
    }
    best
}
