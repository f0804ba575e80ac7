//! Edge crossing reduction
//!
//! Every element of a layer carries the positions its incoming edges start
//! from in the previous, already ordered layer. Two edges `p -> i` and
//! `q -> j` cross when `p` and `q` are ordered opposite to `i` and `j`.

use super::graph::{VertexGraph, VertexId};
use super::grouping::GroupMatrix;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, trace};

/// Crossings between the incoming edges of `left` and `right` when `left`
/// is placed before `right`
fn pair_crossings(left: &[usize], right: &[usize]) -> usize {
    left.iter()
        .map(|&p| right.iter().filter(|&&q| q < p).count())
        .sum()
}

/// Crossings among all incoming edges of a layer
pub(crate) fn layer_crossings(incoming: &[Vec<usize>]) -> usize {
    incoming
        .iter()
        .enumerate()
        .map(|(i, left)| {
            incoming[i + 1..]
                .iter()
                .map(|right| pair_crossings(left, right))
                .sum::<usize>()
        })
        .sum()
}

/// Swap adjacent elements whenever that strictly removes crossings
///
/// Swapping two neighbours only changes the crossings between their own
/// edges, so each decision compares that pair in both orders. `incoming`
/// is permuted along with `items`. Returns the number of swaps made.
pub(crate) fn reduce_adjacent<T>(
    items: &mut [T],
    incoming: &mut [Vec<usize>],
    scans: usize,
) -> usize {
    debug_assert_eq!(items.len(), incoming.len());
    let mut swaps = 0;

    for _ in 0..scans {
        for i in 0..items.len().saturating_sub(1) {
            let kept = pair_crossings(&incoming[i], &incoming[i + 1]);
            let swapped = pair_crossings(&incoming[i + 1], &incoming[i]);
            if swapped < kept {
                items.swap(i, i + 1);
                incoming.swap(i, i + 1);
                swaps += 1;
            }
        }
    }

    swaps
}

/// Positions of each vertex within its row, indexed by vertex
fn positions(graph: &VertexGraph, row: &[VertexId]) -> Vec<usize> {
    let mut positions = vec![usize::MAX; graph.len()];
    for (position, vertex) in row.iter().enumerate() {
        positions[vertex.index()] = position;
    }
    positions
}

fn incoming_positions(
    graph: &VertexGraph,
    row: &[VertexId],
    previous: &[usize],
) -> Vec<Vec<usize>> {
    row.iter()
        .map(|&vertex| {
            graph
                .vertex(vertex)
                .incoming
                .iter()
                .map(|parent| previous[parent.index()])
                .collect()
        })
        .collect()
}

/// Total crossings between every pair of consecutive layers
pub fn count_crossings(graph: &VertexGraph, layers: &[Vec<VertexId>]) -> usize {
    layers
        .windows(2)
        .map(|pair| {
            let previous = positions(graph, &pair[0]);
            layer_crossings(&incoming_positions(graph, &pair[1], &previous))
        })
        .sum()
}

/// Order the roots so those sharing many leaves end up close together
///
/// Every leaf votes for each pair of roots it descends from. The root with
/// the most votes (then the most children) seeds the chain, then the root
/// most tied to the current front of the chain is added, alternately at
/// the front and at the back.
pub(crate) fn order_roots(graph: &VertexGraph, roots: &[VertexId]) -> Vec<VertexId> {
    if roots.len() < 2 {
        return roots.to_vec();
    }

    let rank: HashMap<VertexId, usize> =
        roots.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let mut shared = vec![vec![0usize; roots.len()]; roots.len()];

    for leaf in graph.ids().filter(|&v| graph.vertex(v).outgoing.is_empty()) {
        let ancestors = ancestor_roots(graph, leaf, &rank);
        for (i, &a) in ancestors.iter().enumerate() {
            for &b in &ancestors[i + 1..] {
                shared[a][b] += 1;
                shared[b][a] += 1;
            }
        }
    }

    let degree: Vec<usize> = roots.iter().map(|&r| graph.vertex(r).outgoing.len()).collect();
    let score: Vec<usize> = shared.iter().map(|row| row.iter().sum()).collect();

    let mut remaining: Vec<usize> = (0..roots.len()).collect();
    let mut chain = VecDeque::with_capacity(roots.len());
    let mut at_front = true;

    if let Some(seed) = best_candidate(&remaining, |r| (score[r], degree[r])) {
        chain.push_back(remaining.remove(seed));
    }
    while let Some(&front) = chain.front() {
        let Some(next) = best_candidate(&remaining, |r| (shared[front][r], degree[r])) else {
            break;
        };
        let next = remaining.remove(next);
        if at_front {
            chain.push_front(next);
        } else {
            chain.push_back(next);
        }
        at_front = !at_front;
    }

    let order: Vec<VertexId> = chain.into_iter().map(|i| roots[i]).collect();
    trace!("Root order: {order:?}");
    order
}

/// Position in `candidates` of the highest keyed one, ties go to the earlier
fn best_candidate(
    candidates: &[usize],
    key: impl Fn(usize) -> (usize, usize),
) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .max_by(|a, b| key(*a.1).cmp(&key(*b.1)).then(b.0.cmp(&a.0)))
        .map(|(i, _)| i)
}

/// Rank of every root `vertex` descends from, sorted
fn ancestor_roots(
    graph: &VertexGraph,
    vertex: VertexId,
    rank: &HashMap<VertexId, usize>,
) -> Vec<usize> {
    let mut visited = vec![false; graph.len()];
    let mut stack = vec![vertex];
    let mut found = Vec::new();
    visited[vertex.index()] = true;

    while let Some(current) = stack.pop() {
        if let Some(&r) = rank.get(&current) {
            found.push(r);
        }
        for &parent in &graph.vertex(current).incoming {
            if !visited[parent.index()] {
                visited[parent.index()] = true;
                stack.push(parent);
            }
        }
    }

    found.sort_unstable();
    found
}

/// Order the groups of every layer, the first row following `root_order`
pub(crate) fn order_groups(matrix: &mut GroupMatrix, root_order: &[VertexId], scans: usize) {
    let Some(first) = matrix.layers.first() else {
        return;
    };

    let root_rank = |group| {
        matrix
            .group(group)
            .members
            .iter()
            .filter_map(|m| root_order.iter().position(|r| r == m))
            .min()
            .unwrap_or(usize::MAX)
    };
    let mut first = first.clone();
    first.sort_by_key(|&group| root_rank(group));
    matrix.layers[0] = first;

    for layer in 1..matrix.layers.len() {
        let previous: HashMap<_, _> = matrix.layers[layer - 1]
            .iter()
            .enumerate()
            .map(|(position, &group)| (group, position))
            .collect();
        let mut row = std::mem::take(&mut matrix.layers[layer]);
        let mut incoming: Vec<Vec<usize>> = row
            .iter()
            .map(|&group| {
                matrix
                    .group(group)
                    .incoming
                    .iter()
                    .filter_map(|parent| previous.get(parent).copied())
                    .collect()
            })
            .collect();

        let swaps = reduce_adjacent(&mut row, &mut incoming, scans);
        trace!("Group layer {layer}: {swaps} swaps");
        matrix.layers[layer] = row;
    }
}

/// Flatten the ordered groups and order vertices inside each group
///
/// Returns the vertex rows and, per row, the index each group starts at.
pub(crate) fn order_vertices(
    graph: &VertexGraph,
    matrix: &GroupMatrix,
    scans: usize,
) -> (Vec<Vec<VertexId>>, Vec<Vec<usize>>) {
    let (mut layers, starts) = matrix.flatten();

    for layer in 1..layers.len() {
        let previous = positions(graph, &layers[layer - 1]);
        let mut incoming = incoming_positions(graph, &layers[layer], &previous);
        let row = &mut layers[layer];

        let bounds = &starts[layer];
        for (i, &start) in bounds.iter().enumerate() {
            let end = bounds.get(i + 1).copied().unwrap_or(row.len());
            reduce_adjacent(&mut row[start..end], &mut incoming[start..end], scans);
        }
    }

    debug!("Vertex ordering left {} crossings", count_crossings(graph, &layers));

    (layers, starts)
}
