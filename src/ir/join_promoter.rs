//! Join-type promotion.
//!
//! A reference consumed where its absence must not drop the root row (projected
//! in SELECT, used as a GROUP BY key) needs every join that reaches it to be a
//! left outer join. If such a join's condition depends on other references,
//! those become optional too, transitively.

use std::collections::HashSet;

use super::graph::IrGraph;
use super::types::{JoinId, JoinType, RefId};

/// Upgrades to `LeftOuter` every join targeting `reference`, then every join
/// targeting a reference those joins' conditions depend on, and so on.
///
/// The target of a join is never re-queued from its own condition. Returns the
/// number of joins whose kind changed; promoting again returns 0.
pub fn update_join_type(graph: &mut IrGraph, reference: RefId) -> usize {
    let mut pending = vec![reference];
    let mut visited = HashSet::new();
    let mut promoted = 0;

    while let Some(current) = pending.pop() {
        if !visited.insert(current) {
            continue;
        }
        let Some(owner) = graph[current].owner_select() else {
            log::warn!(
                "Join promotion requested for detached {}",
                graph.describe_reference(current)
            );
            continue;
        };

        let targeting: Vec<JoinId> = graph[owner]
            .joins()
            .iter()
            .copied()
            .filter(|j| graph[*j].target() == current)
            .collect();

        for join_id in targeting {
            let join = &mut graph[join_id];
            if join.kind != JoinType::LeftOuter {
                join.kind = JoinType::LeftOuter;
                promoted += 1;
                log::debug!("Promoted {} to left outer join", join_id);
            }
            let target = join.target;
            pending.extend(
                join.condition
                    .references()
                    .into_iter()
                    .filter(|r| *r != target && !visited.contains(r)),
            );
        }
    }

    promoted
}
