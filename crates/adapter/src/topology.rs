use std::collections::HashMap;

use masguard_core::AgentName;

/// Derive the allowed-speaker graph per the tie-break order in §4.2:
/// explicit transitions (if the framework exposes them) beat a complete
/// graph, which beats a linear chain.
///
/// A linear chain is used for two-or-fewer agents even though a complete
/// graph would be indistinguishable in that case for >2 agents — keeping
/// this threshold rather than always preferring "complete" matches the
/// documented tie-break and is deliberately not "fixed" (§9).
#[must_use]
pub fn derive_topology(
    explicit: Option<HashMap<AgentName, Vec<AgentName>>>,
    agents: &[AgentName],
) -> HashMap<AgentName, Vec<AgentName>> {
    if let Some(explicit) = explicit {
        return explicit;
    }

    if agents.len() <= 2 {
        return chain_topology(agents);
    }

    complete_topology(agents)
}

fn complete_topology(agents: &[AgentName]) -> HashMap<AgentName, Vec<AgentName>> {
    agents
        .iter()
        .map(|a| {
            let others = agents.iter().filter(|b| *b != a).cloned().collect();
            (a.clone(), others)
        })
        .collect()
}

fn chain_topology(agents: &[AgentName]) -> HashMap<AgentName, Vec<AgentName>> {
    let mut map = HashMap::new();
    for (i, agent) in agents.iter().enumerate() {
        let mut neighbors = Vec::new();
        if let Some(prev) = i.checked_sub(1).and_then(|j| agents.get(j)) {
            neighbors.push(prev.clone());
        }
        if let Some(next) = agents.get(i + 1) {
            neighbors.push(next.clone());
        }
        map.insert(agent.clone(), neighbors);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<AgentName> {
        raw.iter().map(|s| AgentName::new(*s)).collect()
    }

    #[test]
    fn explicit_wins_regardless_of_agent_count() {
        let agents = names(&["a", "b", "c"]);
        let mut explicit = HashMap::new();
        explicit.insert(AgentName::new("a"), vec![AgentName::new("b")]);
        let topo = derive_topology(Some(explicit.clone()), &agents);
        assert_eq!(topo, explicit);
    }

    #[test]
    fn two_agents_fall_back_to_chain() {
        let agents = names(&["a", "b"]);
        let topo = derive_topology(None, &agents);
        assert_eq!(topo[&AgentName::new("a")], vec![AgentName::new("b")]);
        assert_eq!(topo[&AgentName::new("b")], vec![AgentName::new("a")]);
    }

    #[test]
    fn three_or_more_agents_are_complete() {
        let agents = names(&["a", "b", "c"]);
        let topo = derive_topology(None, &agents);
        let mut neighbors = topo[&AgentName::new("a")].clone();
        neighbors.sort();
        assert_eq!(neighbors, vec![AgentName::new("b"), AgentName::new("c")]);
    }
}
