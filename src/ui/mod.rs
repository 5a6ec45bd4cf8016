pub mod progress;

use crate::sim::NodeSnapshot;

pub fn print_banner() {
    println!("csmacd-rs");
}

/// One box per node, e.g. `[0 IDLE] [1 TX] [2 COLLISION]`.
pub fn render_nodes(nodes: &[NodeSnapshot]) -> String {
    nodes
        .iter()
        .map(|n| format!("[{} {}]", n.id, n.state))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac::NodeState;

    #[test]
    fn test_render_nodes() {
        let nodes = [
            NodeSnapshot {
                id: 0,
                state: NodeState::Idle,
            },
            NodeSnapshot {
                id: 1,
                state: NodeState::BackingOff,
            },
        ];
        assert_eq!(render_nodes(&nodes), "[0 IDLE] [1 BACKOFF]");
        assert_eq!(render_nodes(&[]), "");
    }
}
