use flowtab::core::{PortSpec, PortTag};
use flowtab::graph::{GraphContext, LivePort, PortDirection, PortId};
use flowtab::reconcile::update_ports;

#[derive(Default)]
struct MockGraph {
    disconnected: Vec<PortId>,
}

impl GraphContext for MockGraph {
    fn graph_id(&self) -> &str {
        "test_graph"
    }

    fn disconnect(&mut self, ports: &[PortId]) {
        self.disconnected.extend_from_slice(ports);
    }
}

fn stream_port(direction: PortDirection, index: usize, tag: PortTag, width: u32) -> LivePort {
    LivePort::from_spec(direction, &PortSpec::stream(index, tag, width))
}

#[test]
fn test_compatible_port_is_reused() {
    let port = stream_port(PortDirection::Sink, 0, PortTag::Complex, 1);
    let id = port.id;
    let mut live = vec![port];
    let mut graph = MockGraph::default();

    update_ports(
        &mut live,
        &[PortSpec::stream(0, PortTag::Complex, 1)],
        PortDirection::Sink,
        &mut graph,
    );

    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, id);
    assert!(graph.disconnected.is_empty());
}

#[test]
fn test_width_change_replaces_port() {
    let port = stream_port(PortDirection::Sink, 0, PortTag::Complex, 1);
    let id = port.id;
    let mut live = vec![port];
    let mut graph = MockGraph::default();

    update_ports(
        &mut live,
        &[PortSpec::stream(0, PortTag::Complex, 4)],
        PortDirection::Sink,
        &mut graph,
    );

    assert_eq!(live.len(), 1);
    assert_ne!(live[0].id, id);
    assert_eq!(live[0].width, 4);
    assert_eq!(graph.disconnected, vec![id]);
}

#[test]
fn test_type_change_replaces_port() {
    let port = stream_port(PortDirection::Source, 0, PortTag::Complex, 1);
    let id = port.id;
    let mut live = vec![port];
    let mut graph = MockGraph::default();

    update_ports(
        &mut live,
        &[PortSpec::stream(0, PortTag::Float, 1)],
        PortDirection::Source,
        &mut graph,
    );

    assert_ne!(live[0].id, id);
    assert_eq!(graph.disconnected, vec![id]);
}

#[test]
fn test_message_port_matches_by_name() {
    let port = LivePort::from_spec(PortDirection::Sink, &PortSpec::message("command"));
    let id = port.id;
    let mut live = vec![port];
    let mut graph = MockGraph::default();

    update_ports(
        &mut live,
        &[PortSpec::message("command")],
        PortDirection::Sink,
        &mut graph,
    );
    assert_eq!(live[0].id, id);

    update_ports(
        &mut live,
        &[PortSpec::message("commands")],
        PortDirection::Sink,
        &mut graph,
    );
    assert_ne!(live[0].id, id);
    assert_eq!(live[0].name, "commands");
    assert!(live[0].optional);
    assert_eq!(graph.disconnected, vec![id]);
}

#[test]
fn test_growth_keeps_existing_port() {
    let port = stream_port(PortDirection::Source, 0, PortTag::Float, 1);
    let id = port.id;
    let mut live = vec![port];
    let mut graph = MockGraph::default();

    update_ports(
        &mut live,
        &[
            PortSpec::stream(0, PortTag::Float, 1),
            PortSpec::stream(1, PortTag::Float, 1),
        ],
        PortDirection::Source,
        &mut graph,
    );

    assert_eq!(live.len(), 2);
    assert_eq!(live[0].id, id);
    assert_eq!(live[1].name, "out1");
    assert!(graph.disconnected.is_empty());
}

#[test]
fn test_shrink_disconnects_excess_ports() {
    let keep = stream_port(PortDirection::Sink, 0, PortTag::Int, 1);
    let drop = stream_port(PortDirection::Sink, 1, PortTag::Int, 1);
    let keep_id = keep.id;
    let drop_id = drop.id;
    let mut live = vec![keep, drop];
    let mut graph = MockGraph::default();

    update_ports(
        &mut live,
        &[PortSpec::stream(0, PortTag::Int, 1)],
        PortDirection::Sink,
        &mut graph,
    );

    assert_eq!(live.len(), 1);
    assert_eq!(live[0].id, keep_id);
    assert_eq!(graph.disconnected, vec![drop_id]);
}

#[test]
fn test_clearing_all_ports() {
    let port = stream_port(PortDirection::Sink, 0, PortTag::Short, 1);
    let id = port.id;
    let mut live = vec![port];
    let mut graph = MockGraph::default();

    update_ports(&mut live, &[], PortDirection::Sink, &mut graph);

    assert!(live.is_empty());
    assert_eq!(graph.disconnected, vec![id]);
}

#[test]
fn test_generated_stream_names() {
    let mut live = Vec::new();
    let mut graph = MockGraph::default();

    update_ports(
        &mut live,
        &[
            PortSpec::stream(0, PortTag::Byte, 1),
            PortSpec::stream(1, PortTag::Byte, 2),
        ],
        PortDirection::Sink,
        &mut graph,
    );

    assert_eq!(live[0].name, "in0");
    assert!(!live[0].optional);
    assert_eq!(live[1].name, "in1");
    assert_eq!(live[1].width, 2);
}

#[test]
fn test_incompatible_first_port_blocks_later_reuse() {
    // the cursor never advances past a port that was not reused, so a
    // changed first port forces replacement of everything behind it
    let first = stream_port(PortDirection::Sink, 0, PortTag::Float, 1);
    let second = stream_port(PortDirection::Sink, 1, PortTag::Complex, 1);
    let first_id = first.id;
    let second_id = second.id;
    let mut live = vec![first, second];
    let mut graph = MockGraph::default();

    update_ports(
        &mut live,
        &[
            PortSpec::stream(0, PortTag::Complex, 1),
            PortSpec::stream(1, PortTag::Complex, 1),
        ],
        PortDirection::Sink,
        &mut graph,
    );

    assert_eq!(live.len(), 2);
    assert_ne!(live[0].id, first_id);
    assert_ne!(live[1].id, second_id);
    assert_eq!(graph.disconnected, vec![first_id, second_id]);
}
