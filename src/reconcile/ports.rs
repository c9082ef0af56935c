use tracing::debug;

use crate::core::PortSpec;
use crate::graph::{GraphContext, LivePort, PortDirection, PortId};

/// Merge a block's live port list with a freshly extracted spec list.
///
/// Two-pointer walk over both ordered lists: the cursor into the old
/// list only advances past a port when that port is reused for the
/// current spec (see `LivePort::satisfies`). Reused ports keep their
/// identity and wiring; every other spec gets a newly synthesized port.
/// Old ports never reused lose their connections and are dropped.
pub fn update_ports(
    live: &mut Vec<LivePort>,
    specs: &[PortSpec],
    direction: PortDirection,
    graph: &mut dyn GraphContext,
) {
    let mut old: Vec<Option<LivePort>> = live.drain(..).map(Some).collect();
    let mut cursor = 0;
    let mut rebuilt = Vec::with_capacity(specs.len());
    for spec in specs {
        match old.get_mut(cursor) {
            Some(slot) if slot.as_ref().is_some_and(|port| port.satisfies(spec)) => {
                rebuilt.extend(slot.take());
                cursor += 1;
            }
            _ => rebuilt.push(LivePort::from_spec(direction, spec)),
        }
    }

    let removed: Vec<PortId> = old.into_iter().flatten().map(|port| port.id).collect();
    if !removed.is_empty() {
        debug!(
            count = removed.len(),
            ?direction,
            "severing connections of replaced ports"
        );
        graph.disconnect(&removed);
    }
    *live = rebuilt;
}
