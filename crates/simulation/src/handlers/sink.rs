//! Terminal departures.

use crate::event_queue::SimEvent;
use crate::{Entity, EntityId};
use flowsim_types::SinkParams;

/// One entity leaving the system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Departure {
    pub entity: EntityId,
    pub lead_time: f64,
    pub time: f64,
}

/// State of one sink node.
#[derive(Debug)]
pub struct SinkHandler {
    collect_stats: bool,
    departed: u64,
    departures: Vec<Departure>,
}

impl SinkHandler {
    pub fn new(params: &SinkParams) -> Self {
        Self {
            collect_stats: params.collect_stats,
            departed: 0,
            departures: Vec::new(),
        }
    }

    /// Record the departure of `entity`. Per-entity records are kept only
    /// when the sink collects stats.
    pub fn handle_entity_departed(&mut self, event: &SimEvent, entity: &Entity) -> f64 {
        let lead_time = event.time - entity.created_at;
        self.departed += 1;
        if self.collect_stats {
            self.departures.push(Departure {
                entity: entity.id,
                lead_time,
                time: event.time,
            });
        }
        lead_time
    }

    pub fn departure_count(&self) -> u64 {
        self.departed
    }

    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    pub fn avg_lead_time(&self) -> f64 {
        if self.departures.is_empty() {
            return 0.0;
        }
        self.departures.iter().map(|d| d.lead_time).sum::<f64>() / self.departures.len() as f64
    }

    /// `(time, cumulative departures)` at each recorded departure.
    pub fn cumulative_departures(&self) -> Vec<(f64, u64)> {
        self.departures
            .iter()
            .enumerate()
            .map(|(i, d)| (d.time, i as u64 + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_queue::EventKind;

    fn entity(seq: u64, created_at: f64) -> Entity {
        Entity {
            id: EntityId { source: 0, seq },
            created_at,
            current_node: 4,
            priority: 0,
        }
    }

    fn departed(time: f64, seq: u64) -> SimEvent {
        SimEvent::for_entity(
            time,
            EventKind::EntityDeparted,
            EntityId { source: 0, seq },
            4,
            0,
        )
    }

    #[test]
    fn test_lead_times() {
        let mut sink = SinkHandler::new(&SinkParams::default());
        assert_eq!(sink.handle_entity_departed(&departed(8.0, 1), &entity(1, 0.0)), 8.0);
        assert_eq!(sink.handle_entity_departed(&departed(9.0, 2), &entity(2, 5.0)), 4.0);

        assert_eq!(sink.departure_count(), 2);
        assert_eq!(sink.avg_lead_time(), 6.0);
        assert_eq!(sink.cumulative_departures(), vec![(8.0, 1), (9.0, 2)]);
    }

    #[test]
    fn test_no_records_without_collect_stats() {
        let mut sink = SinkHandler::new(&SinkParams {
            collect_stats: false,
        });
        sink.handle_entity_departed(&departed(3.0, 1), &entity(1, 0.0));
        assert_eq!(sink.departure_count(), 1);
        assert!(sink.departures().is_empty());
        assert_eq!(sink.avg_lead_time(), 0.0);
    }
}
