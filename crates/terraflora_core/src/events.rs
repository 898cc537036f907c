use crate::map::Map;
use terraflora_data::Season;

/// Notifications a simulation publishes between phases of generation and
/// stepping. Day and season changes are edge-triggered.
#[derive(Debug, Clone, Copy)]
pub enum SimEvent<'a> {
    MapGenerated { map: &'a Map },
    DayChanged { day: u64, year: u64 },
    SeasonChanged { season: Season },
}

impl SimEvent<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::MapGenerated { .. } => "map_generated",
            SimEvent::DayChanged { .. } => "day_changed",
            SimEvent::SeasonChanged { .. } => "season_changed",
        }
    }
}

/// Event handler type
pub type EventHandler = Box<dyn Fn(&SimEvent<'_>)>;

/// Fan-out of simulation events to any number of subscribers, in
/// subscription order.
pub struct EventBus {
    handlers: Vec<EventHandler>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            handlers: Vec::with_capacity(4),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&SimEvent<'_>) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn publish(&self, event: &SimEvent<'_>) {
        for handler in &self.handlers {
            handler(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}
