use std::sync::Mutex;

use tracing::{info, warn};

use crate::events::EngineEvent;

/// Sink for engine events. Implementations must be cheap and must not fail;
/// the engine never inspects what a sink does with an event.
pub trait Telemetry: Send + Sync {
    fn record(&self, event: &EngineEvent);
}

/// Emits every event through `tracing`. Degraded paths log at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn record(&self, event: &EngineEvent) {
        let details = event.details();
        if event.is_degraded() {
            warn!(
                engine.event = event.name(),
                engine.details = %details,
                "engine fallback"
            );
        } else {
            info!(
                engine.event = event.name(),
                engine.details = %details,
                "engine event"
            );
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn record(&self, _event: &EngineEvent) {}
}

/// Keeps events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(EngineEvent::name).collect()
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Telemetry for RecordingTelemetry {
    fn record(&self, event: &EngineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
