use thermal_simulator::PrintSimulator;
use thermal_store::PrintStore;

/// Shared application state passed to every route handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: PrintStore,
    pub simulator: PrintSimulator,
}

impl AppState {
    /// The store is taken from the simulator so both always share one registry.
    pub fn new(simulator: PrintSimulator) -> Self {
        Self {
            store: simulator.store().clone(),
            simulator,
        }
    }
}
