use std::collections::HashMap;

/// The four remote calls a session can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    Submit,
    RemoveOne,
    RemoveAll,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Load => "Loading documents",
            Operation::Submit => "Uploading files",
            Operation::RemoveOne => "Deleting document",
            Operation::RemoveAll => "Deleting all documents",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    InFlight,
    Synced,
    Failed,
}

/// Per-operation progress. Calls of the same kind may overlap, so in-flight
/// calls are counted rather than flagged.
#[derive(Debug, Clone, Default)]
pub struct OperationTracker {
    in_flight: HashMap<Operation, usize>,
    outcomes: HashMap<Operation, SyncPhase>,
}

impl OperationTracker {
    pub fn begin(&mut self, operation: Operation) {
        *self.in_flight.entry(operation).or_insert(0) += 1;
    }

    pub fn finish(&mut self, operation: Operation, succeeded: bool) {
        if let Some(count) = self.in_flight.get_mut(&operation) {
            *count = count.saturating_sub(1);
        }
        let outcome = if succeeded {
            SyncPhase::Synced
        } else {
            SyncPhase::Failed
        };
        self.outcomes.insert(operation, outcome);
    }

    pub fn phase(&self, operation: Operation) -> SyncPhase {
        if self.in_flight_count(operation) > 0 {
            return SyncPhase::InFlight;
        }
        self.outcomes
            .get(&operation)
            .copied()
            .unwrap_or(SyncPhase::Idle)
    }

    /// Returns a settled operation to `Idle`. No effect while calls are
    /// still in flight.
    pub fn acknowledge(&mut self, operation: Operation) {
        if self.in_flight_count(operation) == 0 {
            self.outcomes.remove(&operation);
        }
    }

    pub fn in_flight_count(&self, operation: Operation) -> usize {
        self.in_flight.get(&operation).copied().unwrap_or(0)
    }

    pub fn any_in_flight(&self) -> bool {
        self.in_flight.values().any(|count| *count > 0)
    }

    pub fn get_status_text(&self) -> String {
        let busy: Vec<String> = [
            Operation::Load,
            Operation::Submit,
            Operation::RemoveOne,
            Operation::RemoveAll,
        ]
        .into_iter()
        .filter_map(|operation| match self.in_flight_count(operation) {
            0 => None,
            1 => Some(format!("⏳ {}", operation.label())),
            n => Some(format!("⏳ {} ({})", operation.label(), n)),
        })
        .collect();

        busy.join(" | ")
    }
}
