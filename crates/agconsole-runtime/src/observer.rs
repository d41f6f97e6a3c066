use agconsole_engine::TraceUpdate;

/// Receives trace updates of a turn as they happen
pub trait TraceObserver {
    fn name(&self) -> &str;
    fn on_update(&mut self, update: &TraceUpdate);
}

/// Keeps every update, in order
#[derive(Debug, Clone, Default)]
pub struct CollectingObserver {
    updates: Vec<TraceUpdate>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> &[TraceUpdate] {
        &self.updates
    }

    pub fn into_updates(self) -> Vec<TraceUpdate> {
        self.updates
    }
}

impl TraceObserver for CollectingObserver {
    fn name(&self) -> &str {
        "collecting"
    }

    fn on_update(&mut self, update: &TraceUpdate) {
        self.updates.push(update.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agconsole_types::UsageTotals;

    #[test]
    fn test_collecting_observer_keeps_order() {
        let mut observer = CollectingObserver::new();
        observer.on_update(&TraceUpdate::RoutingStarted);
        observer.on_update(&TraceUpdate::Finished(UsageTotals::default()));

        assert_eq!(observer.name(), "collecting");
        assert_eq!(
            observer.into_updates(),
            vec![
                TraceUpdate::RoutingStarted,
                TraceUpdate::Finished(UsageTotals::default())
            ]
        );
    }
}
