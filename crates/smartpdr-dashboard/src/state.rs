use chrono::{DateTime, Utc};
use smartpdr_advisor::StrategyReport;
use smartpdr_core::{
    ClassifiedInventoryRecord, LoadEvent, LoadSource, PdrPolicy, RawInventoryRecord,
};
use smartpdr_engine::classify;

/// The working record set of one dashboard session.
///
/// Built off-lock by [`DashboardState::load`] and swapped in whole, so
/// readers never observe raw and classified records from different loads.
#[derive(Debug, Clone)]
pub struct DashboardState {
    raw: Vec<RawInventoryRecord>,
    classified: Vec<ClassifiedInventoryRecord>,
    last_load: LoadEvent,
    last_strategy: Option<StrategyReport>,
}

impl DashboardState {
    pub fn load(
        records: Vec<RawInventoryRecord>,
        source: LoadSource,
        policy: &PdrPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let classified = classify(&records, policy, now);
        let last_load = LoadEvent::new(source, records.len(), now);
        Self {
            raw: records,
            classified,
            last_load,
            last_strategy: None,
        }
    }

    pub fn raw(&self) -> &[RawInventoryRecord] {
        &self.raw
    }

    /// Records in ranking order.
    pub fn classified(&self) -> &[ClassifiedInventoryRecord] {
        &self.classified
    }

    pub fn last_load(&self) -> &LoadEvent {
        &self.last_load
    }

    pub fn last_strategy(&self) -> Option<&StrategyReport> {
        self.last_strategy.as_ref()
    }

    pub fn record_strategy(&mut self, report: StrategyReport) {
        self.last_strategy = Some(report);
    }

    pub fn find(&self, sku: &str) -> Option<&ClassifiedInventoryRecord> {
        self.classified.iter().find(|record| record.id() == sku)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use smartpdr_core::sample_records;

    use super::*;

    #[test]
    fn load_classifies_and_records_the_event() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let state = DashboardState::load(
            sample_records(),
            LoadSource::Sample,
            &PdrPolicy::default(),
            now,
        );

        assert_eq!(state.raw().len(), state.classified().len());
        assert_eq!(state.last_load().source, LoadSource::Sample);
        assert_eq!(state.last_load().record_count, state.raw().len());
        assert_eq!(state.last_load().occurred_at, now);
        assert!(state.last_strategy().is_none());
        assert!(state.find("SKU-003").is_some());
        assert!(state.find("nope").is_none());
    }
}
