//! High-level service running configured lookups across weeks.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError, Locations};
use crate::date::ApiDate;
use crate::filter::filter_available_centers;
use crate::merge::merge_into;
use crate::model::CenterMap;
use crate::ports::SlotPort;

/// Public entry point for checking vaccination slots.
pub struct SlotService {
    port: Arc<dyn SlotPort>,
}

impl SlotService {
    /// Create a new service bound to the provided backend.
    #[must_use]
    pub fn new(port: Arc<dyn SlotPort>) -> Self {
        Self { port }
    }

    /// Query every configured location for the week starting at `date` and merge the answers.
    pub async fn check_week(&self, date: NaiveDate, locations: &Locations) -> CenterMap {
        let date_str = date.to_api_date();
        info!("Checking available slots for date {date_str}");

        let mut centers = CenterMap::new();
        for query in locations.queries() {
            let found = self.port.lookup(&date_str, &query).await;
            debug!("{} centers found for {query} on {date_str}", found.len());
            merge_into(&mut centers, found);
        }
        centers
    }

    /// Query `weeks` consecutive weeks starting at `start` (at least one) and merge everything.
    pub async fn check_weeks(
        &self,
        start: NaiveDate,
        weeks: u32,
        locations: &Locations,
    ) -> CenterMap {
        let mut centers = CenterMap::new();
        for offset in 0..weeks.max(1) {
            let Some(date) = start.checked_add_days(Days::new(7 * u64::from(offset))) else {
                warn!("Week {offset} after {start} is out of range, stopping");
                break;
            };
            let this_week = self.check_week(date, locations).await;
            merge_into(&mut centers, this_week);
        }
        centers
    }

    /// Run the lookups described by `config` from `today` and apply its filters, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLocations`] when the configuration has no locations.
    pub async fn available_centers(
        &self,
        today: NaiveDate,
        config: &Config,
    ) -> Result<CenterMap, ConfigError> {
        let locations = config.locations()?;

        info!("Checking API for available centers...");
        let centers = self
            .check_weeks(today, config.weeks_to_check(), locations)
            .await;

        if let Some(filters) = &config.filters {
            info!("Filtering centers according to info");
            Ok(filter_available_centers(&centers, filters))
        } else {
            warn!("No \"filters\" field found in config");
            Ok(centers)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use crate::model::{CenterRecord, LocationQuery};

    #[derive(Default)]
    struct FakePort {
        by_pincode: CenterMap,
        by_district: CenterMap,
        by_center: Option<CenterRecord>,
        calls: Mutex<Vec<String>>,
    }

    impl FakePort {
        fn record(&self, date: &str, query: &LocationQuery) {
            self.calls
                .lock()
                .expect("calls lock")
                .push(format!("{date} {query}"));
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl SlotPort for FakePort {
        async fn by_pincode(&self, date: &str, pincode: &str) -> CenterMap {
            self.record(date, &LocationQuery::Pincode(pincode.to_owned()));
            self.by_pincode.clone()
        }

        async fn by_district(&self, date: &str, district_id: i64) -> CenterMap {
            self.record(date, &LocationQuery::District(district_id));
            self.by_district.clone()
        }

        async fn by_center(&self, date: &str, center_id: i64) -> Option<CenterRecord> {
            self.record(date, &LocationQuery::Center(center_id));
            self.by_center.clone()
        }
    }

    fn center(value: Value) -> CenterRecord {
        serde_json::from_value(value).expect("valid center")
    }

    fn single(value: Value) -> CenterMap {
        let record = center(value);
        CenterMap::from([(record.center_id().expect("test center has an id"), record)])
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 5, 1).expect("valid date")
    }

    fn config(value: Value) -> Config {
        serde_json::from_value(value).expect("valid config")
    }

    #[tokio::test]
    async fn every_location_is_queried_once_per_week() {
        let port = Arc::new(FakePort::default());
        let service = SlotService::new(Arc::<FakePort>::clone(&port));
        let locations = Locations {
            pincodes: vec!["110001".to_owned()],
            district_ids: vec![141],
            center_ids: vec![5],
        };

        let _centers = service.check_weeks(start(), 2, &locations).await;

        assert_eq!(
            port.calls(),
            vec![
                "01-05-2021 PIN code '110001'",
                "01-05-2021 district ID 141",
                "01-05-2021 center ID 5",
                "08-05-2021 PIN code '110001'",
                "08-05-2021 district ID 141",
                "08-05-2021 center ID 5",
            ],
            "one call per location per week"
        );
    }

    #[tokio::test]
    async fn zero_weeks_still_checks_the_current_week() {
        let port = Arc::new(FakePort::default());
        let service = SlotService::new(Arc::<FakePort>::clone(&port));
        let locations = Locations {
            district_ids: vec![1],
            ..Locations::default()
        };

        let _centers = service.check_weeks(start(), 0, &locations).await;

        assert_eq!(port.calls().len(), 1, "one week checked");
    }

    #[tokio::test]
    async fn center_lookup_is_keyed_by_configured_id_and_merged() {
        let port = Arc::new(FakePort {
            by_district: single(json!({
                "center_id": 5,
                "sessions": [{"session_id": "a", "available_capacity": 1}]
            })),
            by_center: Some(center(json!({
                "center_id": 5,
                "sessions": [
                    {"session_id": "a", "available_capacity": 1},
                    {"session_id": "b", "available_capacity": 2}
                ]
            }))),
            ..FakePort::default()
        });
        let service = SlotService::new(port);
        let locations = Locations {
            district_ids: vec![1],
            center_ids: vec![5],
            ..Locations::default()
        };

        let centers = service.check_week(start(), &locations).await;

        assert_eq!(
            centers.get(&5).and_then(CenterRecord::sessions).map(<[_]>::len),
            Some(2),
            "sessions unioned"
        );
    }

    #[tokio::test]
    async fn overlapping_results_are_merged_then_filtered() {
        let port = Arc::new(FakePort {
            by_pincode: single(json!({
                "center_id": 1,
                "sessions": [{"session_id": "A", "available_capacity": 5}]
            })),
            by_district: single(json!({
                "center_id": 1,
                "sessions": [
                    {"session_id": "A", "available_capacity": 5},
                    {"session_id": "B", "available_capacity": 0}
                ]
            })),
            ..FakePort::default()
        });
        let service = SlotService::new(port);

        let centers = service
            .available_centers(
                start(),
                &config(json!({
                    "locations": {"pincodes": ["110001"], "district_ids": [141]},
                    "filters": {}
                })),
            )
            .await
            .expect("locations configured");

        let record = centers.get(&1).expect("center kept");
        assert_eq!(record.sessions().map(<[_]>::len), Some(1), "only A has capacity");
    }

    #[tokio::test]
    async fn without_filters_the_merged_map_is_returned() {
        let port = Arc::new(FakePort {
            by_district: single(json!({
                "center_id": 2,
                "sessions": [{"session_id": "full", "available_capacity": 0}]
            })),
            ..FakePort::default()
        });
        let service = SlotService::new(port);

        let centers = service
            .available_centers(start(), &config(json!({"locations": {"district_ids": [1]}})))
            .await
            .expect("locations configured");

        assert!(centers.contains_key(&2), "fully booked center kept");
    }

    #[tokio::test]
    async fn unfiltered_results_keep_records_as_received() {
        let received = json!({
            "center_id": 1,
            "fee_type": null,
            "sessions": [
                {"session_id": "a", "available_capacity": 5},
                {"session_id": "b", "available_capacity": 5.0, "vaccine": "COVAXIN"}
            ]
        });
        let port = Arc::new(FakePort {
            by_pincode: single(received.clone()),
            ..FakePort::default()
        });
        let service = SlotService::new(port);

        let centers = service
            .available_centers(start(), &config(json!({"locations": {"pincodes": ["110001"]}})))
            .await
            .expect("locations configured");

        assert_eq!(
            serde_json::to_value(centers.get(&1).expect("center kept"))
                .expect("center should encode"),
            received,
            "no session or field lost"
        );
    }

    #[tokio::test]
    async fn missing_locations_are_reported() {
        let port = Arc::new(FakePort::default());
        let service = SlotService::new(Arc::<FakePort>::clone(&port));

        let result = service
            .available_centers(start(), &config(json!({"weeks": 3})))
            .await;

        assert!(
            matches!(result, Err(ConfigError::MissingLocations)),
            "locations required"
        );
        assert!(port.calls().is_empty(), "nothing queried");
    }
}
