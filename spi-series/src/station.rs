use crate::observation::Observation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A precipitation measuring station found in the input records.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Station identifier as it appears in the input CSV
    pub station_id: String,
    /// Latitude in decimal degrees
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    pub longitude: Option<f64>,
}

impl Station {
    /// Collect the distinct stations in order of first appearance.
    ///
    /// Coordinates are taken from the first record of each station.
    /// Records without a station id are ignored.
    pub fn collect_stations(observations: &[Observation]) -> Vec<Station> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stations = Vec::new();
        for obs in observations {
            let Some(station_id) = obs.station_id.as_deref() else {
                continue;
            };
            if seen.insert(station_id) {
                stations.push(Station {
                    station_id: station_id.to_string(),
                    latitude: obs.latitude,
                    longitude: obs.longitude,
                });
            }
        }
        stations
    }
}
