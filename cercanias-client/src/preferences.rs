//! Persisted user preferences.
//!
//! The default station pair is stored as a single named JSON blob in a
//! key-value store and read at startup to pre-populate the next-train query.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::DEFAULT_MINUTES_TO_STATION;

/// Store key of the default station pair.
pub const DEFAULT_STATIONS_KEY: &str = "userDefaultStations";

/// Store key of the user's travel time to the station, in minutes.
pub const MINUTES_TO_STATION_KEY: &str = "averageTimeToStation";

/// The user's saved departure and arrival stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultStations {
    pub departure_station_id: String,
    pub departure_station_name: String,
    pub arrival_station_id: String,
    pub arrival_station_name: String,
}

/// Errors writing preferences.
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preferences encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value storage for user preferences.
///
/// Reads never fail: missing or undecodable values read as absent.
pub trait PreferencesStore {
    fn default_stations(&self) -> Option<DefaultStations>;

    fn save_default_stations(&self, stations: &DefaultStations) -> Result<(), PreferencesError>;

    fn has_default_stations(&self) -> bool;

    fn clear_default_stations(&self) -> Result<(), PreferencesError>;

    /// Minutes the user needs to reach the station; 15 if never set.
    fn minutes_to_station(&self) -> i64;

    fn set_minutes_to_station(&self, minutes: i64) -> Result<(), PreferencesError>;
}

/// Preferences kept in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the preferences file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole key-value map. A missing or corrupt file is empty.
    fn load_map(&self) -> BTreeMap<String, Value> {
        let Ok(contents) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            debug!(path = %self.path.display(), error = %e, "ignoring unreadable preferences");
            BTreeMap::new()
        })
    }

    /// Write the whole map, creating parent directories if needed.
    fn store_map(&self, map: &BTreeMap<String, Value>) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn update(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Value>) -> Result<(), PreferencesError>,
    ) -> Result<(), PreferencesError> {
        let mut map = self.load_map();
        f(&mut map)?;
        self.store_map(&map)
    }
}

impl PreferencesStore for JsonFilePreferences {
    fn default_stations(&self) -> Option<DefaultStations> {
        let value = self.load_map().remove(DEFAULT_STATIONS_KEY)?;
        serde_json::from_value(value).ok()
    }

    fn save_default_stations(&self, stations: &DefaultStations) -> Result<(), PreferencesError> {
        self.update(|map| {
            map.insert(
                DEFAULT_STATIONS_KEY.to_string(),
                serde_json::to_value(stations)?,
            );
            Ok(())
        })
    }

    fn has_default_stations(&self) -> bool {
        self.load_map().contains_key(DEFAULT_STATIONS_KEY)
    }

    fn clear_default_stations(&self) -> Result<(), PreferencesError> {
        self.update(|map| {
            map.remove(DEFAULT_STATIONS_KEY);
            Ok(())
        })
    }

    fn minutes_to_station(&self) -> i64 {
        self.load_map()
            .get(MINUTES_TO_STATION_KEY)
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_MINUTES_TO_STATION)
    }

    fn set_minutes_to_station(&self, minutes: i64) -> Result<(), PreferencesError> {
        self.update(|map| {
            map.insert(MINUTES_TO_STATION_KEY.to_string(), Value::from(minutes));
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sol_to_chamartin() -> DefaultStations {
        DefaultStations {
            departure_station_id: "SOL".to_string(),
            departure_station_name: "Madrid-Sol".to_string(),
            arrival_station_id: "CHAM".to_string(),
            arrival_station_name: "Chamartín".to_string(),
        }
    }

    #[test]
    fn save_and_load_default_stations() {
        let dir = tempdir().unwrap();
        let prefs = JsonFilePreferences::new(dir.path().join("prefs.json"));

        assert!(!prefs.has_default_stations());
        prefs.save_default_stations(&sol_to_chamartin()).unwrap();

        assert!(prefs.has_default_stations());
        assert_eq!(prefs.default_stations(), Some(sol_to_chamartin()));
    }

    #[test]
    fn blob_uses_camel_case_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        let prefs = JsonFilePreferences::new(&path);
        prefs.save_default_stations(&sol_to_chamartin()).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[DEFAULT_STATIONS_KEY]["departureStationName"], "Madrid-Sol");
        assert_eq!(raw[DEFAULT_STATIONS_KEY]["arrivalStationId"], "CHAM");
    }

    #[test]
    fn clear_default_stations() {
        let dir = tempdir().unwrap();
        let prefs = JsonFilePreferences::new(dir.path().join("prefs.json"));
        prefs.save_default_stations(&sol_to_chamartin()).unwrap();
        prefs.set_minutes_to_station(20).unwrap();

        prefs.clear_default_stations().unwrap();

        assert!(!prefs.has_default_stations());
        assert!(prefs.default_stations().is_none());
        // Other keys survive
        assert_eq!(prefs.minutes_to_station(), 20);
    }

    #[test]
    fn minutes_to_station_defaults_to_fifteen() {
        let dir = tempdir().unwrap();
        let prefs = JsonFilePreferences::new(dir.path().join("prefs.json"));
        assert_eq!(prefs.minutes_to_station(), 15);

        prefs.set_minutes_to_station(5).unwrap();
        assert_eq!(prefs.minutes_to_station(), 5);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let prefs = JsonFilePreferences::new("/nonexistent/path/prefs.json");
        assert!(prefs.default_stations().is_none());
        assert!(!prefs.has_default_stations());
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let prefs = JsonFilePreferences::new(&path);

        assert!(prefs.default_stations().is_none());
        prefs.save_default_stations(&sol_to_chamartin()).unwrap();
        assert_eq!(prefs.default_stations(), Some(sol_to_chamartin()));
    }

    #[test]
    fn undecodable_blob_reads_as_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"userDefaultStations": {"departureStationId": 1}}"#).unwrap();
        let prefs = JsonFilePreferences::new(&path);

        assert!(prefs.has_default_stations());
        assert!(prefs.default_stations().is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("prefs.json");
        let prefs = JsonFilePreferences::new(&path);

        prefs.save_default_stations(&sol_to_chamartin()).unwrap();
        assert!(path.exists());
    }
}
