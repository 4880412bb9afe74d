//! Stations (GTFS stops).

use std::fmt;

/// A stop served by Cercanías trains.
///
/// Coordinates are kept exactly as the API sent them (strings); use
/// [`Station::coordinates`] for numeric values.
#[derive(Clone, PartialEq, Eq)]
pub struct Station {
    stop_id: String,
    stop_name: String,
    stop_lat: String,
    stop_lon: String,
}

impl Station {
    /// Create a new station.
    pub fn new(
        stop_id: impl Into<String>,
        stop_name: impl Into<String>,
        stop_lat: impl Into<String>,
        stop_lon: impl Into<String>,
    ) -> Self {
        Self {
            stop_id: stop_id.into(),
            stop_name: stop_name.into(),
            stop_lat: stop_lat.into(),
            stop_lon: stop_lon.into(),
        }
    }

    /// GTFS stop id, e.g. "05291" or "MADP".
    pub fn stop_id(&self) -> &str {
        &self.stop_id
    }

    /// Human-readable name. Timetable queries are made by name.
    pub fn stop_name(&self) -> &str {
        &self.stop_name
    }

    pub fn stop_lat(&self) -> &str {
        &self.stop_lat
    }

    pub fn stop_lon(&self) -> &str {
        &self.stop_lon
    }

    /// Latitude and longitude in degrees, if both parse and are in range.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat: f64 = self.stop_lat.trim().parse().ok()?;
        let lon: f64 = self.stop_lon.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some((lat, lon))
    }
}

impl fmt::Debug for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Station({} {})", self.stop_id, self.stop_name)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stop_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_parse() {
        let s = Station::new("05291", "A Caridá", "43.547074", "-6.827541");
        let (lat, lon) = s.coordinates().unwrap();
        assert!((lat - 43.547074).abs() < 1e-9);
        assert!((lon + 6.827541).abs() < 1e-9);
    }

    #[test]
    fn coordinates_reject_garbage() {
        assert!(Station::new("X", "X", "", "-3.7").coordinates().is_none());
        assert!(Station::new("X", "X", "north", "-3.7").coordinates().is_none());
        assert!(Station::new("X", "X", "91.0", "-3.7").coordinates().is_none());
    }

    #[test]
    fn display_and_debug() {
        let s = Station::new("SOL", "Madrid-Sol", "40.417", "-3.703");
        assert_eq!(s.to_string(), "Madrid-Sol");
        assert_eq!(format!("{s:?}"), "Station(SOL Madrid-Sol)");
    }
}
