//! Lines (GTFS routes) and their stop sequences.

/// A line as listed by the routes endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
}

/// A line with its ordered list of stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDetail {
    pub route_id: String,
    pub route_short_name: String,
    pub route_long_name: String,
    /// Stops ordered by `stop_sequence`.
    pub stops: Vec<RouteStop>,
}

/// A stop on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_sequence: i64,
}

impl RouteDetail {
    /// Build a route detail, ordering the stops by sequence number.
    ///
    /// The sort is stable, so stops sharing a sequence number keep the order
    /// the API sent them in.
    pub fn new(
        route_id: impl Into<String>,
        route_short_name: impl Into<String>,
        route_long_name: impl Into<String>,
        mut stops: Vec<RouteStop>,
    ) -> Self {
        stops.sort_by_key(|s| s.stop_sequence);
        Self {
            route_id: route_id.into(),
            route_short_name: route_short_name.into(),
            route_long_name: route_long_name.into(),
            stops,
        }
    }

    /// The summary part of this route.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            route_id: self.route_id.clone(),
            route_short_name: self.route_short_name.clone(),
            route_long_name: self.route_long_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, seq: i64) -> RouteStop {
        RouteStop {
            stop_id: id.to_string(),
            stop_name: format!("Stop {id}"),
            stop_sequence: seq,
        }
    }

    #[test]
    fn stops_sorted_by_sequence() {
        let route = RouteDetail::new(
            "C3",
            "C3",
            "Aranjuez - Chamartín",
            vec![stop("CHAM", 3), stop("ARAN", 1), stop("SOL", 2)],
        );

        let ids: Vec<_> = route.stops.iter().map(|s| s.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["ARAN", "SOL", "CHAM"]);
    }

    #[test]
    fn summary_copies_names() {
        let route = RouteDetail::new("C3", "C3", "Aranjuez - Chamartín", vec![]);
        let summary = route.summary();
        assert_eq!(summary.route_id, "C3");
        assert_eq!(summary.route_long_name, "Aranjuez - Chamartín");
    }
}
