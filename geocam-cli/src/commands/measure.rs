//! Bearing and distance between two points.

use geocam::geo::{
    check_coordinate, compass_point, distance_m, distance_nm, initial_bearing, LngLat,
};

use crate::error::CliError;

/// A pair of points given on the command line as lat/lon.
#[derive(Debug, Clone, Copy)]
pub struct Leg {
    pub from: LngLat,
    pub to: LngLat,
}

impl Leg {
    pub fn new(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<Self, CliError> {
        check_coordinate(lat1, lon1)?;
        check_coordinate(lat2, lon2)?;
        Ok(Self {
            from: LngLat::new(lon1, lat1),
            to: LngLat::new(lon2, lat2),
        })
    }

    pub fn bearing(&self) -> f64 {
        initial_bearing(self.from.lat, self.from.lon, self.to.lat, self.to.lon)
    }
}

pub fn bearing_report(leg: &Leg) -> String {
    let bearing = leg.bearing();
    format!("{:.1}° {}", bearing, compass_point(bearing))
}

pub fn distance_report(leg: &Leg) -> String {
    let meters = distance_m(leg.from, leg.to);
    let nautical = distance_nm(leg.from, leg.to);
    if meters < 1_000.0 {
        format!("{:.1} m ({:.3} NM)", meters, nautical)
    } else {
        format!("{:.3} km ({:.2} NM)", meters / 1_000.0, nautical)
    }
}

pub fn run_bearing(leg: Leg) -> Result<(), CliError> {
    println!("{}", bearing_report(&leg));
    Ok(())
}

pub fn run_distance(leg: Leg) -> Result<(), CliError> {
    println!("{}", distance_report(&leg));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearing_east() {
        let leg = Leg::new(0.0, 0.0, 0.0, 1.0).unwrap();
        assert_eq!(bearing_report(&leg), "90.0° E");
    }

    #[test]
    fn test_distance_one_degree_of_latitude() {
        let leg = Leg::new(0.0, 0.0, 1.0, 0.0).unwrap();
        let report = distance_report(&leg);
        assert!(report.starts_with("111.19"), "got {}", report);
        assert!(report.contains("NM"));
    }

    #[test]
    fn test_short_distance_in_meters() {
        let leg = Leg::new(41.0, 29.0, 41.0001, 29.0).unwrap();
        assert!(distance_report(&leg).contains(" m "));
    }

    #[test]
    fn test_invalid_leg() {
        assert!(Leg::new(0.0, 0.0, 0.0, 200.0).is_err());
    }
}
