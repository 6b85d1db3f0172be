//! Distance command - great-circle distance between two points.

use ridetrack::geo::{haversine_miles, Coordinate};

use crate::error::CliError;

/// Run the distance command.
pub fn run(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<(), CliError> {
    println!("{}", format_distance(lat1, lng1, lat2, lng2)?);
    Ok(())
}

fn format_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> Result<String, CliError> {
    let a = Coordinate::validated(lat1, lng1)?;
    let b = Coordinate::validated(lat2, lng2)?;
    Ok(format!("{:.2} miles", haversine_miles(a, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(
            format_distance(32.7767, -96.7970, 32.80, -96.75).unwrap(),
            "3.17 miles"
        );
        assert_eq!(format_distance(10.0, 10.0, 10.0, 10.0).unwrap(), "0.00 miles");
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(format_distance(91.0, 0.0, 0.0, 0.0).is_err());
        assert!(format_distance(0.0, 0.0, 0.0, 181.0).is_err());
    }
}
