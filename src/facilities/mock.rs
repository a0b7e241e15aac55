//! Built-in places used when no place source answers.

use super::{HealthcarePlace, Location, SearchArea};
use crate::models::enums::FacilityCategory;

/// Rough metres per degree, applied to both axes.
const METRES_PER_DEGREE: f64 = 111_000.0;

fn mock_places() -> Vec<HealthcarePlace> {
    vec![
        HealthcarePlace {
            id: 1,
            name: "City General Hospital".into(),
            address: "123 Main St, Downtown".into(),
            category: FacilityCategory::Hospital,
            lat: 40.7589,
            lon: -73.9851,
            phone: Some("+1-555-0123".into()),
            website: Some("https://citygeneralhospital.com".into()),
            opening_hours: Some("24/7".into()),
            distance_m: None,
        },
        HealthcarePlace {
            id: 2,
            name: "HealthPlus Pharmacy".into(),
            address: "456 Oak Ave, Midtown".into(),
            category: FacilityCategory::Pharmacy,
            lat: 40.7614,
            lon: -73.9776,
            phone: Some("+1-555-0456".into()),
            website: None,
            opening_hours: Some("Mon-Fri: 8AM-10PM, Sat-Sun: 9AM-8PM".into()),
            distance_m: None,
        },
        HealthcarePlace {
            id: 3,
            name: "Family Care Clinic".into(),
            address: "789 Pine St, Uptown".into(),
            category: FacilityCategory::Clinic,
            lat: 40.7505,
            lon: -73.9934,
            phone: Some("+1-555-0789".into()),
            website: None,
            opening_hours: Some("Mon-Fri: 8AM-6PM, Sat: 9AM-2PM".into()),
            distance_m: None,
        },
    ]
}

/// Planar distance in metres. Good enough for a demo list.
pub fn approximate_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    ((lat1 - lat2).powi(2) + (lon1 - lon2).powi(2)).sqrt() * METRES_PER_DEGREE
}

/// Mock places within the search radius, with distances filled in.
pub fn mock_nearby(area: &SearchArea) -> Vec<HealthcarePlace> {
    mock_places()
        .into_iter()
        .filter_map(|mut place| {
            let distance = approximate_distance_m(place.lat, place.lon, area.lat, area.lon);
            (distance <= f64::from(area.radius)).then(|| {
                place.distance_m = Some(distance);
                place
            })
        })
        .collect()
}

/// Location used when place search is unavailable.
pub fn mock_location() -> Location {
    Location {
        name: "City General Hospital, Downtown".into(),
        lat: 40.7589,
        lon: -73.9851,
    }
}
