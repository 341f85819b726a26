//! Volcanic region classification
//!
//! Fixed table of named regions (bounding boxes) covering the volcanic
//! systems the dashboard labels. Classification is containment first,
//! then nearest box center within a cutoff, then a coordinate string.

use once_cell::sync::Lazy;

/// A named region with its bounding box
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub name: &'static str,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Region {
    fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Nearest-match cutoff: beyond this, fall back to coordinates
const MAX_NEAREST_KM: f64 = 30.0;

const TABLE: &[Region] = &[
    Region { name: "Reykjanestá", min_lat: 63.75, max_lat: 63.88, min_lon: -22.78, max_lon: -22.55 },
    Region { name: "Eldey", min_lat: 63.60, max_lat: 63.78, min_lon: -23.30, max_lon: -22.78 },
    Region { name: "Svartsengi", min_lat: 63.83, max_lat: 63.93, min_lon: -22.55, max_lon: -22.35 },
    Region { name: "Fagradalsfjall", min_lat: 63.83, max_lat: 63.96, min_lon: -22.35, max_lon: -22.15 },
    Region { name: "Krýsuvík", min_lat: 63.83, max_lat: 64.00, min_lon: -22.15, max_lon: -21.90 },
    Region { name: "Brennisteinsfjöll", min_lat: 63.83, max_lat: 64.00, min_lon: -21.90, max_lon: -21.58 },
    Region { name: "Hengill", min_lat: 63.95, max_lat: 64.15, min_lon: -21.58, max_lon: -21.15 },
    Region { name: "Hekla", min_lat: 63.90, max_lat: 64.05, min_lon: -19.85, max_lon: -19.50 },
    Region { name: "Torfajökull", min_lat: 63.85, max_lat: 64.02, min_lon: -19.30, max_lon: -18.85 },
    Region { name: "Eyjafjallajökull", min_lat: 63.55, max_lat: 63.70, min_lon: -19.85, max_lon: -19.40 },
    Region { name: "Katla", min_lat: 63.53, max_lat: 63.75, min_lon: -19.40, max_lon: -18.85 },
    Region { name: "Vestmannaeyjar", min_lat: 63.30, max_lat: 63.50, min_lon: -20.45, max_lon: -20.10 },
    Region { name: "Bárðarbunga", min_lat: 64.52, max_lat: 64.75, min_lon: -17.85, max_lon: -17.30 },
    Region { name: "Grímsvötn", min_lat: 64.33, max_lat: 64.52, min_lon: -17.50, max_lon: -17.05 },
    Region { name: "Öræfajökull", min_lat: 63.93, max_lat: 64.08, min_lon: -16.80, max_lon: -16.50 },
    Region { name: "Askja", min_lat: 64.95, max_lat: 65.15, min_lon: -16.90, max_lon: -16.55 },
    Region { name: "Herðubreið", min_lat: 65.15, max_lat: 65.35, min_lon: -16.55, max_lon: -16.15 },
    Region { name: "Þeistareykir", min_lat: 65.78, max_lat: 66.00, min_lon: -17.10, max_lon: -16.65 },
    Region { name: "Tjörnes fracture zone", min_lat: 66.00, max_lat: 66.40, min_lon: -17.90, max_lon: -16.50 },
    Region { name: "Grímsey", min_lat: 66.40, max_lat: 66.75, min_lon: -18.35, max_lon: -17.60 },
];

/// Region table with precomputed box centers
static CENTERS: Lazy<Vec<(&'static Region, (f64, f64))>> =
    Lazy::new(|| TABLE.iter().map(|r| (r, r.center())).collect());

/// Great-circle distance in kilometers
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Nearest named region, if any matches
pub fn classify(lat: f64, lon: f64) -> Option<&'static str> {
    if let Some(region) = TABLE.iter().find(|r| r.contains(lat, lon)) {
        return Some(region.name);
    }

    CENTERS
        .iter()
        .map(|(region, (clat, clon))| (region.name, haversine_km(lat, lon, *clat, *clon)))
        .filter(|(_, km)| *km <= MAX_NEAREST_KM)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(name, _)| name)
}

/// Human-readable location: region name, or a coordinate string fallback
pub fn locate(lat: f64, lon: f64) -> String {
    match classify(lat, lon) {
        Some(name) => name.to_string(),
        None => {
            let ns = if lat >= 0.0 { 'N' } else { 'S' };
            let ew = if lon >= 0.0 { 'E' } else { 'W' };
            format!("{:.3}°{}, {:.3}°{}", lat.abs(), ns, lon.abs(), ew)
        }
    }
}
