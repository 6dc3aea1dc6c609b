//! Vehicle code classification.
//!
//! The collision dataset carries free-form vehicle type codes
//! (`"Station Wagon/Sport Utility Vehicle"`, `"4 dr sedan"`, `"E-Bike"`,
//! `"FDNY AMBUL"`, ...). These are mapped onto [`VehicleType`] with
//! case-insensitive keyword matching.

use crash_report_crash_models::VehicleType;

/// Classifies a raw vehicle type code.
///
/// Returns `None` for blank or explicitly unknown codes, and
/// [`VehicleType::Other`] for codes that match no keyword.
#[must_use]
pub fn classify_vehicle_code(raw: &str) -> Option<VehicleType> {
    let lower = raw.trim().to_lowercase();

    if lower.is_empty() || contains_any(&lower, &["unknown", "unspecified"]) {
        return None;
    }

    // ── Two wheelers (before the generic "bike") ─────────────────────
    if contains_any(
        &lower,
        &["e-bike", "ebike", "e bike", "electric bike", "electric bicycle"],
    ) {
        return Some(VehicleType::EBike);
    }
    if contains_any(&lower, &["scooter", "e-sco"]) {
        return Some(VehicleType::Scooter);
    }
    if contains_any(
        &lower,
        &[
            "motorcycl",
            "motorbike",
            "motor bike",
            "minibike",
            "mini bike",
            "dirt bike",
            "moped",
        ],
    ) {
        return Some(VehicleType::Motorcycle);
    }
    if contains_any(&lower, &["bike", "bicycle"]) {
        return Some(VehicleType::Bicycle);
    }

    // ── Emergency (before truck: "fire truck") ───────────────────────
    if contains_any(&lower, &["ambul", "fire", "fdny", "emergency"]) {
        return Some(VehicleType::Ambulance);
    }

    // ── Passenger vehicles ───────────────────────────────────────────
    if contains_any(&lower, &["sport utility", "station wagon", "suv"]) {
        return Some(VehicleType::Suv);
    }
    if contains_any(&lower, &["taxi", "cab", "livery", "limo"]) {
        return Some(VehicleType::Taxi);
    }
    if contains_any(
        &lower,
        &["sedan", "passenger vehicle", "passenger car", "convertible", "coupe"],
    ) {
        return Some(VehicleType::Sedan);
    }

    // ── Commercial ───────────────────────────────────────────────────
    if contains_any(&lower, &["pick-up", "pickup", "pick up"]) {
        return Some(VehicleType::PickupTruck);
    }
    if lower.contains("bus") {
        return Some(VehicleType::Bus);
    }
    if lower.contains("van") {
        return Some(VehicleType::Van);
    }
    if contains_any(
        &lower,
        &[
            "truck",
            "semi",
            "tractor",
            "trailer",
            "dump",
            "flat bed",
            "flatbed",
            "tanker",
            "garbage",
            "refuse",
        ],
    ) {
        return Some(VehicleType::Truck);
    }

    Some(VehicleType::Other)
}

/// Returns `true` if `haystack` contains any of the `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_report_lexicon::{Term, lexicon};

    #[test]
    fn classifies_common_codes() {
        assert_eq!(
            classify_vehicle_code("Station Wagon/Sport Utility Vehicle"),
            Some(VehicleType::Suv)
        );
        assert_eq!(classify_vehicle_code("Sedan"), Some(VehicleType::Sedan));
        assert_eq!(classify_vehicle_code("4 dr sedan"), Some(VehicleType::Sedan));
        assert_eq!(classify_vehicle_code("Taxi"), Some(VehicleType::Taxi));
        assert_eq!(
            classify_vehicle_code("Pick-up Truck"),
            Some(VehicleType::PickupTruck)
        );
        assert_eq!(classify_vehicle_code("Box Truck"), Some(VehicleType::Truck));
        assert_eq!(
            classify_vehicle_code("Tractor Truck Diesel"),
            Some(VehicleType::Truck)
        );
        assert_eq!(classify_vehicle_code("Bus"), Some(VehicleType::Bus));
        assert_eq!(classify_vehicle_code("Motorcycle"), Some(VehicleType::Motorcycle));
        assert_eq!(classify_vehicle_code("Bike"), Some(VehicleType::Bicycle));
        assert_eq!(classify_vehicle_code("E-Bike"), Some(VehicleType::EBike));
        assert_eq!(classify_vehicle_code("E-Scooter"), Some(VehicleType::Scooter));
        assert_eq!(classify_vehicle_code("AMBULANCE"), Some(VehicleType::Ambulance));
        assert_eq!(classify_vehicle_code("FDNY FIRE"), Some(VehicleType::Ambulance));
    }

    #[test]
    fn motorized_two_wheelers_are_motorcycles() {
        for code in ["Moped", "MOPED", "Minibike", "Dirt Bike", "Motorbike"] {
            assert_eq!(
                classify_vehicle_code(code),
                Some(VehicleType::Motorcycle),
                "{code}"
            );
        }
        assert_eq!(classify_vehicle_code("Bicycle"), Some(VehicleType::Bicycle));
    }

    #[test]
    fn agrees_with_query_vocabulary() {
        for (form, term) in lexicon().entries() {
            if let Term::VehicleType(vehicle) = term {
                assert_eq!(
                    classify_vehicle_code(form),
                    Some(vehicle),
                    "query form '{form}'"
                );
            }
        }
    }

    #[test]
    fn blank_and_unknown_codes_are_missing() {
        assert_eq!(classify_vehicle_code(""), None);
        assert_eq!(classify_vehicle_code("  "), None);
        assert_eq!(classify_vehicle_code("UNKNOWN"), None);
    }

    #[test]
    fn unrecognized_codes_are_other() {
        assert_eq!(classify_vehicle_code("Forklift"), Some(VehicleType::Other));
    }
}
