//! Static car catalog
//!
//! Reference data for the recommendation flow. The catalog is loaded once
//! (embedded defaults, optionally overridden from a JSON file) and queried
//! read-only for the rest of the process lifetime.

pub mod cars;

pub use cars::{
    get_catalog, load_catalog_from_file, reload_catalog, Car, CarCategory, CATEGORY_LABELS,
};

/// Budget band for recommendations: the stated budget is approximate, so
/// candidates within ±15% qualify.
pub const BUDGET_BAND_RATIO: f64 = 0.15;

/// Compute the inclusive price band around a stated budget.
pub fn budget_band(budget: f64) -> (f64, f64) {
    (
        budget * (1.0 - BUDGET_BAND_RATIO),
        budget * (1.0 + BUDGET_BAND_RATIO),
    )
}

/// Catalog entries matching a budget, with optional category and seating
/// constraints.
pub fn find_candidates(
    budget: f64,
    category: Option<CarCategory>,
    min_capacity: Option<u32>,
) -> Vec<Car> {
    let (low, high) = budget_band(budget);
    get_catalog()
        .into_iter()
        .filter(|car| car.price_usd >= low && car.price_usd <= high)
        .filter(|car| category.map_or(true, |c| car.category == c))
        .filter(|car| min_capacity.map_or(true, |n| car.capacity >= n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_band() {
        let (low, high) = budget_band(30_000.0);
        assert_eq!(low, 25_500.0);
        assert_eq!(high, 34_500.0);
    }

    #[test]
    fn test_find_candidates_respects_band() {
        let candidates = find_candidates(32_000.0, Some(CarCategory::Suv), None);
        assert!(!candidates.is_empty());
        for car in &candidates {
            assert!(car.price_usd >= 27_200.0 && car.price_usd <= 36_800.0);
            assert_eq!(car.category, CarCategory::Suv);
        }
    }

    #[test]
    fn test_find_candidates_seating() {
        let candidates = find_candidates(45_000.0, Some(CarCategory::Suv), Some(7));
        assert!(candidates.iter().all(|car| car.capacity >= 7));
        assert!(candidates.iter().any(|car| car.model == "Explorer"));
    }
}
