//! Car catalog data and loading

use std::path::Path;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Car category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarCategory {
    #[serde(rename = "SUV")]
    Suv,
    #[serde(rename = "PickUp")]
    Pickup,
    #[serde(rename = "Hatchback")]
    Hatchback,
    #[serde(rename = "Sedan")]
    Sedan,
    #[serde(rename = "Sports")]
    Sports,
}

/// Category labels in catalog/serialized form, in a fixed order.
pub const CATEGORY_LABELS: [&str; 5] = ["SUV", "PickUp", "Hatchback", "Sedan", "Sports"];

impl CarCategory {
    /// Get category display label
    pub fn label(&self) -> &'static str {
        match self {
            CarCategory::Suv => "SUV",
            CarCategory::Pickup => "PickUp",
            CarCategory::Hatchback => "Hatchback",
            CarCategory::Sedan => "Sedan",
            CarCategory::Sports => "Sports",
        }
    }

    /// Parse a category from its label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "suv" => Some(CarCategory::Suv),
            "pickup" | "pick up" | "pick-up" => Some(CarCategory::Pickup),
            "hatchback" => Some(CarCategory::Hatchback),
            "sedan" => Some(CarCategory::Sedan),
            "sports" | "sport" => Some(CarCategory::Sports),
            _ => None,
        }
    }
}

impl std::fmt::Display for CarCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: u32,
    pub make: String,
    pub model: String,
    #[serde(rename = "type")]
    pub category: CarCategory,
    /// Passenger capacity
    pub capacity: u32,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
}

/// Catalog file structure
#[derive(Debug, Deserialize)]
struct CatalogFile {
    cars: Vec<Car>,
}

/// Global catalog, loaded once from the first readable default path or the
/// embedded data set.
static CATALOG: Lazy<RwLock<Vec<Car>>> = Lazy::new(|| {
    let default_paths = ["data/cars.json", "../data/cars.json", "./cars.json"];

    for path in &default_paths {
        if let Ok(cars) = load_catalog_from_file(path) {
            tracing::info!("Loaded {} cars from {}", cars.len(), path);
            return RwLock::new(cars);
        }
    }

    RwLock::new(default_catalog())
});

/// Load a catalog from a JSON file
pub fn load_catalog_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Car>, std::io::Error> {
    let content = std::fs::read_to_string(path)?;
    let file: CatalogFile = serde_json::from_str(&content)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(file.cars)
}

/// Replace the loaded catalog from a file (for runtime updates)
pub fn reload_catalog<P: AsRef<Path>>(path: P) -> Result<usize, std::io::Error> {
    let cars = load_catalog_from_file(path)?;
    let count = cars.len();
    *CATALOG.write().unwrap() = cars;
    Ok(count)
}

/// Get all catalog entries
pub fn get_catalog() -> Vec<Car> {
    CATALOG.read().unwrap().clone()
}

fn car(id: u32, make: &str, model: &str, category: CarCategory, capacity: u32, price_usd: f64) -> Car {
    Car {
        id,
        make: make.to_string(),
        model: model.to_string(),
        category,
        capacity,
        price_usd,
    }
}

/// Embedded default catalog
fn default_catalog() -> Vec<Car> {
    use CarCategory::*;
    vec![
        car(1, "Toyota", "RAV4", Suv, 5, 32_000.0),
        car(2, "Honda", "CR-V", Suv, 5, 31_000.0),
        car(3, "Ford", "Explorer", Suv, 7, 45_000.0),
        car(4, "Chevrolet", "Tahoe", Suv, 7, 50_000.0),
        car(5, "Nissan", "Rogue", Suv, 5, 33_000.0),
        car(6, "Hyundai", "Santa Fe", Suv, 5, 35_000.0),
        car(7, "Kia", "Sorento", Suv, 7, 36_000.0),
        car(8, "Mazda", "CX-5", Suv, 5, 34_000.0),
        car(9, "Volkswagen", "Tiguan", Suv, 5, 33_000.0),
        car(10, "Subaru", "Forester", Suv, 5, 32_000.0),
        car(11, "Toyota", "Hilux", Pickup, 5, 35_000.0),
        car(12, "Ford", "F-150", Pickup, 5, 45_000.0),
        car(13, "Chevrolet", "Silverado", Pickup, 5, 47_000.0),
        car(14, "Ram", "1500", Pickup, 5, 46_000.0),
        car(15, "Nissan", "Navara", Pickup, 5, 34_000.0),
        car(16, "GMC", "Sierra", Pickup, 5, 48_000.0),
        car(17, "Honda", "Ridgeline", Pickup, 5, 42_000.0),
        car(18, "Isuzu", "D-Max", Pickup, 5, 36_000.0),
        car(19, "Mitsubishi", "L200", Pickup, 5, 34_000.0),
        car(20, "Ford", "Ranger", Pickup, 5, 37_000.0),
        car(21, "Volkswagen", "Golf", Hatchback, 5, 25_000.0),
        car(22, "Honda", "Civic Hatchback", Hatchback, 5, 26_000.0),
        car(23, "Ford", "Focus", Hatchback, 5, 24_000.0),
        car(24, "Mazda", "3 Hatchback", Hatchback, 5, 27_000.0),
        car(25, "Hyundai", "i30", Hatchback, 5, 23_000.0),
        car(26, "Toyota", "Yaris", Hatchback, 5, 22_000.0),
        car(27, "Kia", "Rio", Hatchback, 5, 21_000.0),
        car(28, "Nissan", "Versa Note", Hatchback, 5, 20_000.0),
        car(29, "Chevrolet", "Sonic", Hatchback, 5, 20_500.0),
        car(30, "Volkswagen", "Polo", Hatchback, 5, 21_500.0),
        car(31, "Toyota", "Corolla", Sedan, 5, 25_000.0),
        car(32, "Honda", "Accord", Sedan, 5, 28_000.0),
        car(33, "Hyundai", "Elantra", Sedan, 5, 24_000.0),
        car(34, "Nissan", "Sentra", Sedan, 5, 23_000.0),
        car(35, "Mazda", "6", Sedan, 5, 27_000.0),
        car(36, "Kia", "Forte", Sedan, 5, 22_000.0),
        car(37, "Volkswagen", "Jetta", Sedan, 5, 24_500.0),
        car(38, "Chevrolet", "Malibu", Sedan, 5, 23_500.0),
        car(39, "Ford", "Fusion", Sedan, 5, 25_500.0),
        car(40, "Honda", "Insight", Sedan, 5, 26_000.0),
        car(41, "Porsche", "911", Sports, 2, 120_000.0),
        car(42, "Ferrari", "488", Sports, 2, 250_000.0),
        car(43, "Lamborghini", "Huracán", Sports, 2, 300_000.0),
        car(44, "Chevrolet", "Corvette", Sports, 2, 70_000.0),
        car(45, "Audi", "R8", Sports, 2, 170_000.0),
        car(46, "McLaren", "720S", Sports, 2, 300_000.0),
        car(47, "Nissan", "GT-R", Sports, 2, 120_000.0),
        car(48, "Jaguar", "F-Type", Sports, 2, 110_000.0),
        car(49, "BMW", "M4", Sports, 2, 95_000.0),
        car(50, "Toyota", "Supra", Sports, 2, 50_000.0),
    ]
}
