//! Customer profile data collected during a call

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Personal data extracted from the conversation.
///
/// One logical profile exists per session. The model runtime re-sends the
/// full last-known field set on every capture, so each snapshot carries
/// complete values; the caller-visible profile is last-write-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalData {
    /// Customer name
    pub name: String,

    /// Phone number, when the customer has shared one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Customer age in years
    pub age: u32,

    /// Stated budget in USD
    pub budget: f64,

    /// Number of people that usually travel in the car
    pub capacity: u32,

    /// Preferred car category label (e.g. "SUV", "Sedan")
    pub car_type: String,
}

impl PersonalData {
    /// Validate domain ranges.
    ///
    /// Schema-level checks (types, enum membership) happen in the tool
    /// layer; this enforces the numeric invariants that hold regardless of
    /// how the data arrived.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if self.age == 0 {
            return Err(Error::validation("age must be greater than zero"));
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(Error::validation(format!(
                "budget must be a finite non-negative number, got {}",
                self.budget
            )));
        }
        if self.capacity == 0 {
            return Err(Error::validation("capacity must be at least 1"));
        }
        Ok(())
    }

    /// Get display name (name or "Customer")
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Customer"
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersonalData {
        PersonalData {
            name: "Laura".to_string(),
            phone: None,
            age: 34,
            budget: 30_000.0,
            capacity: 5,
            car_type: "SUV".to_string(),
        }
    }

    #[test]
    fn test_valid_profile() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_negative_budget_rejected() {
        let mut data = sample();
        data.budget = -100.0;
        assert!(matches!(data.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_zero_age_rejected() {
        let mut data = sample();
        data.age = 0;
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut data = sample();
        data.capacity = 0;
        assert!(data.validate().is_err());
    }
}
