//! Customer attributes submitted from the form

use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer gender as offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Numeric encoding used when the model was fitted (Female = 1, Male = 0).
    pub fn encode(self) -> u8 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }

    /// The other option, used by the form's toggle control.
    pub fn toggled(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single prediction request, built fresh for every submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Age in years
    pub age: u32,
    pub gender: Gender,
    /// Tenure in months
    pub tenure: u32,
    /// Monthly charge in currency units
    pub monthly_charge: f64,
}

impl PredictionRequest {
    pub fn new(age: u32, gender: Gender, tenure: u32, monthly_charge: f64) -> Self {
        Self {
            age,
            gender,
            tenure,
            monthly_charge,
        }
    }
}
