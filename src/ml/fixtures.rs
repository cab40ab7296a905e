// Shared test data for the ml layer.
//
// synthetic_records() draws employees from a seeded RNG and gives
// each one a salary that is an exact affine function of its
// features, so an OLS fit must reproduce it to float precision.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::record::TrainingRecord;
use crate::domain::request::PredictionRequest;

pub const SEXES:        [&str; 2] = ["F", "M"];
pub const DESIGNATIONS: [&str; 4] = ["Analyst", "Associate", "Manager", "Senior Analyst"];
pub const UNITS:        [&str; 4] = ["Finance", "IT", "Marketing", "Operations"];

const DESIGNATION_BONUS: [f64; 4] = [0.0, 4_000.0, 25_000.0, 9_000.0];
const UNIT_BONUS:        [f64; 4] = [3_000.0, 5_000.0, 0.0, -2_000.0];

pub fn true_salary(age: f64, sex: usize, rating: f64, experience: f64, des: usize, unit: usize) -> f64 {
    12_000.0
        + 250.0 * age
        + 1_500.0 * sex as f64
        + 2_000.0 * rating
        + 1_100.0 * experience
        + DESIGNATION_BONUS[des]
        + UNIT_BONUS[unit]
}

pub fn record(sex: &str, designation: &str, unit: &str) -> TrainingRecord {
    TrainingRecord {
        age:         30.0,
        sex:         sex.into(),
        designation: designation.into(),
        unit:        unit.into(),
        rating:      3.0,
        experience:  5.0,
        salary:      50_000.0,
    }
}

pub fn synthetic_records(n: usize, seed: u64) -> Vec<TrainingRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            // cycle categories so every vocabulary entry is present
            let sex  = i % SEXES.len();
            let des  = (i / 2) % DESIGNATIONS.len();
            let unit = rng.gen_range(0..UNITS.len());
            let unit = if i < UNITS.len() { i } else { unit };

            let age        = rng.gen_range(21..=60) as f64;
            let rating     = (rng.gen_range(10..=50) as f64) / 10.0;
            let experience = rng.gen_range(0..=25) as f64;

            TrainingRecord {
                age,
                sex:         SEXES[sex].to_string(),
                designation: DESIGNATIONS[des].to_string(),
                unit:        UNITS[unit].to_string(),
                rating,
                experience,
                salary: true_salary(age, sex, rating, experience, des, unit),
            }
        })
        .collect()
}

pub fn request(age: f64, sex: &str, designation: &str, unit: &str, rating: f64, experience: f64) -> PredictionRequest {
    PredictionRequest {
        age,
        sex:         sex.into(),
        designation: designation.into(),
        unit:        unit.into(),
        rating,
        experience,
    }
}
