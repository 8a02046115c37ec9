//! IRS life-expectancy divisor tables
//!
//! The uniform lifetime table drives required-minimum-distribution divisors
//! for most account owners. The joint table applies when the sole beneficiary
//! is a spouse more than ten years younger than the owner; its published
//! matrix is large, so it is host-supplied (CSV or constructor) rather than
//! built in.

use crate::error::{EngineError, Result};

/// Uniform lifetime divisor for a single attained age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeTableEntry {
    pub age: u8,
    pub divisor: f64,
}

/// Joint life and last survivor divisor for an owner/spouse age pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLifeEntry {
    pub owner_age: u8,
    pub spouse_age: u8,
    pub divisor: f64,
}

/// Life-expectancy divisors by attained age
#[derive(Debug, Clone)]
pub struct LifeTable {
    /// Uniform lifetime divisors, ascending by age
    uniform: Vec<LifeTableEntry>,
    /// Joint life divisors, sparse, keyed by (owner age, spouse age)
    joint: Vec<JointLifeEntry>,
}

impl Default for LifeTable {
    fn default() -> Self {
        Self::irs_uniform_2024()
    }
}

impl LifeTable {
    /// IRS Uniform Lifetime Table effective 2022+ (SECURE 2.0 start age 73)
    pub fn irs_uniform_2024() -> Self {
        let divisors = [
            (73, 26.5),
            (74, 25.5),
            (75, 24.6),
            (76, 23.7),
            (77, 22.9),
            (78, 22.0),
            (79, 21.1),
            (80, 20.2),
            (81, 19.4),
            (82, 18.5),
            (83, 17.7),
            (84, 16.8),
            (85, 16.0),
            (86, 15.2),
            (87, 14.4),
            (88, 13.7),
            (89, 12.9),
            (90, 12.2),
            (91, 11.5),
            (92, 10.8),
            (93, 10.1),
            (94, 9.5),
            (95, 8.9),
            (96, 8.4),
            (97, 7.8),
            (98, 7.3),
            (99, 6.8),
            (100, 6.4),
            (101, 6.0),
            (102, 5.6),
            (103, 5.2),
            (104, 4.9),
            (105, 4.6),
            (106, 4.3),
            (107, 4.1),
            (108, 3.9),
            (109, 3.7),
            (110, 3.5),
            (111, 3.4),
            (112, 3.3),
            (113, 3.1),
            (114, 3.0),
            (115, 2.9),
            (116, 2.8),
            (117, 2.7),
            (118, 2.5),
            (119, 2.3),
            (120, 2.0),
        ];

        Self {
            uniform: divisors
                .iter()
                .map(|&(age, divisor)| LifeTableEntry { age, divisor })
                .collect(),
            joint: Vec::new(),
        }
    }

    /// Create from loaded CSV data
    pub fn from_loaded(uniform: &[LifeTableEntry], joint: &[JointLifeEntry]) -> Self {
        Self {
            uniform: uniform.to_vec(),
            joint: joint.to_vec(),
        }
    }

    /// Attach joint life divisors to an existing table
    pub fn with_joint_entries(mut self, entries: Vec<JointLifeEntry>) -> Self {
        self.joint = entries;
        self
    }

    /// First age with a tabulated divisor (the RMD starting age)
    pub fn first_rmd_age(&self) -> u8 {
        self.uniform.first().map(|e| e.age).unwrap_or(u8::MAX)
    }

    /// Last age with a tabulated divisor
    pub fn max_age(&self) -> u8 {
        self.uniform.last().map(|e| e.age).unwrap_or(0)
    }

    /// Uniform lifetime divisor for an attained age.
    ///
    /// Ages outside the tabulated range fail; the caller decides whether
    /// that means "not yet required" or a genuine error.
    pub fn divisor(&self, age: u8) -> Result<f64> {
        self.uniform
            .iter()
            .find(|e| e.age == age)
            .map(|e| e.divisor)
            .ok_or(EngineError::TableLookupFailed {
                age,
                spouse_age: None,
            })
    }

    /// Joint life divisor for an owner/spouse age pair.
    ///
    /// Fails when the pair is not tabulated; there is no fallback to the
    /// uniform table here because the two tables answer different questions.
    pub fn joint_divisor(&self, owner_age: u8, spouse_age: u8) -> Result<f64> {
        self.joint
            .iter()
            .find(|e| e.owner_age == owner_age && e.spouse_age == spouse_age)
            .map(|e| e.divisor)
            .ok_or(EngineError::TableLookupFailed {
                age: owner_age,
                spouse_age: Some(spouse_age),
            })
    }

    /// Whether any joint life entries are loaded
    pub fn has_joint_entries(&self) -> bool {
        !self.joint.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_divisors() {
        let table = LifeTable::irs_uniform_2024();

        assert_eq!(table.divisor(73).unwrap(), 26.5, "divisor at start age");
        assert_eq!(table.divisor(75).unwrap(), 24.6);
        assert_eq!(table.divisor(85).unwrap(), 16.0);
        assert_eq!(table.divisor(100).unwrap(), 6.4);
        assert_eq!(table.divisor(120).unwrap(), 2.0, "divisor at terminal age");

        assert_eq!(table.first_rmd_age(), 73);
        assert_eq!(table.max_age(), 120);
    }

    #[test]
    fn test_out_of_range_ages_fail() {
        let table = LifeTable::irs_uniform_2024();

        assert_eq!(
            table.divisor(72),
            Err(EngineError::TableLookupFailed { age: 72, spouse_age: None })
        );
        assert_eq!(
            table.divisor(121),
            Err(EngineError::TableLookupFailed { age: 121, spouse_age: None })
        );
    }

    #[test]
    fn test_divisors_decrease_and_stay_above_one() {
        let table = LifeTable::irs_uniform_2024();

        let mut prev = f64::INFINITY;
        for age in 73..=120 {
            let d = table.divisor(age).unwrap();
            assert!(d >= 1.0, "divisor at age {} must be >= 1, got {}", age, d);
            assert!(d < prev, "divisors must strictly decrease with age");
            prev = d;
        }
    }

    #[test]
    fn test_joint_divisors() {
        let table = LifeTable::irs_uniform_2024().with_joint_entries(vec![
            JointLifeEntry { owner_age: 75, spouse_age: 60, divisor: 27.3 },
            JointLifeEntry { owner_age: 76, spouse_age: 61, divisor: 26.4 },
        ]);

        assert_eq!(table.joint_divisor(75, 60).unwrap(), 27.3);
        assert_eq!(
            table.joint_divisor(75, 59),
            Err(EngineError::TableLookupFailed { age: 75, spouse_age: Some(59) })
        );

        // Joint divisor exceeds the uniform divisor for the same owner age
        assert!(table.joint_divisor(75, 60).unwrap() > table.divisor(75).unwrap());
    }

    #[test]
    fn test_empty_table_has_no_valid_ages() {
        let table = LifeTable::from_loaded(&[], &[]);
        assert!(table.divisor(80).is_err());
        assert!(!table.has_joint_entries());
    }
}
