//! Reference datasets injected into the calculation engines
//!
//! Tables are built once (from built-in data or CSV files) and handed to the
//! engines as read-only configuration. Swapping in newer published values
//! never touches engine logic.

mod cpi;
mod life;
pub mod loader;

pub use cpi::{CpiPeriod, CpiTable};
pub use life::{JointLifeEntry, LifeTable, LifeTableEntry};
pub use loader::LoadedTables;

use std::path::Path;

/// Container for all reference tables
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub life: LifeTable,
    pub cpi: CpiTable,
}

impl ReferenceTables {
    /// Create tables from the built-in published datasets
    pub fn builtin() -> Self {
        Self {
            life: LifeTable::irs_uniform_2024(),
            cpi: CpiTable::cpi_u_annual(),
        }
    }

    /// Load tables from CSV files in the default location (data/tables/)
    pub fn from_csv() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_csv_path(Path::new(loader::DEFAULT_TABLES_PATH))
    }

    /// Load tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let loaded = LoadedTables::load_from(path)?;

        Ok(Self {
            life: LifeTable::from_loaded(&loaded.life, &loaded.joint_life),
            cpi: CpiTable::from_entries(loaded.cpi),
        })
    }
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables() {
        let tables = ReferenceTables::builtin();

        assert_eq!(tables.life.first_rmd_age(), 73);
        assert_eq!(tables.life.max_age(), 120);
        assert!(!tables.cpi.is_empty());
        assert!(!tables.life.has_joint_entries());
    }
}
