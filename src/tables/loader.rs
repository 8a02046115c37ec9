//! CSV-based reference table loader
//!
//! Loads life-expectancy and CPI tables from CSV files in data/tables/

use std::error::Error;
use std::fs::File;
use std::path::Path;

use chrono::Month;
use log::info;

use super::cpi::CpiPeriod;
use super::life::{JointLifeEntry, LifeTableEntry};

/// Default path to the reference table directory
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

/// Load uniform lifetime divisors from CSV
/// Expected columns: age,divisor
pub fn load_life_table(path: &Path) -> Result<Vec<LifeTableEntry>, Box<dyn Error>> {
    let file = File::open(path.join("life_table.csv"))?;
    load_life_table_from_reader(file)
}

pub fn load_life_table_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<LifeTableEntry>, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut entries = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let age: u8 = record[0].parse()?;
        let divisor: f64 = record[1].parse()?;
        entries.push(LifeTableEntry { age, divisor });
    }

    Ok(entries)
}

/// Load joint life divisors from CSV, if the file exists
/// Expected columns: owner_age,spouse_age,divisor
pub fn load_joint_life_table(path: &Path) -> Result<Vec<JointLifeEntry>, Box<dyn Error>> {
    let file_path = path.join("joint_life_table.csv");
    if !file_path.exists() {
        // Optional dataset; joint lookups fail loudly without it
        return Ok(Vec::new());
    }

    let file = File::open(file_path)?;
    load_joint_life_table_from_reader(file)
}

pub fn load_joint_life_table_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<JointLifeEntry>, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut entries = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let owner_age: u8 = record[0].parse()?;
        let spouse_age: u8 = record[1].parse()?;
        let divisor: f64 = record[2].parse()?;
        entries.push(JointLifeEntry {
            owner_age,
            spouse_age,
            divisor,
        });
    }

    Ok(entries)
}

/// Load CPI index values from CSV
/// Expected columns: year,month,index where month is a month name or "Average"
pub fn load_cpi_table(path: &Path) -> Result<Vec<(CpiPeriod, f64)>, Box<dyn Error>> {
    let file = File::open(path.join("cpi_index.csv"))?;
    load_cpi_table_from_reader(file)
}

pub fn load_cpi_table_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<(CpiPeriod, f64)>, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut entries = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let year: i32 = record[0].parse()?;
        let month = parse_month_column(&record[1])?;
        let index: f64 = record[2].parse()?;
        entries.push((CpiPeriod { year, month }, index));
    }

    Ok(entries)
}

/// Parse the month column: a month name, or "Average"/"Annual" for the
/// annual-average row
fn parse_month_column(value: &str) -> Result<Option<Month>, Box<dyn Error>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("average") || value.eq_ignore_ascii_case("annual") {
        return Ok(None);
    }

    let month = value
        .parse::<Month>()
        .map_err(|_| format!("unrecognized month name: {}", value))?;
    Ok(Some(month))
}

/// All reference tables loaded from one directory
pub struct LoadedTables {
    pub life: Vec<LifeTableEntry>,
    pub joint_life: Vec<JointLifeEntry>,
    pub cpi: Vec<(CpiPeriod, f64)>,
}

impl LoadedTables {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, Box<dyn Error>> {
        Self::load_from(Path::new(DEFAULT_TABLES_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        info!("loading reference tables from {}", path.display());

        let loaded = Self {
            life: load_life_table(path)?,
            joint_life: load_joint_life_table(path)?,
            cpi: load_cpi_table(path)?,
        };

        info!(
            "loaded {} life-table rows, {} joint rows, {} CPI rows",
            loaded.life.len(),
            loaded.joint_life.len(),
            loaded.cpi.len()
        );

        Ok(loaded)
    }
}
