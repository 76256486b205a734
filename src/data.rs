//! Reference tables for address parsing.
//!
//! The parser never consults anything but these tables: state names and
//! abbreviations, street-type variants, known cities per state, directionals
//! and secondary-unit keywords. The first five come from JSON files (bundled
//! into the binary by default, or read from a data directory); directionals
//! and secondary units are built in.
//!
//! Every table is backed by a `BTreeMap` so scans happen in a fixed order and
//! parse results are reproducible.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the all-states table (US states, territories, Canadian provinces).
pub const STATES_FILE: &str = "states.json";
/// File name of the US-only states table.
pub const US_STATES_FILE: &str = "us-states.json";
/// File name of the street-type table.
pub const US_STREET_TYPES_FILE: &str = "us-street-types.json";
/// File name of the all-cities table.
pub const CITIES_FILE: &str = "cities.json";
/// File name of the US-only cities table.
pub const US_CITIES_FILE: &str = "us-cities.json";

#[cfg(feature = "bundled-data")]
mod bundled {
    pub const STATES: &str = include_str!("../data/states.json");
    pub const US_STATES: &str = include_str!("../data/us-states.json");
    pub const US_STREET_TYPES: &str = include_str!("../data/us-street-types.json");
    pub const CITIES: &str = include_str!("../data/cities.json");
    pub const US_CITIES: &str = include_str!("../data/us-cities.json");
}

/// Configuration for locating reference data.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Directory holding the JSON tables when not using the bundled copy
    pub data_dir: PathBuf,
    /// Whether to use the tables compiled into the crate
    pub use_bundled: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            use_bundled: cfg!(feature = "bundled-data"),
        }
    }
}

/// Get the default data directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("addresser")
}

/// Full state name to two-letter abbreviation.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    by_name: BTreeMap<String, String>,
    scan_order: Vec<(String, String)>,
}

impl StateTable {
    /// Build a table from a name → abbreviation map.
    pub fn new(by_name: BTreeMap<String, String>) -> Self {
        let mut scan_order: Vec<(String, String)> = by_name
            .iter()
            .map(|(name, abbr)| (name.clone(), abbr.clone()))
            .collect();
        // Longest names first so "West Virginia" is tried before "Virginia".
        scan_order.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            by_name,
            scan_order,
        }
    }

    /// Look up the full state name for an abbreviation, ignoring case.
    pub fn name_for(&self, abbreviation: &str) -> Option<&str> {
        self.by_name
            .iter()
            .find(|(_, abbr)| abbr.eq_ignore_ascii_case(abbreviation))
            .map(|(name, _)| name.as_str())
    }

    /// Entries in the order the parser's suffix scan visits them.
    pub fn scan_order(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scan_order
            .iter()
            .map(|(name, abbr)| (name.as_str(), abbr.as_str()))
    }

    /// Iterate entries sorted by full name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_name.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Street-type variant (lower-case) to canonical suffix, e.g. `rd` → `Road`.
#[derive(Debug, Clone, Default)]
pub struct StreetTypeTable {
    map: BTreeMap<String, String>,
}

impl StreetTypeTable {
    /// Build a table; keys are lower-cased.
    pub fn new(map: BTreeMap<String, String>) -> Self {
        Self {
            map: map
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }

    /// Whether a written token is a street type, ignoring case and a trailing period.
    pub fn is_street_type(&self, token: &str) -> bool {
        let token = token.strip_suffix('.').unwrap_or(token);
        !token.is_empty() && self.map.contains_key(&token.to_lowercase())
    }

    /// Canonical suffix for a token that exactly equals a table key.
    pub fn canonical(&self, token: &str) -> Option<&str> {
        self.map.get(token).map(String::as_str)
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// State abbreviation to ordered list of city names.
#[derive(Debug, Clone, Default)]
pub struct CityTable {
    map: BTreeMap<String, Vec<String>>,
    scan_order: BTreeMap<String, Vec<String>>,
}

impl CityTable {
    /// Build a table from an abbreviation → cities map.
    pub fn new(map: BTreeMap<String, Vec<String>>) -> Self {
        let scan_order = map
            .iter()
            .map(|(abbr, cities)| {
                let mut cities = cities.clone();
                // Longest names first so "North Las Vegas" is tried before
                // "Las Vegas". The sort is stable, ties keep table order.
                cities.sort_by(|a, b| b.len().cmp(&a.len()));
                (abbr.clone(), cities)
            })
            .collect();

        Self { map, scan_order }
    }

    /// Known cities for a state, in table order.
    pub fn cities_in(&self, abbreviation: &str) -> &[String] {
        self.map
            .get(abbreviation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Known cities for a state, in the order the parser's suffix scan
    /// visits them.
    pub fn scan_order(&self, abbreviation: &str) -> &[String] {
        self.scan_order
            .get(abbreviation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The underlying map.
    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.map
    }

    /// Number of states with a city list.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Direction words and their abbreviations.
#[derive(Debug, Clone)]
pub struct DirectionalTable {
    map: BTreeMap<&'static str, &'static str>,
}

impl Default for DirectionalTable {
    fn default() -> Self {
        Self {
            map: BTreeMap::from([
                ("north", "N"),
                ("northeast", "NE"),
                ("east", "E"),
                ("southeast", "SE"),
                ("south", "S"),
                ("southwest", "SW"),
                ("west", "W"),
                ("northwest", "NW"),
            ]),
        }
    }
}

impl DirectionalTable {
    /// Abbreviation for a token written either as a word or an abbreviation.
    pub fn abbreviation(&self, token: &str) -> Option<&'static str> {
        if let Some(abbr) = self.map.get(token.to_lowercase().as_str()) {
            return Some(*abbr);
        }
        let upper = token.to_uppercase();
        self.map.values().copied().find(|abbr| *abbr == upper)
    }
}

/// Secondary-unit keywords (upper-case), both spelled out and abbreviated.
#[derive(Debug, Clone)]
pub struct SecondaryUnitTable {
    keywords: BTreeSet<&'static str>,
}

impl Default for SecondaryUnitTable {
    fn default() -> Self {
        Self {
            keywords: BTreeSet::from([
                "APARTMENT",
                "APT",
                "BASEMENT",
                "BSMT",
                "BLDG",
                "BUILDING",
                "DEPARTMENT",
                "DEPT",
                "FL",
                "FLOOR",
                "FRNT",
                "FRONT",
                "HANGAR",
                "HNGR",
                "LBBY",
                "LOBBY",
                "LOT",
                "LOWER",
                "LOWR",
                "OFC",
                "OFFICE",
                "PENTHOUSE",
                "PH",
                "PIER",
                "REAR",
                "RM",
                "ROOM",
                "SIDE",
                "SLIP",
                "SPACE",
                "SPC",
                "STE",
                "STOP",
                "SUITE",
                "TRAILER",
                "TRLR",
                "UNIT",
                "UPPER",
                "UPPR",
                "#",
            ]),
        }
    }
}

impl SecondaryUnitTable {
    /// All keywords, sorted.
    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.keywords.iter().copied()
    }
}

/// The full set of reference tables, immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    states: StateTable,
    us_states: StateTable,
    street_types: StreetTypeTable,
    cities: CityTable,
    us_cities: CityTable,
    directionals: DirectionalTable,
    secondary_units: SecondaryUnitTable,
}

impl ReferenceData {
    /// Load reference data according to `config`.
    pub fn load(config: &DataConfig) -> Result<Self> {
        if config.use_bundled {
            Self::bundled()
        } else {
            Self::from_dir(&config.data_dir)
        }
    }

    /// The tables compiled into the crate.
    #[cfg(feature = "bundled-data")]
    pub fn bundled() -> Result<Self> {
        log::debug!("Loading bundled reference data");
        Self::from_json(
            bundled::STATES,
            bundled::US_STATES,
            bundled::US_STREET_TYPES,
            bundled::CITIES,
            bundled::US_CITIES,
        )
    }

    /// The tables compiled into the crate.
    #[cfg(not(feature = "bundled-data"))]
    pub fn bundled() -> Result<Self> {
        Err(Error::data_error(
            "Bundled reference data not available and bundled-data feature disabled",
        ))
    }

    /// Read the five JSON tables from a directory.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::data_error(format!(
                "Data directory not found: {}",
                dir.display()
            )));
        }
        log::info!("Loading reference data from {}", dir.display());

        let read = |file: &str| -> Result<String> { Ok(fs::read_to_string(dir.join(file))?) };

        Self::from_json(
            &read(STATES_FILE)?,
            &read(US_STATES_FILE)?,
            &read(US_STREET_TYPES_FILE)?,
            &read(CITIES_FILE)?,
            &read(US_CITIES_FILE)?,
        )
    }

    /// Build reference data from JSON documents.
    pub fn from_json(
        states: &str,
        us_states: &str,
        street_types: &str,
        cities: &str,
        us_cities: &str,
    ) -> Result<Self> {
        let data = Self {
            states: StateTable::new(serde_json::from_str(states)?),
            us_states: StateTable::new(serde_json::from_str(us_states)?),
            street_types: StreetTypeTable::new(serde_json::from_str(street_types)?),
            cities: CityTable::new(serde_json::from_str(cities)?),
            us_cities: CityTable::new(serde_json::from_str(us_cities)?),
            directionals: DirectionalTable::default(),
            secondary_units: SecondaryUnitTable::default(),
        };

        log::info!(
            "Loaded {} states, {} street types, cities for {} states",
            data.states.len(),
            data.street_types.len(),
            data.cities.len()
        );

        Ok(data)
    }

    /// Check the invariants the parser relies on.
    pub fn verify(&self) -> Result<()> {
        for (label, table) in [("states", &self.states), ("us-states", &self.us_states)] {
            if table.is_empty() {
                return Err(Error::data_error(format!("Empty table: {label}")));
            }
            if let Some((name, abbr)) = table.iter().find(|(_, abbr)| abbr.chars().count() != 2) {
                return Err(Error::data_error(format!(
                    "Invalid abbreviation {abbr:?} for {name} in {label}"
                )));
            }
        }

        if self.street_types.is_empty() {
            return Err(Error::data_error("Empty table: us-street-types"));
        }

        for (label, cities, states) in [
            ("cities", &self.cities, &self.states),
            ("us-cities", &self.us_cities, &self.us_states),
        ] {
            if cities.is_empty() {
                return Err(Error::data_error(format!("Empty table: {label}")));
            }
            if let Some(abbr) = cities
                .as_map()
                .keys()
                .find(|abbr| states.name_for(abbr).is_none())
            {
                return Err(Error::data_error(format!(
                    "{label} lists cities for unknown state {abbr}"
                )));
            }
            for (abbr, _) in cities.as_map().iter().filter(|(_, names)| names.is_empty()) {
                log::warn!("{label} has an empty city list for {abbr}");
            }
        }

        Ok(())
    }

    /// States to parse against.
    pub fn states(&self, us_only: bool) -> &StateTable {
        if us_only { &self.us_states } else { &self.states }
    }

    /// Cities to parse against.
    pub fn cities(&self, us_only: bool) -> &CityTable {
        if us_only { &self.us_cities } else { &self.cities }
    }

    /// The US-only city table.
    pub fn us_cities(&self) -> &CityTable {
        &self.us_cities
    }

    /// Street-type variants.
    pub fn street_types(&self) -> &StreetTypeTable {
        &self.street_types
    }

    /// Directionals.
    pub fn directionals(&self) -> &DirectionalTable {
        &self.directionals
    }

    /// Secondary-unit keywords.
    pub fn secondary_units(&self) -> &SecondaryUnitTable {
        &self.secondary_units
    }
}
