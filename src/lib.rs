//! # addresser
//!
//! Rule-based parsing of free-text US mailing addresses.
//!
//! An address string is broken into street number, street name, suffix,
//! direction, secondary unit line, place name, state and ZIP code, plus a
//! canonical formatted form and a URL-safe identifier. Every decision is an
//! ordered pattern match against static reference tables; there is no
//! statistical model and no network access.
//!
//! ## Features
//!
//! - **Deterministic**: reference tables are scanned in a fixed order
//! - **Bundled Data**: state, street-type and city tables ship with the crate
//! - **Thread Safe**: tables are immutable once loaded and shared freely
//! - **Batch Parsing**: optional parallel parsing with the `parallel` feature
//!
//! ## Quick Start
//!
//! ```rust
//! let parsed = addresser::parse_address("705 Monterey Pass Rd, Monterey Park, CA 91754")?;
//!
//! assert_eq!(parsed.street_number, "705");
//! assert_eq!(parsed.street_name, "Monterey Pass Rd");
//! assert_eq!(parsed.place_name, "Monterey Park");
//! assert_eq!(parsed.state_abbreviation, "CA");
//! assert_eq!(parsed.zip_code, "91754");
//! # Ok::<(), addresser::Error>(())
//! ```

#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod composer;
pub mod data;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod sampler;
pub mod street;
pub mod types;

// Re-export main API
pub use data::{DataConfig, ReferenceData};
pub use error::{Error, Result};
pub use parser::AddressParser;
pub use street::{ParsedStreet, StreetGrammar};
pub use types::*;

use rand::Rng;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

static DEFAULT_ADDRESSER: OnceLock<Addresser> = OnceLock::new();

/// Main entry point for address parsing.
///
/// Owns the reference tables and a parser compiled against them. Cloning is
/// cheap; clones share the same tables.
///
/// # Examples
///
/// ```rust
/// use addresser::Addresser;
///
/// let addresser = Addresser::new()?;
/// let parsed = addresser.parse_address("PO Box 123, Austin, TX 78701")?;
/// assert_eq!(parsed.address_line1, "PO Box 123");
/// # Ok::<(), addresser::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Addresser {
    config: AddresserConfig,
    tables: Arc<ReferenceData>,
    parser: AddressParser,
}

impl Addresser {
    /// Initialize with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference tables cannot be loaded or fail
    /// verification.
    pub fn new() -> Result<Self> {
        Self::with_config(AddresserConfig::default())
    }

    /// Initialize with custom configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use addresser::{Addresser, AddresserConfig};
    ///
    /// let config = AddresserConfig::builder()
    ///     .us_only(true)
    ///     .verify_data_integrity(true)
    ///     .build();
    ///
    /// let addresser = Addresser::with_config(config)?;
    /// # Ok::<(), addresser::Error>(())
    /// ```
    pub fn with_config(config: AddresserConfig) -> Result<Self> {
        let tables = ReferenceData::load(&config.data_config)?;
        if config.verify_data_integrity {
            tables.verify()?;
        }
        Self::with_tables(config, tables)
    }

    /// Initialize with already loaded tables, e.g. synthetic ones in tests.
    pub fn with_tables(config: AddresserConfig, tables: ReferenceData) -> Result<Self> {
        let tables = Arc::new(tables);
        let parser = AddressParser::new(Arc::clone(&tables))?.with_us_only(config.us_only);

        Ok(Self {
            config,
            tables,
            parser,
        })
    }

    /// The parser bound to this instance's tables.
    pub fn parser(&self) -> AddressParser {
        self.parser.clone()
    }

    /// Parse an address string into structured components.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use addresser::Addresser;
    ///
    /// let addresser = Addresser::new()?;
    /// let parsed = addresser.parse_address("100 Main St, Apt 4B, Springfield, IL 62701")?;
    ///
    /// assert_eq!(parsed.address_line1, "100 Main St");
    /// assert_eq!(parsed.address_line2, "Apt 4B");
    /// # Ok::<(), addresser::Error>(())
    /// ```
    pub fn parse_address(&self, address: &str) -> Result<Address> {
        self.parser.parse(address)
    }

    /// Pick a random US city using the thread-local generator.
    pub fn random_city(&self) -> Result<City> {
        self.random_city_with(&mut rand::thread_rng())
    }

    /// Pick a random US city using a caller-supplied generator.
    pub fn random_city_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<City> {
        sampler::random_city(self.tables.us_cities(), rng)
    }

    /// Known US cities, keyed by state abbreviation.
    pub fn list_cities(&self) -> &BTreeMap<String, Vec<String>> {
        self.tables.us_cities().as_map()
    }

    /// The reference tables in use.
    pub fn tables(&self) -> &ReferenceData {
        &self.tables
    }

    /// Get the configuration used by this instance.
    pub fn config(&self) -> &AddresserConfig {
        &self.config
    }
}

/// The process-wide instance behind the free functions, created on first use.
fn default_addresser() -> Result<&'static Addresser> {
    if let Some(addresser) = DEFAULT_ADDRESSER.get() {
        return Ok(addresser);
    }
    let addresser = Addresser::new()?;
    Ok(DEFAULT_ADDRESSER.get_or_init(|| addresser))
}

/// Parse an address with the default tables.
///
/// # Errors
///
/// See [`AddressParser::parse`]; additionally returns [`Error::DataError`]
/// if the default tables cannot be loaded.
pub fn parse_address(address: &str) -> Result<Address> {
    default_addresser()?.parse_address(address)
}

/// Pick a random US city from the default tables.
pub fn random_city() -> Result<City> {
    default_addresser()?.random_city()
}

/// Known US cities from the default tables, keyed by state abbreviation.
pub fn list_cities() -> Result<BTreeMap<String, Vec<String>>> {
    Ok(default_addresser()?.list_cities().clone())
}

/// Configuration for table loading and parsing behaviour.
#[derive(Debug, Clone)]
pub struct AddresserConfig {
    /// Whether to verify reference tables after loading
    pub verify_data_integrity: bool,

    /// Whether to resolve states and cities against the US-only tables
    pub us_only: bool,

    /// Data management configuration
    pub data_config: DataConfig,
}

impl Default for AddresserConfig {
    fn default() -> Self {
        Self {
            verify_data_integrity: true,
            us_only: false,
            data_config: DataConfig::default(),
        }
    }
}

impl AddresserConfig {
    /// Create a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use addresser::AddresserConfig;
    ///
    /// let config = AddresserConfig::builder()
    ///     .verify_data_integrity(false)
    ///     .build();
    /// assert!(!config.us_only);
    /// ```
    pub fn builder() -> AddresserConfigBuilder {
        AddresserConfigBuilder::new()
    }
}

/// Builder for AddresserConfig.
#[derive(Debug, Clone)]
pub struct AddresserConfigBuilder {
    verify_data_integrity: bool,
    us_only: bool,
    data_config: DataConfig,
}

impl AddresserConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            verify_data_integrity: true,
            us_only: false,
            data_config: DataConfig::default(),
        }
    }

    /// Set whether to verify reference tables.
    pub fn verify_data_integrity(mut self, enabled: bool) -> Self {
        self.verify_data_integrity = enabled;
        self
    }

    /// Set whether to parse against the US-only tables.
    pub fn us_only(mut self, enabled: bool) -> Self {
        self.us_only = enabled;
        self
    }

    /// Set the data configuration.
    pub fn data_config(mut self, config: DataConfig) -> Self {
        self.data_config = config;
        self
    }

    /// Load tables from a directory instead of the bundled copy.
    pub fn data_dir<P: Into<std::path::PathBuf>>(mut self, dir: P) -> Self {
        self.data_config.data_dir = dir.into();
        self.data_config.use_bundled = false;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AddresserConfig {
        AddresserConfig {
            verify_data_integrity: self.verify_data_integrity,
            us_only: self.us_only,
            data_config: self.data_config,
        }
    }
}

impl Default for AddresserConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "bundled-data"))]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_monterey_park() {
        let parsed = parse_address("705 Monterey Pass Rd, Monterey Park, CA 91754").unwrap();
        assert_eq!(
            parsed,
            Address {
                id: "705-Monterey-Pass-Rd%2C-Monterey-Park%2C-CA-91754".to_string(),
                zip_code: "91754".to_string(),
                zip_code_plus_four: String::new(),
                state_abbreviation: "CA".to_string(),
                state_name: "California".to_string(),
                place_name: "Monterey Park".to_string(),
                address_line1: "705 Monterey Pass Rd".to_string(),
                address_line2: String::new(),
                street_number: "705".to_string(),
                street_name: "Monterey Pass Rd".to_string(),
                street_suffix: String::new(),
                street_direction: String::new(),
                formatted_address: "705 Monterey Pass Rd, Monterey Park, CA 91754".to_string(),
            }
        );
    }

    #[test]
    fn test_po_box() {
        let parsed = parse_address("PO Box 123, Austin, TX 78701").unwrap();
        assert_eq!(parsed.address_line1, "PO Box 123");
        assert!(parsed.street_number.is_empty());
        assert!(parsed.street_name.is_empty());
        assert_eq!(parsed.place_name, "Austin");
        assert_eq!(parsed.formatted_address, "PO Box 123, Austin, TX 78701");
    }

    #[test]
    fn test_secondary_line() {
        let parsed = parse_address("100 Main St, Apt 4B, Springfield, IL 62701").unwrap();
        assert_eq!(parsed.address_line1, "100 Main St");
        assert_eq!(parsed.address_line2, "Apt 4B");
        assert_eq!(parsed.place_name, "Springfield");
        assert_eq!(
            parsed.formatted_address,
            "100 Main St, Apt 4B, Springfield, IL 62701"
        );
    }

    #[test]
    fn test_secondary_line_first() {
        let parsed = parse_address("Apt 4B, 100 Main St, Springfield, IL 62701").unwrap();
        assert_eq!(parsed.address_line1, "100 Main St");
        assert_eq!(parsed.address_line2, "Apt 4B");
    }

    #[test]
    fn test_no_state() {
        assert_matches!(
            parse_address("1 Two Three Four"),
            Err(Error::StateNotFound { .. })
        );
    }

    #[test]
    fn test_empty_input() {
        assert_matches!(parse_address(""), Err(Error::EmptyInput));
    }

    #[test]
    fn test_too_many_lines() {
        assert_matches!(
            parse_address("100 Main St, Bldg 2, Apt 4B, Springfield, IL 62701"),
            Err(Error::TooManyAddressLines { .. })
        );
    }

    #[test]
    fn test_zip_plus_four() {
        let parsed = parse_address("100 Main St, Springfield, IL 62701-1234").unwrap();
        assert_eq!(parsed.zip_code, "62701");
        assert_eq!(parsed.zip_code_plus_four, "62701-1234");
        assert_eq!(parsed.formatted_address, "100 Main St, Springfield, IL 62701");
    }

    #[test]
    fn test_state_abbreviation_case_insensitive() {
        for state in ["tx", "Tx", "TX"] {
            let parsed = parse_address(&format!("PO Box 9, Austin, {state} 78701")).unwrap();
            assert_eq!(parsed.state_abbreviation, "TX");
            assert_eq!(parsed.state_name, "Texas");
        }
    }

    #[test]
    fn test_full_state_name_and_country() {
        let parsed = parse_address(
            "1600 Pennsylvania Ave NW, Washington, District of Columbia 20500, USA",
        )
        .unwrap();
        assert_eq!(parsed.state_abbreviation, "DC");
        assert_eq!(parsed.state_name, "District Of Columbia");
        assert_eq!(parsed.place_name, "Washington");
        assert_eq!(parsed.street_direction, "NW");
        assert_eq!(parsed.address_line1, "1600 Pennsylvania Ave NW");
    }

    #[test]
    fn test_single_line_address() {
        let parsed = parse_address("233 S Wacker Dr Chicago IL 60606").unwrap();
        assert_eq!(parsed.place_name, "Chicago");
        assert_eq!(parsed.address_line1, "233 S Wacker Dr");
        assert_eq!(parsed.street_number, "233");
    }

    #[test]
    fn test_canadian_address() {
        let parsed = parse_address("100 Queen St W, Toronto, ON M5H 2N2, Canada").unwrap();
        assert_eq!(parsed.zip_code, "M5H 2N2");
        assert_eq!(parsed.state_abbreviation, "ON");
        assert_eq!(parsed.state_name, "Ontario");
        assert_eq!(parsed.street_direction, "W");

        let us_only = Addresser::with_config(AddresserConfig::builder().us_only(true).build())
            .unwrap();
        assert_matches!(
            us_only.parse_address("100 Queen St W, Toronto, ON M5H 2N2, Canada"),
            Err(Error::StateNotFound { .. })
        );
    }

    #[test]
    fn test_city_ending_in_another_city_name() {
        let parsed = parse_address("123 Main St, North Las Vegas, NV 89030").unwrap();
        assert_eq!(parsed.place_name, "North Las Vegas");
        assert!(parsed.address_line2.is_empty());
        assert_eq!(
            parsed.formatted_address,
            "123 Main St, North Las Vegas, NV 89030"
        );

        let parsed = parse_address("100 Main St South Portland ME 04106").unwrap();
        assert_eq!(parsed.place_name, "South Portland");
        assert!(parsed.street_direction.is_empty());
        assert_eq!(parsed.address_line1, "100 Main St");
    }

    #[test]
    fn test_unknown_city_is_incomplete() {
        let parsed = parse_address("100 Main St, CA 91754").unwrap();
        assert!(parsed.place_name.is_empty());
        assert!(parsed.formatted_address.is_empty());
        assert!(parsed.id.is_empty());
    }

    #[test]
    fn test_formatted_address_reproduces_input() {
        for input in [
            "705 Monterey Pass Rd, Monterey Park, CA 91754",
            "100 Main St, Springfield, IL 62701",
            "42 Elm Ave, Austin, TX 78701",
            "9 Harbor Way, Seattle, WA 98101",
        ] {
            assert_eq!(parse_address(input).unwrap().formatted_address, input);
        }
    }

    #[test]
    fn test_reparse_is_idempotent() {
        for input in [
            "705 monterey pass rd, MONTEREY PARK, ca 91754",
            "100 main st n apt 4, springfield, illinois 62701-1234",
            "100 5th ave a, new york, ny 10001",
            "Apt 4B, 100 Main St, Springfield, IL 62701",
            "P.O. Box 77, Austin, Texas 78701",
            "42 little brook unit 7, Salem, OR 97301",
        ] {
            let first = parse_address(input).unwrap();
            let second = parse_address(&first.formatted_address).unwrap();
            assert_eq!(first.state_abbreviation, second.state_abbreviation, "{input}");
            assert_eq!(first.zip_code, second.zip_code, "{input}");
            assert_eq!(first.place_name, second.place_name, "{input}");
            assert_eq!(first.address_line1, second.address_line1, "{input}");
        }
    }

    #[test]
    fn test_random_city_is_listed() {
        let addresser = Addresser::new().unwrap();
        let city = addresser
            .random_city_with(&mut StdRng::seed_from_u64(3))
            .unwrap();
        let cities = list_cities().unwrap();
        assert!(cities[&city.state].contains(&city.city));
        assert!(random_city().is_ok());
    }

    #[test]
    fn test_list_cities_is_us_only() {
        let cities = list_cities().unwrap();
        assert!(cities.contains_key("CA"));
        assert!(!cities.contains_key("ON"));
    }

    #[test]
    fn test_config_builder() {
        let config = AddresserConfig::builder()
            .us_only(true)
            .verify_data_integrity(false)
            .data_dir("/tmp/addresser-data")
            .build();
        assert!(config.us_only);
        assert!(!config.verify_data_integrity);
        assert!(!config.data_config.use_bundled);
    }

    #[test]
    fn test_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AddresserConfig::builder().data_dir(dir.path()).build();
        assert_matches!(Addresser::with_config(config), Err(Error::IoError { .. }));

        let config = AddresserConfig::builder()
            .data_dir(dir.path().join("absent"))
            .build();
        assert_matches!(Addresser::with_config(config), Err(Error::DataError { .. }));
    }

    #[test]
    fn test_parallel_parse_from_threads() {
        let addresser = Addresser::new().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let addresser = addresser.clone();
                std::thread::spawn(move || {
                    addresser
                        .parse_address(&format!("{} Main St, Springfield, IL 62701", 100 + i))
                        .unwrap()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let parsed = handle.join().unwrap();
            assert_eq!(parsed.street_number, (100 + i).to_string());
        }
    }
}
