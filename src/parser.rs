//! Address parsing pipeline.
//!
//! Parsing carves known components off the tail of the input, one stage at a
//! time: country, ZIP code, state, city. Whatever is left is split into a
//! street line and an optional secondary line, and the street line is handed
//! to the [street grammars](crate::street). Every stage takes the remaining
//! segments plus the partially filled [`Address`] by value and returns the
//! updated pair, so the order of mutation is exactly the order of the stages.

use crate::composer;
use crate::data::ReferenceData;
use crate::error::{Error, Result};
use crate::normalizer::{self, strip_word_suffix, title_case};
use crate::street::{self, StreetParser};
use crate::types::{Address, Country};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static ZIP_PLUS_FOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{5}-\d{4}$").expect("valid regex"));

static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{5}$").expect("valid regex"));

/// Loose Canadian postal code shape, e.g. "K1A 0B1".
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]\d[A-Z] ?\d[A-Z]\d$").expect("valid regex"));

/// Remaining input segments and the record built so far.
#[derive(Debug)]
struct Carving {
    input: String,
    segments: Vec<String>,
    address: Address,
}

impl Carving {
    /// Replace the last segment with `rest`, or drop it when nothing is left.
    fn replace_last(&mut self, rest: &str) {
        let rest = rest.trim();
        if rest.is_empty() {
            self.segments.pop();
        } else if let Some(last) = self.segments.last_mut() {
            *last = rest.to_string();
        }
    }
}

/// Rule-based address parser over a set of reference tables.
#[derive(Debug, Clone)]
pub struct AddressParser {
    tables: Arc<ReferenceData>,
    us_only: bool,
    street: StreetParser,
    leading_unit: Regex,
    misplaced_unit: Regex,
}

impl AddressParser {
    /// Create a parser over the given tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataError`] if the secondary-unit keywords do not
    /// compile into a pattern.
    pub fn new(tables: Arc<ReferenceData>) -> Result<Self> {
        let units = street::keyword_alternation(tables.secondary_units());

        Ok(Self {
            street: StreetParser::new(Arc::clone(&tables))?,
            leading_unit: street::compile(&format!(r"(?i)^(?:{units})\b"))?,
            misplaced_unit: street::compile(&format!(r"(?i)^(?:{units})\s\S+"))?,
            tables,
            us_only: false,
        })
    }

    /// Restrict state and city resolution to the US-only tables.
    pub fn with_us_only(mut self, us_only: bool) -> Self {
        self.us_only = us_only;
        self
    }

    /// The reference tables this parser matches against.
    pub fn tables(&self) -> &ReferenceData {
        &self.tables
    }

    /// Parse an address string into structured components.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for a zero-length string
    /// - [`Error::StateNotFound`] when no state can be resolved
    /// - [`Error::TooManyAddressLines`] when more than two lines remain
    /// - [`Error::InvalidStreetData`] when no street grammar matches
    ///
    /// # Example
    ///
    /// ```rust
    /// use addresser::Addresser;
    ///
    /// let parser = Addresser::new()?.parser();
    /// let parsed = parser.parse("100 Main St, Apt 4B, Springfield, IL 62701")?;
    /// assert_eq!(parsed.address_line1, "100 Main St");
    /// assert_eq!(parsed.address_line2, "Apt 4B");
    /// # Ok::<(), addresser::Error>(())
    /// ```
    pub fn parse(&self, address: &str) -> Result<Address> {
        let normalized = normalizer::normalize(address)?;
        let carving = Carving {
            input: normalized.original,
            segments: normalized.segments,
            address: Address::default(),
        };

        let carving = strip_country(carving);
        let carving = extract_zip(carving);
        let carving = self.resolve_state(carving)?;
        let carving = self.resolve_city(carving);
        let (street_line, carving) = self.split_lines(carving)?;
        let address = self.parse_street(&street_line, carving)?;

        Ok(composer::compose(address))
    }

    /// Parse multiple addresses in order.
    pub fn parse_batch(&self, addresses: &[&str]) -> Vec<Result<Address>> {
        addresses.iter().map(|addr| self.parse(addr)).collect()
    }

    /// Parse multiple addresses in parallel using multiple threads.
    ///
    /// The parser is shared by reference across threads; results keep the
    /// order of the input.
    #[cfg(feature = "parallel")]
    pub fn parse_batch_parallel(&self, addresses: &[&str]) -> Vec<Result<Address>> {
        use rayon::prelude::*;

        addresses.par_iter().map(|addr| self.parse(addr)).collect()
    }

    /// Parse multiple addresses in parallel and return only successful results.
    #[cfg(feature = "parallel")]
    pub fn parse_batch_parallel_ok(&self, addresses: &[&str]) -> Vec<Address> {
        self.parse_batch_parallel(addresses)
            .into_iter()
            .filter_map(|result| result.ok())
            .collect()
    }

    fn resolve_state(&self, mut carving: Carving) -> Result<Carving> {
        let states = self.tables.states(self.us_only);
        let Some(segment) = carving.segments.last().map(|s| s.trim().to_string()) else {
            return Err(Error::state_not_found(carving.input));
        };

        let exact = (segment.chars().count() == 2)
            .then(|| states.name_for(&segment))
            .flatten()
            .map(|name| (name.to_string(), segment.to_uppercase(), String::new()));

        let resolved = exact.or_else(|| {
            states.scan_order().find_map(|(name, abbr)| {
                strip_word_suffix(&segment, name)
                    .or_else(|| strip_word_suffix(&segment, abbr))
                    .map(|rest| (name.to_string(), abbr.to_string(), rest.to_string()))
            })
        });

        let Some((name, abbreviation, rest)) = resolved else {
            return Err(Error::state_not_found(carving.input));
        };
        if abbreviation.chars().count() != 2 {
            return Err(Error::state_not_found(carving.input));
        }

        log::debug!("Resolved state {abbreviation} ({name}), remaining {rest:?}");
        carving.address.state_abbreviation = abbreviation;
        carving.address.state_name = title_case(&name);
        carving.replace_last(&rest);
        Ok(carving)
    }

    fn resolve_city(&self, mut carving: Carving) -> Carving {
        let cities = self
            .tables
            .cities(self.us_only)
            .scan_order(&carving.address.state_abbreviation);
        let Some(segment) = carving.segments.last().cloned() else {
            return carving;
        };

        let found = cities
            .iter()
            .find_map(|city| strip_word_suffix(&segment, city).map(|rest| (city, rest)));

        match found {
            Some((city, rest)) => {
                log::debug!("Resolved city {city:?}, remaining {rest:?}");
                carving.address.place_name = title_case(city);
                carving.replace_last(rest);
            }
            None => log::debug!("No known city at the end of {segment:?}"),
        }
        carving
    }

    fn split_lines(&self, mut carving: Carving) -> Result<(String, Carving)> {
        match carving.segments.len() {
            0 => Err(Error::invalid_street_data(carving.input)),
            1 => {
                let mut line = carving.segments[0].trim().to_string();
                if let Some(unit) = self.misplaced_unit.find(&line) {
                    let rest = line[unit.end()..].trim();
                    if !rest.is_empty() {
                        log::debug!("Secondary unit {:?} found before street line", unit.as_str());
                        carving.address.address_line2 = unit.as_str().to_string();
                        line = rest.to_string();
                    }
                }
                Ok((line, carving))
            }
            2 => {
                if self.leading_unit.is_match(&carving.segments[0]) {
                    carving.segments.swap(0, 1);
                }
                carving.address.address_line2 = carving.segments[1].trim().to_string();
                let line = carving.segments[0].trim().to_string();
                Ok((line, carving))
            }
            n => {
                log::debug!("{n} address lines remain after place data");
                Err(Error::too_many_address_lines(carving.input))
            }
        }
    }

    fn parse_street(&self, line: &str, carving: Carving) -> Result<Address> {
        let Carving {
            input, mut address, ..
        } = carving;

        let has_secondary = !address.address_line2.is_empty();
        let Some(parsed) = self.street.parse(line, has_secondary) else {
            return Err(Error::invalid_street_data(input));
        };
        log::debug!("Street line {line:?} parsed by {} grammar", parsed.grammar);

        if let Some(secondary) = parsed.secondary {
            address.address_line2 = secondary;
        }
        if let Some(remainder) = parsed.remainder {
            if !address.address_line2.is_empty() {
                return Err(Error::too_many_address_lines(input));
            }
            address.address_line2 = remainder;
        }

        address.address_line1 = parsed.address_line1;
        address.street_number = parsed.street_number;
        address.street_name = parsed.street_name;
        address.street_suffix = parsed.street_suffix;
        address.street_direction = parsed.street_direction;
        Ok(address)
    }
}

fn strip_country(mut carving: Carving) -> Carving {
    if let Some(country) = carving.segments.last().and_then(|s| Country::from_token(s)) {
        log::debug!("Dropping country segment ({country})");
        carving.segments.pop();
    }
    carving
}

fn extract_zip(mut carving: Carving) -> Carving {
    let Some(segment) = carving.segments.last().cloned() else {
        return carving;
    };

    let rest = if let Some(m) = ZIP_PLUS_FOUR_RE.find(&segment) {
        carving.address.zip_code = m.as_str()[..5].to_string();
        carving.address.zip_code_plus_four = m.as_str().to_string();
        &segment[..m.start()]
    } else if let Some(m) = ZIP_RE.find(&segment) {
        carving.address.zip_code = m.as_str().to_string();
        &segment[..m.start()]
    } else if let Some(m) = POSTAL_CODE_RE.find(&segment) {
        carving.address.zip_code = m.as_str().to_string();
        &segment[..m.start()]
    } else {
        return carving;
    };

    log::debug!("Extracted postal code {:?}", carving.address.zip_code);
    carving.replace_last(rest);
    carving
}
