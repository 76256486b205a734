//! Street line grammars.
//!
//! A street line is decomposed by the first grammar in [`StreetGrammar::ORDER`]
//! that matches it. The order is part of the observable behaviour: several
//! inputs are matched by more than one grammar ("100 5th Ave N" is both an
//! avenue-with-letter and a standard street with a direction), and the
//! earlier grammar always wins.

use crate::data::{ReferenceData, SecondaryUnitTable};
use crate::error::{Error, Result};
use crate::normalizer::title_case;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// One of the street line grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreetGrammar {
    /// "<number> <name> Ave <letter>", e.g. "100 5th Ave A"
    AvenueLetter,
    /// "<number> <name> <street type> [direction]", e.g. "100 Main St NE"
    Standard,
    /// "PO Box <id>", "Post Office Drawer <id>"
    PoBox,
    /// "<digits> <words>" with no recognisable street type
    NoSuffix,
}

impl StreetGrammar {
    /// Priority order in which grammars are tried.
    pub const ORDER: [StreetGrammar; 4] = [
        StreetGrammar::AvenueLetter,
        StreetGrammar::Standard,
        StreetGrammar::PoBox,
        StreetGrammar::NoSuffix,
    ];
}

impl fmt::Display for StreetGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreetGrammar::AvenueLetter => "avenue-letter",
            StreetGrammar::Standard => "standard",
            StreetGrammar::PoBox => "po-box",
            StreetGrammar::NoSuffix => "no-suffix",
        };
        f.write_str(name)
    }
}

/// Components extracted from a street line by a single grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStreet {
    /// Grammar that produced this result
    pub grammar: StreetGrammar,
    /// Reassembled primary street line
    pub address_line1: String,
    /// House number, empty for PO boxes
    pub street_number: String,
    /// Street name, empty for PO boxes
    pub street_name: String,
    /// Canonical street suffix, if one was resolved
    pub street_suffix: String,
    /// Directional abbreviation, if present
    pub street_direction: String,
    /// Text the grammar did not consume
    pub remainder: Option<String>,
    /// Secondary unit peeled from the end of the line
    pub secondary: Option<String>,
}

impl ParsedStreet {
    fn new(grammar: StreetGrammar) -> Self {
        Self {
            grammar,
            address_line1: String::new(),
            street_number: String::new(),
            street_name: String::new(),
            street_suffix: String::new(),
            street_direction: String::new(),
            remainder: None,
            secondary: None,
        }
    }
}

/// Applies the street grammars against a set of reference tables.
#[derive(Debug, Clone)]
pub struct StreetParser {
    tables: Arc<ReferenceData>,
    po_box: Regex,
    no_suffix: Regex,
    trailing_unit: Regex,
}

impl StreetParser {
    /// Compile the grammars for the given tables.
    pub fn new(tables: Arc<ReferenceData>) -> Result<Self> {
        let units = keyword_alternation(tables.secondary_units());

        Ok(Self {
            po_box: compile(r"(?i)\b(?:P\.?\s?O\.?|POST\s+OFFICE)\s+(?:BOX|DRAWER)\s+\w+")?,
            no_suffix: compile(r"\b\d+\s[a-zA-Z0-9_ '\-]*[a-zA-Z0-9_]")?,
            trailing_unit: compile(&format!(r"(?i)\s(?:{units})\.?\s[a-zA-Z0-9_\-]+$"))?,
            tables,
        })
    }

    /// Decompose a street line with the first grammar that matches.
    ///
    /// `has_secondary` tells the grammars whether a secondary line is already
    /// known; the no-suffix grammar only peels a trailing unit when it is not.
    pub fn parse(&self, line: &str, has_secondary: bool) -> Option<ParsedStreet> {
        StreetGrammar::ORDER
            .iter()
            .find_map(|grammar| self.try_match(*grammar, line, has_secondary))
    }

    /// Try a single grammar.
    pub fn try_match(
        &self,
        grammar: StreetGrammar,
        line: &str,
        has_secondary: bool,
    ) -> Option<ParsedStreet> {
        let line = line.trim();
        let parsed = match grammar {
            StreetGrammar::AvenueLetter => self.match_avenue_letter(line),
            StreetGrammar::Standard => self.match_standard(line),
            StreetGrammar::PoBox => self.match_po_box(line),
            StreetGrammar::NoSuffix => self.match_no_suffix(line, has_secondary),
        };
        log::trace!(
            "{grammar} grammar {} {line:?}",
            if parsed.is_some() { "matched" } else { "rejected" }
        );
        parsed
    }

    fn match_avenue_letter(&self, line: &str) -> Option<ParsedStreet> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 || !starts_with_digit(tokens[0]) {
            return None;
        }

        let ave = (1..tokens.len() - 1)
            .find(|&i| is_avenue(tokens[i]) && is_single_letter(tokens[i + 1]))?;

        let mut name_parts: Vec<&str> = tokens[1..=ave + 1].to_vec();
        name_parts[ave - 1] = "Ave";

        let mut parsed = ParsedStreet::new(StreetGrammar::AvenueLetter);
        parsed.street_number = tokens[0].to_string();
        parsed.street_name = title_case(&name_parts.join(" "));
        parsed.street_suffix = "Ave".to_string();
        parsed.address_line1 = format!("{} {}", parsed.street_number, parsed.street_name);
        parsed.remainder = join_nonempty(&tokens[ave + 2..]);
        Some(parsed)
    }

    fn match_standard(&self, line: &str) -> Option<ParsedStreet> {
        let street_types = self.tables.street_types();
        let directionals = self.tables.directionals();

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 || !starts_with_digit(tokens[0]) {
            return None;
        }

        let type_index = (1..tokens.len())
            .rev()
            .find(|&i| street_types.is_street_type(tokens[i]))?;

        let mut parsed = ParsedStreet::new(StreetGrammar::Standard);
        let mut end = type_index;
        if let Some(abbr) = tokens
            .get(type_index + 1)
            .and_then(|token| directionals.abbreviation(token))
        {
            parsed.street_direction = abbr.to_string();
            end += 1;
        }

        let parts = &tokens[..=type_index];
        parsed.street_number = parts[0].to_string();

        // With only a number and one word there is no real suffix: the word
        // merely happens to look like one ("12 Park").
        let name = if parts.len() > 2 {
            let written = parts[parts.len() - 1];
            let written = written.strip_suffix('.').unwrap_or(written);
            let mut name_parts = parts[1..parts.len() - 1].to_vec();
            match street_types.canonical(written) {
                Some(canonical) => parsed.street_suffix = title_case(&canonical.to_lowercase()),
                None => name_parts.push(written),
            }
            name_parts.join(" ")
        } else {
            parts[1].to_string()
        };
        parsed.street_name = title_case(&name);

        parsed.address_line1 = [
            parsed.street_number.as_str(),
            parsed.street_name.as_str(),
            parsed.street_suffix.as_str(),
            parsed.street_direction.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
        parsed.remainder = join_nonempty(&tokens[end + 1..]);
        Some(parsed)
    }

    fn match_po_box(&self, line: &str) -> Option<ParsedStreet> {
        let m = self.po_box.find(line)?;

        let mut parsed = ParsedStreet::new(StreetGrammar::PoBox);
        parsed.address_line1 = m.as_str().to_string();
        parsed.remainder = leftover(line, m.start(), m.end());
        Some(parsed)
    }

    fn match_no_suffix(&self, line: &str, has_secondary: bool) -> Option<ParsedStreet> {
        if !self.no_suffix.is_match(line) {
            return None;
        }

        if !has_secondary {
            if let Some(unit) = self.trailing_unit.find(line) {
                let head = line[..unit.start()].trim();
                if let Some(mut parsed) = self.decompose_no_suffix(head) {
                    parsed.secondary = Some(unit.as_str().trim().to_string());
                    return Some(parsed);
                }
            }
        }

        self.decompose_no_suffix(line)
    }

    fn decompose_no_suffix(&self, line: &str) -> Option<ParsedStreet> {
        let m = self.no_suffix.find(line)?;
        let (number, name) = m.as_str().split_once(' ')?;

        let mut parsed = ParsedStreet::new(StreetGrammar::NoSuffix);
        parsed.address_line1 = m.as_str().to_string();
        parsed.street_number = number.to_string();
        parsed.street_name = name.trim().to_string();
        parsed.remainder = leftover(line, m.start(), m.end());
        Some(parsed)
    }
}

/// Regex alternation of every secondary-unit keyword, longest first.
pub(crate) fn keyword_alternation(units: &SecondaryUnitTable) -> String {
    let mut keywords: Vec<&str> = units.keywords().collect();
    keywords.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|")
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| Error::data_error(format!("Failed to compile pattern {pattern:?}: {e}")))
}

fn starts_with_digit(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_avenue(token: &str) -> bool {
    ["ave", "ave.", "avenue"]
        .iter()
        .any(|form| token.eq_ignore_ascii_case(form))
}

fn is_single_letter(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphabetic())
}

fn join_nonempty(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

fn leftover(line: &str, start: usize, end: usize) -> Option<String> {
    let rest = [line[..start].trim(), line[end..].trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if rest.is_empty() { None } else { Some(rest) }
}
