//! Random city sampling.

use crate::data::CityTable;
use crate::error::{Error, Result};
use crate::types::City;
use rand::Rng;
use rand::seq::SliceRandom;

/// Pick a random city: a uniformly chosen state, then a uniformly chosen
/// city within it. States without cities are never chosen.
///
/// # Errors
///
/// Returns [`Error::DataError`] if the table has no cities at all.
pub fn random_city<R: Rng + ?Sized>(table: &CityTable, rng: &mut R) -> Result<City> {
    let states: Vec<(&String, &Vec<String>)> = table
        .as_map()
        .iter()
        .filter(|(_, cities)| !cities.is_empty())
        .collect();

    let (state, cities) = states
        .choose(rng)
        .ok_or_else(|| Error::data_error("City table is empty"))?;
    let city = cities
        .choose(rng)
        .ok_or_else(|| Error::data_error(format!("No cities for state {state}")))?;

    Ok(City {
        city: city.clone(),
        state: (*state).clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeMap;

    fn table() -> CityTable {
        CityTable::new(BTreeMap::from([
            ("OR".to_string(), vec!["Portland".to_string(), "Salem".to_string()]),
            ("TX".to_string(), vec!["Austin".to_string()]),
            ("WY".to_string(), vec![]),
        ]))
    }

    #[test]
    fn test_same_seed_same_city() {
        let table = table();
        let first = random_city(&table, &mut StdRng::seed_from_u64(7)).unwrap();
        let second = random_city(&table, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_samples_come_from_table() {
        let table = table();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let city = random_city(&table, &mut rng).unwrap();
            assert_ne!(city.state, "WY");
            assert!(table.cities_in(&city.state).contains(&city.city));
        }
    }

    #[test]
    fn test_empty_table() {
        let empty = CityTable::default();
        assert_matches!(
            random_city(&empty, &mut StdRng::seed_from_u64(1)),
            Err(Error::DataError { .. })
        );
    }
}
