//! Advanced usage example for addresser.
//!
//! This example demonstrates:
//! - Custom configuration
//! - Error handling patterns
//! - Batch parsing
//! - Reproducible city sampling
//!
//! Run with: cargo run --example advanced_usage

use addresser::{Addresser, AddresserConfig, Error};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;

fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    println!("addresser Advanced Usage Example");
    println!("================================\n");

    // Example 1: Custom configuration
    println!("1. Custom Configuration");
    println!("----------------------");

    let config = AddresserConfig::builder()
        .verify_data_integrity(true)
        .us_only(true)
        .build();
    let addresser = Addresser::with_config(config)?;
    println!("✓ US-only addresser initialized\n");

    // Example 2: Error handling
    println!("2. Error Handling");
    println!("----------------");

    let inputs = [
        "",
        "123 Main St, Springfield",
        "1 A St, 2 B St, 3 C St, Springfield, IL 62701",
        "100 Queen St W, Toronto, ON M5H 2N2",
    ];
    for input in inputs {
        match addresser.parse_address(input) {
            Ok(parsed) => println!("  ok:    {input:?} -> {}", parsed.formatted_address),
            Err(Error::EmptyInput) => println!("  empty: nothing to parse"),
            Err(e) if e.is_parse_error() => println!("  parse: {e}"),
            Err(e) => return Err(e),
        }
    }
    println!();

    // Example 3: Batch parsing
    println!("3. Batch Parsing");
    println!("---------------");

    let batch = [
        "123 Main St, Springfield, IL 62701",
        "456 Oak Ave, Portland, OR 97201",
        "789 Pine Rd, Austin, TX 78701",
        "321 Elm St, Seattle, WA 98101",
    ];
    let parser = addresser.parser();

    let start = Instant::now();
    let results = parser.parse_batch(&batch);
    println!("Sequential: {} addresses in {:?}", batch.len(), start.elapsed());

    #[cfg(feature = "parallel")]
    {
        let start = Instant::now();
        let parsed = parser.parse_batch_parallel_ok(&batch);
        println!("Parallel:   {} addresses in {:?}", parsed.len(), start.elapsed());
    }

    for (input, result) in batch.iter().zip(&results) {
        match result {
            Ok(parsed) => println!("  {input} -> {}", parsed.id),
            Err(e) => println!("  {input} -> {e}"),
        }
    }
    println!();

    // Example 4: Reproducible sampling
    println!("4. Reproducible Sampling");
    println!("-----------------------");

    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..3 {
        println!("  {}", addresser.random_city_with(&mut rng)?);
    }
    println!(
        "  {} states with known cities",
        addresser.list_cities().len()
    );
    println!();

    println!("All examples completed successfully!");
    Ok(())
}
