//! Basic usage example for addresser.
//!
//! Parses a few US addresses with the bundled reference data and prints the
//! resulting records.
//!
//! Run with: cargo run --example basic_usage

use addresser::{Addresser, Error};

fn main() -> Result<(), Error> {
    println!("addresser Basic Usage Example");
    println!("=============================\n");

    let addresser = Addresser::new()?;
    println!("✓ Reference data loaded\n");

    let addresses = [
        "705 Monterey Pass Rd, Monterey Park, CA 91754",
        "PO Box 1234, Austin, TX 78701",
        "Suite 200, 100 Congress Ave, Austin, TX 78701-4042",
        "1600 Pennsylvania Ave NW, Washington, District Of Columbia 20500, USA",
    ];

    for address in addresses {
        println!("Input: {address}");
        let parsed = match addresser.parse_address(address) {
            Ok(parsed) => parsed,
            Err(e) => {
                println!("  ✗ {e}\n");
                continue;
            }
        };
        println!("  Line 1:    {}", parsed.address_line1);
        if !parsed.address_line2.is_empty() {
            println!("  Line 2:    {}", parsed.address_line2);
        }
        println!("  Number:    {}", parsed.street_number);
        println!("  Street:    {}", parsed.street_name);
        println!("  Suffix:    {}", parsed.street_suffix);
        println!("  Place:     {}", parsed.place_name);
        println!("  State:     {}", parsed.state_abbreviation);
        println!("  ZIP:       {}", parsed.zip_code);
        println!("  Formatted: {}", parsed.formatted_address);
        println!("  ID:        {}\n", parsed.id);
    }

    // Failures carry the offending input.
    match addresser.parse_address("123 Nowhere Lane, Atlantis") {
        Ok(parsed) => println!("Unexpectedly parsed: {parsed}"),
        Err(e) => println!("Expected failure: {e}"),
    }

    let city = addresser.random_city()?;
    println!("\nRandom city: {city}");

    Ok(())
}
