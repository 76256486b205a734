//! Builds the canonical formatted address and its identifier.

use crate::types::Address;

/// Fill in `formatted_address` and `id` when the record is complete.
///
/// Incomplete records are returned unchanged, with both fields left empty.
pub fn compose(mut address: Address) -> Address {
    if !address.is_complete() {
        log::debug!("Address incomplete, skipping formatted form");
        return address;
    }

    address.formatted_address = build_one_line_address(
        &address.address_line1,
        &address.address_line2,
        &address.place_name,
        &address.state_abbreviation,
        &address.zip_code,
    );
    address.id = address_id(&address.formatted_address);
    address
}

/// Builds "<line1>[, <line2>], <place>, <state> <zip>".
#[must_use]
pub fn build_one_line_address(
    line1: &str,
    line2: &str,
    place: &str,
    state: &str,
    zip: &str,
) -> String {
    let mut lines = line1.to_string();
    if !line2.is_empty() {
        lines.push_str(", ");
        lines.push_str(line2);
    }
    format!("{lines}, {place}, {state} {zip}")
}

/// Derive a URL-safe identifier from a formatted address.
///
/// Spaces, `#`, `//` and `.` become `-`, then the result is query-escaped.
#[must_use]
pub fn address_id(formatted: &str) -> String {
    let dashed = formatted
        .replace(' ', "-")
        .replace('#', "-")
        .replace("//", "-")
        .replace('.', "-");
    query_escape(&dashed)
}

/// Percent-encoding for URL query components.
///
/// Unreserved characters pass through, space becomes `+`, every other byte
/// is written as `%XX`.
fn query_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Address {
        Address {
            address_line1: "705 Monterey Pass Rd".to_string(),
            place_name: "Monterey Park".to_string(),
            state_abbreviation: "CA".to_string(),
            zip_code: "91754".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_compose_complete_address() {
        let composed = compose(complete());
        assert_eq!(
            composed.formatted_address,
            "705 Monterey Pass Rd, Monterey Park, CA 91754"
        );
        assert_eq!(
            composed.id,
            "705-Monterey-Pass-Rd%2C-Monterey-Park%2C-CA-91754"
        );
    }

    #[test]
    fn test_compose_includes_second_line() {
        let composed = compose(Address {
            address_line2: "Apt #4".to_string(),
            ..complete()
        });
        assert_eq!(
            composed.formatted_address,
            "705 Monterey Pass Rd, Apt #4, Monterey Park, CA 91754"
        );
        assert_eq!(
            composed.id,
            "705-Monterey-Pass-Rd%2C-Apt--4%2C-Monterey-Park%2C-CA-91754"
        );
    }

    #[test]
    fn test_compose_incomplete_address() {
        let composed = compose(Address {
            zip_code: String::new(),
            ..complete()
        });
        assert!(composed.formatted_address.is_empty());
        assert!(composed.id.is_empty());
    }

    #[test]
    fn test_address_id_replacements() {
        assert_eq!(address_id("1/2 St. Rd"), "1%2F2-St--Rd");
        assert_eq!(address_id("a//b"), "a-b");
        assert_eq!(address_id("O'Neil"), "O%27Neil");
    }
}
