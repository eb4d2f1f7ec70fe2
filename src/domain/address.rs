// src/domain/address.rs

/// Builds the one-line postal address shown in the address history,
/// e.g. "Vestergade 7, 2. tv, 8000 Aarhus C".
///
/// House number, floor and side lose their leading zeros; floor and side are
/// lowercased and only appear when they carry a value.
pub fn format_address(
    street: &str,
    house_number: &str,
    floor: &str,
    side: &str,
    postal_code: &str,
    city: &str,
) -> String {
    let mut address = format!("{} {}, ", street.trim(), strip_zeros(house_number));

    let floor = strip_zeros(floor);
    if !floor.is_empty() {
        address.push_str(&format!("{}. ", floor.to_lowercase()));
    }

    let side = strip_zeros(side);
    if !side.is_empty() {
        address.push_str(&format!("{}, ", side.to_lowercase()));
    }

    address.push_str(&format!("{} {}", postal_code.trim(), city.trim()));
    address
}

fn strip_zeros(value: &str) -> &str {
    value.trim().trim_start_matches('0')
}
