//! Column letters and cell names (1 → A, 26 → Z, 27 → AA)

use crate::error::{TabulaError, TabulaResult};

/// Convert a 1-based column ordinal to its letter coordinate
///
/// Examples:
/// - 1 → A
/// - 26 → Z
/// - 27 → AA
/// - 702 → ZZ
pub fn to_letters(n: i64) -> TabulaResult<String> {
    if n <= 0 {
        return Err(TabulaError::InvalidArgument(format!(
            "column ordinal must be positive, got {}",
            n
        )));
    }

    let mut result = String::new();
    let mut num = n;
    while num > 0 {
        let remainder = (num - 1) % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        num = (num - 1) / 26;
    }

    Ok(result)
}

/// Inverse of [`to_letters`]; accepts upper or lower case
pub fn from_letters(letters: &str) -> TabulaResult<i64> {
    if letters.is_empty() {
        return Err(TabulaError::InvalidArgument(
            "empty column coordinate".to_string(),
        ));
    }

    let mut value: i64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(TabulaError::InvalidArgument(format!(
                "invalid column coordinate '{}'",
                letters
            )));
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as i64 + 1;
        value = value
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| {
                TabulaError::InvalidArgument(format!("column coordinate '{}' too large", letters))
            })?;
    }

    Ok(value)
}

/// Cell name from 1-based column and row, e.g. (2, 3) → "B3"
pub fn cell_name(col: i64, row: u32) -> TabulaResult<String> {
    if row == 0 {
        return Err(TabulaError::InvalidArgument(
            "row number must be positive".to_string(),
        ));
    }
    Ok(format!("{}{}", to_letters(col)?, row))
}

/// Split a cell name like "B3" into 1-based (column, row)
pub fn parse_cell_name(name: &str) -> TabulaResult<(i64, u32)> {
    let split = name
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| TabulaError::InvalidArgument(format!("invalid cell name '{}'", name)))?;
    let (letters, digits) = name.split_at(split);

    let col = from_letters(letters)?;
    let row: u32 = digits
        .parse()
        .map_err(|_| TabulaError::InvalidArgument(format!("invalid cell name '{}'", name)))?;
    if row == 0 {
        return Err(TabulaError::InvalidArgument(format!(
            "invalid cell name '{}'",
            name
        )));
    }

    Ok((col, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_letters() {
        // Single letters
        assert_eq!(to_letters(1).unwrap(), "A");
        assert_eq!(to_letters(2).unwrap(), "B");
        assert_eq!(to_letters(26).unwrap(), "Z");

        // Double letters
        assert_eq!(to_letters(27).unwrap(), "AA");
        assert_eq!(to_letters(28).unwrap(), "AB");
        assert_eq!(to_letters(52).unwrap(), "AZ");
        assert_eq!(to_letters(53).unwrap(), "BA");
        assert_eq!(to_letters(702).unwrap(), "ZZ");

        // Triple letters
        assert_eq!(to_letters(703).unwrap(), "AAA");
    }

    #[test]
    fn test_to_letters_rejects_non_positive() {
        assert!(matches!(
            to_letters(0),
            Err(TabulaError::InvalidArgument(_))
        ));
        assert!(to_letters(-3).is_err());
    }

    #[test]
    fn test_bijection() {
        for n in 1..=1000 {
            let letters = to_letters(n).unwrap();
            assert_eq!(from_letters(&letters).unwrap(), n, "round trip of {}", n);
        }
    }

    #[test]
    fn test_from_letters_errors() {
        assert!(from_letters("").is_err());
        assert!(from_letters("A1").is_err());
        assert_eq!(from_letters("ab").unwrap(), 28);
    }

    #[test]
    fn test_cell_names() {
        assert_eq!(cell_name(1, 1).unwrap(), "A1");
        assert_eq!(cell_name(28, 10).unwrap(), "AB10");
        assert!(cell_name(1, 0).is_err());

        assert_eq!(parse_cell_name("B3").unwrap(), (2, 3));
        assert_eq!(parse_cell_name("AA100").unwrap(), (27, 100));
        assert!(parse_cell_name("B").is_err());
        assert!(parse_cell_name("12").is_err());
        assert!(parse_cell_name("A0").is_err());
    }
}
