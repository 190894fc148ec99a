use super::error::IngestError;

/// Parse a hex dump (whitespace allowed) into bytes.
pub fn parse_hex(hex: &str) -> Result<Vec<u8>, IngestError> {
    let cleaned: String = hex.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.len() % 2 != 0 {
        return Err(IngestError::Hex(format!(
            "odd number of digits ({})",
            cleaned.len()
        )));
    }
    if let Some(bad) = cleaned.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(IngestError::Hex(format!("unexpected character {:?}", bad)));
    }

    (0..cleaned.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&cleaned[i..i + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|e| IngestError::Hex(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_continuous_and_spaced() {
        assert_eq!(parse_hex("1ACF01").unwrap(), vec![0x1a, 0xcf, 0x01]);
        assert_eq!(parse_hex("1a cf\n01").unwrap(), vec![0x1a, 0xcf, 0x01]);
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed() {
        assert!(matches!(parse_hex("abc"), Err(IngestError::Hex(_))));
        assert!(matches!(parse_hex("zz"), Err(IngestError::Hex(_))));
    }
}
