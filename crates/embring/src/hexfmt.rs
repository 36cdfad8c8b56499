use crate::exit::{CliError, CliResult, USAGE};

/// Parse bytes written as hex pairs, e.g. `"CC 2A C1"`, `"cc,2a,c1"` or `"0xCC 0x2A"`.
///
/// A single digit is read as the low nibble (`"5"` is `0x05`).
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let mut bytes = Vec::new();
    for token in input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        let pair = match digits.len() {
            1 => format!("0{digits}"),
            2 => digits.to_string(),
            _ => return Err(invalid_token(token)),
        };
        let decoded = hex::decode(pair).map_err(|_| invalid_token(token))?;
        bytes.extend_from_slice(&decoded);
    }
    Ok(bytes)
}

fn invalid_token(token: &str) -> CliError {
    CliError::new(USAGE, format!("invalid hex byte: {token}"))
}

/// Render bytes as space-separated uppercase hex pairs.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode_upper([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}
