//! A per-network address book of well-known platform & token addresses
//!
//! Configuration files may reference addresses symbolically (e.g.
//! `apeswap.router` or `tokens.WMATIC`) instead of spelling out hex;
//! symbolic entries are resolved here at validation time.

use std::str::FromStr;

use alloy_primitives::Address;

use crate::errors::ScriptError;

/// The address book entries for Polygon
const POLYGON_ADDRESS_BOOK: &[(&str, &str)] = &[
    ("tokens.WMATIC", "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270"),
    ("tokens.BANANA", "0x5d47baba0d66083c52009271faf3f50dcc01023c"),
    ("tokens.CRYSTL", "0x76bf0c28e604cc3fe9967c83b3c3f31c213cfe64"),
    ("apeswap.router", "0xc0788a3ad43d79aa53b09c2eacc313a787d1d607"),
    ("apeswap.minichef", "0x54aff400858dcac39797a81894d9920f16972d1d"),
];

/// The address book entries for BSC
const BSC_ADDRESS_BOOK: &[(&str, &str)] = &[
    ("tokens.WBNB", "0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c"),
    ("tokens.BANANA", "0x603c7f932ed1fc6575303d8fb018fdcbb0f39a95"),
    ("apeswap.router", "0xcf0febd3f17cef5b47b0cd257acf6025c5bff3b7"),
    ("apeswap.masterape", "0x5c8d727b265dbafaba67e050f2f739caeeb4a6f9"),
];

/// Look up the address book for the given network
fn address_book_for(network: &str) -> Result<&'static [(&'static str, &'static str)], ScriptError> {
    match network {
        "polygon" => Ok(POLYGON_ADDRESS_BOOK),
        "bsc" => Ok(BSC_ADDRESS_BOOK),
        _ => Err(ScriptError::UnknownNetwork(network.to_string())),
    }
}

/// Resolve a configured address value to a concrete on-chain address
///
/// Hex strings are parsed directly; anything else is treated as a symbolic
/// address book entry for the given network
pub fn resolve_address(network: &str, value: &str) -> Result<Address, ScriptError> {
    if value.starts_with("0x") {
        return Address::from_str(value)
            .map_err(|e| ScriptError::ConfigParsing(format!("invalid address `{}`: {}", value, e)));
    }

    let book = address_book_for(network)?;
    let (_, addr) = book.iter().find(|(key, _)| *key == value).ok_or_else(|| {
        ScriptError::ConfigParsing(format!(
            "no address book entry `{}` for network `{}`",
            value, network
        ))
    })?;

    Address::from_str(addr)
        .map_err(|e| ScriptError::ConfigParsing(format!("invalid address book entry: {}", e)))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::resolve_address;
    use crate::errors::ScriptError;

    #[test]
    fn test_resolves_symbolic_entry() {
        let addr = resolve_address("polygon", "tokens.WMATIC").unwrap();
        assert_eq!(addr, address!("0d500b1d8e8ef31e21c99d1db9a6444d3adf1270"));
    }

    #[test]
    fn test_hex_passes_through() {
        let addr = resolve_address("polygon", "0xb8e54c9ea1616beebe11505a419dd8df1000e02a").unwrap();
        assert_eq!(addr, address!("b8e54c9ea1616beebe11505a419dd8df1000e02a"));
    }

    #[test]
    fn test_unknown_entry_errors() {
        let res = resolve_address("polygon", "apeswap.masterape");
        assert!(matches!(res, Err(ScriptError::ConfigParsing(_))));
    }

    #[test]
    fn test_unknown_network_errors() {
        let res = resolve_address("moonriver", "tokens.WMATIC");
        assert!(matches!(res, Err(ScriptError::UnknownNetwork(_))));
    }
}
