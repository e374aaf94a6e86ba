//! Wallet address handling tests

#[test]
fn test_address_shape() {
    let address = "0xc049e891b0542414ead02223b1b70e0bc99d1511";

    assert_eq!(address.len(), 42);
    assert!(address.starts_with("0x"));
    assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_address_lowercasing() {
    let checksummed = "0xC049e891B0542414eAd02223b1b70E0bc99D1511";
    let lowered = checksummed.to_lowercase();

    assert_eq!(lowered, "0xc049e891b0542414ead02223b1b70e0bc99d1511");
    assert_eq!(lowered, lowered.to_lowercase());
}

#[test]
fn test_prefix_completion() {
    let bare = "b68a6a83cfca2e7fde2aa5749b85e753f55d58cd";
    let prefixed = if bare.starts_with("0x") {
        bare.to_string()
    } else {
        format!("0x{}", bare)
    };

    assert!(prefixed.starts_with("0x"));
    assert_eq!(prefixed.len(), 42);
}

#[test]
fn test_total_supply_selector() {
    // keccak("totalSupply()")[..4]
    let selector = "0x18160ddd";

    assert_eq!(selector.len(), 10);
    assert!(selector.starts_with("0x"));
}
