use std::str::FromStr;

use tally_state::{StateValue, Storage as _};

use crate::default_context::DefaultContext;
use crate::utils::generate_address;
use crate::{Address, AddressBech32, Bech32ParseError, Context, Prefix};

#[test]
fn test_display_and_parse_agree() {
    let address = Address::from([7; 32]);
    let text = address.to_string();
    assert!(text.starts_with("tally1"));
    assert_eq!(Address::from_str(&text).unwrap(), address);
    assert_eq!(format!("{:?}", address), text);
}

#[test]
fn test_bech32_rejects_short_payload() {
    let short = crate::bech32::vec_to_bech32m(&[1; 20], crate::HRP).unwrap();
    assert!(matches!(
        AddressBech32::from_str(&short),
        Err(Bech32ParseError::WrongLength(20))
    ));
    assert!(AddressBech32::try_from([0u8; 31].as_slice()).is_err());
}

#[test]
fn test_address_from_slice() {
    assert!(Address::try_from([3u8; 32].as_slice()).is_ok());
    assert!(Address::try_from([3u8; 33].as_slice()).is_err());
}

#[test]
fn test_generate_address_is_deterministic() {
    let alice = generate_address::<DefaultContext>("alice");
    assert_eq!(alice, generate_address::<DefaultContext>("alice"));
    assert_ne!(alice, generate_address::<DefaultContext>("bob"));
}

#[test]
fn test_module_prefix_hash_is_stable() {
    let a = Prefix::new_module("tally_election", "Election").hash::<DefaultContext>();
    let b = Prefix::new_module("tally_election", "Election").hash::<DefaultContext>();
    let other = Prefix::new_module("tally_election", "Other").hash::<DefaultContext>();
    assert_eq!(a, b);
    assert_ne!(a, other);
}

#[test]
fn test_context_carries_timestamp() {
    let sender = generate_address::<DefaultContext>("admin");
    let context = DefaultContext::new(sender, 1_700_000_000);
    assert_eq!(context.sender(), &sender);
    assert_eq!(context.timestamp(), 1_700_000_000);
}

#[test]
fn test_addresses_as_state_values() {
    let storage = tally_state::InMemoryStorage::new();
    let value: StateValue<Address> =
        StateValue::new(Prefix::new_storage("tests", "Tests", "owner").into());
    let owner = generate_address::<DefaultContext>("owner");

    let mut working_set = crate::WorkingSet::new(storage.clone());
    value.set(&owner, &mut working_set);
    storage.commit(working_set.checkpoint().freeze()).unwrap();

    let mut working_set = crate::WorkingSet::new(storage);
    assert_eq!(value.get(&mut working_set), Some(owner));
}
