use anyhow::{anyhow, Result};
use ethers::{
    types::{Address, TransactionReceipt, U64},
    utils::hex,
};

/// Decode a hex string with an optional `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(value.strip_prefix("0x").unwrap_or(value))?)
}

/// The address a contract-creation receipt reports, failing on reverted
/// transactions and receipts that carry no address.
pub fn deployed_address(receipt: &TransactionReceipt) -> Result<Address> {
    if receipt.status == Some(U64::zero()) {
        return Err(anyhow!(
            "deployment transaction {:?} reverted",
            receipt.transaction_hash
        ));
    }
    receipt
        .contract_address
        .ok_or(anyhow!("contract address not found in receipt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_with_and_without_prefix() {
        assert_eq!(decode_hex("0x0aff").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex("0aff").unwrap(), vec![0x0a, 0xff]);
        assert!(decode_hex("0xzz").is_err());
    }

    #[test]
    fn address_from_successful_receipt() {
        let address = Address::repeat_byte(0x11);
        let receipt = TransactionReceipt {
            status: Some(U64::one()),
            contract_address: Some(address),
            ..Default::default()
        };
        assert_eq!(deployed_address(&receipt).unwrap(), address);
    }

    #[test]
    fn reverted_receipt_is_an_error() {
        let receipt = TransactionReceipt {
            status: Some(U64::zero()),
            contract_address: Some(Address::repeat_byte(0x11)),
            ..Default::default()
        };
        assert!(deployed_address(&receipt)
            .unwrap_err()
            .to_string()
            .contains("reverted"));
    }

    #[test]
    fn receipt_without_address_is_an_error() {
        let receipt = TransactionReceipt {
            status: Some(U64::one()),
            ..Default::default()
        };
        assert!(deployed_address(&receipt).is_err());
    }
}
