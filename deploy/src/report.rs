use std::io::Write;

use anyhow::Result;
use ethers::{
    types::{TransactionReceipt, H160, U256},
    utils::{format_ether, to_checksum},
};

pub fn deployer(out: &mut impl Write, address: H160) -> Result<()> {
    writeln!(
        out,
        "Deploying contracts with the account: {}",
        to_checksum(&address, None)
    )?;
    Ok(())
}

pub fn balance(out: &mut impl Write, balance: U256) -> Result<()> {
    writeln!(out, "Account balance: {} ETH", format_ether(balance))?;
    Ok(())
}

pub fn deployed(out: &mut impl Write, contract: &str, address: H160) -> Result<()> {
    writeln!(out, "{contract} deployed to: {}", to_checksum(&address, None))?;
    Ok(())
}

pub fn receipt(out: &mut impl Write, receipt: &TransactionReceipt) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(receipt)?)?;
    Ok(())
}
