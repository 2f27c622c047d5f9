use anyhow::{anyhow, Result};
use ethers::{
    providers::Middleware,
    signers::{LocalWallet, Signer},
    types::H160,
};

use crate::{config::NetworkConfig, utils::decode_hex};

/// The account deploying the contract. Without a wallet the node signs for
/// one of its own unlocked accounts.
#[derive(Debug, Clone)]
pub struct Account {
    pub address: H160,
    pub wallet: Option<LocalWallet>,
}

/// Resolve the default account for `network`: the first configured private
/// key, or else the node's first unlocked account.
pub async fn get_signer<M: Middleware + 'static>(
    provider: &M,
    network: &NetworkConfig,
) -> Result<Account> {
    if let Some(sk) = network.accounts.first() {
        let wallet = LocalWallet::from_bytes(&decode_hex(sk)?)?;
        let chain_id = match network.chain_id {
            Some(chain_id) => chain_id,
            None => provider.get_chainid().await?.as_u64(),
        };
        let wallet = wallet.with_chain_id(chain_id);
        return Ok(Account {
            address: wallet.address(),
            wallet: Some(wallet),
        });
    }

    let address = provider
        .get_accounts()
        .await?
        .into_iter()
        .next()
        .ok_or(anyhow!("no accounts configured and the node has no unlocked accounts"))?;
    Ok(Account {
        address,
        wallet: None,
    })
}
