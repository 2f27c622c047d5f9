use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use ethers::{
    abi::{
        token::{LenientTokenizer, Tokenizer},
        Abi, Token,
    },
    contract::ContractFactory,
    middleware::SignerMiddleware,
    providers::{Http, JsonRpcClient, Middleware, Provider},
    types::{Bytes, TransactionReceipt, H160, U256},
};

use crate::{
    artifact::Artifact,
    config::Config,
    report,
    signer::{self, Account},
    utils::deployed_address,
};

/// A contract to deploy and its constructor arguments, as strings to be
/// parsed against the constructor's ABI.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub contract: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DeploymentResult {
    pub address: H160,
    pub receipt: TransactionReceipt,
}

pub struct Deploy<P = Http> {
    provider: Provider<P>,
    url: String,
    account: Account,
    chain_id: Option<u64>,
    gas_price: Option<u64>,
    artifacts_dir: PathBuf,
    solidity: String,
}

impl Deploy {
    pub async fn new(config: &Config, network: Option<&str>) -> Result<Self> {
        let (name, network) = config.network(network)?;
        log::info!("using network {} at {}", name, network.url);

        let provider = Provider::<Http>::try_from(network.url.as_str())?;
        let account = signer::get_signer(&provider, network)
            .await
            .with_context(|| format!("failed to resolve signer on network `{name}` ({})", network.url))?;
        log::info!("deployer:{:?}", account.address);

        Ok(Self {
            provider,
            url: network.url.clone(),
            account,
            chain_id: network.chain_id,
            gas_price: network.gas_price,
            artifacts_dir: config.artifacts_dir(),
            solidity: config.solidity.clone(),
        })
    }
}

impl<P: JsonRpcClient + Clone + 'static> Deploy<P> {
    pub async fn run(&self, request: &DeploymentRequest, show_receipt: bool) -> Result<()> {
        let mut out = std::io::stdout();
        report::deployer(&mut out, self.account.address)?;

        let balance = self.balance().await?;
        report::balance(&mut out, balance)?;

        let result = self
            .deploy_contract(request)
            .await
            .with_context(|| format!("failed to deploy {} via {}", request.contract, self.url))?;
        report::deployed(&mut out, &request.contract, result.address)?;

        if show_receipt {
            report::receipt(&mut out, &result.receipt)?;
        }
        Ok(())
    }

    pub async fn balance(&self) -> Result<U256> {
        self.provider
            .get_balance(self.account.address, None)
            .await
            .with_context(|| format!("failed to fetch deployer balance from {}", self.url))
    }

    /// Submit exactly one contract-creation transaction and wait for its receipt.
    pub async fn deploy_contract(&self, request: &DeploymentRequest) -> Result<DeploymentResult> {
        let artifact = Artifact::find(&self.artifacts_dir, &request.contract)?;
        if let Some(version) = artifact.solc_version() {
            if version != self.solidity {
                log::warn!(
                    "{} was compiled with solc {}, config expects {}",
                    artifact.contract_name,
                    version,
                    self.solidity
                );
            }
        }

        let args = encode_constructor_args(&artifact.abi, &request.args)?;
        let bytecode = artifact.bytecode()?;

        match &self.account.wallet {
            Some(wallet) => {
                let client = Arc::new(SignerMiddleware::new(
                    self.provider.clone(),
                    wallet.clone(),
                ));
                self.send_deployment(client, artifact.abi, bytecode, args)
                    .await
            }
            None => {
                let client = Arc::new(self.provider.clone());
                self.send_deployment(client, artifact.abi, bytecode, args)
                    .await
            }
        }
    }

    async fn send_deployment<M: Middleware + 'static>(
        &self,
        client: Arc<M>,
        abi: Abi,
        bytecode: Bytes,
        args: Vec<Token>,
    ) -> Result<DeploymentResult> {
        let mut deployer = ContractFactory::new(abi, bytecode, client)
            .deploy_tokens(args)?
            .legacy();
        deployer.tx.set_from(self.account.address);
        if let Some(gas_price) = self.gas_price {
            deployer.tx.set_gas_price(gas_price);
        }
        if let Some(chain_id) = self.chain_id {
            deployer.tx.set_chain_id(chain_id);
        }

        let (_, receipt) = deployer.send_with_receipt().await?;
        log::info!("transaction hash:{:?}", receipt.transaction_hash);

        let address = deployed_address(&receipt)?;
        Ok(DeploymentResult { address, receipt })
    }
}

/// Parse `args` against the constructor inputs of `abi`.
pub fn encode_constructor_args(abi: &Abi, args: &[String]) -> Result<Vec<Token>> {
    let inputs = abi
        .constructor()
        .map(|constructor| constructor.inputs.as_slice())
        .unwrap_or_default();
    if inputs.len() != args.len() {
        bail!(
            "constructor expects {} argument(s), got {}",
            inputs.len(),
            args.len()
        );
    }

    inputs
        .iter()
        .zip(args)
        .map(|(param, value)| {
            LenientTokenizer::tokenize(&param.kind, value).with_context(|| {
                format!(
                    "invalid value `{value}` for constructor parameter `{}` ({})",
                    param.name, param.kind
                )
            })
        })
        .collect()
}
