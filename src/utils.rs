//! Utilities for the deploy scripts

use std::{
    fs,
    io::Read,
    path::PathBuf,
    process::Command,
    str::FromStr,
};

use alloy::{
    network::TransactionBuilder,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use alloy_primitives::Address;
use json::JsonValue;
use tracing::info;

use crate::{
    artifacts::ContractArtifact,
    config::GasSettings,
    constants::{
        AVAX_CALL_FEE, BSC_CALL_FEE, DEPLOYMENTS_KEY, FANTOM_CALL_FEE, HECO_CALL_FEE,
        POLYGON_CALL_FEE,
    },
    errors::{ContractKind, ScriptError},
};

/// An RPC client bound to the deployer account
pub struct Client {
    /// The signing provider used for all chain interactions
    pub provider: DynProvider,
    /// The deployer address, i.e. the sender of every transaction
    pub sender: Address,
}

/// Set up the RPC client with which to deploy & configure contracts,
/// signing with the given private key
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<Client, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let sender = signer.address();

    let url = Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);

    Ok(Client {
        provider: DynProvider::new(provider),
        sender,
    })
}

/// Deploy a contract from its creation bytecode and ABI-encoded constructor
/// arguments, blocking until the deployment transaction is mined
pub async fn deploy_contract(
    client: &Client,
    artifact: &ContractArtifact,
    constructor_args: &[u8],
    gas: &GasSettings,
    contract: ContractKind,
) -> Result<Address, ScriptError> {
    let mut init_code = artifact.bytecode.clone();
    init_code.extend_from_slice(constructor_args);

    let mut tx = TransactionRequest::default().with_deploy_code(init_code);
    if let Some(gas_price) = gas.gas_price {
        tx = tx.with_gas_price(gas_price);
    }
    if let Some(gas_limit) = gas.gas_limit {
        tx = tx.with_gas_limit(gas_limit);
    }

    let deploy_err = |msg: String| ScriptError::Deployment { contract, msg };

    let receipt = client
        .provider
        .send_transaction(tx)
        .await
        .map_err(|e| deploy_err(e.to_string()))?
        .get_receipt()
        .await
        .map_err(|e| deploy_err(e.to_string()))?;

    if !receipt.status() {
        return Err(deploy_err("deployment transaction reverted".to_string()));
    }

    let address = receipt
        .contract_address
        .ok_or_else(|| deploy_err("no contract address in receipt".to_string()))?;

    info!("{} ({}) deployed at {:#x}", contract, artifact.name, address);
    Ok(address)
}

/// Look up the call fee to configure on a strategy deployed to the
/// given network
pub fn call_fee_for_network(network: &str) -> Result<u64, ScriptError> {
    match network {
        "bsc" => Ok(BSC_CALL_FEE),
        "avax" => Ok(AVAX_CALL_FEE),
        "polygon" => Ok(POLYGON_CALL_FEE),
        "fantom" => Ok(FANTOM_CALL_FEE),
        "heco" => Ok(HECO_CALL_FEE),
        _ => Err(ScriptError::UnknownNetwork(network.to_string())),
    }
}

/// Read and parse a JSON file
fn get_json_from_file(file_path: &str) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    fs::File::open(file_path)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Parse a deployed contract address from the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &str,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    Address::from_str(
        parsed_json[DEPLOYMENTS_KEY][contract_key]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ReadDeployments(
                    "could not parse contract address from deployments file".to_string(),
                )
            })?,
    )
    .map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record a deployed contract address in the deployments file
pub fn write_deployed_address(
    file_path: &str,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !PathBuf::from(file_path).exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key] = JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}

/// Run a command to completion, mapping a launch failure or a non-zero exit
/// status into the given error constructor
pub(crate) fn command_success_or<F>(
    mut cmd: Command,
    err_msg: &str,
    err: F,
) -> Result<(), ScriptError>
where
    F: Fn(String) -> ScriptError,
{
    if !cmd
        .output()
        .map_err(|e| err(e.to_string()))?
        .status
        .success()
    {
        Err(err(err_msg.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::{call_fee_for_network, parse_addr_from_deployments_file, write_deployed_address};
    use crate::{
        constants::{STRATEGY_CONTRACT_KEY, VAULT_CONTRACT_KEY},
        errors::ScriptError,
    };

    #[test]
    fn test_call_fee_lookup() {
        assert_eq!(call_fee_for_network("polygon").unwrap(), 11);
        assert_eq!(call_fee_for_network("bsc").unwrap(), 111);
        assert!(matches!(
            call_fee_for_network("moonriver"),
            Err(ScriptError::UnknownNetwork(_))
        ));
    }

    #[test]
    fn test_deployments_file_round_trip() {
        let path = std::env::temp_dir().join(format!("deployments-{}.json", std::process::id()));
        let path_str = path.to_str().unwrap();

        let vault = address!("cd234a471b72ba2f1ccf0a70fcaba648a5eecd8d");
        let strategy = address!("343c43a37d37dff08ae8c4a11544c718abb4fcf8");
        write_deployed_address(path_str, VAULT_CONTRACT_KEY, vault).unwrap();
        write_deployed_address(path_str, STRATEGY_CONTRACT_KEY, strategy).unwrap();

        assert_eq!(
            parse_addr_from_deployments_file(path_str, VAULT_CONTRACT_KEY).unwrap(),
            vault
        );
        assert_eq!(
            parse_addr_from_deployments_file(path_str, STRATEGY_CONTRACT_KEY).unwrap(),
            strategy
        );

        std::fs::remove_file(path).unwrap();
    }
}
