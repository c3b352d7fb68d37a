//! Implementations of the deploy script commands

use std::{process::Command, str::FromStr};

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use tracing::{info, warn};

use crate::{
    artifacts::{compile_contracts, load_artifact},
    cli::{ConfigureArgs, DeployArgs},
    config::{DeployConfig, ResolvedConfig, StrategyConfig, VaultConfig},
    constants::{
        FORGE_COMMAND, STRATEGY_CONTRACT_KEY, VAULT_CONTRACT_KEY, VERIFY_CONTRACT_COMMAND,
        VERIFY_WATCH_FLAG,
    },
    errors::{ContractKind, ScriptError},
    predict::predict_addresses,
    solidity::IStrategy,
    utils::{
        call_fee_for_network, command_success_or, deploy_contract, write_deployed_address, Client,
    },
};

/// Deploy the vault & strategy contract pair
///
/// The two deployments are linked: the vault constructor embeds the
/// strategy's predicted address, and the strategy constructor references the
/// vault's real address. Each phase blocks until its transaction is mined
/// before the next begins, and each deployed address is checked against the
/// prediction. There is no rollback: a failure after the vault is mined
/// leaves it deployed and orphaned, which the operator must account for.
pub(crate) async fn deploy(
    args: DeployArgs,
    client: Client,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let config = DeployConfig::from_file(&args.config)?.validate()?;

    if let Some(build_command) = &config.contracts.build_command {
        compile_contracts(build_command)?;
    }
    let vault_artifact = load_artifact(&config.contracts.artifacts_dir, &config.contracts.vault)?;
    let strategy_artifact =
        load_artifact(&config.contracts.artifacts_dir, &config.contracts.strategy)?;

    info!("Deploying: {}", config.vault.moo_name);

    let predicted = predict_addresses(&client).await?;

    let vault_args = vault_constructor_args(&config.vault, predicted.strategy);
    let vault_address = deploy_contract(
        &client,
        &vault_artifact,
        &vault_args,
        &config.gas,
        ContractKind::Vault,
    )
    .await?;
    check_against_prediction(ContractKind::Vault, predicted.vault, vault_address)?;

    let strategy_args = strategy_constructor_args(&config.strategy, vault_address);
    let strategy_address = deploy_contract(
        &client,
        &strategy_artifact,
        &strategy_args,
        &config.gas,
        ContractKind::Strategy,
    )
    .await?;
    check_against_prediction(ContractKind::Strategy, predicted.strategy, strategy_address)?;

    write_deployed_address(deployments_path, VAULT_CONTRACT_KEY, vault_address)?;
    write_deployed_address(deployments_path, STRATEGY_CONTRACT_KEY, strategy_address)?;

    // This block is copied into the deployment PR
    println!();
    println!("Vault: {vault_address:#x}");
    println!("Strategy: {strategy_address:#x}");
    println!("Want: {:#x}", config.strategy.want);
    println!("PoolId: {}", config.strategy.pool_id);
    println!();

    info!("Running post deployment");

    if config.verify {
        // Verification is best-effort: a failure is reported but never fails
        // a run whose contracts are already on chain
        if let Err(e) = verify_contract(&config, ContractKind::Vault, vault_address, &vault_args) {
            warn!("vault verification failed: {}", e);
        }
        if let Err(e) = verify_contract(
            &config,
            ContractKind::Strategy,
            strategy_address,
            &strategy_args,
        ) {
            warn!("strategy verification failed: {}", e);
        }
    }

    set_pending_rewards_function_name(
        &client,
        strategy_address,
        &config.strategy.pending_rewards_function_name,
    )
    .await?;
    set_call_fee(&client, strategy_address, &config.network).await?;

    Ok(())
}

/// Print the predicted addresses of the deployer's next two contract
/// deployments without sending any transaction
pub(crate) async fn predict(client: Client) -> Result<(), ScriptError> {
    let predicted = predict_addresses(&client).await?;

    println!("Deployer: {:#x}", client.sender);
    println!("Predicted vault: {:#x}", predicted.vault);
    println!("Predicted strategy: {:#x}", predicted.strategy);

    Ok(())
}

/// Re-run the post-deployment configuration calls against an already
/// deployed strategy; both calls are idempotent
pub(crate) async fn configure(args: ConfigureArgs, client: Client) -> Result<(), ScriptError> {
    let strategy = Address::from_str(&args.strategy)
        .map_err(|e| ScriptError::ConfigParsing(format!("invalid strategy address: {}", e)))?;

    set_pending_rewards_function_name(&client, strategy, &args.pending_rewards_function_name)
        .await?;
    set_call_fee(&client, strategy, &args.network).await
}

/// ABI-encode the vault constructor arguments, embedding the strategy's
/// predicted address
fn vault_constructor_args(params: &VaultConfig, predicted_strategy: Address) -> Vec<u8> {
    (
        predicted_strategy,
        params.moo_name.clone(),
        params.moo_symbol.clone(),
        U256::from(params.approval_delay),
    )
        .abi_encode_params()
}

/// ABI-encode the strategy constructor arguments, referencing the vault's
/// real deployed address
fn strategy_constructor_args(params: &StrategyConfig, vault: Address) -> Vec<u8> {
    (
        params.want,
        U256::from(params.pool_id),
        params.chef,
        vault,
        params.unirouter,
        params.keeper,
        params.strategist,
        params.fee_recipient,
        params.output_to_native_route.clone(),
        params.reward_to_output_route.clone(),
        params.output_to_lp0_route.clone(),
        params.output_to_lp1_route.clone(),
    )
        .abi_encode_params()
}

/// Fail loudly if a contract deployed to an address other than the one
/// predicted for it, i.e. the deployer nonce shifted mid-run
fn check_against_prediction(
    contract: ContractKind,
    predicted: Address,
    actual: Address,
) -> Result<(), ScriptError> {
    if predicted == actual {
        Ok(())
    } else {
        Err(ScriptError::AddressMismatch {
            contract,
            predicted,
            actual,
        })
    }
}

/// Set the chef view function name the strategy polls for claimable rewards,
/// blocking until the transaction is mined
async fn set_pending_rewards_function_name(
    client: &Client,
    strategy: Address,
    name: &str,
) -> Result<(), ScriptError> {
    let which = "setPendingRewardsFunctionName";
    let strategy = IStrategy::new(strategy, client.provider.clone());

    let receipt = strategy
        .setPendingRewardsFunctionName(name.to_string())
        .send()
        .await
        .map_err(|e| ScriptError::ConfigurationCall {
            which,
            msg: e.to_string(),
        })?
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ConfigurationCall {
            which,
            msg: e.to_string(),
        })?;

    if !receipt.status() {
        return Err(ScriptError::ConfigurationCall {
            which,
            msg: "transaction reverted".to_string(),
        });
    }

    info!("pending rewards function name set to `{}`", name);
    Ok(())
}

/// Set the network-appropriate call fee on the strategy, blocking until the
/// transaction is mined
async fn set_call_fee(
    client: &Client,
    strategy: Address,
    network: &str,
) -> Result<(), ScriptError> {
    let which = "setCallFee";
    let fee = call_fee_for_network(network)?;
    let strategy = IStrategy::new(strategy, client.provider.clone());

    let receipt = strategy
        .setCallFee(U256::from(fee))
        .send()
        .await
        .map_err(|e| ScriptError::ConfigurationCall {
            which,
            msg: e.to_string(),
        })?
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ConfigurationCall {
            which,
            msg: e.to_string(),
        })?;

    if !receipt.status() {
        return Err(ScriptError::ConfigurationCall {
            which,
            msg: "transaction reverted".to_string(),
        });
    }

    info!("call fee set to {}", fee);
    Ok(())
}

/// Submit a deployed contract and its exact constructor arguments to the
/// source verification service
fn verify_contract(
    config: &ResolvedConfig,
    contract: ContractKind,
    address: Address,
    constructor_args: &[u8],
) -> Result<(), ScriptError> {
    let source = match contract {
        ContractKind::Vault => config.contracts.vault_source.as_ref(),
        ContractKind::Strategy => config.contracts.strategy_source.as_ref(),
    }
    .ok_or_else(|| {
        ScriptError::Verification(format!(
            "no source identifier configured for the {} contract",
            contract
        ))
    })?;

    let mut cmd = Command::new(FORGE_COMMAND);
    cmd.arg(VERIFY_CONTRACT_COMMAND);
    cmd.arg("--chain");
    cmd.arg(&config.network);
    cmd.arg("--constructor-args");
    cmd.arg(format!("0x{}", hex::encode(constructor_args)));
    cmd.arg(VERIFY_WATCH_FLAG);
    cmd.arg(format!("{address:#x}"));
    cmd.arg(source);

    command_success_or(cmd, "Failed to verify contract", ScriptError::Verification)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address, U256};

    use super::{strategy_constructor_args, vault_constructor_args};
    use crate::config::{StrategyConfig, VaultConfig};

    /// Vault constructor parameters used across the encoding tests
    fn vault_params() -> VaultConfig {
        VaultConfig {
            moo_name: "Moo Apeswap WMATIC-CRYSTL".to_string(),
            moo_symbol: "mooApeswapWMATIC-CRYSTL".to_string(),
            approval_delay: 21600,
        }
    }

    /// Strategy constructor parameters used across the encoding tests
    fn strategy_params() -> StrategyConfig {
        let banana = address!("5d47baba0d66083c52009271faf3f50dcc01023c");
        let wmatic = address!("0d500b1d8e8ef31e21c99d1db9a6444d3adf1270");
        let crystl = address!("76bf0c28e604cc3fe9967c83b3c3f31c213cfe64");

        StrategyConfig {
            want: address!("b8e54c9ea1616beebe11505a419dd8df1000e02a"),
            pool_id: 7,
            chef: address!("54aff400858dcac39797a81894d9920f16972d1d"),
            unirouter: address!("c0788a3ad43d79aa53b09c2eacc313a787d1d607"),
            keeper: address!("340465d9d2ebde78f15a3870884757584f97abb4"),
            strategist: address!("ba4cb13ed28c6511d9fa29a0570fd2f2c9d08ce3"),
            fee_recipient: address!("7313533ed72d2678bfd9393480d0a30f9ac45c1f"),
            output_to_native_route: vec![banana, wmatic],
            reward_to_output_route: vec![banana, banana],
            output_to_lp0_route: vec![banana, wmatic],
            output_to_lp1_route: vec![banana, crystl],
            pending_rewards_function_name: "pendingBanana".to_string(),
        }
    }

    #[test]
    fn test_vault_args_embed_predicted_strategy() {
        let predicted = address!("343c43a37d37dff08ae8c4a11544c718abb4fcf8");
        let encoded = vault_constructor_args(&vault_params(), predicted);

        // The first word is the predicted strategy address, left-padded
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(Address::from_slice(&encoded[12..32]), predicted);
    }

    #[test]
    fn test_vault_args_track_the_prediction() {
        let a = vault_constructor_args(
            &vault_params(),
            address!("343c43a37d37dff08ae8c4a11544c718abb4fcf8"),
        );
        let b = vault_constructor_args(
            &vault_params(),
            address!("f778b86fa74e846c4f0a1fbd1335fe81c00a0c91"),
        );

        assert_ne!(a, b);
    }

    #[test]
    fn test_strategy_args_embed_real_vault_address() {
        let vault = address!("cd234a471b72ba2f1ccf0a70fcaba648a5eecd8d");
        let encoded = strategy_constructor_args(&strategy_params(), vault);

        // Head layout: want, poolId, chef, vault, ...
        assert_eq!(encoded.len() % 32, 0);
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(7));
        assert_eq!(Address::from_slice(&encoded[3 * 32 + 12..4 * 32]), vault);
    }
}
