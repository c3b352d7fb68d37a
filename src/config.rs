//! Deployment configuration: the vault & strategy constructor parameter tables
//!
//! The raw configuration is parsed from a JSON file in which every leaf value
//! is optional, then validated exactly once at the boundary into a
//! [`ResolvedConfig`]. Nothing downstream of validation touches an
//! unvalidated value, and no network call is made before validation passes.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Address;
use serde::Deserialize;

use crate::{addressbook::resolve_address, errors::ScriptError};

/// The raw, unvalidated deployment configuration as parsed from disk
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeployConfig {
    /// The name of the target network, e.g. `polygon`
    pub network: Option<String>,
    /// The vault constructor parameters
    pub vault: Option<VaultParams>,
    /// The strategy constructor parameters
    pub strategy: Option<StrategyParams>,
    /// The contract artifact names & build settings
    pub contracts: Option<ContractNames>,
    /// Gas overrides for the deployment transactions
    pub gas: GasSettings,
    /// Whether to submit the deployed contracts for source verification
    pub verify: bool,
}

/// The raw vault constructor parameters
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VaultParams {
    /// The name of the vault share token
    pub moo_name: Option<String>,
    /// The symbol of the vault share token
    pub moo_symbol: Option<String>,
    /// The delay, in seconds, before a proposed strategy upgrade can be applied
    pub approval_delay: Option<u64>,
}

/// The raw strategy constructor parameters
///
/// Address-valued fields may be hex strings or symbolic address book
/// entries, resolved during validation
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrategyParams {
    /// The LP token the strategy deposits into the chef
    pub want: Option<String>,
    /// The chef pool id the want token is staked in
    pub pool_id: Option<u64>,
    /// The chef (reward distributor) contract
    pub chef: Option<String>,
    /// The AMM router used to swap rewards
    pub unirouter: Option<String>,
    /// The keeper account allowed to panic/pause the strategy
    pub keeper: Option<String>,
    /// The strategist fee recipient
    pub strategist: Option<String>,
    /// The protocol fee recipient
    pub fee_recipient: Option<String>,
    /// The swap route from the reward token to the chain's native token
    pub output_to_native_route: Option<Vec<String>>,
    /// The swap route from the secondary reward token to the output token
    pub reward_to_output_route: Option<Vec<String>>,
    /// The swap route from the output token to the first LP component
    pub output_to_lp0_route: Option<Vec<String>>,
    /// The swap route from the output token to the second LP component
    pub output_to_lp1_route: Option<Vec<String>>,
    /// The chef view function polled for claimable rewards
    pub pending_rewards_function_name: Option<String>,
}

/// The raw contract artifact names & build settings
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContractNames {
    /// The vault contract name
    pub vault: Option<String>,
    /// The strategy contract name
    pub strategy: Option<String>,
    /// The directory containing the compilation artifacts
    pub artifacts_dir: Option<PathBuf>,
    /// The vault source identifier (`path/To/Vault.sol:Vault`),
    /// required only for source verification
    pub vault_source: Option<String>,
    /// The strategy source identifier, required only for source verification
    pub strategy_source: Option<String>,
    /// The command compiling the contracts, run before artifacts are loaded.
    /// When absent, the artifacts are assumed to already exist
    pub build_command: Option<Vec<String>>,
}

/// Gas overrides applied to the deployment transactions
///
/// Both values are deliberately optional with no embedded default: when unset,
/// the provider's fillers estimate them against the target chain
#[derive(Debug, Default, Copy, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GasSettings {
    /// The gas price, in wei
    pub gas_price: Option<u128>,
    /// The gas limit
    pub gas_limit: Option<u64>,
}

/// The fully validated deployment configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The name of the target network
    pub network: String,
    /// The validated vault constructor parameters
    pub vault: VaultConfig,
    /// The validated strategy constructor parameters
    pub strategy: StrategyConfig,
    /// The validated contract artifact names & build settings
    pub contracts: ContractsConfig,
    /// Gas overrides for the deployment transactions
    pub gas: GasSettings,
    /// Whether to submit the deployed contracts for source verification
    pub verify: bool,
}

/// The validated vault constructor parameters
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// The name of the vault share token
    pub moo_name: String,
    /// The symbol of the vault share token
    pub moo_symbol: String,
    /// The strategy upgrade approval delay, in seconds
    pub approval_delay: u64,
}

/// The validated strategy constructor parameters, all addresses resolved
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    /// The LP token the strategy deposits into the chef
    pub want: Address,
    /// The chef pool id the want token is staked in
    pub pool_id: u64,
    /// The chef (reward distributor) contract
    pub chef: Address,
    /// The AMM router used to swap rewards
    pub unirouter: Address,
    /// The keeper account allowed to panic/pause the strategy
    pub keeper: Address,
    /// The strategist fee recipient
    pub strategist: Address,
    /// The protocol fee recipient
    pub fee_recipient: Address,
    /// The swap route from the reward token to the chain's native token
    pub output_to_native_route: Vec<Address>,
    /// The swap route from the secondary reward token to the output token
    pub reward_to_output_route: Vec<Address>,
    /// The swap route from the output token to the first LP component
    pub output_to_lp0_route: Vec<Address>,
    /// The swap route from the output token to the second LP component
    pub output_to_lp1_route: Vec<Address>,
    /// The chef view function polled for claimable rewards
    pub pending_rewards_function_name: String,
}

/// The validated contract artifact names & build settings
#[derive(Debug, Clone)]
pub struct ContractsConfig {
    /// The vault contract name
    pub vault: String,
    /// The strategy contract name
    pub strategy: String,
    /// The directory containing the compilation artifacts
    pub artifacts_dir: PathBuf,
    /// The vault source identifier, present when verification is enabled
    pub vault_source: Option<String>,
    /// The strategy source identifier, present when verification is enabled
    pub strategy_source: Option<String>,
    /// The command compiling the contracts
    pub build_command: Option<Vec<String>>,
}

impl DeployConfig {
    /// Parse a deployment configuration from the given file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::ConfigParsing(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents).map_err(|e| ScriptError::ConfigParsing(e.to_string()))
    }

    /// Validate the configuration, resolving symbolic addresses
    ///
    /// Every required field must be present; the first missing field aborts
    /// with [`ScriptError::ConfigIncomplete`] naming it. This runs before
    /// any network call is made.
    pub fn validate(self) -> Result<ResolvedConfig, ScriptError> {
        let network = require("network", self.network)?;
        let vault = require("vault", self.vault)?;
        let strategy = require("strategy", self.strategy)?;
        let contracts = require("contracts", self.contracts)?;

        let vault = VaultConfig {
            moo_name: require("vault.mooName", vault.moo_name)?,
            moo_symbol: require("vault.mooSymbol", vault.moo_symbol)?,
            approval_delay: require("vault.approvalDelay", vault.approval_delay)?,
        };

        let strategy = StrategyConfig {
            want: resolve_field(&network, "strategy.want", strategy.want)?,
            pool_id: require("strategy.poolId", strategy.pool_id)?,
            chef: resolve_field(&network, "strategy.chef", strategy.chef)?,
            unirouter: resolve_field(&network, "strategy.unirouter", strategy.unirouter)?,
            keeper: resolve_field(&network, "strategy.keeper", strategy.keeper)?,
            strategist: resolve_field(&network, "strategy.strategist", strategy.strategist)?,
            fee_recipient: resolve_field(&network, "strategy.feeRecipient", strategy.fee_recipient)?,
            output_to_native_route: resolve_route(
                &network,
                "strategy.outputToNativeRoute",
                strategy.output_to_native_route,
            )?,
            reward_to_output_route: resolve_route(
                &network,
                "strategy.rewardToOutputRoute",
                strategy.reward_to_output_route,
            )?,
            output_to_lp0_route: resolve_route(
                &network,
                "strategy.outputToLp0Route",
                strategy.output_to_lp0_route,
            )?,
            output_to_lp1_route: resolve_route(
                &network,
                "strategy.outputToLp1Route",
                strategy.output_to_lp1_route,
            )?,
            pending_rewards_function_name: require(
                "strategy.pendingRewardsFunctionName",
                strategy.pending_rewards_function_name,
            )?,
        };

        let contracts = ContractsConfig {
            vault: require("contracts.vault", contracts.vault)?,
            strategy: require("contracts.strategy", contracts.strategy)?,
            artifacts_dir: require("contracts.artifactsDir", contracts.artifacts_dir)?,
            vault_source: contracts.vault_source,
            strategy_source: contracts.strategy_source,
            build_command: contracts.build_command,
        };

        if self.verify && (contracts.vault_source.is_none() || contracts.strategy_source.is_none())
        {
            return Err(ScriptError::ConfigIncomplete(
                "contracts.vaultSource / contracts.strategySource (required when verify is set)"
                    .to_string(),
            ));
        }

        Ok(ResolvedConfig {
            network,
            vault,
            strategy,
            contracts,
            gas: self.gas,
            verify: self.verify,
        })
    }
}

/// Require a configuration value to be present
fn require<T>(field: &str, value: Option<T>) -> Result<T, ScriptError> {
    value.ok_or_else(|| ScriptError::ConfigIncomplete(field.to_string()))
}

/// Require an address-valued field and resolve it against the address book
fn resolve_field(
    network: &str,
    field: &str,
    value: Option<String>,
) -> Result<Address, ScriptError> {
    resolve_address(network, &require(field, value)?)
}

/// Require a swap route and resolve each hop against the address book
fn resolve_route(
    network: &str,
    field: &str,
    value: Option<Vec<String>>,
) -> Result<Vec<Address>, ScriptError> {
    require(field, value)?
        .iter()
        .map(|hop| resolve_address(network, hop))
        .collect()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::DeployConfig;
    use crate::errors::ScriptError;

    /// A complete configuration mirroring a real deployment parameter table
    fn sample_config() -> DeployConfig {
        serde_json::from_str(
            r#"{
                "network": "polygon",
                "vault": {
                    "mooName": "Moo Apeswap WMATIC-CRYSTL",
                    "mooSymbol": "mooApeswapWMATIC-CRYSTL",
                    "approvalDelay": 21600
                },
                "strategy": {
                    "want": "0xb8e54c9ea1616beebe11505a419dd8df1000e02a",
                    "poolId": 7,
                    "chef": "apeswap.minichef",
                    "unirouter": "apeswap.router",
                    "keeper": "0x340465d9d2ebde78f15a3870884757584f97abb4",
                    "strategist": "0xba4cb13ed28c6511d9fa29a0570fd2f2c9d08ce3",
                    "feeRecipient": "0x7313533ed72d2678bfd9393480d0a30f9ac45c1f",
                    "outputToNativeRoute": ["tokens.BANANA", "tokens.WMATIC"],
                    "rewardToOutputRoute": ["tokens.BANANA", "tokens.BANANA"],
                    "outputToLp0Route": ["tokens.BANANA", "tokens.WMATIC"],
                    "outputToLp1Route": ["tokens.BANANA", "tokens.CRYSTL"],
                    "pendingRewardsFunctionName": "pendingBanana"
                },
                "contracts": {
                    "vault": "BeefyVaultV6",
                    "strategy": "StrategyMiniChefLP",
                    "artifactsDir": "artifacts"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_complete_config_validates() {
        let resolved = sample_config().validate().unwrap();

        assert_eq!(resolved.network, "polygon");
        assert_eq!(resolved.vault.approval_delay, 21600);
        assert_eq!(
            resolved.strategy.want,
            address!("b8e54c9ea1616beebe11505a419dd8df1000e02a")
        );
        // Symbolic entries were resolved
        assert_eq!(
            resolved.strategy.unirouter,
            address!("c0788a3ad43d79aa53b09c2eacc313a787d1d607")
        );
        assert_eq!(
            resolved.strategy.output_to_lp1_route,
            vec![
                address!("5d47baba0d66083c52009271faf3f50dcc01023c"),
                address!("76bf0c28e604cc3fe9967c83b3c3f31c213cfe64"),
            ]
        );
        // No gas defaults are filled in
        assert!(resolved.gas.gas_price.is_none());
        assert!(resolved.gas.gas_limit.is_none());
    }

    #[test]
    fn test_missing_field_aborts_validation() {
        let mut config = sample_config();
        config.vault.as_mut().unwrap().moo_name = None;

        match config.validate() {
            Err(ScriptError::ConfigIncomplete(field)) => assert_eq!(field, "vault.mooName"),
            other => panic!("expected ConfigIncomplete, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_section_aborts_validation() {
        let mut config = sample_config();
        config.strategy = None;

        assert!(matches!(
            config.validate(),
            Err(ScriptError::ConfigIncomplete(_))
        ));
    }

    #[test]
    fn test_verify_requires_source_identifiers() {
        let mut config = sample_config();
        config.verify = true;

        assert!(matches!(
            config.clone().validate(),
            Err(ScriptError::ConfigIncomplete(_))
        ));

        let contracts = config.contracts.as_mut().unwrap();
        contracts.vault_source = Some("contracts/BeefyVaultV6.sol:BeefyVaultV6".to_string());
        contracts.strategy_source =
            Some("contracts/StrategyMiniChefLP.sol:StrategyMiniChefLP".to_string());
        assert!(config.validate().is_ok());
    }
}
