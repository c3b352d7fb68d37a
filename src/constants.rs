//! Constants used in the deploy scripts

/// The call fee configured on strategies deployed to BSC
pub const BSC_CALL_FEE: u64 = 111;

/// The call fee configured on strategies deployed to Avalanche
pub const AVAX_CALL_FEE: u64 = 111;

/// The call fee configured on strategies deployed to Polygon
pub const POLYGON_CALL_FEE: u64 = 11;

/// The call fee configured on strategies deployed to Fantom
pub const FANTOM_CALL_FEE: u64 = 11;

/// The call fee configured on strategies deployed to Heco
pub const HECO_CALL_FEE: u64 = 11;

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The vault contract key in the `deployments.json` file
pub const VAULT_CONTRACT_KEY: &str = "vault_contract";

/// The strategy contract key in the `deployments.json` file
pub const STRATEGY_CONTRACT_KEY: &str = "strategy_contract";

/// The file extension of a compilation artifact
pub const ARTIFACT_EXTENSION: &str = "json";

/// The key under which a Hardhat-style artifact stores its creation bytecode
pub const ARTIFACT_BYTECODE_KEY: &str = "bytecode";

/// The key under which a Foundry-style artifact nests the bytecode hex string
pub const ARTIFACT_OBJECT_KEY: &str = "object";

/// The name of the `forge` command, used for source verification
pub const FORGE_COMMAND: &str = "forge";

/// The name of the verification subcommand
pub const VERIFY_CONTRACT_COMMAND: &str = "verify-contract";

/// The flag instructing `forge` to poll the verification service
/// until a result is returned
pub const VERIFY_WATCH_FLAG: &str = "--watch";
