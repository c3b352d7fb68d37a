//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use alloy_primitives::Address;

/// The contract being deployed when a failure occurred
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContractKind {
    /// The vault contract
    Vault,
    /// The strategy contract
    Strategy,
}

impl Display for ContractKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Vault => write!(f, "vault"),
            ContractKind::Strategy => write!(f, "strategy"),
        }
    }
}

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// A required configuration value is missing
    ConfigIncomplete(String),
    /// Error reading or parsing the configuration file
    ConfigParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error querying chain state, e.g. fetching the deployer's nonce
    NetworkQuery(String),
    /// Error compiling the contracts
    ContractCompilation(String),
    /// Error parsing a contract compilation artifact
    ArtifactParsing(String),
    /// A deployment transaction reverted or failed to mine
    Deployment {
        /// The contract whose deployment failed
        contract: ContractKind,
        /// The underlying error
        msg: String,
    },
    /// A deployed contract's real address differs from the prediction,
    /// i.e. an intervening transaction from the deployer shifted the nonce
    AddressMismatch {
        /// The contract whose address diverged
        contract: ContractKind,
        /// The address predicted before deployment
        predicted: Address,
        /// The address the contract actually deployed to
        actual: Address,
    },
    /// A post-deployment configuration transaction reverted
    ConfigurationCall {
        /// The configuration method that failed
        which: &'static str,
        /// The underlying error
        msg: String,
    },
    /// Error submitting a contract for source verification
    Verification(String),
    /// The configured network is not a known deployment target
    UnknownNetwork(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ConfigIncomplete(s) => write!(f, "config value missing: {}", s),
            ScriptError::ConfigParsing(s) => write!(f, "error parsing config: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::NetworkQuery(s) => write!(f, "error querying chain state: {}", s),
            ScriptError::ContractCompilation(s) => write!(f, "error compiling contracts: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::Deployment { contract, msg } => {
                write!(f, "error deploying {} contract: {}", contract, msg)
            }
            ScriptError::AddressMismatch {
                contract,
                predicted,
                actual,
            } => write!(
                f,
                "{} contract deployed to {:#x}, but {:#x} was predicted; \
                 an intervening transaction likely shifted the deployer nonce",
                contract, actual, predicted
            ),
            ScriptError::ConfigurationCall { which, msg } => {
                write!(f, "error calling {}: {}", which, msg)
            }
            ScriptError::Verification(s) => write!(f, "error verifying contract: {}", s),
            ScriptError::UnknownNetwork(s) => write!(f, "unknown network: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
        }
    }
}

impl Error for ScriptError {}
