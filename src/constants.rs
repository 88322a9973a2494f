//! Global constants used throughout the validator.
//!
//! Names of the release layout that are not part of any check table live here;
//! the per-check expectations are in [`crate::validate::checks::tables`].

/// Default product name; prefixes the per-platform archives.
pub const DEFAULT_PRODUCT: &str = "istio";

/// Default name of the release CLI binary.
pub const DEFAULT_CLI_NAME: &str = "istioctl";

/// Environment variable naming the validator config file.
pub const CONFIG_ENV_VAR: &str = "RELEASE_VALIDATOR_CONFIG";

/// Prefix of the per-run scratch directory.
pub const SCRATCH_PREFIX: &str = "release-validator-";

/// Subdirectory of the scratch directory the standalone CLI archive is unpacked into,
/// followed by the CLI name.
pub const STANDALONE_DIR_PREFIX: &str = "standalone-";
