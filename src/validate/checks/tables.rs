//! Expected release contents.
//!
//! These tables are the checked-in description of what a release must contain. The
//! check logic reads them and never hardcodes names of its own, so extending the
//! expectations means editing this file only.

/// Architecture whose image tarballs carry no `-<arch>` suffix.
pub const DEFAULT_ARCH: &str = "amd64";

/// Image basenames that must be present under `docker/` for every architecture.
pub const EXPECTED_IMAGES: &[&str] = &[
    "pilot-distroless",
    "pilot-debug",
    "install-cni-debug",
    "ztunnel-debug",
    "ztunnel-distroless",
    "proxyv2-debug",
    "proxyv2-distroless",
];

/// Image tarball loaded to check the proxy version, relative to the release directory.
pub const PROXY_IMAGE_TARBALL: &str = "docker/proxyv2-debug.tar.gz";

/// Image name of the proxy, combined with the manifest hub and version.
pub const PROXY_IMAGE_NAME: &str = "proxyv2";

/// Where hub and tag live in a chart's default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubTagLocation {
    /// Under this dotted prefix
    At(&'static str),
    /// The chart carries no hub or tag
    None,
}

/// Packaged charts under `helm/<chart>-<version>.tgz` and where their hub/tag live.
pub const PACKAGED_CHARTS: &[(&str, HubTagLocation)] = &[
    ("cni", HubTagLocation::At("_internal_defaults_do_not_set.global")),
    ("ztunnel", HubTagLocation::At("_internal_defaults_do_not_set")),
    ("istiod", HubTagLocation::At("_internal_defaults_do_not_set.global")),
    ("base", HubTagLocation::None),
    ("gateway", HubTagLocation::None),
];

/// Values files in the unpacked archive, grouped by the prefix their hub/tag live under.
pub const SOURCE_TREE_VALUES: &[(&str, &[&str])] = &[
    (
        "_internal_defaults_do_not_set.global",
        &[
            "manifests/charts/gateways/istio-egress/values.yaml",
            "manifests/charts/gateways/istio-ingress/values.yaml",
            "manifests/charts/istio-cni/values.yaml",
            "manifests/charts/istio-control/istio-discovery/values.yaml",
        ],
    ),
    ("_internal_defaults_do_not_set", &["manifests/charts/ztunnel/values.yaml"]),
];

/// Install profiles in the unpacked archive.
pub const INSTALL_PROFILES: &[&str] = &["manifests/profiles/default.yaml"];

/// Dotted prefix of hub/tag in an install profile.
pub const PROFILE_PREFIX: &str = "spec";

/// Dependencies the manifest must pin to a source revision.
pub const REQUIRED_DEPENDENCIES: &[&str] = &["api", "client-go", "istio", "proxy"];

/// Per-component license archives expected under `licenses/`.
pub const EXPECTED_LICENSES: &[&str] = &[
    "istio.tar.gz",
    "client-go.tar.gz",
    "tools.tar.gz",
    "test-infra.tar.gz",
    "release-builder.tar.gz",
];

/// Shell completion files expected under the archive's `tools/` directory.
pub const COMPLETION_FILES: &[&str] = &["istioctl.bash", "_istioctl"];

/// Debian package, relative to the release directory.
pub const DEBIAN_PACKAGE: &str = "deb/istio-sidecar.deb";

/// RPM package, relative to the release directory.
pub const RPM_PACKAGE: &str = "rpm/istio-sidecar.rpm";

/// Suffix stripped from dashboard file names before comparing with the manifest.
pub const DASHBOARD_SUFFIX: &str = ".json";

/// Arguments asking a release binary for its own version as JSON.
pub const VERSION_ARGS: &[&str] = &["version", "--remote=false", "--short", "-ojson"];

/// Arguments passed to the proxy image to print its version as JSON.
pub const PROXY_VERSION_ARGS: &[&str] = &["version", "--short", "-ojson"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_tables_have_no_duplicates() {
        let images: BTreeSet<_> = EXPECTED_IMAGES.iter().collect();
        assert_eq!(images.len(), EXPECTED_IMAGES.len());

        let charts: BTreeSet<_> = PACKAGED_CHARTS.iter().map(|(name, _)| name).collect();
        assert_eq!(charts.len(), PACKAGED_CHARTS.len());

        let licenses: BTreeSet<_> = EXPECTED_LICENSES.iter().collect();
        assert_eq!(licenses.len(), EXPECTED_LICENSES.len());
    }

    #[test]
    fn test_proxy_tarball_is_an_expected_image() {
        assert!(EXPECTED_IMAGES.iter().any(|image| PROXY_IMAGE_TARBALL == format!("docker/{image}.tar.gz")));
    }
}
