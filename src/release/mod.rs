//! Release session state shared by every check.
//!
//! A [`ReleaseInfo`] is built once per run. It owns the parsed manifest, knows where
//! the release directory and the unpacked primary archive are, and holds the scratch
//! directory that checks extract nested archives into. The scratch directory is
//! removed when the `ReleaseInfo` is dropped unless it was loaded with
//! [`LoadOptions::keep_scratch`].
//!
//! Checks receive a shared reference and never mutate it. External tools are reached
//! through the [`CommandRunner`] carried here, so the whole run can be driven by a
//! fake runner in tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::ValidatorConfig;
use crate::constants::SCRATCH_PREFIX;
use crate::core::ReleaseError;
use crate::manifest::{MANIFEST_FILE, Manifest};
use crate::process::{CommandRunner, ToolCommand};

/// Options controlling how a [`ReleaseInfo`] is set up.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Use this already-unpacked primary archive instead of extracting one
    pub archive_dir: Option<PathBuf>,
    /// Leave the scratch directory on disk after the run
    pub keep_scratch: bool,
}

/// Scratch directory, removed on drop unless kept.
enum Scratch {
    Owned(TempDir),
    Kept(PathBuf),
}

impl Scratch {
    fn path(&self) -> &Path {
        match self {
            Scratch::Owned(dir) => dir.path(),
            Scratch::Kept(path) => path,
        }
    }
}

/// Everything a check needs to inspect one release.
pub struct ReleaseInfo {
    manifest: Manifest,
    release_dir: PathBuf,
    archive_dir: PathBuf,
    scratch: Scratch,
    config: ValidatorConfig,
    runner: Arc<dyn CommandRunner>,
}

impl ReleaseInfo {
    /// Load the manifest from `release_dir` and unpack the primary archive.
    ///
    /// The primary archive `<product>-<version>-linux-amd64.tar.gz` is extracted into
    /// a fresh scratch directory and its top-level `<product>-<version>` directory
    /// becomes the archive directory. A failed extraction is logged and the run
    /// continues; the checks that read the archive then report what is missing.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::ManifestError`] if `manifest.yaml` is missing or invalid
    /// - [`ReleaseError::FileSystem`] if the scratch directory cannot be created
    pub async fn load(
        release_dir: &Path,
        config: ValidatorConfig,
        runner: Arc<dyn CommandRunner>,
        options: LoadOptions,
    ) -> Result<Self, ReleaseError> {
        let manifest = Manifest::load(&release_dir.join(MANIFEST_FILE))?;
        tracing::debug!(
            target: "release",
            "Loaded manifest for version {} (hub {})",
            manifest.version,
            manifest.docker
        );

        let scratch = create_scratch(&config, options.keep_scratch)?;
        tracing::info!(target: "release", "Scratch directory at {}", scratch.path().display());

        let archive_dir = match options.archive_dir {
            Some(dir) => {
                tracing::debug!(target: "release", "Using unpacked archive at {}", dir.display());
                dir
            }
            None => {
                let archive = release_dir.join(config.primary_archive_name(&manifest.version));
                let command = ToolCommand::new(&config.tar)
                    .arg("xvf")
                    .arg(archive.display().to_string())
                    .arg("-C")
                    .arg(scratch.path().display().to_string())
                    .with_context("release");

                if let Err(e) = runner.run(&command).await {
                    tracing::warn!(
                        target: "release",
                        "Failed to unpack release archive {}: {}",
                        archive.display(),
                        e
                    );
                }
                scratch.path().join(config.archive_root_dir(&manifest.version))
            }
        };

        Ok(Self {
            manifest,
            release_dir: release_dir.to_path_buf(),
            archive_dir,
            scratch,
            config,
            runner,
        })
    }

    /// Assemble a `ReleaseInfo` from parts that already exist.
    ///
    /// Nothing is read or extracted; `scratch` is created as a new temporary directory
    /// under the system temp dir and removed on drop.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::FileSystem`] if the scratch directory cannot be created.
    pub fn new(
        manifest: Manifest,
        release_dir: impl Into<PathBuf>,
        archive_dir: impl Into<PathBuf>,
        config: ValidatorConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, ReleaseError> {
        let scratch = create_scratch(&config, false)?;
        Ok(Self {
            manifest,
            release_dir: release_dir.into(),
            archive_dir: archive_dir.into(),
            scratch,
            config,
            runner,
        })
    }

    /// The release manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory holding the top-level release outputs.
    pub fn release_dir(&self) -> &Path {
        &self.release_dir
    }

    /// Unpacked contents of the primary archive.
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Per-run scratch directory.
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Validator configuration for this run.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Runner used for every external command.
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Run `command` with the configured deadline applied when it has none of its own.
    ///
    /// # Errors
    ///
    /// Returns whatever the runner reports for the command.
    pub async fn run_tool(&self, command: ToolCommand) -> Result<String, ReleaseError> {
        let command = match command.get_timeout() {
            Some(_) => command,
            None => command.with_timeout(self.config.command_timeout()),
        };
        self.runner.run(&command).await.map(|output| output.stdout)
    }
}

fn create_scratch(config: &ValidatorConfig, keep: bool) -> Result<Scratch, ReleaseError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(SCRATCH_PREFIX);

    let dir = match &config.scratch_root {
        Some(root) => builder.tempdir_in(root).map_err(|e| ReleaseError::fs("creating scratch directory in", root, e))?,
        None => builder
            .tempdir()
            .map_err(|e| ReleaseError::fs("creating scratch directory in", &std::env::temp_dir(), e))?,
    };

    if keep {
        Ok(Scratch::Kept(dir.into_path()))
    } else {
        Ok(Scratch::Owned(dir))
    }
}

impl fmt::Display for ReleaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{version: {}, hub: {}, architectures: [{}], release: {}, archive: {}, scratch: {}}}",
            self.manifest.version,
            self.manifest.docker,
            self.manifest.architectures.join(", "),
            self.release_dir.display(),
            self.archive_dir.display(),
            self.scratch.path().display()
        )
    }
}

impl fmt::Debug for ReleaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseInfo")
            .field("manifest", &self.manifest)
            .field("release_dir", &self.release_dir)
            .field("archive_dir", &self.archive_dir)
            .field("scratch_dir", &self.scratch.path())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
