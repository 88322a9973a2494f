//! Diagnostic report attached to a failed run.

use std::path::Path;
use walkdir::WalkDir;

use crate::release::ReleaseInfo;

/// Build the report: a summary of `release` followed by full listings of the
/// release directory and the unpacked archive.
///
/// Listing is best-effort. An entry that cannot be read is noted in the listing
/// with a leading `!` and the walk moves on; nothing here fails.
pub fn build_report(release: &ReleaseInfo) -> String {
    let mut out = format!("Checks failed. Release info: {release}\n");

    out.push_str("Files in release:\n");
    list_files(release.release_dir(), &mut out);

    out.push_str("\nFiles in archive:\n");
    list_files(release.archive_dir(), &mut out);

    out
}

fn list_files(root: &Path, out: &mut String) {
    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) => out.push_str(&format!("- {}\n", entry.path().display())),
            Err(e) => {
                tracing::debug!(target: "validate", "Skipping unreadable entry under {}: {}", root.display(), e);
                out.push_str(&format!("! {e}\n"));
            }
        }
    }
}
