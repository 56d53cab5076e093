// ABOUTME: Context file lookup — finds ./context.md in the session's working directory.
// ABOUTME: Checked once at startup; the result is reused for every backend call.

use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const CONTEXT_FILE_NAME: &str = "context.md";

/// Return the context file path if `context.md` exists in `base_dir`.
pub fn resolve_context(base_dir: &Path) -> Option<PathBuf> {
    let path = base_dir.join(CONTEXT_FILE_NAME);
    if path.is_file() {
        log::debug!("using context file {}", path.display());
        Some(path)
    } else {
        log::debug!("no {} in {}", CONTEXT_FILE_NAME, base_dir.display());
        None
    }
}
