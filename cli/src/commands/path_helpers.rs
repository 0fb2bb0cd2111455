use std::path::PathBuf;

use walkdir::WalkDir;

/// Collects every regular file under `roots` whose extension is one of
/// `allowed_exts`. `recursive` controls whether subdirectories are walked
/// (`batch-compile -r`) or only each root's direct entries are considered.
pub(crate) fn get_all_files(
    roots: &[PathBuf],
    allowed_exts: &[&str],
    recursive: bool,
) -> Vec<PathBuf> {
    roots
        .iter()
        .flat_map(|root| {
            let walker = if recursive { WalkDir::new(root) } else { WalkDir::new(root).max_depth(1) };
            walker
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .filter(|e| {
                    e.path()
                        .extension()
                        .and_then(|s| s.to_str())
                        .map(|ext| allowed_exts.iter().any(|a| a.eq_ignore_ascii_case(ext)))
                        .unwrap_or(false)
                })
                .map(|e| e.path().to_path_buf())
                .collect::<Vec<_>>()
        })
        .collect()
}
