use std::fs;
use std::path::{Path, PathBuf};

use aidl_ir::Workspace;
use aidl_ir_model::QName;
use anyhow::{Context, Result};
use colored::Colorize;

use super::path_helpers::get_all_files;

/// Compiles every `.aidl`/`.java` unit found on `search_path`, one
/// `<out_dir>/<qname>.json` per unit. Tolerant across units (§7): a single
/// unit's failure is reported and skipped, not propagated. Returns
/// `(succeeded, total)` so the caller can decide the process exit code.
pub(crate) fn command_batch_compile(
    search_path: &[PathBuf],
    out_dir: &Path,
    recursive: bool,
    force: bool,
) -> Result<(usize, usize)> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("can't create output directory {out_dir:?}"))?;

    let mut qnames: Vec<QName> = search_path
        .iter()
        .flat_map(|root| {
            get_all_files(std::slice::from_ref(root), &["aidl", "java"], recursive)
                .into_iter()
                .filter_map(|file| path_to_qname(root, &file))
        })
        .collect();
    qnames.sort();
    qnames.dedup();
    log::info!("found {} unit(s) to compile", qnames.len());

    let workspace = Workspace::new(search_path.to_vec());
    let total = qnames.len();
    let mut succeeded = 0usize;

    for qname in qnames {
        match workspace.compile(&qname) {
            Ok(def) => {
                let out_path = out_dir.join(format!("{qname}.json"));
                if out_path.exists() && !force {
                    println!("{} {qname} ({out_path:?} already exists, use -f)", "skip".yellow());
                    continue;
                }
                match write_compiled(&out_path, &def) {
                    Ok(()) => {
                        succeeded += 1;
                        println!("{} {qname}", "ok".green());
                    }
                    Err(err) => println!("{} {qname}: {err:#}", "fail".red()),
                }
            }
            Err(err) => println!("{} {qname}: {err}", "fail".red()),
        }
    }

    println!("{succeeded}/{total} units compiled");
    Ok((succeeded, total))
}

fn write_compiled(out_path: &Path, def: &aidl_ir_model::CompiledDef) -> Result<()> {
    let json = serde_json::to_string_pretty(def)?;
    fs::write(out_path, json).with_context(|| format!("can't write {out_path:?}"))
}

/// A unit file's qname is its path relative to the search root, with `/`
/// replaced by `.` and the extension dropped (the inverse of the loader's
/// `qname_to_relative_base`).
fn path_to_qname(root: &Path, file: &Path) -> Option<QName> {
    let rel = file.strip_prefix(root).ok()?.with_extension("");
    let dotted = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(".");
    QName::new(dotted).ok()
}
