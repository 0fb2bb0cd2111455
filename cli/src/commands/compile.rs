use std::fs;
use std::path::{Path, PathBuf};

use aidl_ir::Workspace;
use aidl_ir_model::QName;
use anyhow::{bail, Context, Result};

pub(crate) fn command_compile(
    search_path: &[PathBuf],
    qname: &str,
    out_dir: &Path,
    force: bool,
) -> Result<()> {
    let qname = QName::new(qname).with_context(|| format!("invalid qualified name: {qname:?}"))?;
    let workspace = Workspace::new(search_path.to_vec());
    let def = workspace
        .compile(&qname)
        .with_context(|| format!("failed to compile '{qname}'"))?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("can't create output directory {out_dir:?}"))?;

    let out_path = out_dir.join(format!("{qname}.json"));
    if out_path.exists() && !force {
        bail!("{out_path:?} already exists (use -f to overwrite)");
    }

    let json = serde_json::to_string_pretty(&def)?;
    fs::write(&out_path, json).with_context(|| format!("can't write {out_path:?}"))?;
    println!("compiled {qname} -> {out_path:?}");
    Ok(())
}
