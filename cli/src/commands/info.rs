use std::path::PathBuf;

use aidl_ir::Workspace;
use aidl_ir_model::{CompiledDef, QName};
use anyhow::{Context, Result};
use colored::Colorize;

pub(crate) fn command_info(search_path: &[PathBuf], qname: &str, json: bool) -> Result<()> {
    let qname = QName::new(qname).with_context(|| format!("invalid qualified name: {qname:?}"))?;
    let workspace = Workspace::new(search_path.to_vec());
    let def = workspace
        .compile(&qname)
        .with_context(|| format!("failed to compile '{qname}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&def)?);
        return Ok(());
    }

    match &def {
        CompiledDef::Binder(binder) => {
            let oneway = binder.methods.iter().filter(|m| m.oneway).count();
            println!("{} {}", "binder".green(), binder.qname);
            println!("  methods: {}", binder.methods.len());
            println!("  oneway: {oneway}");
        }
        CompiledDef::Parcelable(parcelable) => {
            println!("{} {}", "parcelable".green(), parcelable.qname);
            println!("  fields: {}", parcelable.fields.len());
        }
    }

    Ok(())
}
