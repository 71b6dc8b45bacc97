use anyhow::{bail, Context, Result};
use clap::Parser;
use recuerdo::cli::{Cli, OutputFormat};
use recuerdo::store::SampleStore;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Open every recorder store under a destination root, sorted by name
fn open_stores(root: &Path) -> Result<Vec<SampleStore>> {
    let mut stores = Vec::new();
    let entries = fs::read_dir(root)
        .with_context(|| format!("Cannot read destination root {}", root.display()))?;
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            match SampleStore::open(entry.path()) {
                Ok(store) => stores.push(store),
                // Not every subdirectory need be a store; skip quietly
                Err(e) => tracing::debug!(dir = %entry.path().display(), error = %e, "skipping"),
            }
        }
    }
    stores.sort_by(|a, b| a.manifest().target.cmp(&b.manifest().target));
    Ok(stores)
}

/// List every recorder under the root with capacity and fill level
fn list_root(root: &Path, format: OutputFormat) -> Result<()> {
    let stores = open_stores(root)?;

    match format {
        OutputFormat::Text => {
            println!("=== Recording root: {} ===", root.display());
            if stores.is_empty() {
                println!("(no recorders found)");
            }
            for store in &stores {
                let manifest = store.manifest();
                let occupied = store.occupied_slots()?.len();
                println!(
                    "{}  codec={}  samples={}/{}",
                    manifest.target, manifest.codec, occupied, manifest.sample_size
                );
            }
        }
        OutputFormat::Json => {
            let mut entries = Vec::new();
            for store in &stores {
                let manifest = store.manifest();
                entries.push(serde_json::json!({
                    "function": manifest.target,
                    "codec": manifest.codec,
                    "sample_size": manifest.sample_size,
                    "occupied_slots": store.occupied_slots()?,
                    "recuerdo_version": manifest.recuerdo_version,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

/// Find one recorder store by its subdirectory name
fn open_named_store(root: &Path, name: &str) -> Result<SampleStore> {
    SampleStore::open(root.join(name))
        .with_context(|| format!("No recorder `{}` under {}", name, root.display()))
}

/// List the occupied slots of one recorder
fn list_recorder(root: &Path, name: &str, format: OutputFormat) -> Result<()> {
    let store = open_named_store(root, name)?;
    let slots = store.occupied_slots()?;

    match format {
        OutputFormat::Text => {
            let manifest = store.manifest();
            println!(
                "=== {} (codec={}, capacity={}) ===",
                manifest.target, manifest.codec, manifest.sample_size
            );
            for slot in &slots {
                let call = store.load(*slot)?;
                println!(
                    "slot {:>3}: {} positional, {} named",
                    slot,
                    call.args.len(),
                    call.kwargs.len()
                );
            }
        }
        OutputFormat::Json => {
            let mut entries = Vec::new();
            for slot in &slots {
                entries.push(serde_json::json!({
                    "slot": slot,
                    "call": store.load(*slot)?,
                }));
            }
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

/// Dump one captured call in full
fn dump_slot(root: &Path, name: &str, slot: usize, format: OutputFormat) -> Result<()> {
    let store = open_named_store(root, name)?;
    let call = store
        .load(slot)
        .with_context(|| format!("Slot {} of `{}` is not occupied", slot, name))?;

    match format {
        OutputFormat::Text => {
            println!("=== {} slot {} ===", name, slot);
            for (i, value) in call.args.iter().enumerate() {
                println!("arg[{}] = {}", i, value);
            }
            for (key, value) in &call.kwargs {
                println!("{} = {}", key, value);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&call)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    match (&args.function, args.slot) {
        (None, Some(_)) => bail!("--slot requires --function"),
        (None, None) => list_root(&args.root, args.format)?,
        (Some(name), None) => list_recorder(&args.root, name, args.format)?,
        (Some(name), Some(slot)) => dump_slot(&args.root, name, slot, args.format)?,
    }

    Ok(())
}
