//! All-or-nothing placement of pass artifacts in the output directory.
//!
//! Artifacts are first written to a staging directory inside the output
//! directory and only then renamed over their final names. When any step
//! fails, files already moved into place are rolled back to their previous
//! contents, so the output directory never mixes artifacts of two passes.

use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use anyhow::{bail, Context, Result};

/// A named artifact ready to be written.
pub(crate) type Artifact<'a> = (&'a str, &'a [u8]);

/// A file moved into place, with the copy it displaced.
#[derive(Debug)]
struct Placement {
    target: PathBuf,
    previous: Option<PathBuf>,
}

/// Writes every artifact into `out_dir`, or none of them.
pub(crate) fn commit(out_dir: &Path, artifacts: &[Artifact<'_>]) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let staging = out_dir.join(format!(".staging-{}", process::id()));
    let outcome = stage(&staging, artifacts).and_then(|()| place(out_dir, &staging, artifacts));
    let cleanup = fs::remove_dir_all(&staging);
    outcome?;
    cleanup.with_context(|| format!("failed to remove staging directory {}", staging.display()))
}

fn stage(staging: &Path, artifacts: &[Artifact<'_>]) -> Result<()> {
    if staging.exists() {
        fs::remove_dir_all(staging).with_context(|| {
            format!("failed to clear stale staging directory {}", staging.display())
        })?;
    }
    fs::create_dir(staging)
        .with_context(|| format!("failed to create staging directory {}", staging.display()))?;

    for (name, bytes) in artifacts {
        let path = staging.join(name);
        fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

fn place(out_dir: &Path, staging: &Path, artifacts: &[Artifact<'_>]) -> Result<()> {
    for (name, _) in artifacts {
        let target = out_dir.join(name);
        if target.is_dir() {
            bail!("cannot write {}: a directory is in the way", target.display());
        }
    }

    let mut placed = Vec::with_capacity(artifacts.len());
    for (name, bytes) in artifacts {
        match place_one(out_dir, staging, name) {
            Ok(placement) => {
                tracing::info!(
                    path = %placement.target.display(),
                    bytes = bytes.len(),
                    "wrote artifact"
                );
                placed.push(placement);
            }
            Err(error) => {
                roll_back(placed);
                return Err(error);
            }
        }
    }
    Ok(())
}

fn place_one(out_dir: &Path, staging: &Path, name: &str) -> Result<Placement> {
    let target = out_dir.join(name);
    let previous = if fs::symlink_metadata(&target).is_ok() {
        let previous = staging.join(format!("{name}.previous"));
        rename(&target, &previous)?;
        Some(previous)
    } else {
        None
    };

    if let Err(error) = rename(&staging.join(name), &target) {
        if let Some(previous) = &previous {
            restore(previous, &target);
        }
        return Err(error);
    }
    Ok(Placement { target, previous })
}

fn roll_back(placed: Vec<Placement>) {
    for Placement { target, previous } in placed.into_iter().rev() {
        if let Err(error) = fs::remove_file(&target) {
            tracing::warn!(path = %target.display(), %error, "failed to withdraw artifact");
        }
        if let Some(previous) = previous {
            restore(&previous, &target);
        }
    }
}

fn restore(previous: &Path, target: &Path) {
    if let Err(error) = fs::rename(previous, target) {
        tracing::warn!(path = %target.display(), %error, "failed to restore previous artifact");
    }
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to)
        .with_context(|| format!("failed to move {} to {}", from.display(), to.display()))
}
