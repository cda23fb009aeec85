/// Prints the release and commit identifiers.
///
/// The commit identifier is resolved from `KUBE_WATCHDOGS_GIT_SHA` at
/// build time when a release pipeline sets it, falling back to
/// `"unknown"` for local builds.
pub fn run() -> anyhow::Result<()> {
    let commit = option_env!("KUBE_WATCHDOGS_GIT_SHA").unwrap_or("unknown");
    println!("kube-watchdogs {}", env!("CARGO_PKG_VERSION"));
    println!("commit: {commit}");
    Ok(())
}
