use std::path::Path;
use std::process::Command;

/// Stamps `LEDGERLENS_BUILD_SHA` for `ledgerlens --version`. Builds outside a
/// git checkout (crate tarballs, vendored copies) get `unknown`.
fn main() {
    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");

    let head = workspace.join(".git/HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }

    println!(
        "cargo:rustc-env=LEDGERLENS_BUILD_SHA={}",
        short_sha(&workspace).unwrap_or_else(|| "unknown".into())
    );
}

fn short_sha(workspace: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8(out.stdout).ok()?.trim().to_owned();
    (!sha.is_empty()).then_some(sha)
}
