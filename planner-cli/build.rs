use std::process::Command;

/// Stamp the binary with the commit it was built from.
///
/// `PLANNER_BUILD_SHA` in the build environment wins, so packaged builds
/// outside a git checkout can still carry a revision.
fn main() {
    println!("cargo:rerun-if-env-changed=PLANNER_BUILD_SHA");

    let sha = std::env::var("PLANNER_BUILD_SHA")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(git_short_sha)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=PLANNER_BUILD_SHA={sha}");
}

fn git_short_sha() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}
