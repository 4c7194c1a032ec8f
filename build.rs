//! Embeds the short commit hash and build date for the simulator banner.

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    let commit = env::var("BUILD_COMMIT").unwrap_or_else(|_| git_short_hash());
    let date = env::var("BUILD_DATE")
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    fs::write(
        Path::new(&out_dir).join("build_info.rs"),
        format!(
            "pub const BUILD_COMMIT: &str = {commit:?};\npub const BUILD_DATE: &str = {date:?};\n"
        ),
    )
    .expect("failed to write build_info.rs");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=BUILD_COMMIT");
    println!("cargo:rerun-if-env-changed=BUILD_DATE");
}

fn git_short_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
