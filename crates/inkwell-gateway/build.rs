//! Stamps the build with a revision string, exposed as `INKWELL_GIT_SHA`.
//!
//! Order of preference: an `INKWELL_GIT_SHA` set by the packager (release
//! tarballs carry no `.git`), then `git describe`, then "unknown".

use std::env;
use std::process::Command;

const VAR: &str = "INKWELL_GIT_SHA";

fn describe() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?;
    Some(rev.trim().to_string())
}

fn main() {
    let rev = env::var(VAR)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(describe)
        .filter(|v| !v.is_empty() && !v.contains(char::is_whitespace))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={VAR}={rev}");
    println!("cargo:rerun-if-env-changed={VAR}");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/index");
}
