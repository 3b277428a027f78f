//! Build script for fuzzy-paradise
//!
//! Embeds version and target info for `--version`.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FUZZY_PARADISE_BUILD_TAG");

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string());
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());

    // Optional suffix for distribution builds, e.g. "rc1"
    let version = match env::var("FUZZY_PARADISE_BUILD_TAG") {
        Ok(tag) if !tag.is_empty() => format!("{}-{} ({})", version, tag, target),
        _ => format!("{} ({})", version, target),
    };

    println!("cargo:rustc-env=FUZZY_PARADISE_VERSION={}", version);
    println!("cargo:rustc-env=FUZZY_PARADISE_TARGET={}", target);
}
