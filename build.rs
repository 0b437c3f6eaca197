// Build script to extract version from Cargo.toml
// and optionally override patch version from CI/CD pipeline

use std::env;

fn main() {
    // Get version from Cargo.toml
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");

    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        panic!("Invalid version format in Cargo.toml: {}", version);
    }

    let final_patch = env::var("LOCAL_LOGIN_PATCH_VERSION").unwrap_or_else(|_| parts[2].to_string());
    let final_version = format!("{}.{}.{}", parts[0], parts[1], final_patch);

    println!("cargo:rustc-env=LOCAL_LOGIN_VERSION={}", final_version);
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=migrations");
    println!("cargo:rerun-if-env-changed=LOCAL_LOGIN_PATCH_VERSION");
}
