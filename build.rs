use std::env;
use std::fs;
use std::path::PathBuf;

// Emits `build_info.rs` with the enabled Cargo features and build profile,
// reported by `/healthz` and `leadsift features`.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));
    let mut features: Vec<String> = env::vars()
        .filter_map(|(k, _)| k.strip_prefix("CARGO_FEATURE_").map(|n| n.to_ascii_lowercase().replace('_', "-")))
        .collect();
    features.sort();
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".into());
    let list = features.iter().map(|s| format!("{s:?}")).collect::<Vec<_>>().join(", ");
    let content = format!(
        "pub static COMPILED_FEATURES: &[&str] = &[{list}];\npub static BUILD_PROFILE: &str = {profile:?};\n"
    );
    fs::write(out.join("build_info.rs"), content).expect("write build_info.rs");
}
