/// Records the target triplet so `tagg --version` can name the platform the
/// binary was built for.
fn main() {
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=TAGG_TARGET={target}");
    println!("cargo:rerun-if-changed=build.rs");
}
