fn main() {
    // defmt's linker script only exists when the defmt crate is linked.
    if std::env::var_os("CARGO_FEATURE_DEBUG").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
