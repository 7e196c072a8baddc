use std::env;

fn main() {
    // Host builds (tests) link normally; only the firmware needs the
    // cortex-m-rt and defmt linker scripts.
    if env::var("CARGO_FEATURE_STM32").is_ok() {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
