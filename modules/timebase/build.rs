use std::env;

fn main() {
    // defmt's linker script is only needed once a transport is linked in
    if env::var("CARGO_FEATURE_LOG_RTT").is_ok() {
        println!("cargo:rustc-link-arg=-Tdefmt.x");
    }
}
