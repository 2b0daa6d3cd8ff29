//! Build script for freezelist.
//!
//! Reports which optional features are active.

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_PARKING_LOT");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_DIAGNOSTICS");

    let parking_lot_enabled = env::var("CARGO_FEATURE_PARKING_LOT").is_ok();
    let diagnostics_enabled = env::var("CARGO_FEATURE_DIAGNOSTICS").is_ok();

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let is_release = profile == "release";

    if parking_lot_enabled {
        emit_info("Using parking_lot for the freeze guard");
    }

    if is_release && diagnostics_enabled {
        emit_info("Diagnostics enabled in release build");
        emit_note("FL0xx diagnostics are routed to the `log` facade.");
        emit_note("Set FREEZELIST_STRICT=1 and call diagnostics::init_from_env() to make them fatal.");
    }

    if env::var("TARGET").map(|t| t.contains("wasm")).unwrap_or(false) {
        emit_warning("WebAssembly target detected");
        emit_note("Without threads every access comes from the owner, so lists never freeze implicitly.");
    }
}

fn emit_info(msg: &str) {
    println!("cargo:warning=[freezelist] {}", msg);
}

fn emit_note(msg: &str) {
    println!("cargo:warning=[freezelist]    {}", msg);
}

fn emit_warning(msg: &str) {
    println!("cargo:warning=[freezelist] warning: {}", msg);
}
