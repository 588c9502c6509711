//! # Build Script
//!
//! Embeds the Windows Application Manifest (`app.manifest`) into the executable.
//!
//! The manifest controls:
//! - DPI Awareness (High DPI support).
//! - UAC behavior: `asInvoker`. Scriptdeck itself runs as the current user and
//!   only asks for elevation per script, when a script needs it.

fn main() {
    println!("cargo:rerun-if-changed=app.manifest");
    // If embedding fails (e.g. non-Windows host) the binary still builds, just without the manifest.
    let _ = embed_resource::compile("app.manifest", embed_resource::NONE);
}
