use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

// Stages the runtime assets (image target, models, sounds) next to the build
// output so binaries resolve the same relative paths the web deployment uses.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/*");

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    if manifest_dir.join("assets").exists() {
        copy_items(&["assets/"], out_dir, &copy_options)?;
    }

    Ok(())
}
