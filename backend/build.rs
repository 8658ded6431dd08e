use std::fs;
use std::path::Path;

/// Embeds the wasm client bundle produced by `wasm-pack build --target web`
/// in `frontend/pkg`. Without a bundle the placeholder in `static/dist` is served.
fn main() {
    let out_dir = Path::new("static/dist");
    let pkg_dir = Path::new("../frontend/pkg");

    if pkg_dir.exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all("static").expect("create static dir");
        fs_extra::dir::copy(
            pkg_dir,
            out_dir,
            &fs_extra::dir::CopyOptions::new().overwrite(true).copy_inside(true),
        )
            .expect("copy client bundle");
    }
    println!("cargo:rerun-if-changed=../frontend/pkg");
}
