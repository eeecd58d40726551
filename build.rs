use std::{env, fs, path::Path};

fn main() {
    println!("cargo:rerun-if-changed=config.json");

    let src = Path::new("config.json");
    if !src.exists() {
        println!("cargo:warning=No config.json in crate root; binary will run on defaults");
        return;
    }

    // OUT_DIR = target/<profile>/build/<crate>/out
    let Ok(out_dir) = env::var("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set, skipping config.json copy");
        return;
    };

    // Three levels up is target/<profile>, where the binary lands
    let Some(exe_dir) = Path::new(&out_dir).ancestors().nth(3) else {
        println!("cargo:warning=Cannot find executable directory");
        return;
    };

    let dst = exe_dir.join("config.json");
    match fs::copy(src, &dst) {
        Ok(_) => println!("cargo:warning=Copied config.json → {}", dst.display()),
        Err(e) => println!("cargo:warning=Could NOT copy config.json: {}", e),
    }
}
