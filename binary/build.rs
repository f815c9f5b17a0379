use static_files::resource_dir;
use std::{env, fs, process::Command};

const FRONTEND_DIST: &str = "../frontend/dist";

fn main() -> std::io::Result<()> {
    println!("cargo:rerun-if-env-changed=BUILD_FRONTEND");
    println!("cargo:rerun-if-changed={FRONTEND_DIST}");
    if env::var_os("BUILD_FRONTEND").is_some() {
        let status = Command::new("trunk")
            .current_dir("../frontend/")
            .args(["build", "--release"])
            .status()?;
        if !status.success() {
            return Err(std::io::Error::other(format!("trunk failed: {status}")));
        }
    }
    fs::create_dir_all(FRONTEND_DIST)?;
    resource_dir(FRONTEND_DIST).build()
}
