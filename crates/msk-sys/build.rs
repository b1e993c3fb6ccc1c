//! Build script for msk-sys.
//!
//! Links against MOSEK with the following priority:
//! 1. An installation pointed to by `MOSEK_HOME` (the platform directory that
//!    contains `bin/` and `h/`, e.g. `mosek/6/tools/platform/linux64x86`)
//! 2. System MOSEK via pkg-config (fallback)
//!
//! The library name defaults to `mosek64` and can be overridden with
//! `MOSEK_LIB` (e.g. `mosek` on 32-bit builds).

use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MOSEK_HOME");
    println!("cargo:rerun-if-env-changed=MOSEK_LIB");

    let lib_name = std::env::var("MOSEK_LIB").unwrap_or_else(|_| "mosek64".to_string());

    if let Ok(home) = std::env::var("MOSEK_HOME") {
        if try_mosek_home(&PathBuf::from(home), &lib_name) {
            return;
        }
    }

    if try_system_mosek() {
        return;
    }

    panic!(
        "MOSEK not found!\n\n\
         Options to provide MOSEK:\n\
         1. Set MOSEK_HOME to the platform directory of a MOSEK 6 installation,\n\
            e.g. export MOSEK_HOME=$HOME/mosek/6/tools/platform/linux64x86\n\
         2. Install a pkg-config file named 'mosek'\n\
         A valid license file is required at runtime (MOSEKLM_LICENSE_FILE).\n"
    );
}

/// Try to link against the installation at `MOSEK_HOME`.
fn try_mosek_home(home: &Path, lib_name: &str) -> bool {
    let lib_dir = home.join("bin");
    let header = home.join("h").join("mosek.h");

    let has_shared = ["so", "dylib", "dll"]
        .iter()
        .any(|ext| lib_dir.join(format!("lib{lib_name}.{ext}")).exists())
        || lib_dir.join(format!("{lib_name}.lib")).exists();

    if !has_shared {
        println!(
            "cargo:warning=MOSEK_HOME is set but lib{} was not found in {}",
            lib_name,
            lib_dir.display()
        );
        return false;
    }

    if !header.exists() {
        println!("cargo:warning=MOSEK library found but mosek.h missing in MOSEK_HOME");
        return false;
    }

    println!("cargo:warning=Using MOSEK from {}", home.display());

    println!("cargo:rustc-link-search=native={}", lib_dir.display());
    println!("cargo:rustc-link-lib={}", lib_name);
    // -rpath takes a directory, not a file
    #[cfg(not(target_os = "windows"))]
    println!("cargo:rustc-link-arg=-Wl,-rpath,{}", lib_dir.display());

    true
}

/// Try to link against system MOSEK via pkg-config.
fn try_system_mosek() -> bool {
    let output = Command::new("pkg-config")
        .args(["--libs", "--cflags", "mosek"])
        .output();

    let output = match output {
        Ok(o) if o.status.success() => o,
        _ => return false,
    };

    let flags = String::from_utf8_lossy(&output.stdout);
    println!("cargo:warning=Using system MOSEK via pkg-config");

    for flag in flags.split_whitespace() {
        if let Some(lib) = flag.strip_prefix("-l") {
            println!("cargo:rustc-link-lib={}", lib);
        } else if let Some(path) = flag.strip_prefix("-L") {
            println!("cargo:rustc-link-search=native={}", path);
        }
    }

    true
}
