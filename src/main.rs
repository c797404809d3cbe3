use std::env;
use std::io;
use std::path::PathBuf;
use std::process::{exit, Command};

const GATEWAY_BINARY: &str = "api-gateway";

/// The gateway is built into the same target directory as this launcher
fn gateway_path() -> io::Result<PathBuf> {
    let launcher = env::current_exe()?;
    let dir = launcher
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "launcher has no parent directory"))?;
    Ok(dir.join(GATEWAY_BINARY).with_extension(env::consts::EXE_EXTENSION))
}

fn run() -> io::Result<i32> {
    let gateway = gateway_path()?;
    println!("Starting freight console quotation API: {}", gateway.display());

    let status = Command::new(&gateway).args(env::args_os().skip(1)).status()?;
    Ok(status.code().unwrap_or(1))
}

fn main() {
    match run() {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("Failed to launch {}: {}", GATEWAY_BINARY, err);
            exit(1);
        }
    }
}
