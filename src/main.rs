// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    if let Err(e) = cuimage_lib::run() {
        // The logger may not be up if startup failed early
        log::error!("[APP] Startup failed: {}", e);
        eprintln!("cuimage: {}", e);
        std::process::exit(1);
    }
}
