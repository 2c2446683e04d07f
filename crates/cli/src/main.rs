fn main() {
    if let Err(e) = unitloader_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
