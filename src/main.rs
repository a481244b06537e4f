fn main() {
    if let Err(err) = tikzcd_rs::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
