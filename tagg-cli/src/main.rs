//! Binary entrypoint for tagg

fn main() {
    if let Err(err) = tagg_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
