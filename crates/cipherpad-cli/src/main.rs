#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = cipherpad_cli::run_from_env() {
        eprintln!("cipherpad: {error}");
        std::process::exit(error.exit_code());
    }
}
