#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = bstviz::run_from_env() {
        tracing::error!(%error, exit_code = error.exit_code(), "bstviz failed");
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
