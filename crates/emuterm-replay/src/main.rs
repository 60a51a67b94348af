#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = emuterm_replay::run_from_env() {
        eprintln!("emuterm-replay: {error}");
        std::process::exit(error.exit_code());
    }
}
