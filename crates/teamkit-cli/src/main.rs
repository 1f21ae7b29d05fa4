use std::process::ExitCode;
use teamkit_cli::{command, init_logging, run, EXIT_FAILURE};

fn main() -> ExitCode {
    let matches = command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches, &mut std::io::stdout().lock()) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
