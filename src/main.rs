// src/main.rs

use taskmail::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = match cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help / --version go to stdout and are not failures.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("taskmail: {err:#}");
    }

    let code = match run(args).await {
        Ok(code) => code,
        Err(err) if err.is_argument() => {
            eprintln!("{err}");
            1
        }
        Err(err) => {
            eprintln!("An unexpected error occurred: {err}");
            1
        }
    };

    std::process::exit(code);
}
