use nbg_cli::{cli, exit_code, logging, run};

fn main() {
    let matches = cli::command().get_matches();
    logging::init(matches.get_count("verbose"), matches.get_flag("log-json"));

    let mut stdout = std::io::stdout().lock();
    match run(&matches, &mut stdout) {
        Ok(status) => std::process::exit(status),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(exit_code(&err));
        }
    }
}
