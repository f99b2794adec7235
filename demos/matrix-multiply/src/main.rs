use clap::Parser;
use parmul::MatmulError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = matrix_multiply::Args::parse();
    let stdout = std::io::stdout();
    if let Err(e) = matrix_multiply::run(&args, &mut stdout.lock()) {
        if e.downcast_ref::<MatmulError>().is_some_and(MatmulError::is_fatal) {
            log::error!("[matrix-multiply] OS primitive failed, aborting run");
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
