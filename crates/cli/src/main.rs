use clap::Parser;

use workshop_cli::Args;

fn main() {
    let args = Args::parse();
    workshop_observability::init_with(args.log_format);

    match workshop_cli::run(&args) {
        Ok(out) => println!("{out}"),
        Err(err) => {
            tracing::error!(error = ?err, "failed to regenerate cost sheet totals");
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
