use clap::Parser;
use dbx_sql_cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    dbx_sql_cli::logging::init_logging(cli.log.as_deref());

    let result = match cli.command {
        Commands::Export(args) => dbx_sql_cli::run_export(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
