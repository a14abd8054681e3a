use clap::Parser;
use request_logging::cli::{handle_config_check, handle_config_init, Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => request_logging::cli::serve::run_serve(args).await,
        Commands::Config(config_cmd) => {
            let output = match config_cmd {
                ConfigCommands::Init(args) => handle_config_init(&args),
                ConfigCommands::Check(args) => handle_config_check(&args),
            };
            output.map(|text| println!("{}", text))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
