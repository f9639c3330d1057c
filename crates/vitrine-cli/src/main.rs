use clap::Parser;
use vitrine_cli::{CliArgs, VitrineCli};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    VitrineCli::init_logging(args.verbose, args.quiet);

    let result = match VitrineCli::from_args(&args) {
        Ok(cli) => cli.run(args).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
