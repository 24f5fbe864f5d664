use clap::{Args, Subcommand};

mod verify;

#[derive(Debug, Args)]
pub(crate) struct PaymentsCommand {
    #[command(subcommand)]
    command: PaymentsSubcommand,
}

#[derive(Debug, Subcommand)]
enum PaymentsSubcommand {
    Verify(verify::VerifyPaymentArgs),
}

pub(crate) async fn run(command: PaymentsCommand) -> Result<(), String> {
    match command.command {
        PaymentsSubcommand::Verify(args) => verify::run(args).await,
    }
}
