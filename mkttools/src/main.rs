use clap::{Parser, Subcommand};

mod formatting;
mod gateways;
mod setup;

use crate::{
    gateways::{print_banks, print_goshiip_user_id, BanksParams},
    setup::{handle_setup_command, SetupCommand},
};

#[derive(Parser, Debug)]
#[command(version, about = "Operator tools for the marketplace backend")]
pub struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Setup(SetupCommand),
    /// Print the GoShiip user id that owns the configured API key. Bookings must be made on its behalf.
    #[clap(name = "goshiip-user-id")]
    GoshiipUserId,
    /// List the banks Paystack supports, with the codes that subaccounts are created with
    Banks(BanksParams),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Arguments::parse();
    match cli.command {
        Command::Setup(command) => handle_setup_command(command).await,
        Command::GoshiipUserId => print_goshiip_user_id().await,
        Command::Banks(params) => print_banks(params).await,
    }
}
