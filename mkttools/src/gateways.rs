use anyhow::Result;
use clap::Args;
use gateway_tools::{BankDirectory, GoshiipApi, GoshiipConfig, PaystackApi, PaystackConfig};

use crate::formatting::format_banks;

#[derive(Debug, Args)]
pub struct BanksParams {
    /// Only list banks whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub filter: Option<String>,
}

pub async fn print_goshiip_user_id() {
    async fn fetch() -> Result<String> {
        let api = GoshiipApi::new(&GoshiipConfig::new_from_env_or_default())?;
        Ok(api.my_profile().await?)
    }
    match fetch().await {
        Ok(id) => {
            println!("GoShiip user id: {id}");
            println!("Set GOSHIP_USER_ID={id} in the server environment.");
        },
        Err(e) => println!("Error fetching the GoShiip profile: {e}"),
    }
}

pub async fn print_banks(params: BanksParams) {
    async fn fetch(filter: Option<&str>) -> Result<String> {
        let api = PaystackApi::new(PaystackConfig::new_from_env_or_default())?;
        let banks = BankDirectory::new(api).banks().await?;
        let filter = filter.map(|f| f.trim().to_lowercase());
        let banks = banks
            .into_iter()
            .filter(|b| filter.as_ref().map(|f| b.name.to_lowercase().contains(f)).unwrap_or(true))
            .collect::<Vec<_>>();
        Ok(format_banks(&banks))
    }
    match fetch(params.filter.as_deref()).await {
        Ok(table) => println!("{table}"),
        Err(e) => println!("Error fetching banks: {e}"),
    }
}
