//! Command-line client for the perpetuals exchange.
//!
//! Every command prints the `{data, error}` envelope of its outcome as JSON.

mod config;
mod error;

use std::process::exit;

use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use perp_client::{
    Client, Envelope, Outcome,
    types::{
        CancelIntent, DepositIntent, KlineQuery, OrderIntent, OrderKind, TimeInForce,
        WithdrawIntent,
    },
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use config::{Cli, Command, EnvConfig};
use error::Result;

#[tokio::main]
async fn main() {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to parse environment configuration: {}", e);
            exit(1);
        }
    };

    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = match build_client(&env_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create exchange client: {}", e);
            exit(1);
        }
    };

    match run(&client, cli.command).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!(%e, "Command failed");
            exit(1);
        }
    }
}

fn build_client(env_config: &EnvConfig) -> Result<Client> {
    let config = env_config.to_client_config()?;
    let private_key: PrivateKeySigner = env_config.private_key.parse()?;
    Ok(Client::new(config, private_key)?)
}

async fn run(client: &Client, command: Command) -> Result<String> {
    let list = || Value::Array(Vec::new());
    let envelope = match command {
        Command::Products => render(client.products().await.into_envelope(list()))?,
        Command::Klines {
            symbol,
            interval,
            start_time,
            end_time,
            limit,
        } => {
            let mut query = KlineQuery::new(symbol, interval);
            if let Some(start_time) = start_time {
                query = query.with_start_time(start_time);
            }
            if let Some(end_time) = end_time {
                query = query.with_end_time(end_time);
            }
            if let Some(limit) = limit {
                query = query.with_limit(limit);
            }
            render(client.klines(&query).await.into_envelope(list()))?
        }
        Command::Balances => render(client.balances().await?.into_envelope(list()))?,
        Command::PlaceOrder {
            product_id,
            side,
            kind,
            price,
            quantity,
            time_in_force,
            price_increment,
            slippage,
        } => {
            let default_tif = match kind {
                OrderKind::Market => TimeInForce::Ioc,
                _ => TimeInForce::Gtc,
            };
            let mut intent = OrderIntent::new(product_id, side, kind, price, quantity)
                .with_time_in_force(time_in_force.unwrap_or(default_tif));
            if let Some(price_increment) = price_increment {
                intent = intent.with_price_increment(price_increment);
            }
            if let Some(slippage) = slippage {
                intent = intent.with_slippage(slippage);
            }
            info!(?intent, "Placing order");
            render(client.place_order(&intent).await?.into_envelope(Value::Null))?
        }
        Command::Cancel {
            product_id,
            order_id,
        } => {
            let intent = CancelIntent::new(product_id, order_id);
            render(client.cancel_order(&intent).await?.into_envelope(Value::Null))?
        }
        Command::CancelAll { product_id } => render(
            client
                .cancel_all_orders(product_id)
                .await?
                .into_envelope(Value::Null),
        )?,
        Command::Withdraw { asset, quantity } => {
            let intent = WithdrawIntent::new(asset, quantity);
            render(client.withdraw(&intent).await?.into_envelope(Value::Null))?
        }
        Command::Deposit { asset, amount } => {
            let intent = DepositIntent::new(asset, amount);
            let outcome: Outcome<_> = client.deposit(&intent).await.map(Some);
            render(outcome.into_envelope(None))?
        }
    };
    Ok(envelope)
}

fn render<T: Serialize>(envelope: Envelope<T>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&envelope)?)
}
