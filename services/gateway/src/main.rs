mod error;
mod handlers;
mod models;
mod rate_limit;
mod router;
mod state;

use escrow::EscrowContract;
use ethers::types::Address;
use orderbook::Exchange;
use router::create_router;
use settlement::SettlementLedger;
use signing::Eip712Domain;
use state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting swap venue gateway");

    let chain_id: u64 = std::env::var("VENUE_CHAIN_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let verifying_contract: Address = std::env::var("VENUE_SETTLEMENT_CONTRACT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(Address::zero);
    let port: u16 = std::env::var("VENUE_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);

    let domain = Eip712Domain::new(chain_id, verifying_contract);
    tracing::info!(
        chain_id,
        verifying_contract = ?verifying_contract,
        "signing domain initialized"
    );

    // Journal-backed ledger when a path is configured, else memory-only
    let ledger = match std::env::var("VENUE_TRADE_JOURNAL").ok() {
        Some(path) => {
            let ledger = SettlementLedger::with_journal(&path)?;
            tracing::info!(path, recovered = ledger.len(), "trade journal opened");
            ledger
        }
        None => SettlementLedger::in_memory(),
    };

    let exchange = Exchange::new(domain.clone(), ledger);
    let contract = EscrowContract::new(domain);
    let state = AppState::new(exchange, contract);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
