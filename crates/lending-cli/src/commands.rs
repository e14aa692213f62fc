//! Subcommand handlers.

use alloy_primitives::{Address, B256, U256};
use anyhow::{bail, Context, Result};
use lending_core::config::Config;
use lending_core::signing::local::PRIVATE_KEYS_ENV;
use lending_core::signing::{LocalCustodian, RpcCustodian};
use lending_core::{Custodian, DebtOrder, EcdsaSignature, LendingClient, Role};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Hashes printed by `hash`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderHashes {
    issuance_commitment_hash: B256,
    order_hash: B256,
    underwriter_commitment_hash: B256,
    agreement_id: U256,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignedOrder {
    role: Role,
    signer: Address,
    signature: EcdsaSignature,
    rsv: String,
}

/// Build a client from the environment.
///
/// Signing uses in-process keys when `CUSTODIAN_PRIVATE_KEYS` is set and the
/// node's `eth_sign` otherwise.
pub fn build_client() -> Result<LendingClient> {
    let config = Config::from_env()?;
    let rpc_url = config.rpc.url.clone();

    let client = LendingClient::new(&config, |rpc| {
        let custodian: Arc<dyn Custodian> = if std::env::var_os(PRIVATE_KEYS_ENV).is_some() {
            info!("Signing with in-process keys");
            Arc::new(LocalCustodian::from_env()?)
        } else {
            info!(%rpc_url, "Signing through node eth_sign");
            Arc::new(RpcCustodian::new(rpc))
        };
        Ok(custodian)
    })?;

    Ok(client)
}

pub fn hash(client: &LendingClient, order_path: &Path) -> Result<()> {
    let order = read_order(order_path)?;
    let hasher = client.hasher(&order)?;

    print_json(&OrderHashes {
        issuance_commitment_hash: hasher.issuance_commitment_hash(),
        order_hash: hasher.order_hash(),
        underwriter_commitment_hash: hasher.underwriter_commitment_hash(),
        agreement_id: hasher.agreement_id(),
    })
}

pub async fn sign(client: &LendingClient, role: Role, order_path: &Path) -> Result<()> {
    let order = read_order(order_path)?;
    let signature = client
        .sign_as(&order, role)
        .await
        .with_context(|| format!("Failed to sign order as {}", role))?;

    let signer = client
        .apply_network_defaults(&order)
        .signer_address(role)
        .unwrap_or(Address::ZERO);

    print_json(&SignedOrder {
        role,
        signer,
        rsv: signature.to_hex(),
        signature,
    })
}

pub fn verify(client: &LendingClient, role: Role, order_path: &Path, signature: &str) -> Result<()> {
    let order = read_order(order_path)?;
    let signature = parse_signature(signature)?;

    if client.verify(&order, role, &signature)? {
        println!("valid");
        Ok(())
    } else {
        bail!("signature is not a valid {} signature for this order", role)
    }
}

pub async fn balance(client: &LendingClient, token: Address, owner: Address) -> Result<()> {
    let balance = client
        .tokens()
        .balance_of(token, owner)
        .await
        .with_context(|| format!("Failed to read balance of {} for {}", token, owner))?;
    println!("{}", balance);
    Ok(())
}

fn read_order(path: &Path) -> Result<DebtOrder> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read order from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read order file {}", path.display()))?
    };

    parse_order(&raw).with_context(|| format!("Invalid order JSON in {}", path.display()))
}

fn parse_order(raw: &str) -> Result<DebtOrder> {
    Ok(serde_json::from_str(raw)?)
}

/// Accept either raw r||s||v hex or a file holding signature JSON.
fn parse_signature(input: &str) -> Result<EcdsaSignature> {
    let trimmed = input.trim();
    if trimmed.starts_with("0x") {
        return Ok(EcdsaSignature::from_rsv_hex(trimmed)?);
    }

    let raw = std::fs::read_to_string(trimmed)
        .with_context(|| format!("Failed to read signature file {}", trimmed))?;
    serde_json::from_str(&raw).context("Invalid signature JSON")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
