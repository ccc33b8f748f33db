//! Transaction building and signing.
//!
//! # Responsibilities
//! - Encode the `market.placeStorageOrder` call
//! - Bind an unsigned call to a nonce and sign it

use alloy::primitives::{keccak256, Bytes};
use serde::Serialize;

use crate::blockchain::types::{
    ChainError, ChainResult, SignedTransaction, StorageOrderRequest, UnsignedTx,
};
use crate::blockchain::wallet::Credential;

/// Runtime module holding the storage market.
pub const MARKET_MODULE: &str = "market";
/// Call placing a new storage order.
pub const PLACE_ORDER_METHOD: &str = "placeStorageOrder";

#[derive(Serialize)]
struct PlaceOrderCall<'a> {
    module: &'static str,
    method: &'static str,
    cid: &'a str,
    size: u64,
    tips: u64,
    replicas: u32,
}

/// Encode a place-order call for `chain_id`.
pub fn encode_place_order(request: &StorageOrderRequest, chain_id: u64) -> ChainResult<UnsignedTx> {
    if request.cid.is_empty() {
        return Err(ChainError::Encoding("empty content identifier".to_string()));
    }

    let call = PlaceOrderCall {
        module: MARKET_MODULE,
        method: PLACE_ORDER_METHOD,
        cid: &request.cid,
        size: request.size_bytes,
        tips: 0,
        replicas: request.replica_count,
    };
    let payload = serde_json::to_vec(&call).map_err(|e| ChainError::Encoding(e.to_string()))?;

    Ok(UnsignedTx {
        request: request.clone(),
        payload: Bytes::from(payload),
        chain_id,
    })
}

/// Sign `tx` with `credential` at `nonce`.
///
/// The signed hash covers `chain_id ‖ nonce ‖ payload`, so the same call at a
/// different nonce is a different transaction.
pub async fn sign_transaction(
    tx: UnsignedTx,
    nonce: u64,
    credential: &Credential,
) -> ChainResult<SignedTransaction> {
    let mut preimage = Vec::with_capacity(16 + tx.payload.len());
    preimage.extend_from_slice(&tx.chain_id.to_be_bytes());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(&tx.payload);
    let hash = keccak256(&preimage);

    let signature = credential.sign_hash(hash).await?;

    Ok(SignedTransaction {
        request: tx.request,
        payload: tx.payload,
        nonce,
        signer: credential.address(),
        signature,
        hash,
    })
}
