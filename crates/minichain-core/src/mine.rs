use crate::{block_digest, Hash};
use tracing::info;

/// Searches nonces sequentially from zero until the block digest clears the
/// difficulty target. Returns the winning nonce and its hash.
///
/// The scan is deterministic: equal `(index, amount, previous_hash)` inputs
/// always land on the same first successful nonce.
pub fn find_nonce(index: u32, amount: i32, previous_hash: Option<&Hash>) -> (u64, Hash) {
    let mut nonce = 0u64;
    loop {
        let hash = block_digest(index, amount, previous_hash, nonce);
        if hash.is_valid() {
            info!("mined block {} with nonce {}", index, nonce);
            return (nonce, hash);
        }
        nonce = nonce.wrapping_add(1);
    }
}
