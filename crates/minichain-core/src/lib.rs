use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write as _};

pub mod constants;
pub mod mine;

use constants::{DIFFICULTY_PREFIX_BYTES, HASH_HEX_SIZE, HASH_SIZE};

/// A SHA-256 digest wrapped as an immutable value. Two hashes are equal iff
/// their bytes are equal.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    /// Proof-of-work acceptance test: the first three bytes must be zero.
    pub fn is_valid(&self) -> bool {
        self.0[..DIFFICULTY_PREFIX_BYTES].iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Lowercase hex where each byte keeps its natural width: a byte below
    /// 0x10 contributes a single character, so the output length varies.
    /// Recorded ledger hashes use this form.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(HASH_HEX_SIZE);
        for b in self.0 {
            let _ = write!(out, "{:x}", b);
        }
        out
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex::encode(self.0))
    }
}

/// Digest of the canonical block encoding: big-endian index, big-endian
/// amount, the previous hash bytes when present, big-endian nonce.
pub fn block_digest(index: u32, amount: i32, previous_hash: Option<&Hash>, nonce: u64) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(index.to_be_bytes());
    hasher.update(amount.to_be_bytes());
    if let Some(prev) = previous_hash {
        hasher.update(prev.as_bytes());
    }
    hasher.update(nonce.to_be_bytes());
    Hash(hasher.finalize().into())
}

/// A single ledger entry: a signed transfer amount tied to its position in
/// the chain by the previous block's hash and secured by a mined nonce.
/// Blocks are never mutated after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    index: u32,
    amount: i32,
    previous_hash: Option<Hash>,
    nonce: u64,
    hash: Hash,
}

impl Block {
    /// Mines a block: runs the nonce search until the digest clears the
    /// difficulty target.
    pub fn mine(index: u32, amount: i32, previous_hash: Option<Hash>) -> Self {
        let (nonce, hash) = mine::find_nonce(index, amount, previous_hash.as_ref());
        Self {
            index,
            amount,
            previous_hash,
            nonce,
            hash,
        }
    }

    /// Rebuilds a block from a nonce discovered earlier. The digest is
    /// computed once; if the supplied nonce does not produce a valid hash
    /// it is discarded and a fresh search runs instead.
    pub fn with_nonce(index: u32, amount: i32, previous_hash: Option<Hash>, nonce: u64) -> Self {
        let hash = block_digest(index, amount, previous_hash.as_ref(), nonce);
        if hash.is_valid() {
            return Self {
                index,
                amount,
                previous_hash,
                nonce,
                hash,
            };
        }
        Self::mine(index, amount, previous_hash)
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn previous_hash(&self) -> Option<&Hash> {
        self.previous_hash.as_ref()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block {} (Amount: {}, Nonce: {}, prevHash: ",
            self.index, self.amount, self.nonce
        )?;
        match &self.previous_hash {
            Some(prev) => write!(f, "{prev}")?,
            None => f.write_str("null")?,
        }
        write!(f, ", hash: {})", self.hash)
    }
}

pub mod chain {
    use super::{Block, Hash};
    use std::fmt;
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum ChainError {
        #[error("block's previous hash does not match the chain tip")]
        PreviousHashMismatch,
    }

    /// An append-only sequence of hash-linked blocks, genesis first. The
    /// chain always holds at least the genesis block, and block `i` carries
    /// index `i` and the hash of block `i - 1`.
    pub struct Chain {
        blocks: Vec<Block>,
    }

    impl Chain {
        /// Starts a ledger by mining the genesis block for the opening
        /// amount.
        pub fn new(initial_amount: i32) -> Self {
            let genesis = Block::mine(0, initial_amount, None);
            Self {
                blocks: vec![genesis],
            }
        }

        /// Mines a candidate block on top of the current tip without
        /// appending it; the caller decides whether to `append`.
        pub fn mine(&self, amount: i32) -> Block {
            let tip = self.tip();
            Block::mine(tip.index() + 1, amount, Some(*tip.hash()))
        }

        /// Appends a block whose previous hash matches the tip hash by
        /// content. On mismatch the chain is left unchanged.
        pub fn append(&mut self, block: Block) -> Result<(), ChainError> {
            if block.previous_hash() != Some(self.tip().hash()) {
                return Err(ChainError::PreviousHashMismatch);
            }
            self.blocks.push(block);
            Ok(())
        }

        /// Pops the tip block. Returns false (and does nothing) when only
        /// the genesis block remains.
        pub fn remove_last(&mut self) -> bool {
            if self.blocks.len() == 1 {
                return false;
            }
            self.blocks.pop();
            true
        }

        pub fn size(&self) -> usize {
            self.blocks.len()
        }

        pub fn tip(&self) -> &Block {
            self.blocks.last().expect("chain always holds the genesis block")
        }

        pub fn tip_hash(&self) -> &Hash {
            self.tip().hash()
        }

        pub fn blocks(&self) -> &[Block] {
            &self.blocks
        }

        /// Walks the ledger from genesis, keeping both parties' running
        /// balances: Alice opens at zero, Bob opens at the genesis amount,
        /// and every block (genesis included) moves its amount from Bob to
        /// Alice. Returns false as soon as either running balance dips
        /// below zero.
        pub fn is_valid(&self) -> bool {
            let mut alice: i64 = 0;
            let mut bob: i64 = i64::from(self.blocks[0].amount());
            for block in &self.blocks {
                alice += i64::from(block.amount());
                bob -= i64::from(block.amount());
                if alice < 0 || bob < 0 {
                    return false;
                }
            }
            true
        }

        /// Final `(alice, bob)` balances for reporting. Seeds differently
        /// from `is_valid`: here the genesis amount opens on Alice's side
        /// and only the end totals are computed, not every prefix.
        pub fn balances(&self) -> (i64, i64) {
            let initial = i64::from(self.blocks[0].amount());
            let alice = initial
                + self.blocks[1..]
                    .iter()
                    .map(|b| i64::from(b.amount()))
                    .sum::<i64>();
            (alice, initial - alice)
        }
    }

    impl fmt::Display for Chain {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for block in &self.blocks {
                writeln!(f, "{block}")?;
            }
            Ok(())
        }
    }
}
