pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const DIFFICULTY_PREFIX_BYTES: usize = 3;
