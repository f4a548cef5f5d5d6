use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Hash function used to turn a serialized redeem script into a script hash.
pub trait ScriptHasher {
    fn hash160(&self, data: &[u8]) -> [u8; 20];
}

/// RIPEMD160(SHA256(data))
#[derive(Debug, Clone, Copy, Default)]
pub struct Hash160Hasher;

impl ScriptHasher for Hash160Hasher {
    fn hash160(&self, data: &[u8]) -> [u8; 20] {
        let mut sha_hasher = Sha256::new();
        sha_hasher.update(data);
        let sha_result = sha_hasher.finalize();

        let mut ripemd_hasher = Ripemd160::new();
        ripemd_hasher.update(sha_result);
        let mut digest = [0u8; 20];
        digest.copy_from_slice(&ripemd_hasher.finalize());
        digest
    }
}

pub fn hash160(data: &[u8]) -> [u8; 20] {
    Hash160Hasher.hash160(data)
}
