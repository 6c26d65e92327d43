use rand::{rngs::OsRng, RngCore};

use crate::error::{Error, Result};

/// Alphabet used for short keys: 62 alphanumeric symbols.
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of every generated key.
pub const KEY_LEN: usize = 6;

/// Produces candidate short keys. Implementations hold no external state and
/// perform no collision checking — uniqueness is the store's job.
///
/// This is a trait so tests can substitute a deterministic generator and
/// force collisions on demand.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> Result<String>;
}

/// Production generator: 6 characters drawn uniformly at random from the
/// 62-symbol alphanumeric alphabet, one independent draw per position, using
/// the OS entropy source.
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> Result<String> {
        let mut key = String::with_capacity(KEY_LEN);
        for _ in 0..KEY_LEN {
            key.push(ALPHABET[random_index()?] as char);
        }
        Ok(key)
    }
}

/// Draw a uniform index into the alphabet via rejection sampling.
///
/// 248 is the largest multiple of 62 that fits in a byte; any byte at or
/// above it is discarded so that `byte % 62` stays unbiased.
fn random_index() -> Result<usize> {
    const ZONE: u8 = 248;
    let mut buf = [0u8; 1];
    loop {
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(Error::RandomSourceUnavailable)?;
        if buf[0] < ZONE {
            return Ok((buf[0] % ALPHABET.len() as u8) as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_six_alphanumeric_chars() {
        let gen = RandomKeyGenerator;
        for _ in 0..1_000 {
            let key = gen.generate().unwrap();
            assert_eq!(key.len(), KEY_LEN);
            assert!(key.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn keys_are_overwhelmingly_distinct() {
        let gen = RandomKeyGenerator;
        let keys: HashSet<String> = (0..1_000).map(|_| gen.generate().unwrap()).collect();
        // 62^6 ≈ 5.7e10 possible codes; 1 000 draws colliding would indicate
        // a broken sampler rather than bad luck.
        assert_eq!(keys.len(), 1_000);
    }

    #[test]
    fn every_alphabet_symbol_is_reachable() {
        let gen = RandomKeyGenerator;
        let mut seen = HashSet::new();
        for _ in 0..5_000 {
            seen.extend(gen.generate().unwrap().bytes());
        }
        assert_eq!(seen.len(), ALPHABET.len());
    }
}
