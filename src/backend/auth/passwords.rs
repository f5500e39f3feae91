/**
 * Password Hashing
 *
 * bcrypt with a cost fixed at construction. Plaintext passwords are never
 * logged.
 */

use thiserror::Error;

use crate::shared::ConfigError;

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Password hashing errors
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// Hashes and compares passwords with bcrypt
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Create a hasher with the given cost
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidCost` unless `4 <= cost <= 31`.
    pub fn new(cost: u32) -> Result<Self, ConfigError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(ConfigError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// `Ok(false)` on mismatch; an error only when `hash` is not a bcrypt hash.
    pub fn compare(&self, hash: &str, plaintext: &str) -> Result<bool, PasswordError> {
        Ok(bcrypt::verify(plaintext, hash)?)
    }
}
