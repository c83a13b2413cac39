use anchor_lang::prelude::*;

// 8 discriminator, 32 pubkey, 1 bump
pub const VAULT_ACCOUNT_SIZE: usize = 8 + 32 + 1;

/// Program-owned holder of a raffle's pool. Lamports above the rent-exempt
/// minimum always equal `Raffle::pool`.
#[account]
pub struct Vault {
    pub raffle: Pubkey,
    pub bump: u8,
}
