use crate::{
    error::RaffleError,
    state::{
        Config, Raffle, RandomnessConfig, Vault, RAFFLE_ACCOUNT_SIZE, VAULT_ACCOUNT_SIZE,
    },
};
use anchor_lang::prelude::*;

// Constants for validation
const MIN_INTERVAL: i64 = 1; // 1 second
const MAX_INTERVAL: i64 = 30 * 24 * 60 * 60; // 30 days in seconds
const MIN_REQUEST_CONFIRMATIONS: u16 = 3;
const MAX_REQUEST_CONFIRMATIONS: u16 = 200;
const MAX_NUM_WORDS: u32 = 500;

/// Immutable parameters of a raffle, fixed at creation
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CreateRaffleParams {
    /// Minimum lamports per entry
    pub entrance_fee: u64,
    /// Minimum seconds between draws
    pub interval: i64,
    /// Oracle key that delivers random words
    pub vrf_coordinator: Pubkey,
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}

impl CreateRaffleParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.entrance_fee > 0, RaffleError::EntranceFeeTooLow);

        require!(
            self.interval >= MIN_INTERVAL,
            RaffleError::IntervalTooShort
        );
        require!(
            self.interval <= MAX_INTERVAL,
            RaffleError::IntervalTooLong
        );

        require!(
            (1..=MAX_NUM_WORDS).contains(&self.num_words),
            RaffleError::InvalidNumWords
        );
        require!(
            (MIN_REQUEST_CONFIRMATIONS..=MAX_REQUEST_CONFIRMATIONS)
                .contains(&self.request_confirmations),
            RaffleError::InvalidRequestConfirmations
        );
        require!(
            self.callback_gas_limit > 0,
            RaffleError::InvalidCallbackGasLimit
        );

        Ok(())
    }

    pub fn randomness_config(&self) -> RandomnessConfig {
        RandomnessConfig {
            coordinator: self.vrf_coordinator,
            key_hash: self.key_hash,
            subscription_id: self.subscription_id,
            request_confirmations: self.request_confirmations,
            callback_gas_limit: self.callback_gas_limit,
            num_words: self.num_words,
        }
    }
}

/// Event emitted when a raffle is created
#[event]
pub struct RaffleCreated {
    /// The pubkey of the created raffle
    pub raffle: Pubkey,
    /// Minimum lamports per entry
    pub entrance_fee: u64,
    /// Minimum seconds between draws
    pub interval: i64,
    /// Oracle allowed to fulfill randomness requests
    pub vrf_coordinator: Pubkey,
    /// When the raffle was created
    pub creation_time: i64,
}

/// Instruction to create a new raffle
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `params` - Entrance fee, draw interval and randomness request settings
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates caller is the management authority via config PDA
/// 2. Ensures the entrance fee is greater than 0
/// 3. Ensures the interval is between 1 second and 30 days
/// 4. Ensures the randomness request settings are within oracle limits
/// 5. Uses a PDA for the vault with proper seeds
///
/// # Implementation Notes
/// - Initializes the raffle in Open state with no players
/// - The first interval is counted from creation time
/// - Creates the vault PDA that holds the pool
pub fn create_raffle(ctx: Context<CreateRaffle>, params: CreateRaffleParams) -> Result<()> {
    let current_time = Clock::get()?.unix_timestamp;

    params.validate()?;

    let vault_key = ctx.accounts.vault.key();
    ctx.accounts.raffle.set_inner(Raffle::new(
        vault_key,
        params.entrance_fee,
        params.interval,
        params.randomness_config(),
        current_time,
    ));

    ctx.accounts.vault.raffle = ctx.accounts.raffle.key();
    ctx.accounts.vault.bump = ctx.bumps.vault;

    // Increment the raffle counter
    ctx.accounts.config.raffle_counter = ctx
        .accounts
        .config
        .raffle_counter
        .checked_add(1)
        .ok_or(RaffleError::Overflow)?;

    emit!(RaffleCreated {
        raffle: ctx.accounts.raffle.key(),
        entrance_fee: params.entrance_fee,
        interval: params.interval,
        vrf_coordinator: params.vrf_coordinator,
        creation_time: current_time,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct CreateRaffle<'info> {
    #[account(
        init,
        payer = management_authority,
        space = RAFFLE_ACCOUNT_SIZE,
        seeds = [
            b"raffle",
            config.raffle_counter.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(mut)]
    pub management_authority: Signer<'info>,

    #[account(
        init,
        payer = management_authority,
        space = VAULT_ACCOUNT_SIZE,
        seeds = [
            b"vault",
            raffle.key().as_ref(),
        ],
        bump,
    )]
    pub vault: Account<'info, Vault>,

    /// The config account storing the authorities and raffle counter
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = management_authority @ RaffleError::NotProgramManagementAuthority,
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,
}
