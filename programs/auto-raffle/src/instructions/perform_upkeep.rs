use anchor_lang::prelude::*;

use crate::state::Raffle;

/// Event the randomness oracle watches for. Carries everything needed to
/// serve the request, and the id it must be answered with.
#[event]
pub struct RandomWordsRequested {
    pub raffle: Pubkey,
    pub request_id: u64,
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}

/// Event emitted when a draw is started
#[event]
pub struct RequestedRaffleWinner {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// Id the winner will be picked under
    pub request_id: u64,
}

/// Starts a draw for the current round.
///
/// Anyone may call this, keepers normally do. It succeeds only when
/// `check_upkeep` would report `upkeep_needed` at the same clock.
///
/// After execution:
/// - The raffle state is changed to Calculating and entries are locked
/// - A randomness request is pending under a fresh request id
pub fn perform_upkeep(ctx: Context<PerformUpkeep>, _perform_data: Vec<u8>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let raffle_key = ctx.accounts.raffle.key();
    let raffle = &mut ctx.accounts.raffle;

    let request_id = raffle.perform_upkeep(now)?;
    let config = &raffle.randomness.config;

    emit!(RandomWordsRequested {
        raffle: raffle_key,
        request_id,
        key_hash: config.key_hash,
        subscription_id: config.subscription_id,
        request_confirmations: config.request_confirmations,
        callback_gas_limit: config.callback_gas_limit,
        num_words: config.num_words,
    });

    emit!(RequestedRaffleWinner {
        raffle: raffle_key,
        request_id,
    });

    msg!(
        "Draw requested with id {} for {} players",
        request_id,
        raffle.number_of_players()
    );
    Ok(())
}

#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    #[account(mut)]
    pub raffle: Account<'info, Raffle>,
}
