use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{Raffle, Vault},
};

/// Event emitted when a player enters the raffle
#[event]
pub struct RaffleEnter {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The player's address
    pub player: Pubkey,
    /// Lamports paid for this entry
    pub amount: u64,
    /// Position of this entry in the player list
    pub entry_index: u64,
}

/// Instruction to enter the current round of a raffle
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `amount` - Lamports to pay, at least the entrance fee
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates the payment covers the entrance fee
/// 2. Validates the raffle is in Open state
/// 3. Verifies the vault account matches the one stored in raffle
/// 4. Verifies the vault balance grew by exactly the paid amount
///
/// # Implementation Notes
/// - Uses checked arithmetic operations to prevent overflow
/// - Updates state before performing external calls
pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
    let player = ctx.accounts.player.key();
    let entry_index = ctx.accounts.raffle.number_of_players();

    ctx.accounts.raffle.enter(player, amount)?;

    // Store pre-transfer balance for verification
    let pre_transfer_balance = ctx.accounts.vault.to_account_info().lamports();

    // Transfer lamports from the player to the raffle vault
    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &player,
            &ctx.accounts.vault.key(),
            amount,
        ),
        &[
            ctx.accounts.player.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            ctx.accounts.vault.to_account_info(),
        ],
    )?;

    // Verify the transfer was successful by checking vault balance
    let post_transfer_balance = ctx.accounts.vault.to_account_info().lamports();
    require!(
        post_transfer_balance
            == pre_transfer_balance
                .checked_add(amount)
                .ok_or(RaffleError::Overflow)?,
        RaffleError::TransferFailed
    );

    emit!(RaffleEnter {
        raffle: ctx.accounts.raffle.key(),
        player,
        amount,
        entry_index,
    });

    Ok(())
}

/// Accounts required for the enter_raffle instruction
#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    /// The raffle being entered. State checks happen in the handler so an
    /// underpayment is reported before a closed raffle.
    #[account(
        mut,
        has_one = vault @ RaffleError::InvalidVault,
    )]
    pub raffle: Account<'info, Raffle>,

    /// Vault that receives the payment
    /// PDA with seeds ["vault", raffle_key]
    #[account(
        mut,
        seeds = [
            b"vault",
            raffle.key().as_ref(),
        ],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// The account entering and paying
    #[account(mut)]
    pub player: Signer<'info>,

    pub system_program: Program<'info, System>,
}
