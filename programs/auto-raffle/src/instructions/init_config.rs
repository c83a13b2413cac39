use crate::{
    error::RaffleError,
    program::AutoRaffle,
    state::{Config, CONFIG_ACCOUNT_SIZE},
};
use anchor_lang::prelude::*;

/// Instruction to initialize the program configuration
/// This should be called once during program deployment
///
/// # Security Considerations
/// - Creates a PDA with seed "config" holding the program authorities
/// - The caller must be the upgrade authority recorded in the program data account
/// - The management authority is set once and cannot be transferred
///
/// # Account Validations
/// * Config - New PDA initialized with proper space allocation
/// * Upgrade Authority - Signer paying for the config account
/// * Management Authority - Account allowed to create raffles
/// * Program / Program Data - This program and its loader data account
pub fn init_config(ctx: Context<InitConfig>) -> Result<()> {
    let config = &mut ctx.accounts.config;
    config.management_authority = ctx.accounts.management_authority.key();
    config.upgrade_authority = ctx.accounts.upgrade_authority.key();
    config.bump = ctx.bumps.config;
    config.raffle_counter = 0;

    msg!(
        "Config initialized, management authority {}",
        config.management_authority
    );
    Ok(())
}

#[derive(Accounts)]
pub struct InitConfig<'info> {
    #[account(
        init,
        payer = upgrade_authority,
        space = CONFIG_ACCOUNT_SIZE,
        seeds = [b"config"],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(mut)]
    pub upgrade_authority: Signer<'info>,
    pub management_authority: SystemAccount<'info>,

    #[account(constraint = program.programdata_address()? == Some(program_data.key()))]
    pub program: Program<'info, AutoRaffle>,
    #[account(
        constraint = is_upgrade_authority(&program_data, &upgrade_authority.key())
            @ RaffleError::NotUpgradeAuthority
    )]
    pub program_data: Account<'info, ProgramData>,

    pub system_program: Program<'info, System>,
}

/// An immutable program has no upgrade authority, so nobody can initialize it.
fn is_upgrade_authority(program_data: &ProgramData, signer: &Pubkey) -> bool {
    program_data.upgrade_authority_address == Some(*signer)
}
