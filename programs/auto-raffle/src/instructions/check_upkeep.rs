use anchor_lang::prelude::*;

use crate::state::{Raffle, UpkeepStatus};

/// Reports whether a draw can be started right now.
///
/// Writes nothing, so keepers can simulate it freely and only submit
/// `perform_upkeep` once it returns `upkeep_needed`. The check data is
/// accepted for keeper compatibility and ignored.
pub fn check_upkeep(ctx: Context<CheckUpkeep>, _check_data: Vec<u8>) -> Result<UpkeepStatus> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx.accounts.raffle.check_upkeep(now))
}

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    pub raffle: Account<'info, Raffle>,
}
