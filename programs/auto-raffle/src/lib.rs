use anchor_lang::prelude::*;
use instructions::*;
use state::UpkeepStatus;

pub mod error;
pub mod instructions;
pub mod state;

declare_id!("Dzi2Vs5QdzhWdRjHm9Egco1nManuWbeGt6jMFCCLtHDm");

#[program]
pub mod auto_raffle {
    use super::*;

    pub fn init_config(ctx: Context<InitConfig>) -> Result<()> {
        instructions::init_config::init_config(ctx)
    }

    pub fn create_raffle(ctx: Context<CreateRaffle>, params: CreateRaffleParams) -> Result<()> {
        instructions::create_raffle::create_raffle(ctx, params)
    }

    pub fn enter_raffle(ctx: Context<EnterRaffle>, amount: u64) -> Result<()> {
        instructions::enter_raffle::enter_raffle(ctx, amount)
    }

    pub fn check_upkeep(ctx: Context<CheckUpkeep>, check_data: Vec<u8>) -> Result<UpkeepStatus> {
        instructions::check_upkeep::check_upkeep(ctx, check_data)
    }

    pub fn perform_upkeep(ctx: Context<PerformUpkeep>, perform_data: Vec<u8>) -> Result<()> {
        instructions::perform_upkeep::perform_upkeep(ctx, perform_data)
    }

    pub fn fulfill_random_words<'info>(
        ctx: Context<'_, '_, '_, 'info, FulfillRandomWords<'info>>,
        request_id: u64,
        random_words: Vec<[u8; 32]>,
    ) -> Result<()> {
        instructions::fulfill_random_words::fulfill_random_words(ctx, request_id, random_words)
    }
}
