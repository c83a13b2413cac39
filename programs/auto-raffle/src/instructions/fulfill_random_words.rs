use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{Raffle, Vault},
};

/// Event emitted when a winner has been paid
#[event]
pub struct WinnerPicked {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The winner's address
    pub winner: Pubkey,
    /// Lamports paid out
    pub amount: u64,
    /// The request the winner was drawn under
    pub request_id: u64,
}

/// Delivers the oracle's random words for a pending draw.
///
/// Only the coordinator configured on the raffle may call this. The first
/// word picks the winner among the players entered when the draw was
/// requested, and the whole pool is moved from the vault to the winner.
///
/// The winner's account must be passed writable in the remaining accounts.
/// Oracles derive it off-chain from the same word, or pass every player.
///
/// # Errors
/// - `OnlyCoordinatorCanFulfill` if the signer is not the configured coordinator
/// - `NonexistentRequest` if `request_id` is not the pending request
/// - `MissingRandomWords` if no words are delivered
/// - `TransferFailed` if the winner account is missing or cannot be credited
pub fn fulfill_random_words<'info>(
    ctx: Context<'_, '_, '_, 'info, FulfillRandomWords<'info>>,
    request_id: u64,
    random_words: Vec<[u8; 32]>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let raffle_key = ctx.accounts.raffle.key();
    let vault = ctx.accounts.vault.to_account_info();
    let remaining_accounts = ctx.remaining_accounts;
    let pool = ctx.accounts.raffle.pool;

    let winner = ctx.accounts.raffle.fulfill_random_words(
        request_id,
        &random_words,
        now,
        |winner, amount| pay_winner(&vault, remaining_accounts, winner, amount),
    )?;

    emit!(WinnerPicked {
        raffle: raffle_key,
        winner,
        amount: pool,
        request_id,
    });

    msg!("Winner {} paid {} lamports", winner, pool);
    Ok(())
}

/// Moves `amount` lamports from the vault to the winner's account, which must
/// be present and writable in `remaining_accounts`.
pub fn pay_winner<'info>(
    vault: &AccountInfo<'info>,
    remaining_accounts: &[AccountInfo<'info>],
    winner: &Pubkey,
    amount: u64,
) -> Result<()> {
    let winner_account = remaining_accounts
        .iter()
        .find(|account| account.key == winner)
        .ok_or(RaffleError::WinnerAccountMissing)?;
    require!(
        winner_account.is_writable,
        RaffleError::WinnerAccountNotWritable
    );

    // Direct lamport moves work because the vault is owned by this program.
    vault.sub_lamports(amount)?;
    winner_account.add_lamports(amount)?;
    Ok(())
}

/// Accounts required for the fulfill_random_words instruction
#[derive(Accounts)]
pub struct FulfillRandomWords<'info> {
    /// The raffle awaiting randomness
    #[account(
        mut,
        has_one = vault @ RaffleError::InvalidVault,
        constraint = raffle.randomness.is_coordinator(&coordinator.key())
            @ RaffleError::OnlyCoordinatorCanFulfill,
    )]
    pub raffle: Account<'info, Raffle>,

    /// Vault holding the pool
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

    /// The randomness oracle
    pub coordinator: Signer<'info>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RandomnessConfig, RaffleState};
    use anchor_lang::error::Error;

    const RENT: u64 = 946_560;
    const ENTRANCE_FEE: u64 = 10_000_000;

    fn account<'a>(
        key: &'a Pubkey,
        is_writable: bool,
        lamports: &'a mut u64,
        owner: &'a Pubkey,
    ) -> AccountInfo<'a> {
        AccountInfo::new(key, false, is_writable, lamports, &mut [], owner, false, 0)
    }

    #[test]
    fn pays_exactly_the_pool_to_the_winner() {
        let (vault_key, winner_key, other_key) =
            (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let system = anchor_lang::system_program::ID;
        let (mut vault_lamports, mut winner_lamports, mut other_lamports) =
            (RENT + 4 * ENTRANCE_FEE, 5_000, 7_000);

        let vault = account(&vault_key, true, &mut vault_lamports, &crate::ID);
        let remaining = [
            account(&other_key, true, &mut other_lamports, &system),
            account(&winner_key, true, &mut winner_lamports, &system),
        ];

        pay_winner(&vault, &remaining, &winner_key, 4 * ENTRANCE_FEE).unwrap();

        assert_eq!(vault.lamports(), RENT);
        assert_eq!(remaining[1].lamports(), 5_000 + 4 * ENTRANCE_FEE);
        assert_eq!(remaining[0].lamports(), 7_000);
    }

    #[test]
    fn missing_winner_account_moves_nothing() {
        let (vault_key, winner_key, other_key) =
            (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        let system = anchor_lang::system_program::ID;
        let (mut vault_lamports, mut other_lamports) = (RENT + ENTRANCE_FEE, 7_000);

        let vault = account(&vault_key, true, &mut vault_lamports, &crate::ID);
        let remaining = [account(&other_key, true, &mut other_lamports, &system)];

        assert_eq!(
            pay_winner(&vault, &remaining, &winner_key, ENTRANCE_FEE).unwrap_err(),
            Error::from(RaffleError::WinnerAccountMissing)
        );
        assert_eq!(vault.lamports(), RENT + ENTRANCE_FEE);
        assert_eq!(remaining[0].lamports(), 7_000);
    }

    #[test]
    fn read_only_winner_account_moves_nothing() {
        let (vault_key, winner_key) = (Pubkey::new_unique(), Pubkey::new_unique());
        let system = anchor_lang::system_program::ID;
        let (mut vault_lamports, mut winner_lamports) = (RENT + ENTRANCE_FEE, 5_000);

        let vault = account(&vault_key, true, &mut vault_lamports, &crate::ID);
        let remaining = [account(&winner_key, false, &mut winner_lamports, &system)];

        assert_eq!(
            pay_winner(&vault, &remaining, &winner_key, ENTRANCE_FEE).unwrap_err(),
            Error::from(RaffleError::WinnerAccountNotWritable)
        );
        assert_eq!(vault.lamports(), RENT + ENTRANCE_FEE);
        assert_eq!(remaining[0].lamports(), 5_000);
    }

    #[test]
    fn draw_pays_winner_from_vault_and_reopens() {
        let vault_key = Pubkey::new_unique();
        let system = anchor_lang::system_program::ID;
        let players = [Pubkey::new_unique(), Pubkey::new_unique()];

        let mut raffle = Raffle::new(
            vault_key,
            ENTRANCE_FEE,
            30,
            RandomnessConfig {
                coordinator: Pubkey::new_unique(),
                key_hash: [1u8; 32],
                subscription_id: 1,
                request_confirmations: 3,
                callback_gas_limit: 500_000,
                num_words: 1,
            },
            0,
        );
        for player in &players {
            raffle.enter(*player, ENTRANCE_FEE).unwrap();
        }
        let request_id = raffle.perform_upkeep(30).unwrap();
        let pool = raffle.pool;

        let (mut vault_lamports, mut first_lamports, mut second_lamports) =
            (RENT + pool, 1_000, 2_000);
        let vault = account(&vault_key, true, &mut vault_lamports, &crate::ID);
        let remaining = [
            account(&players[0], true, &mut first_lamports, &system),
            account(&players[1], true, &mut second_lamports, &system),
        ];

        let mut word = [0u8; 32];
        word[31] = 3;
        let winner = raffle
            .fulfill_random_words(request_id, &[word], 31, |winner, amount| {
                pay_winner(&vault, &remaining, winner, amount)
            })
            .unwrap();

        assert_eq!(winner, players[1]);
        assert_eq!(vault.lamports(), RENT);
        assert_eq!(remaining[1].lamports(), 2_000 + pool);
        assert_eq!(remaining[0].lamports(), 1_000);
        assert_eq!(raffle.raffle_state, RaffleState::Open);
        assert_eq!(raffle.pool, 0);
    }

    #[test]
    fn draw_without_winner_account_fails_transfer() {
        let vault_key = Pubkey::new_unique();
        let player = Pubkey::new_unique();

        let mut raffle = Raffle::new(
            vault_key,
            ENTRANCE_FEE,
            30,
            RandomnessConfig {
                coordinator: Pubkey::new_unique(),
                key_hash: [1u8; 32],
                subscription_id: 1,
                request_confirmations: 3,
                callback_gas_limit: 500_000,
                num_words: 1,
            },
            0,
        );
        raffle.enter(player, ENTRANCE_FEE).unwrap();
        let request_id = raffle.perform_upkeep(30).unwrap();

        let mut vault_lamports = RENT + ENTRANCE_FEE;
        let vault = account(&vault_key, true, &mut vault_lamports, &crate::ID);

        assert_eq!(
            raffle
                .fulfill_random_words(request_id, &[[0u8; 32]], 31, |winner, amount| {
                    pay_winner(&vault, &[], winner, amount)
                })
                .unwrap_err(),
            Error::from(RaffleError::TransferFailed)
        );
        assert_eq!(vault.lamports(), RENT + ENTRANCE_FEE);
        assert_eq!(raffle.players, vec![player]);
        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
    }
}
