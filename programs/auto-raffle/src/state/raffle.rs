use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::randomness::{
        select_winner, PendingRequest, RandomnessConfig, RandomnessGateway,
        RANDOMNESS_GATEWAY_SIZE,
    },
};

/// Entries a single round can hold before `enter` starts failing.
pub const MAX_PLAYERS: usize = 100;

// Space calculation:
// 8 (discriminator) +
// 32 (vault) +
// 8 (entrance_fee) +
// 8 (interval) +
// 4 (length of players) +
// 3200 (players: MAX_PLAYERS * 32) +
// 8 (pool) +
// 1 (raffle_state) +
// 8 (last_timestamp) +
// 33 (recent_winner: Option<Pubkey>) +
// 115 (randomness) =
// 3425 total bytes
pub const RAFFLE_ACCOUNT_SIZE: usize =
    8 + 32 + 8 + 8 + 4 + 32 * MAX_PLAYERS + 8 + 1 + 8 + 33 + RANDOMNESS_GATEWAY_SIZE;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq)]
pub enum RaffleState {
    Open = 0,
    Calculating = 1,
}

/// Result of an upkeep check. `upkeep_needed` is the conjunction of the four
/// conditions, which are reported individually for diagnostics.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct UpkeepStatus {
    pub upkeep_needed: bool,
    pub is_open: bool,
    pub time_passed: bool,
    pub has_players: bool,
    pub has_balance: bool,
    pub perform_data: Vec<u8>,
}

#[account]
pub struct Raffle {
    pub vault: Pubkey,
    pub entrance_fee: u64,
    /// Minimum number of seconds between two draws.
    pub interval: i64,
    /// Entries in submission order. A player appears once per entry.
    pub players: Vec<Pubkey>,
    /// Lamports paid in since the last draw, held by the vault.
    pub pool: u64,
    pub raffle_state: RaffleState,
    pub last_timestamp: i64,
    pub recent_winner: Option<Pubkey>,
    pub randomness: RandomnessGateway,
}

impl Raffle {
    pub fn new(
        vault: Pubkey,
        entrance_fee: u64,
        interval: i64,
        randomness: RandomnessConfig,
        now: i64,
    ) -> Self {
        Self {
            vault,
            entrance_fee,
            interval,
            players: Vec::new(),
            pool: 0,
            raffle_state: RaffleState::Open,
            last_timestamp: now,
            recent_winner: None,
            randomness: RandomnessGateway::new(randomness),
        }
    }

    pub fn entrance_fee(&self) -> u64 {
        self.entrance_fee
    }

    pub fn interval(&self) -> i64 {
        self.interval
    }

    pub fn raffle_state(&self) -> RaffleState {
        self.raffle_state
    }

    pub fn number_of_players(&self) -> u64 {
        self.players.len() as u64
    }

    pub fn player(&self, index: u64) -> Option<Pubkey> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.players.get(index))
            .copied()
    }

    pub fn recent_winner(&self) -> Option<Pubkey> {
        self.recent_winner
    }

    pub fn latest_timestamp(&self) -> i64 {
        self.last_timestamp
    }

    pub fn pending_request(&self) -> Option<PendingRequest> {
        self.randomness.pending
    }

    /// Records one entry for `player` paying `amount` lamports.
    ///
    /// The payment is validated before the raffle state, so an underpaying
    /// entry is reported as such whether or not the raffle is open.
    pub fn enter(&mut self, player: Pubkey, amount: u64) -> Result<()> {
        require!(
            amount >= self.entrance_fee,
            RaffleError::InsufficientPayment
        );
        require!(
            self.raffle_state == RaffleState::Open,
            RaffleError::RaffleNotOpen
        );
        require!(self.players.len() < MAX_PLAYERS, RaffleError::RaffleFull);

        let pool = self.pool.checked_add(amount).ok_or(RaffleError::Overflow)?;

        self.players.push(player);
        self.pool = pool;

        Ok(())
    }

    /// Evaluates draw eligibility at `now`. Read-only.
    pub fn check_upkeep(&self, now: i64) -> UpkeepStatus {
        let is_open = self.raffle_state == RaffleState::Open;
        let time_passed = now
            .checked_sub(self.last_timestamp)
            .map_or(false, |elapsed| elapsed >= self.interval);
        let has_players = !self.players.is_empty();
        let has_balance = self.pool > 0;

        UpkeepStatus {
            upkeep_needed: is_open && time_passed && has_players && has_balance,
            is_open,
            time_passed,
            has_players,
            has_balance,
            perform_data: Vec::new(),
        }
    }

    /// Starts a draw: locks entries and issues a randomness request.
    /// Returns the request id the oracle must answer.
    pub fn perform_upkeep(&mut self, now: i64) -> Result<u64> {
        let status = self.check_upkeep(now);
        if !status.upkeep_needed {
            msg!(
                "Upkeep not needed: is_open={} time_passed={} has_players={} has_balance={} pool={} players={} state={:?}",
                status.is_open,
                status.time_passed,
                status.has_players,
                status.has_balance,
                self.pool,
                self.players.len(),
                self.raffle_state
            );
            return err!(RaffleError::UpkeepNotNeeded);
        }

        let participant_count = self.number_of_players();
        let request_id = self.randomness.request(now, participant_count)?;
        self.raffle_state = RaffleState::Calculating;

        Ok(request_id)
    }

    /// Redeems the pending request with the oracle's random words, selects the
    /// winner against the entry count frozen at request time and pays out.
    ///
    /// The request is consumed before settlement, so a failed payout leaves the
    /// raffle calculating with nothing pending.
    pub fn fulfill_random_words<F>(
        &mut self,
        request_id: u64,
        random_words: &[[u8; 32]],
        now: i64,
        transfer: F,
    ) -> Result<Pubkey>
    where
        F: FnOnce(&Pubkey, u64) -> Result<()>,
    {
        self.randomness.pending_for(request_id)?;
        let random_word = random_words
            .first()
            .ok_or(RaffleError::MissingRandomWords)?;

        let pending = self.randomness.fulfill(request_id)?;
        let winner_index = select_winner(random_word, pending.participant_count)?;

        self.settle(winner_index, now, transfer)
    }

    /// Pays the whole pool to the player at `winner_index` and opens the next
    /// round. Nothing is written unless `transfer` succeeds.
    pub fn settle<F>(&mut self, winner_index: u64, now: i64, transfer: F) -> Result<Pubkey>
    where
        F: FnOnce(&Pubkey, u64) -> Result<()>,
    {
        let winner = self
            .player(winner_index)
            .ok_or(RaffleError::InvalidWinnerIndex)?;
        let amount = self.pool;

        if let Err(error) = transfer(&winner, amount) {
            msg!("Payout of {} lamports to {} failed: {}", amount, winner, error);
            return err!(RaffleError::TransferFailed);
        }

        self.recent_winner = Some(winner);
        self.last_timestamp = now;
        self.reset_entries();
        self.raffle_state = RaffleState::Open;

        Ok(winner)
    }

    fn reset_entries(&mut self) {
        self.players.clear();
        self.pool = 0;
    }
}
