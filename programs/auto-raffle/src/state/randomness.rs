use anchor_lang::prelude::*;
use arrayref::array_refs;

use crate::error::RaffleError;

// 32 coordinator + 32 key_hash + 8 subscription_id + 2 request_confirmations + 4 callback_gas_limit + 4 num_words
pub const RANDOMNESS_CONFIG_SIZE: usize = 32 + 32 + 8 + 2 + 4 + 4;

// 8 request_id + 8 requested_at + 8 participant_count
pub const PENDING_REQUEST_SIZE: usize = 8 + 8 + 8;

// config + 8 request_counter + 1 option tag + pending request
pub const RANDOMNESS_GATEWAY_SIZE: usize = RANDOMNESS_CONFIG_SIZE + 8 + 1 + PENDING_REQUEST_SIZE;

/// Oracle identity and request tuning for a raffle.
///
/// Apart from `coordinator`, which authenticates fulfillments, these values
/// mean nothing to the raffle. They are echoed in every request signal so the
/// off-chain oracle knows which key, subscription and limits to serve.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct RandomnessConfig {
    /// The only key allowed to deliver random words.
    pub coordinator: Pubkey,
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}

/// An issued draw that the oracle has not answered yet.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct PendingRequest {
    pub request_id: u64,
    pub requested_at: i64,
    /// Entry count frozen at request time, used for winner selection.
    pub participant_count: u64,
}

/// Request/fulfill handshake with the randomness oracle.
///
/// `request` hands out a correlation ticket and `fulfill` redeems it exactly
/// once. At most one ticket is outstanding at any time.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq)]
pub struct RandomnessGateway {
    pub config: RandomnessConfig,
    pub request_counter: u64,
    pub pending: Option<PendingRequest>,
}

impl RandomnessGateway {
    pub fn new(config: RandomnessConfig) -> Self {
        Self {
            config,
            request_counter: 0,
            pending: None,
        }
    }

    /// Issues a new request id. Ids start at 1 and are never reused.
    pub fn request(&mut self, now: i64, participant_count: u64) -> Result<u64> {
        require!(self.pending.is_none(), RaffleError::RequestAlreadyPending);

        let request_id = self
            .request_counter
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;

        self.request_counter = request_id;
        self.pending = Some(PendingRequest {
            request_id,
            requested_at: now,
            participant_count,
        });

        Ok(request_id)
    }

    /// Returns the pending request if `request_id` matches it, without
    /// consuming it. Ids that were never issued and ids already consumed are
    /// both rejected.
    pub fn pending_for(&self, request_id: u64) -> Result<PendingRequest> {
        match self.pending {
            Some(pending) if pending.request_id == request_id => Ok(pending),
            _ => err!(RaffleError::NonexistentRequest),
        }
    }

    /// Consumes the pending request if `request_id` matches it.
    pub fn fulfill(&mut self, request_id: u64) -> Result<PendingRequest> {
        let pending = self.pending_for(request_id)?;
        self.pending = None;
        Ok(pending)
    }

    pub fn is_coordinator(&self, key: &Pubkey) -> bool {
        self.config.coordinator == *key
    }
}

/// Maps a random word onto a player index in `[0, participant_count)`.
///
/// The word is read as a 256-bit big-endian unsigned integer and reduced
/// modulo `participant_count`, one 64-bit limb at a time so the running
/// remainder always fits in a u128.
pub fn select_winner(random_word: &[u8; 32], participant_count: u64) -> Result<u64> {
    // Unreachable through the draw flow: entries are locked while a request is pending.
    require!(participant_count > 0, RaffleError::NoPlayers);

    let modulus = participant_count as u128;
    let (a, b, c, d) = array_refs![random_word, 8, 8, 8, 8];

    let index = [a, b, c, d].into_iter().fold(0u128, |remainder, limb| {
        ((remainder << 64) | u64::from_be_bytes(*limb) as u128) % modulus
    });

    Ok(index as u64)
}
