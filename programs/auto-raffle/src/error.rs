use anchor_lang::error_code;

#[error_code]
pub enum RaffleError {
    Overflow,
    EntranceFeeTooLow,
    IntervalTooShort,
    InvalidVault,
    #[msg("Only the program management authority can create raffles")]
    NotProgramManagementAuthority,
    #[msg("Raffle interval exceeds maximum allowed")]
    IntervalTooLong,
    #[msg("Number of random words must be between 1 and 500")]
    InvalidNumWords,
    #[msg("Request confirmations must be between 3 and 200")]
    InvalidRequestConfirmations,
    #[msg("Callback gas limit must be greater than zero")]
    InvalidCallbackGasLimit,
    #[msg("Not enough lamports sent to enter the raffle")]
    InsufficientPayment,
    #[msg("Raffle is not open")]
    RaffleNotOpen,
    #[msg("All player slots for this round are taken")]
    RaffleFull,
    #[msg("Upkeep not needed")]
    UpkeepNotNeeded,
    #[msg("A randomness request is already pending")]
    RequestAlreadyPending,
    #[msg("Only the configured coordinator can fulfill randomness requests")]
    OnlyCoordinatorCanFulfill,
    #[msg("Nonexistent request")]
    NonexistentRequest,
    #[msg("No random words were delivered")]
    MissingRandomWords,
    #[msg("Cannot draw a winner without players")]
    NoPlayers,
    #[msg("Winner index is outside the player list")]
    InvalidWinnerIndex,
    #[msg("Winner account was not supplied")]
    WinnerAccountMissing,
    #[msg("Winner account must be writable")]
    WinnerAccountNotWritable,
    #[msg("Transfer failed")]
    TransferFailed,
    #[msg("Only the program upgrade authority can initialize the config")]
    NotUpgradeAuthority,
}
