use soroban_sdk::contracterror;

pub type TidalResult<T = ()> = Result<T, ErrorCode>;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    // General
    AlreadyInitialized = 1,
    NotAuthorized = 2,
    MathError = 3,
    CastingFailure = 4,
    InvalidAmount = 5,
    Stopped = 6,

    // Node operators
    OperatorNotFound = 10,
    OperatorActivityAlreadySet = 11,
    InvalidQuantity = 12,
    #[doc = "Pubkey or signature payload does not match the declared quantity"]
    InvalidKeyLength = 13,
    EmptySigningKey = 14,
    SigningKeyNotFound = 15,
    #[doc = "Used signing keys can not be removed"]
    SigningKeyAlreadyUsed = 16,
    StoppedValidatorsExceedUsed = 17,
    UsedKeysExceedTotal = 18,
    InvalidDepositUnit = 19,

    // Staking pool
    InvalidFee = 20,
    InvalidFeeDistribution = 21,
    ZeroDeposit = 22,
    ReportedMoreDeposited = 23,
    ReportedLessValidators = 24,
    NotEnoughBufferedEther = 25,
    #[doc = "Pool balance did not drop by exactly one deposit after staking"]
    DepositBalanceMismatch = 26,
    EmptyWithdrawalCredentials = 27,
    ZeroShares = 28,

    // Withdrawal queue
    InvalidRequestId = 30,
    RequestNotFoundOrNotFinalized = 31,
    RequestAlreadyClaimed = 32,
    NotOwner = 33,
    InvalidHint = 34,
    InvalidRequestIdRange = 35,
    InvalidState = 36,
    TooMuchEtherToFinalize = 37,
    ZeroShareRate = 38,
    EmptyBatches = 39,
    InvalidBatches = 40,
    TooManyBatches = 41,
    RequestAmountTooSmall = 42,
    RequestAmountTooLarge = 43,
    LockedEtherExceedsBalance = 44,
    ArraysLengthMismatch = 45,
    InvalidOwner = 46,
}
