use anchor_lang::prelude::*;

#[error_code]
pub enum EscrowError {
    #[msg("Invalid amount: amount must be greater than zero")]
    InvalidAmount,
    #[msg("Unauthorized signer: account is not controlled by the expected party")]
    UnauthorizedSigner,
    #[msg("Insufficient funds: taker cannot cover the agreed amount")]
    InsufficientFunds,
    #[msg("Record not open: escrow is not backed by a funded vault")]
    RecordNotOpen,
    #[msg("Vault mismatch: vault does not belong to this escrow record")]
    VaultMismatch,
}
