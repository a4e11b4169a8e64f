use anchor_lang::prelude::*;

use crate::errors::EscrowError;

/// Seed prefix for escrow record PDAs
pub const ESCROW_SEED: &[u8] = b"escrow";
/// Seed prefix for vault token account PDAs
pub const VAULT_SEED: &[u8] = b"token-seed";
/// Seed of the custody authority PDA that owns every vault
pub const AUTHORITY_SEED: &[u8] = b"authority";

/// Escrow record that stores the terms of one pending swap agreement
#[account(discriminator = 1)]
#[derive(InitSpace)]
pub struct EscrowAccount {
    /// Client-chosen handle, part of the record PDA derivation
    pub seed: u64,
    /// The initializer's wallet address (creator of the agreement)
    pub initializer_key: Pubkey,
    /// Token account the asset A deposit was withdrawn from
    pub initializer_deposit_token_account: Pubkey,
    /// Token account that receives asset B on exchange
    pub initializer_receive_token_account: Pubkey,
    /// Amount of asset A held in the vault
    pub initializer_amount: u64,
    /// Amount of asset B the initializer wants in return
    pub taker_amount: u64,
    /// Bump seed of the record PDA
    pub bump: u8,
    /// Bump seed of the vault PDA
    pub vault_bump: u8,
    /// Bump seed of the custody authority PDA
    pub authority_bump: u8,
}

impl EscrowAccount {
    /// Recompute the vault address from the record's derivation parameters.
    ///
    /// Must reproduce the initialize-time derivation exactly; any supplied
    /// vault that does not match is rejected.
    pub fn vault_address(&self, record: &Pubkey) -> Result<Pubkey> {
        Pubkey::create_program_address(
            &[VAULT_SEED, record.as_ref(), &[self.vault_bump]],
            &crate::ID,
        )
        .map_err(|_| error!(EscrowError::VaultMismatch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custody_authority_is_unsignable_and_reproducible() {
        let (authority, bump) = Pubkey::find_program_address(&[AUTHORITY_SEED], &crate::ID);
        // Off the ed25519 curve, so no private key can ever sign for it
        assert!(!authority.is_on_curve());
        let rederived =
            Pubkey::create_program_address(&[AUTHORITY_SEED, &[bump]], &crate::ID).unwrap();
        assert_eq!(authority, rederived);
    }

    #[test]
    fn vault_derivation_is_per_record() {
        let initializer = Pubkey::new_unique();
        let (record_a, _) = Pubkey::find_program_address(
            &[ESCROW_SEED, initializer.as_ref(), &1u64.to_le_bytes()],
            &crate::ID,
        );
        let (record_b, _) = Pubkey::find_program_address(
            &[ESCROW_SEED, initializer.as_ref(), &2u64.to_le_bytes()],
            &crate::ID,
        );
        assert_ne!(record_a, record_b);

        let (vault_a, _) =
            Pubkey::find_program_address(&[VAULT_SEED, record_a.as_ref()], &crate::ID);
        let (vault_b, _) =
            Pubkey::find_program_address(&[VAULT_SEED, record_b.as_ref()], &crate::ID);
        assert_ne!(vault_a, vault_b);
    }

    #[test]
    fn vault_address_rejects_wrong_bump() {
        let initializer = Pubkey::new_unique();
        let (record, _) = Pubkey::find_program_address(
            &[ESCROW_SEED, initializer.as_ref(), &1u64.to_le_bytes()],
            &crate::ID,
        );
        let (vault, vault_bump) =
            Pubkey::find_program_address(&[VAULT_SEED, record.as_ref()], &crate::ID);

        let escrow = EscrowAccount {
            seed: 1,
            initializer_key: initializer,
            initializer_deposit_token_account: Pubkey::new_unique(),
            initializer_receive_token_account: Pubkey::new_unique(),
            initializer_amount: 1000,
            taker_amount: 10,
            bump: 0,
            vault_bump,
            authority_bump: 0,
        };
        assert_eq!(escrow.vault_address(&record).unwrap(), vault);

        // A record pointing at a different bump must not resolve to the vault
        let wrong = EscrowAccount {
            vault_bump: vault_bump.wrapping_sub(1),
            ..escrow
        };
        assert_ne!(wrong.vault_address(&record).ok(), Some(vault));
    }
}
