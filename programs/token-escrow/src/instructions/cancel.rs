use anchor_lang::prelude::*;
use anchor_spl::token::{
    close_account, transfer_checked, CloseAccount, Mint, Token, TokenAccount, TransferChecked,
};

use crate::errors::EscrowError;
use crate::state::{EscrowAccount, AUTHORITY_SEED, ESCROW_SEED};

#[derive(Accounts)]
pub struct Cancel<'info> {
    /// The initializer who opened the agreement
    #[account(mut)]
    pub initializer: Signer<'info>,

    /// Escrow record; closed on success with rent going to the initializer
    #[account(
        mut,
        close = initializer,
        constraint = escrow_account.initializer_key == initializer.key()
            @ EscrowError::UnauthorizedSigner,
        seeds = [
            ESCROW_SEED,
            escrow_account.initializer_key.as_ref(),
            escrow_account.seed.to_le_bytes().as_ref(),
        ],
        bump = escrow_account.bump,
    )]
    pub escrow_account: Account<'info, EscrowAccount>,

    /// CHECK: custody authority PDA; signs the refund transfer
    #[account(seeds = [AUTHORITY_SEED], bump = escrow_account.authority_bump)]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault holding the asset A deposit
    #[account(mut)]
    pub vault_account: Account<'info, TokenAccount>,

    /// Mint of asset A (the vaulted token)
    #[account(constraint = mint.key() == vault_account.mint)]
    pub mint: Account<'info, Mint>,

    /// Asset A account nominated for the refund; any account the initializer controls
    #[account(
        mut,
        constraint = initializer_refund_token_account.owner == initializer.key()
            @ EscrowError::UnauthorizedSigner,
        constraint = initializer_refund_token_account.mint == mint.key(),
    )]
    pub initializer_refund_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Cancel<'info> {
    /// Verify the vault is the record's derived vault and still fully funded
    pub fn check_vault(&self) -> Result<()> {
        let expected = self
            .escrow_account
            .vault_address(&self.escrow_account.key())?;
        require_keys_eq!(
            self.vault_account.key(),
            expected,
            EscrowError::VaultMismatch
        );
        require_eq!(
            self.vault_account.amount,
            self.escrow_account.initializer_amount,
            EscrowError::RecordNotOpen
        );
        Ok(())
    }

    /// Return the vault balance to the initializer, then close the vault
    pub fn refund_and_close_vault(&mut self) -> Result<()> {
        let signer_seeds: &[&[&[u8]]] =
            &[&[AUTHORITY_SEED, &[self.escrow_account.authority_bump]]];

        let cpi_accounts = TransferChecked {
            from: self.vault_account.to_account_info(),
            mint: self.mint.to_account_info(),
            to: self.initializer_refund_token_account.to_account_info(),
            authority: self.vault_authority.to_account_info(),
        };
        let cpi_program = self.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);

        transfer_checked(cpi_ctx, self.vault_account.amount, self.mint.decimals)?;

        let cpi_accounts = CloseAccount {
            account: self.vault_account.to_account_info(),
            destination: self.initializer.to_account_info(),
            authority: self.vault_authority.to_account_info(),
        };
        let cpi_program = self.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);

        close_account(cpi_ctx)
    }
}

/// Handler for the cancel instruction
pub fn handler(ctx: Context<Cancel>) -> Result<()> {
    ctx.accounts.check_vault()?;
    ctx.accounts.refund_and_close_vault()?;

    msg!(
        "Escrow cancelled: {} of asset A returned",
        ctx.accounts.escrow_account.initializer_amount
    );
    Ok(())
}
