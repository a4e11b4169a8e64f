use anchor_lang::prelude::*;
use anchor_spl::token::{
    close_account, transfer_checked, CloseAccount, Mint, Token, TokenAccount, TransferChecked,
};

use crate::errors::EscrowError;
use crate::state::{EscrowAccount, AUTHORITY_SEED, ESCROW_SEED};

#[derive(Accounts)]
pub struct Exchange<'info> {
    /// The taker who accepts the agreement
    #[account(mut)]
    pub taker: Signer<'info>,

    /// The original initializer; receives the storage rent back
    #[account(mut)]
    pub initializer: SystemAccount<'info>,

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
    pub escrow_account: Box<Account<'info, EscrowAccount>>,

    /// CHECK: custody authority PDA; signs the vault-outbound transfer
    #[account(seeds = [AUTHORITY_SEED], bump = escrow_account.authority_bump)]
    pub vault_authority: UncheckedAccount<'info>,

    /// Vault holding the asset A deposit
    #[account(mut)]
    pub vault_account: Box<Account<'info, TokenAccount>>,

    /// Mint of asset A (the vaulted token)
    #[account(constraint = mint_a.key() == vault_account.mint)]
    pub mint_a: Box<Account<'info, Mint>>,

    /// Mint of asset B (the counter-payment token)
    pub mint_b: Box<Account<'info, Mint>>,

    /// Taker's asset B token account (source of the counter-payment)
    #[account(
        mut,
        constraint = taker_deposit_token_account.owner == taker.key()
            @ EscrowError::UnauthorizedSigner,
        constraint = taker_deposit_token_account.mint == mint_b.key(),
    )]
    pub taker_deposit_token_account: Box<Account<'info, TokenAccount>>,

    /// Taker's asset A token account (receives the vault balance)
    #[account(
        mut,
        constraint = taker_receive_token_account.owner == taker.key()
            @ EscrowError::UnauthorizedSigner,
        constraint = taker_receive_token_account.mint == mint_a.key(),
    )]
    pub taker_receive_token_account: Box<Account<'info, TokenAccount>>,

    /// The deposit account referenced by the record
    #[account(
        constraint = initializer_deposit_token_account.key()
            == escrow_account.initializer_deposit_token_account
            @ EscrowError::UnauthorizedSigner,
    )]
    pub initializer_deposit_token_account: Box<Account<'info, TokenAccount>>,

    /// Initializer's asset B token account (receives the counter-payment)
    #[account(
        mut,
        constraint = initializer_receive_token_account.key()
            == escrow_account.initializer_receive_token_account
            @ EscrowError::UnauthorizedSigner,
    )]
    pub initializer_receive_token_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

impl<'info> Exchange<'info> {
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

    /// Transfer asset B from the taker to the initializer
    pub fn transfer_to_initializer(&mut self) -> Result<()> {
        let cpi_accounts = TransferChecked {
            from: self.taker_deposit_token_account.to_account_info(),
            mint: self.mint_b.to_account_info(),
            to: self.initializer_receive_token_account.to_account_info(),
            authority: self.taker.to_account_info(),
        };
        let cpi_program = self.token_program.to_account_info();
        let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);

        transfer_checked(cpi_ctx, self.escrow_account.taker_amount, self.mint_b.decimals)
    }

    /// Move the vault balance to the taker, then close the vault
    pub fn withdraw_and_close_vault(&mut self) -> Result<()> {
        let signer_seeds: &[&[&[u8]]] =
            &[&[AUTHORITY_SEED, &[self.escrow_account.authority_bump]]];

        let cpi_accounts = TransferChecked {
            from: self.vault_account.to_account_info(),
            mint: self.mint_a.to_account_info(),
            to: self.taker_receive_token_account.to_account_info(),
            authority: self.vault_authority.to_account_info(),
        };
        let cpi_program = self.token_program.to_account_info();
        let cpi_ctx = CpiContext::new_with_signer(cpi_program, cpi_accounts, signer_seeds);

        transfer_checked(cpi_ctx, self.vault_account.amount, self.mint_a.decimals)?;

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

/// Handler for the exchange instruction
pub fn handler(ctx: Context<Exchange>) -> Result<()> {
    // Every check runs before any asset moves
    require_gte!(
        ctx.accounts.taker_deposit_token_account.amount,
        ctx.accounts.escrow_account.taker_amount,
        EscrowError::InsufficientFunds
    );
    ctx.accounts.check_vault()?;

    ctx.accounts.transfer_to_initializer()?;
    ctx.accounts.withdraw_and_close_vault()?;

    msg!(
        "Escrow settled: {} of asset A for {} of asset B",
        ctx.accounts.escrow_account.initializer_amount,
        ctx.accounts.escrow_account.taker_amount
    );
    Ok(())
}
