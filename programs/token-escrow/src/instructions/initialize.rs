use anchor_lang::prelude::*;
use anchor_spl::token::{transfer_checked, Mint, Token, TokenAccount, TransferChecked};

use crate::errors::EscrowError;
use crate::state::{EscrowAccount, AUTHORITY_SEED, ESCROW_SEED, VAULT_SEED};

#[derive(Accounts)]
#[instruction(seed: u64)]
pub struct Initialize<'info> {
    /// The initializer who sets the terms and deposits asset A
    #[account(mut)]
    pub initializer: Signer<'info>,

    /// Mint of asset A (the deposited token)
    pub mint: Account<'info, Mint>,

    /// CHECK: custody authority PDA; owns every vault and carries no data
    #[account(seeds = [AUTHORITY_SEED], bump)]
    pub vault_authority: UncheckedAccount<'info>,

    /// Escrow record storing the agreement terms
    #[account(
        init,
        payer = initializer,
        space = 8 + EscrowAccount::INIT_SPACE,
        seeds = [ESCROW_SEED, initializer.key().as_ref(), seed.to_le_bytes().as_ref()],
        bump,
    )]
    pub escrow_account: Account<'info, EscrowAccount>,

    /// Vault holding the deposit under the custody authority
    #[account(
        init,
        payer = initializer,
        seeds = [VAULT_SEED, escrow_account.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = vault_authority,
    )]
    pub vault_account: Account<'info, TokenAccount>,

    /// Initializer's asset A token account (source of the deposit)
    #[account(
        mut,
        constraint = initializer_deposit_token_account.owner == initializer.key()
            @ EscrowError::UnauthorizedSigner,
        constraint = initializer_deposit_token_account.mint == mint.key(),
    )]
    pub initializer_deposit_token_account: Account<'info, TokenAccount>,

    /// Initializer's asset B token account (receives the counter-asset)
    pub initializer_receive_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Populate the escrow record with the agreement terms
    pub fn init_escrow(
        &mut self,
        seed: u64,
        initializer_amount: u64,
        taker_amount: u64,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        self.escrow_account.set_inner(EscrowAccount {
            seed,
            initializer_key: self.initializer.key(),
            initializer_deposit_token_account: self.initializer_deposit_token_account.key(),
            initializer_receive_token_account: self.initializer_receive_token_account.key(),
            initializer_amount,
            taker_amount,
            bump: bumps.escrow_account,
            vault_bump: bumps.vault_account,
            authority_bump: bumps.vault_authority,
        });
        Ok(())
    }

    /// Transfer asset A from the initializer into the vault
    pub fn deposit(&mut self, amount: u64) -> Result<()> {
        let cpi_accounts = TransferChecked {
            from: self.initializer_deposit_token_account.to_account_info(),
            mint: self.mint.to_account_info(),
            to: self.vault_account.to_account_info(),
            authority: self.initializer.to_account_info(),
        };
        let cpi_program = self.token_program.to_account_info();
        let cpi_ctx = CpiContext::new(cpi_program, cpi_accounts);

        transfer_checked(cpi_ctx, amount, self.mint.decimals)
    }
}

/// Handler for the initialize instruction
pub fn handler(
    ctx: Context<Initialize>,
    seed: u64,
    initializer_amount: u64,
    taker_amount: u64,
) -> Result<()> {
    require_gt!(initializer_amount, 0, EscrowError::InvalidAmount);
    require_gt!(taker_amount, 0, EscrowError::InvalidAmount);

    ctx.accounts.init_escrow(seed, initializer_amount, taker_amount, &ctx.bumps)?;
    ctx.accounts.deposit(initializer_amount)?;

    msg!(
        "Escrow opened: {} of asset A locked for {} of asset B",
        initializer_amount,
        taker_amount
    );
    Ok(())
}
