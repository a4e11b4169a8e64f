use anchor_lang::prelude::*;

pub mod errors;
pub mod instructions;
pub mod state;

use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod token_escrow {
    use super::*;

    /// Open an escrow: the initializer deposits asset A and sets the terms
    #[instruction(discriminator = 0)]
    pub fn initialize(
        ctx: Context<Initialize>,
        seed: u64,
        initializer_amount: u64,
        taker_amount: u64,
    ) -> Result<()> {
        instructions::initialize::handler(ctx, seed, initializer_amount, taker_amount)
    }

    /// Settle the escrow: taker pays asset B, receives the vault balance
    #[instruction(discriminator = 1)]
    pub fn exchange(ctx: Context<Exchange>) -> Result<()> {
        instructions::exchange::handler(ctx)
    }

    /// Abort the escrow: the initializer reclaims the vault balance
    #[instruction(discriminator = 2)]
    pub fn cancel(ctx: Context<Cancel>) -> Result<()> {
        instructions::cancel::handler(ctx)
    }
}
