//! Adversarial ledger step generator

#[cfg(kani)]
use kani::any;
use escrow_model::{Contribution, EscrowError, Pool};

#[derive(Clone, Copy)]
pub enum Step {
    Credit,
    Debit,
}

#[cfg(kani)]
impl kani::Arbitrary for Step {
    fn any() -> Self {
        if any() {
            Step::Credit
        } else {
            Step::Debit
        }
    }
}

/// Apply one ledger movement to a (pool, contribution) pair, all or nothing
pub fn ledger_step(
    pool: &Pool,
    contribution: &Contribution,
    step: Step,
    amount: u64,
) -> Result<(Pool, Contribution), EscrowError> {
    let mut pool = *pool;
    let mut contribution = *contribution;
    match step {
        Step::Credit => {
            contribution.credit(amount)?;
            pool.credit(amount)?;
        }
        Step::Debit => {
            contribution.debit(amount)?;
            pool.debit(amount)?;
        }
    }
    Ok((pool, contribution))
}

#[cfg(kani)]
pub fn adversary_step(pool: Pool, contribution: Contribution) -> (Pool, Contribution) {
    match ledger_step(&pool, &contribution, any(), any()) {
        Ok(next) => next,
        Err(_) => (pool, contribution),
    }
}
