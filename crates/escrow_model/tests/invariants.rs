//! Property tests: ledger balance, vault collateral and token conservation
//! hold after arbitrary operation sequences, including failed ones.

use escrow_model::helpers::*;
use escrow_model::seeds::{maker_address, offer_address, pool_address};
use escrow_model::transitions::*;
use escrow_model::*;
use proptest::prelude::*;

const PROGRAM: Address = [0x5a; 32];
const MINT: Address = [0x6d; 32];
const CURRENCIES: [[u8; 3]; 2] = [*b"USD", *b"EUR"];
const USERS: usize = 3;
const FUNDING: u64 = 1_000_000;

#[derive(Debug, Clone)]
enum Op {
    Deposit { user: usize, pool: usize, amount: u64 },
    Withdraw { user: usize, pool: usize, amount: u64 },
    DepositFunds { user: usize, amount: u64, nonce: u64 },
    Accept { user: usize, taker: usize, nonce: u64 },
    Cancel { user: usize, taker: usize, nonce: u64 },
}

fn user(i: usize) -> Signer {
    Signer::new([i as u8 + 1; 32])
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let user = 0..USERS;
    let pool = 0..CURRENCIES.len();
    let nonce = 0u64..4;
    prop_oneof![
        (user.clone(), pool.clone(), 0u64..50_000)
            .prop_map(|(user, pool, amount)| Op::Deposit { user, pool, amount }),
        (user.clone(), pool, 0u64..50_000)
            .prop_map(|(user, pool, amount)| Op::Withdraw { user, pool, amount }),
        (user.clone(), 0u64..400_000, nonce.clone())
            .prop_map(|(user, amount, nonce)| Op::DepositFunds { user, amount, nonce }),
        (user.clone(), 0..USERS, nonce.clone())
            .prop_map(|(user, taker, nonce)| Op::Accept { user, taker, nonce }),
        (user, 0..USERS, nonce).prop_map(|(user, taker, nonce)| Op::Cancel { user, taker, nonce }),
    ]
}

/// Every user is a verified maker with a contribution and ledger record in every pool.
/// The last user stays unverified so the gate is exercised.
fn genesis() -> State {
    let mut s = State::new(PROGRAM).unwrap();
    for i in 0..USERS {
        s.tokens
            .mint_to(&TokenAccountId::new(*user(i).key(), MINT), FUNDING)
            .unwrap();
    }
    for currency in CURRENCIES {
        s = create_pool(&s, &user(0), currency, 1_000_000).unwrap();
    }
    for i in 0..USERS {
        let signer = user(i);
        s = create_maker(&s, &signer).unwrap();
        if i + 1 < USERS {
            let (maker, _) = maker_address(signer.key(), &PROGRAM).unwrap();
            s = verify_maker(&s, &signer, &maker).unwrap();
        }
        for currency in CURRENCIES {
            let (pool, _) = pool_address(&currency, &PROGRAM).unwrap();
            s = create_contribution(&s, &signer, &pool).unwrap();
            s = create_transaction(&s, &signer, &pool).unwrap();
        }
    }
    s
}

fn apply(s: &State, op: &Op) -> Result<State, EscrowError> {
    match *op {
        Op::Deposit { user: u, pool, amount } => {
            let (pool, _) = pool_address(&CURRENCIES[pool], &PROGRAM)?;
            deposit(s, &user(u), &pool, amount)
        }
        Op::Withdraw { user: u, pool, amount } => {
            let (pool, _) = pool_address(&CURRENCIES[pool], &PROGRAM)?;
            withdraw(s, &user(u), &pool, amount)
        }
        Op::DepositFunds { user: u, amount, nonce } => {
            deposit_funds(s, &user(u), &MINT, amount, 1_000_000, nonce)
        }
        Op::Accept { user: u, taker, nonce } => {
            let (offer, _) = offer_address(user(taker).key(), nonce, &PROGRAM)?;
            accept_offer(s, &user(u), &offer)
        }
        Op::Cancel { user: u, taker, nonce } => {
            let (offer, _) = offer_address(user(taker).key(), nonce, &PROGRAM)?;
            cancel_offer(s, &user(u), &offer)
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_across_sequences(ops in prop::collection::vec(op_strategy(), 1..24)) {
        let mut s = genesis();
        let supply = token_supply(&s, &MINT);

        for op in &ops {
            if let Ok(next) = apply(&s, op) {
                s = next;
            }
            prop_assert!(ledger_balanced(&s));
            prop_assert!(vault_collateralized(&s));
            prop_assert_eq!(token_supply(&s, &MINT), supply);
        }
    }

    #[test]
    fn rejected_deposit_does_not_burn_the_nonce(
        ops in prop::collection::vec(op_strategy(), 0..24),
        u in 0..USERS,
        nonce in 4u64..8,
    ) {
        let mut s = genesis();
        for op in &ops {
            if let Ok(next) = apply(&s, op) {
                s = next;
            }
        }

        let taker = user(u);
        let account = TokenAccountId::new(*taker.key(), MINT);
        let balance = s.tokens.balance(&account);
        let escrowed_before = s.tokens.balance(&s.vault(&MINT));
        let (offer, _) = offer_address(taker.key(), nonce, &PROGRAM).unwrap();

        prop_assert_eq!(
            deposit_funds(&s, &taker, &MINT, balance + 1, 1_000_000, nonce).unwrap_err(),
            EscrowError::InsufficientFunds
        );
        prop_assert!(!s.contains(&offer));

        // The same nonce still opens an offer once the amount is affordable
        prop_assume!(balance > 0);
        let s = deposit_funds(&s, &taker, &MINT, balance, 1_000_000, nonce).unwrap();
        prop_assert_eq!(s.tokens.balance(&account), 0);
        prop_assert_eq!(s.tokens.balance(&s.vault(&MINT)), escrowed_before + balance);
        prop_assert_eq!(s.transaction(&offer).unwrap().amount, balance);
    }

    #[test]
    fn deposit_then_cancel_is_balance_neutral(amount in 1u64..=FUNDING, nonce in any::<u64>()) {
        let s = genesis();
        let taker = user(0);
        let account = TokenAccountId::new(*taker.key(), MINT);
        let before = s.tokens.balance(&account);

        let s = deposit_funds(&s, &taker, &MINT, amount, 1_000_000, nonce).unwrap();
        prop_assert_eq!(s.tokens.balance(&account), before - amount);
        prop_assert_eq!(s.tokens.balance(&s.vault(&MINT)), amount);

        let (offer, _) = offer_address(taker.key(), nonce, &PROGRAM).unwrap();
        let s = cancel_offer(&s, &taker, &offer).unwrap();
        prop_assert_eq!(s.tokens.balance(&account), before);
    }
}
