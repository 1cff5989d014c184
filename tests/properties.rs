#![allow(clippy::unwrap_used)]
//! Property-based tests over random command sequences.
//!
//! Commands are drawn from a small pool of players and the full UK board,
//! biased towards whole colour groups so that building actually happens.
//! Failures are expected and ignored; what matters is the state afterwards.

use banker::catalog::{ColorGroup, ALL_COLOR_GROUPS};
use banker::ledger::{check_invariants, Ledger, Party, PlayerId};
use banker::{Banker, LedgerError};
use proptest::prelude::*;

const BOARD: usize = 28;

#[derive(Debug, Clone)]
enum Op {
    Add,
    Remove(u32),
    Buy(u32, usize),
    BuyGroup(u32, usize),
    Mortgage(u32, usize),
    Unmortgage(u32, usize),
    Build(u32, usize),
    SellBuilding(u32, usize),
    SellProperty(u32, usize),
    TransferProperty(u32, u32, usize, Option<u64>),
    Pay(u32, u32, u64),
    Fine(u32, u64),
    Receive(u32, u64),
    Collect(u32),
    Rent(u32, usize, Option<u32>),
    PayAll(u32, u64),
    ReceiveAll(u32, u64),
    TransferAllCash(u32, u32),
    TransferAllProperties(u32, u32),
    CashOut(u32),
    NextTurn,
    Rotate(usize),
}

fn player() -> impl Strategy<Value = u32> {
    1u32..6
}

fn square() -> impl Strategy<Value = usize> {
    0..BOARD
}

fn amount() -> impl Strategy<Value = u64> {
    prop_oneof![0u64..50, 50u64..600, 1000u64..3000]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Add),
        1 => player().prop_map(Op::Remove),
        4 => (player(), square()).prop_map(|(p, s)| Op::Buy(p, s)),
        3 => (player(), 0..ALL_COLOR_GROUPS.len()).prop_map(|(p, g)| Op::BuyGroup(p, g)),
        2 => (player(), square()).prop_map(|(p, s)| Op::Mortgage(p, s)),
        1 => (player(), square()).prop_map(|(p, s)| Op::Unmortgage(p, s)),
        6 => (player(), square()).prop_map(|(p, s)| Op::Build(p, s)),
        3 => (player(), square()).prop_map(|(p, s)| Op::SellBuilding(p, s)),
        1 => (player(), square()).prop_map(|(p, s)| Op::SellProperty(p, s)),
        1 => (player(), player(), square(), proptest::option::of(amount()))
            .prop_map(|(a, b, s, price)| Op::TransferProperty(a, b, s, price)),
        2 => (player(), player(), amount()).prop_map(|(a, b, n)| Op::Pay(a, b, n)),
        1 => (player(), amount()).prop_map(|(p, n)| Op::Fine(p, n)),
        1 => (player(), amount()).prop_map(|(p, n)| Op::Receive(p, n)),
        1 => player().prop_map(Op::Collect),
        3 => (player(), square(), proptest::option::of(0u32..14))
            .prop_map(|(p, s, d)| Op::Rent(p, s, d)),
        1 => (player(), amount()).prop_map(|(p, n)| Op::PayAll(p, n)),
        1 => (player(), amount()).prop_map(|(p, n)| Op::ReceiveAll(p, n)),
        1 => (player(), player()).prop_map(|(a, b)| Op::TransferAllCash(a, b)),
        1 => (player(), player()).prop_map(|(a, b)| Op::TransferAllProperties(a, b)),
        1 => player().prop_map(Op::CashOut),
        2 => Just(Op::NextTurn),
        1 => (0usize..8).prop_map(Op::Rotate),
    ]
}

/// Only building-related commands, for checking the even-build rule.
fn build_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (1u32..3, 0..ALL_COLOR_GROUPS.len()).prop_map(|(p, g)| Op::BuyGroup(p, g)),
        1 => (1u32..3, square()).prop_map(|(p, s)| Op::Buy(p, s)),
        6 => (1u32..3, square()).prop_map(|(p, s)| Op::Build(p, s)),
        3 => (1u32..3, square()).prop_map(|(p, s)| Op::SellBuilding(p, s)),
        1 => (1u32..3, amount()).prop_map(|(p, n)| Op::Receive(p, n)),
    ]
}

fn id_at(ledger: &Ledger, square: usize) -> &'static str {
    ledger.catalog().all_definitions()[square].id
}

/// Applies one command, returning the outcome of single-step commands.
///
/// Composite commands return `None`: under best effort a failure may leave
/// earlier legs applied.
fn apply(banker: &mut Banker, op: &Op) -> Option<Result<(), LedgerError>> {
    let ledger = banker.ledger().clone();
    let prop = |s: &usize| id_at(&ledger, *s);
    let single = match op {
        Op::Add => banker.add_player("P").map(drop),
        Op::Remove(p) => banker.remove_player(PlayerId(*p)).map(drop),
        Op::Buy(p, s) => banker.buy_property(PlayerId(*p), prop(s)).map(drop),
        Op::BuyGroup(p, g) => {
            let color: ColorGroup = ALL_COLOR_GROUPS[*g];
            for def in ledger.catalog().color_group_members(color) {
                let _ = banker.buy_property(PlayerId(*p), def.id);
            }
            return None;
        }
        Op::Mortgage(p, s) => banker.mortgage_property(PlayerId(*p), prop(s)).map(drop),
        Op::Unmortgage(p, s) => banker.unmortgage_property(PlayerId(*p), prop(s)).map(drop),
        Op::Build(p, s) => banker.build_house(PlayerId(*p), prop(s)).map(drop),
        Op::SellBuilding(p, s) => banker.sell_building(PlayerId(*p), prop(s)).map(drop),
        Op::SellProperty(p, s) => banker.sell_property(PlayerId(*p), prop(s)).map(drop),
        Op::TransferProperty(a, b, s, price) => banker
            .transfer_property(PlayerId(*a), PlayerId(*b), prop(s), *price)
            .map(drop),
        Op::Pay(a, b, n) => banker
            .transfer_money(Party::Player(PlayerId(*a)), Party::Player(PlayerId(*b)), *n)
            .map(drop),
        Op::Fine(p, n) => banker.pay_fine(PlayerId(*p), *n).map(drop),
        Op::Receive(p, n) => banker.receive_from_bank(PlayerId(*p), *n).map(drop),
        Op::Collect(p) => banker.collect_free_parking(PlayerId(*p)).map(drop),
        Op::Rent(p, s, dice) => banker.pay_rent(PlayerId(*p), prop(s), *dice).map(drop),
        Op::PayAll(p, n) => {
            let _ = banker.pay_everyone(PlayerId(*p), *n);
            return None;
        }
        Op::ReceiveAll(p, n) => {
            let _ = banker.receive_from_everyone(PlayerId(*p), *n);
            return None;
        }
        Op::TransferAllCash(a, b) => banker.transfer_all_cash(PlayerId(*a), PlayerId(*b)).map(drop),
        Op::TransferAllProperties(a, b) => {
            let _ = banker.transfer_all_properties(PlayerId(*a), PlayerId(*b));
            return None;
        }
        Op::CashOut(p) => {
            let _ = banker.cash_out(PlayerId(*p));
            return None;
        }
        Op::NextTurn => {
            banker.next_turn();
            return None;
        }
        Op::Rotate(k) => {
            let mut order = ledger.turns().order().to_vec();
            if !order.is_empty() {
                let k = k % order.len();
                order.rotate_left(k);
            }
            banker.reorder_turns(order)
        }
    };
    Some(single)
}

/// Net cash the bank has paid into play, read back from the log.
fn minted(ledger: &Ledger) -> i128 {
    ledger
        .transactions()
        .iter()
        .map(|tx| match (tx.from, tx.to) {
            (Party::Bank, _) => i128::from(tx.amount),
            (_, Party::Bank) => -i128::from(tx.amount),
            _ => 0,
        })
        .sum()
}

/// Largest gap between building levels within any fully owned street group.
fn worst_spread(ledger: &Ledger) -> u8 {
    ALL_COLOR_GROUPS
        .iter()
        .filter_map(|&color| {
            let levels: Vec<u8> = ledger
                .catalog()
                .color_group_members(color)
                .map(|def| ledger.holding(def).level())
                .collect();
            let max = levels.iter().copied().max()?;
            let min = levels.iter().copied().min()?;
            Some(max - min)
        })
        .max()
        .unwrap_or(0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_invariants_hold_after_any_sequence(ops in prop::collection::vec(op(), 1..120)) {
        let mut banker = Banker::default();
        for op in &ops {
            apply(&mut banker, op);
            let ledger = banker.ledger();
            let violations = check_invariants(ledger);
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", op, violations);
            prop_assert!(ledger.turns().is_permutation_of(ledger.player_ids()));
        }
    }

    #[test]
    fn prop_rejected_commands_change_nothing(ops in prop::collection::vec(op(), 1..120)) {
        let mut banker = Banker::default();
        for op in &ops {
            let before = banker.ledger().clone();
            if let Some(Err(err)) = apply(&mut banker, op) {
                prop_assert_eq!(
                    banker.ledger(),
                    &before,
                    "{:?} failed with {} but mutated",
                    op,
                    err
                );
            }
        }
    }

    #[test]
    fn prop_every_cash_movement_is_logged(ops in prop::collection::vec(op(), 1..120)) {
        let mut banker = Banker::default();
        for op in &ops {
            apply(&mut banker, op);
            let ledger = banker.ledger();
            prop_assert_eq!(i128::from(ledger.money_in_play()), minted(ledger));
        }
    }

    #[test]
    fn prop_log_ids_strictly_increase(ops in prop::collection::vec(op(), 1..80)) {
        let mut banker = Banker::default();
        for op in &ops {
            apply(&mut banker, op);
        }
        let ids: Vec<u64> = banker.transactions().iter().map(|tx| tx.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_building_stays_even(ops in prop::collection::vec(build_op(), 1..200)) {
        let mut banker = Banker::default();
        banker.add_player("A").unwrap();
        banker.add_player("B").unwrap();
        for op in &ops {
            apply(&mut banker, op);
            prop_assert!(worst_spread(banker.ledger()) <= 1, "after {:?}", op);
        }
    }

    #[test]
    fn prop_full_rotation_returns_to_start(players in 1usize..9, advances in 0usize..20) {
        let mut banker = Banker::default();
        for n in 0..players {
            banker.add_player(&format!("p{n}")).unwrap();
        }
        for _ in 0..advances {
            banker.next_turn();
        }
        let start = banker.ledger().turns().current_index();
        prop_assert_eq!(start, advances % players);
        for _ in 0..players {
            banker.next_turn();
        }
        prop_assert_eq!(banker.ledger().turns().current_index(), start);
    }
}
