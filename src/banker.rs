//! Command processor.
//!
//! The `Banker` exclusively owns the `Ledger` and is the only thing that
//! mutates it. Every command validates completely against the ledger and
//! the rules engine before touching state, then applies its mutation and
//! appends one `Transaction` per committed change.
//!
//! All cash movement funnels through `move_cash`, which accepts a player,
//! the bank, or the free parking pot at either end.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::catalog::{GameVersion, Money, PropertyDef};
use crate::config::{BankerConfig, CompositePolicy, ConfigError};
use crate::error::{CompositeFailure, LedgerError};
use crate::ledger::{
    assert_invariants, Entry, GameSnapshot, Holding, Ledger, Party, PlayerId, SnapshotError,
    SnapshotFileError, StateView, Transaction, TransactionKind,
};
use crate::rules::{self, Building, RentQuote};

/// Result of a composite command: one transaction per committed leg.
pub type CompositeResult = Result<Vec<Transaction>, CompositeFailure>;

fn nonzero(amount: Money) -> Result<Money, LedgerError> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount(0));
    }
    Ok(amount)
}

fn log_commit(tx: &Transaction) {
    info!(
        id = tx.id,
        kind = ?tx.kind,
        from = %tx.from,
        to = %tx.to,
        amount = tx.amount,
        property = tx.property.as_deref().unwrap_or("-"),
        "committed"
    );
}

/// Owns the ledger and the configuration, and applies commands.
#[derive(Debug, Clone)]
pub struct Banker {
    ledger: Ledger,
    config: BankerConfig,
    /// Set while an all-or-nothing composite trials its legs.
    staging: bool,
}

impl Banker {
    /// Creates a banker with an empty game in the configured default version.
    pub fn new(config: BankerConfig) -> Self {
        Banker {
            ledger: Ledger::new(config.default_version),
            config,
            staging: false,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &BankerConfig {
        &self.config
    }

    /// Applies a runtime configuration override.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.config.set_option(name, value)?;
        info!(option = name, value, "option set");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn state(&self) -> StateView {
        self.ledger.state_view()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    /// Every property definition of the active version, in board order.
    pub fn properties(&self) -> &'static [PropertyDef] {
        self.ledger.catalog().all_definitions()
    }

    /// Rent a visitor would owe on `property_id`, without moving money.
    pub fn quote_rent(
        &self,
        property_id: &str,
        dice: Option<u32>,
    ) -> Result<RentQuote, LedgerError> {
        let def = self.ledger.catalog().definition_of(property_id)?;
        rules::quote(&self.ledger, def, dice)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.ledger.snapshot()
    }

    /// Replaces the whole game with a validated snapshot.
    pub fn restore(&mut self, snapshot: GameSnapshot) -> Result<(), SnapshotError> {
        self.ledger = Ledger::from_snapshot(snapshot)?;
        info!(
            version = %self.ledger.version(),
            players = self.ledger.player_count(),
            transactions = self.ledger.transactions().len(),
            "game restored"
        );
        Ok(())
    }

    /// Replaces the whole game with a validated snapshot file. On failure the
    /// current game is untouched.
    pub fn load_file(&mut self, path: &Path) -> Result<(), SnapshotFileError> {
        let snapshot = GameSnapshot::read_from(path)?;
        self.restore(snapshot).map_err(|source| SnapshotFileError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_file(&self, path: &Path) -> Result<(), SnapshotFileError> {
        self.snapshot().write_to(path)?;
        info!(path = %path.display(), "game saved");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Primitives
    // ---------------------------------------------------------------

    fn name_of(&self, id: PlayerId) -> String {
        self.ledger
            .player(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|_| format!("player {id}"))
    }

    fn describe(&self, party: Party) -> String {
        match party {
            Party::Player(id) => self.name_of(id),
            other => other.to_string(),
        }
    }

    /// Resolves a property that `player` must own.
    fn owned_property(
        &self,
        player: PlayerId,
        property_id: &str,
    ) -> Result<(&'static PropertyDef, Holding), LedgerError> {
        self.ledger.player(player)?;
        let (def, holding) = self.ledger.property(property_id)?;
        if !holding.is_owned_by(player) {
            return Err(LedgerError::NotOwner {
                player,
                property: def.name,
            });
        }
        Ok((def, holding))
    }

    /// Validates a cash movement without applying it.
    fn check_move(&self, from: Party, to: Party, amount: Money) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::InvalidTransfer(format!(
                "cannot move money from {from} to itself"
            )));
        }
        match from {
            Party::Player(id) => self.ledger.player(id)?.ensure_can_pay(amount)?,
            Party::Bank => {}
            Party::FreeParking => {
                if to.player().is_none() {
                    return Err(LedgerError::InvalidTransfer(
                        "free parking only pays out to a player".into(),
                    ));
                }
                if amount != self.ledger.free_parking {
                    return Err(LedgerError::InvalidTransfer(format!(
                        "free parking pays out its whole pot of {}",
                        self.ledger.free_parking
                    )));
                }
            }
        }
        match to {
            Party::Player(id) => self.ledger.player(id)?.ensure_can_receive(amount)?,
            Party::Bank => {}
            Party::FreeParking => {
                self.ledger
                    .free_parking
                    .checked_add(amount)
                    .ok_or(LedgerError::Overflow(amount))?;
            }
        }
        Ok(())
    }

    /// Applies a movement that `check_move` accepted.
    fn apply_move(&mut self, from: Party, to: Party, amount: Money) -> Result<(), LedgerError> {
        match from {
            Party::Player(id) => self.ledger.player_mut(id)?.debit(amount),
            Party::Bank => {}
            Party::FreeParking => {
                self.ledger.free_parking = self.ledger.free_parking.saturating_sub(amount)
            }
        }
        match to {
            Party::Player(id) => self.ledger.player_mut(id)?.credit(amount),
            Party::Bank => {}
            Party::FreeParking => {
                self.ledger.free_parking = self.ledger.free_parking.saturating_add(amount)
            }
        }
        Ok(())
    }

    /// Appends a transaction for a mutation that has just been applied.
    fn record(&mut self, entry: Entry) -> Transaction {
        let tx = self.ledger.log.append(entry).clone();
        if self.staging {
            debug!(id = tx.id, kind = ?tx.kind, amount = tx.amount, "staged");
        } else {
            log_commit(&tx);
        }
        assert_invariants(&self.ledger);
        tx
    }

    /// Moves cash between two parties atomically and records it.
    fn move_cash(
        &mut self,
        kind: TransactionKind,
        from: Party,
        to: Party,
        amount: Money,
        property: Option<&'static str>,
        description: String,
    ) -> Result<Transaction, LedgerError> {
        self.check_move(from, to, amount)?;
        self.apply_move(from, to, amount)?;
        Ok(self.record(Entry {
            kind,
            from,
            to,
            amount,
            property,
            description,
        }))
    }

    /// Runs the legs of a composite command under the configured policy.
    ///
    /// Best effort keeps whatever legs committed before a failure. All or
    /// nothing trials the legs and restores the prior ledger if any leg fails,
    /// so the caller sees either every leg or none.
    fn composite<F>(&mut self, name: &str, legs: F) -> CompositeResult
    where
        F: FnOnce(&mut Banker, &mut Vec<Transaction>) -> Result<(), LedgerError>,
    {
        let mut committed = Vec::new();
        let saved = match self.config.composite_policy {
            CompositePolicy::AllOrNothing => Some(self.ledger.clone()),
            CompositePolicy::BestEffort => None,
        };
        self.staging = saved.is_some();
        let outcome = legs(self, &mut committed);
        self.staging = false;
        match outcome {
            Ok(()) => {
                if saved.is_some() {
                    committed.iter().for_each(log_commit);
                }
                Ok(committed)
            }
            Err(error) => {
                if let Some(saved) = saved {
                    let undone: Vec<u64> = committed.iter().map(|tx| tx.id).collect();
                    warn!(command = name, ?undone, %error, "composite rolled back");
                    self.ledger = saved;
                    committed.clear();
                } else if !committed.is_empty() {
                    let legs = committed.len();
                    warn!(command = name, legs, %error, "composite stopped partway");
                }
                Err(CompositeFailure { committed, error })
            }
        }
    }

    // ---------------------------------------------------------------
    // Players
    // ---------------------------------------------------------------

    /// Creates a player with the configured starting cash, appended to the
    /// end of the turn order.
    pub fn add_player(&mut self, name: &str) -> Result<Transaction, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        if self.ledger.player_count() >= self.config.max_players {
            return Err(LedgerError::TooManyPlayers(self.config.max_players));
        }
        let id = self.ledger.next_player_id();
        let cash = self.config.starting_cash;
        self.ledger
            .players
            .insert(id, crate::ledger::Player::new(id, name.to_string(), cash));
        self.ledger.next_player_id += 1;
        self.ledger.turns.push(id);
        Ok(self.record(Entry {
            kind: TransactionKind::Join,
            from: Party::Bank,
            to: Party::Player(id),
            amount: cash,
            property: None,
            description: format!("{name} joined with {cash}"),
        }))
    }

    /// Removes a player. Their properties return to the bank with buildings
    /// and mortgages cleared, and their cash is forfeited to the bank.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Transaction, LedgerError> {
        let player = self.ledger.player(id)?;
        let name = player.name().to_string();
        let cash = player.cash();

        let mut returned = 0usize;
        for holding in self.ledger.holdings.iter_mut().filter(|h| h.is_owned_by(id)) {
            *holding = Holding::default();
            returned += 1;
        }
        self.ledger.players.remove(&id);
        self.ledger.turns.remove(id);

        Ok(self.record(Entry {
            kind: TransactionKind::Leave,
            from: Party::Player(id),
            to: Party::Bank,
            amount: cash,
            property: None,
            description: format!("{name} left; {returned} properties returned to the bank"),
        }))
    }

    // ---------------------------------------------------------------
    // Property commands
    // ---------------------------------------------------------------

    pub fn buy_property(
        &mut self,
        player: PlayerId,
        property_id: &str,
    ) -> Result<Transaction, LedgerError> {
        self.ledger.player(player)?;
        let (def, holding) = self.ledger.property(property_id)?;
        if holding.owner.is_some() {
            return Err(LedgerError::AlreadyOwned(def.name));
        }
        let from = Party::Player(player);
        self.check_move(from, Party::Bank, def.purchase_cost)?;

        self.apply_move(from, Party::Bank, def.purchase_cost)?;
        if let Some(h) = self.ledger.holding_mut(def) {
            *h = Holding::owned_by(player);
        }
        let description = format!("{} bought {}", self.name_of(player), def.name);
        Ok(self.record(Entry {
            kind: TransactionKind::Purchase,
            from,
            to: Party::Bank,
            amount: def.purchase_cost,
            property: Some(def.id),
            description,
        }))
    }

    /// Mortgages a bare property for its mortgage value.
    pub fn mortgage_property(
        &mut self,
        player: PlayerId,
        property_id: &str,
    ) -> Result<Transaction, LedgerError> {
        let (def, holding) = self.owned_property(player, property_id)?;
        if holding.is_mortgaged {
            return Err(LedgerError::AlreadyMortgaged(def.name));
        }
        if holding.has_buildings() {
            return Err(LedgerError::MustSellBuildingsFirst(def.name));
        }
        let to = Party::Player(player);
        self.check_move(Party::Bank, to, def.mortgage_value)?;

        self.apply_move(Party::Bank, to, def.mortgage_value)?;
        if let Some(h) = self.ledger.holding_mut(def) {
            h.is_mortgaged = true;
        }
        let description = format!("{} mortgaged {}", self.name_of(player), def.name);
        Ok(self.record(Entry {
            kind: TransactionKind::Mortgage,
            from: Party::Bank,
            to,
            amount: def.mortgage_value,
            property: Some(def.id),
            description,
        }))
    }

    /// Lifts a mortgage for the mortgage value plus configured interest.
    pub fn unmortgage_property(
        &mut self,
        player: PlayerId,
        property_id: &str,
    ) -> Result<Transaction, LedgerError> {
        let (def, holding) = self.owned_property(player, property_id)?;
        if !holding.is_mortgaged {
            return Err(LedgerError::NotMortgaged(def.name));
        }
        let cost = self.config.unmortgage_cost(def.mortgage_value);
        let from = Party::Player(player);
        self.check_move(from, Party::Bank, cost)?;

        self.apply_move(from, Party::Bank, cost)?;
        if let Some(h) = self.ledger.holding_mut(def) {
            h.is_mortgaged = false;
        }
        let description = format!("{} unmortgaged {}", self.name_of(player), def.name);
        Ok(self.record(Entry {
            kind: TransactionKind::Unmortgage,
            from,
            to: Party::Bank,
            amount: cost,
            property: Some(def.id),
            description,
        }))
    }

    /// Builds one house, or a hotel on a street that has four houses.
    pub fn build_house(
        &mut self,
        player: PlayerId,
        property_id: &str,
    ) -> Result<Transaction, LedgerError> {
        self.ledger.player(player)?;
        let def = self.ledger.catalog().definition_of(property_id)?;
        let step = rules::check_build(&self.ledger, player, def)?;
        let from = Party::Player(player);
        self.check_move(from, Party::Bank, step.cost)?;

        self.apply_move(from, Party::Bank, step.cost)?;
        if let Some(h) = self.ledger.holding_mut(def) {
            h.set_level(step.new_level);
        }
        let what = match step.building {
            Building::House => "a house",
            Building::Hotel => "a hotel",
        };
        let description = format!("{} built {what} on {}", self.name_of(player), def.name);
        Ok(self.record(Entry {
            kind: TransactionKind::Build,
            from,
            to: Party::Bank,
            amount: step.cost,
            property: Some(def.id),
            description,
        }))
    }

    /// Sells one building back to the bank for half the house cost.
    pub fn sell_building(
        &mut self,
        player: PlayerId,
        property_id: &str,
    ) -> Result<Transaction, LedgerError> {
        self.ledger.player(player)?;
        let def = self.ledger.catalog().definition_of(property_id)?;
        self.sell_building_as(TransactionKind::SellBuilding, player, def)
    }

    fn sell_building_as(
        &mut self,
        kind: TransactionKind,
        player: PlayerId,
        def: &'static PropertyDef,
    ) -> Result<Transaction, LedgerError> {
        let step = rules::check_sell_building(&self.ledger, player, def)?;
        let to = Party::Player(player);
        self.check_move(Party::Bank, to, step.refund)?;

        self.apply_move(Party::Bank, to, step.refund)?;
        if let Some(h) = self.ledger.holding_mut(def) {
            h.set_level(step.new_level);
        }
        let what = match step.building {
            Building::House => "a house",
            Building::Hotel => "a hotel",
        };
        let description = format!("{} sold {what} on {}", self.name_of(player), def.name);
        Ok(self.record(Entry {
            kind,
            from: Party::Bank,
            to,
            amount: step.refund,
            property: Some(def.id),
            description,
        }))
    }

    /// Sells a bare, unmortgaged property back to the bank for its mortgage
    /// value. The property becomes available again.
    pub fn sell_property(
        &mut self,
        player: PlayerId,
        property_id: &str,
    ) -> Result<Transaction, LedgerError> {
        let (def, _) = self.owned_property(player, property_id)?;
        self.sell_property_as(TransactionKind::SellProperty, player, def)
    }

    fn sell_property_as(
        &mut self,
        kind: TransactionKind,
        player: PlayerId,
        def: &'static PropertyDef,
    ) -> Result<Transaction, LedgerError> {
        let holding = self.ledger.holding(def);
        if holding.has_buildings() {
            return Err(LedgerError::MustSellBuildingsFirst(def.name));
        }
        rules::check_group_bare(&self.ledger, def)?;
        if holding.is_mortgaged {
            return Err(LedgerError::AlreadyMortgaged(def.name));
        }
        let to = Party::Player(player);
        self.check_move(Party::Bank, to, def.mortgage_value)?;

        self.apply_move(Party::Bank, to, def.mortgage_value)?;
        if let Some(h) = self.ledger.holding_mut(def) {
            *h = Holding::default();
        }
        let description = format!("{} sold {} to the bank", self.name_of(player), def.name);
        Ok(self.record(Entry {
            kind,
            from: Party::Bank,
            to,
            amount: def.mortgage_value,
            property: Some(def.id),
            description,
        }))
    }

    /// Hands a property to another player, mortgage included.
    ///
    /// Streets can only change hands while their whole color group is bare.
    /// With a `sale_price`, the recipient pays the giver in the same step;
    /// if the recipient cannot afford it nothing changes hands.
    pub fn transfer_property(
        &mut self,
        from: PlayerId,
        to: PlayerId,
        property_id: &str,
        sale_price: Option<Money>,
    ) -> Result<Transaction, LedgerError> {
        if from == to {
            return Err(LedgerError::InvalidTransfer(
                "cannot transfer a property to its owner".into(),
            ));
        }
        let (def, holding) = self.owned_property(from, property_id)?;
        self.ledger.player(to)?;
        if holding.has_buildings() {
            return Err(LedgerError::MustSellBuildingsFirst(def.name));
        }
        rules::check_group_bare(&self.ledger, def)?;
        let price = sale_price.map(nonzero).transpose()?.unwrap_or(0);
        if price > 0 {
            self.check_move(Party::Player(to), Party::Player(from), price)?;
        }

        if price > 0 {
            self.apply_move(Party::Player(to), Party::Player(from), price)?;
        }
        if let Some(h) = self.ledger.holding_mut(def) {
            h.owner = Some(to);
        }
        let mut description = format!(
            "{} gave {} to {}",
            self.name_of(from),
            def.name,
            self.name_of(to)
        );
        if price > 0 {
            description.push_str(&format!(" for {price}"));
        }
        Ok(self.record(Entry {
            kind: TransactionKind::PropertyTransfer,
            from: Party::Player(from),
            to: Party::Player(to),
            amount: price,
            property: Some(def.id),
            description,
        }))
    }

    // ---------------------------------------------------------------
    // Cash commands
    // ---------------------------------------------------------------

    /// Moves cash between any two parties.
    ///
    /// Payments into free parking are recorded as fines; the pot itself can
    /// only be emptied with `collect_free_parking`.
    pub fn transfer_money(
        &mut self,
        from: Party,
        to: Party,
        amount: Money,
    ) -> Result<Transaction, LedgerError> {
        let amount = nonzero(amount)?;
        if from == Party::FreeParking {
            return Err(LedgerError::InvalidTransfer(
                "free parking is emptied by collecting it".into(),
            ));
        }
        let kind = match (from, to) {
            (_, Party::FreeParking) => TransactionKind::Fine,
            (Party::Player(_), Party::Player(_)) => TransactionKind::Payment,
            _ => TransactionKind::BankPayment,
        };
        let description = format!("{} paid {amount} to {}", self.describe(from), self.describe(to));
        self.move_cash(kind, from, to, amount, None, description)
    }

    /// Charges rent for landing on `property_id`.
    ///
    /// Returns `Ok(None)` when no rent is due: the property is unowned, owned
    /// by the payer, or mortgaged.
    pub fn pay_rent(
        &mut self,
        payer: PlayerId,
        property_id: &str,
        dice: Option<u32>,
    ) -> Result<Option<Transaction>, LedgerError> {
        self.ledger.player(payer)?;
        let (def, holding) = self.ledger.property(property_id)?;
        let owner = match holding.owner {
            Some(owner) if owner != payer => owner,
            _ => return Ok(None),
        };
        let rent = rules::rent_due(&self.ledger, def, dice)?;
        if rent == 0 {
            return Ok(None);
        }
        let description = format!(
            "{} paid {rent} rent to {} for {}",
            self.name_of(payer),
            self.name_of(owner),
            def.name
        );
        self.move_cash(
            TransactionKind::Rent,
            Party::Player(payer),
            Party::Player(owner),
            rent,
            Some(def.id),
            description,
        )
        .map(Some)
    }

    /// Empties the free parking pot into `player`. `Ok(None)` if it is empty.
    pub fn collect_free_parking(
        &mut self,
        player: PlayerId,
    ) -> Result<Option<Transaction>, LedgerError> {
        self.ledger.player(player)?;
        let pot = self.ledger.free_parking;
        if pot == 0 {
            return Ok(None);
        }
        let description = format!("{} collected {pot} from free parking", self.name_of(player));
        self.move_cash(
            TransactionKind::FreeParking,
            Party::FreeParking,
            Party::Player(player),
            pot,
            None,
            description,
        )
        .map(Some)
    }

    pub fn pay_fine(
        &mut self,
        player: PlayerId,
        amount: Money,
    ) -> Result<Transaction, LedgerError> {
        let amount = nonzero(amount)?;
        let description = format!("{} paid a fine of {amount}", self.name_of(player));
        self.move_cash(
            TransactionKind::Fine,
            Party::Player(player),
            Party::FreeParking,
            amount,
            None,
            description,
        )
    }

    pub fn receive_from_bank(
        &mut self,
        player: PlayerId,
        amount: Money,
    ) -> Result<Transaction, LedgerError> {
        let amount = nonzero(amount)?;
        let description = format!("{} received {amount} from the bank", self.name_of(player));
        self.move_cash(
            TransactionKind::BankPayment,
            Party::Bank,
            Party::Player(player),
            amount,
            None,
            description,
        )
    }

    /// Pays the configured salary for passing Go.
    pub fn pass_go(&mut self, player: PlayerId) -> Result<Transaction, LedgerError> {
        let amount = nonzero(self.config.pass_go_amount)?;
        let description = format!("{} passed Go", self.name_of(player));
        self.move_cash(
            TransactionKind::PassGo,
            Party::Bank,
            Party::Player(player),
            amount,
            None,
            description,
        )
    }

    // ---------------------------------------------------------------
    // Composite commands
    // ---------------------------------------------------------------

    /// Other players than `id`, in id order.
    fn others(&self, id: PlayerId) -> Vec<PlayerId> {
        self.ledger.player_ids().filter(|&p| p != id).collect()
    }

    /// `payer` pays `amount` to every other player.
    pub fn pay_everyone(&mut self, payer: PlayerId, amount: Money) -> CompositeResult {
        let amount = nonzero(amount)?;
        self.ledger.player(payer)?;
        let others = self.others(payer);
        self.composite("payall", |banker, committed| {
            for other in others {
                let description = format!(
                    "{} paid {amount} to {}",
                    banker.name_of(payer),
                    banker.name_of(other)
                );
                committed.push(banker.move_cash(
                    TransactionKind::PayAll,
                    Party::Player(payer),
                    Party::Player(other),
                    amount,
                    None,
                    description,
                )?);
            }
            Ok(())
        })
    }

    /// Every other player pays `amount` to `payee`.
    pub fn receive_from_everyone(&mut self, payee: PlayerId, amount: Money) -> CompositeResult {
        let amount = nonzero(amount)?;
        self.ledger.player(payee)?;
        let others = self.others(payee);
        self.composite("receiveall", |banker, committed| {
            for other in others {
                let description = format!(
                    "{} paid {amount} to {}",
                    banker.name_of(other),
                    banker.name_of(payee)
                );
                committed.push(banker.move_cash(
                    TransactionKind::ReceiveAll,
                    Party::Player(other),
                    Party::Player(payee),
                    amount,
                    None,
                    description,
                )?);
            }
            Ok(())
        })
    }

    /// Moves all of `from`'s cash to `to`.
    pub fn transfer_all_cash(
        &mut self,
        from: PlayerId,
        to: PlayerId,
    ) -> Result<Transaction, LedgerError> {
        let cash = self.ledger.player(from)?.cash();
        self.ledger.player(to)?;
        let amount = nonzero(cash)?;
        let description = format!(
            "{} handed all {amount} cash to {}",
            self.name_of(from),
            self.name_of(to)
        );
        self.move_cash(
            TransactionKind::BulkCashTransfer,
            Party::Player(from),
            Party::Player(to),
            amount,
            None,
            description,
        )
    }

    /// Moves every property `from` owns to `to`, one transaction each.
    pub fn transfer_all_properties(
        &mut self,
        from: PlayerId,
        to: PlayerId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        if from == to {
            return Err(LedgerError::InvalidTransfer(
                "cannot transfer properties to their owner".into(),
            ));
        }
        self.ledger.player(from)?;
        self.ledger.player(to)?;
        let owned: Vec<&'static PropertyDef> =
            self.ledger.properties_of(from).map(|(d, _)| d).collect();

        // Built groups must never be split, so every deed moves before any
        // leg is recorded.
        for def in &owned {
            if let Some(h) = self.ledger.holding_mut(def) {
                h.owner = Some(to);
            }
        }
        let mut committed = Vec::with_capacity(owned.len());
        for def in owned {
            let description = format!(
                "{} gave {} to {}",
                self.name_of(from),
                def.name,
                self.name_of(to)
            );
            committed.push(self.record(Entry {
                kind: TransactionKind::BulkPropertyTransfer,
                from: Party::Player(from),
                to: Party::Player(to),
                amount: 0,
                property: Some(def.id),
                description,
            }));
        }
        Ok(committed)
    }

    /// Sells buildings one at a time, always from `player`'s most developed
    /// street, until none are left.
    fn sell_buildings_as(
        &mut self,
        kind: TransactionKind,
        player: PlayerId,
        committed: &mut Vec<Transaction>,
    ) -> Result<(), LedgerError> {
        loop {
            let next = self
                .ledger
                .properties_of(player)
                .filter(|(_, h)| h.has_buildings())
                .max_by_key(|(d, h)| (h.level(), std::cmp::Reverse(d.board_index)))
                .map(|(d, _)| d);
            let Some(def) = next else {
                return Ok(());
            };
            committed.push(self.sell_building_as(kind, player, def)?);
        }
    }

    /// Sells every bare, unmortgaged property `player` owns to the bank.
    fn sell_properties_as(
        &mut self,
        kind: TransactionKind,
        player: PlayerId,
        committed: &mut Vec<Transaction>,
    ) -> Result<(), LedgerError> {
        let owned: Vec<&'static PropertyDef> = self
            .ledger
            .properties_of(player)
            .filter(|(_, h)| !h.is_mortgaged)
            .map(|(d, _)| d)
            .collect();
        for def in owned {
            committed.push(self.sell_property_as(kind, player, def)?);
        }
        Ok(())
    }

    pub fn sell_all_buildings(&mut self, player: PlayerId) -> CompositeResult {
        self.ledger.player(player)?;
        self.composite("sellallbuildings", |banker, committed| {
            banker.sell_buildings_as(TransactionKind::SellBuilding, player, committed)
        })
    }

    pub fn sell_all_properties(&mut self, player: PlayerId) -> CompositeResult {
        self.ledger.player(player)?;
        self.composite("sellallproperties", |banker, committed| {
            banker.sell_properties_as(TransactionKind::SellProperty, player, committed)
        })
    }

    /// Sells all buildings, then all unmortgaged properties, crediting the
    /// proceeds to `player`.
    pub fn cash_out(&mut self, player: PlayerId) -> CompositeResult {
        self.ledger.player(player)?;
        self.composite("cashout", |banker, committed| {
            banker.sell_buildings_as(TransactionKind::CashOut, player, committed)?;
            banker.sell_properties_as(TransactionKind::CashOut, player, committed)
        })
    }

    // ---------------------------------------------------------------
    // Turns and game lifecycle
    // ---------------------------------------------------------------

    /// Passes the turn to the next player. `None` with no players.
    pub fn next_turn(&mut self) -> Option<PlayerId> {
        let current = self.ledger.turns.advance();
        if let Some(id) = current {
            info!(player = %id, index = self.ledger.turns.current_index(), "turn advanced");
        }
        current
    }

    pub fn reorder_turns(&mut self, order: Vec<PlayerId>) -> Result<(), LedgerError> {
        self.ledger.turns.reorder(order)?;
        info!(order = ?self.ledger.turns.order(), "turn order changed");
        assert_invariants(&self.ledger);
        Ok(())
    }

    /// Clears players, holdings, pot and log, starting over in the
    /// configured default version.
    pub fn reset_game(&mut self) {
        self.ledger = Ledger::new(self.config.default_version);
        info!(version = %self.ledger.version(), "game reset");
    }

    /// Switches catalog version. Only allowed while no players exist.
    pub fn set_game_version(&mut self, version: GameVersion) -> Result<(), LedgerError> {
        if self.ledger.player_count() > 0 {
            return Err(LedgerError::VersionLockedWithActivePlayers);
        }
        if version != self.ledger.version() {
            self.ledger = Ledger::new(version);
            info!(%version, "game version changed");
        }
        Ok(())
    }
}

impl Default for Banker {
    fn default() -> Self {
        Banker::new(BankerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::ledger::check_invariants;

    fn banker_with(names: &[&str]) -> Banker {
        let mut banker = Banker::default();
        for name in names {
            banker.add_player(name).unwrap();
        }
        banker
    }

    fn cash(banker: &Banker, id: u32) -> Money {
        banker.ledger().player(PlayerId(id)).unwrap().cash()
    }

    #[test]
    fn add_player_assigns_ids_and_cash() {
        let banker = banker_with(&["Ann", "Bob"]);
        assert_eq!(cash(&banker, 1), 1500);
        assert_eq!(banker.ledger().player(PlayerId(2)).unwrap().name(), "Bob");
        assert_eq!(banker.ledger().turns().order(), &[PlayerId(1), PlayerId(2)]);
        assert_eq!(banker.transactions().len(), 2);
        assert_eq!(banker.transactions()[0].kind, TransactionKind::Join);
    }

    #[test]
    fn add_player_rejects_blank_names_and_overflow() {
        let mut banker = Banker::default();
        assert_eq!(banker.add_player("  "), Err(LedgerError::EmptyName));
        for n in 0..8 {
            banker.add_player(&format!("p{n}")).unwrap();
        }
        assert_eq!(banker.add_player("ninth").unwrap_err().kind(), ErrorKind::PlayerLimit);
    }

    #[test]
    fn buy_checks_ownership_and_funds() {
        let mut banker = banker_with(&["Ann", "Bob"]);
        banker.buy_property(PlayerId(1), "mayfair").unwrap();
        assert_eq!(cash(&banker, 1), 1100);
        assert_eq!(
            banker.buy_property(PlayerId(2), "mayfair"),
            Err(LedgerError::AlreadyOwned("Mayfair"))
        );
        banker.buy_property(PlayerId(1), "park_lane").unwrap();
        banker.buy_property(PlayerId(1), "bond_street").unwrap();
        banker.buy_property(PlayerId(1), "oxford_street").unwrap();
        let before = banker.ledger().clone();
        let err = banker.buy_property(PlayerId(1), "regent_street").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(banker.ledger(), &before);
    }

    #[test]
    fn mortgage_round_trip() {
        let mut banker = banker_with(&["Ann"]);
        banker.buy_property(PlayerId(1), "strand").unwrap();
        let tx = banker.mortgage_property(PlayerId(1), "strand").unwrap();
        assert_eq!(tx.amount, 110);
        assert_eq!(
            banker.mortgage_property(PlayerId(1), "strand"),
            Err(LedgerError::AlreadyMortgaged("Strand"))
        );
        banker.unmortgage_property(PlayerId(1), "strand").unwrap();
        assert_eq!(cash(&banker, 1), 1500 - 220);
        let (_, holding) = banker.ledger().property("strand").unwrap();
        assert_eq!(holding, Holding::owned_by(PlayerId(1)));
    }

    #[test]
    fn unmortgage_interest_is_configurable() {
        let mut banker = banker_with(&["Ann"]);
        banker.set_option("UnmortgageInterestPercent", "10").unwrap();
        banker.buy_property(PlayerId(1), "strand").unwrap();
        banker.mortgage_property(PlayerId(1), "strand").unwrap();
        let tx = banker.unmortgage_property(PlayerId(1), "strand").unwrap();
        assert_eq!(tx.amount, 121);
    }

    #[test]
    fn mortgage_requires_bare_property() {
        let mut banker = banker_with(&["Ann"]);
        banker.buy_property(PlayerId(1), "old_kent_road").unwrap();
        banker.buy_property(PlayerId(1), "whitechapel_road").unwrap();
        banker.build_house(PlayerId(1), "old_kent_road").unwrap();
        assert_eq!(
            banker.mortgage_property(PlayerId(1), "old_kent_road"),
            Err(LedgerError::MustSellBuildingsFirst("Old Kent Road"))
        );
        assert!(banker.mortgage_property(PlayerId(1), "whitechapel_road").is_ok());
    }

    #[test]
    fn build_and_sell_buildings() {
        let mut banker = banker_with(&["Ann"]);
        banker.buy_property(PlayerId(1), "old_kent_road").unwrap();
        banker.buy_property(PlayerId(1), "whitechapel_road").unwrap();
        for _ in 0..4 {
            banker.build_house(PlayerId(1), "old_kent_road").unwrap();
            banker.build_house(PlayerId(1), "whitechapel_road").unwrap();
        }
        banker.build_house(PlayerId(1), "old_kent_road").unwrap();
        let (_, h) = banker.ledger().property("old_kent_road").unwrap();
        assert!(h.has_hotel);
        assert_eq!(h.houses, 0);

        let tx = banker.sell_building(PlayerId(1), "old_kent_road").unwrap();
        assert_eq!(tx.amount, 25);
        let (_, h) = banker.ledger().property("old_kent_road").unwrap();
        assert_eq!((h.houses, h.has_hotel), (4, false));
    }

    #[test]
    fn sell_property_returns_it_to_the_bank() {
        let mut banker = banker_with(&["Ann"]);
        banker.buy_property(PlayerId(1), "kings_cross_station").unwrap();
        let tx = banker.sell_property(PlayerId(1), "kings_cross_station").unwrap();
        assert_eq!(tx.amount, 100);
        assert_eq!(cash(&banker, 1), 1400);
        assert!(banker.ledger().available().any(|d| d.id == "kings_cross_station"));
    }

    #[test]
    fn transfer_property_carries_state_and_price() {
        let mut banker = banker_with(&["Ann", "Bob"]);
        banker.buy_property(PlayerId(1), "strand").unwrap();
        banker.mortgage_property(PlayerId(1), "strand").unwrap();
        banker
            .transfer_property(PlayerId(1), PlayerId(2), "strand", Some(300))
            .unwrap();
        let (_, h) = banker.ledger().property("strand").unwrap();
        assert_eq!(h.owner, Some(PlayerId(2)));
        assert!(h.is_mortgaged);
        assert_eq!(cash(&banker, 1), 1500 - 220 + 110 + 300);
        assert_eq!(cash(&banker, 2), 1200);

        assert_eq!(
            banker
                .transfer_property(PlayerId(1), PlayerId(2), "strand", None)
                .unwrap_err()
                .kind(),
            ErrorKind::NotOwner
        );
        let before = banker.ledger().clone();
        assert!(banker
            .transfer_property(PlayerId(2), PlayerId(1), "strand", Some(5000))
            .is_err());
        assert_eq!(banker.ledger(), &before);
    }

    #[test]
    fn built_groups_cannot_be_broken_up() {
        let mut banker = banker_with(&["Ann", "Bob"]);
        banker.buy_property(PlayerId(1), "old_kent_road").unwrap();
        banker.buy_property(PlayerId(1), "whitechapel_road").unwrap();
        banker.build_house(PlayerId(1), "old_kent_road").unwrap();
        let before = banker.ledger().clone();

        assert_eq!(
            banker.transfer_property(PlayerId(1), PlayerId(2), "whitechapel_road", None),
            Err(LedgerError::GroupHasBuildings {
                property: "Whitechapel Road",
                group: "brown",
            })
        );
        assert_eq!(
            banker.transfer_property(PlayerId(1), PlayerId(2), "old_kent_road", None),
            Err(LedgerError::MustSellBuildingsFirst("Old Kent Road"))
        );
        assert_eq!(
            banker.sell_property(PlayerId(1), "whitechapel_road").unwrap_err().kind(),
            ErrorKind::MustSellBuildingsFirst
        );
        assert_eq!(banker.ledger(), &before);

        banker.sell_building(PlayerId(1), "old_kent_road").unwrap();
        banker
            .transfer_property(PlayerId(1), PlayerId(2), "whitechapel_road", None)
            .unwrap();
    }

    #[test]
    fn transfer_all_moves_built_groups_whole() {
        let mut banker = banker_with(&["Ann", "Bob"]);
        banker.buy_property(PlayerId(1), "old_kent_road").unwrap();
        banker.buy_property(PlayerId(1), "whitechapel_road").unwrap();
        banker.build_house(PlayerId(1), "old_kent_road").unwrap();
        banker.transfer_all_properties(PlayerId(1), PlayerId(2)).unwrap();
        let (_, h) = banker.ledger().property("old_kent_road").unwrap();
        assert_eq!(h.owner, Some(PlayerId(2)));
        assert_eq!(h.houses, 1);
        assert!(check_invariants(banker.ledger()).is_empty());
    }

    #[test]
    fn transfer_money_between_endpoints() {
        let mut banker = banker_with(&["Ann", "Bob"]);
        let (ann, bob) = (Party::Player(PlayerId(1)), Party::Player(PlayerId(2)));
        let tx = banker.transfer_money(ann, bob, 100).unwrap();
        assert_eq!(tx.kind, TransactionKind::Payment);
        let tx = banker.transfer_money(Party::Player(PlayerId(2)), Party::FreeParking, 40).unwrap();
        assert_eq!(tx.kind, TransactionKind::Fine);
        assert_eq!(banker.ledger().free_parking(), 40);
        let tx = banker.transfer_money(Party::Bank, Party::Player(PlayerId(1)), 10).unwrap();
        assert_eq!(tx.kind, TransactionKind::BankPayment);

        assert_eq!(
            banker.transfer_money(Party::Bank, Party::Player(PlayerId(1)), 0),
            Err(LedgerError::InvalidAmount(0))
        );
        assert!(matches!(
            banker.transfer_money(Party::Bank, Party::Bank, 5),
            Err(LedgerError::InvalidTransfer(_))
        ));
        assert!(matches!(
            banker.transfer_money(Party::FreeParking, Party::Player(PlayerId(1)), 40),
            Err(LedgerError::InvalidTransfer(_))
        ));
        assert_eq!(cash(&banker, 1), 1410);
        assert_eq!(cash(&banker, 2), 1560);
    }

    #[test]
    fn rent_no_op_cases() {
        let mut banker = banker_with(&["Ann", "Bob"]);
        assert_eq!(banker.pay_rent(PlayerId(1), "strand", None), Ok(None));
        banker.buy_property(PlayerId(1), "strand").unwrap();
        assert_eq!(banker.pay_rent(PlayerId(1), "strand", None), Ok(None));
        banker.mortgage_property(PlayerId(1), "strand").unwrap();
        assert_eq!(banker.pay_rent(PlayerId(2), "strand", None), Ok(None));
        assert_eq!(banker.transactions().len(), 4);
    }

    #[test]
    fn collect_empty_pot_is_a_no_op() {
        let mut banker = banker_with(&["Ann"]);
        assert_eq!(banker.collect_free_parking(PlayerId(1)), Ok(None));
        assert_eq!(
            banker.collect_free_parking(PlayerId(9)),
            Err(LedgerError::UnknownPlayer(PlayerId(9)))
        );
    }

    #[test]
    fn pass_go_pays_salary() {
        let mut banker = banker_with(&["Ann"]);
        let tx = banker.pass_go(PlayerId(1)).unwrap();
        assert_eq!(tx.kind, TransactionKind::PassGo);
        assert_eq!(cash(&banker, 1), 1700);
    }

    #[test]
    fn pay_everyone_best_effort_keeps_earlier_legs() {
        let mut banker = banker_with(&["Ann", "Bob", "Cat"]);
        banker
            .transfer_money(Party::Player(PlayerId(1)), Party::Bank, 1200)
            .unwrap();
        let failure = banker.pay_everyone(PlayerId(1), 200).unwrap_err();
        assert_eq!(failure.committed.len(), 1);
        assert_eq!(failure.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(cash(&banker, 1), 100);
        assert_eq!(cash(&banker, 2), 1700);
        assert_eq!(cash(&banker, 3), 1500);
    }

    #[test]
    fn pay_everyone_all_or_nothing_rolls_back() {
        let mut banker = banker_with(&["Ann", "Bob", "Cat"]);
        banker.set_option("CompositePolicy", "all_or_nothing").unwrap();
        banker
            .transfer_money(Party::Player(PlayerId(1)), Party::Bank, 1200)
            .unwrap();
        let before = banker.ledger().clone();
        let failure = banker.pay_everyone(PlayerId(1), 200).unwrap_err();
        assert!(failure.committed.is_empty());
        assert_eq!(banker.ledger(), &before);

        let legs = banker.pay_everyone(PlayerId(1), 150).unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(cash(&banker, 1), 0);
    }

    #[test]
    fn staging_ends_with_the_composite() {
        let mut banker = banker_with(&["Ann", "Bob", "Cat"]);
        banker.set_option("CompositePolicy", "all_or_nothing").unwrap();
        banker
            .transfer_money(Party::Player(PlayerId(1)), Party::Bank, 1400)
            .unwrap();
        assert!(banker.pay_everyone(PlayerId(1), 60).is_err());
        assert!(!banker.staging);
        assert!(banker.pay_everyone(PlayerId(1), 50).is_ok());
        assert!(!banker.staging);
        assert_eq!(banker.transactions().len(), 6);
    }

    #[test]
    fn receive_from_everyone() {
        let mut banker = banker_with(&["Ann", "Bob", "Cat"]);
        let legs = banker.receive_from_everyone(PlayerId(2), 50).unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].from, Party::Player(PlayerId(1)));
        assert_eq!(legs[1].from, Party::Player(PlayerId(3)));
        assert_eq!(cash(&banker, 2), 1600);
    }

    #[test]
    fn transfer_all_cash_and_properties() {
        let mut banker = banker_with(&["Ann", "Bob"]);
        banker.buy_property(PlayerId(1), "strand").unwrap();
        banker.buy_property(PlayerId(1), "water_works").unwrap();
        let moved = banker.transfer_all_properties(PlayerId(1), PlayerId(2)).unwrap();
        assert_eq!(moved.len(), 2);
        assert_eq!(banker.ledger().properties_of(PlayerId(2)).count(), 2);

        let tx = banker.transfer_all_cash(PlayerId(1), PlayerId(2)).unwrap();
        assert_eq!(tx.amount, 1500 - 220 - 150);
        assert_eq!(cash(&banker, 1), 0);
        assert_eq!(
            banker.transfer_all_cash(PlayerId(1), PlayerId(2)),
            Err(LedgerError::InvalidAmount(0))
        );
    }

    #[test]
    fn cash_out_sells_buildings_then_properties() {
        let mut banker = banker_with(&["Ann"]);
        banker.buy_property(PlayerId(1), "old_kent_road").unwrap();
        banker.buy_property(PlayerId(1), "whitechapel_road").unwrap();
        banker.buy_property(PlayerId(1), "water_works").unwrap();
        banker.mortgage_property(PlayerId(1), "water_works").unwrap();
        banker.build_house(PlayerId(1), "old_kent_road").unwrap();
        banker.build_house(PlayerId(1), "whitechapel_road").unwrap();
        banker.build_house(PlayerId(1), "old_kent_road").unwrap();

        let legs = banker.cash_out(PlayerId(1)).unwrap();
        assert_eq!(legs.len(), 5);
        assert!(legs.iter().all(|t| t.kind == TransactionKind::CashOut));
        assert_eq!(legs[0].property.as_deref(), Some("old_kent_road"));
        assert_eq!(banker.ledger().properties_of(PlayerId(1)).count(), 1);
        // 1500 - 60 - 60 - 150 + 75 - 150 + 75 + 60
        assert_eq!(cash(&banker, 1), 1290);
    }

    #[test]
    fn remove_player_frees_holdings_and_turn() {
        let mut banker = banker_with(&["Ann", "Bob", "Cat"]);
        banker.buy_property(PlayerId(2), "strand").unwrap();
        banker.next_turn();
        banker.next_turn();
        let tx = banker.remove_player(PlayerId(2)).unwrap();
        assert_eq!(tx.kind, TransactionKind::Leave);
        assert_eq!(tx.amount, 1280);
        assert!(banker.ledger().available().any(|d| d.id == "strand"));
        assert_eq!(banker.ledger().turns().current(), Some(PlayerId(3)));
        assert_eq!(banker.ledger().next_player_id(), PlayerId(4));
    }

    #[test]
    fn load_file_validates_before_replacing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        let mut banker = banker_with(&["Ann"]);
        banker.buy_property(PlayerId(1), "strand").unwrap();
        banker.save_file(&path).unwrap();
        let saved = banker.ledger().clone();

        let mut snapshot = banker.snapshot();
        snapshot.available_properties.clear();
        let broken = dir.path().join("broken.json");
        snapshot.write_to(&broken).unwrap();

        let mut other = banker_with(&["Bob", "Cat"]);
        let before = other.ledger().clone();
        let err = other.load_file(&broken).unwrap_err();
        assert!(matches!(
            err,
            SnapshotFileError::Invalid {
                source: SnapshotError::Unaccounted(_),
                ..
            }
        ));
        assert_eq!(other.ledger(), &before);

        other.load_file(&path).unwrap();
        assert_eq!(other.ledger(), &saved);
    }

    #[test]
    fn version_locked_while_players_exist() {
        let mut banker = banker_with(&["Ann"]);
        assert_eq!(
            banker.set_game_version(GameVersion::Us),
            Err(LedgerError::VersionLockedWithActivePlayers)
        );
        banker.reset_game();
        assert!(banker.transactions().is_empty());
        banker.set_game_version(GameVersion::Us).unwrap();
        assert!(banker.quote_rent("boardwalk", None).is_ok());
        assert_eq!(banker.ledger().next_player_id(), PlayerId(1));
    }

    #[test]
    fn reset_starts_in_the_default_version() {
        let mut banker = banker_with(&["Ann"]);
        banker.set_option("DefaultVersion", "us").unwrap();
        assert_eq!(banker.ledger().version(), GameVersion::Uk);
        banker.reset_game();
        assert_eq!(banker.ledger().version(), GameVersion::Us);
        assert!(banker.quote_rent("boardwalk", None).is_ok());
    }
}
