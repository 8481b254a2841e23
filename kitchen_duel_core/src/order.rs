use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    BotId, Money, PerTeam, Team, Turn,
    item::{FoodKind, Plate, required_signature},
};

pub type OrderId = u32;

/// A time-windowed demand contract owned by one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub required: Vec<FoodKind>,
    pub created_turn: Turn,
    pub expires_turn: Turn,
    pub reward: Money,
    pub penalty: Money,
    pub claimed_by: Option<BotId>,
    pub completed_turn: Option<Turn>,
    pub penalized: bool,
}

impl Order {
    pub fn new(
        order_id: OrderId,
        required: Vec<FoodKind>,
        created_turn: Turn,
        expires_turn: Turn,
        reward: Money,
        penalty: Money,
    ) -> Self {
        Order {
            order_id,
            required,
            created_turn,
            expires_turn,
            reward,
            penalty,
            claimed_by: None,
            completed_turn: None,
            penalized: false,
        }
    }

    pub fn is_expired(&self, turn: Turn) -> bool {
        turn > self.expires_turn
    }

    pub fn is_completed(&self) -> bool {
        self.completed_turn.is_some()
    }

    pub fn is_active(&self, turn: Turn) -> bool {
        self.created_turn <= turn && turn <= self.expires_turn && !self.is_completed()
    }

    /// Exact match: same ingredients, each prepared as far as its kind allows.
    pub fn matches(&self, plate: &Plate) -> bool {
        !plate.is_dirty() && plate.signature() == required_signature(&self.required)
    }
}

/// Both teams' order histories. Orders are never removed, only marked
/// completed or penalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLedger {
    orders: PerTeam<Vec<Order>>,
    next_order_id: OrderId,
}

impl Default for OrderLedger {
    fn default() -> Self {
        OrderLedger::new()
    }
}

impl OrderLedger {
    pub fn new() -> Self {
        OrderLedger {
            orders: PerTeam::default(),
            next_order_id: 1,
        }
    }

    /// Gives each team its own copy of the seeded orders.
    pub fn from_seed(seed: &[Order]) -> Self {
        let next_order_id = seed
            .iter()
            .map(|order| order.order_id + 1)
            .max()
            .unwrap_or(1);
        OrderLedger {
            orders: PerTeam::from_fn(|_| seed.to_vec()),
            next_order_id,
        }
    }

    pub fn orders(&self, team: Team) -> &[Order] {
        &self.orders[team]
    }

    /// Appends one order per team under a single shared id.
    pub fn spawn(
        &mut self,
        required: Vec<FoodKind>,
        turn: Turn,
        delta_time: Turn,
        reward: Money,
        penalty: Money,
    ) -> OrderId {
        let order_id = self.next_order_id;
        self.next_order_id += 1;
        for team in Team::ALL {
            self.orders[team].push(Order::new(
                order_id,
                required.clone(),
                turn,
                turn.saturating_add(delta_time),
                reward,
                penalty,
            ));
        }
        order_id
    }

    /// Debits the penalty of every order that expired unfulfilled. Each order
    /// is penalized at most once.
    pub fn expire(&mut self, turn: Turn, money: &mut PerTeam<Money>) -> usize {
        let mut penalized = 0;
        for team in Team::ALL {
            for order in self.orders[team].iter_mut() {
                if order.is_completed() || order.penalized || !order.is_expired(turn) {
                    continue;
                }
                money[team] -= order.penalty;
                order.penalized = true;
                penalized += 1;
                info!(
                    team = team.name(),
                    order_id = order.order_id,
                    penalty = order.penalty,
                    "order expired"
                );
            }
        }
        penalized
    }

    /// Index of the first active order of `team` that `plate` fulfils.
    pub fn find_match(&self, team: Team, turn: Turn, plate: &Plate) -> Option<usize> {
        self.orders[team]
            .iter()
            .position(|order| order.is_active(turn) && order.matches(plate))
    }

    /// Marks an order fulfilled and returns its reward.
    pub(crate) fn complete(&mut self, team: Team, index: usize, bot: BotId, turn: Turn) -> Money {
        let order = &mut self.orders[team][index];
        debug_assert!(!order.is_completed() && !order.penalized);
        order.claimed_by = Some(bot);
        order.completed_turn = Some(turn);
        info!(
            team = team.name(),
            order_id = order.order_id,
            bot,
            reward = order.reward,
            "order completed"
        );
        order.reward
    }
}
