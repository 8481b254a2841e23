use serde::{Deserialize, Serialize};

use crate::Money;

/// The food types sold in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoodKind {
    Egg,
    Onions,
    Meat,
    Noodles,
    Sauce,
}

impl FoodKind {
    pub const ALL: [FoodKind; 5] = [
        FoodKind::Egg,
        FoodKind::Onions,
        FoodKind::Meat,
        FoodKind::Noodles,
        FoodKind::Sauce,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FoodKind::Egg => "EGG",
            FoodKind::Onions => "ONIONS",
            FoodKind::Meat => "MEAT",
            FoodKind::Noodles => "NOODLES",
            FoodKind::Sauce => "SAUCE",
        }
    }

    pub const fn can_chop(self) -> bool {
        matches!(self, FoodKind::Onions | FoodKind::Meat)
    }

    pub const fn can_cook(self) -> bool {
        matches!(self, FoodKind::Egg | FoodKind::Meat)
    }

    pub const fn cost(self) -> Money {
        match self {
            FoodKind::Egg => 20,
            FoodKind::Onions => 30,
            FoodKind::Meat => 80,
            FoodKind::Noodles => 40,
            FoodKind::Sauce => 10,
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// How far a piece of food has cooked. Only ever moves forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum CookStage {
    #[default]
    Raw,
    Cooked,
    Burnt,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Food {
    pub kind: FoodKind,
    pub chopped: bool,
    pub cooked_stage: CookStage,
}

impl Food {
    pub fn new(kind: FoodKind) -> Self {
        Food {
            kind,
            chopped: false,
            cooked_stage: CookStage::Raw,
        }
    }
}

/// Order-independent description of a plate's contents, used for order matching.
pub type Signature = Vec<(FoodKind, bool, CookStage)>;

/// A plate carrying an ordered list of food. A dirty plate is always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Plate {
    food: Vec<Food>,
    dirty: bool,
}

impl Plate {
    /// A clean, empty plate with its own contents list.
    pub fn new() -> Self {
        Plate::default()
    }

    pub fn dirty() -> Self {
        Plate {
            food: Vec::new(),
            dirty: true,
        }
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Appends food to a clean plate; a dirty plate hands it back.
    pub fn add(&mut self, food: Food) -> Result<(), Food> {
        if self.dirty {
            return Err(food);
        }
        self.food.push(food);
        Ok(())
    }

    pub fn signature(&self) -> Signature {
        let mut sig: Signature = self
            .food
            .iter()
            .map(|food| (food.kind, food.chopped, food.cooked_stage))
            .collect();
        sig.sort();
        sig
    }
}

/// The signature a plate needs to fulfil `required`: every ingredient chopped
/// and cooked exactly when its kind supports it.
pub fn required_signature(required: &[FoodKind]) -> Signature {
    let mut sig: Signature = required
        .iter()
        .map(|kind| {
            let stage = if kind.can_cook() {
                CookStage::Cooked
            } else {
                CookStage::Raw
            };
            (*kind, kind.can_chop(), stage)
        })
        .collect();
    sig.sort();
    sig
}

/// A pan holding at most one piece of food.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pan {
    food: Option<Food>,
}

impl Pan {
    pub fn with_food(food: Food) -> Self {
        Pan { food: Some(food) }
    }

    pub fn food(&self) -> Option<&Food> {
        self.food.as_ref()
    }

    pub(crate) fn food_mut(&mut self) -> Option<&mut Food> {
        self.food.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.food.is_none()
    }

    /// Puts food in an empty pan. An occupied pan hands the food back.
    pub fn put(&mut self, food: Food) -> Result<(), Food> {
        if self.food.is_some() {
            return Err(food);
        }
        self.food = Some(food);
        Ok(())
    }

    pub fn take(&mut self) -> Option<Food> {
        self.food.take()
    }
}

/// Anything an agent can hold or a tile can store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Item {
    Food(Food),
    Plate(Plate),
    Pan(Pan),
}

/// What the shop sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    Food(FoodKind),
    Plate,
    Pan,
}

impl ShopItem {
    pub const fn cost(self) -> Money {
        match self {
            ShopItem::Food(kind) => kind.cost(),
            ShopItem::Plate => 2,
            ShopItem::Pan => 4,
        }
    }

    /// A brand-new instance of the purchased item.
    pub fn materialize(self) -> Item {
        match self {
            ShopItem::Food(kind) => Item::Food(Food::new(kind)),
            ShopItem::Plate => Item::Plate(Plate::new()),
            ShopItem::Pan => Item::Pan(Pan::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(kind: FoodKind, chopped: bool, cooked_stage: CookStage) -> Food {
        Food {
            kind,
            chopped,
            cooked_stage,
        }
    }

    #[test]
    fn plates_never_share_contents() {
        let mut a = Plate::new();
        let b = Plate::new();
        a.add(Food::new(FoodKind::Sauce)).unwrap();
        assert_eq!(a.food().len(), 1);
        assert!(b.food().is_empty());
    }

    #[test]
    fn dirty_plate_refuses_food() {
        let mut plate = Plate::dirty();
        let egg = Food::new(FoodKind::Egg);
        assert_eq!(plate.add(egg.clone()), Err(egg));
        assert!(plate.food().is_empty());
    }

    #[test]
    fn signature_ignores_plating_order() {
        let mut a = Plate::new();
        a.add(Food::new(FoodKind::Sauce)).unwrap();
        a.add(prepared(FoodKind::Meat, true, CookStage::Cooked)).unwrap();
        let mut b = Plate::new();
        b.add(prepared(FoodKind::Meat, true, CookStage::Cooked)).unwrap();
        b.add(Food::new(FoodKind::Sauce)).unwrap();
        assert_eq!(a.signature(), b.signature());
        assert_eq!(
            a.signature(),
            required_signature(&[FoodKind::Sauce, FoodKind::Meat])
        );
    }

    #[test]
    fn required_signature_forces_supported_preparation() {
        assert_eq!(
            required_signature(&[FoodKind::Onions, FoodKind::Egg, FoodKind::Noodles]),
            vec![
                (FoodKind::Egg, false, CookStage::Cooked),
                (FoodKind::Onions, true, CookStage::Raw),
                (FoodKind::Noodles, false, CookStage::Raw),
            ]
        );
    }

    #[test]
    fn pan_holds_one_food() {
        let mut pan = Pan::default();
        assert!(pan.put(Food::new(FoodKind::Egg)).is_ok());
        assert!(pan.put(Food::new(FoodKind::Meat)).is_err());
        assert_eq!(pan.take().map(|f| f.kind), Some(FoodKind::Egg));
        assert!(pan.is_empty());
    }

    #[test]
    fn food_names_parse_case_insensitively() {
        assert_eq!(FoodKind::from_name("meat"), Some(FoodKind::Meat));
        assert_eq!(FoodKind::from_name("NOODLES"), Some(FoodKind::Noodles));
        assert_eq!(FoodKind::from_name("BUNS"), None);
    }
}
