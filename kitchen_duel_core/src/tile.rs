use serde::{Deserialize, Serialize};

use crate::{
    actions::Rejection,
    config::GameConfig,
    item::{CookStage, Food, Item, Pan, Plate},
};

/// The static kind of a kitchen cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum TileKind {
    #[default]
    Floor,
    Wall,
    Counter,
    Box,
    Sink,
    SinkTable,
    Cooker,
    Trash,
    Submit,
    Shop,
}

/// Capability flags fixed per [`TileKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFlags {
    pub walkable: bool,
    pub placeable: bool,
    pub interactable: bool,
}

const fn flags(walkable: bool, placeable: bool, interactable: bool) -> TileFlags {
    TileFlags {
        walkable,
        placeable,
        interactable,
    }
}

impl TileKind {
    pub const ALL: [TileKind; 10] = [
        TileKind::Floor,
        TileKind::Wall,
        TileKind::Counter,
        TileKind::Box,
        TileKind::Sink,
        TileKind::SinkTable,
        TileKind::Cooker,
        TileKind::Trash,
        TileKind::Submit,
        TileKind::Shop,
    ];

    pub const fn flags(self) -> TileFlags {
        match self {
            TileKind::Floor => flags(true, false, false),
            TileKind::Wall => flags(false, false, false),
            TileKind::Counter => flags(false, true, false),
            TileKind::Box => flags(false, true, true),
            TileKind::Sink => flags(false, true, true),
            TileKind::SinkTable => flags(false, false, true),
            TileKind::Cooker => flags(false, true, true),
            TileKind::Trash => flags(false, true, false),
            TileKind::Submit => flags(true, true, true),
            TileKind::Shop => flags(false, false, true),
        }
    }
}

/// A kitchen cell together with its mutable payload.
///
/// Tiles are created once when a match is set up and mutated in place; only the
/// environment tick and the action handlers change their payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Tile {
    Floor,
    Wall,
    Counter {
        item: Option<Item>,
    },
    /// Stack of identical items. `count == 0` exactly when `item` is `None`.
    Box {
        item: Option<Item>,
        count: u32,
    },
    Sink {
        num_dirty_plates: u32,
        curr_dirty_plate_progress: u32,
        /// Set by a wash action, cleared at the end of every environment tick.
        using: bool,
    },
    SinkTable {
        num_clean_plates: u32,
    },
    Cooker {
        item: Option<Item>,
        cook_progress: u32,
    },
    Trash,
    Submit,
    Shop,
}

impl Tile {
    /// Creates a tile in its initial state. Cookers start with an empty pan.
    pub fn new(kind: TileKind) -> Self {
        match kind {
            TileKind::Floor => Tile::Floor,
            TileKind::Wall => Tile::Wall,
            TileKind::Counter => Tile::Counter { item: None },
            TileKind::Box => Tile::Box {
                item: None,
                count: 0,
            },
            TileKind::Sink => Tile::Sink {
                num_dirty_plates: 0,
                curr_dirty_plate_progress: 0,
                using: false,
            },
            TileKind::SinkTable => Tile::SinkTable {
                num_clean_plates: 0,
            },
            TileKind::Cooker => Tile::Cooker {
                item: Some(Item::Pan(Pan::default())),
                cook_progress: 0,
            },
            TileKind::Trash => Tile::Trash,
            TileKind::Submit => Tile::Submit,
            TileKind::Shop => Tile::Shop,
        }
    }

    pub fn kind(&self) -> TileKind {
        match self {
            Tile::Floor => TileKind::Floor,
            Tile::Wall => TileKind::Wall,
            Tile::Counter { .. } => TileKind::Counter,
            Tile::Box { .. } => TileKind::Box,
            Tile::Sink { .. } => TileKind::Sink,
            Tile::SinkTable { .. } => TileKind::SinkTable,
            Tile::Cooker { .. } => TileKind::Cooker,
            Tile::Trash => TileKind::Trash,
            Tile::Submit => TileKind::Submit,
            Tile::Shop => TileKind::Shop,
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.kind().flags().walkable
    }

    pub fn is_placeable(&self) -> bool {
        self.kind().flags().placeable
    }

    pub fn is_interactable(&self) -> bool {
        self.kind().flags().interactable
    }

    /// The item resting on a counter, box or cooker.
    pub fn item(&self) -> Option<&Item> {
        match self {
            Tile::Counter { item } | Tile::Box { item, .. } | Tile::Cooker { item, .. } => {
                item.as_ref()
            }
            _ => None,
        }
    }

    /// Checks whether `incoming` may be placed here, without touching the tile.
    pub fn accepts(&self, incoming: &Item) -> Result<(), Rejection> {
        match (self, incoming) {
            (Tile::Counter { item: None }, _) => Ok(()),
            (Tile::Cooker { item: None, .. }, Item::Pan(_)) => Ok(()),
            (Tile::Cooker { item: Some(Item::Pan(pan)), .. }, Item::Food(_)) if pan.is_empty() => {
                Ok(())
            }
            (Tile::Cooker { item: None, .. }, _) => Err(Rejection::WrongItem),
            (Tile::Box { item: None, .. }, _) => Ok(()),
            (Tile::Box { item: Some(stored), .. }, _) if stored == incoming => Ok(()),
            (Tile::Sink { .. }, Item::Plate(plate)) if plate.is_dirty() => Ok(()),
            (Tile::Sink { .. }, _) => Err(Rejection::WrongItem),
            (Tile::Counter { .. } | Tile::Cooker { .. } | Tile::Box { .. }, _) => {
                Err(Rejection::TileFull)
            }
            _ => Err(Rejection::WrongTile),
        }
    }

    /// Stores `incoming`. Callers must have checked [`Tile::accepts`] first.
    pub(crate) fn receive(&mut self, incoming: Item, config: &GameConfig) {
        match self {
            Tile::Counter { item } => *item = Some(incoming),
            Tile::Cooker {
                item,
                cook_progress,
            } => match incoming {
                Item::Food(food) => {
                    if let Some(Item::Pan(pan)) = item {
                        if pan.put(food).is_ok() {
                            *cook_progress = 0;
                        }
                    }
                }
                other => {
                    // A pan that already carries food resumes from its stage.
                    *cook_progress = match &other {
                        Item::Pan(pan) => pan
                            .food()
                            .map_or(0, |food| config.progress_for_stage(food.cooked_stage)),
                        _ => 0,
                    };
                    *item = Some(other);
                }
            },
            Tile::Box { item, count } => {
                if item.is_none() {
                    *item = Some(incoming);
                }
                *count += 1;
            }
            Tile::Sink {
                num_dirty_plates, ..
            } => *num_dirty_plates += 1,
            _ => {}
        }
    }

    /// Removes one item for an empty-handed agent. Leaves the tile untouched on failure.
    pub(crate) fn take(&mut self) -> Result<Item, Rejection> {
        match self {
            Tile::Counter { item } => item.take().ok_or(Rejection::NothingToTake),
            Tile::Cooker {
                item,
                cook_progress,
            } => {
                let pan = item.take().ok_or(Rejection::NothingToTake)?;
                *cook_progress = 0;
                Ok(pan)
            }
            Tile::Box { item, count } => {
                let stored = item.as_ref().ok_or(Rejection::NothingToTake)?.clone();
                *count = count.saturating_sub(1);
                if *count == 0 {
                    *item = None;
                }
                Ok(stored)
            }
            Tile::SinkTable { num_clean_plates } => {
                if *num_clean_plates == 0 {
                    return Err(Rejection::NothingToTake);
                }
                *num_clean_plates -= 1;
                Ok(Item::Plate(Plate::new()))
            }
            _ => Err(Rejection::WrongTile),
        }
    }

    /// Lifts the food out of a cooker's pan, resetting its progress.
    pub(crate) fn take_pan_food(&mut self) -> Result<Food, Rejection> {
        match self {
            Tile::Cooker {
                item: Some(Item::Pan(pan)),
                cook_progress,
            } => {
                let food = pan.take().ok_or(Rejection::NoFood)?;
                *cook_progress = 0;
                Ok(food)
            }
            Tile::Cooker { .. } => Err(Rejection::NoFood),
            _ => Err(Rejection::WrongTile),
        }
    }

    /// Takes loose food from a counter, or food out of a cooker's pan.
    pub(crate) fn take_food(&mut self) -> Result<Food, Rejection> {
        match self {
            Tile::Counter { item } => match item.take() {
                Some(Item::Food(food)) => Ok(food),
                other => {
                    *item = other;
                    Err(Rejection::NoFood)
                }
            },
            _ => self.take_pan_food(),
        }
    }

    /// One cooker tick. Returns the new stage when the food's stage changed.
    pub(crate) fn advance_cooking(&mut self, config: &GameConfig) -> Option<CookStage> {
        let Tile::Cooker {
            item: Some(Item::Pan(pan)),
            cook_progress,
        } = self
        else {
            return None;
        };
        let food = pan.food_mut()?;
        *cook_progress += 1;
        let before = food.cooked_stage;
        if *cook_progress == config.cook_progress && food.cooked_stage == CookStage::Raw {
            food.cooked_stage = CookStage::Cooked;
        } else if *cook_progress >= config.burn_progress {
            food.cooked_stage = CookStage::Burnt;
        }
        (food.cooked_stage != before).then_some(food.cooked_stage)
    }

    /// One sink tick. Returns `true` when a plate finished washing. Always clears `using`.
    pub(crate) fn advance_washing(&mut self, config: &GameConfig) -> bool {
        let Tile::Sink {
            num_dirty_plates,
            curr_dirty_plate_progress,
            using,
        } = self
        else {
            return false;
        };
        let mut finished = false;
        if *using && *num_dirty_plates > 0 {
            *curr_dirty_plate_progress += 1;
            if *curr_dirty_plate_progress >= config.plate_wash_progress {
                *curr_dirty_plate_progress = 0;
                *num_dirty_plates -= 1;
                finished = true;
            }
        }
        *using = false;
        finished
    }
}
