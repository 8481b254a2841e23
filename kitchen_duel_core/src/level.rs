//! Text level format.
//!
//! ```text
//! // optional comments
//! SWITCH: turn=250 duration=100
//! #######
//! #b.C.K#
//! #$.U.S#
//! #######
//! ORDERS:
//! start=0 duration=40 required=MEAT,NOODLES reward=30 penalty=5
//! ```
//!
//! The first layout row is the top of the kitchen. `b` marks an agent spawn
//! (a floor tile); every spawn is used by both teams.

use std::path::Path;

use crate::{
    Money, PerTeam, Position, Turn,
    config::GameConfig,
    item::FoodKind,
    map::Grid,
    order::{Order, OrderId},
    tile::TileKind,
};

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    #[error("level has no layout rows")]
    Empty,

    #[error("inconsistent row width at layout row {row}: expected {expected}, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile character '{ch}' at (x={x}, row={row})")]
    UnknownTile { ch: char, x: usize, row: usize },

    #[error("bad order token \"{0}\"; expected key=value")]
    BadToken(String),

    #[error("order line is missing `{field}`: {line}")]
    MissingField { field: &'static str, line: String },

    #[error("unknown food type \"{0}\"")]
    UnknownFood(String),

    #[error("invalid number \"{value}\" for `{key}`")]
    BadNumber { key: String, value: String },
}

const SPAWN_CHAR: char = 'b';

/// Maps a layout character to its tile kind.
pub fn tile_for_char(ch: char) -> Option<TileKind> {
    match ch {
        '.' => Some(TileKind::Floor),
        '#' => Some(TileKind::Wall),
        'C' => Some(TileKind::Counter),
        'K' => Some(TileKind::Cooker),
        'S' => Some(TileKind::Sink),
        'T' => Some(TileKind::SinkTable),
        'R' => Some(TileKind::Trash),
        'U' => Some(TileKind::Submit),
        '$' => Some(TileKind::Shop),
        'B' => Some(TileKind::Box),
        _ => None,
    }
}

/// Inverse of [`tile_for_char`].
pub fn char_for_tile(kind: TileKind) -> char {
    match kind {
        TileKind::Floor => '.',
        TileKind::Wall => '#',
        TileKind::Counter => 'C',
        TileKind::Cooker => 'K',
        TileKind::Sink => 'S',
        TileKind::SinkTable => 'T',
        TileKind::Trash => 'R',
        TileKind::Submit => 'U',
        TileKind::Shop => '$',
        TileKind::Box => 'B',
    }
}

/// Optional switch window override from a `SWITCH:` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchOverride {
    pub turn: Option<Turn>,
    pub duration: Option<Turn>,
}

/// The immutable seed a match starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLevel {
    pub layout: Grid<TileKind>,
    pub spawns: PerTeam<Vec<Position>>,
    pub orders: Vec<Order>,
    pub switch: Option<SwitchOverride>,
}

impl ParsedLevel {
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    pub fn height(&self) -> usize {
        self.layout.height()
    }
}

pub fn load_level(path: &Path, config: &GameConfig) -> Result<ParsedLevel, LevelError> {
    let contents = std::fs::read_to_string(path)?;
    parse_level(&contents, config)
}

/// Parses a level. Orders without `reward=`/`penalty=` use the config defaults.
pub fn parse_level(source: &str, config: &GameConfig) -> Result<ParsedLevel, LevelError> {
    let mut switch = None;
    let mut layout_rows: Vec<&str> = Vec::new();
    let mut order_lines: Vec<&str> = Vec::new();
    let mut in_orders = false;

    for line in source.lines() {
        let line = line.trim_end();
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if trimmed.to_ascii_uppercase().starts_with("SWITCH:") {
            switch = Some(parse_switch(trimmed)?);
            continue;
        }
        if !in_orders && trimmed.eq_ignore_ascii_case("ORDERS:") {
            in_orders = true;
            continue;
        }
        if in_orders {
            order_lines.push(trimmed);
        } else {
            layout_rows.push(line);
        }
    }

    let (layout, spawns) = parse_layout(&layout_rows)?;

    let mut orders = Vec::new();
    let mut next_id: OrderId = 1;
    for line in order_lines {
        if let Some(order) = parse_order(line, next_id, config)? {
            orders.push(order);
            next_id += 1;
        }
    }

    Ok(ParsedLevel {
        layout,
        spawns,
        orders,
        switch,
    })
}

fn parse_layout(rows: &[&str]) -> Result<(Grid<TileKind>, PerTeam<Vec<Position>>), LevelError> {
    let first = rows.first().ok_or(LevelError::Empty)?;
    let width = first.chars().count();
    let height = rows.len();

    let mut cells: Vec<Vec<char>> = Vec::with_capacity(height);
    for (row, line) in rows.iter().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        if chars.len() != width {
            return Err(LevelError::RaggedRow {
                row,
                expected: width,
                found: chars.len(),
            });
        }
        cells.push(chars);
    }

    let mut kinds = Vec::with_capacity(width * height);
    let mut spawns = Vec::new();
    // Grid rows run bottom-up, so walk the file from its last row.
    for y in 0..height {
        let row = height - 1 - y;
        for (x, ch) in cells[row].iter().copied().enumerate() {
            if ch == SPAWN_CHAR {
                spawns.push(Position::new(x, y));
                kinds.push(TileKind::Floor);
                continue;
            }
            kinds.push(tile_for_char(ch).ok_or(LevelError::UnknownTile { ch, x, row })?);
        }
    }
    spawns.sort_by_key(|pos| (height - 1 - pos.y, pos.x));

    let mut kinds = kinds.into_iter();
    let layout = Grid::from_generator(width, height, |_, _| kinds.next().unwrap_or_default());
    Ok((layout, PerTeam::new(spawns.clone(), spawns)))
}

fn key_values(line: &str) -> Result<Vec<(String, &str)>, LevelError> {
    line.split_whitespace()
        .map(|token| {
            token
                .split_once('=')
                .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim()))
                .ok_or_else(|| LevelError::BadToken(token.to_string()))
        })
        .collect()
}

fn number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, LevelError> {
    value.parse().map_err(|_| LevelError::BadNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_switch(line: &str) -> Result<SwitchOverride, LevelError> {
    let rest = line.split_once(':').map_or("", |(_, rest)| rest);
    let mut switch = SwitchOverride::default();
    for token in rest.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "turn" => switch.turn = Some(number("turn", value.trim())?),
            "duration" => switch.duration = Some(number("duration", value.trim())?),
            _ => {}
        }
    }
    Ok(switch)
}

/// Accepts `EGG`, `egg` and `FoodType.EGG`.
fn parse_required(list: &str) -> Result<Vec<FoodKind>, LevelError> {
    list.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let name = part.rsplit('.').next().unwrap_or(part);
            FoodKind::from_name(name).ok_or_else(|| LevelError::UnknownFood(part.to_string()))
        })
        .collect()
}

fn parse_order(
    line: &str,
    order_id: OrderId,
    config: &GameConfig,
) -> Result<Option<Order>, LevelError> {
    let line = line.split("//").next().unwrap_or("");
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let pairs = key_values(line)?;
    let lookup = |field: &'static str| {
        pairs
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| *v)
            .ok_or_else(|| LevelError::MissingField {
                field,
                line: line.to_string(),
            })
    };

    let start: Turn = number("start", lookup("start")?)?;
    let duration: Turn = number("duration", lookup("duration")?)?;
    let required = parse_required(lookup("required")?)?;
    let reward: Money = match lookup("reward") {
        Ok(value) => number("reward", value)?,
        Err(_) => config.default_order_reward,
    };
    let penalty: Money = match lookup("penalty") {
        Ok(value) => number("penalty", value)?,
        Err(_) => config.default_order_penalty,
    };

    let expires = start
        .checked_add(duration)
        .ok_or_else(|| LevelError::BadNumber {
            key: "duration".to_string(),
            value: duration.to_string(),
        })?;

    Ok(Some(Order::new(
        order_id,
        required,
        start,
        expires,
        reward,
        penalty,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
// tiny kitchen
SWITCH: turn=5 duration=3
#####
#b.K#
#$bU#
#####

ORDERS:
start=0 duration=10 required=MEAT,noodles reward=30   // comment
start=4 duration=6 required=FoodType.EGG
";

    #[test]
    fn parses_layout_bottom_up() {
        let level = parse_level(LEVEL, &GameConfig::default()).unwrap();
        assert_eq!((level.width(), level.height()), (5, 4));
        // File row 1 is y = 2; file row 2 is y = 1.
        assert_eq!(level.layout[Position::new(3, 2)], TileKind::Cooker);
        assert_eq!(level.layout[Position::new(1, 1)], TileKind::Shop);
        assert_eq!(level.layout[Position::new(3, 1)], TileKind::Submit);
        assert_eq!(level.layout[Position::new(1, 2)], TileKind::Floor);
        assert_eq!(
            level.spawns.red,
            vec![Position::new(1, 2), Position::new(2, 1)]
        );
        assert_eq!(level.spawns.red, level.spawns.blue);
    }

    #[test]
    fn parses_switch_and_orders() {
        let level = parse_level(LEVEL, &GameConfig::default()).unwrap();
        assert_eq!(
            level.switch,
            Some(SwitchOverride {
                turn: Some(5),
                duration: Some(3)
            })
        );
        assert_eq!(level.orders.len(), 2);
        let first = &level.orders[0];
        assert_eq!(first.order_id, 1);
        assert_eq!(first.required, vec![FoodKind::Meat, FoodKind::Noodles]);
        assert_eq!((first.created_turn, first.expires_turn), (0, 10));
        assert_eq!((first.reward, first.penalty), (30, 2));
        let second = &level.orders[1];
        assert_eq!(second.required, vec![FoodKind::Egg]);
        assert_eq!((second.order_id, second.expires_turn, second.reward), (2, 10, 5));
    }

    #[test]
    fn rejects_ragged_rows_and_unknown_tiles() {
        let config = GameConfig::default();
        assert!(matches!(
            parse_level("###\n##\n", &config),
            Err(LevelError::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            parse_level("#?#\n", &config),
            Err(LevelError::UnknownTile { ch: '?', x: 1, row: 0 })
        ));
        assert!(matches!(parse_level("// nothing\n", &config), Err(LevelError::Empty)));
    }

    #[test]
    fn rejects_bad_orders() {
        let config = GameConfig::default();
        assert!(matches!(
            parse_level("..\nORDERS:\nstart=0 required=EGG\n", &config),
            Err(LevelError::MissingField { field: "duration", .. })
        ));
        assert!(matches!(
            parse_level("..\nORDERS:\nstart=0 duration=3 required=BUNS\n", &config),
            Err(LevelError::UnknownFood(_))
        ));
        assert!(matches!(
            parse_level("..\nORDERS:\nstart=x duration=3 required=EGG\n", &config),
            Err(LevelError::BadNumber { .. })
        ));
        assert!(matches!(
            parse_level("..\nORDERS:\nstart\n", &config),
            Err(LevelError::BadToken(_))
        ));
    }

    #[test]
    fn order_window_past_last_turn_is_rejected() {
        let config = GameConfig::default();
        let level = "..\nORDERS:\nstart=4294967295 duration=5 required=EGG\n";
        assert!(matches!(
            parse_level(level, &config),
            Err(LevelError::BadNumber { ref key, .. }) if key == "duration"
        ));
    }

    #[test]
    fn legend_round_trips() {
        for kind in TileKind::ALL {
            assert_eq!(tile_for_char(char_for_tile(kind)), Some(kind));
        }
    }
}
