use anyhow::{Context, Result};
use clap::Parser;
use kitchen_duel_core::{
    GameConfig, GameState, Team, Turn,
    agent::RandomWalker,
    game::Match,
    item::Item,
    level::{ParsedLevel, char_for_tile, load_level},
    map::KitchenMap,
    order::Order,
};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    fs::File,
    io::{self, Stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Level file to load
    #[arg(short, long, value_name = "MAP_FILE", default_value = "maps/demo.txt")]
    map: PathBuf,

    /// TOML file overriding the default rules
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Number of turns to play
    #[arg(short, long)]
    turns: Option<u32>,

    /// Seed for the built-in random controllers
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Play the whole match without a terminal UI and print the final state as JSON
    #[arg(long)]
    headless: bool,

    /// Write logs to this file (the TUI logs nowhere otherwise)
    #[arg(long, value_name = "LOG_FILE")]
    log_file: Option<PathBuf>,
}

struct App {
    game: Match,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(game: Match) -> Self {
        App {
            game,
            should_quit: false,
        }
    }

    /// Plays one turn unless the match is over.
    fn tick(&mut self) -> Result<()> {
        if !self.game.is_over() {
            self.game.play_turn()?;
        }
        Ok(())
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let game = build_match(&args)?;

    if args.headless {
        let mut game = game;
        game.run()?;
        let snapshot = game.state().snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let mut terminal = setup_terminal()?;
    let mut app = App::new(game);
    let outcome = run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    outcome
}

/// Logs to stderr when headless; the TUI owns the terminal, so it only logs to a file.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match (&args.log_file, args.headless) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, true) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        (None, false) => {}
    }
    Ok(())
}

fn build_match(args: &Args) -> Result<Match> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(turns) = args.turns {
        config.total_turns = turns;
    }

    let level = load_map(&args.map, &config)?;
    let state = GameState::from_level(&level, config).context("Failed to place spawns")?;
    info!(
        map = %args.map.display(),
        width = level.width(),
        height = level.height(),
        bots = state.bots().count(),
        "match ready"
    );

    Ok(Match::new(
        state,
        Box::new(RandomWalker::new(args.seed)),
        Box::new(RandomWalker::new(args.seed.wrapping_add(1))),
    ))
}

fn load_map(path: &Path, config: &GameConfig) -> Result<ParsedLevel> {
    if !path.exists() {
        return Err(anyhow::anyhow!("Map file does not exist: {}", path.display()));
    }
    load_level(path, config).with_context(|| format!("Failed to load map {}", path.display()))
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app.game.state()))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick()?;
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn team_color(team: Team) -> Color {
    match team {
        Team::Red => Color::Red,
        Team::Blue => Color::Blue,
    }
}

/// Renders the user interface.
fn ui(frame: &mut Frame, state: &GameState) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60), // Both kitchens
            Constraint::Percentage(30), // Teams and orders
            Constraint::Percentage(10), // Status/help
        ])
        .split(frame.area());

    let kitchens = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_layout[0]);
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_layout[1]);

    for (i, team) in Team::ALL.into_iter().enumerate() {
        render_kitchen(frame, kitchens[i], state, state.map(team));
        render_team(frame, panels[i], state, team);
    }

    let mut status = format!(
        "Turn {}/{}  switch window {}..{}",
        state.turn(),
        state.config().total_turns,
        state.switch_turn(),
        state.switch_turn().saturating_add(state.switch_duration())
    );
    if state.is_over() {
        status.push_str("  MATCH OVER");
    }
    let help_text = Paragraph::new(format!("{status}    Press 'q' or 'Esc' to quit."))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

/// Renders one kitchen grid with the agents standing on it. Row 0 is drawn at the bottom.
fn render_kitchen(frame: &mut Frame, area: Rect, state: &GameState, map: &KitchenMap) {
    let team = map.team();
    let occupancy = state.occupancy(team);
    let mut lines: Vec<Line> = Vec::with_capacity(map.height());

    for y in (0..map.height()).rev() {
        let mut spans: Vec<Span> = Vec::with_capacity(map.width());
        for x in 0..map.width() {
            let occupant = occupancy.get(x, y).copied().flatten();
            if let Some(bot) = occupant.and_then(|id| state.bot(id).ok()) {
                let glyph = if bot.holding.is_some() { "@" } else { "o" };
                spans.push(Span::styled(
                    glyph,
                    Style::default().fg(team_color(bot.team)).bold(),
                ));
                continue;
            }
            let Some(tile) = map.tile(x, y) else {
                spans.push(Span::raw(" "));
                continue;
            };
            let ch = match char_for_tile(tile.kind()) {
                '.' => ' ',
                other => other,
            };
            let style = if tile.item().is_some() {
                Style::default().fg(Color::Yellow)
            } else if ch == '#' {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            spans.push(Span::styled(ch.to_string(), style));
        }
        lines.push(Line::from(spans));
    }

    let title = format!("{} kitchen", team.name());
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(team_color(team))),
        )
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn describe_item(item: &Item) -> String {
    match item {
        Item::Food(food) => format!(
            "{}{} ({:?})",
            food.kind.name(),
            if food.chopped { " chopped" } else { "" },
            food.cooked_stage
        ),
        Item::Plate(plate) if plate.is_dirty() => "dirty plate".to_string(),
        Item::Plate(plate) => format!("plate[{}]", plate.food().len()),
        Item::Pan(pan) => match pan.food() {
            Some(food) => format!("pan with {}", food.kind.name()),
            None => "empty pan".to_string(),
        },
    }
}

fn describe_order(order: &Order, turn: Turn) -> String {
    let required: Vec<&str> = order.required.iter().map(|kind| kind.name()).collect();
    let status = if order.is_completed() {
        "done"
    } else if order.penalized {
        "missed"
    } else if order.is_active(turn) {
        "open"
    } else {
        "pending"
    };
    format!(
        "#{} {} until {} +{}/-{} [{status}]",
        order.order_id,
        required.join(","),
        order.expires_turn,
        order.reward,
        order.penalty
    )
}

/// Renders money, agents and orders for one team.
fn render_team(frame: &mut Frame, area: Rect, state: &GameState, team: Team) {
    let mut items = vec![ListItem::new(format!(
        "Money: {}{}",
        state.money(team),
        if state.is_switched(team) { "  (switched)" } else { "" }
    ))];
    for id in state.team_bot_ids(team) {
        if let Ok(bot) = state.bot(id) {
            let holding = bot
                .holding
                .as_ref()
                .map_or_else(|| "nothing".to_string(), describe_item);
            items.push(ListItem::new(format!(
                "Bot {} on {} at ({}, {}) holding {holding}",
                bot.id,
                bot.map_team.name(),
                bot.position.x,
                bot.position.y
            )));
        }
    }
    items.extend(
        state
            .orders(team)
            .iter()
            .map(|order| ListItem::new(describe_order(order, state.turn()))),
    );

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} team", team.name())),
    );
    frame.render_widget(list, area);
}
