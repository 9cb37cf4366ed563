//! Terminal front end for King of Diamonds.
//!
//! Runs a simulated demo by default. `--interactive` reads player names and
//! numbers from stdin instead.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use king_of_diamonds::core::config::{MAX_PLAYERS, MIN_PLAYERS};
use king_of_diamonds::core::{Choice, GameError, GameState, Player, SessionConfig};
use king_of_diamonds::play::{
    ChoiceProvider, GameSession, RandomProvider, RoundObserver, RoundReport, RoundView,
    SessionResult,
};
use king_of_diamonds::rules::{Resolution, Rule, BASE_RULE_TEXT};

const DEMO_PLAYERS: [&str; 5] = ["Alice", "Bob", "Charlie", "Diana", "Eve"];
const BANNER: &str = "==================================================";

#[derive(Parser, Debug)]
#[command(name = "kod")]
#[command(about = "King of Diamonds: pick 0-100, get closest to 0.8 x the average", long_about = None)]
#[command(version)]
struct Cli {
    /// Demo player name (repeatable). Defaults to five named players.
    #[arg(long = "player", value_name = "NAME")]
    players: Vec<String>,

    /// Seed for tie-breaks and simulated players.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many rounds.
    #[arg(long, value_name = "N")]
    max_rounds: Option<u32>,

    /// Read player names and numbers from stdin.
    #[arg(long)]
    interactive: bool,

    /// Stage the 0 vs 100 rule when two simulated players remain.
    #[arg(long)]
    showcase: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SessionConfig::new().with_seed(cli.seed);
    if let Some(limit) = cli.max_rounds {
        config = config.with_max_rounds(limit);
    }
    info!(target: "kod", seed = cli.seed, interactive = cli.interactive, "starting");

    println!("{BANNER}");
    println!("        KING OF DIAMONDS");
    println!("{BANNER}");

    let mut observer = ConsoleObserver;
    let (session, result) = if cli.interactive {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let state = register_players(&mut input, cli.seed)?;
        let mut session = GameSession::new(state, config);
        let mut provider = LineProvider::new(input, io::stdout());
        let result = session.run(&mut provider, &mut observer)?;
        (session, result)
    } else {
        let names: Vec<String> = if cli.players.is_empty() {
            DEMO_PLAYERS.iter().map(ToString::to_string).collect()
        } else {
            cli.players
        };
        let mut session = GameSession::with_players(names, config)?;
        let mut provider = RandomProvider::new(cli.seed).with_showcase(cli.showcase);
        let result = session.run(&mut provider, &mut observer)?;
        (session, result)
    };

    print_summary(&session, &result);
    Ok(())
}

fn print_summary(session: &GameSession, result: &SessionResult) {
    let config = session.config();
    if result.hit_round_limit {
        println!("\nRound limit reached after {} rounds.", result.rounds_played);
    }
    println!("Rounds played: {} (seed {})", result.rounds_played, config.seed);
}

/// Lobby loop: add names until "start" or the roster is full.
fn register_players(input: &mut impl BufRead, seed: u64) -> Result<GameState> {
    let mut state = GameState::new(seed);

    println!("Enter {MIN_PLAYERS}-{MAX_PLAYERS} player names. Type 'start' when ready.");
    while state.players().len() < MAX_PLAYERS {
        print!("Player {} name: ", state.players().len() + 1);
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let name = line.trim();
        if name.eq_ignore_ascii_case("start") {
            if state.players().len() >= MIN_PLAYERS {
                break;
            }
            println!("ERROR: {}", GameError::NotEnoughPlayers(state.players().len()));
            continue;
        }
        match state.add_player(name) {
            Ok(_) => println!("OK: {name} joined the game!"),
            Err(error) => println!("ERROR: {error}"),
        }
    }

    if let Err(error) = state.start() {
        bail!("cannot start the game: {error}");
    }
    Ok(state)
}

/// Prompts for each number on a line-oriented terminal.
struct LineProvider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineProvider<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_choice(&mut self, player: &Player) -> io::Result<Option<Choice>> {
        loop {
            write!(self.output, "{} ({} pts), choose 0-100: ", player.name, player.points)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match Choice::parse(&line) {
                Ok(choice) => return Ok(Some(choice)),
                Err(error) => writeln!(self.output, "ERROR: {error}")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ChoiceProvider for LineProvider<R, W> {
    fn choose(&mut self, player: &Player, _view: &RoundView) -> Result<Choice, GameError> {
        match self.read_choice(player) {
            Ok(Some(choice)) => Ok(choice),
            Ok(None) => Err(GameError::InvalidInput("<end of input>".to_string())),
            Err(error) => Err(GameError::InvalidInput(format!("<{error}>"))),
        }
    }
}

/// Prints the game to stdout.
struct ConsoleObserver;

impl RoundObserver for ConsoleObserver {
    fn on_rules(&mut self, rules: &[Rule], eliminated_count: usize) {
        println!("\n{BANNER}");
        println!("GAME RULES ({eliminated_count} eliminated)");
        println!("{BANNER}");
        println!("BASE RULE:");
        for line in BASE_RULE_TEXT {
            println!("  - {line}");
        }
        for rule in rules {
            println!("\n{}:", rule.title());
            for line in rule.description() {
                println!("  - {line}");
            }
        }
    }

    fn on_round_start(&mut self, state: &GameState) {
        println!("\n{BANNER}");
        println!("ROUND {}", state.round_number());
        println!("{BANNER}");
        for player in state.alive_players() {
            println!("  {player}");
        }
    }

    fn on_round(&mut self, report: &RoundReport) {
        let outcome = &report.outcome;
        println!("\nTarget number: {:.2}", outcome.target);

        println!("Choices:");
        for (choice, players) in report.choices.iter() {
            let names: Vec<&str> = players.iter().map(|&id| report.name_of(id)).collect();
            println!("  {:>3}: {}", choice.value(), names.join(", "));
        }

        for number in &outcome.invalidated_numbers {
            println!("WARNING: {number} was chosen by several players and is INVALID");
        }

        match outcome.resolution {
            Resolution::Override => println!("ZERO vs HUNDRED: the 100 player takes the round!"),
            Resolution::NoValidChoice => println!("No valid numbers this round. Nobody wins."),
            Resolution::Closest if outcome.exact_match && outcome.penalty > 1 => {
                println!("EXACT MATCH! Everyone else loses {} points.", outcome.penalty);
            }
            Resolution::Closest => {}
        }
        if outcome.tied_candidates.len() > 1 {
            println!("Tie between {} players, winner drawn at random.", outcome.tied_candidates.len());
        }
        if let Some(winner) = outcome.winner {
            println!("*** {} wins this round! ***", report.name_of(winner));
        }

        for player in &report.standings {
            let loss = report.loss_of(player.id);
            if loss > 0 {
                let note = if outcome.is_unlucky_tie(player.id) { " (lost the tie-break)" } else { "" };
                println!("   {} loses {loss} point(s){note}", player.name);
            }
        }
        for &id in &report.eliminated {
            println!("XX {} has been eliminated!", report.name_of(id));
        }
    }

    fn on_game_over(&mut self, state: &GameState) {
        println!("\n{BANNER}");
        match state.winner() {
            Some(winner) => println!("GAME CLEAR! {} is the winner!", winner.name),
            None => println!("All players eliminated! No winner!"),
        }
        println!("{BANNER}");
        println!("Final standings:");
        for player in state.players() {
            println!("  {player}");
        }
    }
}
