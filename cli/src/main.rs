//! # Tile-Merge CLI
//!
//! Command-line host for the rules engine: play interactively in the
//! terminal or run headless simulations with simple move policies.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tile_merge_core::{Direction, GameConfig, GameSession, GameState};

#[derive(Parser, Debug)]
#[command(name = "tile-merge")]
#[command(author, version, about = "Play the tile-merge puzzle in the terminal or run simulations")]
struct Args {
    /// Run in interactive mode (default if no other mode specified)
    #[arg(short, long)]
    interactive: bool,

    /// Number of episodes to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// TOML file with game settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid side length
    #[arg(long)]
    size: Option<usize>,

    /// Probability that a spawned tile is a 4
    #[arg(long)]
    four_probability: Option<f64>,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Random legal moves
    Random,
    /// Cycle through moves: Left, Down, Right, Up
    Cycle,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = load_config(&args)?;
    info!("using config {:?}", config);

    match args.episodes {
        Some(episodes) if !args.interactive => run_headless(&args, &config, episodes),
        _ => run_interactive(&args, &config),
    }
}

/// Merge the optional TOML file with command-line overrides.
fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(size) = args.size {
        config.size = size;
        config.initial_tiles = config.initial_tiles.min(size * size);
    }
    if let Some(p) = args.four_probability {
        config.four_probability = p;
    }
    config.validate().context("invalid game settings")?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: GameConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

fn new_session(config: &GameConfig, seed: u64) -> Result<GameSession> {
    GameSession::new(config.clone(), SmallRng::seed_from_u64(seed))
        .context("failed to start a game")
}

/// Run interactive mode where user plays with keyboard.
fn run_interactive(args: &Args, config: &GameConfig) -> Result<()> {
    let mut game = new_session(config, args.seed)?;
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];

    // Set terminal to raw mode for single-key input
    let _raw = RawMode::enable();
    redraw(&game)?;

    loop {
        let bytes_read = stdin.read(&mut buffer).context("failed to read input")?;
        if bytes_read == 0 {
            break;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(dir) => {
                if game.is_over() {
                    continue;
                }
                let had_won = game.has_won();
                let outcome = game.apply_move(dir)?;
                redraw(&game)?;

                if outcome.reward > 0 {
                    println!("  +{} points!", outcome.reward);
                }
                if outcome.won && !had_won {
                    println!("  You reached {}! Keep going.", game.max_tile());
                }
                if outcome.state == GameState::Over {
                    println!("\n  *** GAME OVER ***");
                    println!("  Final Score: {}", game.score());
                    println!("  Max Tile: {}", game.max_tile());
                    println!("\n  Press R to restart or Q to quit");
                }
            }
            InputAction::Restart => {
                game.restart();
                redraw(&game)?;
            }
            InputAction::Quit => {
                println!("\nGoodbye!");
                break;
            }
            InputAction::None => {}
        }
    }

    Ok(())
}

fn redraw(game: &GameSession) -> Result<()> {
    println!("\x1b[2J\x1b[H"); // Clear screen
    println!("=== Tile Merge ===");
    println!("Controls: WASD or Arrow Keys | Q to quit | R to restart\n");
    print!("{}", game);
    io::stdout().flush()?;
    Ok(())
}

/// Run headless simulation mode.
fn run_headless(args: &Args, config: &GameConfig, episodes: u32) -> Result<()> {
    if episodes == 0 {
        anyhow::bail!("--episodes must be at least 1");
    }

    let mut scores: Vec<u64> = Vec::with_capacity(episodes as usize);
    let mut tile_counts: BTreeMap<u32, u32> = BTreeMap::new();
    let mut wins = 0u32;

    // Use a separate RNG for move selection
    let mut policy_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1000));

    for episode in 0..episodes {
        let episode_seed = args.seed.wrapping_add(episode as u64);
        let mut game = new_session(config, episode_seed)?;
        let mut steps = 0;
        let mut cycle = 0;

        while !game.is_over() && (args.max_steps == 0 || steps < args.max_steps) {
            let dir = match args.policy {
                Policy::Random => select_random_move(&game, &mut policy_rng),
                Policy::Cycle => select_cycle_move(&game, &mut cycle),
            };

            let Some(dir) = dir else {
                // No legal move but not yet marked over: any move settles it.
                game.apply_move(Direction::Up)?;
                break;
            };
            game.apply_move(dir)?;
            steps += 1;

            if args.verbose {
                println!("Episode {} Step {}: {}", episode + 1, steps, dir);
                print!("{}", game);
            }
        }

        debug!(
            "episode {} finished: score={} max_tile={} steps={}",
            episode + 1,
            game.score(),
            game.max_tile(),
            steps
        );
        if args.verbose {
            println!(
                "Episode {}: Score={}, MaxTile={}, Steps={}",
                episode + 1,
                game.score(),
                game.max_tile(),
                steps
            );
        }

        scores.push(game.score());
        *tile_counts.entry(game.max_tile()).or_insert(0) += 1;
        if game.has_won() {
            wins += 1;
        }
    }

    // Compute statistics
    let total: u64 = scores.iter().sum();
    let avg_score = total as f64 / episodes as f64;
    scores.sort_unstable();
    let mid = scores.len() / 2;
    let median_score = if scores.len() % 2 == 0 {
        (scores[mid - 1] + scores[mid]) as f64 / 2.0
    } else {
        scores[mid] as f64
    };
    let max_tile_overall = tile_counts.keys().next_back().copied().unwrap_or(0);

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", episodes);
    println!("policy={:?}", args.policy);
    println!("seed={}", args.seed);
    println!("size={}", config.size);
    println!("max_steps={}", args.max_steps);
    println!("avg_score={:.2}", avg_score);
    println!("median_score={:.2}", median_score);
    println!("min_score={}", scores.first().unwrap_or(&0));
    println!("max_score={}", scores.last().unwrap_or(&0));
    println!("max_tile_overall={}", max_tile_overall);
    println!("wins={}", wins);

    let distribution: Vec<String> = tile_counts
        .iter()
        .map(|(tile, count)| format!("{}:{}", tile, count))
        .collect();
    println!("tile_distribution={}", distribution.join(","));

    Ok(())
}

/// Select a random legal move.
fn select_random_move(game: &GameSession, rng: &mut SmallRng) -> Option<Direction> {
    let legal = game.legal_moves();
    let choices: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| legal[d.index()])
        .collect();
    choices.choose(rng).copied()
}

/// Select moves in a cycle: Left, Down, Right, Up.
fn select_cycle_move(game: &GameSession, cycle: &mut usize) -> Option<Direction> {
    const ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];
    let legal = game.legal_moves();

    // Try moves in cycle order, starting from current position
    for _ in 0..ORDER.len() {
        let dir = ORDER[*cycle % ORDER.len()];
        *cycle += 1;
        if legal[dir.index()] {
            return Some(dir);
        }
    }

    None
}

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Move(Direction),
    Restart,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        // Control keys
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc
        [b'r'] | [b'R'] => InputAction::Restart,

        // WASD keys
        [key] => std::str::from_utf8(&[*key])
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(InputAction::None, InputAction::Move),

        _ => InputAction::None,
    }
}

/// Puts stdin into non-canonical, no-echo mode until dropped.
struct RawMode {
    #[cfg(unix)]
    saved: Option<libc::termios>,
}

#[cfg(unix)]
impl RawMode {
    fn enable() -> Self {
        use std::os::unix::io::AsRawFd;
        let fd = io::stdin().as_raw_fd();
        // SAFETY: termios is plain data; tcgetattr fills it or reports failure.
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut termios) != 0 {
                return RawMode { saved: None };
            }
            let saved = termios;
            termios.c_lflag &= !(libc::ICANON | libc::ECHO);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;
            libc::tcsetattr(fd, libc::TCSANOW, &termios);
            RawMode { saved: Some(saved) }
        }
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        if let Some(saved) = self.saved {
            // SAFETY: restores the attributes captured in `enable`.
            unsafe {
                libc::tcsetattr(io::stdin().as_raw_fd(), libc::TCSANOW, &saved);
            }
        }
    }
}

#[cfg(not(unix))]
impl RawMode {
    fn enable() -> Self {
        // Interactive mode will require Enter after each key
        RawMode {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arrow_keys() {
        assert_eq!(parse_input(&[27, 91, 65]), InputAction::Move(Direction::Up));
        assert_eq!(parse_input(&[27, 91, 68]), InputAction::Move(Direction::Left));
    }

    #[test]
    fn test_parse_wasd_and_controls() {
        assert_eq!(parse_input(b"w"), InputAction::Move(Direction::Up));
        assert_eq!(parse_input(b"D"), InputAction::Move(Direction::Right));
        assert_eq!(parse_input(b"r"), InputAction::Restart);
        assert_eq!(parse_input(b"q"), InputAction::Quit);
        assert_eq!(parse_input(b"x"), InputAction::None);
    }

    #[test]
    fn test_cycle_skips_illegal_moves() {
        let grid = tile_merge_core::Grid::from_rows(&[[2, 0], [0, 0]]).unwrap();
        let game = GameSession::from_grid(
            grid,
            GameConfig::with_size(2),
            SmallRng::seed_from_u64(0),
        )
        .unwrap();
        let mut cycle = 0;
        // Left is a no-op for a tile already in the corner; Down is next.
        assert_eq!(select_cycle_move(&game, &mut cycle), Some(Direction::Down));
        assert_eq!(cycle, 2);
    }

    #[test]
    fn test_config_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        fs::write(&path, "size = 5\nfour_probability = 0.25\n").unwrap();

        let args = Args::parse_from([
            "tile-merge",
            "--config",
            path.to_str().unwrap(),
            "--four-probability",
            "0.5",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.size, 5);
        assert_eq!(config.four_probability, 0.5);
        assert_eq!(config.win_value, Some(2048));
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let args = Args::parse_from(["tile-merge", "--size", "0"]);
        assert!(load_config(&args).is_err());
    }
}
