//! Deal one complete hand with every party simulated locally.
//!
//! Walks the full protocol: group agreement, per-seat keypairs, the
//! encrypt-then-shuffle pipeline, and the selective reveals, printing
//! the exchanged messages as JSON along the way.

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use mental_poker::config::{ProtocolConfig, DEFAULT_PRIMALITY_ITERATIONS};
use mental_poker::dealing::partial_unlayer;
use mental_poker::messages::{
    RevealRequest, RevealScope, RevealShare, ShuffleRequest, ShuffleResponse,
};
use mental_poker::session::Session;
use mental_poker::shuffling::{encrypt_and_shuffle, Deck};

const LOG_TARGET: &str = "bin::holdem_demo";

#[derive(Debug, Parser)]
#[command(name = "holdem_demo")]
#[command(about = "Deal one dealer-less hold'em hand among simulated parties", long_about = None)]
struct Args {
    /// Number of players seated for the hand
    #[arg(long, env = "HOLDEM_PLAYERS", default_value_t = 4)]
    players: usize,

    /// Optional RNG seed for reproducible runs
    #[arg(long, env = "HOLDEM_RNG_SEED")]
    seed: Option<u64>,

    /// Bit width of the safe-prime modulus
    #[arg(long, env = "HOLDEM_MODULUS_BITS", default_value_t = 32)]
    modulus_bits: u32,

    /// Miller-Rabin rounds per primality check
    #[arg(long, env = "HOLDEM_MR_ITERATIONS", default_value_t = DEFAULT_PRIMALITY_ITERATIONS)]
    mr_iterations: u32,

    /// Toggle structured (JSON) logs
    #[arg(long, env = "HOLDEM_LOG_JSON")]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json);
    run_hand(args)
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }
}

fn run_hand(args: Args) -> Result<()> {
    let config = ProtocolConfig {
        players: args.players,
        modulus_bits: args.modulus_bits,
        primality_iterations: args.mr_iterations,
    };
    let mut rng = args
        .seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);

    let session = Session::establish(config, &mut rng).context("session establishment failed")?;
    info!(
        target: LOG_TARGET,
        p = session.modulus().p,
        q = session.modulus().q,
        players = session.config().players,
        "group parameters agreed"
    );

    let mut staged = Deck::standard();
    println!("plaintext deck: {}", serde_json::to_string(&staged)?);
    for seat in session.keyring().seats() {
        let key = session.keyring().key_pair(seat)?;
        staged = encrypt_and_shuffle(&staged, key, session.modulus(), &mut rng)?;
        let handoff = ShuffleRequest {
            from_party: seat,
            deck: staged.clone(),
        };
        println!("{}", serde_json::to_string(&handoff)?);
    }
    let mut hand = session.adopt_deck(staged)?;
    let reply = ShuffleResponse {
        deck: hand.deck().clone(),
    };
    println!("{}", serde_json::to_string(&reply)?);

    for seat in session.keyring().seats() {
        for position in hand.plan().hole_positions(seat)? {
            let ask = RevealRequest {
                position,
                scope: RevealScope::Owner(seat),
            };
            println!("{}", serde_json::to_string(&ask)?);
        }
        let cards = hand.reveal_hole(seat)?;
        println!("player {seat} hole cards: {} {}", cards[0], cards[1]);
    }

    // spell out the share chain for the first community card
    let first_board_position = hand.plan().board_positions()[0];
    let mut running = hand.ciphertext_at(first_board_position)?;
    for seat in session.keyring().seats() {
        running = partial_unlayer(
            running,
            session.keyring().key_pair(seat)?.d,
            session.modulus(),
        );
        let share = RevealShare {
            position: first_board_position,
            party: seat,
            value: running,
        };
        println!("{}", serde_json::to_string(&share)?);
    }

    for position in hand.plan().board_positions() {
        let ask = RevealRequest {
            position,
            scope: RevealScope::Community,
        };
        println!("{}", serde_json::to_string(&ask)?);
    }
    let board = hand.reveal_community()?;
    println!(
        "community cards: {}",
        board
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let summary = hand.finish()?;
    println!("{}", serde_json::to_string(&summary)?);
    info!(target: LOG_TARGET, players = summary.holes.len(), "hand complete");
    Ok(())
}
