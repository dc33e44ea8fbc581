//! Guardian Battles - headless battle simulator
//!
//! Plays seeded battles between generated Guardians through the public
//! engine surface and prints each outcome as JSON or text.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use guardian_battles::battle::{
    Battle, BattleEngine, BattleMove, BattleMoveType, BattleResult, BattleStatus, BattleType,
    EnergyLedger, InMemoryEnergyLedger, MoveParams,
};
use guardian_battles::core::error::Result;
use guardian_battles::core::types::{BattleId, Card, CardId, Guardian, GuardianId};
use guardian_battles::core::{set_config, BattleConfig};

const CARD_NAMES: [&str; 8] = [
    "Ember", "Tidecaller", "Stoneskin", "Gale", "Thornwhip", "Lumen", "Frostbite", "Echo",
];
const DECK_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BattleKind {
    Solo,
    Pvp,
    Coop,
}

impl From<BattleKind> for BattleType {
    fn from(kind: BattleKind) -> Self {
        match kind {
            BattleKind::Solo => BattleType::SoloChallenge,
            BattleKind::Pvp => BattleType::PvpDuel,
            BattleKind::Coop => BattleType::CooperativeBattle,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Headless battle simulator - seeded Guardian battles
#[derive(Parser, Debug)]
#[command(name = "battle_sim")]
#[command(about = "Run seeded Guardian battles and print their results")]
struct Args {
    /// Kind of battle to simulate
    #[arg(long, value_enum, default_value = "pvp")]
    battle_type: BattleKind,

    /// Random seed for the generated Guardians, decks and moves
    ///
    /// Battle ids and timestamps are fresh on every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Energy every Guardian starts with
    #[arg(long, default_value_t = 120)]
    starting_energy: u32,

    /// Number of battles to run
    #[arg(long, default_value_t = 1)]
    battles: u32,

    /// Battle rules file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

/// Outcome of one simulated battle
#[derive(Debug, Serialize)]
struct SimulationReport {
    index: u32,
    seed: u64,
    battle_id: BattleId,
    battle_type: BattleType,
    status: BattleStatus,
    winner: Option<String>,
    total_moves: usize,
    total_energy_spent: u32,
    result: Option<BattleResult>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("guardian_battles=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };
    if set_config(config.clone()).is_err() {
        tracing::warn!("Battle config was already set");
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let battle_type = BattleType::from(args.battle_type);
    tracing::info!(
        seed,
        battles = args.battles,
        battle_type = %battle_type,
        "Starting simulation"
    );

    let reports = (0..args.battles)
        .into_par_iter()
        .map(|index| {
            simulate_battle(
                index,
                seed.wrapping_add(index as u64),
                battle_type,
                args.starting_energy,
                &config,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                print_report(report);
            }
        }
    }

    Ok(())
}

/// Play one battle to completion or until its Guardians run dry
fn simulate_battle(
    index: u32,
    seed: u64,
    battle_type: BattleType,
    starting_energy: u32,
    config: &BattleConfig,
) -> Result<SimulationReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let challenger = random_guardian(&mut rng, format!("Guardian-{}A", index));
    let second = random_guardian(&mut rng, format!("Guardian-{}B", index));
    let deck = random_deck(&mut rng)?;

    let ledger = Arc::new(InMemoryEnergyLedger::new());
    ledger.set_balance(challenger.id, starting_energy);
    ledger.set_balance(second.id, starting_energy);
    let engine = BattleEngine::with_config(ledger.clone(), config.clone());

    // Solo challenges face a synthetic foe that is not a participant
    let (mut battle, fighters) = if battle_type.is_solo() {
        (Battle::solo(challenger.id), vec![challenger.clone()])
    } else {
        (
            Battle::challenge(challenger.id, second.id, battle_type)?,
            vec![challenger.clone(), second.clone()],
        )
    };

    if fighters.iter().any(|g| !engine.can_start_battle(g, battle_type)) {
        tracing::info!(battle = %battle.id(), "Not enough energy to start");
        battle = battle.abandon()?;
        return Ok(report(index, seed, &battle, &fighters, None));
    }
    battle = battle.start()?;

    let move_types: Vec<BattleMoveType> = BattleMoveType::ALL
        .into_iter()
        .filter(|t| t.is_compatible_with(battle_type))
        .collect();

    let mut turn = 0usize;
    while battle.is_active() {
        let actor = &fighters[turn % fighters.len()];
        let other = if battle_type.is_solo() {
            &second
        } else {
            &fighters[(turn + 1) % fighters.len()]
        };
        turn += 1;

        let available = ledger.current_energy_balance(actor.id);
        let affordable: Vec<&Card> = deck
            .iter()
            .filter(|c| c.can_be_played_with(available))
            .collect();
        let Some(card) = affordable.choose(&mut rng).copied() else {
            tracing::info!(battle = %battle.id(), guardian = %actor.id, "Out of energy");
            battle = battle.abandon()?;
            break;
        };
        tracing::debug!(
            guardian = %actor.id,
            available,
            moves_left = engine.max_possible_moves(actor, &deck),
            card = %card.name(),
            "Turn"
        );

        let move_type = move_types
            .choose(&mut rng)
            .copied()
            .unwrap_or(BattleMoveType::Attack);
        let target = match move_type {
            BattleMoveType::Defense => None,
            BattleMoveType::Support if battle_type.is_multiplayer() => Some(other),
            BattleMoveType::Support => None,
            BattleMoveType::Attack | BattleMoveType::Special => Some(other),
        };

        let submitted = BattleMove::new(MoveParams {
            battle_id: battle.id(),
            guardian_id: actor.id,
            card_id: card.id(),
            target_guardian_id: target.map(|t| t.id),
            move_type,
            energy_cost: card.energy_cost(),
            damage_dealt: 0,
            healing_done: 0,
            description: format!("{} {}", actor.name, move_type),
        })?;

        battle = engine.execute_move(&battle, &submitted, card, actor, target)?;
        ledger.spend(actor.id, card.energy_cost());
    }

    let result = if battle.status() == BattleStatus::Completed {
        Some(engine.resolve_battle(&battle, &fighters)?)
    } else {
        None
    };

    Ok(report(index, seed, &battle, &fighters, result))
}

fn random_guardian(rng: &mut ChaCha8Rng, name: String) -> Guardian {
    let id = GuardianId(Uuid::from_bytes(rng.gen()));
    Guardian::new(id, name, rng.gen_range(0..5))
}

fn random_deck(rng: &mut ChaCha8Rng) -> Result<Vec<Card>> {
    CARD_NAMES
        .choose_multiple(rng, DECK_SIZE)
        .map(|name| {
            Card::new(
                CardId(Uuid::from_bytes(rng.gen())),
                *name,
                rng.gen_range(5..=20),
                rng.gen_range(10..=40),
                rng.gen_range(5..=25),
            )
        })
        .collect()
}

fn report(
    index: u32,
    seed: u64,
    battle: &Battle,
    fighters: &[Guardian],
    result: Option<BattleResult>,
) -> SimulationReport {
    let winner = battle.winner_id().and_then(|id| {
        fighters
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.clone())
    });

    SimulationReport {
        index,
        seed,
        battle_id: battle.id(),
        battle_type: battle.battle_type(),
        status: battle.status(),
        winner,
        total_moves: battle.total_moves(),
        total_energy_spent: battle.total_energy_spent(),
        result,
    }
}

fn print_report(report: &SimulationReport) {
    println!("Battle {} ({})", report.index, report.battle_type);
    println!("=============");
    println!("Seed: {}", report.seed);
    println!("Status: {}", report.status);
    println!("Winner: {}", report.winner.as_deref().unwrap_or("none"));
    println!("Moves: {}", report.total_moves);
    println!("Energy spent: {}", report.total_energy_spent);
    if let Some(result) = &report.result {
        for reward in result.xp_rewards() {
            println!("  {} XP -> {}", reward.amount, reward.guardian_id);
        }
        println!("Duration: {}s", result.duration_seconds());
        println!("Efficient: {}", result.was_efficient());
    }
    println!();
}
