//! Example battle - assemble two teams from the built-in catalog, run one
//! simulation, and print the timeline the way a presentation layer would.
//!
//! Usage:
//!   example_battle [difficulty] [--seed N] [--json]

use battle_core::prelude::*;
use battle_core::render;
use battle_core::team::{assemble_ally, generate_enemy_team, StatOverrides};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::env;

/// Fixed ally lineup for the demo
const ALLY_SLUGS: [&str; 3] = ["odin", "thor", "sif"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let difficulty: u32 = args
        .first()
        .filter(|a| !a.starts_with("--"))
        .and_then(|a| a.parse().ok())
        .unwrap_or(1);
    let seed: Option<u64> = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|a| a.parse().ok());
    let as_json = args.iter().any(|a| a == "--json");

    let library = ContentLibrary::builtin();

    let allies: Vec<Combatant> = ALLY_SLUGS
        .iter()
        .enumerate()
        .filter_map(|(slot, slug)| {
            library.character(slug).map(|entry| {
                assemble_ally(entry, format!("ally_{slug}"), StatOverrides::default(), slot)
            })
        })
        .collect();

    let ctx = BattleContext {
        shrine: Some(ShrineContext {
            alignment: Some("Norse".to_string()),
            effigy_id: Some("effigy_warhorn".to_string()),
        }),
        gauntlet: None,
    };

    let outcome = match seed {
        Some(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let enemies = generate_enemy_team(&library, difficulty, 3, &mut rng);
            print_lineup(&allies, &enemies);
            simulate_battle_with_rng(&library, &allies, &enemies, DEFAULT_MAX_TURNS, &ctx, &mut rng)
        }
        None => {
            let mut rng = rand::thread_rng();
            let enemies = generate_enemy_team(&library, difficulty, 3, &mut rng);
            print_lineup(&allies, &enemies);
            simulate_battle(&library, &allies, &enemies, DEFAULT_MAX_TURNS, &ctx)
        }
    };

    if as_json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("failed to serialize outcome: {err}"),
        }
        return;
    }

    // Sample the timeline the way the battle UI paces it: first, last, and
    // every third turn in between
    println!("\n=== Battle ===");
    let last = outcome.timeline.len().saturating_sub(1);
    for (i, event) in outcome.timeline.iter().enumerate() {
        if i == 0 || i == last || i % 3 == 0 {
            println!("[turn {}] {}", event.turn, event.description);
        }
    }

    if let Some(end) = outcome.timeline.last() {
        println!("\n{}", render::hp_panel(&end.allies, &end.enemies));
    }
    println!(
        "\nWinner: {} in {} turns. MVP: {} ({})",
        outcome.winner, outcome.turns, outcome.mvp_name, outcome.mvp_side
    );
}

fn print_lineup(allies: &[Combatant], enemies: &[Combatant]) {
    println!("Allies:\n{}", render::team_list(allies));
    println!("\nEnemies:\n{}", render::team_list(enemies));
}
