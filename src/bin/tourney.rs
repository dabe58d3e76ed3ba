//! Command line client: edits go to the local cache first, then to the shared server.
//! Run with: cargo run --bin tourney -- --help

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tourney_rating::cli::{resolve_player, Cli, Command, TeamArg};
use tourney_rating::logic::{leaderboard, leaderboard_csv, recent_matches};
use tourney_rating::models::{Document, Match, MatchMode, RatingMethod};
use tourney_rating::sync::{HttpRemote, LocalCache, SyncClient, SyncStatus};

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let cli = Cli::parse();
    execute(cli).await.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

async fn execute(cli: Cli) -> Result<()> {
    let remote = HttpRemote::new(&cli.server, Duration::from_secs(cli.timeout))?;
    let client = SyncClient::start(remote, LocalCache::in_dir(&cli.cache_dir)).await;

    match cli.command {
        Command::Players => print_players(&client.document()),
        Command::Add { name } => {
            let (id, status) = client.commit(|doc| doc.add_player(&name)).await?;
            println!("Added {} ({})", name.trim(), id);
            report(status);
        }
        Command::Remove { player } => {
            let (removed, status) = client
                .commit(|doc| {
                    let id = resolve_player(doc, &player)?;
                    doc.remove_player(&id)
                })
                .await?;
            println!("Removed {}", removed.name);
            report(status);
        }
        Command::Record { mode, name, teams } => {
            let (_, status) = client
                .commit(|doc| {
                    let m = build_match(doc, mode, name, &teams)?;
                    doc.add_match(m)
                })
                .await?;
            println!("Recorded match with {} teams", teams.len());
            report(status);
        }
        Command::Matches { limit } => print_matches(&client.document(), limit),
        Command::Leaderboard { csv } => {
            let standings = leaderboard(&client.ratings());
            if csv {
                print!("{}", leaderboard_csv(&standings)?);
            } else {
                println!("{:>4}  {:<24} {:>8} {:>8}", "Rank", "Player", "Rating", "Δ last");
                for s in standings {
                    println!(
                        "{:>4}  {:<24} {:>8.0} {:>+8.0}",
                        s.rank, s.name, s.rating, s.last_delta
                    );
                }
            }
        }
        Command::History { players } => {
            let doc = client.document();
            let ratings = client.ratings();
            let ids: Vec<String> = if players.is_empty() {
                ratings.keys().cloned().collect()
            } else {
                players
                    .iter()
                    .map(|p| resolve_player(&doc, p))
                    .collect::<Result<Vec<_>, _>>()?
            };
            for id in ids {
                if let Some(p) = ratings.get(&id) {
                    let points: Vec<String> =
                        p.history.iter().map(|r| format!("{r:.0}")).collect();
                    println!("{:<24} {}", p.name, points.join(" "));
                }
            }
        }
        Command::Settings { method, k } => {
            if method.is_none() && k.is_none() {
                print_settings(&client.document());
            } else {
                let (_, status) = client
                    .commit(|doc| {
                        apply_settings(doc, method, k);
                        Ok::<_, std::convert::Infallible>(())
                    })
                    .await?;
                print_settings(&client.document());
                report(status);
            }
        }
        Command::Reset => {
            let status = client.reset().await;
            println!("Reset all players and matches");
            report(status);
        }
    }
    Ok(())
}

fn build_match(
    doc: &Document,
    mode: MatchMode,
    name: Option<String>,
    teams: &[TeamArg],
) -> Result<Match, tourney_rating::DocumentError> {
    let teams = teams
        .iter()
        .map(|t| t.to_team(doc))
        .collect::<Result<Vec<_>, _>>()?;
    let m = Match::new(mode, teams);
    Ok(match name {
        Some(name) => m.named(name),
        None => m,
    })
}

fn apply_settings(doc: &mut Document, method: Option<RatingMethod>, k: Option<f64>) {
    if let Some(method) = method {
        doc.set_method(method);
    }
    if let Some(k) = k {
        doc.set_k(k);
    }
}

fn print_players(doc: &Document) {
    let mut players: Vec<_> = doc.players.values().collect();
    players.sort_by(|a, b| a.name.cmp(&b.name));
    if players.is_empty() {
        println!("No players yet.");
    }
    for (i, p) in players.iter().enumerate() {
        println!("{:>3}  {:<24} {}", i + 1, p.name, p.id);
    }
}

fn print_matches(doc: &Document, limit: usize) {
    for m in recent_matches(&doc.matches, limit) {
        let result: Vec<String> = m
            .teams_by_placement()
            .iter()
            .map(|t| {
                let members: Vec<&str> = t
                    .members
                    .iter()
                    .map(|id| doc.players.get(id).map_or(id.as_str(), |p| p.name.as_str()))
                    .collect();
                match &t.name {
                    Some(name) => format!("{}. {} ({})", t.placement, name, members.join(" & ")),
                    None => format!("{}. {}", t.placement, members.join(" & ")),
                }
            })
            .collect();
        println!(
            "{}  {:<6} {:<16} {}",
            m.date.format("%Y-%m-%d %H:%M"),
            m.mode.to_string(),
            m.name.as_deref().unwrap_or("-"),
            result.join("  ")
        );
    }
}

fn print_settings(doc: &Document) {
    println!("method: {:?}", doc.settings.method);
    println!("k:      {}", doc.settings.k);
}

fn report(status: SyncStatus) {
    match status {
        SyncStatus::Idle => println!("[{}]", status),
        SyncStatus::Conflict => {
            println!("[{}] another client saved first; your change was discarded", status)
        }
        SyncStatus::Error | SyncStatus::Saving => println!("[{}] saved locally only", status),
    }
}
