use std::env;
use std::net::SocketAddr;

use contracts::{DayPhase, QuestTemplate, SessionConfig};
use kernel_api::{serve, GameApi, DEFAULT_SLOT};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_SQLITE_PATH: &str = "questboard_saves.sqlite";

fn print_usage() {
    println!("questboard <command>");
    println!("commands:");
    println!("  status");
    println!("  new [seed]");
    println!("    starts over on day 1 and overwrites the save slot");
    println!("  play [days]");
    println!("    plays whole days with a simple drafting policy (default 1)");
    println!("  saves");
    println!("  serve [addr]");
    println!("    default addr: 127.0.0.1:8080");
    println!("env: QUESTBOARD_SQLITE_PATH (default {DEFAULT_SQLITE_PATH}), QUESTBOARD_SLOT (default {DEFAULT_SLOT})");
}

fn env_or(key: &str, fallback: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn parse_socket_addr(value: Option<&String>) -> Result<SocketAddr, String> {
    let raw = value.map(String::as_str).unwrap_or("127.0.0.1:8080");
    raw.parse::<SocketAddr>()
        .map_err(|_| format!("invalid addr: {raw}"))
}

fn parse_optional_seed(value: Option<&String>) -> Result<Option<i32>, String> {
    value
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| format!("invalid seed: {raw}"))
        })
        .transpose()
}

fn parse_days(value: Option<&String>) -> Result<u32, String> {
    match value {
        None => Ok(1),
        Some(raw) => match raw.parse::<u32>() {
            Ok(days) if days > 0 => Ok(days),
            _ => Err(format!("invalid days: {raw}")),
        },
    }
}

fn open_game() -> Result<GameApi, String> {
    let sqlite_path = env_or("QUESTBOARD_SQLITE_PATH", DEFAULT_SQLITE_PATH);
    let slot = env_or("QUESTBOARD_SLOT", DEFAULT_SLOT);
    GameApi::start_or_load(SessionConfig::default(), &sqlite_path, &slot, None)
        .map_err(|err| format!("failed to open save store {sqlite_path}: {err}"))
}

fn advance_until(api: &mut GameApi, phase: DayPhase) -> Result<(), String> {
    while api.status().day_phase != phase {
        if !api.advance() {
            return Err(format!("stuck in {}", api.status().day_phase));
        }
    }
    Ok(())
}

fn credibility_of(api: &GameApi, info_id: &str) -> Option<i32> {
    api.infos()
        .iter()
        .find(|info| info.id == info_id)
        .map(|info| info.credibility)
}

/// Investigates the most credible lead until it is certain or the action
/// points run out. A point is only spent for an accepted investigation.
fn sharpen_best_lead(api: &mut GameApi) -> u32 {
    let Some(best) = api
        .infos()
        .iter()
        .max_by_key(|info| info.credibility)
        .map(|info| info.id.clone())
    else {
        return 0;
    };

    let mut investigations = 0;
    while api.session().action_points().current() > 0
        && credibility_of(api, &best).is_some_and(|credibility| credibility < 100)
        && api.investigate(&best)
    {
        if !api.spend_action_points(1) {
            break;
        }
        investigations += 1;
    }
    investigations
}

/// One full day: sharpen the best lead, draft the most credible unused leads
/// up to the daily cap, submit, and resolve.
fn play_day(api: &mut GameApi) -> Result<(), String> {
    advance_until(api, DayPhase::InfoPhase)?;
    sharpen_best_lead(api);

    let mut leads = api
        .infos()
        .iter()
        .map(|info| (info.credibility, info.id.clone()))
        .collect::<Vec<_>>();
    leads.sort_by(|a, b| b.cmp(a));

    advance_until(api, DayPhase::QuestDraftPhase)?;
    let cap = api.session().config().max_submissions_per_day;
    let mut drafts = Vec::new();
    for (credibility, id) in leads.iter().take(cap) {
        let risk = if *credibility >= 60 { 3 } else { 2 };
        if let Some(draft) =
            api.create_draft(QuestTemplate::Investigation, &[id.clone()], risk, risk * 100, 3)
        {
            drafts.push(draft.id);
        }
    }

    advance_until(api, DayPhase::SubmissionPhase)?;
    for draft_id in &drafts {
        if !api.try_submit(draft_id) {
            warn!(draft_id = %draft_id, "submission rejected");
        }
    }

    advance_until(api, DayPhase::ResolutionPhase)?;
    let day = api.status().current_day;
    for result in api.last_results() {
        let reasons = result
            .top_reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "day {day} {} {:?} chance={}% [{reasons}]",
            result.quest_id, result.outcome, result.final_success_chance
        );
    }

    advance_until(api, DayPhase::DayEnd)?;
    advance_until(api, DayPhase::InfoPhase)?;
    Ok(())
}

fn fail(err: String) -> ! {
    eprintln!("error: {err}");
    print_usage();
    std::process::exit(2);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        Some("status") => match open_game() {
            Ok(api) => println!("{}", api.status()),
            Err(err) => fail(err),
        },
        Some("new") => {
            let seed = parse_optional_seed(args.get(2)).unwrap_or_else(|err| fail(err));
            let mut api = open_game().unwrap_or_else(|err| fail(err));
            let status = api.restart(seed);
            println!("new game seed={}: {}", status.seed, status);
        }
        Some("play") => {
            let days = parse_days(args.get(2)).unwrap_or_else(|err| fail(err));
            let mut api = open_game().unwrap_or_else(|err| fail(err));
            for _ in 0..days {
                if let Err(err) = play_day(&mut api) {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
            if let Some(error) = api.last_persistence_error() {
                eprintln!("persistence error: {error}");
                std::process::exit(1);
            }
            println!("{}", api.status());
        }
        Some("saves") => {
            let api = open_game().unwrap_or_else(|err| fail(err));
            match api.list_slots() {
                Ok(slots) => {
                    for summary in slots {
                        println!(
                            "{} day={} seed={} saved_at={}",
                            summary.slot, summary.current_day, summary.seed, summary.saved_at
                        );
                    }
                }
                Err(err) => fail(err.to_string()),
            }
        }
        Some("serve") => {
            let addr = parse_socket_addr(args.get(2)).unwrap_or_else(|err| fail(err));
            let api = open_game().unwrap_or_else(|err| fail(err));
            println!("serving api on http://{addr}");
            if let Err(err) = serve(addr, api).await {
                eprintln!("server error: {err}");
                std::process::exit(1);
            }
        }
        _ => {
            print_usage();
        }
    }
}
