//! desk-admin: operator CLI for the trading desk dashboard store.
//!
//! Usage:
//!   desk-admin --data-dir ./data init
//!   desk-admin --db desk.db seed --seed 7
//!   desk-admin --db desk.db --admin set-base-equity --month 3 --year 2024 --amount 1000000
//!   desk-admin --db desk.db --admin reset --month 4 --year 2024
//!   desk-admin --db desk.db --admin reset            (advance to the next month)
//!   desk-admin --db desk.db stats --month 3 --year 2024
//!   desk-admin --db desk.db current
//!   desk-admin rubric
//!   desk-admin --db desk.db alerts --week 2024-03-04
//!   desk-admin --db desk.db --admin --ipc-mode

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::Receiver;
use tradedesk_core::{
    config::DeskConfig,
    domain::DashboardStats,
    monthly::MonthlyResetClient,
    rubric::{sections_in, RubricCategory, MAX_SECTION_SCORE},
    seed::DemoSeeder,
    session::StaticSession,
    status::StatusEvent,
    store::DeskStore,
    types::{Month, Period, Year},
};

const COMMANDS: &[&str] = &[
    "init",
    "seed",
    "set-base-equity",
    "reset",
    "stats",
    "current",
    "rubric",
    "alerts",
];

type DeskClient<'a> = MonthlyResetClient<&'a DeskStore, StaticSession>;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetBaseEquity {
        month: Month,
        year: Year,
        base_equity: f64,
    },
    Reset {
        month: Month,
        year: Year,
    },
    MonthlyStats {
        #[serde(default)]
        month: Option<Month>,
        #[serde(default)]
        year: Option<Year>,
    },
    CurrentMonth,
    ClearError,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let admin = args.iter().any(|a| a == "--admin");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");
    let command = args.iter().skip(1).map(String::as_str).find(|a| COMMANDS.contains(a));

    if command == Some("rubric") {
        print_rubric();
        return Ok(());
    }

    let config = DeskConfig::load(data_dir)?;
    let db = flag_value(&args, "--db").unwrap_or(config.database_path.as_str());

    let store = DeskStore::open(db).with_context(|| format!("opening {db}"))?;
    store.migrate()?;
    store.ensure_team_settings(&config.team_defaults)?;

    let session = if admin { StaticSession::admin() } else { StaticSession::viewer() };
    let client = MonthlyResetClient::new(&store, session);

    if ipc_mode {
        return run_ipc_loop(&client);
    }

    match command {
        Some("init") => {
            let settings = store.team_settings()?;
            println!("Initialised {db}");
            println!("  current period:      {:04}-{:02}", settings.current_year, settings.current_month);
            println!("  NOT target / client: {}", settings.not_target_per_client);
            println!("  commission cut-off:  {:.2}", settings.commission_threshold);
        }
        Some("seed") => {
            let seed = parse_arg(&args, "--seed", 42u64);
            let summary = DemoSeeder::new(seed).populate(&store, config.seed.agents, config.seed.clients)?;
            println!(
                "Seeded {db} (seed {seed}): {} agents, {} clients, {} products",
                summary.agents, summary.clients, summary.products
            );
        }
        Some("set-base-equity") => {
            let month = required_arg::<Month>(&args, "--month")?;
            let year = required_arg::<Year>(&args, "--year")?;
            let amount = required_arg::<f64>(&args, "--amount")?;
            let result = client.set_monthly_base_equity(month, year, amount)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some("reset") => {
            let month = optional_arg::<Month>(&args, "--month")?;
            let year = optional_arg::<Year>(&args, "--year")?;
            let (month, year) = match (month, year) {
                (Some(m), Some(y)) => (m, y),
                // Default: close the current month and open the next one.
                (None, None) => {
                    let s = store.team_settings()?;
                    let next = Period::new(s.current_month, s.current_year)?.next();
                    (next.month, next.year)
                }
                _ => bail!("reset takes both --month and --year, or neither"),
            };
            let result = client.reset_monthly_performance(month, year)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Some("stats") => {
            let month = optional_arg::<Month>(&args, "--month")?;
            let year = optional_arg::<Year>(&args, "--year")?;
            match client.get_monthly_stats(month, year)? {
                Some(stats) => print_stats(&stats),
                None => println!("No statistics recorded for that month."),
            }
        }
        Some("current") => print_stats(&client.get_current_month_stats()?),
        Some("alerts") => {
            let week = required_arg::<String>(&args, "--week")?;
            let week = NaiveDate::parse_from_str(&week, "%Y-%m-%d")
                .with_context(|| format!("--week expects YYYY-MM-DD, got {week}"))?;
            let alerts = store.evaluation_alerts(week, &config.evaluation_thresholds)?;
            println!("=== EVALUATION ALERTS (week of {week}) ===");
            for a in &alerts {
                let score = a.total_score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
                println!("  {:<24} {:>5}  {:?}: {}", a.agent_name, score, a.alert_level, a.alert_message);
            }
            if alerts.is_empty() {
                println!("  (no active agents)");
            }
        }
        _ => bail!("expected one of: {}, or --ipc-mode", COMMANDS.join(", ")),
    }

    Ok(())
}

fn run_ipc_loop(client: &DeskClient<'_>) -> Result<()> {
    let events = client.subscribe();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("ipc: unreadable command: {e}");
                let err_json = serde_json::json!({ "error": e.to_string(), "state": client.state() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(serde_json::Value::Null),
            IpcCommand::ClearError => {
                client.clear_error();
                Ok(serde_json::Value::Null)
            }
            IpcCommand::SetBaseEquity { month, year, base_equity } => {
                client.set_monthly_base_equity(month, year, base_equity)
            }
            IpcCommand::Reset { month, year } => client.reset_monthly_performance(month, year),
            IpcCommand::MonthlyStats { month, year } => client
                .get_monthly_stats(month, year)
                .and_then(|s| serde_json::to_value(s).map_err(Into::into)),
            IpcCommand::CurrentMonth => client
                .get_current_month_stats()
                .and_then(|s| serde_json::to_value(s).map_err(Into::into)),
        };

        forward_events(&events, &mut stdout)?;
        let reply = match outcome {
            Ok(result) => serde_json::json!({ "result": result, "state": client.state() }),
            Err(e) => serde_json::json!({ "error": e.to_string(), "state": client.state() }),
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Emit each pending status event as its own `{"event": ...}` line.
fn forward_events(events: &Receiver<StatusEvent>, out: &mut impl Write) -> Result<()> {
    for event in events.try_iter() {
        writeln!(out, "{}", serde_json::json!({ "event": event }))?;
    }
    Ok(())
}

fn print_stats(s: &DashboardStats) {
    println!("=== DASHBOARD {:04}-{:02} ===", s.year, s.month);
    println!("  clients:        {} ({} new)", s.total_clients, s.new_clients);
    println!("  active agents:  {}", s.active_agents);
    println!("  margin in:      {:.2}", s.total_margin_in);
    println!("  overall margin: {:.2}", s.total_overall_margin);
    println!("  invested:       {:.2}", s.total_invested);
    println!("  revenue:        {:.2}", s.total_revenue);
    println!("  NOTs:           {} / {} ({:.1}%)", s.total_nots, s.nots_target, s.progress_percentage);
    match s.base_equity {
        Some(b) => println!("  base equity:    {b:.2}"),
        None => println!("  base equity:    (not set)"),
    }
}

fn print_rubric() {
    println!("=== EVALUATION RUBRIC (each section scored 0-{MAX_SECTION_SCORE}) ===");
    for category in RubricCategory::ALL {
        println!();
        println!("{}", category.label());
        for s in sections_in(category) {
            println!("  {:<24} {:<28} {}", s.id, s.label, s.description);
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn optional_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    match flag_value(args, flag) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{flag}: cannot parse {v:?}")),
    }
}

fn required_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<T> {
    optional_arg(args, flag)?.ok_or_else(|| anyhow::anyhow!("missing required {flag}"))
}
