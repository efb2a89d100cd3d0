//! SQLite data service tests: base equity, month close, dashboard stats.

use chrono::Utc;
use serde_json::json;
use tradedesk_core::{
    config::DeskConfig,
    domain::{Agent, Client},
    error::DeskError,
    monthly::MonthlyResetClient,
    service::DataService,
    session::StaticSession,
    store::DeskStore,
    types::Period,
};

fn store() -> DeskStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = DeskStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
        .ensure_team_settings(&DeskConfig::default_test().team_defaults)
        .expect("team settings");
    store
}

fn agent(id: &str, is_active: bool) -> Agent {
    let now = Utc::now();
    Agent {
        id: id.to_string(),
        name: format!("Agent {id}"),
        email: None,
        phone: None,
        commission_rate: 5.0,
        is_active,
        created_at: now,
        updated_at: now,
        client_count: None,
        total_client_margin: None,
        total_client_revenue: None,
        total_nots: None,
    }
}

fn client(id: &str, agent_id: &str, margin_in: f64, revenue: f64, nots: i64, is_new: bool) -> Client {
    let now = Utc::now();
    Client {
        id: id.to_string(),
        name: format!("Client {id}"),
        margin_in,
        overall_margin: margin_in * 10.0,
        invested_amount: margin_in * 20.0,
        monthly_revenue: revenue,
        nots_generated: nots,
        agent_id: Some(agent_id.to_string()),
        created_at: now,
        updated_at: now,
        is_new_client: Some(is_new),
    }
}

/// Two clients on one active agent, plus an inactive agent.
fn populated() -> DeskStore {
    let store = store();
    store.insert_agent(&agent("a1", true)).unwrap();
    store.insert_agent(&agent("a2", false)).unwrap();
    store.insert_client(&client("c1", "a1", 100.0, 40.0, 4, true)).unwrap();
    store.insert_client(&client("c2", "a1", 200.0, 60.0, 6, false)).unwrap();
    store
}

#[test]
fn migrations_and_settings_are_idempotent() {
    let store = store();
    store.migrate().expect("second migration");
    store
        .ensure_team_settings(&DeskConfig::default_test().team_defaults)
        .expect("second ensure");

    let settings = store.team_settings().unwrap();
    assert_eq!((settings.current_month, settings.current_year), (1, 2024));
    assert_eq!(settings.not_target_per_client, 10);
}

#[test]
fn dashboard_view_aggregates_live_clients() {
    let store = populated();
    let stats = store.current_month_dashboard().unwrap();

    assert_eq!((stats.month, stats.year), (1, 2024));
    assert_eq!(stats.total_clients, 2);
    assert_eq!(stats.new_clients, 1);
    assert_eq!(stats.active_agents, 1);
    assert_eq!(stats.total_margin_in, 300.0);
    assert_eq!(stats.total_revenue, 100.0);
    assert_eq!(stats.total_nots, 10);
    assert_eq!(stats.nots_target, 20);
    assert_eq!(stats.progress_percentage, 50.0);
    assert_eq!(stats.base_equity, None);
}

#[test]
fn dashboard_view_on_an_empty_book() {
    let stats = store().current_month_dashboard().unwrap();
    assert_eq!(stats.total_clients, 0);
    assert_eq!(stats.total_margin_in, 0.0);
    assert_eq!(stats.progress_percentage, 0.0);
}

#[test]
fn dashboard_view_requires_team_settings() {
    let store = DeskStore::in_memory().unwrap();
    store.migrate().unwrap();
    assert!(matches!(
        store.current_month_dashboard(),
        Err(DeskError::NotFound { entity: "current_month_dashboard", .. })
    ));
}

#[test]
fn base_equity_is_validated_and_upserted() {
    let store = populated();

    assert!(matches!(
        store.set_monthly_base_equity(13, 2024, 1.0),
        Err(DeskError::InvalidPeriod { month: 13, year: 2024 })
    ));
    assert!(matches!(
        store.set_monthly_base_equity(1, 2024, -5.0),
        Err(DeskError::InvalidBaseEquity(_))
    ));
    assert!(matches!(
        store.set_monthly_base_equity(1, 2024, f64::NAN),
        Err(DeskError::InvalidBaseEquity(_))
    ));

    let payload = store.set_monthly_base_equity(1, 2024, 500_000.0).unwrap();
    assert_eq!(payload, json!({ "month": 1, "year": 2024, "base_equity": 500_000.0 }));
    store.set_monthly_base_equity(1, 2024, 750_000.0).unwrap();

    let jan = Period::new(1, 2024).unwrap();
    assert_eq!(store.base_equity(jan).unwrap(), Some(750_000.0));
    assert_eq!(store.current_month_dashboard().unwrap().base_equity, Some(750_000.0));
}

#[test]
fn reset_archives_every_client_and_advances_the_period() {
    let store = populated();

    let payload = store.reset_monthly_performance(2, 2024).unwrap();
    assert_eq!(
        payload,
        json!({
            "previous_month": 1,
            "previous_year": 2024,
            "new_month": 2,
            "new_year": 2024,
            "archived_clients": 2,
        })
    );

    let settings = store.team_settings().unwrap();
    assert_eq!((settings.current_month, settings.current_year), (2, 2024));

    let c1 = store.client("c1").unwrap().expect("c1");
    assert_eq!(c1.margin_in, 0.0);
    assert_eq!(c1.monthly_revenue, 0.0);
    assert_eq!(c1.nots_generated, 0);
    assert_eq!(c1.is_new_client, Some(false));
    assert_eq!(c1.overall_margin, 1_000.0, "running totals survive the close");

    let archive = store.monthly_performance("c1").unwrap();
    assert_eq!(archive.len(), 1);
    assert_eq!((archive[0].month, archive[0].year), (1, 2024));
    assert_eq!(archive[0].margin_in, 100.0);
    assert_eq!(archive[0].nots_generated, 4);
    assert!(archive[0].is_new_client);
    assert_eq!(archive[0].agent_id.as_deref(), Some("a1"));
}

#[test]
fn reset_rejects_a_period_that_does_not_advance() {
    let store = populated();

    for (m, y) in [(1, 2024), (12, 2023)] {
        assert!(matches!(
            store.reset_monthly_performance(m, y),
            Err(DeskError::PeriodNotAdvanced { month: 1, year: 2024, .. })
        ));
    }
    assert!(matches!(
        store.reset_monthly_performance(0, 2024),
        Err(DeskError::InvalidPeriod { .. })
    ));

    assert_eq!(store.client("c1").unwrap().unwrap().margin_in, 100.0);
    assert!(store.monthly_performance("c1").unwrap().is_empty());
}

#[test]
fn reset_can_skip_months_and_roll_the_year() {
    let store = populated();
    store.reset_monthly_performance(3, 2025).unwrap();
    let settings = store.team_settings().unwrap();
    assert_eq!((settings.current_month, settings.current_year), (3, 2025));
}

#[test]
fn monthly_stats_reads_live_or_archived_figures() {
    let store = populated();
    // Active but without clients: still counted as an active agent.
    store.insert_agent(&agent("a3", true)).unwrap();
    store.set_monthly_base_equity(1, 2024, 900_000.0).unwrap();
    let live = store.get_monthly_dashboard_stats(Some(1), Some(2024)).unwrap();
    store.reset_monthly_performance(2, 2024).unwrap();

    let january = store.get_monthly_dashboard_stats(Some(1), Some(2024)).unwrap();
    assert_eq!(january.len(), 1);
    let jan = &january[0];
    assert_eq!((jan.month, jan.year), (1, 2024));
    assert_eq!(jan.total_clients, 2);
    assert_eq!(jan.new_clients, 1);
    assert_eq!(jan.active_agents, 2);
    assert_eq!(jan.total_margin_in, 300.0);
    assert_eq!(jan.total_nots, 10);
    assert_eq!(jan.progress_percentage, 50.0);
    assert_eq!(jan.base_equity, Some(900_000.0));
    assert_eq!(january, live, "closing a month must not change its figures");

    // Later roster and target changes leave the closed month alone.
    store.set_agent_active("a3", false).unwrap();
    store.update_team_thresholds(5_000.0, 20).unwrap();
    assert_eq!(store.get_monthly_dashboard_stats(Some(1), Some(2024)).unwrap(), live);

    // No parameters: the current (freshly reset) month.
    let current = store.get_monthly_dashboard_stats(None, None).unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!((current[0].month, current[0].year), (2, 2024));
    assert_eq!(current[0].total_margin_in, 0.0);
    assert_eq!(current[0].total_clients, 2);

    // Never archived.
    assert!(store.get_monthly_dashboard_stats(Some(6), Some(2020)).unwrap().is_empty());
}

#[test]
fn client_drives_the_store_end_to_end() {
    let store = populated();
    let client = MonthlyResetClient::new(&store, StaticSession::admin());

    client.set_monthly_base_equity(1, 2024, 250_000.0).unwrap();
    assert_eq!(client.get_current_month_stats().unwrap().base_equity, Some(250_000.0));

    client.reset_monthly_performance(2, 2024).unwrap();
    let jan = client.get_monthly_stats(Some(1), Some(2024)).unwrap().expect("january row");
    assert_eq!(jan.total_revenue, 100.0);
    assert_eq!(client.get_monthly_stats(Some(7), Some(2019)).unwrap(), None);
    assert_eq!(client.error(), None);

    // Store failures carry their own message.
    assert!(client.set_monthly_base_equity(13, 2024, 1.0).is_err());
    assert_eq!(client.error().as_deref(), Some("Invalid period: month 13, year 2024"));
    assert!(!client.loading());
}

#[test]
fn a_month_closed_with_an_empty_book_still_reports() {
    let store = store();
    store.reset_monthly_performance(2, 2024).unwrap();

    let january = store.get_monthly_dashboard_stats(Some(1), Some(2024)).unwrap();
    assert_eq!(january.len(), 1);
    assert_eq!((january[0].total_clients, january[0].nots_target), (0, 0));
    assert_eq!(january[0].progress_percentage, 0.0);
}
