//! Table access tests: agents, clients, products, daily snapshots, settings.

use chrono::{NaiveDate, Utc};
use tradedesk_core::{
    config::DeskConfig,
    domain::DailyPerformance,
    error::DeskError,
    seed::DemoSeeder,
    service::DataService,
    store::DeskStore,
};

fn store() -> DeskStore {
    let store = DeskStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
        .ensure_team_settings(&DeskConfig::default_test().team_defaults)
        .expect("team settings");
    store
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn snapshot(client_id: &str, date: NaiveDate, revenue: f64) -> DailyPerformance {
    DailyPerformance {
        id: uuid::Uuid::new_v4().to_string(),
        client_id: client_id.to_string(),
        date,
        margin_in: 1_000.0,
        revenue,
        nots_generated: 1,
        created_at: Utc::now(),
    }
}

fn active_agents(store: &DeskStore) -> i64 {
    store.current_month_dashboard().unwrap().active_agents
}

#[test]
fn agent_aggregates_sum_their_clients() {
    let store = store();
    DemoSeeder::new(7).populate(&store, 3, 20).unwrap();

    let agents = store.agents_with_stats().unwrap();
    assert_eq!(agents.len(), 3);

    let clients = store.clients().unwrap();
    for a in &agents {
        let mine: Vec<_> = clients.iter().filter(|c| c.agent_id.as_deref() == Some(a.id.as_str())).collect();
        assert_eq!(a.client_count, Some(mine.len() as i64));
        assert_eq!(a.total_nots, Some(mine.iter().map(|c| c.nots_generated).sum::<i64>()));
        let margin: f64 = mine.iter().map(|c| c.overall_margin).sum();
        assert!((a.total_client_margin.unwrap() - margin).abs() < 1e-6);
        assert_eq!(store.clients_for_agent(&a.id).unwrap().len(), mine.len());
    }
    assert_eq!(clients.len(), 20);
}

#[test]
fn deactivating_an_agent_drops_them_from_the_dashboard() {
    let store = store();
    DemoSeeder::new(11).populate(&store, 2, 4).unwrap();
    assert_eq!(active_agents(&store), 2);

    let agent = store.agents_with_stats().unwrap().remove(0);
    store.set_agent_active(&agent.id, false).unwrap();
    assert_eq!(active_agents(&store), 1);

    assert!(matches!(
        store.set_agent_active("missing", true),
        Err(DeskError::NotFound { entity: "agent", .. })
    ));
}

#[test]
fn client_metrics_update_in_place() {
    let store = store();
    DemoSeeder::new(3).populate(&store, 1, 1).unwrap();
    let c = store.clients().unwrap().remove(0);

    store.update_client_metrics(&c.id, 10.0, 20.0, 30.0, 40.0, 5).unwrap();
    let updated = store.client(&c.id).unwrap().unwrap();
    assert_eq!(
        (updated.margin_in, updated.overall_margin, updated.invested_amount, updated.monthly_revenue, updated.nots_generated),
        (10.0, 20.0, 30.0, 40.0, 5)
    );
    assert!(store.update_client_metrics("missing", 0.0, 0.0, 0.0, 0.0, 0).is_err());
}

#[test]
fn daily_snapshots_upsert_per_client_and_day() {
    let store = store();
    DemoSeeder::new(5).populate(&store, 1, 1).unwrap();
    let c = store.clients().unwrap().remove(0);

    store.record_daily_performance(&snapshot(&c.id, day(2), 10.0)).unwrap();
    store.record_daily_performance(&snapshot(&c.id, day(3), 20.0)).unwrap();
    store.record_daily_performance(&snapshot(&c.id, day(2), 15.0)).unwrap();
    store.record_daily_performance(&snapshot(&c.id, day(9), 99.0)).unwrap();

    let rows = store.daily_performance(&c.id, day(1), day(5)).unwrap();
    assert_eq!(rows.iter().map(|r| (r.date, r.revenue)).collect::<Vec<_>>(), vec![(day(2), 15.0), (day(3), 20.0)]);
}

#[test]
fn products_are_listed_by_name() {
    let store = store();
    DemoSeeder::new(1).populate(&store, 0, 0).unwrap();
    let names: Vec<String> = store.products().unwrap().into_iter().map(|p| p.name).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 5);
}

#[test]
fn thresholds_update_without_moving_the_period() {
    let store = store();
    let settings = store.update_team_thresholds(7_500.0, 12).unwrap();
    assert_eq!(settings.commission_threshold, 7_500.0);
    assert_eq!(settings.not_target_per_client, 12);
    assert_eq!((settings.current_month, settings.current_year), (1, 2024));
}
