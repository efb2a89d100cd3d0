//! Deterministic demo data: agents, their clients, and the product list.
//!
//! Same seed = same names, ids and figures. Record timestamps are the
//! only values that differ between runs.

use crate::{
    domain::{Agent, Client, Product},
    error::DeskResult,
    rng::{SeedRng, SeedStream},
    store::DeskStore,
};
use chrono::Utc;

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Amelia", "Bilal", "Chen", "Daniela", "Elif", "Farah", "Gabriel", "Hana", "Ibrahim",
    "Isla", "Jonas", "Kavya", "Leila", "Mateo", "Nadia", "Omar", "Priya", "Rafael", "Sara",
    "Tariq", "Ursula", "Viktor", "Wen", "Yusuf", "Zara",
];

const LAST_NAMES: &[&str] = &[
    "Ahmed", "Baker", "Costa", "Dimitrov", "Evans", "Fernandes", "Ghosh", "Haddad", "Ivanova",
    "Jensen", "Khan", "Lopez", "Mensah", "Nakamura", "Okafor", "Patel", "Quinn", "Rossi",
    "Schmidt", "Tan", "Usman", "Varga", "Wright", "Yilmaz",
];

/// (name, commission_per_lot, tick_size, tick_value, margin_per_lot)
const PRODUCTS: &[(&str, f64, f64, f64, f64)] = &[
    ("Gold Spot",      25.0, 0.01,   1.0,  2_000.0),
    ("Silver Spot",    20.0, 0.001,  5.0,  1_500.0),
    ("Crude Oil",      30.0, 0.01,  10.0,  3_000.0),
    ("EUR/USD",        10.0, 0.0001, 10.0, 1_000.0),
    ("US30 Index",     15.0, 1.0,    1.0,  1_200.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub agents:   usize,
    pub clients:  usize,
    pub products: usize,
}

pub struct DemoSeeder {
    seed: u64,
}

impl DemoSeeder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn agents(&self, count: usize) -> Vec<Agent> {
        let mut rng = SeedRng::new(self.seed, SeedStream::Agents);
        let now = Utc::now();
        (0..count)
            .map(|_| {
                let id = rng.uuid().to_string();
                let (first, last) = (*rng.pick(FIRST_NAMES), *rng.pick(LAST_NAMES));
                let email = format!("{}.{}@desk.example", first.to_lowercase(), last.to_lowercase());
                Agent {
                    id,
                    name: format!("{first} {last}"),
                    email: Some(email),
                    phone: None,
                    commission_rate: (rng.range(2.0, 8.0) * 10.0).round() / 10.0,
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                    client_count: None,
                    total_client_margin: None,
                    total_client_revenue: None,
                    total_nots: None,
                }
            })
            .collect()
    }

    /// Clients spread across `agents` at random. With no agents, clients are unassigned.
    pub fn clients(&self, count: usize, agents: &[Agent]) -> Vec<Client> {
        let mut rng = SeedRng::new(self.seed, SeedStream::Clients);
        let now = Utc::now();
        (0..count)
            .map(|_| {
                let id = rng.uuid().to_string();
                let name = format!("{} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES));
                let invested = rng.range(5_000.0, 250_000.0).round();
                let overall_margin = (invested * rng.range(0.2, 0.9)).round();
                let agent_id = if agents.is_empty() {
                    None
                } else {
                    Some(rng.pick(agents).id.clone())
                };
                Client {
                    id,
                    name,
                    margin_in: (overall_margin * rng.range(0.0, 0.3)).round(),
                    overall_margin,
                    invested_amount: invested,
                    monthly_revenue: (overall_margin * rng.range(0.005, 0.04)).round(),
                    nots_generated: rng.below(25) as i64,
                    agent_id,
                    created_at: now,
                    updated_at: now,
                    is_new_client: Some(rng.chance(0.2)),
                }
            })
            .collect()
    }

    pub fn products(&self) -> Vec<Product> {
        let mut rng = SeedRng::new(self.seed, SeedStream::Products);
        let now = Utc::now();
        PRODUCTS
            .iter()
            .map(|&(name, commission_per_lot, tick_size, tick_value, margin_per_lot)| Product {
                id: rng.uuid().to_string(),
                name: name.to_string(),
                commission_per_lot,
                tick_size,
                tick_value,
                margin_per_lot,
                created_at: now,
            })
            .collect()
    }

    /// Generate and insert a full demo data set. All or nothing.
    pub fn populate(&self, store: &DeskStore, agents: usize, clients: usize) -> DeskResult<SeedSummary> {
        let agent_rows = self.agents(agents);
        let client_rows = self.clients(clients, &agent_rows);
        let product_rows = self.products();
        store.insert_book(&agent_rows, &client_rows, &product_rows)?;
        log::info!(
            "seed={}: inserted {} agents, {} clients, {} products",
            self.seed,
            agent_rows.len(),
            client_rows.len(),
            product_rows.len()
        );
        Ok(SeedSummary {
            agents:   agent_rows.len(),
            clients:  client_rows.len(),
            products: product_rows.len(),
        })
    }
}
