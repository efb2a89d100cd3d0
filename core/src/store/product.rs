use super::DeskStore;
use crate::{domain::Product, error::DeskResult};
use rusqlite::params;

impl DeskStore {
    pub fn insert_product(&self, p: &Product) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO products (
                id, name, commission_per_lot, tick_size, tick_value, margin_per_lot, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &p.id,
                &p.name,
                p.commission_per_lot,
                p.tick_size,
                p.tick_value,
                p.margin_per_lot,
                p.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn products(&self) -> DeskResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, commission_per_lot, tick_size, tick_value, margin_per_lot, created_at
             FROM products ORDER BY name ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Product {
                id:                 row.get(0)?,
                name:               row.get(1)?,
                commission_per_lot: row.get(2)?,
                tick_size:          row.get(3)?,
                tick_value:         row.get(4)?,
                margin_per_lot:     row.get(5)?,
                created_at:         row.get(6)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
