//! Shared fixtures for repository tests.
//!
//! Every test gets its own in-memory database with migrations applied, so
//! tests never see each other's writes.

use crate::pool::{Database, DbConfig};
use cafe_core::{Category, DiningTable, MenuItem, Role, User};

/// A small seeded cafe: one category, two drinks, two tables, two accounts.
pub struct Fixtures {
    pub coffee_category: Category,
    /// 35,000 VND.
    pub latte: MenuItem,
    /// 25,000 VND.
    pub espresso: MenuItem,
    pub table: DiningTable,
    pub table2: DiningTable,
    pub customer: User,
    pub staff: User,
}

/// An empty migrated in-memory database.
pub async fn fresh_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// A migrated in-memory database with the standard fixtures loaded.
pub async fn seeded_db() -> (Database, Fixtures) {
    let db = fresh_db().await;

    let coffee_category = db
        .menu()
        .create_category("Cà phê", Some("Coffee drinks"))
        .await
        .expect("category");
    let latte = db
        .menu()
        .create_item(Some(coffee_category.id), "Latte", None, 35_000)
        .await
        .expect("latte");
    let espresso = db
        .menu()
        .create_item(Some(coffee_category.id), "Espresso", None, 25_000)
        .await
        .expect("espresso");

    let table = db.tables().create(1, 4).await.expect("table 1");
    let table2 = db.tables().create(2, 2).await.expect("table 2");

    let customer = db
        .users()
        .create("khach", "pw", Role::Customer, None, None)
        .await
        .expect("customer");
    let staff = db
        .users()
        .create("thungan", "pw", Role::Staff, None, None)
        .await
        .expect("staff");

    let fixtures = Fixtures {
        coffee_category,
        latte,
        espresso,
        table,
        table2,
        customer,
        staff,
    };

    (db, fixtures)
}
