pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;
mod m20250903_000001_add_consultations;
mod m20250905_000001_add_shop;
mod m20250908_000001_add_reviews;
mod m20250912_000001_add_consultation_idempotency;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_initial::Migration),
            Box::new(m20250903_000001_add_consultations::Migration),
            Box::new(m20250905_000001_add_shop::Migration),
            Box::new(m20250908_000001_add_reviews::Migration),
            Box::new(m20250912_000001_add_consultation_idempotency::Migration),
        ]
    }
}
