use sea_orm_migration::prelude::*;

mod m001_create_polls;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m001_create_polls::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("seaql_migrations_polls").into_iden()
    }
}
