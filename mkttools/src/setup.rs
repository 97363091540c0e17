use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use marketplace_engine::{sqlite::db::db_url, AccountApi, SqliteDatabase};
use sqlx::{
    migrate::{MigrateDatabase, Migrator},
    Sqlite,
};

/// Setup commands work locally. They assume that `MKT_DATABASE_URL` is set and points at the marketplace database.
#[derive(Debug, Subcommand)]
pub enum SetupCommand {
    /// Create an admin account. Admins sign in at `/api/admin/login`.
    #[clap(name = "create-admin")]
    CreateAdmin(CreateAdminParams),
    /// Run the database migrations.
    Migrate(MigrateParams),
}

#[derive(Debug, Args)]
pub struct CreateAdminParams {
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct MigrateParams {
    /// The path to the migrations directory. The migrations are embedded in the binary by default, and so this
    /// parameter is optional. If provided, the migrations at <path> will be executed instead.
    #[arg(short, long)]
    pub path: Option<String>,
}

pub async fn handle_setup_command(command: SetupCommand) {
    match command {
        SetupCommand::CreateAdmin(params) => create_admin(params).await,
        SetupCommand::Migrate(params) => migrate_db(params).await,
    }
}

async fn create_admin(params: CreateAdminParams) {
    async fn create(params: &CreateAdminParams) -> Result<i64> {
        create_database_if_not_exist().await?;
        let db = SqliteDatabase::new(1).await?;
        db.run_migrations().await?;
        let admin = AccountApi::new(db).create_admin(&params.email, &params.password).await?;
        Ok(admin.id)
    }
    println!("Creating admin account for {}", params.email);
    match create(&params).await {
        Ok(id) => println!("Admin #{id} created successfully"),
        Err(e) => println!("Error creating admin: {e}"),
    }
}

async fn migrate_db(params: MigrateParams) {
    async fn migrate_embedded() -> Result<()> {
        create_database_if_not_exist().await?;
        println!("Running embedded migrations");
        let db = SqliteDatabase::new(1).await?;
        db.run_migrations().await?;
        Ok(())
    }

    async fn migrate_custom(path: &str) -> Result<()> {
        create_database_if_not_exist().await?;
        println!("Running migrations at: {path}");
        let db = SqliteDatabase::new(1).await?;
        let migrator = Migrator::new(Path::new(path)).await?;
        migrator.run(db.pool()).await?;
        Ok(())
    }

    let result = match &params.path {
        Some(path) => migrate_custom(path).await,
        None => migrate_embedded().await,
    };

    match result {
        Ok(_) => println!("Migrations complete"),
        Err(e) => println!("Error running migrations: {e}"),
    }
}

async fn create_database_if_not_exist() -> Result<()> {
    let db = db_url();
    if !Sqlite::database_exists(&db).await? {
        println!("Creating new database at: {db}");
        Sqlite::create_database(&db).await?;
    }
    Ok(())
}
