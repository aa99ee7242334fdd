//! Seed a user directly in the database, bypassing HTTP.
//!
//!   create_user "Jean Dupont" jean@example.com "Passw0rd!"
//!   create_user "Jihane Admin" jihane@example.com "S3cret!pass" admin

use anyhow::bail;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;

use bright_smile_api::auth::password::hash_password;
use bright_smile_api::auth::repo::{Role, User};
use bright_smile_api::config::AppConfig;
use bright_smile_api::validation::is_valid_email;

#[derive(Debug, Parser)]
#[command(name = "create_user", about = "Create a user in the clinic database")]
struct Args {
    /// Display name, e.g. "Jean Dupont"
    full_name: String,
    email: String,
    password: String,
    /// Either "user" or "admin"
    #[arg(default_value = "user")]
    role: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let full_name = args.full_name.trim();
    let email = args.email.trim();
    if full_name.is_empty() {
        bail!("full name must not be empty");
    }
    if !is_valid_email(email) {
        bail!("invalid email format");
    }
    let Some(role) = Role::parse(&args.role) else {
        bail!("role must be 'user' or 'admin'");
    };

    let config = AppConfig::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;

    let hash = hash_password(&args.password)?;

    match User::insert(&db, full_name, email, &hash, role).await {
        Ok(user) => {
            println!("OK: user {} created with id {}", user.email, user.id);
            Ok(())
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            bail!("a user with this email already exists")
        }
        Err(e) => Err(e.into()),
    }
}
