//! Credential Engine CLI Entry Point
//!
//! Runs one authentication or password change against the PostgreSQL
//! credential store and prints the outcome as JSON.
//! Uses `anyhow` for startup errors; operation failures are reported through
//! `kernel::error::AppError` problem documents.

use std::process::ExitCode;
use std::sync::Arc;

use auth::models::identity_id::IdentityId;
use auth::{
    AuthConfig, AuthError, AuthOutcome, AuthenticateInput, AuthenticateUseCase,
    ChangePasswordInput, ChangePasswordUseCase, PgAuthRepository,
};
use clap::{Parser, Subcommand};
use platform::clock::SystemClock;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "credctl")]
#[command(about = "Credential authentication and password change", long_about = None)]
#[command(version)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Connection pool size
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate by user name or document number
    Authenticate {
        /// User name or document number
        #[arg(short, long)]
        identifier: String,

        #[arg(short, long, env = "CREDCTL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Change the password of an identity and of every identity of the same person
    ChangePassword {
        #[arg(long)]
        identity_id: i64,

        /// Registration code the change was started from
        #[arg(long)]
        registration: Option<String>,

        #[arg(long, env = "CREDCTL_CURRENT_PASSWORD", hide_env_values = true)]
        current_password: String,

        #[arg(long, env = "CREDCTL_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,

        #[arg(long, env = "CREDCTL_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credctl=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let pool = PgPoolOptions::new()
        .max_connections(cli.max_connections)
        .connect(&cli.database_url)
        .await?;

    tracing::info!("Connected to database");

    let store = Arc::new(PgAuthRepository::new(pool));
    let clock = Arc::new(SystemClock);
    let config = Arc::new(AuthConfig::default());

    let result = match cli.command {
        Command::Authenticate {
            identifier,
            password,
        } => AuthenticateUseCase::new(store, clock, config)
            .execute(AuthenticateInput {
                identifier,
                password,
            })
            .await
            .map(|outcome| outcome_json(&outcome)),
        Command::ChangePassword {
            identity_id,
            registration,
            current_password,
            new_password,
            confirm_password,
        } => {
            let identity_id = IdentityId::new(identity_id)?;
            ChangePasswordUseCase::new(store, clock, config)
                .execute(ChangePasswordInput {
                    identity_id,
                    registration,
                    current_password,
                    new_password,
                    confirm_password,
                })
                .await
                .map(|output| json!(output))
        }
    };

    match result {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&error_json(&e))?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn outcome_json(outcome: &AuthOutcome) -> serde_json::Value {
    match outcome {
        AuthOutcome::Authenticated { identity } | AuthOutcome::MustChangePassword { identity } => {
            json!({
                "outcome": if outcome.must_change_password() { "mustChangePassword" } else { "authenticated" },
                "identityId": identity.identity_id,
                "userName": identity.user_name,
                "fullName": identity.full_name,
                "mustChangePassword": outcome.must_change_password(),
            })
        }
        AuthOutcome::MultipleRegistrations { registrations } => json!({
            "outcome": "multipleRegistrations",
            "registrations": registrations,
        }),
    }
}

fn error_json(err: &AuthError) -> serde_json::Value {
    let mut problem = err.to_app_error().to_problem();
    problem["code"] = json!(err.code());
    problem
}
