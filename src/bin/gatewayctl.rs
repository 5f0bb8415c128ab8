use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use role_gate::authz::CasbinEngine;
use role_gate::config::{self, GatewayConfig};
use role_gate::directory::SqliteDirectory;
use role_gate::models::user::Identity;

#[derive(Parser, Debug)]
#[command(author, version, about = "role-gate policy and user tool", long_about = None)]
struct Cli {
    /// Model file; defaults to POLICY_MODEL_PATH or config/auth_model.conf
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    /// Rule table; defaults to POLICY_PATH or config/policy.csv
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decide whether a role may call METHOD on PATH. Exits 1 when denied.
    Check { role: String, path: String, method: String },
    /// Load the model and rule table and report what was found
    Validate,
    /// List rules, optionally only those whose subject is ROLE
    Rules { role: Option<String> },
    /// Add a user to the SQLite directory at DATABASE_URL
    AddUser { id: i64, name: String, role: String },
    /// Print the OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    config::load_env();

    let cli = Cli::parse();
    let config = GatewayConfig::from_env()?;
    let model_path = cli.model.unwrap_or(config.model_path);
    let policy_path = cli.policy.unwrap_or(config.policy_path);

    match cli.command {
        Commands::Check { role, path, method } => {
            let engine = CasbinEngine::load(&model_path, &policy_path).await?;
            let allowed = engine.enforce(&role, &path, &method.to_uppercase())?;
            println!("{}", if allowed { "allow" } else { "deny" });
            if !allowed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Validate => {
            let engine = CasbinEngine::load(&model_path, &policy_path).await?;
            println!("{}: ok, {} rules", policy_path.display(), engine.rule_count());
        }
        Commands::Rules { role } => {
            let engine = CasbinEngine::load(&model_path, &policy_path).await?;
            let rules = match role {
                Some(role) => engine.rules_for(&role),
                None => engine.rules(),
            };
            for rule in rules {
                println!("p, {}", rule.join(", "));
            }
        }
        Commands::AddUser { id, name, role } => {
            let database_url = config.database_url.context("DATABASE_URL not set")?;
            let pool = role_gate::db::init(&database_url).await?;
            let directory = SqliteDirectory::new(pool);
            directory
                .insert(&Identity::new(id, name.clone(), role.clone()))
                .await
                .with_context(|| format!("failed to add user {id}"))?;
            println!("Added user {id} ({name}, {role}); {} users total", directory.count().await?);
        }
        Commands::Openapi => {
            let doc = role_gate::docs::build_openapi();
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
