//! Development token minting.

use clap::Args;

use crate::output;
use studyhub_auth::JwtEncoder;
use studyhub_core::error::AppError;
use studyhub_core::types::UserId;
use studyhub_entity::user::UserRole;

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Subject (user ID) of the token
    #[arg(short, long)]
    pub user_id: String,

    /// Email claim
    #[arg(short, long)]
    pub email: String,

    /// Role claim (`admin` or `user`)
    #[arg(short, long, default_value = "user")]
    pub role: UserRole,

    /// Lifetime in minutes (defaults to `auth.dev_token_ttl_minutes`)
    #[arg(long)]
    pub ttl: Option<u64>,
}

/// Execute the token command
pub async fn execute(args: &TokenArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let user_id: UserId = args.user_id.parse()?;
    let ttl = args.ttl.unwrap_or(config.auth.dev_token_ttl_minutes);
    let ttl = i64::try_from(ttl).map_err(|_| AppError::validation("Token lifetime too large"))?;

    if config.auth.uses_default_secret() {
        output::print_warning("Signing with the default development secret");
    }

    let encoder = JwtEncoder::new(&config.auth);
    let token = encoder.mint(&user_id, args.email.trim(), args.role, ttl)?;
    println!("{token}");
    Ok(())
}
