//! Token command - mint a development bearer token

use chrono::{Duration, Utc};
use clap::Args;

use crate::config::AuthConfig;
use crate::domain::auth::Role;
use crate::infrastructure::auth::{parse_algorithm, JwtSigner};

#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Role whose permissions the token grants (admin or analyst)
    #[arg(long, default_value_t = Role::Analyst)]
    pub role: Role,

    /// Token subject
    #[arg(long, default_value = "local|developer")]
    pub subject: String,

    /// Lifetime in hours
    #[arg(long, default_value_t = 24)]
    pub ttl_hours: i64,
}

/// Print a token signed with the configured shared secret
pub async fn run(args: TokenArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let token = mint(&config.auth, &args)?;
    println!("{}", token);

    Ok(())
}

fn mint(auth: &AuthConfig, args: &TokenArgs) -> anyhow::Result<String> {
    let secret = auth
        .secret
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("auth.secret must be set to mint tokens"))?;

    let signer = JwtSigner::hmac(
        secret.as_bytes(),
        parse_algorithm(&auth.algorithm)?,
        auth.issuer.clone(),
        auth.audience.clone(),
    )?;

    let ttl = Duration::try_hours(args.ttl_hours)
        .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| anyhow::anyhow!("--ttl-hours {} is out of range", args.ttl_hours))?;

    Ok(signer.sign(&args.subject, &args.role.permissions(), ttl)?)
}
