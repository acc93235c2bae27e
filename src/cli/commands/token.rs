use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::JwtKeys;
use crate::cli::utils::{print_failure, print_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a token for a user id")]
    Issue {
        #[arg(long, help = "User UUID to place in the token subject")]
        user: Uuid,
    },

    #[command(about = "Verify a token and print its claims")]
    Inspect {
        #[arg(help = "Token to verify")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat, config: &AppConfig) -> anyhow::Result<()> {
    let keys = JwtKeys::from_config(config);

    match cmd {
        TokenCommands::Issue { user } => {
            let issued = match keys.issue(user) {
                Ok(issued) => issued,
                Err(err) => return print_failure(output_format, ApiError::from(err)),
            };
            if output_format == OutputFormat::Text {
                println!("{}", issued.token);
                return Ok(());
            }
            let expires_in = issued.expires_in();
            print_success(
                output_format,
                "Token issued",
                &json!({
                    "token": issued.token,
                    "expires_in": expires_in,
                    "claims": issued.claims,
                }),
            )
        }
        TokenCommands::Inspect { token } => match keys.verify(&token) {
            Ok(claims) => print_success(
                output_format,
                &format!("Token valid for user {} until {}", claims.sub, claims.exp),
                &json!({ "claims": claims }),
            ),
            Err(err) => print_failure(output_format, ApiError::from(err)),
        },
    }
}
