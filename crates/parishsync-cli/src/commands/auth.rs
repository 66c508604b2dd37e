use clap::Subcommand;
use parishsync_core::sync::keyring_store;

use super::CliResult;

const GOOGLE_TOKEN_KEY: &str = "google_access_token";

#[derive(Subcommand)]
pub enum AuthAction {
    /// Google Calendar: login / logout / status
    Google {
        #[command(subcommand)]
        action: AuthOp,
    },
}

#[derive(Subcommand)]
pub enum AuthOp {
    /// Store an access token in the OS keyring
    Login {
        /// OAuth access token
        #[arg(long)]
        token: String,
    },
    /// Remove the stored token
    Logout,
    /// Check whether a token is stored
    Status,
}

pub fn run(action: AuthAction) -> CliResult {
    let AuthAction::Google { action } = action;
    match action {
        AuthOp::Login { token } => {
            keyring_store::set(GOOGLE_TOKEN_KEY, &token)?;
            println!("google: token stored");
        }
        AuthOp::Logout => {
            keyring_store::delete(GOOGLE_TOKEN_KEY)?;
            println!("google: logged out");
        }
        AuthOp::Status => match keyring_store::get(GOOGLE_TOKEN_KEY)? {
            Some(_) => println!("google: authenticated"),
            None => println!("google: not authenticated"),
        },
    }
    Ok(())
}
