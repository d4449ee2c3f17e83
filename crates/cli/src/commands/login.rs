//! Interactive sign-in, storing the session for later board runs.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password, Select};

use taskdeck_api::ApiClient;

use crate::config::{Config, Credentials};

pub async fn run(config: Config) -> Result<()> {
    let client = ApiClient::new(&config.api_url)?;
    let theme = ColorfulTheme::default();

    let mode = Select::with_theme(&theme)
        .with_prompt("Account")
        .items(&["Sign in", "Create account"])
        .default(0)
        .interact()?;

    let name: Option<String> = if mode == 1 {
        Some(
            Input::with_theme(&theme)
                .with_prompt("Name")
                .interact_text()?,
        )
    } else {
        None
    };
    let email: String = Input::with_theme(&theme)
        .with_prompt("Email")
        .interact_text()?;
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()?;

    let auth = match &name {
        Some(name) => client.register(name, &email, &password).await,
        None => client.login(&email, &password).await,
    }
    .context("Authentication failed")?;

    let credentials = Credentials {
        token: auth.access_token,
        user: auth.user,
    };
    credentials.save(&config)?;

    println!(
        "{} signed in as {}",
        "✓".green(),
        credentials.user.email.bold()
    );
    Ok(())
}
