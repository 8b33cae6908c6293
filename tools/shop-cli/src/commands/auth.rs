//! Demo authentication commands.

use anyhow::{bail, Result};
use console::style;
use shop_assistant::{AppState, AuthNotice, LoginRequest, SignupRequest, SocialProvider};

use super::{AuthArgs, AuthCommand};
use crate::context::Context;

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    let state = ctx.start_state().await?;
    let result = run_with(args, &state, ctx);
    state.shutdown().await;
    result
}

fn run_with(args: AuthArgs, state: &AppState, ctx: &Context) -> Result<()> {
    let auth = state.auth();

    let notice = match args.command {
        AuthCommand::Login { email, password } => auth.login(&LoginRequest::new(email, password))?,
        AuthCommand::Signup {
            name,
            email,
            password,
        } => auth.signup(&SignupRequest::new(name, email, password))?,
        AuthCommand::Social { provider } => {
            let Some(provider) = SocialProvider::parse(&provider) else {
                bail!("Unknown provider '{}'. Use google, x, or facebook", provider);
            };
            auth.social_login(provider)
        }
        AuthCommand::Whoami => {
            print_profile(state, ctx);
            return Ok(());
        }
    };

    print_notice(&notice, ctx);
    Ok(())
}

fn print_profile(state: &AppState, ctx: &Context) {
    let profile = state.profile();
    if ctx.output.is_json() {
        ctx.output.json(&profile);
        return;
    }

    let user = &profile.user;
    ctx.output.header(&format!("{} ({})", user.name, user.initials()));
    ctx.output.kv("id", user.id.as_str());
    ctx.output.kv("email", &user.email);
    ctx.output.kv("favorites", &profile.favorites.to_string());
    ctx.output.kv("viewed", &profile.viewed.to_string());
    ctx.output.kv("chats", &profile.chats.to_string());
}

fn print_notice(notice: &AuthNotice, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(notice);
        return;
    }
    ctx.output
        .line(&style(&notice.title).yellow().bold().to_string());
    ctx.output.warn(&notice.description);
}
