//! Chat commands.

use anyhow::{bail, Result};
use console::style;
use shop_assistant::{AppState, Chat, Message, PendingReply, Role};
use shop_commerce::ChatId;

use super::{ChatArgs, ChatCommand};
use crate::context::Context;
use crate::output::{product_line, truncate};

/// Run the chat command.
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let state = ctx.start_state().await?;

    let result = match args.command {
        ChatCommand::New { text } => new_chat(&text.join(" "), &state, ctx).await,
        ChatCommand::Send { chat, text } => send(chat, &text.join(" "), &state, ctx).await,
        ChatCommand::List => list_chats(&state, ctx),
        ChatCommand::Show { id } => show_chat(&ChatId::new(id), &state, ctx),
    };

    state.shutdown().await;
    result
}

async fn new_chat(text: &str, state: &AppState, ctx: &Context) -> Result<()> {
    let (chat_id, pending) = state.chats().create_chat(text)?;
    ctx.output.debug(&format!("Created chat {}", chat_id));

    match pending {
        Some(pending) => {
            print_user(text, ctx);
            await_reply(pending, state, ctx).await
        }
        None => {
            if ctx.output.is_json() {
                if let Some(chat) = state.chats().chat(&chat_id) {
                    ctx.output.json(&chat);
                }
                return Ok(());
            }
            ctx.output.success(&format!("Started an empty chat: {}", chat_id));
            Ok(())
        }
    }
}

async fn send(chat: Option<String>, text: &str, state: &AppState, ctx: &Context) -> Result<()> {
    let pending = match chat {
        Some(id) => state.chats().send_message(&ChatId::new(id), text)?,
        None => state.chats().send_to_latest(text)?.1,
    };

    print_user(text, ctx);
    await_reply(pending, state, ctx).await
}

/// Show a spinner until the reply lands, then print it.
async fn await_reply(pending: PendingReply, state: &AppState, ctx: &Context) -> Result<()> {
    let chat_id = pending.chat_id().clone();
    let spinner = ctx.output.spinner("ShopSmart is typing...");
    let replies = pending.wait().await;
    spinner.finish_and_clear();
    let replies = replies?;

    if ctx.output.is_json() {
        if let Some(chat) = state.chats().chat(&chat_id) {
            ctx.output.json(&chat);
        }
        return Ok(());
    }

    for message in &replies {
        print_message(message, state, ctx);
    }
    ctx.output.debug(&format!("Chat {}", chat_id));
    Ok(())
}

fn list_chats(state: &AppState, ctx: &Context) -> Result<()> {
    let chats = state.chats().chats();

    if ctx.output.is_json() {
        ctx.output.json(&chats);
        return Ok(());
    }

    ctx.output.header("Chats");
    if chats.is_empty() {
        ctx.output.info("No chats yet.");
        ctx.output.info("Run `shop chat new <message>` to start one.");
        return Ok(());
    }

    ctx.output
        .table_row(&["ID", "TITLE", "MESSAGES", "CREATED"], &[24, 40, 8, 20]);
    for chat in &chats {
        let title = truncate(&chat.title, 40);
        let count = chat.messages.len().to_string();
        let created = format_created(chat);
        ctx.output
            .table_row(&[chat.id.as_str(), &title, &count, &created], &[24, 40, 8, 20]);
    }

    Ok(())
}

fn show_chat(chat_id: &ChatId, state: &AppState, ctx: &Context) -> Result<()> {
    let Some(chat) = state.chats().chat(chat_id) else {
        bail!("Chat '{}' not found", chat_id);
    };

    if ctx.output.is_json() {
        ctx.output.json(&chat);
        return Ok(());
    }

    ctx.output.header(&chat.title);
    ctx.output.kv("id", chat.id.as_str());
    ctx.output.kv("created", &format_created(&chat));
    ctx.output.line("");

    if chat.messages.is_empty() {
        ctx.output.info("No messages yet.");
    }
    for message in &chat.messages {
        print_message(message, state, ctx);
    }

    Ok(())
}

fn print_user(text: &str, ctx: &Context) {
    ctx.output
        .line(&format!("{} {}", style("You:").cyan().bold(), text.trim()));
}

fn print_message(message: &Message, state: &AppState, ctx: &Context) {
    match message.role {
        Role::User => print_user(message.text.as_deref().unwrap_or_default(), ctx),
        Role::Assistant if message.is_recommendation() => {
            for product in message.recommended_products(state.catalog()) {
                ctx.output.list_item(&product_line(product));
            }
        }
        Role::Assistant => ctx.output.line(&format!(
            "{} {}",
            style("ShopSmart:").magenta().bold(),
            message.text.as_deref().unwrap_or_default()
        )),
    }
}

fn format_created(chat: &Chat) -> String {
    chat.created_at
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
