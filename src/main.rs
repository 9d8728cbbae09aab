mod account;
mod config;
mod open_url;
mod session;
mod stories;
mod ui;
mod util;

use anyhow::{Context, Result};
use console::Term;
use std::env;
use tracing::{error, info};

use session::SessionStore;
use stories::{Flow, HttpStoryApi, StoryApi, StoryPage, User, View};
use util::sanitize::sanitize_for_terminal;

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let mut config_override: Option<String> = None;
    let mut api_override: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_override = args.next(),
            "--api" => api_override = args.next(),
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            other => eprintln!("ignoring unknown argument: {other}"),
        }
    }

    let cfg = config::load(config_override, api_override)?;
    if let Err(e) = init_tracing() {
        eprintln!("logging disabled: {e:#}");
    }
    info!(base_url = %cfg.base_url, "starting");

    let _ = Term::stdout().clear_screen();
    println!("Loading stories from {} ...", cfg.base_url);

    let api = HttpStoryApi::new(&cfg.base_url, cfg.page_size)?;
    let store = SessionStore::new();
    let user = account::restore(&api, &store).await;
    let mut page = StoryPage::load(api, user)
        .await
        .with_context(|| format!("failed to load stories from {}", cfg.base_url))?;

    if let Err(e) = main_menu(&cfg, &mut page, &store).await {
        error!("menu error: {e:#}");
        return Err(e);
    }
    info!("shut down cleanly");
    Ok(())
}

async fn main_menu<A: StoryApi>(
    cfg: &config::RuntimeConfig,
    page: &mut StoryPage<A>,
    store: &SessionStore,
) -> Result<()> {
    #[derive(Clone, Copy)]
    enum Item {
        Browse(View),
        Submit,
        Refresh,
        Login,
        Signup,
        Logout,
        Quit,
    }

    let mut status: Option<String> = None;
    loop {
        let mut items = vec![(Item::Browse(View::All), "All stories")];
        let heading = menu_heading(page.user());
        if page.user().is_some() {
            items.extend([
                (Item::Browse(View::Favorites), "Favorites"),
                (Item::Browse(View::Mine), "My stories"),
                (Item::Submit, "Submit a story"),
            ]);
        }
        items.push((Item::Refresh, "Refresh"));
        if page.user().is_some() {
            items.push((Item::Logout, "Log out"));
        } else {
            items.extend([(Item::Login, "Log in"), (Item::Signup, "Sign up")]);
        }
        items.push((Item::Quit, "Quit"));
        let labels: Vec<&str> = items.iter().map(|(_, l)| *l).collect();

        let choice = ui::prompt_menu(
            &heading,
            &labels,
            Some(0),
            cfg.header.as_deref(),
            status.as_deref(),
        )?;
        let item = match choice {
            ui::MenuChoice::Back | ui::MenuChoice::Quit => break,
            ui::MenuChoice::Index(i) => match items.get(i) {
                Some((item, _)) => *item,
                None => continue,
            },
        };

        status = match item {
            Item::Browse(view) => match stories::browse(cfg, page, view).await? {
                Flow::Quit => break,
                Flow::Stay => None,
            },
            Item::Submit => Some(stories::submit(page).await?),
            Item::Refresh => Some(match page.reload().await {
                Ok(()) if page.stories().is_empty() => "no stories yet".to_string(),
                Ok(()) => format!("{} stories", page.stories().len()),
                Err(e) => format!("refresh failed: {e}"),
            }),
            Item::Login => Some(account::login(page, store).await?),
            Item::Signup => Some(account::signup(page, store).await?),
            Item::Logout => Some(account::logout(page, store)?),
            Item::Quit => break,
        };
    }
    Ok(())
}

fn menu_heading(user: Option<&User>) -> String {
    match user {
        Some(u) => format!("Main Menu - logged in as {}", sanitize_for_terminal(&u.username)),
        None => "Main Menu - not logged in".to_string(),
    }
}

/// Logs go to a file under the config directory; the terminal belongs to the menus.
fn init_tracing() -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let log_dir = config::config_dir()
        .context("no config directory (set HOME or XDG_CONFIG_HOME)")?
        .join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("snooze-cli.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snooze_cli=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

fn print_help() {
    println!("snooze-cli");
    println!("Usage: snooze-cli [--config <path>] [--api <url>]");
    println!("  --config <path>  Path to a config.toml");
    println!("  --api <url>      Base URL of the stories API");
}
