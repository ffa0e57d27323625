use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ContentApi;
use crate::config::{self, Config};
use crate::http::Client;
use crate::logging;
use crate::models::Post;
use crate::pagination::{Listing, ListingSource, LoadOutcome, Pager};
use crate::session::{self, Status};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    WhoAmI,
    Feed { pages: usize },
}

/// Wiring shared by every view: one client, one session, many readers.
pub struct Runtime {
    pub config: Config,
    pub client: Arc<Client>,
    pub session: Arc<session::Controller>,
    pub content: ContentApi,
}

impl Runtime {
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(Client::new(&config.api).context("build http client")?);
        let session = Arc::new(session::Controller::new(client.clone()));
        let content = ContentApi::new(client.clone());
        Ok(Self {
            config,
            client,
            session,
            content,
        })
    }

    pub fn feed(&self) -> (Pager<Post>, ListingSource<Post>) {
        (
            Pager::new(),
            ListingSource::new(self.client.clone(), Listing::Feed),
        )
    }
}

pub fn run(command: Command) -> Result<()> {
    let cfg = config::load(config::LoadOptions::default()).context("load config")?;
    logging::init(&cfg.log.filter);

    let ctx = Runtime::new(cfg)?;
    let mut session = ctx.session.initialize();
    if session.status != Status::Authenticated {
        if let Some((username, password)) = ctx.config.auth.credentials() {
            ctx.session
                .login(username, password)
                .context("sign in with configured credentials")?;
            session = ctx.session.snapshot();
        }
    }

    match command {
        Command::WhoAmI => match session.identity {
            Some(user) => {
                println!(
                    "{} (@{}) · {} posts · {} followers · {} following",
                    if user.display_name.is_empty() {
                        &user.username
                    } else {
                        &user.display_name
                    },
                    user.username,
                    user.counters.posts,
                    user.counters.followers,
                    user.counters.following
                );
            }
            None => println!("Not signed in."),
        },
        Command::Feed { pages } => {
            if session.status != Status::Authenticated {
                anyhow::bail!(
                    "feed requires a signed-in session (set FEEDLINE_AUTH__USERNAME and FEEDLINE_AUTH__PASSWORD)"
                );
            }
            let (mut pager, source) = ctx.feed();
            for _ in 0..pages.max(1) {
                match pager.load_page(&source) {
                    Some(LoadOutcome::Failed(err)) => {
                        return Err(err).context("load feed page");
                    }
                    Some(_) => {}
                    None => break,
                }
            }
            for post in pager.items() {
                let marker = if post.is_liked { "♥" } else { "♡" };
                println!(
                    "#{} @{} {} {}  {}",
                    post.id,
                    post.username,
                    marker,
                    post.like_count,
                    post.text.replace('\n', " ")
                );
            }
            if pager.is_exhausted() {
                println!("-- end of feed --");
            }
        }
    }

    Ok(())
}
