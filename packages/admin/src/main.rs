use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use common::Gender;
use common::movie::{CastMember, MovieListItem, MovieStatus};
use common::storage::StoredMedia;
use marquee_admin::api::Upload;
use marquee_admin::api::actor::ActorForm;
use marquee_admin::api::movie::MovieForm;
use marquee_admin::views::{ActorListView, MovieListView, Notification, NotificationKind};
use marquee_admin::{ApiClient, ApiError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marquee-admin", about = "Administer the Marquee movie catalog")]
struct Cli {
    /// API root, including the `/api` prefix.
    #[arg(long, env = "MARQUEE_API_URL", default_value = "http://127.0.0.1:8000/api")]
    api_url: String,

    /// Bearer token from `sign-in`.
    #[arg(long, env = "MARQUEE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and print the token to export as MARQUEE_TOKEN
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MARQUEE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the account the token belongs to
    Whoami,
    #[command(subcommand)]
    Actors(ActorCommand),
    #[command(subcommand)]
    Movies(MovieCommand),
}

#[derive(Subcommand)]
enum ActorCommand {
    /// List one page of actors
    List {
        #[arg(long, default_value_t = 0)]
        page: u64,
        #[arg(long, default_value_t = marquee_admin::views::PAGE_LIMIT)]
        limit: u64,
    },
    Search {
        name: String,
    },
    Latest,
    Show {
        id: String,
    },
    Create(ActorArgs),
    Update {
        id: String,
        #[command(flatten)]
        actor: ActorArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Args)]
struct ActorArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    about: String,
    #[arg(long)]
    gender: Gender,
    /// Image file to use as avatar.
    #[arg(long)]
    avatar: Option<PathBuf>,
}

#[derive(Subcommand)]
enum MovieCommand {
    List {
        #[arg(long, default_value_t = 0)]
        page: u64,
        #[arg(long, default_value_t = marquee_admin::views::PAGE_LIMIT)]
        limit: u64,
    },
    Search {
        title: String,
    },
    Latest {
        #[arg(long)]
        limit: Option<u64>,
    },
    Show {
        id: String,
    },
    /// Fetch the editable form of a movie
    ForUpdate {
        id: String,
    },
    /// Upload a trailer video and print its `{url, public_id}`
    UploadTrailer {
        file: PathBuf,
    },
    Create(MovieArgs),
    Update {
        id: String,
        #[command(flatten)]
        movie: MovieArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Args)]
struct MovieArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    story_line: String,
    /// Actor id of the director.
    #[arg(long)]
    director: Option<String>,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    release_date: String,
    #[arg(long, default_value = "public")]
    status: MovieStatus,
    #[arg(long = "type")]
    kind: String,
    #[arg(long)]
    language: String,
    #[arg(long = "genre")]
    genres: Vec<String>,
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// `ACTOR_ID:ROLE[:lead]`, repeatable.
    #[arg(long = "cast", value_parser = parse_cast)]
    cast: Vec<CastMember>,
    /// Actor id, repeatable.
    #[arg(long = "writer")]
    writers: Vec<String>,
    /// `public_id` returned by `upload-trailer`.
    #[arg(long)]
    trailer_public_id: String,
    /// `url` returned by `upload-trailer`.
    #[arg(long)]
    trailer_url: String,
    #[arg(long)]
    poster: Option<PathBuf>,
}

fn parse_cast(raw: &str) -> Result<CastMember, String> {
    let mut parts = raw.splitn(3, ':');
    let actor = parts.next().unwrap_or_default().trim();
    let role_as = parts.next().unwrap_or_default().trim();
    if actor.is_empty() || role_as.is_empty() {
        return Err(format!("expected ACTOR_ID:ROLE[:lead], got {raw:?}"));
    }
    let lead_actor = match parts.next().map(str::trim) {
        None => false,
        Some("lead") => true,
        Some(other) => return Err(format!("unknown cast flag {other:?}")),
    };
    Ok(CastMember {
        actor: actor.to_string(),
        role_as: role_as.to_string(),
        lead_actor,
    })
}

async fn load(path: &Path) -> Result<Upload> {
    Upload::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn actor_form(args: ActorArgs) -> Result<ActorForm> {
    let avatar = match &args.avatar {
        Some(path) => Some(load(path).await?),
        None => None,
    };
    Ok(ActorForm {
        name: args.name,
        about: args.about,
        gender: args.gender,
        avatar,
    })
}

async fn movie_form(args: MovieArgs) -> Result<MovieForm> {
    let poster = match &args.poster {
        Some(path) => Some(load(path).await?),
        None => None,
    };
    Ok(MovieForm {
        title: args.title,
        story_line: args.story_line,
        director: args.director,
        release_date: args.release_date,
        status: args.status,
        kind: args.kind,
        language: args.language,
        genres: args.genres,
        tags: args.tags,
        cast: args.cast,
        writers: args.writers,
        trailer: StoredMedia {
            public_id: args.trailer_public_id,
            url: args.trailer_url,
        },
        poster,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print view notifications; an error notification fails the command.
fn report(notifications: Vec<Notification>) -> Result<()> {
    let mut failed = None;
    for note in notifications {
        match note.kind {
            NotificationKind::Success => eprintln!("{}", note.text),
            NotificationKind::Error => failed = Some(note.text),
        }
    }
    match failed {
        Some(text) => Err(ApiError::new(text).into()),
        None => Ok(()),
    }
}

async fn run_actor(client: ApiClient, command: ActorCommand) -> Result<()> {
    match command {
        ActorCommand::List { page, limit } => {
            let mut view = ActorListView::with_limit(client, limit);
            view.fetch(page).await;
            if view.reached_to_end() {
                eprintln!("No actors on page {page}");
            } else {
                print_json(&view.visible())?;
            }
            report(view.take_notifications())
        }
        ActorCommand::Search { name } => {
            let mut view = ActorListView::new(client);
            view.search(&name).await;
            if view.search.result_not_found {
                eprintln!("Record not found");
            } else {
                print_json(&view.visible())?;
            }
            report(view.take_notifications())
        }
        ActorCommand::Latest => print_json(&client.latest_actors().await?),
        ActorCommand::Show { id } => print_json(&client.get_actor(&id).await?),
        ActorCommand::Create(args) => {
            let form = actor_form(args).await?;
            print_json(&client.create_actor(form).await?)
        }
        ActorCommand::Update { id, actor } => {
            let form = actor_form(actor).await?;
            print_json(&client.update_actor(&id, form).await?)
        }
        ActorCommand::Delete { id } => {
            let profile = client.get_actor(&id).await?;
            let mut view = ActorListView::new(client);
            view.select(profile);
            view.confirm_delete().await;
            report(view.take_notifications())
        }
    }
}

async fn run_movie(client: ApiClient, command: MovieCommand) -> Result<()> {
    match command {
        MovieCommand::List { page, limit } => {
            let mut view = MovieListView::with_limit(client, limit);
            view.fetch(page).await;
            if view.reached_to_end() {
                eprintln!("No movies on page {page}");
            } else {
                print_json(&view.visible())?;
            }
            report(view.take_notifications())
        }
        MovieCommand::Search { title } => {
            let mut view = MovieListView::new(client);
            view.search(&title).await;
            if view.search.result_not_found {
                eprintln!("Record not found");
            } else {
                print_json(&view.visible())?;
            }
            report(view.take_notifications())
        }
        MovieCommand::Latest { limit } => print_json(&client.latest_movies(limit).await?),
        MovieCommand::Show { id } => print_json(&client.get_movie(&id).await?),
        MovieCommand::ForUpdate { id } => print_json(&client.get_movie_for_update(&id).await?),
        MovieCommand::UploadTrailer { file } => {
            let video = load(&file).await?;
            let stored = client
                .upload_trailer(video, |percent| eprint!("\rUploading trailer: {percent:>3}%"))
                .await;
            eprintln!();
            print_json(&stored?)
        }
        MovieCommand::Create(args) => {
            let form = movie_form(args).await?;
            print_json(&client.create_movie(form).await?)
        }
        MovieCommand::Update { id, movie } => {
            let form = movie_form(movie).await?;
            print_json(&client.update_movie(&id, form).await?)
        }
        MovieCommand::Delete { id } => {
            let detail = client.get_movie_for_update(&id).await?;
            let mut view = MovieListView::new(client);
            view.select(MovieListItem {
                id: detail.id,
                title: detail.title,
                poster: detail.poster,
                genres: detail.genres,
                status: detail.status,
            });
            view.confirm_delete().await;
            report(view.take_notifications())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ApiClient::new(cli.api_url)?;
    client.set_token(cli.token).await;

    match cli.command {
        Command::SignIn { email, password } => {
            let res = client.sign_in(&email, &password).await?;
            eprintln!("Signed in as {} ({})", res.user.name, res.user.role.as_str());
            println!("{}", res.user.token);
        }
        Command::Whoami => print_json(&client.is_auth().await?)?,
        Command::Actors(command) => run_actor(client, command).await?,
        Command::Movies(command) => run_movie(client, command).await?,
    }
    Ok(())
}
