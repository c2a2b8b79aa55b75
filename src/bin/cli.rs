// Readily - Personal Book Tracker for Mobile
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Desktop testing CLI for the Readily core
//!
//! Exercises every domain operation against a running API without the
//! mobile shell. The session persists in a local database file, so a
//! `login` here behaves like the app: later commands go out with the
//! bearer token until `logout`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use readily_core::{BookDraft, ClientConfig, Credentials, Database, ReadilyClient, Registration, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "readily-cli")]
#[command(about = "Readily CLI - Desktop testing tool", long_about = None)]
struct Cli {
    /// API base URL (including the /api prefix)
    #[arg(long, env = "READILY_API_URL", default_value = "http://localhost:3000/api")]
    base_url: String,

    /// Path of the local session database
    #[arg(long, env = "READILY_DB", default_value = "readily.db")]
    database: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create a new account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// List all books
    List,
    /// Search books
    Search {
        query: String,
    },
    /// Add a book
    Add {
        title: String,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(short, long)]
        isbn: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Update a book
    Update {
        id: i64,
        title: String,
        #[arg(short, long)]
        author: Option<String>,
        #[arg(short, long)]
        isbn: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a book
    Rm {
        id: i64,
    },
    /// Show the cached session
    Whoami,
    /// Clear the cached session
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let db = Database::new(&cli.database)
        .await
        .with_context(|| format!("Failed to open session database at {}", cli.database))?;
    let config = ClientConfig::builder().base_url(&cli.base_url).build();
    let client = ReadilyClient::with_config(SessionStore::new(db), config)
        .context("Failed to build API client")?;

    if let Err(err) = run(&client, cli.command).await {
        // Same message the app would render
        eprintln!("Error: {}", err.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(client: &ReadilyClient, command: Commands) -> readily_core::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let response = client.login(&Credentials::new(email, password)).await?;
            println!("Logged in.");
            println!("{}", serde_json::to_string_pretty(&response.user).unwrap_or_default());
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            let response = client
                .register(&Registration {
                    username,
                    email,
                    password,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&response).unwrap_or_default());
        }
        Commands::List => {
            for book in client.list_books().await? {
                print_book(&book);
            }
        }
        Commands::Search { query } => {
            for book in client.search_books(&query).await? {
                print_book(&book);
            }
        }
        Commands::Add {
            title,
            author,
            isbn,
            description,
        } => {
            let draft = BookDraft {
                author,
                isbn,
                description,
                ..BookDraft::new(title)
            };
            let book = client.create_book(&draft).await?;
            println!("Added:");
            print_book(&book);
        }
        Commands::Update {
            id,
            title,
            author,
            isbn,
            description,
        } => {
            let draft = BookDraft {
                author,
                isbn,
                description,
                ..BookDraft::new(title)
            };
            let book = client.update_book(id, &draft).await?;
            println!("Updated:");
            print_book(&book);
        }
        Commands::Rm { id } => {
            let ack = client.delete_book(id).await?;
            println!("{}", serde_json::to_string_pretty(&ack).unwrap_or_default());
        }
        Commands::Whoami => {
            let session = client.current_session().await?;
            if session.is_authenticated() {
                println!("Logged in.");
                if let Some(user) = session.user {
                    println!("{}", serde_json::to_string_pretty(&user).unwrap_or_default());
                }
            } else {
                println!("Not logged in.");
            }
        }
        Commands::Logout => {
            client.logout().await?;
            println!("Logged out.");
        }
    }

    Ok(())
}

fn print_book(book: &readily_core::Book) {
    let author = book.author.as_deref().unwrap_or("-");
    let isbn = book.isbn.as_deref().unwrap_or("-");
    println!("#{:<5} {}  ({}, isbn {})", book.id, book.title, author, isbn);
}
