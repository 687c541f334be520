use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sqlx::Connection;
use tracing::info;
use tracing_subscriber::EnvFilter;

use contact_store::config;
use contact_store::db::{self, ContactStore};
use contact_store::models::{ClientChanges, ClientFilter, ClientMatch, NewClient};

/// Manage clients and their phone numbers
#[derive(Parser, Debug)]
#[command(name = "contacts", version, about)]
struct Cli {
    /// Database URL; falls back to DATABASE_URL from the environment or .env
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the clients and phones tables
    Init,
    /// Add a client, optionally with phones
    Add(ClientArgs),
    /// Attach a phone number to a client
    AddPhone { client_id: i64, phone: String },
    /// Change a client's fields and append phones
    Update {
        client_id: i64,
        #[command(flatten)]
        fields: ClientArgs,
    },
    /// Remove one phone number of a client
    DeletePhone { client_id: i64, phone: String },
    /// Remove a client together with its phones
    Delete { client_id: i64 },
    /// Look clients up by exact field match or by phone
    Find {
        #[command(flatten)]
        fields: ClientArgs,
    },
    /// Run a short scripted session against the database
    Demo,
}

#[derive(Args, Debug)]
struct ClientArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Phone number; may be repeated
    #[arg(long = "phone")]
    phones: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::init(cli.database_url)?;

    let mut conn = db::connect(&config).await?;
    let result = run(ContactStore::new(&mut conn), cli.command).await;
    conn.close().await?;

    result
}

async fn run(mut store: ContactStore<'_>, command: Command) -> Result<()> {
    match command {
        Command::Init => {
            store.initialize_schema().await?;
        }
        Command::Add(fields) => {
            let client = NewClient {
                first_name: fields.first_name,
                last_name: fields.last_name,
                email: fields.email,
                phones: fields.phones,
            };
            let client_id = store.create_client(&client).await?;
            println!("{client_id}");
        }
        Command::AddPhone { client_id, phone } => {
            store.add_phone(client_id, &phone).await?;
        }
        Command::Update { client_id, fields } => {
            let changes = ClientChanges {
                first_name: fields.first_name,
                last_name: fields.last_name,
                email: fields.email,
                phones: fields.phones,
            };
            store.update_client(client_id, &changes).await?;
        }
        Command::DeletePhone { client_id, phone } => {
            let deleted = store.delete_phone(client_id, &phone).await?;
            println!("{deleted} phone(s) deleted");
        }
        Command::Delete { client_id } => {
            let deleted = store.delete_client(client_id).await?;
            println!("{deleted} client(s) deleted");
        }
        Command::Find { fields } => {
            let filter = ClientFilter {
                first_name: fields.first_name,
                last_name: fields.last_name,
                email: fields.email,
                phone: fields.phones.into_iter().next(),
            };
            print_matches(&store.find_client(&filter).await?);
        }
        Command::Demo => demo(&mut store).await?,
    }

    Ok(())
}

async fn demo(store: &mut ContactStore<'_>) -> Result<()> {
    store.initialize_schema().await?;

    let client_id = store
        .create_client(
            &NewClient::with_email("johndoe@example.com")
                .first_name("Igor")
                .last_name("Ivanov")
                .phone("+123456789"),
        )
        .await?;
    info!(client_id, "demo client created");

    print_matches(&store.find_client(&ClientFilter::default().first_name("Igor")).await?);

    store.add_phone(client_id, "+987619376").await?;
    store
        .update_client(client_id, &ClientChanges::default().first_name("Kirill"))
        .await?;
    print_matches(&store.find_client(&ClientFilter::default().phone("+987619376")).await?);

    store.delete_phone(client_id, "+123456789").await?;
    store.delete_client(client_id).await?;
    info!(client_id, "demo client removed");

    Ok(())
}

fn print_matches(matches: &[ClientMatch]) {
    if matches.is_empty() {
        println!("no clients found");
        return;
    }

    for m in matches {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            m.client_id,
            m.first_name.as_deref().unwrap_or("-"),
            m.last_name.as_deref().unwrap_or("-"),
            m.email.as_deref().unwrap_or("-"),
            m.phone_number.as_deref().unwrap_or("-"),
        );
    }
}
