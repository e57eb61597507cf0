//! docstore CLI
//!
//! Command-line access to a store file, without a server.

use clap::{Parser, Subcommand};
use docstore::config::{JsonFormat, StoreConfig};
use docstore::{Document, FileStore, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// docstore CLI
#[derive(Parser, Debug)]
#[command(name = "docstore-cli")]
#[command(about = "CLI for the docstore JSON document store")]
#[command(version)]
struct Args {
    /// Backing JSON file
    #[arg(short, long, default_value = "./docstore.json")]
    file: String,

    /// Write compact JSON instead of indented
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a document by key
    Get {
        collection: String,
        key: String,
    },

    /// Store a JSON document under a key
    Set {
        collection: String,
        key: String,

        /// The document, as JSON text
        value: String,
    },

    /// Delete a document
    Del {
        collection: String,
        key: String,
    },

    /// List a page of a collection in key order
    List {
        collection: String,

        #[arg(short, long, default_value = "0")]
        limit: i64,

        #[arg(short, long, default_value = "1")]
        page: i64,
    },

    /// Delete a whole collection
    Drop {
        collection: String,
    },

    /// List collection names
    Collections,

    /// Print the whole store as it is written to disk
    Dump,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when the addressed item does not exist
fn run(args: Args) -> Result<bool> {
    let format = if args.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let store = FileStore::open(StoreConfig::builder().path(&args.file).json_format(format).build())?;

    match args.command {
        Commands::Get { collection, key } => match store.get(&collection, &key)? {
            Some(doc) => println!("{}", doc),
            None => {
                eprintln!("{}/{}: not found", collection, key);
                return Ok(false);
            }
        },
        Commands::Set {
            collection,
            key,
            value,
        } => {
            store.set(&collection, &key, value.parse::<Document>()?)?;
        }
        Commands::Del { collection, key } => {
            if !store.delete(&collection, &key)? {
                eprintln!("{}/{}: not found", collection, key);
                return Ok(false);
            }
        }
        Commands::List {
            collection,
            limit,
            page,
        } => {
            let listing = store.list(&collection, limit, page)?;
            for (key, doc) in &listing.items {
                println!("{}\t{}", key, doc);
            }
            eprintln!("{} of {} entries", listing.items.len(), listing.total);
        }
        Commands::Drop { collection } => {
            if !store.delete_collection(&collection)? {
                eprintln!("{}: not found", collection);
                return Ok(false);
            }
        }
        Commands::Collections => {
            for name in store.collections() {
                println!("{}", name);
            }
        }
        Commands::Dump => {
            println!("{}", String::from_utf8_lossy(&store.to_json()?));
        }
    }

    Ok(true)
}
