use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use catalog_admin::config::DEFAULT_COOKIE_FILE;
use catalog_admin::prelude::*;

type Console = AdminConsole<TerminalModal, TerminalNotifier>;

#[derive(Parser, Debug)]
#[command(name = "catalog-admin", version)]
#[command(about = "Manage the product catalog through the admin API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL, e.g. https://api.example.com/v2
    #[arg(long, env = "API_BASE")]
    api_base: String,

    /// Shop path used in /api/{path}/admin/...
    #[arg(long, env = "API_PATH")]
    api_path: String,

    /// File holding the session cookie
    #[arg(long, env = "CATALOG_COOKIE_FILE", default_value = DEFAULT_COOKIE_FILE)]
    cookie_file: PathBuf,

    /// Give up on a request after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Output debug logs to stderr
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session cookie
    Login {
        #[arg(long, env = "CATALOG_USERNAME")]
        username: String,
        /// Read from stdin when not given
        #[arg(long, env = "CATALOG_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// End the stored session
    Logout,
    /// List products
    Products {
        #[arg(long)]
        page: Option<u32>,
        /// Print the raw products as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Edit an existing product
    Edit {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
        /// Remove the last additional image (repeatable)
        #[arg(long, action = clap::ArgAction::Count)]
        drop_last_image: u8,
    },
    /// Delete a product
    Delete {
        id: String,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct ProductFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    unit: Option<String>,
    #[arg(long)]
    origin_price: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    content: Option<String>,
    /// Main image URL
    #[arg(long)]
    image_url: Option<String>,
    /// Append an additional image URL (repeatable)
    #[arg(long = "add-image")]
    images: Vec<String>,
    #[arg(long)]
    enabled: Option<bool>,
}

impl ProductFields {
    fn edits(&self) -> Vec<DraftEdit> {
        let text: [(&Option<String>, fn(String) -> DraftEdit); 8] = [
            (&self.title, DraftEdit::Title),
            (&self.category, DraftEdit::Category),
            (&self.unit, DraftEdit::Unit),
            (&self.origin_price, DraftEdit::OriginPrice),
            (&self.price, DraftEdit::Price),
            (&self.description, DraftEdit::Description),
            (&self.content, DraftEdit::Content),
            (&self.image_url, DraftEdit::ImageUrl),
        ];

        let mut edits: Vec<DraftEdit> = text
            .into_iter()
            .filter_map(|(value, edit)| value.clone().map(edit))
            .collect();
        if let Some(enabled) = self.enabled {
            edits.push(DraftEdit::Enabled(enabled));
        }
        edits
    }

    fn apply(&self, console: &mut Console) -> catalog_admin::error::Result<()> {
        for edit in self.edits() {
            console.edit_field(edit)?;
        }
        for url in &self.images {
            console.add_image_slot()?;
            let last = console.draft().images_url.len() - 1;
            console.edit_image_url(last, url.clone())?;
        }
        Ok(())
    }
}

fn init_logging(debug: bool) {
    if debug {
        pretty_env_logger::formatted_builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        pretty_env_logger::init();
    }
}

fn read_password() -> io::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm_prompt(question: &str) -> io::Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn print_products(products: &[Product]) {
    println!(
        "{:<12} {:<28} {:>10} {:>10}  {}",
        "CATEGORY", "TITLE", "ORIGIN", "PRICE", "ENABLED"
    );
    for product in products {
        println!(
            "{:<12} {:<28} {:>10} {:>10}  {}",
            product.category,
            product.title,
            product.origin_price,
            product.price,
            if product.is_enabled { "yes" } else { "no" }
        );
    }
}

async fn find_product(console: &mut Console, id: &str) -> anyhow::Result<Option<Product>> {
    console
        .find_product(id)
        .await
        .with_context(|| format!("Could not look up product {}", id))
}

async fn require_session(console: &mut Console) -> bool {
    match console.restore_session().await {
        Ok(true) => true,
        Ok(false) => {
            eprintln!("Not signed in. Run `catalog-admin login` first.");
            false
        }
        Err(_) => false,
    }
}

fn status(result: catalog_admin::error::Result<()>) -> ExitCode {
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// --- Main application logic ---

async fn run() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = ConsoleConfig::new(&cli.api_base, &cli.api_path, cli.cookie_file.clone())
        .context("Invalid API configuration")?;
    let options =
        ClientOptions::default().with_request_timeout(cli.timeout.map(Duration::from_secs));
    let mut console = AdminConsole::new(&config, &options, TerminalModal, TerminalNotifier)?;

    let code = match cli.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password().context("Failed to read password")?,
            };
            *console.login_form_mut() = Credentials::new(username, password);
            status(console.submit_login().await)
        }
        Commands::Logout => {
            if !require_session(&mut console).await {
                return Ok(ExitCode::FAILURE);
            }
            status(console.sign_out().await)
        }
        Commands::Products { page, json } => {
            if !require_session(&mut console).await {
                return Ok(ExitCode::FAILURE);
            }
            if console.refresh_products_page(page).await.is_err() {
                return Ok(ExitCode::FAILURE);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(console.products())?);
            } else {
                print_products(console.products());
            }
            if let Some(pagination) = console.pagination() {
                println!(
                    "page {}/{}",
                    pagination.current_page, pagination.total_pages
                );
            }
            ExitCode::SUCCESS
        }
        Commands::Create { fields } => {
            if !require_session(&mut console).await {
                return Ok(ExitCode::FAILURE);
            }
            console.open_modal(Mode::Create, DraftSeed::template());
            fields.apply(&mut console)?;
            status(console.confirm().await)
        }
        Commands::Edit {
            id,
            fields,
            drop_last_image,
        } => {
            if !require_session(&mut console).await {
                return Ok(ExitCode::FAILURE);
            }
            let Some(product) = find_product(&mut console, &id).await? else {
                anyhow::bail!("No product with id {}", id);
            };
            console.open_modal(Mode::Edit, DraftSeed::from(&product));
            for _ in 0..drop_last_image {
                console.remove_image_slot()?;
            }
            fields.apply(&mut console)?;
            status(console.confirm().await)
        }
        Commands::Delete { id, yes } => {
            if !require_session(&mut console).await {
                return Ok(ExitCode::FAILURE);
            }
            let Some(product) = find_product(&mut console, &id).await? else {
                anyhow::bail!("No product with id {}", id);
            };
            console.open_modal(Mode::Delete, DraftSeed::from(&product));
            let question = format!("Delete \"{}\"?", product.title);
            if yes || confirm_prompt(&question)? {
                status(console.confirm().await)
            } else {
                console.cancel();
                ExitCode::SUCCESS
            }
        }
    };

    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
