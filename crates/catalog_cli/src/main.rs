//! Command-line host for the catalog core.
//!
//! # Responsibility
//! - Drive the list and form state machines against a live backend.
//! - Print state-machine outcomes; no business rule lives here.

use catalog_core::{
    init_logging_from_config, CatalogConfig, DeleteOutcome, FormRequest, HttpProductsGateway,
    InMemoryProductsGateway, Product, ProductField, ProductFormState, ProductListState,
    ProductsGateway, SubmitOutcome,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::process::ExitCode;
use std::sync::Arc;

type SharedGateway = Arc<dyn ProductsGateway>;

#[derive(Parser, Debug)]
#[command(name = "catalog", version, about = "Product catalog client")]
struct Cli {
    /// Backend base URL; overrides CATALOG_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Use a seeded in-memory catalog instead of the backend.
    #[arg(long, global = true)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List products with optional filtering and pagination.
    List {
        #[arg(long)]
        query: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Report whether an id is already taken.
    Verify { id: String },
    /// Create a product.
    Create(CreateArgs),
    /// Edit an existing product.
    Edit(EditArgs),
    /// Delete a product.
    Delete { id: String },
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Defaults to a generated candidate id.
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    logo: String,
    #[arg(long)]
    date_release: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    logo: Option<String>,
    #[arg(long)]
    date_release: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match CatalogConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_base_url(url);
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    let gateway: SharedGateway = if cli.offline {
        Arc::new(InMemoryProductsGateway::with_products(demo_catalog()))
    } else {
        match HttpProductsGateway::from_config(&config) {
            Ok(gateway) => Arc::new(gateway),
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    };
    info!(
        "event=cli_start module=cli status=ok offline={} command={}",
        cli.offline,
        command_name(&cli.command)
    );

    let ok = match cli.command {
        Command::List {
            query,
            page,
            page_size,
        } => {
            run_list(
                gateway,
                query,
                page,
                page_size.unwrap_or(config.page_size),
            )
            .await
        }
        Command::Verify { id } => run_verify(gateway, &id).await,
        Command::Create(args) => run_create(gateway, args).await,
        Command::Edit(args) => run_edit(gateway, args).await,
        Command::Delete { id } => run_delete(gateway, &id, config.page_size).await,
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List { .. } => "list",
        Command::Verify { .. } => "verify",
        Command::Create(_) => "create",
        Command::Edit(_) => "edit",
        Command::Delete { .. } => "delete",
    }
}

async fn run_list(
    gateway: SharedGateway,
    query: Option<String>,
    page: usize,
    page_size: usize,
) -> bool {
    let mut list = ProductListState::new(gateway, page_size);
    list.load().await;
    if let Some(error) = list.error() {
        eprintln!("{error}");
        return false;
    }

    list.set_query(query.as_deref());
    list.set_page(page);
    let view = list.view();
    for product in &view.page.rows {
        print_product(product);
    }
    println!(
        "page {}/{} (total {})",
        view.page.page, view.page.total_pages, view.page.total
    );
    true
}

async fn run_verify(gateway: SharedGateway, id: &str) -> bool {
    match gateway.verify_id_exists(id).await {
        Ok(true) => {
            println!("{id}: taken");
            true
        }
        Ok(false) => {
            println!("{id}: available");
            true
        }
        Err(err) => {
            eprintln!("{err}");
            false
        }
    }
}

async fn run_create(gateway: SharedGateway, args: CreateArgs) -> bool {
    let mut form = ProductFormState::open(gateway, FormRequest::create()).await;
    if let Some(id) = args.id {
        form.set_value(ProductField::Id, id);
        form.blur_id().await;
    }
    form.set_value(ProductField::Name, args.name);
    form.set_value(ProductField::Description, args.description);
    form.set_value(ProductField::Logo, args.logo);
    form.set_value(ProductField::DateRelease, args.date_release);

    let id = form.value(ProductField::Id).to_string();
    let revision = form.value(ProductField::DateRevision).to_string();
    let outcome = form.submit().await;
    report_submit(&form, outcome, &format!("created {id} (revision {revision})"))
}

async fn run_edit(gateway: SharedGateway, args: EditArgs) -> bool {
    let mut form = ProductFormState::open(gateway, FormRequest::edit(args.id.as_str())).await;
    if let Some(error) = form.error() {
        eprintln!("{error}");
        return false;
    }

    let edits = [
        (ProductField::Name, args.name),
        (ProductField::Description, args.description),
        (ProductField::Logo, args.logo),
        (ProductField::DateRelease, args.date_release),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            form.set_value(field, value);
        }
    }

    let outcome = form.submit().await;
    report_submit(&form, outcome, &format!("updated {}", args.id))
}

fn report_submit<G: ProductsGateway>(
    form: &ProductFormState<G>,
    outcome: SubmitOutcome,
    success: &str,
) -> bool {
    match outcome {
        SubmitOutcome::Saved(navigation) => {
            println!("{success}; next: {}", navigation.route.path());
            true
        }
        SubmitOutcome::Invalid => {
            for field in ProductField::ALL {
                for error in form.field_errors(field) {
                    eprintln!("{field}: {error}");
                }
            }
            false
        }
        SubmitOutcome::Failed => {
            eprintln!("{}", form.error().unwrap_or_default());
            false
        }
    }
}

async fn run_delete(gateway: SharedGateway, id: &str, page_size: usize) -> bool {
    let mut list = ProductListState::new(gateway, page_size);
    list.load().await;
    if let Some(error) = list.error() {
        eprintln!("{error}");
        return false;
    }

    let Some(target) = list.products().iter().find(|p| p.id == id).cloned() else {
        eprintln!("product not found: {id}");
        return false;
    };
    list.open_delete_modal(&target);

    match list.confirm_delete().await {
        DeleteOutcome::Deleted => {
            println!("deleted {id}; {} product(s) remain", list.total());
            true
        }
        DeleteOutcome::Failed => {
            eprintln!("{}", list.error().unwrap_or_default());
            false
        }
        DeleteOutcome::Skipped => false,
    }
}

fn print_product(product: &Product) {
    println!(
        "{:<10} {:<30} {} -> {}  {}",
        product.id, product.name, product.date_release, product.date_revision, product.logo
    );
}

fn demo_catalog() -> Vec<Product> {
    [
        ("uno", "Tarjeta Crédito", "Producto para compras a crédito.", "2025-01-01"),
        ("dos", "Cuenta Ahorros", "Cuenta para ahorro y retiros.", "2024-06-15"),
        ("tres", "Crédito Libre Inversión", "Préstamo para múltiples propósitos.", "2023-10-20"),
    ]
    .into_iter()
    .map(|(id, name, description, release)| Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        logo: format!("assets-{id}.png"),
        date_release: release.to_string(),
        date_revision: catalog_core::derive_revision_date(release),
    })
    .collect()
}
