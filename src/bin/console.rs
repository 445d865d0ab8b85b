use clap::{ArgAction, Parser, Subcommand};
use futures::future::join_all;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use vendor_console::config::{ConfigOverrides, ConsoleConfig};
use vendor_console::deboard::{DeboardWizard, DELETION_SCOPE};
use vendor_console::error::{ConsoleError, Result};
use vendor_console::service::{
    self, Collaborator, CollaboratorDraft, Product, ServiceError, VendorId, VendorService, COLLABORATOR_STATUSES,
    COMMISSION_TYPES,
};

#[derive(Parser, Debug)]
#[command(name = "vendor-console")]
#[command(author, version, about = "Admin console for the vendor onboarding platform")]
struct Args {
    /// Path to config file (default: <config dir>/vendor-console/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Base URL of the onboarding API, overriding the config file
    #[arg(long, global = true, env = "VENDOR_CONSOLE_API_URL")]
    api_url: Option<String>,

    /// Base URL of the collaborator/product API, overriding the config file
    #[arg(long, global = true, env = "VENDOR_CONSOLE_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Simulate all backend calls without making real changes
    #[arg(long, global = true)]
    dryrun: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tell a vendor their account is about to be removed
    Notify {
        /// Numeric vendor id
        vendor: VendorId,
    },
    /// Permanently delete a vendor and all associated records
    Deboard {
        /// Numeric vendor id
        vendor: VendorId,

        /// Skip the interactive y/N confirmation
        #[arg(long)]
        yes: bool,
    },
    /// List collaborators and their commission terms
    Collaborators,
    /// Register a new collaborator
    AddCollaborator {
        #[command(flatten)]
        fields: CollaboratorFields,
    },
    /// Change some fields of an existing collaborator
    UpdateCollaborator {
        collaborator: String,

        #[command(flatten)]
        fields: CollaboratorFields,
    },
    /// Delete a collaborator
    DeleteCollaborator {
        collaborator: String,

        #[arg(long)]
        yes: bool,
    },
    /// List products of one collaborator, or of every collaborator
    Products {
        /// Collaborator id; all collaborators when omitted
        collaborator: Option<String>,
    },
    /// Delete a product
    DeleteProduct {
        product: String,

        #[arg(long)]
        yes: bool,
    },
}

/// Collaborator fields settable from the command line; unset ones keep the
/// stored value on update and the form default on create.
#[derive(clap::Args, Debug, Default)]
struct CollaboratorFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long, value_parser = COMMISSION_TYPES)]
    commission_type: Option<String>,
    #[arg(long)]
    commission_value: Option<f64>,
    #[arg(long)]
    min_order: Option<u32>,
    #[arg(long, value_parser = COLLABORATOR_STATUSES)]
    status: Option<String>,
}

impl CollaboratorFields {
    fn apply_to(self, draft: &mut CollaboratorDraft) {
        let text_fields = [
            (self.name, &mut draft.name),
            (self.brand, &mut draft.brand_name),
            (self.email, &mut draft.email),
            (self.phone, &mut draft.phone),
            (self.address, &mut draft.address),
            (self.website, &mut draft.website),
            (self.commission_type, &mut draft.commission_type),
            (self.status, &mut draft.status),
        ];
        for (value, slot) in text_fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(value) = self.commission_value {
            draft.commission_value = value;
        }
        if let Some(value) = self.min_order {
            draft.min_order_quantity = value;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let overrides = ConfigOverrides {
        api_url: args.api_url,
        catalog_url: args.catalog_url,
        dryrun: args.dryrun,
    };
    let config = ConsoleConfig::resolve(args.config.as_deref(), &overrides)?;

    let service = service::create_service(&config)?;
    debug!("Backend target: {}", service.target());

    let mut stdin = BufReader::new(tokio::io::stdin());
    let service = service.as_ref();
    match args.command {
        Commands::Notify { vendor } => notify(service, vendor).await,
        Commands::Deboard { vendor, yes } => deboard(service, vendor, yes, &mut stdin).await,
        Commands::Collaborators => collaborators(service).await,
        Commands::AddCollaborator { fields } => add_collaborator(service, fields).await,
        Commands::UpdateCollaborator { collaborator, fields } => {
            update_collaborator(service, &collaborator, fields).await
        }
        Commands::DeleteCollaborator { collaborator, yes } => {
            delete_collaborator(service, &collaborator, yes, &mut stdin).await
        }
        Commands::Products { collaborator } => products(service, collaborator).await,
        Commands::DeleteProduct { product, yes } => delete_product(service, &product, yes, &mut stdin).await,
    }
}

async fn notify(service: &dyn VendorService, vendor: VendorId) -> Result<()> {
    service.notify_vendor(vendor).await?;
    println!("Vendor #{vendor} has been notified about the upcoming deboard.");
    Ok(())
}

/// Walks the same wizard as the interactive front end, with `input` standing
/// in for the confirmation screen.
async fn deboard<R>(service: &dyn VendorService, vendor: VendorId, assume_yes: bool, input: &mut R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut wizard = DeboardWizard::new();
    wizard.set_vendor_text(&vendor.to_string());
    if !wizard.proceed() {
        return Err(ConsoleError::InvalidVendorId(vendor.to_string()));
    }

    println!("This action is irreversible.");
    println!("The following will be permanently deleted for Vendor #{vendor}:");
    for item in DELETION_SCOPE {
        println!("  ✕ {item}");
    }

    if !assume_yes && !confirm(input, &format!("Deboard Vendor #{vendor}?")).await? {
        wizard.reset();
        return Err(ConsoleError::Cancelled);
    }

    let Some(vendor) = wizard.begin_deboard() else {
        return Err(ConsoleError::Cancelled);
    };
    println!("Deboarding Vendor #{vendor}...");

    let result = service.deboard_vendor(vendor).await;
    wizard.finish_deboard(vendor, result.clone());
    result?;

    println!("Vendor #{vendor} and all associated records have been removed.");
    Ok(())
}

/// Ask a y/N question; anything but an explicit yes (including end of
/// input) is a no.
async fn confirm<R>(input: &mut R, question: &str) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    eprint!("{question} [y/N] ");
    let mut line = String::new();
    input.read_line(&mut line).await?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

async fn collaborators(service: &dyn VendorService) -> Result<()> {
    let collaborators = service.list_collaborators().await?;
    if collaborators.is_empty() {
        println!("No collaborators found.");
        return Ok(());
    }

    println!("{}", collaborator_header());
    for collaborator in &collaborators {
        println!("{}", collaborator_row(collaborator));
    }
    Ok(())
}

async fn add_collaborator(service: &dyn VendorService, fields: CollaboratorFields) -> Result<()> {
    let mut draft = CollaboratorDraft::default();
    fields.apply_to(&mut draft);
    service.create_collaborator(&draft).await?;
    println!("Collaborator {} created.", draft.brand_name);
    Ok(())
}

/// Edits start from the stored record, so only the given fields change.
async fn update_collaborator(service: &dyn VendorService, id: &str, fields: CollaboratorFields) -> Result<()> {
    let existing = service
        .list_collaborators()
        .await?
        .into_iter()
        .find(|c| c.collaborator_id == id)
        .ok_or_else(|| ServiceError::Invalid(format!("No collaborator with id {id}")))?;

    let mut draft = CollaboratorDraft::from_existing(&existing)?;
    fields.apply_to(&mut draft);
    service.update_collaborator(id, &draft).await?;
    println!("Collaborator {id} updated.");
    Ok(())
}

async fn delete_collaborator<R>(service: &dyn VendorService, id: &str, assume_yes: bool, input: &mut R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let question = format!("Delete collaborator {id}? This action cannot be undone.");
    if !assume_yes && !confirm(input, &question).await? {
        return Err(ConsoleError::Cancelled);
    }
    service.delete_collaborator(id).await?;
    println!("Collaborator {id} deleted.");
    Ok(())
}

async fn delete_product<R>(service: &dyn VendorService, id: &str, assume_yes: bool, input: &mut R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let question = format!("Delete product {id}? This action cannot be undone.");
    if !assume_yes && !confirm(input, &question).await? {
        return Err(ConsoleError::Cancelled);
    }
    service.delete_product(id).await?;
    println!("Product {id} deleted.");
    Ok(())
}

async fn products(service: &dyn VendorService, collaborator: Option<String>) -> Result<()> {
    if let Some(id) = collaborator {
        let products = service.list_products(&id).await?;
        print_products(&id, &products);
        return Ok(());
    }

    let collaborators = service.list_collaborators().await?;
    let results = join_all(
        collaborators
            .iter()
            .map(|c| service.list_products(&c.collaborator_id)),
    )
    .await;

    let mut first_error = None;
    for (collaborator, result) in collaborators.iter().zip(results) {
        match result {
            Ok(products) => {
                print_products(&format!("{} ({})", collaborator.brand_name, collaborator.collaborator_id), &products)
            }
            Err(e) => {
                warn!("Products of collaborator {} unavailable: {}", collaborator.collaborator_id, e);
                eprintln!("{}: {}", collaborator.brand_name, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn collaborator_header() -> String {
    format!(
        "{:<8} {:<24} {:<28} {:>12} {:>5}  {}",
        "ID", "BRAND", "EMAIL", "COMMISSION", "MOQ", "STATUS"
    )
}

fn collaborator_row(c: &Collaborator) -> String {
    format!(
        "{:<8} {:<24} {:<28} {:>12} {:>5}  {}",
        c.collaborator_id,
        c.brand_name,
        c.email,
        c.commission_display(),
        c.min_order_quantity,
        c.status
    )
}

fn print_products(owner: &str, products: &[Product]) {
    println!("{owner}");
    if products.is_empty() {
        println!("  (no products)");
        return;
    }
    for p in products {
        println!(
            "  {:<10} {:<28} {:<16} {:>10} {:>6}  {}",
            p.product_id,
            p.name,
            p.category,
            p.unit_price,
            p.stock_quantity,
            p.status
        );
    }
}
