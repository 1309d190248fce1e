use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelf::config::Config;
use shelf::{ImageFile, ProductInput, ProductQuery, ProductsStore};

/// Command-line client for the products catalogue
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Products API base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Default page size
    #[arg(long, value_name = "N")]
    page_size: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of products
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
        /// Filter by name
        #[arg(long)]
        name: Option<String>,
        /// Filter by barcode
        #[arg(long)]
        barcode: Option<String>,
    },
    /// Register a new product with an image
    Create(ProductArgs),
    /// Replace a product's fields and image
    Update {
        id: i64,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Delete a product and print the refreshed page
    Delete {
        id: i64,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
    },
}

#[derive(ClapArgs, Debug)]
struct ProductArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    price: f64,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    barcode: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// Image file to upload
    #[arg(long, value_name = "PATH")]
    image: PathBuf,
}

impl ProductArgs {
    async fn into_parts(self) -> anyhow::Result<(ProductInput, ImageFile)> {
        let image = ImageFile::load(&self.image).await?;
        let input = ProductInput {
            title: self.title,
            price: self.price,
            description: self.description,
            barcode: self.barcode,
            category: self.category,
        };
        Ok((input, image))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn,hyper=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_ref(), args.base_url.as_deref(), args.page_size)?;
    info!("Configuration loaded: base_url={}", config.base_url);

    let store = ProductsStore::from_config(&config);

    match args.command {
        Command::List {
            page,
            size,
            name,
            barcode,
        } => {
            let mut query = ProductQuery::new(page, size.unwrap_or(config.page_size));
            query.name = name;
            query.barcode = barcode;
            store.fetch_products(query).await?;
            print_page(&store).await;
        }
        Command::Create(product) => {
            let (input, image) = product.into_parts().await?;
            store.create_product(&input, image).await?;
            println!("Created '{}'", input.title);
        }
        Command::Update { id, product } => {
            let (input, image) = product.into_parts().await?;
            store.update_product(id, &input, image).await?;
            println!("Updated product {}", id);
        }
        Command::Delete { id, page, size } => {
            store
                .initialize_products(page, size.unwrap_or(config.page_size))
                .await?;
            store.delete_product(id).await?;
            println!("Deleted product {}\n", id);
            print_page(&store).await;
        }
    }

    Ok(())
}

async fn print_page(store: &ProductsStore) {
    let state = store.state().await;

    println!(
        "Page {}/{} ({} products total)\n",
        state.page_number,
        state.total_pages(),
        state.total_records
    );

    for product in &state.products {
        println!("  #{} {} ({:.2})", product.id, product.title, product.price);
        if !product.barcode.is_empty() {
            println!("     Barcode: {}", product.barcode);
        }
        if let Some(category) = product.category.as_deref().filter(|c| !c.is_empty()) {
            println!("     Category: {}", category);
        }
        if !product.description.is_empty() {
            println!("     {}", product.description);
        }
    }

    if state.products.is_empty() {
        println!("  No products on this page.");
    }
}
