use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Query CLI for the catalog proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check proxy liveness
    Status,
    /// List categories
    Categories {
        #[arg(long)]
        sort_order: Option<String>,
        #[arg(long)]
        top: Option<u32>,
    },
    /// List companies
    Companies {
        #[arg(long)]
        sort_order: Option<String>,
        #[arg(long)]
        top: Option<u32>,
    },
    /// List products, optionally scoped to a company and/or category name
    Products {
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        #[arg(long)]
        availability: Option<String>,
        #[arg(long)]
        sort_order: Option<String>,
        #[arg(long)]
        top: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/", cli.url)).send().await?;
            println!("{}", res.text().await?);
        }
        Commands::Categories { sort_order, top } => {
            let params = list_params(sort_order, top);
            let res = client
                .get(format!("{}/categories", cli.url))
                .query(&params)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Companies { sort_order, top } => {
            let params = list_params(sort_order, top);
            let res = client
                .get(format!("{}/companies", cli.url))
                .query(&params)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Products {
            company,
            category,
            min_price,
            max_price,
            availability,
            sort_order,
            top,
        } => {
            let mut path = String::new();
            if let Some(company) = company {
                path.push_str(&format!("/companies/{}", company));
            }
            if let Some(category) = category {
                path.push_str(&format!("/categories/{}", category));
            }
            path.push_str("/products");

            let mut params = Vec::new();
            if let Some(v) = min_price {
                params.push(("minPrice", v));
            }
            if let Some(v) = max_price {
                params.push(("maxPrice", v));
            }
            if let Some(v) = availability {
                params.push(("availability", v));
            }
            params.extend(list_params(sort_order, top));

            let res = client
                .get(format!("{}{}", cli.url, path))
                .query(&params)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn list_params(sort_order: Option<String>, top: Option<u32>) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(v) = sort_order {
        params.push(("sortOrder", v));
    }
    if let Some(v) = top {
        params.push(("top", v.to_string()));
    }
    params
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
