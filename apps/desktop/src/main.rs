use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings,
    render::{render_view, ListView},
    CustomersSession, ListSnapshot,
};
use shared::domain::CustomerField;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "List and add customers through the customers API")]
struct Cli {
    /// Overrides `api_base_url` from customers.toml and the environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the customer table.
    List,
    /// Create a customer, then print the refreshed table.
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        business_name: Option<String>,
    },
}

/// Table text for a settled snapshot. A failed fetch becomes the process
/// error, carrying only the server message since anyhow adds its own prefix.
fn list_output(snapshot: &ListSnapshot) -> Result<String> {
    if let Some(err) = snapshot.error() {
        bail!("{}", err.message);
    }
    Ok(render_view(&ListView::from_snapshot(snapshot)))
}

fn print_list(session: &CustomersSession) -> Result<()> {
    print!("{}", list_output(&session.list.snapshot())?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    tracing::debug!(
        api_base_url = %settings.api_base_url,
        customers_path = %settings.customers_path,
        "settings loaded"
    );
    let session = CustomersSession::connect(&settings, Handle::current())
        .context("invalid customers endpoint configuration")?;

    match cli.command {
        Command::List => {
            session.list.wait_idle().await;
            print_list(&session)?;
        }
        Command::Add {
            first_name,
            last_name,
            email,
            business_name,
        } => {
            session.form.open();
            session.form.set_field(CustomerField::FirstName, first_name);
            session.form.set_field(CustomerField::LastName, last_name);
            session.form.set_field(CustomerField::Email, email);
            if let Some(business_name) = business_name {
                session
                    .form
                    .set_field(CustomerField::BusinessName, business_name);
            }

            if let Err(err) = session.form.submit().await {
                bail!("could not create customer: {err}");
            }
            session.list.wait_idle().await;
            print_list(&session)?;
        }
    }

    Ok(())
}
