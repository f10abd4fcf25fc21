use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "picks", version, about = "Proofing-gallery picks client")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Gallery source override (http(s) url or fixture dir)"
    )]
    pub gallery: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a gallery page and load its picks
    Open {
        /// Page url, e.g. https://host/shoot/summer/3 or a fixture-dir path
        url: String,
    },
    /// Show the current page, counter and save status
    Status,
    /// List the items on the current page with their picked state
    Items,
    /// Flip an item in or out of the selection
    Toggle { id: String },
    /// Re-apply the persisted selection onto the current page
    Restore,
    /// Fetch the server-side picks and overwrite the local slot
    Pull,
    /// Send the current selection to the server
    Save,
    /// Save, then move to the next page
    Next,
    /// Save, then move to the previous page (stops at page 0)
    Prev,
    Jar {
        #[command(subcommand)]
        command: JarCommands,
    },
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum JarCommands {
    /// Show the persisted cookie slot for the current gallery
    Show,
    /// Drop the persisted cookie slot
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    Signup {
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        first: String,
        #[arg(long, default_value = "")]
        last: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long, default_value = "")]
        zip: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
}
