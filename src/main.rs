use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use seaseed_admin::api::{ApiClient, ApiError};
use seaseed_admin::config::{AdminConfig, ConfigError, normalize_base_url};
use seaseed_admin::router::{GuardPolicy, Navigation, Page, RouteGuard, Router};
use seaseed_admin::session::{FileTokenStore, Session};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("`{from}` requires login; redirected to `{to}`")]
    Redirected { from: &'static str, to: &'static str },
    #[error("no page at {0}")]
    NotFound(String),
    #[error("missing required option --{0} for this page")]
    MissingOption(&'static str),
}

#[derive(Parser, Debug)]
#[command(name = "seaseed-admin", about = "Seaseed auction and fish-trading admin CLI")]
struct Cli {
    #[arg(long, env = "AUCTION_API_BASE_URL")]
    auction_url: Option<String>,

    #[arg(long, env = "FISHON_API_BASE_URL")]
    fishon_url: Option<String>,

    #[arg(long, env = "SEASEED_STORAGE_PATH", help = "Token storage file")]
    storage: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with a Fishon account and store the session token.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "FISHON_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token.
    Logout,
    /// Show the logged-in Fishon user.
    Whoami,
    /// Navigate to a page path and print the data it shows.
    Open(OpenArgs),
    /// Read a marketplace config value.
    Config { key: String },
    Auctions(AuctionsCommand),
    Approvals(ApprovalsCommand),
    Fish(FishCommand),
    Seaseed(SeaseedCommand),
    Bni(BniCommand),
}

#[derive(Args, Debug)]
struct OpenArgs {
    path: String,
    #[arg(long, default_value = "created")]
    sort: String,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long)]
    area: Option<String>,
    #[arg(long)]
    store: Option<String>,
}

#[derive(Args, Debug)]
struct AuctionsCommand {
    #[command(subcommand)]
    command: AuctionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuctionsSubcommand {
    List {
        #[arg(long, default_value = "created")]
        sort: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    Admin {
        #[arg(long, default_value = "")]
        fisherman: String,
    },
    Pending {
        #[arg(long)]
        store: String,
    },
    Accept {
        #[arg(long)]
        store: String,
        #[arg(long)]
        id: u64,
        #[arg(long)]
        minutes: u32,
        #[arg(long)]
        group: Option<String>,
    },
    Reject {
        #[arg(long)]
        store: String,
        #[arg(long)]
        id: u64,
    },
    Process,
    Delete {
        id: u64,
    },
    Create {
        #[arg(long)]
        store: String,
        #[arg(long)]
        group: String,
        #[arg(long, help = "Fish to sell, as JSON")]
        data: String,
    },
}

#[derive(Args, Debug)]
struct ApprovalsCommand {
    #[command(subcommand)]
    command: ApprovalsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApprovalsSubcommand {
    List,
    Approve { user_id: u64 },
    Reject { user_id: u64 },
}

#[derive(Args, Debug)]
struct FishCommand {
    #[command(subcommand)]
    command: FishSubcommand,
}

#[derive(Subcommand, Debug)]
enum FishSubcommand {
    List {
        #[arg(long)]
        area: Option<String>,
    },
    Perindo,
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: u64,
    },
}

#[derive(Args, Debug)]
struct SeaseedCommand {
    #[command(subcommand)]
    command: SeaseedSubcommand,
}

#[derive(Subcommand, Debug)]
enum SeaseedSubcommand {
    User {
        uuid: String,
    },
    Me,
    ColdStorage,
    Banks,
    Transactions,
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: u64,
    },
    Withdraw {
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        email: String,
        #[arg(long)]
        account_no: String,
        #[arg(long)]
        bank_code: String,
    },
    ProcessCost,
}

#[derive(Args, Debug)]
struct BniCommand {
    #[command(subcommand)]
    command: BniSubcommand,
}

#[derive(Subcommand, Debug)]
enum BniSubcommand {
    ColdStorage,
    Account {
        #[arg(long)]
        account_no: Option<String>,
    },
    Transfers,
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: u64,
    },
}

type Client = ApiClient;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let session = Session::new(FileTokenStore::new(&config.storage_path));
    let client = Arc::new(ApiClient::from_config(&config, session.clone())?);

    match cli.command {
        Command::Login { username, password } => {
            client.login(&username, &password).await?;
            println!("logged in as {username}");
            Ok(())
        }
        Command::Logout => {
            client.logout()?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => print_json(&client.get_current_user().await?),
        Command::Open(args) => {
            let policy = GuardPolicy { clear_token_on_reject: config.clear_token_on_reject };
            let router = Router::new(RouteGuard::new(session, Arc::clone(&client), policy));
            run_open(&client, &router, args).await
        }
        Command::Config { key } => print_json(&client.get_config(&key).await?),
        Command::Auctions(cmd) => run_auctions(&client, cmd).await,
        Command::Approvals(cmd) => run_approvals(&client, cmd).await,
        Command::Fish(cmd) => run_fish(&client, cmd).await,
        Command::Seaseed(cmd) => run_seaseed(&client, cmd).await,
        Command::Bni(cmd) => run_bni(&client, cmd).await,
    }
}

fn resolve_config(cli: &Cli) -> Result<AdminConfig, CliError> {
    let mut config = AdminConfig::from_env()?;
    if let Some(url) = &cli.auction_url {
        config.auction.base_url = normalize_base_url(Some(url.clone()), &config.auction.base_url);
    }
    if let Some(url) = &cli.fishon_url {
        config.fishon.base_url = normalize_base_url(Some(url.clone()), &config.fishon.base_url);
    }
    if let Some(path) = &cli.storage {
        config.storage_path.clone_from(path);
    }
    Ok(config)
}

async fn run_open(client: &Client, router: &Router<Arc<Client>>, args: OpenArgs) -> Result<(), CliError> {
    let route = match router.navigate(&args.path).await {
        Navigation::Allow(route) => route,
        Navigation::Redirect { from, to } => return Err(CliError::Redirected { from: from.name, to: to.name }),
    };
    tracing::debug!(route = route.name, "entered route");

    let body = match route.page {
        Page::Home | Page::Auction => client.get_auctions(&args.sort, &args.search).await?,
        Page::Login => {
            println!("run `seaseed-admin login --username <name>` to sign in");
            return Ok(());
        }
        Page::Admin => client.get_current_user().await?,
        Page::AdminApprovals => client.get_approvals().await?,
        Page::AdminFish => client.get_fish_list(args.area.as_deref()).await?,
        Page::AdminPendingAuctions => {
            let store = args.store.as_deref().ok_or(CliError::MissingOption("store"))?;
            client.get_pending_auctions(store).await?
        }
        Page::Layout | Page::NotFound => return Err(CliError::NotFound(args.path)),
    };

    print_json(&body)
}

async fn run_auctions(client: &Client, cmd: AuctionsCommand) -> Result<(), CliError> {
    let body = match cmd.command {
        AuctionsSubcommand::List { sort, search } => client.get_auctions(&sort, &search).await?,
        AuctionsSubcommand::Admin { fisherman } => client.get_admin_auctions(&fisherman).await?,
        AuctionsSubcommand::Pending { store } => client.get_pending_auctions(&store).await?,
        AuctionsSubcommand::Accept { store, id, minutes, group } => {
            client
                .accept_ospos_auction(&store, id, minutes, group.as_deref())
                .await?
        }
        AuctionsSubcommand::Reject { store, id } => client.reject_ospos_auction(&store, id).await?,
        AuctionsSubcommand::Process => client.process_auction().await?,
        AuctionsSubcommand::Delete { id } => client.delete_auction(id).await?,
        AuctionsSubcommand::Create { store, group, data } => {
            let fish = serde_json::from_str::<Value>(&data)?;
            client.create_auction(&store, &group, &fish).await?
        }
    };
    print_json(&body)
}

async fn run_approvals(client: &Client, cmd: ApprovalsCommand) -> Result<(), CliError> {
    let body = match cmd.command {
        ApprovalsSubcommand::List => client.get_approvals().await?,
        ApprovalsSubcommand::Approve { user_id } => client.approve_approval(user_id, true).await?,
        ApprovalsSubcommand::Reject { user_id } => client.approve_approval(user_id, false).await?,
    };
    print_json(&body)
}

async fn run_fish(client: &Client, cmd: FishCommand) -> Result<(), CliError> {
    let body = match cmd.command {
        FishSubcommand::List { area } => client.get_fish_list(area.as_deref()).await?,
        FishSubcommand::Perindo => client.get_perindo_fish_list().await?,
        FishSubcommand::Create { data } => {
            let fish = serde_json::from_str::<Value>(&data)?;
            client.create_fish(&fish).await?
        }
        FishSubcommand::Update { id, data } => {
            let fish = serde_json::from_str::<Value>(&data)?;
            client.update_fish(id, &fish).await?
        }
        FishSubcommand::Delete { id } => client.delete_fish(id).await?,
    };
    print_json(&body)
}

async fn run_seaseed(client: &Client, cmd: SeaseedCommand) -> Result<(), CliError> {
    let body = match cmd.command {
        SeaseedSubcommand::User { uuid } => client.get_seaseed_user(&uuid).await?,
        SeaseedSubcommand::Me => client.get_current_seaseed_user().await?,
        SeaseedSubcommand::ColdStorage => client.get_cold_storage_list().await?,
        SeaseedSubcommand::Banks => client.get_banks().await?,
        SeaseedSubcommand::Transactions => client.get_transactions().await?,
        SeaseedSubcommand::Transfer { from, to, amount } => client.create_transfer(&from, &to, amount).await?,
        SeaseedSubcommand::Withdraw { amount, email, account_no, bank_code } => {
            client
                .create_withdrawal(amount, &email, &account_no, &bank_code)
                .await?
        }
        SeaseedSubcommand::ProcessCost => client.process_cost().await?,
    };
    print_json(&body)
}

async fn run_bni(client: &Client, cmd: BniCommand) -> Result<(), CliError> {
    let body = match cmd.command {
        BniSubcommand::ColdStorage => client.get_bni_cold_storage_list().await?,
        BniSubcommand::Account { account_no: Some(account_no) } => client.get_bni_account_by_no(&account_no).await?,
        BniSubcommand::Account { account_no: None } => client.get_current_bni_account().await?,
        BniSubcommand::Transfers => client.get_bni_transfers().await?,
        BniSubcommand::Transfer { from, to, amount } => client.create_bni_transfer(&from, &to, amount).await?,
    };
    print_json(&body)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
