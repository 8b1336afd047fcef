use anyhow::Result;
use clap::{Parser, Subcommand};
use pando::areas::repository::Repository;
use pando::artifacts::core::PandoError;

#[derive(Parser)]
#[command(
    name = "pando",
    version = "0.1.0",
    about = "A content-addressed version control core",
    long_about = "pando manages a working directory, a staging index, named branches \
    and a DAG of immutable snapshots, all stored in a local content-addressable \
    object store keyed by CIDs.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new workspace")]
    Init {
        #[arg(index = 1, help = "The path to the workspace")]
        path: Option<String>,
        #[arg(short, long, help = "Author recorded in new snapshots")]
        author: Option<String>,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(name = "stage", about = "Stage files for the next snapshot")]
    Stage {
        #[arg(index = 1, required = true, help = "Files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(name = "snapshot", about = "Create a snapshot from the staged state")]
    Snapshot {
        #[arg(short, long, help = "The snapshot message")]
        message: String,
    },
    #[command(name = "branch", about = "Create, list or delete branches")]
    Branch {
        #[arg(index = 1, help = "Name of the branch to create")]
        name: Option<String>,
        #[arg(short, long, help = "Delete the named branch instead")]
        delete: bool,
    },
    #[command(name = "checkout", about = "Switch to another branch")]
    Checkout {
        #[arg(index = 1, help = "The branch to switch to")]
        branch: String,
    },
    #[command(name = "merge", about = "Merge another branch into the current one")]
    Merge {
        #[arg(index = 1, help = "The branch to merge in")]
        branch: String,
    },
    #[command(name = "log", about = "Show the snapshot history")]
    Log,
    #[command(name = "cat", about = "Print the node form of a stored object")]
    Cat {
        #[arg(index = 1, help = "The CID to print")]
        cid: String,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let open_here = || -> Result<Repository> {
        let pwd = std::env::current_dir()?;
        Repository::new(&pwd, Box::new(std::io::stdout()))
    };

    match &cli.command {
        Commands::Init { path, author } => {
            let mut repository = match path {
                Some(path) => {
                    std::fs::create_dir_all(path)?;
                    Repository::new(std::path::Path::new(path), Box::new(std::io::stdout()))?
                }
                None => open_here()?,
            };
            repository.init(author.clone()).await
        }
        Commands::Status => open_here()?.status().await,
        Commands::Stage { paths } => open_here()?.stage(paths).await,
        Commands::Snapshot { message } => open_here()?.snapshot(message).await,
        Commands::Branch { name, delete } => {
            let mut repository = open_here()?;
            match (name, delete) {
                (Some(name), true) => repository.branch_delete(name).await,
                (Some(name), false) => repository.branch_create(name).await,
                (None, _) => repository.branch_list().await,
            }
        }
        Commands::Checkout { branch } => open_here()?.checkout(branch).await,
        Commands::Merge { branch } => open_here()?.merge(branch).await,
        Commands::Log => open_here()?.log().await,
        Commands::Cat { cid } => open_here()?.cat(cid).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        let code = err
            .downcast_ref::<PandoError>()
            .map(PandoError::exit_code)
            .unwrap_or(3);
        std::process::exit(code);
    }
}
