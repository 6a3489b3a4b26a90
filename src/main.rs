use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use gitlet::areas::repository::Repository;
use gitlet::artifacts::core::Output;
use gitlet::commands::porcelain::merge::MergeOutcome;
use gitlet::errors::GitletError;
use is_terminal::IsTerminal;
use std::process::ExitCode;

/// Exit status for user-facing failures
const USER_ERROR_STATUS: u8 = 1;

/// Exit status for corruption and I/O failures
const FATAL_ERROR_STATUS: u8 = 128;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    about = "A small local version-control system",
    long_about = "Gitlet keeps snapshots of the plain files in the current directory. \
    It supports staging, commits, branches, checkout, reset and three-way merges, \
    all stored under a .gitlet directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

COMMANDS:
{subcommands}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository in the current directory",
        long_about = "This command creates the .gitlet directory with an initial commit \
        and a master branch pointing at it."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, help = "The file to stage")]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes",
        long_about = "This command creates a new commit from the head commit's snapshot \
        with every staged addition and removal applied."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "rm", about = "Unstage a file or stage it for removal")]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the IDs of commits with a matching message")]
    Find {
        #[arg(index = 1, help = "Text the commit message must contain")]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged files and working tree changes")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch. \
        checkout -- <file> restores a file from the head commit. \
        checkout <commit> -- <file> restores a file from the given commit.",
        override_usage = "gitlet checkout <branch>\n       gitlet checkout [<commit>] -- <file>"
    )]
    Checkout {
        #[arg(index = 1, help = "Branch to switch to, or commit to restore from")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the head commit")]
    Branch {
        #[arg(index = 1, help = "The name of the new branch")]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1, help = "The branch to delete")]
        name: String,
    },
    #[command(name = "reset", about = "Move the current branch to a commit")]
    Reset {
        #[arg(index = 1, help = "The full or abbreviated commit ID")]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !(std::io::stdout().is_terminal() && std::io::stderr().is_terminal()) {
        colored::control::set_override(false);
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(error),
    }
}

fn run(command: Commands) -> Result<()> {
    let output = match &command {
        Commands::Log | Commands::GlobalLog => Output::for_listing(),
        _ => Output::Stdout,
    };

    let pwd = std::env::current_dir()?;
    let mut repository = Repository::new(&pwd.to_string_lossy(), output.writer())?;

    match command {
        Commands::Init => repository.init()?,
        Commands::Add { file } => repository.add(&file)?,
        Commands::Commit { message } => repository.commit(&message)?,
        Commands::Rm { file } => repository.rm(&file)?,
        Commands::Log => repository.log()?,
        Commands::GlobalLog => repository.global_log()?,
        Commands::Find { message } => repository.find(&message)?,
        Commands::Status => repository.status()?,
        Commands::Checkout { target, file } => match (target, file) {
            (target, Some(file)) => repository.checkout_file(target.as_deref(), &file)?,
            (Some(branch), None) => repository.checkout_branch(&branch)?,
            (None, None) => Cli::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "checkout needs a branch or `-- <file>`",
                )
                .exit(),
        },
        Commands::Branch { name } => repository.branch(&name)?,
        Commands::RmBranch { name } => repository.rm_branch(&name)?,
        Commands::Reset { commit } => repository.reset(&commit)?,
        Commands::Merge { branch } => report_merge(repository.merge(&branch)?),
    }

    drop(repository);
    output.finish()
}

fn report_merge(outcome: MergeOutcome) {
    match outcome {
        MergeOutcome::AlreadyUpToDate => {
            eprintln!("Given branch is an ancestor of the current branch.")
        }
        MergeOutcome::FastForward => eprintln!("Current branch fast-forwarded."),
        MergeOutcome::Merged { conflicts: true } => {
            eprintln!("{}", "Encountered a merge conflict.".yellow())
        }
        MergeOutcome::Merged { conflicts: false } => {}
    }
}

fn report(error: anyhow::Error) -> ExitCode {
    match error.downcast_ref::<GitletError>() {
        Some(gitlet_error) if !gitlet_error.is_fatal() => {
            eprintln!("{gitlet_error}");
            ExitCode::from(USER_ERROR_STATUS)
        }
        _ => {
            eprintln!("{} {:#}", "fatal:".red(), error);
            ExitCode::from(FATAL_ERROR_STATUS)
        }
    }
}
