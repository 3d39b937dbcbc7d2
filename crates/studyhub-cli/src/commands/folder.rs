//! Materials folder CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use studyhub_api::AppState;
use studyhub_core::error::AppError;
use studyhub_core::types::{FolderId, UserId};
use studyhub_entity::folder::FolderNode;
use studyhub_entity::user::UserRole;
use studyhub_service::{CreateFolderRequest, RequestContext};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List every folder with its path
    List {
        /// Only folders whose name, path or tags contain this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show the folder tree
    Tree {
        /// Max depth (0 shows only roots)
        #[arg(short, long, default_value = "8")]
        depth: usize,
    },
    /// Create a new folder
    Create {
        /// Folder name
        #[arg(short, long)]
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent_id: Option<FolderId>,
        /// Tags, comma separated
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Import a nested materials JSON document into an empty tree
    Import {
        /// Path to the JSON document (an array of root folders)
        path: String,
    },
    /// Delete a folder with its subfolders and files
    Delete {
        /// Folder ID
        id: FolderId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Path
    path: String,
    /// Tags
    tags: String,
    /// Subfolders
    folders: usize,
    /// Files
    files: usize,
    /// Created at
    created_at: String,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let (db, state) = super::build_state(config).await?;
    let ctx = RequestContext::new(UserId::new("cli"), "cli@localhost", UserRole::Admin);
    let folders = &state.folder_service;

    let result = match &args.command {
        FolderCommand::List { query } => {
            let summaries = match query.as_deref() {
                Some(q) => folders.search(&ctx, q).await?,
                None => folders.summaries().await?,
            };
            let rows: Vec<FolderRow> = summaries
                .into_iter()
                .map(|f| FolderRow {
                    id: f.id.to_string(),
                    path: f.path,
                    tags: f.tags.join(", "),
                    folders: f.child_count,
                    files: f.file_count,
                    created_at: f.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
            Ok(())
        }
        FolderCommand::Tree { depth } => {
            let tree = folders.get_tree(&ctx).await?;
            match format {
                OutputFormat::Json => output::print_json(&tree),
                OutputFormat::Table => {
                    println!("/");
                    for node in &tree {
                        print_node(node, 0, *depth);
                    }
                }
            }
            Ok(())
        }
        FolderCommand::Create {
            name,
            parent_id,
            tags,
        } => {
            let node = folders
                .create_folder(
                    &ctx,
                    CreateFolderRequest {
                        name: name.clone(),
                        tags: tags.clone(),
                        parent_id: parent_id.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Folder '{}' created (id: {})", node.name, node.id));
            Ok(())
        }
        FolderCommand::Import { path } => import(&state, &ctx, path).await,
        FolderCommand::Delete { id, yes } => delete(folders, &ctx, id, *yes).await,
    };

    db.close().await;
    result
}

async fn import(state: &AppState, ctx: &RequestContext, path: &str) -> Result<(), AppError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::validation(format!("Cannot read '{path}': {e}")))?;
    let nodes: Vec<FolderNode> = serde_json::from_str(&raw)
        .map_err(|e| AppError::validation(format!("Invalid materials document: {e}")))?;

    let summary = state.file_service.import_nested(ctx, nodes).await?;
    output::print_success(&format!(
        "Imported {} folders and {} files",
        summary.folders, summary.files
    ));
    Ok(())
}

async fn delete(
    folders: &studyhub_service::FolderService,
    ctx: &RequestContext,
    id: &FolderId,
    yes: bool,
) -> Result<(), AppError> {
    if !yes && !output::confirm(&format!("Delete folder {id} and everything inside it?"))? {
        println!("Aborted.");
        return Ok(());
    }

    let outcome = folders.delete_folder(ctx, id).await?;
    if !outcome.deleted {
        output::print_warning(&format!("Folder {id} does not exist"));
        return Ok(());
    }

    output::print_success(&format!("Folder {id} deleted"));
    output::print_kv("Folders removed", &outcome.folders_removed.to_string());
    output::print_kv("Files removed", &outcome.files_removed.to_string());
    if outcome.blobs_deferred > 0 {
        output::print_kv("Blobs deferred", &outcome.blobs_deferred.to_string());
    }
    Ok(())
}

fn print_node(node: &FolderNode, level: usize, max_depth: usize) {
    let indent = "  ".repeat(level + 1);
    println!("{indent}├── {}/  ({})", node.name, node.id);
    for file in &node.files {
        println!("{indent}│   · {} ({} bytes)", file.name, file.size_bytes);
    }
    if level < max_depth {
        for child in &node.sub_folders {
            print_node(child, level + 1, max_depth);
        }
    } else if !node.sub_folders.is_empty() {
        println!("{indent}│   … {} more", node.sub_folders.len());
    }
}
