//! `documents` command: list backend documents.

use anyhow::Result;
use docchat_core::DocumentSummary;
use tracing::info;

use super::{ProcessExit, RunContext};
use crate::cli::DocumentsArgs;

pub(crate) async fn run_documents_command(
    ctx: &RunContext,
    args: &DocumentsArgs,
) -> Result<ProcessExit> {
    let api = ctx.chat_api(ctx.http_client()?);
    let documents: Vec<DocumentSummary> = api
        .documents()
        .await?
        .into_iter()
        .filter(|doc| !args.templates || doc.is_template)
        .collect();

    if documents.is_empty() {
        info!("No documents found");
        return Ok(ProcessExit::Success);
    }
    for doc in &documents {
        println!("{}", format_document(doc));
    }
    Ok(ProcessExit::Success)
}

fn format_document(doc: &DocumentSummary) -> String {
    let size = doc
        .size
        .map_or_else(|| "-".to_string(), |bytes| format!("{bytes} B"));
    let mut flags = Vec::new();
    if doc.is_template {
        flags.push("template");
    }
    if !doc.is_processed {
        flags.push("unprocessed");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };
    format!("{:>5}  {}  ({size}){flags}", doc.id, doc.name)
}
