//! `ask` command: question, clean answer, linked documents.

use anyhow::Result;
use docchat_core::{AskRequest, DiscoveredLink, DocumentRef, sanitize};
use futures_util::future::join_all;
use tracing::{info, warn};

use super::text::{format_link, pattern_set};
use super::{ProcessExit, RunContext, determine_exit_outcome};
use crate::cli::AskArgs;

pub(crate) async fn run_ask_command(ctx: &RunContext, args: &AskArgs) -> Result<ProcessExit> {
    let client = ctx.http_client()?;
    let api = ctx.chat_api(client.clone());
    let request = AskRequest {
        question: args.question.clone(),
        conversation_id: args.conversation,
        document_id: args.document,
    };
    let reply = api.ask(&request).await?;

    let links = pattern_set(&ctx.config, None)?.extract(&reply.answer);
    println!("{}", sanitize(&reply.answer, &links));
    if !links.is_empty() {
        println!();
        for link in &links {
            println!("{}", format_link(link));
        }
    }
    if !reply.available_documents.is_empty() {
        println!();
        for doc in &reply.available_documents {
            println!("{}", format_document_choice(doc));
        }
        info!("ask again with --document <id> to pick one");
    }
    if let Some(conversation_id) = reply.conversation_id {
        info!(conversation_id, "continue with --conversation {conversation_id}");
    }

    if !args.download || links.is_empty() {
        return Ok(ProcessExit::Success);
    }

    let downloader = ctx.downloader(client, args.output_dir.as_deref());
    let policy = ctx.config.filename_policy();
    let extension = ctx.config.default_extension();
    let suggestions: Vec<Option<String>> = links
        .iter()
        .map(|link| suggested_name(link, args.name_from_label, |label| {
            policy.derive(label, Some(extension))
        }))
        .collect();

    let results = join_all(links.iter().zip(&suggestions).map(|(link, suggested)| {
        downloader.download(&link.url, suggested.as_deref())
    }))
    .await;

    let mut completed = 0;
    let mut failed = 0;
    for (link, result) in links.iter().zip(results) {
        match result {
            Ok(outcome) => {
                completed += 1;
                println!(
                    "Saved {} ({} bytes)",
                    outcome.saved_to.display(),
                    outcome.byte_size
                );
            }
            Err(err) => {
                failed += 1;
                warn!(label = %link.label, url = %link.url, error = %err, "download failed");
                eprintln!("Failed to download '{}': {err}", link.label);
            }
        }
    }
    info!(completed, failed, total = links.len(), "downloads finished");
    Ok(determine_exit_outcome(completed, failed))
}

fn format_document_choice(doc: &DocumentRef) -> String {
    format!("{:>5}  {}", doc.id, doc.name)
}

fn suggested_name(
    link: &DiscoveredLink,
    from_label: bool,
    derive: impl Fn(&str) -> String,
) -> Option<String> {
    from_label.then(|| derive(&link.label))
}
