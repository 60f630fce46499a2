//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use docchat_core::Preset;

/// Ask the document-chat assistant and fetch the documents it links.
///
/// Docchat finds download links in assistant replies, prints the reply
/// without them and saves the linked documents under readable filenames.
#[derive(Parser, Debug)]
#[command(name = "docchat")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/docchat/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Chat backend root URL (overrides `base_url` from the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List download links found in a reply (reads stdin when no text is given)
    Extract(ExtractArgs),
    /// Print a reply with its download links removed
    Sanitize(SanitizeArgs),
    /// Turn a link label into a filename
    Filename(FilenameArgs),
    /// Download one document
    Download(DownloadArgs),
    /// Ask the assistant a question
    Ask(AskArgs),
    /// List documents stored on the backend
    Documents(DocumentsArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
}

#[derive(ClapArgs, Debug)]
pub struct ExtractArgs {
    /// Reply text; joined with newlines
    pub text: Vec<String>,

    /// Print links as JSON
    #[arg(long)]
    pub json: bool,

    /// Built-in pattern set (overrides `pattern_set` from the config file)
    #[arg(long, value_enum, value_name = "NAME")]
    pub pattern_set: Option<Preset>,
}

#[derive(ClapArgs, Debug)]
pub struct SanitizeArgs {
    /// Reply text; joined with newlines
    pub text: Vec<String>,
}

#[derive(ClapArgs, Debug)]
pub struct FilenameArgs {
    /// Link label, e.g. "Məzuniyyət Ərizəsi"
    pub label: String,

    /// Extension without the dot
    #[arg(long, value_name = "EXT")]
    pub ext: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct DownloadArgs {
    /// Document URL; relative URLs resolve against the backend root
    pub url: String,

    /// Save under this filename instead of the server-provided one
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Output directory (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct AskArgs {
    /// Question for the assistant
    pub question: String,

    /// Continue an existing conversation
    #[arg(long, value_name = "ID")]
    pub conversation: Option<i64>,

    /// Ask about one document
    #[arg(long, value_name = "ID")]
    pub document: Option<i64>,

    /// Download every linked document
    #[arg(long)]
    pub download: bool,

    /// Name downloads after their link label instead of server metadata
    #[arg(long, requires = "download")]
    pub name_from_label: bool,

    /// Output directory for downloads (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct DocumentsArgs {
    /// Only list templates
    #[arg(long)]
    pub templates: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_subcommand() {
        let err = Args::try_parse_from(["docchat"]).unwrap_err();
        assert!(matches!(
            err.kind(),
            clap::error::ErrorKind::MissingSubcommand
                | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["docchat", "-v", "sanitize"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["docchat", "-vv", "sanitize"]).unwrap();
        assert_eq!(args.verbose, 2);

        let args = Args::try_parse_from(["docchat", "sanitize", "--verbose", "--verbose"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["docchat", "-q", "sanitize"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["docchat", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["docchat", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["docchat", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_extract_collects_text_and_flags() {
        let args = Args::try_parse_from([
            "docchat",
            "extract",
            "--json",
            "--pattern-set",
            "chat-view",
            "line one",
            "line two",
        ])
        .unwrap();
        let Command::Extract(extract) = args.command else {
            panic!("expected extract");
        };
        assert!(extract.json);
        assert_eq!(extract.pattern_set, Some(Preset::ChatView));
        assert_eq!(extract.text, vec!["line one", "line two"]);
    }

    #[test]
    fn test_cli_extract_rejects_unknown_pattern_set() {
        let err = Args::try_parse_from(["docchat", "extract", "--pattern-set", "nope"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn test_cli_filename_with_extension() {
        let args = Args::try_parse_from(["docchat", "filename", "Ərizə", "--ext", "pdf"]).unwrap();
        let Command::Filename(filename) = args.command else {
            panic!("expected filename");
        };
        assert_eq!(filename.label, "Ərizə");
        assert_eq!(filename.ext.as_deref(), Some("pdf"));
    }

    #[test]
    fn test_cli_download_output_dir_short_flag() {
        let args = Args::try_parse_from([
            "docchat",
            "download",
            "http://localhost:5000/api/documents/1/download",
            "-o",
            "/tmp/out",
            "--name",
            "forma.docx",
        ])
        .unwrap();
        let Command::Download(download) = args.command else {
            panic!("expected download");
        };
        assert_eq!(download.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(download.name.as_deref(), Some("forma.docx"));
    }

    #[test]
    fn test_cli_ask_ids_and_download() {
        let args = Args::try_parse_from([
            "docchat",
            "ask",
            "Məzuniyyət ərizəsi lazımdır",
            "--conversation",
            "12",
            "--document",
            "3",
            "--download",
            "--name-from-label",
        ])
        .unwrap();
        let Command::Ask(ask) = args.command else {
            panic!("expected ask");
        };
        assert_eq!(ask.conversation, Some(12));
        assert_eq!(ask.document, Some(3));
        assert!(ask.download);
        assert!(ask.name_from_label);
    }

    #[test]
    fn test_cli_name_from_label_requires_download() {
        let err = Args::try_parse_from(["docchat", "ask", "sual", "--name-from-label"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_config_show() {
        let args = Args::try_parse_from(["docchat", "config", "show"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn test_cli_global_config_and_base_url() {
        let args = Args::try_parse_from([
            "docchat",
            "documents",
            "--templates",
            "--config",
            "/etc/docchat.toml",
            "--base-url",
            "http://127.0.0.1:8080",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/docchat.toml")));
        assert_eq!(args.base_url.as_deref(), Some("http://127.0.0.1:8080"));
        let Command::Documents(documents) = args.command else {
            panic!("expected documents");
        };
        assert!(documents.templates);
    }
}
