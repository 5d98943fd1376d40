use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docdesk",
    about = "Upload, search and track documents on your document-processing API"
)]
pub struct Cli {
    /// API base URL (overrides config.toml and DOCDESK_API_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and remember the session
    Login {
        username: String,
        /// Password (prompted without echo when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and log in
    Register {
        username: String,
        /// Password (prompted without echo when omitted)
        #[arg(long)]
        password: Option<String>,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Upload a document
    Upload {
        file: PathBuf,
    },
    /// Search the document index
    Search {
        /// Free-text query
        #[arg(trailing_var_arg = true, num_args = 0..)]
        query: Vec<String>,
        /// Filter by category (e.g. invoice, resume)
        #[arg(long, default_value = "")]
        category: String,
        /// Filter by file type (e.g. pdf, docx)
        #[arg(long = "type", default_value = "")]
        doc_type: String,
    },
    /// Show the processing history of a document
    Status {
        document_id: Option<String>,
    },
    /// Get a download link and open it in the browser
    Download {
        document_id: String,
        /// Print the link without launching a browser
        #[arg(long)]
        no_open: bool,
    },
    /// List the five most recent uploads
    Recent,
    /// Open the interactive TUI
    Ui,
}
