use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

#[derive(Parser, Debug)]
#[command(name = "docfill", version, about = "Contract template filling CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    List,
    Init {
        #[arg(long = "type", help = "Contract variant key, e.g. weituo")]
        contract_type: Option<String>,
        #[arg(long, help = "Free-form description used to detect the variant")]
        intent: Option<String>,
        #[arg(long, help = "Template .docx path (defaults to <templates-dir>/<key>.docx)")]
        template: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_TEMPLATES_DIR)]
        templates_dir: PathBuf,
        #[arg(long, help = "Where to write the session state file")]
        state: PathBuf,
    },
    Update {
        #[arg(long)]
        state: PathBuf,
        #[arg(long, requires = "value")]
        field: Option<String>,
        #[arg(long, requires = "field")]
        value: Option<String>,
        #[arg(long, help = "JSON object of field/value pairs")]
        batch: Option<String>,
        #[arg(
            long,
            num_args = 1..,
            conflicts_with_all = ["field", "value", "batch"],
            help = "Remove recorded fields instead of adding"
        )]
        delete: Vec<String>,
    },
    Status {
        #[arg(long)]
        state: PathBuf,
    },
    Fill {
        #[arg(long)]
        state: PathBuf,
        #[arg(long, help = "Override the template recorded in the session")]
        template: Option<PathBuf>,
        #[arg(long, help = "Output .docx path (required unless --check)")]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        force: bool,
        #[arg(long, default_value_t = false, help = "Only report completeness, do not render")]
        check: bool,
    },
    Amount {
        value: String,
    },
}
