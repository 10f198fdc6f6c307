use std::path::PathBuf;

use clap::Parser;
use whiteboard_core::DEFAULT_BOX_KINDS;

#[derive(Parser, Debug, Clone)]
#[command(name = "whiteboard-replay")]
#[command(version)]
#[command(about = "Replay a scripted input stream against a whiteboard document", long_about = None)]
pub struct HostArgs {
    /// Board document to start from (an empty board when omitted)
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// JSON array of input events to replay
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Where to write the resulting document (stdout when omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Board configuration overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Container width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Container height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Element kinds hit-tested as plain boxes (repeatable)
    #[arg(long = "kind", value_name = "KIND")]
    pub kinds: Vec<String>,

    /// Reject edits; only view port changes are applied
    #[arg(long)]
    pub readonly: bool,
}

impl HostArgs {
    /// Registered box kinds, falling back to the built-in set.
    pub fn box_kinds(&self) -> Vec<&str> {
        if self.kinds.is_empty() {
            DEFAULT_BOX_KINDS.to_vec()
        } else {
            self.kinds.iter().map(String::as_str).collect()
        }
    }
}
