//! Headless whiteboard host.
//!
//! Loads a board document, mounts it into a fixed-size container and replays
//! a scripted event stream through the plugin pipeline.

pub mod cli;
pub mod script;

use std::path::{Path, PathBuf};

use kurbo::Size;
use thiserror::Error;
use whiteboard_core::{Board, BoardConfig, BoardDocument, ConfigError, DocumentError, OperationError};

pub use cli::HostArgs;
pub use script::{Replayer, ScriptEvent};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid document: {0}")]
    Document(#[from] DocumentError),

    #[error("Operation failed: {0}")]
    Operation(#[from] OperationError),
}

fn read(path: &Path) -> Result<String, HostError> {
    std::fs::read_to_string(path).map_err(|source| HostError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: Option<&Path>) -> Result<BoardConfig, HostError> {
    match path {
        Some(path) => Ok(BoardConfig::from_json(&read(path)?)?),
        None => Ok(BoardConfig::default()),
    }
}

pub fn load_document(path: Option<&Path>) -> Result<BoardDocument, HostError> {
    match path {
        Some(path) => Ok(BoardDocument::from_json(&read(path)?)?),
        None => Ok(BoardDocument::default()),
    }
}

pub fn load_script(path: Option<&Path>) -> Result<Vec<ScriptEvent>, HostError> {
    match path {
        Some(path) => Ok(serde_json::from_str(&read(path)?)?),
        None => Ok(Vec::new()),
    }
}

/// Replay the script against the document and return the final state.
pub fn run(args: &HostArgs) -> Result<BoardDocument, HostError> {
    let config = load_config(args.config.as_deref())?;
    let document = load_document(args.document.as_deref())?;
    let events = load_script(args.script.as_deref())?;

    let mut board = Board::from_document(document, config)?;
    board.register_box_kinds(args.box_kinds());
    board.set_readonly(args.readonly);
    log::info!(
        "Loaded board {} with {} element(s)",
        board.id(),
        board.scene().len()
    );

    let mut replayer = Replayer::new(board, Size::new(args.width, args.height));
    replayer.play_all(&events);
    log::info!("Replayed {} event(s)", events.len());
    Ok(replayer.document())
}

/// Write the document as pretty JSON to `path`.
pub fn write_document(document: &BoardDocument, path: &Path) -> Result<(), HostError> {
    let json = document.to_json()?;
    std::fs::write(path, json).map_err(|source| HostError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const DOCUMENT: &str = r#"{
        "children": [
            { "id": "a", "type": "card", "x": 0, "y": 0, "width": 50, "height": 50 },
            { "id": "s", "type": "sticky", "x": 100, "y": 0, "width": 50, "height": 50 }
        ]
    }"#;

    fn args(dir: &Path, extra: &[&str]) -> HostArgs {
        let document = dir.join("board.json");
        let script = dir.join("script.json");
        let mut argv = vec![
            "whiteboard-replay".to_string(),
            "--document".to_string(),
            document.display().to_string(),
            "--script".to_string(),
            script.display().to_string(),
        ];
        argv.extend(extra.iter().map(ToString::to_string));
        HostArgs::parse_from(argv)
    }

    #[test]
    fn test_run_applies_script() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("board.json"), DOCUMENT).unwrap();
        std::fs::write(
            dir.path().join("script.json"),
            r#"[
                { "event": "key_down", "key": "a", "ctrl": true },
                { "event": "key_down", "key": "ArrowRight" }
            ]"#,
        )
        .unwrap();

        let document = run(&args(dir.path(), &[])).unwrap();
        let selected: Vec<_> = document.selection.selected.iter().map(ToString::to_string).collect();
        assert_eq!(selected, vec!["a", "s"]);
        // Selection is not empty, so arrow keys leave the view alone.
        assert_eq!(document.view_port.min_x, 0.0);
        assert_eq!(document.view_port.width, 800.0);
    }

    #[test]
    fn test_custom_kinds_are_hit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("board.json"), DOCUMENT).unwrap();
        std::fs::write(
            dir.path().join("script.json"),
            r#"[
                { "event": "pointer_down", "x": 125, "y": 25 },
                { "event": "pointer_up", "x": 125, "y": 25 }
            ]"#,
        )
        .unwrap();

        let defaults = run(&args(dir.path(), &[])).unwrap();
        assert!(defaults.selection.selected.is_empty());

        let custom = run(&args(dir.path(), &["--kind", "sticky"])).unwrap();
        assert_eq!(custom.selection.selected, vec!["s".into()]);
    }

    #[test]
    fn test_readonly_keeps_elements() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("board.json"), DOCUMENT).unwrap();
        std::fs::write(
            dir.path().join("script.json"),
            r#"[
                { "event": "pointer_down", "x": 10, "y": 10 },
                { "event": "pointer_move", "x": 60, "y": 60 },
                { "event": "pointer_up", "x": 60, "y": 60 }
            ]"#,
        )
        .unwrap();

        let document = run(&args(dir.path(), &["--readonly"])).unwrap();
        assert_eq!(document.children[0].element.x, 0.0);
    }

    #[test]
    fn test_missing_document_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&args(dir.path(), &[])).unwrap_err();
        match err {
            HostError::Read { path, .. } => assert!(path.ends_with("board.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "zoomStep": 0.5 }"#).unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(HostError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let document = BoardDocument::from_json(DOCUMENT).unwrap();
        write_document(&document, &path).unwrap();
        assert_eq!(load_document(Some(&path)).unwrap(), document);
    }
}
