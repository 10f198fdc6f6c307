//! Persisted board state: `{ children, viewPort, selection }`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, BoardError};
use crate::config::{BoardConfig, ConfigError};
use crate::element::BoardElement;
use crate::operation::OperationError;
use crate::selection::Selection;
use crate::view_port::ViewPort;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    Invalid(#[from] OperationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<BoardError> for DocumentError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::Operation(err) => DocumentError::Invalid(err),
            BoardError::Config(err) => DocumentError::Config(err),
        }
    }
}

/// Serializable snapshot of a board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    #[serde(default)]
    pub children: Vec<BoardElement>,
    #[serde(default)]
    pub view_port: ViewPort,
    #[serde(default)]
    pub selection: Selection,
}

impl BoardDocument {
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Board {
    /// Build a board from a persisted document.
    pub fn from_document(document: BoardDocument, config: BoardConfig) -> Result<Self, DocumentError> {
        let BoardDocument {
            children,
            view_port,
            selection,
        } = document;
        Ok(Board::with_config(children, view_port, selection, config)?)
    }

    /// Snapshot the board's current state.
    pub fn to_document(&self) -> BoardDocument {
        BoardDocument {
            children: self.children(),
            view_port: self.view_port(),
            selection: self.selection().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> &'static str {
        r#"{
            "children": [
                { "id": "a", "type": "card", "x": 0, "y": 0, "width": 10, "height": 10, "text": "hi" },
                { "id": "f", "type": "frame", "x": 0, "y": 0, "width": 100, "height": 100,
                  "children": [{ "id": "b", "type": "card", "x": 5, "y": 5, "width": 10, "height": 10 }] }
            ],
            "viewPort": { "minX": -10, "minY": 5, "width": 800, "height": 600, "zoom": 1 },
            "selection": { "selectArea": null, "selectedIds": ["a"] }
        }"#
    }

    #[test]
    fn test_load_into_board() {
        let document = BoardDocument::from_json(sample()).unwrap();
        let board = Board::from_document(document.clone(), BoardConfig::default()).unwrap();
        assert_eq!(board.scene().len(), 3);
        assert_eq!(board.view_port().min_x, -10.0);
        assert!(board.selection().contains(&"a".into()));
        assert_eq!(board.to_document(), document);
    }

    #[test]
    fn test_missing_fields_default() {
        let document = BoardDocument::from_json("{}").unwrap();
        assert!(document.children.is_empty());
        assert_eq!(document.view_port.zoom, 1.0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let document: BoardDocument = serde_json::from_value(json!({
            "children": [
                { "id": "a", "type": "card", "x": 0, "y": 0 },
                { "id": "a", "type": "card", "x": 1, "y": 1 }
            ]
        }))
        .unwrap();
        assert!(matches!(
            Board::from_document(document, BoardConfig::default()),
            Err(DocumentError::Invalid(OperationError::DuplicateId(_)))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = BoardConfig {
            zoom_step: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            Board::from_document(BoardDocument::default(), config),
            Err(DocumentError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        let document = BoardDocument::from_json(sample()).unwrap();
        document.save(&path).unwrap();
        assert_eq!(BoardDocument::load(&path).unwrap(), document);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            BoardDocument::load(dir.path().join("nope.json")),
            Err(DocumentError::Io(_))
        ));
    }
}
