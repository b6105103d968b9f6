//! Content file loading.
//!
//! A content document is either a bare list of scenes or an object with a
//! `scenes` list, written as JSON or YAML.

use std::path::Path;

use heartline_core::error::GameError;
use serde::Deserialize;
use tracing::info;

use crate::domain::scene::Scene;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SceneDocument {
    List(Vec<Scene>),
    Wrapped { scenes: Vec<Scene> },
}

impl SceneDocument {
    fn into_scenes(self) -> Vec<Scene> {
        match self {
            Self::List(scenes) | Self::Wrapped { scenes } => scenes,
        }
    }
}

/// Parses scenes from a JSON document.
///
/// # Errors
///
/// Returns `GameError::Content` if the document does not match the schema.
pub fn parse_scenes_json(source: &str) -> Result<Vec<Scene>, GameError> {
    serde_json::from_str::<SceneDocument>(source)
        .map(SceneDocument::into_scenes)
        .map_err(|e| GameError::Content(format!("invalid JSON content: {e}")))
}

/// Parses scenes from a YAML document.
///
/// # Errors
///
/// Returns `GameError::Content` if the document does not match the schema.
pub fn parse_scenes_yaml(source: &str) -> Result<Vec<Scene>, GameError> {
    serde_yaml::from_str::<SceneDocument>(source)
        .map(SceneDocument::into_scenes)
        .map_err(|e| GameError::Content(format!("invalid YAML content: {e}")))
}

/// Reads a content file, choosing the format by extension.
///
/// # Errors
///
/// Returns `GameError::Content` if the file cannot be read or parsed.
pub fn load_scenes(path: &Path) -> Result<Vec<Scene>, GameError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| GameError::Content(format!("cannot read {}: {e}", path.display())))?;
    let scenes = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => parse_scenes_yaml(&source)?,
        _ => parse_scenes_json(&source)?,
    };
    info!(path = %path.display(), count = scenes.len(), "loaded scenes");
    Ok(scenes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_json_list() {
        let source = r#"[
            { "sceneName": "a", "displayName": "A", "dialogueLines": ["x"] },
            { "sceneName": "b", "displayName": "B" }
        ]"#;

        let scenes = parse_scenes_json(source).unwrap();

        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[1].id, "b");
        assert!(scenes[1].dialogue_lines.is_empty());
        assert_eq!(scenes[1].rewards.correct_bonus, 0);
    }

    #[test]
    fn test_parse_wrapped_json_document() {
        let source = r#"{ "scenes": [ { "sceneName": "only", "perfectAffectionBonus": 3 } ] }"#;

        let scenes = parse_scenes_json(source).unwrap();

        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].rewards.correct_bonus, 3);
    }

    #[test]
    fn test_parse_yaml_document() {
        let source = "\
scenes:
  - sceneName: rooftop
    displayName: On the Rooftop
    dialogueLines:
      - The stars are out.
    questions:
      - questionText: What is out?
        choices: [The sun, The stars]
        correctAnswerIndex: 1
    perfectAffectionBonus: 8
    wrongAnswerPenalty: 4
";

        let scenes = parse_scenes_yaml(source).unwrap();

        assert_eq!(scenes[0].id, "rooftop");
        assert_eq!(scenes[0].questions[0].choices, vec!["The sun", "The stars"]);
        assert_eq!(scenes[0].rewards.wrong_penalty, 4);
    }

    #[test]
    fn test_malformed_content_is_a_content_error() {
        let result = parse_scenes_json(r#"{ "scenes": 3 }"#);

        assert!(matches!(result, Err(GameError::Content(_))));
    }

    #[test]
    fn test_missing_file_is_a_content_error() {
        let result = load_scenes(Path::new("/definitely/not/here.json"));

        match result {
            Err(GameError::Content(message)) => assert!(message.contains("cannot read")),
            other => panic!("expected Content error, got {other:?}"),
        }
    }
}
