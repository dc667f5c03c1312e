//! Filesystem-backed chapter source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use novella_core::error::DomainError;
use novella_core::ids::ChapterId;
use novella_core::repository::{ChapterSource, ContentFormat, RawChapter};

/// Default file name template; `{id}` is replaced with the chapter number.
pub const DEFAULT_PATH_TEMPLATE: &str = "chapter{id}.json";

/// Reads `chapter{id}.json` (or `.yaml`) documents from a content directory.
#[derive(Debug, Clone)]
pub struct FileChapterSource {
    root: PathBuf,
    template: String,
    format: ContentFormat,
}

impl FileChapterSource {
    /// Creates a source rooted at `root` using [`DEFAULT_PATH_TEMPLATE`].
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_template(root, DEFAULT_PATH_TEMPLATE)
    }

    /// Creates a source with a custom path template. A `.yaml`/`.yml`
    /// extension selects YAML parsing; anything else is read as JSON.
    #[must_use]
    pub fn with_template(root: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        let template = template.into();
        let format = match Path::new(&template).extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ContentFormat::Yaml,
            _ => ContentFormat::Json,
        };
        Self {
            root: root.into(),
            template,
            format,
        }
    }

    /// Resolves the on-disk path for a chapter.
    #[must_use]
    pub fn path_for(&self, chapter_id: ChapterId) -> PathBuf {
        self.root
            .join(self.template.replace("{id}", &chapter_id.to_string()))
    }
}

#[async_trait]
impl ChapterSource for FileChapterSource {
    async fn fetch(&self, chapter_id: ChapterId) -> Result<Option<RawChapter>, DomainError> {
        let path = self.path_for(chapter_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(Some(RawChapter {
                format: self.format,
                body,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Infrastructure(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }
}
