//! Generated artifacts and the slot that holds the current one.

use std::path::{Path, PathBuf};

/// What a workflow produced. Fixes the download file name and MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    EditedImage,
    GeneratedImage,
    GeneratedVideo,
    GeneratedAudio,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::EditedImage,
        ArtifactKind::GeneratedImage,
        ArtifactKind::GeneratedVideo,
        ArtifactKind::GeneratedAudio,
    ];

    /// File name used when the artifact is saved.
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::EditedImage => "edited-image.jpg",
            ArtifactKind::GeneratedImage => "generated-image.jpg",
            ArtifactKind::GeneratedVideo => "generated-video.mp4",
            ArtifactKind::GeneratedAudio => "generated-audio.wav",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ArtifactKind::EditedImage | ArtifactKind::GeneratedImage => "image/jpeg",
            ArtifactKind::GeneratedVideo => "video/mp4",
            ArtifactKind::GeneratedAudio => "audio/wav",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            ArtifactKind::EditedImage => 0,
            ArtifactKind::GeneratedImage => 1,
            ArtifactKind::GeneratedVideo => 2,
            ArtifactKind::GeneratedAudio => 3,
        }
    }
}

/// An in-memory generation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, bytes: Vec<u8>) -> Self {
        Self { kind, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the artifact into `dir` under its fixed file name, creating the
    /// directory if needed. An existing file is overwritten.
    pub fn save(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.kind.file_name());
        std::fs::write(&path, &self.bytes)?;
        log::info!("studio: saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Holds at most one artifact; the previous one is released as soon as a new
/// generation starts.
#[derive(Debug, Default)]
pub struct ResultSlot {
    current: Option<Artifact>,
}

impl ResultSlot {
    /// Release the held artifact ahead of a new generation.
    pub fn begin(&mut self) {
        if let Some(old) = self.current.take() {
            log::debug!(
                "studio: released previous {} ({} bytes)",
                old.kind.file_name(),
                old.len()
            );
        }
    }

    pub fn set(&mut self, artifact: Artifact) -> &Artifact {
        self.current.insert(artifact)
    }

    pub fn get(&self) -> Option<&Artifact> {
        self.current.as_ref()
    }

    pub fn take(&mut self) -> Option<Artifact> {
        self.current.take()
    }
}
