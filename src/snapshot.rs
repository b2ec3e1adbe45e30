use crate::EvolveError;
use crate::fitness::Rasterizer;
use crate::genome::{Genome, Rgba};
use std::path::{Path, PathBuf};

/// Renders genomes to a fixed PNG path, overwriting it each time.
pub struct SnapshotWriter<R: Rasterizer> {
    path: PathBuf,
    rasterizer: R,
    width: u32,
    height: u32,
    background: Rgba,
}

impl<R: Rasterizer> SnapshotWriter<R> {
    pub fn new<P: Into<PathBuf>>(
        path: P,
        rasterizer: R,
        width: u32,
        height: u32,
        background: Rgba,
    ) -> Self {
        Self {
            path: path.into(),
            rasterizer,
            width,
            height,
            background,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, genome: &Genome) -> Result<(), EvolveError> {
        let pix = self
            .rasterizer
            .render(genome, self.width, self.height, self.background)?;
        pix.save_png(&self.path).map_err(|e| EvolveError::Snapshot {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// Like [`write`](Self::write), but a failure is only logged.
    pub fn record(&self, genome: &Genome) {
        if let Err(err) = self.write(genome) {
            log::warn!("snapshot skipped: {err}");
        }
    }
}
