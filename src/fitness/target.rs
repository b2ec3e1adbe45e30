use crate::EvolveError;
use crate::genome::Rgba;
use std::collections::HashMap;
use std::path::Path;
use tiny_skia as sk;

/// The image being approximated.
#[derive(Clone, Debug)]
pub struct Target {
    pixmap: sk::Pixmap,
}

impl Target {
    pub fn from_pixmap(pixmap: sk::Pixmap) -> Self {
        Self { pixmap }
    }

    /// Straight RGBA8 rows, `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, EvolveError> {
        let size = sk::IntSize::from_wh(width, height).ok_or_else(|| {
            EvolveError::InvalidConfig(format!("target must be non-empty, got {width}x{height}"))
        })?;
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(EvolveError::InvalidConfig(format!(
                "expected {expected} RGBA bytes, got {}",
                rgba.len()
            )));
        }
        let premultiplied = rgba
            .chunks_exact(4)
            .flat_map(|px| {
                let c = sk::ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        let pixmap = sk::Pixmap::from_vec(premultiplied, size)
            .ok_or_else(|| EvolveError::InvalidConfig("target buffer rejected".into()))?;
        Ok(Self { pixmap })
    }

    pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Self, EvolveError> {
        let path = path.as_ref();
        let pixmap = sk::Pixmap::load_png(path).map_err(|e| EvolveError::ImageLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::info!(
            "loaded target {:?} ({}x{})",
            path,
            pixmap.width(),
            pixmap.height()
        );
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &sk::Pixmap {
        &self.pixmap
    }

    /// Most common color, found on a 4-bit-per-channel histogram and
    /// averaged over the winning bucket. Used as the canvas background.
    pub fn dominant_color(&self) -> Rgba {
        let mut buckets: HashMap<(u8, u8, u8), (u64, [u64; 3])> = HashMap::new();
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            let key = (c.red() >> 4, c.green() >> 4, c.blue() >> 4);
            let entry = buckets.entry(key).or_insert((0, [0; 3]));
            entry.0 += 1;
            entry.1[0] += c.red() as u64;
            entry.1[1] += c.green() as u64;
            entry.1[2] += c.blue() as u64;
        }
        // Ties go to the lowest bucket key so the choice does not depend on hash order.
        let winner = buckets
            .into_iter()
            .max_by(|(ka, (na, _)), (kb, (nb, _))| na.cmp(nb).then(kb.cmp(ka)));
        match winner {
            Some((_, (n, [r, g, b]))) => Rgba::opaque((r / n) as u8, (g / n) as u8, (b / n) as u8),
            None => Rgba::opaque(255, 255, 255),
        }
    }
}
