//! Output file naming for an image set.

use std::path::{Path, PathBuf};

/// Paths of the files written for one image set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// `<name>_texture.png`
    pub texture: PathBuf,
    /// `<name>_defects.png`
    pub defects: PathBuf,
    /// `<name>_depth.png`
    pub depth: PathBuf,
    /// `<name>_texture.svg`
    pub texture_svg: PathBuf,
    /// `<name>_defects.svg`
    pub defects_svg: PathBuf,
    /// `<name>_depth.svg`
    pub depth_svg: PathBuf,
}

impl OutputNames {
    /// Builds the paths for the set `name` inside `dir`.
    pub fn for_set(dir: impl AsRef<Path>, name: &str) -> Self {
        let dir = dir.as_ref();
        let file = |suffix: &str, ext: &str| dir.join(format!("{}_{}.{}", name, suffix, ext));
        Self {
            texture: file("texture", "png"),
            defects: file("defects", "png"),
            depth: file("depth", "png"),
            texture_svg: file("texture", "svg"),
            defects_svg: file("defects", "svg"),
            depth_svg: file("depth", "svg"),
        }
    }

    /// The three raster paths in texture, defects, depth order.
    pub fn pngs(&self) -> [&Path; 3] {
        [&self.texture, &self.defects, &self.depth]
    }

    /// The three vector paths in texture, defects, depth order.
    pub fn svgs(&self) -> [&Path; 3] {
        [&self.texture_svg, &self.defects_svg, &self.depth_svg]
    }
}

/// Name of the `index`-th set of a batch, e.g. `slate-00003`.
pub fn batch_set_name(prefix: &str, index: u32) -> String {
    format!("{}-{:05}", prefix, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_set_suffixes() {
        let names = OutputNames::for_set("out", "slate-00001");
        assert_eq!(names.texture, Path::new("out/slate-00001_texture.png"));
        assert_eq!(names.defects, Path::new("out/slate-00001_defects.png"));
        assert_eq!(names.depth, Path::new("out/slate-00001_depth.png"));
        assert_eq!(names.depth_svg, Path::new("out/slate-00001_depth.svg"));
    }

    #[test]
    fn test_batch_set_name_padding() {
        assert_eq!(batch_set_name("asphalt", 0), "asphalt-00000");
        assert_eq!(batch_set_name("cobblestone", 42), "cobblestone-00042");
    }
}
