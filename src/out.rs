use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub struct Out {
    prefix: PathBuf,
}

impl Out {
    /// Create a new out writer at `path`. The directory is created if it does not yet exist;
    /// existing files are left in place.
    pub fn at(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;

        Ok(Out {
            prefix: path.canonicalize()?,
        })
    }

    /// Write a file with the given `content` to `out_file`, replacing it if it exists.
    /// Recursively creates the directory of `out_file` if it does not yet exist. Returns the
    /// full path written to.
    pub fn update_file(
        &self,
        content: &mut impl Read,
        out_file: impl AsRef<Path>,
    ) -> anyhow::Result<PathBuf> {
        let out_file = self.prefix.join(out_file);

        if let Some(parent) = out_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut fw = File::create(&out_file)?;
        io::copy(content, &mut fw)?;

        Ok(out_file)
    }
}
