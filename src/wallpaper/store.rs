use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::info;

static STAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Copy the caller's stream into `dir` under `file_name` and return the
/// staged path. Bytes land in a temp file first and are renamed into place,
/// so a reader of the staged path never sees a torn image. The temp file is
/// removed when the copy fails; a failed call leaves nothing behind.
pub fn stage_stream(dir: &Path, stream: &mut dyn Read, file_name: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let final_path = dir.join(file_name);
    let seq = STAGE_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp_path = dir.join(format!(".stage-{}-{seq}", std::process::id()));

    let mut tmp = File::create(&tmp_path)?;
    let copied = match io::copy(stream, &mut tmp).and_then(|n| tmp.sync_all().map(|()| n)) {
        Ok(n) => n,
        Err(e) => {
            drop(tmp);
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
    };
    drop(tmp);

    if let Err(e) = fs::rename(&tmp_path, &final_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    info!("[Wallpaper] Staged {copied} bytes at {}", final_path.display());
    Ok(final_path)
}
