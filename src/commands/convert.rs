use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::parser::FilenameParser;
use crate::rename::{self, Owner, RenamePlan};

/// Media file extensions picked up when a directory is given as input
const MEDIA_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "webm", "mov", "m4v"];

/// Flags controlling a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub dry_run: bool,
    pub change_mode: bool,
    pub change_owner: bool,
    pub separate: bool,
    pub json: bool,
    pub out_dir: Option<PathBuf>,
}

/// Command to convert media file names and move the files into place
pub struct ConvertCommand {
    inputs: Vec<String>,
    options: ConvertOptions,
}

impl ConvertCommand {
    pub fn new(inputs: Vec<String>, options: ConvertOptions) -> Self {
        Self { inputs, options }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::from_env();
        let parser = FilenameParser::new()?;

        let files = self.collect_files()?;
        if files.is_empty() {
            warn!("No input files matched.");
            return Ok(());
        }

        // JSON mode owns stdout, keep the log channel quiet there.
        if !(self.options.dry_run && self.options.json) {
            info!("🔎 Planning {} file(s)...", files.len());
        }

        // Parsing is read-only and per-file, so plan the whole batch in
        // parallel before touching the filesystem.
        let plans: Vec<RenamePlan> = files
            .par_iter()
            .map(|path| {
                RenamePlan::build(
                    &parser,
                    path,
                    self.options.separate,
                    self.options.out_dir.as_deref(),
                )
            })
            .collect();

        // An all-tags name parses to nothing; renaming it would bury the
        // file under a bare-extension dotfile.
        let plans: Vec<RenamePlan> = plans
            .into_iter()
            .filter(|plan| {
                if plan.record.title.is_empty() {
                    warn!(
                        "⚠️ cannot make out a title in {}, skipping",
                        plan.source.display()
                    );
                    return false;
                }
                true
            })
            .collect();
        if plans.is_empty() {
            return Ok(());
        }

        if self.options.dry_run {
            if self.options.json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
                return Ok(());
            }
            info!("Dry run...");
            for plan in &plans {
                info!("{} -> {}", plan.source.display(), plan.target.display());
            }
            return Ok(());
        }

        let owner = if self.options.change_owner {
            let owner = Owner::lookup(&config.owner);
            if owner.is_none() {
                warn!(
                    "user {} does not exist, cannot change the file owner",
                    config.owner
                );
            }
            owner
        } else {
            None
        };

        let mut failed = 0usize;
        for plan in &plans {
            info!("{} -> {}", plan.source.display(), plan.target.display());
            if let Err(e) = self.apply(plan, &config, owner).await {
                error!("❌ {}: {}", plan.source.display(), e);
                failed += 1;
            }
        }

        if failed > 0 {
            warn!("⚠️ Converted {} of {} file(s).", plans.len() - failed, plans.len());
        } else {
            info!("✅ Converted {} file(s).", plans.len());
        }
        Ok(())
    }

    async fn apply(&self, plan: &RenamePlan, config: &Config, owner: Option<Owner>) -> Result<()> {
        plan.apply().await?;

        if self.options.change_mode {
            rename::change_mode(&plan.target, config.file_mode).await?;
        }
        if let Some(owner) = owner {
            owner.chown(&plan.target)?;
        }
        Ok(())
    }

    /// Expand the raw inputs: globs through the glob crate, directories by
    /// a recursive walk over known media extensions, files untouched.
    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in &self.inputs {
            if input.contains('*') {
                match glob::glob(input) {
                    Ok(entries) => {
                        for entry in entries {
                            match entry {
                                Ok(path) => files.push(path),
                                Err(e) => warn!("skipping unreadable glob match: {}", e),
                            }
                        }
                    }
                    Err(e) => warn!("skipping invalid glob pattern {}: {}", input, e),
                }
                continue;
            }

            let path = PathBuf::from(input);
            if path.is_dir() {
                let found = walk_media_files(&path);
                debug!("Found {} media file(s) under {:?}", found.len(), path);
                files.extend(found);
                continue;
            }

            files.push(path);
        }

        Ok(files)
    }
}

fn walk_media_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| MEDIA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Read file names from stdin, one per line, and print the converted name
/// for each. Pure preview: no file is touched.
pub async fn preview_stdin() -> Result<()> {
    let parser = FilenameParser::new()?;
    let mut lines = BufReader::new(io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let plan = RenamePlan::build(&parser, Path::new(&line), false, None);
        println!("{}", plan.target.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_walks_directories_for_media() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("movie.mkv"), "").unwrap();
        fs::write(root.join("nested/episode.MP4"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let cmd = ConvertCommand::new(
            vec![root.to_string_lossy().into_owned()],
            ConvertOptions::default(),
        );
        let mut files = cmd.collect_files().unwrap();
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("movie.mkv")));
        assert!(files.iter().any(|p| p.ends_with("nested/episode.MP4")));
    }

    #[test]
    fn test_collect_files_expands_globs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("one.mkv"), "").unwrap();
        fs::write(root.join("two.mkv"), "").unwrap();
        fs::write(root.join("other.avi"), "").unwrap();

        let pattern = root.join("*.mkv").to_string_lossy().into_owned();
        let cmd = ConvertCommand::new(vec![pattern], ConvertOptions::default());
        let files = cmd.collect_files().unwrap();

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_files_skips_invalid_glob_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("one.mkv"), "").unwrap();

        let pattern = root.join("*.mkv").to_string_lossy().into_owned();
        let cmd = ConvertCommand::new(
            vec!["broken[*.mkv".to_string(), pattern],
            ConvertOptions::default(),
        );
        let files = cmd.collect_files().unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("one.mkv"));
    }

    #[test]
    fn test_collect_files_passes_plain_paths_through() {
        let cmd = ConvertCommand::new(
            vec!["does.not.exist.mkv".to_string()],
            ConvertOptions::default(),
        );
        let files = cmd.collect_files().unwrap();
        assert_eq!(files, vec![PathBuf::from("does.not.exist.mkv")]);
    }

    #[tokio::test]
    async fn test_dry_run_leaves_files_alone() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("The.Platform.2019.720p.WEB-DL.SoftSub.mkv");
        fs::write(&source, "").unwrap();

        let cmd = ConvertCommand::new(
            vec![source.to_string_lossy().into_owned()],
            ConvertOptions {
                dry_run: true,
                ..Default::default()
            },
        );
        cmd.execute().await.unwrap();

        assert!(source.exists());
        assert!(!temp_dir.path().join("The Platform (2019).mkv").exists());
    }

    #[tokio::test]
    async fn test_execute_renames_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("war.dogs.2016.mkv");
        fs::write(&source, "").unwrap();

        let cmd = ConvertCommand::new(
            vec![source.to_string_lossy().into_owned()],
            ConvertOptions::default(),
        );
        cmd.execute().await.unwrap();

        assert!(!source.exists());
        assert!(temp_dir.path().join("War Dogs (2016).mkv").exists());
    }

    #[tokio::test]
    async fn test_execute_skips_names_without_a_title() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("720p.HDTV.x264.mkv");
        fs::write(&source, "").unwrap();

        let cmd = ConvertCommand::new(
            vec![source.to_string_lossy().into_owned()],
            ConvertOptions::default(),
        );
        cmd.execute().await.unwrap();

        assert!(source.exists(), "an unparseable name must stay put");
        assert!(!temp_dir.path().join(".mkv").exists());
    }

    #[tokio::test]
    async fn test_execute_continues_after_a_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.2001.mkv");
        let present = temp_dir.path().join("present.2002.mkv");
        fs::write(&present, "").unwrap();

        let cmd = ConvertCommand::new(
            vec![
                missing.to_string_lossy().into_owned(),
                present.to_string_lossy().into_owned(),
            ],
            ConvertOptions::default(),
        );
        cmd.execute().await.unwrap();

        assert!(temp_dir.path().join("Present (2002).mkv").exists());
    }
}
