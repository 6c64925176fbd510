pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::path::{Component, Path, PathBuf};
use std::process::ExitStatus;

use chrono::Utc;
use error::*;
use exo_webclient::{ping, Client, ClientContext, PingResult, Solution, SolutionRequest, UploadFile};
use lazy_regex::regex_replace;

use crate::interactive::Choice;
use crate::workspace::{
    Document, Exercise, ExerciseConfig, ExerciseMetadata, MigrationStatus, Platform,
    TestConfiguration, Transmission, Workspace,
};

/// Files of this size or larger are refused by the server.
pub const MAX_FILE_SIZE: u64 = 65535;

pub fn metadata_from_solution(sol: &Solution) -> ExerciseMetadata {
    ExerciseMetadata {
        track: sol.exercise.track.id.clone(),
        exercise_slug: sol.exercise.id.clone(),
        id: sol.id.clone(),
        team: sol.team_slug().to_owned(),
        url: sol.url.clone(),
        handle: sol.user.handle.clone(),
        is_requester: sol.user.is_requester,
        submitted_at: sol.submitted_at(),
        auto_approve: sol.exercise.auto_approve,
        dir: PathBuf::new(),
    }
}

#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub metadata: ExerciseMetadata,
    pub written: Vec<PathBuf>,
    /// Already present and not overwritten.
    pub skipped: Vec<PathBuf>,
}

impl DownloadOutcome {
    pub fn dir(&self) -> &Path {
        &self.metadata.dir
    }
}

/// Fetches a solution and writes its files and metadata into the workspace.
/// Existing files are kept unless `force` is set.
pub async fn download(
    cli: &dyn Client,
    ws: &Workspace,
    req: &SolutionRequest,
    force: bool,
) -> Result<DownloadOutcome> {
    let sol = cli
        .fetch_solution(req)
        .await
        .context("Failed to fetch solution")?;

    let mut metadata = self::metadata_from_solution(&sol);
    let dir = metadata.exercise(&ws.dir).filepath();
    fsutil::mkdir_all(&dir)?;

    let mut written = Vec::new();
    let mut skipped = Vec::new();
    for (name, url) in sol.file_urls() {
        let contents = cli
            .download_file(&url)
            .await
            .with_context(|| format!("Failed to download {}", name))?;
        let Some(contents) = contents else {
            log::debug!("Skipping empty file {}", name);
            continue
        };

        let rel = self::relative_download_path(&metadata.exercise_slug, name);
        ensure!(
            self::is_plain_relative(&rel),
            "Refusing to write outside of the exercise directory: {}",
            name
        );
        let dest = dir.join(&rel);
        if !force && fsutil::lexists(&dest)? {
            log::debug!("Keeping existing file {}", dest.display());
            skipped.push(dest);
            continue;
        }
        fsutil::write_with_mkdir(&dest, contents)?;
        written.push(dest);
    }

    metadata
        .write(&dir)
        .context("Failed to write exercise metadata")?;
    Ok(DownloadOutcome {
        metadata,
        written,
        skipped,
    })
}

/// Strips a leading `<anything>/<slug>-<digits>/` from a downloaded file path and
/// turns backslashes into slashes.
///
/// ```
/// use exo_core::action::relative_download_path;
///
/// assert_eq!(relative_download_path("bob", "bob.rb"), "bob.rb");
/// assert_eq!(relative_download_path("bob", "/home/alice/ruby/bob-2/lib/bob.rb"), "lib/bob.rb");
/// assert_eq!(relative_download_path("bob", r"C:\ws\ruby\bob-2/bob.rb"), "bob.rb");
/// assert_eq!(relative_download_path("bob", r"src\bob.rb"), "src/bob.rb");
/// assert_eq!(relative_download_path("bob", "bobby-2/bob.rb"), "bobby-2/bob.rb");
/// ```
pub fn relative_download_path(slug: &str, path: &str) -> String {
    let is_sep = |c: char| c == '/' || c == '\\';
    let is_numbered_slug = |name: &str| {
        name.strip_prefix(slug)
            .and_then(|s| s.strip_prefix('-'))
            .map_or(false, |digits| digits.chars().all(|c| c.is_ascii_digit()))
    };

    let mut cut = 0;
    for (i, _) in path.match_indices('/') {
        let head = &path[..i];
        if let Some(sep) = head.rfind(is_sep) {
            if is_numbered_slug(&head[sep + 1..]) {
                cut = i + 1;
            }
        }
    }
    path[cut..].replace('\\', "/")
}

fn is_plain_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// One selection entry per directory, labelled by its metadata when it has some.
pub fn exercise_choices(dirs: Vec<PathBuf>) -> Vec<Choice<PathBuf>> {
    Choice::enumerate(dirs.into_iter().map(|dir| {
        let label = match ExerciseMetadata::read(&dir) {
            Ok(m) => m.to_string(),
            Err(_) => dir.display().to_string(),
        };
        (label, dir)
    }))
}

/// The exercise directory a submission goes to.
///
/// `pick` is called when a bare exercise name matches several directories.
pub fn resolve_submit_dir<F>(ws: &Workspace, tx: &Transmission, pick: F) -> Result<PathBuf>
where
    F: FnOnce(Vec<Choice<PathBuf>>) -> Result<PathBuf>,
{
    if !tx.files.is_empty() {
        return tx.dir.clone().context("Cannot find the exercise of the given files");
    }

    let dir = match &tx.dir {
        None => std::env::current_dir().context("Cannot get current dir")?,
        Some(arg) => {
            let arg = arg.to_string_lossy();
            let mut found = ws
                .locate(&arg)
                .with_context(|| format!("Cannot find exercise '{}'", arg))?;
            if found.len() == 1 {
                found.remove(0)
            } else {
                pick(self::exercise_choices(found))?
            }
        }
    };
    ws.exercise_dir(&dir)
        .with_context(|| format!("Not an exercise directory: {}", dir.display()))
}

/// Turns the files to submit into documents relative to `dir`.
/// With no explicit files, the solution files listed in `.exercism/config.json` are used.
pub fn collect_documents(dir: &Path, files: &[PathBuf]) -> Result<Vec<Document>> {
    let config = match ExerciseConfig::read(dir) {
        Ok(cfg) => Some(cfg),
        Err(e) if e.is_not_exist() => None,
        Err(e) => return Err(e).context("Cannot read exercise config"),
    };

    let files: Vec<PathBuf> = if files.is_empty() {
        let cfg = config.as_ref().with_context(|| {
            format!(
                "No files given and no {} to find the solution files in",
                ExerciseConfig::filepath_in(dir).display()
            )
        })?;
        cfg.solution_files()?.iter().map(|f| dir.join(f)).collect()
    } else {
        files.to_vec()
    };
    let test_files: Vec<String> = config
        .as_ref()
        .and_then(|cfg| cfg.test_files().ok())
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    let mut docs = Vec::with_capacity(files.len());
    for file in files {
        let file = if file.starts_with(dir) {
            file
        } else {
            fsutil::canonicalize_path(&file)?
        };
        let doc = Document::new(dir, file);
        ensure!(
            !test_files.contains(&doc.path()),
            "{} is a test file; only solution files can be submitted",
            doc.path()
        );

        let size = fsutil::file_size(doc.filepath())?;
        if size == 0 {
            log::warn!("Skipping empty file {}", doc.path());
            continue;
        }
        ensure!(
            size < MAX_FILE_SIZE,
            "{} is {} bytes; files must be smaller than {} bytes",
            doc.path(),
            size,
            MAX_FILE_SIZE
        );
        docs.push(doc);
    }
    ensure!(!docs.is_empty(), "No files to submit");
    Ok(docs)
}

/// The directory must hold the requester's own copy of the exercise named in its metadata.
pub fn check_submittable(metadata: &ExerciseMetadata, dir: &Path) -> Result<()> {
    let base = dir
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = regex_replace!(r"-\d*$", &base, |_| "");
    ensure!(
        name == metadata.exercise_slug,
        "The directory '{}' does not match the exercise '{}' in its metadata",
        base,
        metadata.exercise_slug
    );
    ensure!(
        metadata.is_requester,
        "'{}' is @{}'s solution. Download your own copy with `exo download --exercise={} --track={}`",
        metadata,
        metadata.handle,
        metadata.exercise_slug,
        metadata.track
    );
    Ok(())
}

/// Uploads `docs` as a new iteration and records the submission time.
pub async fn submit(cli: &dyn Client, dir: &Path, docs: &[Document]) -> Result<ExerciseMetadata> {
    let status = Exercise::from_dir(dir).migrate_legacy_metadata_file()?;
    if status != MigrationStatus::Noop {
        log::info!("{}", status);
    }

    let mut metadata = ExerciseMetadata::read(dir).context("Cannot read exercise metadata")?;
    self::check_submittable(&metadata, dir)?;

    let files = docs
        .iter()
        .map(|doc| {
            Ok(UploadFile {
                name: doc.path(),
                contents: fsutil::read(doc.filepath())?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    cli.submit(&metadata.id, &files)
        .await
        .with_context(|| format!("Failed to submit {}", metadata))?;

    metadata.submitted_at = Some(Utc::now());
    metadata.write(dir)?;
    Ok(metadata)
}

/// Full command line running the tests of the exercise in `dir`.
pub fn test_command_line(dir: &Path, extra_args: &[String], platform: &dyn Platform) -> Result<String> {
    let metadata = ExerciseMetadata::read(dir)
        .context("Cannot read exercise metadata; run this inside a downloaded exercise")?;
    let cfg = TestConfiguration::for_track(&metadata.track).with_context(|| {
        format!("The '{}' track does not support running tests yet", metadata.track)
    })?;

    let mut cmd = cfg.command_for(dir, platform)?;
    for arg in extra_args {
        cmd.push(' ');
        cmd.push_str(&self::shell_quote(arg));
    }
    Ok(cmd)
}

pub async fn run_tests(dir: &Path, extra_args: &[String], platform: &dyn Platform) -> Result<ExitStatus> {
    let cmd = self::test_command_line(dir, extra_args, platform)?;
    log::info!("Running tests via `{}`", cmd);

    let (shell, flag) = platform.shell();
    tokio::process::Command::new(shell)
        .arg(flag)
        .arg(&cmd)
        .current_dir(dir)
        .status()
        .await
        .with_context(|| format!("Failed to run `{}`", cmd))
}

/// ```
/// use exo_core::action::shell_quote;
///
/// assert_eq!(shell_quote("--include-ignored"), "--include-ignored");
/// assert_eq!(shell_quote("a b"), "'a b'");
/// assert_eq!(shell_quote("it's"), r"'it'\''s'");
/// ```
pub fn shell_quote(arg: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c);
    if !arg.is_empty() && arg.chars().all(plain) {
        arg.to_owned()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Migrates legacy metadata everywhere in the workspace. Returns one message per change.
pub fn fixup(ws: &Workspace) -> Result<Vec<String>> {
    let mut messages = Vec::new();
    for ex in ws.potential_exercises()? {
        let status = ex
            .migrate_legacy_metadata_file()
            .with_context(|| format!("Failed to migrate metadata of {}", ex.path()))?;
        if status != MigrationStatus::Noop {
            messages.push(status.to_string());
        }
    }
    Ok(messages)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorReport {
    pub exercises: usize,
    pub without_metadata: Vec<Exercise>,
    pub with_legacy_metadata: Vec<Exercise>,
}

pub fn doctor(ws: &Workspace) -> Result<DoctorReport> {
    let mut report = DoctorReport::default();
    for ex in ws.potential_exercises()? {
        report.exercises += 1;
        if ex.has_legacy_metadata()? {
            report.with_legacy_metadata.push(ex);
        } else if !ex.has_metadata()? {
            report.without_metadata.push(ex);
        }
    }
    Ok(report)
}

/// URL of the solution the path belongs to.
pub fn solution_url(ws: &Workspace, path: &Path) -> Result<String> {
    let dir = ws.exercise_dir(path)?;
    let metadata = ExerciseMetadata::read(&dir)?;
    ensure!(!metadata.url.is_empty(), "No URL recorded for {}", metadata);
    Ok(metadata.url)
}

/// Shows the first and last 4 characters only.
///
/// ```
/// use exo_core::action::redact_token;
///
/// assert_eq!(redact_token("abcd1234efgh5678"), "abcd********5678");
/// assert_eq!(redact_token("short"), "*****");
/// assert_eq!(redact_token(""), "");
/// ```
pub fn redact_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let n = chars.len();
    chars[..4]
        .iter()
        .chain(std::iter::repeat(&'*').take(n - 8))
        .chain(&chars[n - 4..])
        .collect()
}

pub fn default_ping_targets(ctx: &ClientContext) -> Vec<(String, String)> {
    vec![
        ("GitHub".to_owned(), "https://api.github.com".to_owned()),
        ("API".to_owned(), ctx.endpoint("ping")),
    ]
}

/// Pings every `(service, url)` concurrently and waits for all of them.
pub async fn ping_services(ctx: &ClientContext, targets: Vec<(String, String)>) -> Vec<PingResult> {
    let handles: Vec<_> = targets
        .into_iter()
        .map(|(service, url)| {
            let ctx = ctx.clone();
            tokio::spawn(async move { ping(&service, &url, &ctx).await })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for h in handles {
        match h.await {
            Ok(res) => results.push(res),
            Err(e) => log::warn!("Ping task failed: {}", e),
        }
    }
    results
}
