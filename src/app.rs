use crate::cli::{parse_args, Config};
use anyhow::Context;
use md_inject_lib::error::InjectError;
use md_inject_lib::update;
use similar::TextDiff;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tempfile::Builder as TempFileBuilder;

/// How a run ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file already holds the computed content.
    Unchanged,
    /// `--fail-on-diff`: the file would change and was left alone.
    OutOfDate,
    /// `--print-only`: the computed content went to stdout.
    Printed,
    /// The file was rewritten.
    Written,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Outcome::OutOfDate => 2,
            Outcome::Unchanged | Outcome::Printed | Outcome::Written => 0,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

pub fn run() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(err) => return report_usage(err),
    };
    log::debug!("Resolved configuration: {config:?}");

    match execute(&config, io::stdin().lock()) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn report_usage(err: clap::Error) -> ExitCode {
    // clap routes --help/--version through its error type as well.
    if let Err(print_err) = err.print() {
        log::error!("Failed to print usage: {print_err}");
    }

    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Reads the injected content from `input`, computes the new file content and
/// acts on it according to `config`.
pub fn execute(config: &Config, input: impl Read) -> anyhow::Result<Outcome> {
    let file = &config.file;

    let raw = read_input(input)?;
    log::debug!("Read {} bytes from stdin", raw.len());

    let old_content = fs::read_to_string(file).map_err(|source| InjectError::ReadFile {
        path: file.clone(),
        source,
    })?;

    let updated = update(&old_content, &raw, &config.template, &config.tags())
        .with_context(|| format!("Failed to update {}", file.display()))?;

    if updated == old_content {
        println!(
            "No content change needed for {}, nothing to do!",
            file.display()
        );
        return Ok(Outcome::Unchanged);
    }

    if config.fail_on_diff {
        eprintln!(
            "{} would be changed. The file is out of date.",
            file.display()
        );
        print_diff(file, &old_content, &updated)?;
        return Ok(Outcome::OutOfDate);
    }

    if config.print_only {
        let mut stdout = io::stdout().lock();
        stdout.write_all(updated.as_bytes())?;
        stdout.flush()?;
        return Ok(Outcome::Printed);
    }

    write_in_place(file, &updated)?;
    println!("{} successfully updated!", file.display());
    Ok(Outcome::Written)
}

fn read_input(mut input: impl Read) -> Result<String, InjectError> {
    let mut buf = String::new();
    input
        .read_to_string(&mut buf)
        .map_err(InjectError::ReadInput)?;
    Ok(buf)
}

fn print_diff(path: &Path, original: &str, updated: &str) -> io::Result<()> {
    let name = path.display().to_string();
    let diff_output = TextDiff::from_lines(original, updated)
        .unified_diff()
        .header(&name, &format!("{name} (updated)"))
        .to_string();

    io::stderr().write_all(diff_output.as_bytes())
}

/// Replaces the content of `path` in one step, keeping its permission bits.
///
/// Symlinks are followed, so the file they point to is the one updated.
fn write_in_place(path: &Path, content: &str) -> Result<(), InjectError> {
    let write_error = |source: io::Error| InjectError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    let target = fs::canonicalize(path).map_err(write_error)?;
    let permissions = fs::metadata(&target).map_err(write_error)?.permissions();
    if permissions.readonly() {
        return Err(write_error(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "file is read-only",
        )));
    }
    OpenOptions::new()
        .write(true)
        .open(&target)
        .map_err(write_error)?;

    let parent_dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file = TempFileBuilder::new()
        .prefix(".md-inject-")
        .suffix(".tmp")
        .tempfile_in(parent_dir)
        .map_err(write_error)?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(write_error)?;
    temp_file
        .as_file()
        .set_permissions(permissions)
        .map_err(write_error)?;

    temp_file
        .persist(&target)
        .map_err(|err| write_error(err.error))?;

    log::debug!("Wrote {} bytes to {}", content.len(), target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const BLOCK: &str = "<!-- START md-inject:default -->\nfresh\n<!-- END md-inject:default -->";

    fn config_for(file: PathBuf) -> Config {
        Config {
            id: "default".to_string(),
            fail_on_diff: false,
            print_only: false,
            template: "{{ stdin }}".to_string(),
            file,
        }
    }

    fn write_doc(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("README.md");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn outcome_codes() {
        assert_eq!(Outcome::Unchanged.code(), 0);
        assert_eq!(Outcome::OutOfDate.code(), 2);
        assert_eq!(Outcome::Printed.code(), 0);
        assert_eq!(Outcome::Written.code(), 0);
    }

    #[test]
    fn up_to_date_file_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("# Title\n{BLOCK}\n");
        let path = write_doc(&dir, &content);
        let config = Config {
            fail_on_diff: true,
            ..config_for(path.clone())
        };

        let outcome = execute(&config, "fresh\n".as_bytes()).unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(fs::read_to_string(path).unwrap(), content);
    }

    #[test]
    fn fail_on_diff_takes_precedence_over_print_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "# Title\n");
        let config = Config {
            fail_on_diff: true,
            print_only: true,
            ..config_for(path.clone())
        };

        let outcome = execute(&config, "fresh\n".as_bytes()).unwrap();

        assert_eq!(outcome, Outcome::OutOfDate);
        assert_eq!(fs::read_to_string(path).unwrap(), "# Title\n");
    }

    #[test]
    fn print_only_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "# Title\n");
        let config = Config {
            print_only: true,
            ..config_for(path.clone())
        };

        let outcome = execute(&config, "fresh\n".as_bytes()).unwrap();

        assert_eq!(outcome, Outcome::Printed);
        assert_eq!(fs::read_to_string(path).unwrap(), "# Title\n");
    }

    #[test]
    fn changed_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "# Title\n");

        let outcome = execute(&config_for(path.clone()), "fresh".as_bytes()).unwrap();

        assert_eq!(outcome, Outcome::Written);
        assert_eq!(fs::read_to_string(path).unwrap(), format!("# Title\n\n{BLOCK}\n"));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path().join("absent.md"));

        let err = execute(&config, "x".as_bytes()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InjectError>(),
            Some(InjectError::ReadFile { .. })
        ));
    }

    #[test]
    fn template_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "# Title\n");
        let config = Config {
            template: "{{ missing }}".to_string(),
            ..config_for(path)
        };

        let err = execute(&config, "x".as_bytes()).unwrap_err();

        assert!(format!("{err:#}").starts_with("Failed to update "));
        assert!(matches!(
            err.downcast_ref::<InjectError>(),
            Some(InjectError::TemplateRender(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn write_keeps_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "# Title\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        execute(&config_for(path.clone()), "fresh".as_bytes()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn write_follows_symlinked_target() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.md");
        fs::write(&real, "# Title\n").unwrap();
        let link = dir.path().join("README.md");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let outcome = execute(&config_for(link.clone()), "fresh".as_bytes()).unwrap();

        assert_eq!(outcome, Outcome::Written);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(&real).unwrap(),
            format!("# Title\n\n{BLOCK}\n")
        );
    }

    #[cfg(unix)]
    #[test]
    fn read_only_target_is_a_write_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "# Title\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        let err = execute(&config_for(path.clone()), "fresh".as_bytes()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InjectError>(),
            Some(InjectError::WriteFile { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Title\n");
    }

    #[test]
    fn invalid_utf8_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_doc(&dir, "# Title\n");

        let err = execute(&config_for(path), &b"\xff\xfe"[..]).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InjectError>(),
            Some(InjectError::ReadInput(_))
        ));
    }
}
