//! Coverage report generation with `lcov` and `genhtml`.
//!
//! [`CoverageDriver::generate`] runs a fixed pipeline:
//!
//! 1. Recreate the report workspace, unless it would swallow the root,
//!    the ignore file or the build directory
//! 2. `lcov --capture` the build directory into the info file
//! 3. Fail with [`ReportGeneration`](crate::QagateError::ReportGeneration) if no info file appeared
//! 4. Load the ignore list
//! 5. `lcov --remove` each pattern from the info file, in place, in order
//! 6. `lcov --list` the result; fail with [`EmptyReport`](crate::QagateError::EmptyReport) if empty
//! 7. `genhtml` the info file into the workspace
//!
//! Tool failures in steps 2, 5 and 7 are logged and the pipeline goes on;
//! only the checks in steps 3, 4 and 6 stop it.

pub mod ignore;
pub mod workspace;

pub use ignore::{parse_ignore_list, read_ignore_list, IgnorePattern};
pub use workspace::{clean_directory, ensure_disposable};

use std::path::{Path, PathBuf};

use crate::config::CoverageSettings;
use crate::error::{QagateError, Result};
use crate::process::{CommandResult, ProcessExecutor, RunOptions};
use crate::ui::Output;

/// Resolved inputs for one coverage run.
#[derive(Debug, Clone)]
pub struct CoverageConfig {
    /// Coverage capture tool.
    pub lcov: String,
    /// HTML report generator.
    pub genhtml: String,
    /// Workspace root; never cleaned.
    pub root: PathBuf,
    /// Report workspace, recreated on each run.
    pub workspace: PathBuf,
    /// Ignore-pattern file.
    pub ignore_file: PathBuf,
    /// Info file name inside the workspace.
    pub info_file_name: String,
    /// Enable branch coverage.
    pub branch_coverage: bool,
}

impl CoverageConfig {
    /// Resolve settings against the workspace root.
    pub fn from_settings(settings: &CoverageSettings, root: &Path) -> Self {
        Self {
            lcov: settings.lcov.clone(),
            genhtml: settings.genhtml.clone(),
            root: root.to_path_buf(),
            workspace: settings.report_dir_in(root),
            ignore_file: settings.ignore_file_in(root),
            info_file_name: settings.info_file.clone(),
            branch_coverage: settings.branch_coverage,
        }
    }

    /// Path of the combined info file.
    pub fn info_file(&self) -> PathBuf {
        self.workspace.join(&self.info_file_name)
    }
}

/// Outcome of a successful coverage run.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    /// Directory holding the info file and the HTML report.
    pub workspace: PathBuf,
    /// Filtered info file.
    pub info_file: PathBuf,
    /// Output of `lcov --list`.
    pub summary: String,
    /// Patterns removed from the report.
    pub ignored: Vec<IgnorePattern>,
}

/// Drives `lcov` and `genhtml` to produce a filtered HTML report.
pub struct CoverageDriver<'a> {
    executor: &'a dyn ProcessExecutor,
    output: Output,
    config: CoverageConfig,
}

impl<'a> CoverageDriver<'a> {
    /// Create a driver running tools through `executor`.
    pub fn new(executor: &'a dyn ProcessExecutor, output: Output, config: CoverageConfig) -> Self {
        Self {
            executor,
            output,
            config,
        }
    }

    /// Generate the report for `build_directory`.
    pub fn generate(&self, build_directory: &Path) -> Result<CoverageReport> {
        let info_file = self.config.info_file();

        clean_directory(
            &self.config.workspace,
            &[
                self.config.root.as_path(),
                self.config.ignore_file.as_path(),
                build_directory,
            ],
        )?;

        self.output.message(&format!(
            "Running {} at {}",
            self.config.lcov,
            build_directory.display()
        ));
        self.capture(build_directory, &info_file)?;

        if !info_file.is_file() {
            return Err(QagateError::ReportGeneration {
                tool: self.config.lcov.clone(),
                path: info_file,
            });
        }

        let ignored = read_ignore_list(&self.config.ignore_file)?;
        self.remove_patterns(&info_file, &ignored)?;

        let summary = self.list(&info_file)?;
        if summary.trim().is_empty() {
            return Err(QagateError::EmptyReport { path: info_file });
        }
        self.output.block(&summary);

        self.render_html(&info_file)?;

        Ok(CoverageReport {
            workspace: self.config.workspace.clone(),
            info_file,
            summary,
            ignored,
        })
    }

    fn capture(&self, build_directory: &Path, info_file: &Path) -> Result<()> {
        let mut args = vec![
            "--directory".to_string(),
            path_arg(build_directory),
            "--capture".to_string(),
            "--output-file".to_string(),
            path_arg(info_file),
        ];
        if self.config.branch_coverage {
            args.push("-rc".to_string());
            args.push("lcov_branch_coverage=1".to_string());
        }

        let result = self
            .executor
            .run(&self.config.lcov, &args, &RunOptions::lenient())?;
        self.log_failure(&result);
        Ok(())
    }

    fn remove_patterns(&self, info_file: &Path, patterns: &[IgnorePattern]) -> Result<()> {
        let info = path_arg(info_file);

        for pattern in patterns {
            self.output
                .message(&format!("Ignoring filenames that fit: {} pattern", pattern));
            let args = vec![
                "--remove".to_string(),
                info.clone(),
                pattern.to_string(),
                "-o".to_string(),
                info.clone(),
            ];
            let result =
                self.executor
                    .run(&self.config.lcov, &args, &RunOptions::lenient().quiet())?;
            self.output.block(&result.stderr);
            self.output.block(&result.stdout);
            self.log_failure(&result);
        }
        Ok(())
    }

    fn list(&self, info_file: &Path) -> Result<String> {
        let args = vec!["--list".to_string(), path_arg(info_file)];
        let result = self
            .executor
            .run(&self.config.lcov, &args, &RunOptions::lenient().quiet())?;
        self.log_failure(&result);
        Ok(result.stdout)
    }

    fn render_html(&self, info_file: &Path) -> Result<()> {
        let mut args = vec![path_arg(info_file)];
        if self.config.branch_coverage {
            args.push("--branch-coverage".to_string());
        }
        args.push("--output-directory".to_string());
        args.push(format!("{}/", path_arg(&self.config.workspace)));

        let result = self
            .executor
            .run(&self.config.genhtml, &args, &RunOptions::lenient())?;
        self.log_failure(&result);
        Ok(())
    }

    fn log_failure(&self, result: &CommandResult) {
        if result.success {
            return;
        }
        tracing::warn!(
            "{} exited with {:?}: {}",
            result.command,
            result.exit_code,
            result.stderr.trim()
        );
        self.output.warning(&format!(
            "{} exited with code {}",
            result.command,
            result
                .exit_code
                .map_or_else(|| "none".to_string(), |c| c.to_string())
        ));
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RecordingExecutor;
    use crate::ui::{OutputMode, QagateTheme};
    use std::fs;
    use tempfile::TempDir;

    fn quiet() -> Output {
        Output::with_theme(OutputMode::Quiet, QagateTheme::plain())
    }

    fn config(root: &Path) -> CoverageConfig {
        CoverageConfig::from_settings(&CoverageSettings::default(), root)
    }

    /// A fake lcov that writes the info file on capture and lists `summary`.
    fn fake_lcov(exec: &RecordingExecutor, summary: &'static str) {
        exec.respond("lcov", move |args| {
            if args[0] == "--directory" {
                fs::write(&args[4], "TN:\nSF:/src/a.cpp\nend_of_record\n")?;
            }
            let stdout = if args[0] == "--list" { summary } else { "" };
            Ok(RecordingExecutor::output(&args.join(" "), stdout))
        });
    }

    fn write_ignores(root: &Path, content: &str) {
        fs::write(root.join(".lcov-ignores"), content).unwrap();
    }

    #[test]
    fn full_pipeline_runs_tools_in_order() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "/usr/*\n*/unit_tests/*\n");
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "a.cpp | 80.0%  10");

        let driver = CoverageDriver::new(&exec, quiet(), config(temp.path()));
        let report = driver.generate(Path::new("/build")).unwrap();

        assert_eq!(
            exec.programs(),
            vec!["lcov", "lcov", "lcov", "lcov", "genhtml"]
        );
        assert_eq!(report.summary, "a.cpp | 80.0%  10");
        assert_eq!(report.ignored.len(), 2);
        assert!(report.workspace.ends_with("code_coverage_report"));
    }

    #[test]
    fn capture_uses_build_directory_and_branch_coverage() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "");
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "summary");

        let cfg = config(temp.path());
        let info = path_arg(&cfg.info_file());
        CoverageDriver::new(&exec, quiet(), cfg)
            .generate(Path::new("/build"))
            .unwrap();

        let capture = &exec.calls()[0];
        assert_eq!(
            capture.args,
            vec![
                "--directory",
                "/build",
                "--capture",
                "--output-file",
                info.as_str(),
                "-rc",
                "lcov_branch_coverage=1"
            ]
        );
    }

    #[test]
    fn patterns_are_removed_in_place_in_order() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "/usr/*\n*/unit_tests/*\n");
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "summary");

        let cfg = config(temp.path());
        let info = path_arg(&cfg.info_file());
        CoverageDriver::new(&exec, quiet(), cfg)
            .generate(Path::new("/build"))
            .unwrap();

        let removes = exec.calls_with_flag("lcov", "--remove");
        assert_eq!(removes.len(), 2);
        assert_eq!(
            removes[0].args,
            vec!["--remove", info.as_str(), "/usr/*", "-o", info.as_str()]
        );
        assert_eq!(removes[1].args[2], "*/unit_tests/*");
    }

    #[test]
    fn genhtml_writes_into_workspace() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "");
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "summary");

        let cfg = config(temp.path());
        let info = path_arg(&cfg.info_file());
        let out_dir = format!("{}/", path_arg(&cfg.workspace));
        CoverageDriver::new(&exec, quiet(), cfg)
            .generate(Path::new("/build"))
            .unwrap();

        let calls = exec.calls();
        let genhtml = calls.last().unwrap();
        assert_eq!(genhtml.program, "genhtml");
        assert_eq!(
            genhtml.args,
            vec![
                info.as_str(),
                "--branch-coverage",
                "--output-directory",
                out_dir.as_str()
            ]
        );
    }

    #[test]
    fn every_invocation_is_lenient() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "/usr/*\n");
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "summary");

        CoverageDriver::new(&exec, quiet(), config(temp.path()))
            .generate(Path::new("/build"))
            .unwrap();

        assert!(exec.calls().iter().all(|c| !c.options.throw_on_failure));
    }

    #[test]
    fn missing_info_file_stops_before_filtering() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "/usr/*\n");
        let exec = RecordingExecutor::new();

        let err = CoverageDriver::new(&exec, quiet(), config(temp.path()))
            .generate(Path::new("/build"))
            .unwrap_err();

        assert!(matches!(err, QagateError::ReportGeneration { .. }));
        assert_eq!(exec.programs(), vec!["lcov"]);
    }

    #[test]
    fn missing_ignore_file_is_config_not_found() {
        let temp = TempDir::new().unwrap();
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "summary");

        let err = CoverageDriver::new(&exec, quiet(), config(temp.path()))
            .generate(Path::new("/build"))
            .unwrap_err();

        assert!(matches!(err, QagateError::ConfigNotFound { .. }));
        assert!(exec.calls_with_flag("lcov", "--remove").is_empty());
        assert!(!exec.programs().contains(&"genhtml".to_string()));
    }

    #[test]
    fn empty_listing_is_empty_report() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "/usr/*\n");
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "  \n");

        let err = CoverageDriver::new(&exec, quiet(), config(temp.path()))
            .generate(Path::new("/build"))
            .unwrap_err();

        assert!(matches!(err, QagateError::EmptyReport { .. }));
        assert!(!exec.programs().contains(&"genhtml".to_string()));
    }

    #[test]
    fn failing_remove_does_not_abort() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "/usr/*\n");
        let exec = RecordingExecutor::new();
        exec.respond("lcov", |args| {
            match args[0].as_str() {
                "--directory" => fs::write(&args[4], "TN:\n")?,
                "--remove" => {
                    return Ok(RecordingExecutor::failed(
                        "lcov --remove",
                        1,
                        "lcov: ERROR: no valid records",
                    ))
                }
                _ => {}
            }
            Ok(RecordingExecutor::output("lcov", "summary"))
        });

        let report = CoverageDriver::new(&exec, quiet(), config(temp.path()))
            .generate(Path::new("/build"))
            .unwrap();

        assert_eq!(report.summary, "summary");
        assert_eq!(exec.programs().last().unwrap(), "genhtml");
    }

    #[test]
    fn stale_workspace_is_recreated() {
        let temp = TempDir::new().unwrap();
        let cfg = config(temp.path());
        fs::create_dir_all(&cfg.workspace).unwrap();
        fs::write(cfg.info_file(), "stale").unwrap();
        let exec = RecordingExecutor::new();

        let err = CoverageDriver::new(&exec, quiet(), cfg)
            .generate(Path::new("/build"))
            .unwrap_err();

        assert!(matches!(err, QagateError::ReportGeneration { .. }));
    }

    #[test]
    fn branch_coverage_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "");
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "summary");
        let cfg = CoverageConfig {
            branch_coverage: false,
            ..config(temp.path())
        };

        CoverageDriver::new(&exec, quiet(), cfg)
            .generate(Path::new("/build"))
            .unwrap();

        for call in exec.calls() {
            assert!(!call.args.iter().any(|a| a == "-rc" || a == "--branch-coverage"));
        }
    }

    #[test]
    fn report_dir_at_root_is_refused_before_any_tool_runs() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "/usr/*\n");
        let exec = RecordingExecutor::new();
        fake_lcov(&exec, "summary");
        let settings = CoverageSettings {
            report_dir: PathBuf::from("."),
            ..CoverageSettings::default()
        };

        let err = CoverageDriver::new(
            &exec,
            quiet(),
            CoverageConfig::from_settings(&settings, temp.path()),
        )
        .generate(Path::new("/build"))
        .unwrap_err();

        assert!(matches!(err, QagateError::UnsafeReportDir { .. }));
        assert!(exec.calls().is_empty());
        assert!(temp.path().join(".lcov-ignores").is_file());
    }

    #[test]
    fn report_dir_holding_build_directory_is_refused() {
        let temp = TempDir::new().unwrap();
        write_ignores(temp.path(), "");
        let build = temp.path().join("out/build");
        fs::create_dir_all(&build).unwrap();
        let exec = RecordingExecutor::new();
        let settings = CoverageSettings {
            report_dir: PathBuf::from("out"),
            ..CoverageSettings::default()
        };

        let err = CoverageDriver::new(
            &exec,
            quiet(),
            CoverageConfig::from_settings(&settings, temp.path()),
        )
        .generate(&build)
        .unwrap_err();

        assert!(matches!(err, QagateError::UnsafeReportDir { .. }));
        assert!(build.is_dir());
    }
}
