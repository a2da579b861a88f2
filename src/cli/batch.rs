use anyhow::{bail, Context, Result};
use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use lctrace::batch::{report_files, BatchConfig, BatchProcessor, ErrorPolicy, DEFAULT_OUTPUT_NAME};
use lctrace::extractor::FlowRate;
use lctrace::locator::{BlockKind, PointCountMode};

use super::config::Config;
use super::prompt::Prompter;

/// Batch settings as given on the command line
#[derive(Debug, Default)]
pub struct BatchArgs {
    pub dir: Option<PathBuf>,
    pub flow_rate: Option<f64>,
    pub trace: Option<BlockKind>,
    pub config: Option<PathBuf>,
    pub skip_invalid: bool,
    pub legacy_point_count: bool,
    pub output: Option<String>,
}

/// Combine the traces of every report in a directory
pub fn run(args: BatchArgs) -> Result<()> {
    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());

    let (dir, config) = resolve(args, &mut prompter)?;

    info!("lctrace - LabSolutions trace extraction");
    info!("Directory:  {}", dir.display());
    info!("Trace:      {}", config.kind);
    info!("Flow rate:  {}", config.flow_rate);
    info!("Error mode: {:?}", config.error_policy);
    info!("Points:     {:?}", config.point_count_mode);

    let outcome = BatchProcessor::new(config)
        .run(&dir)
        .context("Batch conversion failed")?;

    for skipped in &outcome.skipped {
        prompter.say(&format!(
            "Skipped {}: {}",
            skipped.path.display(),
            skipped.error
        ))?;
    }
    prompter.say(&format!(
        "\nSuccess! {} files have been processed. The results are found in:\n{}\n",
        outcome.files_processed,
        outcome.output_path.display()
    ))?;

    Ok(())
}

/// Merge flags, config file and prompts into a directory and batch config.
///
/// Precedence is flag, then config file, then prompt. Prompts only run when
/// no directory was passed on the command line.
fn resolve<R: BufRead, W: Write>(
    args: BatchArgs,
    prompter: &mut Prompter<R, W>,
) -> Result<(PathBuf, BatchConfig)> {
    let file_config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let settings = file_config.batch;

    let interactive = args.dir.is_none();
    let dir = match args.dir {
        Some(dir) => {
            if !dir.is_dir() {
                bail!("Input is not a directory: {}", dir.display());
            }
            dir
        }
        None => prompter.directory()?,
    };

    if interactive {
        let found = report_files(&dir)?.len();
        prompter.say(&format!("\n{found} report files found in this directory."))?;
    }

    let flow_rate = match args.flow_rate.or(settings.flow_rate) {
        Some(value) => FlowRate::new(value)?,
        None if interactive => prompter.flow_rate()?,
        None => FlowRate::default(),
    };

    let kind = match args.trace.or(settings.trace_kind()?) {
        Some(kind) => kind,
        None if interactive => prompter.trace()?,
        None => BlockKind::Fluorescence,
    };

    let error_policy = if args.skip_invalid || settings.skip_invalid.unwrap_or(false) {
        ErrorPolicy::SkipInvalid
    } else {
        ErrorPolicy::FailFast
    };

    let point_count_mode =
        if args.legacy_point_count || settings.legacy_point_count.unwrap_or(false) {
            PointCountMode::Shared
        } else {
            PointCountMode::PerBlock
        };

    let output_name = args
        .output
        .or(settings.output_name)
        .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());

    let config = BatchConfig {
        flow_rate,
        kind,
        point_count_mode,
        error_policy,
        output_name,
    };
    Ok((dir, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_flags_skip_prompts() {
        let dir = tempdir().unwrap();
        let args = BatchArgs {
            dir: Some(dir.path().to_path_buf()),
            flow_rate: Some(0.5),
            trace: Some(BlockKind::Uv),
            skip_invalid: true,
            ..Default::default()
        };

        // Empty input: any prompt would fall back to defaults and be detected
        let (resolved_dir, config) = resolve(args, &mut prompter("")).unwrap();
        assert_eq!(resolved_dir, dir.path());
        assert_eq!(config.flow_rate.value(), 0.5);
        assert_eq!(config.kind, BlockKind::Uv);
        assert_eq!(config.error_policy, ErrorPolicy::SkipInvalid);
        assert_eq!(config.point_count_mode, PointCountMode::PerBlock);
        assert_eq!(config.output_name, "processed.csv");
    }

    #[test]
    fn test_directory_argument_uses_defaults() {
        let dir = tempdir().unwrap();
        let args = BatchArgs {
            dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let mut p = prompter("uv\n");
        let (_, config) = resolve(args, &mut p).unwrap();
        assert_eq!(config.kind, BlockKind::Fluorescence);
        assert_eq!(config.flow_rate.value(), 1.0);
        assert!(p_output(p).is_empty());
    }

    #[test]
    fn test_interactive_session() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("01.txt"), "").unwrap();
        let input = format!("{}\n0.8\nuv\n", dir.path().display());

        let mut p = prompter(&input);
        let (resolved_dir, config) = resolve(BatchArgs::default(), &mut p).unwrap();
        assert_eq!(resolved_dir, dir.path());
        assert_eq!(config.flow_rate.value(), 0.8);
        assert_eq!(config.kind, BlockKind::Uv);
        assert!(p_output(p).contains("1 report files found in this directory."));
    }

    #[test]
    fn test_config_file_fills_gaps() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("lctrace.toml");
        std::fs::write(
            &config_path,
            "[batch]\nflow_rate = 0.3\ntrace = \"uv\"\nlegacy_point_count = true\noutput_name = \"uv.csv\"\n",
        )
        .unwrap();

        let args = BatchArgs {
            dir: Some(dir.path().to_path_buf()),
            flow_rate: Some(0.6),
            config: Some(config_path),
            ..Default::default()
        };
        let (_, config) = resolve(args, &mut prompter("")).unwrap();
        assert_eq!(config.flow_rate.value(), 0.6);
        assert_eq!(config.kind, BlockKind::Uv);
        assert_eq!(config.point_count_mode, PointCountMode::Shared);
        assert_eq!(config.output_name, "uv.csv");
    }

    #[test]
    fn test_invalid_flag_flow_rate() {
        let dir = tempdir().unwrap();
        let args = BatchArgs {
            dir: Some(dir.path().to_path_buf()),
            flow_rate: Some(0.0),
            ..Default::default()
        };
        assert!(resolve(args, &mut prompter("")).is_err());
    }

    #[test]
    fn test_missing_directory_argument() {
        let args = BatchArgs {
            dir: Some(PathBuf::from("/definitely/not/here")),
            ..Default::default()
        };
        assert!(resolve(args, &mut prompter("")).is_err());
    }

    fn p_output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }
}
