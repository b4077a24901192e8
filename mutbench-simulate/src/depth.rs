//! Read-depth lookups.
//!
//! [DepthSource] is the seam between VAF simulation and whatever knows the
//! coverage of an alignment file. [SamtoolsDepth] shells out to
//! `samtools depth` once per position.
//!
//! Output policy: empty output means the position is uncovered (depth 0).
//! Output that is present but cannot be parsed is also read as depth 0 and
//! logged. A tool that cannot be started, that times out, or that exits
//! non-zero without printing anything is an [SimulationError::ExternalTool].

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle, sleep};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::consts::DEFAULT_DEPTH_TOOL;
use crate::errors::{Result, SimulationError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub trait DepthSource {
    ///
    /// Read depth at a single position.
    ///
    /// # Arguments
    /// - chrom: chromosome name as it appears in the alignment header
    /// - position: coordinate to query
    fn depth(&self, chrom: &str, position: u32) -> Result<u32>;
}

impl<T: DepthSource + ?Sized> DepthSource for &T {
    fn depth(&self, chrom: &str, position: u32) -> Result<u32> {
        (**self).depth(chrom, position)
    }
}

/// Pre-computed depths; positions not in the map are uncovered.
impl DepthSource for HashMap<(String, u32), u32> {
    fn depth(&self, chrom: &str, position: u32) -> Result<u32> {
        Ok(self
            .get(&(chrom.to_string(), position))
            .copied()
            .unwrap_or(0))
    }
}

///
/// Parse the output of `samtools depth` for a single position.
///
/// The first non-empty line is split on tabs and its last field is the depth.
/// Returns 0 for empty or unparseable output.
///
pub fn parse_depth_output(output: &str) -> u32 {
    let Some(line) = output.lines().find(|l| !l.trim().is_empty()) else {
        return 0;
    };

    let field = line.split('\t').next_back().unwrap_or("").trim();
    match field.parse::<u32>() {
        Ok(depth) => depth,
        Err(_) => {
            warn!("Unparseable depth output {:?}, treating as depth 0", line);
            0
        }
    }
}

/// Read a child pipe to the end on its own thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn collect(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    let bytes = handle
        .join()
        .map_err(|_| SimulationError::ExternalTool("pipe reader thread panicked".to_string()))??;
    Ok(bytes)
}

/// Kill and reap a child we are giving up on. Reader threads are left to
/// finish on their own once the pipes close.
fn abort(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Depth lookups through an external `samtools depth` process.
#[derive(Debug, Clone)]
pub struct SamtoolsDepth {
    pub tool: String,
    pub alignment: PathBuf,
    pub timeout: Option<Duration>,
}

impl SamtoolsDepth {
    pub fn new<P: AsRef<Path>>(alignment: P) -> Self {
        Self {
            tool: DEFAULT_DEPTH_TOOL.to_string(),
            alignment: alignment.as_ref().to_path_buf(),
            timeout: None,
        }
    }

    pub fn with_tool(mut self, tool: &str) -> Self {
        self.tool = tool.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn command(&self, chrom: &str, position: u32) -> Command {
        let mut command = Command::new(&self.tool);
        command
            .arg("depth")
            .arg("-r")
            .arg(format!("{}:{}-{}", chrom, position, position))
            .arg(&self.alignment)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    fn run(&self, chrom: &str, position: u32) -> Result<Output> {
        let mut command = self.command(chrom, position);

        let Some(timeout) = self.timeout else {
            return command.output().map_err(|e| {
                SimulationError::ExternalTool(format!("Failed to run {}: {}", self.tool, e))
            });
        };

        let mut child = command.spawn().map_err(|e| {
            SimulationError::ExternalTool(format!("Failed to run {}: {}", self.tool, e))
        })?;

        // drain both pipes while polling; a full pipe stalls the child
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    abort(&mut child);
                    return Err(SimulationError::ExternalTool(format!(
                        "{} depth timed out after {:?} at {}:{}",
                        self.tool, timeout, chrom, position
                    )));
                }
                Ok(None) => sleep(POLL_INTERVAL),
                Err(e) => {
                    abort(&mut child);
                    return Err(e.into());
                }
            }
        };

        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;

        Ok(Output {
            status,
            stdout,
            stderr,
        })
    }
}

impl DepthSource for SamtoolsDepth {
    fn depth(&self, chrom: &str, position: u32) -> Result<u32> {
        let output = self.run(chrom, position)?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() && stdout.trim().is_empty() {
            return Err(SimulationError::ExternalTool(format!(
                "{} depth exited with {} at {}:{}: {}",
                self.tool,
                output.status,
                chrom,
                position,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let depth = parse_depth_output(&stdout);
        debug!("depth at {}:{} = {}", chrom, position, depth);
        Ok(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("1\t1500\t37\n", 37)]
    #[case("chr17\t7670001\t0\n", 0)]
    #[case("\n1\t1500\t12\r\n", 12)]
    #[case("", 0)]
    #[case("1\t1500\t\n", 0)]
    #[case("1\t150", 150)]
    #[case("1\t1500\tmany\n", 0)]
    #[case("1\t1500\t-4\n", 0)]
    fn test_parse_depth_output(#[case] output: &str, #[case] expected: u32) {
        assert_eq!(parse_depth_output(output), expected);
    }

    #[rstest]
    fn test_map_depth_source() {
        let mut depths: HashMap<(String, u32), u32> = HashMap::new();
        depths.insert(("1".to_string(), 100), 30);

        assert_eq!(depths.depth("1", 100).unwrap(), 30);
        assert_eq!(depths.depth("1", 101).unwrap(), 0);
        assert_eq!((&depths).depth("2", 100).unwrap(), 0);
    }

    #[rstest]
    fn test_missing_tool_is_external_error() {
        let source = SamtoolsDepth::new("tumor.bam").with_tool("/nonexistent/depth-tool");
        let result = source.depth("1", 100);
        assert!(matches!(result, Err(SimulationError::ExternalTool(_))));
    }

    #[cfg(unix)]
    mod stub_tool {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::os::unix::fs::PermissionsExt;

        fn write_stub(dir: &Path, name: &str, body: &str) -> String {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().to_string()
        }

        const FAKE_SAMTOOLS: &str = r#"[ "$1" = "depth" ] || exit 2
[ "$2" = "-r" ] || exit 2
case "$3" in
  1:1500-1500) printf '1\t1500\t37\n' ;;
  1:9-9) printf 'truncated' ;;
  *) ;;
esac"#;

        #[rstest]
        fn test_stub_reports_depth() {
            let dir = tempfile::tempdir().unwrap();
            let tool = write_stub(dir.path(), "samtools", FAKE_SAMTOOLS);
            let source = SamtoolsDepth::new("tumor.bam").with_tool(&tool);

            assert_eq!(source.depth("1", 1500).unwrap(), 37);
        }

        #[rstest]
        fn test_stub_empty_output_is_zero() {
            let dir = tempfile::tempdir().unwrap();
            let tool = write_stub(dir.path(), "samtools", FAKE_SAMTOOLS);
            let source = SamtoolsDepth::new("tumor.bam").with_tool(&tool);

            assert_eq!(source.depth("2", 42).unwrap(), 0);
        }

        #[rstest]
        fn test_stub_malformed_output_is_zero() {
            let dir = tempfile::tempdir().unwrap();
            let tool = write_stub(dir.path(), "samtools", FAKE_SAMTOOLS);
            let source = SamtoolsDepth::new("tumor.bam")
                .with_tool(&tool)
                .with_timeout(Duration::from_secs(10));

            assert_eq!(source.depth("1", 9).unwrap(), 0);
        }

        #[rstest]
        fn test_failing_tool_without_output_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let tool = write_stub(dir.path(), "samtools", "echo 'no index' >&2\nexit 1");
            let source = SamtoolsDepth::new("tumor.bam").with_tool(&tool);

            match source.depth("1", 1500) {
                Err(SimulationError::ExternalTool(msg)) => assert!(msg.contains("no index")),
                other => panic!("expected ExternalTool error, got {:?}", other),
            }
        }

        #[rstest]
        fn test_timeout_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let tool = write_stub(dir.path(), "samtools", "sleep 5");
            let source = SamtoolsDepth::new("tumor.bam")
                .with_tool(&tool)
                .with_timeout(Duration::from_millis(100));

            let result = source.depth("1", 1500);
            assert!(matches!(result, Err(SimulationError::ExternalTool(_))));
        }

        #[rstest]
        #[case(None)]
        #[case(Some(Duration::from_secs(20)))]
        fn test_large_stderr_does_not_block(#[case] timeout: Option<Duration>) {
            let dir = tempfile::tempdir().unwrap();
            let body = "head -c 200000 /dev/zero | tr '\\0' 'x' >&2\nprintf '1\\t1500\\t37\\n'";
            let tool = write_stub(dir.path(), "samtools", body);
            let mut source = SamtoolsDepth::new("tumor.bam").with_tool(&tool);
            if let Some(timeout) = timeout {
                source = source.with_timeout(timeout);
            }

            assert_eq!(source.depth("1", 1500).unwrap(), 37);
        }
    }
}
