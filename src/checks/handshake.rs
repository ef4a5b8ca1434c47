//! TLS handshake invoker
//!
//! Runs the OpenSSL client against a target and captures its diagnostic
//! transcript. The invoker never fails: every outcome, including a missing
//! binary, is reported through [`RawHandshakeResult`].

use crate::checks::parser::has_connection_failure;
use crate::config::InspectionSettings;
use crate::models::{FailureKind, RawHandshakeResult};
use std::future::Future;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

#[cfg(unix)]
use nix::{
    sys::signal::{killpg, Signal},
    unistd::Pid,
};

/// Exit status used by coreutils `timeout` when the bound fires
const WRAPPER_TIMEOUT_EXIT: i32 = 124;

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can perform one TLS handshake and return its transcript
pub trait HandshakeInvoker: Send + Sync {
    fn invoke(
        &self,
        hostname: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = RawHandshakeResult> + Send;
}

/// Invoker backed by `openssl s_client`
#[derive(Debug, Clone)]
pub struct OpensslInvoker {
    program: String,
    leading_args: Vec<String>,
    wrapper_secs: Option<u64>,
    openssl_path: String,
}

impl OpensslInvoker {
    /// Build an invoker from inspection settings, wrapping the client in the
    /// configured `timeout` program when a wrapper bound is set
    pub fn new(settings: &InspectionSettings) -> Self {
        match settings.wrapper_timeout() {
            Some(bound) => Self {
                program: settings.timeout_program.clone(),
                leading_args: vec![
                    bound.as_secs().to_string(),
                    settings.openssl_path.clone(),
                ],
                wrapper_secs: Some(bound.as_secs()),
                openssl_path: settings.openssl_path.clone(),
            },
            None => Self::with_command(settings.openssl_path.clone(), Vec::new()),
        }
    }

    /// Run `program leading_args... s_client ...` instead of the default client
    pub fn with_command(program: impl Into<String>, leading_args: Vec<String>) -> Self {
        let program = program.into();
        Self {
            openssl_path: program.clone(),
            program,
            leading_args,
            wrapper_secs: None,
        }
    }

    /// Treat exit status 124 as a wrapper timeout of `secs` seconds
    pub fn with_wrapper_secs(mut self, secs: u64) -> Self {
        self.wrapper_secs = Some(secs);
        self
    }

    /// Report the installed client version, if any
    pub async fn detect_version(&self) -> Option<String> {
        detect_version(&self.openssl_path).await
    }

    /// Whether the wrapper program can be launched, or `None` when the client
    /// runs unwrapped
    pub async fn wrapper_available(&self) -> Option<bool> {
        self.wrapper_secs?;
        Some(program_launches(&self.program).await)
    }

    fn build_command(&self, hostname: &str, port: u16) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .arg("s_client")
            .arg("-connect")
            .arg(format!("{}:{}", connect_host(hostname), port))
            .arg("-servername")
            .arg(hostname)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, hostname: &str, port: u16, timeout: Duration) -> RawHandshakeResult {
        let start = Instant::now();

        if !is_safe_hostname(hostname) {
            return RawHandshakeResult::failed(
                FailureKind::Other,
                String::new(),
                elapsed_ms(start),
                format!("refusing to connect to invalid hostname '{}'", hostname),
            );
        }

        debug!(
            "Running {} {} s_client -connect {}:{}",
            self.program,
            self.leading_args.join(" "),
            hostname,
            port
        );

        let mut client = match ClientProcess::spawn(self.build_command(hostname, port)) {
            Ok(client) => client,
            Err(e) => {
                warn!("Failed to launch {}: {}", self.program, e);
                return RawHandshakeResult::failed(
                    FailureKind::Other,
                    String::new(),
                    elapsed_ms(start),
                    format!("failed to launch {}: {}", self.program, e),
                );
            }
        };

        let outcome = tokio::time::timeout(timeout, collect_output(&mut client.child)).await;
        let elapsed = elapsed_ms(start);

        let (status, text) = match outcome {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                client.terminate().await;
                return RawHandshakeResult::failed(
                    FailureKind::Other,
                    String::new(),
                    elapsed,
                    format!("failed to read client output: {}", e),
                );
            }
            Err(_) => {
                client.terminate().await;
                return RawHandshakeResult::timed_out(String::new(), elapsed, ceil_secs(timeout));
            }
        };

        if status.success() {
            return RawHandshakeResult::success(text, elapsed);
        }

        if status.code() == Some(WRAPPER_TIMEOUT_EXIT) {
            if let Some(secs) = self.wrapper_secs {
                return RawHandshakeResult::timed_out(text, elapsed, secs);
            }
        }

        let detail = match status.code() {
            Some(code) => format!("client exited with status {}", code),
            None => "client terminated by signal".to_string(),
        };
        let kind = if has_connection_failure(&text) {
            FailureKind::ConnectionFailed
        } else {
            FailureKind::Other
        };
        RawHandshakeResult::failed(kind, text, elapsed, detail)
    }
}

impl HandshakeInvoker for OpensslInvoker {
    async fn invoke(&self, hostname: &str, port: u16, timeout: Duration) -> RawHandshakeResult {
        self.run(hostname, port, timeout).await
    }
}

/// Run `<openssl> version` and return its trimmed output
pub async fn detect_version(openssl_path: &str) -> Option<String> {
    let output = Command::new(openssl_path)
        .arg("version")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(VERSION_PROBE_TIMEOUT, output).await {
        Ok(Ok(output)) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!version.is_empty()).then_some(version)
        }
        _ => None,
    }
}

/// Whether `program` can be spawned at all; its exit status is ignored
async fn program_launches(program: &str) -> bool {
    let status = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status();

    matches!(
        tokio::time::timeout(VERSION_PROBE_TIMEOUT, status).await,
        Ok(Ok(_))
    )
}

/// A spawned client running as the leader of its own process group.
///
/// The `timeout` wrapper cannot forward SIGKILL to the client it runs, so the
/// whole group is killed on termination and again on drop.
struct ClientProcess {
    child: Child,
    #[cfg(unix)]
    group: Option<Pid>,
}

impl ClientProcess {
    fn spawn(mut cmd: Command) -> std::io::Result<Self> {
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn()?;
        Ok(Self {
            #[cfg(unix)]
            group: child.id().map(|id| Pid::from_raw(id as i32)),
            child,
        })
    }

    #[cfg(unix)]
    fn kill_group(&mut self) {
        if let Some(group) = self.group.take() {
            // ESRCH just means every member has already exited
            if let Err(e) = killpg(group, Signal::SIGKILL) {
                debug!("Killing client process group {} failed: {}", group, e);
            }
        }
    }

    #[cfg(not(unix))]
    fn kill_group(&mut self) {}

    /// Kill the group, then reap the direct child
    async fn terminate(&mut self) {
        self.kill_group();
        if let Err(e) = self.child.kill().await {
            debug!("Killing client failed: {}", e);
        }
    }
}

impl Drop for ClientProcess {
    fn drop(&mut self) {
        self.kill_group();
    }
}

/// Wait for the child while draining both pipes, returning stderr followed by stdout
async fn collect_output(child: &mut Child) -> std::io::Result<(std::process::ExitStatus, String)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, out, err) =
        tokio::try_join!(child.wait(), read_stream(stdout), read_stream(stderr))?;

    let mut text = String::from_utf8_lossy(&err).into_owned();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(&out));
    Ok((status, text))
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Hostnames are passed as discrete arguments; reject anything that could be
/// read as an option or is plainly not a host
fn is_safe_hostname(hostname: &str) -> bool {
    !hostname.is_empty()
        && !hostname.starts_with('-')
        && !hostname.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn connect_host(hostname: &str) -> String {
    if hostname.contains(':') && !hostname.starts_with('[') {
        format!("[{}]", hostname)
    } else {
        hostname.to_string()
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let millis = duration.as_millis() as u64;
    millis.div_ceil(1000)
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
