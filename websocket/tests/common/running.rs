use std::{
    process::{ExitStatus, Stdio},
    time::Duration,
};

use anyhow::{Context, Result, bail, ensure};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines},
    process::{Child, ChildStdout, Command},
    time::{Instant, sleep, timeout_at},
};

/// Time for a client to park in its receive loop after printing a line.
const SETTLE: Duration = Duration::from_millis(200);
const EXIT_TIMEOUT: Duration = Duration::from_secs(10);

/// A client running in the background with its stdout captured.
pub struct Running {
    child: Child,
    stdout: Lines<BufReader<ChildStdout>>,
    seen: String,
}

impl Running {
    pub fn spawn(mut cmd: Command) -> Result<Self> {
        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context("failed to spawn client")?;
        let stdout = child.stdout.take().context("stdout is not piped")?;
        Ok(Self {
            child,
            stdout: BufReader::new(stdout).lines(),
            seen: String::new(),
        })
    }

    /// Reads stdout until a line containing `needle` shows up.
    pub async fn wait_for_line(&mut self, needle: &str, within: Duration) -> Result<()> {
        let deadline = Instant::now() + within;
        loop {
            let next = timeout_at(deadline, self.next_line()).await;
            let Ok(line) = next else {
                bail!("no line containing {needle:?} in:\n{}", self.seen);
            };
            match line? {
                Some(line) if line.contains(needle) => return Ok(()),
                Some(_) => {}
                None => bail!("stdout closed before {needle:?}:\n{}", self.seen),
            }
        }
    }

    /// Sends SIGINT, as Ctrl-C in a terminal does, and waits for the client
    /// to exit. Returns the exit status and everything printed to stdout.
    pub async fn interrupt(mut self) -> Result<(ExitStatus, String)> {
        sleep(SETTLE).await;
        let pid = self.child.id().context("client exited early")?;
        let kill = Command::new("kill")
            .arg("-INT")
            .arg(pid.to_string())
            .status()
            .await
            .context("failed to run kill")?;
        ensure!(kill.success(), "kill -INT {pid} failed");

        let deadline = Instant::now() + EXIT_TIMEOUT;
        while let Ok(line) = timeout_at(deadline, self.next_line()).await {
            if line?.is_none() {
                break;
            }
        }
        let status = timeout_at(deadline, self.child.wait())
            .await
            .context("client ignored SIGINT")??;
        Ok((status, self.seen))
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        let line = self.stdout.next_line().await?;
        if let Some(line) = &line {
            self.seen.push_str(line);
            self.seen.push('\n');
        }
        Ok(line)
    }
}
