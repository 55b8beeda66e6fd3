use std::process::{Child, Command, ExitStatus};
use std::time::Duration;

fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Launches the platform's default browser on `url`.
pub fn open(url: &str) -> std::io::Result<Child> {
    opener_command(url).spawn()
}

/// Waits for the opener off the async runtime so it does not linger as a zombie.
async fn reap(mut child: Child) -> std::io::Result<ExitStatus> {
    tokio::task::spawn_blocking(move || child.wait())
        .await
        .map_err(std::io::Error::other)?
}

/// Opens the browser once the server has had `delay` to start accepting.
pub fn open_after(url: String, delay: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        tracing::info!("🌐 Opening browser at {}", url);
        let result = match open(&url) {
            Ok(child) => reap(child).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(status) if !status.success() => {
                tracing::warn!("⚠️ Browser opener exited with {}; visit {} manually", status, url);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("⚠️ Could not open browser ({}); visit {} manually", e, url);
            }
        }
    });
}
