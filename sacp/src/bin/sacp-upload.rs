//! Discover a Snapmaker J1 on the local network and announce a G-code job.
//!
//! Meant to be used as a slicer post-processing script:
//!
//! ```text
//! sacp-upload [OPTIONS] <FILE>
//! ```
//!
//! The name shown on the printer is `FILE`'s basename, unless
//! `SLIC3R_PP_OUTPUT_NAME` (or `--name`) is set, in which case its basename
//! is used instead. Log verbosity follows `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sacp::{Client, ClientConfig, Discovery, DiscoveryConfig, UploadDescriptor};

#[derive(Debug, Parser)]
#[command(
    name = "sacp-upload",
    about = "Announce a G-code job to a Snapmaker J1 over SACP",
    version
)]
struct Cli {
    /// G-code file to upload
    file: PathBuf,

    /// Name shown on the printer (only the basename is used)
    #[arg(long, env = "SLIC3R_PP_OUTPUT_NAME")]
    name: Option<String>,

    /// Printer discovery timeout in seconds
    #[arg(long, default_value_t = 5)]
    discover_timeout: u64,

    /// Connect and session request timeout in seconds
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Job-start write timeout in seconds
    #[arg(long, default_value_t = 10)]
    upload_timeout: u64,
}

/// Pick the upload name: a non-empty override wins, reduced to its basename
fn upload_filename(file: &Path, name: Option<&str>) -> String {
    let chosen = match name {
        Some(name) if !name.is_empty() => PathBuf::from(name),
        _ => file.to_path_buf(),
    };

    chosen
        .file_name()
        .map(|base| base.to_string_lossy().into_owned())
        .unwrap_or_else(|| chosen.to_string_lossy().into_owned())
}

/// Send the job-start frame and close the session
///
/// A failed close is only logged so it never hides the send error.
async fn announce(
    client: &mut Client,
    filename: &str,
    data: &[u8],
) -> anyhow::Result<UploadDescriptor> {
    let result = client.start_upload(filename, data).await;

    if let Err(e) = client.disconnect().await {
        warn!("Failed to close connection: {}", e);
    }

    result.context("sending job")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let filename = upload_filename(&cli.file, cli.name.as_deref());
    info!("Using filename: {}", filename);

    let data = std::fs::read(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let discovery = Discovery::new(
        DiscoveryConfig::default().with_timeout(Duration::from_secs(cli.discover_timeout)),
    );
    let device = discovery.discover().await.context("discovering printer")?;

    let config = ClientConfig::default()
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_upload_timeout(Duration::from_secs(cli.upload_timeout));
    let mut client = Client::open(&device, config)
        .await
        .with_context(|| format!("connecting to {}", device.addr.ip()))?;

    let descriptor = announce(&mut client, &filename, &data).await?;

    info!(
        "Job {} announced ({} bytes, md5 {})",
        descriptor.filename, descriptor.total_length, descriptor.digest_hex
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::BytesMut;
    use sacp_transport::{Error as TransportError, Transport};

    /// Connected transport whose writes time out and whose close fails
    struct FailingTransport {
        connected: bool,
    }

    #[async_trait]
    impl Transport for FailingTransport {
        async fn connect(&mut self) -> sacp_transport::Result<()> {
            self.connected = true;
            Ok(())
        }

        async fn disconnect(&mut self) -> sacp_transport::Result<()> {
            self.connected = false;
            Err(TransportError::Io(std::io::Error::other("close failed")))
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn send(&mut self, _data: &[u8], _timeout: Duration) -> sacp_transport::Result<()> {
            Err(TransportError::WriteTimeout)
        }

        async fn receive_frame(&mut self, _timeout: Duration) -> sacp_transport::Result<BytesMut> {
            Err(TransportError::ReadTimeout)
        }

        fn remote_addr(&self) -> String {
            "fake:8888".into()
        }
    }

    #[tokio::test]
    async fn test_announce_reports_send_error_when_close_fails() {
        let transport = FailingTransport { connected: true };
        let mut client = Client::with_transport(Box::new(transport), ClientConfig::default());

        let err = announce(&mut client, "job.gcode", b"G28\n").await.unwrap_err();

        assert_eq!(err.to_string(), "sending job");
        assert!(matches!(
            err.downcast_ref::<sacp::Error>(),
            Some(sacp::Error::Transport(TransportError::WriteTimeout))
        ));
        assert!(!client.is_connected());
    }

    #[test]
    fn test_upload_filename_from_file() {
        assert_eq!(upload_filename(Path::new("/tmp/out/job.gcode"), None), "job.gcode");
    }

    #[test]
    fn test_upload_filename_override() {
        assert_eq!(
            upload_filename(Path::new("/tmp/slic3r.tmp"), Some("/prints/benchy.gcode")),
            "benchy.gcode"
        );
    }

    #[test]
    fn test_upload_filename_empty_override() {
        assert_eq!(upload_filename(Path::new("part.gcode"), Some("")), "part.gcode");
    }

    #[test]
    fn test_cli_parses() {
        let cli =
            Cli::try_parse_from(["sacp-upload", "--discover-timeout", "2", "job.gcode"]).unwrap();
        assert_eq!(cli.discover_timeout, 2);
        assert_eq!(cli.upload_timeout, 10);
        assert_eq!(cli.file, PathBuf::from("job.gcode"));
    }
}
